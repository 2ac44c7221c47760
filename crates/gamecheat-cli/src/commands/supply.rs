//! Supply cap command.

use anyhow::Result;
use gamecheat::{EngineConfig, GameKind, ProcessLiveness, SystemProcesses};

use crate::cli::SupplyArgs;

/// Remove the supply cap and hold it until Ctrl+C or game exit, or restore it
pub fn run(config: &EngineConfig, game: GameKind, args: &SupplyArgs) -> Result<()> {
    super::ensure_patchable(game)?;
    let (pid, player) = (args.player.pid, args.player.player);
    let mut maintainer = super::maintainer(config);

    if args.restore {
        maintainer.restore_supply_cap(pid, player)?;
        eprintln!("Supply cap restored for player {}", player);
        return Ok(());
    }

    let signal = super::stop_on_ctrlc()?;
    super::stop_when_cleared(maintainer.supply_status(), &signal);

    maintainer.remove_supply_cap(pid, player)?;
    eprintln!(
        "Supply cap removed for player {} (PID: {}). Press Ctrl+C to restore.",
        player, pid
    );

    signal.wait_forever();

    if SystemProcesses.is_alive(pid) {
        maintainer.restore_supply_cap(pid, player)?;
        eprintln!("Supply cap restored");
    } else {
        eprintln!("Game exited");
    }
    Ok(())
}
