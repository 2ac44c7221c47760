//! Build speed command.

use anyhow::Result;
use gamecheat::{EngineConfig, GameKind};

use crate::cli::BuildSpeedArgs;

/// Hold instant build speed until Ctrl+C or game exit
pub fn run(config: &EngineConfig, game: GameKind, args: &BuildSpeedArgs) -> Result<()> {
    super::ensure_patchable(game)?;
    let (pid, player) = (args.player.pid, args.player.player);
    let mut maintainer = super::maintainer(config);

    let signal = super::stop_on_ctrlc()?;
    super::stop_when_cleared(maintainer.build_speed_status(), &signal);

    maintainer.start_build_speed_boost(pid, player)?;
    eprintln!(
        "Build speed boosted for player {} (PID: {}). Press Ctrl+C to stop.",
        player, pid
    );

    signal.wait_forever();

    maintainer.stop_all();
    eprintln!("Build speed boost stopped");
    Ok(())
}
