//! Resource command.

use anyhow::Result;
use gamecheat::{EngineConfig, GameKind};

use crate::cli::ResourceArgs;

/// Add resources once, or keep adding them until Ctrl+C or game exit
pub fn run(config: &EngineConfig, game: GameKind, args: &ResourceArgs) -> Result<()> {
    super::ensure_patchable(game)?;
    let (pid, player) = (args.player.pid, args.player.player);

    let mut config = config.clone();
    if let Some(minerals) = args.minerals {
        config.patch.minerals_delta = minerals;
    }
    if let Some(gas) = args.gas {
        config.patch.gas_delta = gas;
    }
    let (minerals, gas) = (config.patch.minerals_delta, config.patch.gas_delta);
    let mut maintainer = super::maintainer(&config);

    if !args.repeat {
        maintainer.add_resources(pid, player, minerals, gas)?;
        eprintln!("Added {} minerals and {} gas for player {}", minerals, gas, player);
        return Ok(());
    }

    let signal = super::stop_on_ctrlc()?;
    super::stop_when_cleared(maintainer.resource_status(), &signal);

    maintainer.start_resource_boost(pid, player)?;
    eprintln!(
        "Adding {} minerals and {} gas every {:?} for player {}. Press Ctrl+C to stop.",
        minerals,
        gas,
        config.patch.resource_period(),
        player
    );

    signal.wait_forever();

    maintainer.stop_all();
    eprintln!("Resource boost stopped");
    Ok(())
}
