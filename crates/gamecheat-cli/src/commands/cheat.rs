//! Cheat command.

use anyhow::Result;
use gamecheat::{EngineConfig, GameKind};

use crate::cli::CheatArgs;

/// Type one cheat into the game's console
#[cfg(target_os = "windows")]
pub fn run(config: &EngineConfig, game: GameKind, args: &CheatArgs) -> Result<()> {
    use gamecheat::{CheatExecutor, SendInputDriver, Win32Windows};

    let window = super::resolve_window(&args.target)?;
    eprintln!("{} window: {}", game, window);

    let executor = CheatExecutor::new(Win32Windows, SendInputDriver, config);
    executor.execute_cheat_blocking(&args.code, window)?;

    eprintln!("Cheat sent: {}", args.code);
    Ok(())
}

#[cfg(not(target_os = "windows"))]
pub fn run(_config: &EngineConfig, game: GameKind, _args: &CheatArgs) -> Result<()> {
    anyhow::bail!("Typing cheats into {} requires Windows", game)
}
