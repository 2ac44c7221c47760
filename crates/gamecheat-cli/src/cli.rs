use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use gamecheat::GameKind;

#[derive(Parser)]
#[command(name = "gamecheat")]
#[command(version, about = "Cheat automation for Warcraft III and StarCraft")]
pub struct Cli {
    /// Engine configuration (TOML)
    #[arg(short, long, global = true, default_value = "gamecheat.toml")]
    pub config: PathBuf,

    /// Target game
    #[arg(short, long, global = true, default_value = "starcraft")]
    pub game: GameKind,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Type a cheat code into the game's console
    Cheat(CheatArgs),
    /// Remove the supply cap and keep it removed until Ctrl+C
    Supply(SupplyArgs),
    /// Add minerals and gas
    Resources(ResourceArgs),
    /// Pin build speed to instant construction until Ctrl+C
    BuildSpeed(BuildSpeedArgs),
    /// Execute cheats from global hotkeys until Ctrl+C
    Hotkeys(HotKeyArgs),
}

/// Game process and, optionally, its window
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Game process ID
    #[arg(short, long)]
    pub pid: u32,

    /// Window handle (hex or decimal); defaults to the process's main window
    #[arg(short, long, value_parser = parse_window_handle)]
    pub window: Option<isize>,
}

/// Game process and in-game player slot
#[derive(Args, Debug, Clone)]
pub struct PlayerArgs {
    /// Game process ID
    #[arg(short, long)]
    pub pid: u32,

    /// Player slot (0-7)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..8))]
    pub player: u32,
}

#[derive(Args, Debug)]
pub struct CheatArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Cheat code as typed in game
    pub code: String,
}

#[derive(Args, Debug)]
pub struct SupplyArgs {
    #[command(flatten)]
    pub player: PlayerArgs,

    /// Put the stock cap back instead
    #[arg(long)]
    pub restore: bool,
}

#[derive(Args, Debug)]
pub struct ResourceArgs {
    #[command(flatten)]
    pub player: PlayerArgs,

    /// Minerals to add (configured delta if omitted)
    #[arg(long)]
    pub minerals: Option<i32>,

    /// Gas to add (configured delta if omitted)
    #[arg(long)]
    pub gas: Option<i32>,

    /// Keep adding every resource period until Ctrl+C
    #[arg(long)]
    pub repeat: bool,
}

#[derive(Args, Debug)]
pub struct BuildSpeedArgs {
    #[command(flatten)]
    pub player: PlayerArgs,
}

#[derive(Args, Debug)]
pub struct HotKeyArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// JSON file of hotkey to cheat bindings
    #[arg(short, long)]
    pub bindings: PathBuf,
}

/// Parse `0x1A2B` or `6699`
pub fn parse_window_handle(text: &str) -> Result<isize, String> {
    let text = text.trim();
    let parsed = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => isize::from_str_radix(hex, 16),
        None => text.parse::<isize>(),
    };
    match parsed {
        Ok(0) => Err("window handle must not be zero".to_string()),
        Ok(handle) => Ok(handle),
        Err(e) => Err(format!("invalid window handle '{}': {}", text, e)),
    }
}
