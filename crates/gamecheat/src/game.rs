use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Supported target games
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum GameKind {
    #[strum(to_string = "Warcraft III", serialize = "warcraft3", serialize = "war3")]
    Warcraft3,
    #[default]
    #[strum(to_string = "StarCraft", serialize = "starcraft", serialize = "sc")]
    StarCraft,
}

impl GameKind {
    /// Whether the fixed memory layout applies to this game.
    ///
    /// Only StarCraft: Brood War 1.16.1 addresses are known; everything else
    /// is limited to typed cheats.
    pub fn supports_memory_patches(self) -> bool {
        matches!(self, GameKind::StarCraft)
    }
}
