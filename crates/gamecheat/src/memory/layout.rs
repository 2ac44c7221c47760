//! Memory layout constants for the supported game builds
//!
//! All addresses are absolute and fixed for one known executable. Per-player
//! arrays hold 12 slots.

/// StarCraft: Brood War 1.16.1
pub mod starcraft {
    /// Size of one per-player entry in the supply and resource arrays
    pub const PLAYER_ENTRY_SIZE: u64 = 4;

    /// Size of one per-player entry in the build speed array
    pub const BUILD_SPEED_ENTRY_SIZE: u64 = 1;

    /// Number of player slots in every per-player array
    pub const PLAYER_SLOTS: u32 = 12;

    // Supply provided by depots/overlords/pylons (player 0 first)
    pub const SUPPLY_PROVIDED_ZERG: u64 = 0x0058_2174;
    pub const SUPPLY_PROVIDED_TERRAN: u64 = 0x0058_2234;
    pub const SUPPLY_PROVIDED_PROTOSS: u64 = 0x0058_22F4;

    // Supply ceiling
    pub const SUPPLY_MAX_ZERG: u64 = 0x0058_21A4;
    pub const SUPPLY_MAX_TERRAN: u64 = 0x0058_2264;
    pub const SUPPLY_MAX_PROTOSS: u64 = 0x0058_2324;

    pub const MINERALS: u64 = 0x0057_F0F0;
    pub const GAS: u64 = 0x0057_F120;

    pub const BUILD_SPEED: u64 = 0x0065_09C0;

    /// Internal supply is stored at twice the displayed value
    pub const SUPPLY_SCALE: i32 = 2;

    /// Internal value of the stock 200 cap
    pub const SUPPLY_DEFAULT_INTERNAL: i32 = 400;

    /// Internal value written when the cap is lifted (displayed 800)
    pub const SUPPLY_MAX_INTERNAL: i32 = 1600;

    /// Build speed byte: 0 completes construction instantly
    pub const BUILD_SPEED_FAST: u8 = 0;

    pub const DEFAULT_MINERALS_DELTA: i32 = 10_000;
    pub const DEFAULT_GAS_DELTA: i32 = 10_000;
}

/// Convert a displayed supply count into the game's internal representation
pub const fn to_internal_supply(displayed: i32) -> i32 {
    displayed * starcraft::SUPPLY_SCALE
}

/// Convert an internal supply value into what the player sees
pub const fn to_displayed_supply(internal: i32) -> i32 {
    internal / starcraft::SUPPLY_SCALE
}
