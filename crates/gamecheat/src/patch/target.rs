//! Patch targets: where each value lives and what gets written there.

use super::Faction;
use crate::memory::ProcessMemory;
use crate::memory::layout::starcraft;
use crate::error::Result;

/// Base of a per-player array.
///
/// Player indices are not range-checked; an out-of-range index is a caller error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryAddress {
    pub base: u64,
    pub entry_size: u64,
}

impl MemoryAddress {
    pub const fn new(base: u64, entry_size: u64) -> Self {
        Self { base, entry_size }
    }

    /// Address of `player`'s entry
    pub const fn for_player(&self, player: u32) -> u64 {
        self.base + player as u64 * self.entry_size
    }
}

/// Supply addresses of one faction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupplyPatchSpec {
    pub faction: Faction,
    pub provided: MemoryAddress,
    pub max: MemoryAddress,
}

impl SupplyPatchSpec {
    pub const fn new(faction: Faction, provided: u64, max: u64) -> Self {
        Self {
            faction,
            provided: MemoryAddress::new(provided, starcraft::PLAYER_ENTRY_SIZE),
            max: MemoryAddress::new(max, starcraft::PLAYER_ENTRY_SIZE),
        }
    }

    /// Write `internal` to both the provided and the max entry.
    ///
    /// Both writes are attempted even if the first fails.
    pub fn apply<M: ProcessMemory + ?Sized>(
        &self,
        memory: &mut M,
        player: u32,
        internal: i32,
    ) -> Result<()> {
        let provided = memory.write_i32(self.provided.for_player(player), internal);
        let max = memory.write_i32(self.max.for_player(player), internal);
        provided.and(max)
    }

    /// Put the stock cap back. Provided supply is recomputed by the game.
    pub fn restore<M: ProcessMemory + ?Sized>(&self, memory: &mut M, player: u32) -> Result<()> {
        memory.write_i32(
            self.max.for_player(player),
            starcraft::SUPPLY_DEFAULT_INTERNAL,
        )
    }
}

/// The three supply specs, in the order they are patched
pub const SUPPLY_SPECS: [SupplyPatchSpec; 3] = [
    SupplyPatchSpec::new(
        Faction::Terran,
        starcraft::SUPPLY_PROVIDED_TERRAN,
        starcraft::SUPPLY_MAX_TERRAN,
    ),
    SupplyPatchSpec::new(
        Faction::Zerg,
        starcraft::SUPPLY_PROVIDED_ZERG,
        starcraft::SUPPLY_MAX_ZERG,
    ),
    SupplyPatchSpec::new(
        Faction::Protoss,
        starcraft::SUPPLY_PROVIDED_PROTOSS,
        starcraft::SUPPLY_MAX_PROTOSS,
    ),
];

/// Additive resource patch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourcePatchSpec {
    pub minerals: MemoryAddress,
    pub gas: MemoryAddress,
}

impl ResourcePatchSpec {
    pub const STARCRAFT: Self = Self {
        minerals: MemoryAddress::new(starcraft::MINERALS, starcraft::PLAYER_ENTRY_SIZE),
        gas: MemoryAddress::new(starcraft::GAS, starcraft::PLAYER_ENTRY_SIZE),
    };

    /// Read-modify-write one resource; the sum saturates instead of wrapping.
    fn add_one<M: ProcessMemory + ?Sized>(
        memory: &mut M,
        address: u64,
        delta: i32,
    ) -> Result<i32> {
        let current = memory.read_i32(address)?;
        let updated = current.saturating_add(delta);
        memory.write_i32(address, updated)?;
        Ok(updated)
    }

    /// Add the deltas and return the new `(minerals, gas)`.
    ///
    /// Stops at the first failure; minerals may already be written when gas fails.
    pub fn apply<M: ProcessMemory + ?Sized>(
        &self,
        memory: &mut M,
        player: u32,
        minerals: i32,
        gas: i32,
    ) -> Result<(i32, i32)> {
        let minerals = Self::add_one(memory, self.minerals.for_player(player), minerals)?;
        let gas = Self::add_one(memory, self.gas.for_player(player), gas)?;
        Ok((minerals, gas))
    }
}

/// Fixed-byte build speed patch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSpeedPatchSpec {
    pub address: MemoryAddress,
    pub value: u8,
}

impl BuildSpeedPatchSpec {
    pub const STARCRAFT: Self = Self {
        address: MemoryAddress::new(starcraft::BUILD_SPEED, starcraft::BUILD_SPEED_ENTRY_SIZE),
        value: starcraft::BUILD_SPEED_FAST,
    };

    pub fn apply<M: ProcessMemory + ?Sized>(&self, memory: &mut M, player: u32) -> Result<()> {
        memory.write_u8(self.address.for_player(player), self.value)
    }
}
