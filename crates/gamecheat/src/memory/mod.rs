//! Cross-process memory access.
//!
//! [`ProcessMemory`] is the seam between the patch logic and the OS. The
//! Windows implementation is [`MemoryAccessor`]; tests use an in-memory mock.

mod accessor;
pub mod layout;
mod liveness;

#[cfg(test)]
pub(crate) mod mock;

pub use accessor::MemoryAccessor;
pub use liveness::{ProcessLiveness, SystemProcesses};

use crate::error::Result;

/// Exclusive access to one target process's address space.
///
/// Implementations hold at most one attachment at a time. Every read and
/// write fails with [`crate::Error::NotAttached`] while detached, and only
/// succeeds when the full requested byte count was transferred.
pub trait ProcessMemory: Send {
    /// Open the target process, dropping any previous attachment first
    fn attach(&mut self, pid: u32) -> Result<()>;

    /// Close the current attachment. Always safe to call.
    fn detach(&mut self);

    /// Process ID of the current attachment
    fn attached_pid(&self) -> Option<u32>;

    fn is_attached(&self) -> bool {
        self.attached_pid().is_some()
    }

    /// Fill `buffer` from `address` with a single OS call
    fn read_bytes(&self, address: u64, buffer: &mut [u8]) -> Result<()>;

    /// Write all of `data` to `address` with a single OS call
    fn write_bytes(&mut self, address: u64, data: &[u8]) -> Result<()>;

    fn read_i32(&self, address: u64) -> Result<i32> {
        let mut buffer = [0u8; 4];
        self.read_bytes(address, &mut buffer)?;
        Ok(i32::from_le_bytes(buffer))
    }

    fn write_i32(&mut self, address: u64, value: i32) -> Result<()> {
        self.write_bytes(address, &value.to_le_bytes())
    }

    fn write_u8(&mut self, address: u64, value: u8) -> Result<()> {
        self.write_bytes(address, &[value])
    }
}

/// Attach to `pid` unless already attached to it
pub fn ensure_attached<M: ProcessMemory + ?Sized>(memory: &mut M, pid: u32) -> Result<()> {
    if memory.attached_pid() == Some(pid) {
        return Ok(());
    }
    memory.attach(pid)
}
