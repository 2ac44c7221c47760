//! In-memory stand-ins for a target process, used by unit tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ProcessLiveness, ProcessMemory};
use crate::error::{Error, Result};

/// Sparse byte-addressed memory for a set of fake processes
#[derive(Debug, Default)]
pub struct MockMemory {
    processes: HashSet<u32>,
    bytes: HashMap<u64, u8>,
    attached: Option<u32>,
    /// Addresses at or above this bound are unmapped
    limit: Option<u64>,
    failing: HashSet<u64>,
    attach_count: usize,
    writes: Vec<(u64, Vec<u8>)>,
}

impl MockMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `pid` attachable
    pub fn with_process(mut self, pid: u32) -> Self {
        self.processes.insert(pid);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_i32(mut self, address: u64, value: i32) -> Self {
        self.poke(address, &value.to_le_bytes());
        self
    }

    /// Reject every write starting at `address`
    pub fn with_failing_write(mut self, address: u64) -> Self {
        self.failing.insert(address);
        self
    }

    pub fn set_limit(&mut self, limit: Option<u64>) {
        self.limit = limit;
    }

    pub fn poke(&mut self, address: u64, data: &[u8]) {
        for (i, byte) in data.iter().enumerate() {
            self.bytes.insert(address + i as u64, *byte);
        }
    }

    pub fn peek_i32(&self, address: u64) -> i32 {
        let mut buffer = [0u8; 4];
        for (i, byte) in buffer.iter_mut().enumerate() {
            *byte = self.bytes.get(&(address + i as u64)).copied().unwrap_or(0);
        }
        i32::from_le_bytes(buffer)
    }

    pub fn peek_u8(&self, address: u64) -> Option<u8> {
        self.bytes.get(&address).copied()
    }

    pub fn attach_count(&self) -> usize {
        self.attach_count
    }

    /// Successful writes in order
    pub fn writes(&self) -> &[(u64, Vec<u8>)] {
        &self.writes
    }

    pub fn writes_to(&self, address: u64) -> usize {
        self.writes.iter().filter(|(a, _)| *a == address).count()
    }

    fn mapped_len(&self, address: u64, len: usize) -> usize {
        match self.limit {
            Some(limit) if address >= limit => 0,
            Some(limit) => len.min((limit - address) as usize),
            None => len,
        }
    }
}

impl ProcessMemory for MockMemory {
    fn attach(&mut self, pid: u32) -> Result<()> {
        self.detach();
        if !self.processes.contains(&pid) {
            return Err(Error::ProcessOpenFailed {
                pid,
                message: "no such process".to_string(),
            });
        }
        self.attached = Some(pid);
        self.attach_count += 1;
        Ok(())
    }

    fn detach(&mut self) {
        self.attached = None;
    }

    fn attached_pid(&self) -> Option<u32> {
        self.attached
    }

    fn read_bytes(&self, address: u64, buffer: &mut [u8]) -> Result<()> {
        if self.attached.is_none() {
            return Err(Error::NotAttached);
        }
        let mapped = self.mapped_len(address, buffer.len());
        if mapped != buffer.len() {
            return Err(Error::PartialTransfer {
                address,
                expected: buffer.len(),
                actual: mapped,
            });
        }
        for (i, byte) in buffer.iter_mut().enumerate() {
            *byte = self.bytes.get(&(address + i as u64)).copied().unwrap_or(0);
        }
        Ok(())
    }

    fn write_bytes(&mut self, address: u64, data: &[u8]) -> Result<()> {
        if self.attached.is_none() {
            return Err(Error::NotAttached);
        }
        if self.failing.contains(&address) {
            return Err(Error::MemoryWriteFailed {
                address,
                message: "access violation".to_string(),
            });
        }
        let mapped = self.mapped_len(address, data.len());
        if mapped != data.len() {
            return Err(Error::PartialTransfer {
                address,
                expected: data.len(),
                actual: mapped,
            });
        }
        self.poke(address, data);
        self.writes.push((address, data.to_vec()));
        Ok(())
    }
}

/// Liveness check that replays a fixed script of answers.
///
/// Once the script runs out every further call answers `false`.
#[derive(Debug, Default)]
pub struct ScriptedLiveness {
    answers: Mutex<VecDeque<bool>>,
    calls: AtomicUsize,
}

impl ScriptedLiveness {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A process that never exits
    pub fn always_alive() -> Self {
        Self::new(&[true; 10_000])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProcessLiveness for ScriptedLiveness {
    fn is_alive(&self, _pid: u32) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(false)
    }
}
