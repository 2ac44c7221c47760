#[cfg(target_os = "windows")]
use windows::Win32::Foundation::{CloseHandle, HANDLE};
#[cfg(target_os = "windows")]
use windows::Win32::System::Diagnostics::Debug::{ReadProcessMemory, WriteProcessMemory};
#[cfg(target_os = "windows")]
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_OPERATION, PROCESS_VM_READ,
    PROCESS_VM_WRITE,
};

use tracing::{debug, info, warn};

use super::ProcessMemory;
use crate::error::{Error, Result};

/// Process memory accessor backed by `ReadProcessMemory`/`WriteProcessMemory`.
///
/// Owns at most one open process handle, closed on [`detach`](ProcessMemory::detach)
/// and on drop. Not meant to be shared between threads without external locking.
#[derive(Debug, Default)]
pub struct MemoryAccessor {
    #[cfg(target_os = "windows")]
    handle: Option<HANDLE>,
    pid: Option<u32>,
}

// HANDLE wraps a raw pointer; the accessor is only ever used by one owner at a time.
#[cfg(target_os = "windows")]
unsafe impl Send for MemoryAccessor {}

impl MemoryAccessor {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(target_os = "windows")]
impl ProcessMemory for MemoryAccessor {
    fn attach(&mut self, pid: u32) -> Result<()> {
        self.detach();

        // SAFETY: OpenProcess has no preconditions; failure is reported via Result.
        let handle = unsafe {
            OpenProcess(
                PROCESS_VM_READ | PROCESS_VM_WRITE | PROCESS_VM_OPERATION | PROCESS_QUERY_INFORMATION,
                false,
                pid,
            )
        }
        .map_err(|e| {
            warn!("Failed to open process {}: {}", pid, e);
            Error::ProcessOpenFailed {
                pid,
                message: e.to_string(),
            }
        })?;

        self.handle = Some(handle);
        self.pid = Some(pid);
        info!("Attached to process {}", pid);
        Ok(())
    }

    fn detach(&mut self) {
        if let Some(handle) = self.handle.take() {
            // SAFETY: the handle came from OpenProcess and is closed exactly once.
            unsafe {
                let _ = CloseHandle(handle);
            }
            info!("Detached from process {:?}", self.pid);
        }
        self.pid = None;
    }

    fn attached_pid(&self) -> Option<u32> {
        self.pid
    }

    fn read_bytes(&self, address: u64, buffer: &mut [u8]) -> Result<()> {
        let handle = self.handle.ok_or(Error::NotAttached)?;
        let mut bytes_read = 0usize;

        // SAFETY: buffer is valid for buffer.len() bytes; the remote address is
        // validated by the OS.
        unsafe {
            ReadProcessMemory(
                handle,
                address as *const _,
                buffer.as_mut_ptr().cast(),
                buffer.len(),
                Some(&mut bytes_read),
            )
        }
        .map_err(|e| Error::MemoryReadFailed {
            address,
            message: e.to_string(),
        })?;

        if bytes_read != buffer.len() {
            return Err(Error::PartialTransfer {
                address,
                expected: buffer.len(),
                actual: bytes_read,
            });
        }
        Ok(())
    }

    fn write_bytes(&mut self, address: u64, data: &[u8]) -> Result<()> {
        let handle = self.handle.ok_or(Error::NotAttached)?;
        let mut bytes_written = 0usize;

        // SAFETY: data is valid for data.len() bytes; the remote address is
        // validated by the OS.
        unsafe {
            WriteProcessMemory(
                handle,
                address as *const _,
                data.as_ptr().cast(),
                data.len(),
                Some(&mut bytes_written),
            )
        }
        .map_err(|e| Error::MemoryWriteFailed {
            address,
            message: e.to_string(),
        })?;

        if bytes_written != data.len() {
            return Err(Error::PartialTransfer {
                address,
                expected: data.len(),
                actual: bytes_written,
            });
        }
        debug!("Wrote {} bytes at {:#x}", data.len(), address);
        Ok(())
    }
}

// --- Non-Windows stub ---

#[cfg(not(target_os = "windows"))]
impl ProcessMemory for MemoryAccessor {
    fn attach(&mut self, pid: u32) -> Result<()> {
        warn!("Cannot attach to process {}: unsupported platform", pid);
        Err(Error::Unsupported("process memory access is only supported on Windows"))
    }

    fn detach(&mut self) {
        if self.pid.take().is_some() {
            debug!("Detached");
        }
    }

    fn attached_pid(&self) -> Option<u32> {
        self.pid
    }

    fn read_bytes(&self, _address: u64, _buffer: &mut [u8]) -> Result<()> {
        Err(Error::NotAttached)
    }

    fn write_bytes(&mut self, _address: u64, _data: &[u8]) -> Result<()> {
        Err(Error::NotAttached)
    }
}

impl Drop for MemoryAccessor {
    fn drop(&mut self) {
        self.detach();
    }
}
