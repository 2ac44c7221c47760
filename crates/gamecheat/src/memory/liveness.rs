/// Answers whether a target process is still running.
///
/// Maintenance loops consult this once per tick and stop when it says no.
pub trait ProcessLiveness: Send + Sync {
    fn is_alive(&self, pid: u32) -> bool;
}

/// Liveness check against the live process table
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcesses;

#[cfg(target_os = "windows")]
impl ProcessLiveness for SystemProcesses {
    fn is_alive(&self, pid: u32) -> bool {
        use windows::Win32::Foundation::CloseHandle;
        use windows::Win32::System::Threading::{
            GetExitCodeProcess, OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION,
        };

        // STILL_ACTIVE is 259 (STATUS_PENDING)
        const STILL_ACTIVE: u32 = 259;

        // SAFETY: the handle is only used within this block and closed before returning.
        unsafe {
            let Ok(handle) = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) else {
                return false;
            };
            let mut exit_code = 0u32;
            let alive = GetExitCodeProcess(handle, &mut exit_code).is_ok()
                && exit_code == STILL_ACTIVE;
            let _ = CloseHandle(handle);
            alive
        }
    }
}

#[cfg(not(target_os = "windows"))]
impl ProcessLiveness for SystemProcesses {
    fn is_alive(&self, pid: u32) -> bool {
        std::path::Path::new(&format!("/proc/{}", pid)).exists()
    }
}
