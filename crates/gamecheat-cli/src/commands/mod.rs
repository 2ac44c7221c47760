//! CLI command implementations.

pub mod build_speed;
pub mod cheat;
pub mod hotkeys;
pub mod resources;
pub mod supply;

use std::sync::Arc;

use anyhow::{Result, bail};
use gamecheat::{
    EngineConfig, GameKind, MemoryAccessor, PatchMaintainer, StatusFlag, StopSignal,
    SystemProcesses,
};
use tracing::info;

pub type Maintainer = PatchMaintainer<MemoryAccessor, SystemProcesses>;

pub fn maintainer(config: &EngineConfig) -> Maintainer {
    PatchMaintainer::new(MemoryAccessor::new(), SystemProcesses, config.patch.clone())
}

/// Memory patches only make sense for games with a known layout
pub fn ensure_patchable(game: GameKind) -> Result<()> {
    if !game.supports_memory_patches() {
        bail!("Memory patches are not available for {}", game);
    }
    Ok(())
}

/// Trigger the returned signal on Ctrl+C
pub fn stop_on_ctrlc() -> Result<Arc<StopSignal>> {
    let signal = Arc::new(StopSignal::new());
    let signal_ctrlc = Arc::clone(&signal);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal, stopping...");
        signal_ctrlc.trigger();
    })?;
    Ok(signal)
}

/// Also trigger `signal` when a maintenance loop clears its flag, which
/// happens when the game exits.
///
/// Subscribe before starting the loop so an exit on its first tick is seen.
pub fn stop_when_cleared(flag: &StatusFlag, signal: &Arc<StopSignal>) {
    let signal = Arc::clone(signal);
    flag.subscribe(move |active| {
        if !active {
            signal.trigger();
        }
    });
}

/// Use the given window handle, or the process's first visible window
#[cfg(target_os = "windows")]
pub fn resolve_window(target: &crate::cli::TargetArgs) -> Result<gamecheat::WindowHandle> {
    use anyhow::Context;
    use gamecheat::WindowHandle;

    match target.window {
        Some(raw) => Ok(WindowHandle::from_raw(raw)),
        None => gamecheat::find_window_by_pid(target.pid)
            .with_context(|| format!("No visible window found for process {}", target.pid)),
    }
}
