//! # gamecheat
//!
//! Automation engine for triggering cheats in classic real-time-strategy
//! games running as separate processes.
//!
//! This crate provides:
//! - Reliable activation of a foreign (possibly full-screen) game window
//! - Synthetic keyboard input with a legacy fallback mechanism
//! - Typing cheat codes into the in-game console with retries
//! - Memory patches kept in place by periodic maintenance loops
//! - System-wide hotkey registration and dispatch
//!
//! Every OS dependency sits behind a trait ([`memory::ProcessMemory`],
//! [`window::WindowSystem`], [`input::KeyboardDriver`],
//! [`hotkey::HotKeyHost`]); the Win32 implementations are only compiled on
//! Windows.

pub mod config;
pub mod error;
pub mod executor;
pub mod game;
pub mod hotkey;
pub mod input;
pub mod memory;
pub mod patch;
pub mod prelude;
pub mod task;
pub mod window;

pub use config::{EngineConfig, EngineConfigBuilder};
pub use error::{Error, Result};
pub use executor::CheatExecutor;
pub use game::GameKind;
pub use hotkey::{HotKey, HotKeyHost, HotKeyRegistrar, Modifiers};
pub use input::{DeliveryMethod, InputSynthesizer, KeyboardDriver};
pub use memory::{MemoryAccessor, ProcessLiveness, ProcessMemory, SystemProcesses};
pub use patch::{Faction, PatchMaintainer, StatusFlag};
pub use task::{RepeatingTask, StopSignal, TickOutcome};
pub use window::{WindowHandle, WindowState, WindowSystem};

#[cfg(target_os = "windows")]
pub use hotkey::{Win32HotKeyHost, current_thread_id, post_quit, run_message_loop};
#[cfg(target_os = "windows")]
pub use input::SendInputDriver;
#[cfg(target_os = "windows")]
pub use window::{Win32Windows, find_window_by_pid};
