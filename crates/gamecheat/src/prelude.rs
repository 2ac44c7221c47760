//! Prelude module for convenient imports
//!
//! ```ignore
//! use gamecheat::prelude::*;
//! ```
//!
//! Brings the component types, their OS seams and the error type into scope.

// Configuration
pub use crate::config::{EngineConfig, EngineConfigBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Components
pub use crate::executor::CheatExecutor;
pub use crate::game::GameKind;
pub use crate::hotkey::{HotKey, HotKeyRegistrar, Modifiers};
pub use crate::input::{DeliveryMethod, InputSynthesizer};
pub use crate::patch::{Faction, PatchMaintainer, StatusFlag};
pub use crate::window::{WindowHandle, WindowState};

// OS seams
pub use crate::hotkey::HotKeyHost;
pub use crate::input::KeyboardDriver;
pub use crate::memory::{ProcessLiveness, ProcessMemory};
pub use crate::window::WindowSystem;
