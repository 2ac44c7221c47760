//! Engine configuration.
//!
//! Every delay, period, and retry count used by the automation components is
//! collected here so callers can tune them without touching the algorithms.
//! The defaults are the values known to work against the supported games.
//!
//! ## Example
//!
//! ```ignore
//! use gamecheat::config::EngineConfig;
//!
//! // Defaults
//! let config = EngineConfig::default();
//!
//! // From a TOML file
//! let config = EngineConfig::load("gamecheat.toml")?;
//!
//! // Programmatic overrides
//! let config = EngineConfig::builder()
//!     .key_delay_ms(20)
//!     .executor_retries(3)
//!     .build();
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::input::DeliveryMethod;
use crate::memory::layout::starcraft;

/// Shortest period a maintenance loop may run at
pub const MIN_PERIOD_MS: u64 = 100;

/// Keyboard input settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Delay inserted after each typed character
    pub key_delay_ms: u64,
    /// Preferred delivery mechanism
    pub method: DeliveryMethod,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            key_delay_ms: 10,
            method: DeliveryMethod::Auto,
        }
    }
}

impl InputConfig {
    pub fn key_delay(&self) -> Duration {
        Duration::from_millis(self.key_delay_ms)
    }
}

/// Window activation protocol timings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivationConfig {
    pub max_retries: u32,
    /// Wait after restoring a minimized window
    pub restore_delay_ms: u64,
    /// Wait before verifying foreground state (windowed)
    pub verify_delay_ms: u64,
    /// Wait before verifying foreground state (full-screen)
    pub verify_delay_full_screen_ms: u64,
    /// Wait after the secondary show-window nudge
    pub show_window_delay_ms: u64,
    /// Wait between failed attempts
    pub retry_delay_ms: u64,
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            restore_delay_ms: 200,
            verify_delay_ms: 200,
            verify_delay_full_screen_ms: 500,
            show_window_delay_ms: 300,
            retry_delay_ms: 300,
        }
    }
}

impl ActivationConfig {
    pub fn restore_delay(&self) -> Duration {
        Duration::from_millis(self.restore_delay_ms)
    }

    pub fn show_window_delay(&self) -> Duration {
        Duration::from_millis(self.show_window_delay_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn verify_delay(&self, full_screen: bool) -> Duration {
        Duration::from_millis(if full_screen {
            self.verify_delay_full_screen_ms
        } else {
            self.verify_delay_ms
        })
    }
}

/// Cheat command executor timings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    pub max_retries: u32,
    /// Wait after opening the in-game command line
    pub console_delay_ms: u64,
    pub console_delay_full_screen_ms: u64,
    /// Wait after typing the cheat text
    pub type_delay_ms: u64,
    pub type_delay_full_screen_ms: u64,
    /// Wait after confirming the command
    pub confirm_delay_ms: u64,
    /// Wait between failed input attempts
    pub retry_delay_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            console_delay_ms: 50,
            console_delay_full_screen_ms: 100,
            type_delay_ms: 50,
            type_delay_full_screen_ms: 100,
            confirm_delay_ms: 50,
            retry_delay_ms: 200,
        }
    }
}

impl ExecutorConfig {
    pub fn confirm_delay(&self) -> Duration {
        Duration::from_millis(self.confirm_delay_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn console_delay(&self, full_screen: bool) -> Duration {
        Duration::from_millis(if full_screen {
            self.console_delay_full_screen_ms
        } else {
            self.console_delay_ms
        })
    }

    pub fn type_delay(&self, full_screen: bool) -> Duration {
        Duration::from_millis(if full_screen {
            self.type_delay_full_screen_ms
        } else {
            self.type_delay_ms
        })
    }
}

/// Memory patch maintenance settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    pub supply_period_ms: u64,
    pub resource_period_ms: u64,
    pub build_speed_period_ms: u64,
    /// Minerals added per resource tick
    pub minerals_delta: i32,
    /// Gas added per resource tick
    pub gas_delta: i32,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            supply_period_ms: 2000,
            resource_period_ms: 5000,
            build_speed_period_ms: 1000,
            minerals_delta: starcraft::DEFAULT_MINERALS_DELTA,
            gas_delta: starcraft::DEFAULT_GAS_DELTA,
        }
    }
}

impl PatchConfig {
    pub fn supply_period(&self) -> Duration {
        Duration::from_millis(self.supply_period_ms)
    }

    pub fn resource_period(&self) -> Duration {
        Duration::from_millis(self.resource_period_ms)
    }

    pub fn build_speed_period(&self) -> Duration {
        Duration::from_millis(self.build_speed_period_ms)
    }

    /// Raise every period to at least `MIN_PERIOD_MS`
    pub fn sanitized(mut self) -> Self {
        self.supply_period_ms = self.supply_period_ms.max(MIN_PERIOD_MS);
        self.resource_period_ms = self.resource_period_ms.max(MIN_PERIOD_MS);
        self.build_speed_period_ms = self.build_speed_period_ms.max(MIN_PERIOD_MS);
        self
    }
}

/// Configuration for all engine components
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub input: InputConfig,
    pub activation: ActivationConfig,
    pub executor: ExecutorConfig,
    pub patch: PatchConfig,
}

impl EngineConfig {
    /// Create a new configuration builder
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Load configuration from a TOML file
    ///
    /// Missing sections and keys fall back to their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&content)?;
        debug!("Loaded engine config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        Ok(config.sanitized())
    }

    /// Clamp values that would stall or disable a component
    pub fn sanitized(mut self) -> Self {
        self.activation.max_retries = self.activation.max_retries.max(1);
        self.executor.max_retries = self.executor.max_retries.max(1);
        self.patch = self.patch.sanitized();
        self
    }
}

/// Builder for EngineConfig
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Set the delay between typed characters
    pub fn key_delay_ms(mut self, ms: u64) -> Self {
        self.config.input.key_delay_ms = ms;
        self
    }

    /// Set the preferred input delivery method
    pub fn input_method(mut self, method: DeliveryMethod) -> Self {
        self.config.input.method = method;
        self
    }

    /// Set how many times window activation is attempted
    pub fn activation_retries(mut self, retries: u32) -> Self {
        self.config.activation.max_retries = retries;
        self
    }

    /// Set how many times cheat input is attempted
    pub fn executor_retries(mut self, retries: u32) -> Self {
        self.config.executor.max_retries = retries;
        self
    }

    pub fn supply_period_ms(mut self, ms: u64) -> Self {
        self.config.patch.supply_period_ms = ms;
        self
    }

    pub fn resource_period_ms(mut self, ms: u64) -> Self {
        self.config.patch.resource_period_ms = ms;
        self
    }

    pub fn build_speed_period_ms(mut self, ms: u64) -> Self {
        self.config.patch.build_speed_period_ms = ms;
        self
    }

    /// Set the per-tick resource deltas
    pub fn resource_deltas(mut self, minerals: i32, gas: i32) -> Self {
        self.config.patch.minerals_delta = minerals;
        self.config.patch.gas_delta = gas;
        self
    }

    /// Build the configuration
    ///
    /// Values are taken as given; components that run loops clamp their own
    /// periods.
    pub fn build(self) -> EngineConfig {
        self.config
    }
}
