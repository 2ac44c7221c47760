//! Typing cheat codes into a game's in-game command line.

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::{ActivationConfig, EngineConfig, ExecutorConfig};
use crate::error::{Error, Result};
use crate::input::{InputSynthesizer, KeyboardDriver};
use crate::window::{self, WindowHandle, WindowSystem};

/// Activates the game window and types a cheat into its console.
///
/// Each input attempt opens the console with Enter, types the code and
/// confirms with Enter. The first attempt uses the configured delivery
/// method; later attempts force the legacy virtual-key mechanism.
pub struct CheatExecutor<W, D> {
    windows: W,
    input: InputSynthesizer<D>,
    activation: ActivationConfig,
    config: ExecutorConfig,
}

impl<W: WindowSystem, D: KeyboardDriver> CheatExecutor<W, D> {
    pub fn new(windows: W, driver: D, config: &EngineConfig) -> Self {
        Self {
            windows,
            input: InputSynthesizer::new(driver, config.input.clone()),
            activation: config.activation.clone(),
            config: config.executor.clone(),
        }
    }

    pub fn windows(&self) -> &W {
        &self.windows
    }

    pub fn input(&self) -> &InputSynthesizer<D> {
        &self.input
    }

    /// Type `cheat` into the console of `window`.
    ///
    /// Fails without touching the OS when the cheat is empty or the handle
    /// is null. Activation failure aborts before any key is sent.
    pub async fn execute_cheat(&self, cheat: &str, window: WindowHandle) -> Result<()> {
        if cheat.is_empty() {
            warn!("Refusing to execute an empty cheat");
            return Err(Error::EmptyCheat);
        }
        if window.is_null() || !window::is_window_valid(&self.windows, window) {
            warn!("Cannot execute cheat: window {} is not valid", window);
            return Err(Error::InvalidWindow);
        }

        info!("Executing cheat '{}' in window {}", cheat, window);
        window::activate(&self.windows, window, &self.activation).await?;

        let full_screen = window::is_full_screen(&self.windows, window);
        let console_delay = self.config.console_delay(full_screen);
        let type_delay = self.config.type_delay(full_screen);
        debug!(
            "Full-screen: {}, console delay {:?}, type delay {:?}",
            full_screen, console_delay, type_delay
        );

        let attempts = self.config.max_retries.max(1);
        for attempt in 1..=attempts {
            let use_alternative = attempt > 1;
            debug!(
                "Input attempt {}/{}{}",
                attempt,
                attempts,
                if use_alternative { " (virtual keys)" } else { "" }
            );

            let result = async {
                self.input.press_enter(use_alternative).await?;
                sleep(console_delay).await;
                self.input.type_text(cheat, use_alternative).await?;
                sleep(type_delay).await;
                self.input.press_enter(use_alternative).await?;
                sleep(self.config.confirm_delay()).await;
                Ok::<(), Error>(())
            }
            .await;

            match result {
                Ok(()) => {
                    info!("Cheat '{}' sent (attempt {}/{})", cheat, attempt, attempts);
                    return Ok(());
                }
                Err(e) => {
                    warn!("Input attempt {}/{} failed: {}", attempt, attempts, e);
                    if attempt < attempts {
                        sleep(self.config.retry_delay()).await;
                    }
                }
            }
        }

        Err(Error::InputFailed { attempts })
    }

    /// Blocking wrapper around [`execute_cheat`](Self::execute_cheat).
    ///
    /// Runs its own single-threaded runtime, so it must not be called from
    /// inside an async context.
    pub fn execute_cheat_blocking(&self, cheat: &str, window: WindowHandle) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        runtime.block_on(self.execute_cheat(cheat, window))
    }
}
