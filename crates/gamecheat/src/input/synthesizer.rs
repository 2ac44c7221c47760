use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use super::{DeliveryMethod, KeyStroke, KeyboardDriver, keys};
use crate::config::InputConfig;
use crate::error::Result;

/// Gap between the events of one legacy character
const LEGACY_CHAR_STEP: Duration = Duration::from_millis(5);

/// How long a legacy special key is held
const LEGACY_KEY_HOLD: Duration = Duration::from_millis(10);

/// Types text and presses keys through a [`KeyboardDriver`].
///
/// Waits between events are async sleeps, so the calling task yields instead
/// of blocking its thread.
#[derive(Debug)]
pub struct InputSynthesizer<D> {
    driver: D,
    config: InputConfig,
}

impl<D: KeyboardDriver> InputSynthesizer<D> {
    pub fn new(driver: D, config: InputConfig) -> Self {
        Self { driver, config }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// `use_alternative` forces the legacy mechanism
    fn method(&self, use_alternative: bool) -> DeliveryMethod {
        if use_alternative {
            DeliveryMethod::VirtualKey
        } else {
            self.config.method
        }
    }

    /// Type `text` one UTF-16 unit at a time with the configured key delay
    /// after each.
    pub async fn type_text(&self, text: &str, use_alternative: bool) -> Result<()> {
        let method = self.method(use_alternative);
        debug!("Typing {} characters via {}", text.chars().count(), method);

        let delay = self.config.key_delay();
        for unit in text.encode_utf16() {
            self.type_unit(unit, method).await?;
            if !delay.is_zero() {
                sleep(delay).await;
            }
        }
        Ok(())
    }

    async fn type_unit(&self, unit: u16, method: DeliveryMethod) -> Result<()> {
        match method {
            DeliveryMethod::Unicode => self.driver.send_unicode(unit),
            DeliveryMethod::VirtualKey => self.type_legacy(unit).await,
            DeliveryMethod::Auto => match self.driver.send_unicode(unit) {
                Ok(()) => Ok(()),
                Err(e) => {
                    debug!("Unicode input failed ({}), using virtual keys", e);
                    self.type_legacy(unit).await
                }
            },
        }
    }

    async fn type_legacy(&self, unit: u16) -> Result<()> {
        let Some(KeyStroke { vk, shift }) = self.driver.translate(unit) else {
            debug!("No virtual key for U+{:04X}, sending as Unicode", unit);
            return self.driver.send_unicode(unit);
        };

        if shift {
            self.driver.legacy_key(keys::SHIFT, false)?;
            sleep(LEGACY_CHAR_STEP).await;
        }
        let pressed = self.legacy_press(vk, LEGACY_CHAR_STEP).await;
        if shift {
            // Release Shift even when the key itself failed
            sleep(LEGACY_CHAR_STEP).await;
            self.driver.legacy_key(keys::SHIFT, true)?;
        }
        pressed
    }

    async fn legacy_press(&self, vk: u16, hold: Duration) -> Result<()> {
        self.driver.legacy_key(vk, false)?;
        sleep(hold).await;
        self.driver.legacy_key(vk, true)
    }

    /// Press and release one special key
    pub async fn press_key(&self, vk: u16, use_alternative: bool) -> Result<()> {
        match self.method(use_alternative) {
            DeliveryMethod::Unicode => self.driver.send_virtual_key(vk),
            DeliveryMethod::VirtualKey => self.legacy_press(vk, LEGACY_KEY_HOLD).await,
            DeliveryMethod::Auto => match self.driver.send_virtual_key(vk) {
                Ok(()) => Ok(()),
                Err(e) => {
                    debug!("Key {:#04x} failed ({}), using legacy events", vk, e);
                    self.legacy_press(vk, LEGACY_KEY_HOLD).await
                }
            },
        }
    }

    pub async fn press_enter(&self, use_alternative: bool) -> Result<()> {
        self.press_key(keys::RETURN, use_alternative).await
    }

    pub async fn press_escape(&self, use_alternative: bool) -> Result<()> {
        self.press_key(keys::ESCAPE, use_alternative).await
    }

    pub async fn press_backspace(&self, use_alternative: bool) -> Result<()> {
        self.press_key(keys::BACK, use_alternative).await
    }
}
