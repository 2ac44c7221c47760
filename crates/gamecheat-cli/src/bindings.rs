//! Hotkey to cheat bindings loaded from JSON.
//!
//! ```json
//! [{ "hotkey": "Ctrl+F1", "cheat": "show me the money" }]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use gamecheat::HotKey;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RawBinding {
    hotkey: String,
    cheat: String,
}

/// A parsed binding ready for registration
#[derive(Debug, Clone)]
pub struct CheatBinding {
    pub hotkey: HotKey,
    pub cheat: String,
}

pub fn load(path: &Path) -> Result<Vec<CheatBinding>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read bindings from {}", path.display()))?;
    parse(&content).with_context(|| format!("Invalid bindings in {}", path.display()))
}

pub fn parse(content: &str) -> Result<Vec<CheatBinding>> {
    let raw: Vec<RawBinding> = serde_json::from_str(content)?;

    let mut bindings = Vec::with_capacity(raw.len());
    for (index, entry) in raw.into_iter().enumerate() {
        let cheat = entry.cheat.trim();
        if cheat.is_empty() {
            bail!("binding {} ({}) has an empty cheat", index, entry.hotkey);
        }
        let hotkey: HotKey = entry
            .hotkey
            .parse()
            .with_context(|| format!("binding {}", index))?;
        bindings.push(CheatBinding {
            hotkey: hotkey.with_binding(index.to_string()),
            cheat: cheat.to_string(),
        });
    }
    Ok(bindings)
}
