use thiserror::Error;

use crate::patch::Faction;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to open process {pid}: {message}")]
    ProcessOpenFailed { pid: u32, message: String },

    #[error("Not attached to any process")]
    NotAttached,

    #[error("Failed to read process memory at address {address:#x}: {message}")]
    MemoryReadFailed { address: u64, message: String },

    #[error("Failed to write process memory at address {address:#x}: {message}")]
    MemoryWriteFailed { address: u64, message: String },

    #[error("Partial transfer at address {address:#x}: {actual} of {expected} bytes")]
    PartialTransfer {
        address: u64,
        expected: usize,
        actual: usize,
    },

    #[error("Supply patch incomplete for: {}", join_factions(.failed))]
    SupplyPatchIncomplete { failed: Vec<Faction> },

    #[error("Invalid or closed window handle")]
    InvalidWindow,

    #[error("{call} failed: {message}")]
    SystemCallFailed {
        call: &'static str,
        message: String,
    },

    #[error("Window activation failed after {attempts} attempts")]
    ActivationFailed { attempts: u32 },

    #[error("Cheat text is empty")]
    EmptyCheat,

    #[error("Input delivery rejected: {sent} of {expected} events accepted")]
    InputRejected { sent: u32, expected: u32 },

    #[error("Cheat input failed after {attempts} attempts")]
    InputFailed { attempts: u32 },

    #[error("Invalid hotkey: {0}")]
    InvalidHotKey(String),

    #[error("Hotkey already registered: {0}")]
    HotKeyConflict(String),

    #[error("Hotkey not registered: {0}")]
    HotKeyNotRegistered(String),

    #[error("Failed to register hotkey {hotkey}: {message}")]
    HotKeyRegistrationFailed { hotkey: String, message: String },

    #[error("Not supported on this platform: {0}")]
    Unsupported(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

fn join_factions(factions: &[Faction]) -> String {
    factions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Check if this error means the target could not be reached at all
    /// (privileges, dead process, closed window).
    ///
    /// Callers usually re-resolve the target or elevate before retrying.
    pub fn is_access_error(&self) -> bool {
        matches!(
            self,
            Error::ProcessOpenFailed { .. }
                | Error::NotAttached
                | Error::InvalidWindow
                | Error::Unsupported(_)
        )
    }

    /// Check if this error is a hotkey chord collision
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::HotKeyConflict(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_access_error() {
        let err = Error::ProcessOpenFailed {
            pid: 42,
            message: "access denied".to_string(),
        };
        assert!(err.is_access_error());
        assert!(Error::InvalidWindow.is_access_error());

        let err2 = Error::PartialTransfer {
            address: 0x1000,
            expected: 4,
            actual: 2,
        };
        assert!(!err2.is_access_error());
    }

    #[test]
    fn test_error_is_conflict() {
        assert!(Error::HotKeyConflict("Ctrl+F1".to_string()).is_conflict());
        assert!(!Error::HotKeyNotRegistered("Ctrl+F1".to_string()).is_conflict());
    }

    #[test]
    fn test_supply_patch_message_lists_factions() {
        let err = Error::SupplyPatchIncomplete {
            failed: vec![Faction::Zerg, Faction::Protoss],
        };
        assert_eq!(err.to_string(), "Supply patch incomplete for: Zerg, Protoss");
    }
}
