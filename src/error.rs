use thiserror::Error;
use tracing::{error, warn};

/// Process-level failures. Parse and registration failures have their own
/// types ([`crate::shortcuts::HotkeyParseError`], [`crate::hotkeys::InstallError`]).
#[derive(Error, Debug)]
pub enum StatusError {
    #[error("Failed to parse config '{path}': {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read config '{path}': {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Hotkey error: {0}")]
    Hotkey(String),

    #[error("Tray error: {0}")]
    Tray(String),

    #[error("Invalid boundary command: {0}")]
    Command(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StatusError>;

/// Extension trait for logging fire-and-forget failures with the caller's location.
///
/// ```ignore
/// use yescode_status::error::ResultExt;
///
/// tray.set_tooltip(Some(text)).warn_on_err();
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_ext_passes_ok_through() {
        let ok: std::result::Result<u8, String> = Ok(3);
        assert_eq!(ok.log_err(), Some(3));
        let err: std::result::Result<u8, String> = Err("nope".into());
        assert_eq!(err.warn_on_err(), None);
    }

    #[test]
    fn test_command_error_wraps_serde() {
        let err: StatusError = serde_json::from_str::<u8>("x").unwrap_err().into();
        assert!(err.to_string().starts_with("Invalid boundary command"));
    }
}
