//! Error types for the settings layer.
//!
//! The game core itself has no recoverable failures: every input it sees is
//! generated internally.  Only loading the tunable settings table can fail.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The settings file exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for [`crate::config::Settings`].
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value parsed fine but would break a game rule (division by zero,
    /// empty random range, entity larger than the play field, ...).
    #[error("invalid setting '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Convenience alias used by the settings loader.
pub type ConfigResult<T> = Result<T, ConfigError>;
