/*
 * Error Module
 *
 * The simulation itself never fails at runtime; errors only surface while a
 * flock configuration is being loaded or checked.
 */

use thiserror::Error;

/// Error type for flock configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error while reading a config file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// A parameter is outside its allowed range.
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
