//! Configuration failures.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the loader configuration.
///
/// Every variant names the file, group or key at fault so an operator can
/// correct the configuration without reading code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The configuration file could not be opened or read.
    #[error("failed to read configuration file {path}: {message}")]
    Io {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        message: String,
    },
    /// The file is not valid TOML or a value has the wrong shape.
    #[error("failed to parse configuration file {path}: {message}")]
    Parse {
        /// Path that was parsed.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },
    /// A required group is absent.
    #[error("configuration group [{section}] is missing")]
    MissingSection {
        /// Name of the group.
        section: String,
    },
    /// A required key is absent or blank.
    #[error("configuration key '{key}' is missing from [{section}]")]
    MissingKey {
        /// Group that should hold the key.
        section: String,
        /// Missing key.
        key: String,
    },
    /// A key holds a value the loader cannot use.
    #[error("configuration key '{key}' in [{section}] is invalid: {message}")]
    InvalidValue {
        /// Group holding the key.
        section: String,
        /// Offending key.
        key: String,
        /// Why the value was rejected.
        message: String,
    },
}

impl ConfigurationError {
    pub(crate) fn missing_key(section: &str, key: &str) -> Self {
        Self::MissingKey {
            section: section.to_owned(),
            key: key.to_owned(),
        }
    }

    pub(crate) fn invalid_value(section: &str, key: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            section: section.to_owned(),
            key: key.to_owned(),
            message: message.into(),
        }
    }
}
