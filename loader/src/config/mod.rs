//! Loader configuration: the TOML connection file and run settings.

mod error;
mod file;
mod settings;

pub use error::ConfigurationError;
pub use file::{DatabaseConfig, LoaderConfig, SourceConfig};
pub use settings::TransferSettings;
