pub mod loader_config;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, OutputFormat};
pub use loader_config::{FailurePolicy, LoaderConfig};
