pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, OutputFormat};
pub use config::{FailurePolicy, LoaderConfig};

pub use adapters::registry::InMemoryRegistry;
pub use crate::core::{
    discovery::ModelLoader, document::YamlDocument, generator::ModelGenerator,
    translator::ModelTranslator,
};
pub use domain::model::{
    ComputeMethod, ConstraintKind, FieldDescriptor, FieldKind, Inherit, ModelAttributes,
    ModelClass, ModelKind, Record, SqlConstraint,
};
pub use domain::ports::ModelRegistry;
pub use utils::error::{Result, YamodoolError};
