use crate::core::document::YamlDocument;
use crate::core::translator::ModelTranslator;
use crate::domain::model::{ModelAttributes, ModelClass, ModelKind};
use crate::utils::error::{Result, YamodoolError};
use serde_yaml::Value;
use std::path::Path;

/// Generates a model class from one yamodool file.
#[derive(Debug, Clone)]
pub struct ModelGenerator {
    document: YamlDocument,
}

impl ModelGenerator {
    /// Parse errors are returned as-is, they are not wrapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(YamlDocument::load(path)?))
    }

    pub fn new(document: YamlDocument) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &YamlDocument {
        &self.document
    }

    pub fn translate(&self) -> Result<ModelAttributes> {
        ModelTranslator::new(&self.document).translate()
    }

    pub fn model_kind(&self) -> Result<ModelKind> {
        match self.document.get("type")? {
            None => Ok(ModelKind::default()),
            Some(Value::String(kind)) => ModelKind::parse(kind),
            Some(other) => Err(YamodoolError::UnsupportedModelKind {
                kind: serde_yaml::to_string(other)
                    .map(|s| s.trim_end().to_string())
                    .unwrap_or_default(),
            }),
        }
    }

    pub fn generate_model(&self, module: &str) -> Result<ModelClass> {
        let path = self.document.path();
        tracing::info!("Generating model for yamodool data: {}", path.display());

        let mut attributes = self.translate().map_err(|e| {
            tracing::error!("Cannot parse yamodool data {}: {}", path.display(), e);
            YamodoolError::Translation {
                path: path.to_path_buf(),
                source: Box::new(e),
            }
        })?;

        // 註冊時需要模組名稱
        attributes.module = Some(module.to_string());

        let model = ModelClass {
            kind: self.model_kind()?,
            attributes,
        };

        tracing::info!(
            "Created model class: name={} inherit={} kind={:?}",
            model.name().unwrap_or("-"),
            model
                .inherit()
                .map(ToString::to_string)
                .unwrap_or_else(|| "-".to_string()),
            model.kind
        );
        Ok(model)
    }
}
