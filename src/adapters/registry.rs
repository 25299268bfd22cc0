use crate::domain::model::ModelClass;
use crate::domain::ports::ModelRegistry;
use crate::utils::error::{Result, YamodoolError};

/// Keeps registered models in memory, in registration order.
///
/// Several classes may share a `_name`: later ones extend earlier ones, the
/// same way the ORM treats repeated model definitions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    models: Vec<ModelClass>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn models(&self) -> &[ModelClass] {
        &self.models
    }

    pub fn by_module<'a>(&'a self, module: &'a str) -> impl Iterator<Item = &'a ModelClass> + 'a {
        self.models
            .iter()
            .filter(move |model| model.module() == Some(module))
    }

    pub fn by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ModelClass> + 'a {
        self.models
            .iter()
            .filter(move |model| model.name() == Some(name))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl ModelRegistry for InMemoryRegistry {
    fn register(&mut self, model: ModelClass) -> Result<()> {
        let name = model.name().unwrap_or_default().to_string();
        if model.module().is_none() {
            return Err(YamodoolError::invalid(name, "__module__", "model has no module"));
        }

        tracing::debug!("Registered model {} in {}", name, model.module().unwrap_or_default());
        self.models.push(model);
        Ok(())
    }
}
