use crate::domain::model::ModelClass;
use crate::utils::error::Result;

/// Class construction on the host side: receives every generated model.
pub trait ModelRegistry {
    fn register(&mut self, model: ModelClass) -> Result<()>;
}
