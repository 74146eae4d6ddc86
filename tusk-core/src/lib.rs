pub mod entity;
pub mod pagination;
pub mod service;

pub use entity::Entity;
pub use pagination::{Direction, Order, Page, Pageable};
pub use service::CrudService;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
