use async_trait::async_trait;

use crate::entity::Entity;
use crate::pagination::{Page, Pageable};
use crate::CoreResult;

/// Persistence capabilities the REST resources delegate to.
///
/// Consistency, validation and transactional behaviour belong to the
/// implementation; callers only route requests through it.
#[async_trait]
pub trait CrudService<E: Entity>: Send + Sync {
    /// Inserts an entity without id (assigning one) or stores the entity under its id.
    async fn save(&self, entity: E) -> CoreResult<E>;

    async fn find_all(&self, pageable: &Pageable) -> CoreResult<Page<E>>;

    async fn find_one(&self, id: i64) -> CoreResult<Option<E>>;

    /// Removes the entity if present. Deleting an unknown id is not an error.
    async fn delete(&self, id: i64) -> CoreResult<()>;
}
