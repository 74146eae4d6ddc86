use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use std::marker::PhantomData;
use tracing::debug;

use tusk_core::{CoreError, CoreResult, CrudService, Direction, Entity, Order, Page, Pageable};

/// Stores entities as JSONB payloads in the table named after `E::COLLECTION`.
pub struct PgCrudService<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> PgCrudService<E> {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, _entity: PhantomData }
    }

    fn hydrate(id: i64, payload: Value) -> CoreResult<E> {
        let mut entity: E = serde_json::from_value(payload)?;
        entity.set_id(id);
        Ok(entity)
    }
}

fn storage_error(err: sqlx::Error) -> CoreError {
    CoreError::StorageError(err.to_string())
}

/// Builds the ORDER BY clause. Property names are interpolated, so only
/// whitelisted fields get through. Missing and JSON `null` values both sort
/// last when ascending, first when descending.
fn order_by_clause<E: Entity>(orders: &[Order]) -> CoreResult<String> {
    let mut terms = Vec::with_capacity(orders.len() + 1);
    let mut has_id = false;

    for order in orders {
        if !E::is_sortable(&order.property) {
            return Err(CoreError::ValidationError(format!(
                "Unknown sort property '{}' for {}",
                order.property,
                E::NAME
            )));
        }
        if order.property == "id" {
            has_id = true;
            terms.push(format!("id {}", order.direction.as_sql()));
            continue;
        }
        let nulls = match order.direction {
            Direction::Asc => "NULLS LAST",
            Direction::Desc => "NULLS FIRST",
        };
        terms.push(format!(
            "NULLIF(payload -> '{}', 'null'::jsonb) {} {}",
            order.property,
            order.direction.as_sql(),
            nulls
        ));
    }

    if !has_id {
        terms.push("id ASC".to_string());
    }
    Ok(terms.join(", "))
}

/// Moves the id sequence past an explicitly stored id. Never lowers it, so
/// ids of deleted rows are not handed out again.
fn sequence_sync_sql<E: Entity>() -> String {
    format!(
        "SELECT setval('{0}_id_seq', GREATEST((SELECT MAX(id) FROM {0}), (SELECT last_value FROM {0}_id_seq)))",
        E::COLLECTION
    )
}

#[async_trait]
impl<E: Entity> CrudService<E> for PgCrudService<E> {
    async fn save(&self, mut entity: E) -> CoreResult<E> {
        let payload = serde_json::to_value(&entity)?;

        match entity.id() {
            None => {
                let id: i64 = sqlx::query_scalar(&format!(
                    "INSERT INTO {} (payload) VALUES ($1) RETURNING id",
                    E::COLLECTION
                ))
                .bind(&payload)
                .fetch_one(&self.pool)
                .await
                .map_err(storage_error)?;

                debug!("Inserted {} {}", E::NAME, id);
                entity.set_id(id);
            }
            Some(id) => {
                let mut tx = self.pool.begin().await.map_err(storage_error)?;

                sqlx::query(&format!(
                    r#"
                    INSERT INTO {0} (id, payload) VALUES ($1, $2)
                    ON CONFLICT (id) DO UPDATE SET payload = EXCLUDED.payload, updated_at = NOW()
                    "#,
                    E::COLLECTION
                ))
                .bind(id)
                .bind(&payload)
                .execute(&mut *tx)
                .await
                .map_err(storage_error)?;

                // Explicit ids must not collide with later generated ones.
                sqlx::query(&sequence_sync_sql::<E>())
                    .execute(&mut *tx)
                    .await
                    .map_err(storage_error)?;

                tx.commit().await.map_err(storage_error)?;
                debug!("Upserted {} {}", E::NAME, id);
            }
        }

        Ok(entity)
    }

    async fn find_all(&self, pageable: &Pageable) -> CoreResult<Page<E>> {
        let order_by = order_by_clause::<E>(&pageable.sort)?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", E::COLLECTION))
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;

        let rows: Vec<(i64, Value)> = sqlx::query_as(&format!(
            "SELECT id, payload FROM {} ORDER BY {} LIMIT $1 OFFSET $2",
            E::COLLECTION,
            order_by
        ))
        .bind(pageable.size as i64)
        .bind(pageable.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        let content = rows
            .into_iter()
            .map(|(id, payload)| Self::hydrate(id, payload))
            .collect::<CoreResult<Vec<E>>>()?;

        Ok(Page::new(content, pageable, total.max(0) as u64))
    }

    async fn find_one(&self, id: i64) -> CoreResult<Option<E>> {
        let row: Option<(i64, Value)> = sqlx::query_as(&format!(
            "SELECT id, payload FROM {} WHERE id = $1",
            E::COLLECTION
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.map(|(id, payload)| Self::hydrate(id, payload)).transpose()
    }

    async fn delete(&self, id: i64) -> CoreResult<()> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", E::COLLECTION))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        debug!("Deleted {} {} ({} rows)", E::NAME, id, result.rows_affected());
        Ok(())
    }
}
