use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};
use tokio::sync::RwLock;
use tracing::debug;

use tusk_core::{CoreError, CoreResult, CrudService, Direction, Entity, Order, Page, Pageable};

/// Process-local store used when no database is configured, and by tests.
pub struct MemoryCrudService<E> {
    entities: RwLock<BTreeMap<i64, E>>,
    next_id: AtomicI64,
}

impl<E: Entity> MemoryCrudService<E> {
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub async fn count(&self) -> usize {
        self.entities.read().await.len()
    }
}

impl<E: Entity> Default for MemoryCrudService<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> CrudService<E> for MemoryCrudService<E> {
    async fn save(&self, mut entity: E) -> CoreResult<E> {
        let mut entities = self.entities.write().await;

        let id = match entity.id() {
            Some(id) => {
                // Keep generated ids clear of explicitly stored ones.
                self.next_id.fetch_max(id.saturating_add(1), AtomicOrdering::SeqCst);
                id
            }
            None => {
                // Only a saturated sequence can point at a stored id.
                let id = self.next_id.load(AtomicOrdering::SeqCst);
                if entities.contains_key(&id) {
                    return Err(CoreError::StorageError(format!(
                        "{} id sequence is exhausted",
                        E::NAME
                    )));
                }
                self.next_id.store(id.saturating_add(1), AtomicOrdering::SeqCst);
                entity.set_id(id);
                id
            }
        };

        debug!("Storing {} {} in memory", E::NAME, id);
        entities.insert(id, entity.clone());
        Ok(entity)
    }

    async fn find_all(&self, pageable: &Pageable) -> CoreResult<Page<E>> {
        let entities = self.entities.read().await;
        let total = entities.len() as u64;

        let mut rows: Vec<&E> = entities.values().collect();
        if !pageable.sort.is_empty() {
            let mut keyed = rows
                .into_iter()
                .map(|entity| serde_json::to_value(entity).map(|value| (value, entity)))
                .collect::<Result<Vec<_>, _>>()?;
            // Stable sort: ties keep id order.
            keyed.sort_by(|(a, _), (b, _)| compare_by_orders(a, b, &pageable.sort));
            rows = keyed.into_iter().map(|(_, entity)| entity).collect();
        }

        let content = rows
            .into_iter()
            .skip(pageable.offset() as usize)
            .take(pageable.size as usize)
            .cloned()
            .collect();

        Ok(Page::new(content, pageable, total))
    }

    async fn find_one(&self, id: i64) -> CoreResult<Option<E>> {
        Ok(self.entities.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> CoreResult<()> {
        if self.entities.write().await.remove(&id).is_none() {
            debug!("{} {} was not stored, nothing to delete", E::NAME, id);
        }
        Ok(())
    }
}

fn compare_by_orders(a: &Value, b: &Value, orders: &[Order]) -> Ordering {
    for order in orders {
        let ordering = compare_json(&a[&order.property], &b[&order.property]);
        let ordering = match order.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Orders JSON values the way Postgres orders nullable columns: nulls last
/// when ascending.
fn compare_json(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .zip(y.as_f64())
            .and_then(|(x, y)| x.partial_cmp(&y))
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Array(_) => 3,
        Value::Object(_) => 4,
        Value::Null => 5,
    }
}
