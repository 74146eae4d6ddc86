//! Generic REST resource over a [`CrudService`].
//!
//! One `CrudResource<E>` serves `/api/<collection>` for any [`Entity`]:
//!
//! | Method | Path                  | Response                                        |
//! |--------|-----------------------|-------------------------------------------------|
//! | POST   | `/api/<r>`            | 201 + `Location`, or 400 if the body has an id  |
//! | PUT    | `/api/<r>`            | 200, or the POST response if the body has no id |
//! | GET    | `/api/<r>`            | 200 + pagination headers                        |
//! | GET    | `/api/<r>/{id}`       | 200, or 404 with an empty body                  |
//! | DELETE | `/api/<r>/{id}`       | 200, whether or not the id existed              |

use axum::{
    extract::{Path, RawQuery, State},
    http::{header::LOCATION, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tracing::debug;

use tusk_core::{CrudService, Entity, Pageable};

use crate::error::AppError;
use crate::headers::AlertHeaders;
use crate::pagination::{pagination_headers, PaginationSettings};

pub struct CrudResource<E> {
    service: Arc<dyn CrudService<E>>,
    alerts: AlertHeaders,
    pagination: PaginationSettings,
    base_path: String,
}

impl<E: Entity> CrudResource<E> {
    pub fn new(service: Arc<dyn CrudService<E>>, alerts: AlertHeaders, pagination: PaginationSettings) -> Self {
        Self {
            service,
            alerts,
            pagination,
            base_path: format!("/api/{}", E::COLLECTION),
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub async fn create(&self, entity: E) -> Result<Response, AppError> {
        debug!("REST request to save {} : {:?}", E::NAME, entity);
        if entity.id().is_some() {
            let headers = self.alerts.failure(
                E::NAME,
                "idexists",
                &format!("A new {} cannot already have an ID", E::NAME),
            )?;
            return Ok((StatusCode::BAD_REQUEST, headers).into_response());
        }

        let result = self.service.save(entity).await?;
        let id = result
            .id()
            .ok_or_else(|| anyhow::anyhow!("{} was saved without an identifier", E::NAME))?
            .to_string();

        let location = HeaderValue::from_str(&format!("{}/{}", self.base_path, id))?;
        let mut headers = self.alerts.entity_creation(E::NAME, &id)?;
        headers.insert(LOCATION, location);

        Ok((StatusCode::CREATED, headers, Json(result)).into_response())
    }

    pub async fn update(&self, entity: E) -> Result<Response, AppError> {
        debug!("REST request to update {} : {:?}", E::NAME, entity);
        let Some(id) = entity.id() else {
            return self.create(entity).await;
        };

        let result = self.service.save(entity).await?;
        let headers = self.alerts.entity_update(E::NAME, &id.to_string())?;

        Ok((StatusCode::OK, headers, Json(result)).into_response())
    }

    pub async fn list(&self, pageable: Pageable) -> Result<Response, AppError> {
        debug!("REST request to get a page of {}", E::COLLECTION);
        pageable
            .validate_for::<E>()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let page = self.service.find_all(&pageable).await?;
        let headers = pagination_headers(&page, &self.base_path)?;

        Ok((StatusCode::OK, headers, Json(page.into_content())).into_response())
    }

    pub async fn get_one(&self, id: i64) -> Result<Response, AppError> {
        debug!("REST request to get {} : {}", E::NAME, id);
        match self.service.find_one(id).await? {
            Some(entity) => Ok((StatusCode::OK, Json(entity)).into_response()),
            None => Ok(StatusCode::NOT_FOUND.into_response()),
        }
    }

    pub async fn delete(&self, id: i64) -> Result<Response, AppError> {
        debug!("REST request to delete {} : {}", E::NAME, id);
        self.service.delete(id).await?;
        let headers = self.alerts.entity_deletion(E::NAME, &id.to_string())?;

        Ok((StatusCode::OK, headers).into_response())
    }
}

/// Mounts the five operations under `/api/<E::COLLECTION>`.
pub fn routes<E: Entity, S>(resource: CrudResource<E>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let collection = resource.base_path().to_string();
    let item = format!("{}/{{id}}", collection);

    Router::new()
        .route(
            &collection,
            get(list_entities::<E>).post(create_entity::<E>).put(update_entity::<E>),
        )
        .route(&item, get(get_entity::<E>).delete(delete_entity::<E>))
        .with_state(Arc::new(resource))
}

async fn create_entity<E: Entity>(
    State(resource): State<Arc<CrudResource<E>>>,
    Json(entity): Json<E>,
) -> Result<Response, AppError> {
    resource.create(entity).await
}

async fn update_entity<E: Entity>(
    State(resource): State<Arc<CrudResource<E>>>,
    Json(entity): Json<E>,
) -> Result<Response, AppError> {
    resource.update(entity).await
}

async fn list_entities<E: Entity>(
    State(resource): State<Arc<CrudResource<E>>>,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    let pageable = resource.pagination.parse(query.as_deref());
    resource.list(pageable).await
}

async fn get_entity<E: Entity>(
    State(resource): State<Arc<CrudResource<E>>>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    resource.get_one(id).await
}

async fn delete_entity<E: Entity>(
    State(resource): State<Arc<CrudResource<E>>>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    resource.delete(id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use tusk_shared::Deal;
    use tusk_store::MemoryCrudService;

    fn resource() -> (Arc<MemoryCrudService<Deal>>, CrudResource<Deal>) {
        let store = Arc::new(MemoryCrudService::<Deal>::new());
        let alerts = AlertHeaders::new("tuskApp", true).unwrap();
        let resource = CrudResource::new(store.clone(), alerts, PaginationSettings::default());
        (store, resource)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn create_assigns_id_and_location() {
        let (_, resource) = resource();

        let response = resource.create(Deal::new("Trip A")).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[LOCATION], "/api/deals/1");
        assert_eq!(response.headers()["x-tuskapp-alert"], "tuskApp.deal.created");
        assert_eq!(response.headers()["x-tuskapp-params"], "1");

        let body = body_json(response).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["name"], "Trip A");
    }

    #[tokio::test]
    async fn create_with_id_writes_nothing() {
        let (store, resource) = resource();
        let mut deal = Deal::new("Trip B");
        deal.id = Some(5);

        let response = resource.create(deal).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["x-tuskapp-error"], "error.idexists");
        assert_eq!(store.count().await, 0);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn list_rejects_unknown_sort_before_querying() {
        let (_, resource) = resource();
        let pageable = PaginationSettings::default().parse(Some("sort=secret,desc"));

        let err = resource.list(pageable).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn get_one_missing_is_empty_not_found() {
        let (_, resource) = resource();

        let response = resource.get_one(999).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }
}
