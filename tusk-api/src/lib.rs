use axum::{
    http::{header, HeaderName, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tusk_shared::{Deal, Passenger};

pub mod error;
pub mod headers;
pub mod management;
pub mod middleware;
pub mod pagination;
pub mod resource;
pub mod state;

pub use resource::CrudResource;
pub use state::{AppState, AuthConfig};

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(resource::routes(CrudResource::<Deal>::new(
            state.deals.clone(),
            state.alerts.clone(),
            state.pagination,
        )))
        .merge(resource::routes(CrudResource::<Passenger>::new(
            state.passengers.clone(),
            state.alerts.clone(),
            state.pagination,
        )))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::user_auth_middleware,
        ));

    Router::new()
        .merge(api)
        .merge(management::routes(state.clone()))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::track_requests,
        ))
        .layer(cors(&state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors(state: &AppState) -> CorsLayer {
    let mut exposed: Vec<HeaderName> = vec![
        header::LINK,
        header::LOCATION,
        HeaderName::from_static(pagination::TOTAL_COUNT),
    ];
    exposed.extend(state.alerts.header_names());

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::USER_AGENT])
        .expose_headers(exposed)
}
