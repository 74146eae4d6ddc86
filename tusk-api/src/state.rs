use std::sync::Arc;
use tusk_core::CrudService;
use tusk_shared::{Deal, Passenger};

use crate::headers::AlertHeaders;
use crate::middleware::Metrics;
use crate::pagination::PaginationSettings;

#[derive(Clone)]
pub struct AuthConfig {
    pub enabled: bool,
    pub secret: String,
}

impl AuthConfig {
    pub fn disabled() -> Self {
        Self { enabled: false, secret: String::new() }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub deals: Arc<dyn CrudService<Deal>>,
    pub passengers: Arc<dyn CrudService<Passenger>>,
    pub alerts: AlertHeaders,
    pub pagination: PaginationSettings,
    pub auth: AuthConfig,
    pub metrics: Arc<Metrics>,
}
