use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use prometheus::{Encoder, HistogramOpts, HistogramVec, Registry, TextEncoder};
use std::time::Instant;

use crate::state::AppState;

/// Request timings per route template, exported at `/management/metrics`.
pub struct Metrics {
    registry: Registry,
    http_requests: HistogramVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let http_requests = HistogramVec::new(
            HistogramOpts::new("http_server_requests_seconds", "HTTP request latency in seconds"),
            &["method", "uri", "status"],
        )?;
        registry.register(Box::new(http_requests.clone()))?;

        Ok(Self { registry, http_requests })
    }

    pub fn observe(&self, method: &str, uri: &str, status: u16, seconds: f64) {
        let status = status.to_string();
        self.http_requests
            .with_label_values(&[method, uri, status.as_str()])
            .observe(seconds);
    }

    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

pub async fn track_requests(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    // Route templates keep label cardinality bounded.
    let uri = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "UNKNOWN".to_string());

    let response = next.run(req).await;

    state.metrics.observe(
        &method,
        &uri,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}
