pub mod auth;
pub mod handlers;
pub mod routes;


use serde::Serialize;

/// Liveness report. Does not contact the upstream provider.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub upstream: String,
    pub model_id: String,
}
