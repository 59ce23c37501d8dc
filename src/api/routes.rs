use axum::{
    http::{header, HeaderName, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use super::{auth, handlers};
use crate::tts::TtsClient;

pub struct AppState {
    pub tts: TtsClient,
}

pub fn create_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(auth::API_KEY_HEADER),
        ]);

    let relay_routes = Router::new()
        .route("/voices", get(handlers::list_voices))
        .route("/generate-speech", post(handlers::generate_speech))
        .route_layer(middleware::from_fn(auth::require_api_key));

    Router::new()
        .merge(relay_routes)
        .route("/health", get(handlers::health))
        .fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
