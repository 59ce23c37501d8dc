use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::Value;
use std::sync::Arc;

use super::HealthResponse;
use crate::api::routes::AppState;
use crate::error::AppError;
use crate::tts::{ApiKey, SpeechRequest};

pub async fn list_voices(
    State(state): State<Arc<AppState>>,
    Extension(api_key): Extension<ApiKey>,
) -> Result<Json<Vec<Value>>, AppError> {
    let voices = state
        .tts
        .list_voices(&api_key)
        .await
        .map_err(AppError::FetchVoices)?;

    Ok(Json(voices))
}

pub async fn generate_speech(
    State(state): State<Arc<AppState>>,
    Extension(api_key): Extension<ApiKey>,
    payload: Result<Json<SpeechRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    request.check_voice_id().map_err(AppError::BadRequest)?;

    let audio = state
        .tts
        .synthesize(&api_key, &request)
        .await
        .map_err(AppError::GenerateSpeech)?;

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response())
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        upstream: state.tts.base_url().to_string(),
        model_id: state.tts.model_id().to_string(),
    })
}
