use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::tts::UpstreamError;

/// Response header carrying the id logged alongside a server-side failure.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("API key is required")]
    MissingApiKey,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Failed to fetch voices: {0}")]
    FetchVoices(#[source] UpstreamError),

    #[error("Failed to generate speech: {0}")]
    GenerateSpeech(#[source] UpstreamError),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingApiKey => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::FetchVoices(_) | AppError::GenerateSpeech(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The message shown to the caller. Upstream detail never appears here.
    pub fn public_message(&self) -> String {
        match self {
            AppError::MissingApiKey => "API key is required".to_string(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::FetchVoices(_) => "Failed to fetch voices".to_string(),
            AppError::GenerateSpeech(_) => "Failed to generate speech".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            error: self.public_message(),
        });

        if !status.is_server_error() {
            tracing::warn!("Request rejected: {} - {}", status.as_u16(), self);
            return (status, body).into_response();
        }

        let request_id = Uuid::new_v4();
        tracing::error!(request_id = %request_id, "Request failed: {}", self);

        let mut response = (status, body).into_response();
        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_key_response() {
        let response = AppError::MissingApiKey.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(REQUEST_ID_HEADER).is_none());
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "API key is required"})
        );
    }

    #[tokio::test]
    async fn test_upstream_detail_not_leaked() {
        let err = AppError::FetchVoices(UpstreamError::InvalidUrl("secret-host".into()));
        assert!(err.to_string().contains("secret-host"));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let request_id = response.headers().get(REQUEST_ID_HEADER).unwrap();
        assert!(Uuid::parse_str(request_id.to_str().unwrap()).is_ok());
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Failed to fetch voices"})
        );
    }

    #[tokio::test]
    async fn test_bad_request_keeps_reason() {
        let response = AppError::BadRequest("voiceId cannot be empty".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "voiceId cannot be empty"})
        );
    }
}
