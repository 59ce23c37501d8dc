use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::AppError;
use crate::tts::ApiKey;

/// Header callers put their provider key in.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Rejects requests without a non-empty `x-api-key` header before the body is
/// read. The key is handed to handlers as an `ApiKey` extension.
pub async fn require_api_key(mut request: Request, next: Next) -> Result<Response, AppError> {
    let key = request
        .headers()
        .get(API_KEY_HEADER)
        .filter(|value| !value.is_empty())
        .cloned()
        .ok_or(AppError::MissingApiKey)?;

    request.extensions_mut().insert(ApiKey::new(key));
    Ok(next.run(request).await)
}
