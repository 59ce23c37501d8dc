pub mod error;
pub mod voice;

use std::fmt;
use std::time::Duration;

use axum::http::HeaderValue;
use bytes::Bytes;
use serde_json::Value;
use url::Url;

use crate::config::Config;

pub use error::UpstreamError;
pub use voice::{SpeechRequest, SynthesisPayload, VoicesEnvelope};

/// Header the provider reads its API key from.
pub const PROVIDER_KEY_HEADER: &str = "xi-api-key";

/// A caller-supplied provider key, forwarded byte-for-byte.
#[derive(Clone)]
pub struct ApiKey(HeaderValue);

impl ApiKey {
    pub fn new(value: HeaderValue) -> Self {
        Self(value)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Converts into reqwest's `http` 0.2 header type. See
    /// [`UpstreamError::InvalidApiKey`].
    fn to_header(&self) -> Result<reqwest::header::HeaderValue, UpstreamError> {
        let mut value = reqwest::header::HeaderValue::from_bytes(self.as_bytes())
            .map_err(|_| UpstreamError::InvalidApiKey)?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Thin client for the hosted text-to-speech API.
pub struct TtsClient {
    http: reqwest::Client,
    base_url: Url,
    model_id: String,
}

impl TtsClient {
    pub fn new(
        base_url: Url,
        model_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(UpstreamError::Client)?;

        Ok(Self {
            http,
            base_url,
            model_id: model_id.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        Self::new(
            config.upstream_url.clone(),
            config.model_id.clone(),
            config.upstream_timeout,
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Appends `segments` to the base URL, percent-encoding each one so that
    /// reserved characters stay inside their segment. Segments the parser
    /// would silently rewrite are refused.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        if let Some(bad) = segments
            .iter()
            .find(|s| matches!(**s, "." | "..") || voice::has_stripped_chars(s))
        {
            return Err(UpstreamError::InvalidPathSegment(bad.to_string()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn list_voices(&self, api_key: &ApiKey) -> Result<Vec<Value>, UpstreamError> {
        let url = self.endpoint(&["v1", "voices"])?;
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(url.clone())
            .header(PROVIDER_KEY_HEADER, api_key.to_header()?)
            .send()
            .await
            .map_err(|source| UpstreamError::transport(&url, source))?;

        let body = read_success_body(&url, response).await?;
        let envelope: VoicesEnvelope = serde_json::from_slice(&body)
            .map_err(|source| UpstreamError::Decode {
                url: url.to_string(),
                source,
            })?;

        tracing::debug!("Fetched {} voices", envelope.voices.len());
        Ok(envelope.voices)
    }

    pub async fn synthesize(
        &self,
        api_key: &ApiKey,
        request: &SpeechRequest,
    ) -> Result<Bytes, UpstreamError> {
        let url = self.endpoint(&["v1", "text-to-speech", request.voice_id.as_str()])?;
        tracing::debug!("POST {} ({} chars)", url, request.text.chars().count());

        let payload = SynthesisPayload::new(request, &self.model_id);
        let response = self
            .http
            .post(url.clone())
            .header(PROVIDER_KEY_HEADER, api_key.to_header()?)
            .json(&payload)
            .send()
            .await
            .map_err(|source| UpstreamError::transport(&url, source))?;

        let audio = read_success_body(&url, response).await?;
        tracing::debug!("Received {} bytes of audio", audio.len());
        Ok(audio)
    }
}

async fn read_success_body(url: &Url, response: reqwest::Response) -> Result<Bytes, UpstreamError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|source| UpstreamError::transport(url, source))?;

    if !status.is_success() {
        return Err(UpstreamError::status(url, status, &body));
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> TtsClient {
        TtsClient::new(
            Url::parse(base).unwrap(),
            "test-model",
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_plain() {
        let url = client("https://api.example.com")
            .endpoint(&["v1", "voices"])
            .unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/voices");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let url = client("http://localhost:8080/proxy/")
            .endpoint(&["v1", "voices"])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/v1/voices");
    }

    #[test]
    fn test_endpoint_encodes_reserved_characters() {
        let url = client("https://api.example.com")
            .endpoint(&["v1", "text-to-speech", "a/b c?#é%"])
            .unwrap();
        assert_eq!(url.path(), "/v1/text-to-speech/a%2Fb%20c%3F%23%C3%A9%25");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);

        let url = client("https://api.example.com")
            .endpoint(&["v1", "text-to-speech", "\u{1}x\u{7f}"])
            .unwrap();
        assert_eq!(url.path(), "/v1/text-to-speech/%01x%7F");
    }

    #[test]
    fn test_endpoint_refuses_rewritten_segments() {
        let client = client("https://api.example.com");
        for bad in ["a\tb", "a\tb\n", "a\rb", ".", ".."] {
            let err = client.endpoint(&["v1", "text-to-speech", bad]).unwrap_err();
            assert!(
                matches!(&err, UpstreamError::InvalidPathSegment(s) if s == bad),
                "{:?}",
                bad
            );
        }
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::new(HeaderValue::from_static("secret"));
        assert_eq!(format!("{:?}", key), "ApiKey(***)");
        assert_eq!(key.as_bytes(), b"secret");
    }

    #[test]
    fn test_api_key_header_is_sensitive() {
        let key = ApiKey::new(HeaderValue::from_static("secret"));
        let header = key.to_header().unwrap();
        assert!(header.is_sensitive());
        assert_eq!(header.as_bytes(), b"secret");
    }
}
