use reqwest::StatusCode;
use url::Url;

/// Longest slice of an upstream error body kept for the logs.
const BODY_EXCERPT_CHARS: usize = 512;

#[derive(thiserror::Error, Debug)]
pub enum UpstreamError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot append path segments to '{0}'")]
    InvalidUrl(String),

    #[error("path segment {0:?} would be altered by URL parsing")]
    InvalidPathSegment(String),

    /// reqwest 0.11 is built on `http` 0.2 while axum uses `http` 1.x, so the
    /// caller's header is re-validated when it crosses over. Both versions
    /// accept the same bytes, so this only fires if that ever changes.
    #[error("API key is not a valid header value")]
    InvalidApiKey,

    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl UpstreamError {
    pub(crate) fn transport(url: &Url, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.to_string(),
            source,
        }
    }

    pub(crate) fn status(url: &Url, status: StatusCode, body: &[u8]) -> Self {
        Self::Status {
            url: url.to_string(),
            status,
            body: excerpt(body),
        }
    }
}

fn excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let mut chars = text.chars();
    let mut out: String = chars.by_ref().take(BODY_EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_short_body() {
        assert_eq!(excerpt(b"{\"detail\":\"quota\"}"), "{\"detail\":\"quota\"}");
    }

    #[test]
    fn test_excerpt_truncates_long_body() {
        let body = "x".repeat(BODY_EXCERPT_CHARS + 10);
        let out = excerpt(body.as_bytes());
        assert_eq!(out.len(), BODY_EXCERPT_CHARS + 3);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_status_display() {
        let url = Url::parse("https://api.example.com/v1/voices").unwrap();
        let err = UpstreamError::status(&url, StatusCode::UNAUTHORIZED, b"invalid key");
        assert_eq!(
            err.to_string(),
            "https://api.example.com/v1/voices returned 401 Unauthorized: invalid key"
        );
    }
}
