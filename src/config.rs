use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.elevenlabs.io";
pub const DEFAULT_MODEL_ID: &str = "eleven_monolingual_v1";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be a number, got '{value}'")]
    NotANumber { name: &'static str, value: String },

    #[error("Invalid listen address '{0}'")]
    InvalidAddress(String),

    #[error("Invalid UPSTREAM_BASE_URL '{value}': {reason}")]
    InvalidUpstreamUrl { value: String, reason: String },
}

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub static_dir: PathBuf,
    pub upstream_url: Url,
    pub upstream_timeout: Duration,
    pub model_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source. Unset variables fall
    /// back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = parse_number(&lookup, "PORT", 8000)?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(format!("{}:{}", host, port)))?;

        let static_dir = lookup("STATIC_DIR").unwrap_or_else(|| "public".to_string());

        let raw_url = lookup("UPSTREAM_BASE_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());
        let upstream_url = parse_upstream_url(&raw_url)?;

        let timeout_secs: u64 = parse_number(&lookup, "UPSTREAM_TIMEOUT_SECS", 60)?;
        let model_id = lookup("TTS_MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string());

        Ok(Self {
            addr,
            static_dir: static_dir.into(),
            upstream_url,
            upstream_timeout: Duration::from_secs(timeout_secs),
            model_id,
        })
    }
}

fn parse_number<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::NotANumber { name, value }),
        None => Ok(default),
    }
}

/// The base URL must be able to carry path segments, since request paths are
/// appended to it segment by segment.
pub fn parse_upstream_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUpstreamUrl {
        value: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUpstreamUrl {
            value: raw.to_string(),
            reason: "URL cannot be a base".to_string(),
        });
    }

    Ok(url)
}
