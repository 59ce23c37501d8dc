use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Caller body for `POST /generate-speech`.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
    #[serde(rename = "voiceId")]
    pub voice_id: String,
    pub stability: f64,
    pub similarity_boost: f64,
    pub style: f64,
    pub speed: f64,
}

impl SpeechRequest {
    /// The voice id is sent as one URL path segment. URL parsing drops `.`
    /// and `..` segments and strips tab, CR and LF, which would address a
    /// different voice, so those are refused instead of forwarded.
    pub fn check_voice_id(&self) -> Result<(), String> {
        match self.voice_id.as_str() {
            "" => Err("voiceId cannot be empty".to_string()),
            "." | ".." => Err(format!("voiceId '{}' is not a valid voice", self.voice_id)),
            id if has_stripped_chars(id) => {
                Err("voiceId cannot contain tab or line break characters".to_string())
            }
            _ => Ok(()),
        }
    }

    pub fn settings(&self) -> VoiceSettings {
        VoiceSettings {
            stability: self.stability,
            similarity_boost: self.similarity_boost,
            style: self.style,
            speed: self.speed,
        }
    }
}

/// Characters the URL parser removes from path input instead of encoding.
pub(crate) fn has_stripped_chars(segment: &str) -> bool {
    segment.contains(['\t', '\n', '\r'])
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceSettings {
    pub stability: f64,
    pub similarity_boost: f64,
    pub style: f64,
    pub speed: f64,
}

/// Body sent to the provider's synthesis endpoint.
#[derive(Debug, Serialize)]
pub struct SynthesisPayload<'a> {
    pub text: &'a str,
    pub model_id: &'a str,
    pub voice_settings: VoiceSettings,
}

impl<'a> SynthesisPayload<'a> {
    pub fn new(request: &'a SpeechRequest, model_id: &'a str) -> Self {
        Self {
            text: &request.text,
            model_id,
            voice_settings: request.settings(),
        }
    }
}

/// The provider wraps its voice catalog in `{ "voices": [...] }`. Each voice is
/// passed through untouched.
#[derive(Debug, Deserialize)]
pub struct VoicesEnvelope {
    pub voices: Vec<Value>,
}
