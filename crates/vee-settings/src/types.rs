//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]`. Each type implements
//! [`Default`] with production default values, and `#[serde(default)]`
//! allows partial JSON — missing fields get their default during
//! deserialization.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root settings type for the Vee chatbot backend.
///
/// Loaded from `~/.vee/settings.json` with defaults applied for missing
/// fields. `VEE_*` environment variables override specific values.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VeeSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// In-memory turn store settings.
    pub memory: MemorySettings,
    /// Conversation log settings.
    pub log: LogSettings,
    /// Completion service settings.
    pub llm: LlmSettings,
    /// Vector retrieval settings.
    pub retrieval: RetrievalSettings,
    /// Speech service settings.
    pub voice: VoiceSettings,
}

impl Default for VeeSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: "vee".to_string(),
            memory: MemorySettings::default(),
            log: LogSettings::default(),
            llm: LlmSettings::default(),
            retrieval: RetrievalSettings::default(),
            voice: VoiceSettings::default(),
        }
    }
}

impl VeeSettings {
    /// Correct invalid values in place rather than rejecting the file.
    ///
    /// Called automatically during loading. Out-of-range values are clamped
    /// with a warning so users get corrected behavior instead of a
    /// confusing startup error.
    pub fn validate(&mut self) {
        if self.memory.max_age_hours == 0 {
            tracing::warn!("memory.maxAgeHours must be at least 1, correcting");
            self.memory.max_age_hours = 1;
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            let clamped = self.llm.temperature.clamp(0.0, 2.0);
            tracing::warn!(
                "llm.temperature out of range ({}), clamped to {clamped}",
                self.llm.temperature
            );
            self.llm.temperature = clamped;
        }
        if self.llm.timeout_seconds == 0 {
            tracing::warn!("llm.timeoutSeconds must be at least 1, correcting");
            self.llm.timeout_seconds = 1;
        }
    }
}

/// In-memory turn store settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemorySettings {
    /// Hours of inactivity before a conversation is evicted.
    pub max_age_hours: u64,
    /// Maximum merged turns fed into a prompt.
    pub max_history_turns: usize,
    /// Day window for history reconstruction (-1 = unbounded lookback).
    pub history_days: i64,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            max_age_hours: 24,
            max_history_turns: 20,
            history_days: 7,
        }
    }
}

/// Conversation log settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogSettings {
    /// Directory holding the per-day `conversations_*.jsonl` files.
    pub dir: PathBuf,
    /// Optional best-effort mirror of every entry to an object-store layout.
    pub mirror: MirrorSettings,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            mirror: MirrorSettings::default(),
        }
    }
}

/// Best-effort log mirror settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MirrorSettings {
    /// Whether mirroring is enabled.
    pub enabled: bool,
    /// Root directory (or mount) receiving mirrored objects.
    pub root: PathBuf,
    /// Key prefix under the root.
    pub prefix: String,
}

impl Default for MirrorSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            root: PathBuf::from("log-mirror"),
            prefix: "vee".to_string(),
        }
    }
}

/// Completion service settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LlmSettings {
    /// Chat model identifier.
    pub model: String,
    /// Vision model identifier (must support image inputs).
    pub vision_model: String,
    /// OpenAI-compatible API base URL.
    pub base_url: String,
    /// API key; usually supplied via `VEE_LLM_API_KEY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Sampling temperature.
    pub temperature: f64,
    /// Per-call timeout budget in seconds.
    pub timeout_seconds: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            vision_model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            temperature: 0.2,
            timeout_seconds: 60,
        }
    }
}

/// Vector retrieval settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetrievalSettings {
    /// Base URL of the vector sidecar service.
    pub base_url: String,
    /// Collection identifier.
    pub collection: String,
    /// Documents retrieved per question.
    pub max_documents: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8800".to_string(),
            collection: "food_recipes_chatbot".to_string(),
            max_documents: 6,
        }
    }
}

/// Speech service settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VoiceSettings {
    /// Transcription model.
    pub stt_model: String,
    /// Synthesis model.
    pub tts_model: String,
    /// Synthesis voice.
    pub tts_voice: String,
    /// Maximum accepted audio upload size in megabytes.
    pub max_audio_mb: usize,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stt_model: "whisper-1".to_string(),
            tts_model: "tts-1".to_string(),
            tts_voice: "alloy".to_string(),
            max_audio_mb: 25,
        }
    }
}
