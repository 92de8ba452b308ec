//! Settings loading: defaults ← user file (deep merge) ← env overrides.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::errors::Result;
use crate::types::VeeSettings;

/// Default settings file location: `~/.vee/settings.json`.
pub fn settings_path() -> PathBuf {
    let home = std::env::var_os("HOME").map_or_else(|| PathBuf::from("."), PathBuf::from);
    home.join(".vee").join("settings.json")
}

/// Load settings from the default path with env overrides applied.
///
/// A missing file is not an error — defaults are used.
pub fn load_settings() -> Result<VeeSettings> {
    let path = settings_path();
    if path.exists() {
        load_settings_from_path(&path)
    } else {
        let mut settings = VeeSettings::default();
        apply_env_overrides(&mut settings);
        settings.validate();
        Ok(settings)
    }
}

/// Load settings from a specific file, deep-merged over defaults, with env
/// overrides applied last.
pub fn load_settings_from_path(path: &Path) -> Result<VeeSettings> {
    let raw = std::fs::read_to_string(path)?;
    let file_value: Value = serde_json::from_str(&raw)?;

    let mut merged = serde_json::to_value(VeeSettings::default())?;
    deep_merge(&mut merged, file_value);

    let mut settings: VeeSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    settings.validate();
    Ok(settings)
}

/// Recursively merge `overlay` into `base`.
///
/// Objects merge key-by-key; any other value (including arrays and `null`)
/// replaces the base value wholesale.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => {
                        let _ = base_map.insert(key, overlay_value);
                    }
                }
            }
        }
        (base_slot, overlay_value) => *base_slot = overlay_value,
    }
}

/// Apply `VEE_*` environment variable overrides (highest priority layer).
fn apply_env_overrides(settings: &mut VeeSettings) {
    if let Ok(dir) = std::env::var("VEE_LOG_DIR") {
        settings.log.dir = PathBuf::from(dir);
    }
    if let Ok(key) = std::env::var("VEE_LLM_API_KEY") {
        settings.llm.api_key = Some(key);
    } else if settings.llm.api_key.is_none()
        && let Ok(key) = std::env::var("OPENAI_API_KEY")
    {
        settings.llm.api_key = Some(key);
    }
    if let Ok(url) = std::env::var("VEE_LLM_BASE_URL") {
        settings.llm.base_url = url;
    }
    if let Ok(model) = std::env::var("VEE_LLM_MODEL") {
        settings.llm.model = model;
    }
    if let Ok(model) = std::env::var("VEE_VISION_MODEL") {
        settings.llm.vision_model = model;
    }
    if let Ok(url) = std::env::var("VEE_RETRIEVAL_URL") {
        settings.retrieval.base_url = url;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deep_merge_nested_objects() {
        let mut base = json!({"a": {"x": 1, "y": 2}, "b": 3});
        deep_merge(&mut base, json!({"a": {"y": 9}}));
        assert_eq!(base, json!({"a": {"x": 1, "y": 9}, "b": 3}));
    }

    #[test]
    fn deep_merge_replaces_scalars_and_arrays() {
        let mut base = json!({"a": [1, 2], "b": "old"});
        deep_merge(&mut base, json!({"a": [3], "b": "new"}));
        assert_eq!(base, json!({"a": [3], "b": "new"}));
    }

    #[test]
    fn deep_merge_adds_unknown_keys() {
        let mut base = json!({"a": 1});
        deep_merge(&mut base, json!({"z": true}));
        assert_eq!(base, json!({"a": 1, "z": true}));
    }

    #[test]
    fn load_from_path_merges_over_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            r#"{"memory":{"maxAgeHours":12},"llm":{"model":"custom-model"}}"#,
        )
        .unwrap();

        let settings = load_settings_from_path(tmp.path()).unwrap();
        assert_eq!(settings.memory.max_age_hours, 12);
        assert_eq!(settings.llm.model, "custom-model");
        // Untouched sections keep their defaults
        assert_eq!(settings.retrieval.max_documents, 6);
    }

    #[test]
    fn load_from_path_invalid_json_errors() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "{not json").unwrap();
        assert!(load_settings_from_path(tmp.path()).is_err());
    }

    #[test]
    fn load_from_path_validates() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), r#"{"llm":{"temperature":5.0}}"#).unwrap();
        let settings = load_settings_from_path(tmp.path()).unwrap();
        assert_eq!(settings.llm.temperature, 2.0);
    }
}
