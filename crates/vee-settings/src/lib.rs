//! # vee-settings
//!
//! Configuration management with layered sources for the Vee chatbot.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`VeeSettings::default()`]
//! 2. **User file** — `~/.vee/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `VEE_*` overrides (highest priority)
//!
//! The global singleton is reloadable so long-lived processes can pick up
//! edits to `settings.json` without a restart.
//!
//! # Usage
//!
//! ```no_run
//! use vee_settings::get_settings;
//!
//! let settings = get_settings();
//! println!("log dir: {}", settings.log.dir.display());
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

use std::path::Path;
use std::sync::{Arc, RwLock};

/// Global settings cache.
///
/// An `RwLock<Option<Arc<VeeSettings>>>` rather than `OnceLock` so a reload
/// can swap the cached value in place. Readers clone the `Arc` and keep a
/// consistent snapshot across a concurrent reload.
static SETTINGS: RwLock<Option<Arc<VeeSettings>>> = RwLock::new(None);

fn cached() -> Option<Arc<VeeSettings>> {
    SETTINGS.read().expect("settings lock poisoned").clone()
}

fn install(settings: VeeSettings) -> Arc<VeeSettings> {
    let settings = Arc::new(settings);
    *SETTINGS.write().expect("settings lock poisoned") = Some(Arc::clone(&settings));
    settings
}

/// Get the global settings instance.
///
/// The first call loads `~/.vee/settings.json` with env overrides and
/// caches the result; later calls return the cache. A load failure falls
/// back to compiled defaults. Two threads racing the first call may both
/// load; the load is idempotent and the later install wins.
pub fn get_settings() -> Arc<VeeSettings> {
    cached().unwrap_or_else(|| {
        install(load_settings().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load settings, using defaults");
            VeeSettings::default()
        }))
    })
}

/// Seed the global settings with a known value, replacing any cache.
///
/// Useful for tests and for startup paths where the settings are already
/// in hand.
pub fn init_settings(settings: VeeSettings) {
    let _ = install(settings);
}

/// Reload settings from a specific file path.
///
/// Reads the file, deep-merges over defaults, applies env overrides, and
/// swaps the global cache.
pub fn reload_settings_from_path(path: &Path) {
    let reloaded = load_settings_from_path(path).unwrap_or_else(|e| {
        tracing::warn!(error = %e, ?path, "failed to reload settings, falling back to defaults");
        VeeSettings::default()
    });
    let _ = install(reloaded);
    tracing::info!(?path, "settings reloaded from disk");
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
