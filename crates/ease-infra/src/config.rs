//! Config loader for Ease.
//!
//! Reads `ease.toml` and deserializes it into [`EaseConfig`]. Falls back
//! to the defaults when the file is missing or malformed -- a broken
//! config file should never keep the app from starting.

use std::path::Path;

use ease_types::config::EaseConfig;

/// Load configuration from a TOML file.
///
/// - If the file does not exist, returns [`EaseConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns
///   the default.
pub async fn load_config(path: &Path) -> EaseConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config at {}, using defaults", path.display());
            return EaseConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return EaseConfig::default();
        }
    };

    match toml::from_str::<EaseConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            EaseConfig::default()
        }
    }
}
