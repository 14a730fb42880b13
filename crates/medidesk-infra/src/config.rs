//! Client configuration loader for MediDesk.
//!
//! Reads `config.toml` from the config directory (`~/.medidesk/` unless
//! `MEDIDESK_CONFIG_DIR` says otherwise) and deserializes it into
//! [`ClientConfig`]. Falls back to defaults when the file is missing or
//! malformed.

use std::path::{Path, PathBuf};

use medidesk_types::config::ClientConfig;

/// Environment variable that overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "MEDIDESK_CONFIG_DIR";

/// Name of the config file inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Resolve the config directory.
///
/// Priority:
/// 1. `MEDIDESK_CONFIG_DIR`, when set and non-empty
/// 2. `~/.medidesk`
/// 3. `./.medidesk` when no home directory can be determined
pub fn resolve_config_dir() -> PathBuf {
    config_dir_from(std::env::var_os(CONFIG_DIR_ENV).map(PathBuf::from))
}

fn config_dir_from(override_dir: Option<PathBuf>) -> PathBuf {
    match override_dir {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".medidesk"),
    }
}

/// Load client configuration from `{config_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ClientConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and
///   returns the default.
pub async fn load_client_config(config_dir: &Path) -> ClientConfig {
    let config_path = config_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => {
            tracing::debug!(base_url = %config.base_url, "Loaded {}", config_path.display());
            config
        }
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ClientConfig::default()
        }
    }
}

/// Apply a `--server` override on top of the loaded configuration.
pub fn apply_server_override(mut config: ClientConfig, server: Option<&str>) -> ClientConfig {
    if let Some(server) = server.map(str::trim).filter(|s| !s.is_empty()) {
        config.base_url = server.to_string();
    }
    config
}
