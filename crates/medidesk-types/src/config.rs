//! Client configuration types for MediDesk.
//!
//! `ClientConfig` represents the `config.toml` that tells the client where the
//! clinic server lives and which paths it serves.

use serde::{Deserialize, Serialize};

/// Top-level client configuration.
///
/// Loaded from `~/.medidesk/config.toml`. All fields have defaults that match
/// a clinic server running locally on its development port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Scheme, host, and port of the clinic server, optionally with a path
    /// prefix (`http://host/hms`) that every endpoint path is resolved under.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout. Unset means requests may wait indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub endpoints: EndpointPaths,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_user_agent() -> String {
    format!("medidesk/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
            user_agent: default_user_agent(),
            endpoints: EndpointPaths::default(),
        }
    }
}

/// Paths of the server endpoints, relative to `base_url` (a leading `/`
/// does not make them absolute).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointPaths {
    pub chat: String,
    pub specialists: String,
    pub all_specialists: String,
    pub slots: String,
}

impl Default for EndpointPaths {
    fn default() -> Self {
        Self {
            chat: "/chat".to_string(),
            specialists: "/get_specialists".to_string(),
            all_specialists: "/get_all_doctors".to_string(),
            slots: "/get_slots".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default_values() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.request_timeout_secs, None);
        assert!(config.user_agent.starts_with("medidesk/"));
        assert_eq!(config.endpoints.chat, "/chat");
        assert_eq!(config.endpoints.slots, "/get_slots");
    }

    #[test]
    fn test_client_config_deserialize_with_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_client_config_deserialize_with_values() {
        let toml_str = r#"
base_url = "https://hms.example.org"
request_timeout_secs = 30

[endpoints]
chat = "/api/chat"
"#;
        let config: ClientConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.base_url, "https://hms.example.org");
        assert_eq!(config.request_timeout_secs, Some(30));
        assert_eq!(config.endpoints.chat, "/api/chat");
        // Unlisted paths keep their defaults.
        assert_eq!(config.endpoints.specialists, "/get_specialists");
    }
}
