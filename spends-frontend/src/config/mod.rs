use secrecy::Secret;
use serde::Deserialize;
use spends_core::config::{configuration_directory, load_settings};
use spends_core::error::AppError;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub api: ApiSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
    #[serde(default)]
    pub dictionaries: DictionarySettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Remote workflow backend.
#[derive(Deserialize, Clone)]
pub struct ApiSettings {
    /// Origin of the backend; `/api/v1` is appended by the client.
    pub base_url: String,
    /// Bearer token sent with every backend call when set.
    #[serde(default)]
    pub auth_token: Option<Secret<String>>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    30
}

#[derive(Deserialize, Clone, Default)]
pub struct DashboardSettings {
    /// Show placeholder registrar counters when there is no live data.
    #[serde(default)]
    pub registrar_demo_fallback: bool,
}

#[derive(Deserialize, Clone)]
pub struct DictionarySettings {
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,
}

impl Default for DictionarySettings {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: default_cache_ttl_seconds(),
        }
    }
}

fn default_cache_ttl_seconds() -> u64 {
    300
}

#[derive(Deserialize, Clone)]
pub struct TelemetrySettings {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_service_name() -> String {
    "spends-frontend".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration() -> Result<Settings, AppError> {
    let directory = configuration_directory("spends-frontend")?;
    load_settings(&directory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_settings_defaults() {
        let settings: Settings = serde_json::from_value(serde_json::json!({
            "server": {"host": "127.0.0.1", "port": 0},
            "api": {"base_url": "http://backend", "auth_token": "t0ken"}
        }))
        .unwrap();

        assert_eq!(settings.api.timeout_seconds, 30);
        assert_eq!(
            settings.api.auth_token.as_ref().map(|t| t.expose_secret().as_str()),
            Some("t0ken")
        );
        assert!(!settings.dashboard.registrar_demo_fallback);
        assert_eq!(settings.dictionaries.cache_ttl_seconds, 300);
        assert_eq!(settings.telemetry.service_name, "spends-frontend");
    }
}
