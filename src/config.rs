//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). The service-account key itself is not
//! part of the configuration; only the name of the variable holding it is,
//! and that variable is read again on every submission.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::store::GoogleEndpoints;
use crate::store::google::{DEFAULT_DRIVE_BASE, DEFAULT_SHEETS_BASE};

/// Default spreadsheet the results are appended to.
pub const DEFAULT_SPREADSHEET_TITLE: &str = "resultados_entrenadores";

/// Default variable holding the service-account JSON.
pub const DEFAULT_CREDENTIALS_VAR: &str = "GOOGLE_SHEETS_KEY_JSON";

/// Default branding image location.
pub const DEFAULT_LOGO_PATH: &str = "assets/logo.png";

/// Default idle time after which a form session is dropped.
pub const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 3600;

/// Configuration loading failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `LISTEN_ADDR` is not a socket address.
    #[error("invalid LISTEN_ADDR '{value}': {source}")]
    ListenAddr {
        /// Raw value.
        value: String,
        /// Parse failure.
        source: std::net::AddrParseError,
    },

    /// `STORE_BACKEND` names no known backend.
    #[error("invalid STORE_BACKEND '{0}': expected 'sheets' or 'memory'")]
    StoreBackend(String),
}

/// Where submitted rows go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// Google Sheets, authenticated with the service-account key.
    #[default]
    Sheets,
    /// In-process worksheet; rows are lost on shutdown.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sheets" | "google" => Ok(Self::Sheets),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::StoreBackend(s.to_string())),
        }
    }
}

/// Top-level service configuration.
///
/// Loaded once at startup via [`SurveyConfig::from_env`].
#[derive(Debug, Clone)]
pub struct SurveyConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Title of the spreadsheet rows are appended to.
    pub spreadsheet_title: String,

    /// Environment variable holding the service-account JSON.
    pub credentials_var: String,

    /// Row destination.
    pub store_backend: StoreBackend,

    /// Branding image served at `/logo`.
    pub logo_path: PathBuf,

    /// Google API base URLs.
    pub endpoints: GoogleEndpoints,

    /// Form sessions unmodified for this long are dropped (zero = never).
    pub session_idle_ttl: Duration,
}

impl SurveyConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `LISTEN_ADDR` or `STORE_BACKEND` is set
    /// to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`SurveyConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let listen_value = lookup("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let listen_addr = listen_value
            .parse()
            .map_err(|source| ConfigError::ListenAddr {
                value: listen_value.clone(),
                source,
            })?;

        let store_backend = match non_empty(&lookup, "STORE_BACKEND") {
            Some(value) => value.parse()?,
            None => StoreBackend::default(),
        };

        Ok(Self {
            listen_addr,
            spreadsheet_title: non_empty(&lookup, "SPREADSHEET_TITLE")
                .unwrap_or_else(|| DEFAULT_SPREADSHEET_TITLE.to_string()),
            credentials_var: non_empty(&lookup, "SHEETS_CREDENTIALS_VAR")
                .unwrap_or_else(|| DEFAULT_CREDENTIALS_VAR.to_string()),
            store_backend,
            logo_path: non_empty(&lookup, "LOGO_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_LOGO_PATH), PathBuf::from),
            endpoints: GoogleEndpoints {
                sheets_base: non_empty(&lookup, "SHEETS_API_BASE")
                    .unwrap_or_else(|| DEFAULT_SHEETS_BASE.to_string()),
                drive_base: non_empty(&lookup, "DRIVE_API_BASE")
                    .unwrap_or_else(|| DEFAULT_DRIVE_BASE.to_string()),
            },
            session_idle_ttl: Duration::from_secs(parse_or(
                &lookup,
                "SESSION_IDLE_TTL_SECS",
                DEFAULT_SESSION_IDLE_TTL_SECS,
            )),
        })
    }
}

/// Looks up `key`, treating blank values as unset.
fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Parses `key` as `T`, returning `default` on missing or invalid values.
fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    non_empty(lookup, key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<SurveyConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        SurveyConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let Ok(config) = load(&[]) else {
            panic!("defaults should load");
        };
        assert_eq!(config.listen_addr.port(), 3000);
        assert_eq!(config.spreadsheet_title, DEFAULT_SPREADSHEET_TITLE);
        assert_eq!(config.credentials_var, DEFAULT_CREDENTIALS_VAR);
        assert_eq!(config.store_backend, StoreBackend::Sheets);
        assert_eq!(config.endpoints, GoogleEndpoints::default());
        assert_eq!(
            config.session_idle_ttl,
            Duration::from_secs(DEFAULT_SESSION_IDLE_TTL_SECS)
        );
    }

    #[test]
    fn idle_ttl_is_read_and_falls_back_when_invalid() {
        let Ok(config) = load(&[("SESSION_IDLE_TTL_SECS", "900")]) else {
            panic!("ttl should load");
        };
        assert_eq!(config.session_idle_ttl, Duration::from_secs(900));

        let Ok(config) = load(&[("SESSION_IDLE_TTL_SECS", "soon")]) else {
            panic!("invalid ttl should fall back");
        };
        assert_eq!(
            config.session_idle_ttl,
            Duration::from_secs(DEFAULT_SESSION_IDLE_TTL_SECS)
        );
    }

    #[test]
    fn overrides_are_read() {
        let Ok(config) = load(&[
            ("LISTEN_ADDR", "127.0.0.1:8080"),
            ("SPREADSHEET_TITLE", "results-2025"),
            ("STORE_BACKEND", "Memory"),
            ("SHEETS_API_BASE", "http://localhost:9000"),
        ]) else {
            panic!("overrides should load");
        };
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.spreadsheet_title, "results-2025");
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.endpoints.sheets_base, "http://localhost:9000");
        assert_eq!(config.endpoints.drive_base, DEFAULT_DRIVE_BASE);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let Ok(config) = load(&[("SPREADSHEET_TITLE", "  "), ("STORE_BACKEND", "")]) else {
            panic!("blank values should load");
        };
        assert_eq!(config.spreadsheet_title, DEFAULT_SPREADSHEET_TITLE);
        assert_eq!(config.store_backend, StoreBackend::Sheets);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            load(&[("LISTEN_ADDR", "nowhere")]),
            Err(ConfigError::ListenAddr { .. })
        ));
        assert!(matches!(
            load(&[("STORE_BACKEND", "postgres")]),
            Err(ConfigError::StoreBackend(_))
        ));
    }
}
