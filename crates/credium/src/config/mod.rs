use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::scoring::{PolicyError, PolicyPreset, ScoringPolicy};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the web frontend.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub backend: BackendConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let mode = match env::var("BACKEND_MODE") {
            Ok(raw) => BackendMode::parse(&raw).ok_or(ConfigError::InvalidBackendMode(raw))?,
            Err(_) => BackendMode::Http,
        };
        let base_url =
            env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        let timeout_ms = parse_number("BACKEND_TIMEOUT_MS", 5_000)?;
        let cache_ttl_secs = parse_number("CATALOG_CACHE_TTL_SECS", 3_600)?;

        let preset = match env::var("SCORING_POLICY") {
            Ok(raw) => PolicyPreset::parse(&raw).ok_or(ConfigError::InvalidPolicyPreset(raw))?,
            Err(_) => PolicyPreset::Canonical,
        };
        let policy_file = env::var("SCORING_POLICY_FILE").ok().map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            backend: BackendConfig {
                mode,
                base_url,
                timeout_ms,
                cache_ttl_secs,
            },
            scoring: ScoringConfig {
                preset,
                policy_file,
            },
        })
    }
}

pub const DEFAULT_BACKEND_URL: &str = "https://api.credium.store";

fn parse_number(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { name }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    /// Talk to the remote JSON API.
    Http,
    /// Serve the built-in catalog in-process.
    Fixture,
}

impl BackendMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "http" | "remote" => Some(Self::Http),
            "fixture" | "offline" | "mock" => Some(Self::Fixture),
            _ => None,
        }
    }
}

/// Remote catalog API settings.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub mode: BackendMode,
    pub base_url: String,
    pub timeout_ms: u64,
    pub cache_ttl_secs: u64,
}

/// Which scoring policy the estimator runs with.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub preset: PolicyPreset,
    pub policy_file: Option<PathBuf>,
}

impl ScoringConfig {
    /// A policy file, when set, takes precedence over the preset.
    pub fn resolve(&self) -> Result<ScoringPolicy, ConfigError> {
        match &self.policy_file {
            Some(path) => ScoringPolicy::from_path(path).map_err(ConfigError::Policy),
            None => Ok(ScoringPolicy::preset(self.preset)),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { name: &'static str },
    InvalidBackendMode(String),
    InvalidPolicyPreset(String),
    Policy(PolicyError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { name } => {
                write!(f, "{name} must be a non-negative integer")
            }
            ConfigError::InvalidBackendMode(value) => {
                write!(f, "BACKEND_MODE '{value}' must be 'http' or 'fixture'")
            }
            ConfigError::InvalidPolicyPreset(value) => write!(
                f,
                "SCORING_POLICY '{value}' must be 'canonical', 'anonymous' or 'client'"
            ),
            ConfigError::Policy(err) => write!(f, "scoring policy rejected: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::Policy(err) => Some(err),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidBackendMode(_)
            | ConfigError::InvalidPolicyPreset(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "BACKEND_MODE",
            "BACKEND_URL",
            "BACKEND_TIMEOUT_MS",
            "CATALOG_CACHE_TTL_SECS",
            "SCORING_POLICY",
            "SCORING_POLICY_FILE",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.backend.mode, BackendMode::Http);
        assert_eq!(config.backend.base_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.backend.timeout_ms, 5_000);
        assert_eq!(config.backend.cache_ttl_secs, 3_600);
        assert_eq!(config.scoring.preset, PolicyPreset::Canonical);
        assert_eq!(
            config.scoring.resolve().expect("preset resolves"),
            ScoringPolicy::canonical()
        );
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_backend_and_policy_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("BACKEND_MODE", "fixture");
        env::set_var("CATALOG_CACHE_TTL_SECS", "60");
        env::set_var("SCORING_POLICY", "anonymous");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.backend.mode, BackendMode::Fixture);
        assert_eq!(config.backend.cache_ttl_secs, 60);
        assert_eq!(config.scoring.preset, PolicyPreset::Anonymous);
        reset_env();
    }

    #[test]
    fn rejects_unknown_policy_preset() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCORING_POLICY", "generous");

        match AppConfig::load() {
            Err(ConfigError::InvalidPolicyPreset(value)) => assert_eq!(value, "generous"),
            other => panic!("expected invalid preset, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("BACKEND_TIMEOUT_MS", "soon");

        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidNumber {
                name: "BACKEND_TIMEOUT_MS"
            })
        ));
        reset_env();
    }
}
