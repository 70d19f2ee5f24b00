use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

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

const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 10;

/// Top-level configuration for the funnel service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub backend: BackendConfig,
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

        let base_url =
            env::var("FUNNEL_API_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        let timeout_secs = match env::var("FUNNEL_API_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout)?,
            Err(_) => DEFAULT_BACKEND_TIMEOUT_SECS,
        };

        let backend = BackendConfig::new(base_url, Duration::from_secs(timeout_secs))?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            backend,
        })
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Location of the backend that owns persistence and the corpus calculation.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl BackendConfig {
    /// Validates the base URL and strips any trailing slash so paths can be appended.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ConfigError> {
        let raw = base_url.into();
        let trimmed = raw.trim().trim_end_matches('/').to_string();
        url::Url::parse(&trimmed).map_err(|source| ConfigError::InvalidBackendUrl {
            value: raw.clone(),
            source,
        })?;

        Ok(Self {
            base_url: trimmed,
            timeout,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidBackendUrl { value: String, source: url::ParseError },
    InvalidTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidBackendUrl { value, .. } => {
                write!(f, "FUNNEL_API_URL '{}' is not a valid URL", value)
            }
            ConfigError::InvalidTimeout => {
                write!(f, "FUNNEL_API_TIMEOUT_SECS must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidTimeout => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidBackendUrl { source, .. } => Some(source),
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
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("FUNNEL_API_URL");
        env::remove_var("FUNNEL_API_TIMEOUT_SECS");
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
        assert_eq!(config.backend.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.backend.timeout, Duration::from_secs(10));
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
    fn backend_url_loses_trailing_slash() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FUNNEL_API_URL", "https://fire.example.com/api/");
        env::set_var("FUNNEL_API_TIMEOUT_SECS", "3");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.backend.base_url, "https://fire.example.com/api");
        assert_eq!(config.backend.timeout, Duration::from_secs(3));
        reset_env();
    }

    #[test]
    fn rejects_invalid_backend_settings() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FUNNEL_API_URL", "not a url");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidBackendUrl { .. })
        ));

        reset_env();
        env::set_var("FUNNEL_API_TIMEOUT_SECS", "0");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidTimeout)));
        reset_env();
    }
}
