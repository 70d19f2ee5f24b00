use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Transport crates log every connection at debug; keep them quiet unless asked for.
const NOISY_TARGETS: &[&str] = &["hyper=warn", "hyper_util=warn", "reqwest=warn"];

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(f, "invalid log level/filter '{}'", value)
            }
            TelemetryError::Subscriber(err) => write!(f, "subscriber already installed: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Builds the filter directive used when `RUST_LOG` is not set.
pub fn default_directive(log_level: &str) -> String {
    let mut directive = log_level.trim().to_string();
    for target in NOISY_TARGETS {
        directive.push(',');
        directive.push_str(target);
    }
    directive
}

pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directive = default_directive(&config.log_level);
            EnvFilter::try_new(&directive).map_err(|source| TelemetryError::EnvFilter {
                value: config.log_level.clone(),
                source,
            })?
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directive_quiets_transport_crates() {
        let directive = default_directive(" debug ");
        assert!(directive.starts_with("debug,"));
        assert!(directive.contains("reqwest=warn"));
        assert!(EnvFilter::try_new(&directive).is_ok());
    }
}
