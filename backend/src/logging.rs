//! Tracing subscriber setup: console output always, Loki shipping when enabled.

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("LOKI_ENABLED is true but LOKI_URL is not set")]
    MissingLokiUrl,
    #[error("invalid LOKI_URL: {0}")]
    InvalidLokiUrl(#[from] url::ParseError),
    #[cfg(feature = "loki")]
    #[error("failed to build Loki layer: {0}")]
    Loki(#[from] tracing_loki::Error),
    #[error("a global subscriber is already installed: {0}")]
    AlreadyInstalled(#[from] tracing_subscriber::util::TryInitError),
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub loki_enabled: bool,
    pub loki_url: Option<String>,
    /// `service` label attached to every Loki stream.
    pub service_name: String,
    pub environment: String,
    /// `EnvFilter` directive, e.g. `info` or `stock_forecast=debug`.
    pub log_level: String,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            loki_enabled: env_or("LOKI_ENABLED", "false").parse().unwrap_or(false),
            loki_url: std::env::var("LOKI_URL").ok().filter(|u| !u.trim().is_empty()),
            service_name: env_or("SERVICE_NAME", "stock-forecast"),
            environment: env_or("ENVIRONMENT", "development"),
            log_level: env_or("RUST_LOG", "info"),
        }
    }

    /// The Loki endpoint to ship to, if shipping is switched on.
    fn loki_target(&self) -> Result<Option<url::Url>, LoggingError> {
        if !self.loki_enabled {
            return Ok(None);
        }
        let raw = self.loki_url.as_deref().ok_or(LoggingError::MissingLokiUrl)?;
        Ok(Some(url::Url::parse(raw)?))
    }
}

/// Installs the global subscriber. Call once, from inside the tokio runtime
/// when Loki is enabled (its shipper runs as a spawned task).
pub fn init_logging(config: LoggingConfig) -> Result<(), LoggingError> {
    let target = config.loki_target()?;
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::new(&config.log_level))
        .with(fmt::layer());

    #[cfg(feature = "loki")]
    {
        if let Some(url) = target {
            let (loki, shipper) = tracing_loki::builder()
                .label("service", &config.service_name)?
                .label("environment", &config.environment)?
                .build_url(url.clone())?;
            tokio::spawn(shipper);
            registry.with(loki).try_init()?;

            tracing::info!(level = %config.log_level, loki = %url, "📊 Logging to console and Loki");
            return Ok(());
        }
    }

    registry.try_init()?;
    tracing::info!(level = %config.log_level, "📊 Logging to console");

    #[cfg(not(feature = "loki"))]
    {
        if target.is_some() {
            tracing::warn!("LOKI_ENABLED is set but this build has no `loki` feature");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(loki_enabled: bool, loki_url: Option<&str>) -> LoggingConfig {
        LoggingConfig {
            loki_enabled,
            loki_url: loki_url.map(str::to_string),
            service_name: "stock-forecast".to_string(),
            environment: "test".to_string(),
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_loki_target() {
        assert!(config(false, None).loki_target().unwrap().is_none());
        assert!(matches!(
            config(true, None).loki_target(),
            Err(LoggingError::MissingLokiUrl)
        ));
        assert!(matches!(
            config(true, Some("not a url")).loki_target(),
            Err(LoggingError::InvalidLokiUrl(_))
        ));

        let url = config(true, Some("http://localhost:3100")).loki_target().unwrap();
        assert_eq!(url.unwrap().host_str(), Some("localhost"));
    }
}
