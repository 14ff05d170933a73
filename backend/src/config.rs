use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

use crate::services::advice_service::AdviceConfig;
use crate::services::forecasting_service::ForecastSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub model_path: PathBuf,
    pub symbols_path: Option<PathBuf>,
    pub forecast: ForecastSettings,
    pub serialize_inference: bool,
    pub advice: Option<AdviceConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ForecastSettings::default();

        let forecast = ForecastSettings {
            window: parse_or(&lookup, "FORECAST_WINDOW", defaults.window)?,
            horizon: parse_or(&lookup, "FORECAST_HORIZON", defaults.horizon)?,
            min_history: parse_or(&lookup, "MIN_HISTORY", defaults.min_history)?,
            history_start: parse_or::<NaiveDate, _>(&lookup, "HISTORY_START", defaults.history_start)?,
            fallback_days: parse_or(&lookup, "FALLBACK_DAYS", defaults.fallback_days)?,
        };

        if forecast.window == 0 {
            return Err(invalid("FORECAST_WINDOW", "0", "must be positive"));
        }
        if forecast.horizon == 0 {
            return Err(invalid("FORECAST_HORIZON", "0", "must be positive"));
        }
        if forecast.min_history < forecast.window {
            return Err(invalid(
                "MIN_HISTORY",
                &forecast.min_history.to_string(),
                "must be at least FORECAST_WINDOW",
            ));
        }

        let advice = lookup("OPENROUTER_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .map(|key| {
                AdviceConfig::new(
                    key,
                    lookup("ADVICE_MODEL").unwrap_or_else(|| "openai/gpt-3.5-turbo".to_string()),
                )
            });

        Ok(Self {
            bind_addr: parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 8000)))?,
            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("stock_prediction_model.json")),
            symbols_path: lookup("SYMBOLS_PATH").map(PathBuf::from),
            forecast,
            serialize_inference: parse_or(&lookup, "SERIALIZE_INFERENCE", false)?,
            advice,
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(key, &raw, &e.to_string())),
    }
}

fn invalid(key: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
