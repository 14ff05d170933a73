use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::errors::ForecastError;
use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::{ForecastResult, ForecastStep, PricePoint, PriceSeries};
use crate::services::date_sequencer::label_dates;
use crate::services::forecast_engine;
use crate::services::normalizer::ScaleParameters;
use crate::services::regressor::{SequenceRegressor, Window};

/// Tunables of a forecast run.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSettings {
    /// Values fed to the regressor per step.
    pub window: usize,
    /// Number of future days produced.
    pub horizon: usize,
    /// Shortest history accepted.
    pub min_history: usize,
    /// Start of the primary history fetch.
    pub history_start: NaiveDate,
    /// Trailing period used when the primary fetch comes back empty.
    pub fallback_days: u32,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            window: 100,
            horizon: 30,
            min_history: 100,
            history_start: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap_or(NaiveDate::MIN),
            fallback_days: 365,
        }
    }
}

/// Turns a ticker into a dated price forecast.
///
/// Holds only shared read-only dependencies; every run builds its own series,
/// scaling and windows and drops them when it returns.
#[derive(Clone)]
pub struct ForecastService {
    provider: Arc<dyn PriceProvider>,
    regressor: Arc<dyn SequenceRegressor>,
    settings: ForecastSettings,
}

impl ForecastService {
    pub fn new(
        provider: Arc<dyn PriceProvider>,
        regressor: Arc<dyn SequenceRegressor>,
        settings: ForecastSettings,
    ) -> Self {
        Self {
            provider,
            regressor,
            settings,
        }
    }

    pub async fn run_forecast(&self, symbol: &str) -> Result<ForecastResult, ForecastError> {
        self.run_forecast_as_of(symbol, Utc::now().date_naive()).await
    }

    /// Same as [`run_forecast`](Self::run_forecast) with an explicit "today"
    /// bounding the primary history fetch.
    pub async fn run_forecast_as_of(
        &self,
        symbol: &str,
        today: NaiveDate,
    ) -> Result<ForecastResult, ForecastError> {
        let ForecastSettings {
            window,
            horizon,
            min_history,
            ..
        } = self.settings;

        info!("Generating {}-day forecast for {}", horizon, symbol);

        let series = self.fetch_series(symbol, today).await?;
        if series.len() < min_history {
            warn!(
                "Not enough history for {}: {} points, need {}",
                symbol,
                series.len(),
                min_history
            );
            return Err(ForecastError::InsufficientData {
                required: min_history,
                actual: series.len(),
            });
        }

        let closes = series.closes();
        let params = ScaleParameters::fit(&closes)?;
        let normalized: Vec<f64> = closes.iter().map(|&p| params.forward(p)).collect();

        let initial = Window::trailing(&normalized, window).ok_or(
            ForecastError::InsufficientData {
                required: window,
                actual: normalized.len(),
            },
        )?;

        let predicted = forecast_engine::forecast(initial, horizon, self.regressor.as_ref())?;

        let last_date = series
            .last_date()
            .ok_or_else(|| ForecastError::DataNotFound(symbol.to_string()))?;
        let dates = label_dates(last_date, horizon);
        if dates.len() != predicted.len() {
            // only reachable when the history ends at the calendar's upper bound
            return Err(ForecastError::DataNotFound(format!(
                "{} (no {} calendar days after {})",
                symbol, horizon, last_date
            )));
        }

        let steps: Vec<ForecastStep> = dates
            .into_iter()
            .zip(predicted)
            .map(|(date, value)| ForecastStep {
                date,
                predicted_close: round_to_cents(params.inverse(value)),
            })
            .collect();

        info!(
            "Forecast for {} ready: {} steps from {} ({} points of history)",
            symbol,
            steps.len(),
            last_date,
            series.len()
        );

        Ok(ForecastResult {
            symbol: symbol.to_string(),
            steps,
        })
    }

    /// Full history since `history_start`, falling back to the trailing period
    /// when that comes back empty.
    async fn fetch_series(
        &self,
        symbol: &str,
        today: NaiveDate,
    ) -> Result<PriceSeries, ForecastError> {
        let start = self.settings.history_start;

        let primary = match self.provider.fetch_range(symbol, start, today).await {
            Ok(points) => points,
            Err(PriceProviderError::NotFound) => Vec::new(),
            Err(e) => {
                warn!(
                    "Range fetch for {} ({} to {}) failed: {}. Trying trailing period.",
                    symbol, start, today, e
                );
                Vec::new()
            }
        };

        if !primary.is_empty() {
            info!("Fetched {} points for {} since {}", primary.len(), symbol, start);
            return Ok(PriceSeries::new(primary));
        }

        let days = self.settings.fallback_days;
        info!("No range data for {}, falling back to last {} days", symbol, days);

        let recent: Vec<PricePoint> = match self.provider.fetch_recent(symbol, days).await {
            Ok(points) => points,
            Err(PriceProviderError::NotFound) => Vec::new(),
            Err(e) => {
                warn!("Trailing fetch for {} failed: {}", symbol, e);
                return Err(ForecastError::Source(e));
            }
        };

        if recent.is_empty() {
            warn!("No price data for {} in either tier", symbol);
            return Err(ForecastError::DataNotFound(symbol.to_string()));
        }

        info!("Fetched {} fallback points for {}", recent.len(), symbol);
        Ok(PriceSeries::new(recent))
    }
}

/// Exact halves go to the even cent.
fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(187.4249), 187.42);
        assert_eq!(round_to_cents(187.4251), 187.43);
        assert_eq!(round_to_cents(-3.006), -3.01);
        assert_eq!(round_to_cents(42.0), 42.0);
    }

    #[test]
    fn test_round_to_cents_halves_go_to_even() {
        assert_eq!(round_to_cents(0.125), 0.12);
        assert_eq!(round_to_cents(0.375), 0.38);
        assert_eq!(round_to_cents(-0.125), -0.12);
    }

    #[test]
    fn test_default_settings() {
        let settings = ForecastSettings::default();
        assert_eq!(settings.window, 100);
        assert_eq!(settings.horizon, 30);
        assert_eq!(settings.min_history, 100);
        assert_eq!(settings.history_start, NaiveDate::from_ymd_opt(2010, 1, 1).unwrap());
        assert_eq!(settings.fallback_days, 365);
    }
}
