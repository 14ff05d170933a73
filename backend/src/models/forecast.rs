use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One labelled step of a price forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastStep {
    pub date: NaiveDate,
    pub predicted_close: f64,
}

/// Forecast for a single ticker, one step per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub symbol: String,
    pub steps: Vec<ForecastStep>,
}

impl ForecastResult {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Response body of the prediction endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub company: String,
    pub predictions: Vec<ForecastStep>,
}

impl From<ForecastResult> for PredictionResponse {
    fn from(result: ForecastResult) -> Self {
        Self {
            company: result.symbol,
            predictions: result.steps,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictQuery {
    pub company: String,
}
