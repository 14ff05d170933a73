use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::external::price_provider::PriceProviderError;

/// Failures of a single forecast request. All of them are terminal for the request.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Company not found: {0}")]
    SymbolNotFound(String),
    #[error("Stock data not found for {0}")]
    DataNotFound(String),
    #[error("Not enough data to predict (need {required}+ records, got {actual})")]
    InsufficientData { required: usize, actual: usize },
    #[error("Numeric degeneracy: {0}")]
    NumericDegeneracy(String),
    #[error("Model inference failed: {0}")]
    ModelInference(String),
    #[error("Price source error: {0}")]
    Source(#[from] PriceProviderError),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Forecast(#[from] ForecastError),
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Forecast(err) => match err {
                ForecastError::SymbolNotFound(_) | ForecastError::DataNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                ForecastError::InsufficientData { .. } => StatusCode::BAD_REQUEST,
                ForecastError::NumericDegeneracy(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ForecastError::ModelInference(_) => StatusCode::INTERNAL_SERVER_ERROR,
                ForecastError::Source(PriceProviderError::RateLimited) => {
                    StatusCode::TOO_MANY_REQUESTS
                }
                ForecastError::Source(_) => StatusCode::BAD_GATEWAY,
            },
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_errors_map_to_statuses() {
        let cases = [
            (ForecastError::SymbolNotFound("acme".into()), StatusCode::NOT_FOUND),
            (ForecastError::DataNotFound("ACME".into()), StatusCode::NOT_FOUND),
            (
                ForecastError::InsufficientData { required: 100, actual: 99 },
                StatusCode::BAD_REQUEST,
            ),
            (
                ForecastError::NumericDegeneracy("constant series".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ForecastError::ModelInference("NaN".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ForecastError::Source(PriceProviderError::Network("reset".into())),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (err, expected) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_insufficient_data_message() {
        let err = ForecastError::InsufficientData { required: 100, actual: 42 };
        assert_eq!(
            err.to_string(),
            "Not enough data to predict (need 100+ records, got 42)"
        );
    }
}
