use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info, warn};

use crate::errors::{AppError, ForecastError};
use crate::models::{PredictQuery, PredictionResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/predict", get(predict_company))
        .route("/forecast/:symbol", get(forecast_symbol))
}

pub async fn predict_company(
    Query(params): Query<PredictQuery>,
    State(state): State<AppState>,
) -> Result<Json<PredictionResponse>, AppError> {
    let company = params.company.trim().to_lowercase();
    if company.is_empty() {
        return Err(AppError::Validation("company must not be empty".to_string()));
    }

    let ticker = state.symbols.resolve(&company).map(str::to_string);
    info!("GET /predict - company: {}, resolved ticker: {:?}", company, ticker);

    let ticker = ticker.ok_or_else(|| ForecastError::SymbolNotFound(company.clone()))?;
    run(&state, &ticker).await
}

pub async fn forecast_symbol(
    Path(symbol): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PredictionResponse>, AppError> {
    let symbol = symbol.trim().to_uppercase();
    info!("GET /forecast/{} - Generating forecast", symbol);
    run(&state, &symbol).await
}

async fn run(state: &AppState, ticker: &str) -> Result<Json<PredictionResponse>, AppError> {
    let result = state.forecaster.run_forecast(ticker).await.map_err(|e| {
        match &e {
            ForecastError::DataNotFound(_) | ForecastError::InsufficientData { .. } => {
                warn!("Cannot forecast {}: {}", ticker, e)
            }
            _ => error!("Forecast failed for {}: {}", ticker, e),
        }
        e
    })?;

    Ok(Json(result.into()))
}
