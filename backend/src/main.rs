use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use stock_forecast::app;
use stock_forecast::config::AppConfig;
use stock_forecast::external::price_provider::PriceProvider;
use stock_forecast::external::yahoo::YahooProvider;
use stock_forecast::logging::{init_logging, LoggingConfig};
use stock_forecast::services::advice_service::{AdviceProvider, OpenRouterAdvisor};
use stock_forecast::services::forecasting_service::ForecastService;
use stock_forecast::services::lstm_regressor::LstmRegressor;
use stock_forecast::services::regressor::{InferenceGate, SequenceRegressor};
use stock_forecast::services::symbol_resolver::SymbolResolver;
use stock_forecast::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_logging(LoggingConfig::from_env()).context("failed to initialize logging")?;

    let config = AppConfig::from_env()?;

    // The model is loaded once and shared read-only by every request
    let model = LstmRegressor::from_path(&config.model_path)
        .with_context(|| format!("failed to load model from {}", config.model_path.display()))?;
    if model.window() != config.forecast.window {
        anyhow::bail!(
            "model expects a window of {} but FORECAST_WINDOW is {}",
            model.window(),
            config.forecast.window
        );
    }
    let regressor: Arc<dyn SequenceRegressor> = if config.serialize_inference {
        tracing::info!("🔒 Serializing model inference behind a mutex");
        Arc::new(InferenceGate::new(model))
    } else {
        Arc::new(model)
    };
    tracing::info!("✅ Model loaded successfully");

    let symbols = SymbolResolver::load(config.symbols_path.as_deref())?;

    let advisor: Option<Arc<dyn AdviceProvider>> = match config.advice.clone() {
        Some(advice_config) => Some(Arc::new(OpenRouterAdvisor::new(advice_config)?)),
        None => {
            tracing::warn!("OPENROUTER_API_KEY not set, /ai-advice will report an error");
            None
        }
    };

    let provider: Arc<dyn PriceProvider> = Arc::new(YahooProvider::new());

    let state = AppState {
        forecaster: ForecastService::new(provider, regressor, config.forecast.clone()),
        symbols: Arc::new(symbols),
        advisor,
    };
    let app = app::create_app(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("🚀 Stock forecast backend running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
