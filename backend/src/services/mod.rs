pub mod advice_service;
pub mod date_sequencer;
pub mod forecast_engine;
pub mod forecasting_service;
pub mod lstm_regressor;
pub mod normalizer;
pub mod regressor;
pub mod symbol_resolver;
