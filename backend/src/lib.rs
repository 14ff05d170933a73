//! Stock price forecasting backend.
//!
//! A pre-trained sequence regressor is applied autoregressively over a
//! min-max scaled window of daily closes to produce a dated multi-day
//! forecast, served over HTTP.

pub mod app;
pub mod config;
pub mod errors;
pub mod external;
pub mod logging;
pub mod models;
mod routes;
pub mod services;
pub mod state;
