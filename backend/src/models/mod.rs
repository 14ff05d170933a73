mod price_point;
mod forecast;
mod advice;

pub use price_point::{PricePoint, PriceSeries};
pub use forecast::{ForecastResult, ForecastStep, PredictQuery, PredictionResponse};
pub use advice::{AdviceRequest, AdviceResponse, Prediction};
