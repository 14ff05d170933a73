use serde::{Deserialize, Serialize};

/// A predicted close as echoed back by the client when asking for advice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub date: String,
    pub predicted_close: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceRequest {
    pub company: String,
    pub predictions: Vec<Prediction>,
}

/// Body of `/ai-advice`. Failures are reported in-band, always with a 200.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdviceResponse {
    Advice { advice: String },
    Error { error: String },
}
