use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::models::Prediction;

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const NO_ADVICE: &str = "No advice available.";

#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("OpenRouter request failed: {0}")]
    Network(String),
    #[error("API call failed with status {0}")]
    Status(u16),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("request timed out")]
    Timeout,
}

/// Configuration for the advice service
#[derive(Debug, Clone)]
pub struct AdviceConfig {
    pub api_key: String,
    pub model: String,
    pub referer: String,
    pub title: String,
}

impl AdviceConfig {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            referer: "http://localhost:3000".to_string(),
            title: "StockAdvisor".to_string(),
        }
    }
}

/// Produces free-text investment advice from a forecast.
#[async_trait]
pub trait AdviceProvider: Send + Sync {
    async fn advise(&self, company: &str, predictions: &[Prediction]) -> Result<String, AdviceError>;
}

pub fn build_advice_prompt(company: &str, predictions: &[Prediction]) -> String {
    let mut prompt = format!(
        "Based on the following 30-day predicted stock prices for {}, suggest how long someone \
         should invest in it to make a reasonable profit. Be concise and realistic.\n\n",
        company
    );
    for p in predictions {
        prompt.push_str(&format!("{}: ${}\n", p.date, p.predicted_close));
    }
    prompt
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

fn extract_advice(response: ChatResponse) -> String {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .unwrap_or_else(|| NO_ADVICE.to_string())
}

/// OpenRouter chat-completions client.
pub struct OpenRouterAdvisor {
    config: AdviceConfig,
    client: Client,
}

impl OpenRouterAdvisor {
    pub fn new(config: AdviceConfig) -> Result<Self, AdviceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AdviceError::Network(e.to_string()))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl AdviceProvider for OpenRouterAdvisor {
    async fn advise(&self, company: &str, predictions: &[Prediction]) -> Result<String, AdviceError> {
        info!(
            "Requesting advice for {} ({} predictions, model: {})",
            company,
            predictions.len(),
            self.config.model
        );

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: build_advice_prompt(company, predictions),
            }],
        };

        let response = self
            .client
            .post(OPENROUTER_URL)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AdviceError::Timeout
                } else {
                    AdviceError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Advice API returned HTTP {} for {}", status, company);
            return Err(AdviceError::Status(status.as_u16()));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AdviceError::InvalidResponse(e.to_string()))?;

        Ok(extract_advice(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_every_prediction() {
        let predictions = vec![
            Prediction {
                date: "2025-02-01".to_string(),
                predicted_close: 231.5,
            },
            Prediction {
                date: "2025-02-02".to_string(),
                predicted_close: 233.07,
            },
        ];

        let prompt = build_advice_prompt("AAPL", &predictions);

        assert!(prompt.starts_with(
            "Based on the following 30-day predicted stock prices for AAPL, suggest how long"
        ));
        assert!(prompt.ends_with("2025-02-01: $231.5\n2025-02-02: $233.07\n"));
    }

    #[test]
    fn test_extract_advice_takes_first_choice() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Hold for 3 weeks."}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_advice(body), "Hold for 3 weeks.");
    }

    #[test]
    fn test_extract_advice_defaults_when_missing() {
        let body: ChatResponse = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert_eq!(extract_advice(body), NO_ADVICE);

        let body: ChatResponse = serde_json::from_str(r#"{"choices":[{}]}"#).unwrap();
        assert_eq!(extract_advice(body), NO_ADVICE);
    }

    #[test]
    fn test_status_error_message() {
        assert_eq!(
            AdviceError::Status(401).to_string(),
            "API call failed with status 401"
        );
    }
}
