use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{info, warn};

use crate::models::{AdviceRequest, AdviceResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/ai-advice", post(get_advice))
}

pub async fn get_advice(
    State(state): State<AppState>,
    Json(request): Json<AdviceRequest>,
) -> Json<AdviceResponse> {
    info!(
        "POST /ai-advice - {} ({} predictions)",
        request.company,
        request.predictions.len()
    );

    let Some(advisor) = state.advisor.as_ref() else {
        warn!("Advice requested but no advice provider is configured");
        return Json(AdviceResponse::Error {
            error: "Advice service is not configured".to_string(),
        });
    };

    match advisor.advise(&request.company, &request.predictions).await {
        Ok(advice) => Json(AdviceResponse::Advice { advice }),
        Err(e) => {
            warn!("Advice request for {} failed: {}", request.company, e);
            Json(AdviceResponse::Error {
                error: e.to_string(),
            })
        }
    }
}
