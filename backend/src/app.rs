use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::{advice, health, predict};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::<AppState>::new()
        .merge(health::router())
        .merge(predict::router())
        .merge(advice::router())
        .layer(cors)
        .with_state(state)
}
