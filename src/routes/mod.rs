pub mod health;
pub mod interview;

use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/interview/start", post(interview::start_interview))
        .route("/api/interview/evaluate", post(interview::evaluate_answer))
}
