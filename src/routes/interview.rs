use crate::{
    dto::interview_dto::{EvaluateAnswerPayload, StartInterviewPayload},
    error::Result,
    models::interview::{EvaluationRequest, GenerationRequest},
    AppState,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

#[axum::debug_handler]
pub async fn start_interview(
    State(state): State<AppState>,
    Json(payload): Json<StartInterviewPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let request = GenerationRequest::from(payload);
    let result = state.interview.start_interview(&request).await;
    Ok((StatusCode::OK, Json(result)))
}

#[axum::debug_handler]
pub async fn evaluate_answer(
    State(state): State<AppState>,
    Json(payload): Json<EvaluateAnswerPayload>,
) -> Result<impl IntoResponse> {
    let request = EvaluationRequest::from(payload);
    let result = state.interview.evaluate_answer(request).await;
    Ok((StatusCode::OK, Json(result)))
}
