use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
};

use crate::dto::interview_dto::{
    StartInterviewResponse, ValidateAnswerRequest, ValidateAnswerResponse,
};
use crate::services::session_service::INITIAL_QUESTION_ID;
use crate::AppState;

#[axum::debug_handler]
pub async fn start_interview(State(state): State<AppState>) -> crate::error::Result<Response> {
    let reply = state.interview_service.begin().await?;
    Ok(Json(StartInterviewResponse {
        session_id: reply.session_id,
        image_url: reply.artifact.url(),
        message: reply.message,
        qid: INITIAL_QUESTION_ID,
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn validate_answer(
    State(state): State<AppState>,
    Json(req): Json<ValidateAnswerRequest>,
) -> crate::error::Result<Response> {
    let reply = state
        .interview_service
        .advance(req.session_id, &req.answer)
        .await?;
    Ok(Json(ValidateAnswerResponse {
        session_id: reply.session_id,
        image_url: reply.artifact.url(),
        message: reply.message,
        completed: reply.completed,
    })
    .into_response())
}
