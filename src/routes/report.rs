use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json, Response},
};

use crate::dto::report_dto::ReportQuery;
use crate::error::Error;
use crate::AppState;

#[axum::debug_handler]
pub async fn get_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> crate::error::Result<Response> {
    let Some(session_id) = query.session_id else {
        // Sessionless report: evaluates the static demo transcript.
        let report = state.report_service.generate(None).await;
        return Ok(Json(report).into_response());
    };

    let shared = state
        .interview_service
        .store()
        .get(&session_id)
        .ok_or_else(|| Error::NotFound(format!("Unknown session: {}", session_id)))?;

    let transcript = {
        let session = shared.lock().await;
        if let Some(report) = &session.report {
            return Ok(Json(report.clone()).into_response());
        }
        session.transcript.clone()
    };

    let report = state.report_service.generate(Some(&transcript)).await;
    Ok(Json(report).into_response())
}
