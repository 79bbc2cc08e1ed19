use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartInterviewResponse {
    pub session_id: Uuid,
    pub message: String,
    pub image_url: Option<String>,
    pub qid: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateAnswerRequest {
    pub session_id: Uuid,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateAnswerResponse {
    pub session_id: Uuid,
    pub message: String,
    pub image_url: Option<String>,
    pub completed: bool,
}
