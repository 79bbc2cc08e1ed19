use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::report::SkillReport;
use crate::models::turn::Turn;

/// One live interview. The transcript is append-only for the session's
/// lifetime; role alternation is conventional and never enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSession {
    pub id: Uuid,
    pub transcript: Vec<Turn>,
    pub completed: bool,
    pub report: Option<SkillReport>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InterviewSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            transcript: Vec::new(),
            completed: false,
            report: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn push(&mut self, turn: Turn) {
        self.transcript.push(turn);
        self.updated_at = Utc::now();
    }
}

impl Default for InterviewSession {
    fn default() -> Self {
        Self::new()
    }
}
