use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::artifact::ArtifactOutcome;
use crate::models::session::InterviewSession;
use crate::models::turn::Turn;
use crate::services::artifact_service::ArtifactService;
use crate::services::completion_service::CompletionService;
use crate::services::prompt_service;
use crate::services::report_service::{classify_reply, ReplyKind};

/// Question identifier handed out with the opening turn.
pub const INITIAL_QUESTION_ID: u32 = 1;

type SharedSession = Arc<tokio::sync::Mutex<InterviewSession>>;

/// In-memory session registry keyed by server-issued id.
///
/// The outer lock guards only the map; each session carries its own async
/// mutex, held across the upstream completion call, so concurrent requests
/// against one interview serialize instead of interleaving its transcript.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, SharedSession>>>,
}

impl SessionStore {
    pub fn create(&self) -> SharedSession {
        let session = InterviewSession::new();
        let id = session.id;
        let shared = Arc::new(tokio::sync::Mutex::new(session));
        self.sessions
            .lock()
            .expect("session store mutex poisoned")
            .insert(id, shared.clone());
        shared
    }

    pub fn get(&self, id: &Uuid) -> Option<SharedSession> {
        self.sessions
            .lock()
            .expect("session store mutex poisoned")
            .get(id)
            .cloned()
    }
}

/// One processed interview turn, ready for the HTTP layer.
#[derive(Debug, Clone)]
pub struct TurnReply {
    pub session_id: Uuid,
    pub message: String,
    pub artifact: ArtifactOutcome,
    pub completed: bool,
}

#[derive(Clone)]
pub struct InterviewService {
    store: SessionStore,
    completion: CompletionService,
    artifacts: ArtifactService,
}

impl InterviewService {
    pub fn new(completion: CompletionService, artifacts: ArtifactService) -> Self {
        Self {
            store: SessionStore::default(),
            completion,
            artifacts,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Opens a fresh interview: empty transcript, one opening question from
    /// the model. The transcript holds exactly one Interviewer turn when
    /// this returns.
    pub async fn begin(&self) -> Result<TurnReply> {
        let shared = self.store.create();
        let mut session = shared.lock().await;
        tracing::info!(session_id = %session.id, "interview started");
        self.respond(&mut session, prompt_service::opening_prompt()).await
    }

    /// Records the candidate's answer and asks the model for the next turn.
    /// Exactly two turns are appended: the answer, then the reply.
    pub async fn advance(&self, session_id: Uuid, answer: &str) -> Result<TurnReply> {
        let shared = self
            .store
            .get(&session_id)
            .ok_or_else(|| Error::NotFound(format!("Unknown session: {}", session_id)))?;
        let mut session = shared.lock().await;
        if session.completed {
            return Err(Error::SessionCompleted(format!(
                "Session {} has already produced its report",
                session_id
            )));
        }

        session.push(Turn::candidate(answer));
        let prompt = prompt_service::continuation_prompt(&session.transcript);
        self.respond(&mut session, prompt).await
    }

    /// Shared tail of `begin`/`advance`: call the model, classify the reply,
    /// append it as an Interviewer turn. The transcript logs the raw reply
    /// in every branch, including the malformed-report one.
    async fn respond(&self, session: &mut InterviewSession, prompt: String) -> Result<TurnReply> {
        let reply = self.completion.complete(&prompt).await;

        match classify_reply(&reply) {
            ReplyKind::Report(report) => {
                session.push(Turn::interviewer(&reply));
                session.completed = true;
                session.report = Some(report);
                tracing::info!(session_id = %session.id, turns = session.transcript.len(), "interview completed");
                Ok(TurnReply {
                    session_id: session.id,
                    message: reply,
                    artifact: ArtifactOutcome::None,
                    completed: true,
                })
            }
            ReplyKind::MalformedReport => {
                session.push(Turn::interviewer(&reply));
                Err(Error::ModelOutput(
                    "the model attempted a final report but returned invalid JSON".to_string(),
                ))
            }
            ReplyKind::Message => {
                let artifact = self.artifacts.extract(&reply).await;
                session.push(Turn::interviewer(&reply));
                Ok(TurnReply {
                    session_id: session.id,
                    message: reply,
                    artifact,
                    completed: false,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::turn::Role;
    use crate::services::completion_service::CompletionBackend;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionBackend for CountingBackend {
        async fn generate(&self, _model: &str, _prompt: &str) -> anyhow::Result<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("Question {}?", n))
        }
    }

    fn interview_service(dir: &tempfile::TempDir) -> InterviewService {
        let completion = CompletionService::new(
            Arc::new(CountingBackend {
                calls: AtomicUsize::new(0),
            }),
            "primary".to_string(),
            "fallback".to_string(),
        );
        InterviewService::new(completion, ArtifactService::new(dir.path()))
    }

    #[tokio::test]
    async fn begin_leaves_exactly_one_interviewer_turn() {
        let dir = tempfile::tempdir().unwrap();
        let svc = interview_service(&dir);
        let reply = svc.begin().await.unwrap();
        assert!(!reply.completed);

        let session = svc.store().get(&reply.session_id).unwrap();
        let session = session.lock().await;
        assert_eq!(session.transcript.len(), 1);
        assert_eq!(session.transcript[0].role, Role::Interviewer);
        assert_eq!(session.transcript[0].text, reply.message);
    }

    #[tokio::test]
    async fn advance_appends_candidate_then_interviewer() {
        let dir = tempfile::tempdir().unwrap();
        let svc = interview_service(&dir);
        let opening = svc.begin().await.unwrap();
        let reply = svc.advance(opening.session_id, "I would use SUMIF.").await.unwrap();

        let session = svc.store().get(&reply.session_id).unwrap();
        let session = session.lock().await;
        assert_eq!(session.transcript.len(), 3);
        assert_eq!(session.transcript[1].role, Role::Candidate);
        assert_eq!(session.transcript[1].text, "I would use SUMIF.");
        assert_eq!(session.transcript[2].role, Role::Interviewer);
        assert_eq!(session.transcript[2].text, reply.message);
    }

    #[tokio::test]
    async fn advance_on_unknown_session_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let svc = interview_service(&dir);
        let err = svc.advance(Uuid::new_v4(), "hello").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    struct ReportBackend;

    #[async_trait]
    impl CompletionBackend for ReportBackend {
        async fn generate(&self, _model: &str, _prompt: &str) -> anyhow::Result<String> {
            Ok(r#"{"skills": {"Formulas": 90}, "roadmap": ["Keep going"]}"#.to_string())
        }
    }

    #[tokio::test]
    async fn report_reply_completes_the_session_and_blocks_further_turns() {
        let dir = tempfile::tempdir().unwrap();
        let completion = CompletionService::new(
            Arc::new(ReportBackend),
            "primary".to_string(),
            "fallback".to_string(),
        );
        let svc = InterviewService::new(completion, ArtifactService::new(dir.path()));

        let opening = svc.begin().await.unwrap();
        assert!(opening.completed);

        let err = svc.advance(opening.session_id, "more?").await.unwrap_err();
        assert!(matches!(err, Error::SessionCompleted(_)));

        let session = svc.store().get(&opening.session_id).unwrap();
        let session = session.lock().await;
        assert!(session.completed);
        assert_eq!(session.report.as_ref().unwrap().skills["Formulas"], 90);
    }

    #[tokio::test]
    async fn concurrent_advances_serialize_on_one_session() {
        let dir = tempfile::tempdir().unwrap();
        let svc = interview_service(&dir);
        let opening = svc.begin().await.unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let svc = svc.clone();
            let session_id = opening.session_id;
            handles.push(tokio::spawn(async move {
                svc.advance(session_id, &format!("answer {}", i)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let session = svc.store().get(&opening.session_id).unwrap();
        let session = session.lock().await;
        // 1 opening turn + 2 per advance, with no interleaved or lost turns.
        assert_eq!(session.transcript.len(), 1 + 2 * 8);
        for pair in session.transcript[1..].chunks(2) {
            assert_eq!(pair[0].role, Role::Candidate);
            assert_eq!(pair[1].role, Role::Interviewer);
        }
    }
}
