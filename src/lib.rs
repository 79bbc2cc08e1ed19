pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::path::PathBuf;
use std::sync::Arc;

use reqwest::Client;

use crate::services::artifact_service::ArtifactService;
use crate::services::completion_service::{CompletionBackend, CompletionService, GeminiBackend};
use crate::services::report_service::ReportService;
use crate::services::session_service::InterviewService;

#[derive(Clone)]
pub struct AppState {
    pub interview_service: InterviewService,
    pub report_service: ReportService,
}

impl AppState {
    pub fn new() -> Self {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .unwrap();

        let backend = Arc::new(GeminiBackend::new(
            config.gemini_api_key.clone(),
            http_client,
        ));
        Self::assemble(
            backend,
            config.primary_model.clone(),
            config.fallback_model.clone(),
            config.artifacts_dir.clone().into(),
        )
    }

    /// Wires the services around an arbitrary backend; integration tests
    /// use this with a scripted one.
    pub fn with_backend(backend: Arc<dyn CompletionBackend>, artifacts_dir: PathBuf) -> Self {
        Self::assemble(
            backend,
            crate::config::DEFAULT_PRIMARY_MODEL.to_string(),
            crate::config::DEFAULT_FALLBACK_MODEL.to_string(),
            artifacts_dir,
        )
    }

    fn assemble(
        backend: Arc<dyn CompletionBackend>,
        primary_model: String,
        fallback_model: String,
        artifacts_dir: PathBuf,
    ) -> Self {
        let completion = CompletionService::new(backend, primary_model, fallback_model);
        let interview_service = InterviewService::new(
            completion.clone(),
            ArtifactService::new(artifacts_dir),
        );
        let report_service = ReportService::new(completion);

        Self {
            interview_service,
            report_service,
        }
    }
}
