use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Transport seam for the text-completion provider. Implementors map one
/// (model, prompt) pair to generated text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str) -> anyhow::Result<String>;
}

/// Google Gemini `generateContent` backend.
pub struct GeminiBackend {
    client: Client,
    api_key: String,
}

impl GeminiBackend {
    pub fn new(api_key: String, client: Client) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl CompletionBackend for GeminiBackend {
    async fn generate(&self, model: &str, prompt: &str) -> anyhow::Result<String> {
        if self.api_key.is_empty() {
            anyhow::bail!("GEMINI_API_KEY is not set");
        }

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            model, self.api_key
        );
        let payload = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let res = self.client.post(&url).json(&payload).send().await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API Error {}: {}", status, text);
        }

        let body: JsonValue = res.json().await?;
        let parts = body
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .ok_or_else(|| anyhow::anyhow!("Invalid Gemini response format"))?;

        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
            .collect();
        if text.is_empty() {
            anyhow::bail!("Gemini response contained no text");
        }
        Ok(text)
    }
}

/// Quota-resilient wrapper over a [`CompletionBackend`].
///
/// `complete` never fails: a primary-model error whose description signals
/// exhaustion triggers one attempt against the fallback model, and any
/// remaining failure is flattened into an `"Error"`-prefixed string. There
/// is no backoff, retry budget, or circuit breaker.
#[derive(Clone)]
pub struct CompletionService {
    backend: Arc<dyn CompletionBackend>,
    primary_model: String,
    fallback_model: String,
}

impl CompletionService {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        primary_model: String,
        fallback_model: String,
    ) -> Self {
        Self {
            backend,
            primary_model,
            fallback_model,
        }
    }

    pub async fn complete(&self, prompt: &str) -> String {
        let primary_err = match self.backend.generate(&self.primary_model, prompt).await {
            Ok(text) => return text,
            Err(err) => err,
        };

        let description = primary_err.to_string();
        if !is_exhaustion(&description) {
            tracing::error!(model = %self.primary_model, error = %description, "completion failed");
            return format!("Error: {}", description);
        }

        tracing::warn!(
            primary = %self.primary_model,
            fallback = %self.fallback_model,
            "primary model exhausted, retrying on fallback"
        );
        match self.backend.generate(&self.fallback_model, prompt).await {
            Ok(text) => text,
            Err(fallback_err) => {
                tracing::error!(model = %self.fallback_model, error = %fallback_err, "fallback completion failed");
                format!("Error: {} (fallback: {})", description, fallback_err)
            }
        }
    }
}

fn is_exhaustion(description: &str) -> bool {
    let lowered = description.to_lowercase();
    lowered.contains("quota") || lowered.contains("exceeded")
}
