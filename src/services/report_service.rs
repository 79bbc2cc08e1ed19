use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use crate::models::report::{ReportSource, SkillReport};
use crate::models::turn::Turn;
use crate::services::completion_service::CompletionService;
use crate::services::prompt_service::{render_transcript, report_prompt};

/// Static demo transcript, used only when a report is requested without a
/// session. The live path never touches it.
pub const DEMO_TRANSCRIPT: &str = "\
Q: What is VLOOKUP?
A: It finds values in a column but candidate confused with HLOOKUP.
Q: Show me a Pivot Table.
A: Candidate built a basic pivot but missed grouping feature.";

fn baseline_skills() -> BTreeMap<String, u8> {
    BTreeMap::from([
        ("Formulas".to_string(), 70),
        ("Pivot Tables".to_string(), 55),
        ("Charts".to_string(), 40),
        ("Data Cleaning".to_string(), 50),
    ])
}

fn baseline_roadmap() -> Vec<String> {
    vec![
        "Review difference between VLOOKUP and HLOOKUP".to_string(),
        "Practice grouping in Pivot Tables".to_string(),
        "Learn basic chart customization".to_string(),
    ]
}

/// What a model reply turned out to be once inspected for a final report.
#[derive(Debug, Clone)]
pub enum ReplyKind {
    /// Ordinary feedback / next-question content.
    Message,
    /// A parseable skills report: the interview is over.
    Report(SkillReport),
    /// Clearly attempted a report but the JSON does not parse.
    MalformedReport,
}

pub fn classify_reply(text: &str) -> ReplyKind {
    let Some(candidate) = extract_json_candidate(text) else {
        return ReplyKind::Message;
    };
    match serde_json::from_str::<JsonValue>(candidate) {
        Ok(value) => match coerce_report(&value, text) {
            Some(report) => ReplyKind::Report(report),
            None => ReplyKind::Message,
        },
        Err(_) if looks_like_report(text) => ReplyKind::MalformedReport,
        Err(_) => ReplyKind::Message,
    }
}

/// Pulls the most plausible JSON span out of a reply: a fenced ```json
/// block when present, otherwise the outermost brace span.
fn extract_json_candidate(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```json") {
        let rest = &text[start + "```json".len()..];
        if let Some(end) = rest.find("```") {
            return Some(rest[..end].trim());
        }
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(text[start..=end].trim())
}

fn looks_like_report(text: &str) -> bool {
    text.contains("\"skills\"") && text.contains("\"roadmap\"")
}

fn coerce_report(value: &JsonValue, raw: &str) -> Option<SkillReport> {
    let scores = value.get("skills")?.as_object()?;
    let mut skills = BTreeMap::new();
    for (name, score) in scores {
        let score = score.as_f64().unwrap_or(0.0).clamp(0.0, 100.0).round() as u8;
        skills.insert(name.clone(), score);
    }
    if skills.is_empty() {
        return None;
    }

    let roadmap = value
        .get("roadmap")
        .and_then(|r| r.as_array())
        .map(|steps| {
            steps
                .iter()
                .filter_map(|step| step.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    Some(SkillReport {
        skills,
        roadmap,
        ai_feedback: raw.to_string(),
        source: ReportSource::Model,
    })
}

/// Composes the evaluator prompt over a transcript and turns the reply into
/// a [`SkillReport`]. Parse failures degrade to the baseline score set with
/// the raw reply attached, never to an error.
#[derive(Clone)]
pub struct ReportService {
    completion: CompletionService,
}

impl ReportService {
    pub fn new(completion: CompletionService) -> Self {
        Self { completion }
    }

    pub async fn generate(&self, transcript: Option<&[Turn]>) -> SkillReport {
        let rendered = match transcript {
            Some(turns) if !turns.is_empty() => render_transcript(turns),
            _ => {
                tracing::info!("no live transcript, evaluating the demo transcript");
                DEMO_TRANSCRIPT.to_string()
            }
        };

        let reply = self.completion.complete(&report_prompt(&rendered)).await;
        match classify_reply(&reply) {
            ReplyKind::Report(report) => report,
            _ => {
                tracing::warn!("evaluator reply was not parseable JSON, keeping baseline scores");
                SkillReport {
                    skills: baseline_skills(),
                    roadmap: baseline_roadmap(),
                    ai_feedback: reply,
                    source: ReportSource::Baseline,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::completion_service::CompletionBackend;
    use async_trait::async_trait;
    use std::sync::Arc;

    const REPORT_JSON: &str =
        r#"{"skills": {"Formulas": 80, "Charts": 55}, "roadmap": ["Practice INDEX-MATCH"]}"#;

    #[test]
    fn plain_text_is_a_message() {
        assert!(matches!(classify_reply("Good answer! Next question: ..."), ReplyKind::Message));
    }

    #[test]
    fn bare_report_json_is_detected() {
        let ReplyKind::Report(report) = classify_reply(REPORT_JSON) else {
            panic!("expected a report");
        };
        assert_eq!(report.skills["Formulas"], 80);
        assert_eq!(report.roadmap, vec!["Practice INDEX-MATCH"]);
        assert_eq!(report.source, ReportSource::Model);
        assert_eq!(report.ai_feedback, REPORT_JSON);
    }

    #[test]
    fn fenced_report_json_is_detected() {
        let reply = format!("Here is your result:\n```json\n{}\n```\nThanks!", REPORT_JSON);
        assert!(matches!(classify_reply(&reply), ReplyKind::Report(_)));
    }

    #[test]
    fn scores_are_clamped_to_percentage_range() {
        let reply = r#"{"skills": {"Formulas": 250, "Charts": -3}, "roadmap": []}"#;
        let ReplyKind::Report(report) = classify_reply(reply) else {
            panic!("expected a report");
        };
        assert_eq!(report.skills["Formulas"], 100);
        assert_eq!(report.skills["Charts"], 0);
    }

    #[test]
    fn broken_report_json_is_malformed() {
        let reply = r#"{"skills": {"Formulas": 80}, "roadmap": [}"#;
        assert!(matches!(classify_reply(reply), ReplyKind::MalformedReport));
    }

    #[test]
    fn non_report_json_is_a_message() {
        assert!(matches!(
            classify_reply(r#"Try `{"a": 1}` in a cell."#),
            ReplyKind::Message
        ));
    }

    struct FixedBackend(String);

    #[async_trait]
    impl CompletionBackend for FixedBackend {
        async fn generate(&self, _model: &str, _prompt: &str) -> anyhow::Result<String> {
            Ok(self.0.clone())
        }
    }

    fn report_service(reply: &str) -> ReportService {
        let completion = CompletionService::new(
            Arc::new(FixedBackend(reply.to_string())),
            "primary".to_string(),
            "fallback".to_string(),
        );
        ReportService::new(completion)
    }

    #[tokio::test]
    async fn parseable_reply_yields_model_scores() {
        let report = report_service(REPORT_JSON).generate(None).await;
        assert_eq!(report.source, ReportSource::Model);
        assert_eq!(report.skills["Charts"], 55);
    }

    #[tokio::test]
    async fn unparseable_reply_falls_back_to_baseline() {
        let report = report_service("I cannot produce JSON today.").generate(None).await;
        assert_eq!(report.source, ReportSource::Baseline);
        assert_eq!(report.skills["Formulas"], 70);
        assert_eq!(report.ai_feedback, "I cannot produce JSON today.");
        assert_eq!(report.roadmap.len(), 3);
    }
}
