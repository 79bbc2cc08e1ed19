use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where the numeric scores in a report came from. `Baseline` means the
/// model's reply could not be parsed and the fixed fallback scores were
/// used; the raw reply is still attached as `ai_feedback`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportSource {
    Model,
    Baseline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillReport {
    /// Skill name -> score, 0..=100.
    pub skills: BTreeMap<String, u8>,
    pub roadmap: Vec<String>,
    /// The evaluator model's reply, verbatim.
    pub ai_feedback: String,
    pub source: ReportSource,
}
