//! Prompt assembly for every turn. The composer cannot verify that the
//! model honors any directive; the artifact extractor re-detects the
//! formats announced here on the way back out.

use crate::models::turn::Turn;

/// Marker line for the opening prompt, before any candidate input exists.
pub const START_MARKER: &str = "Start";

pub const INTERVIEW_INSTRUCTIONS: &str = "\
You are an Excel Interviewer AI.
Your job:
1. Conduct a structured Excel skills interview covering formulas, pivot tables and charts.
2. Ask step-by-step questions, one at a time.
3. Evaluate candidate answers fairly and give hints if they are stuck.
4. Keep answers concise and professional.
Formatting rules:
- Render any tabular data as a pipe-delimited markdown table.
- Announce a chart on its own line, exactly as: Chart: <type> of <X> vs <Y>
  where <type> is one of bar, line or pie.";

const CONTINUATION_DIRECTIVE: &str = "\
Evaluate the candidate's last answer. If the interview should continue, reply \
with brief feedback followed by the next question. If the interview is \
finished, reply with a single JSON object only, shaped as \
{\"skills\": {\"<skill>\": <0-100>, ...}, \"roadmap\": [\"<step>\", ...]}.";

pub const REPORT_INSTRUCTIONS: &str = "\
You are an AI evaluator.
Given the transcript of a mock Excel interview, generate:
1. Scores for skills: Formulas, Pivot Tables, Charts, Data Cleaning (0-100).
2. A short roadmap of what to improve.
Return JSON only.";

pub fn opening_prompt() -> String {
    format!("{}\n{}\nInterviewer:", INTERVIEW_INSTRUCTIONS, START_MARKER)
}

pub fn continuation_prompt(transcript: &[Turn]) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        INTERVIEW_INSTRUCTIONS,
        render_transcript(transcript),
        CONTINUATION_DIRECTIVE
    )
}

pub fn report_prompt(transcript: &str) -> String {
    format!("{}\nTranscript:\n{}", REPORT_INSTRUCTIONS, transcript)
}

/// Renders turns as `"<Role>: <text>"` lines, in order.
pub fn render_transcript(transcript: &[Turn]) -> String {
    transcript
        .iter()
        .map(|turn| format!("{}: {}", turn.role.label(), turn.text))
        .collect::<Vec<_>>()
        .join("\n")
}
