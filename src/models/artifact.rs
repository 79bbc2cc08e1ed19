use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Table,
    Chart,
}

/// A rendered image derived from one model reply. Not retained in memory
/// beyond the response it accompanies; the file stays on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub file_name: String,
    pub url: String,
}

/// Outcome of scanning a reply for a visual. "No visual needed" and
/// "rendering broke" are distinct; the HTTP layer maps both to a null
/// image URL but only the latter is logged.
#[derive(Debug, Clone)]
pub enum ArtifactOutcome {
    None,
    Rendered(Artifact),
    Failed { kind: ArtifactKind, reason: String },
}

impl ArtifactOutcome {
    pub fn url(&self) -> Option<String> {
        match self {
            ArtifactOutcome::Rendered(artifact) => Some(artifact.url.clone()),
            _ => None,
        }
    }
}
