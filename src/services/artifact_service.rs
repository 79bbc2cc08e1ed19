use std::path::PathBuf;
use uuid::Uuid;

use crate::models::artifact::{Artifact, ArtifactKind, ArtifactOutcome};
use crate::utils::markdown::{find_chart_directive, parse_table};
use crate::utils::svg;

/// Scans model replies for an embedded markdown table or chart directive
/// and renders the matching SVG under the artifacts directory. The reply
/// text itself is never modified.
///
/// Files accumulate without garbage collection; names carry a UUID so
/// concurrent writes cannot collide.
#[derive(Clone)]
pub struct ArtifactService {
    dir: PathBuf,
}

impl ArtifactService {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Detection order: table first, then chart; first match wins.
    pub async fn extract(&self, text: &str) -> ArtifactOutcome {
        if let Some(table) = parse_table(text) {
            tracing::info!(rows = table.rows.len(), "rendering table artifact");
            return self.write(ArtifactKind::Table, "table", svg::table_svg(&table)).await;
        }
        if let Some(directive) = find_chart_directive(text) {
            tracing::info!(title = %directive.title, "rendering chart artifact with placeholder series");
            return self
                .write(ArtifactKind::Chart, "chart", svg::chart_svg(directive.kind, &directive.title))
                .await;
        }
        ArtifactOutcome::None
    }

    async fn write(&self, kind: ArtifactKind, prefix: &str, markup: String) -> ArtifactOutcome {
        match self.try_write(prefix, markup).await {
            Ok((file_name, url)) => ArtifactOutcome::Rendered(Artifact { kind, file_name, url }),
            Err(err) => {
                tracing::warn!(error = %err, ?kind, "artifact rendering failed, reply continues without an image");
                ArtifactOutcome::Failed {
                    kind,
                    reason: err.to_string(),
                }
            }
        }
    }

    async fn try_write(&self, prefix: &str, markup: String) -> anyhow::Result<(String, String)> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let file_name = format!("{}_{}.svg", prefix, Uuid::new_v4());
        tokio::fs::write(self.dir.join(&file_name), markup).await?;
        let url = format!("/artifacts/{}", file_name);
        Ok((file_name, url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(dir: &tempfile::TempDir) -> ArtifactService {
        ArtifactService::new(dir.path())
    }

    #[tokio::test]
    async fn table_reply_renders_a_table_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = service(&dir).extract("| A | B |\n|---|---|\n| 1 | 2 |").await;
        let ArtifactOutcome::Rendered(artifact) = outcome else {
            panic!("expected a rendered artifact");
        };
        assert_eq!(artifact.kind, ArtifactKind::Table);
        assert!(artifact.url.starts_with("/artifacts/table_"));
        let markup = std::fs::read_to_string(dir.path().join(&artifact.file_name)).unwrap();
        assert!(markup.contains("<svg"));
    }

    #[tokio::test]
    async fn chart_reply_renders_a_titled_chart() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = service(&dir).extract("Chart: bar of Region vs Sales").await;
        let ArtifactOutcome::Rendered(artifact) = outcome else {
            panic!("expected a rendered artifact");
        };
        assert_eq!(artifact.kind, ArtifactKind::Chart);
        let markup = std::fs::read_to_string(dir.path().join(&artifact.file_name)).unwrap();
        assert!(markup.contains("Region vs Sales"));
    }

    #[tokio::test]
    async fn table_wins_over_chart_when_both_present() {
        let dir = tempfile::tempdir().unwrap();
        let text = "| A |\n|---|\n| 1 |\nChart: pie of X vs Y";
        let ArtifactOutcome::Rendered(artifact) = service(&dir).extract(text).await else {
            panic!("expected a rendered artifact");
        };
        assert_eq!(artifact.kind, ArtifactKind::Table);
    }

    #[tokio::test]
    async fn plain_reply_has_no_artifact() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            service(&dir).extract("What does SUMIF do?").await,
            ArtifactOutcome::None
        ));
    }

    #[tokio::test]
    async fn unwritable_directory_degrades_to_failed() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the directory should be makes create_dir_all fail.
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, b"x").unwrap();
        let outcome = ArtifactService::new(&blocked)
            .extract("| A |\n|---|\n| 1 |")
            .await;
        assert!(matches!(outcome, ArtifactOutcome::Failed { kind: ArtifactKind::Table, .. }));
    }
}
