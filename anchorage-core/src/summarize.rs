// Optional refresh suggestions for stale anchors

use crate::audit::AuditReport;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

/// Stale anchors that get a suggestion, most stale first.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("Summarizer request failed: {0}")]
    Request(String),

    #[error("Summarizer returned an unusable response: {0}")]
    Response(String),
}

/// Produces advice for refreshing an anchor post.
///
/// Advisory only: `Ok(None)` means nothing to suggest.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn suggest_updates(
        &self,
        title: &str,
        excerpt: &str,
    ) -> Result<Option<String>, SummarizeError>;
}

/// Fill in `suggestion` for the first `limit` stale anchors.
///
/// Failures are logged and leave the suggestion empty.
/// Returns how many suggestions were attached.
pub async fn attach_suggestions(
    report: &mut AuditReport,
    summarizer: &dyn Summarizer,
    limit: usize,
) -> usize {
    let mut attached = 0;

    for stale in report.stale_anchors.iter_mut().take(limit) {
        match summarizer.suggest_updates(&stale.title, &stale.excerpt).await {
            Ok(Some(suggestion)) if !suggestion.trim().is_empty() => {
                stale.suggestion = Some(suggestion.trim().to_string());
                attached += 1;
            }
            Ok(_) => debug!("No suggestion for {}", stale.link),
            Err(e) => warn!("Suggestion for {} failed: {}", stale.link, e),
        }
    }

    attached
}
