//! Bounded, retrying result retrieval.
//!
//! Pages through a [`PaperSource`], applies the query's acceptance filters,
//! and stops on quota, source exhaustion, or retry-budget exhaustion. One
//! outbound call is in flight at a time; the retry suspension is an awaited
//! sleep raced against the cancellation token.

use tokio_util::sync::CancellationToken;

use crate::error::RetrieveError;
use crate::sources::PaperSource;
use crate::types::{PaperRecord, Query};

/// Window size requested from sources per fetch.
const PAGE_SIZE: usize = 20;

/// The outcome of a retrieval: accepted records plus partial-result metadata.
///
/// Falling short of the quota is not an error; `complete` lets the caller
/// decide whether to warn before rendering what exists.
#[derive(Debug, Clone)]
pub struct Retrieval {
    /// Accepted records in source order (citation order when the query asks).
    pub records: Vec<PaperRecord>,
    /// Whether the full `max_results` quota was reached.
    pub complete: bool,
    /// Transient failures absorbed along the way.
    pub transient_failures: u32,
}

/// Pull records from `source` until the quota is met, the source runs dry,
/// or the retry budget is spent.
///
/// Fails with [`RetrieveError::SourceUnavailable`] only when the budget is
/// exhausted and nothing was accepted, so callers can distinguish "source
/// down" from "filtered down to empty".
pub async fn retrieve(
    source: &dyn PaperSource,
    query: &Query,
    cancel: &CancellationToken,
) -> Result<Retrieval, RetrieveError> {
    query.validate()?;

    let mut records: Vec<PaperRecord> = Vec::new();
    let mut failures: u32 = 0;
    let mut offset = 0usize;
    let mut exhausted = false;

    while records.len() < query.max_results && !exhausted {
        if cancel.is_cancelled() {
            return Err(RetrieveError::Cancelled);
        }

        let page = match source.fetch_page(&query.topic, offset, PAGE_SIZE).await {
            Ok(page) => page,
            Err(err) => {
                failures += 1;
                if failures > query.retry_limit {
                    tracing::warn!(
                        source = source.name(),
                        failures,
                        accepted = records.len(),
                        "retry budget exhausted: {err}"
                    );
                    break;
                }
                tracing::warn!(
                    source = source.name(),
                    failures,
                    retry_in = ?query.retry_delay,
                    "fetch failed, retrying: {err}"
                );
                tokio::select! {
                    _ = cancel.cancelled() => return Err(RetrieveError::Cancelled),
                    _ = tokio::time::sleep(query.retry_delay) => {}
                }
                continue;
            }
        };

        if page.records.is_empty() {
            exhausted = true;
        } else {
            exhausted = page.exhausted;
        }
        offset += page.records.len();

        for candidate in page.records {
            // Identity check runs before any quota accounting: a record that
            // cannot become a graph node must not satisfy the quota.
            if !candidate.has_identity() {
                tracing::debug!(
                    source = source.name(),
                    "skipping record without title/author identity"
                );
                continue;
            }
            if !query.accepts(&candidate) {
                continue;
            }
            records.push(candidate);
            if records.len() == query.max_results {
                break;
            }
        }
    }

    if records.is_empty() && failures > query.retry_limit {
        return Err(RetrieveError::SourceUnavailable {
            source: source.name().to_string(),
            failures,
        });
    }

    if query.sort_by_citations {
        // Stable sort: equal counts keep their source order.
        records.sort_by(|a, b| b.citation_count.cmp(&a.citation_count));
    }

    let complete = records.len() == query.max_results;
    Ok(Retrieval {
        records,
        complete,
        transient_failures: failures,
    })
}
