//! Search source adapters.
//!
//! Each adapter translates one API's native response shape into the
//! canonical [`PaperRecord`]; the retriever only ever sees the
//! [`PaperSource`] trait. Adapters differ in response parsing, not in
//! control flow: retries, filtering, and quotas live in the retriever.

pub mod crossref;
pub mod scholar;
pub mod semantic_scholar;

use async_trait::async_trait;

use crate::config::SourcesConfig;
use crate::error::SourceError;
use crate::types::PaperRecord;

pub use crossref::CrossrefSource;
pub use scholar::ScholarSource;
pub use semantic_scholar::SemanticScholarSource;

/// One window of raw candidates from a paginated source.
#[derive(Debug, Clone, Default)]
pub struct SourcePage {
    pub records: Vec<PaperRecord>,
    /// True when the source has no further candidates past this window.
    pub exhausted: bool,
}

/// A paginated scholarly search source.
#[async_trait]
pub trait PaperSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fetch a window of raw candidates for `topic` starting at `offset`.
    ///
    /// A failed call is a transient fetch failure for the retriever to
    /// absorb; exhaustion is signalled on the returned page, never as an
    /// error.
    async fn fetch_page(
        &self,
        topic: &str,
        offset: usize,
        limit: usize,
    ) -> Result<SourcePage, SourceError>;
}

/// Which adapter backs a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    SemanticScholar,
    Crossref,
    Scholar,
}

impl SourceKind {
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "semanticscholar" | "s2" => Some(Self::SemanticScholar),
            "crossref" => Some(Self::Crossref),
            "scholar" | "googlescholar" | "gscholar" => Some(Self::Scholar),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SemanticScholar => "semantic_scholar",
            Self::Crossref => "crossref",
            Self::Scholar => "scholar",
        }
    }
}

/// Construct the adapter for `kind` from per-source settings.
pub fn build_source(
    kind: SourceKind,
    config: &SourcesConfig,
) -> Result<Box<dyn PaperSource>, SourceError> {
    Ok(match kind {
        SourceKind::SemanticScholar => {
            Box::new(SemanticScholarSource::new(&config.semantic_scholar)?)
        }
        SourceKind::Crossref => Box::new(CrossrefSource::new(&config.crossref)?),
        SourceKind::Scholar => Box::new(ScholarSource::new(&config.scholar)?),
    })
}
