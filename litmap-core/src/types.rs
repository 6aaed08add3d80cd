//! Canonical query and record types shared across source adapters.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::RetrieveError;

/// A search query with acceptance filters and a retry budget.
///
/// Built once per user action and treated as immutable while a retrieval
/// is in flight.
#[derive(Debug, Clone)]
pub struct Query {
    /// Topic string passed verbatim to the source.
    pub topic: String,
    /// Acceptance quota; retrieval stops once this many records pass the filter.
    pub max_results: usize,
    /// Minimum citation count for a record to be accepted.
    pub min_citations: u64,
    /// Earliest acceptable publication year, inclusive.
    pub start_year: Option<i32>,
    /// Latest acceptable publication year, inclusive.
    pub end_year: Option<i32>,
    /// Transient failures tolerated before giving up; zero means a single attempt.
    pub retry_limit: u32,
    /// Fixed suspension between retry attempts.
    pub retry_delay: Duration,
    /// Apply a final stable sort by citation count, descending.
    pub sort_by_citations: bool,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            topic: String::new(),
            max_results: 10,
            min_citations: 0,
            start_year: None,
            end_year: None,
            retry_limit: 3,
            retry_delay: Duration::from_secs(5),
            sort_by_citations: false,
        }
    }
}

impl Query {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Default::default()
        }
    }

    /// Reject queries that cannot produce a meaningful retrieval.
    pub fn validate(&self) -> Result<(), RetrieveError> {
        if self.max_results == 0 {
            return Err(RetrieveError::InvalidQuery {
                reason: "max_results must be at least 1".into(),
            });
        }
        if let (Some(start), Some(end)) = (self.start_year, self.end_year)
            && start > end
        {
            return Err(RetrieveError::InvalidQuery {
                reason: format!("start year {start} is after end year {end}"),
            });
        }
        Ok(())
    }

    /// The acceptance predicate: citation floor plus inclusive year bounds.
    ///
    /// A record with no year fails any year bound that is set.
    pub fn accepts(&self, record: &PaperRecord) -> bool {
        if record.citation_count < self.min_citations {
            return false;
        }
        if let Some(start) = self.start_year {
            match record.year {
                Some(year) if year >= start => {}
                _ => return false,
            }
        }
        if let Some(end) = self.end_year {
            match record.year {
                Some(year) if year <= end => {}
                _ => return false,
            }
        }
        true
    }
}

/// One paper in the canonical shape every adapter translates into.
///
/// Any field may be absent in a source payload; absence never panics, it
/// only excludes the record from graph identity where identity is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PaperRecord {
    /// Source-native identifier (S2 paper id, DOI); absent for scraped results.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub citation_count: u64,
    /// Identifiers of papers this paper cites.
    #[serde(default)]
    pub cited_ids: Vec<String>,
}

impl PaperRecord {
    /// Whether the record carries enough identity for graph construction:
    /// a non-empty title and at least one author.
    pub fn has_identity(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
            && self.authors.iter().any(|a| !a.trim().is_empty())
    }
}

/// Split a display author string into individual names.
///
/// Sources that return one combined string join names with the literal
/// `" and "` (BibTeX style) or with commas; both separators are honored.
pub fn split_authors(raw: &str) -> Vec<String> {
    raw.split(" and ")
        .flat_map(|part| part.split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
