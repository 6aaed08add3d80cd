//! Semantic Scholar Graph API adapter.
//!
//! Paginates the relevance search endpoint and translates its JSON into
//! canonical records. Malformed year/citation fields degrade to absent or
//! zero rather than failing a whole page.

use std::time::Duration;

use async_trait::async_trait;

use super::{PaperSource, SourcePage};
use crate::config::SemanticScholarConfig;
use crate::error::SourceError;
use crate::types::PaperRecord;

const SEMANTIC_SCHOLAR_API: &str = "https://api.semanticscholar.org/graph/v1";
const SEARCH_FIELDS: &str = "paperId,title,authors,year,citationCount,references.paperId";
const SOURCE_NAME: &str = "semantic_scholar";

/// Client for the Semantic Scholar paper search endpoint.
pub struct SemanticScholarSource {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl SemanticScholarSource {
    pub fn new(config: &SemanticScholarConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(crate::USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl PaperSource for SemanticScholarSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch_page(
        &self,
        topic: &str,
        offset: usize,
        limit: usize,
    ) -> Result<SourcePage, SourceError> {
        let url = format!(
            "{}/paper/search?query={}&offset={}&limit={}&fields={}",
            SEMANTIC_SCHOLAR_API,
            urlencoding::encode(topic),
            offset,
            limit,
            SEARCH_FIELDS,
        );
        tracing::debug!("Semantic Scholar search URL: {}", url);

        let mut request = self.client.get(&url);
        if let Some(ref key) = self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                source: SOURCE_NAME,
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = response.json().await.map_err(|e| SourceError::Parse {
            source: SOURCE_NAME,
            message: e.to_string(),
        })?;
        Ok(parse_search_page(&body))
    }
}

/// Parse one search response page.
pub fn parse_search_page(body: &serde_json::Value) -> SourcePage {
    let records = body
        .get("data")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().map(parse_entry).collect())
        .unwrap_or_default();
    // The endpoint includes `next` only while further results exist.
    let exhausted = body.get("next").and_then(|v| v.as_u64()).is_none();
    SourcePage { records, exhausted }
}

fn parse_entry(entry: &serde_json::Value) -> PaperRecord {
    let id = entry
        .get("paperId")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    let title = entry
        .get("title")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);
    let authors = entry
        .get("authors")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|a| a.get("name").and_then(|v| v.as_str()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let year = entry
        .get("year")
        .and_then(|v| v.as_i64())
        .map(|y| y as i32);
    let citation_count = entry
        .get("citationCount")
        .and_then(|v| v.as_u64())
        .unwrap_or(0);
    let cited_ids = entry
        .get("references")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|r| r.get("paperId").and_then(|v| v.as_str()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    PaperRecord {
        id,
        title,
        authors,
        year,
        citation_count,
        cited_ids,
    }
}
