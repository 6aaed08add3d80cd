//! Crossref works API adapter.
//!
//! Queries the `/works` endpoint with a field-selection list and translates
//! `message.items` into canonical records. DOIs double as both the record
//! id and the cited-paper identifiers.

use std::time::Duration;

use async_trait::async_trait;

use super::{PaperSource, SourcePage};
use crate::config::CrossrefConfig;
use crate::error::SourceError;
use crate::types::PaperRecord;

const CROSSREF_API: &str = "https://api.crossref.org";
const SELECT_FIELDS: &str = "DOI,title,author,issued,is-referenced-by-count,reference";
const SOURCE_NAME: &str = "crossref";

/// Client for the Crossref works search endpoint.
pub struct CrossrefSource {
    client: reqwest::Client,
    mailto: Option<String>,
}

impl CrossrefSource {
    pub fn new(config: &CrossrefConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(crate::USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            mailto: config.mailto.clone(),
        })
    }
}

#[async_trait]
impl PaperSource for CrossrefSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch_page(
        &self,
        topic: &str,
        offset: usize,
        limit: usize,
    ) -> Result<SourcePage, SourceError> {
        let mut url = format!(
            "{}/works?query={}&rows={}&offset={}&select={}",
            CROSSREF_API,
            urlencoding::encode(topic),
            limit,
            offset,
            SELECT_FIELDS,
        );
        if let Some(ref mailto) = self.mailto {
            url.push_str(&format!("&mailto={}", urlencoding::encode(mailto)));
        }
        tracing::debug!("Crossref search URL: {}", url);

        let response = self.client.get(&url).send().await?;
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
        Ok(parse_works_page(&body, offset))
    }
}

/// Parse one works response page.
pub fn parse_works_page(body: &serde_json::Value, offset: usize) -> SourcePage {
    let message = body.get("message").unwrap_or(body);
    let records: Vec<PaperRecord> = message
        .get("items")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().map(parse_work).collect())
        .unwrap_or_default();
    let total = message
        .get("total-results")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as usize;
    let exhausted = records.is_empty() || offset + records.len() >= total;
    SourcePage { records, exhausted }
}

fn parse_work(work: &serde_json::Value) -> PaperRecord {
    let id = work
        .get("DOI")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    // Crossref titles come as a one-element array.
    let title = work
        .get("title")
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);
    let authors = work
        .get("author")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(parse_author).collect())
        .unwrap_or_default();
    let year = work
        .get("issued")
        .and_then(|v| v.get("date-parts"))
        .and_then(|v| v.as_array())
        .and_then(|parts| parts.first())
        .and_then(|v| v.as_array())
        .and_then(|first| first.first())
        .and_then(|v| v.as_i64())
        .map(|y| y as i32);
    let citation_count = work
        .get("is-referenced-by-count")
        .and_then(|v| v.as_u64())
        .unwrap_or(0);
    let cited_ids = work
        .get("reference")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|r| r.get("DOI").and_then(|v| v.as_str()))
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

fn parse_author(author: &serde_json::Value) -> Option<String> {
    let given = author.get("given").and_then(|v| v.as_str());
    let family = author.get("family").and_then(|v| v.as_str())?;
    Some(match given {
        Some(given) => format!("{given} {family}"),
        None => family.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_body() -> serde_json::Value {
        json!({
            "status": "ok",
            "message": {
                "total-results": 2,
                "items": [
                    {
                        "DOI": "10.1038/s41586-021-03819-2",
                        "title": ["Highly accurate protein structure prediction with AlphaFold"],
                        "author": [
                            {"given": "John", "family": "Jumper"},
                            {"family": "Evans"}
                        ],
                        "issued": {"date-parts": [[2021, 7, 15]]},
                        "is-referenced-by-count": 18000,
                        "reference": [
                            {"DOI": "10.1000/ref1"},
                            {"key": "no-doi-entry"}
                        ]
                    },
                    {
                        "DOI": "10.1000/bare",
                        "title": []
                    }
                ]
            }
        })
    }

    #[test]
    fn test_parse_full_work() {
        let page = parse_works_page(&sample_body(), 0);
        let record = &page.records[0];
        assert_eq!(record.id.as_deref(), Some("10.1038/s41586-021-03819-2"));
        assert_eq!(
            record.title.as_deref(),
            Some("Highly accurate protein structure prediction with AlphaFold")
        );
        assert_eq!(record.authors, vec!["John Jumper", "Evans"]);
        assert_eq!(record.year, Some(2021));
        assert_eq!(record.citation_count, 18000);
        assert_eq!(record.cited_ids, vec!["10.1000/ref1"]);
    }

    #[test]
    fn test_parse_bare_work_degrades() {
        let page = parse_works_page(&sample_body(), 0);
        let record = &page.records[1];
        assert_eq!(record.id.as_deref(), Some("10.1000/bare"));
        assert!(record.title.is_none());
        assert!(record.authors.is_empty());
        assert!(record.year.is_none());
        assert_eq!(record.citation_count, 0);
    }

    #[test]
    fn test_exhaustion_against_total_results() {
        // Two items, total 2: this page consumes the result set.
        assert!(parse_works_page(&sample_body(), 0).exhausted);

        let mut body = sample_body();
        body["message"]["total-results"] = json!(50);
        assert!(!parse_works_page(&body, 0).exhausted);
        // Deep offset reaches the end.
        assert!(parse_works_page(&body, 48).exhausted);
    }

    #[test]
    fn test_empty_items_is_exhausted() {
        let body = json!({"message": {"total-results": 10, "items": []}});
        let page = parse_works_page(&body, 0);
        assert!(page.records.is_empty());
        assert!(page.exhausted);
    }

    #[test]
    fn test_author_without_family_skipped() {
        let body = json!({
            "message": {
                "total-results": 1,
                "items": [{
                    "DOI": "10.1/x",
                    "title": ["T"],
                    "author": [{"given": "Orphan"}, {"given": "Ada", "family": "Lovelace"}]
                }]
            }
        });
        let record = &parse_works_page(&body, 0).records[0];
        assert_eq!(record.authors, vec!["Ada Lovelace"]);
    }

    // Integration test — requires network access.
    #[tokio::test]
    #[ignore]
    async fn test_real_search() {
        let source = CrossrefSource::new(&CrossrefConfig::default()).unwrap();
        let page = source.fetch_page("protein folding", 0, 5).await.unwrap();
        assert!(!page.records.is_empty());
    }
}
