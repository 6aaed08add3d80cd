//! Scholar result-page scrape adapter.
//!
//! The scraping-style academic search client: fetches result pages with a
//! `start` cursor and extracts records by marker scanning, the same
//! hand-rolled approach used for structured-text feeds elsewhere in the
//! workspace. Scraped results carry no stable identifier, so `id` and
//! `cited_ids` stay empty and the co-authorship graph is the natural mode.

use std::time::Duration;

use async_trait::async_trait;

use super::{PaperSource, SourcePage};
use crate::config::ScholarConfig;
use crate::error::SourceError;
use crate::types::{PaperRecord, split_authors};

const SCHOLAR_URL: &str = "https://scholar.google.com/scholar";
const SOURCE_NAME: &str = "scholar";

/// Scholar serves fixed-size result pages; the requested limit is ignored.
const RESULTS_PER_PAGE: usize = 10;

/// Scraping client for Scholar result pages.
pub struct ScholarSource {
    client: reqwest::Client,
}

impl ScholarSource {
    pub fn new(config: &ScholarConfig) -> Result<Self, SourceError> {
        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| crate::USER_AGENT.to_string());
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PaperSource for ScholarSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch_page(
        &self,
        topic: &str,
        offset: usize,
        _limit: usize,
    ) -> Result<SourcePage, SourceError> {
        let url = format!(
            "{}?q={}&start={}&hl=en",
            SCHOLAR_URL,
            urlencoding::encode(topic),
            offset,
        );
        tracing::debug!("Scholar search URL: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                source: SOURCE_NAME,
                status: status.as_u16(),
            });
        }

        let html = response.text().await.map_err(|e| SourceError::Parse {
            source: SOURCE_NAME,
            message: e.to_string(),
        })?;
        Ok(parse_results_page(&html))
    }
}

/// Parse one Scholar results page into records.
pub fn parse_results_page(html: &str) -> SourcePage {
    let records: Vec<PaperRecord> = result_blocks(html)
        .into_iter()
        .filter_map(|block| parse_result_block(&block))
        .collect();
    // An empty page means the cursor ran off the end of the result set.
    let exhausted = records.len() < RESULTS_PER_PAGE;
    SourcePage { records, exhausted }
}

/// Slice the page into per-result blocks at each `gs_ri` container.
fn result_blocks(html: &str) -> Vec<String> {
    const MARKER: &str = "<div class=\"gs_ri\">";
    let mut blocks = Vec::new();
    let mut search_from = 0;

    while let Some(pos) = html[search_from..].find(MARKER) {
        let start = search_from + pos;
        let after = start + MARKER.len();
        let end = html[after..]
            .find(MARKER)
            .map(|next| after + next)
            .unwrap_or(html.len());
        blocks.push(html[start..end].to_string());
        search_from = end;
    }

    blocks
}

fn parse_result_block(block: &str) -> Option<PaperRecord> {
    let title = extract_between(block, "<h3 class=\"gs_rt\"", "</h3>")
        .map(|raw| clean_title(&raw))
        .filter(|t| !t.is_empty());

    let byline = extract_between(block, "<div class=\"gs_a\"", "</div>")
        .map(|raw| normalize_whitespace(&decode_entities(&strip_tags(&raw))))
        .unwrap_or_default();

    let authors = parse_byline_authors(&byline);
    let year = parse_byline_year(&byline);
    let citation_count = parse_cited_by(block);

    // Blocks with neither title nor byline are navigation debris.
    if title.is_none() && byline.is_empty() {
        return None;
    }

    Some(PaperRecord {
        id: None,
        title,
        authors,
        year,
        citation_count,
        cited_ids: Vec::new(),
    })
}

fn clean_title(raw: &str) -> String {
    let mut title = normalize_whitespace(&decode_entities(&strip_tags(raw)));
    // Drop leading access annotations like "[PDF]" or "[CITATION]".
    while title.starts_with('[') {
        match title.find(']') {
            Some(end) => title = title[end + 1..].trim_start().to_string(),
            None => break,
        }
    }
    title
}

/// Authors are the byline segment before the first " - " separator.
fn parse_byline_authors(byline: &str) -> Vec<String> {
    let segment = byline.split(" - ").next().unwrap_or_default();
    split_authors(segment)
        .into_iter()
        .map(|name| name.trim_matches('…').trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// The publication year is the first plausible 4-digit number in the byline.
fn parse_byline_year(byline: &str) -> Option<i32> {
    let bytes = byline.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i - start == 4
                && let Ok(year) = byline[start..i].parse::<i32>()
                && (1500..=2100).contains(&year)
            {
                return Some(year);
            }
        } else {
            i += 1;
        }
    }
    None
}

fn parse_cited_by(block: &str) -> u64 {
    let Some(pos) = block.find("Cited by ") else {
        return 0;
    };
    block["Cited by ".len() + pos..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

/// Extract the text between `start_marker` (through its closing `>`) and
/// `end_marker`.
fn extract_between(html: &str, start_marker: &str, end_marker: &str) -> Option<String> {
    let start = html.find(start_marker)?;
    let content_start = start + html[start..].find('>')? + 1;
    let content_end = content_start + html[content_start..].find(end_marker)?;
    Some(html[content_start..content_end].to_string())
}

/// Remove every `<...>` tag span, keeping inner text.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Decode the handful of entities Scholar bylines actually use.
fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&hellip;", "…")
        .replace("&#8230;", "…")
}

/// Collapse runs of whitespace into single spaces.
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
