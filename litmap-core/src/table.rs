//! Flattened tabular projection of accepted records.

use crate::types::PaperRecord;

/// Placeholder substituted for absent fields.
const ABSENT: &str = "N/A";

/// One display row per accepted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub title: String,
    pub authors: String,
    pub year: String,
    pub citations: String,
}

/// Project records into rows, one per record in order, `N/A` for any
/// absent title/authors/year. Citation counts default to zero upstream,
/// so they always print as a number.
pub fn tabulate(records: &[PaperRecord]) -> Vec<TableRow> {
    records
        .iter()
        .map(|record| TableRow {
            title: record
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(ABSENT)
                .to_string(),
            authors: if record.authors.is_empty() {
                ABSENT.to_string()
            } else {
                record.authors.join(", ")
            },
            year: record
                .year
                .map(|y| y.to_string())
                .unwrap_or_else(|| ABSENT.to_string()),
            citations: record.citation_count.to_string(),
        })
        .collect()
}

/// Render rows as a column-aligned text table with a header line.
pub fn render_table(rows: &[TableRow]) -> String {
    let headers = ["Title", "Authors", "Year", "Citations"];
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        widths[0] = widths[0].max(row.title.chars().count());
        widths[1] = widths[1].max(row.authors.chars().count());
        widths[2] = widths[2].max(row.year.chars().count());
        widths[3] = widths[3].max(row.citations.chars().count());
    }

    let mut out = String::new();
    let line = |cells: [&str; 4], widths: &[usize]| -> String {
        format!(
            "{:<w0$}  {:<w1$}  {:<w2$}  {:<w3$}",
            cells[0],
            cells[1],
            cells[2],
            cells[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
        )
    };

    out.push_str(line(headers, &widths).trim_end());
    out.push('\n');
    for row in rows {
        let cells = [
            row.title.as_str(),
            row.authors.as_str(),
            row.year.as_str(),
            row.citations.as_str(),
        ];
        out.push_str(line(cells, &widths).trim_end());
        out.push('\n');
    }
    out
}
