//! Core library for litmap — scholarly search retrieval and literature
//! graph assembly.
//!
//! Pulls candidate papers from a search source (Semantic Scholar, Crossref,
//! or a Scholar scrape), filters them by citation count and year range with
//! a bounded retry budget, and assembles co-authorship or citation graphs
//! from the accepted set. The rendering layer on top only ever consumes the
//! flattened table rows and the graph's nodes and edges.

pub mod config;
pub mod error;
pub mod graph;
pub mod retriever;
pub mod sources;
pub mod table;
pub mod types;

pub use error::{LitmapError, Result};
pub use graph::{GraphMode, PaperGraph, assemble};
pub use retriever::{Retrieval, retrieve};
pub use types::{PaperRecord, Query};

/// User agent sent on outbound search calls.
pub const USER_AGENT: &str = "litmap/0.2 (https://github.com/litmap/litmap)";
