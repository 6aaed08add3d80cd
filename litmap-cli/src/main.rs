//! litmap CLI — search a topic, filter by citations and year, and print
//! the result table plus a literature graph summary.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use litmap_core::config::load_config;
use litmap_core::graph::{GraphMode, assemble};
use litmap_core::retriever::retrieve;
use litmap_core::sources::{SourceKind, build_source};
use litmap_core::table::{render_table, tabulate};

/// Litmap: literature search and citation graphs from the terminal
#[derive(Parser, Debug)]
#[command(name = "litmap", version, about, long_about = None)]
struct Cli {
    /// Topic to search for
    topic: String,

    /// Search source: semantic-scholar, crossref, scholar
    #[arg(short, long, default_value = "semantic-scholar")]
    source: String,

    /// Maximum number of accepted results
    #[arg(short = 'n', long)]
    max_results: Option<usize>,

    /// Minimum citation count for a result to be accepted
    #[arg(long)]
    min_citations: Option<u64>,

    /// Earliest publication year to accept
    #[arg(long, value_name = "YEAR")]
    from: Option<i32>,

    /// Latest publication year to accept
    #[arg(long, value_name = "YEAR")]
    to: Option<i32>,

    /// Transient-failure retries before giving up
    #[arg(long)]
    retries: Option<u32>,

    /// Seconds to wait between retry attempts
    #[arg(long, value_name = "SECS")]
    retry_delay: Option<u64>,

    /// Sort accepted results by citation count, descending
    #[arg(long)]
    sort_by_citations: bool,

    /// Graph mode: coauthors, citations
    #[arg(short, long, default_value = "coauthors")]
    graph: String,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress the edge listing and non-essential output
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "litmap", "litmap")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "litmap.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let kind = SourceKind::from_str_loose(&cli.source)
        .ok_or_else(|| anyhow::anyhow!("Unknown source '{}'", cli.source))?;
    let mode = GraphMode::from_str_loose(&cli.graph)
        .ok_or_else(|| anyhow::anyhow!("Unknown graph mode '{}'", cli.graph))?;

    let workspace = std::env::current_dir().ok();
    let config = load_config(workspace.as_deref(), cli.config.as_deref())?;

    let mut query = config.search.query(&cli.topic);
    if let Some(n) = cli.max_results {
        query.max_results = n;
    }
    if let Some(min) = cli.min_citations {
        query.min_citations = min;
    }
    query.start_year = cli.from.or(query.start_year);
    query.end_year = cli.to.or(query.end_year);
    if let Some(retries) = cli.retries {
        query.retry_limit = retries;
    }
    if let Some(secs) = cli.retry_delay {
        query.retry_delay = Duration::from_secs(secs);
    }
    if cli.sort_by_citations {
        query.sort_by_citations = true;
    }

    let source = build_source(kind, &config.sources)?;

    // Ctrl-C aborts the fetch loop, including mid-retry-sleep.
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, cancelling retrieval");
            signal_cancel.cancel();
        }
    });

    tracing::info!(source = kind.as_str(), topic = %query.topic, "searching");
    let retrieval = retrieve(source.as_ref(), &query, &cancel).await?;

    if !retrieval.complete {
        tracing::warn!(
            accepted = retrieval.records.len(),
            requested = query.max_results,
            failures = retrieval.transient_failures,
            "source ran dry before the quota was reached"
        );
    }

    let rows = tabulate(&retrieval.records);
    print!("{}", render_table(&rows));

    let graph = assemble(&retrieval.records, mode);
    println!();
    println!(
        "Graph ({}): {} nodes, {} edges",
        mode.as_str(),
        graph.node_count(),
        graph.edge_count()
    );
    if !cli.quiet {
        for (a, b) in graph.edges() {
            println!("  {} -- {}", a.label, b.label);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_full_invocation() {
        let cli = Cli::parse_from([
            "litmap",
            "graph neural networks",
            "--source",
            "crossref",
            "-n",
            "5",
            "--min-citations",
            "100",
            "--from",
            "2018",
            "--to",
            "2024",
            "--retries",
            "1",
            "--retry-delay",
            "2",
            "--sort-by-citations",
            "--graph",
            "citations",
        ]);
        assert_eq!(cli.topic, "graph neural networks");
        assert_eq!(cli.source, "crossref");
        assert_eq!(cli.max_results, Some(5));
        assert_eq!(cli.min_citations, Some(100));
        assert_eq!(cli.from, Some(2018));
        assert_eq!(cli.to, Some(2024));
        assert_eq!(cli.retries, Some(1));
        assert_eq!(cli.retry_delay, Some(2));
        assert!(cli.sort_by_citations);
        assert_eq!(cli.graph, "citations");
    }
}
