//! Layered configuration for litmap.
//!
//! Uses `figment`: defaults -> user config dir -> `litmap.toml` in the
//! working directory -> `LITMAP_*` environment variables. CLI flags
//! override whatever the layers resolve to.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::types::Query;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LitmapConfig {
    pub search: SearchDefaults,
    pub sources: SourcesConfig,
}

/// Default query parameters applied when the caller does not override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchDefaults {
    pub max_results: usize,
    pub min_citations: u64,
    pub retry_limit: u32,
    pub retry_delay_secs: u64,
    pub sort_by_citations: bool,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            max_results: 10,
            min_citations: 0,
            retry_limit: 3,
            retry_delay_secs: 5,
            sort_by_citations: false,
        }
    }
}

impl SearchDefaults {
    /// Build a query for `topic` seeded with these defaults.
    pub fn query(&self, topic: impl Into<String>) -> Query {
        Query {
            topic: topic.into(),
            max_results: self.max_results,
            min_citations: self.min_citations,
            retry_limit: self.retry_limit,
            retry_delay: Duration::from_secs(self.retry_delay_secs),
            sort_by_citations: self.sort_by_citations,
            ..Query::default()
        }
    }
}

/// Per-adapter settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub semantic_scholar: SemanticScholarConfig,
    pub crossref: CrossrefConfig,
    pub scholar: ScholarConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SemanticScholarConfig {
    /// API key for higher rate limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrossrefConfig {
    /// Polite-pool contact address appended as `mailto`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mailto: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScholarConfig {
    /// Override the user agent sent to the scrape target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Load configuration, layering the workspace file and environment over
/// defaults. An explicit `path` replaces the discovered files and must
/// exist.
pub fn load_config(
    workspace: Option<&Path>,
    path: Option<&Path>,
) -> Result<LitmapConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(LitmapConfig::default()));

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        figment = figment.merge(Toml::file(path));
    } else {
        if let Some(dirs) = directories::ProjectDirs::from("dev", "litmap", "litmap") {
            figment = figment.merge(Toml::file(dirs.config_dir().join("config.toml")));
        }
        if let Some(workspace) = workspace {
            figment = figment.merge(Toml::file(workspace.join("litmap.toml")));
        }
    }

    figment
        .merge(Env::prefixed("LITMAP_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
}
