use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::corpus::{CorpusCache, DataSource, RelationType};
use crate::graph::builder::DEFAULT_WORDS_PER_LINE;
use crate::graph::{GraphBuilder, LinkFilter};
use crate::session::{DEFAULT_HISTORY_LEN, Session};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path or http(s) URL of the sentence table
    pub source: Option<String>,
    /// Links farther than this are hidden; unset shows everything
    pub max_distance: Option<f64>,
    #[serde(default = "default_relations")]
    pub relations: Vec<RelationType>,
    #[serde(default = "default_words_per_line")]
    pub words_per_line: usize,
    #[serde(default = "default_history_len")]
    pub history_len: usize,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_relations() -> Vec<RelationType> {
    RelationType::ALL.to_vec()
}

fn default_words_per_line() -> usize {
    DEFAULT_WORDS_PER_LINE
}

fn default_history_len() -> usize {
    DEFAULT_HISTORY_LEN
}

fn default_cache_ttl_secs() -> u64 {
    420
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: None,
            max_distance: None,
            relations: default_relations(),
            words_per_line: default_words_per_line(),
            history_len: default_history_len(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Config {
    /// Get the configuration directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("textmagnet");
        Ok(config_dir)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load the configuration file, or the defaults when there is none
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load_from(&Self::config_path()?),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        config.source = config
            .source
            .as_deref()
            .map(expand_env_var)
            .filter(|s| !s.is_empty());

        Ok(config)
    }

    /// Apply command-line flags on top of the file values
    pub fn with_overrides(mut self, data: Option<String>, max_distance: Option<f64>) -> Self {
        if data.is_some() {
            self.source = data;
        }
        if max_distance.is_some() {
            self.max_distance = max_distance;
        }
        self
    }

    pub fn data_source(&self) -> Result<DataSource> {
        let source = self.source.as_deref().context(
            "No data source configured. Pass --data, set TEXTMAGNET_DATA, or set 'source' in the config file",
        )?;
        Ok(DataSource::parse(source))
    }

    pub fn link_filter(&self) -> LinkFilter {
        LinkFilter::new(self.relations.iter().copied(), self.max_distance)
    }

    pub fn graph_builder(&self) -> GraphBuilder {
        GraphBuilder::new(self.words_per_line)
    }

    pub fn cache(&self) -> Result<CorpusCache> {
        Ok(CorpusCache::new(
            self.data_source()?,
            Duration::from_secs(self.cache_ttl_secs),
        ))
    }

    pub fn session(&self) -> Session {
        Session::new(self.link_filter(), self.graph_builder(), self.history_len)
    }
}

/// Expand environment variable references like ${VAR_NAME}
fn expand_env_var(value: &str) -> String {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).unwrap_or_default()
    } else if let Some(var_name) = value.strip_prefix('$') {
        std::env::var(var_name).unwrap_or_default()
    } else {
        value.to_string()
    }
}
