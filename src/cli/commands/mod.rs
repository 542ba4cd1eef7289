pub mod excerpt;
pub mod explore;
pub mod graph;
pub mod init;
pub mod read;
pub mod stats;
pub mod titles;
pub mod viz;

use anyhow::{Context, Result};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

use crate::cli::GlobalArgs;
use crate::config::Config;
use crate::corpus::{Corpus, CorpusCache};

static BOOKS: Emoji<'_, '_> = Emoji("📚 ", "");

/// Config file merged with the global flags
pub fn load_config(global: &GlobalArgs) -> Result<Config> {
    let config = Config::load(global.config.as_deref())
        .context("Failed to load configuration")?
        .with_overrides(global.data.clone(), global.max_distance);
    Ok(config)
}

/// Fetch a snapshot through the cache, with a spinner while the source loads
pub async fn fetch_corpus(cache: &mut CorpusCache) -> Result<Arc<Corpus>> {
    if !cache.is_stale() {
        return Ok(cache.get().await?);
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template(&format!("{}{{spinner:.green}} {{msg}}", BOOKS))
            .context("Invalid spinner template")?,
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Loading sentences from {}...", cache.source()));

    let corpus = cache.get().await;
    spinner.finish_and_clear();

    corpus.with_context(|| format!("Failed to load data from {}", cache.source()))
}

/// Config plus a freshly loaded corpus, for one-shot commands
pub async fn load(global: &GlobalArgs) -> Result<(Config, Arc<Corpus>)> {
    let config = load_config(global)?;
    let mut cache = config.cache()?;
    let corpus = fetch_corpus(&mut cache).await?;
    Ok((config, corpus))
}
