use anyhow::{Context, Result};
use console::{Emoji, style};
use std::fs;
use std::path::PathBuf;

use crate::cli::GlobalArgs;
use crate::render::render_document;

static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");

pub async fn run(
    global: &GlobalArgs,
    title: String,
    highlight: Option<usize>,
    output: Option<PathBuf>,
) -> Result<()> {
    let (config, corpus) = super::load(global).await?;

    let document = corpus.document_by_title(&title)?;
    if let Some(id) = highlight
        && document.sentence(id).is_none()
    {
        tracing::warn!("Document '{}' has no sentence {}", document.id, id);
    }

    let markup = render_document(document, highlight, &config.link_filter());

    match output {
        Some(path) => {
            fs::write(&path, &markup)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{}Wrote '{}' to {}",
                CHECK,
                document.title,
                style(path.display()).cyan()
            );
        }
        None => println!("{}", markup),
    }

    Ok(())
}
