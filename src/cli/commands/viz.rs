use anyhow::{Context, Result};
use console::{Emoji, style};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;
use crate::corpus::SentenceRef;
use crate::render::{ExplorerPage, render_page};

static BROWSER: Emoji<'_, '_> = Emoji("🌐 ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

pub async fn run(
    global: &GlobalArgs,
    document_id: String,
    sentence_id: usize,
    output: Option<PathBuf>,
    no_open: bool,
) -> Result<()> {
    println!();
    println!(
        "{}",
        style(" TextMagnet - Related Ideas ").bold().reverse()
    );
    println!();

    let (config, corpus) = super::load(global).await?;
    let origin = SentenceRef::new(document_id, sentence_id);

    let mut page = ExplorerPage::for_sentence(
        &corpus,
        &origin,
        &config.link_filter(),
        &config.graph_builder(),
    )?;
    page.history = vec![page.title.clone()];

    if let Some(graph) = &page.graph {
        println!(
            "{}{} relations, {} related sentences for {}",
            CHECK,
            style(graph.relation_nodes().count()).green().bold(),
            style(graph.leaves().count()).green().bold(),
            style(&origin).cyan()
        );
    }

    let html = render_page(&page).context("Failed to render the explorer page")?;
    let html_path = output.unwrap_or_else(|| std::env::temp_dir().join("textmagnet_viz.html"));
    write_page(&html_path, &html)?;

    println!(
        "{}Page written to {}",
        SPARKLE,
        style(html_path.display()).cyan().underlined()
    );

    if !no_open {
        open_in_browser(&html_path);
        println!("{}Visualization opened in browser", BROWSER);
    }
    println!();

    Ok(())
}

pub(crate) fn write_page(path: &Path, html: &str) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    file.write_all(html.as_bytes())?;
    Ok(())
}

/// Best effort: a missing opener only means the user opens the file by hand
pub(crate) fn open_in_browser(path: &Path) {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(path).spawn().ok();
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(path).spawn().ok();
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", path.to_str().unwrap_or("")])
            .spawn()
            .ok();
    }
}
