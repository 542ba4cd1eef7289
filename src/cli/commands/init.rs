use anyhow::{Context, Result};
use console::{Emoji, style};
use std::fs;
use std::path::PathBuf;

use crate::config::Config;

static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

pub async fn run(force: bool, config_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("{}", style(" TextMagnet - Initialization ").bold().reverse());
    println!();

    let config_path = match config_path {
        Some(path) => path,
        None => Config::config_path()?,
    };

    if config_path.exists() && !force {
        println!(
            "{}Configuration already exists at {}",
            WARN,
            style(config_path.display()).cyan()
        );
        println!("  Use {} to overwrite", style("--force").yellow());
        return Ok(());
    }

    if let Some(dir) = config_path.parent() {
        fs::create_dir_all(dir).context("Failed to create config directory")?;
    }

    let default_config = Config {
        source: Some("${TEXTMAGNET_DATA}".to_string()),
        ..Config::default()
    };
    let config_content = toml::to_string_pretty(&default_config)?;
    fs::write(&config_path, config_content).context("Failed to write config file")?;

    println!(
        "{}Created configuration at {}",
        CHECK,
        style(config_path.display()).cyan()
    );

    println!();
    println!("{}", style("━".repeat(50)).dim());
    println!();
    println!("{}Next steps:", ROCKET);
    println!();
    println!("  Point TextMagnet at your sentence table:");
    println!(
        "    {} export TEXTMAGNET_DATA=./sentences.csv",
        style("$").dim()
    );
    println!();
    println!("  Start exploring:");
    println!("    {} textmagnet titles", style("$").dim());
    println!("    {} textmagnet explore", style("$").dim());
    println!();

    Ok(())
}
