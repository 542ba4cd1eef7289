use anyhow::{Context, Result};
use console::{Emoji, style};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use super::viz::write_page;
use crate::cli::GlobalArgs;
use crate::corpus::{Corpus, CorpusCache, SentenceRef};
use crate::error::AppError;
use crate::render::{excerpt_window, render_page};
use crate::session::{Session, View};

static BOOK: Emoji<'_, '_> = Emoji("📖 ", "");
static HISTORY: Emoji<'_, '_> = Emoji("↺ ", "");
static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[X] ");
static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

const HELP: &str = "\
  titles [FILTER]     list document titles
  open <TITLE>        open a document
  click <DOC|SENT>    show the related ideas of a sentence
  node <KEY|N>        show the excerpt behind a graph leaf, by key or number
  follow              open the document of the shown excerpt
  history [N]         list visited titles, or reopen entry N
  help                show this help
  quit                leave the session";

/// One line of user input
#[derive(Debug, Clone, PartialEq)]
enum Action {
    Titles(Option<String>),
    Open(String),
    Click(String),
    Node(String),
    Follow,
    History(Option<usize>),
    Help,
    Quit,
}

fn parse_action(line: &str) -> std::result::Result<Option<Action>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let arg = |name: &str| {
        if rest.is_empty() {
            Err(format!("'{}' needs an argument", name))
        } else {
            Ok(rest.to_string())
        }
    };

    let action = match verb.to_lowercase().as_str() {
        "titles" | "ls" => Action::Titles((!rest.is_empty()).then(|| rest.to_string())),
        "open" => Action::Open(arg("open")?),
        "click" => Action::Click(arg("click")?),
        "node" => Action::Node(arg("node")?),
        "follow" | "back" => Action::Follow,
        "history" => {
            if rest.is_empty() {
                Action::History(None)
            } else {
                let index = rest
                    .parse()
                    .map_err(|_| format!("'{}' is not a history entry number", rest))?;
                Action::History(Some(index))
            }
        }
        "help" | "?" => Action::Help,
        "quit" | "exit" | "q" => Action::Quit,
        other => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
    };
    Ok(Some(action))
}

pub async fn run(global: &GlobalArgs, html: Option<PathBuf>) -> Result<()> {
    println!();
    println!("{}", style(" TextMagnet - Explorer ").bold().reverse());
    println!();

    let config = super::load_config(global)?;
    let mut cache = config.cache()?;
    let corpus = super::fetch_corpus(&mut cache).await?;
    let mut session = config.session();

    println!(
        "{}{} documents loaded. Type {} for commands.",
        BOOK,
        style(corpus.len()).green().bold(),
        style("help").cyan()
    );
    println!();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{} ", style("textmagnet>").green().bold());
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line.context("Failed to read input")?;

        let action = match parse_action(&line) {
            Ok(Some(action)) => action,
            Ok(None) => continue,
            Err(message) => {
                println!("{}{}", CROSS, style(message).red());
                continue;
            }
        };

        // Refresh the snapshot if it went stale since the last interaction
        let corpus = super::fetch_corpus(&mut cache).await?;
        if let Err(e) = session.revalidate(&corpus) {
            report(&e, &mut cache);
        }

        let outcome = match action {
            Action::Quit => break,
            Action::Help => {
                println!("{}", HELP);
                continue;
            }
            Action::Titles(filter) => {
                list_titles(&corpus, filter.as_deref());
                continue;
            }
            Action::History(None) => {
                list_history(&session);
                continue;
            }
            Action::History(Some(index)) => session.select_history(&corpus, index),
            Action::Open(title) => session.select_title(&corpus, &title),
            Action::Click(id) => session.click_sentence(&corpus, &id),
            Action::Node(key) => session.click_node(&corpus, &key),
            Action::Follow => session.follow_back_link(&corpus),
        };

        let redraw = match outcome {
            Ok(()) => true,
            Err(e) if e.is_recoverable() => {
                report(&e, &mut cache);
                !matches!(e, AppError::InvalidTransition { .. })
            }
            Err(e) => return Err(e.into()),
        };
        if redraw && let Err(e) = show_view(&session, &corpus) {
            redraw_after(&mut session, &corpus, &mut cache, e)?;
        }

        if let Some(path) = &html {
            match session.page(&corpus) {
                Ok(page) => {
                    write_page(path, &render_page(&page)?)?;
                    tracing::debug!("Mirrored view into {}", path.display());
                }
                Err(e) if e.is_recoverable() => {
                    tracing::warn!("View not mirrored into {}: {}", path.display(), e);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    if let Some(path) = &html {
        println!(
            "{}Last view kept at {}",
            SPARKLE,
            style(path.display()).cyan().underlined()
        );
    }
    println!();

    Ok(())
}

/// Print a recoverable error; a lookup miss also marks the snapshot stale
fn report(error: &AppError, cache: &mut CorpusCache) {
    println!("{}{}", CROSS, style(error).red());
    if matches!(error, AppError::LookupMiss { .. }) {
        cache.invalidate();
    }
}

/// The view could not be drawn from the snapshot: report it, fall back to
/// a view the snapshot still holds and draw that instead
fn redraw_after(
    session: &mut Session,
    corpus: &Corpus,
    cache: &mut CorpusCache,
    error: AppError,
) -> Result<()> {
    if !error.is_recoverable() {
        return Err(error.into());
    }
    report(&error, cache);
    let _ = session.revalidate(corpus);
    if let Err(e) = show_view(session, corpus) {
        report(&e, cache);
    }
    Ok(())
}

fn list_titles(corpus: &Corpus, filter: Option<&str>) {
    match super::titles::title_pattern(filter) {
        Ok(pattern) => {
            super::titles::print_titles(&super::titles::matching_titles(corpus, pattern.as_ref()));
        }
        Err(e) => println!("{}{}", CROSS, style(format!("Invalid filter pattern: {}", e)).red()),
    }
}

fn list_history(session: &Session) {
    let history = session.history();
    if !history.is_selectable() {
        println!(
            "{}",
            style("History appears once two documents have been opened.").dim()
        );
        return;
    }
    println!("{}History", HISTORY);
    for (i, title) in history.recent_first().enumerate() {
        println!("  {} {}", style(format!("[{}]", i)).dim(), title);
    }
}

fn show_view(session: &Session, corpus: &Corpus) -> crate::error::Result<()> {
    println!();
    match session.view() {
        View::Idle => println!("{}", style("Nothing open. Try 'titles' and 'open'.").dim()),
        View::Document {
            document_id,
            highlight,
        } => print_document(session, corpus, document_id, *highlight)?,
        View::Graph { graph, .. } => super::graph::print_tree(graph),
        View::Excerpt { key, .. } => {
            let document = corpus.document(&key.target.document_id)?;
            let window = excerpt_window(document, key.target.sentence_id)?;
            println!(
                "{} {}",
                style("●").color256(relation_color(key.relation())),
                key.label.replace('\n', " ")
            );
            let text = window
                .iter()
                .map(|s| {
                    let text = s.text.trim_start_matches("<br>").trim();
                    if s.sentence_id == key.target.sentence_id {
                        style(text).reverse().to_string()
                    } else {
                        text.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            println!("  «{}»", text);
            println!(
                "  → {} {}",
                style(&document.title).cyan().underlined(),
                style("(follow)").dim()
            );
        }
    }
    println!();
    Ok(())
}

fn print_document(
    session: &Session,
    corpus: &Corpus,
    document_id: &str,
    highlight: Option<usize>,
) -> crate::error::Result<()> {
    let document = corpus.document(document_id)?;
    println!("{}", style(&document.title).bold().underlined());
    println!();

    for sentence in &document.sentences {
        let mut text = style(sentence.text.as_str());
        if highlight == Some(sentence.sentence_id) {
            text = text.reverse();
        }
        if session.filter().has_links(&sentence.links) {
            let reference = SentenceRef::new(document.id.as_str(), sentence.sentence_id);
            println!(
                "  {} {}",
                text.underlined(),
                style(format!("[{}]", reference)).dim()
            );
        } else {
            println!("  {}", text);
        }
    }
    Ok(())
}

/// Closest 256-color terminal shade for a relation's leaf color
fn relation_color(relation: Option<crate::corpus::RelationType>) -> u8 {
    use crate::corpus::RelationType::*;
    match relation {
        Some(Equivalent) => 18,
        Some(CauseIs) => 88,
        Some(ConsequenceIs) => 22,
        Some(Similarly) => 220,
        Some(Additionally) => 90,
        Some(ForExample) => 208,
        Some(InterventionIs) => 198,
        Some(TheOppositeIs) => 248,
        None => 7,
    }
}
