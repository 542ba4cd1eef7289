use super::escape_html;
use super::styles::{GOAL_TEXT, HIGHLIGHTED_SENT};
use crate::corpus::{Corpus, Document, Sentence};
use crate::error::{AppError, Result};
use crate::graph::NodeKey;

/// Number of sentences shown before the target sentence
pub const CONTEXT_SENTENCES: usize = 2;

/// The target sentence and up to `CONTEXT_SENTENCES` sentences before it
pub fn excerpt_window(document: &Document, target_sentence_id: usize) -> Result<&[Sentence]> {
    let end = document.position(target_sentence_id).ok_or_else(|| {
        AppError::lookup_miss(format!("sentence {}|{}", document.id, target_sentence_id))
    })?;
    let start = end.saturating_sub(CONTEXT_SENTENCES);
    Ok(&document.sentences[start..=end])
}

/// Render the excerpt a graph leaf points at.
///
/// The window is flattened into prose, the target sentence is highlighted and
/// a back-link (anchor id = document id) leads to the full document. A badge in
/// `accent_color` names the leaf that was clicked.
pub fn render_excerpt(
    document: &Document,
    target_sentence_id: usize,
    accent_color: &str,
    node_label: &str,
) -> Result<String> {
    let window = excerpt_window(document, target_sentence_id)?;

    let body = window
        .iter()
        .map(|sentence| {
            let text = escape_html(strip_list_break(&sentence.text));
            if sentence.sentence_id == target_sentence_id {
                format!("<mark style='{}'>{}</mark>", HIGHLIGHTED_SENT, text)
            } else {
                text
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    Ok(format!(
        "{}<p style='{}'>«{}» → <a href='#' id='{}'>{}</a></p>",
        badge(accent_color, node_label),
        GOAL_TEXT,
        body,
        escape_html(&document.id),
        escape_html(&document.title)
    ))
}

/// Excerpt for a clicked leaf, looked up by its node key
pub fn render_excerpt_for_key(corpus: &Corpus, key: &NodeKey) -> Result<String> {
    let document = corpus.document(&key.target.document_id)?;
    render_excerpt(document, key.target.sentence_id, &key.color, &key.label)
}

fn badge(color: &str, label: &str) -> String {
    format!(
        "<p class='relation-badge'><span class='badge-dot' style='color: {}'>●</span><span class='badge-text'> {}</span></p>",
        escape_html(color),
        escape_html(&label.replace('\n', " "))
    )
}

/// Drop `<br>` markup left in front of a list item
fn strip_list_break(text: &str) -> &str {
    let mut text = text.trim_start();
    while let Some(rest) = text.strip_prefix("<br>") {
        text = rest.trim_start();
    }
    text
}
