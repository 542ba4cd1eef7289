use super::escape_html;
use super::styles::{HIGHLIGHTED_SENT, TEXT, TEXT_HYPERLINK};
use crate::corpus::{Document, SentenceRef};
use crate::graph::LinkFilter;

/// Render a full document as a heading plus one paragraph of sentences.
///
/// A sentence is clickable when it still has links after `filter`; its anchor
/// id is the `document_id|sentence_id` reference. List items get a `<br>`
/// before them, and the last item of a list gets one after it. Breaks are kept
/// outside the highlight and the anchor.
pub fn render_document(document: &Document, highlight: Option<usize>, filter: &LinkFilter) -> String {
    let sentences = &document.sentences;
    let mut pieces = Vec::with_capacity(sentences.len());

    for (i, sentence) in sentences.iter().enumerate() {
        let mut piece = escape_html(&sentence.text);

        if highlight == Some(sentence.sentence_id) {
            piece = format!("<mark style='{}'>{}</mark>", HIGHLIGHTED_SENT, piece);
        }

        if filter.has_links(&sentence.links) {
            let reference = SentenceRef::new(document.id.as_str(), sentence.sentence_id);
            piece = format!(
                "<a style='{}' href='#' id='{}'>{}</a>",
                TEXT_HYPERLINK,
                escape_html(&reference.to_string()),
                piece
            );
        }

        if sentence.is_list_item() {
            let closes_list = sentences
                .get(i + 1)
                .is_none_or(|next| !next.is_list_item());
            piece = if closes_list {
                format!("<br>{}<br>", piece)
            } else {
                format!("<br>{}", piece)
            };
        }

        pieces.push(piece);
    }

    format!(
        "<h2>{}</h2><p style='{}'>{}</p>",
        escape_html(&document.title),
        TEXT,
        pieces.join(" ")
    )
}
