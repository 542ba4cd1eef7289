//! HTML markup for documents, excerpts and the explorer page.
//!
//! Everything here is a pure function of its inputs: rendering the same
//! document twice yields the same markup.

pub mod document;
pub mod excerpt;
pub mod page;
pub mod styles;

pub use document::render_document;
pub use excerpt::{excerpt_window, render_excerpt, render_excerpt_for_key};
pub use page::{ExplorerPage, render_page};

/// Escape text for use in element content and single- or double-quoted attributes
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
