//! Inline styles shared by the rendered markup.

/// Paragraph holding a full document
pub const TEXT: &str =
    "line-height: 2.5; padding-right: 15px; overflow-y: scroll; max-height:450px;";

/// Highlighted sentence
pub const HIGHLIGHTED_SENT: &str = "background-color: #cde8f7";

/// Clickable sentence
pub const TEXT_HYPERLINK: &str =
    "text-decoration: underline; text-decoration-thickness: 0.2px; color: #262730;";

/// Paragraph holding an excerpt
pub const GOAL_TEXT: &str = "padding-left:20px; line-height: 1.6;";

/// Stylesheet for the relation badge shown above an excerpt
pub const BADGE_CSS: &str = r#"
@keyframes blink { 0% { opacity: 0; } 50% { opacity: 1; } 100% { opacity: 0; } }
.badge-dot { animation: blink 3s linear infinite; font-size: 33px; padding-left: 20px; vertical-align: middle; line-height: 0.5; }
.badge-text { font-size: 16px; font-family: 'Arial', sans-serif; vertical-align: middle; }
"#;
