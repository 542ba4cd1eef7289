use std::fmt;
use std::str::FromStr;

use crate::corpus::{RelationType, SentenceRef};
use crate::error::{AppError, Result};

/// Identity of a leaf node: `document_id|sentence_id|color|label`.
///
/// The color tells which relation produced the leaf, the label keeps two
/// leaves pointing at the same sentence apart. Decoding splits on the first
/// three `|` only, so labels may contain the separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeKey {
    pub target: SentenceRef,
    pub color: String,
    pub label: String,
}

impl NodeKey {
    pub fn new(target: SentenceRef, relation: RelationType, label: impl Into<String>) -> Self {
        Self {
            target,
            color: relation.end_color().to_string(),
            label: label.into(),
        }
    }

    /// Relation whose leaf color this key carries
    pub fn relation(&self) -> Option<RelationType> {
        RelationType::from_end_color(&self.color)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.target.document_id, self.target.sentence_id, self.color, self.label
        )
    }
}

impl FromStr for NodeKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(4, '|');
        let (Some(document_id), Some(sentence_id), Some(color), Some(label)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(AppError::malformed(
                s,
                "expected 'document_id|sentence_id|color|label'",
            ));
        };

        let target: SentenceRef = format!("{}|{}", document_id, sentence_id)
            .parse()
            .map_err(|_| AppError::malformed(s, "invalid linked sentence"))?;

        if RelationType::from_end_color(color).is_none() {
            return Err(AppError::malformed(s, format!("unknown node color '{}'", color)));
        }

        Ok(Self {
            target,
            color: color.to_string(),
            label: label.to_string(),
        })
    }
}
