//! Typed link records and the decoding of the serialized `links` column.
//!
//! The upstream pipeline writes the column either as JSON or as a Python
//! literal (`{'SIMILARLY': [{'linked_doc_id': 'a1', 'dist': 0.31}], 'CAUSE_IS': None}`).
//! Both are decoded here, once, at load time. Entries that cannot be decoded
//! into a [`Link`] under a known [`RelationType`] are dropped and counted.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::relation::RelationType;

/// A candidate link from one sentence to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub linked_document_id: String,
    pub linked_sentence_id: usize,
    pub linked_keywords: String,
    pub distance: f64,
}

/// Links of one sentence grouped by relation, iterated in canonical order
pub type LinkMap = BTreeMap<RelationType, Vec<Link>>;

/// Result of decoding one `links` cell
#[derive(Debug, Default)]
pub struct DecodedLinks {
    pub links: LinkMap,
    /// Number of entries that were dropped as malformed
    pub dropped: usize,
}

/// Decode a `links` cell that came in as a JSON value.
///
/// Strings are treated as serialized mappings; `null` and empty strings mean
/// "no links".
pub fn decode_links_value(value: &Value) -> DecodedLinks {
    match value {
        Value::Null => DecodedLinks::default(),
        Value::String(text) => decode_links_text(text),
        Value::Object(map) => decode_links_object(map),
        other => {
            tracing::debug!("Dropping links cell that is not a mapping: {}", other);
            DecodedLinks {
                links: LinkMap::new(),
                dropped: 1,
            }
        }
    }
}

/// Decode a serialized `links` cell (JSON or Python-literal dialect).
pub fn decode_links_text(text: &str) -> DecodedLinks {
    let text = text.trim();
    if text.is_empty() || text == "None" || text == "null" || text == "{}" {
        return DecodedLinks::default();
    }

    let parsed = serde_json::from_str::<Value>(text)
        .or_else(|_| serde_json::from_str::<Value>(&python_literal_to_json(text)));

    match parsed {
        Ok(value @ Value::Object(_)) => decode_links_value(&value),
        Ok(_) | Err(_) => {
            tracing::debug!("Dropping undecodable links cell: {}", text);
            DecodedLinks {
                links: LinkMap::new(),
                dropped: 1,
            }
        }
    }
}

fn decode_links_object(map: &serde_json::Map<String, Value>) -> DecodedLinks {
    let mut decoded = DecodedLinks::default();

    for (key, entries) in map {
        let relation = match key.parse::<RelationType>() {
            Ok(relation) => relation,
            Err(e) => {
                tracing::debug!("Dropping links: {}", e);
                decoded.dropped += 1;
                continue;
            }
        };

        let items = match entries {
            Value::Null => continue,
            Value::Array(items) => items,
            _ => {
                tracing::debug!("Dropping {} links that are not a list", relation);
                decoded.dropped += 1;
                continue;
            }
        };

        let mut links = Vec::with_capacity(items.len());
        for item in items {
            match decode_link(item) {
                Some(link) => links.push(link),
                None => {
                    tracing::debug!("Dropping malformed {} link: {}", relation, item);
                    decoded.dropped += 1;
                }
            }
        }

        if !links.is_empty() {
            decoded.links.entry(relation).or_default().extend(links);
        }
    }

    decoded
}

/// Decode one link object, accepting both column naming schemes
fn decode_link(item: &Value) -> Option<Link> {
    let object = item.as_object()?;

    let linked_document_id =
        value_to_id(first_field(object, &["linked_document_id", "linked_doc_id"])?)?;
    let linked_sentence_id =
        value_to_index(first_field(object, &["linked_sentence_id", "linked_sent_id"])?)?;
    let linked_keywords = match first_field(object, &["linked_keywords"]) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Null) | None => String::new(),
        Some(_) => return None,
    };
    let distance = first_field(object, &["distance", "dist"])?.as_f64()?;

    if !distance.is_finite() || distance < 0.0 {
        return None;
    }

    Some(Link {
        linked_document_id,
        linked_sentence_id,
        linked_keywords,
        distance,
    })
}

fn first_field<'a>(
    object: &'a serde_json::Map<String, Value>,
    names: &[&str],
) -> Option<&'a Value> {
    names.iter().find_map(|name| object.get(*name))
}

/// Read an opaque identifier that may have been written as a string or a number
pub(crate) fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a non-negative index that may have been written as `3`, `3.0` or `"3"`
pub(crate) fn value_to_index(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().and_then(float_to_index))
            .and_then(|v| usize::try_from(v).ok()),
        Value::String(s) => parse_index(s),
        _ => None,
    }
}

/// Parse an index from text, accepting spreadsheet-style `3.0`
pub(crate) fn parse_index(text: &str) -> Option<usize> {
    let text = text.trim();
    text.parse::<usize>().ok().or_else(|| {
        text.parse::<f64>()
            .ok()
            .and_then(float_to_index)
            .and_then(|v| usize::try_from(v).ok())
    })
}

fn float_to_index(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0).then_some(value as u64)
}

/// Rewrite a Python literal (dict/list/str/None/True/False) as JSON text.
///
/// Single-quoted strings become double-quoted, `None`/`nan` become `null`.
/// Anything else is passed through untouched, so invalid input stays invalid.
pub fn python_literal_to_json(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len() + 16);
    let mut chars = literal.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                let quote = c;
                out.push('"');
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => match chars.next() {
                            Some('\'') => out.push('\''),
                            Some(escaped) => {
                                out.push('\\');
                                out.push(escaped);
                            }
                            None => out.push('\\'),
                        },
                        '"' if quote == '\'' => out.push_str("\\\""),
                        c if c == quote => break,
                        c => out.push(c),
                    }
                }
                out.push('"');
            }
            c if c.is_ascii_alphabetic() => {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        word.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                out.push_str(match word.as_str() {
                    "None" | "nan" | "NaN" | "inf" => "null",
                    "True" => "true",
                    "False" => "false",
                    other => other,
                });
            }
            c => out.push(c),
        }
    }

    out
}
