pub mod cache;
pub mod links;
pub mod relation;
pub mod source;

use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, Result};

pub use cache::CorpusCache;
pub use links::{Link, LinkMap};
pub use relation::RelationType;
pub use source::DataSource;

/// Prefix that marks a sentence as an item of a dotted list
pub const LIST_MARKER: &str = "- ";

/// One sentence of a document with its precomputed links
#[derive(Debug, Clone, Serialize)]
pub struct Sentence {
    pub sentence_id: usize,
    pub text: String,
    pub links: LinkMap,
}

impl Sentence {
    pub fn is_list_item(&self) -> bool {
        self.text.starts_with(LIST_MARKER)
    }
}

/// A titled document: its sentences in reading order
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub sentences: Vec<Sentence>,
}

impl Document {
    /// Index of a sentence within `sentences`
    pub fn position(&self, sentence_id: usize) -> Option<usize> {
        self.sentences
            .binary_search_by_key(&sentence_id, |s| s.sentence_id)
            .ok()
    }

    pub fn sentence(&self, sentence_id: usize) -> Option<&Sentence> {
        self.position(sentence_id).map(|i| &self.sentences[i])
    }
}

/// A flat row as read from the data source, links already decoded
#[derive(Debug, Clone)]
pub struct SentenceRow {
    pub document_id: String,
    pub title: String,
    pub sentence_id: usize,
    pub text: String,
    pub links: LinkMap,
}

/// Reference to one sentence, encoded as `document_id|sentence_id` in markup
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SentenceRef {
    pub document_id: String,
    pub sentence_id: usize,
}

impl SentenceRef {
    pub fn new(document_id: impl Into<String>, sentence_id: usize) -> Self {
        Self {
            document_id: document_id.into(),
            sentence_id,
        }
    }
}

impl fmt::Display for SentenceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.document_id, self.sentence_id)
    }
}

impl FromStr for SentenceRef {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let (document_id, sentence_id) = s
            .rsplit_once('|')
            .ok_or_else(|| AppError::malformed(s, "expected 'document_id|sentence_id'"))?;
        if document_id.is_empty() {
            return Err(AppError::malformed(s, "empty document id"));
        }
        let sentence_id = sentence_id
            .trim()
            .parse()
            .map_err(|_| AppError::malformed(s, "sentence id is not a number"))?;
        Ok(Self::new(document_id, sentence_id))
    }
}

/// Read-only snapshot of the whole dataset
#[derive(Debug, Default)]
pub struct Corpus {
    documents: BTreeMap<String, Document>,
    /// title -> document id
    titles: BTreeMap<String, String>,
    dropped_links: usize,
}

impl Corpus {
    /// Group rows into documents.
    ///
    /// Fails when a `(document_id, sentence_id)` pair appears twice.
    pub fn from_rows(rows: Vec<SentenceRow>, source_name: &str) -> Result<Self> {
        let mut documents: BTreeMap<String, Document> = BTreeMap::new();

        for row in rows {
            let document = documents
                .entry(row.document_id.clone())
                .or_insert_with(|| Document {
                    id: row.document_id.clone(),
                    title: String::new(),
                    sentences: Vec::new(),
                });
            if document.title.is_empty() {
                document.title = row.title.trim().to_string();
            }
            document.sentences.push(Sentence {
                sentence_id: row.sentence_id,
                text: row.text,
                links: row.links,
            });
        }

        let mut titles = BTreeMap::new();
        for document in documents.values_mut() {
            document.sentences.sort_by_key(|s| s.sentence_id);
            if let Some(pair) = document
                .sentences
                .windows(2)
                .find(|pair| pair[0].sentence_id == pair[1].sentence_id)
            {
                return Err(AppError::data_load(
                    source_name,
                    format!(
                        "sentence {} appears twice in document '{}'",
                        pair[0].sentence_id, document.id
                    ),
                ));
            }

            if document.title.is_empty() {
                tracing::warn!("Document '{}' has no title, using its id", document.id);
                document.title = document.id.clone();
            }
            match titles.entry(document.title.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(document.id.clone());
                }
                Entry::Occupied(slot) => {
                    tracing::warn!(
                        "Title '{}' is shared by documents '{}' and '{}'; keeping the first",
                        document.title,
                        slot.get(),
                        document.id
                    );
                }
            }
        }

        Ok(Self {
            documents,
            titles,
            dropped_links: 0,
        })
    }

    pub(crate) fn with_dropped_links(mut self, dropped: usize) -> Self {
        self.dropped_links = dropped;
        self
    }

    /// Malformed link entries discarded while loading
    pub fn dropped_links(&self) -> usize {
        self.dropped_links
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    /// Titles in sorted order
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.titles.keys().map(String::as_str)
    }

    pub fn document(&self, document_id: &str) -> Result<&Document> {
        self.documents
            .get(document_id)
            .ok_or_else(|| AppError::lookup_miss(format!("document '{}'", document_id)))
    }

    pub fn document_by_title(&self, title: &str) -> Result<&Document> {
        let id = self
            .titles
            .get(title)
            .ok_or_else(|| AppError::lookup_miss(format!("title '{}'", title)))?;
        self.document(id)
    }

    pub fn sentence(&self, reference: &SentenceRef) -> Result<(&Document, &Sentence)> {
        let document = self.document(&reference.document_id)?;
        let sentence = document
            .sentence(reference.sentence_id)
            .ok_or_else(|| AppError::lookup_miss(format!("sentence {}", reference)))?;
        Ok((document, sentence))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn link(doc: &str, sent: usize, keywords: &str, distance: f64) -> Link {
        Link {
            linked_document_id: doc.to_string(),
            linked_sentence_id: sent,
            linked_keywords: keywords.to_string(),
            distance,
        }
    }

    pub fn row(doc: &str, title: &str, sent: usize, text: &str, links: LinkMap) -> SentenceRow {
        SentenceRow {
            document_id: doc.to_string(),
            title: title.to_string(),
            sentence_id: sent,
            text: text.to_string(),
            links,
        }
    }

    /// Two short documents; `cat` sentence 1 links into `surg`
    pub fn corpus() -> Corpus {
        let mut links = LinkMap::new();
        links.insert(
            RelationType::ConsequenceIs,
            vec![link("surg", 1, "surgery helps you see", 0.42)],
        );
        links.insert(
            RelationType::Similarly,
            vec![link("surg", 0, "eye surgery", 0.9)],
        );

        let rows = vec![
            row("cat", "Cataract", 0, "A cataract is a clouding of the lens.", LinkMap::new()),
            row("cat", "Cataract", 1, "It makes vision blurry.", links),
            row("cat", "Cataract", 2, "- treat with surgery", LinkMap::new()),
            row("cat", "Cataract", 3, "- wear sunglasses", LinkMap::new()),
            row("cat", "Cataract", 4, "Ask your doctor.", LinkMap::new()),
            row("surg", "Eye surgery", 0, "Surgery replaces the lens.", LinkMap::new()),
            row("surg", "Eye surgery", 1, "Surgery helps you see clearly again.", LinkMap::new()),
            row("surg", "Eye surgery", 2, "Recovery takes weeks.", LinkMap::new()),
        ];
        Corpus::from_rows(rows, "fixture").unwrap()
    }
}
