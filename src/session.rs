//! Per-session navigation state: the current view and the title history.
//!
//! A `Session` is created when a session starts, passed to every handler and
//! dropped when the session ends. Handlers take the corpus snapshot explicitly,
//! so a refreshed snapshot can be swapped in between interactions.

use std::collections::VecDeque;

use crate::corpus::{Corpus, SentenceRef};
use crate::error::{AppError, Result};
use crate::graph::{GraphBuilder, IdeaGraph, LinkFilter, NodeKey, NodeKind, related_ideas};
use crate::render::{ExplorerPage, render_excerpt_for_key};

/// Default number of titles kept in the history
pub const DEFAULT_HISTORY_LEN: usize = 10;

/// Bounded FIFO of visited titles, oldest first
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<String>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a title, dropping the oldest ones past capacity. No dedup.
    pub fn record(&mut self, title: impl Into<String>) {
        self.entries.push_back(title.into());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn recent_first(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().rev().map(String::as_str)
    }

    /// The selector is only offered once there is something to go back to
    pub fn is_selectable(&self) -> bool {
        self.entries.len() >= 2
    }

    /// Entry at `index` counted from the most recent one
    pub fn recent(&self, index: usize) -> Option<&str> {
        self.recent_first().nth(index)
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}

/// What the session currently shows
#[derive(Debug, Clone)]
pub enum View {
    Idle,
    Document {
        document_id: String,
        highlight: Option<usize>,
    },
    Graph {
        origin: SentenceRef,
        graph: IdeaGraph,
    },
    Excerpt {
        origin: SentenceRef,
        graph: IdeaGraph,
        key: NodeKey,
    },
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Idle => "idle",
            View::Document { .. } => "viewing a document",
            View::Graph { .. } => "viewing a graph",
            View::Excerpt { .. } => "viewing an excerpt",
        }
    }

    /// Document shown on the left-hand side, if any
    pub fn document_id(&self) -> Option<&str> {
        match self {
            View::Idle => None,
            View::Document { document_id, .. } => Some(document_id),
            View::Graph { origin, .. } | View::Excerpt { origin, .. } => {
                Some(&origin.document_id)
            }
        }
    }

    pub fn highlight(&self) -> Option<usize> {
        match self {
            View::Idle => None,
            View::Document { highlight, .. } => *highlight,
            View::Graph { origin, .. } | View::Excerpt { origin, .. } => Some(origin.sentence_id),
        }
    }

    pub fn graph(&self) -> Option<&IdeaGraph> {
        match self {
            View::Graph { graph, .. } | View::Excerpt { graph, .. } => Some(graph),
            _ => None,
        }
    }
}

pub struct Session {
    view: View,
    history: History,
    filter: LinkFilter,
    builder: GraphBuilder,
}

impl Session {
    pub fn new(filter: LinkFilter, builder: GraphBuilder, history_len: usize) -> Self {
        Self {
            view: View::Idle,
            history: History::new(history_len),
            filter,
            builder,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn filter(&self) -> &LinkFilter {
        &self.filter
    }

    /// Open a document by title. Allowed from any state.
    pub fn select_title(&mut self, corpus: &Corpus, title: &str) -> Result<()> {
        let document = match corpus.document_by_title(title) {
            Ok(document) => document,
            Err(e) => return Err(self.recover(corpus, e)),
        };
        tracing::debug!("Opening '{}'", document.title);
        self.view = View::Document {
            document_id: document.id.clone(),
            highlight: None,
        };
        self.history.record(document.title.clone());
        Ok(())
    }

    /// Re-open the history entry at `index` (0 = most recent) without recording it again
    pub fn select_history(&mut self, corpus: &Corpus, index: usize) -> Result<()> {
        if !self.history.is_selectable() {
            return Err(AppError::InvalidTransition {
                action: "select a history entry",
                state: "the history holds fewer than 2 titles",
            });
        }
        let Some(title) = self.history.recent(index).map(str::to_string) else {
            let miss = AppError::lookup_miss(format!("history entry {}", index));
            return Err(self.recover(corpus, miss));
        };
        let document = match corpus.document_by_title(&title) {
            Ok(document) => document,
            Err(e) => return Err(self.recover(corpus, e)),
        };
        self.view = View::Document {
            document_id: document.id.clone(),
            highlight: None,
        };
        Ok(())
    }

    /// Open the related-idea graph of a clicked sentence (`document_id|sentence_id`)
    pub fn click_sentence(&mut self, corpus: &Corpus, sentence_id: &str) -> Result<()> {
        let Some(shown) = self.view.document_id() else {
            return Err(self.invalid("open a sentence"));
        };
        let origin: SentenceRef = sentence_id.parse()?;
        if origin.document_id != shown {
            return Err(self.invalid("open a sentence of another document"));
        }

        let sentence = match corpus.sentence(&origin) {
            Ok((_, sentence)) => sentence,
            Err(e) => return Err(self.recover(corpus, e)),
        };
        if !self.filter.has_links(&sentence.links) {
            return Err(self.invalid("open a sentence without related ideas"));
        }

        let graph = related_ideas(corpus, &origin, &self.filter, &self.builder)?;
        self.view = View::Graph { origin, graph };
        Ok(())
    }

    /// Open the excerpt behind a clicked leaf of the displayed graph.
    ///
    /// `node_id` is a leaf id, the same id typed on one line, or the leaf's
    /// 1-based position in the graph.
    pub fn click_node(&mut self, corpus: &Corpus, node_id: &str) -> Result<()> {
        let Some(graph) = self.view.graph() else {
            return Err(self.invalid("open a graph node"));
        };
        let found = match graph.node(node_id) {
            Some(node) if node.kind != NodeKind::Idea => {
                return Err(self.invalid("open a node that is not a linked sentence"));
            }
            Some(node) => Some(node.id.clone()),
            None => graph.find_leaf(node_id).map(|node| node.id.clone()),
        };
        let Some(leaf_id) = found else {
            let miss = AppError::lookup_miss(format!("graph node '{}'", node_id));
            return Err(self.recover(corpus, miss));
        };

        let key: NodeKey = leaf_id.parse()?;
        if let Err(e) = render_excerpt_for_key(corpus, &key) {
            return Err(self.recover(corpus, e));
        }

        let (origin, graph) = match std::mem::replace(&mut self.view, View::Idle) {
            View::Graph { origin, graph } | View::Excerpt { origin, graph, .. } => (origin, graph),
            other => {
                self.view = other;
                return Err(self.invalid("open a graph node"));
            }
        };
        self.view = View::Excerpt { origin, graph, key };
        Ok(())
    }

    /// Follow the excerpt's back-link to the full linked document
    pub fn follow_back_link(&mut self, corpus: &Corpus) -> Result<()> {
        let View::Excerpt { key, .. } = &self.view else {
            return Err(self.invalid("follow a back-link"));
        };
        let document = match corpus.document(&key.target.document_id) {
            Ok(document) => document,
            Err(e) => return Err(self.recover(corpus, e)),
        };
        self.view = View::Document {
            document_id: document.id.clone(),
            highlight: None,
        };
        self.history.record(document.title.clone());
        Ok(())
    }

    /// Check the current view against a refreshed snapshot, falling back to
    /// the last document still present when it lost what it shows
    pub fn revalidate(&mut self, corpus: &Corpus) -> Result<()> {
        let check = match &self.view {
            View::Idle => Ok(()),
            View::Document { document_id, .. } => corpus.document(document_id).map(|_| ()),
            View::Graph { origin, .. } => corpus.sentence(origin).map(|_| ()),
            View::Excerpt { origin, key, .. } => corpus
                .sentence(origin)
                .and_then(|_| render_excerpt_for_key(corpus, key))
                .map(|_| ()),
        };
        check.map_err(|e| self.recover(corpus, e))
    }

    /// Snapshot of the current view as an explorer page
    pub fn page(&self, corpus: &Corpus) -> Result<ExplorerPage> {
        let mut page = match &self.view {
            View::Idle => ExplorerPage {
                title: "Explorer".to_string(),
                ..ExplorerPage::default()
            },
            View::Document {
                document_id,
                highlight,
            } => ExplorerPage::for_document(corpus, document_id, *highlight, &self.filter)?,
            View::Graph { origin, .. } => {
                ExplorerPage::for_sentence(corpus, origin, &self.filter, &self.builder)?
            }
            View::Excerpt { origin, key, .. } => {
                let mut page =
                    ExplorerPage::for_sentence(corpus, origin, &self.filter, &self.builder)?;
                page.excerpt = Some(render_excerpt_for_key(corpus, key)?);
                page
            }
        };
        page.history = self.history.recent_first().map(str::to_string).collect();
        Ok(page)
    }

    fn invalid(&self, action: &'static str) -> AppError {
        AppError::InvalidTransition {
            action,
            state: self.view.name(),
        }
    }

    /// Fall back to the last document still present, or idle, and hand the error back
    fn recover(&mut self, corpus: &Corpus, error: AppError) -> AppError {
        let safe = self
            .view
            .document_id()
            .and_then(|id| corpus.document(id).ok())
            .or_else(|| {
                self.history
                    .recent_first()
                    .find_map(|title| corpus.document_by_title(title).ok())
            });

        self.view = match safe {
            Some(document) => View::Document {
                document_id: document.id.clone(),
                highlight: None,
            },
            None => View::Idle,
        };
        tracing::warn!("{}; back to {}", error, self.view.name());
        error
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(
            LinkFilter::default(),
            GraphBuilder::default(),
            DEFAULT_HISTORY_LEN,
        )
    }
}
