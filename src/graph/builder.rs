use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::keys::NodeKey;
use crate::corpus::relation::{CENTER_COLOR, NODE_SIZE};
use crate::corpus::{Link, LinkMap, RelationType, SentenceRef};

/// Id of the center node of every related-idea graph
pub const CENTER_ID: &str = "0";

/// Default number of words per line in leaf labels
pub const DEFAULT_WORDS_PER_LINE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// The queried sentence
    Center,
    /// One relation type
    Relation,
    /// One linked sentence
    Idea,
}

/// A node of the related-idea graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdeaNode {
    pub id: String,
    pub label: String,
    /// Hover text: sentence text, mean distance or raw distance
    pub tooltip: String,
    pub kind: NodeKind,
    pub relation: Option<RelationType>,
    pub distance: Option<f64>,
    pub color: String,
    pub size: u32,
}

/// A directed edge between two node ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaEdge {
    pub source: String,
    pub target: String,
}

/// Center -> relation -> linked-sentence graph of one sentence
#[derive(Debug, Clone, Serialize)]
pub struct IdeaGraph {
    pub origin: SentenceRef,
    pub nodes: Vec<IdeaNode>,
    pub edges: Vec<IdeaEdge>,
}

impl IdeaGraph {
    pub fn center(&self) -> &IdeaNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: &str) -> Option<&IdeaNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn relation_nodes(&self) -> impl Iterator<Item = &IdeaNode> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Relation)
    }

    pub fn leaves(&self) -> impl Iterator<Item = &IdeaNode> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Idea)
    }

    /// Leaves hanging under one relation node, in build order
    pub fn leaves_of(&self, relation: RelationType) -> impl Iterator<Item = &IdeaNode> {
        self.leaves().filter(move |n| n.relation == Some(relation))
    }

    /// Resolve user input to a leaf: its 1-based position among the leaves,
    /// its exact id, or its id typed on one line.
    pub fn find_leaf(&self, input: &str) -> Option<&IdeaNode> {
        let input = input.trim();
        if let Ok(n) = input.parse::<usize>() {
            return n.checked_sub(1).and_then(|i| self.leaves().nth(i));
        }
        self.leaves()
            .find(|n| n.id == input)
            .or_else(|| {
                let wanted = collapse_whitespace(input);
                self.leaves().find(|n| collapse_whitespace(&n.id) == wanted)
            })
    }

    /// Whether the sentence has no related ideas left after filtering
    pub fn is_bare(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Project onto a petgraph graph for structural queries
    pub fn to_petgraph(&self) -> (DiGraph<&IdeaNode, ()>, HashMap<&str, NodeIndex>) {
        let mut graph = DiGraph::new();
        let mut indices = HashMap::new();

        for node in &self.nodes {
            let idx = graph.add_node(node);
            indices.insert(node.id.as_str(), idx);
        }

        for edge in &self.edges {
            if let (Some(&src), Some(&tgt)) = (
                indices.get(edge.source.as_str()),
                indices.get(edge.target.as_str()),
            ) {
                graph.add_edge(src, tgt, ());
            }
        }

        (graph, indices)
    }
}

/// Builds the related-idea graph of one sentence from its filtered links
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    words_per_line: usize,
}

impl GraphBuilder {
    pub fn new(words_per_line: usize) -> Self {
        Self {
            words_per_line: words_per_line.max(1),
        }
    }

    /// Build the graph. `links` must already have passed the link filter.
    pub fn build(&self, origin: &SentenceRef, center_text: &str, links: &LinkMap) -> IdeaGraph {
        let mut nodes = vec![IdeaNode {
            id: CENTER_ID.to_string(),
            label: String::new(),
            tooltip: center_text.to_string(),
            kind: NodeKind::Center,
            relation: None,
            distance: None,
            color: CENTER_COLOR.to_string(),
            size: NODE_SIZE,
        }];
        let mut edges = Vec::new();

        // LinkMap iterates in canonical relation order
        for (&relation, relation_links) in links {
            if relation_links.is_empty() {
                continue;
            }

            let mean = mean_distance(relation_links);
            nodes.push(IdeaNode {
                id: relation.wire_name().to_string(),
                label: relation.label().to_string(),
                tooltip: mean.to_string(),
                kind: NodeKind::Relation,
                relation: Some(relation),
                distance: Some(mean),
                color: relation.intermediate_color().to_string(),
                size: NODE_SIZE,
            });
            edges.push(IdeaEdge {
                source: CENTER_ID.to_string(),
                target: relation.wire_name().to_string(),
            });

            // Occurrences of each label so far under this relation
            let mut seen: HashMap<String, usize> = HashMap::new();
            let mut taken: HashSet<String> = HashSet::new();

            for link in relation_links {
                let base = add_line_breaks(&link.linked_keywords, self.words_per_line);
                let count = seen.entry(base.clone()).or_insert(0);
                *count += 1;
                let label = unique_label(&base, *count, &taken);
                taken.insert(label.clone());

                let key = NodeKey::new(
                    SentenceRef::new(link.linked_document_id.clone(), link.linked_sentence_id),
                    relation,
                    label.clone(),
                );
                let id = key.to_string();

                nodes.push(IdeaNode {
                    id: id.clone(),
                    label,
                    tooltip: link.distance.to_string(),
                    kind: NodeKind::Idea,
                    relation: Some(relation),
                    distance: Some(link.distance),
                    color: relation.end_color().to_string(),
                    size: NODE_SIZE,
                });
                edges.push(IdeaEdge {
                    source: relation.wire_name().to_string(),
                    target: id,
                });
            }
        }

        IdeaGraph {
            origin: origin.clone(),
            nodes,
            edges,
        }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_WORDS_PER_LINE)
    }
}

/// `base` for its first use, `base - k` for the k-th, skipping labels already
/// given to another leaf of the same relation
fn unique_label(base: &str, count: usize, taken: &HashSet<String>) -> String {
    if count == 1 && !taken.contains(base) {
        return base.to_string();
    }
    let mut k = count.max(2);
    loop {
        let label = format!("{} - {}", base, k);
        if !taken.contains(&label) {
            return label;
        }
        k += 1;
    }
}

/// Break a label into lines of `words_per_line` words.
///
/// Breaks only go between words; the last word never gets one.
pub fn add_line_breaks(text: &str, words_per_line: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(words_per_line.max(1))
        .map(|line| line.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Mean distance of a relation group, rounded to 2 decimals
pub fn mean_distance(links: &[Link]) -> f64 {
    if links.is_empty() {
        return 0.0;
    }
    let mean = links.iter().map(|l| l.distance).sum::<f64>() / links.len() as f64;
    (mean * 100.0).round() / 100.0
}
