//! Standalone HTML explorer page: document on the left, related-idea graph on
//! the right, excerpt of the clicked leaf under the document.

use serde::Serialize;
use std::collections::BTreeMap;

use super::styles::BADGE_CSS;
use super::{escape_html, render_document, render_excerpt_for_key};
use crate::corpus::{Corpus, SentenceRef};
use crate::error::{AppError, Result};
use crate::graph::{GraphBuilder, IdeaGraph, LinkFilter, NodeKey, NodeKind, related_ideas};

/// Everything the page needs, precomputed so the page works offline
#[derive(Debug, Default, Serialize)]
pub struct ExplorerPage {
    pub title: String,
    /// Markup of the open document
    pub document: Option<String>,
    pub graph: Option<IdeaGraph>,
    /// Leaf id -> excerpt markup
    pub excerpts: BTreeMap<String, String>,
    /// Document id -> markup, for the excerpts' back-links
    pub documents: BTreeMap<String, String>,
    /// Excerpt shown when the page opens
    pub excerpt: Option<String>,
    /// Visited titles, most recent first
    pub history: Vec<String>,
}

impl ExplorerPage {
    /// Page for one open document, optionally highlighting a sentence
    pub fn for_document(
        corpus: &Corpus,
        document_id: &str,
        highlight: Option<usize>,
        filter: &LinkFilter,
    ) -> Result<Self> {
        let document = corpus.document(document_id)?;
        Ok(Self {
            title: document.title.clone(),
            document: Some(render_document(document, highlight, filter)),
            ..Self::default()
        })
    }

    /// Page for a clicked sentence: document, graph and one excerpt per leaf
    pub fn for_sentence(
        corpus: &Corpus,
        origin: &SentenceRef,
        filter: &LinkFilter,
        builder: &GraphBuilder,
    ) -> Result<Self> {
        let mut page = Self::for_document(
            corpus,
            &origin.document_id,
            Some(origin.sentence_id),
            filter,
        )?;
        let graph = related_ideas(corpus, origin, filter, builder)?;

        for leaf in graph.leaves() {
            let key: NodeKey = leaf.id.parse()?;
            let excerpt = match render_excerpt_for_key(corpus, &key) {
                Ok(excerpt) => excerpt,
                Err(e @ AppError::LookupMiss { .. }) => {
                    tracing::warn!("Leaf {} points at missing text: {}", leaf.id, e);
                    format!("<p>{}</p>", escape_html(&e.to_string()))
                }
                Err(e) => return Err(e),
            };
            page.excerpts.insert(leaf.id.clone(), excerpt);

            let target = &key.target.document_id;
            if !page.documents.contains_key(target)
                && let Ok(document) = corpus.document(target)
            {
                page.documents
                    .insert(target.clone(), render_document(document, None, filter));
            }
        }

        page.graph = Some(graph);
        Ok(page)
    }
}

#[derive(Serialize)]
struct VisNode<'a> {
    id: &'a str,
    label: &'a str,
    title: &'a str,
    color: &'a str,
    size: u32,
    kind: NodeKind,
}

#[derive(Serialize)]
struct VisEdge<'a> {
    from: &'a str,
    to: &'a str,
}

#[derive(Serialize)]
struct PageData<'a> {
    nodes: Vec<VisNode<'a>>,
    edges: Vec<VisEdge<'a>>,
    excerpts: &'a BTreeMap<String, String>,
    documents: &'a BTreeMap<String, String>,
}

/// JSON that is safe to inline in a `<script>` element
fn script_json<T: Serialize>(value: &T) -> std::result::Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

pub fn render_page(page: &ExplorerPage) -> std::result::Result<String, serde_json::Error> {
    let (nodes, edges) = match &page.graph {
        Some(graph) => (
            graph
                .nodes
                .iter()
                .map(|n| VisNode {
                    id: &n.id,
                    label: &n.label,
                    title: &n.tooltip,
                    color: &n.color,
                    size: n.size,
                    kind: n.kind,
                })
                .collect(),
            graph
                .edges
                .iter()
                .map(|e| VisEdge {
                    from: &e.source,
                    to: &e.target,
                })
                .collect(),
        ),
        None => (Vec::new(), Vec::new()),
    };

    let data = script_json(&PageData {
        nodes,
        edges,
        excerpts: &page.excerpts,
        documents: &page.documents,
    })?;

    let history = page
        .history
        .iter()
        .map(|t| format!("<li>{}</li>", escape_html(t)))
        .collect::<String>();

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>TextMagnet - {title}</title>
    <style>
        * {{ box-sizing: border-box; }}
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; color: #262730; margin: 0; display: flex; height: 100vh; }}
        #left {{ flex: 1; padding: 24px 32px; overflow-y: auto; }}
        #right {{ flex: 1; display: flex; flex-direction: column; border-left: 1px solid #e6e6ea; }}
        #history {{ padding: 12px 24px; font-size: 0.85em; color: #666; border-bottom: 1px solid #e6e6ea; }}
        #history ol {{ margin: 4px 0 0; padding-left: 20px; }}
        #graph {{ flex: 1; }}
        #empty {{ display: none; padding: 24px; color: #888; }}
        #excerpt {{ margin-top: 24px; }}
        {badge_css}
    </style>
</head>
<body>
    <div id="left">
        <div id="document">{document}</div>
        <div id="excerpt">{excerpt}</div>
    </div>
    <div id="right">
        <div id="history">↺ History<ol>{history}</ol></div>
        <div id="graph"></div>
        <div id="empty">No related ideas for this sentence.</div>
    </div>

    <script>
        const data = {data};

        // Back-links inside excerpts open the linked document
        document.getElementById('excerpt').addEventListener('click', (e) => {{
            const a = e.target.closest('a');
            if (!a) return;
            e.preventDefault();
            if (data.documents[a.id]) {{
                document.getElementById('document').innerHTML = data.documents[a.id];
                document.getElementById('excerpt').innerHTML = '';
            }}
        }});
        document.getElementById('document').addEventListener('click', (e) => {{
            if (e.target.closest('a')) e.preventDefault();
        }});

        const CDNS = [
            'https://cdnjs.cloudflare.com/ajax/libs/vis-network/9.1.9/vis-network.min.js',
            'https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js'
        ];
        function loadScript(urls, idx) {{
            if (idx >= urls.length) {{
                document.getElementById('empty').textContent = 'Loading the graph library failed. Check connection.';
                document.getElementById('empty').style.display = 'block';
                return;
            }}
            const s = document.createElement('script');
            s.src = urls[idx];
            s.onload = initGraph;
            s.onerror = () => loadScript(urls, idx + 1);
            document.head.appendChild(s);
        }}

        function initGraph() {{
            if (data.nodes.length <= 1) {{
                document.getElementById('empty').style.display = 'block';
            }}
            const nodes = new vis.DataSet(data.nodes.map(n => ({{ ...n, shape: 'dot', font: {{ size: 12 }} }})));
            const edges = new vis.DataSet(data.edges.map(e => ({{ ...e, arrows: 'to' }})));
            const network = new vis.Network(document.getElementById('graph'), {{ nodes, edges }}, {{
                physics: {{ solver: 'forceAtlas2Based', stabilization: {{ iterations: 200 }} }},
                interaction: {{ hover: true, tooltipDelay: 150 }}
            }});
            network.on('click', (p) => {{
                if (p.nodes.length === 0) return;
                const excerpt = data.excerpts[p.nodes[0]];
                if (excerpt) document.getElementById('excerpt').innerHTML = excerpt;
            }});
        }}

        if (data.nodes.length > 0) loadScript(CDNS, 0);
    </script>
</body>
</html>"#,
        title = escape_html(&page.title),
        badge_css = BADGE_CSS,
        document = page.document.as_deref().unwrap_or(""),
        excerpt = page.excerpt.as_deref().unwrap_or(""),
        history = history,
        data = data,
    );

    Ok(html)
}
