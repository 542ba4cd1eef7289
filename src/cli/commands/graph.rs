use anyhow::Result;
use console::{Emoji, style};
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use std::path::PathBuf;

use crate::cli::{GlobalArgs, GraphFormat};
use crate::corpus::SentenceRef;
use crate::export;
use crate::graph::builder::CENTER_ID;
use crate::graph::{IdeaGraph, related_ideas};

static GRAPH: Emoji<'_, '_> = Emoji("🔗 ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static FILE: Emoji<'_, '_> = Emoji("📁 ", "");

pub async fn run(
    global: &GlobalArgs,
    document_id: String,
    sentence_id: usize,
    format: Option<GraphFormat>,
    output: Option<PathBuf>,
) -> Result<()> {
    let (config, corpus) = super::load(global).await?;
    let origin = SentenceRef::new(document_id, sentence_id);
    let graph = related_ideas(&corpus, &origin, &config.link_filter(), &config.graph_builder())?;

    match (format, output) {
        (None, None) => print_tree(&graph),
        (format, Some(path)) => {
            let format = format.unwrap_or(GraphFormat::Json);
            print!("{}Exporting to {}... ", FILE, style(format).cyan());
            match format {
                GraphFormat::Json => export::export_json(&graph, &path)?,
                GraphFormat::Graphml => export::export_graphml(&graph, &path)?,
            }
            println!("{}", style("done").green());
            println!(
                "{}{} nodes, {} edges → {}",
                CHECK,
                graph.nodes.len(),
                graph.edges.len(),
                style(path.display()).cyan().underlined()
            );
        }
        (Some(format), None) => {
            let stdout = std::io::stdout().lock();
            match format {
                GraphFormat::Json => export::write_json(&graph, stdout)?,
                GraphFormat::Graphml => export::write_graphml(&graph, stdout)?,
            }
            println!();
        }
    }

    Ok(())
}

/// Print the graph as a tree. Leaves are numbered across relations so they
/// can be picked by number.
pub(crate) fn print_tree(graph: &IdeaGraph) {
    let center = graph.center();
    println!("{}{}", GRAPH, style(&graph.origin).bold());
    println!("  {}", style(&center.tooltip).italic());

    if graph.is_bare() {
        println!();
        println!("{}", style("No related ideas for this sentence.").yellow());
        return;
    }

    let (pg, indices) = graph.to_petgraph();
    let Some(&root) = indices.get(CENTER_ID) else {
        return;
    };

    let mut number = 0;
    let relations = children(&pg, root);
    for (i, relation) in relations.iter().enumerate() {
        let last_relation = i + 1 == relations.len();
        let node = pg[*relation];
        println!();
        println!(
            "{} {} {}",
            if last_relation { "└─" } else { "├─" },
            style(&node.label).bold(),
            style(format!("(mean distance {})", node.tooltip)).dim()
        );

        let leaves = children(&pg, *relation);
        let indent = if last_relation { "   " } else { "│  " };
        for (j, leaf) in leaves.iter().enumerate() {
            let node = pg[*leaf];
            let branch = if j + 1 == leaves.len() { "└─" } else { "├─" };
            number += 1;
            println!(
                "{}{} {} {} {}",
                indent,
                branch,
                style(format!("{}.", number)).bold(),
                style(node.label.replace('\n', " ")).cyan(),
                style(format!("[{}]", node.tooltip)).dim()
            );
            println!("{}   {}", indent, style(node.id.replace('\n', " ")).dim());
        }
    }
    println!();
}

/// Outgoing neighbours in insertion order
fn children<N, E>(pg: &petgraph::graph::DiGraph<N, E>, node: NodeIndex) -> Vec<NodeIndex> {
    let mut children: Vec<NodeIndex> = pg.neighbors_directed(node, Direction::Outgoing).collect();
    children.sort();
    children
}
