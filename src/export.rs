use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::graph::IdeaGraph;

/// Write a related-idea graph as pretty JSON
pub fn write_json<W: Write>(graph: &IdeaGraph, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, graph).context("Failed to write JSON")?;
    Ok(())
}

/// Export a related-idea graph to a JSON file
pub fn export_json(graph: &IdeaGraph, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_json(graph, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a related-idea graph as GraphML
pub fn write_graphml<W: Write>(graph: &IdeaGraph, mut writer: W) -> Result<()> {
    writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        writer,
        r#"<graphml xmlns="http://graphml.graphdrawing.org/xmlns" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd">"#
    )?;

    for (id, attr, ty) in [
        ("label", "label", "string"),
        ("tooltip", "tooltip", "string"),
        ("kind", "kind", "string"),
        ("relation", "relation", "string"),
        ("distance", "distance", "double"),
        ("color", "color", "string"),
    ] {
        writeln!(
            writer,
            r#"  <key id="{}" for="node" attr.name="{}" attr.type="{}"/>"#,
            id, attr, ty
        )?;
    }

    writeln!(
        writer,
        r#"  <graph id="{}" edgedefault="directed">"#,
        escape_xml(&graph.origin.to_string())
    )?;

    for node in &graph.nodes {
        writeln!(writer, r#"    <node id="{}">"#, escape_xml(&node.id))?;
        writeln!(
            writer,
            r#"      <data key="label">{}</data>"#,
            escape_xml(&node.label)
        )?;
        writeln!(
            writer,
            r#"      <data key="tooltip">{}</data>"#,
            escape_xml(&node.tooltip)
        )?;
        let kind = serde_json::to_value(node.kind)?;
        writeln!(
            writer,
            r#"      <data key="kind">{}</data>"#,
            kind.as_str().unwrap_or_default()
        )?;
        if let Some(relation) = node.relation {
            writeln!(
                writer,
                r#"      <data key="relation">{}</data>"#,
                relation.wire_name()
            )?;
        }
        if let Some(distance) = node.distance {
            writeln!(writer, r#"      <data key="distance">{}</data>"#, distance)?;
        }
        writeln!(
            writer,
            r#"      <data key="color">{}</data>"#,
            escape_xml(&node.color)
        )?;
        writeln!(writer, r#"    </node>"#)?;
    }

    for (i, edge) in graph.edges.iter().enumerate() {
        writeln!(
            writer,
            r#"    <edge id="e{}" source="{}" target="{}"/>"#,
            i,
            escape_xml(&edge.source),
            escape_xml(&edge.target)
        )?;
    }

    writeln!(writer, r#"  </graph>"#)?;
    writeln!(writer, r#"</graphml>"#)?;

    Ok(())
}

/// Export a related-idea graph to a GraphML file
pub fn export_graphml(graph: &IdeaGraph, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_graphml(graph, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Escape special characters for XML
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
