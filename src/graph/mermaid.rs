use super::{Edge, FlowGraph};
use crate::shapes::{Shape, ShapeKind};

/// Header, then one line per node and per edge, each newline-terminated.
pub(super) fn render(graph: &FlowGraph) -> String {
    let header = format!("flowchart {}", graph.orientation().mermaid_code());
    let nodes = graph.shapes.iter().map(node_decl);
    let edges = graph.edges.iter().enumerate().map(|(idx, edge)| edge_decl(idx, edge));
    std::iter::once(header)
        .chain(nodes.chain(edges).map(|line| format!("    {line}")))
        .map(|line| line + "\n")
        .collect()
}

fn node_decl(shape: &Shape) -> String {
    let id = shape.id.to_string();
    let text = shape
        .text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(&id);
    let label = escape(text);
    let (open, close) = match shape.kind {
        ShapeKind::Diamond => ("{", "}"),
        ShapeKind::Terminator => ("([", "])"),
        ShapeKind::Ellipse => ("((", "))"),
        ShapeKind::Rectangle | ShapeKind::Unknown => ("[", "]"),
    };
    format!("{id}{open}\"{label}\"{close}")
}

fn edge_decl(idx: usize, edge: &Edge) -> String {
    let end = |side: Option<crate::shapes::ShapeId>| match side {
        Some(id) => id.to_string(),
        None => format!("unresolved{idx}"),
    };
    let arrow = if edge.directed { "-->" } else { "---" };
    match edge.label.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        Some(label) => format!(
            "{} {}|{}| {}",
            end(edge.source),
            arrow,
            escape(label),
            end(edge.target)
        ),
        None => format!("{} {} {}", end(edge.source), arrow, end(edge.target)),
    }
}

/// Mermaid entity codes for characters that would end a label early.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("#quot;"),
            '|' => out.push_str("#124;"),
            '\n' | '\r' => out.push(' '),
            other => out.push(other),
        }
    }
    out
}
