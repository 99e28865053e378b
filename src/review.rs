//! Semantic review boundary.
//!
//! A reviewer takes the assembled graph and returns a structurally compatible
//! one, typically after a language model compared it against the drawing.
//! The engine never calls a model itself: [`PromptReviewer`] formats the
//! prompt and parses the reply, and a [`CompletionBackend`] supplied by the
//! caller does the actual round trip.
use crate::error::{ExtractError, Result};
use crate::graph::FlowGraph;
use log::debug;
use std::collections::HashSet;

pub trait SemanticReviewer {
    fn review(&self, graph: &FlowGraph) -> Result<FlowGraph>;
}

/// Returns the graph unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassThroughReviewer;

impl SemanticReviewer for PassThroughReviewer {
    fn review(&self, graph: &FlowGraph) -> Result<FlowGraph> {
        Ok(graph.clone())
    }
}

/// Text completion service behind a reviewer.
pub trait CompletionBackend {
    fn complete(&self, prompt: &str) -> Result<String>;
}

impl<F> CompletionBackend for F
where
    F: Fn(&str) -> Result<String>,
{
    fn complete(&self, prompt: &str) -> Result<String> {
        self(prompt)
    }
}

/// Reviewer that sends [`review_prompt`] to a backend and validates the reply.
pub struct PromptReviewer<B> {
    backend: B,
}

impl<B: CompletionBackend> PromptReviewer<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

impl<B: CompletionBackend> SemanticReviewer for PromptReviewer<B> {
    fn review(&self, graph: &FlowGraph) -> Result<FlowGraph> {
        let prompt = review_prompt(&graph.to_json()?);
        let reply = self.backend.complete(&prompt)?;
        debug!("review reply of {} bytes", reply.len());
        let revised = parse_review_response(&reply)?;
        validate_review(graph, &revised)?;
        Ok(revised)
    }
}

/// Instructions for a reviewer model, followed by the graph JSON.
pub fn review_prompt(graph_json: &str) -> String {
    format!(
        r#"You are an expert at reading flowcharts. Review and revise the provided FlowGraph JSON to better match the image.
Return ONLY a single JSON object in the SAME FlowGraph schema:
{{
  "shapes": [
    {{"id": <int>, "kind": "rectangle|diamond|ellipse|terminator|unknown", "boundingBox": {{"x0": <num>, "y0": <num>, "x1": <num>, "y1": <num>}}, "centroid": [<num>, <num>], "area": <num>, "text": "<string|null>"}}
  ],
  "edges": [
    {{"source": <id|null>, "target": <id|null>, "label": "<string|null>", "directed": <bool>}}
  ]
}}
Constraints:
- Keep shape ids identical; do not invent or remove ids.
- You may edit shape text, shape kind, edge endpoints, labels and directions.
- Decision edge labels must be "yes", "no" or null.
- Never emit an edge whose source and target are both null.
- Prefer minimal edits; only change what is clearly wrong.

FlowGraph JSON to review:
{graph_json}"#
    )
}

/// Remove a surrounding Markdown code fence, if any.
pub fn strip_code_fences(text: &str) -> &str {
    let s = text.trim();
    if !s.starts_with("```") {
        return s;
    }
    let body = match s.find('\n') {
        Some(i) => &s[i + 1..],
        None => return "",
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// First balanced `{...}` object in `text`, skipping braces inside strings.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse a reviewer reply into a graph, tolerating fences and chatter.
pub fn parse_review_response(raw: &str) -> Result<FlowGraph> {
    let body = strip_code_fences(raw);
    let json = extract_json_object(body)
        .ok_or_else(|| ExtractError::Review("reply contains no JSON object".to_string()))?;
    FlowGraph::from_json(json).map_err(|e| ExtractError::Review(format!("reply is not a FlowGraph: {e}")))
}

/// Check that a revised graph keeps the original's ids and edge invariants.
pub fn validate_review(original: &FlowGraph, revised: &FlowGraph) -> Result<()> {
    let before: HashSet<_> = original.shapes.iter().map(|s| s.id).collect();
    let after: HashSet<_> = revised.shapes.iter().map(|s| s.id).collect();
    if before != after {
        return Err(ExtractError::Review("reviewer changed the set of shape ids".to_string()));
    }
    for (idx, edge) in revised.edges.iter().enumerate() {
        if edge.source.is_none() && edge.target.is_none() {
            return Err(ExtractError::Review(format!("edge {idx} has no endpoints")));
        }
        for id in [edge.source, edge.target].into_iter().flatten() {
            if !after.contains(&id) {
                return Err(ExtractError::Review(format!("edge {idx} references unknown shape {id}")));
            }
        }
    }
    Ok(())
}
