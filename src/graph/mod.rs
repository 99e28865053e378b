//! Graph assembly and exports.
//!
//! `assemble` maps resolved connectors to edges one-to-one, keeping their
//! order, so identical input produces an identical graph. The graph is a
//! plain value: once built it is only read, exported or handed to a reviewer.
//!
//! Exports:
//! - [`FlowGraph::to_json`]: pretty JSON with a fixed field order
//!   (`shapes[] {id, kind, boundingBox, centroid, area, text}`,
//!   `edges[] {source, target, label, directed}`).
//! - [`FlowGraph::to_mermaid`]: Mermaid flowchart text, nodes then edges in
//!   the same order as the JSON.

mod mermaid;

use crate::error::Result;
use crate::resolve::Connector;
use crate::shapes::{Shape, ShapeId};
use serde::{Deserialize, Serialize};

/// Assembled edge. Never has both sides null.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub source: Option<ShapeId>,
    pub target: Option<ShapeId>,
    pub label: Option<String>,
    pub directed: bool,
}

impl Edge {
    pub fn is_dangling(&self) -> bool {
        self.source.is_none() || self.target.is_none()
    }
}

impl From<&Connector> for Edge {
    fn from(c: &Connector) -> Self {
        Self {
            source: c.source,
            target: c.target,
            label: c.label.clone(),
            directed: c.directed,
        }
    }
}

/// Dominant flow direction of a diagram.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[serde(rename = "TD")]
    TopDown,
    #[serde(rename = "LR")]
    LeftRight,
}

impl Orientation {
    pub fn mermaid_code(self) -> &'static str {
        match self {
            Orientation::TopDown => "TD",
            Orientation::LeftRight => "LR",
        }
    }
}

/// Nodes and edges of one extraction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
    pub shapes: Vec<Shape>,
    pub edges: Vec<Edge>,
}

/// Build the graph from finished shapes and connectors.
pub fn assemble(shapes: Vec<Shape>, connectors: &[Connector]) -> FlowGraph {
    let edges = connectors
        .iter()
        .filter(|c| c.source.is_some() || c.target.is_some())
        .map(Edge::from)
        .collect();
    FlowGraph { shapes, edges }
}

impl FlowGraph {
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.edges.is_empty()
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_mermaid(&self) -> String {
        mermaid::render(self)
    }

    /// Top-down unless edges (or, without resolved edges, the shape layout)
    /// run mostly horizontally.
    pub fn orientation(&self) -> Orientation {
        let (mut dx, mut dy) = (0.0f32, 0.0f32);
        for e in &self.edges {
            if let (Some(s), Some(t)) = (e.source, e.target) {
                if let (Some(a), Some(b)) = (self.shape(s), self.shape(t)) {
                    dx += (b.centroid[0] - a.centroid[0]).abs();
                    dy += (b.centroid[1] - a.centroid[1]).abs();
                }
            }
        }
        if dx == 0.0 && dy == 0.0 {
            let xs = self.shapes.iter().map(|s| s.centroid[0]);
            let ys = self.shapes.iter().map(|s| s.centroid[1]);
            dx = spread(xs);
            dy = spread(ys);
        }
        if dx > dy {
            Orientation::LeftRight
        } else {
            Orientation::TopDown
        }
    }

    /// Shapes no edge points into, in id order.
    pub fn start_nodes(&self) -> Vec<ShapeId> {
        self.shapes
            .iter()
            .map(|s| s.id)
            .filter(|id| !self.edges.iter().any(|e| e.target == Some(*id)))
            .collect()
    }

    /// Edges leaving `id`.
    pub fn outgoing(&self, id: ShapeId) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |e| e.source == Some(id))
    }
}

fn spread(values: impl Iterator<Item = f32>) -> f32 {
    let (lo, hi) = values.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if hi >= lo {
        hi - lo
    } else {
        0.0
    }
}
