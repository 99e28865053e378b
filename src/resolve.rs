//! Endpoint resolution: bind connector ends to shapes and orient them.
//!
//! Each end binds to the shape whose boundary is nearest, as long as that
//! distance is within `snap_distance_px`. Distances within `tie_epsilon_px`
//! of each other count as equal and the lower shape id wins; this is an
//! explicit comparator rather than an artifact of iteration order.
//!
//! A connector with both ends on the same shape is kept as a self-loop only
//! when it is at least `min_self_loop_px` long; shorter ones are stroke
//! fragments hugging the outline and are dropped.
//!
//! Orientation: with exactly one arrow head the head side is the target.
//! Otherwise the connector is oriented by convention: a half-resolved
//! connector starts at its bound side, a fully resolved one at the shape
//! with the lower id.
use crate::connectors::RawConnector;
use crate::shapes::{Shape, ShapeId};
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Max distance from an endpoint to the shape boundary it binds to.
    pub snap_distance_px: f32,
    /// Distances closer than this are treated as ties.
    pub tie_epsilon_px: f32,
    /// Shortest polyline accepted with both ends on one shape.
    pub min_self_loop_px: f32,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            snap_distance_px: 20.0,
            tie_epsilon_px: 1e-3,
            min_self_loop_px: 40.0,
        }
    }
}

/// Connector with both ends examined, oriented source → target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub points: Vec<[f32; 2]>,
    pub source: Option<ShapeId>,
    pub target: Option<ShapeId>,
    /// Exactly one arrow head was detected.
    pub directed: bool,
    /// Text associated with the connector.
    pub text: Option<String>,
    /// Branch label or free label derived from `text`.
    pub label: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ResolveOutcome {
    pub connectors: Vec<Connector>,
    /// Connectors with both ends dangling, or too short to loop.
    pub dropped: usize,
}

impl ResolveOutcome {
    /// Connectors kept with exactly one null side.
    pub fn dangling(&self) -> usize {
        self.connectors
            .iter()
            .filter(|c| c.source.is_none() || c.target.is_none())
            .count()
    }
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    id: ShapeId,
    distance: f32,
}

/// Deterministic preference between two candidates: strictly closer wins,
/// otherwise the lower id.
fn compare_candidates(a: &Candidate, b: &Candidate, tie_epsilon: f32) -> Ordering {
    if (a.distance - b.distance).abs() <= tie_epsilon {
        a.id.cmp(&b.id)
    } else {
        a.distance.total_cmp(&b.distance)
    }
}

/// Shape bound to the point `p`, if any lies within the snap distance.
pub fn bind_endpoint(p: [f32; 2], shapes: &[Shape], options: &ResolveOptions) -> Option<ShapeId> {
    shapes
        .iter()
        .map(|s| Candidate {
            id: s.id,
            distance: s.boundary_distance(p),
        })
        .filter(|c| c.distance <= options.snap_distance_px)
        .min_by(|a, b| compare_candidates(a, b, options.tie_epsilon_px))
        .map(|c| c.id)
}

/// Resolve every raw connector, preserving their order.
pub fn resolve(raw: &[RawConnector], shapes: &[Shape], options: &ResolveOptions) -> ResolveOutcome {
    let mut out = ResolveOutcome::default();
    for rc in raw {
        let start = bind_endpoint(rc.start(), shapes, options);
        let end = bind_endpoint(rc.end(), shapes, options);
        if start.is_none() && end.is_none() {
            out.dropped += 1;
            continue;
        }
        if start.is_some() && start == end && rc.length() < options.min_self_loop_px {
            debug!("resolve drops {:.1} px fragment on shape {:?}", rc.length(), start);
            out.dropped += 1;
            continue;
        }
        out.connectors.push(orient(rc, start, end));
    }
    debug!(
        "resolve connectors={} dropped={} dangling={}",
        out.connectors.len(),
        out.dropped,
        out.dangling()
    );
    out
}

fn orient(rc: &RawConnector, start: Option<ShapeId>, end: Option<ShapeId>) -> Connector {
    let directed = rc.head_count() == 1;
    let forward = if directed {
        rc.head_at_end
    } else {
        match (start, end) {
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (Some(a), Some(b)) => a <= b,
            (None, None) => true,
        }
    };
    let (points, source, target) = if forward {
        (rc.points.clone(), start, end)
    } else {
        let mut pts = rc.points.clone();
        pts.reverse();
        (pts, end, start)
    };
    Connector {
        points,
        source,
        target,
        directed,
        text: None,
        label: None,
    }
}
