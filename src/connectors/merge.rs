//! Segment merging and polyline joining.
//!
//! - `fuse_stroke_edges`: replace the two parallel edge responses of a thick
//!   stroke by its centreline, checked against the ink between them.
//! - `merge_collinear`: fuse near-collinear segments whose gap along the
//!   shared axis is small. Runs to a fixed point.
//! - `join_corners`: chain two connector ends meeting at an elbow into one
//!   polyline, when nothing else ends nearby.
use super::arrowhead::InkProbe;
use super::extractor::LineSegment;
use super::options::ConnectorOptions;
use super::RawConnector;
use crate::angle::angle_between_dirless;
use crate::geometry::{distance, raster_cmp, BoundingBox};
use std::cmp::Ordering;

const EPS: f32 = 1e-6;
/// Share of centreline samples that must be ink for two edges to fuse.
const STROKE_FILL_FRACTION: f32 = 0.8;

// Longest first so the dominant direction anchors each merge.
fn sort_longest_first(segments: &mut [LineSegment]) {
    segments.sort_by(|a, b| {
        b.len
            .total_cmp(&a.len)
            .then_with(|| raster_cmp(a.p0, b.p0))
            .then_with(|| raster_cmp(a.p1, b.p1))
    });
}

/// Fuse pairs of parallel edge responses into stroke centrelines until no
/// pair qualifies.
pub(super) fn fuse_stroke_edges(
    mut segments: Vec<LineSegment>,
    probe: &InkProbe<'_>,
    options: &ConnectorOptions,
) -> Vec<LineSegment> {
    sort_longest_first(&mut segments);
    let angle_tol = options.merge_angle_tol_deg.to_radians();
    loop {
        let mut fused_any = false;
        let mut i = 0;
        while i < segments.len() {
            let mut j = i + 1;
            while j < segments.len() {
                match stroke_centreline(&segments[i], &segments[j], angle_tol, probe, options) {
                    Some(centre) => {
                        segments.remove(j);
                        segments[i] = centre;
                        fused_any = true;
                    }
                    None => j += 1,
                }
            }
            i += 1;
        }
        if !fused_any {
            return segments;
        }
    }
}

/// Centreline of `a` and `b` when they are the two flanks of one stroke:
/// parallel, offset by at most the widest stroke, overlapping along `a` for
/// at least half the shorter one, with ink along the line halfway between.
fn stroke_centreline(
    a: &LineSegment,
    b: &LineSegment,
    angle_tol: f32,
    probe: &InkProbe<'_>,
    options: &ConnectorOptions,
) -> Option<LineSegment> {
    if angle_between_dirless(&a.dir, &b.dir) > angle_tol {
        return None;
    }
    let (s0, n0) = project(a, b.p0);
    let (s1, n1) = project(a, b.p1);
    let offset = 0.5 * (n0 + n1);
    if offset.abs() < 1.0 || offset.abs() > options.max_stroke_width_px + 1.0 || (n0 - n1).abs() > 2.0 {
        return None;
    }
    let (lo, hi) = if s0 <= s1 { (s0, s1) } else { (s1, s0) };
    let from = lo.max(0.0);
    let overlap = hi.min(a.len) - from;
    if overlap < 0.5 * a.len.min(b.len) {
        return None;
    }

    let n = a.normal();
    let half = 0.5 * offset;
    let on_centre = |s: f32| {
        [
            a.p0[0] + a.dir[0] * s + n[0] * half,
            a.p0[1] + a.dir[1] * s + n[1] * half,
        ]
    };
    let samples = overlap.floor().max(1.0) as usize;
    let inked = (0..samples)
        .filter(|&k| probe.ink(on_centre(from + k as f32 + 0.5)))
        .count();
    if (inked as f32) < STROKE_FILL_FRACTION * samples as f32 {
        return None;
    }
    Some(LineSegment::new(
        on_centre(lo.min(0.0)),
        on_centre(hi.max(a.len)),
        0.5 * (a.avg_mag + b.avg_mag),
    ))
}

/// Merge collinear, near-adjacent segments until no pair qualifies.
pub fn merge_collinear(mut segments: Vec<LineSegment>, options: &ConnectorOptions) -> Vec<LineSegment> {
    sort_longest_first(&mut segments);
    let angle_tol = options.merge_angle_tol_deg.to_radians();

    loop {
        let mut merged_any = false;
        let mut i = 0;
        while i < segments.len() {
            let mut j = i + 1;
            while j < segments.len() {
                if mergeable(&segments[i], &segments[j], angle_tol, options) {
                    let other = segments.remove(j);
                    segments[i] = merge_pair(&segments[i], &other);
                    merged_any = true;
                } else {
                    j += 1;
                }
            }
            i += 1;
        }
        if !merged_any {
            return segments;
        }
    }
}

fn project(seg: &LineSegment, p: [f32; 2]) -> (f32, f32) {
    let dx = p[0] - seg.p0[0];
    let dy = p[1] - seg.p0[1];
    let along = dx * seg.dir[0] + dy * seg.dir[1];
    let n = seg.normal();
    let across = dx * n[0] + dy * n[1];
    (along, across)
}

fn mergeable(a: &LineSegment, b: &LineSegment, angle_tol: f32, options: &ConnectorOptions) -> bool {
    if angle_between_dirless(&a.dir, &b.dir) > angle_tol {
        return false;
    }
    let (s0, n0) = project(a, b.p0);
    let (s1, n1) = project(a, b.p1);
    if n0.abs() > options.merge_offset_px || n1.abs() > options.merge_offset_px {
        return false;
    }
    let (lo, hi) = if s0 <= s1 { (s0, s1) } else { (s1, s0) };
    let gap = (lo - a.len).max(-hi).max(0.0);
    gap <= options.gap_tolerance_px
}

/// Length-weighted fusion of two segments; extent covers all four endpoints.
fn merge_pair(a: &LineSegment, b: &LineSegment) -> LineSegment {
    let mut bdir = b.dir;
    if a.dir[0] * bdir[0] + a.dir[1] * bdir[1] < 0.0 {
        bdir = [-bdir[0], -bdir[1]];
    }
    let total = (a.len + b.len).max(EPS);
    let mut dir = [
        (a.dir[0] * a.len + bdir[0] * b.len) / total,
        (a.dir[1] * a.len + bdir[1] * b.len) / total,
    ];
    let norm = (dir[0] * dir[0] + dir[1] * dir[1]).sqrt().max(EPS);
    dir = [dir[0] / norm, dir[1] / norm];
    let ma = a.midpoint();
    let mb = b.midpoint();
    let center = [
        (ma[0] * a.len + mb[0] * b.len) / total,
        (ma[1] * a.len + mb[1] * b.len) / total,
    ];

    let mut smin = f32::INFINITY;
    let mut smax = f32::NEG_INFINITY;
    for p in [a.p0, a.p1, b.p0, b.p1] {
        let s = (p[0] - center[0]) * dir[0] + (p[1] - center[1]) * dir[1];
        smin = smin.min(s);
        smax = smax.max(s);
    }
    let p0 = [center[0] + smin * dir[0], center[1] + smin * dir[1]];
    let p1 = [center[0] + smax * dir[0], center[1] + smax * dir[1]];
    let avg_mag = (a.avg_mag * a.len + b.avg_mag * b.len) / total;
    LineSegment::new(p0, p1, avg_mag)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum End {
    Start,
    Finish,
}

fn end_point(c: &RawConnector, end: End) -> [f32; 2] {
    match end {
        End::Start => c.points[0],
        End::Finish => c.points[c.points.len() - 1],
    }
}

fn end_has_head(c: &RawConnector, end: End) -> bool {
    match end {
        End::Start => c.head_at_start,
        End::Finish => c.head_at_end,
    }
}

/// Chain connector ends that meet at a corner.
///
/// Two ends are joined when they lie within `join_radius_px` of each other,
/// neither carries an arrow head, no third end lies within the radius of
/// either, and the meeting point is farther than the radius from every shape
/// box. Candidate pairs are visited in index order, so the result is
/// deterministic.
pub fn join_corners(
    mut connectors: Vec<RawConnector>,
    shape_boxes: &[BoundingBox],
    options: &ConnectorOptions,
) -> Vec<RawConnector> {
    let radius = options.join_radius_px;
    while let Some((i, ei, j, ej)) = find_join(&connectors, shape_boxes, radius) {
        let b = connectors.remove(j);
        let a = connectors.remove(i);
        let joined = join_pair(a, ei, b, ej, options);
        connectors.insert(i, joined);
    }
    connectors
}

fn find_join(
    connectors: &[RawConnector],
    shape_boxes: &[BoundingBox],
    radius: f32,
) -> Option<(usize, End, usize, End)> {
    let ends: Vec<(usize, End, [f32; 2])> = connectors
        .iter()
        .enumerate()
        .flat_map(|(i, c)| {
            [
                (i, End::Start, end_point(c, End::Start)),
                (i, End::Finish, end_point(c, End::Finish)),
            ]
        })
        .collect();

    let near_count = |p: [f32; 2]| ends.iter().filter(|e| distance(e.2, p) <= radius).count();

    for (k, &(i, ei, pi)) in ends.iter().enumerate() {
        for &(j, ej, pj) in &ends[k + 1..] {
            if i == j || distance(pi, pj) > radius {
                continue;
            }
            if end_has_head(&connectors[i], ei) || end_has_head(&connectors[j], ej) {
                continue;
            }
            // Exactly these two ends around each point.
            if near_count(pi) != 2 || near_count(pj) != 2 {
                continue;
            }
            let meet = [0.5 * (pi[0] + pj[0]), 0.5 * (pi[1] + pj[1])];
            if shape_boxes.iter().any(|b| b.distance_to(meet) <= radius) {
                continue;
            }
            return Some((i, ei, j, ej));
        }
    }
    None
}

fn join_pair(a: RawConnector, ea: End, b: RawConnector, eb: End, options: &ConnectorOptions) -> RawConnector {
    // Orient `a` to end at the joint and `b` to start there.
    let a = if ea == End::Start { a.reversed() } else { a };
    let b = if eb == End::Finish { b.reversed() } else { b };

    let na = a.points.len();
    let pa = a.points[na - 1];
    let pb = b.points[0];
    let corner = corner_point(
        [a.points[na - 2], pa],
        [pb, b.points[1]],
        options.join_radius_px,
        options.merge_angle_tol_deg.to_radians(),
    )
    .unwrap_or([0.5 * (pa[0] + pb[0]), 0.5 * (pa[1] + pb[1])]);

    let mut points = Vec::with_capacity(na + b.points.len() - 1);
    points.extend_from_slice(&a.points[..na - 1]);
    points.push(corner);
    points.extend_from_slice(&b.points[1..]);
    RawConnector {
        points,
        head_at_start: a.head_at_start,
        head_at_end: b.head_at_end,
        stroke_width: a.stroke_width.max(b.stroke_width),
    }
}

/// Intersection of the two segment lines when they cross at a real angle
/// close to both ends.
fn corner_point(a: [[f32; 2]; 2], b: [[f32; 2]; 2], radius: f32, min_angle: f32) -> Option<[f32; 2]> {
    let da = [a[1][0] - a[0][0], a[1][1] - a[0][1]];
    let db = [b[1][0] - b[0][0], b[1][1] - b[0][1]];
    if angle_between_dirless(&da, &db) <= min_angle {
        return None;
    }
    let denom = da[0] * db[1] - da[1] * db[0];
    if denom.abs() <= EPS {
        return None;
    }
    let wx = b[0][0] - a[0][0];
    let wy = b[0][1] - a[0][1];
    let t = (wx * db[1] - wy * db[0]) / denom;
    let p = [a[0][0] + t * da[0], a[0][1] + t * da[1]];
    match (distance(p, a[1]).partial_cmp(&radius), distance(p, b[0]).partial_cmp(&radius)) {
        (Some(Ordering::Less | Ordering::Equal), Some(Ordering::Less | Ordering::Equal)) => Some(p),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::InkMask;

    fn bars(w: usize, h: usize, rows: &[(usize, usize)]) -> InkMask {
        let mut data = vec![0u8; w * h];
        for &(y0, y1) in rows {
            for y in y0..y1 {
                for x in 10..w - 10 {
                    data[y * w + x] = 1;
                }
            }
        }
        InkMask::from_raw(w, h, data)
    }

    fn seg(p0: [f32; 2], p1: [f32; 2]) -> LineSegment {
        LineSegment::new(p0, p1, 4.0)
    }

    fn raw(points: Vec<[f32; 2]>) -> RawConnector {
        RawConnector {
            points,
            head_at_start: false,
            head_at_end: false,
            stroke_width: 2.0,
        }
    }

    #[test]
    fn collinear_pieces_with_small_gap_merge() {
        let out = merge_collinear(
            vec![seg([10.0, 20.0], [40.0, 20.0]), seg([45.0, 21.0], [90.0, 21.0])],
            &ConnectorOptions::default(),
        );
        assert_eq!(out.len(), 1);
        let s = &out[0];
        let (lo, hi) = if s.p0[0] < s.p1[0] { (s.p0, s.p1) } else { (s.p1, s.p0) };
        assert!((lo[0] - 10.0).abs() < 0.5 && (hi[0] - 90.0).abs() < 0.5);
    }

    #[test]
    fn distant_or_skewed_pieces_stay_apart() {
        let opts = ConnectorOptions::default();
        let gap = merge_collinear(vec![seg([10.0, 20.0], [40.0, 20.0]), seg([60.0, 20.0], [90.0, 20.0])], &opts);
        assert_eq!(gap.len(), 2);
        let skew = merge_collinear(vec![seg([10.0, 20.0], [40.0, 20.0]), seg([40.0, 20.0], [60.0, 40.0])], &opts);
        assert_eq!(skew.len(), 2);
    }

    #[test]
    fn parallel_edge_responses_of_thick_stroke_merge() {
        let out = merge_collinear(
            vec![seg([10.0, 20.0], [80.0, 20.0]), seg([12.0, 23.0], [78.0, 23.0])],
            &ConnectorOptions::default(),
        );
        assert_eq!(out.len(), 1);
        assert!((out[0].midpoint()[1] - 21.4).abs() < 0.5);
    }

    #[test]
    fn flanks_of_a_thick_stroke_fuse_into_its_centreline() {
        let ink = bars(140, 80, &[(46, 54)]);
        let allowed = vec![1u8; 140 * 80];
        let probe = InkProbe {
            ink: &ink,
            allowed: &allowed,
        };
        let out = fuse_stroke_edges(
            vec![seg([20.0, 54.0], [120.0, 54.0]), seg([20.0, 46.0], [118.0, 46.0])],
            &probe,
            &ConnectorOptions::default(),
        );
        assert_eq!(out.len(), 1, "{out:?}");
        let s = &out[0];
        assert!((s.midpoint()[1] - 50.0).abs() < 1e-3, "{s:?}");
        assert!((s.len - 100.0).abs() < 1e-3);
    }

    #[test]
    fn neighbouring_thin_strokes_do_not_fuse() {
        let ink = bars(140, 80, &[(40, 42), (50, 52)]);
        let allowed = vec![1u8; 140 * 80];
        let probe = InkProbe {
            ink: &ink,
            allowed: &allowed,
        };
        let out = fuse_stroke_edges(
            vec![seg([20.0, 41.0], [120.0, 41.0]), seg([20.0, 51.0], [120.0, 51.0])],
            &probe,
            &ConnectorOptions::default(),
        );
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn elbow_is_joined_into_polyline() {
        let conns = vec![raw(vec![[10.0, 20.0], [60.0, 20.0]]), raw(vec![[61.0, 22.0], [61.0, 90.0]])];
        let out = join_corners(conns, &[], &ConnectorOptions::default());
        assert_eq!(out.len(), 1);
        let pts = &out[0].points;
        assert_eq!(pts.len(), 3);
        assert!((pts[1][0] - 61.0).abs() < 0.1 && (pts[1][1] - 20.0).abs() < 0.1);
    }

    #[test]
    fn ends_near_a_shape_or_with_heads_are_not_joined() {
        let opts = ConnectorOptions::default();
        let conns = vec![raw(vec![[10.0, 20.0], [60.0, 20.0]]), raw(vec![[61.0, 22.0], [61.0, 90.0]])];
        let boxes = [BoundingBox::new(64.0, 10.0, 100.0, 30.0)];
        assert_eq!(join_corners(conns.clone(), &boxes, &opts).len(), 2);

        let mut headed = conns;
        headed[0].head_at_end = true;
        assert_eq!(join_corners(headed, &[], &opts).len(), 2);
    }
}
