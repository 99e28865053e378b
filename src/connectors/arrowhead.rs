//! Endpoint refinement and arrow-head detection on the ink mask.
//!
//! A filled or open arrow head is ink that spreads away from the stroke axis
//! on both sides and narrows toward the tip. The probe walks back from an
//! endpoint over the head window (`head_probe_px`, or `head_width_factor`
//! stroke widths on thick strokes), counting off-axis ink beyond the stroke's
//! half width on each side. The spread further back must dominate the spread
//! within a third of `head_probe_px` of the tip. A stroke ending on a
//! crossing line has its off-axis ink right at the end instead and is
//! rejected.
use super::extractor::LineSegment;
use super::options::ConnectorOptions;
use super::RawConnector;
use crate::geometry::{distance, polyline_length};
use crate::image::InkMask;

/// Ink lookups restricted to the area outside the shapes.
pub(super) struct InkProbe<'a> {
    pub ink: &'a InkMask,
    /// 1 where connector pixels may live, 0 under shapes.
    pub allowed: &'a [u8],
}

impl InkProbe<'_> {
    fn allowed_at(&self, p: [f32; 2]) -> bool {
        let x = p[0].floor();
        let y = p[1].floor();
        if x < 0.0 || y < 0.0 {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        x < self.ink.width() && y < self.ink.height() && self.allowed[y * self.ink.width() + x] != 0
    }

    pub fn ink(&self, p: [f32; 2]) -> bool {
        self.allowed_at(p) && self.ink.is_ink_point(p)
    }

    /// Ink at `p` or one pixel to either side of `normal`.
    fn ink_near_axis(&self, p: [f32; 2], normal: [f32; 2]) -> bool {
        self.ink(p)
            || self.ink([p[0] + normal[0], p[1] + normal[1]])
            || self.ink([p[0] - normal[0], p[1] - normal[1]])
    }
}

/// Push both endpoints outward while ink continues under the axis, by at
/// most `max_px` each.
fn extend_segment(seg: &LineSegment, probe: &InkProbe<'_>, max_px: f32) -> LineSegment {
    let n = seg.normal();
    let grow = |from: [f32; 2], dir: [f32; 2]| -> [f32; 2] {
        let mut best = from;
        let mut step = 1.0;
        while step <= max_px {
            let p = [from[0] + dir[0] * step, from[1] + dir[1] * step];
            if !probe.ink_near_axis(p, n) {
                break;
            }
            best = p;
            step += 1.0;
        }
        best
    };
    let p0 = grow(seg.p0, [-seg.dir[0], -seg.dir[1]]);
    let p1 = grow(seg.p1, seg.dir);
    LineSegment::new(p0, p1, seg.avg_mag)
}

/// Consecutive ink pixels from `from` stepping by `step`, at most `cap`.
fn ink_run(probe: &InkProbe<'_>, from: [f32; 2], step: [f32; 2], cap: usize) -> usize {
    let mut count = 0usize;
    while count < cap {
        let k = (count + 1) as f32;
        if !probe.ink([from[0] + step[0] * k, from[1] + step[1] * k]) {
            break;
        }
        count += 1;
    }
    count
}

/// Ink thickness across the segment at its midpoint, at most `max_width`.
pub(super) fn stroke_width(seg: &LineSegment, probe: &InkProbe<'_>, max_width: f32) -> f32 {
    let mid = seg.midpoint();
    let n = seg.normal();
    let cap = max_width.ceil().max(1.0) as usize;
    let across = usize::from(probe.ink(mid))
        + ink_run(probe, mid, n, cap)
        + ink_run(probe, mid, [-n[0], -n[1]], cap);
    (across.max(1) as f32).min(max_width.max(1.0))
}

/// Does the endpoint `end`, reached along `outward`, carry an arrow head?
pub(super) fn has_head(
    end: [f32; 2],
    outward: [f32; 2],
    stroke_width: f32,
    probe: &InkProbe<'_>,
    options: &ConnectorOptions,
) -> bool {
    let inward = [-outward[0], -outward[1]];
    let normal = [-outward[1], outward[0]];
    let window = options.head_window(stroke_width);
    let reach = (0.5 * window).ceil() as usize;
    let lateral_start = 0.5 * stroke_width + 1.5;
    let near_limit = options.head_probe_px / 3.0;

    let (mut pos, mut neg) = (0usize, 0usize);
    let (mut near, mut far) = (0usize, 0usize);
    let mut t = 0.5;
    while t < window {
        let c = [end[0] + inward[0] * t, end[1] + inward[1] * t];
        let mut row = 0usize;
        for k in 0..reach {
            let s = lateral_start + k as f32;
            if probe.ink([c[0] + normal[0] * s, c[1] + normal[1] * s]) {
                pos += 1;
                row += 1;
            }
            if probe.ink([c[0] - normal[0] * s, c[1] - normal[1] * s]) {
                neg += 1;
                row += 1;
            }
        }
        if t < near_limit {
            near += row;
        } else {
            far += row;
        }
        t += 1.0;
    }

    pos >= options.head_min_pixels && neg >= options.head_min_pixels && far > near
}

/// Measure the stroke, extend it through any arrow head and flag its ends.
pub(super) fn to_connector(seg: &LineSegment, probe: &InkProbe<'_>, options: &ConnectorOptions) -> RawConnector {
    let width = stroke_width(seg, probe, options.max_stroke_width_px);
    let seg = extend_segment(seg, probe, options.head_window(width));
    let head_at_start = has_head(seg.p0, [-seg.dir[0], -seg.dir[1]], width, probe, options);
    let head_at_end = has_head(seg.p1, seg.dir, width, probe, options);
    RawConnector {
        points: vec![seg.p0, seg.p1],
        head_at_start,
        head_at_end,
        stroke_width: width,
    }
}

/// Area behind a detected head tip, in the tip's frame.
#[derive(Clone, Copy, Debug)]
struct HeadZone {
    tip: [f32; 2],
    inward: [f32; 2],
    /// Depth behind the tip covered by the head.
    depth: f32,
    /// Distance either side of the axis covered by the head.
    side: f32,
    slack: f32,
    owner_len: f32,
}

impl HeadZone {
    fn at(c: &RawConnector, at_end: bool, probe: &InkProbe<'_>, options: &ConnectorOptions) -> Option<Self> {
        let n = c.points.len();
        let (tip, prev) = if at_end {
            (c.points[n - 1], c.points[n - 2])
        } else {
            (c.points[0], c.points[1])
        };
        let d = distance(tip, prev);
        if d <= 0.0 {
            return None;
        }
        let inward = [(prev[0] - tip[0]) / d, (prev[1] - tip[1]) / d];
        let window = options.head_window(c.stroke_width);
        let (len, half) = measure_head(tip, inward, c.stroke_width, probe, 4.0 * window);
        let slack = 0.5 * c.stroke_width + 2.0;
        Some(Self {
            tip,
            inward,
            depth: window.max(len + slack),
            side: window.max(half + slack),
            slack,
            owner_len: polyline_length(&c.points),
        })
    }

    /// Would a stroke of length `len` centred at `mid` be part of this head?
    fn absorbs(&self, mid: [f32; 2], len: f32) -> bool {
        if self.owner_len <= len || len > 2.0 * self.depth.max(self.side) {
            return false;
        }
        let v = [mid[0] - self.tip[0], mid[1] - self.tip[1]];
        let along = v[0] * self.inward[0] + v[1] * self.inward[1];
        let across = (v[0] * self.inward[1] - v[1] * self.inward[0]).abs();
        along >= -self.slack && along <= self.depth && across <= self.side
    }
}

/// Depth behind `tip` over which the ink cross-section is wider than the
/// shaft, and the largest half-width seen there. Zero for open heads.
fn measure_head(
    tip: [f32; 2],
    inward: [f32; 2],
    stroke_width: f32,
    probe: &InkProbe<'_>,
    limit: f32,
) -> (f32, f32) {
    let normal = [-inward[1], inward[0]];
    let cap = limit.ceil() as usize;
    let (mut depth, mut half) = (0.0f32, 0.0f32);
    let mut t = 0.5;
    while t <= limit {
        let c = [tip[0] + inward[0] * t, tip[1] + inward[1] * t];
        if !probe.ink(c) {
            break;
        }
        let pos = ink_run(probe, c, normal, cap);
        let neg = ink_run(probe, c, [-normal[0], -normal[1]], cap);
        if (1 + pos + neg) as f32 > stroke_width + 1.5 {
            depth = t;
            half = half.max(pos.max(neg) as f32 + 0.5);
        } else if depth > 0.0 {
            break;
        }
        t += 1.0;
    }
    (depth, half)
}

/// Drop short strokes lying inside another connector's arrow head (the
/// head's own edges). Returns the kept connectors and the absorbed count.
pub(super) fn absorb_head_strokes(
    connectors: Vec<RawConnector>,
    probe: &InkProbe<'_>,
    options: &ConnectorOptions,
) -> (Vec<RawConnector>, usize) {
    let heads: Vec<HeadZone> = connectors
        .iter()
        .flat_map(|c| {
            let start = c.head_at_start.then(|| HeadZone::at(c, false, probe, options)).flatten();
            let end = c.head_at_end.then(|| HeadZone::at(c, true, probe, options)).flatten();
            start.into_iter().chain(end)
        })
        .collect();

    let before = connectors.len();
    let kept: Vec<RawConnector> = connectors
        .into_iter()
        .filter(|c| {
            let (mid, len) = (c.midpoint(), c.length());
            !heads.iter().any(|zone| zone.absorbs(mid, len))
        })
        .collect();
    let absorbed = before - kept.len();
    (kept, absorbed)
}
