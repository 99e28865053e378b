//! Planar helpers shared by the detectors, the resolver and the associator.
//!
//! Points are `[f32; 2]` in image coordinates with the pixel `(x, y)` covering
//! `[x, x + 1) × [y, y + 1)`, so pixel centres sit at `x + 0.5`.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Axis-aligned box `[x0, x1) × [y0, y1)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn center(&self) -> [f32; 2] {
        [0.5 * (self.x0 + self.x1), 0.5 * (self.y0 + self.y1)]
    }

    pub fn contains(&self, p: [f32; 2]) -> bool {
        p[0] >= self.x0 && p[0] <= self.x1 && p[1] >= self.y0 && p[1] <= self.y1
    }

    /// Box grown by `margin` on every side.
    pub fn expanded(&self, margin: f32) -> Self {
        Self {
            x0: self.x0 - margin,
            y0: self.y0 - margin,
            x1: self.x1 + margin,
            y1: self.y1 + margin,
        }
    }

    /// Euclidean distance from `p` to the box (0 inside).
    pub fn distance_to(&self, p: [f32; 2]) -> f32 {
        let dx = (self.x0 - p[0]).max(0.0).max(p[0] - self.x1);
        let dy = (self.y0 - p[1]).max(0.0).max(p[1] - self.y1);
        (dx * dx + dy * dy).sqrt()
    }

    /// Smallest box containing all points, `None` for an empty slice.
    pub fn enclosing(points: &[[f32; 2]]) -> Option<Self> {
        let first = points.first()?;
        let mut b = Self::new(first[0], first[1], first[0], first[1]);
        for p in &points[1..] {
            b.x0 = b.x0.min(p[0]);
            b.y0 = b.y0.min(p[1]);
            b.x1 = b.x1.max(p[0]);
            b.y1 = b.y1.max(p[1]);
        }
        Some(b)
    }
}

#[inline]
pub fn distance(a: [f32; 2], b: [f32; 2]) -> f32 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    (dx * dx + dy * dy).sqrt()
}

/// Distance from `p` to the segment `a`–`b`.
pub fn point_segment_distance(p: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    let vx = b[0] - a[0];
    let vy = b[1] - a[1];
    let len_sq = vx * vx + vy * vy;
    if len_sq <= f32::EPSILON {
        return distance(p, a);
    }
    let t = (((p[0] - a[0]) * vx + (p[1] - a[1]) * vy) / len_sq).clamp(0.0, 1.0);
    distance(p, [a[0] + t * vx, a[1] + t * vy])
}

/// Distance from `p` to an open polyline.
pub fn point_polyline_distance(p: [f32; 2], points: &[[f32; 2]]) -> f32 {
    match points {
        [] => f32::INFINITY,
        [only] => distance(p, *only),
        _ => points
            .windows(2)
            .map(|w| point_segment_distance(p, w[0], w[1]))
            .fold(f32::INFINITY, f32::min),
    }
}

/// Distance from `p` to the boundary of a closed polygon.
pub fn point_polygon_boundary_distance(p: [f32; 2], polygon: &[[f32; 2]]) -> f32 {
    let n = polygon.len();
    if n == 0 {
        return f32::INFINITY;
    }
    if n == 1 {
        return distance(p, polygon[0]);
    }
    (0..n)
        .map(|i| point_segment_distance(p, polygon[i], polygon[(i + 1) % n]))
        .fold(f32::INFINITY, f32::min)
}

/// Even-odd point-in-polygon test.
pub fn point_in_polygon(p: [f32; 2], polygon: &[[f32; 2]]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi[1] > p[1]) != (pj[1] > p[1]) {
            let x = pj[0] + (p[1] - pj[1]) * (pi[0] - pj[0]) / (pi[1] - pj[1]);
            if p[0] < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Signed shoelace area (positive for clockwise order on screen, y down).
pub fn signed_area(polygon: &[[f32; 2]]) -> f32 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }
    let mut acc = 0.0f64;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        acc += a[0] as f64 * b[1] as f64 - b[0] as f64 * a[1] as f64;
    }
    (acc * 0.5) as f32
}

/// Area centroid of a closed polygon; falls back to the vertex mean for
/// degenerate (zero-area) input.
pub fn polygon_centroid(polygon: &[[f32; 2]]) -> [f32; 2] {
    let n = polygon.len();
    if n == 0 {
        return [0.0, 0.0];
    }
    let mut a2 = 0.0f64;
    let mut cx = 0.0f64;
    let mut cy = 0.0f64;
    for i in 0..n {
        let p = polygon[i];
        let q = polygon[(i + 1) % n];
        let cross = p[0] as f64 * q[1] as f64 - q[0] as f64 * p[1] as f64;
        a2 += cross;
        cx += (p[0] as f64 + q[0] as f64) * cross;
        cy += (p[1] as f64 + q[1] as f64) * cross;
    }
    if a2.abs() < 1e-9 {
        let sx: f64 = polygon.iter().map(|p| p[0] as f64).sum();
        let sy: f64 = polygon.iter().map(|p| p[1] as f64).sum();
        return [(sx / n as f64) as f32, (sy / n as f64) as f32];
    }
    [(cx / (3.0 * a2)) as f32, (cy / (3.0 * a2)) as f32]
}

pub fn closed_perimeter(polygon: &[[f32; 2]]) -> f32 {
    let n = polygon.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| distance(polygon[i], polygon[(i + 1) % n]))
        .sum()
}

pub fn polyline_length(points: &[[f32; 2]]) -> f32 {
    points.windows(2).map(|w| distance(w[0], w[1])).sum()
}

/// True when every turn of the closed polygon has the same orientation.
/// Collinear vertices are tolerated.
pub fn is_convex(polygon: &[[f32; 2]]) -> bool {
    let n = polygon.len();
    if n < 4 {
        return n == 3;
    }
    let mut sign = 0.0f32;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let c = polygon[(i + 2) % n];
        let cross = (b[0] - a[0]) * (c[1] - b[1]) - (b[1] - a[1]) * (c[0] - b[0]);
        if cross.abs() <= 1e-6 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

/// Douglas–Peucker simplification of a closed curve.
///
/// The curve is split at its first point and the point farthest from it, and
/// both halves are simplified as open polylines. Returned vertices keep the
/// input order and start at `points[0]`.
pub fn simplify_closed(points: &[[f32; 2]], epsilon: f32) -> Vec<[f32; 2]> {
    let n = points.len();
    if n < 4 {
        return points.to_vec();
    }
    let far = (1..n)
        .max_by(|&a, &b| {
            distance(points[0], points[a])
                .partial_cmp(&distance(points[0], points[b]))
                .unwrap_or(Ordering::Equal)
        })
        .unwrap_or(n / 2);

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[far] = true;
    mark_douglas_peucker(points, 0, far, epsilon, &mut keep);

    let mut second: Vec<[f32; 2]> = points[far..].to_vec();
    second.push(points[0]);
    let mut keep_second = vec![false; second.len()];
    let last = second.len() - 1;
    keep_second[0] = true;
    keep_second[last] = true;
    mark_douglas_peucker(&second, 0, last, epsilon, &mut keep_second);
    for (offset, &k) in keep_second[..last].iter().enumerate() {
        if k {
            keep[far + offset] = true;
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

fn mark_douglas_peucker(
    points: &[[f32; 2]],
    start: usize,
    end: usize,
    epsilon: f32,
    keep: &mut [bool],
) {
    let mut stack = vec![(start, end)];
    while let Some((s, e)) = stack.pop() {
        if e <= s + 1 {
            continue;
        }
        let mut max_dist = -1.0f32;
        let mut index = s;
        for i in (s + 1)..e {
            let d = point_segment_distance(points[i], points[s], points[e]);
            if d > max_dist {
                max_dist = d;
                index = i;
            }
        }
        if max_dist > epsilon {
            keep[index] = true;
            stack.push((s, index));
            stack.push((index, e));
        }
    }
}

/// Lexicographic (y, then x) comparison: raster scan order.
pub fn raster_cmp(a: [f32; 2], b: [f32; 2]) -> Ordering {
    a[1].total_cmp(&b[1]).then(a[0].total_cmp(&b[0]))
}
