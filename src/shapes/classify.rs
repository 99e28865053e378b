//! Polygonal approximation and primitive classification of closed contours.
use super::contour::Contour;
use super::options::ShapeOptions;
use super::shape::ShapeKind;
use crate::angle::axis_deviation_deg;
use crate::geometry::{distance, is_convex, polygon_centroid, simplify_closed, BoundingBox};

// Vertices turning by less than this are folded into their neighbours.
const MIN_TURN_DEG: f32 = 12.0;

/// Result of classifying one contour.
#[derive(Clone, Debug)]
pub struct Classification {
    pub kind: ShapeKind,
    /// Simplified outline the kind was decided on.
    pub polygon: Vec<[f32; 2]>,
}

/// Approximate `contour` with a reduced polygon and classify it.
pub fn classify_contour(contour: &Contour, options: &ShapeOptions) -> Classification {
    let epsilon = (options.approx_epsilon_ratio * contour.perimeter()).max(1.0);
    let polygon = drop_shallow_vertices(simplify_closed(&contour.points, epsilon));
    let kind = classify_polygon(&polygon, contour, options);
    Classification { kind, polygon }
}

fn classify_polygon(polygon: &[[f32; 2]], contour: &Contour, options: &ShapeOptions) -> ShapeKind {
    let n = polygon.len();
    match n {
        4 if is_rectangle(polygon, options) => ShapeKind::Rectangle,
        4 if is_diamond(polygon, options) => ShapeKind::Diamond,
        n if n >= options.curve_min_vertices && is_convex(polygon) => {
            if is_ellipse(contour, options) {
                ShapeKind::Ellipse
            } else if is_terminator(polygon, contour, options) {
                ShapeKind::Terminator
            } else {
                ShapeKind::Unknown
            }
        }
        _ => ShapeKind::Unknown,
    }
}

fn edges(polygon: &[[f32; 2]]) -> impl Iterator<Item = ([f32; 2], [f32; 2])> + '_ {
    let n = polygon.len();
    (0..n).map(move |i| (polygon[i], polygon[(i + 1) % n]))
}

fn edge_dir(a: [f32; 2], b: [f32; 2]) -> [f32; 2] {
    [b[0] - a[0], b[1] - a[1]]
}

fn opposite_sides_balanced(polygon: &[[f32; 2]], min_ratio: f32) -> bool {
    let len: Vec<f32> = edges(polygon).map(|(a, b)| distance(a, b)).collect();
    let ratio = |a: f32, b: f32| a.min(b) / a.max(b).max(f32::EPSILON);
    ratio(len[0], len[2]) >= min_ratio && ratio(len[1], len[3]) >= min_ratio
}

fn is_rectangle(polygon: &[[f32; 2]], options: &ShapeOptions) -> bool {
    is_convex(polygon)
        && edges(polygon).all(|(a, b)| axis_deviation_deg(edge_dir(a, b)) <= options.axis_tolerance_deg)
        && opposite_sides_balanced(polygon, options.min_side_ratio)
}

fn is_diamond(polygon: &[[f32; 2]], options: &ShapeOptions) -> bool {
    let min_dev = 45.0 - options.diagonal_tolerance_deg;
    is_convex(polygon)
        && edges(polygon).all(|(a, b)| axis_deviation_deg(edge_dir(a, b)) >= min_dev)
        && opposite_sides_balanced(polygon, options.min_side_ratio)
}

/// Mean deviation of the box-normalized radius from 1 over the full contour,
/// plus a fill-ratio cap that keeps rounded rectangles out.
fn is_ellipse(contour: &Contour, options: &ShapeOptions) -> bool {
    let b = contour.center_box();
    let (a, c) = (0.5 * b.width(), 0.5 * b.height());
    if a < 1.0 || c < 1.0 || contour.points.is_empty() {
        return false;
    }
    let [cx, cy] = b.center();
    let total: f32 = contour
        .points
        .iter()
        .map(|p| {
            let u = (p[0] - cx) / a;
            let v = (p[1] - cy) / c;
            ((u * u + v * v).sqrt() - 1.0).abs()
        })
        .sum();
    let mean_dev = total / contour.points.len() as f32;
    mean_dev <= options.ellipse_tolerance && fill_ratio(contour.area(), &b) <= options.ellipse_max_fill
}

/// Elongated outline with two long straight sides parallel to its long axis.
fn is_terminator(polygon: &[[f32; 2]], contour: &Contour, options: &ShapeOptions) -> bool {
    let b = contour.center_box();
    let (w, h) = (b.width(), b.height());
    let (long, short) = if w >= h { (w, h) } else { (h, w) };
    if short < 1.0 || long / short < options.terminator_min_elongation {
        return false;
    }
    let horizontal = w >= h;
    let min_len = options.straight_side_ratio * long;
    let straight = edges(polygon)
        .filter(|&(p, q)| {
            let d = edge_dir(p, q);
            let along_long = if horizontal {
                d[0].abs() >= d[1].abs()
            } else {
                d[1].abs() > d[0].abs()
            };
            along_long
                && axis_deviation_deg(d) <= options.axis_tolerance_deg
                && distance(p, q) >= min_len
        })
        .count();
    straight >= 2
}

fn fill_ratio(area: f32, b: &BoundingBox) -> f32 {
    area / b.area().max(f32::EPSILON)
}

/// Remove vertices whose turn angle is below [`MIN_TURN_DEG`], keeping at
/// least a triangle.
fn drop_shallow_vertices(mut polygon: Vec<[f32; 2]>) -> Vec<[f32; 2]> {
    loop {
        let n = polygon.len();
        if n <= 3 {
            return polygon;
        }
        let shallow = (0..n).find(|&i| {
            let prev = polygon[(i + n - 1) % n];
            let cur = polygon[i];
            let next = polygon[(i + 1) % n];
            turn_deg(prev, cur, next) < MIN_TURN_DEG
        });
        match shallow {
            Some(i) => {
                polygon.remove(i);
            }
            None => return polygon,
        }
    }
}

fn turn_deg(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> f32 {
    let u = edge_dir(a, b);
    let v = edge_dir(b, c);
    let nu = (u[0] * u[0] + u[1] * u[1]).sqrt();
    let nv = (v[0] * v[0] + v[1] * v[1]).sqrt();
    if nu <= f32::EPSILON || nv <= f32::EPSILON {
        return 0.0;
    }
    let cos = ((u[0] * v[0] + u[1] * v[1]) / (nu * nv)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Area centroid of the full contour.
pub fn contour_centroid(contour: &Contour) -> [f32; 2] {
    polygon_centroid(&contour.points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contour_from(points: Vec<[f32; 2]>) -> Contour {
        let pixels = points
            .iter()
            .map(|p| (p[0].max(0.0) as usize, p[1].max(0.0) as usize))
            .collect();
        Contour {
            points,
            pixels,
            pixel_count: 0,
        }
    }

    fn densify(corners: &[[f32; 2]], step: f32) -> Vec<[f32; 2]> {
        let n = corners.len();
        let mut out = Vec::new();
        for i in 0..n {
            let a = corners[i];
            let b = corners[(i + 1) % n];
            let len = distance(a, b);
            let k = (len / step).ceil().max(1.0) as usize;
            for j in 0..k {
                let t = j as f32 / k as f32;
                out.push([a[0] + t * (b[0] - a[0]), a[1] + t * (b[1] - a[1])]);
            }
        }
        out
    }

    fn ellipse_points(cx: f32, cy: f32, a: f32, b: f32, n: usize) -> Vec<[f32; 2]> {
        // Start at the top, clockwise on screen.
        (0..n)
            .map(|i| {
                let t = -std::f32::consts::FRAC_PI_2 + i as f32 * std::f32::consts::TAU / n as f32;
                [cx + a * t.cos(), cy + b * t.sin()]
            })
            .collect()
    }

    #[test]
    fn axis_aligned_box_is_rectangle() {
        let c = contour_from(densify(&[[10.0, 10.0], [90.0, 10.0], [90.0, 50.0], [10.0, 50.0]], 1.0));
        let cls = classify_contour(&c, &ShapeOptions::default());
        assert_eq!(cls.kind, ShapeKind::Rectangle);
        assert_eq!(cls.polygon.len(), 4);
    }

    #[test]
    fn rotated_square_is_diamond() {
        let c = contour_from(densify(&[[50.0, 10.0], [90.0, 50.0], [50.0, 90.0], [10.0, 50.0]], 1.0));
        assert_eq!(classify_contour(&c, &ShapeOptions::default()).kind, ShapeKind::Diamond);
    }

    #[test]
    fn smooth_oval_is_ellipse() {
        let c = contour_from(ellipse_points(100.0, 60.0, 60.0, 35.0, 360));
        assert_eq!(classify_contour(&c, &ShapeOptions::default()).kind, ShapeKind::Ellipse);
    }

    #[test]
    fn stadium_is_terminator() {
        // 120x50 stadium: straight runs of 70 px joined by radius-25 caps.
        let mut pts = Vec::new();
        let (x0, x1, cy, r) = (45.0f32, 115.0f32, 50.0f32, 25.0f32);
        let mut x = x0;
        while x < x1 {
            pts.push([x, cy - r]);
            x += 1.0;
        }
        for i in 0..80 {
            let t = -std::f32::consts::FRAC_PI_2 + i as f32 * std::f32::consts::PI / 80.0;
            pts.push([x1 + r * t.cos(), cy + r * t.sin()]);
        }
        let mut x = x1;
        while x > x0 {
            pts.push([x, cy + r]);
            x -= 1.0;
        }
        for i in 0..80 {
            let t = std::f32::consts::FRAC_PI_2 + i as f32 * std::f32::consts::PI / 80.0;
            pts.push([x0 + r * t.cos(), cy + r * t.sin()]);
        }
        let c = contour_from(pts);
        assert_eq!(classify_contour(&c, &ShapeOptions::default()).kind, ShapeKind::Terminator);
    }

    #[test]
    fn concave_outline_is_unknown() {
        let l_shape = [
            [10.0, 10.0],
            [40.0, 10.0],
            [40.0, 60.0],
            [80.0, 60.0],
            [80.0, 90.0],
            [10.0, 90.0],
        ];
        let c = contour_from(densify(&l_shape, 1.0));
        assert_eq!(classify_contour(&c, &ShapeOptions::default()).kind, ShapeKind::Unknown);
    }

    #[test]
    fn shallow_vertices_are_folded() {
        let poly = vec![[0.0, 0.0], [20.0, 0.5], [40.0, 0.0], [40.0, 30.0], [0.0, 30.0]];
        assert_eq!(drop_shallow_vertices(poly).len(), 4);
    }
}
