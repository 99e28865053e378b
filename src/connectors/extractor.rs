use super::options::ConnectorOptions;
use super::region_accumulator::RegionAccumulator;
use crate::angle::{angular_difference, normalize_half_pi};
use crate::edges::{sobel_gradients, Grad};
use crate::image::ImageF32;
use nalgebra::{Matrix2, SymmetricEigen};

const NEIGH_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Straight piece of a stroke, endpoints at pixel centres.
#[derive(Clone, Debug, PartialEq)]
pub struct LineSegment {
    pub p0: [f32; 2],
    pub p1: [f32; 2],
    /// Unit tangent from `p0` to `p1`.
    pub dir: [f32; 2],
    pub len: f32,
    pub avg_mag: f32,
}

impl LineSegment {
    pub fn new(p0: [f32; 2], p1: [f32; 2], avg_mag: f32) -> Self {
        let dx = p1[0] - p0[0];
        let dy = p1[1] - p0[1];
        let len = (dx * dx + dy * dy).sqrt();
        let dir = if len > 0.0 { [dx / len, dy / len] } else { [1.0, 0.0] };
        Self {
            p0,
            p1,
            dir,
            len,
            avg_mag,
        }
    }

    pub fn midpoint(&self) -> [f32; 2] {
        [0.5 * (self.p0[0] + self.p1[0]), 0.5 * (self.p0[1] + self.p1[1])]
    }

    /// Unit normal (tangent rotated by +90°).
    pub fn normal(&self) -> [f32; 2] {
        [-self.dir[1], self.dir[0]]
    }
}

/// Region-growing line extractor over the ink image.
///
/// Seeds are visited in raster order. A region grows through 8-connected
/// pixels above the magnitude gate whose folded gradient orientation stays
/// within the tolerance of the seed, and becomes a segment when it is large,
/// coherent and long enough. Pixels whose `mask` entry is 0 are never seeded
/// or grown into; the connector stage uses this to hide shape outlines.
pub(super) struct LineExtractor<'a> {
    grad: Grad,
    width: usize,
    height: usize,
    gates: Gates,
    used: Vec<u8>,
    orientation: Vec<f32>,
    stack: Vec<usize>,
    region: RegionAccumulator,
    segments: Vec<LineSegment>,
    mask: Option<&'a [u8]>,
}

/// Acceptance thresholds, angles in radians.
struct Gates {
    magnitude: f32,
    grow_tol: f32,
    aligned_tol: f32,
    min_aligned: f32,
    min_region: usize,
    min_len: f32,
}

impl<'a> LineExtractor<'a> {
    pub(super) fn new(ink: &ImageF32, mask: Option<&'a [u8]>, options: &ConnectorOptions) -> Self {
        let n = ink.w * ink.h;
        debug_assert!(mask.map_or(true, |m| m.len() >= n), "mask shorter than image");
        let grow_tol = options.angle_tolerance_deg.to_radians();
        let grad = sobel_gradients(ink);
        // Orientation is folded to [0, π) so both flanks of a stroke agree.
        let orientation = (0..n)
            .map(|i| normalize_half_pi(grad.angle(i % ink.w, i / ink.w)))
            .collect();
        Self {
            grad,
            width: ink.w,
            height: ink.h,
            gates: Gates {
                magnitude: options.magnitude_threshold,
                grow_tol,
                aligned_tol: 0.5 * grow_tol,
                min_aligned: options.min_aligned_fraction,
                min_region: options.min_region_px.max(2),
                min_len: options.min_segment_px,
            },
            used: vec![0u8; n],
            orientation,
            stack: Vec::with_capacity(64),
            region: RegionAccumulator::with_capacity(128),
            segments: Vec::new(),
            mask,
        }
    }

    pub(super) fn extract(mut self) -> Vec<LineSegment> {
        for idx in 0..self.width * self.height {
            if self.is_candidate(idx) {
                self.grow_from(idx);
            }
        }
        self.segments
    }

    /// Unused, unmasked and strong enough to seed or join a region.
    fn is_candidate(&self, idx: usize) -> bool {
        self.used[idx] == 0
            && self.mask.map_or(true, |m| m[idx] != 0)
            && self.grad.mag.data[idx] >= self.gates.magnitude
    }

    fn grow_from(&mut self, seed: usize) {
        self.region.reset();
        self.stack.clear();
        let seed_angle = self.orientation[seed];
        self.used[seed] = 1;
        self.stack.push(seed);

        while let Some(idx) = self.stack.pop() {
            let (x, y) = (idx % self.width, idx / self.width);
            let angle = self.orientation[idx];
            let aligned = angular_difference(angle, seed_angle) <= self.gates.aligned_tol;
            self.region.push(idx, x, y, self.grad.mag.data[idx], aligned);

            for (dx, dy) in NEIGH_OFFSETS {
                let (xn, yn) = (x as isize + dx, y as isize + dy);
                if xn < 0 || yn < 0 || xn >= self.width as isize || yn >= self.height as isize {
                    continue;
                }
                let n = yn as usize * self.width + xn as usize;
                if self.is_candidate(n)
                    && angular_difference(self.orientation[n], seed_angle) <= self.gates.grow_tol
                {
                    self.used[n] = 1;
                    self.stack.push(n);
                }
            }
        }

        match self.fit_segment() {
            Some(segment) => self.segments.push(segment),
            None => {
                // Let the pixels join a later region, but never reseed here.
                self.region.release(&mut self.used);
                self.used[seed] = 1;
            }
        }
    }

    fn fit_segment(&self) -> Option<LineSegment> {
        let g = &self.gates;
        if self.region.len() < g.min_region || self.region.aligned_fraction() < g.min_aligned {
            return None;
        }
        let [cx, cy] = self.region.mean()?;
        let (cxx, cyy, cxy) = self.region.covariance()?;
        let eig = SymmetricEigen::new(Matrix2::new(cxx, cxy, cxy, cyy));
        let major = if eig.eigenvalues[0] >= eig.eigenvalues[1] { 0 } else { 1 };
        let spread = eig.eigenvalues[major];
        if spread.is_nan() || spread <= 0.0 {
            return None;
        }
        let v = eig.eigenvectors.column(major);
        let norm = v[0].hypot(v[1]);
        if !norm.is_finite() || norm < 1e-6 {
            return None;
        }
        let t = [v[0] / norm, v[1] / norm];

        let (smin, smax) = self.region.indices.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY),
            |(lo, hi), &idx| {
                let s = ((idx % self.width) as f32 - cx) * t[0] + ((idx / self.width) as f32 - cy) * t[1];
                (lo.min(s), hi.max(s))
            },
        );
        let len = smax - smin;
        if !len.is_finite() || len <= 0.0 || len < g.min_len {
            return None;
        }

        // Moments are over pixel indices; shift to pixel centres.
        let at = |s: f32| [cx + s * t[0] + 0.5, cy + s * t[1] + 0.5];
        Some(LineSegment::new(at(smin), at(smax), self.region.avg_mag()))
    }
}
