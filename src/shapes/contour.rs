//! Closed-contour extraction from the ink mask.
//!
//! A drawn outline separates its interior from the page background, so every
//! closed shape shows up as a 4-connected background region that does not
//! reach the image border. Regions are labelled in raster order and the outer
//! boundary of each enclosed region is traced with Moore-neighbour tracing
//! starting from its raster-first pixel. Glyphs written inside a shape only
//! punch holes into the region; they do not change its outer boundary.
use crate::geometry::{closed_perimeter, signed_area, BoundingBox};
use crate::image::InkMask;
use log::warn;

// Clockwise on screen (y down), starting east.
const DIRS: [(isize, isize); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];
const WEST: usize = 4;
const FOUR_NEIGHBOURS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Closed boundary of an enclosed background region, as pixel centres in
/// clockwise order starting at the raster-first pixel.
#[derive(Clone, Debug)]
pub struct Contour {
    pub points: Vec<[f32; 2]>,
    /// Integer pixel coordinates matching `points`.
    pub(crate) pixels: Vec<(usize, usize)>,
    /// Number of background pixels in the region (holes excluded).
    pub pixel_count: usize,
}

impl Contour {
    /// Enclosed area (shoelace over pixel centres).
    pub fn area(&self) -> f32 {
        signed_area(&self.points).abs()
    }

    pub fn perimeter(&self) -> f32 {
        closed_perimeter(&self.points)
    }

    /// Box spanned by the contour's pixel centres.
    pub fn center_box(&self) -> BoundingBox {
        BoundingBox::enclosing(&self.points).unwrap_or_default()
    }

    /// First point in raster order; the tracing start.
    pub fn first_point(&self) -> [f32; 2] {
        self.points[0]
    }
}

struct Region {
    label: u32,
    seed: (usize, usize),
    pixel_count: usize,
    touches_border: bool,
}

/// Find the contours of all enclosed background regions, in raster order of
/// their first pixel.
pub fn find_closed_contours(mask: &InkMask) -> Vec<Contour> {
    let (w, h) = (mask.width(), mask.height());
    if w == 0 || h == 0 {
        return Vec::new();
    }
    let mut labels = vec![0u32; w * h];
    let mut regions = Vec::new();
    let mut stack = Vec::with_capacity(256);
    let mut next_label = 1u32;

    for idx in 0..(w * h) {
        if labels[idx] != 0 || mask.is_ink(idx % w, idx / w) {
            continue;
        }
        let label = next_label;
        next_label += 1;
        let mut region = Region {
            label,
            seed: (idx % w, idx / w),
            pixel_count: 0,
            touches_border: false,
        };
        labels[idx] = label;
        stack.clear();
        stack.push(idx);
        while let Some(cur) = stack.pop() {
            let x = cur % w;
            let y = cur / w;
            region.pixel_count += 1;
            if x == 0 || y == 0 || x + 1 == w || y + 1 == h {
                region.touches_border = true;
            }
            for (dx, dy) in FOUR_NEIGHBOURS {
                let xn = x as isize + dx;
                let yn = y as isize + dy;
                if xn < 0 || yn < 0 || xn >= w as isize || yn >= h as isize {
                    continue;
                }
                let n = yn as usize * w + xn as usize;
                if labels[n] == 0 && !mask.is_ink(xn as usize, yn as usize) {
                    labels[n] = label;
                    stack.push(n);
                }
            }
        }
        regions.push(region);
    }

    regions
        .into_iter()
        .filter(|r| !r.touches_border)
        .map(|r| {
            let pixels = trace_boundary(&labels, w, h, &r);
            let points = pixels
                .iter()
                .map(|&(x, y)| [x as f32 + 0.5, y as f32 + 0.5])
                .collect();
            Contour {
                points,
                pixels,
                pixel_count: r.pixel_count,
            }
        })
        .collect()
}

fn trace_boundary(labels: &[u32], w: usize, h: usize, region: &Region) -> Vec<(usize, usize)> {
    let inside = |x: isize, y: isize| {
        x >= 0
            && y >= 0
            && x < w as isize
            && y < h as isize
            && labels[y as usize * w + x as usize] == region.label
    };

    let start = (region.seed.0 as isize, region.seed.1 as isize);
    let mut pixels = vec![region.seed];
    let mut p = start;
    // The raster-first pixel never has a region pixel to its west.
    let mut back = WEST;
    let mut first_move: Option<(isize, isize)> = None;
    let max_steps = 4 * region.pixel_count + 16;

    for _ in 0..max_steps {
        let mut found = None;
        for k in 1..=8 {
            let d = (back + k) % 8;
            let q = (p.0 + DIRS[d].0, p.1 + DIRS[d].1);
            if inside(q.0, q.1) {
                found = Some((d, q));
                break;
            }
        }
        let Some((d, q)) = found else {
            // Isolated pixel.
            return pixels;
        };

        if p == start {
            match first_move {
                None => first_move = Some(q),
                Some(m) if m == q => {
                    // Drop the repeated start pixel.
                    pixels.pop();
                    return pixels;
                }
                Some(_) => {}
            }
        }

        // The neighbour examined just before `q` is background; re-express it
        // relative to `q` to continue the sweep from there.
        let prev = (d + 7) % 8;
        let bx = DIRS[prev].0 - DIRS[d].0;
        let by = DIRS[prev].1 - DIRS[d].1;
        back = direction_index(bx, by).unwrap_or(WEST);
        p = q;
        pixels.push((p.0 as usize, p.1 as usize));
    }

    warn!(
        "contour tracing hit the step guard at seed {:?} ({} px region)",
        region.seed, region.pixel_count
    );
    pixels
}

fn direction_index(dx: isize, dy: isize) -> Option<usize> {
    DIRS.iter().position(|&(x, y)| x == dx && y == dy)
}
