use flowchart_detector::image::ImageU8;

/// White sheet with black strokes drawn by pixel rules.
pub struct Canvas {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

#[allow(dead_code)]
impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "image dimensions must be positive");
        Self {
            width,
            height,
            data: vec![255u8; width * height],
        }
    }

    pub fn view(&self) -> ImageU8<'_> {
        ImageU8::new(self.width, self.height, &self.data)
    }

    /// Paint the half-open box `[x0, x1) × [y0, y1)`.
    pub fn fill(&mut self, x0: usize, y0: usize, x1: usize, y1: usize) {
        for y in y0..y1.min(self.height) {
            for x in x0..x1.min(self.width) {
                self.data[y * self.width + x] = 0;
            }
        }
    }

    /// Rectangle outline with a 2 px stroke inside `[x0, x1) × [y0, y1)`.
    pub fn rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize) {
        self.fill(x0, y0, x1, y0 + 2);
        self.fill(x0, y1 - 2, x1, y1);
        self.fill(x0, y0, x0 + 2, y1);
        self.fill(x1 - 2, y0, x1, y1);
    }

    /// Diamond outline of half-diagonal `r` around `(cx, cy)`, 2 px stroke.
    pub fn diamond(&mut self, cx: f32, cy: f32, r: f32) {
        let edge = r / std::f32::consts::SQRT_2;
        for y in 0..self.height {
            for x in 0..self.width {
                let d = ((x as f32 + 0.5 - cx).abs() + (y as f32 + 0.5 - cy).abs())
                    / std::f32::consts::SQRT_2;
                if d <= edge && d > edge - 2.0 {
                    self.data[y * self.width + x] = 0;
                }
            }
        }
    }

    /// Ellipse outline with outer semi-axes `rx`, `ry`, 2 px stroke.
    pub fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        let radius = |x: f32, y: f32, a: f32, b: f32| ((x / a).powi(2) + (y / b).powi(2)).sqrt();
        for y in 0..self.height {
            for x in 0..self.width {
                let (dx, dy) = (x as f32 + 0.5 - cx, y as f32 + 0.5 - cy);
                if radius(dx, dy, rx, ry) <= 1.0 && radius(dx, dy, rx - 2.0, ry - 2.0) > 1.0 {
                    self.data[y * self.width + x] = 0;
                }
            }
        }
    }

    /// Horizontal stadium outline (rectangle with semicircular ends) filling
    /// `[x0, x1) × [y0, y1)`, 2 px stroke.
    pub fn stadium(&mut self, x0: usize, y0: usize, x1: usize, y1: usize) {
        let r = 0.5 * (y1 - y0) as f32;
        let cy = y0 as f32 + r;
        let (left, right) = (x0 as f32 + r, x1 as f32 - r);
        for y in y0..y1.min(self.height) {
            for x in x0..x1.min(self.width) {
                let px = x as f32 + 0.5;
                let dx = if px < left {
                    left - px
                } else if px > right {
                    px - right
                } else {
                    0.0
                };
                let d = dx.hypot(y as f32 + 0.5 - cy);
                if d <= r && d > r - 2.0 {
                    self.data[y * self.width + x] = 0;
                }
            }
        }
    }

    /// Filled triangle pointing right, base at `base_x`, tip at `tip_x`.
    pub fn head_right(&mut self, base_x: usize, tip_x: usize, cy: f32, half: f32) {
        for x in base_x..tip_x {
            let hh = half * (tip_x as f32 - (x as f32 + 0.5)) / (tip_x - base_x) as f32;
            for y in 0..self.height {
                if ((y as f32 + 0.5) - cy).abs() <= hh.max(1.0) {
                    self.data[y * self.width + x] = 0;
                }
            }
        }
    }

    /// Filled triangle pointing down, base at `base_y`, tip at `tip_y`.
    pub fn head_down(&mut self, base_y: usize, tip_y: usize, cx: f32, half: f32) {
        for y in base_y..tip_y {
            let hw = half * (tip_y as f32 - (y as f32 + 0.5)) / (tip_y - base_y) as f32;
            for x in 0..self.width {
                if ((x as f32 + 0.5) - cx).abs() <= hw.max(1.0) {
                    self.data[y * self.width + x] = 0;
                }
            }
        }
    }

    /// Scatter `count` 2×2 dots from a fixed-seed generator.
    pub fn speckle(&mut self, count: usize, seed: u64) {
        let mut state = seed;
        let mut next = move || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 33) as usize
        };
        for _ in 0..count {
            let x = next() % (self.width - 2);
            let y = next() % (self.height - 2);
            self.fill(x, y, x + 2, y + 2);
        }
    }
}

/// Two boxes joined left to right by a single arrow.
#[allow(dead_code)]
pub fn two_boxes_with_arrow() -> Canvas {
    let mut c = Canvas::new(220, 120);
    c.rect(20, 40, 70, 80);
    c.rect(130, 40, 180, 80);
    c.fill(70, 60, 118, 62);
    c.head_right(118, 130, 61.0, 6.0);
    c
}

/// Two boxes joined by an arrow whose shaft is `t` px thick; the head
/// widens with the shaft.
#[allow(dead_code)]
pub fn thick_arrow(t: usize) -> Canvas {
    let mut c = Canvas::new(240, 140);
    c.rect(20, 40, 80, 100);
    c.rect(160, 40, 220, 100);
    let top = 70 - t / 2;
    c.fill(80, top, 148, top + t);
    c.head_right(148, 160, top as f32 + 0.5 * t as f32, t as f32 + 4.0);
    c
}

/// Ellipse start node pointing at a stadium-shaped end node.
#[allow(dead_code)]
pub fn rounded_sheet() -> Canvas {
    let mut c = Canvas::new(360, 140);
    c.ellipse(80.0, 65.0, 50.0, 35.0);
    c.stadium(170, 40, 330, 90);
    c.fill(130, 64, 158, 66);
    c.head_right(158, 170, 65.0, 6.0);
    c
}

/// Decision diamond with a downward branch to one box and a rightward
/// branch to another.
#[allow(dead_code)]
pub fn decision_sheet() -> Canvas {
    let mut c = Canvas::new(300, 240);
    c.diamond(100.0, 70.0, 45.0);
    // Box below the diamond.
    c.rect(60, 170, 140, 210);
    c.fill(99, 118, 101, 158);
    c.head_down(158, 170, 100.0, 6.0);
    // Box to the right.
    c.rect(200, 50, 280, 90);
    c.fill(148, 69, 188, 71);
    c.head_right(188, 200, 70.0, 6.0);
    c
}
