use super::*;
use crate::image::{BinarizeOptions, ImageU8};
use crate::shapes::{scan_shapes, ShapeOptions};

struct Sheet {
    w: usize,
    h: usize,
    data: Vec<u8>,
}

impl Sheet {
    fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![255; w * h],
        }
    }

    fn fill(&mut self, x0: usize, y0: usize, x1: usize, y1: usize) {
        for y in y0..y1 {
            for x in x0..x1 {
                self.data[y * self.w + x] = 0;
            }
        }
    }

    fn rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize) {
        self.fill(x0, y0, x1, y0 + 2);
        self.fill(x0, y1 - 2, x1, y1);
        self.fill(x0, y0, x0 + 2, y1);
        self.fill(x1 - 2, y0, x1, y1);
    }

    fn head_right(&mut self, base_x: usize, tip_x: usize, cy: f32, half: f32) {
        for x in base_x..tip_x {
            let hh = half * (tip_x as f32 - (x as f32 + 0.5)) / (tip_x - base_x) as f32;
            for y in 0..self.h {
                if ((y as f32 + 0.5) - cy).abs() <= hh.max(1.0) {
                    self.data[y * self.w + x] = 0;
                }
            }
        }
    }

    fn mask(&self) -> InkMask {
        InkMask::from_gray(&ImageU8::new(self.w, self.h, &self.data), &BinarizeOptions::default())
    }
}

fn two_boxes_with_arrow() -> Sheet {
    let mut s = Sheet::new(220, 120);
    s.rect(20, 40, 70, 80);
    s.rect(130, 40, 180, 80);
    s.fill(70, 60, 118, 62);
    s.head_right(118, 130, 61.0, 6.0);
    s
}

#[test]
fn arrow_between_boxes_is_one_headed_connector() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mask = two_boxes_with_arrow().mask();
    let shapes = scan_shapes(&mask, &ShapeOptions::default()).shapes;
    assert_eq!(shapes.len(), 2);
    let scan = scan_connectors(&mask, &shapes, &ConnectorOptions::default());
    assert_eq!(scan.connectors.len(), 1, "{:?}", scan.connectors);
    let c = &scan.connectors[0];
    assert!(!c.head_at_start && c.head_at_end);
    assert!((c.start()[0] - 72.5).abs() <= 1.5, "start {:?}", c.start());
    assert!((c.end()[0] - 127.5).abs() <= 1.5, "end {:?}", c.end());
    assert!((c.start()[1] - 61.0).abs() <= 1.0);
    assert_eq!(c.stroke_width, 2.0);
}

/// Same layout at stroke width `t`; the head widens with the shaft.
fn thick_arrow(t: usize) -> Sheet {
    let mut s = Sheet::new(240, 140);
    s.rect(20, 40, 80, 100);
    s.rect(160, 40, 220, 100);
    let top = 70 - t / 2;
    s.fill(80, top, 148, top + t);
    s.head_right(148, 160, top as f32 + 0.5 * t as f32, t as f32 + 4.0);
    s
}

#[test]
fn thick_arrow_is_still_one_headed_connector() {
    let _ = env_logger::builder().is_test(true).try_init();
    for t in 2..=8 {
        let mask = thick_arrow(t).mask();
        let shapes = scan_shapes(&mask, &ShapeOptions::default()).shapes;
        assert_eq!(shapes.len(), 2, "width {t}");
        let scan = scan_connectors(&mask, &shapes, &ConnectorOptions::default());
        assert_eq!(scan.connectors.len(), 1, "width {t}: {:?}", scan.connectors);
        let c = &scan.connectors[0];
        assert!(!c.head_at_start && c.head_at_end, "width {t}: {c:?}");
        assert!((c.stroke_width - t as f32).abs() <= 1.0, "width {t}: {c:?}");
        assert!(c.start()[0] <= 85.0 && c.end()[0] >= 150.0, "width {t}: {c:?}");
    }
}

#[test]
fn strokes_inside_shapes_are_ignored() {
    let mut s = Sheet::new(160, 120);
    s.rect(20, 20, 140, 100);
    // Underline-like stroke inside the box.
    s.fill(40, 60, 120, 62);
    let mask = s.mask();
    let shapes = scan_shapes(&mask, &ShapeOptions::default()).shapes;
    assert_eq!(shapes.len(), 1);
    assert!(detect_connectors(&mask, &shapes, &ConnectorOptions::default()).is_empty());
}

#[test]
fn elbow_connector_becomes_one_polyline() {
    let mut s = Sheet::new(200, 200);
    s.fill(20, 30, 120, 32);
    s.fill(118, 30, 120, 170);
    let mask = s.mask();
    let out = detect_connectors(&mask, &[], &ConnectorOptions::default());
    assert_eq!(out.len(), 1, "{out:?}");
    assert_eq!(out[0].points.len(), 3);
    let corner = out[0].points[1];
    assert!((corner[0] - 119.0).abs() <= 1.5 && (corner[1] - 31.0).abs() <= 1.5, "{corner:?}");
    assert!(out[0].start()[0] < 25.0);
}

#[test]
fn output_is_raster_ordered_and_oriented() {
    let mut s = Sheet::new(200, 160);
    s.fill(30, 120, 170, 122);
    s.fill(40, 20, 160, 22);
    s.fill(100, 50, 102, 100);
    let out = detect_connectors(&s.mask(), &[], &ConnectorOptions::default());
    assert_eq!(out.len(), 3);
    for c in &out {
        assert_ne!(raster_cmp(c.end(), c.start()), Ordering::Less);
    }
    for w in out.windows(2) {
        assert_ne!(raster_cmp(w[1].start(), w[0].start()), Ordering::Less);
    }
    assert!(out[0].start()[1] < 25.0);
    assert!(out[2].start()[1] > 115.0);
}

#[test]
fn raising_min_length_never_adds_connectors() {
    let mut s = Sheet::new(240, 160);
    s.fill(10, 10, 40, 12);
    s.fill(10, 40, 70, 42);
    s.fill(10, 80, 130, 82);
    s.fill(10, 120, 220, 122);
    let mask = s.mask();
    let mut last = usize::MAX;
    for min_len in [10.0, 25.0, 50.0, 100.0, 150.0, 300.0] {
        let opts = ConnectorOptions::default().with_min_length(min_len);
        let out = detect_connectors(&mask, &[], &opts);
        assert!(out.len() <= last);
        assert!(out.iter().all(|c| c.length() >= min_len));
        last = out.len();
    }
    assert_eq!(last, 0);
}

#[test]
fn reversed_swaps_heads() {
    let c = RawConnector {
        points: vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]],
        head_at_start: true,
        head_at_end: false,
        stroke_width: 2.0,
    };
    let r = c.clone().reversed();
    assert_eq!(r.points[0], [10.0, 10.0]);
    assert!(!r.head_at_start && r.head_at_end);
    assert_eq!(c.midpoint(), [10.0, 0.0]);
    assert_eq!(c.head_count(), 1);
}
