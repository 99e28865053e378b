/// Pixels of one grown line-support region and the moments needed for a
/// PCA line fit. Coordinates are pixel indices, not centres.
#[derive(Debug, Default)]
pub(crate) struct RegionAccumulator {
    pub indices: Vec<usize>,
    /// Σx, Σy.
    sum: [f32; 2],
    /// Σx², Σy², Σxy.
    moments: [f32; 3],
    aligned: usize,
    mag_total: f32,
}

impl RegionAccumulator {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: Vec::with_capacity(capacity),
            ..Default::default()
        }
    }

    /// Forget the region, keeping the allocation.
    pub(crate) fn reset(&mut self) {
        self.indices.clear();
        self.sum = [0.0; 2];
        self.moments = [0.0; 3];
        self.aligned = 0;
        self.mag_total = 0.0;
    }

    pub(crate) fn push(&mut self, idx: usize, x: usize, y: usize, mag: f32, aligned: bool) {
        let (xf, yf) = (x as f32, y as f32);
        self.indices.push(idx);
        self.sum[0] += xf;
        self.sum[1] += yf;
        self.moments[0] += xf * xf;
        self.moments[1] += yf * yf;
        self.moments[2] += xf * yf;
        self.aligned += usize::from(aligned);
        self.mag_total += mag;
    }

    pub(crate) fn len(&self) -> usize {
        self.indices.len()
    }

    fn count(&self) -> Option<f32> {
        (!self.indices.is_empty()).then(|| self.indices.len() as f32)
    }

    pub(crate) fn mean(&self) -> Option<[f32; 2]> {
        let n = self.count()?;
        Some([self.sum[0] / n, self.sum[1] / n])
    }

    /// Covariance entries `(cxx, cyy, cxy)` around the mean.
    pub(crate) fn covariance(&self) -> Option<(f32, f32, f32)> {
        let n = self.count()?;
        let [cx, cy] = self.mean()?;
        Some((
            self.moments[0] / n - cx * cx,
            self.moments[1] / n - cy * cy,
            self.moments[2] / n - cx * cy,
        ))
    }

    /// Share of pixels whose orientation stayed within half the tolerance of
    /// the seed.
    pub(crate) fn aligned_fraction(&self) -> f32 {
        self.count().map_or(0.0, |n| self.aligned as f32 / n)
    }

    pub(crate) fn avg_mag(&self) -> f32 {
        self.count().map_or(0.0, |n| self.mag_total / n)
    }

    /// Return the region's pixels to the pool of unused seeds.
    pub(crate) fn release(&self, used: &mut [u8]) {
        for &idx in &self.indices {
            used[idx] = 0;
        }
    }
}
