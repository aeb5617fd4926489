//! Owned single-channel u8 image in row-major layout (stride == width).
//!
//! Used for the binarized mask on the classical path and for the rectified
//! number patches handed to the classifier.
#[derive(Clone, Debug)]
pub struct GrayImage {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Backing storage in row-major order
    pub data: Vec<u8>,
}

impl GrayImage {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0; w * h],
        }
    }

    /// Wrap an existing row-major buffer. Panics when the size disagrees.
    pub fn from_vec(w: usize, h: usize, data: Vec<u8>) -> Self {
        assert_eq!(data.len(), w * h, "gray buffer size mismatch");
        Self { w, h, data }
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    #[inline]
    /// Get the pixel value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[self.idx(x, y)]
    }

    #[inline]
    /// Set the pixel value at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    #[inline]
    /// Borrow row `y` as a slice.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }

    /// Threshold into a 0/255 binary mask.
    pub fn binarize(&self, thresh: u8) -> GrayImage {
        let data = self
            .data
            .iter()
            .map(|&v| if v >= thresh { 255 } else { 0 })
            .collect();
        GrayImage {
            w: self.w,
            h: self.h,
            data,
        }
    }

    /// Bilinear sample at a fractional position, clamping at the border.
    /// Returns a value in [0, 255].
    pub fn sample_bilinear(&self, x: f32, y: f32) -> f32 {
        if self.w == 0 || self.h == 0 {
            return 0.0;
        }
        let xc = x.clamp(0.0, (self.w - 1) as f32);
        let yc = y.clamp(0.0, (self.h - 1) as f32);
        let x0 = xc.floor() as usize;
        let y0 = yc.floor() as usize;
        let x1 = (x0 + 1).min(self.w - 1);
        let y1 = (y0 + 1).min(self.h - 1);
        let fx = xc - x0 as f32;
        let fy = yc - y0 as f32;

        let v00 = f32::from(self.get(x0, y0));
        let v10 = f32::from(self.get(x1, y0));
        let v01 = f32::from(self.get(x0, y1));
        let v11 = f32::from(self.get(x1, y1));
        let top = v00 + (v10 - v00) * fx;
        let bot = v01 + (v11 - v01) * fx;
        top + (bot - top) * fy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binarize_splits_at_threshold() {
        let g = GrayImage::from_vec(3, 1, vec![10, 128, 250]);
        let b = g.binarize(128);
        assert_eq!(b.data, vec![0, 255, 255]);
    }

    #[test]
    fn bilinear_interpolates_midpoint() {
        let g = GrayImage::from_vec(2, 1, vec![0, 100]);
        assert!((g.sample_bilinear(0.5, 0.0) - 50.0).abs() < 1e-4);
    }
}
