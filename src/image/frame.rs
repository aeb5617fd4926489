//! Owned interleaved RGB frame in row-major layout.
//!
//! The engine normalizes every supported input format (8-bit gray, RGB,
//! RGBA) into this container at the boundary, so the detector code never
//! has to branch on the caller's pixel layout.

use crate::error::EngineError;
use crate::image::gray::GrayImage;

/// Pixel layout of a raw input buffer handed to [`Frame::from_raw`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Gray8,
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }
}

/// Owned 3-channel RGB image, tightly packed (stride == `w * 3`).
#[derive(Clone, Debug)]
pub struct Frame {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Interleaved RGB bytes in row-major order
    pub data: Vec<u8>,
}

impl Frame {
    /// Construct from an interleaved RGB buffer.
    pub fn from_rgb8(w: usize, h: usize, data: Vec<u8>) -> Result<Self, EngineError> {
        check_dims(w, h, data.len(), 3)?;
        Ok(Self { w, h, data })
    }

    /// Construct from a single-channel buffer, replicating gray into RGB.
    pub fn from_gray8(w: usize, h: usize, data: Vec<u8>) -> Result<Self, EngineError> {
        check_dims(w, h, data.len(), 1)?;
        let mut rgb = Vec::with_capacity(w * h * 3);
        for &v in &data {
            rgb.extend_from_slice(&[v, v, v]);
        }
        Ok(Self { w, h, data: rgb })
    }

    /// Construct from an interleaved RGBA buffer, dropping alpha.
    pub fn from_rgba8(w: usize, h: usize, data: Vec<u8>) -> Result<Self, EngineError> {
        check_dims(w, h, data.len(), 4)?;
        let mut rgb = Vec::with_capacity(w * h * 3);
        for px in data.chunks_exact(4) {
            rgb.extend_from_slice(&px[..3]);
        }
        Ok(Self { w, h, data: rgb })
    }

    /// Construct from a raw buffer in any supported layout.
    pub fn from_raw(
        w: usize,
        h: usize,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, EngineError> {
        match format {
            PixelFormat::Gray8 => Self::from_gray8(w, h, data),
            PixelFormat::Rgb8 => Self::from_rgb8(w, h, data),
            PixelFormat::Rgba8 => Self::from_rgba8(w, h, data),
        }
    }

    /// True when the frame has no pixels.
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    #[inline]
    /// Linear byte index of the pixel at (x, y).
    pub fn idx(&self, x: usize, y: usize) -> usize {
        (y * self.w + x) * 3
    }

    #[inline]
    /// RGB triple at (x, y).
    pub fn get(&self, x: usize, y: usize) -> [u8; 3] {
        let i = self.idx(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    /// Overwrite the RGB triple at (x, y).
    pub fn set(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = self.idx(x, y);
        self.data[i..i + 3].copy_from_slice(&rgb);
    }

    /// Convert to 8-bit grayscale with the usual BT.601 luma weights.
    pub fn to_gray(&self) -> GrayImage {
        let mut out = GrayImage::new(self.w, self.h);
        for y in 0..self.h {
            for x in 0..self.w {
                let [r, g, b] = self.get(x, y);
                let luma =
                    (299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b) + 500) / 1000;
                out.set(x, y, luma as u8);
            }
        }
        out
    }
}

fn check_dims(w: usize, h: usize, len: usize, channels: usize) -> Result<(), EngineError> {
    if w == 0 || h == 0 {
        return Err(EngineError::InvalidInput(format!(
            "zero-sized frame {w}x{h}"
        )));
    }
    let expected = w * h * channels;
    if len != expected {
        return Err(EngineError::InvalidInput(format!(
            "buffer is {len} bytes, expected {expected} for {w}x{h}x{channels}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_input_replicates_channels() {
        let f = Frame::from_gray8(2, 1, vec![10, 200]).unwrap();
        assert_eq!(f.get(0, 0), [10, 10, 10]);
        assert_eq!(f.get(1, 0), [200, 200, 200]);
    }

    #[test]
    fn rgba_input_drops_alpha() {
        let f = Frame::from_rgba8(1, 1, vec![1, 2, 3, 255]).unwrap();
        assert_eq!(f.get(0, 0), [1, 2, 3]);
    }

    #[test]
    fn raw_dispatch_matches_each_format() {
        let gray = Frame::from_raw(1, 1, PixelFormat::Gray8, vec![7]).unwrap();
        assert_eq!(gray.get(0, 0), [7, 7, 7]);
        let rgb = Frame::from_raw(1, 1, PixelFormat::Rgb8, vec![1, 2, 3]).unwrap();
        assert_eq!(rgb.get(0, 0), [1, 2, 3]);
        let rgba = Frame::from_raw(1, 1, PixelFormat::Rgba8, vec![4, 5, 6, 0]).unwrap();
        assert_eq!(rgba.get(0, 0), [4, 5, 6]);
        // the one-byte gray buffer is three bytes short for RGB
        assert!(Frame::from_raw(1, 1, PixelFormat::Rgb8, vec![7]).is_err());
    }

    #[test]
    fn mismatched_buffer_is_rejected() {
        assert!(Frame::from_rgb8(2, 2, vec![0; 11]).is_err());
        assert!(Frame::from_gray8(0, 4, vec![]).is_err());
    }

    #[test]
    fn luma_of_pure_white_is_255() {
        let f = Frame::from_rgb8(1, 1, vec![255, 255, 255]).unwrap();
        assert_eq!(f.to_gray().get(0, 0), 255);
    }
}
