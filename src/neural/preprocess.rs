//! Letterbox preprocessing for the neural detector.
//!
//! The frame is resized preserving aspect ratio by `S / max(w, h)` and
//! pasted into the top-left corner of an `S×S` canvas pre-filled with
//! neutral gray. Because the padding is always anchored top-left, mapping
//! tensor coordinates back to the original image is a plain division by the
//! scale, with no offset.
//!
//! The numeric convention follows the loaded model variant: the quantized
//! model consumes BGR planes with byte values 0–255 cast to f32, the
//! full-precision model consumes RGB planes scaled to [0, 1].

use crate::image::Frame;
use ndarray::Array4;

/// Gray value filling the unused canvas area.
const PAD_VALUE: u8 = 127;

/// Numeric input convention of the loaded model variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelMode {
    /// BGR channel order, values 0–255 (no scaling).
    Quantized,
    /// RGB channel order, values scaled to [0, 1].
    FullPrecision,
}

/// A packed input tensor plus the resize scale used to build it.
pub struct Letterbox {
    /// Planar `[1, 3, S, S]` tensor.
    pub tensor: Array4<f32>,
    /// `S / max(frame.w, frame.h)`; divide tensor-space coordinates by this
    /// to return to original-image pixels.
    pub scale: f32,
}

/// Letterbox `frame` into a square tensor of edge length `input_size`.
pub fn letterbox(frame: &Frame, input_size: usize, mode: ModelMode) -> Letterbox {
    let scale = input_size as f32 / frame.w.max(frame.h) as f32;
    let resized_w = ((frame.w as f32 * scale).round() as usize).min(input_size);
    let resized_h = ((frame.h as f32 * scale).round() as usize).min(input_size);

    let mut canvas = vec![[PAD_VALUE; 3]; input_size * input_size];
    for y in 0..resized_h {
        // Sample the source at the pixel center of the destination.
        let sy = (y as f32 + 0.5) / scale - 0.5;
        for x in 0..resized_w {
            let sx = (x as f32 + 0.5) / scale - 0.5;
            canvas[y * input_size + x] = sample_rgb_bilinear(frame, sx, sy);
        }
    }

    let (order, value_scale): ([usize; 3], f32) = match mode {
        ModelMode::Quantized => ([2, 1, 0], 1.0),
        ModelMode::FullPrecision => ([0, 1, 2], 1.0 / 255.0),
    };

    let mut tensor = Array4::<f32>::zeros((1, 3, input_size, input_size));
    for (plane, &channel) in order.iter().enumerate() {
        for y in 0..input_size {
            for x in 0..input_size {
                let v = f32::from(canvas[y * input_size + x][channel]);
                tensor[[0, plane, y, x]] = v * value_scale;
            }
        }
    }

    Letterbox { tensor, scale }
}

fn sample_rgb_bilinear(frame: &Frame, x: f32, y: f32) -> [u8; 3] {
    let xc = x.clamp(0.0, (frame.w - 1) as f32);
    let yc = y.clamp(0.0, (frame.h - 1) as f32);
    let x0 = xc.floor() as usize;
    let y0 = yc.floor() as usize;
    let x1 = (x0 + 1).min(frame.w - 1);
    let y1 = (y0 + 1).min(frame.h - 1);
    let fx = xc - x0 as f32;
    let fy = yc - y0 as f32;

    let p00 = frame.get(x0, y0);
    let p10 = frame.get(x1, y0);
    let p01 = frame.get(x0, y1);
    let p11 = frame.get(x1, y1);
    let mut out = [0u8; 3];
    for c in 0..3 {
        let top = f32::from(p00[c]) + (f32::from(p10[c]) - f32::from(p00[c])) * fx;
        let bot = f32::from(p01[c]) + (f32::from(p11[c]) - f32::from(p01[c])) * fx;
        out[c] = (top + (bot - top) * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}
