//! Plane homography helpers used for patch rectification.
//!
//! The classical path rectifies the pattern region between two paired lights
//! before handing it to the number classifier: the four source corners are
//! mapped onto an axis-aligned destination rectangle and the patch is
//! sampled through the inverse mapping.

use crate::image::GrayImage;
use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

const EPS: f32 = 1e-9;

/// Solve the homography mapping `src[i] → dst[i]` for four correspondences
/// (direct linear transform with `h33 = 1`). Returns `None` for degenerate
/// configurations.
pub fn homography_from_quad(src: &[[f32; 2]; 4], dst: &[[f32; 2]; 4]) -> Option<Matrix3<f32>> {
    let mut a = SMatrix::<f32, 8, 8>::zeros();
    let mut b = SVector::<f32, 8>::zeros();
    for i in 0..4 {
        let [x, y] = src[i];
        let [u, v] = dst[i];
        let r = 2 * i;
        a[(r, 0)] = x;
        a[(r, 1)] = y;
        a[(r, 2)] = 1.0;
        a[(r, 6)] = -x * u;
        a[(r, 7)] = -y * u;
        b[r] = u;
        a[(r + 1, 3)] = x;
        a[(r + 1, 4)] = y;
        a[(r + 1, 5)] = 1.0;
        a[(r + 1, 6)] = -x * v;
        a[(r + 1, 7)] = -y * v;
        b[r + 1] = v;
    }
    let h = a.lu().solve(&b)?;
    if h.iter().any(|c| !c.is_finite()) {
        return None;
    }
    Some(Matrix3::new(
        h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0,
    ))
}

/// Sample an `out_w × out_h` patch through `h_dst_to_src`, the homography
/// taking destination pixels to source positions.
pub fn warp_with_inverse(
    gray: &GrayImage,
    h_dst_to_src: &Matrix3<f32>,
    out_w: usize,
    out_h: usize,
) -> Option<GrayImage> {
    if out_w == 0 || out_h == 0 {
        return None;
    }
    let mut patch = GrayImage::new(out_w, out_h);
    for y in 0..out_h {
        for x in 0..out_w {
            let v = h_dst_to_src * Vector3::new(x as f32, y as f32, 1.0);
            if !v[2].is_finite() || v[2].abs() <= EPS {
                return None;
            }
            let sx = v[0] / v[2];
            let sy = v[1] / v[2];
            patch.set(x, y, gray.sample_bilinear(sx, sy).round() as u8);
        }
    }
    Some(patch)
}
