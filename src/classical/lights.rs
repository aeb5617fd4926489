//! Light extraction from a binarized frame.
//!
//! Bright pixels are grouped into 8-connected regions with an explicit
//! flood-fill stack. Each region accumulates first and second moments; the
//! principal axis of the covariance gives the oriented box the original
//! pipeline obtained from a minimum-area rectangle fit. The color tag comes
//! from comparing red and blue channel sums over the region's bounding box
//! in the original (non-binary) frame.

use crate::angle::tilt_from_vertical_deg;
use crate::classical::params::LightParams;
use crate::image::{Frame, GrayImage};
use crate::types::{Light, LightColor};
use nalgebra::{Matrix2, Point2, SymmetricEigen, Vector2};

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

/// Regions smaller than this cannot produce a stable axis fit.
const MIN_REGION_PIXELS: usize = 5;

struct RegionAccumulator {
    pixels: Vec<(usize, usize)>,
    sum_x: f32,
    sum_y: f32,
    sum_xx: f32,
    sum_yy: f32,
    sum_xy: f32,
    min_x: usize,
    max_x: usize,
    min_y: usize,
    max_y: usize,
}

impl RegionAccumulator {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            pixels: Vec::with_capacity(capacity),
            sum_x: 0.0,
            sum_y: 0.0,
            sum_xx: 0.0,
            sum_yy: 0.0,
            sum_xy: 0.0,
            min_x: usize::MAX,
            max_x: 0,
            min_y: usize::MAX,
            max_y: 0,
        }
    }

    fn reset(&mut self) {
        self.pixels.clear();
        self.sum_x = 0.0;
        self.sum_y = 0.0;
        self.sum_xx = 0.0;
        self.sum_yy = 0.0;
        self.sum_xy = 0.0;
        self.min_x = usize::MAX;
        self.max_x = 0;
        self.min_y = usize::MAX;
        self.max_y = 0;
    }

    fn push(&mut self, x: usize, y: usize) {
        self.pixels.push((x, y));
        let xf = x as f32;
        let yf = y as f32;
        self.sum_x += xf;
        self.sum_y += yf;
        self.sum_xx += xf * xf;
        self.sum_yy += yf * yf;
        self.sum_xy += xf * yf;
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    fn len(&self) -> usize {
        self.pixels.len()
    }

    fn centroid(&self) -> Point2<f32> {
        let n = self.len() as f32;
        Point2::new(self.sum_x / n, self.sum_y / n)
    }

    fn covariance(&self) -> Matrix2<f32> {
        let n = self.len() as f32;
        let c = self.centroid();
        let cxx = self.sum_xx / n - c.x * c.x;
        let cyy = self.sum_yy / n - c.y * c.y;
        let cxy = self.sum_xy / n - c.x * c.y;
        Matrix2::new(cxx, cxy, cxy, cyy)
    }
}

/// True when the light satisfies the ratio and tilt bounds.
pub fn is_light(light: &Light, params: &LightParams) -> bool {
    light.width_ratio >= params.min_ratio
        && light.width_ratio <= params.max_ratio
        && light.tilt_deg <= params.max_angle_deg
}

/// Extract lights from a 0/255 binary mask, filtered by `params`.
///
/// `frame` is the original image the mask was derived from; it supplies the
/// color tag. Mask and frame must share dimensions.
pub fn find_lights(frame: &Frame, mask: &GrayImage, params: &LightParams) -> Vec<Light> {
    debug_assert_eq!((mask.w, mask.h), (frame.w, frame.h));
    let w = mask.w;
    let h = mask.h;
    if w == 0 || h == 0 {
        return Vec::new();
    }

    let mut visited = vec![false; w * h];
    let mut stack: Vec<(usize, usize)> = Vec::new();
    let mut region = RegionAccumulator::with_capacity(256);
    let mut lights = Vec::new();

    for y in 0..h {
        let row = mask.row(y);
        for x in 0..w {
            if row[x] == 0 || visited[y * w + x] {
                continue;
            }
            region.reset();
            visited[y * w + x] = true;
            stack.push((x, y));
            while let Some((px, py)) = stack.pop() {
                region.push(px, py);
                for &(dx, dy) in &NEIGH_OFFSETS {
                    let nx = px as isize + dx;
                    let ny = py as isize + dy;
                    if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                        continue;
                    }
                    let (nx, ny) = (nx as usize, ny as usize);
                    let idx = ny * w + nx;
                    if !visited[idx] && mask.get(nx, ny) != 0 {
                        visited[idx] = true;
                        stack.push((nx, ny));
                    }
                }
            }
            if region.len() < MIN_REGION_PIXELS {
                continue;
            }
            if let Some(light) = fit_light(frame, &region) {
                if is_light(&light, params) {
                    lights.push(light);
                }
            }
        }
    }

    // Left-to-right order keeps pair enumeration deterministic.
    lights.sort_by(|a, b| a.center.x.total_cmp(&b.center.x));
    lights
}

fn fit_light(frame: &Frame, region: &RegionAccumulator) -> Option<Light> {
    let center = region.centroid();
    let eigen = SymmetricEigen::new(region.covariance());
    let major_idx = if eigen.eigenvalues[0] >= eigen.eigenvalues[1] {
        0
    } else {
        1
    };
    let mut axis: Vector2<f32> = eigen.eigenvectors.column(major_idx).into_owned();
    let norm = axis.norm();
    if !norm.is_finite() || norm < 1e-6 {
        return None;
    }
    axis /= norm;
    // Orient the axis downward (image y grows down) so that the minimum
    // projection is the top endpoint.
    if axis.y < 0.0 || (axis.y == 0.0 && axis.x < 0.0) {
        axis = -axis;
    }
    let normal = Vector2::new(-axis.y, axis.x);

    let mut t_min = f32::MAX;
    let mut t_max = f32::MIN;
    let mut s_min = f32::MAX;
    let mut s_max = f32::MIN;
    for &(x, y) in &region.pixels {
        let d = Vector2::new(x as f32 - center.x, y as f32 - center.y);
        let t = d.dot(&axis);
        let s = d.dot(&normal);
        t_min = t_min.min(t);
        t_max = t_max.max(t);
        s_min = s_min.min(s);
        s_max = s_max.max(s);
    }

    let length = t_max - t_min + 1.0;
    let width = s_max - s_min + 1.0;
    if length <= 0.0 {
        return None;
    }

    Some(Light {
        top: center + axis * t_min,
        bottom: center + axis * t_max,
        center,
        length,
        width_ratio: width / length,
        tilt_deg: tilt_from_vertical_deg(axis.x, axis.y),
        color: dominant_color(frame, region),
    })
}

fn dominant_color(frame: &Frame, region: &RegionAccumulator) -> LightColor {
    let mut sum_r = 0u64;
    let mut sum_b = 0u64;
    for y in region.min_y..=region.max_y {
        for x in region.min_x..=region.max_x {
            let [r, _, b] = frame.get(x, y);
            sum_r += u64::from(r);
            sum_b += u64::from(b);
        }
    }
    if sum_r > sum_b {
        LightColor::Red
    } else {
        LightColor::Blue
    }
}
