//! Combinatorial pairing of lights into armor candidates.
//!
//! Every unordered pair of kept lights is tested against three gates:
//! length similarity, normalized center distance (which also decides the
//! size variant), and the inclination of the connecting line. A pair is
//! additionally rejected when a third light sits between the two — the
//! bounding-box form of that test is deliberately coarse and kept as-is.

use crate::angle::tilt_from_horizontal_deg;
use crate::classical::params::ArmorParams;
use crate::types::{ArmorSizeVariant, Light};
use nalgebra::Point2;

/// An accepted light pair, ordered left/right by center x.
#[derive(Clone, Debug)]
pub struct PairCandidate {
    pub variant: ArmorSizeVariant,
    pub left: Light,
    pub right: Light,
}

impl PairCandidate {
    /// Corner order: left top, left bottom, right bottom, right top
    /// (TL → BL → BR → TR).
    pub fn corners(&self) -> [Point2<f32>; 4] {
        [
            self.left.top,
            self.left.bottom,
            self.right.bottom,
            self.right.top,
        ]
    }
}

/// Pair up lights into armor candidates.
pub fn match_lights(lights: &[Light], params: &ArmorParams) -> Vec<PairCandidate> {
    let mut pairs = Vec::new();
    for i in 0..lights.len() {
        for j in i + 1..lights.len() {
            let a = &lights[i];
            let b = &lights[j];
            if contains_other_light(a, b, lights) {
                continue;
            }
            let variant = classify_pair(a, b, params);
            if variant == ArmorSizeVariant::None {
                continue;
            }
            let (left, right) = if a.center.x <= b.center.x {
                (a.clone(), b.clone())
            } else {
                (b.clone(), a.clone())
            };
            pairs.push(PairCandidate {
                variant,
                left,
                right,
            });
        }
    }
    pairs
}

/// Anti-nesting rule: reject the pair when any third light's center falls
/// inside the bounding box of the pair's four endpoints.
fn contains_other_light(a: &Light, b: &Light, lights: &[Light]) -> bool {
    let xs = [a.top.x, a.bottom.x, b.top.x, b.bottom.x];
    let ys = [a.top.y, a.bottom.y, b.top.y, b.bottom.y];
    let xmin = xs.iter().copied().fold(f32::MAX, f32::min);
    let xmax = xs.iter().copied().fold(f32::MIN, f32::max);
    let ymin = ys.iter().copied().fold(f32::MAX, f32::min);
    let ymax = ys.iter().copied().fold(f32::MIN, f32::max);

    lights.iter().any(|probe| {
        if probe.center == a.center || probe.center == b.center {
            return false;
        }
        probe.center.x >= xmin
            && probe.center.x <= xmax
            && probe.center.y >= ymin
            && probe.center.y <= ymax
    })
}

/// Test the pair gates and classify the size variant. `None` rejects.
pub fn classify_pair(a: &Light, b: &Light, params: &ArmorParams) -> ArmorSizeVariant {
    let length_ratio = if a.length < b.length {
        a.length / b.length
    } else {
        b.length / a.length
    };
    if length_ratio < params.min_light_ratio {
        return ArmorSizeVariant::None;
    }

    let avg_length = (a.length + b.length) * 0.5;
    if avg_length <= 0.0 {
        return ArmorSizeVariant::None;
    }
    let distance = (a.center - b.center).norm() / avg_length;
    let variant = if distance >= params.min_small_center_distance
        && distance <= params.max_small_center_distance
    {
        ArmorSizeVariant::Small
    } else if distance >= params.min_large_center_distance
        && distance <= params.max_large_center_distance
    {
        ArmorSizeVariant::Large
    } else {
        return ArmorSizeVariant::None;
    };

    let diff = b.center - a.center;
    if tilt_from_horizontal_deg(diff.x, diff.y) > params.max_angle_deg {
        return ArmorSizeVariant::None;
    }
    variant
}
