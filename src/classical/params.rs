//! Parameter types for the classical light-pair matcher.
//!
//! Bounds mirror the tuning of the original auto-aim pipeline. Both structs
//! are runtime-tunable between `detect` calls; mutating them while a call is
//! in flight is undefined and must be prevented by the caller.

use serde::{Deserialize, Serialize};

/// Acceptance bounds for a single light blob.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LightParams {
    /// Minimum width / length ratio.
    pub min_ratio: f32,
    /// Maximum width / length ratio.
    pub max_ratio: f32,
    /// Maximum tilt from vertical, degrees.
    pub max_angle_deg: f32,
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            min_ratio: 0.0001,
            max_ratio: 1.0,
            max_angle_deg: 40.0,
        }
    }
}

/// Acceptance bounds for a pair of lights forming an armor candidate.
///
/// Center distances are normalized by the average light length; the two
/// windows distinguish the small and large armor size variants.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ArmorParams {
    /// Minimum length similarity between the paired lights
    /// (shorter / longer).
    pub min_light_ratio: f32,
    pub min_small_center_distance: f32,
    pub max_small_center_distance: f32,
    pub min_large_center_distance: f32,
    pub max_large_center_distance: f32,
    /// Maximum inclination of the pair-connecting line from horizontal,
    /// degrees.
    pub max_angle_deg: f32,
}

impl Default for ArmorParams {
    fn default() -> Self {
        Self {
            min_light_ratio: 0.8,
            min_small_center_distance: 0.8,
            max_small_center_distance: 3.5,
            min_large_center_distance: 3.5,
            max_large_center_distance: 8.0,
            max_angle_deg: 35.0,
        }
    }
}
