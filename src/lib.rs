#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod classical;
pub mod classifier;
pub mod config;
pub mod detector;
pub mod error;
pub mod image;
pub mod neural;
pub mod types;

// Internal-ish helpers, still public for tools and advanced users.
pub mod angle;
pub mod homography;

// --- High-level re-exports -------------------------------------------------

// Main entry points: the two detectors and the shared contract.
pub use crate::classical::{ArmorParams, ClassicalDetector, LightParams};
pub use crate::detector::{Detect, DetectorBackend};
pub use crate::neural::{NeuralDetector, NeuralParams};

// Result and input types.
pub use crate::error::EngineError;
pub use crate::image::Frame;
pub use crate::types::{Armor, ArmorSizeVariant, Light};

// Configuration layer.
pub use crate::config::{build_detector, load_config, RuntimeConfig};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use armor_detector::prelude::*;
///
/// # fn main() {
/// let (w, h) = (640usize, 480usize);
/// let frame = Frame::from_gray8(w, h, vec![0u8; w * h]).unwrap();
///
/// let mut det = ClassicalDetector::new(
///     160,
///     LightParams::default(),
///     ArmorParams::default(),
/// );
/// let armors = det.detect(&frame);
/// println!("found {} armors", armors.len());
/// # }
/// ```
pub mod prelude {
    pub use crate::classical::{ArmorParams, ClassicalDetector, LightParams};
    pub use crate::detector::{Detect, DetectorBackend};
    pub use crate::image::Frame;
    pub use crate::neural::{NeuralDetector, NeuralParams};
    pub use crate::types::{Armor, ArmorSizeVariant, Light};
}
