//! Classical detector orchestrating the geometric light-pair pipeline.
//!
//! Stages
//! - Binarize: grayscale + fixed threshold into a 0/255 mask.
//! - [`lights`] – connected components → oriented box fit → ratio/tilt
//!   filter.
//! - [`matching`] – combinatorial pairing under distance/angle/ratio gates.
//! - Number classification (optional): rectify the pattern patch per
//!   candidate and refine its label; classifier failures leave the label
//!   untouched.
//!
//! The detector keeps the last binary mask and kept lights for the debug
//! collaborator; both refer to the most recent `detect` call.

pub mod lights;
pub mod matching;
pub mod params;

pub use matching::PairCandidate;
pub use params::{ArmorParams, LightParams};

use crate::classifier::{extract_number_patch, NumberClassifier};
use crate::detector::Detect;
use crate::error::EngineError;
use crate::image::{draw, Frame, GrayImage};
use crate::types::{Armor, ArmorColor, Light, LightColor};
use std::path::Path;

/// Deterministic geometric detector over binarized frames.
///
/// Not safe for concurrent `detect` calls; mutate the public parameters
/// only between calls.
pub struct ClassicalDetector {
    /// Grayscale binarization threshold.
    pub binary_threshold: u8,
    pub light_params: LightParams,
    pub armor_params: ArmorParams,
    classifier: Option<NumberClassifier>,
    last_binary: Option<GrayImage>,
    last_lights: Vec<Light>,
}

impl ClassicalDetector {
    pub fn new(binary_threshold: u8, light_params: LightParams, armor_params: ArmorParams) -> Self {
        Self {
            binary_threshold,
            light_params,
            armor_params,
            classifier: None,
            last_binary: None,
            last_lights: Vec::new(),
        }
    }

    /// Tune the binarization threshold between calls.
    pub fn set_binary_threshold(&mut self, threshold: u8) {
        self.binary_threshold = threshold;
    }

    /// Attach (or detach) a number classifier.
    pub fn set_classifier(&mut self, classifier: Option<NumberClassifier>) {
        self.classifier = classifier;
    }

    /// Swap the classifier for one loaded from new assets, keeping the
    /// detector itself intact.
    pub fn reset_classifier(
        &mut self,
        model_path: &Path,
        label_path: &Path,
        threshold: f32,
    ) -> Result<(), EngineError> {
        self.classifier = Some(NumberClassifier::new(model_path, label_path, threshold)?);
        Ok(())
    }

    /// The binarized frame of the most recent `detect` call.
    pub fn binary_image(&self) -> Option<&GrayImage> {
        self.last_binary.as_ref()
    }

    /// The kept lights of the most recent `detect` call.
    pub fn lights(&self) -> &[Light] {
        &self.last_lights
    }

    /// Annotated copy of `frame` with the last lights and the given armors
    /// painted in.
    pub fn draw_results(&self, frame: &Frame, armors: &[Armor]) -> Frame {
        let mut canvas = frame.clone();
        for light in &self.last_lights {
            draw::draw_light(&mut canvas, light);
        }
        for armor in armors {
            draw::draw_armor(&mut canvas, armor);
        }
        canvas
    }

    fn pair_to_armor(&mut self, gray: &GrayImage, pair: &PairCandidate) -> Armor {
        let color = match (pair.left.color, pair.right.color) {
            (LightColor::Red, LightColor::Red) => Some(ArmorColor::Red),
            (LightColor::Blue, LightColor::Blue) => Some(ArmorColor::Blue),
            _ => None,
        };
        let label = self
            .classifier
            .as_mut()
            .and_then(|clf| {
                let patch = extract_number_patch(gray, pair)?;
                clf.classify(&patch)
            })
            .unwrap_or_default();
        Armor {
            label,
            color,
            score: None,
            corners: pair.corners(),
        }
    }
}

impl Detect for ClassicalDetector {
    fn detect(&mut self, frame: &Frame) -> Vec<Armor> {
        if frame.is_empty() {
            log::error!("classical detect called with an empty frame");
            self.last_binary = None;
            self.last_lights.clear();
            return Vec::new();
        }

        let gray = frame.to_gray();
        let binary = gray.binarize(self.binary_threshold);
        let found = lights::find_lights(frame, &binary, &self.light_params);
        let pairs = matching::match_lights(&found, &self.armor_params);

        let armors = pairs
            .iter()
            .map(|pair| self.pair_to_armor(&gray, pair))
            .collect();

        self.last_binary = Some(binary);
        self.last_lights = found;
        armors
    }

    /// The classical path has no loadable state; it is always ready.
    fn is_ready(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_bar_frame() -> Frame {
        let w = 320;
        let h = 240;
        let mut rgb = vec![0u8; w * h * 3];
        for &x0 in &[100usize, 140] {
            for y in 80..120 {
                for x in x0..x0 + 4 {
                    let i = (y * w + x) * 3;
                    rgb[i] = 40;
                    rgb[i + 1] = 60;
                    rgb[i + 2] = 250;
                }
            }
        }
        Frame::from_rgb8(w, h, rgb).unwrap()
    }

    #[test]
    fn two_bars_yield_one_armor() {
        let mut det = ClassicalDetector::new(60, LightParams::default(), ArmorParams::default());
        let armors = det.detect(&two_bar_frame());
        assert_eq!(armors.len(), 1);
        assert_eq!(det.lights().len(), 2);
        assert!(det.binary_image().is_some());
        assert_eq!(armors[0].color, Some(ArmorColor::Blue));
        assert!(armors[0].label.is_empty());
    }

    #[test]
    fn detect_is_deterministic() {
        let mut det = ClassicalDetector::new(60, LightParams::default(), ArmorParams::default());
        let frame = two_bar_frame();
        let first = det.detect(&frame);
        let second = det.detect(&frame);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            for (pa, pb) in a.corners.iter().zip(&b.corners) {
                assert_eq!(pa, pb);
            }
        }
    }

    #[test]
    fn threshold_above_brightness_finds_nothing() {
        let mut det = ClassicalDetector::new(200, LightParams::default(), ArmorParams::default());
        assert!(det.detect(&two_bar_frame()).is_empty());
        assert!(det.lights().is_empty());
    }
}
