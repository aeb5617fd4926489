//! Number classifier refining the class label of a detected armor patch.
//!
//! The classical path rectifies the pattern region between the two paired
//! lights into a fixed 20×28 patch, binarizes it (Otsu) and runs a small
//! classification model through the shared inference seam. The classifier
//! is best-effort: any internal failure leaves the caller's label
//! unchanged. Model, label table and threshold can be swapped at runtime
//! without reconstructing the detector.

use crate::classical::matching::PairCandidate;
use crate::error::EngineError;
use crate::homography::{homography_from_quad, warp_with_inverse};
use crate::image::GrayImage;
use crate::neural::{InferenceBackend, OrtBackend};
use crate::types::ArmorSizeVariant;
use ndarray::Array4;
use std::fs;
use std::path::Path;

// Rectification geometry: the paired light endpoints map to two interior
// rows of the warped patch so the pattern above and below stays visible.
const LIGHT_LENGTH: f32 = 12.0;
const WARP_HEIGHT: usize = 28;
const SMALL_ARMOR_WIDTH: usize = 32;
const LARGE_ARMOR_WIDTH: usize = 54;
const ROI_WIDTH: usize = 20;

/// Rectify the pattern region of a matched pair into a `20×28` gray patch.
///
/// `gray` is the grayscale of the original frame. Returns `None` for a
/// degenerate pair geometry.
pub fn extract_number_patch(gray: &GrayImage, pair: &PairCandidate) -> Option<GrayImage> {
    let warp_width = match pair.variant {
        ArmorSizeVariant::Small => SMALL_ARMOR_WIDTH,
        ArmorSizeVariant::Large => LARGE_ARMOR_WIDTH,
        ArmorSizeVariant::None => return None,
    };
    let top_y = (WARP_HEIGHT as f32 - LIGHT_LENGTH) * 0.5 - 1.0;
    let bottom_y = top_y + LIGHT_LENGTH;
    let wf = (warp_width - 1) as f32;

    let src = [
        [pair.left.bottom.x, pair.left.bottom.y],
        [pair.left.top.x, pair.left.top.y],
        [pair.right.top.x, pair.right.top.y],
        [pair.right.bottom.x, pair.right.bottom.y],
    ];
    let dst = [
        [0.0, bottom_y],
        [0.0, top_y],
        [wf, top_y],
        [wf, bottom_y],
    ];

    let h = homography_from_quad(&dst, &src)?;
    let warped = warp_with_inverse(gray, &h, warp_width, WARP_HEIGHT)?;

    // Center crop to the classifier input width.
    let x0 = (warp_width - ROI_WIDTH) / 2;
    let mut patch = GrayImage::new(ROI_WIDTH, WARP_HEIGHT);
    for y in 0..WARP_HEIGHT {
        for x in 0..ROI_WIDTH {
            patch.set(x, y, warped.get(x0 + x, y));
        }
    }
    Some(patch)
}

/// Otsu's threshold over an 8-bit image. Returns the class boundary value.
pub fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut hist = [0u32; 256];
    for &v in &gray.data {
        hist[v as usize] += 1;
    }
    let total = gray.data.len() as f64;
    if total == 0.0 {
        return 0;
    }
    let sum_all: f64 = hist
        .iter()
        .enumerate()
        .map(|(v, &c)| v as f64 * f64::from(c))
        .sum();

    let mut sum_bg = 0.0f64;
    let mut weight_bg = 0.0f64;
    let mut best_var = -1.0f64;
    let mut best_t = 0u8;
    for t in 0..256usize {
        weight_bg += f64::from(hist[t]);
        if weight_bg == 0.0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        if weight_fg == 0.0 {
            break;
        }
        sum_bg += t as f64 * f64::from(hist[t]);
        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum_all - sum_bg) / weight_fg;
        let between = weight_bg * weight_fg * (mean_bg - mean_fg).powi(2);
        if between > best_var {
            best_var = between;
            best_t = t as u8;
        }
    }
    best_t
}

/// Best-effort pattern classifier over rectified patches.
pub struct NumberClassifier {
    backend: Box<dyn InferenceBackend>,
    labels: Vec<String>,
    /// Minimum softmax confidence for accepting a label.
    pub threshold: f32,
}

impl NumberClassifier {
    /// Load the classification model and its line-oriented label table.
    pub fn new(
        model_path: &Path,
        label_path: &Path,
        threshold: f32,
    ) -> Result<Self, EngineError> {
        let raw = fs::read_to_string(label_path).map_err(|source| EngineError::ClassifierAsset {
            path: label_path.to_path_buf(),
            source,
        })?;
        let labels: Vec<String> = raw
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        if labels.is_empty() {
            return Err(EngineError::LabelTable(format!(
                "no labels in {}",
                label_path.display()
            )));
        }
        let backend = Box::new(OrtBackend::load(model_path)?);
        Ok(Self {
            backend,
            labels,
            threshold,
        })
    }

    /// Build from a prepared backend. Test seam.
    pub fn with_backend(
        backend: Box<dyn InferenceBackend>,
        labels: Vec<String>,
        threshold: f32,
    ) -> Self {
        Self {
            backend,
            labels,
            threshold,
        }
    }

    /// Classify a rectified patch. Returns `None` when inference fails, the
    /// output is malformed, or the best confidence is below the threshold —
    /// the caller keeps its fallback label in all those cases.
    pub fn classify(&mut self, patch: &GrayImage) -> Option<String> {
        let thresh = otsu_threshold(patch);
        let binary = patch.binarize(thresh);

        let mut input = Array4::<f32>::zeros((1, 1, binary.h, binary.w));
        for y in 0..binary.h {
            for x in 0..binary.w {
                input[[0, 0, y, x]] = f32::from(binary.get(x, y)) / 255.0;
            }
        }

        let raw = match self.backend.infer(input) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("number classifier inference failed: {e}");
                return None;
            }
        };
        if raw.data.len() < self.labels.len() {
            log::warn!(
                "classifier output width {} < label table {}",
                raw.data.len(),
                self.labels.len()
            );
            return None;
        }

        let logits = &raw.data[raw.data.len() - self.labels.len()..];
        let max_logit = logits.iter().copied().fold(f32::MIN, f32::max);
        let exp_sum: f32 = logits.iter().map(|&v| (v - max_logit).exp()).sum();
        let (best, confidence) = logits
            .iter()
            .enumerate()
            .map(|(i, &v)| (i, (v - max_logit).exp() / exp_sum))
            .max_by(|a, b| a.1.total_cmp(&b.1))?;

        (confidence >= self.threshold).then(|| self.labels[best].clone())
    }
}
