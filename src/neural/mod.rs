//! Neural detector: letterbox preprocessing, ONNX inference, row decoding
//! and overlap suppression.
//!
//! Stages
//! - [`preprocess`] – aspect-preserving resize into a fixed square NCHW
//!   tensor with top-left gray padding.
//! - [`backend`] – the inference seam; ONNX Runtime in production, scripted
//!   outputs in tests.
//! - [`decode`] – raw output rows → scored corner quadrilaterals.
//! - [`nms`] – any-overlap suppression of redundant candidates.
//!
//! Model loading tries the quantized variant first and falls back to the
//! full-precision one; when both fail the detector stays uninitialized and
//! every `detect` call logs a warning and returns an empty sequence.

pub mod backend;
pub mod decode;
pub mod nms;
pub mod preprocess;

pub use backend::{InferenceBackend, OrtBackend, RawOutput};
pub use preprocess::{Letterbox, ModelMode};

use crate::detector::Detect;
use crate::error::EngineError;
use crate::image::Frame;
use crate::types::Armor;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Relative path of the quantized model below the assets directory.
const QUANTIZED_MODEL: &str = "models/model-opt-int8.onnx";
/// Relative path of the full-precision fallback.
const FULL_PRECISION_MODEL: &str = "models/model-opt.onnx";

/// Runtime parameters of the neural path.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct NeuralParams {
    /// Square input edge length of the model, pixels.
    pub input_size: usize,
}

impl Default for NeuralParams {
    fn default() -> Self {
        Self { input_size: 640 }
    }
}

/// Pick the model variant to load: the quantized file when present,
/// otherwise the full-precision fallback.
pub fn resolve_model_path(assets_dir: &Path) -> Option<(PathBuf, ModelMode)> {
    let quantized = assets_dir.join(QUANTIZED_MODEL);
    if quantized.is_file() {
        return Some((quantized, ModelMode::Quantized));
    }
    let full = assets_dir.join(FULL_PRECISION_MODEL);
    if full.is_file() {
        return Some((full, ModelMode::FullPrecision));
    }
    None
}

/// Detector running a loaded ONNX model over letterboxed frames.
///
/// Not safe for concurrent `detect` calls: the inference session and the
/// tunable parameters are exclusive mutable state. Serialize calls or use
/// one instance per thread.
pub struct NeuralDetector {
    params: NeuralParams,
    backend: Option<Box<dyn InferenceBackend>>,
    mode: ModelMode,
}

impl NeuralDetector {
    /// Create an uninitialized detector; call [`NeuralDetector::setup`]
    /// before the first `detect`.
    pub fn new(params: NeuralParams) -> Self {
        Self {
            params,
            backend: None,
            mode: ModelMode::FullPrecision,
        }
    }

    /// Inject a prepared backend. Test seam and escape hatch for embedders
    /// with their own runtime.
    pub fn with_backend(
        params: NeuralParams,
        backend: Box<dyn InferenceBackend>,
        mode: ModelMode,
    ) -> Self {
        Self {
            params,
            backend: Some(backend),
            mode,
        }
    }

    /// Load a model from `assets_dir`, preferring the quantized variant.
    ///
    /// Idempotent: a detector that already holds a backend returns `Ok`
    /// without reloading. Load failures of the quantized variant are logged
    /// and the full-precision fallback is attempted; when nothing loads the
    /// detector stays uninitialized.
    pub fn setup(&mut self, assets_dir: &Path) -> Result<(), EngineError> {
        if self.backend.is_some() {
            return Ok(());
        }

        let Some((path, mode)) = resolve_model_path(assets_dir) else {
            return Err(EngineError::ModelUnavailable {
                dir: assets_dir.to_path_buf(),
            });
        };
        match OrtBackend::load(&path) {
            Ok(b) => {
                self.backend = Some(Box::new(b));
                self.mode = mode;
                return Ok(());
            }
            Err(e) => log::warn!("{} failed to load: {e}", path.display()),
        }

        // The resolved pick failed to load; retry the other variant.
        if mode == ModelMode::Quantized {
            let full = assets_dir.join(FULL_PRECISION_MODEL);
            if full.is_file() {
                match OrtBackend::load(&full) {
                    Ok(b) => {
                        self.backend = Some(Box::new(b));
                        self.mode = ModelMode::FullPrecision;
                        return Ok(());
                    }
                    Err(e) => log::warn!("full-precision model failed to load: {e}"),
                }
            }
        }

        Err(EngineError::ModelUnavailable {
            dir: assets_dir.to_path_buf(),
        })
    }

    /// The numeric convention of the loaded model.
    pub fn mode(&self) -> ModelMode {
        self.mode
    }

    fn detect_inner(&mut self, frame: &Frame) -> Result<Vec<Armor>, EngineError> {
        let backend = self
            .backend
            .as_mut()
            .ok_or_else(|| EngineError::InvalidInput("detector uninitialized".into()))?;
        let lb = preprocess::letterbox(frame, self.params.input_size, self.mode);
        let raw = backend.infer(lb.tensor)?;
        let candidates = decode::decode_rows(&raw.shape, &raw.data, lb.scale)?;
        Ok(nms::suppress_overlaps(candidates))
    }
}

impl Detect for NeuralDetector {
    /// Run one frame end-to-end. Every failure (uninitialized detector,
    /// backend error, unexpected output shape) degrades to a logged warning
    /// and an empty result.
    fn detect(&mut self, frame: &Frame) -> Vec<Armor> {
        if frame.is_empty() {
            log::error!("neural detect called with an empty frame");
            return Vec::new();
        }
        match self.detect_inner(frame) {
            Ok(armors) => armors,
            Err(e) => {
                log::warn!("neural detect failed: {e}");
                Vec::new()
            }
        }
    }

    fn is_ready(&self) -> bool {
        self.backend.is_some()
    }
}
