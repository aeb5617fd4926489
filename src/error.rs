//! Engine error taxonomy.
//!
//! These errors stay internal to the engine: every fallible stage reports
//! through [`EngineError`], and the `detect` boundary converts failures into
//! a logged diagnostic plus an empty result. Callers only see errors from
//! explicit setup entry points.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The input frame is empty or malformed.
    #[error("invalid input frame: {0}")]
    InvalidInput(String),

    /// Neither the quantized nor the full-precision model could be loaded.
    #[error("no loadable model under {dir}")]
    ModelUnavailable { dir: PathBuf },

    /// The inference backend rejected the call.
    #[error("inference backend error: {0}")]
    Inference(#[from] ort::Error),

    /// The model produced an output tensor of unexpected rank.
    #[error("unexpected output tensor rank {0} (want 2 or 3)")]
    OutputRank(usize),

    /// The per-row feature dimension is too small to decode.
    #[error("output feature dimension {0} too small (want >= {1})")]
    FeatureDim(usize, usize),

    /// The output buffer is shorter than its shape promises.
    #[error("output data truncated: {have} values for {want}")]
    TruncatedOutput { have: usize, want: usize },

    /// Classifier assets could not be read.
    #[error("classifier asset {path}: {source}")]
    ClassifierAsset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The label table is empty or does not match the model output width.
    #[error("label table mismatch: {0}")]
    LabelTable(String),
}
