//! Inference backend seam.
//!
//! The detector only needs "tensor in, raw rows out", so the ONNX Runtime
//! session sits behind a small trait. Tests substitute a scripted backend
//! and exercise the full preprocess → decode → suppress path without model
//! assets.

use crate::error::EngineError;
use ndarray::Array4;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;

/// Raw output tensor: shape as reported by the runtime plus flat f32 data.
#[derive(Clone, Debug)]
pub struct RawOutput {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

/// Minimal contract for running one forward pass.
pub trait InferenceBackend: Send {
    fn infer(&mut self, input: Array4<f32>) -> Result<RawOutput, EngineError>;
}

/// ONNX Runtime session wrapper.
pub struct OrtBackend {
    session: Session,
}

impl OrtBackend {
    /// Load and compile a model from disk.
    pub fn load(model_path: &Path) -> Result<Self, EngineError> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path)?;
        Ok(Self { session })
    }
}

impl InferenceBackend for OrtBackend {
    fn infer(&mut self, input: Array4<f32>) -> Result<RawOutput, EngineError> {
        let shape = input.shape().to_vec();
        let (data, _offset) = input.into_raw_vec_and_offset();
        let value = ort::value::Value::from_array((shape.as_slice(), data))?;
        let outputs = self.session.run(ort::inputs![value])?;
        let (out_shape, out_data) = outputs[0].try_extract_tensor::<f32>()?;
        Ok(RawOutput {
            shape: out_shape.iter().map(|&d| d as usize).collect(),
            data: out_data.to_vec(),
        })
    }
}
