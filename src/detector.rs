//! Shared detector contract and explicit backend selection.
//!
//! Both backends implement [`Detect`]; the caller (or a configuration
//! value) picks one through [`DetectorBackend`]. There is no runtime type
//! inspection, no singleton registry, and no event-loop coupling — results
//! come back as a plain return value.

use crate::classical::ClassicalDetector;
use crate::image::Frame;
use crate::neural::NeuralDetector;
use crate::types::Armor;

/// One synchronous detection pass over a frame.
///
/// Implementations absorb every internal failure: the returned sequence is
/// empty both for "no targets" and for "detector unusable"; check
/// [`Detect::is_ready`] to tell the two apart. Instances are not safe for
/// concurrent `detect` calls.
pub trait Detect {
    fn detect(&mut self, frame: &Frame) -> Vec<Armor>;

    /// False while the backend is missing loadable state (e.g. no model
    /// could be loaded).
    fn is_ready(&self) -> bool;
}

/// Tagged selection of the active backend.
pub enum DetectorBackend {
    Classical(ClassicalDetector),
    Neural(NeuralDetector),
}

impl Detect for DetectorBackend {
    fn detect(&mut self, frame: &Frame) -> Vec<Armor> {
        match self {
            DetectorBackend::Classical(d) => d.detect(frame),
            DetectorBackend::Neural(d) => d.detect(frame),
        }
    }

    fn is_ready(&self) -> bool {
        match self {
            DetectorBackend::Classical(d) => d.is_ready(),
            DetectorBackend::Neural(d) => d.is_ready(),
        }
    }
}
