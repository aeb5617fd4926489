//! Runtime configuration supplied by the external settings collaborator.
//!
//! The engine never reads or writes persistent settings on its own; a JSON
//! document is handed in once and turned into a configured detector. All
//! tunables remain mutable on the detector afterwards.

use crate::classical::{ArmorParams, ClassicalDetector, LightParams};
use crate::detector::DetectorBackend;
use crate::neural::{NeuralDetector, NeuralParams};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Which backend the caller wants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendChoice {
    Classical,
    Neural,
}

/// Classifier assets and acceptance threshold.
#[derive(Clone, Debug, Deserialize)]
pub struct ClassifierConfig {
    pub model_path: PathBuf,
    pub label_path: PathBuf,
    pub threshold: f32,
}

/// Full engine configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub backend: BackendChoice,
    /// Grayscale binarization threshold for the classical path.
    #[serde(default = "default_binary_threshold")]
    pub binary_threshold: u8,
    #[serde(default)]
    pub light_params: LightParams,
    #[serde(default)]
    pub armor_params: ArmorParams,
    #[serde(default)]
    pub neural: NeuralParams,
    /// Directory holding the neural model variants.
    pub assets_dir: Option<PathBuf>,
    pub classifier: Option<ClassifierConfig>,
}

fn default_binary_threshold() -> u8 {
    160
}

/// Read and parse a JSON configuration file.
pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: RuntimeConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    Ok(config)
}

/// Build the selected detector.
///
/// Setup failures (missing model, unreadable classifier assets) are logged
/// and leave the detector in a degraded-but-usable state, matching the
/// engine's never-fatal initialization policy.
pub fn build_detector(config: &RuntimeConfig) -> DetectorBackend {
    match config.backend {
        BackendChoice::Classical => {
            let mut det = ClassicalDetector::new(
                config.binary_threshold,
                config.light_params,
                config.armor_params,
            );
            if let Some(clf) = &config.classifier {
                if let Err(e) =
                    det.reset_classifier(&clf.model_path, &clf.label_path, clf.threshold)
                {
                    log::warn!("number classifier unavailable: {e}");
                }
            }
            DetectorBackend::Classical(det)
        }
        BackendChoice::Neural => {
            let mut det = NeuralDetector::new(config.neural);
            match &config.assets_dir {
                Some(dir) => {
                    if let Err(e) = det.setup(dir) {
                        log::warn!("neural detector setup failed: {e}");
                    }
                }
                None => log::warn!("neural backend selected without assets_dir"),
            }
            DetectorBackend::Neural(det)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::Detect;

    #[test]
    fn minimal_classical_config_parses_with_defaults() {
        let json = r#"{ "backend": "classical" }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.backend, BackendChoice::Classical);
        assert_eq!(cfg.binary_threshold, 160);
        assert!((cfg.armor_params.max_small_center_distance - 3.5).abs() < 1e-6);
        assert_eq!(cfg.neural.input_size, 640);
    }

    #[test]
    fn neural_config_without_assets_builds_unready_detector() {
        let json = r#"{ "backend": "neural" }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        let det = build_detector(&cfg);
        assert!(!det.is_ready());
    }

    #[test]
    fn overridden_bounds_are_honored() {
        let json = r#"{
            "backend": "classical",
            "binary_threshold": 90,
            "light_params": { "min_ratio": 0.05, "max_ratio": 0.6, "max_angle_deg": 30.0 }
        }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.binary_threshold, 90);
        assert!((cfg.light_params.max_ratio - 0.6).abs() < 1e-6);
    }
}
