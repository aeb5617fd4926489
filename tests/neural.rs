mod common;

use armor_detector::error::EngineError;
use armor_detector::neural::{InferenceBackend, ModelMode, RawOutput};
use armor_detector::{Detect, NeuralDetector, NeuralParams};
use common::synthetic_frame::{frame_with_bars, Bar};
use ndarray::Array4;
use std::sync::{Arc, Mutex};

const FEATURE_DIM: usize = 22;

/// Backend replaying a scripted output tensor, capturing the input shape.
struct ScriptedBackend {
    shape: Vec<usize>,
    data: Vec<f32>,
    seen_input: Arc<Mutex<Option<(Vec<usize>, f32)>>>,
}

impl ScriptedBackend {
    fn boxed(shape: Vec<usize>, data: Vec<f32>) -> (Box<Self>, Arc<Mutex<Option<(Vec<usize>, f32)>>>) {
        let seen = Arc::new(Mutex::new(None));
        let backend = Box::new(Self {
            shape,
            data,
            seen_input: seen.clone(),
        });
        (backend, seen)
    }
}

impl InferenceBackend for ScriptedBackend {
    fn infer(&mut self, input: Array4<f32>) -> Result<RawOutput, EngineError> {
        let corner = input[[0, 0, input.shape()[2] - 1, input.shape()[3] - 1]];
        *self.seen_input.lock().unwrap() = Some((input.shape().to_vec(), corner));
        Ok(RawOutput {
            shape: self.shape.clone(),
            data: self.data.clone(),
        })
    }
}

/// One output row with the given objectness logit and corner box.
fn script_row(logit: f32, x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<f32> {
    let mut row = vec![0.0f32; FEATURE_DIM];
    row[0] = x0;
    row[1] = y0;
    row[2] = x0;
    row[3] = y1;
    row[4] = x1;
    row[5] = y1;
    row[6] = x1;
    row[7] = y0;
    row[8] = logit;
    row
}

fn detector_with(rows: Vec<Vec<f32>>, input_size: usize) -> NeuralDetector {
    let n = rows.len();
    let data: Vec<f32> = rows.into_iter().flatten().collect();
    let (backend, _) = ScriptedBackend::boxed(vec![1, n, FEATURE_DIM], data);
    NeuralDetector::with_backend(
        NeuralParams { input_size },
        backend,
        ModelMode::FullPrecision,
    )
}

#[test]
fn corners_map_back_through_the_letterbox_scale() {
    let _ = env_logger::builder().is_test(true).try_init();
    // 320x240 frame into a 640 canvas → scale 2: tensor coords halve.
    let frame = frame_with_bars(320, 240, &[]);
    let mut det = detector_with(vec![script_row(2.0, 100.0, 60.0, 200.0, 120.0)], 640);

    let armors = det.detect(&frame);
    assert_eq!(armors.len(), 1);
    let c = &armors[0].corners;
    assert!((c[0].x - 50.0).abs() < 1e-4 && (c[0].y - 30.0).abs() < 1e-4);
    assert!((c[2].x - 100.0).abs() < 1e-4 && (c[2].y - 60.0).abs() < 1e-4);
    assert!((armors[0].score.unwrap() - 1.0 / (1.0 + (-2.0f32).exp())).abs() < 1e-5);
}

#[test]
fn boundary_logit_row_is_kept() {
    let frame = frame_with_bars(640, 480, &[]);
    let mut det = detector_with(vec![script_row(0.0, 10.0, 10.0, 20.0, 20.0)], 640);
    let armors = det.detect(&frame);
    assert_eq!(armors.len(), 1);
    assert!((armors[0].score.unwrap() - 0.5).abs() < 1e-6);
}

#[test]
fn overlapping_candidates_collapse_to_best() {
    let frame = frame_with_bars(640, 480, &[]);
    let rows = vec![
        script_row(0.5, 0.0, 0.0, 100.0, 100.0),  // ≈0.62
        script_row(2.0, 50.0, 50.0, 150.0, 150.0), // ≈0.88, overlaps the first
        script_row(1.0, 400.0, 0.0, 500.0, 100.0), // disjoint, survives
    ];
    let mut det = detector_with(rows, 640);
    let armors = det.detect(&frame);
    assert_eq!(armors.len(), 2);
    // descending score order
    assert!(armors[0].score.unwrap() > armors[1].score.unwrap());
    assert!((armors[0].corners[0].x - 50.0).abs() < 1e-4);
}

#[test]
fn rank_2_output_layout_is_accepted() {
    let frame = frame_with_bars(640, 480, &[]);
    let row = script_row(1.0, 10.0, 10.0, 30.0, 30.0);
    let (backend, _) = ScriptedBackend::boxed(vec![1, FEATURE_DIM], row);
    let mut det = NeuralDetector::with_backend(
        NeuralParams::default(),
        backend,
        ModelMode::FullPrecision,
    );
    assert_eq!(det.detect(&frame).len(), 1);
}

#[test]
fn malformed_output_rank_degrades_to_empty() {
    let frame = frame_with_bars(640, 480, &[]);
    let (backend, _) = ScriptedBackend::boxed(vec![1, 1, 1, FEATURE_DIM], script_row(3.0, 0.0, 0.0, 9.0, 9.0));
    let mut det = NeuralDetector::with_backend(
        NeuralParams::default(),
        backend,
        ModelMode::FullPrecision,
    );
    assert!(det.detect(&frame).is_empty());
    assert!(det.is_ready(), "a decode failure does not unload the model");
}

#[test]
fn undersized_feature_dim_degrades_to_empty() {
    let frame = frame_with_bars(640, 480, &[]);
    let (backend, _) = ScriptedBackend::boxed(vec![1, 1, 21], vec![0.0; 21]);
    let mut det = NeuralDetector::with_backend(
        NeuralParams::default(),
        backend,
        ModelMode::FullPrecision,
    );
    assert!(det.detect(&frame).is_empty());
}

#[test]
fn letterbox_feeds_a_padded_square_tensor() {
    // 320x240 content occupies the top rows; the bottom-right corner of the
    // canvas is padding, 127/255 in full-precision mode.
    let frame = frame_with_bars(
        320,
        240,
        &[Bar {
            x: 10,
            y: 10,
            width: 8,
            height: 60,
        }],
    );
    let (backend, seen) = ScriptedBackend::boxed(vec![1, 0, FEATURE_DIM], vec![]);
    let mut det = NeuralDetector::with_backend(
        NeuralParams { input_size: 640 },
        backend,
        ModelMode::FullPrecision,
    );
    let _ = det.detect(&frame);
    let (shape, corner) = seen.lock().unwrap().clone().unwrap();
    assert_eq!(shape, vec![1, 3, 640, 640]);
    assert!((corner - 127.0 / 255.0).abs() < 1e-5);
}
