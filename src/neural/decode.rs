//! Decoding raw model output rows into armor candidates.
//!
//! Each row carries four corner points (indices 0–7, tensor-space), an
//! objectness logit (index 8), a 4-way color head (offset 9) and a 9-way
//! pattern head (offset 13). Thresholding happens in logit space so the
//! sigmoid is only evaluated for kept rows.

use crate::error::EngineError;
use crate::types::{Armor, ArmorColor};
use nalgebra::Point2;

/// Minimum per-row feature dimension required to decode.
pub const MIN_FEATURE_DIM: usize = 22;

const OBJECTNESS_IDX: usize = 8;
const COLOR_OFFSET: usize = 9;
const COLOR_CLASSES: usize = 4;
const PATTERN_OFFSET: usize = 13;
const PATTERN_CLASSES: usize = 9;

/// Pattern head index → class label.
const PATTERN_LABELS: [&str; PATTERN_CLASSES] = ["0", "1", "2", "3", "4", "5", "5", "5", "Bb"];

const COLOR_MAP: [ArmorColor; COLOR_CLASSES] = [
    ArmorColor::Blue,
    ArmorColor::Red,
    ArmorColor::Green,
    ArmorColor::Purple,
];

#[inline]
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[inline]
fn inv_sigmoid(p: f32) -> f32 {
    -(1.0 / p - 1.0).ln()
}

fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// Interpret the raw output tensor as `(rows, feature_dim)`.
///
/// Accepts rank 3 (`[1, N, D]`) and rank 2 (`[N, D]`); everything else is a
/// decode failure.
pub fn row_layout(shape: &[usize]) -> Result<(usize, usize), EngineError> {
    let (n, d) = match shape.len() {
        3 => (shape[1], shape[2]),
        2 => (shape[0], shape[1]),
        rank => return Err(EngineError::OutputRank(rank)),
    };
    if d < MIN_FEATURE_DIM {
        return Err(EngineError::FeatureDim(d, MIN_FEATURE_DIM));
    }
    Ok((n, d))
}

/// Decode every row whose objectness clears the 0.5-probability logit.
///
/// Corner coordinates are divided by `scale` to return to original-image
/// pixels; top-left letterbox padding means no offset is subtracted. The
/// result is unsuppressed and unordered.
pub fn decode_rows(shape: &[usize], data: &[f32], scale: f32) -> Result<Vec<Armor>, EngineError> {
    let (n, d) = row_layout(shape)?;
    if data.len() < n * d {
        return Err(EngineError::TruncatedOutput {
            have: data.len(),
            want: n * d,
        });
    }
    let threshold = inv_sigmoid(0.5);

    let mut candidates = Vec::new();
    for i in 0..n {
        let row = &data[i * d..(i + 1) * d];
        let logit = row[OBJECTNESS_IDX];
        // only strictly-below-threshold rows are dropped
        if logit < threshold {
            continue;
        }

        let corners = [
            Point2::new(row[0] / scale, row[1] / scale),
            Point2::new(row[2] / scale, row[3] / scale),
            Point2::new(row[4] / scale, row[5] / scale),
            Point2::new(row[6] / scale, row[7] / scale),
        ];
        let color_id = argmax(&row[COLOR_OFFSET..COLOR_OFFSET + COLOR_CLASSES]);
        let pattern_id = argmax(&row[PATTERN_OFFSET..PATTERN_OFFSET + PATTERN_CLASSES]);

        candidates.push(Armor {
            label: PATTERN_LABELS[pattern_id].to_string(),
            color: Some(COLOR_MAP[color_id]),
            score: Some(sigmoid(logit)),
            corners,
        });
    }
    Ok(candidates)
}
