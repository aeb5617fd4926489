//! Overlap-based non-maximum suppression.
//!
//! Candidates are visited in descending score order; accepting one
//! suppresses every remaining candidate whose corner bounding rectangle has
//! positive-area overlap with it. This is deliberately an any-overlap rule
//! rather than an IoU threshold: rectangles that merely touch at an edge do
//! not suppress each other, any interior overlap does.

use crate::types::Armor;

/// Suppress redundant overlapping candidates, keeping the best-scoring one
/// per overlapping cluster. Output is in descending-score order.
pub fn suppress_overlaps(mut candidates: Vec<Armor>) -> Vec<Armor> {
    candidates.sort_by(|a, b| {
        b.score
            .unwrap_or(0.0)
            .total_cmp(&a.score.unwrap_or(0.0))
    });

    let mut removed = vec![false; candidates.len()];
    let mut kept = Vec::with_capacity(candidates.len());
    for i in 0..candidates.len() {
        if removed[i] {
            continue;
        }
        for j in i + 1..candidates.len() {
            if !removed[j] && rects_overlap(&candidates[i], &candidates[j]) {
                removed[j] = true;
            }
        }
        kept.push(candidates[i].clone());
    }
    kept
}

fn rects_overlap(a: &Armor, b: &Armor) -> bool {
    let (ax0, ay0, ax1, ay1) = a.bounding_rect();
    let (bx0, by0, bx1, by1) = b.bounding_rect();
    let w = ax1.min(bx1) - ax0.max(bx0);
    let h = ay1.min(by1) - ay0.max(by0);
    w > 0.0 && h > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn boxed(x0: f32, y0: f32, x1: f32, y1: f32, score: f32) -> Armor {
        Armor {
            label: String::new(),
            color: None,
            score: Some(score),
            corners: [
                Point2::new(x0, y0),
                Point2::new(x0, y1),
                Point2::new(x1, y1),
                Point2::new(x1, y0),
            ],
        }
    }

    #[test]
    fn overlapping_pair_keeps_only_best() {
        let out = suppress_overlaps(vec![
            boxed(0.0, 0.0, 10.0, 10.0, 0.6),
            boxed(5.0, 5.0, 15.0, 15.0, 0.9),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].score, Some(0.9));
    }

    #[test]
    fn disjoint_pair_both_survive_sorted() {
        let out = suppress_overlaps(vec![
            boxed(0.0, 0.0, 10.0, 10.0, 0.6),
            boxed(20.0, 0.0, 30.0, 10.0, 0.9),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].score, Some(0.9));
        assert_eq!(out[1].score, Some(0.6));
    }

    #[test]
    fn edge_touching_rectangles_do_not_suppress() {
        let out = suppress_overlaps(vec![
            boxed(0.0, 0.0, 10.0, 10.0, 0.9),
            boxed(10.0, 0.0, 20.0, 10.0, 0.6),
        ]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn chain_overlap_suppresses_transitively_from_best() {
        // middle box overlaps both ends; ends do not overlap each other
        let out = suppress_overlaps(vec![
            boxed(0.0, 0.0, 10.0, 10.0, 0.5),
            boxed(8.0, 0.0, 18.0, 10.0, 0.9),
            boxed(16.0, 0.0, 26.0, 10.0, 0.4),
        ]);
        // the 0.9 box wins and removes both neighbors it overlaps
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].score, Some(0.9));
    }
}
