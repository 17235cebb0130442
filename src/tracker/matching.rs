//! Matching utilities for detection-to-track association.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::TrackError;
use crate::tracker::rect::Rect;

/// Cost given to infeasible pairs when padding for the optimal solver.
const INFEASIBLE_COST: f64 = 1e6;

/// Strategy used to pair predicted track positions with detections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Matcher {
    /// Repeatedly take the globally closest remaining pair
    #[default]
    Greedy,
    /// Minimum total distance bipartite assignment (Jonker-Volgenant)
    Optimal,
}

/// Center distance matrix of shape (tracks, detections).
pub fn center_distance(track_boxes: &[Rect], det_boxes: &[Rect]) -> Array2<f32> {
    let mut dists = Array2::zeros((track_boxes.len(), det_boxes.len()));
    for (i, t) in track_boxes.iter().enumerate() {
        for (j, d) in det_boxes.iter().enumerate() {
            dists[[i, j]] = t.center_distance(d);
        }
    }
    dists
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentResult {
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

impl AssignmentResult {
    fn from_matches(matches: Vec<(usize, usize)>, num_rows: usize, num_cols: usize) -> Self {
        let mut row_free = vec![true; num_rows];
        let mut col_free = vec![true; num_cols];
        for &(row, col) in &matches {
            row_free[row] = false;
            col_free[col] = false;
        }
        let free = |mask: Vec<bool>| -> Vec<usize> {
            mask.iter()
                .enumerate()
                .filter_map(|(i, &u)| if u { Some(i) } else { None })
                .collect()
        };
        Self {
            matches,
            unmatched_tracks: free(row_free),
            unmatched_detections: free(col_free),
        }
    }
}

/// Greedy nearest-pair assignment.
///
/// Pairs with cost `<= thresh` are visited in ascending cost; ties go to the
/// lower row, then the lower column. Each row and column is used at most once.
pub fn greedy_assignment(cost_matrix: &Array2<f32>, thresh: f32) -> AssignmentResult {
    let (num_rows, num_cols) = cost_matrix.dim();

    let mut candidates: Vec<(f32, usize, usize)> = cost_matrix
        .indexed_iter()
        .filter(|&(_, &cost)| cost <= thresh)
        .map(|((row, col), &cost)| (cost, row, col))
        .collect();
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

    let mut row_used = vec![false; num_rows];
    let mut col_used = vec![false; num_cols];
    let mut matches = Vec::new();
    for (_, row, col) in candidates {
        if row_used[row] || col_used[col] {
            continue;
        }
        row_used[row] = true;
        col_used[col] = true;
        matches.push((row, col));
    }
    matches.sort_unstable();

    AssignmentResult::from_matches(matches, num_rows, num_cols)
}

/// Optimal assignment minimizing total cost, restricted to pairs with cost `<= thresh`.
pub fn linear_assignment(
    cost_matrix: &Array2<f32>,
    thresh: f32,
) -> Result<AssignmentResult, TrackError> {
    let (num_rows, num_cols) = cost_matrix.dim();

    if num_rows == 0 || num_cols == 0 {
        return Ok(AssignmentResult::from_matches(vec![], num_rows, num_cols));
    }

    let size = num_rows.max(num_cols);
    let mut padded = Array2::<f64>::from_elem((size, size), INFEASIBLE_COST);
    for ((row, col), &cost) in cost_matrix.indexed_iter() {
        if cost <= thresh {
            padded[[row, col]] = cost as f64;
        }
    }

    let (row_to_col, _) =
        lapjv::lapjv(&padded).map_err(|e| TrackError::Assignment(format!("{e:?}")))?;

    let matches = row_to_col
        .iter()
        .enumerate()
        .filter(|&(row, &col)| row < num_rows && col < num_cols)
        .filter(|&(row, &col)| cost_matrix[[row, col]] <= thresh)
        .map(|(row, &col)| (row, col))
        .collect();

    Ok(AssignmentResult::from_matches(matches, num_rows, num_cols))
}
