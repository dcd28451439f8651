//! Tile grid reconstruction from per-tile start positions.
//!
//! Physical mosaics are acquired on an approximate raster: stage motion
//! aligns tiles into rows and columns with small jitter bounded by a
//! tolerance. Each axis is clustered independently with a greedy 1-D pass
//! over the sorted distinct start values; two values land in the same
//! cluster when they sit within the tolerance of its representative. The
//! resulting indices describe the montage layout only; they never affect
//! pixel values.

use crate::document::TileBounds;

/// Row and column counts of the reconstructed grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub rows: i32,
    pub cols: i32,
}

/// Assign `row`/`col` indices to every tile in place and return the grid
/// shape.
///
/// This is a global pass: it must run after all tiles are collected, never
/// streaming. A single tile gets `(0, 0)`; an empty set yields a `0 x 0`
/// shape.
pub fn assign_grid_indices(tiles: &mut [TileBounds], tolerance: i32) -> GridShape {
    if tiles.is_empty() {
        return GridShape { rows: 0, cols: 0 };
    }

    let xs: Vec<i32> = tiles.iter().map(|t| t.start_x).collect();
    let ys: Vec<i32> = tiles.iter().map(|t| t.start_y).collect();
    let col_reps = cluster_positions(&xs, tolerance);
    let row_reps = cluster_positions(&ys, tolerance);

    for tile in tiles.iter_mut() {
        tile.col = nearest_cluster(&col_reps, tile.start_x);
        tile.row = nearest_cluster(&row_reps, tile.start_y);
    }

    GridShape {
        rows: row_reps.len() as i32,
        cols: col_reps.len() as i32,
    }
}

/// Greedy 1-D tolerance clustering over sorted distinct values.
///
/// Returns one representative per cluster, in ascending order. The
/// representative is the first (smallest) value of the cluster; a value
/// joins the current cluster when it sits within `tolerance` of that
/// representative, otherwise it opens the next cluster.
fn cluster_positions(values: &[i32], tolerance: i32) -> Vec<i32> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut reps: Vec<i32> = Vec::new();
    for value in sorted {
        match reps.last() {
            Some(&rep) if i64::from(value) - i64::from(rep) <= i64::from(tolerance) => {}
            _ => reps.push(value),
        }
    }
    reps
}

/// Index of the cluster whose representative is numerically closest to the
/// value. Ties between two representatives go to the lower index.
fn nearest_cluster(reps: &[i32], value: i32) -> i32 {
    let mut best = 0usize;
    let mut best_distance = i64::MAX;
    for (index, &rep) in reps.iter().enumerate() {
        let distance = (i64::from(value) - i64::from(rep)).abs();
        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }
    best as i32
}

// =============================================================================
// Tests
// =============================================================================
