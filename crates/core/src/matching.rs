//! Match detection - scans the grid for runs of identical shapes
//!
//! Three independent passes: maximal horizontal runs, maximal vertical runs,
//! and L-intersections (a horizontal and a vertical run crossing at a pivot
//! cell). Every pass skips cells that are empty, bonus-bearing, or already
//! clearing. Overlapping matches are all reported; deduplication of cleared
//! positions happens later, when the cascade marks cells.

use trimatch_types::{MatchDirection, MatchRun, Position, ShapeId, MIN_MATCH_LEN, STAR_MATCH_MIN_LEN};

use crate::grid::Grid;

/// Shape at a position if the cell participates in identity matching
fn matchable_shape(grid: &Grid, row: usize, col: usize) -> Option<ShapeId> {
    match grid.get(Position::new(row, col)) {
        Some(Some(tile)) if tile.matchable() => Some(tile.shape),
        _ => None,
    }
}

/// Scan the whole grid, returning None when no run of 3+ exists
pub fn scan(grid: &Grid) -> Option<Vec<MatchRun>> {
    let mut runs = Vec::new();
    scan_horizontal(grid, &mut runs);
    scan_vertical(grid, &mut runs);
    scan_l_shapes(grid, &mut runs);

    if runs.is_empty() {
        None
    } else {
        Some(runs)
    }
}

/// Left-to-right maximal runs per row
fn scan_horizontal(grid: &Grid, runs: &mut Vec<MatchRun>) {
    for row in 0..grid.height() {
        let mut col = 0;
        while col < grid.width() {
            let Some(shape) = matchable_shape(grid, row, col) else {
                col += 1;
                continue;
            };

            let mut next_col = col + 1;
            while next_col < grid.width() && matchable_shape(grid, row, next_col) == Some(shape) {
                next_col += 1;
            }

            let len = next_col - col;
            if len >= MIN_MATCH_LEN {
                runs.push(MatchRun {
                    positions: (col..next_col).map(|c| Position::new(row, c)).collect(),
                    direction: MatchDirection::Horizontal,
                    shape,
                    intersection: None,
                });
            }
            col = next_col;
        }
    }
}

/// Top-to-bottom maximal runs per column
fn scan_vertical(grid: &Grid, runs: &mut Vec<MatchRun>) {
    for col in 0..grid.width() {
        let mut row = 0;
        while row < grid.height() {
            let Some(shape) = matchable_shape(grid, row, col) else {
                row += 1;
                continue;
            };

            let mut next_row = row + 1;
            while next_row < grid.height() && matchable_shape(grid, next_row, col) == Some(shape) {
                next_row += 1;
            }

            let len = next_row - row;
            if len >= MIN_MATCH_LEN {
                runs.push(MatchRun {
                    positions: (row..next_row).map(|r| Position::new(r, col)).collect(),
                    direction: MatchDirection::Vertical,
                    shape,
                    intersection: None,
                });
            }
            row = next_row;
        }
    }
}

/// L-intersections: both axes through a pivot cell reach 3+, union is 5+
///
/// Every cell is tried as a pivot, so one physical L can be reported more
/// than once through different pivots; the clearing-mark dedup downstream
/// absorbs that, and the star place-once guard keeps bonus creation single.
fn scan_l_shapes(grid: &Grid, runs: &mut Vec<MatchRun>) {
    for row in 0..grid.height() {
        for col in 0..grid.width() {
            let Some(shape) = matchable_shape(grid, row, col) else {
                continue;
            };
            let pivot = Position::new(row, col);

            let mut h_positions = vec![pivot];
            for c in col + 1..grid.width() {
                if matchable_shape(grid, row, c) != Some(shape) {
                    break;
                }
                h_positions.push(Position::new(row, c));
            }
            for c in (0..col).rev() {
                if matchable_shape(grid, row, c) != Some(shape) {
                    break;
                }
                h_positions.push(Position::new(row, c));
            }

            let mut v_positions = vec![pivot];
            for r in row + 1..grid.height() {
                if matchable_shape(grid, r, col) != Some(shape) {
                    break;
                }
                v_positions.push(Position::new(r, col));
            }
            for r in (0..row).rev() {
                if matchable_shape(grid, r, col) != Some(shape) {
                    break;
                }
                v_positions.push(Position::new(r, col));
            }

            if h_positions.len() >= MIN_MATCH_LEN && v_positions.len() >= MIN_MATCH_LEN {
                // Union with the vertical arm deduplicated against the
                // horizontal one (they share exactly the pivot).
                let mut positions = h_positions;
                for p in v_positions {
                    if !positions_contains(&positions, p) {
                        positions.push(p);
                    }
                }

                if positions.len() >= STAR_MATCH_MIN_LEN {
                    runs.push(MatchRun {
                        positions,
                        direction: MatchDirection::LShaped,
                        shape,
                        intersection: Some(pivot),
                    });
                }
            }
        }
    }
}

fn positions_contains(positions: &[Position], p: Position) -> bool {
    positions.iter().any(|&q| q == p)
}
