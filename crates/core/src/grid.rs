//! Grid module - manages the game board
//!
//! The board is a `width x height` grid where each cell is empty or holds one
//! tile (a shape, optionally carrying a bonus kind). Uses a flat row-major
//! array for cache locality; dimensions are fixed at creation and validated
//! after every mutating batch.
//! Coordinates: (row, col) where row 0 is the top and gravity pulls toward
//! the bottom row.

use thiserror::Error;

use trimatch_types::{BonusKind, Cell, Position, Tile, TileMove, NEUTRAL_SHAPE};

use crate::rng::ShapeRng;

/// Board-level failures
///
/// `InvalidDimensions` and `InvalidShapeCount` are fatal at creation.
/// `Malformed` indicates a broken structural invariant after a mutation and
/// is a core bug, never a recoverable condition. `OutOfBounds` is a local
/// rejection with no state change.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid shape count {count}, need at least 1")]
    InvalidShapeCount { count: u8 },

    #[error("malformed grid: expected {expected} cells, found {actual}")]
    Malformed { expected: usize, actual: usize },

    #[error("out of bounds or empty cell at ({row}, {col})")]
    OutOfBounds { row: usize, col: usize },

    #[error("board failed to reach a quiescent state after {iterations} iterations")]
    CascadeOverflow { iterations: u32 },
}

/// The game board - flat row-major storage of optional tiles
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a new empty grid
    ///
    /// Fails with `InvalidDimensions` unless both dimensions are positive.
    pub fn new(width: usize, height: usize) -> Result<Self, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![None; width * height],
        })
    }

    /// Calculate flat index from (row, col), or None when out of bounds
    #[inline]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(row * self.width + col)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.height && pos.col < self.width
    }

    /// Get the cell at a position; None when out of bounds
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos.row, pos.col).map(|idx| self.cells[idx])
    }

    /// Get a mutable reference to the tile at a position, if occupied
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        let idx = self.index(pos.row, pos.col)?;
        self.cells[idx].as_mut()
    }

    /// Set the cell at a position; returns false when out of bounds
    pub fn set(&mut self, pos: Position, cell: Cell) -> bool {
        match self.index(pos.row, pos.col) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if a position is within bounds and occupied
    pub fn is_occupied(&self, pos: Position) -> bool {
        matches!(self.get(pos), Some(Some(_)))
    }

    /// Fill every cell with a uniformly random shape
    pub fn fill(&mut self, rng: &mut ShapeRng) {
        for cell in &mut self.cells {
            *cell = Some(Tile::new(rng.draw()));
        }
    }

    /// Exchange the tile payloads of two occupied cells
    ///
    /// The occupying tiles move; the cell records stay. Fails with
    /// `OutOfBounds` when either position is outside the grid or empty.
    pub fn swap(&mut self, a: Position, b: Position) -> Result<(), BoardError> {
        let ia = self
            .index(a.row, a.col)
            .filter(|&i| self.cells[i].is_some())
            .ok_or(BoardError::OutOfBounds {
                row: a.row,
                col: a.col,
            })?;
        let ib = self
            .index(b.row, b.col)
            .filter(|&i| self.cells[i].is_some())
            .ok_or(BoardError::OutOfBounds {
                row: b.row,
                col: b.col,
            })?;
        self.cells.swap(ia, ib);
        Ok(())
    }

    /// Mark an occupied cell as clearing
    ///
    /// Returns true when the cell was newly marked, false when it was empty
    /// or already clearing. The false case is what deduplicates overlapping
    /// matches within one cascade iteration.
    pub fn mark_clearing(&mut self, pos: Position) -> bool {
        match self.get_mut(pos) {
            Some(tile) if !tile.clearing => {
                tile.clearing = true;
                tile.clear_progress = 0.0;
                true
            }
            _ => false,
        }
    }

    /// Advance a clearing cell's animation progress; at 1.0 the cell empties
    ///
    /// Owned by the presentation layer. The cascade engine does not depend
    /// on it: `commit_clears` removes marked cells regardless of progress.
    pub fn set_clear_progress(&mut self, pos: Position, progress: f32) {
        let done = match self.get_mut(pos) {
            Some(tile) if tile.clearing => {
                tile.clear_progress = progress.clamp(0.0, 1.0);
                tile.clear_progress >= 1.0
            }
            _ => false,
        };
        if done {
            self.set(pos, None);
        }
    }

    /// Empty every clearing cell, returning the positions removed
    pub fn commit_clears(&mut self) -> Vec<Position> {
        let mut removed = Vec::new();
        for row in 0..self.height {
            for col in 0..self.width {
                let idx = row * self.width + col;
                if matches!(self.cells[idx], Some(tile) if tile.clearing) {
                    self.cells[idx] = None;
                    removed.push(Position::new(row, col));
                }
            }
        }
        removed
    }

    /// Compact one column downward
    ///
    /// Non-empty, non-clearing cells fall to the bottom of the column;
    /// vacated rows at the top become empty. Returns the moves made, for the
    /// presentation layer's animation feed.
    pub fn drop_column(&mut self, col: usize) -> Vec<TileMove> {
        let mut moves = Vec::new();
        if col >= self.width {
            return moves;
        }

        let mut write_row = self.height;
        for row in (0..self.height).rev() {
            let idx = row * self.width + col;
            let keep = matches!(self.cells[idx], Some(tile) if !tile.clearing);
            if keep {
                write_row -= 1;
                if write_row != row {
                    self.cells[write_row * self.width + col] = self.cells[idx];
                    self.cells[idx] = None;
                    moves.push(TileMove {
                        col,
                        from_row: row,
                        to_row: write_row,
                    });
                }
            }
        }

        // Clear the vacated rows above the compacted run.
        for row in 0..write_row {
            self.cells[row * self.width + col] = None;
        }

        moves
    }

    /// Compact every column, left to right
    pub fn drop_tiles(&mut self) -> Vec<TileMove> {
        let mut moves = Vec::new();
        for col in 0..self.width {
            moves.extend(self.drop_column(col));
        }
        moves
    }

    /// Fill every empty cell with a fresh random shape
    ///
    /// Scans row-major from the top so the RNG stream is reproducible.
    /// Returns the filled positions for the animation feed.
    pub fn refill(&mut self, rng: &mut ShapeRng) -> Vec<Position> {
        let mut filled = Vec::new();
        for row in 0..self.height {
            for col in 0..self.width {
                let idx = row * self.width + col;
                if self.cells[idx].is_none() {
                    self.cells[idx] = Some(Tile::new(rng.draw()));
                    filled.push(Position::new(row, col));
                }
            }
        }
        filled
    }

    /// Place a bonus tile at a position
    ///
    /// Overwrites the cell's shape with the neutral shape and sets the bonus
    /// kind. The cell must be occupied (it always is right after a refill).
    pub fn place_bonus(&mut self, pos: Position, kind: BonusKind) -> Result<(), BoardError> {
        match self.get_mut(pos) {
            Some(tile) => {
                tile.shape = NEUTRAL_SHAPE;
                tile.bonus = Some(kind);
                tile.clearing = false;
                tile.clear_progress = 0.0;
                Ok(())
            }
            None => Err(BoardError::OutOfBounds {
                row: pos.row,
                col: pos.col,
            }),
        }
    }

    /// Structural invariant check, run after every mutating batch
    pub fn validate(&self) -> Result<(), BoardError> {
        let expected = self.width * self.height;
        if self.cells.len() != expected {
            return Err(BoardError::Malformed {
                expected,
                actual: self.cells.len(),
            });
        }
        Ok(())
    }

    /// Read-only view of the backing store, row-major
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Build a grid from shape indices for testing (row-major, outer = rows)
    #[cfg(test)]
    pub fn from_shapes(rows: &[&[u8]]) -> Self {
        let height = rows.len();
        let width = rows[0].len();
        assert!(rows.iter().all(|r| r.len() == width));

        let mut grid = Grid::new(width, height).unwrap();
        for (row, shapes) in rows.iter().enumerate() {
            for (col, &shape) in shapes.iter().enumerate() {
                grid.set(
                    Position::new(row, col),
                    Some(Tile::new(trimatch_types::ShapeId(shape))),
                );
            }
        }
        grid
    }

    /// Dump shape indices for testing; 255 marks empty cells
    #[cfg(test)]
    pub fn to_shapes(&self) -> Vec<Vec<u8>> {
        (0..self.height)
            .map(|row| {
                (0..self.width)
                    .map(|col| {
                        self.cells[row * self.width + col]
                            .map(|tile| tile.shape.0)
                            .unwrap_or(255)
                    })
                    .collect()
            })
            .collect()
    }
}
