//! Whole-state views for observers
//!
//! A snapshot is a cheap copy of everything the presentation layer needs to
//! draw one frame: the board, the active task, progress, score, and phase.
//! Snapshots taken during an engine suspension are stable because state only
//! mutates inside the session's synchronous operations.

use trimatch_types::{BonusKind, Position, SessionPhase, Task, TaskProgress};

use crate::session::GameSession;

/// One cell as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSnapshot {
    pub shape: u8,
    pub bonus: Option<BonusKind>,
    pub clearing: bool,
    pub clear_progress: f32,
}

/// Full session view
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub width: usize,
    pub height: usize,
    /// Row-major cells; None marks an empty cell
    pub cells: Vec<Option<TileSnapshot>>,
    pub score: u32,
    pub task: Task,
    pub progress: TaskProgress,
    pub task_index: usize,
    pub phase: SessionPhase,
}

impl SessionSnapshot {
    /// Cell at (row, col); None outside the grid or on an empty cell
    pub fn cell(&self, pos: Position) -> Option<&TileSnapshot> {
        if pos.row >= self.height || pos.col >= self.width {
            return None;
        }
        self.cells[pos.row * self.width + pos.col].as_ref()
    }
}

/// Capture the current session state
pub fn snapshot(session: &GameSession) -> SessionSnapshot {
    let grid = session.grid();
    let cells = grid
        .cells()
        .iter()
        .map(|cell| {
            cell.map(|tile| TileSnapshot {
                shape: tile.shape.0,
                bonus: tile.bonus,
                clearing: tile.clearing,
                clear_progress: tile.clear_progress,
            })
        })
        .collect();

    SessionSnapshot {
        width: grid.width(),
        height: grid.height(),
        cells,
        score: session.score(),
        task: session.task(),
        progress: session.progress(),
        task_index: session.task_index(),
        phase: session.phase(),
    }
}
