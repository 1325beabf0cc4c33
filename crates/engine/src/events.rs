//! Presentation events
//!
//! The engine reports everything a renderer needs to animate a move as a
//! flat list of serializable events, in the order the board changed. An
//! out-of-process renderer can consume them as JSON lines; an in-process
//! one can match on the enum directly.

use serde::{Deserialize, Serialize};

use trimatch_types::{BonusPlacement, Position, TileMove};

/// A (row, col) cell reference on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl From<Position> for CellRef {
    fn from(pos: Position) -> Self {
        Self {
            row: pos.row,
            col: pos.col,
        }
    }
}

/// A gravity move on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropRef {
    pub col: usize,
    pub from_row: usize,
    pub to_row: usize,
}

impl From<TileMove> for DropRef {
    fn from(m: TileMove) -> Self {
        Self {
            col: m.col,
            from_row: m.from_row,
            to_row: m.to_row,
        }
    }
}

/// One observable step of a move's resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Two adjacent tiles exchanged places
    SwapApplied { a: CellRef, b: CellRef },
    /// The swap produced no match and was reverted; the move was refunded
    SwappedBack { a: CellRef, b: CellRef },
    /// A bonus tile was activated (arrow tap or star swap)
    BonusActivated { pos: CellRef, kind: String },
    /// Cells were marked for clearing and scored
    TilesCleared { positions: Vec<CellRef>, points: u32 },
    /// Gravity compacted the columns
    TilesDropped { moves: Vec<DropRef> },
    /// Empty cells were refilled with fresh tiles
    TilesRefilled { positions: Vec<CellRef> },
    /// A new bonus tile appeared on the settled board
    BonusPlaced { pos: CellRef, kind: String },
    /// The active task reached its target; the score was banked
    TaskCompleted { banked: u32 },
    /// The moves budget ran out; the task score was discarded
    TaskFailed { discarded: u32 },
}

impl SessionEvent {
    pub(crate) fn cleared(positions: &[Position], points: u32) -> Self {
        SessionEvent::TilesCleared {
            positions: positions.iter().copied().map(CellRef::from).collect(),
            points,
        }
    }

    pub(crate) fn dropped(moves: &[TileMove]) -> Self {
        SessionEvent::TilesDropped {
            moves: moves.iter().copied().map(DropRef::from).collect(),
        }
    }

    pub(crate) fn refilled(positions: &[Position]) -> Self {
        SessionEvent::TilesRefilled {
            positions: positions.iter().copied().map(CellRef::from).collect(),
        }
    }

    pub(crate) fn bonus_placed(placement: &BonusPlacement) -> Self {
        SessionEvent::BonusPlaced {
            pos: placement.pos.into(),
            kind: placement.kind.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_with_stable_tags() {
        let event = SessionEvent::TilesCleared {
            positions: vec![CellRef { row: 2, col: 3 }],
            points: 10,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"type":"tiles_cleared","positions":[{"row":2,"col":3}],"points":10}"#
        );
    }

    #[test]
    fn test_events_round_trip_through_json() {
        let events = vec![
            SessionEvent::SwapApplied {
                a: CellRef { row: 0, col: 0 },
                b: CellRef { row: 0, col: 1 },
            },
            SessionEvent::BonusPlaced {
                pos: CellRef { row: 5, col: 3 },
                kind: "horizontal_arrow".to_string(),
            },
            SessionEvent::TaskCompleted { banked: 150 },
        ];
        let json = serde_json::to_string(&events).unwrap();
        let back: Vec<SessionEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, events);
    }
}
