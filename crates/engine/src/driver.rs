//! Move driver - sequences core mutations around pacing suspensions
//!
//! Entry points take a borrowed session plus the pacing contract and run a
//! player action to its fixed point: swap (plain or star), arrow activation,
//! cascade resolution, and the task completion check. State mutates only
//! inside the session's synchronous operations; between them the driver
//! merely suspends, so observers always sample a consistent board.
//!
//! Input is accepted only while the session is `Idle`. A rejected call
//! returns an error and changes nothing; nothing is queued.

use log::debug;
use thiserror::Error;

use trimatch_core::grid::BoardError;
use trimatch_core::session::GameSession;
use trimatch_types::{
    is_adjacent, BonusKind, Position, SessionPhase, TaskOutcome, MAX_CASCADE_ITERATIONS,
};

use crate::config::{pause, Pacing};
use crate::events::SessionEvent;

/// Engine-level failures
///
/// `Busy`, `NotAdjacent`, `NotABonus` and out-of-bounds rejections are
/// local: the input is dropped with no state change. `CascadeOverflow` and
/// `Board(Malformed)` are fatal and leave the session locked.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("session is busy ({phase})")]
    Busy { phase: &'static str },

    #[error("swap cells are not adjacent")]
    NotAdjacent,

    #[error("no activatable bonus at ({row}, {col})")]
    NotABonus { row: usize, col: usize },

    #[error("cascade did not settle after {iterations} iterations")]
    CascadeOverflow { iterations: u32 },

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Outcome of one cascade resolution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CascadeResult {
    /// Points accrued across all iterations
    pub points_awarded: u32,
    /// Tiles that counted toward the active task
    pub cells_collected: u32,
    /// Iterations until the scan found nothing
    pub iterations: u32,
    /// Board changes in order, for the renderer
    pub events: Vec<SessionEvent>,
}

/// Outcome of a player move
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// The swap created no match; the board was restored and the move
    /// refunded
    SwappedBack { events: Vec<SessionEvent> },
    /// The move resolved through the clear/drop/refill pipeline
    Resolved {
        cascade: CascadeResult,
        task: TaskOutcome,
        events: Vec<SessionEvent>,
    },
}

fn ensure_idle(session: &GameSession) -> Result<(), EngineError> {
    if session.phase() != SessionPhase::Idle {
        return Err(EngineError::Busy {
            phase: session.phase().as_str(),
        });
    }
    Ok(())
}

fn ensure_occupied(session: &GameSession, pos: Position) -> Result<(), EngineError> {
    if !session.grid().is_occupied(pos) {
        return Err(EngineError::Board(BoardError::OutOfBounds {
            row: pos.row,
            col: pos.col,
        }));
    }
    Ok(())
}

fn has_star(session: &GameSession, pos: Position) -> bool {
    matches!(
        session.grid().get(pos).flatten(),
        Some(tile) if tile.bonus == Some(BonusKind::BonusStar)
    )
}

/// Run the cascade fixed-point loop on the current board
///
/// Each iteration marks one scan's matches, suspends for the clear display,
/// settles the board, and suspends again. Terminates when a scan finds
/// nothing; the safety valve turns a non-converging board into a fatal
/// error instead of spinning forever.
pub async fn resolve_cascade(
    session: &mut GameSession,
    pacing: &Pacing,
) -> Result<CascadeResult, EngineError> {
    let mut result = CascadeResult::default();

    while let Some(runs) = session.scan_matches() {
        if result.iterations >= MAX_CASCADE_ITERATIONS {
            return Err(EngineError::CascadeOverflow {
                iterations: result.iterations,
            });
        }

        let plan = session.mark_matches(&runs);
        result.points_awarded += plan.points;
        result.cells_collected += plan.collected;
        result
            .events
            .push(SessionEvent::cleared(&plan.cleared, plan.points));
        pause(pacing.clear_ms).await;

        let report = session.settle(&plan)?;
        if !report.moves.is_empty() {
            result.events.push(SessionEvent::dropped(&report.moves));
        }
        if !report.refilled.is_empty() {
            result.events.push(SessionEvent::refilled(&report.refilled));
        }
        for placement in &report.bonuses_placed {
            result.events.push(SessionEvent::bonus_placed(placement));
        }
        pause(pacing.settle_ms).await;

        result.iterations += 1;
        debug!(
            "cascade iteration {}: cleared {} cells for {} points",
            result.iterations,
            plan.cleared.len(),
            plan.points
        );
    }

    Ok(result)
}

/// Check the task and, on a terminal outcome, drive the transition
///
/// Success banks the task score before the notification delay and advances
/// to the next task after it; failure discards the score and reloads the
/// same task. Both reset the board to a fresh quiescent state. While the
/// transition is pending, re-entrant checks are no-ops.
pub async fn run_task_check(
    session: &mut GameSession,
    pacing: &Pacing,
    events: &mut Vec<SessionEvent>,
) -> Result<TaskOutcome, EngineError> {
    match session.check_task() {
        TaskOutcome::None => Ok(TaskOutcome::None),
        TaskOutcome::Success => {
            session.begin_task_transition();
            let banked = session.bank_task_score();
            events.push(SessionEvent::TaskCompleted { banked });
            pause(pacing.transition_ms).await;
            session.advance_task()?;
            session.finish_task_transition();
            Ok(TaskOutcome::Success)
        }
        TaskOutcome::Failure => {
            session.begin_task_transition();
            let discarded = session.discard_task_score();
            events.push(SessionEvent::TaskFailed { discarded });
            pause(pacing.transition_ms).await;
            session.retry_task()?;
            session.finish_task_transition();
            Ok(TaskOutcome::Failure)
        }
    }
}

/// Play a swap of two adjacent occupied cells
///
/// Spends one move up front. A swap that touches a star tile becomes a
/// star activation (the tiles are not exchanged); a plain swap that creates
/// no match is reverted after the swap suspension and the move refunded.
/// Every other path runs the cascade to its fixed point and then the task
/// completion check.
pub async fn play_swap(
    session: &mut GameSession,
    a: Position,
    b: Position,
    pacing: &Pacing,
) -> Result<MoveOutcome, EngineError> {
    ensure_idle(session)?;
    ensure_occupied(session, a)?;
    ensure_occupied(session, b)?;
    if !is_adjacent(a, b) {
        return Err(EngineError::NotAdjacent);
    }

    let star_involved = has_star(session, a) || has_star(session, b);

    session.try_begin_move();
    session.spend_move();

    let outcome = if star_involved {
        drive_star_swap(session, a, b, pacing).await?
    } else {
        drive_plain_swap(session, a, b, pacing).await?
    };

    session.finish_move();
    Ok(outcome)
}

async fn drive_plain_swap(
    session: &mut GameSession,
    a: Position,
    b: Position,
    pacing: &Pacing,
) -> Result<MoveOutcome, EngineError> {
    let mut events = Vec::new();

    session.swap(a, b)?;
    events.push(SessionEvent::SwapApplied {
        a: a.into(),
        b: b.into(),
    });
    pause(pacing.swap_ms).await;

    if session.scan_matches().is_none() {
        // No match: revert and give the move back.
        session.swap(a, b)?;
        session.refund_move();
        events.push(SessionEvent::SwappedBack {
            a: a.into(),
            b: b.into(),
        });
        pause(pacing.swap_ms).await;
        return Ok(MoveOutcome::SwappedBack { events });
    }

    let cascade = resolve_cascade(session, pacing).await?;
    let task = run_task_check(session, pacing, &mut events).await?;
    Ok(MoveOutcome::Resolved {
        cascade,
        task,
        events,
    })
}

async fn drive_star_swap(
    session: &mut GameSession,
    a: Position,
    b: Position,
    pacing: &Pacing,
) -> Result<MoveOutcome, EngineError> {
    let mut events = Vec::new();
    let star_pos = if has_star(session, a) { a } else { b };

    let plan = session.plan_star_clear(a, b)?;
    events.push(SessionEvent::BonusActivated {
        pos: star_pos.into(),
        kind: BonusKind::BonusStar.as_str().to_string(),
    });
    events.push(SessionEvent::cleared(&plan.cleared, plan.points));
    pause(pacing.clear_ms).await;

    let report = session.settle(&plan)?;
    if !report.moves.is_empty() {
        events.push(SessionEvent::dropped(&report.moves));
    }
    if !report.refilled.is_empty() {
        events.push(SessionEvent::refilled(&report.refilled));
    }
    pause(pacing.settle_ms).await;

    let cascade = resolve_cascade(session, pacing).await?;
    let task = run_task_check(session, pacing, &mut events).await?;
    Ok(MoveOutcome::Resolved {
        cascade,
        task,
        events,
    })
}

/// Activate an arrow bonus by position (a tap, not a swap)
///
/// Spends one move, clears the arrow's row or column, then runs the same
/// settle/cascade/task pipeline as a swap. Star tiles are not tappable;
/// they activate through [`play_swap`].
pub async fn activate_line_bonus(
    session: &mut GameSession,
    pos: Position,
    pacing: &Pacing,
) -> Result<MoveOutcome, EngineError> {
    ensure_idle(session)?;

    let tile = session
        .grid()
        .get(pos)
        .flatten()
        .ok_or(EngineError::Board(BoardError::OutOfBounds {
            row: pos.row,
            col: pos.col,
        }))?;
    let kind = match tile.bonus {
        Some(kind) if kind.is_arrow() => kind,
        _ => {
            return Err(EngineError::NotABonus {
                row: pos.row,
                col: pos.col,
            })
        }
    };

    session.try_begin_move();
    session.spend_move();

    let mut events = Vec::new();
    let plan = session.plan_line_clear(pos, kind)?;
    events.push(SessionEvent::BonusActivated {
        pos: pos.into(),
        kind: kind.as_str().to_string(),
    });
    events.push(SessionEvent::cleared(&plan.cleared, plan.points));
    pause(pacing.clear_ms).await;

    let report = session.settle(&plan)?;
    if !report.moves.is_empty() {
        events.push(SessionEvent::dropped(&report.moves));
    }
    if !report.refilled.is_empty() {
        events.push(SessionEvent::refilled(&report.refilled));
    }
    pause(pacing.settle_ms).await;

    let cascade = resolve_cascade(session, pacing).await?;
    let task = run_task_check(session, pacing, &mut events).await?;

    session.finish_move();
    Ok(MoveOutcome::Resolved {
        cascade,
        task,
        events,
    })
}
