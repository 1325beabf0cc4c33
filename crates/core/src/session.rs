//! Game session - owns the board, the RNG stream, and task state
//!
//! This module ties the core components together: grid, shape RNG, task
//! book, cumulative score, and the session phase machine. It exposes the
//! synchronous mutation points of a cascade iteration (`mark_matches`,
//! `settle`) and the activation planners; the async engine crate sequences
//! those around pacing suspensions.
//!
//! State is mutated only inside these methods, so an observer sampling the
//! session between calls always sees a stable, self-consistent snapshot.

use log::{debug, info, warn};

use trimatch_types::{
    BonusKind, BonusPlacement, MatchRun, Position, SessionPhase, Task, TaskOutcome, TaskProgress,
    TileMove, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, DEFAULT_SHAPE_COUNT, MAX_CASCADE_ITERATIONS,
    POINTS_PER_TILE,
};

use crate::bonus::bonus_for_match;
use crate::grid::{BoardError, Grid};
use crate::matching;
use crate::rng::ShapeRng;
use crate::tasks::TaskBook;

/// Per-session configuration, supplied by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub width: usize,
    pub height: usize,
    pub shape_count: u8,
    pub seed: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            shape_count: DEFAULT_SHAPE_COUNT,
            seed: 1,
        }
    }
}

/// Everything decided in the first half of a cascade iteration
///
/// Produced by `mark_matches` (or an activation planner) before the
/// clear-display suspension; consumed by `settle` after it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClearPlan {
    /// Distinct positions marked clearing this iteration
    pub cleared: Vec<Position>,
    /// Bonus tiles to place after the settle step
    pub bonuses: Vec<BonusPlacement>,
    /// Points accrued for the distinct cleared cells
    pub points: u32,
    /// Cleared tiles that counted toward the active task
    pub collected: u32,
}

impl ClearPlan {
    pub fn is_empty(&self) -> bool {
        self.cleared.is_empty()
    }
}

/// Everything the second half of an iteration did to the board
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettleReport {
    /// Positions that became empty
    pub cleared: Vec<Position>,
    /// Gravity moves, column by column
    pub moves: Vec<TileMove>,
    /// Positions refilled with fresh tiles
    pub refilled: Vec<Position>,
    /// Bonus tiles placed onto the settled board
    pub bonuses_placed: Vec<BonusPlacement>,
}

/// A complete game session
#[derive(Debug, Clone)]
pub struct GameSession {
    config: SessionConfig,
    grid: Grid,
    rng: ShapeRng,
    tasks: TaskBook,
    score: u32,
    phase: SessionPhase,
}

impl GameSession {
    /// Create a session: build the grid, fill it, resolve initial matches,
    /// and load the first task
    pub fn new(config: SessionConfig) -> Result<Self, BoardError> {
        if config.shape_count == 0 {
            return Err(BoardError::InvalidShapeCount {
                count: config.shape_count,
            });
        }
        let grid = Grid::new(config.width, config.height)?;
        let mut rng = ShapeRng::new(config.seed, config.shape_count);
        let tasks = TaskBook::new(&mut rng);

        let mut session = Self {
            config,
            grid,
            rng,
            tasks,
            score: 0,
            phase: SessionPhase::Idle,
        };
        session.grid.fill(&mut session.rng);
        let iterations = session.resolve_initial_matches()?;
        info!(
            "session created: {}x{} grid, {} shapes, {} reroll iterations",
            config.width, config.height, config.shape_count, iterations
        );
        Ok(session)
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable board access for the presentation layer (clear-progress
    /// animation) and test fixtures
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn task(&self) -> Task {
        self.tasks.task()
    }

    pub fn progress(&self) -> TaskProgress {
        self.tasks.progress()
    }

    pub fn task_index(&self) -> usize {
        self.tasks.index()
    }

    // --- phase machine -----------------------------------------------------

    /// Claim the session for a move; false when input must be ignored
    pub fn try_begin_move(&mut self) -> bool {
        if self.phase == SessionPhase::Idle {
            self.phase = SessionPhase::Resolving;
            true
        } else {
            debug!("input ignored: session is {}", self.phase.as_str());
            false
        }
    }

    /// Release the session after a move resolved to its fixed point
    pub fn finish_move(&mut self) {
        if self.phase == SessionPhase::Resolving {
            self.phase = SessionPhase::Idle;
        }
    }

    /// Enter the task-transition phase; concurrent completion checks
    /// while it is held are no-ops
    pub fn begin_task_transition(&mut self) {
        self.phase = SessionPhase::TaskTransitioning;
    }

    /// Leave the task-transition phase
    pub fn finish_task_transition(&mut self) {
        self.phase = SessionPhase::Idle;
    }

    // --- board operations --------------------------------------------------

    /// Exchange two occupied cells (adjacency is the caller's contract)
    pub fn swap(&mut self, a: Position, b: Position) -> Result<(), BoardError> {
        self.grid.swap(a, b)
    }

    /// Scan the current board for matches
    pub fn scan_matches(&self) -> Option<Vec<MatchRun>> {
        matching::scan(&self.grid)
    }

    /// First mutation point of a cascade iteration
    ///
    /// Decides bonus placements in scan order (star at most once), marks
    /// every match position clearing exactly once, accrues points for the
    /// distinct cleared cells and counts task-shape tiles. Overlapping
    /// matches are deduplicated by the clearing mark itself.
    pub fn mark_matches(&mut self, runs: &[MatchRun]) -> ClearPlan {
        let mut plan = ClearPlan::default();
        let mut star_placed = false;

        for run in runs {
            if let Some(placement) = bonus_for_match(run, star_placed) {
                if placement.kind == BonusKind::BonusStar {
                    star_placed = true;
                }
                plan.bonuses.push(placement);
            }
            self.mark_positions(&run.positions, &mut plan);
        }

        self.finish_plan(&mut plan);
        plan
    }

    /// Plan an arrow activation: every occupied, non-clearing cell in the
    /// arrow's row or column, the arrow itself included
    ///
    /// `kind` must be one of the arrow kinds; star activation goes through
    /// [`GameSession::plan_star_clear`].
    pub fn plan_line_clear(
        &mut self,
        pos: Position,
        kind: BonusKind,
    ) -> Result<ClearPlan, BoardError> {
        debug_assert!(kind.is_arrow());
        if !self.grid.is_occupied(pos) {
            return Err(BoardError::OutOfBounds {
                row: pos.row,
                col: pos.col,
            });
        }

        let positions: Vec<Position> = match kind {
            BonusKind::HorizontalArrow => (0..self.grid.width())
                .map(|col| Position::new(pos.row, col))
                .collect(),
            _ => (0..self.grid.height())
                .map(|row| Position::new(row, pos.col))
                .collect(),
        };

        let mut plan = ClearPlan::default();
        self.mark_positions(&positions, &mut plan);
        self.finish_plan(&mut plan);
        Ok(plan)
    }

    /// Plan a star swap: every tile of the partner's shape grid-wide plus
    /// the star tile itself
    ///
    /// The two tiles are never actually exchanged. When both carry a star,
    /// the first operand wins, matching the original behavior.
    pub fn plan_star_clear(&mut self, a: Position, b: Position) -> Result<ClearPlan, BoardError> {
        let tile_a = self
            .grid
            .get(a)
            .flatten()
            .ok_or(BoardError::OutOfBounds { row: a.row, col: a.col })?;
        let tile_b = self
            .grid
            .get(b)
            .flatten()
            .ok_or(BoardError::OutOfBounds { row: b.row, col: b.col })?;

        let (star_pos, target_shape) = if tile_a.bonus == Some(BonusKind::BonusStar) {
            (a, tile_b.shape)
        } else {
            (b, tile_a.shape)
        };

        let mut positions = Vec::new();
        for row in 0..self.grid.height() {
            for col in 0..self.grid.width() {
                let pos = Position::new(row, col);
                if matches!(
                    self.grid.get(pos).flatten(),
                    Some(tile) if tile.shape == target_shape && !tile.clearing
                ) {
                    positions.push(pos);
                }
            }
        }
        positions.push(star_pos);

        let mut plan = ClearPlan::default();
        self.mark_positions(&positions, &mut plan);
        self.finish_plan(&mut plan);
        Ok(plan)
    }

    /// Mark positions clearing, deduplicating through the clearing flag,
    /// and count the ones that feed the active task
    fn mark_positions(&mut self, positions: &[Position], plan: &mut ClearPlan) {
        let task_shape = self.tasks.task().shape;
        for &pos in positions {
            let Some(tile) = self.grid.get(pos).flatten() else {
                continue;
            };
            if tile.clearing {
                continue;
            }
            self.grid.mark_clearing(pos);
            plan.cleared.push(pos);
            if tile.shape == task_shape && tile.bonus.is_none() {
                plan.collected += 1;
            }
        }
    }

    /// Score the plan and fold it into task progress
    fn finish_plan(&mut self, plan: &mut ClearPlan) {
        plan.points = plan.cleared.len() as u32 * POINTS_PER_TILE;
        self.tasks.accrue_points(plan.points);
        self.tasks.record_collected(plan.collected);
    }

    /// Second mutation point of a cascade iteration
    ///
    /// Commit clears, drop every column, refill, validate, then place the
    /// plan's pending bonus tiles so they survive the pass that created
    /// them.
    pub fn settle(&mut self, plan: &ClearPlan) -> Result<SettleReport, BoardError> {
        let cleared = self.grid.commit_clears();
        let moves = self.grid.drop_tiles();
        let refilled = self.grid.refill(&mut self.rng);
        self.grid.validate()?;

        for placement in &plan.bonuses {
            self.grid.place_bonus(placement.pos, placement.kind)?;
        }

        Ok(SettleReport {
            cleared,
            moves,
            refilled,
            bonuses_placed: plan.bonuses.clone(),
        })
    }

    /// Reroll matched cells in place until the board is quiescent
    ///
    /// Used at creation and on every board reset: matched cells get a fresh
    /// shape (and lose any bonus) instead of being cleared, so no points are
    /// awarded and no moves are consumed. Exceeding the iteration bound is a
    /// fatal structural failure.
    pub fn resolve_initial_matches(&mut self) -> Result<u32, BoardError> {
        for iteration in 0..MAX_CASCADE_ITERATIONS {
            let Some(runs) = matching::scan(&self.grid) else {
                self.grid.validate()?;
                return Ok(iteration);
            };
            for run in &runs {
                for &pos in &run.positions {
                    if let Some(tile) = self.grid.get_mut(pos) {
                        tile.shape = self.rng.draw();
                        tile.bonus = None;
                    }
                }
            }
            self.grid.validate()?;
        }
        warn!(
            "initial-match resolution did not converge in {} iterations",
            MAX_CASCADE_ITERATIONS
        );
        Err(BoardError::CascadeOverflow {
            iterations: MAX_CASCADE_ITERATIONS,
        })
    }

    /// Refill the whole board and bring it back to a quiescent state
    pub fn reset_board(&mut self) -> Result<(), BoardError> {
        self.grid.fill(&mut self.rng);
        self.resolve_initial_matches()?;
        debug!("board reset");
        Ok(())
    }

    // --- task flow ---------------------------------------------------------

    /// Consume one move from the active task's budget
    pub fn spend_move(&mut self) {
        self.tasks.spend_move();
    }

    /// Refund the move of a swap that produced no match
    pub fn refund_move(&mut self) {
        self.tasks.refund_move();
    }

    /// Completion check; a no-op while a transition is already pending
    pub fn check_task(&self) -> TaskOutcome {
        if self.phase == SessionPhase::TaskTransitioning {
            return TaskOutcome::None;
        }
        self.tasks.check()
    }

    /// Bank the accrued task score into the cumulative score
    ///
    /// Runs before the transition delay on success, so observers see the
    /// banked total during the notification. Returns the banked amount.
    pub fn bank_task_score(&mut self) -> u32 {
        let banked = self.tasks.take_task_score();
        self.score += banked;
        info!(
            "task {} completed: banked {} points (total {})",
            self.tasks.index() + 1,
            banked,
            self.score
        );
        banked
    }

    /// Throw away the accrued task score after a failure
    ///
    /// Returns the discarded amount.
    pub fn discard_task_score(&mut self) -> u32 {
        let discarded = self.tasks.take_task_score();
        info!(
            "task {} failed: discarded {} points",
            self.tasks.index() + 1,
            discarded
        );
        discarded
    }

    /// Load the next task and reset the board (success path)
    pub fn advance_task(&mut self) -> Result<(), BoardError> {
        self.tasks.advance();
        self.tasks.load(&mut self.rng);
        self.reset_board()
    }

    /// Reload the same task and reset the board (failure path)
    pub fn retry_task(&mut self) -> Result<(), BoardError> {
        self.tasks.load(&mut self.rng);
        self.reset_board()
    }
}
