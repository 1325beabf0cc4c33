//! Headless autoplay runner (default binary).
//!
//! Drives a full session through the async engine with zero pacing: random
//! adjacent swaps, arrow taps whenever a bonus is on the board, task
//! transitions included. A seed fully determines the run, which makes this
//! a quick smoke test of the whole pipeline.
//!
//! Configuration via environment variables:
//! - `TRIMATCH_SEED`: session seed (default 1)
//! - `TRIMATCH_MOVES`: number of moves to attempt (default 60)

use anyhow::Result;

use trimatch::core::session::{GameSession, SessionConfig};
use trimatch::core::SimpleRng;
use trimatch::engine::{activate_line_bonus, play_swap, EngineError, MoveOutcome, Pacing};
use trimatch::types::{Position, TaskOutcome};

fn env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// First arrow bonus currently on the board, if any
fn find_arrow(session: &GameSession) -> Option<Position> {
    let grid = session.grid();
    for row in 0..grid.height() {
        for col in 0..grid.width() {
            let pos = Position::new(row, col);
            if let Some(Some(tile)) = grid.get(pos) {
                if tile.bonus.map(|kind| kind.is_arrow()).unwrap_or(false) {
                    return Some(pos);
                }
            }
        }
    }
    None
}

#[tokio::main]
async fn main() -> Result<()> {
    let seed = env_u32("TRIMATCH_SEED", 1);
    let move_budget = env_u32("TRIMATCH_MOVES", 60);

    let mut session = GameSession::new(SessionConfig {
        seed,
        ..SessionConfig::default()
    })?;
    let pacing = Pacing::zero();
    // Separate stream for move selection so it never disturbs board rolls.
    let mut picker = SimpleRng::new(seed ^ 0x5bd1_e995);

    let width = session.grid().width();
    let height = session.grid().height();

    let mut swaps_resolved = 0u32;
    let mut swaps_reverted = 0u32;
    let mut arrows_fired = 0u32;
    let mut points = 0u32;
    let mut tasks_completed = 0u32;
    let mut tasks_failed = 0u32;

    for _ in 0..move_budget {
        // Prefer firing an arrow when one is available.
        let outcome = if let Some(pos) = find_arrow(&session) {
            arrows_fired += 1;
            activate_line_bonus(&mut session, pos, &pacing).await
        } else {
            let row = picker.next_range(height as u32) as usize;
            let col = picker.next_range(width as u32) as usize;
            let a = Position::new(row, col);
            let b = if picker.next_range(2) == 0 {
                Position::new(row, (col + 1) % width)
            } else {
                Position::new((row + 1) % height, col)
            };
            match play_swap(&mut session, a, b, &pacing).await {
                Err(EngineError::NotAdjacent) => continue, // wrapped picks
                other => other,
            }
        };

        match outcome {
            Ok(MoveOutcome::SwappedBack { .. }) => swaps_reverted += 1,
            Ok(MoveOutcome::Resolved { cascade, task, .. }) => {
                swaps_resolved += 1;
                points += cascade.points_awarded;
                match task {
                    TaskOutcome::Success => tasks_completed += 1,
                    TaskOutcome::Failure => tasks_failed += 1,
                    TaskOutcome::None => {}
                }
            }
            Err(err) => return Err(err.into()),
        }
    }

    println!("seed {seed}: {move_budget} moves attempted");
    println!("  resolved {swaps_resolved}, reverted {swaps_reverted}, arrows fired {arrows_fired}");
    println!("  cascade points {points}, banked score {}", session.score());
    println!(
        "  tasks completed {tasks_completed}, failed {tasks_failed}, now at task {}",
        session.task_index() + 1
    );

    Ok(())
}
