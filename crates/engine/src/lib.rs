//! Async move engine for the board simulation
//!
//! The core crate is fully synchronous; this crate owns the asynchronous
//! side: it sequences the core's mutation points around pacing suspensions
//! and reports what happened as a serializable event stream.
//!
//! "Concurrency" here is purely the ordering of suspension points on one
//! logical thread - there is no parallelism and no cancellation. Once a
//! move begins it runs to its cascade fixed point; player input that
//! arrives meanwhile is rejected (`EngineError::Busy`), never queued.
//!
//! # Entry points
//!
//! - [`play_swap`]: a swap of two adjacent cells, covering the plain swap,
//!   the no-match swap-back (with move refund), and the star activation
//! - [`activate_line_bonus`]: an arrow tap clearing its row or column
//! - [`resolve_cascade`]: the clear/drop/refill fixed-point loop
//! - [`run_task_check`]: the task completion check and transition
//!
//! # Example
//!
//! ```no_run
//! use trimatch_core::session::{GameSession, SessionConfig};
//! use trimatch_engine::{play_swap, Pacing};
//! use trimatch_types::Position;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = GameSession::new(SessionConfig::default())?;
//! let outcome = play_swap(
//!     &mut session,
//!     Position::new(2, 2),
//!     Position::new(2, 3),
//!     &Pacing::default(),
//! )
//! .await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod driver;
pub mod events;

// Re-export the public surface
pub use config::Pacing;
pub use driver::{
    activate_line_bonus, play_swap, resolve_cascade, run_task_check, CascadeResult, EngineError,
    MoveOutcome,
};
pub use events::{CellRef, DropRef, SessionEvent};
