//! Core board simulation - pure, deterministic, and testable
//!
//! This crate contains the complete match-3 board simulation: grid state,
//! match detection, bonus decisions, task tracking, and the session that
//! ties them together. It has **zero dependencies** on async runtimes,
//! rendering, or I/O, making it:
//!
//! - **Deterministic**: same seed, same config, same session
//! - **Testable**: every rule is reachable through synchronous calls
//! - **Portable**: usable from a terminal, a GUI shell, or headless drivers
//!
//! # Module Structure
//!
//! - [`grid`]: the board - flat storage, swaps, gravity, refill, validation
//! - [`matching`]: run detection - horizontal, vertical, and L-intersections
//! - [`bonus`]: the pure match-to-bonus decision with its tie-break rules
//! - [`tasks`]: collection goals, the predefined table, random generation
//! - [`session`]: the session object, cascade mutation points, phase machine
//! - [`rng`]: seeded LCG and the uniform shape drawer
//! - [`snapshot`]: whole-state views for observers
//!
//! # Cascade Contract
//!
//! A cascade iteration is two synchronous mutation points:
//!
//! 1. [`GameSession::mark_matches`](session::GameSession::mark_matches) -
//!    decide bonuses, mark clears, accrue score and task progress
//! 2. [`GameSession::settle`](session::GameSession::settle) - commit clears,
//!    drop, refill, validate, place pending bonuses
//!
//! The async engine crate repeats them until a scan finds nothing, which is
//! the quiescent fixed point every externally observable state satisfies.
//!
//! # Example
//!
//! ```
//! use trimatch_core::session::{GameSession, SessionConfig};
//!
//! let session = GameSession::new(SessionConfig::default()).unwrap();
//!
//! // A fresh board is always quiescent.
//! assert_eq!(session.scan_matches(), None);
//! assert_eq!(session.score(), 0);
//! ```

pub mod bonus;
pub mod grid;
pub mod matching;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod tasks;

pub use trimatch_types as types;

// Re-export commonly used types for convenience
pub use bonus::bonus_for_match;
pub use grid::{BoardError, Grid};
pub use matching::scan;
pub use rng::{ShapeRng, SimpleRng};
pub use session::{ClearPlan, GameSession, SessionConfig, SettleReport};
pub use snapshot::{snapshot, SessionSnapshot, TileSnapshot};
pub use tasks::TaskBook;
