//! Trimatch (workspace facade crate).
//!
//! This package keeps the public `trimatch::{core,engine,types}` API stable
//! while the implementation lives in dedicated crates under `crates/`.

pub use trimatch_core as core;
pub use trimatch_engine as engine;
pub use trimatch_types as types;
