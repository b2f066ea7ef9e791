//! Deterministic match simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, threaded explicitly (no ambient randomness)
//! - No rendering, audio, or platform dependencies
//!
//! The orchestrator in `tick` folds one `TickInput` plus the AI's current
//! decision into the previous `MatchState` once per fixed step. Everything
//! else observes the resulting snapshot.

pub mod ai;
pub mod fighter;
pub mod moves;
pub mod physics;
pub mod state;
pub mod tick;

pub use ai::AiController;
pub use moves::{MoveError, MoveOutcome, validate_move};
pub use physics::JumpError;
pub use state::{
    Callout, Facing, Fighter, FighterId, FighterState, MatchResult, MatchState, MoveKind, Scene,
    WinReason,
};
pub use tick::{TickContext, TickInput, tick};
