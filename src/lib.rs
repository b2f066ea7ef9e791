//! Beam Brawl - two-fighter arcade wrestling on a balance beam
//!
//! Core modules:
//! - `sim`: Deterministic match simulation (fighter state machine, move
//!   resolution, jump physics, pin logic, AI policy)
//!
//! Rendering, audio, and input capture are thin shells that live outside
//! this crate; they observe `sim::MatchState` snapshots and feed
//! `sim::TickInput` back in.

pub mod sim;

pub use sim::{MatchState, TickContext, TickInput, tick};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Beam dimensions (beam is centered at x = 0)
    pub const BEAM_LENGTH: f32 = 600.0;
    pub const BEAM_HALF: f32 = BEAM_LENGTH / 2.0;
    /// Outer fraction of the beam (each side) that counts as the edge zone
    pub const EDGE_ZONE_FRACTION: f32 = 0.10;

    /// Fighter defaults
    pub const FIGHTER_WIDTH: f32 = 40.0;
    pub const START_OFFSET: f32 = 100.0;
    pub const MAX_BALANCE: f32 = 100.0;
    pub const MAX_STAMINA: f32 = 100.0;

    /// Ground movement speed (px/s); airborne fighters steer at half rate
    pub const MOVE_SPEED: f32 = 140.0;
    pub const AIR_CONTROL_FACTOR: f32 = 0.5;

    /// Regeneration and drain rates (per second)
    pub const IDLE_BALANCE_REGEN: f32 = 8.0;
    pub const IDLE_STAMINA_REGEN: f32 = 10.0;
    pub const MOVING_STAMINA_REGEN: f32 = 5.0;
    pub const MOVE_STAMINA_DRAIN: f32 = 6.0;
    /// Below this stamina, movement also bleeds balance
    pub const LOW_STAMINA_THRESHOLD: f32 = 20.0;
    pub const LOW_STAMINA_BALANCE_DRAIN: f32 = 4.0;
    /// Continuous balance cost to both fighters while grappling
    pub const GRAPPLE_BALANCE_DRAIN: f32 = 4.0;

    /// Grapple range (center-to-center, both fighters grounded)
    pub const GRAPPLE_RANGE: f32 = 60.0;

    /// Jump physics (y is 0 on the beam, negative while airborne)
    pub const JUMP_STAMINA_COST: f32 = 15.0;
    pub const JUMP_VELOCITY: f32 = -300.0;
    pub const GRAVITY: f32 = 900.0;
    pub const LANDING_BALANCE_COST: f32 = 5.0;

    /// Stomp (landing on a grounded opponent)
    pub const STOMP_RANGE: f32 = FIGHTER_WIDTH;
    pub const STOMP_POINTS: i64 = 150;
    pub const STOMP_BALANCE_DAMAGE: f32 = 30.0;
    pub const STOMP_STUN: f32 = 1.2;

    /// Jump-over (clearing the opponent while airborne)
    pub const JUMP_OVER_MIN_HEIGHT: f32 = 30.0;
    pub const JUMP_OVER_POINTS: i64 = 100;

    /// Scoring bonuses (rates, summed then applied once)
    pub const HIGH_BALANCE_THRESHOLD: f32 = 80.0;
    pub const HIGH_BALANCE_BONUS: f32 = 0.20;
    pub const EDGE_ZONE_BONUS: f32 = 0.15;
    pub const COMBO_BONUS_PER_STEP: f32 = 0.10;
    pub const COMBO_BONUS_CAP: f32 = 0.30;
    pub const COMBO_WINDOW: f32 = 4.0;

    /// Counter chance when the defender is defending
    pub const COUNTER_CHANCE: f32 = 0.40;

    /// Match flow
    pub const MATCH_DURATION: f32 = 60.0;
    pub const COUNTDOWN_DURATION: f32 = 3.0;
    pub const PIN_DURATION: f32 = 3.0;
    pub const PIN_MIN_BALANCE: f32 = 30.0;

    /// Fall handling
    pub const FALL_RESET_TIME: f32 = 1.5;
    pub const FALL_RESET_BALANCE: f32 = 70.0;
    pub const FALL_STAMINA_REFUND: f32 = 30.0;
    pub const FALL_SCORE_PENALTY: i64 = -100;

    /// Transient callout display time
    pub const CALLOUT_DURATION: f32 = 2.0;

    /// AI decision cadence and roll probabilities
    pub const AI_DECISION_INTERVAL: f32 = 0.4;
    pub const AI_STOMP_CHANCE: f32 = 0.30;
    pub const AI_STOMP_RANGE: f32 = 120.0;
    pub const AI_EVADE_CHANCE: f32 = 0.15;
    pub const AI_EVADE_RANGE: f32 = 100.0;
    pub const AI_RANDOM_JUMP_CHANCE: f32 = 0.02;
    pub const AI_GUILLOTINE_STAMINA: f32 = 60.0;
    pub const AI_SCISSORS_BALANCE: f32 = 40.0;
    pub const AI_RETREAT_BALANCE: f32 = 30.0;
    pub const AI_RETREAT_EDGE_FRACTION: f32 = 0.7;
}

/// Furthest a grounded fighter's center can be from beam center
#[inline]
pub fn beam_bound() -> f32 {
    consts::BEAM_HALF - consts::FIGHTER_WIDTH / 2.0
}

/// True if `x` is inside the beam's edge zone (outer 10% on either side)
#[inline]
pub fn in_edge_zone(x: f32) -> bool {
    x.abs() >= consts::BEAM_HALF - consts::EDGE_ZONE_FRACTION * consts::BEAM_LENGTH
}

/// True if a grounded fighter centered at `x` is still on the beam
#[inline]
pub fn on_beam(x: f32) -> bool {
    x.abs() <= beam_bound()
}
