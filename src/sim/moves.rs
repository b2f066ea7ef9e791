//! Move resolver for the three grapple attacks
//!
//! Validation, bonus stacking, counter rolls, and the Scissors knock-down
//! rule. Callers are expected to pre-check with [`validate_move`], but an
//! already-invalid request is a no-op, never a panic.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::*;

use super::state::{Fighter, FighterId, FighterState, MatchState, MoveKind};

/// Fixed tuning for one move kind
#[derive(Debug, Clone, Copy)]
pub struct MoveSpec {
    pub base_points: i64,
    pub min_balance: f32,
    pub stamina_cost: f32,
    /// Seconds the attacker is locked in `ExecutingMove`
    pub duration: f32,
    /// Stun inflicted on the defender on a clean hit
    pub stun: f32,
    /// Attacker lockout when the move is countered; longer for riskier moves
    pub counter_recovery: f32,
    /// Balance drained from the defender per second while the move resolves
    /// (Scissors only)
    pub balance_drain: f32,
}

impl MoveKind {
    pub const fn spec(self) -> MoveSpec {
        match self {
            MoveKind::Pancake => MoveSpec {
                base_points: 200,
                min_balance: 30.0,
                stamina_cost: 25.0,
                duration: 0.6,
                stun: 1.0,
                counter_recovery: 0.8,
                balance_drain: 0.0,
            },
            MoveKind::Scissors => MoveSpec {
                base_points: 150,
                min_balance: 20.0,
                stamina_cost: 20.0,
                duration: 0.8,
                stun: 0.8,
                counter_recovery: 1.0,
                balance_drain: 40.0,
            },
            MoveKind::Guillotine => MoveSpec {
                base_points: 250,
                min_balance: 50.0,
                stamina_cost: 40.0,
                duration: 1.0,
                stun: 1.5,
                counter_recovery: 1.5,
                balance_drain: 0.0,
            },
        }
    }
}

/// Named rejection reasons. An invalid move costs nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    NotGrappling,
    OffBeam,
    OutOfRange,
    InsufficientBalance,
    InsufficientStamina,
    DefenderFalling,
}

impl MoveError {
    pub fn reason(self) -> &'static str {
        match self {
            MoveError::NotGrappling => "must be grappling",
            MoveError::OffBeam => "off the beam",
            MoveError::OutOfRange => "out of range",
            MoveError::InsufficientBalance => "insufficient balance",
            MoveError::InsufficientStamina => "insufficient stamina",
            MoveError::DefenderFalling => "defender is falling",
        }
    }
}

/// What a resolved move did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// Clean hit: points awarded, defender stunned
    Hit { points: i64, stun: f32 },
    /// Scissors whose drain will drop the defender: half base points, no
    /// stun; the per-tick drain drives the fall
    Knockdown { points: i64 },
    /// Defender countered: no points, attacker locked out
    Countered { recovery: f32 },
}

/// Check every precondition for `attacker` executing `kind` right now.
pub fn validate_move(
    state: &MatchState,
    attacker: FighterId,
    kind: MoveKind,
) -> Result<(), MoveError> {
    let spec = kind.spec();
    let att = state.fighter(attacker);
    let def = state.fighter(attacker.other());

    if att.state != FighterState::GrappleEngaged {
        return Err(MoveError::NotGrappling);
    }
    if !att.on_beam() {
        return Err(MoveError::OffBeam);
    }
    if !state.in_grapple_range() {
        return Err(MoveError::OutOfRange);
    }
    if att.balance < spec.min_balance {
        return Err(MoveError::InsufficientBalance);
    }
    if att.stamina < spec.stamina_cost {
        return Err(MoveError::InsufficientStamina);
    }
    if matches!(def.state, FighterState::Falling { .. }) {
        return Err(MoveError::DefenderFalling);
    }
    Ok(())
}

/// Points for a clean hit: base times one-plus the sum of applicable bonus
/// rates, rounded once. Uses the attacker's state at execution time.
pub fn score_points(kind: MoveKind, attacker: &Fighter, now: f32) -> i64 {
    let spec = kind.spec();
    let mut rate = 0.0;
    if attacker.balance >= HIGH_BALANCE_THRESHOLD {
        rate += HIGH_BALANCE_BONUS;
    }
    if attacker.in_edge_zone() {
        rate += EDGE_ZONE_BONUS;
    }
    if combo_window_open(attacker, now) {
        rate += (attacker.combo_count as f32 * COMBO_BONUS_PER_STEP).min(COMBO_BONUS_CAP);
    }
    (spec.base_points as f32 * (1.0 + rate)).round() as i64
}

fn combo_window_open(attacker: &Fighter, now: f32) -> bool {
    attacker
        .last_move_at
        .is_some_and(|t| now - t <= COMBO_WINDOW)
}

/// Validate and execute a grapple attack. Stamina is only deducted once
/// validation passes. Resolving a move (either way) consumes the grapple.
pub fn resolve_move(
    state: &mut MatchState,
    rng: &mut Pcg32,
    attacker: FighterId,
    kind: MoveKind,
) -> Result<MoveOutcome, MoveError> {
    validate_move(state, attacker, kind)?;

    let spec = kind.spec();
    let now = state.elapsed;
    state.grapple_initiator = None;

    let (att, def) = state.pair_mut(attacker);
    att.add_stamina(-spec.stamina_cost);
    att.state = FighterState::ExecutingMove {
        kind,
        timer: spec.duration,
    };

    // Counter roll only happens against an active defender
    if def.is_defending && rng.random::<f32>() < COUNTER_CHANCE {
        att.state = FighterState::Recovering {
            timer: spec.counter_recovery,
        };
        if def.state == FighterState::GrappleEngaged {
            def.state = FighterState::Idle;
        }
        log::debug!("{} countered by {}", kind.name(), def.name);
        return Ok(MoveOutcome::Countered {
            recovery: spec.counter_recovery,
        });
    }

    // Scissors that would drain the defender to the mat grants no stun and
    // only half the base points; the drain itself runs per tick
    if kind == MoveKind::Scissors && def.balance - spec.balance_drain * spec.duration <= 0.0 {
        let points = (spec.base_points as f32 * 0.5).round() as i64;
        if def.state == FighterState::GrappleEngaged {
            def.state = FighterState::Idle;
        }
        award(att, points, now);
        return Ok(MoveOutcome::Knockdown { points });
    }

    let points = score_points(kind, att, now);
    def.state = FighterState::Stunned { timer: spec.stun };
    def.is_defending = false;
    award(att, points, now);
    log::debug!("{} lands {} for {}", att.name, kind.name(), points);
    Ok(MoveOutcome::Hit {
        points,
        stun: spec.stun,
    })
}

/// Credit a successful move: score, combo bookkeeping, last-move stamp.
/// A lapsed combo window resets the counter before it grows again.
fn award(attacker: &mut Fighter, points: i64, now: f32) {
    if !combo_window_open(attacker, now) {
        attacker.combo_count = 0;
    }
    attacker.score += points;
    attacker.combo_count += 1;
    attacker.last_move_at = Some(now);
}
