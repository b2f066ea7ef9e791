//! AI decision policy
//!
//! Produces the same `TickInput` vocabulary a human player uses, so the
//! orchestrator applies both sides identically. The controller is an
//! explicit context object threaded into the tick - its state is just the
//! cached decision and when it was made. Decisions recompute on a fixed
//! interval and persist between recomputations; invalid intents are simply
//! rejected downstream by the same validators that gate the player.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::*;

use super::state::{FighterState, MatchState, MoveKind};
use super::tick::TickInput;

/// AI controller state: last decision plus its timestamp
#[derive(Debug, Clone, Default)]
pub struct AiController {
    decision: TickInput,
    last_decision_at: Option<f32>,
}

impl AiController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called every tick; only recomputes once per decision interval.
    /// A cached timestamp ahead of the clock means the match was restarted
    /// and the elapsed counter rewound, so the decision is stale.
    pub fn update(&mut self, state: &MatchState, rng: &mut Pcg32) -> TickInput {
        let due = match self.last_decision_at {
            Some(t) => state.elapsed < t || state.elapsed - t >= AI_DECISION_INTERVAL,
            None => true,
        };
        if due {
            self.decision = decide(state, rng);
            self.last_decision_at = Some(state.elapsed);
        }
        self.decision.clone()
    }
}

fn affordable(me: &super::state::Fighter, kind: MoveKind) -> bool {
    let spec = kind.spec();
    me.stamina >= spec.stamina_cost && me.balance >= spec.min_balance
}

/// Strict priority order; the first matching rule wins.
fn decide(state: &MatchState, rng: &mut Pcg32) -> TickInput {
    let me = &state.opponent;
    let target = &state.player;
    let mut input = TickInput::default();

    let target_stunned = matches!(target.state, FighterState::Stunned { .. });

    // 1. Pin a stunned player in range
    if target_stunned && state.in_grapple_range() && me.balance >= PIN_MIN_BALANCE {
        input.pin = true;
        return input;
    }

    // 2. Pick a move while grappling
    if me.state == FighterState::GrappleEngaged {
        if me.stamina >= AI_GUILLOTINE_STAMINA
            && target_stunned
            && affordable(me, MoveKind::Guillotine)
        {
            input.guillotine = true;
        } else if target.balance < AI_SCISSORS_BALANCE && affordable(me, MoveKind::Scissors) {
            input.scissors = true;
        } else if affordable(me, MoveKind::Pancake) {
            input.pancake = true;
        } else if affordable(me, MoveKind::Scissors) {
            input.scissors = true;
        }
        return input;
    }

    // 3. Defend against an incoming move
    if matches!(target.state, FighterState::ExecutingMove { .. }) {
        input.defend = true;
        return input;
    }

    // 4. Jump rolls, only from the ground in an actionable state
    if me.grounded() && me.state.is_actionable() {
        let dist = state.fighter_distance();
        if target_stunned && dist <= AI_STOMP_RANGE && rng.random::<f32>() < AI_STOMP_CHANCE {
            // Hop onto the stunned player
            input.jump = true;
            set_direction(&mut input, target.pos.x - me.pos.x);
            return input;
        }
        if target.airborne() && dist <= AI_EVADE_RANGE && rng.random::<f32>() < AI_EVADE_CHANCE {
            input.jump = true;
            return input;
        }
        if rng.random::<f32>() < AI_RANDOM_JUMP_CHANCE {
            input.jump = true;
            return input;
        }
    }

    // 5. Initiate a grapple when close and both grounded
    if state.in_grapple_range()
        && matches!(me.state, FighterState::Idle | FighterState::Moving)
        && target.state.is_actionable()
    {
        input.grapple = true;
        return input;
    }

    // 6. Walk toward the player, or back to center when wobbling near an edge
    let near_edge = me.pos.x.abs() > AI_RETREAT_EDGE_FRACTION * BEAM_HALF;
    if me.balance < AI_RETREAT_BALANCE && near_edge {
        set_direction(&mut input, -me.pos.x);
    } else {
        set_direction(&mut input, target.pos.x - me.pos.x);
    }
    input
}

fn set_direction(input: &mut TickInput, dx: f32) {
    if dx > 0.0 {
        input.right = true;
    } else if dx < 0.0 {
        input.left = true;
    }
}
