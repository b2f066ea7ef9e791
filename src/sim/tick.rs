//! Fixed timestep match orchestrator
//!
//! One call per fixed step, strictly ordered: countdown, match clock, state
//! timers, jump physics, inputs (player then AI), regeneration and drains,
//! facing, fall checks, pin progress, callout expiry. A timeout or completed
//! pin short-circuits the rest of the tick; nothing after it runs.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;

use super::ai::AiController;
use super::fighter::TimerExpiry;
use super::moves::{self, MoveOutcome};
use super::physics;
use super::state::{
    FighterId, FighterState, MatchResult, MatchState, MoveKind, Scene, WinReason,
};

/// Input intents for a single tick, sampled once by the input layer.
/// Edge detection for one-shot actions is the input layer's job; the core
/// treats every flag as "requested this tick" and rejects invalid requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub grapple: bool,
    pub pancake: bool,
    pub scissors: bool,
    pub guillotine: bool,
    pub pin: bool,
    pub defend: bool,
    /// Scene controls
    pub start: bool,
    pub pause: bool,
    pub restart: bool,
    pub help: bool,
}

/// Everything the tick needs besides the state itself: the seeded RNG and
/// the AI controller, threaded explicitly instead of living as globals.
#[derive(Debug, Clone)]
pub struct TickContext {
    pub rng: Pcg32,
    pub ai: AiController,
}

impl TickContext {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            ai: AiController::new(),
        }
    }
}

/// Named rejection reasons for a grapple request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrappleError {
    Airborne,
    NotActionable,
    OutOfRange,
    DefenderUnavailable,
}

impl GrappleError {
    pub fn reason(self) -> &'static str {
        match self {
            GrappleError::Airborne => "must be grounded",
            GrappleError::NotActionable => "cannot grapple right now",
            GrappleError::OutOfRange => "out of range",
            GrappleError::DefenderUnavailable => "defender unavailable",
        }
    }
}

/// Named rejection reasons for a pin attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinError {
    BadAttackerState,
    InsufficientBalance,
    OffBeam,
    OutOfRange,
    DefenderNotStunned,
    DefenderOffBeam,
}

impl PinError {
    pub fn reason(self) -> &'static str {
        match self {
            PinError::BadAttackerState => "cannot pin right now",
            PinError::InsufficientBalance => "insufficient balance",
            PinError::OffBeam => "off the beam",
            PinError::OutOfRange => "out of range",
            PinError::DefenderNotStunned => "defender is not stunned",
            PinError::DefenderOffBeam => "defender is off the beam",
        }
    }
}

/// Both fighters consent into the mutual hold; both must be grounded,
/// idle-or-moving, and within grapple range.
pub fn attempt_grapple(state: &mut MatchState, initiator: FighterId) -> Result<(), GrappleError> {
    let init = state.fighter(initiator);
    let def = state.fighter(initiator.other());

    if !init.grounded() {
        return Err(GrappleError::Airborne);
    }
    if !matches!(init.state, FighterState::Idle | FighterState::Moving) {
        return Err(GrappleError::NotActionable);
    }
    if !state.in_grapple_range() {
        return Err(GrappleError::OutOfRange);
    }
    if !matches!(def.state, FighterState::Idle | FighterState::Moving) {
        return Err(GrappleError::DefenderUnavailable);
    }

    let (a, b) = state.pair_mut(initiator);
    a.state = FighterState::GrappleEngaged;
    b.state = FighterState::GrappleEngaged;
    state.grapple_initiator = Some(initiator);
    state.show_callout("LOCK UP!", None);
    Ok(())
}

/// Start a pin attempt on a stunned defender. The defender carries their
/// remaining stun time into `Pinned` so an expiring stun breaks the pin.
pub fn attempt_pin(state: &mut MatchState, attacker: FighterId) -> Result<(), PinError> {
    let att = state.fighter(attacker);
    let def = state.fighter(attacker.other());

    if !matches!(
        att.state,
        FighterState::Idle | FighterState::GrappleEngaged
    ) {
        return Err(PinError::BadAttackerState);
    }
    if att.balance < PIN_MIN_BALANCE {
        return Err(PinError::InsufficientBalance);
    }
    if !att.on_beam() {
        return Err(PinError::OffBeam);
    }
    let FighterState::Stunned { timer } = def.state else {
        return Err(PinError::DefenderNotStunned);
    };
    if !def.on_beam() {
        return Err(PinError::DefenderOffBeam);
    }
    if !state.in_grapple_range() {
        return Err(PinError::OutOfRange);
    }

    state.grapple_initiator = None;
    let (att, def) = state.pair_mut(attacker);
    att.state = FighterState::Pinning;
    def.state = FighterState::Pinned { stun_timer: timer };
    state.pinning_fighter = Some(attacker);
    state.pin_progress = 0.0;
    state.show_callout("PIN ATTEMPT!", Some("kick out!"));
    log::info!("{} attempts a pin", state.fighter(attacker).name);
    Ok(())
}

/// Terminate the match. `winner == None` is a draw.
pub fn end_match(state: &mut MatchState, winner: Option<FighterId>, reason: WinReason) {
    state.result = Some(MatchResult {
        winner,
        reason,
        player_score: state.player.score,
        opponent_score: state.opponent.score,
        duration: MATCH_DURATION - state.match_timer,
    });
    state.scene = Scene::GameOver;
    let headline = match winner {
        Some(id) => format!("{} WINS!", state.fighter(id).name.to_uppercase()),
        None => "DRAW!".to_string(),
    };
    state.show_callout(&headline, None);
    log::info!(
        "match over: {:?} by {:?} ({} - {})",
        winner,
        reason,
        state.player.score,
        state.opponent.score
    );
}

fn end_by_timeout(state: &mut MatchState) {
    let winner = match state.player.score.cmp(&state.opponent.score) {
        std::cmp::Ordering::Greater => Some(FighterId::Player),
        std::cmp::Ordering::Less => Some(FighterId::Opponent),
        std::cmp::Ordering::Equal => None,
    };
    end_match(state, winner, WinReason::Timeout);
}

/// Clear the pin linkage. The defender returns to `Stunned` with their
/// remaining time (or Idle if the stun is what broke the pin); the attacker
/// returns to Idle. No partial pin credit is retained.
fn break_pin(state: &mut MatchState, defender_still_stunned: bool) {
    let Some(attacker) = state.pinning_fighter.take() else {
        return;
    };
    state.pin_progress = 0.0;
    let (att, def) = state.pair_mut(attacker);
    if att.state == FighterState::Pinning {
        att.state = FighterState::Idle;
    }
    if let FighterState::Pinned { stun_timer } = def.state {
        def.state = if defender_still_stunned && stun_timer > 0.0 {
            FighterState::Stunned { timer: stun_timer }
        } else {
            FighterState::Idle
        };
    }
}

/// Knock a fighter off the beam: irreversible until the reset timer forces
/// them back on. Any grapple or pin involving them dissolves immediately.
fn start_fall(state: &mut MatchState, id: FighterId) {
    if state.is_grappling() {
        state.grapple_initiator = None;
        let other = state.fighter_mut(id.other());
        if other.state == FighterState::GrappleEngaged {
            other.state = FighterState::Idle;
        }
    }
    if state.pinning_fighter.is_some() {
        break_pin(state, true);
    }
    let f = state.fighter_mut(id);
    f.state = FighterState::Falling {
        timer: FALL_RESET_TIME,
    };
    f.is_defending = false;
    let name = f.name.clone();
    state.show_callout(&format!("{} FALLS!", name.to_uppercase()), None);
    log::info!("{} falls off the beam", name);
}

/// Put a fallen fighter back on the beam at their mirrored start offset,
/// partially recovered and penalized on score. The other fighter is forced
/// back to Idle so the engagement restarts clean.
fn fall_reset(state: &mut MatchState, id: FighterId) {
    state.grapple_initiator = None;
    state.pinning_fighter = None;
    state.pin_progress = 0.0;

    let (f, other) = state.pair_mut(id);
    f.pos.x = f.start_x();
    f.pos.y = 0.0;
    f.vel_y = 0.0;
    f.state = FighterState::Idle;
    f.balance = FALL_RESET_BALANCE;
    f.add_stamina(FALL_STAMINA_REFUND);
    f.score += FALL_SCORE_PENALTY;
    f.is_defending = false;
    f.has_jumped_over = false;

    if !matches!(other.state, FighterState::Falling { .. }) {
        other.state = FighterState::Idle;
    }
    log::info!("{} back on the beam", f.name);
}

fn pin_preconditions_hold(state: &MatchState, attacker: FighterId) -> bool {
    let att = state.fighter(attacker);
    let def = state.fighter(attacker.other());
    att.state == FighterState::Pinning
        && att.balance >= PIN_MIN_BALANCE
        && att.on_beam()
        && matches!(def.state, FighterState::Pinned { .. })
        && def.on_beam()
        && state.fighter_distance() <= GRAPPLE_RANGE
}

/// Apply one side's sampled intents as discrete, independently-validated
/// actions. Rejected actions have no effect at all.
fn apply_fighter_input(
    state: &mut MatchState,
    rng: &mut Pcg32,
    id: FighterId,
    input: &TickInput,
    dt: f32,
) {
    state.fighter_mut(id).is_defending = input.defend;

    let dir = (input.right as i8 - input.left as i8) as f32;
    if state.fighter(id).airborne() {
        if physics::apply_air_control(state, id, dir, dt) {
            state.show_callout("JUMP OVER!", Some(&format!("+{JUMP_OVER_POINTS}")));
        }
    } else {
        state.fighter_mut(id).move_ground(dir, dt);
    }

    if input.jump {
        if let Err(e) = physics::start_jump(state, id) {
            log::trace!("{:?} jump rejected: {}", id, e.reason());
        }
    }
    if input.grapple {
        if let Err(e) = attempt_grapple(state, id) {
            log::trace!("{:?} grapple rejected: {}", id, e.reason());
        }
    }

    let requested = [
        (input.pancake, MoveKind::Pancake),
        (input.scissors, MoveKind::Scissors),
        (input.guillotine, MoveKind::Guillotine),
    ];
    for (flag, kind) in requested {
        if !flag {
            continue;
        }
        match moves::resolve_move(state, rng, id, kind) {
            Ok(MoveOutcome::Hit { points, .. }) => {
                let headline = format!("{}!", kind.name().to_uppercase());
                state.show_callout(&headline, Some(&format!("+{points}")));
            }
            Ok(MoveOutcome::Knockdown { points }) => {
                let headline = format!("{}!", kind.name().to_uppercase());
                state.show_callout(&headline, Some(&format!("+{points}")));
            }
            Ok(MoveOutcome::Countered { .. }) => {
                state.show_callout("COUNTERED!", None);
            }
            // No feedback to the player beyond the missing callout
            Err(e) => log::trace!("{:?} {} rejected: {}", id, kind.name(), e.reason()),
        }
    }

    if input.pin {
        if let Err(e) = attempt_pin(state, id) {
            log::trace!("{:?} pin rejected: {}", id, e.reason());
        }
    }
}

const BOTH: [FighterId; 2] = [FighterId::Player, FighterId::Opponent];

/// Advance the match by one fixed timestep.
pub fn tick(state: &mut MatchState, input: &TickInput, ctx: &mut TickContext, dt: f32) {
    // Scene lifecycle and early returns
    match state.scene {
        Scene::Title => {
            if input.help {
                state.scene = Scene::HowToPlay;
            } else if input.start {
                state.reset_match();
            }
            return;
        }
        Scene::HowToPlay => {
            if input.help || input.start {
                state.scene = Scene::Title;
            }
            return;
        }
        Scene::GameOver => {
            if input.restart {
                state.reset_match();
            }
            return;
        }
        Scene::Paused => {
            if input.pause {
                state.scene = Scene::Playing;
            }
            return;
        }
        Scene::Countdown => {
            state.countdown_timer -= dt;
            if state.countdown_timer <= 0.0 {
                state.countdown_timer = 0.0;
                state.scene = Scene::Playing;
                state.show_callout("FIGHT!", None);
                log::info!("match underway");
            }
            return;
        }
        Scene::Playing => {}
    }
    if input.pause {
        state.scene = Scene::Paused;
        return;
    }

    // Sample the AI decision as an immutable snapshot before anything moves
    let TickContext { rng, ai } = ctx;
    let ai_input = ai.update(state, rng);

    // 3. Match clock; timeout short-circuits the whole tick
    state.elapsed += dt;
    state.match_timer -= dt;
    if state.match_timer <= 0.0 {
        state.match_timer = 0.0;
        end_by_timeout(state);
        return;
    }

    // 4. Fighter state timers
    for id in BOTH {
        match state.fighter_mut(id).advance_timer(dt) {
            Some(TimerExpiry::PinnedStun) => break_pin(state, false),
            Some(TimerExpiry::Fall) => fall_reset(state, id),
            _ => {}
        }
    }

    // 5. Jump physics and landing events
    for id in BOTH {
        if let Some(landing) = physics::integrate(state, id, dt) {
            if landing.stomp {
                state.show_callout("STOMP!", Some(&format!("+{STOMP_POINTS}")));
            }
        }
    }

    // 6. Player input, then the AI's decision, as discrete actions
    apply_fighter_input(state, rng, FighterId::Player, input, dt);
    apply_fighter_input(state, rng, FighterId::Opponent, &ai_input, dt);

    // 7. Regeneration, movement upkeep, grapple and Scissors drains.
    // A fighter caught in the Scissors squeeze gets no regen while it lasts,
    // so the knock-down projection made at execution time stays exact.
    for id in BOTH {
        let squeezed = matches!(
            state.fighter(id.other()).state,
            FighterState::ExecutingMove {
                kind: MoveKind::Scissors,
                ..
            }
        );
        let f = state.fighter_mut(id);
        if squeezed {
            f.add_balance(-MoveKind::Scissors.spec().balance_drain * dt);
        } else {
            f.apply_regen(dt);
        }
    }
    if state.is_grappling() {
        state.player.add_balance(-GRAPPLE_BALANCE_DRAIN * dt);
        state.opponent.add_balance(-GRAPPLE_BALANCE_DRAIN * dt);
    }

    // 8. Face each other
    let dx = state.opponent.pos.x - state.player.pos.x;
    state.player.facing = if dx >= 0.0 {
        super::state::Facing::Right
    } else {
        super::state::Facing::Left
    };
    state.opponent.facing = if dx >= 0.0 {
        super::state::Facing::Left
    } else {
        super::state::Facing::Right
    };

    // 9. Fall conditions: balance gone, or off the beam once grounded.
    // An airborne fighter drifting past the end rings out on touchdown.
    for id in BOTH {
        let f = state.fighter(id);
        if !matches!(f.state, FighterState::Falling { .. })
            && (f.balance <= 0.0 || (!f.airborne() && !f.on_beam()))
        {
            start_fall(state, id);
        }
    }

    // 10. Pin progress; completion short-circuits before callout expiry
    if let Some(attacker) = state.pinning_fighter {
        if pin_preconditions_hold(state, attacker) {
            state.pin_progress = (state.pin_progress + dt / PIN_DURATION).min(1.0);
            if state.pin_progress >= 1.0 {
                end_match(state, Some(attacker), WinReason::Pin);
                return;
            }
        } else {
            break_pin(state, true);
        }
    }

    // 11. Expire stale callouts
    if let Some(callout) = &state.callout {
        if state.elapsed - callout.created_at > CALLOUT_DURATION {
            state.callout = None;
        }
    }
}
