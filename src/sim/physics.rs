//! Jump and vertical physics resolver
//!
//! Vertical motion integration, landing, stomp detection, and the jump-over
//! crossing check. y is 0 on the beam and negative while airborne; gravity
//! pulls y back toward 0.

use crate::consts::*;

use super::state::{FighterId, FighterState, MatchState};

/// Named rejection reasons for a jump request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpError {
    NotGrounded,
    NotActionable,
    InsufficientStamina,
}

impl JumpError {
    pub fn reason(self) -> &'static str {
        match self {
            JumpError::NotGrounded => "not grounded",
            JumpError::NotActionable => "cannot jump right now",
            JumpError::InsufficientStamina => "insufficient stamina",
        }
    }
}

/// What happened when a fighter touched down this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landing {
    pub fighter: FighterId,
    /// Landed directly on the grounded opponent
    pub stomp: bool,
}

/// Start a jump: grounded and actionable only, stamina deducted up front.
/// Jumping out of a grapple breaks the hold for both fighters.
pub fn start_jump(state: &mut MatchState, id: FighterId) -> Result<(), JumpError> {
    let f = state.fighter(id);
    if !f.grounded() {
        return Err(JumpError::NotGrounded);
    }
    if !f.state.is_actionable() {
        return Err(JumpError::NotActionable);
    }
    if f.stamina < JUMP_STAMINA_COST {
        return Err(JumpError::InsufficientStamina);
    }

    if f.state == FighterState::GrappleEngaged {
        state.grapple_initiator = None;
        let other = state.fighter_mut(id.other());
        if other.state == FighterState::GrappleEngaged {
            other.state = FighterState::Idle;
        }
    }

    let f = state.fighter_mut(id);
    f.add_stamina(-JUMP_STAMINA_COST);
    f.vel_y = JUMP_VELOCITY;
    f.state = FighterState::Jumping;
    Ok(())
}

/// Integrate one fighter's vertical motion for this tick. Landing snaps y to
/// exactly 0, zeroes velocity, pays the landing balance cost, and checks for
/// a stomp on the opponent. At most one stomp per landing by construction.
pub fn integrate(state: &mut MatchState, id: FighterId, dt: f32) -> Option<Landing> {
    {
        let f = state.fighter(id);
        if f.grounded() && f.vel_y == 0.0 {
            return None;
        }
    }

    let (f, other) = state.pair_mut(id);
    f.vel_y += GRAVITY * dt;
    f.pos.y += f.vel_y * dt;

    if f.pos.y < 0.0 {
        return None;
    }

    // Touchdown
    f.pos.y = 0.0;
    f.vel_y = 0.0;
    f.has_jumped_over = false;
    if f.state == FighterState::Jumping {
        f.state = FighterState::Idle;
    }
    f.add_balance(-LANDING_BALANCE_COST);

    let dx = (f.pos.x - other.pos.x).abs();
    let stomp = dx <= STOMP_RANGE
        && other.grounded()
        && !matches!(other.state, FighterState::Falling { .. });
    if stomp {
        f.score += STOMP_POINTS;
        other.add_balance(-STOMP_BALANCE_DAMAGE);
        other.state = FighterState::Stunned { timer: STOMP_STUN };
        log::debug!("{} stomps {}", f.name, other.name);
    }

    Some(Landing { fighter: id, stomp })
}

/// Reduced-rate horizontal steering while airborne. The jump-over check
/// lives here: crossing the opponent's x while at or above the height
/// threshold credits the bonus once per arc.
pub fn apply_air_control(state: &mut MatchState, id: FighterId, dir: f32, dt: f32) -> bool {
    let (f, other) = state.pair_mut(id);
    if !f.airborne() {
        return false;
    }

    let pre_dx = f.pos.x - other.pos.x;
    if dir != 0.0 {
        f.pos.x += dir.signum() * MOVE_SPEED * AIR_CONTROL_FACTOR * dt;
    }
    let post_dx = f.pos.x - other.pos.x;

    let high_enough = f.pos.y <= -JUMP_OVER_MIN_HEIGHT;
    let crossed = pre_dx != 0.0 && post_dx != 0.0 && pre_dx.signum() != post_dx.signum();
    if high_enough && crossed && !f.has_jumped_over {
        f.has_jumped_over = true;
        f.score += JUMP_OVER_POINTS;
        log::debug!("{} clears {}", f.name, other.name);
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::Scene;

    fn playing_state() -> MatchState {
        let mut state = MatchState::new(5);
        state.scene = Scene::Playing;
        state
    }

    #[test]
    fn test_jump_deducts_stamina_and_launches() {
        let mut state = playing_state();
        start_jump(&mut state, FighterId::Player).unwrap();
        assert_eq!(state.player.state, FighterState::Jumping);
        assert_eq!(state.player.stamina, MAX_STAMINA - JUMP_STAMINA_COST);
        assert_eq!(state.player.vel_y, JUMP_VELOCITY);
    }

    #[test]
    fn test_jump_rejected_without_stamina() {
        let mut state = playing_state();
        state.player.stamina = JUMP_STAMINA_COST - 1.0;
        assert_eq!(
            start_jump(&mut state, FighterId::Player),
            Err(JumpError::InsufficientStamina)
        );
        assert_eq!(state.player.state, FighterState::Idle);
    }

    #[test]
    fn test_jump_rejected_while_airborne() {
        let mut state = playing_state();
        state.player.pos.y = -10.0;
        assert_eq!(
            start_jump(&mut state, FighterId::Player),
            Err(JumpError::NotGrounded)
        );
    }

    #[test]
    fn test_jump_breaks_grapple_for_both() {
        let mut state = playing_state();
        state.player.state = FighterState::GrappleEngaged;
        state.opponent.state = FighterState::GrappleEngaged;
        state.grapple_initiator = Some(FighterId::Opponent);
        start_jump(&mut state, FighterId::Player).unwrap();
        assert!(state.grapple_initiator.is_none());
        assert_eq!(state.opponent.state, FighterState::Idle);
    }

    #[test]
    fn test_full_arc_lands_at_zero_with_balance_cost() {
        let mut state = playing_state();
        state.opponent.pos.x = 200.0; // Out of stomp range
        start_jump(&mut state, FighterId::Player).unwrap();
        let mut landed = None;
        for _ in 0..200 {
            if let Some(l) = integrate(&mut state, FighterId::Player, SIM_DT) {
                landed = Some(l);
                break;
            }
            // Airborne invariant: y stays at or above the beam, never below
            assert!(state.player.pos.y <= 0.0);
        }
        let landing = landed.expect("fighter never landed");
        assert!(!landing.stomp);
        assert_eq!(state.player.pos.y, 0.0);
        assert_eq!(state.player.vel_y, 0.0);
        assert_eq!(state.player.state, FighterState::Idle);
        assert_eq!(state.player.balance, MAX_BALANCE - LANDING_BALANCE_COST);
    }

    #[test]
    fn test_stomp_scores_and_stuns() {
        let mut state = playing_state();
        state.opponent.pos.x = state.player.pos.x + STOMP_RANGE - 1.0;
        // Drop the player from just above the opponent
        state.player.pos.y = -5.0;
        state.player.vel_y = 100.0;
        state.player.state = FighterState::Jumping;

        let mut landing = None;
        for _ in 0..20 {
            if let Some(l) = integrate(&mut state, FighterId::Player, SIM_DT) {
                landing = Some(l);
                break;
            }
        }
        assert!(landing.unwrap().stomp);
        assert_eq!(state.player.score, STOMP_POINTS);
        assert_eq!(
            state.opponent.state,
            FighterState::Stunned { timer: STOMP_STUN }
        );
        assert_eq!(state.opponent.balance, MAX_BALANCE - STOMP_BALANCE_DAMAGE);
    }

    #[test]
    fn test_no_stomp_on_falling_opponent() {
        let mut state = playing_state();
        state.opponent.pos.x = state.player.pos.x;
        state.opponent.state = FighterState::Falling { timer: 1.0 };
        state.player.pos.y = -5.0;
        state.player.vel_y = 100.0;
        state.player.state = FighterState::Jumping;

        let mut landing = None;
        for _ in 0..20 {
            if let Some(l) = integrate(&mut state, FighterId::Player, SIM_DT) {
                landing = Some(l);
                break;
            }
        }
        assert!(!landing.unwrap().stomp);
        assert_eq!(state.player.score, 0);
    }

    #[test]
    fn test_jump_over_credited_once_per_arc() {
        let mut state = playing_state();
        state.player.pos = glam::Vec2::new(-5.0, -50.0);
        state.player.vel_y = 0.0;
        state.player.state = FighterState::Jumping;
        state.opponent.pos.x = 0.0;

        // Steer right across the opponent at height
        let mut credited = false;
        for _ in 0..30 {
            if apply_air_control(&mut state, FighterId::Player, 1.0, SIM_DT) {
                credited = true;
                break;
            }
        }
        assert!(credited);
        assert_eq!(state.player.score, JUMP_OVER_POINTS);
        assert!(state.player.has_jumped_over);

        // Crossing back in the same arc does not re-credit
        for _ in 0..60 {
            apply_air_control(&mut state, FighterId::Player, -1.0, SIM_DT);
        }
        assert_eq!(state.player.score, JUMP_OVER_POINTS);
    }

    #[test]
    fn test_jump_over_needs_height() {
        let mut state = playing_state();
        state.player.pos = glam::Vec2::new(-5.0, -10.0);
        state.player.state = FighterState::Jumping;
        state.opponent.pos.x = 0.0;
        for _ in 0..30 {
            apply_air_control(&mut state, FighterId::Player, 1.0, SIM_DT);
        }
        assert_eq!(state.player.score, 0);
        assert!(!state.player.has_jumped_over);
    }

    #[test]
    fn test_jump_over_flag_clears_on_landing() {
        let mut state = playing_state();
        state.opponent.pos.x = 300.0;
        state.player.pos.y = -5.0;
        state.player.vel_y = 100.0;
        state.player.state = FighterState::Jumping;
        state.player.has_jumped_over = true;
        for _ in 0..20 {
            if integrate(&mut state, FighterId::Player, SIM_DT).is_some() {
                break;
            }
        }
        assert!(!state.player.has_jumped_over);
    }
}
