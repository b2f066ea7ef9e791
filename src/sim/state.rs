//! Match state and core simulation types
//!
//! Everything the renderer/audio layers observe lives here. State timers and
//! in-progress moves are folded into `FighterState` variants so that illegal
//! combinations (a current move while idle, a stun with no timer) are
//! unrepresentable.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current scene of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scene {
    /// Title screen, waiting for start input
    Title,
    /// How-to-play screen, toggled from the title
    HowToPlay,
    /// Pre-match countdown
    Countdown,
    /// Active match
    Playing,
    /// Match frozen mid-flight
    Paused,
    /// Match ended; `MatchState::result` is set
    GameOver,
}

/// Which side a fighter is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FighterId {
    Player,
    Opponent,
}

impl FighterId {
    pub fn other(self) -> Self {
        match self {
            FighterId::Player => FighterId::Opponent,
            FighterId::Opponent => FighterId::Player,
        }
    }
}

/// Horizontal facing, recomputed toward the other fighter each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// Unit sign along the beam axis
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// The three grapple attacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    Pancake,
    Scissors,
    Guillotine,
}

impl MoveKind {
    pub fn name(self) -> &'static str {
        match self {
            MoveKind::Pancake => "Pancake",
            MoveKind::Scissors => "Scissors",
            MoveKind::Guillotine => "Guillotine",
        }
    }
}

/// Fighter state machine. Variants carry their own countdown timers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FighterState {
    Idle,
    Moving,
    Jumping,
    /// Mutual hold; both fighters are in this state while grappling
    GrappleEngaged,
    /// Resolving a grapple attack; auto-expires back to Idle
    ExecutingMove { kind: MoveKind, timer: f32 },
    /// Cannot act; pin-eligible until the timer runs out
    Stunned { timer: f32 },
    /// Off the beam or balance gone; reset once the timer elapses
    Falling { timer: f32 },
    /// Held down in a pin attempt; carries the remaining stun time
    Pinned { stun_timer: f32 },
    /// Holding the opponent down
    Pinning,
    /// Post-counter lockout; auto-expires back to Idle
    Recovering { timer: f32 },
}

impl FighterState {
    /// Able to move, grapple, or be targeted for most checks
    pub fn is_actionable(self) -> bool {
        matches!(
            self,
            FighterState::Idle | FighterState::Moving | FighterState::GrappleEngaged
        )
    }
}

/// One combatant's physical and competitive state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fighter {
    pub id: FighterId,
    /// Display name, immutable for the duration of a match
    pub name: String,
    /// x = beam-relative horizontal, y = vertical (0 grounded, negative up)
    pub pos: Vec2,
    /// Vertical velocity (px/s, positive = downward)
    pub vel_y: f32,
    pub facing: Facing,
    pub state: FighterState,
    /// Clamped to [0, 100]
    pub balance: f32,
    /// Clamped to [0, 100]
    pub stamina: f32,
    pub score: i64,
    pub combo_count: u32,
    /// Match-elapsed time of the last successful move
    pub last_move_at: Option<f32>,
    pub is_defending: bool,
    /// Prevents double-crediting one jump-over within a single arc
    pub has_jumped_over: bool,
}

/// Transient commentary attached to the match (cosmetic, not simulation state)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Callout {
    pub headline: String,
    pub subtext: Option<String>,
    /// Match-elapsed time at creation
    pub created_at: f32,
}

/// How the match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinReason {
    Pin,
    Timeout,
}

/// Terminal match outcome, set exactly once when the scene becomes GameOver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// None means a draw (timeout with equal scores)
    pub winner: Option<FighterId>,
    pub reason: WinReason,
    pub player_score: i64,
    pub opponent_score: i64,
    /// Seconds of match time consumed
    pub duration: f32,
}

/// The root aggregate: one per match, advanced once per fixed tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    /// Match seed for reproducibility
    pub seed: u64,
    pub scene: Scene,
    /// Counts down from `MATCH_DURATION` while Playing
    pub match_timer: f32,
    pub countdown_timer: f32,
    /// Monotonic match-elapsed time; combo/cooldown windows compare against
    /// this rather than any wall clock
    pub elapsed: f32,
    pub player: Fighter,
    pub opponent: Fighter,
    /// Some(initiator) while the mutual hold is active
    pub grapple_initiator: Option<FighterId>,
    pub pinning_fighter: Option<FighterId>,
    /// In [0, 1]; non-zero only while `pinning_fighter` is set
    pub pin_progress: f32,
    pub callout: Option<Callout>,
    /// Non-None iff `scene == GameOver`
    pub result: Option<MatchResult>,
}

impl Fighter {
    pub fn new(id: FighterId, name: &str) -> Self {
        let x = match id {
            FighterId::Player => -START_OFFSET,
            FighterId::Opponent => START_OFFSET,
        };
        Self {
            id,
            name: name.to_string(),
            pos: Vec2::new(x, 0.0),
            vel_y: 0.0,
            facing: match id {
                FighterId::Player => Facing::Right,
                FighterId::Opponent => Facing::Left,
            },
            state: FighterState::Idle,
            balance: MAX_BALANCE,
            stamina: MAX_STAMINA,
            score: 0,
            combo_count: 0,
            last_move_at: None,
            is_defending: false,
            has_jumped_over: false,
        }
    }

    /// Mirrored start position for this side
    pub fn start_x(&self) -> f32 {
        match self.id {
            FighterId::Player => -START_OFFSET,
            FighterId::Opponent => START_OFFSET,
        }
    }

    pub fn grounded(&self) -> bool {
        self.pos.y >= 0.0
    }

    /// Airborne fighters are excluded from all grapple range checks
    pub fn airborne(&self) -> bool {
        self.pos.y < 0.0 || self.state == FighterState::Jumping
    }

    pub fn on_beam(&self) -> bool {
        crate::on_beam(self.pos.x)
    }

    pub fn in_edge_zone(&self) -> bool {
        crate::in_edge_zone(self.pos.x)
    }
}

impl MatchState {
    /// Fresh application state at the title screen
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            scene: Scene::Title,
            match_timer: MATCH_DURATION,
            countdown_timer: COUNTDOWN_DURATION,
            elapsed: 0.0,
            player: Fighter::new(FighterId::Player, "The Flamingo"),
            opponent: Fighter::new(FighterId::Opponent, "Iron Ibex"),
            grapple_initiator: None,
            pinning_fighter: None,
            pin_progress: 0.0,
            callout: None,
            result: None,
        }
    }

    /// Rebuild everything for a new match and enter the countdown.
    /// Fighters are replaced wholesale; nothing carries over.
    pub fn reset_match(&mut self) {
        let player_name = self.player.name.clone();
        let opponent_name = self.opponent.name.clone();
        self.player = Fighter::new(FighterId::Player, &player_name);
        self.opponent = Fighter::new(FighterId::Opponent, &opponent_name);
        self.match_timer = MATCH_DURATION;
        self.countdown_timer = COUNTDOWN_DURATION;
        self.elapsed = 0.0;
        self.grapple_initiator = None;
        self.pinning_fighter = None;
        self.pin_progress = 0.0;
        self.callout = None;
        self.result = None;
        self.scene = Scene::Countdown;
        log::info!("match reset, seed {}", self.seed);
    }

    pub fn fighter(&self, id: FighterId) -> &Fighter {
        match id {
            FighterId::Player => &self.player,
            FighterId::Opponent => &self.opponent,
        }
    }

    pub fn fighter_mut(&mut self, id: FighterId) -> &mut Fighter {
        match id {
            FighterId::Player => &mut self.player,
            FighterId::Opponent => &mut self.opponent,
        }
    }

    /// Both fighters, with `id`'s fighter first
    pub fn pair_mut(&mut self, id: FighterId) -> (&mut Fighter, &mut Fighter) {
        match id {
            FighterId::Player => (&mut self.player, &mut self.opponent),
            FighterId::Opponent => (&mut self.opponent, &mut self.player),
        }
    }

    pub fn is_grappling(&self) -> bool {
        self.grapple_initiator.is_some()
    }

    /// Horizontal center-to-center distance between the fighters
    pub fn fighter_distance(&self) -> f32 {
        (self.player.pos.x - self.opponent.pos.x).abs()
    }

    /// Grapple range requires both participants grounded
    pub fn in_grapple_range(&self) -> bool {
        !self.player.airborne()
            && !self.opponent.airborne()
            && self.fighter_distance() <= GRAPPLE_RANGE
    }

    pub fn show_callout(&mut self, headline: &str, subtext: Option<&str>) {
        self.callout = Some(Callout {
            headline: headline.to_string(),
            subtext: subtext.map(str::to_string),
            created_at: self.elapsed,
        });
    }
}
