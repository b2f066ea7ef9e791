//! Beam Brawl entry point
//!
//! Runs a headless exhibition match: the AI drives the champion side and a
//! small scripted policy drives the challenger, both through the same
//! `TickInput` vocabulary a renderer shell would feed in. The final result
//! prints as JSON.

use beam_brawl::consts::*;
use beam_brawl::sim::{FighterState, MatchState, Scene, TickContext, TickInput, tick};

/// Challenger policy for the exhibition: close distance, lock up, and throw
/// Pancakes. Deliberately simple so the match stays readable in the log.
fn challenger_input(state: &MatchState) -> TickInput {
    let mut input = TickInput::default();
    let me = &state.player;
    let target = &state.opponent;

    if matches!(target.state, FighterState::ExecutingMove { .. }) {
        input.defend = true;
        return input;
    }
    if me.state == FighterState::GrappleEngaged {
        input.pancake = true;
        return input;
    }
    if matches!(target.state, FighterState::Stunned { .. }) && state.in_grapple_range() {
        input.pin = true;
        return input;
    }
    if state.in_grapple_range() {
        input.grapple = true;
        return input;
    }
    let dx = target.pos.x - me.pos.x;
    if dx > 0.0 {
        input.right = true;
    } else if dx < 0.0 {
        input.left = true;
    }
    input
}

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });

    log::info!("Beam Brawl exhibition starting with seed: {}", seed);

    let mut state = MatchState::new(seed);
    let mut ctx = TickContext::new(seed);

    // Leave the title screen
    let start = TickInput {
        start: true,
        ..TickInput::default()
    };
    tick(&mut state, &start, &mut ctx, SIM_DT);

    // Fixed-timestep loop; headless frames arrive at exactly the sim rate
    // but the accumulator shape matches what a render loop would drive.
    let frame_dt = SIM_DT;
    let mut accumulator = 0.0f32;
    let max_frames = (((COUNTDOWN_DURATION + MATCH_DURATION) / SIM_DT) as u32) + 120;
    for _ in 0..max_frames {
        if state.scene == Scene::GameOver {
            break;
        }
        accumulator += frame_dt;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = challenger_input(&state);
            tick(&mut state, &input, &mut ctx, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    match &state.result {
        Some(result) => {
            log::info!(
                "Final: {} {} - {} {}",
                state.player.name,
                result.player_score,
                result.opponent_score,
                state.opponent.name
            );
            match serde_json::to_string_pretty(result) {
                Ok(json) => println!("{}", json),
                Err(e) => log::error!("Failed to serialize result: {}", e),
            }
        }
        None => log::error!("Match never finished (scene: {:?})", state.scene),
    }
}
