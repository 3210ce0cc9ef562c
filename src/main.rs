//! Nebula Defender entry point
//!
//! Headless driver: runs a scripted demo of the simulation core and keeps
//! the on-disk leaderboard. A real front end drives the sim exactly the same
//! way, through `TickInput` in and `snapshot()` out.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;
use nebula_defender::sim::{EmitterMode, GamePhase, GameState, TickInput, tick};
use nebula_defender::{HighScores, Tuning};

const SCORES_PATH: &str = "nebula_defender_scores.json";
const TUNING_PATH: &str = "nebula_defender_tuning.json";

fn now_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

fn main() {
    env_logger::init();
    log::info!("Nebula Defender (headless) starting...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| now_ms() as u64);
    log::info!("Seed: {seed}");

    let tuning = Tuning::load_or_default(Path::new(TUNING_PATH));
    let mut scores = HighScores::load(Path::new(SCORES_PATH));
    if let Some(best) = scores.top_score() {
        log::info!("Best so far: {best}");
    }

    let mut state = GameState::with_tuning(seed, 1280.0, 720.0, tuning);
    state.high_score = scores.top_score().unwrap_or(0);

    let start = TickInput {
        start: true,
        ..Default::default()
    };
    tick(&mut state, &start);

    // Scripted player: orbit the core, cycle modes, blast periodically
    let modes = [EmitterMode::Repel, EmitterMode::Vortex, EmitterMode::Attract];
    let center = state.core_center();
    let max_ticks: u32 = 60 * 120; // two minutes of play

    for i in 0..max_ticks {
        let theta = i as f32 * 0.01;
        let input = TickInput {
            emitter_pos: Some(center + Vec2::new(theta.cos(), theta.sin()) * 220.0),
            emitter_active: true,
            mode: Some(modes[(i / 600) as usize % modes.len()]),
            fire_blast: i % 900 == 0 && i > 0,
            ..Default::default()
        };
        tick(&mut state, &input);

        if i % 600 == 0 {
            let snap = state.snapshot();
            log::info!(
                "t={i} wave {} score {} combo {} energy {:.0} core {:.0} agents {}",
                snap.wave,
                snap.score,
                snap.combo,
                snap.energy,
                snap.core_health,
                snap.agents.len()
            );
        }
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    let snap = state.snapshot();
    println!(
        "Run over: score {} | wave {} | kills {} | best {}",
        snap.score, snap.wave, snap.kills, snap.high_score
    );

    if let Some(rank) = scores.add_score(snap.score, snap.wave, now_ms()) {
        log::info!("New leaderboard entry at rank {rank}");
        scores.save(Path::new(SCORES_PATH));
    }
}
