//! Nebula Defender - force-field defense simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (force field, agents, combat, economy)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Leaderboard persistence
//!
//! Rendering, input plumbing, and audio live outside this crate: they feed
//! the sim through [`sim::TickInput`] and read back [`sim::Snapshot`].

pub mod highscores;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration defaults
///
/// Every value here can be overridden at runtime through [`tuning::Tuning`];
/// these constants remain the authoritative defaults.
pub mod consts {
    /// Simulation tick rate the balance numbers assume (velocities are px/tick)
    pub const TICK_HZ: u32 = 60;

    /// Player force field
    pub const FORCE_RADIUS: f32 = 160.0;
    pub const FORCE_STRENGTH: f32 = 14.0;

    /// Core (the protected objective)
    pub const CORE_RADIUS: f32 = 50.0;
    pub const CORE_MAX_HEALTH: f32 = 100.0;

    /// Stun: force above this fraction of nominal strength stuns
    pub const STUN_FORCE_FRAC: f32 = 0.2;
    /// Emitter-induced stun floor (ticks)
    pub const STUN_FLOOR: u32 = 12;
    /// Blast-induced stun floor (ticks), higher than the emitter's
    pub const BLAST_STUN_FLOOR: u32 = 30;

    /// Velocity-based damage: speed above the threshold converts to damage
    pub const VEL_DAMAGE_THRESHOLD: f32 = 1.5;
    pub const VEL_DAMAGE_COEFF: f32 = 0.02;

    /// Motion integration
    pub const FRICTION: f32 = 0.96;
    pub const STUN_DAMPING: f32 = 0.92;
    pub const SEEK_ACCEL: f32 = 0.06;

    /// Agent speed scaling per wave, capped
    pub const BASE_AGENT_SPEED: f32 = 0.8;
    pub const AGENT_SPEED_PER_WAVE: f32 = 0.1;
    pub const MAX_AGENT_SPEED: f32 = 2.2;

    /// Spawn scheduler (intervals in ticks)
    pub const SPAWN_BASE_INTERVAL: u64 = 70;
    pub const SPAWN_MIN_INTERVAL: u64 = 25;
    pub const SPAWN_PER_WAVE_REDUCTION: u64 = 8;
    pub const SPAWN_BATCH_CAP: u32 = 4;
    /// Spawn ring radius as a fraction of max(width, height)
    pub const SPAWN_RING_FACTOR: f32 = 0.55;
    /// Spawn invulnerability (ticks)
    pub const SPAWN_GRACE: u32 = 30;

    /// Ejection kill: outside bounds by this margin while moving outward
    /// faster than the speed threshold
    pub const EJECT_MARGIN: f32 = 40.0;
    pub const EJECT_SPEED_THRESHOLD: f32 = 0.5;
    /// Reduced score for ejection kills (no orbs)
    pub const EJECT_VALUE: u32 = 12;

    /// Wave advances every this many cumulative kills
    pub const KILLS_PER_WAVE: u32 = 12;

    /// Combo multiplier
    pub const MAX_COMBO: u32 = 30;
    pub const COMBO_WEIGHT: f32 = 0.1;
    /// Ticks before an unfed combo lapses to zero
    pub const COMBO_DURATION: u32 = 120;

    /// Energy resource
    pub const ENERGY_MAX: f32 = 100.0;
    pub const ENERGY_REGEN: f32 = 0.15;

    /// Blast (area attack)
    pub const BLAST_COST: f32 = 30.0;
    pub const BLAST_STRENGTH: f32 = 26.0;
    pub const BLAST_GROWTH: f32 = 8.0;
    pub const BLAST_DECAY: f32 = 0.94;
    pub const BLAST_BAND: f32 = 30.0;
    pub const BLAST_PUSH: f32 = 0.2;
    pub const BLAST_DAMAGE: f32 = 0.5;
    pub const BLAST_MAX_RADIUS: f32 = 480.0;
    pub const BLAST_MIN_STRENGTH: f32 = 1.0;

    /// Orbs (pickups dropped on kills)
    pub const ORB_TTL: u32 = 360;
    pub const ORB_ATTRACT_RADIUS: f32 = 140.0;
    pub const ORB_COLLECT_RADIUS: f32 = 28.0;
    pub const ORB_ATTRACT_ACCEL: f32 = 0.5;
    pub const ORB_FRICTION: f32 = 0.92;
    pub const ORB_MAX_SPEED: f32 = 9.0;
    /// Energy refunded per collected orb
    pub const ORB_ENERGY: f32 = 2.5;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Wrap a hue into [0, 360)
#[inline]
pub fn wrap_hue(hue: f32) -> f32 {
    hue.rem_euclid(360.0)
}
