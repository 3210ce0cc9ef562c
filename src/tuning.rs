//! Data-driven game balance
//!
//! [`Tuning`] mirrors every gameplay constant in [`crate::consts`]. A JSON
//! file can override any subset; missing keys fall back to the compile-time
//! defaults, so a minimal file only names the values being tuned.
//!
//! `src/lib.rs` `consts` remains the authoritative default source used by
//! `Tuning::default()`.

use serde::Deserialize;

use crate::consts::*;

/// Runtime-tunable gameplay balance.
///
/// All fields default to the corresponding constant in [`crate::consts`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Force field ===
    pub force_radius: f32,
    pub force_strength: f32,

    // === Core ===
    pub core_radius: f32,
    pub core_max_health: f32,

    // === Stun & damage ===
    pub stun_force_frac: f32,
    pub stun_floor: u32,
    pub blast_stun_floor: u32,
    pub vel_damage_threshold: f32,
    pub vel_damage_coeff: f32,

    // === Motion ===
    pub friction: f32,
    pub stun_damping: f32,
    pub seek_accel: f32,
    pub base_agent_speed: f32,
    pub agent_speed_per_wave: f32,
    pub max_agent_speed: f32,

    // === Spawning ===
    pub spawn_base_interval: u64,
    pub spawn_min_interval: u64,
    pub spawn_per_wave_reduction: u64,
    pub spawn_batch_cap: u32,
    pub spawn_ring_factor: f32,
    pub spawn_grace: u32,

    // === Ejection ===
    pub eject_margin: f32,
    pub eject_speed_threshold: f32,
    pub eject_value: u32,

    // === Waves & combo ===
    pub kills_per_wave: u32,
    pub max_combo: u32,
    pub combo_weight: f32,
    pub combo_duration: u32,

    // === Energy ===
    pub energy_max: f32,
    pub energy_regen: f32,

    // === Blast ===
    pub blast_cost: f32,
    pub blast_strength: f32,
    pub blast_growth: f32,
    pub blast_decay: f32,
    pub blast_band: f32,
    pub blast_push: f32,
    pub blast_damage: f32,
    pub blast_max_radius: f32,
    pub blast_min_strength: f32,

    // === Orbs ===
    pub orb_ttl: u32,
    pub orb_attract_radius: f32,
    pub orb_collect_radius: f32,
    pub orb_attract_accel: f32,
    pub orb_friction: f32,
    pub orb_max_speed: f32,
    pub orb_energy: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            force_radius: FORCE_RADIUS,
            force_strength: FORCE_STRENGTH,
            core_radius: CORE_RADIUS,
            core_max_health: CORE_MAX_HEALTH,
            stun_force_frac: STUN_FORCE_FRAC,
            stun_floor: STUN_FLOOR,
            blast_stun_floor: BLAST_STUN_FLOOR,
            vel_damage_threshold: VEL_DAMAGE_THRESHOLD,
            vel_damage_coeff: VEL_DAMAGE_COEFF,
            friction: FRICTION,
            stun_damping: STUN_DAMPING,
            seek_accel: SEEK_ACCEL,
            base_agent_speed: BASE_AGENT_SPEED,
            agent_speed_per_wave: AGENT_SPEED_PER_WAVE,
            max_agent_speed: MAX_AGENT_SPEED,
            spawn_base_interval: SPAWN_BASE_INTERVAL,
            spawn_min_interval: SPAWN_MIN_INTERVAL,
            spawn_per_wave_reduction: SPAWN_PER_WAVE_REDUCTION,
            spawn_batch_cap: SPAWN_BATCH_CAP,
            spawn_ring_factor: SPAWN_RING_FACTOR,
            spawn_grace: SPAWN_GRACE,
            eject_margin: EJECT_MARGIN,
            eject_speed_threshold: EJECT_SPEED_THRESHOLD,
            eject_value: EJECT_VALUE,
            kills_per_wave: KILLS_PER_WAVE,
            max_combo: MAX_COMBO,
            combo_weight: COMBO_WEIGHT,
            combo_duration: COMBO_DURATION,
            energy_max: ENERGY_MAX,
            energy_regen: ENERGY_REGEN,
            blast_cost: BLAST_COST,
            blast_strength: BLAST_STRENGTH,
            blast_growth: BLAST_GROWTH,
            blast_decay: BLAST_DECAY,
            blast_band: BLAST_BAND,
            blast_push: BLAST_PUSH,
            blast_damage: BLAST_DAMAGE,
            blast_max_radius: BLAST_MAX_RADIUS,
            blast_min_strength: BLAST_MIN_STRENGTH,
            orb_ttl: ORB_TTL,
            orb_attract_radius: ORB_ATTRACT_RADIUS,
            orb_collect_radius: ORB_COLLECT_RADIUS,
            orb_attract_accel: ORB_ATTRACT_ACCEL,
            orb_friction: ORB_FRICTION,
            orb_max_speed: ORB_MAX_SPEED,
            orb_energy: ORB_ENERGY,
        }
    }
}

impl Tuning {
    /// Parse a JSON override set; unknown keys are errors, missing keys
    /// fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load overrides from a file, falling back to defaults on any failure.
    pub fn load_or_default(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning overrides from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Bad tuning file {}: {e}, using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No tuning file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }
}
