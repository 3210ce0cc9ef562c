//! Game state and core simulation types
//!
//! Everything the tick mutates lives in [`GameState`]; the outside world only
//! ever sees a [`Snapshot`] taken after a tick completes.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Current phase of the game lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, simulation idle
    Menu,
    /// Active gameplay
    Playing,
    /// Core destroyed; high score already recorded
    GameOver,
}

/// Force emitter modes selectable by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmitterMode {
    Repel,
    Attract,
    Vortex,
    Paint,
    Gravity,
    Wave,
    /// Pure-offense mode: no continuous field, blasts only
    Blast,
    Constellation,
}

/// The player-controlled force source
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Emitter {
    pub pos: Vec2,
    pub active: bool,
    pub mode: EmitterMode,
}

impl Default for Emitter {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            active: false,
            mode: EmitterMode::Repel,
        }
    }
}

/// A free-standing ambient force source (nebula / gravity well)
///
/// Follows the same force contract as the player emitter but never stuns or
/// damages; despawns when its lifetime runs out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AmbientEmitter {
    pub pos: Vec2,
    pub radius: f32,
    pub strength: f32,
    pub mode: EmitterMode,
    /// Remaining lifetime in ticks
    pub ttl: u32,
}

/// Hostile agent archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Archetype {
    Basic,
    Fast,
    Tank,
    Swarm,
}

/// Per-archetype constants: size, hue, baseline health, speed multiplier,
/// core damage, score value, combo gain, orb drop.
#[derive(Debug, Clone, Copy)]
pub struct ArchetypeStats {
    pub size: f32,
    pub hue: f32,
    pub health: f32,
    pub speed_mult: f32,
    pub core_damage: f32,
    pub score_value: u32,
    pub combo_gain: u32,
    pub orb_count: u32,
    pub orb_value: u32,
}

impl Archetype {
    /// Stat table lookup. Keeps the spawner and resolver branch-free over
    /// archetypes.
    pub const fn stats(self) -> &'static ArchetypeStats {
        const BASIC: ArchetypeStats = ArchetypeStats {
            size: 14.0,
            hue: 0.0,
            health: 1.0,
            speed_mult: 1.0,
            core_damage: 10.0,
            score_value: 18,
            combo_gain: 1,
            orb_count: 1,
            orb_value: 6,
        };
        const FAST: ArchetypeStats = ArchetypeStats {
            size: 10.0,
            hue: 35.0,
            health: 0.7,
            speed_mult: 1.5,
            core_damage: 6.0,
            score_value: 12,
            combo_gain: 1,
            orb_count: 1,
            orb_value: 4,
        };
        const TANK: ArchetypeStats = ArchetypeStats {
            size: 22.0,
            hue: 280.0,
            health: 2.5,
            speed_mult: 0.6,
            core_damage: 15.0,
            score_value: 30,
            combo_gain: 3,
            orb_count: 3,
            orb_value: 8,
        };
        const SWARM: ArchetypeStats = ArchetypeStats {
            size: 8.0,
            hue: 130.0,
            health: 0.5,
            speed_mult: 1.3,
            core_damage: 4.0,
            score_value: 8,
            combo_gain: 1,
            orb_count: 1,
            orb_value: 2,
        };
        match self {
            Archetype::Basic => &BASIC,
            Archetype::Fast => &FAST,
            Archetype::Tank => &TANK,
            Archetype::Swarm => &SWARM,
        }
    }
}

/// A hostile agent advancing on the core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub hue: f32,
    pub archetype: Archetype,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    /// Stun ticks remaining; no seek acceleration while nonzero
    pub stunned: u32,
    /// Spawn-invulnerability ticks remaining
    pub grace: u32,
}

/// An expanding area-damage shockwave
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Blast {
    pub id: u32,
    pub origin: Vec2,
    /// Current ring radius (expands every tick)
    pub radius: f32,
    /// Current push strength (decays every tick)
    pub strength: f32,
}

/// A collectible orb dropped at a kill site
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Orb {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub value: u32,
    /// Remaining lifetime in ticks
    pub ttl: u32,
}

/// Complete authoritative simulation state
///
/// Owned exclusively by the tick; renderers read [`GameState::snapshot`].
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG: the only randomness source in the sim
    pub rng: Pcg32,
    /// Gameplay balance knobs
    pub tuning: Tuning,
    /// Play area size
    pub bounds: Vec2,
    /// Current phase
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Score (monotonic within a run)
    pub score: u64,
    /// Best score across runs this session
    pub high_score: u64,
    /// Cumulative kills this run
    pub kills: u32,
    /// Wave number (1-based, never decreases)
    pub wave: u32,
    /// Combo level
    pub combo: u32,
    /// Ticks until the combo lapses
    pub combo_ticks: u32,
    /// Energy resource in [0, energy_max]
    pub energy: f32,
    /// Core health in [0, core_max_health]
    pub core_health: f32,
    /// Player emitter
    pub emitter: Emitter,
    /// Hostile agents (id order)
    pub agents: Vec<Agent>,
    /// Collectible orbs (id order)
    pub orbs: Vec<Orb>,
    /// Active blasts (id order)
    pub blasts: Vec<Blast>,
    /// Ambient force sources
    pub ambients: Vec<AmbientEmitter>,
    /// Tick of the last spawn event
    pub last_spawn_tick: u64,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh state in the menu phase.
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        Self::with_tuning(seed, width, height, Tuning::default())
    }

    /// Create a fresh state with custom balance values.
    pub fn with_tuning(seed: u64, width: f32, height: f32, tuning: Tuning) -> Self {
        let energy = tuning.energy_max;
        let core_health = tuning.core_max_health;
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            bounds: Vec2::new(width, height),
            phase: GamePhase::Menu,
            time_ticks: 0,
            score: 0,
            high_score: 0,
            kills: 0,
            wave: 1,
            combo: 0,
            combo_ticks: 0,
            energy,
            core_health,
            emitter: Emitter::default(),
            agents: Vec::new(),
            orbs: Vec::new(),
            blasts: Vec::new(),
            ambients: Vec::new(),
            last_spawn_tick: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Center of the play area; the core sits here.
    #[inline]
    pub fn core_center(&self) -> Vec2 {
        self.bounds * 0.5
    }

    /// Start (or restart) a run: reset the economy and clear every entity
    /// collection, then enter the playing phase.
    pub fn start_run(&mut self) {
        self.score = 0;
        self.kills = 0;
        self.wave = 1;
        self.combo = 0;
        self.combo_ticks = 0;
        self.energy = self.tuning.energy_max;
        self.core_health = self.tuning.core_max_health;
        self.agents.clear();
        self.orbs.clear();
        self.blasts.clear();
        self.last_spawn_tick = self.time_ticks;
        self.phase = GamePhase::Playing;
        log::info!("Run started (seed {})", self.seed);
    }

    /// Re-derive play bounds after a resize. In-flight entities keep their
    /// absolute positions; only spawn geometry and ejection margins change.
    pub fn set_bounds(&mut self, width: f32, height: f32) {
        self.bounds = Vec2::new(width, height);
    }

    /// Add an ambient force source.
    pub fn add_ambient(&mut self, ambient: AmbientEmitter) {
        self.ambients.push(ambient);
    }

    /// Attempt to fire a blast at the current emitter position.
    ///
    /// Gated on the energy threshold; deducts the cost and spawns the blast
    /// atomically. Returns false (and changes nothing) when underfunded.
    pub fn try_fire_blast(&mut self) -> bool {
        if self.energy < self.tuning.blast_cost {
            return false;
        }
        self.energy -= self.tuning.blast_cost;
        let blast = Blast {
            id: self.next_entity_id(),
            origin: self.emitter.pos,
            radius: 0.0,
            strength: self.tuning.blast_strength,
        };
        self.blasts.push(blast);
        true
    }

    /// Award score through the combo multiplier and feed the combo.
    ///
    /// Returns the credited amount. `combo_gain` of zero credits score
    /// without resetting the combo timer.
    pub(crate) fn award(&mut self, base_value: u32, combo_gain: u32) -> u64 {
        let credited =
            (base_value as f32 * (1.0 + self.combo as f32 * self.tuning.combo_weight)).floor()
                as u64;
        self.score += credited;
        if combo_gain > 0 {
            self.combo = (self.combo + combo_gain).min(self.tuning.max_combo);
            self.combo_ticks = self.tuning.combo_duration;
        }
        credited
    }

    /// Read-only projection for presentation.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score,
            high_score: self.high_score,
            wave: self.wave,
            kills: self.kills,
            combo: self.combo,
            energy: self.energy,
            core_health: self.core_health,
            core_pos: self.core_center(),
            core_radius: self.tuning.core_radius,
            bounds: self.bounds,
            emitter: self.emitter,
            agents: self.agents.clone(),
            orbs: self.orbs.clone(),
            blasts: self.blasts.clone(),
            ambients: self.ambients.clone(),
        }
    }
}

/// Read-only view of the simulation for rendering and HUD
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    pub wave: u32,
    pub kills: u32,
    pub combo: u32,
    pub energy: f32,
    pub core_health: f32,
    pub core_pos: Vec2,
    pub core_radius: f32,
    pub bounds: Vec2,
    pub emitter: Emitter,
    pub agents: Vec<Agent>,
    pub orbs: Vec<Orb>,
    pub blasts: Vec<Blast>,
    pub ambients: Vec<AmbientEmitter>,
}
