//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod force;
pub mod state;
pub mod tick;

pub use force::{ModeProfile, apply_force};
pub use state::{
    Agent, AmbientEmitter, Archetype, ArchetypeStats, Blast, Emitter, EmitterMode, GamePhase,
    GameState, Orb, Snapshot,
};
pub use tick::{TickInput, tick};
