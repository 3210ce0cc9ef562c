//! The force-field primitive
//!
//! Every emitter mode is the same linear-falloff field with a different mix
//! of the radial and tangential unit vectors. The function is pure: identical
//! inputs always produce the identical velocity delta and return value.

use glam::Vec2;

use super::state::EmitterMode;

/// Per-mode field coefficients
///
/// `radial` is positive outward (push) and negative inward (pull);
/// `tangential` is counter-clockwise spin. `drain` is the energy cost per
/// tick while the mode is actively channeled.
#[derive(Debug, Clone, Copy)]
pub struct ModeProfile {
    pub radial: f32,
    pub tangential: f32,
    pub drain: f32,
}

impl EmitterMode {
    /// Field coefficients for this mode.
    ///
    /// Repel pushes hardest; attract pulls with a weaker coefficient. Vortex
    /// is near-pure spin with a tiny outward drift so nothing orbits forever.
    /// Blast is a pure-offense mode and projects no field at all.
    pub fn profile(self) -> ModeProfile {
        match self {
            EmitterMode::Repel => ModeProfile { radial: 0.15, tangential: 0.0, drain: 0.22 },
            EmitterMode::Attract => ModeProfile { radial: -0.08, tangential: 0.0, drain: 0.18 },
            EmitterMode::Vortex => ModeProfile { radial: 0.02, tangential: 0.12, drain: 0.26 },
            EmitterMode::Paint => ModeProfile { radial: 0.05, tangential: 0.0, drain: 0.10 },
            EmitterMode::Gravity => ModeProfile { radial: -0.12, tangential: 0.0, drain: 0.24 },
            EmitterMode::Wave => ModeProfile { radial: 0.10, tangential: 0.05, drain: 0.20 },
            EmitterMode::Blast => ModeProfile { radial: 0.0, tangential: 0.0, drain: 0.0 },
            EmitterMode::Constellation => {
                ModeProfile { radial: 0.03, tangential: 0.02, drain: 0.12 }
            }
        }
    }
}

/// Apply one emitter's field to a target, mutating its velocity.
///
/// Returns the scalar force magnitude so callers can threshold it for
/// secondary effects (stun, damage). Zero outside the radius and at the
/// exact source position (undefined direction).
pub fn apply_force(
    pos: Vec2,
    vel: &mut Vec2,
    source: Vec2,
    radius: f32,
    strength: f32,
    mode: EmitterMode,
) -> f32 {
    let delta = pos - source;
    let dist = delta.length();

    if dist >= radius || dist <= 0.0 {
        return 0.0;
    }

    // Linear falloff: maximal at the source, zero at the boundary
    let force = strength * (radius - dist) / radius;
    let n = delta / dist;
    let tangent = Vec2::new(-n.y, n.x);

    let p = mode.profile();
    *vel += n * force * p.radial + tangent * force * p.tangential;

    force
}
