//! The displacement field: spatio-temporal falloff and per-point
//! evaluation over the packed slot arrays.
//!
//! Evaluation is a pure function of `(query position, published frame)` and
//! touches no shared state, so it can run across tens of thousands of
//! surface points in parallel — as a CPU fold here, or as the generated
//! compute shader in [`crate::gpu`], which mirrors this module slot for
//! slot.
//!
//! # Blending
//!
//! Contributions from individual footprints are *not* summed. The fold
//! keeps only the single contribution with the largest magnitude: additive
//! accumulation near busy areas would grow without bound, while
//! max-selection caps the displacement at one full-strength footprint.

use glam::Vec2;

use crate::config::{PresenceConfig, TrailConfig};
use crate::packer::{PackedSlots, PresenceSlots};

/// Softening added to every distance before dividing, so a query point
/// sitting exactly on a footprint stays finite.
pub const DISTANCE_EPS: f32 = 1e-4;

/// Hermite interpolation between two edges, clamped to `[0, 1]`.
///
/// Matches the WGSL/GLSL builtin for ascending edges.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Influence weight of a footprint at `dist` world units.
///
/// 1.0 at the footprint, smoothly decreasing, exactly 0.0 at or beyond
/// `radius` — including at infinite (sentinel) distance.
#[inline]
pub fn spatial_falloff(dist: f32, radius: f32) -> f32 {
    1.0 - smoothstep(0.0, radius, dist)
}

/// Influence weight of a footprint `age` seconds after recording.
///
/// Exactly 1.0 while `age <= hold`, smoothly decaying to 0.0 by
/// `age == hold + fade`, and 0.0 ever after — including at infinite
/// (sentinel) age.
#[inline]
pub fn temporal_falloff(age: f32, hold: f32, fade: f32) -> f32 {
    1.0 - smoothstep(hold, hold + fade, age)
}

/// Strongest single trail contribution at `pos`, before strength scaling.
///
/// Scans every slot, weights it by spatial and temporal falloff, and keeps
/// the contribution with the largest magnitude. The returned vector points
/// away from the winning footprint and has magnitude in `[0, 1]`.
pub fn trail_displacement(
    slots: &PackedSlots,
    pos: Vec2,
    radius: f32,
    hold: f32,
    fade: f32,
) -> Vec2 {
    let mut best = Vec2::ZERO;
    let mut best_mag_sq = 0.0f32;
    for i in 0..slots.len() {
        let delta = pos - slots.position(i);
        let dist = delta.length() + DISTANCE_EPS;
        let weight = spatial_falloff(dist, radius) * temporal_falloff(slots.age(i), hold, fade);
        // Zero-weight slots (sentinels included) are skipped before the
        // division so infinities never reach the direction math.
        if weight <= 0.0 {
            continue;
        }
        let contribution = delta / dist * weight;
        let mag_sq = contribution.length_squared();
        if mag_sq > best_mag_sq {
            best_mag_sq = mag_sq;
            best = contribution;
        }
    }
    best
}

/// Strongest single presence contribution at `pos`, before strength
/// scaling.
///
/// Same fold as [`trail_displacement`] with the temporal term pinned to
/// full weight: presence entries are instantaneous and never age.
pub fn presence_displacement(slots: &PresenceSlots, pos: Vec2, radius: f32) -> Vec2 {
    let mut best = Vec2::ZERO;
    let mut best_mag_sq = 0.0f32;
    for i in 0..slots.len() {
        let delta = pos - slots.position(i);
        let dist = delta.length() + DISTANCE_EPS;
        let weight = spatial_falloff(dist, radius);
        if weight <= 0.0 {
            continue;
        }
        let contribution = delta / dist * weight;
        let mag_sq = contribution.length_squared();
        if mag_sq > best_mag_sq {
            best_mag_sq = mag_sq;
            best = contribution;
        }
    }
    best
}

/// One frame's published evaluation input: packed slots plus the falloff
/// constants they were packed under.
///
/// Built fresh by the engine every frame and handed out behind an `Arc`;
/// nothing mutates it afterwards, so any number of evaluation threads can
/// read it concurrently while the engine already accumulates the next
/// frame.
#[derive(Clone, Debug)]
pub struct FieldFrame {
    now: f32,
    trail: PackedSlots,
    trail_config: TrailConfig,
    presence: Option<(PresenceSlots, PresenceConfig)>,
}

impl FieldFrame {
    /// Assemble a frame from packed arrays and the configs that shaped
    /// them.
    pub fn new(
        now: f32,
        trail: PackedSlots,
        trail_config: TrailConfig,
        presence: Option<(PresenceSlots, PresenceConfig)>,
    ) -> Self {
        Self {
            now,
            trail,
            trail_config,
            presence,
        }
    }

    /// Timestamp this frame was packed at.
    #[inline]
    pub fn now(&self) -> f32 {
        self.now
    }

    /// The packed trail slots.
    #[inline]
    pub fn trail_slots(&self) -> &PackedSlots {
        &self.trail
    }

    /// The presence slots, when the channel is enabled.
    #[inline]
    pub fn presence_slots(&self) -> Option<&PresenceSlots> {
        self.presence.as_ref().map(|(slots, _)| slots)
    }

    /// The trail configuration this frame was packed under.
    #[inline]
    pub fn config(&self) -> &TrailConfig {
        &self.trail_config
    }

    /// The presence configuration, when the channel is enabled.
    #[inline]
    pub fn presence_config(&self) -> Option<&PresenceConfig> {
        self.presence.as_ref().map(|(_, cfg)| cfg)
    }

    /// Tip-level displacement at a world position.
    ///
    /// Pure and side-effect free. The result is the strength-scaled best
    /// trail contribution plus, when enabled, the strength-scaled best
    /// presence contribution; a geometry stage scales it per vertex by
    /// [`crate::surface::tipness`] so rooted bases stay put.
    pub fn displacement_at(&self, pos: Vec2) -> Vec2 {
        let cfg = &self.trail_config;
        let mut displacement = trail_displacement(
            &self.trail,
            pos,
            cfg.influence_radius,
            cfg.hold_time,
            cfg.fade_time,
        ) * cfg.strength;

        if let Some((slots, presence_cfg)) = &self.presence {
            displacement +=
                presence_displacement(slots, pos, presence_cfg.radius) * presence_cfg.strength;
        }

        displacement
    }
}
