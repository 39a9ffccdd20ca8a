//! Configuration for trails, the presence channel, and the surface layout.
//!
//! Every tunable of the engine lives here rather than in hard-coded
//! constants. Configs are plain structs built with chained `with_*` methods:
//!
//! ```ignore
//! use trample::{TrailConfig, SurfaceConfig};
//!
//! let trails = TrailConfig::new()
//!     .with_hold_time(2.5)
//!     .with_fade_time(4.0)
//!     .with_influence_radius(1.2)
//!     .with_strength(0.9);
//!
//! let surface = SurfaceConfig::new(25.0, 160).with_seed(7);
//! ```

/// Configuration for footprint recording and trail evaluation.
///
/// Covers both trail sources: the primary actor (time-gated, grounded-only
/// sampling) and the aggregated secondary actors (movement-gated sampling).
#[derive(Clone, Copy, Debug)]
pub struct TrailConfig {
    /// Minimum seconds between primary-actor samples.
    pub sample_interval_primary: f32,

    /// Minimum seconds between secondary sampling passes.
    ///
    /// Within a pass, each secondary actor is still movement-gated; this
    /// interval only throttles how often the pass runs at all.
    pub sample_interval_secondary: f32,

    /// Squared distance a secondary actor must move from its last recorded
    /// position before it leaves a new footprint.
    pub move_threshold_sq: f32,

    /// Seconds a footprint keeps full influence.
    pub hold_time: f32,

    /// Seconds over which influence fades to zero after the hold window.
    pub fade_time: f32,

    /// World-space radius of a footprint's influence.
    pub influence_radius: f32,

    /// Displacement applied at full weight (caps the output magnitude).
    pub strength: f32,

    /// Length of the packed slot array consumed by the evaluator.
    pub trail_slots: usize,

    /// Maximum retained primary-trail entries.
    pub primary_capacity: usize,

    /// Maximum retained secondary-trail entries.
    pub secondary_capacity: usize,
}

impl TrailConfig {
    /// Create a trail configuration with the default tuning.
    ///
    /// Defaults suit a surface a few tens of units across with an actor
    /// moving at walking speed: samples every 100 ms, footprints held for
    /// 2 s then fading over 3 s, influence radius 1.5 units.
    pub fn new() -> Self {
        Self {
            sample_interval_primary: 0.1,
            sample_interval_secondary: 0.25,
            move_threshold_sq: 0.25,
            hold_time: 2.0,
            fade_time: 3.0,
            influence_radius: 1.5,
            strength: 0.8,
            trail_slots: 96,
            primary_capacity: 64,
            secondary_capacity: 48,
        }
    }

    /// Set the minimum seconds between primary samples.
    pub fn with_sample_interval_primary(mut self, interval: f32) -> Self {
        self.sample_interval_primary = interval.max(0.0);
        self
    }

    /// Set the minimum seconds between secondary sampling passes.
    pub fn with_sample_interval_secondary(mut self, interval: f32) -> Self {
        self.sample_interval_secondary = interval.max(0.0);
        self
    }

    /// Set the squared movement threshold for secondary actors.
    pub fn with_move_threshold_sq(mut self, threshold_sq: f32) -> Self {
        self.move_threshold_sq = threshold_sq.max(0.0);
        self
    }

    /// Set the full-influence hold window in seconds.
    pub fn with_hold_time(mut self, seconds: f32) -> Self {
        self.hold_time = seconds.max(0.0);
        self
    }

    /// Set the fade window in seconds.
    ///
    /// Clamped to a small positive minimum so the temporal falloff always
    /// has a well-defined slope.
    pub fn with_fade_time(mut self, seconds: f32) -> Self {
        self.fade_time = seconds.max(1e-3);
        self
    }

    /// Set the world-space influence radius of a footprint.
    pub fn with_influence_radius(mut self, radius: f32) -> Self {
        assert!(radius > 0.0, "Influence radius must be positive");
        self.influence_radius = radius;
        self
    }

    /// Set the displacement strength.
    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    /// Set the packed slot array length.
    pub fn with_trail_slots(mut self, slots: usize) -> Self {
        assert!(slots >= 1, "Packed slot array needs at least one slot");
        self.trail_slots = slots;
        self
    }

    /// Set the primary trail capacity.
    pub fn with_primary_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity >= 1, "Primary trail needs at least one slot");
        self.primary_capacity = capacity;
        self
    }

    /// Set the secondary trail capacity.
    pub fn with_secondary_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity >= 1, "Secondary trail needs at least one slot");
        self.secondary_capacity = capacity;
        self
    }

    /// Total seconds a footprint can influence the field (`hold + fade`).
    #[inline]
    pub fn total_window(&self) -> f32 {
        self.hold_time + self.fade_time
    }
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for the instantaneous presence channel.
///
/// A second, history-free slot array refreshed every frame from the current
/// secondary-actor positions. Evaluated with its own radius and strength
/// and summed with the trail displacement. Leave it unset on the engine to
/// disable the channel entirely.
#[derive(Clone, Copy, Debug)]
pub struct PresenceConfig {
    /// Maximum simultaneous presence entries (extra actors are dropped).
    pub capacity: usize,
    /// World-space influence radius of a present actor.
    pub radius: f32,
    /// Displacement applied at full weight.
    pub strength: f32,
}

impl PresenceConfig {
    /// Create a presence configuration with the default tuning.
    pub fn new() -> Self {
        Self {
            capacity: 16,
            radius: 1.0,
            strength: 0.5,
        }
    }

    /// Set the maximum simultaneous presence entries.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity >= 1, "Presence channel needs at least one slot");
        self.capacity = capacity;
        self
    }

    /// Set the presence influence radius.
    pub fn with_radius(mut self, radius: f32) -> Self {
        assert!(radius > 0.0, "Presence radius must be positive");
        self.radius = radius;
        self
    }

    /// Set the presence displacement strength.
    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for surface point generation.
///
/// The surface is a square of half-size `extent` centered on the origin,
/// carrying `points_per_axis²` anchors on a jittered grid.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceConfig {
    /// Half-size of the covered square (from `-extent` to `+extent`).
    pub extent: f32,
    /// Anchor count per axis (total anchors = `points_per_axis²`).
    pub points_per_axis: u32,
    /// Fraction of a grid cell each anchor may jitter from its cell center.
    pub jitter: f32,
    /// RNG seed for deterministic layouts; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl SurfaceConfig {
    /// Create a surface configuration.
    ///
    /// # Memory Guidance
    ///
    /// Anchor count grows quadratically: 160 per axis is 25 600 points,
    /// 320 per axis is 102 400.
    pub fn new(extent: f32, points_per_axis: u32) -> Self {
        assert!(extent > 0.0, "Surface extent must be positive");
        assert!(points_per_axis >= 1, "Surface needs at least one point per axis");
        Self {
            extent,
            points_per_axis,
            jitter: 0.8,
            seed: None,
        }
    }

    /// Set the per-cell jitter fraction (clamped to `[0, 1]`).
    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    /// Seed the layout RNG for reproducible anchor placement.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Total number of surface anchors.
    #[inline]
    pub fn total_points(&self) -> usize {
        self.points_per_axis as usize * self.points_per_axis as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_config_defaults() {
        let cfg = TrailConfig::new();
        assert!(cfg.sample_interval_primary > 0.0);
        assert!(cfg.hold_time > 0.0);
        assert!(cfg.fade_time > 0.0);
        assert!(cfg.trail_slots >= cfg.primary_capacity.min(cfg.trail_slots));
        assert!((cfg.total_window() - (cfg.hold_time + cfg.fade_time)).abs() < 1e-6);
    }

    #[test]
    fn test_trail_config_builder() {
        let cfg = TrailConfig::new()
            .with_hold_time(1.0)
            .with_fade_time(2.0)
            .with_influence_radius(3.0)
            .with_strength(0.4)
            .with_trail_slots(32)
            .with_primary_capacity(20)
            .with_secondary_capacity(10);

        assert!((cfg.hold_time - 1.0).abs() < 1e-6);
        assert!((cfg.fade_time - 2.0).abs() < 1e-6);
        assert!((cfg.influence_radius - 3.0).abs() < 1e-6);
        assert!((cfg.strength - 0.4).abs() < 1e-6);
        assert_eq!(cfg.trail_slots, 32);
        assert_eq!(cfg.primary_capacity, 20);
        assert_eq!(cfg.secondary_capacity, 10);
    }

    #[test]
    fn test_trail_config_fade_time_floor() {
        let cfg = TrailConfig::new().with_fade_time(0.0);
        assert!(cfg.fade_time > 0.0);
    }

    #[test]
    fn test_trail_config_negative_intervals_clamp() {
        let cfg = TrailConfig::new()
            .with_sample_interval_primary(-1.0)
            .with_sample_interval_secondary(-1.0)
            .with_move_threshold_sq(-1.0);
        assert_eq!(cfg.sample_interval_primary, 0.0);
        assert_eq!(cfg.sample_interval_secondary, 0.0);
        assert_eq!(cfg.move_threshold_sq, 0.0);
    }

    #[test]
    #[should_panic(expected = "at least one slot")]
    fn test_trail_config_zero_slots() {
        TrailConfig::new().with_trail_slots(0);
    }

    #[test]
    #[should_panic(expected = "radius must be positive")]
    fn test_trail_config_zero_radius() {
        TrailConfig::new().with_influence_radius(0.0);
    }

    #[test]
    fn test_presence_config_builder() {
        let cfg = PresenceConfig::new()
            .with_capacity(8)
            .with_radius(2.0)
            .with_strength(0.25);
        assert_eq!(cfg.capacity, 8);
        assert!((cfg.radius - 2.0).abs() < 1e-6);
        assert!((cfg.strength - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_surface_config_totals() {
        let cfg = SurfaceConfig::new(10.0, 12);
        assert_eq!(cfg.total_points(), 144);
    }

    #[test]
    fn test_surface_config_jitter_clamp() {
        let cfg = SurfaceConfig::new(10.0, 4).with_jitter(2.0);
        assert!((cfg.jitter - 1.0).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "extent must be positive")]
    fn test_surface_config_zero_extent() {
        SurfaceConfig::new(0.0, 4);
    }
}
