//! Surface anchors, the tipness weight, and the patch mask.
//!
//! Surface points are the static anchors of the deformable elements (grass
//! blades, reeds, tufts). They are generated once on a jittered grid and
//! never mutated; everything per-frame about them is *computed*, not
//! stored. The patch mask is the independent, stateless gate deciding
//! whether an anchor carries a visible element at all and how tall it
//! grows — it never looks at trail state.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::SurfaceConfig;

/// A static surface anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfacePoint {
    /// World-space ground position (x, z).
    pub pos: Vec2,
    /// Per-anchor randomness in `[0, 1]`, fixed at creation. Feeds height
    /// variation so neighboring elements don't read as a uniform carpet.
    pub height_randomness: f32,
}

/// Weight of the trail displacement along a deformable element.
///
/// 0.0 at the rooted base, 1.0 at the free tip, quadratic in between so
/// the lower half of an element barely moves. Geometry stages multiply the
/// frame's displacement by this per vertex.
#[inline]
pub fn tipness(height_fraction: f32) -> f32 {
    let h = height_fraction.clamp(0.0, 1.0);
    h * h
}

/// The immutable set of surface anchors covering the ground extent.
///
/// Generated once at initialization; the engine evaluates displacement for
/// every anchor every frame but never changes one.
#[derive(Clone, Debug)]
pub struct SurfaceLayout {
    points: Vec<SurfacePoint>,
    extent: f32,
}

impl SurfaceLayout {
    /// Generate anchors on a jittered grid over the configured extent.
    ///
    /// With a configured seed the layout is fully deterministic; otherwise
    /// it is seeded from entropy.
    pub fn generate(config: &SurfaceConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let n = config.points_per_axis;
        let cell = 2.0 * config.extent / n as f32;
        let max_offset = 0.5 * config.jitter * cell;

        let mut points = Vec::with_capacity(config.total_points());
        for iz in 0..n {
            for ix in 0..n {
                let cx = -config.extent + (ix as f32 + 0.5) * cell;
                let cz = -config.extent + (iz as f32 + 0.5) * cell;
                let jx = if max_offset > 0.0 {
                    rng.gen_range(-max_offset..max_offset)
                } else {
                    0.0
                };
                let jz = if max_offset > 0.0 {
                    rng.gen_range(-max_offset..max_offset)
                } else {
                    0.0
                };
                points.push(SurfacePoint {
                    pos: Vec2::new(cx + jx, cz + jz),
                    height_randomness: rng.gen(),
                });
            }
        }

        Self {
            points,
            extent: config.extent,
        }
    }

    /// All anchors, row-major over the generation grid.
    #[inline]
    pub fn points(&self) -> &[SurfacePoint] {
        &self.points
    }

    /// Number of anchors.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the layout has no anchors. Never true for a generated one.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Half-size of the covered square.
    #[inline]
    pub fn extent(&self) -> f32 {
        self.extent
    }
}

/// Stateless low-frequency visibility and height gate.
///
/// Patchiness is the sum of two orthogonal sinusoids of world position,
/// normalized to `[0, 1]`. Anchors whose patchiness falls below the
/// threshold carry no visible element (the render stage pushes them out of
/// the visible volume); the rest scale their height by patchiness and the
/// anchor's stored randomness.
#[derive(Clone, Copy, Debug)]
pub struct PatchMask {
    /// Angular frequency of the two sinusoids (per world unit, x and z).
    pub frequency: Vec2,
    /// Patchiness below which an anchor is hidden.
    pub threshold: f32,
    /// How much of the height range the per-anchor randomness spans
    /// (`0.0` = uniform height, `1.0` = full range).
    pub height_variation: f32,
}

impl PatchMask {
    /// Create a patch mask with the default tuning.
    pub fn new() -> Self {
        Self {
            frequency: Vec2::new(0.31, 0.23),
            threshold: 0.35,
            height_variation: 0.5,
        }
    }

    /// Set the sinusoid frequencies (x and z, per world unit).
    pub fn with_frequency(mut self, fx: f32, fz: f32) -> Self {
        self.frequency = Vec2::new(fx, fz);
        self
    }

    /// Set the hide threshold (clamped to `[0, 1]`).
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the height-variation span (clamped to `[0, 1]`).
    pub fn with_height_variation(mut self, variation: f32) -> Self {
        self.height_variation = variation.clamp(0.0, 1.0);
        self
    }

    /// Patchiness at a world position, in `[0, 1]`.
    #[inline]
    pub fn patchiness(&self, pos: Vec2) -> f32 {
        0.5 + 0.25 * ((pos.x * self.frequency.x).sin() + (pos.y * self.frequency.y).sin())
    }

    /// Visibility and height scale for an anchor.
    ///
    /// Returns `(hidden, height_scale)`; `height_scale` is meaningful even
    /// for hidden anchors (hosts may fade elements in and out as the
    /// camera or threshold moves).
    pub fn visibility(&self, point: &SurfacePoint) -> (bool, f32) {
        let patchiness = self.patchiness(point.pos);
        let hidden = patchiness < self.threshold;
        let randomness = point.height_randomness.clamp(0.0, 1.0);
        let height_scale =
            patchiness * (1.0 - self.height_variation + self.height_variation * randomness);
        (hidden, height_scale)
    }
}

impl Default for PatchMask {
    fn default() -> Self {
        Self::new()
    }
}
