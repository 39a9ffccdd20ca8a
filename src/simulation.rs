//! The engine: per-frame orchestration of recorder, packer and evaluator.
//!
//! One [`TrampleField`] owns the whole pipeline. Hosts drive it with a
//! strict per-frame sequence: feed actor positions to [`TrampleField::step`],
//! which records footprints, packs the slot arrays and publishes an
//! immutable [`FieldFrame`] snapshot; then evaluate the published frame —
//! [`TrampleField::evaluate_all`] for the built-in parallel pass over every
//! surface anchor, or [`FieldFrame::displacement_at`] directly from a
//! custom pipeline.
//!
//! # Example
//!
//! ```ignore
//! use trample::prelude::*;
//!
//! let mut field = TrampleField::new(SurfaceConfig::new(25.0, 160))
//!     .with_trails(TrailConfig::new().with_influence_radius(1.2))
//!     .with_presence(PresenceConfig::new());
//!
//! // Once per rendered frame:
//! field.step(FrameInput {
//!     now: clock.tick(),
//!     primary: Some(player_pos),
//!     grounded: player_grounded,
//!     secondary: &crate_positions,
//! });
//! for out in field.evaluate_all() {
//!     // displace geometry by out.displacement * tipness(v), scale by
//!     // out.height_scale, cull when out.hidden
//! }
//! ```

use std::sync::Arc;

use glam::Vec2;
use rayon::prelude::*;

use crate::config::{PresenceConfig, SurfaceConfig, TrailConfig};
use crate::field::FieldFrame;
use crate::packer::{PackedSlots, PresenceSlots};
use crate::recorder::{ActorId, FootprintRecorder};
use crate::surface::{PatchMask, SurfaceLayout, SurfacePoint};

/// One frame of actor state fed to the engine.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput<'a> {
    /// Current time in seconds on the host's simulation timeline.
    pub now: f32,
    /// Primary actor ground position, if one exists this frame.
    pub primary: Option<Vec2>,
    /// Whether the primary actor is touching the ground. Airborne frames
    /// record nothing.
    pub grounded: bool,
    /// Secondary actor positions with stable identities. Order may change
    /// freely between frames.
    pub secondary: &'a [(ActorId, Vec2)],
}

/// Per-anchor evaluation result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointOutput {
    /// Tip-level trail displacement (scale per vertex by
    /// [`crate::surface::tipness`]).
    pub displacement: Vec2,
    /// Whether the patch mask hides this anchor entirely.
    pub hidden: bool,
    /// Height multiplier from the patch mask.
    pub height_scale: f32,
}

/// Trail-driven ground-cover deformation engine.
///
/// Couples a [`FootprintRecorder`], the slot packer, an immutable surface
/// layout and a [`PatchMask`]. Each [`step`](Self::step) publishes a fresh
/// read-only [`FieldFrame`]; the previous frame stays valid for as long as
/// anyone holds its `Arc`, so in-flight evaluation passes never observe a
/// partial update.
pub struct TrampleField {
    trail_config: TrailConfig,
    presence_config: Option<PresenceConfig>,
    recorder: FootprintRecorder,
    surface: SurfaceLayout,
    mask: PatchMask,
    frame: Arc<FieldFrame>,
}

impl TrampleField {
    /// Create an engine over a freshly generated surface with default
    /// trail settings and no presence channel.
    pub fn new(surface: SurfaceConfig) -> Self {
        let trail_config = TrailConfig::new();
        Self {
            recorder: FootprintRecorder::new(trail_config),
            surface: SurfaceLayout::generate(&surface),
            mask: PatchMask::new(),
            frame: Arc::new(FieldFrame::new(
                0.0,
                PackedSlots::new(trail_config.trail_slots),
                trail_config,
                None,
            )),
            trail_config,
            presence_config: None,
        }
    }

    /// Replace the trail configuration.
    ///
    /// Resets the recorder, so any accumulated history is discarded.
    pub fn with_trails(mut self, config: TrailConfig) -> Self {
        self.trail_config = config;
        self.recorder = FootprintRecorder::new(config);
        self.frame = Arc::new(FieldFrame::new(
            0.0,
            PackedSlots::new(config.trail_slots),
            config,
            None,
        ));
        self
    }

    /// Enable the instantaneous presence channel.
    pub fn with_presence(mut self, config: PresenceConfig) -> Self {
        self.presence_config = Some(config);
        self
    }

    /// Replace the patch mask.
    pub fn with_patch_mask(mut self, mask: PatchMask) -> Self {
        self.mask = mask;
        self
    }

    /// Advance one frame: record, pack, publish.
    ///
    /// Runs the recorder on the input, serializes both trails into a fresh
    /// slot array (primary first, sentinels after), refreshes the presence
    /// channel from the current secondary positions, and publishes the
    /// result as the new current frame. Returns the published snapshot.
    pub fn step(&mut self, input: FrameInput<'_>) -> Arc<FieldFrame> {
        self.recorder
            .record(input.now, input.primary, input.grounded, input.secondary);

        let mut slots = PackedSlots::new(self.trail_config.trail_slots);
        slots.pack(
            input.now,
            self.recorder.primary_trail(),
            self.recorder.secondary_trail(),
        );

        let presence = self.presence_config.map(|config| {
            let mut presence = PresenceSlots::new(config.capacity);
            presence.fill(input.secondary.iter().map(|&(_, pos)| pos));
            (presence, config)
        });

        self.frame = Arc::new(FieldFrame::new(
            input.now,
            slots,
            self.trail_config,
            presence,
        ));
        Arc::clone(&self.frame)
    }

    /// The most recently published frame.
    #[inline]
    pub fn frame(&self) -> Arc<FieldFrame> {
        Arc::clone(&self.frame)
    }

    /// The immutable surface layout.
    #[inline]
    pub fn surface(&self) -> &SurfaceLayout {
        &self.surface
    }

    /// The patch mask in use.
    #[inline]
    pub fn patch_mask(&self) -> &PatchMask {
        &self.mask
    }

    /// The recorder, for trail inspection.
    #[inline]
    pub fn recorder(&self) -> &FootprintRecorder {
        &self.recorder
    }

    /// Evaluate every surface anchor against the published frame, in
    /// parallel.
    ///
    /// Each anchor is independent, so the pass fans out across the rayon
    /// thread pool; results come back in anchor order.
    pub fn evaluate_all(&self) -> Vec<PointOutput> {
        let frame: &FieldFrame = &self.frame;
        let mask = self.mask;
        self.surface
            .points()
            .par_iter()
            .map(|point| evaluate_point(frame, &mask, point))
            .collect()
    }
}

fn evaluate_point(frame: &FieldFrame, mask: &PatchMask, point: &SurfacePoint) -> PointOutput {
    let (hidden, height_scale) = mask.visibility(point);
    PointOutput {
        displacement: frame.displacement_at(point.pos),
        hidden,
        height_scale,
    }
}
