//! # Trample - trail-driven ground cover deformation
//!
//! A render-agnostic engine for a living ground surface: a dense field of
//! vegetation elements that bends where actors have recently walked,
//! springs back as the marks age out, and grows in patches rather than a
//! uniform carpet.
//!
//! The engine records *footprints* (position + time samples) from a
//! primary actor and any number of secondary actors, packs the recent
//! history into a fixed-capacity slot array once per frame, and evaluates
//! a displacement vector at every surface anchor — tens of thousands of
//! them — against that array. Rendering stays outside: the output is a
//! displacement field your geometry stage applies however it draws.
//!
//! ## Quick Start
//!
//! ```ignore
//! use trample::prelude::*;
//!
//! let mut field = TrampleField::new(SurfaceConfig::new(25.0, 160))
//!     .with_trails(
//!         TrailConfig::new()
//!             .with_influence_radius(1.2)
//!             .with_hold_time(2.0)
//!             .with_fade_time(3.0),
//!     )
//!     .with_presence(PresenceConfig::new());
//!
//! let mut clock = FrameClock::new();
//! loop {
//!     field.step(FrameInput {
//!         now: clock.tick(),
//!         primary: Some(player_position),
//!         grounded: player_grounded,
//!         secondary: &object_positions, // [(ActorId, Vec2)]
//!     });
//!
//!     for (point, out) in field.surface().points().iter().zip(field.evaluate_all()) {
//!         // bend the element at `point` by `out.displacement`, scaled per
//!         // vertex with tipness(); hide it when `out.hidden`.
//!     }
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Footprints and Trails
//!
//! The [`FootprintRecorder`] samples the primary actor on a time interval
//! (only while grounded) and secondary actors on a movement gate keyed by
//! stable [`ActorId`]s — a stationary crate never floods the history. Each
//! trail is bounded and time-pruned: old entries fall off the front, and
//! nothing survives past `hold_time + fade_time`.
//!
//! ### The packed slot array
//!
//! Once per frame the trails are serialized into one flat array of
//! `(position, age)` slots, primary trail first so it is never crowded out
//! by secondary actors. Unused slots hold an infinite sentinel that the
//! falloffs evaluate to exactly zero, and the whole frame is published as
//! an immutable snapshot — evaluation never observes a partial update.
//!
//! ### Evaluation
//!
//! For each surface point, influence falls off smoothly in space (zero at
//! the influence radius) and in time (full strength through the hold
//! window, fading to zero afterwards). Overlapping footprints do **not**
//! add up; the single strongest contribution wins, which caps displacement
//! at one full-strength footprint no matter how busy an area gets. The
//! same fold runs on the CPU (`rayon` across anchors) or as generated WGSL
//! on the GPU.
//!
//! ### Patch mask
//!
//! Independent of any trail state, a low-frequency sinusoid mask decides
//! which anchors carry visible elements at all and how tall they grow.

pub mod config;
pub mod error;
pub mod field;
pub mod footprint;
pub mod gpu;
pub mod packer;
pub mod recorder;
pub mod simulation;
pub mod surface;
pub mod time;

pub use bytemuck;
pub use config::{PresenceConfig, SurfaceConfig, TrailConfig};
pub use error::GpuError;
pub use field::{
    presence_displacement, smoothstep, spatial_falloff, temporal_falloff, trail_displacement,
    FieldFrame, DISTANCE_EPS,
};
pub use footprint::{Footprint, Trail};
pub use glam::Vec2;
pub use gpu::GpuEvaluator;
pub use packer::{PackedSlots, PresenceSlots, SENTINEL};
pub use recorder::{ActorId, FootprintRecorder};
pub use simulation::{FrameInput, PointOutput, TrampleField};
pub use surface::{tipness, PatchMask, SurfaceLayout, SurfacePoint};
pub use time::FrameClock;

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use trample::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{PresenceConfig, SurfaceConfig, TrailConfig};
    pub use crate::field::FieldFrame;
    pub use crate::gpu::GpuEvaluator;
    pub use crate::recorder::ActorId;
    pub use crate::simulation::{FrameInput, PointOutput, TrampleField};
    pub use crate::surface::{tipness, PatchMask, SurfaceLayout, SurfacePoint};
    pub use crate::time::FrameClock;
    pub use crate::Vec2;
}
