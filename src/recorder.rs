//! Footprint recorder: rate-limited, movement-gated sampling of actor
//! positions into the two trail histories.
//!
//! The recorder is fed once per frame with the primary actor's position and
//! grounded flag plus the current secondary-actor positions. It decides
//! which samples become footprints:
//!
//! - the primary actor is sampled on a fixed time interval, and only while
//!   grounded, so airborne frames leave no marks;
//! - each secondary actor is sampled when it has moved far enough from its
//!   last recorded position, and the footprint holds the *old* position —
//!   the mark it leaves behind — so stationary or jittering actors never
//!   flood the trail.
//!
//! Secondary actors are tracked by stable [`ActorId`], not list position,
//! so the list may grow, shrink or reorder between frames without
//! misattributing footprints.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use glam::Vec2;
use log::warn;

use crate::config::TrailConfig;
use crate::footprint::{Footprint, Trail};

/// Stable identity for a secondary actor.
///
/// Hosts assign these once per actor (any scheme works as long as ids are
/// unique and stable across frames) and pass them with every position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ActorId(pub u64);

/// Records actor movement into bounded trail histories.
#[derive(Debug)]
pub struct FootprintRecorder {
    config: TrailConfig,
    primary: Trail,
    secondary: Trail,
    last_primary_sample: Option<f32>,
    last_secondary_sample: Option<f32>,
    remembered: HashMap<ActorId, Vec2>,
}

impl FootprintRecorder {
    /// Create a recorder with empty trails sized from `config`.
    pub fn new(config: TrailConfig) -> Self {
        Self {
            primary: Trail::new(config.primary_capacity),
            secondary: Trail::new(config.secondary_capacity),
            last_primary_sample: None,
            last_secondary_sample: None,
            remembered: HashMap::new(),
            config,
        }
    }

    /// Feed one frame of actor positions into the trails.
    ///
    /// `primary` is `None` when no primary sample is available this frame.
    /// Non-finite positions (NaN or infinite) are skipped for the frame and
    /// never corrupt trail history; nothing here fails outward.
    pub fn record(
        &mut self,
        now: f32,
        primary: Option<Vec2>,
        grounded: bool,
        secondary: &[(ActorId, Vec2)],
    ) {
        if !now.is_finite() {
            warn!("Skipping footprint recording: non-finite timestamp {now}");
            return;
        }

        self.record_primary(now, primary, grounded);
        self.record_secondary(now, secondary);

        // Keep both histories inside their windows even on frames where
        // nothing was appended.
        let window = self.config.total_window();
        self.primary.prune(now, window);
        self.secondary.prune(now, window);
    }

    fn record_primary(&mut self, now: f32, primary: Option<Vec2>, grounded: bool) {
        let Some(pos) = primary else { return };
        if !pos.is_finite() {
            warn!("Skipping primary sample: non-finite position {pos:?}");
            return;
        }
        if !grounded {
            return;
        }
        let due = self
            .last_primary_sample
            .map_or(true, |last| now - last > self.config.sample_interval_primary);
        if !due {
            return;
        }
        self.primary
            .record(Footprint::new(pos, now), now, self.config.total_window());
        self.last_primary_sample = Some(now);
    }

    fn record_secondary(&mut self, now: f32, actors: &[(ActorId, Vec2)]) {
        let due = self
            .last_secondary_sample
            .map_or(true, |last| now - last > self.config.sample_interval_secondary);
        let threshold = self.config.move_threshold_sq;
        let window = self.config.total_window();

        for &(id, pos) in actors {
            if !pos.is_finite() {
                warn!("Skipping secondary sample for {id:?}: non-finite position {pos:?}");
                continue;
            }
            match self.remembered.entry(id) {
                Entry::Occupied(mut entry) => {
                    let prev = entry.get_mut();
                    if due && pos.distance_squared(*prev) > threshold {
                        // The footprint is the mark left behind: the old
                        // position, stamped at the current time.
                        self.secondary
                            .record(Footprint::new(*prev, now), now, window);
                        *prev = pos;
                    }
                }
                // First sighting starts tracking without a footprint.
                Entry::Vacant(entry) => {
                    entry.insert(pos);
                }
            }
        }

        if due {
            self.last_secondary_sample = Some(now);
        }

        // Drop tracking state for actors that vanished from the list.
        self.remembered
            .retain(|id, _| actors.iter().any(|(sid, _)| sid == id));
    }

    /// The primary actor's trail, oldest-first.
    #[inline]
    pub fn primary_trail(&self) -> &Trail {
        &self.primary
    }

    /// The aggregated secondary trail, oldest-first.
    #[inline]
    pub fn secondary_trail(&self) -> &Trail {
        &self.secondary
    }

    /// Number of secondary actors currently tracked.
    #[inline]
    pub fn tracked_actors(&self) -> usize {
        self.remembered.len()
    }

    /// The configuration this recorder was built with.
    #[inline]
    pub fn config(&self) -> &TrailConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> FootprintRecorder {
        FootprintRecorder::new(
            TrailConfig::new()
                .with_sample_interval_primary(0.1)
                .with_sample_interval_secondary(0.0)
                .with_move_threshold_sq(0.25)
                .with_hold_time(2.0)
                .with_fade_time(3.0),
        )
    }

    #[test]
    fn test_primary_requires_grounded() {
        let mut rec = recorder();
        rec.record(0.0, Some(Vec2::ZERO), false, &[]);
        assert!(rec.primary_trail().is_empty());

        rec.record(0.2, Some(Vec2::ZERO), true, &[]);
        assert_eq!(rec.primary_trail().len(), 1);
    }

    #[test]
    fn test_primary_interval_gate() {
        let mut rec = recorder();
        rec.record(0.0, Some(Vec2::ZERO), true, &[]);
        // 0.05s later: inside the 0.1s interval, no new sample.
        rec.record(0.05, Some(Vec2::ONE), true, &[]);
        assert_eq!(rec.primary_trail().len(), 1);
        // 0.15s after the first sample: due again.
        rec.record(0.15, Some(Vec2::ONE), true, &[]);
        assert_eq!(rec.primary_trail().len(), 2);
    }

    #[test]
    fn test_primary_none_is_noop() {
        let mut rec = recorder();
        rec.record(0.0, None, true, &[]);
        assert!(rec.primary_trail().is_empty());
    }

    #[test]
    fn test_non_finite_positions_skipped() {
        let mut rec = recorder();
        rec.record(0.0, Some(Vec2::new(f32::NAN, 0.0)), true, &[]);
        assert!(rec.primary_trail().is_empty());

        let id = ActorId(1);
        rec.record(0.1, None, false, &[(id, Vec2::new(f32::INFINITY, 0.0))]);
        assert_eq!(rec.tracked_actors(), 0);

        // A later finite sample records normally.
        rec.record(0.3, Some(Vec2::ZERO), true, &[(id, Vec2::ZERO)]);
        assert_eq!(rec.primary_trail().len(), 1);
        assert_eq!(rec.tracked_actors(), 1);
    }

    #[test]
    fn test_non_finite_timestamp_skips_frame() {
        let mut rec = recorder();
        rec.record(f32::NAN, Some(Vec2::ZERO), true, &[]);
        assert!(rec.primary_trail().is_empty());
    }

    #[test]
    fn test_secondary_movement_gate_records_old_position() {
        let mut rec = recorder();
        let id = ActorId(7);

        // First sighting: tracked, no footprint.
        rec.record(0.0, None, false, &[(id, Vec2::new(1.0, 1.0))]);
        assert!(rec.secondary_trail().is_empty());

        // Small jitter under the 0.5-unit threshold: still nothing.
        rec.record(0.1, None, false, &[(id, Vec2::new(1.1, 1.0))]);
        assert!(rec.secondary_trail().is_empty());

        // A real move: the footprint holds the position left behind.
        rec.record(0.2, None, false, &[(id, Vec2::new(3.0, 1.0))]);
        assert_eq!(rec.secondary_trail().len(), 1);
        let fp = rec.secondary_trail().iter().next().unwrap();
        assert_eq!(fp.pos, Vec2::new(1.0, 1.0));
        assert!((fp.t - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_secondary_stationary_actor_never_floods() {
        let mut rec = recorder();
        let id = ActorId(2);
        for i in 0..100 {
            rec.record(i as f32 * 0.05, None, false, &[(id, Vec2::new(4.0, 4.0))]);
        }
        assert!(rec.secondary_trail().is_empty());
    }

    #[test]
    fn test_secondary_identity_survives_reordering() {
        let mut rec = recorder();
        let a = ActorId(1);
        let b = ActorId(2);
        rec.record(0.0, None, false, &[(a, Vec2::ZERO), (b, Vec2::new(10.0, 0.0))]);
        // Same actors, swapped list order, only `b` moved.
        rec.record(
            0.1,
            None,
            false,
            &[(b, Vec2::new(12.0, 0.0)), (a, Vec2::ZERO)],
        );
        assert_eq!(rec.secondary_trail().len(), 1);
        let fp = rec.secondary_trail().iter().next().unwrap();
        assert_eq!(fp.pos, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_secondary_removed_actor_state_dropped() {
        let mut rec = recorder();
        let id = ActorId(3);
        rec.record(0.0, None, false, &[(id, Vec2::ZERO)]);
        assert_eq!(rec.tracked_actors(), 1);

        rec.record(0.1, None, false, &[]);
        assert_eq!(rec.tracked_actors(), 0);

        // Re-added at a distant position: treated as a fresh sighting, so
        // no footprint bridges the gap.
        rec.record(0.2, None, false, &[(id, Vec2::new(50.0, 50.0))]);
        assert!(rec.secondary_trail().is_empty());
    }

    #[test]
    fn test_secondary_interval_gate() {
        let mut rec = FootprintRecorder::new(
            TrailConfig::new()
                .with_sample_interval_secondary(1.0)
                .with_move_threshold_sq(0.25),
        );
        let id = ActorId(4);
        rec.record(0.0, None, false, &[(id, Vec2::ZERO)]);
        // Moves during the closed gate leave no footprints...
        rec.record(0.5, None, false, &[(id, Vec2::new(5.0, 0.0))]);
        assert!(rec.secondary_trail().is_empty());
        // ...but the accumulated movement registers once the gate opens.
        rec.record(1.5, None, false, &[(id, Vec2::new(10.0, 0.0))]);
        assert_eq!(rec.secondary_trail().len(), 1);
        assert_eq!(
            rec.secondary_trail().iter().next().unwrap().pos,
            Vec2::ZERO
        );
    }

    #[test]
    fn test_capacity_invariant_many_records() {
        let mut rec = FootprintRecorder::new(
            TrailConfig::new()
                .with_sample_interval_primary(0.0)
                .with_primary_capacity(8)
                .with_secondary_capacity(4)
                .with_move_threshold_sq(0.0),
        );
        let id = ActorId(9);
        for i in 0..200 {
            let t = i as f32 * 0.01;
            let pos = Vec2::new(i as f32, 0.0);
            rec.record(t, Some(pos), true, &[(id, pos)]);
        }
        assert!(rec.primary_trail().len() <= 8);
        assert!(rec.secondary_trail().len() <= 4);
        let window = rec.config().total_window();
        let now = 2.0;
        for f in rec.primary_trail().iter().chain(rec.secondary_trail().iter()) {
            assert!(f.age(now) < window);
        }
    }
}
