//! Footprint samples and the bounded trail history that holds them.
//!
//! A [`Trail`] is an ordered, time-pruned record of where an actor has
//! recently been. Insertion order is chronological order; capacity and age
//! limits are enforced on every append so the trail can never grow past its
//! configured bounds.

use std::collections::VecDeque;

use glam::Vec2;

/// A single recorded position sample.
///
/// Immutable once recorded; the timestamp is the recording time in seconds
/// on whatever timeline the host feeds to the engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    /// World-space ground position (x, z).
    pub pos: Vec2,
    /// Recording time in seconds.
    pub t: f32,
}

impl Footprint {
    /// Create a footprint at `pos` recorded at time `t`.
    #[inline]
    pub fn new(pos: Vec2, t: f32) -> Self {
        Self { pos, t }
    }

    /// Age of this footprint at time `now`.
    #[inline]
    pub fn age(&self, now: f32) -> f32 {
        now - self.t
    }
}

/// Ordered, bounded, time-pruned history of recorded footprints.
///
/// Entries are kept in chronological order. Two limits apply, both enforced
/// whenever the trail changes:
///
/// - entries older than the retention window are purged, and
/// - when the capacity is exceeded the oldest entries are evicted first,
///   regardless of age.
#[derive(Clone, Debug)]
pub struct Trail {
    entries: VecDeque<Footprint>,
    capacity: usize,
}

impl Trail {
    /// Create an empty trail that retains at most `capacity` footprints.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "Trail capacity must be at least 1");
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a footprint, then enforce the age window and capacity.
    ///
    /// `window` is the total retention window in seconds (hold + fade);
    /// entries whose age reaches it are dropped.
    pub fn record(&mut self, footprint: Footprint, now: f32, window: f32) {
        self.entries.push_back(footprint);
        self.prune(now, window);
    }

    /// Drop entries that aged out of `window`, then FIFO-evict down to
    /// capacity.
    ///
    /// Entries are chronological, so stale ones are always at the front.
    pub fn prune(&mut self, now: f32, window: f32) {
        while let Some(front) = self.entries.front() {
            if front.age(now) >= window {
                self.entries.pop_front();
            } else {
                break;
            }
        }
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Number of retained footprints.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the trail holds no footprints.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained footprints.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate footprints oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &Footprint> {
        self.entries.iter()
    }

    /// Remove all footprints.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
