//! Packing the trail histories into fixed-capacity, flat slot arrays.
//!
//! The evaluation stage — CPU fold or GPU compute pass — consumes a single
//! fixed-length array of `(position, age)` slots rather than the trails
//! themselves. Once per frame the packer serializes both trails into that
//! array: the primary trail first, from slot 0 in chronological order, then
//! the secondary trail into whatever capacity remains. The primary actor's
//! influence is therefore never displaced by secondary actors when slots
//! are scarce.
//!
//! Unfilled slots hold a sentinel (`+inf` position, `+inf` age) that the
//! falloff functions evaluate to exactly zero influence, so the evaluator
//! can scan the whole array unconditionally.
//!
//! The backing storage is two flat `f32` arrays — interleaved `x,z` pairs
//! and ages — chosen so a frame can be uploaded to a GPU as raw words with
//! no conversion pass.

use glam::Vec2;

use crate::footprint::Trail;

/// Sentinel value marking an unused slot.
///
/// Placed infinitely far away and infinitely old, a sentinel slot is
/// guaranteed zero weight under both falloffs for any finite query point.
pub const SENTINEL: f32 = f32::INFINITY;

/// Fixed-capacity flat array of `(position, age)` slots.
///
/// Rebuilt once per frame by [`PackedSlots::pack`]; read-only for the
/// duration of the evaluation pass that consumes it.
#[derive(Clone, Debug)]
pub struct PackedSlots {
    /// Interleaved `x, z` pairs, `2 * len` values.
    positions: Vec<f32>,
    /// Seconds since each footprint was recorded, `len` values.
    ages: Vec<f32>,
    len: usize,
}

impl PackedSlots {
    /// Create an array of `len` slots, all sentinel.
    pub fn new(len: usize) -> Self {
        assert!(len >= 1, "Packed slot array needs at least one slot");
        Self {
            positions: vec![SENTINEL; len * 2],
            ages: vec![SENTINEL; len],
            len,
        }
    }

    /// Serialize both trails into the slots, primary first.
    ///
    /// Walks the primary trail chronologically from slot 0, continues with
    /// the secondary trail into the remaining capacity, and fills whatever
    /// is left with sentinels. Ages are computed against `now`.
    pub fn pack(&mut self, now: f32, primary: &Trail, secondary: &Trail) {
        let mut cursor = 0;
        for footprint in primary.iter().chain(secondary.iter()) {
            if cursor == self.len {
                break;
            }
            self.positions[cursor * 2] = footprint.pos.x;
            self.positions[cursor * 2 + 1] = footprint.pos.y;
            self.ages[cursor] = now - footprint.t;
            cursor += 1;
        }
        for i in cursor..self.len {
            self.positions[i * 2] = SENTINEL;
            self.positions[i * 2 + 1] = SENTINEL;
            self.ages[i] = SENTINEL;
        }
    }

    /// Number of slots (live and sentinel).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array has zero slots. Never true for a constructed array.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Position stored in slot `i`.
    #[inline]
    pub fn position(&self, i: usize) -> Vec2 {
        Vec2::new(self.positions[i * 2], self.positions[i * 2 + 1])
    }

    /// Age stored in slot `i`.
    #[inline]
    pub fn age(&self, i: usize) -> f32 {
        self.ages[i]
    }

    /// Whether slot `i` holds a live footprint rather than a sentinel.
    #[inline]
    pub fn is_live(&self, i: usize) -> bool {
        self.ages[i].is_finite()
    }

    /// Raw interleaved `x, z` array for upload.
    #[inline]
    pub fn raw_positions(&self) -> &[f32] {
        &self.positions
    }

    /// Raw age array for upload.
    #[inline]
    pub fn raw_ages(&self) -> &[f32] {
        &self.ages
    }
}

/// Fixed-capacity array of instantaneous actor positions.
///
/// The second evaluation channel: no history and no aging, just where the
/// secondary actors are right now. Refreshed every frame from the current
/// positions; unused slots hold the same zero-influence sentinel.
#[derive(Clone, Debug)]
pub struct PresenceSlots {
    positions: Vec<f32>,
    len: usize,
}

impl PresenceSlots {
    /// Create an array of `len` presence slots, all sentinel.
    pub fn new(len: usize) -> Self {
        assert!(len >= 1, "Presence slot array needs at least one slot");
        Self {
            positions: vec![SENTINEL; len * 2],
            len,
        }
    }

    /// Refresh the slots from the current actor positions.
    ///
    /// Takes positions in iteration order until capacity is reached; the
    /// rest of the array becomes sentinels. Non-finite positions are
    /// skipped (they would otherwise poison the distance computation).
    pub fn fill<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = Vec2>,
    {
        let mut cursor = 0;
        for pos in positions {
            if cursor == self.len {
                break;
            }
            if !pos.is_finite() {
                continue;
            }
            self.positions[cursor * 2] = pos.x;
            self.positions[cursor * 2 + 1] = pos.y;
            cursor += 1;
        }
        for i in cursor..self.len {
            self.positions[i * 2] = SENTINEL;
            self.positions[i * 2 + 1] = SENTINEL;
        }
    }

    /// Number of slots (live and sentinel).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array has zero slots. Never true for a constructed array.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Position stored in slot `i`.
    #[inline]
    pub fn position(&self, i: usize) -> Vec2 {
        Vec2::new(self.positions[i * 2], self.positions[i * 2 + 1])
    }

    /// Raw interleaved `x, z` array for upload.
    #[inline]
    pub fn raw_positions(&self) -> &[f32] {
        &self.positions
    }
}
