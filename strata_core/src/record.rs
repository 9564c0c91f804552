// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change-recording strategies for scoped save/restore.
//!
//! A *change recorder* stores the pre-scope baseline of a field so that
//! scope exit can put it back. Two strategies exist:
//!
//! - [`ValueRecorder`] — a plain LIFO stack of whole values. Cheap for
//!   small, frequently toggled fields; one entry per open scope that has
//!   modified the field.
//! - [`DeltaRecorder`] — per-index LIFO stacks for large sparse collections
//!   (the texture-unit table). A scope that rebinds 2 of 64 units pays O(2)
//!   to save and restore, not O(64).
//!
//! Both enforce strict stack discipline: a restore without a matching save
//! is a caller bug and panics.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

/// Which recording strategy a field registers with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Whole-value LIFO stack ([`ValueRecorder`]).
    Stack,
    /// Sparse per-index stacks ([`DeltaRecorder`]).
    Delta,
}

/// Whole-value baseline stack for one field.
///
/// Invariant: the depth equals the number of currently open scopes that have
/// actually modified the field.
#[derive(Clone, Debug)]
pub struct ValueRecorder<T> {
    entries: Vec<T>,
}

impl<T> ValueRecorder<T> {
    /// Creates an empty recorder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Pushes a baseline for the scope that is about to modify the field.
    pub fn save(&mut self, value: T) {
        self.entries.push(value);
    }

    /// Pops the most recent baseline.
    ///
    /// # Panics
    ///
    /// Panics if no baseline is saved; restores must mirror saves.
    pub fn restore(&mut self) -> T {
        match self.entries.pop() {
            Some(value) => value,
            None => panic!("restore without a matching save"),
        }
    }

    /// Returns the number of saved baselines.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.entries.len()
    }
}

impl<T> Default for ValueRecorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sparse per-index baseline stacks for an indexed collection.
///
/// Overlapping indices touched by nested scopes follow the same LIFO
/// discipline as [`ValueRecorder`], keyed by index: each scope pushes at most
/// one baseline per index it touches, and scope exit pops in reverse.
#[derive(Clone, Debug)]
pub struct DeltaRecorder<T> {
    stacks: BTreeMap<u32, Vec<T>>,
}

impl<T> DeltaRecorder<T> {
    /// Creates an empty recorder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stacks: BTreeMap::new(),
        }
    }

    /// Pushes a baseline for `index`.
    pub fn save(&mut self, index: u32, value: T) {
        self.stacks.entry(index).or_default().push(value);
    }

    /// Pops the most recent baseline for `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` has no saved baseline.
    pub fn restore(&mut self, index: u32) -> T {
        let Some(stack) = self.stacks.get_mut(&index) else {
            panic!("restore of index {index} without a matching save");
        };
        let value = match stack.pop() {
            Some(value) => value,
            None => panic!("restore of index {index} without a matching save"),
        };
        // Keep the map as sparse as the touched set.
        if stack.is_empty() {
            self.stacks.remove(&index);
        }
        value
    }

    /// Returns the number of saved baselines for `index`.
    #[must_use]
    pub fn depth(&self, index: u32) -> usize {
        self.stacks.get(&index).map_or(0, Vec::len)
    }

    /// Returns the number of indices with at least one saved baseline.
    #[must_use]
    pub fn touched_indices(&self) -> usize {
        self.stacks.len()
    }
}

impl<T> Default for DeltaRecorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_recorder_is_lifo() {
        let mut recorder = ValueRecorder::new();
        recorder.save(1);
        recorder.save(2);
        assert_eq!(recorder.depth(), 2);
        assert_eq!(recorder.restore(), 2);
        assert_eq!(recorder.restore(), 1);
        assert_eq!(recorder.depth(), 0);
    }

    #[test]
    #[should_panic(expected = "restore without a matching save")]
    fn value_recorder_underflow_panics() {
        let mut recorder: ValueRecorder<u32> = ValueRecorder::new();
        let _ = recorder.restore();
    }

    #[test]
    fn delta_recorder_tracks_per_index() {
        let mut recorder = DeltaRecorder::new();
        recorder.save(3, "a");
        recorder.save(60, "b");
        assert_eq!(recorder.touched_indices(), 2);
        assert_eq!(recorder.restore(60), "b");
        assert_eq!(recorder.restore(3), "a");
        assert_eq!(recorder.touched_indices(), 0);
    }

    #[test]
    fn delta_recorder_overlapping_indices_are_lifo() {
        // Two nested scopes touching the same unit: inner's restore must see
        // the inner baseline, outer's the outer one.
        let mut recorder = DeltaRecorder::new();
        recorder.save(7, "outer");
        recorder.save(7, "inner");
        assert_eq!(recorder.depth(7), 2);
        assert_eq!(recorder.restore(7), "inner");
        assert_eq!(recorder.restore(7), "outer");
        assert_eq!(recorder.depth(7), 0);
    }

    #[test]
    #[should_panic(expected = "without a matching save")]
    fn delta_recorder_underflow_panics() {
        let mut recorder: DeltaRecorder<u32> = DeltaRecorder::new();
        let _ = recorder.restore(5);
    }
}
