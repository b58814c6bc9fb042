// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use serde::{Deserialize, Serialize};

/// Half-open interval `[from, to)` of task indices owned by one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexRange {
    pub from: usize,
    pub to: usize,
}

impl IndexRange {
    pub fn new(from: usize, to: usize) -> Self {
        debug_assert!(from <= to, "range start {} past its end {}", from, to);
        Self { from, to }
    }

    pub fn len(&self) -> usize {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    pub fn contains(&self, index: usize) -> bool {
        self.from <= index && index < self.to
    }
}

/// Splits `[0, total)` into `groups` contiguous ranges, laid out left to right.
///
/// Groups are sized from the right: the last group takes `total / groups`
/// items and the remainder is split the same way among the groups before it,
/// so the integer-division remainder lands on the leftmost groups. Sizes never
/// differ by more than one.
///
/// `groups == 0` yields no ranges; `total == 0` yields `groups` empty ranges.
pub fn partition(total: usize, groups: usize) -> Vec<IndexRange> {
    if groups == 0 {
        return Vec::new();
    }

    let mut ranges = Vec::with_capacity(groups);
    let mut remaining = total;

    for group in (2..=groups).rev() {
        let size = remaining / group;
        ranges.push(IndexRange::new(remaining - size, remaining));
        remaining -= size;
    }
    ranges.push(IndexRange::new(0, remaining));

    ranges.reverse();
    ranges
}
