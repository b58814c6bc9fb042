// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::IndexRange;
use serde::{Deserialize, Serialize};

/// Progress of one slot through its range
///
/// `finished` is the highest index whose output has been folded, `running`
/// the highest index handed to the backend. Both are `None` until the first
/// dispatch/resolution. Invariant: `finished <= running < to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub from: usize,
    pub to: usize,
    pub finished: Option<usize>,
    pub running: Option<usize>,
}

impl ProgressEntry {
    pub fn new(range: IndexRange) -> Self {
        Self {
            from: range.from,
            to: range.to,
            finished: None,
            running: None,
        }
    }

    pub fn range(&self) -> IndexRange {
        IndexRange::new(self.from, self.to)
    }

    /// The index this slot dispatches next
    pub fn next_index(&self) -> usize {
        self.finished.map_or(self.from, |finished| finished + 1)
    }

    /// True once every index in the range has been folded; empty ranges start exhausted
    pub fn is_exhausted(&self) -> bool {
        self.next_index() >= self.to
    }

    /// True when nothing dispatched by this slot is still awaiting the backend
    pub fn is_idle(&self) -> bool {
        self.running == self.finished
    }

    pub fn completed_count(&self) -> usize {
        self.next_index() - self.from
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_entry_points_at_range_start() {
        let entry = ProgressEntry::new(IndexRange::new(4, 7));
        assert_eq!(entry.next_index(), 4);
        assert!(entry.is_idle());
        assert!(!entry.is_exhausted());
        assert_eq!(entry.completed_count(), 0);
    }

    #[test]
    fn empty_range_is_exhausted_without_dispatch() {
        for at in [0, 3, 10] {
            let entry = ProgressEntry::new(IndexRange::new(at, at));
            assert!(entry.is_exhausted());
            assert_eq!(entry.running, None);
        }
    }

    #[test]
    fn in_flight_entry_is_not_idle() {
        let mut entry = ProgressEntry::new(IndexRange::new(0, 2));
        entry.running = Some(0);
        assert!(!entry.is_idle());

        entry.finished = Some(0);
        assert!(entry.is_idle());
        assert_eq!(entry.next_index(), 1);
        assert!(!entry.is_exhausted());

        entry.running = Some(1);
        entry.finished = Some(1);
        assert!(entry.is_exhausted());
        assert_eq!(entry.completed_count(), 2);
    }

    #[test]
    fn serializes_missing_indices_as_null() {
        let entry = ProgressEntry::new(IndexRange::new(0, 1));
        let json = serde_json::to_value(entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"from": 0, "to": 1, "finished": null, "running": null})
        );
    }
}
