//! Bounded history of state fingerprints for stagnation and cycle detection.

use std::collections::VecDeque;

/// Fixed-capacity ring buffer of `u64` state fingerprints.
///
/// Pushing onto a full buffer evicts the oldest entry, so memory stays
/// bounded no matter how long a simulation runs.
///
/// # Example
///
/// ```
/// use neogrid_core::FingerprintHistory;
///
/// let mut history = FingerprintHistory::new(3);
/// for fp in [1, 2, 3, 4] {
///     history.push(fp);
/// }
/// assert_eq!(history.len(), 3);
/// assert_eq!(history.occurrences(1), 0);
/// assert_eq!(history.latest(), Some(4));
/// ```
#[derive(Debug, Clone)]
pub struct FingerprintHistory {
    entries: VecDeque<u64>,
    capacity: usize,
}

impl FingerprintHistory {
    /// Creates an empty history holding at most `capacity` fingerprints.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum number of fingerprints kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of fingerprints currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true once the buffer holds `capacity` fingerprints.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Records a fingerprint, evicting the oldest if full.
    pub fn push(&mut self, fingerprint: u64) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(fingerprint);
    }

    /// Most recent fingerprint.
    pub fn latest(&self) -> Option<u64> {
        self.entries.back().copied()
    }

    /// How many times `fingerprint` appears in the buffer.
    pub fn occurrences(&self, fingerprint: u64) -> usize {
        self.entries.iter().filter(|&&fp| fp == fingerprint).count()
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates fingerprints oldest first.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.iter().copied()
    }

    /// Returns true if the last `window` fingerprints repeat an earlier run.
    ///
    /// Candidate runs start at `0..len - 2 * window`, so they never overlap
    /// the tail being matched. Needs at least `2 * window` entries.
    pub fn repeats_tail(&self, window: usize) -> bool {
        let len = self.entries.len();
        if window == 0 || len < 2 * window {
            return false;
        }

        let tail_start = len - window;
        (0..len - 2 * window).any(|start| {
            self.entries
                .range(start..start + window)
                .eq(self.entries.range(tail_start..))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest() {
        let mut history = FingerprintHistory::new(2);
        history.push(10);
        history.push(20);
        history.push(30);
        assert_eq!(history.iter().collect::<Vec<_>>(), vec![20, 30]);
        assert!(history.is_full());
    }

    #[test]
    fn test_zero_capacity_stays_empty() {
        let mut history = FingerprintHistory::new(0);
        history.push(1);
        assert!(history.is_empty());
    }

    #[test]
    fn test_occurrences() {
        let mut history = FingerprintHistory::new(10);
        for fp in [1, 2, 1, 2, 1] {
            history.push(fp);
        }
        assert_eq!(history.occurrences(1), 3);
        assert_eq!(history.occurrences(2), 2);
        assert_eq!(history.occurrences(3), 0);
    }

    #[test]
    fn test_repeats_tail_detects_period() {
        let mut history = FingerprintHistory::new(100);
        // Period-3 sequence; window 3 needs one full earlier copy that does
        // not touch the tail.
        for i in 0..9 {
            history.push(i % 3);
        }
        assert!(history.repeats_tail(3));
    }

    #[test]
    fn test_repeats_tail_ignores_fresh_sequence() {
        let mut history = FingerprintHistory::new(100);
        for i in 0..40 {
            history.push(i);
        }
        assert!(!history.repeats_tail(5));
    }

    #[test]
    fn test_repeats_tail_needs_two_windows() {
        let mut history = FingerprintHistory::new(100);
        for _ in 0..5 {
            history.push(7);
        }
        // len 5 < 2 * 3
        assert!(!history.repeats_tail(3));
    }
}
