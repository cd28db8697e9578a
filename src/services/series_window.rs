//! Bounded, time-ordered window of recent price samples.

use crate::types::{PriceSample, SeriesSnapshot};
use std::collections::VecDeque;

/// What a push did to the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Sample appended, nothing evicted.
    Appended,
    /// Sample appended and this many oldest samples dropped.
    Evicted(usize),
    /// Timestamp equal to the last sample; window unchanged.
    Duplicate,
    /// Timestamp older than the last sample; window unchanged.
    OutOfOrder,
}

impl PushOutcome {
    /// Whether the sample was stored.
    pub fn accepted(&self) -> bool {
        matches!(self, PushOutcome::Appended | PushOutcome::Evicted(_))
    }
}

/// Sorted, duplicate-free, capacity-bounded price history.
#[derive(Debug, Clone)]
pub struct SeriesWindow {
    samples: VecDeque<PriceSample>,
    capacity: usize,
}

impl SeriesWindow {
    /// Create an empty window holding at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Build a window from existing history, applying the push rules to
    /// every sample in order.
    pub fn from_samples(capacity: usize, samples: impl IntoIterator<Item = PriceSample>) -> Self {
        let mut window = Self::new(capacity);
        for sample in samples {
            window.push(sample);
        }
        window
    }

    /// Append a sample.
    ///
    /// A sample whose timestamp equals the last retained one is dropped, as is
    /// one that would break ascending order. Oldest samples are evicted until
    /// the window fits its capacity.
    pub fn push(&mut self, sample: PriceSample) -> PushOutcome {
        if let Some(last) = self.samples.back() {
            if sample.time == last.time {
                return PushOutcome::Duplicate;
            }
            if sample.time < last.time {
                return PushOutcome::OutOfOrder;
            }
        }

        self.samples.push_back(sample);

        let mut evicted = 0;
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
            evicted += 1;
        }

        if evicted > 0 {
            PushOutcome::Evicted(evicted)
        } else {
            PushOutcome::Appended
        }
    }

    /// Get the number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if no samples are retained.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of retained samples.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Newest sample, if any.
    pub fn last(&self) -> Option<&PriceSample> {
        self.samples.back()
    }

    /// Iterate samples oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &PriceSample> {
        self.samples.iter()
    }

    /// Independent copy of the current contents. Later pushes never alter
    /// a snapshot already handed out.
    pub fn snapshot(&self) -> SeriesSnapshot {
        SeriesSnapshot {
            samples: self.samples.iter().copied().collect(),
            capacity: self.capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: i64, value: f64) -> PriceSample {
        PriceSample::new(time, value)
    }

    #[test]
    fn test_push_appends() {
        let mut window = SeriesWindow::new(3);
        assert_eq!(window.push(sample(1, 10.0)), PushOutcome::Appended);
        assert_eq!(window.push(sample(2, 11.0)), PushOutcome::Appended);
        assert_eq!(window.len(), 2);
        assert_eq!(window.last(), Some(&sample(2, 11.0)));
    }

    #[test]
    fn test_duplicate_timestamp_is_noop() {
        let mut window = SeriesWindow::new(3);
        window.push(sample(5, 10.0));

        assert_eq!(window.push(sample(5, 99.0)), PushOutcome::Duplicate);
        assert_eq!(window.len(), 1);
        assert_eq!(window.last().map(|s| s.value), Some(10.0));
    }

    #[test]
    fn test_out_of_order_is_rejected() {
        let mut window = SeriesWindow::new(3);
        window.push(sample(5, 10.0));

        assert_eq!(window.push(sample(4, 9.0)), PushOutcome::OutOfOrder);
        assert!(!PushOutcome::OutOfOrder.accepted());
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_evicts_oldest_first() {
        let mut window = SeriesWindow::new(3);
        for t in 1..=3 {
            window.push(sample(t, t as f64));
        }

        assert_eq!(window.push(sample(4, 4.0)), PushOutcome::Evicted(1));
        let times: Vec<i64> = window.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![2, 3, 4]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut window = SeriesWindow::new(2);
        window.push(sample(1, 1.0));
        let before = window.snapshot();

        window.push(sample(2, 2.0));
        window.push(sample(3, 3.0));

        assert_eq!(before.samples, vec![sample(1, 1.0)]);
        assert_eq!(window.snapshot().samples, vec![sample(2, 2.0), sample(3, 3.0)]);
    }

    #[test]
    fn test_from_samples_trims_to_capacity() {
        let window = SeriesWindow::from_samples(60, (0..100).map(|t| sample(t, t as f64)));
        assert_eq!(window.len(), 60);
        assert_eq!(window.iter().next().map(|s| s.time), Some(40));
    }

    #[test]
    fn test_invariants_hold_under_mixed_pushes() {
        let mut window = SeriesWindow::new(5);
        let times = [1, 1, 2, 3, 3, 2, 4, 5, 6, 6, 7, 8, 0, 9];
        for t in times {
            window.push(sample(t, t as f64));
            assert!(window.len() <= 5);
            let v: Vec<i64> = window.iter().map(|s| s.time).collect();
            assert!(v.windows(2).all(|w| w[0] < w[1]));
        }
        let v: Vec<i64> = window.iter().map(|s| s.time).collect();
        assert_eq!(v, vec![5, 6, 7, 8, 9]);
    }
}
