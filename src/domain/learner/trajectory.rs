//! Bounded window of recent capability scores.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::capability::{clamp_score, Trend};

/// Default number of scores kept in the trajectory window.
pub const DEFAULT_WINDOW_CAPACITY: usize = 10;

/// Fixed-capacity FIFO of past capability scores, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryWindow {
    capacity: usize,
    scores: VecDeque<f64>,
}

impl TrajectoryWindow {
    /// Creates an empty window. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            scores: VecDeque::with_capacity(capacity),
        }
    }

    /// Builds a window from scores, keeping only the most recent `capacity`.
    pub fn from_scores(capacity: usize, scores: impl IntoIterator<Item = f64>) -> Self {
        let mut window = Self::new(capacity);
        for score in scores {
            window.push(score);
        }
        window
    }

    /// Appends a score, evicting the oldest when full.
    pub fn push(&mut self, score: f64) {
        while self.scores.len() >= self.capacity {
            self.scores.pop_front();
        }
        self.scores.push_back(clamp_score(score));
    }

    /// Returns a copy with `score` appended.
    pub fn with_pushed(&self, score: f64) -> Self {
        let mut next = self.clone();
        next.push(score);
        next
    }

    /// Changes capacity, evicting the oldest scores if shrinking.
    pub fn resize(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.scores.len() > self.capacity {
            self.scores.pop_front();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn latest(&self) -> Option<f64> {
        self.scores.back().copied()
    }

    pub fn scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.scores.iter().copied()
    }

    /// Mean of every score in the window.
    pub fn mean(&self) -> Option<f64> {
        mean(self.scores.iter().copied(), self.scores.len())
    }

    /// Classifies the trend by comparing the mean of the recent half of the
    /// window with the mean of the earlier half.
    ///
    /// With an odd number of samples the middle score belongs to neither
    /// half. Fewer than two samples is always [`Trend::Stable`].
    pub fn trend(&self, threshold: f64) -> Trend {
        let n = self.scores.len();
        if n < 2 {
            return Trend::Stable;
        }
        let half = n / 2;
        let earlier = mean(self.scores.iter().take(half).copied(), half);
        let recent = mean(self.scores.iter().skip(n - half).copied(), half);

        match (earlier, recent) {
            (Some(earlier), Some(recent)) => {
                let change = recent - earlier;
                if change > threshold {
                    Trend::Improving
                } else if change < -threshold {
                    Trend::Declining
                } else {
                    Trend::Stable
                }
            }
            _ => Trend::Stable,
        }
    }
}

impl Default for TrajectoryWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAPACITY)
    }
}

fn mean(values: impl Iterator<Item = f64>, count: usize) -> Option<f64> {
    if count == 0 {
        return None;
    }
    Some(values.sum::<f64>() / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn push_evicts_oldest_when_full() {
        let mut window = TrajectoryWindow::new(3);
        for score in [10.0, 20.0, 30.0, 40.0] {
            window.push(score);
        }
        assert_eq!(window.scores().collect::<Vec<_>>(), vec![20.0, 30.0, 40.0]);
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn push_clamps_scores() {
        let mut window = TrajectoryWindow::new(2);
        window.push(140.0);
        window.push(-3.0);
        assert_eq!(window.scores().collect::<Vec<_>>(), vec![100.0, 0.0]);
    }

    #[test]
    fn single_sample_is_stable() {
        let window = TrajectoryWindow::from_scores(10, [90.0]);
        assert_eq!(window.trend(2.0), Trend::Stable);
    }

    #[test]
    fn rising_scores_are_improving() {
        let window = TrajectoryWindow::from_scores(10, [40.0, 45.0, 50.0, 55.0]);
        assert_eq!(window.trend(2.0), Trend::Improving);
    }

    #[test]
    fn falling_scores_are_declining() {
        let window = TrajectoryWindow::from_scores(10, [60.0, 55.0, 50.0, 45.0]);
        assert_eq!(window.trend(2.0), Trend::Declining);
    }

    #[test]
    fn small_changes_stay_stable() {
        let window = TrajectoryWindow::from_scores(10, [50.0, 51.0, 50.0, 51.0]);
        assert_eq!(window.trend(2.0), Trend::Stable);
    }

    #[test]
    fn odd_window_ignores_middle_sample() {
        // Middle sample 0.0 would drag either half down if it were counted.
        let window = TrajectoryWindow::from_scores(10, [50.0, 0.0, 50.0]);
        assert_eq!(window.trend(2.0), Trend::Stable);
    }

    #[test]
    fn resize_keeps_most_recent() {
        let mut window = TrajectoryWindow::from_scores(5, [1.0, 2.0, 3.0, 4.0, 5.0]);
        window.resize(2);
        assert_eq!(window.scores().collect::<Vec<_>>(), vec![4.0, 5.0]);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let window = TrajectoryWindow::from_scores(0, [1.0, 2.0]);
        assert_eq!(window.capacity(), 1);
        assert_eq!(window.latest(), Some(2.0));
    }

    proptest! {
        #[test]
        fn strictly_increasing_never_declines(
            start in 0.0f64..50.0,
            steps in proptest::collection::vec(0.01f64..5.0, 2..12),
            threshold in 0.0f64..5.0,
        ) {
            let mut score = start;
            let mut window = TrajectoryWindow::new(10);
            window.push(score);
            for step in steps {
                score += step;
                window.push(score);
            }
            prop_assert_ne!(window.trend(threshold), Trend::Declining);
        }
    }
}
