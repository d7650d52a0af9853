use std::collections::VecDeque;
use std::time::Duration;

/// Number of recent page durations kept for the moving average
pub const WINDOW_CAPACITY: usize = 5;

/// Moving-average ETA over the most recent page durations
///
/// Samples are kept in a fixed-capacity FIFO window; once full, each new
/// observation evicts the oldest one.
#[derive(Debug, Clone, Default)]
pub struct ProgressEstimator {
    window: VecDeque<f64>,
}

impl ProgressEstimator {
    /// Creates an estimator with an empty window
    pub fn new() -> Self {
        Self {
            window: VecDeque::with_capacity(WINDOW_CAPACITY),
        }
    }

    /// Pushes a per-page duration in seconds
    pub fn observe(&mut self, seconds: f64) {
        if self.window.len() == WINDOW_CAPACITY {
            self.window.pop_front();
        }
        self.window.push_back(seconds);
    }

    /// Pushes a per-page duration
    pub fn observe_duration(&mut self, duration: Duration) {
        self.observe(duration.as_secs_f64());
    }

    /// The samples currently in the window, oldest first
    pub fn samples(&self) -> Vec<f64> {
        self.window.iter().copied().collect()
    }

    /// Average of the window, or 0.0 before the first observation
    pub fn average(&self) -> f64 {
        if self.window.is_empty() {
            return 0.0;
        }
        self.window.iter().sum::<f64>() / self.window.len() as f64
    }

    /// Estimated seconds left: `(total_estimate - completed) * average`
    ///
    /// Returns 0.0 once `completed` has caught up with the estimate.
    pub fn estimate_remaining(&self, completed: usize, total_estimate: usize) -> f64 {
        total_estimate.saturating_sub(completed) as f64 * self.average()
    }
}
