use std::sync::atomic::{AtomicUsize, Ordering};

/// Process-wide warehouse counters. Latency is accumulated in microseconds.
#[derive(Debug, Default)]
pub struct ExecutorMetrics {
    pub queries_executed: AtomicUsize,
    pub queries_failed: AtomicUsize,
    pub empty_results: AtomicUsize,
    pub rows_returned: AtomicUsize,
    pub total_query_time: AtomicUsize,
}

impl ExecutorMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_success(&self, duration: usize, rows: usize) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
        self.total_query_time.fetch_add(duration, Ordering::Relaxed);
        self.rows_returned.fetch_add(rows, Ordering::Relaxed);
        if rows == 0 {
            self.empty_results.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn update_failure(&self) {
        self.queries_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total number of queries (both successful and failed)
    pub fn total_queries(&self) -> usize {
        self.queries_executed.load(Ordering::Relaxed) + self.queries_failed.load(Ordering::Relaxed)
    }

    /// Get average query duration in microseconds
    pub fn average_query_duration(&self) -> Option<usize> {
        let total = self.queries_executed.load(Ordering::Relaxed);
        if total == 0 {
            None
        } else {
            Some(self.total_query_time.load(Ordering::Relaxed) / total)
        }
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let total = self.total_queries();
        if total == 0 {
            100.0
        } else {
            let successful = self.queries_executed.load(Ordering::Relaxed);
            (successful as f64 / total as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_outcomes() {
        let metrics = ExecutorMetrics::new();
        assert_eq!(metrics.average_query_duration(), None);
        assert_eq!(metrics.success_rate(), 100.0);

        metrics.update_success(300, 2);
        metrics.update_success(100, 0);
        metrics.update_failure();
        metrics.update_failure();

        assert_eq!(metrics.total_queries(), 4);
        assert_eq!(metrics.average_query_duration(), Some(200));
        assert_eq!(metrics.success_rate(), 50.0);
        assert_eq!(metrics.empty_results.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.rows_returned.load(Ordering::Relaxed), 2);
    }
}
