use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::streaming::AggregatedResponse;

/// Counters for generation requests and the fragments they produced
///
/// Thread-safe atomic counters, shared by every request handled by one recommender.
#[derive(Default)]
pub struct RecommendationMetrics {
    /// Total number of generation requests
    pub total_requests: AtomicU64,

    /// Requests that produced an aggregated answer
    pub successful_requests: AtomicU64,

    /// Requests that failed (validation, upstream, strict aggregation)
    pub failed_requests: AtomicU64,

    /// Fragments consumed by successful requests
    pub fragments: AtomicU64,

    /// Fragments that carried no text
    pub missing_fragments: AtomicU64,

    /// Total latency of successful requests in microseconds
    pub total_latency_us: AtomicU64,
}

impl RecommendationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful generation
    pub fn record_success(&self, response: &AggregatedResponse, latency: Duration) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.successful_requests.fetch_add(1, Ordering::Relaxed);
        self.fragments
            .fetch_add(response.fragments as u64, Ordering::Relaxed);
        self.missing_fragments
            .fetch_add(response.missing as u64, Ordering::Relaxed);
        self.total_latency_us
            .fetch_add(latency.as_micros() as u64, Ordering::Relaxed);
    }

    /// Record a failed generation
    pub fn record_failure(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.failed_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Get average latency of successful requests in microseconds
    pub fn avg_latency_us(&self) -> u64 {
        let total = self.total_latency_us.load(Ordering::Relaxed);
        let count = self.successful_requests.load(Ordering::Relaxed);
        if count > 0 { total / count } else { 0 }
    }

    /// Get success rate as percentage
    pub fn success_rate(&self) -> f64 {
        let total = self.total_requests.load(Ordering::Relaxed);
        let successful = self.successful_requests.load(Ordering::Relaxed);
        if total > 0 {
            (successful as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Get snapshot of current metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            fragments: self.fragments.load(Ordering::Relaxed),
            missing_fragments: self.missing_fragments.load(Ordering::Relaxed),
            avg_latency_us: self.avg_latency_us(),
            success_rate: self.success_rate(),
        }
    }
}

/// Immutable snapshot of metrics at a point in time
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub fragments: u64,
    pub missing_fragments: u64,
    pub avg_latency_us: u64,
    pub success_rate: f64,
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Recommendation Metrics: {} requests ({:.1}% success), {} fragments, {} without text, avg {:.2}ms",
            self.total_requests,
            self.success_rate,
            self.fragments,
            self.missing_fragments,
            self.avg_latency_us as f64 / 1000.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn response(fragments: usize, missing: usize) -> AggregatedResponse {
        AggregatedResponse {
            text: String::new(),
            fragments,
            missing,
        }
    }

    #[test]
    fn test_record_success() {
        let metrics = RecommendationMetrics::new();

        metrics.record_success(&response(4, 1), Duration::from_micros(100));
        metrics.record_success(&response(2, 0), Duration::from_micros(300));

        assert_eq!(metrics.total_requests.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.fragments.load(Ordering::Relaxed), 6);
        assert_eq!(metrics.missing_fragments.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.avg_latency_us(), 200);
    }

    #[test]
    fn test_success_rate() {
        let metrics = RecommendationMetrics::new();
        assert_eq!(metrics.success_rate(), 0.0);

        metrics.record_success(&response(1, 0), Duration::from_micros(50));
        metrics.record_success(&response(1, 0), Duration::from_micros(50));
        metrics.record_success(&response(1, 0), Duration::from_micros(50));
        metrics.record_failure();

        assert_eq!(metrics.success_rate(), 75.0);
        assert_eq!(metrics.snapshot().failed_requests, 1);
    }

    #[test]
    fn test_thread_safety() {
        let metrics = Arc::new(RecommendationMetrics::new());

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let m = Arc::clone(&metrics);
                thread::spawn(move || m.record_failure())
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(metrics.total_requests.load(Ordering::Relaxed), 10);
    }

    #[test]
    fn test_display_format() {
        let snapshot = MetricsSnapshot {
            total_requests: 20,
            successful_requests: 19,
            failed_requests: 1,
            fragments: 180,
            missing_fragments: 3,
            avg_latency_us: 1500,
            success_rate: 95.0,
        };

        let output = snapshot.to_string();
        assert!(output.contains("20 requests"));
        assert!(output.contains("95.0% success"));
        assert!(output.contains("3 without text"));
        assert!(output.contains("1.50ms"));
    }
}
