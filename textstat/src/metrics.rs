use crate::model::round_to;
use lazy_static::lazy_static;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

lazy_static! {
    static ref GLOBAL: ProcessingMetrics = ProcessingMetrics::new();
}

/// The process-wide instance. Lives until the process exits.
pub fn global() -> &'static ProcessingMetrics { &GLOBAL }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub files_processed: u64,
    pub min_time_processed: f64,
    pub avg_time_processed: f64,
    pub max_time_processed: f64,
    pub latest_file_processed_timestamp: Option<i64>,
}

#[derive(Default)]
struct Samples {
    times: Vec<f64>,
    latest: Option<i64>,
}

/// Append-only processing-time samples (seconds) behind a lock.
#[derive(Default)]
pub struct ProcessingMetrics {
    inner: Mutex<Samples>,
}

impl ProcessingMetrics {
    pub fn new() -> Self { Self::default() }

    pub fn record(&self, duration: Duration) {
        let now = time::OffsetDateTime::now_utc().unix_timestamp();
        let mut s = self.inner.lock();
        s.times.push(duration.as_secs_f64());
        s.latest = Some(now);
    }

    /// Run `f` and record how long it took.
    pub fn track<T>(&self, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.record(start.elapsed());
        out
    }

    /// Aggregate view; times in seconds rounded to 3 places, zeros when empty.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let s = self.inner.lock();
        if s.times.is_empty() {
            return MetricsSnapshot {
                files_processed: 0,
                min_time_processed: 0.0,
                avg_time_processed: 0.0,
                max_time_processed: 0.0,
                latest_file_processed_timestamp: None,
            };
        }
        let min = s.times.iter().copied().fold(f64::INFINITY, f64::min);
        let max = s.times.iter().copied().fold(0.0, f64::max);
        let avg = s.times.iter().sum::<f64>() / s.times.len() as f64;
        MetricsSnapshot {
            files_processed: s.times.len() as u64,
            min_time_processed: round_to(min, 3),
            avg_time_processed: round_to(avg, 3),
            max_time_processed: round_to(max, 3),
            latest_file_processed_timestamp: s.latest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn empty_snapshot_is_zeroed() {
        let m = ProcessingMetrics::new();
        let s = m.snapshot();
        assert_eq!(s.files_processed, 0);
        assert_eq!(s.max_time_processed, 0.0);
        assert!(s.latest_file_processed_timestamp.is_none());
    }

    #[test]
    fn aggregates_samples() {
        let m = ProcessingMetrics::new();
        m.record(Duration::from_millis(100));
        m.record(Duration::from_millis(300));
        let s = m.snapshot();
        assert_eq!(s.files_processed, 2);
        assert_eq!(s.min_time_processed, 0.1);
        assert_eq!(s.avg_time_processed, 0.2);
        assert_eq!(s.max_time_processed, 0.3);
        assert!(s.latest_file_processed_timestamp.is_some());
    }

    #[test]
    fn concurrent_records_are_all_counted() {
        let m = Arc::new(ProcessingMetrics::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let m = Arc::clone(&m);
                thread::spawn(move || {
                    for _ in 0..100 { m.track(|| ()); }
                })
            })
            .collect();
        for h in handles { h.join().unwrap(); }
        assert_eq!(m.snapshot().files_processed, 800);
    }
}
