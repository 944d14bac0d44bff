//! Rolling record of provider calls: latency and success, bounded to the
//! most recent `window` calls.

use std::{collections::VecDeque, future::Future, time::Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::warn;

pub const DEFAULT_WINDOW: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CallMetric {
    pub timestamp: DateTime<Utc>,
    pub latency_ms: f64,
    pub succeeded: bool,
}

/// Point-in-time availability and latency readout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HealthReadout {
    pub availability_ratio: f64,
    pub latest_latency_ms: Option<f64>,
    pub samples: usize,
    pub window: usize,
}

#[derive(Debug)]
pub struct ObservabilityRecorder {
    window: usize,
    calls: Mutex<VecDeque<CallMetric>>,
}

impl Default for ObservabilityRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl ObservabilityRecorder {
    /// A `window` of zero is treated as one.
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            calls: Mutex::new(VecDeque::with_capacity(window)),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn record(&self, latency_ms: f64, succeeded: bool) {
        let latency_ms = if latency_ms.is_finite() { latency_ms.max(0.0) } else { 0.0 };

        let mut calls = self.calls.lock();
        if calls.len() == self.window {
            calls.pop_front();
        }
        calls.push_back(CallMetric {
            timestamp: Utc::now(),
            latency_ms,
            succeeded,
        });
    }

    /// Share of successful calls in the window; 1.0 before any traffic.
    pub fn availability_ratio(&self) -> f64 {
        let calls = self.calls.lock();
        if calls.is_empty() {
            return 1.0;
        }
        let ok = calls.iter().filter(|c| c.succeeded).count();
        ok as f64 / calls.len() as f64
    }

    pub fn latest_latency(&self) -> Option<f64> {
        self.calls.lock().back().map(|c| c.latency_ms)
    }

    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    /// Oldest first.
    pub fn snapshot(&self) -> Vec<CallMetric> {
        self.calls.lock().iter().copied().collect()
    }

    pub fn readout(&self) -> HealthReadout {
        let calls = self.calls.lock();
        let samples = calls.len();
        let availability_ratio = if samples == 0 {
            1.0
        } else {
            calls.iter().filter(|c| c.succeeded).count() as f64 / samples as f64
        };

        HealthReadout {
            availability_ratio,
            latest_latency_ms: calls.back().map(|c| c.latency_ms),
            samples,
            window: self.window,
        }
    }

    /// Await `call`, recording its wall time and whether it returned `Ok`.
    pub async fn time<T, E, F>(&self, call: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let started = Instant::now();
        let result = call.await;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        if let Err(err) = &result {
            warn!(latency_ms, error = %err, "provider call failed");
        }
        self.record(latency_ms, result.is_ok());

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optimistic_before_any_call() {
        let recorder = ObservabilityRecorder::default();

        assert_eq!(recorder.availability_ratio(), 1.0);
        assert_eq!(recorder.latest_latency(), None);
        assert!(recorder.is_empty());
    }

    #[test]
    fn success_then_failure() {
        let recorder = ObservabilityRecorder::default();

        recorder.record(120.0, true);
        recorder.record(80.0, false);

        assert_eq!(recorder.latest_latency(), Some(80.0));
        assert!((recorder.availability_ratio() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn ratio_is_successes_over_total() {
        let recorder = ObservabilityRecorder::new(10);
        for _ in 0..3 {
            recorder.record(10.0, true);
        }
        for _ in 0..5 {
            recorder.record(10.0, false);
        }

        assert!((recorder.availability_ratio() - 3.0 / 8.0).abs() < 1e-9);
    }

    #[test]
    fn oldest_entry_is_evicted_first() {
        let recorder = ObservabilityRecorder::new(3);
        for latency in [1.0, 2.0, 3.0, 4.0] {
            recorder.record(latency, true);
        }

        let latencies: Vec<_> = recorder.snapshot().iter().map(|c| c.latency_ms).collect();
        assert_eq!(recorder.len(), 3);
        assert_eq!(latencies, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn outage_rolls_out_of_the_window() {
        let recorder = ObservabilityRecorder::new(2);
        recorder.record(5.0, false);
        recorder.record(5.0, true);
        recorder.record(5.0, true);

        assert_eq!(recorder.availability_ratio(), 1.0);
    }

    #[test]
    fn invalid_latencies_are_clamped() {
        let recorder = ObservabilityRecorder::new(4);
        recorder.record(-3.0, true);
        assert_eq!(recorder.latest_latency(), Some(0.0));
        recorder.record(f64::NAN, true);
        assert_eq!(recorder.latest_latency(), Some(0.0));
    }

    #[test]
    fn zero_window_keeps_one_entry() {
        let recorder = ObservabilityRecorder::new(0);
        recorder.record(1.0, false);
        recorder.record(2.0, true);

        assert_eq!(recorder.window(), 1);
        assert_eq!(recorder.len(), 1);
        assert_eq!(recorder.availability_ratio(), 1.0);
    }

    #[test]
    fn readout_matches_accessors() {
        let recorder = ObservabilityRecorder::new(5);
        recorder.record(40.0, true);
        recorder.record(60.0, false);

        let readout = recorder.readout();
        assert_eq!(readout.samples, 2);
        assert_eq!(readout.window, 5);
        assert_eq!(readout.latest_latency_ms, recorder.latest_latency());
        assert_eq!(readout.availability_ratio, recorder.availability_ratio());
    }

    #[tokio::test]
    async fn time_records_outcome() {
        let recorder = ObservabilityRecorder::default();

        let ok: Result<u8, String> = recorder.time(async { Ok(7) }).await;
        let err: Result<u8, String> = recorder.time(async { Err("boom".to_string()) }).await;

        assert_eq!(ok, Ok(7));
        assert_eq!(err, Err("boom".to_string()));
        let calls = recorder.snapshot();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].succeeded);
        assert!(!calls[1].succeeded);
        assert!(calls.iter().all(|c| c.latency_ms >= 0.0));
    }
}
