//! Request counters for the HTTP boundary.
//!
//! The detection core is stateless; everything counted here is owned by the
//! caller that serves requests and reported through `/metrics`.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::analysis::classifier::Classification;
use crate::analysis::features::FeaturePath;
use crate::analysis::DetectionReport;
use crate::error::DetectionError;

/// Snapshot of counter state for HTTP/CLI reporting.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CountersSnapshot {
    pub requests_total: u64,
    pub spectral_path: u64,
    pub entropy_path: u64,
    pub ai_generated: u64,
    pub human_authentic: u64,
    pub invalid_encoding: u64,
    pub insufficient_data: u64,
    pub processing_errors: u64,
    pub rejected_requests: u64,
    pub latency: LatencySnapshot,
}

/// Rolling processing-time statistics in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LatencySnapshot {
    pub avg_ms: f64,
    pub max_ms: f64,
    pub sample_count: usize,
}

/// Latency tracker maintains a rolling window to compute avg/max latency.
struct LatencyTracker {
    samples: VecDeque<f64>,
    max_samples: usize,
}

impl LatencyTracker {
    fn new(max_samples: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(max_samples),
            max_samples,
        }
    }

    fn observe(&mut self, value_ms: f64) {
        if self.samples.len() == self.max_samples {
            self.samples.pop_front();
        }
        self.samples.push_back(value_ms);
    }

    fn snapshot(&self) -> LatencySnapshot {
        let sample_count = self.samples.len();
        if sample_count == 0 {
            return LatencySnapshot::default();
        }
        let sum: f64 = self.samples.iter().sum();
        let max_ms = self.samples.iter().copied().fold(0.0_f64, f64::max);
        LatencySnapshot {
            avg_ms: sum / sample_count as f64,
            max_ms,
            sample_count,
        }
    }
}

/// Lock-free request counters plus a small latency window.
pub struct DetectionCounters {
    requests_total: AtomicU64,
    spectral_path: AtomicU64,
    entropy_path: AtomicU64,
    ai_generated: AtomicU64,
    human_authentic: AtomicU64,
    invalid_encoding: AtomicU64,
    insufficient_data: AtomicU64,
    processing_errors: AtomicU64,
    rejected_requests: AtomicU64,
    latency: Mutex<LatencyTracker>,
}

impl DetectionCounters {
    pub fn new(latency_window: usize) -> Self {
        Self {
            requests_total: AtomicU64::new(0),
            spectral_path: AtomicU64::new(0),
            entropy_path: AtomicU64::new(0),
            ai_generated: AtomicU64::new(0),
            human_authentic: AtomicU64::new(0),
            invalid_encoding: AtomicU64::new(0),
            insufficient_data: AtomicU64::new(0),
            processing_errors: AtomicU64::new(0),
            rejected_requests: AtomicU64::new(0),
            latency: Mutex::new(LatencyTracker::new(latency_window.max(1))),
        }
    }

    /// Record a completed pipeline run.
    pub fn record_report(&self, report: &DetectionReport, elapsed: Duration) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        match report.feature.path {
            FeaturePath::Spectral => self.spectral_path.fetch_add(1, Ordering::Relaxed),
            FeaturePath::Entropy => self.entropy_path.fetch_add(1, Ordering::Relaxed),
        };
        match report.result.label {
            Classification::AiGenerated => self.ai_generated.fetch_add(1, Ordering::Relaxed),
            Classification::HumanAuthentic => self.human_authentic.fetch_add(1, Ordering::Relaxed),
        };
        self.observe_latency(elapsed);
    }

    /// Record a pipeline run that ended in a terminal error.
    pub fn record_error(&self, error: &DetectionError) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        let counter = match error {
            DetectionError::InvalidEncoding { .. } => &self.invalid_encoding,
            DetectionError::InsufficientData { .. } => &self.insufficient_data,
            DetectionError::Processing { .. } | DetectionError::InvalidConfig { .. } => {
                &self.processing_errors
            }
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a request refused before it reached the pipeline (auth, language, body).
    pub fn record_rejected(&self) {
        self.rejected_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CountersSnapshot {
        let latency = match self.latency.lock() {
            Ok(tracker) => tracker.snapshot(),
            Err(poisoned) => poisoned.into_inner().snapshot(),
        };
        CountersSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            spectral_path: self.spectral_path.load(Ordering::Relaxed),
            entropy_path: self.entropy_path.load(Ordering::Relaxed),
            ai_generated: self.ai_generated.load(Ordering::Relaxed),
            human_authentic: self.human_authentic.load(Ordering::Relaxed),
            invalid_encoding: self.invalid_encoding.load(Ordering::Relaxed),
            insufficient_data: self.insufficient_data.load(Ordering::Relaxed),
            processing_errors: self.processing_errors.load(Ordering::Relaxed),
            rejected_requests: self.rejected_requests.load(Ordering::Relaxed),
            latency,
        }
    }

    fn observe_latency(&self, elapsed: Duration) {
        let value_ms = elapsed.as_secs_f64() * 1000.0;
        match self.latency.lock() {
            Ok(mut tracker) => tracker.observe(value_ms),
            Err(poisoned) => poisoned.into_inner().observe(value_ms),
        }
    }
}

impl Default for DetectionCounters {
    fn default() -> Self {
        Self::new(128)
    }
}
