use std::sync::Arc;
use std::time::Instant;

use crate::analysis::DetectionPipeline;
use crate::config::ServerConfig;
use crate::telemetry::DetectionCounters;

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<DetectionPipeline>,
    counters: Arc<DetectionCounters>,
    api_key: Arc<String>,
    supported_languages: Arc<Vec<String>>,
    started_at: Instant,
}

impl AppState {
    pub fn new(pipeline: DetectionPipeline, server: &ServerConfig) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            counters: Arc::new(DetectionCounters::default()),
            api_key: Arc::new(server.api_key.clone()),
            supported_languages: Arc::new(server.supported_languages.clone()),
            started_at: Instant::now(),
        }
    }

    pub fn pipeline(&self) -> Arc<DetectionPipeline> {
        Arc::clone(&self.pipeline)
    }

    pub fn counters(&self) -> &DetectionCounters {
        &self.counters
    }

    pub fn uptime_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Match `requested` case-insensitively against the supported languages
    ///
    /// Returns the canonical spelling from configuration.
    pub fn normalize_language(&self, requested: &str) -> Option<String> {
        let requested = requested.trim();
        self.supported_languages
            .iter()
            .find(|language| language.eq_ignore_ascii_case(requested))
            .cloned()
    }
}
