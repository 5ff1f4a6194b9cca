//! Request counters kept by every protocol adapter

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Protocol metrics for monitoring
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProtocolMetrics {
    /// Total requests made
    pub total_requests: u64,
    /// Successful requests
    pub successful_requests: u64,
    /// Failed requests
    pub failed_requests: u64,
    /// Average response time of successful requests in milliseconds
    pub avg_response_time_ms: f64,
    /// Last successful request timestamp
    pub last_success: Option<chrono::DateTime<chrono::Utc>>,
    /// Last failed request timestamp
    pub last_failure: Option<chrono::DateTime<chrono::Utc>>,
    /// Last error message
    pub last_error: Option<String>,
}

impl ProtocolMetrics {
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            return 0.0;
        }
        self.successful_requests as f64 / self.total_requests as f64
    }

    pub fn record_success(&mut self, response_time: Duration) {
        self.total_requests += 1;
        self.successful_requests += 1;
        self.last_success = Some(chrono::Utc::now());

        let total_time = self.avg_response_time_ms * (self.successful_requests - 1) as f64;
        self.avg_response_time_ms =
            (total_time + response_time.as_millis() as f64) / self.successful_requests as f64;
    }

    pub fn record_failure(&mut self, error: &str) {
        self.total_requests += 1;
        self.failed_requests += 1;
        self.last_failure = Some(chrono::Utc::now());
        self.last_error = Some(error.to_string());
    }
}

/// Thread-safe wrapper adapters embed to record each call.
#[derive(Debug, Default)]
pub struct MetricsRecorder {
    inner: Mutex<ProtocolMetrics>,
}

impl MetricsRecorder {
    pub fn snapshot(&self) -> ProtocolMetrics {
        self.inner
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    pub fn reset(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            *metrics = ProtocolMetrics::default();
        }
    }

    /// Runs `fut`, recording its latency or error under `operation`.
    pub async fn measure<T, E, Fut>(&self, protocol: &str, operation: &str, fut: Fut) -> Result<T, E>
    where
        Fut: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let start = Instant::now();
        let result = fut.await;
        let duration = start.elapsed();

        match &result {
            Ok(_) => {
                if let Ok(mut metrics) = self.inner.lock() {
                    metrics.record_success(duration);
                }
                tracing::debug!(
                    protocol,
                    operation,
                    duration_ms = duration.as_millis() as u64,
                    "Operation completed successfully"
                );
            }
            Err(e) => {
                if let Ok(mut metrics) = self.inner.lock() {
                    metrics.record_failure(&e.to_string());
                }
                tracing::error!(
                    protocol,
                    operation,
                    duration_ms = duration.as_millis() as u64,
                    error = %e,
                    "Operation failed"
                );
            }
        }

        result
    }
}
