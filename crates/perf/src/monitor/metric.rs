//! Immutable record of one timed operation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of a single timed operation.
///
/// Created by the instrumentation wrapper when a call finishes and never
/// mutated afterwards; the monitor drops the oldest records once its
/// bounded log overflows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationMetric {
    /// Scope label, e.g. the service the operation belongs to.
    pub name: String,
    /// Operation identifier.
    pub operation: String,
    /// Wall-clock duration of the call in milliseconds.
    pub duration_ms: f64,
    /// When the record was created.
    pub timestamp: DateTime<Utc>,
    /// Whether the operation returned successfully.
    pub success: bool,
    /// Error description for failed operations.
    pub error: Option<String>,
}

impl OperationMetric {
    /// Record for an operation that returned successfully.
    pub fn succeeded(
        name: impl Into<String>,
        operation: impl Into<String>,
        duration_ms: f64,
    ) -> Self {
        Self {
            name: name.into(),
            operation: operation.into(),
            duration_ms,
            timestamp: Utc::now(),
            success: true,
            error: None,
        }
    }

    /// Record for an operation that failed, carrying the failure's
    /// description.
    pub fn failed(
        name: impl Into<String>,
        operation: impl Into<String>,
        duration_ms: f64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            operation: operation.into(),
            duration_ms,
            timestamp: Utc::now(),
            success: false,
            error: Some(error.into()),
        }
    }
}

impl fmt::Display for OperationMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.success { "ok" } else { "failed" };
        write!(f, "{status} {}: {:.2}ms", self.operation, self.duration_ms)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for monitor::metric.
    use super::*;

    /// Validates `OperationMetric::succeeded` field defaults.
    #[test]
    fn test_succeeded_metric() {
        let metric = OperationMetric::succeeded("telemetry", "load_laps", 10.5);

        assert_eq!(metric.name, "telemetry");
        assert_eq!(metric.operation, "load_laps");
        assert_eq!(metric.duration_ms, 10.5);
        assert!(metric.success);
        assert!(metric.error.is_none());
    }

    /// Validates `OperationMetric::failed` carries the error text.
    #[test]
    fn test_failed_metric() {
        let metric = OperationMetric::failed("telemetry", "load_laps", 3.0, "provider timeout");

        assert!(!metric.success);
        assert_eq!(metric.error.as_deref(), Some("provider timeout"));
    }

    /// Validates the display rendering used by `PerformanceMonitor::stats`.
    #[test]
    fn test_metric_display() {
        let ok = OperationMetric::succeeded("telemetry", "load_laps", 12.345);
        assert_eq!(ok.to_string(), "ok load_laps: 12.35ms");

        let bad = OperationMetric::failed("telemetry", "load_laps", 0.5, "boom");
        assert_eq!(bad.to_string(), "failed load_laps: 0.50ms");
    }
}
