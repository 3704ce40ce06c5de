//! Where the ticker publishes numbers.

use std::sync::Arc;
use tracing::info;

/// Named integer gauges.
pub trait MetricSink {
    fn record(&self, name: &str, value: i64);
}

impl<T: MetricSink + ?Sized> MetricSink for Arc<T> {
    fn record(&self, name: &str, value: i64) {
        (**self).record(name, value)
    }
}

/// Emits one `tracing` event per metric, tagged with the telemetry app
/// name when one is configured.
#[derive(Debug, Clone, Default)]
pub struct TracingMetricSink {
    app_name: Option<String>,
}

impl TracingMetricSink {
    pub fn new(app_name: Option<String>) -> Self {
        Self { app_name }
    }

    pub fn app_name(&self) -> Option<&str> {
        self.app_name.as_deref()
    }
}

impl MetricSink for TracingMetricSink {
    fn record(&self, name: &str, value: i64) {
        match &self.app_name {
            Some(app) => info!(metric = name, value, app = app.as_str(), "metric"),
            None => info!(metric = name, value, "metric"),
        }
    }
}
