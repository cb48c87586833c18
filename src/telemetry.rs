//! Stage telemetry
//!
//! Fire-and-forget sink for per-stage timing. A sink must never block or
//! fail the pipeline; `record` takes `&self` and returns nothing.

use std::sync::Mutex;
use std::time::Duration;

/// One pipeline stage observation
#[derive(Debug, Clone)]
pub struct StageRecord {
    pub stage: &'static str,
    pub duration: Duration,
    pub success: bool,
    pub error: Option<String>,
}

/// Telemetry sink collaborator
pub trait TelemetrySink: Send + Sync {
    fn record(&self, record: StageRecord);
}

/// Sink that emits structured tracing events
#[derive(Debug, Default)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
    fn record(&self, record: StageRecord) {
        if record.success {
            tracing::info!(
                stage = record.stage,
                duration_ms = record.duration.as_millis() as u64,
                "stage completed"
            );
        } else {
            tracing::warn!(
                stage = record.stage,
                duration_ms = record.duration.as_millis() as u64,
                error = record.error.as_deref().unwrap_or("unknown"),
                "stage failed"
            );
        }
    }
}

/// Sink that records in memory, for assertions in tests
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<StageRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<StageRecord> {
        self.records.lock().expect("telemetry lock").clone()
    }

    pub fn stages(&self) -> Vec<&'static str> {
        self.records().iter().map(|r| r.stage).collect()
    }
}

impl TelemetrySink for MemorySink {
    fn record(&self, record: StageRecord) {
        self.records.lock().expect("telemetry lock").push(record);
    }
}
