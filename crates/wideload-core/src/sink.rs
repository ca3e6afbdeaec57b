//! Report sinks
//!
//! A sink receives the accumulated entries once `report()` decides there
//! is something to emit. The default is [`TracingLogSink`]; a per-instance
//! [`ReportCallback`] registered with `report_using` takes precedence.
//! Sink failures are the sink's concern, the accumulator neither retries
//! nor catches them.

use std::sync::{Arc, Mutex};

use crate::config::LogLevel;
use crate::log_wide_event;
use crate::value::Entries;

/// Custom report target replacing the log sink for one accumulator
pub type ReportCallback = Box<dyn Fn(&Entries) + Send + Sync>;

/// Structured logging boundary used by the default report path
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, message: &str, context: &Entries);
}

/// Writes each report as a single `tracing` event.
///
/// The context is JSON-encoded into the `wide_load` field so that
/// subscribers with a JSON formatter emit it as one structured record.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, level: LogLevel, message: &str, context: &Entries) {
        // Non-finite floats encode as null, so encoding a map of WideValues cannot fail.
        let encoded = serde_json::to_string(context).unwrap_or_default();
        let entry_count = context.len() as u64;

        log_wide_event!(
            level,
            message,
            entry_count = entry_count,
            wide_load = %encoded
        );
    }
}

/// One record written to a [`MemoryLogSink`]
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub context: Entries,
}

/// Keeps every record in memory; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogSink {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.records.lock().map(|mut r| r.clear()).ok();
    }
}

impl LogSink for MemoryLogSink {
    fn log(&self, level: LogLevel, message: &str, context: &Entries) {
        self.records
            .lock()
            .map(|mut r| {
                r.push(LogRecord {
                    level,
                    message: message.to_string(),
                    context: context.clone(),
                })
            })
            .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::WideValue;

    #[test]
    fn test_memory_sink_records_and_clears() {
        let sink = MemoryLogSink::new();
        let mut context = Entries::new();
        context.insert("k".to_string(), WideValue::from("v"));

        sink.log(LogLevel::Warning, "Done.", &context);

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, LogLevel::Warning);
        assert_eq!(records[0].message, "Done.");
        assert_eq!(records[0].context, context);

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_memory_sink_clones_share_buffer() {
        let sink = MemoryLogSink::new();
        let handle = sink.clone();
        sink.log(LogLevel::Info, "m", &Entries::new());
        assert_eq!(handle.len(), 1);
    }

    #[test]
    fn test_tracing_sink_accepts_non_finite_floats() {
        let mut context = Entries::new();
        context.insert("ratio".to_string(), WideValue::Float(f64::NAN));
        TracingLogSink.log(LogLevel::Debug, "nan context", &context);
    }
}
