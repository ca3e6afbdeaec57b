//! WideLoad Core - request/job-scoped wide event accumulator
//!
//! Application code attaches key/value facts to a [`WideLoad`] throughout
//! one unit of work (request, queued job, command). At the end of that
//! unit the accumulated map is emitted once, as a single structured log
//! record or through a custom callback, and then cleared.
//!
//! This crate provides:
//! - The accumulator and its report/flush contract
//! - A JSON-like value model with well-defined serialization
//! - Configuration from defaults, TOML and `WIDE_LOAD_*` environment variables
//! - A notification bus announcing report outcomes
//! - Lifecycle integration: report+flush on end-of-unit signals and
//!   carrying entries across a queue handoff through a side-channel
//! - A structured logging facility built on `tracing`

pub mod config;
pub mod context;
pub mod errors;
pub mod lifecycle;
pub mod logging_facility;
pub mod middleware;
pub mod notify;
pub mod reporter;
pub mod sink;
pub mod value;
pub mod wide_load;

// Re-export commonly used types
pub use config::{LogLevel, WideLoadConfig};
pub use context::{ContextRepository, SideChannel};
pub use errors::{ExError, ExErrorKind, Result, WideLoadError};
pub use lifecycle::{ContextSignal, LifecycleIntegrator, LifecycleSignal, SignalKind};
pub use middleware::WideLoadMiddleware;
pub use notify::{Notification, NotificationBus};
pub use sink::{LogRecord, LogSink, MemoryLogSink, ReportCallback, TracingLogSink};
pub use value::{Entries, WideValue};
pub use wide_load::{WideLoad, WideLoadFactory};
pub use wideload_core_types::{UnitId, UnitKind};
