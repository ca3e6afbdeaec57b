//! Canonical schema constants for structured logging and notifications
//!
//! These constants ensure consistency across the report sink, the
//! notification bus and the side-channel.

// Canonical field keys for structured logging. `tracing` callsites name
// fields with identifiers, so these must match the keys written there.
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_LOG_LEVEL: &str = "log_level";
pub const FIELD_WIDE_LOAD: &str = "wide_load";
pub const FIELD_ENTRY_COUNT: &str = "entry_count";
pub const FIELD_UNIT_ID: &str = "unit_id";
pub const FIELD_NOTIFICATION: &str = "notification";
pub const FIELD_SIGNAL: &str = "signal";

// Canonical notification names
pub const NOTIFICATION_REPORTED: &str = "wide_load_reported";
pub const NOTIFICATION_NOTHING_TO_REPORT: &str = "no_wide_load_to_report";

/// Reserved hidden key under which accumulated entries cross a
/// serialization boundary
pub const CONTEXT_KEY: &str = "__wide_load";
