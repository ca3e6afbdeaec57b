//! Canonical logging macros

/// Write one structured event at a runtime-selected [`LogLevel`]
///
/// `tracing` fixes the level of a callsite at compile time, so the macro
/// expands one callsite per level and picks among them. Every event
/// carries `component` and the PSR-3 `log_level` name; further fields
/// follow the `tracing` field syntax (no trailing comma).
///
/// [`LogLevel`]: crate::config::LogLevel
///
/// # Example
///
/// ```
/// # use wideload_core::log_wide_event;
/// use wideload_core::config::LogLevel;
///
/// log_wide_event!(LogLevel::Notice, "Job completed.", entry_count = 3u64);
/// ```
#[macro_export]
macro_rules! log_wide_event {
    ($level:expr, $message:expr, $($field:tt)+) => {{
        let level: $crate::config::LogLevel = $level;
        match level.tracing_level() {
            tracing::Level::ERROR => tracing::error!(
                component = module_path!(),
                log_level = level.as_str(),
                $($field)+,
                "{}",
                $message
            ),
            tracing::Level::WARN => tracing::warn!(
                component = module_path!(),
                log_level = level.as_str(),
                $($field)+,
                "{}",
                $message
            ),
            tracing::Level::INFO => tracing::info!(
                component = module_path!(),
                log_level = level.as_str(),
                $($field)+,
                "{}",
                $message
            ),
            _ => tracing::debug!(
                component = module_path!(),
                log_level = level.as_str(),
                $($field)+,
                "{}",
                $message
            ),
        }
    }};
}
