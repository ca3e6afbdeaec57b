//! The per-unit-of-work accumulator
//!
//! A [`WideLoad`] collects key/value facts during one request, job or
//! command and emits them once, at the end, as a single wide event.
//!
//! Lifecycle of one instance:
//!
//! ```text
//! Created(empty) -> Accumulating -> Reported (optional) -> Flushed(empty)
//!                        ^                                     |
//!                        +-------------------------------------+
//! ```
//!
//! `report()` never mutates the entries; clearing is the separate
//! `flush()` step. An instance is owned by exactly one unit of work and
//! is not shared across threads, so no internal locking is needed.

use std::sync::Arc;

use wideload_core_types::{UnitId, UnitKind};

use crate::config::WideLoadConfig;
use crate::errors::{Result, WideLoadError};
use crate::notify::{Notification, NotificationBus};
use crate::sink::{LogSink, ReportCallback, TracingLogSink};
use crate::value::{Entries, WideValue};

/// Creates one [`WideLoad`] per unit of work, sharing the process-wide
/// configuration, log sink and notification bus.
#[derive(Clone)]
pub struct WideLoadFactory {
    config: Arc<WideLoadConfig>,
    log_sink: Arc<dyn LogSink>,
    notifications: Arc<NotificationBus>,
}

impl WideLoadFactory {
    /// Factory writing to [`TracingLogSink`] with a fresh notification bus.
    pub fn new(config: WideLoadConfig) -> Self {
        Self {
            config: Arc::new(config),
            log_sink: Arc::new(TracingLogSink),
            notifications: Arc::new(NotificationBus::new()),
        }
    }

    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log_sink = sink;
        self
    }

    pub fn with_notifications(mut self, bus: Arc<NotificationBus>) -> Self {
        self.notifications = bus;
        self
    }

    pub fn config(&self) -> &WideLoadConfig {
        &self.config
    }

    pub fn notifications(&self) -> &Arc<NotificationBus> {
        &self.notifications
    }

    /// Start a new unit of work.
    pub fn begin(&self, kind: UnitKind) -> WideLoad {
        let wide_load = WideLoad::with_collaborators(
            self.config.clone(),
            self.log_sink.clone(),
            self.notifications.clone(),
        );
        tracing::debug!(
            component = module_path!(),
            unit_id = %wide_load.unit_id(),
            unit_kind = kind.as_str(),
            "unit of work started"
        );
        wide_load
    }
}

impl std::fmt::Debug for WideLoadFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WideLoadFactory")
            .field("config", &self.config)
            .field("notifications", &self.notifications)
            .finish_non_exhaustive()
    }
}

/// Accumulator for one unit of work
pub struct WideLoad {
    unit_id: UnitId,
    entries: Entries,
    enabled: bool,
    auto_report: bool,
    report_callback: Option<ReportCallback>,
    config: Arc<WideLoadConfig>,
    log_sink: Arc<dyn LogSink>,
    notifications: Arc<NotificationBus>,
}

impl WideLoad {
    /// Standalone accumulator with its own notification bus and the
    /// tracing log sink.
    pub fn new(config: WideLoadConfig) -> Self {
        Self::with_collaborators(
            Arc::new(config),
            Arc::new(TracingLogSink),
            Arc::new(NotificationBus::new()),
        )
    }

    pub fn with_collaborators(
        config: Arc<WideLoadConfig>,
        log_sink: Arc<dyn LogSink>,
        notifications: Arc<NotificationBus>,
    ) -> Self {
        Self {
            unit_id: UnitId::new(),
            entries: Entries::new(),
            enabled: config.enabled,
            auto_report: config.auto_report,
            report_callback: None,
            config,
            log_sink,
            notifications,
        }
    }

    pub fn unit_id(&self) -> &UnitId {
        &self.unit_id
    }

    pub fn config(&self) -> &WideLoadConfig {
        &self.config
    }

    // ----- mutation -----

    /// Set one entry, overwriting any previous value.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<WideValue>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Merge a batch of entries; later keys win on conflict.
    pub fn add_many<I, K, V>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<WideValue>,
    {
        for (key, value) in entries {
            self.entries.insert(key.into(), value.into());
        }
        self
    }

    /// Set only if `key` is absent.
    pub fn add_if(&mut self, key: impl Into<String>, value: impl Into<WideValue>) -> &mut Self {
        self.entries.entry(key.into()).or_insert_with(|| value.into());
        self
    }

    /// Append values to a list entry.
    ///
    /// An absent key starts an empty list. An existing non-list value
    /// becomes the first element of the list.
    pub fn push<I, V>(&mut self, key: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<WideValue>,
    {
        let slot = self
            .entries
            .entry(key.into())
            .or_insert_with(|| WideValue::List(Vec::new()));

        if !matches!(slot, WideValue::List(_)) {
            let previous = std::mem::take(slot);
            *slot = WideValue::List(vec![previous]);
        }
        if let WideValue::List(items) = slot {
            items.extend(values.into_iter().map(Into::into));
        }
        self
    }

    /// Remove one entry; absent keys are ignored.
    pub fn forget(&mut self, key: &str) -> &mut Self {
        self.entries.shift_remove(key);
        self
    }

    /// Remove several entries; absent keys are ignored.
    pub fn forget_many<I, K>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        for key in keys {
            self.entries.shift_remove(key.as_ref());
        }
        self
    }

    /// Clear every entry.
    pub fn flush(&mut self) -> &mut Self {
        self.entries.clear();
        self
    }

    /// Add `amount` to the integer interpretation of `key` (0 if absent).
    ///
    /// # Errors
    ///
    /// [`WideLoadError::NotCoercible`] if the stored value has no integer
    /// interpretation, [`WideLoadError::IntegerOverflow`] if the sum leaves
    /// the i64 range. The entry is unchanged on error.
    pub fn increment(&mut self, key: &str, amount: i64) -> Result<&mut Self> {
        let current = match self.entries.get(key) {
            Some(value) => value.coerce_int(key)?,
            None => 0,
        };
        let next = current
            .checked_add(amount)
            .ok_or_else(|| WideLoadError::IntegerOverflow {
                key: key.to_string(),
                current,
                amount,
            })?;
        self.entries.insert(key.to_string(), WideValue::Int(next));
        Ok(self)
    }

    /// `increment` with the amount negated.
    ///
    /// # Errors
    ///
    /// Same as [`WideLoad::increment`]; `i64::MIN` cannot be negated and
    /// reports an overflow.
    pub fn decrement(&mut self, key: &str, amount: i64) -> Result<&mut Self> {
        let negated = amount
            .checked_neg()
            .ok_or_else(|| WideLoadError::IntegerOverflow {
                key: key.to_string(),
                current: self
                    .entries
                    .get(key)
                    .and_then(WideValue::as_i64)
                    .unwrap_or(0),
                amount,
            })?;
        self.increment(key, negated)
    }

    // ----- reads -----

    pub fn get(&self, key: &str) -> Option<&WideValue> {
        self.entries.get(key)
    }

    /// Stored value, or `default` when absent.
    pub fn get_or(&self, key: &str, default: impl Into<WideValue>) -> WideValue {
        match self.entries.get(key) {
            Some(value) => value.clone(),
            None => default.into(),
        }
    }

    /// Remove and return the value at `key`.
    pub fn pull(&mut self, key: &str) -> Option<WideValue> {
        self.entries.shift_remove(key)
    }

    /// Remove and return the value at `key`, or `default` when absent.
    pub fn pull_or(&mut self, key: &str, default: impl Into<WideValue>) -> WideValue {
        self.pull(key).unwrap_or_else(|| default.into())
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Snapshot copy of every entry.
    pub fn all(&self) -> Entries {
        self.entries.clone()
    }

    /// Entries whose key is in `keys`; unknown keys are ignored.
    pub fn only<K: AsRef<str>>(&self, keys: &[K]) -> Entries {
        self.entries
            .iter()
            .filter(|(k, _)| keys.iter().any(|wanted| wanted.as_ref() == k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Entries whose key is not in `keys`; unknown keys are ignored.
    pub fn except<K: AsRef<str>>(&self, keys: &[K]) -> Entries {
        self.entries
            .iter()
            .filter(|(k, _)| !keys.iter().any(|unwanted| unwanted.as_ref() == k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ----- reporting -----

    /// Emit the accumulated entries as one wide event.
    ///
    /// Disabled instances do nothing. An empty accumulator announces
    /// [`Notification::NothingToReport`] and skips the sink. Otherwise
    /// [`Notification::Reported`] is announced with a snapshot, which is
    /// then handed to the custom callback if one is registered, or else
    /// written to the log sink at the configured level and message.
    /// Entries are left untouched; call [`WideLoad::flush`] to clear them.
    pub fn report(&self) -> &Self {
        if !self.enabled {
            tracing::debug!(
                component = module_path!(),
                unit_id = %self.unit_id,
                "reporting disabled, skipping"
            );
            return self;
        }

        if self.entries.is_empty() {
            self.notifications.dispatch(&Notification::NothingToReport);
            return self;
        }

        let data = self.all();
        self.notifications.dispatch(&Notification::Reported { data: data.clone() });

        match &self.report_callback {
            Some(callback) => callback(&data),
            None => self
                .log_sink
                .log(self.config.log_level, &self.config.log_message, &data),
        }
        self
    }

    /// Replace the custom report target, or restore the log sink with `None`.
    pub fn report_using(&mut self, callback: Option<ReportCallback>) -> &mut Self {
        self.report_callback = callback;
        self
    }

    pub fn enable(&mut self) -> &mut Self {
        self.enabled = true;
        self
    }

    pub fn disable(&mut self) -> &mut Self {
        self.enabled = false;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable_auto_reporting(&mut self, enabled: bool) -> &mut Self {
        self.auto_report = enabled;
        self
    }

    pub fn is_auto_reporting_enabled(&self) -> bool {
        self.auto_report
    }
}

impl std::fmt::Debug for WideLoad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WideLoad")
            .field("unit_id", &self.unit_id)
            .field("entries", &self.entries)
            .field("enabled", &self.enabled)
            .field("auto_report", &self.auto_report)
            .field("custom_sink", &self.report_callback.is_some())
            .finish_non_exhaustive()
    }
}
