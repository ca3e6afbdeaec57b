//! Notification point for report outcomes
//!
//! Every `report()` announces exactly one [`Notification`]: either the
//! snapshot being reported or the fact that there was nothing to report.
//! Listeners are observers only; the accumulator never depends on what
//! they do.

use std::sync::{Arc, RwLock};

use wideload_core_types::schema::{NOTIFICATION_NOTHING_TO_REPORT, NOTIFICATION_REPORTED};

use crate::value::Entries;

/// A report outcome announced on the [`NotificationBus`]
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Entries are about to be handed to the sink
    Reported { data: Entries },
    /// `report()` ran against an empty accumulator
    NothingToReport,
}

impl Notification {
    /// Canonical notification name
    pub fn name(&self) -> &'static str {
        match self {
            Notification::Reported { .. } => NOTIFICATION_REPORTED,
            Notification::NothingToReport => NOTIFICATION_NOTHING_TO_REPORT,
        }
    }
}

type Listener = Arc<dyn Fn(&Notification) + Send + Sync>;

/// Synchronous publish/subscribe point shared by all accumulators of a process
#[derive(Default)]
pub struct NotificationBus {
    listeners: RwLock<Vec<Listener>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; listeners run in registration order.
    pub fn listen<F>(&self, listener: F)
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        if let Ok(mut listeners) = self.listeners.write() {
            listeners.push(Arc::new(listener));
        }
    }

    /// Announce a notification to every listener.
    pub fn dispatch(&self, notification: &Notification) {
        tracing::debug!(
            component = module_path!(),
            notification = notification.name(),
            "dispatching notification"
        );

        // Snapshot so a listener may register further listeners without deadlocking.
        let listeners: Vec<Listener> = self
            .listeners
            .read()
            .map(|l| l.clone())
            .unwrap_or_default();

        for listener in listeners {
            listener(notification);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().map(|l| l.len()).unwrap_or(0)
    }
}

impl std::fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
