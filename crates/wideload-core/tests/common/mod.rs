use std::sync::{Arc, Mutex};

use wideload_core::{MemoryLogSink, Notification, NotificationBus, WideLoadConfig, WideLoadFactory};

/// Factory writing to an in-memory sink, plus handles to inspect it
#[allow(dead_code)]
pub struct Harness {
    pub factory: WideLoadFactory,
    pub sink: MemoryLogSink,
    pub notifications: Arc<Mutex<Vec<Notification>>>,
}

/// Build a harness around `config`
///
/// Every notification dispatched on the factory's bus is recorded.
#[allow(dead_code)]
pub fn harness(config: WideLoadConfig) -> Harness {
    let sink = MemoryLogSink::new();
    let bus = Arc::new(NotificationBus::new());
    let notifications = Arc::new(Mutex::new(Vec::new()));

    let seen = notifications.clone();
    bus.listen(move |n| seen.lock().unwrap().push(n.clone()));

    let factory = WideLoadFactory::new(config)
        .with_log_sink(Arc::new(sink.clone()))
        .with_notifications(bus);

    Harness {
        factory,
        sink,
        notifications,
    }
}

/// Harness with the default configuration
#[allow(dead_code)]
pub fn default_harness() -> Harness {
    harness(WideLoadConfig::default())
}

/// Names of the notifications recorded so far
#[allow(dead_code)]
pub fn notification_names(h: &Harness) -> Vec<&'static str> {
    h.notifications.lock().unwrap().iter().map(|n| n.name()).collect()
}
