//! Lifecycle integration
//!
//! The hosting application forwards its unit-of-work boundaries to a
//! [`LifecycleIntegrator`] as [`LifecycleSignal`]s. The integrator runs
//! the hooks registered for that signal, in registration order, against
//! the accumulator of the unit that is ending.
//!
//! Default registrations made by [`LifecycleIntegrator::new`]:
//!
//! - request terminated, command finished, job processed, job failed and
//!   process terminating: report then flush, if the instance is enabled
//!   and auto-reporting is on
//! - context dehydrating / hydrated: carry entries through the
//!   side-channel, only when the configuration is `serializable`
//!
//! Report+flush leaves the accumulator empty, so a generic `Terminating`
//! after an explicit end-of-request report finds nothing to log.

use wideload_core_types::schema::CONTEXT_KEY;
use wideload_core_types::UnitKind;

use crate::config::WideLoadConfig;
use crate::context::SideChannel;
use crate::reporter;
use crate::value::WideValue;
use crate::wide_load::WideLoad;

/// End-of-unit-of-work notification forwarded by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleSignal {
    RequestTerminated,
    CommandFinished { command: String },
    JobProcessed { queue: String },
    JobFailed { queue: String, error: String },
    /// Generic process shutdown, may follow any of the above
    Terminating,
}

/// Discriminant of [`LifecycleSignal`] used as the registration key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    RequestTerminated,
    CommandFinished,
    JobProcessed,
    JobFailed,
    Terminating,
}

impl SignalKind {
    pub const ALL: [SignalKind; 5] = [
        SignalKind::RequestTerminated,
        SignalKind::CommandFinished,
        SignalKind::JobProcessed,
        SignalKind::JobFailed,
        SignalKind::Terminating,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::RequestTerminated => "request_terminated",
            SignalKind::CommandFinished => "command_finished",
            SignalKind::JobProcessed => "job_processed",
            SignalKind::JobFailed => "job_failed",
            SignalKind::Terminating => "terminating",
        }
    }
}

impl LifecycleSignal {
    pub fn kind(&self) -> SignalKind {
        match self {
            LifecycleSignal::RequestTerminated => SignalKind::RequestTerminated,
            LifecycleSignal::CommandFinished { .. } => SignalKind::CommandFinished,
            LifecycleSignal::JobProcessed { .. } => SignalKind::JobProcessed,
            LifecycleSignal::JobFailed { .. } => SignalKind::JobFailed,
            LifecycleSignal::Terminating => SignalKind::Terminating,
        }
    }

    /// The kind of unit of work this signal ends, if specific.
    pub fn unit_kind(&self) -> Option<UnitKind> {
        match self {
            LifecycleSignal::RequestTerminated => Some(UnitKind::Request),
            LifecycleSignal::CommandFinished { .. } => Some(UnitKind::Command),
            LifecycleSignal::JobProcessed { .. } | LifecycleSignal::JobFailed { .. } => {
                Some(UnitKind::Job)
            }
            LifecycleSignal::Terminating => None,
        }
    }
}

/// Serialization boundary crossed by a unit of work's context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextSignal {
    /// The context is about to be encoded for transfer
    Dehydrating,
    /// A new execution context was rebuilt from a transfer
    Hydrated,
}

pub type LifecycleHook = Box<dyn Fn(&LifecycleSignal, &mut WideLoad) + Send + Sync>;
pub type ContextHook = Box<dyn Fn(&mut WideLoad, &mut dyn SideChannel) + Send + Sync>;

/// Registry of hooks bound to lifecycle and context signals
pub struct LifecycleIntegrator {
    hooks: Vec<(SignalKind, LifecycleHook)>,
    context_hooks: Vec<(ContextSignal, ContextHook)>,
}

impl LifecycleIntegrator {
    /// Integrator with the default report+flush and side-channel hooks.
    pub fn new(config: &WideLoadConfig) -> Self {
        let mut integrator = Self::empty();

        for kind in SignalKind::ALL {
            integrator.listen(kind, |_, wide_load| {
                reporter::report_and_flush(wide_load);
            });
        }

        if config.serializable {
            integrator.listen_context(ContextSignal::Dehydrating, |wide_load, channel| {
                dehydrate(wide_load, channel);
            });
            integrator.listen_context(ContextSignal::Hydrated, |wide_load, channel| {
                hydrate(channel, wide_load);
            });
        }

        integrator
    }

    /// Integrator with no hooks registered.
    pub fn empty() -> Self {
        Self {
            hooks: Vec::new(),
            context_hooks: Vec::new(),
        }
    }

    /// Append a hook for `kind`.
    pub fn listen<F>(&mut self, kind: SignalKind, hook: F) -> &mut Self
    where
        F: Fn(&LifecycleSignal, &mut WideLoad) + Send + Sync + 'static,
    {
        self.hooks.push((kind, Box::new(hook)));
        self
    }

    /// Append a hook for a context serialization boundary.
    pub fn listen_context<F>(&mut self, signal: ContextSignal, hook: F) -> &mut Self
    where
        F: Fn(&mut WideLoad, &mut dyn SideChannel) + Send + Sync + 'static,
    {
        self.context_hooks.push((signal, Box::new(hook)));
        self
    }

    /// Run every hook registered for the signal's kind.
    pub fn dispatch(&self, signal: &LifecycleSignal, wide_load: &mut WideLoad) {
        let kind = signal.kind();
        tracing::debug!(
            component = module_path!(),
            signal = kind.as_str(),
            unit_id = %wide_load.unit_id(),
            "lifecycle signal"
        );

        for (_, hook) in self.hooks.iter().filter(|(k, _)| *k == kind) {
            hook(signal, &mut *wide_load);
        }
    }

    /// Run every hook registered for a context boundary.
    pub fn dispatch_context(
        &self,
        signal: ContextSignal,
        wide_load: &mut WideLoad,
        channel: &mut dyn SideChannel,
    ) {
        tracing::debug!(
            component = module_path!(),
            signal = ?signal,
            unit_id = %wide_load.unit_id(),
            "context signal"
        );

        for (_, hook) in self.context_hooks.iter().filter(|(s, _)| *s == signal) {
            hook(&mut *wide_load, &mut *channel);
        }
    }

    pub fn hook_count(&self, kind: SignalKind) -> usize {
        self.hooks.iter().filter(|(k, _)| *k == kind).count()
    }

    pub fn context_hook_count(&self, signal: ContextSignal) -> usize {
        self.context_hooks.iter().filter(|(s, _)| *s == signal).count()
    }
}

impl std::fmt::Debug for LifecycleIntegrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleIntegrator")
            .field("hooks", &self.hooks.len())
            .field("context_hooks", &self.context_hooks.len())
            .finish()
    }
}

/// Capture the accumulated entries into the side-channel.
///
/// Nothing is written when the accumulator is empty.
pub fn dehydrate(wide_load: &WideLoad, channel: &mut dyn SideChannel) {
    if wide_load.is_empty() {
        return;
    }
    channel.set_hidden(CONTEXT_KEY, WideValue::Map(wide_load.all()));
}

/// Restore entries carried in the side-channel and remove the reserved key.
///
/// A reserved value that is not a map is dropped with a warning rather
/// than propagated further.
pub fn hydrate(channel: &mut dyn SideChannel, wide_load: &mut WideLoad) {
    match channel.remove_hidden(CONTEXT_KEY) {
        Some(WideValue::Map(entries)) => {
            wide_load.add_many(entries);
        }
        Some(other) => {
            tracing::warn!(
                component = module_path!(),
                unit_id = %wide_load.unit_id(),
                found = other.type_name(),
                "discarding malformed side-channel payload"
            );
        }
        None => {}
    }
}
