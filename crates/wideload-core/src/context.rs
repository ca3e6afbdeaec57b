//! Side-channel carried across serialization boundaries
//!
//! When a request dispatches a queued job, the request's context is
//! dehydrated into the job payload and hydrated again in the worker.
//! [`ContextRepository`] is that transferable context: visible entries
//! travel alongside a hidden set that is never logged, and the hidden set
//! is where accumulated entries ride across.

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::value::{Entries, WideValue};

/// Hidden key/value carrier attached to a unit of work's transferable context
pub trait SideChannel {
    fn set_hidden(&mut self, key: &str, value: WideValue);
    fn get_hidden(&self, key: &str) -> Option<&WideValue>;
    fn remove_hidden(&mut self, key: &str) -> Option<WideValue>;
}

/// Serializable context with visible and hidden entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextRepository {
    #[serde(default)]
    data: Entries,
    #[serde(default)]
    hidden: Entries,
}

impl ContextRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, value: impl Into<WideValue>) -> &mut Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&WideValue> {
        self.data.get(key)
    }

    pub fn all(&self) -> &Entries {
        &self.data
    }

    pub fn all_hidden(&self) -> &Entries {
        &self.hidden
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.hidden.is_empty()
    }

    /// Encode for transfer, e.g. into a queued job payload.
    pub fn dehydrate(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuild a context from a [`ContextRepository::dehydrate`] payload.
    pub fn hydrate(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }
}

impl SideChannel for ContextRepository {
    fn set_hidden(&mut self, key: &str, value: WideValue) {
        self.hidden.insert(key.to_string(), value);
    }

    fn get_hidden(&self, key: &str) -> Option<&WideValue> {
        self.hidden.get(key)
    }

    fn remove_hidden(&mut self, key: &str) -> Option<WideValue> {
        self.hidden.shift_remove(key)
    }
}
