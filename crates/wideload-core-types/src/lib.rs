//! Core types shared across WideLoad facilities
//!
//! This crate provides foundational types used by the accumulator,
//! the lifecycle integrator and the logging facility:
//!
//! - **Correlation types**: UnitId, UnitKind
//! - **Schema constants**: Canonical field keys, notification names and
//!   the reserved side-channel key

pub mod correlation;
pub mod schema;

pub use correlation::{UnitId, UnitKind};
