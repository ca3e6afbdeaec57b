//! Structured logging facility for WideLoad
//!
//! This module provides:
//! - Single initialization point via `init(profile)`
//! - The `log_wide_event!` macro used by the default report sink to
//!   write a wide event at a runtime-selected level
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use wideload_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
