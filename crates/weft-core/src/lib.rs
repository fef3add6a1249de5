//! Core abstractions for the weft page composition framework.
//!
//! This crate provides the fundamental types:
//! - `RequestContext` - Per-request scope shared with component tasks
//! - `ActionInvocation` - A named, client-triggered action call
//! - `AppConfig` - Process configuration with env overrides

mod config;
mod context;

pub use config::*;
pub use context::*;
