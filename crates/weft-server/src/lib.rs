//! HTTP surface for weft applications.
//!
//! An [`App`] registers pages on routes and exposes every attached
//! component's actions under `/actions/{component}/{action}`. A GET on a
//! page route composes and renders the full page; a POST on an action
//! route runs only the addressed component and returns its refreshed
//! state as JSON.

mod app;
mod error;
mod telemetry;

pub use app::*;
pub use error::*;
pub use telemetry::*;
