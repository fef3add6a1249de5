//! Component, action and page composition model.
//!
//! A page is assembled from independently-fetchable components. Each
//! component produces one state value per request, computed by either its
//! default fetch path or a named, client-triggered action handler. The
//! page attaches every component before awaiting any of them, so sibling
//! fetches proceed concurrently and resolve in any order.
//!
//! The building blocks:
//! - `ActionRegistry` - typed mapping from action name to handler
//! - `Component` - a default fetch plus its registered actions
//! - `runner` - schedules a component and hands back a `ComponentFuture`
//! - `ComponentFuture` - pending until the component's task finishes,
//!   then resolved exactly once
//! - `Page` / `PageState` / `ResolvedPage` - the composition surface

mod action;
mod component;
mod future;
mod page;
pub mod runner;

pub use action::*;
pub use component::*;
pub use future::*;
pub use page::*;
pub use runner::Resolution;
