//! Component runner: schedules component resolution on the runtime.

use std::sync::Arc;
use std::time::Instant;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, error};
use weft_core::RequestContext;

use crate::component::{Component, ComponentState};
use crate::future::ComponentFuture;

/// How a component's state was produced for one request.
///
/// Per request a component moves
/// `Pending -> {ActionHandled, DefaultFetched} -> Resolved`; the terminal
/// state is immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A registered action handler produced the state.
    ActionHandled,
    /// The default fetch path produced the state.
    DefaultFetched,
}

/// Schedule a component for the given request.
///
/// Returns immediately with a pending [`ComponentFuture`]; the component
/// resolves on its own task. The runner itself never fails: component
/// closures absorb their errors, and a lost task still resolves the
/// future with the state's zero value.
pub fn run<S: ComponentState>(
    ctx: &Arc<RequestContext>,
    component: &Component<S>,
) -> ComponentFuture<S> {
    let (resolution, fut) = component.resolution(ctx);
    spawn_resolving(component.name(), resolution, fut)
}

/// Schedule a component, erasing its state to JSON.
///
/// Used by [`crate::AnyComponent::attach`] so pages can hold components
/// of different state types.
pub fn run_erased<S: ComponentState>(
    ctx: &Arc<RequestContext>,
    component: &Component<S>,
) -> ComponentFuture<Value> {
    let (resolution, fut) = component.resolution(ctx);
    let name = component.name().to_string();
    let erased = async move {
        let state = fut.await;
        match serde_json::to_value(&state) {
            Ok(value) => value,
            Err(err) => {
                error!(component = %name, %err, "failed to serialize component state");
                Value::Null
            }
        }
    }
    .boxed();
    spawn_resolving(component.name(), resolution, erased)
}

fn spawn_resolving<T: Send + 'static>(
    name: &str,
    resolution: Resolution,
    fut: BoxFuture<'static, T>,
) -> ComponentFuture<T> {
    let (tx, rx) = oneshot::channel();
    let component = name.to_string();
    tokio::spawn(async move {
        let started = Instant::now();
        let state = fut.await;
        debug!(
            component = %component,
            ?resolution,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "component resolved"
        );
        // The receiver is gone only if the request was torn down.
        let _ = tx.send(state);
    });
    ComponentFuture::new(name, rx)
}
