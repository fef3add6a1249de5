//! Component definition: a default fetch plus its registered actions.

use std::sync::Arc;

use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use weft_core::RequestContext;

use crate::action::{ActionRegistry, Dispatch};
use crate::future::ComponentFuture;
use crate::runner::{self, Resolution};

/// State value produced by a component.
///
/// The zero value (`Default`) doubles as the degraded state when a fetch
/// fails; `Serialize` lets the state travel as a JSON fragment.
pub trait ComponentState: Default + Serialize + Send + 'static {}

impl<T: Default + Serialize + Send + 'static> ComponentState for T {}

/// Default fetch path of a component.
pub type DefaultFetch<S> =
    Arc<dyn Fn(Arc<RequestContext>) -> BoxFuture<'static, S> + Send + Sync>;

/// A self-contained unit of page logic producing one state value per
/// request.
///
/// The state is computed by exactly one of the default fetch path or a
/// registered action handler. Closures return `S` directly, not a
/// `Result`: fetch or decode failures must be absorbed inside the closure
/// (log and return `S::default()`), so attaching a component can never
/// fail a request.
///
/// # Example
///
/// ```rust,ignore
/// let block = Component::new("block", move |_ctx| fetch_block().boxed())
///     .action("reload-block", move |_ctx, _args| fetch_block().boxed());
/// ```
pub struct Component<S: ComponentState> {
    name: String,
    default: DefaultFetch<S>,
    actions: ActionRegistry<S>,
}

impl<S: ComponentState> Component<S> {
    /// Create a component with its default fetch path.
    pub fn new(
        name: impl Into<String>,
        default: impl Fn(Arc<RequestContext>) -> BoxFuture<'static, S> + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        Self {
            actions: ActionRegistry::new(name.clone()),
            default: Arc::new(default),
            name,
        }
    }

    /// Register an action handler under a name.
    pub fn action(
        mut self,
        name: impl Into<String>,
        handler: impl Fn(Arc<RequestContext>, Vec<Value>) -> BoxFuture<'static, S>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.actions.register(name, Arc::new(handler));
        self
    }

    /// Component name, used for action routing and logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered action names.
    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.action_names()
    }

    /// Decide how this component resolves for the given request.
    ///
    /// The action dispatch always happens before the default-fetch
    /// decision; once an action handler matches, the default fetch is
    /// unreachable for this request.
    pub(crate) fn resolution(
        &self,
        ctx: &Arc<RequestContext>,
    ) -> (Resolution, BoxFuture<'static, S>) {
        match self.actions.dispatch(ctx) {
            Dispatch::Hit {
                name,
                handler,
                args,
            } => {
                debug!(component = %self.name, action = %name, "action handler matched");
                (Resolution::ActionHandled, handler(Arc::clone(ctx), args))
            }
            Dispatch::Miss { requested } => {
                debug!(
                    component = %self.name,
                    action = %requested,
                    "no handler registered; falling through to default fetch"
                );
                (Resolution::DefaultFetched, (self.default)(Arc::clone(ctx)))
            }
            Dispatch::NoAction => (Resolution::DefaultFetched, (self.default)(Arc::clone(ctx))),
        }
    }
}

/// Type-erased component, attachable as a JSON-state future.
///
/// Pages and the action endpoint hold components of different state
/// types; erasure serializes the produced state to `serde_json::Value`
/// after resolution.
pub trait AnyComponent: Send + Sync {
    /// Component name.
    fn name(&self) -> &str;

    /// Schedule this component for the given request.
    fn attach(&self, ctx: &Arc<RequestContext>) -> ComponentFuture<Value>;
}

impl<S: ComponentState> AnyComponent for Component<S> {
    fn name(&self) -> &str {
        self.name()
    }

    fn attach(&self, ctx: &Arc<RequestContext>) -> ComponentFuture<Value> {
        runner::run_erased(ctx, self)
    }
}
