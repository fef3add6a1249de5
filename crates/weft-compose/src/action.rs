//! Typed action registry for component refresh operations.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;
use weft_core::RequestContext;

/// Async handler invoked in place of a component's default fetch.
///
/// Receives the request context and the invocation's positional
/// arguments, and produces the component's next state.
pub type ActionHandler<S> =
    Arc<dyn Fn(Arc<RequestContext>, Vec<Value>) -> BoxFuture<'static, S> + Send + Sync>;

/// Outcome of inspecting a request for a registered action.
pub enum Dispatch<S> {
    /// The embedded action names a registered handler. The caller must
    /// run the handler and skip the default fetch entirely.
    Hit {
        /// Matched action name.
        name: String,
        /// The registered handler.
        handler: ActionHandler<S>,
        /// Arguments carried by the invocation.
        args: Vec<Value>,
    },
    /// An action is embedded but this component does not register it.
    /// Not an error; the caller falls through to the default fetch.
    Miss {
        /// The action name the request asked for.
        requested: String,
    },
    /// No action embedded in the request.
    NoAction,
}

/// Maps action names to handlers for one component.
///
/// Handlers are registered at construction time; dispatch at request time
/// is a pure lookup with no side effects.
pub struct ActionRegistry<S> {
    component: String,
    handlers: HashMap<String, ActionHandler<S>>,
}

impl<S> ActionRegistry<S> {
    /// Create an empty registry for the named component.
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            handlers: HashMap::new(),
        }
    }

    /// Register a handler under an action name.
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register(&mut self, name: impl Into<String>, handler: ActionHandler<S>) {
        self.handlers.insert(name.into(), handler);
    }

    /// Component this registry belongs to.
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Registered action names.
    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(|s| s.as_str())
    }

    /// Decide how the given request resolves for this component.
    ///
    /// Inspects the context for an embedded action invocation and matches
    /// it against the registered handlers. Performs no side effect on
    /// `Miss` or `NoAction`.
    pub fn dispatch(&self, ctx: &RequestContext) -> Dispatch<S> {
        let Some(invocation) = &ctx.action else {
            return Dispatch::NoAction;
        };

        match self.handlers.get(&invocation.name) {
            Some(handler) => Dispatch::Hit {
                name: invocation.name.clone(),
                handler: Arc::clone(handler),
                args: invocation.args.clone(),
            },
            None => Dispatch::Miss {
                requested: invocation.name.clone(),
            },
        }
    }
}
