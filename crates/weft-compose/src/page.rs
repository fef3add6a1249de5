//! Page composition: attach components, then resolve them together.

use std::sync::Arc;

use futures::future;
use serde_json::Value;
use weft_core::RequestContext;

use crate::component::AnyComponent;
use crate::future::ComponentFuture;

/// Top-level composition of components plus a render target.
///
/// The template identifier is opaque to this crate; the rendering
/// collaborator interprets it.
pub struct Page {
    name: String,
    template: String,
    components: Vec<(String, Arc<dyn AnyComponent>)>,
}

impl Page {
    /// Create a page with a name and a template identifier.
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            components: Vec::new(),
        }
    }

    /// Attach a component under a page-defined field name.
    pub fn component(mut self, field: impl Into<String>, component: Arc<dyn AnyComponent>) -> Self {
        self.components.push((field.into(), component));
        self
    }

    /// Page name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Template identifier.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Look up a component by its component name (not field name).
    pub fn component_named(&self, name: &str) -> Option<&Arc<dyn AnyComponent>> {
        self.components
            .iter()
            .map(|(_, component)| component)
            .find(|component| component.name() == name)
    }

    /// Attach every component for the given request.
    ///
    /// All components are scheduled before any future is awaited, so
    /// their fetches proceed concurrently.
    pub fn compose(&self, ctx: &Arc<RequestContext>) -> PageState {
        let fields = self
            .components
            .iter()
            .map(|(field, component)| (field.clone(), component.attach(ctx)))
            .collect();
        PageState {
            template: self.template.clone(),
            fields,
        }
    }
}

/// Per-request mapping from field name to a pending component future.
///
/// Built once by [`Page::compose`], consumed once by
/// [`PageState::resolve`].
pub struct PageState {
    template: String,
    fields: Vec<(String, ComponentFuture<Value>)>,
}

impl PageState {
    /// Template identifier of the owning page.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(field, _)| field.as_str())
    }

    /// Await every component future and expose the resolved states.
    ///
    /// Futures complete in any order; no component may assume a sibling
    /// has resolved first.
    pub async fn resolve(self) -> ResolvedPage {
        let (fields, futures): (Vec<_>, Vec<_>) = self.fields.into_iter().unzip();
        let states = future::join_all(futures).await;
        ResolvedPage {
            template: self.template,
            fields: fields.into_iter().zip(states).collect(),
        }
    }
}

/// Resolved page state handed to the rendering collaborator.
///
/// States stay as raw JSON; the composer does not interpret them.
pub struct ResolvedPage {
    template: String,
    fields: Vec<(String, Value)>,
}

impl ResolvedPage {
    /// Template identifier of the owning page.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Resolved fields in declaration order.
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Resolved state for a field name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, state)| state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use futures::FutureExt;
    use serde::Serialize;
    use std::time::Duration;
    use tokio::sync::Notify;
    use weft_core::Method;

    #[derive(Debug, Clone, Default, Serialize)]
    struct Tag {
        tag: String,
    }

    fn tagged(name: &str, tag: &str) -> Arc<dyn AnyComponent> {
        let tag = tag.to_string();
        Arc::new(Component::new(name, move |_ctx| {
            let tag = tag.clone();
            async move { Tag { tag } }.boxed()
        }))
    }

    #[tokio::test]
    async fn test_compose_and_resolve() {
        let page = Page::new("index", "page.index")
            .component("left", tagged("left", "L"))
            .component("right", tagged("right", "R"));
        let ctx = Arc::new(RequestContext::new(Method::Get, "/"));

        let state = page.compose(&ctx);
        assert_eq!(state.template(), "page.index");
        assert_eq!(state.field_names().collect::<Vec<_>>(), vec!["left", "right"]);

        let resolved = state.resolve().await;
        assert_eq!(resolved.get("left").unwrap()["tag"], "L");
        assert_eq!(resolved.get("right").unwrap()["tag"], "R");
        assert!(resolved.get("missing").is_none());
    }

    #[tokio::test]
    async fn test_component_named() {
        let page = Page::new("index", "page.index").component("block", tagged("block", "B"));

        assert!(page.component_named("block").is_some());
        assert!(page.component_named("other").is_none());
    }

    /// Both components' fetches start before either completes: the
    /// "waiter" component only finishes once the "signaler" component has
    /// run, which deadlocks unless both were scheduled up front.
    #[tokio::test]
    async fn test_sibling_fetches_run_concurrently() {
        let gate = Arc::new(Notify::new());

        let waiter = {
            let gate = Arc::clone(&gate);
            Arc::new(Component::new("waiter", move |_ctx| {
                let gate = Arc::clone(&gate);
                async move {
                    gate.notified().await;
                    Tag { tag: "waited".into() }
                }
                .boxed()
            }))
        };
        let signaler = {
            let gate = Arc::clone(&gate);
            Arc::new(Component::new("signaler", move |_ctx| {
                let gate = Arc::clone(&gate);
                async move {
                    gate.notify_one();
                    Tag { tag: "signaled".into() }
                }
                .boxed()
            }))
        };

        let page = Page::new("index", "page.index")
            .component("waiter", waiter as Arc<dyn AnyComponent>)
            .component("signaler", signaler as Arc<dyn AnyComponent>);
        let ctx = Arc::new(RequestContext::new(Method::Get, "/"));

        let resolved = tokio::time::timeout(Duration::from_secs(1), page.compose(&ctx).resolve())
            .await
            .expect("sibling fetches must not serialize");

        assert_eq!(resolved.get("waiter").unwrap()["tag"], "waited");
        assert_eq!(resolved.get("signaler").unwrap()["tag"], "signaled");
    }

    /// Resolution order across siblings is unconstrained: a slow first
    /// component does not block a fast second one from resolving first.
    #[tokio::test]
    async fn test_resolution_order_unconstrained() {
        let slow = Arc::new(Component::new("slow", |_ctx| {
            async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Tag { tag: "slow".into() }
            }
            .boxed()
        }));
        let fast = Arc::new(Component::new("fast", |_ctx| {
            async { Tag { tag: "fast".into() } }.boxed()
        }));

        let page = Page::new("index", "page.index")
            .component("slow", slow as Arc<dyn AnyComponent>)
            .component("fast", fast as Arc<dyn AnyComponent>);
        let ctx = Arc::new(RequestContext::new(Method::Get, "/"));

        let mut state = page.compose(&ctx);
        // Await the later-declared field first; it resolves while the
        // first is still pending.
        let (fast_field, fast_future) = state.fields.pop().unwrap();
        assert_eq!(fast_field, "fast");
        let fast_state =
            tokio::time::timeout(Duration::from_millis(40), fast_future)
                .await
                .expect("fast component must resolve before the slow one");
        assert_eq!(fast_state["tag"], "fast");

        let resolved = state.resolve().await;
        assert_eq!(resolved.get("slow").unwrap()["tag"], "slow");
    }
}
