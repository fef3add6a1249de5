//! Application builder and axum router glue.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tracing::{info, warn};
use weft_compose::{AnyComponent, Page, ResolvedPage};
use weft_core::{ActionInvocation, AppConfig, Headers, Method, QueryParams, RequestContext};

use crate::error::ServeError;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Workload-supplied render function: resolved page state in, HTML out.
pub type RenderFn = Arc<dyn Fn(&ResolvedPage) -> String + Send + Sync>;

/// A page plus its render function, registered on one route.
#[derive(Clone)]
pub struct PageHandler {
    page: Arc<Page>,
    render: RenderFn,
}

impl PageHandler {
    /// The registered page.
    pub fn page(&self) -> &Arc<Page> {
        &self.page
    }
}

/// Shared state for the action endpoint.
#[derive(Clone)]
struct ActionState {
    pages: Arc<Vec<PageHandler>>,
}

impl ActionState {
    /// Find a component by name across all registered pages.
    fn component_named(&self, name: &str) -> Option<&Arc<dyn AnyComponent>> {
        self.pages
            .iter()
            .find_map(|handler| handler.page.component_named(name))
    }
}

/// Application builder.
///
/// Register pages, then `serve()`. Every component attached to a
/// registered page becomes addressable under
/// `POST /actions/{component}/{action}`.
///
/// # Example
///
/// ```rust,ignore
/// App::new(config)
///     .page("/", index_page(client), render_index)
///     .serve()
///     .await?;
/// ```
pub struct App {
    config: AppConfig,
    pages: Vec<(String, PageHandler)>,
}

impl App {
    /// Create an application with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
        }
    }

    /// Register a page on a route with its render function.
    pub fn page(
        mut self,
        route: impl Into<String>,
        page: Page,
        render: impl Fn(&ResolvedPage) -> String + Send + Sync + 'static,
    ) -> Self {
        self.pages.push((
            route.into(),
            PageHandler {
                page: Arc::new(page),
                render: Arc::new(render),
            },
        ));
        self
    }

    /// Application configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Registered pages and their routes.
    pub fn pages(&self) -> impl Iterator<Item = (&str, &PageHandler)> {
        self.pages
            .iter()
            .map(|(route, handler)| (route.as_str(), handler))
    }

    /// Build the axum router for this application.
    pub fn router(&self) -> Router {
        let mut router: Router<ActionState> = Router::new();
        for (route, handler) in &self.pages {
            let handler = handler.clone();
            let path = route.clone();
            router = router.route(
                route,
                get(move |Query(query): Query<QueryParams>, headers: HeaderMap| {
                    render_page(handler.clone(), path.clone(), query, headers)
                }),
            );
        }

        let pages = self.pages.iter().map(|(_, h)| h.clone()).collect();
        router
            .route("/actions/{component}/{action}", post(run_action))
            .with_state(ActionState {
                pages: Arc::new(pages),
            })
    }

    /// Bind the configured listen address and serve until shutdown.
    pub async fn serve(self) -> Result<(), ServeError> {
        let addr = self.config.listen_addr.clone();
        let router = self.router();

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|source| ServeError::Bind {
                addr: addr.clone(),
                source,
            })?;
        info!(%addr, "listening");

        axum::serve(listener, router).await?;
        Ok(())
    }
}

/// Full page render: compose, resolve, render.
async fn render_page(
    handler: PageHandler,
    route: String,
    query: QueryParams,
    headers: HeaderMap,
) -> Response {
    let ctx = Arc::new(
        RequestContext::new(Method::Get, route)
            .with_query(query)
            .with_headers(to_headers(&headers)),
    );
    info!(
        request_id = %ctx.request_id,
        path = %ctx.path,
        page = %handler.page.name(),
        "page request"
    );

    let resolved = handler.page.compose(&ctx).resolve().await;
    let html = (handler.render)(&resolved);

    (
        [(REQUEST_ID_HEADER, ctx.request_id.to_string())],
        Html(html),
    )
        .into_response()
}

/// Action invocation: run only the addressed component, return its
/// refreshed state as JSON.
async fn run_action(
    State(state): State<ActionState>,
    Path((component, action)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    let Some(target) = state.component_named(&component) else {
        info!(%component, %action, "action for unknown component");
        return (
            StatusCode::NOT_FOUND,
            format!("unknown component: {component}"),
        )
            .into_response();
    };

    let args: Vec<Value> = if body.is_empty() {
        Vec::new()
    } else {
        match serde_json::from_slice(&body) {
            Ok(args) => args,
            Err(err) => {
                warn!(%component, %action, %err, "malformed action arguments");
                return (
                    StatusCode::BAD_REQUEST,
                    "action arguments must be a JSON array",
                )
                    .into_response();
            }
        }
    };

    let ctx = Arc::new(
        RequestContext::new(Method::Post, format!("/actions/{component}/{action}"))
            .with_action(ActionInvocation::new(action.clone(), args)),
    );
    info!(request_id = %ctx.request_id, %component, %action, "action request");

    let refreshed = target.attach(&ctx).await;

    (
        [(REQUEST_ID_HEADER, ctx.request_id.to_string())],
        Json(refreshed),
    )
        .into_response()
}

fn to_headers(headers: &HeaderMap) -> Headers {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}
