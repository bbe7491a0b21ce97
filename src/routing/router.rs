//! Route registry and dispatch.
//!
//! # Responsibilities
//! - Register routes and apply router-wide defaults to them
//! - Dispatch requests through hooks, middleware, and handlers
//! - Select between handler, redirect, and not-found outcomes
//! - Generate URLs from route names (reverse routing)
//!
//! # Design Decisions
//! - Registration takes `&mut self`, dispatch takes `&self`: the
//!   registration phase ends when the router is shared, and the
//!   borrow checker enforces it
//! - First match in registration order wins; no backtracking, no
//!   specificity reordering
//! - After-routing hooks run on every exit path (handler, redirect,
//!   not-found), so response-wide concerns see every response
//! - Reverse lookup scans routes backwards, making the last
//!   registration of a name win without a separate name index

use std::fmt;
use std::sync::Arc;

use axum::body::Body;
use axum::http::uri::PathAndQuery;
use axum::http::{Request, Uri};
use axum::response::Response;

use crate::config::{ConfigError, HandlerMap, RouterConfig};
use crate::handler::{Handler, NotFound};
use crate::hooks::{HookPoint, HookRegistry};
use crate::middleware::{Middleware, RequestInfo};
use crate::params::PathParams;
use crate::pattern::{PatternError, Segment};
use crate::routing::route::Route;
use crate::service::RouterService;

/// Request router: a registry of routes plus the dispatch pipeline.
///
/// Routes are registered during a single-threaded setup phase and the
/// router is then shared read-only with the server:
///
/// ```
/// use axum::body::Body;
/// use axum::http::Request;
/// use request_router::{RequestExt, Router};
///
/// let mut router = Router::new();
/// router
///     .handle("/user/<int:id>/", |req: Request<Body>| async move {
///         format!("user {}", req.param("id").unwrap_or_default())
///     })
///     .unwrap()
///     .named("user-detail");
///
/// assert_eq!(router.url_for("user-detail", [("id", 7)]), Some("/user/7/".into()));
/// ```
pub struct Router {
    routes: Vec<Route>,
    hooks: HookRegistry,
    default_middleware: Vec<Arc<dyn Middleware>>,
    not_found: Arc<dyn Handler>,
    prefix: String,
    strict_slash: bool,
}

impl Router {
    /// An empty router with a generic 404 fallback.
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            hooks: HookRegistry::default(),
            default_middleware: Vec::new(),
            not_found: Arc::new(NotFound),
            prefix: String::new(),
            strict_slash: false,
        }
    }

    /// Build a router from a declarative config.
    ///
    /// `handlers` maps the handler names used in the config to actual
    /// handlers; a name the map does not know is an error, as is any
    /// invalid pattern.
    pub fn from_config(config: &RouterConfig, handlers: &HandlerMap) -> Result<Self, ConfigError> {
        let mut router = Router::new();
        router.prefix(&config.prefix);
        router.strict_slash(config.strict_slash);

        for route_config in &config.routes {
            let Some(handler) = handlers.get(&route_config.handler).cloned() else {
                tracing::warn!(
                    handler = %route_config.handler,
                    "config names an unregistered handler"
                );
                return Err(ConfigError::UnknownHandler(route_config.handler.clone()));
            };
            let route = router
                .register(&route_config.pattern, handler)
                .map_err(|source| ConfigError::Pattern {
                    pattern: route_config.pattern.clone(),
                    source,
                })?;
            if !route_config.methods.is_empty() {
                route.methods(&route_config.methods);
            }
            if let Some(name) = &route_config.name {
                route.named(name);
            }
            if let Some(strict) = route_config.strict_slash {
                route.strict_slash(strict);
            }
        }

        tracing::info!(routes = router.routes.len(), "router built from config");
        Ok(router)
    }

    /// Register a route for `pattern`.
    ///
    /// The pattern compiles immediately; an invalid one is reported
    /// here and never at request time. On success the returned
    /// [`Route`] accepts further configuration (methods, name,
    /// strict-slash, middleware).
    ///
    /// Routes match in registration order: the first route whose
    /// pattern and method agree with the request wins.
    pub fn handle<H: Handler>(
        &mut self,
        pattern: &str,
        handler: H,
    ) -> Result<&mut Route, PatternError> {
        self.register(pattern, Arc::new(handler))
    }

    fn register(
        &mut self,
        pattern: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<&mut Route, PatternError> {
        let pattern = self.prefixed(pattern);
        let mut route = Route::shared(&pattern, handler)?;
        route.strict_slash(self.strict_slash);
        for middleware in &self.default_middleware {
            route.middleware_shared(Arc::clone(middleware));
        }

        tracing::debug!(pattern = route.pattern(), "route registered");
        let at = self.routes.len();
        self.routes.push(route);
        Ok(&mut self.routes[at])
    }

    /// Prepend `prefix` to every pattern registered after this call.
    ///
    /// A trailing slash on the prefix is dropped; a missing leading
    /// slash is added.
    pub fn prefix(&mut self, prefix: &str) -> &mut Self {
        let trimmed = prefix.trim_end_matches('/');
        self.prefix = if trimmed.is_empty() || trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        };
        self
    }

    /// Default strict-slash flag for routes registered after this
    /// call. Each route can still override it.
    pub fn strict_slash(&mut self, strict: bool) -> &mut Self {
        self.strict_slash = strict;
        self
    }

    /// Middleware attached to every route registered after this call,
    /// ahead of the route's own middleware.
    pub fn middleware(&mut self, middleware: impl Middleware + 'static) -> &mut Self {
        self.default_middleware.push(Arc::new(middleware));
        self
    }

    /// Register a hook at one of the pipeline points. Hooks at the
    /// same point run in registration order.
    pub fn hook(&mut self, point: HookPoint, hook: impl Middleware + 'static) -> &mut Self {
        self.hooks.add(point, Arc::new(hook));
        self
    }

    /// Replace the not-found handler invoked when no route matches.
    pub fn not_found(&mut self, handler: impl Handler) -> &mut Self {
        self.not_found = Arc::new(handler);
        self
    }

    /// Registered routes, in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Generate a URL for the route named `name`.
    ///
    /// Each placeholder in the route's pattern is replaced with the
    /// stringified value of the same-named key in `params`; keys
    /// without a placeholder are ignored and placeholders without a
    /// key are left as written. Values are substituted verbatim, with
    /// no validation against the placeholder's type.
    ///
    /// When several routes share a name, the last registered wins.
    /// Returns `None` when no route carries the name.
    pub fn url_for<K, V>(
        &self,
        name: &str,
        params: impl IntoIterator<Item = (K, V)>,
    ) -> Option<String>
    where
        K: AsRef<str>,
        V: fmt::Display,
    {
        let Some(route) = self.routes.iter().rev().find(|r| r.name() == Some(name)) else {
            tracing::warn!(name, "no route registered under this name");
            return None;
        };
        let params: Vec<(String, String)> = params
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.to_string()))
            .collect();

        let mut url = String::with_capacity(route.pattern().len());
        for segment in route.path_pattern().segments() {
            match segment {
                Segment::Literal(lit) => url.push_str(lit),
                Segment::Placeholder { name: param, .. } => {
                    match params.iter().find(|(k, _)| k == param) {
                        Some((_, value)) => url.push_str(value),
                        None => url.push_str(&segment.source_text()),
                    }
                }
            }
        }
        Some(url)
    }

    /// Dispatch one request through the pipeline.
    ///
    /// Before-routing hooks run first, on every request. The first
    /// matching route is dispatched: for a real match its parameters
    /// are merged into the request, its middleware brackets the
    /// handler, and after-dispatch hooks see the response; a redirect
    /// match skips middleware and after-dispatch hooks. When nothing
    /// matches, the not-found handler answers. After-routing hooks
    /// run last on every exit path.
    pub async fn dispatch(&self, mut req: Request<Body>) -> Response {
        self.hooks.run_before(HookPoint::BeforeRouting, &mut req);

        let path = req.uri().path().to_string();
        let method = req.method().as_str().to_string();
        tracing::debug!(method = %method, path = %path, "dispatching request");

        let matched = self
            .routes
            .iter()
            .find_map(|route| route.matches(&path, &method));

        let (info, mut res) = match matched {
            Some(matched) if matched.is_redirect() => {
                tracing::debug!(
                    path = %path,
                    pattern = matched.route().pattern(),
                    "trailing slash redirect"
                );
                let handler = matched.handler();
                self.hooks.run_before(HookPoint::BeforeDispatch, &mut req);
                let info = RequestInfo::new(&req);
                let res = handler.call(req).await;
                (info, res)
            }
            Some(matched) => {
                tracing::debug!(
                    path = %path,
                    pattern = matched.route().pattern(),
                    "route matched"
                );
                let handler = matched.handler();
                merge_params(&mut req, matched.params());
                self.hooks.run_before(HookPoint::BeforeDispatch, &mut req);
                for middleware in matched.route().middleware_chain() {
                    middleware.before(&mut req);
                }
                let info = RequestInfo::new(&req);
                let mut res = handler.call(req).await;
                for middleware in matched.route().middleware_chain().iter().rev() {
                    middleware.after(&info, &mut res);
                }
                self.hooks.run_after(HookPoint::AfterDispatch, &info, &mut res);
                (info, res)
            }
            None => {
                tracing::warn!(path = %path, method = %method, "no route matched");
                let info = RequestInfo::new(&req);
                let res = self.not_found.call(req).await;
                (info, res)
            }
        };

        self.hooks.run_after(HookPoint::AfterRouting, &info, &mut res);
        res
    }

    /// Wrap the router in a [`tower::Service`] for mounting into a
    /// server. Registration ends here: the service shares the router
    /// immutably.
    pub fn into_service(self) -> RouterService {
        RouterService::new(self)
    }

    fn prefixed(&self, pattern: &str) -> String {
        if self.prefix.is_empty() {
            return pattern.to_string();
        }
        if pattern.starts_with('/') {
            format!("{}{}", self.prefix, pattern)
        } else {
            format!("{}/{}", self.prefix, pattern)
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .field("prefix", &self.prefix)
            .field("strict_slash", &self.strict_slash)
            .finish()
    }
}

/// Store captured parameters in the request extensions and prepend
/// them to the query string, so both the typed view and the plain
/// query-parameter view see them. A path parameter therefore appears
/// before any same-named query parameter sent by the client.
fn merge_params(req: &mut Request<Body>, params: &PathParams) {
    req.extensions_mut().insert(params.clone());
    if params.is_empty() {
        return;
    }

    let mut encoded = url::form_urlencoded::Serializer::new(String::new());
    for (name, value) in params.iter() {
        encoded.append_pair(name, value);
    }
    let mut merged = encoded.finish();
    if let Some(existing) = req.uri().query() {
        if !existing.is_empty() {
            merged.push('&');
            merged.push_str(existing);
        }
    }

    let path_and_query = format!("{}?{}", req.uri().path(), merged);
    match path_and_query.parse::<PathAndQuery>() {
        Ok(pq) => {
            let mut parts = req.uri().clone().into_parts();
            parts.path_and_query = Some(pq);
            if let Ok(uri) = Uri::from_parts(parts) {
                *req.uri_mut() = uri;
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to merge path parameters into query string");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::RequestExt;

    fn noop_handler() -> impl Handler {
        |_req: Request<Body>| async { "ok" }
    }

    #[test]
    fn test_invalid_pattern_reported_at_registration() {
        let mut router = Router::new();
        assert!(router.handle("/a<b", noop_handler()).is_err());
        assert!(router.routes().is_empty());
    }

    #[test]
    fn test_url_for_substitutes_typed_placeholder() {
        let mut router = Router::new();
        router
            .handle("/user/<int:id>/", noop_handler())
            .unwrap()
            .named("user-detail");

        assert_eq!(
            router.url_for("user-detail", [("id", 7)]),
            Some("/user/7/".to_string())
        );
    }

    #[test]
    fn test_url_for_unknown_name() {
        let router = Router::new();
        let params: [(&str, &str); 0] = [];
        assert_eq!(router.url_for("missing", params), None);
    }

    #[test]
    fn test_url_for_leaves_unsupplied_placeholders() {
        let mut router = Router::new();
        router
            .handle("/u/<int:id>/<section>", noop_handler())
            .unwrap()
            .named("u");

        assert_eq!(
            router.url_for("u", [("id", 7)]),
            Some("/u/7/<section>".to_string())
        );
    }

    #[test]
    fn test_url_for_last_registration_wins() {
        let mut router = Router::new();
        router.handle("/old", noop_handler()).unwrap().named("page");
        router.handle("/new", noop_handler()).unwrap().named("page");

        let params: [(&str, &str); 0] = [];
        assert_eq!(router.url_for("page", params), Some("/new".to_string()));
    }

    #[test]
    fn test_url_for_ignores_extra_params() {
        let mut router = Router::new();
        router
            .handle("/user/<int:id>", noop_handler())
            .unwrap()
            .named("user");

        assert_eq!(
            router.url_for("user", [("id", "7"), ("unused", "x")]),
            Some("/user/7".to_string())
        );
    }

    #[test]
    fn test_prefix_applies_to_later_registrations() {
        let mut router = Router::new();
        router.prefix("api/");
        router.handle("/users", noop_handler()).unwrap();
        router.handle("status", noop_handler()).unwrap();

        assert_eq!(router.routes()[0].pattern(), "/api/users");
        assert_eq!(router.routes()[1].pattern(), "/api/status");
    }

    #[test]
    fn test_router_strict_slash_is_a_default_not_an_override() {
        let mut router = Router::new();
        router.strict_slash(true);
        router.handle("/a/", noop_handler()).unwrap();
        router
            .handle("/b/", noop_handler())
            .unwrap()
            .strict_slash(false);

        let redirect = router.routes()[0].matches("/a", "GET").unwrap();
        assert!(redirect.is_redirect());
        let direct = router.routes()[1].matches("/b", "GET").unwrap();
        assert!(!direct.is_redirect());
    }

    #[tokio::test]
    async fn test_merge_params_prepends_to_query() {
        let mut router = Router::new();
        router
            .handle("/user/<int:user_id>", |req: Request<Body>| {
                let query = req.uri().query().unwrap_or_default().to_string();
                async move { query }
            })
            .unwrap();

        let req = Request::builder()
            .uri("/user/123?user_id=456&active=true")
            .body(Body::default())
            .unwrap();
        let res = router.dispatch(req).await;
        let body = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"user_id=123&user_id=456&active=true");
    }

    #[tokio::test]
    async fn test_params_visible_in_extensions() {
        let mut router = Router::new();
        router
            .handle("/user/<int:id>", |req: Request<Body>| {
                let id = req.param("id").unwrap_or_default().to_string();
                async move { id }
            })
            .unwrap();

        let req = Request::builder()
            .uri("/user/42")
            .body(Body::default())
            .unwrap();
        let res = router.dispatch(req).await;
        let body = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"42");
    }
}
