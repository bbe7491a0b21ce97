//! A single registered route and its match operation.
//!
//! # Responsibilities
//! - Bind one compiled pattern to a handler, methods, name, and
//!   middleware
//! - Decide matched / redirect / not-matched for a path and method
//! - Extract path parameters on a slash-compatible match
//!
//! # Design Decisions
//! - The pattern compiles in `Route::new`, so an invalid template is
//!   rejected before the route ever enters a router
//! - Methods are normalized to uppercase at configuration time; an
//!   empty method list answers `GET` only
//! - A strict-slash mismatch yields a redirect pseudo-handler instead
//!   of the real one; no parameters are extracted on that path

use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use crate::handler::{Handler, Redirect};
use crate::middleware::Middleware;
use crate::params::PathParams;
use crate::pattern::{PathPattern, PatternError};

/// One pattern bound to a handler, with per-route options.
///
/// Obtained from [`Router::handle`](crate::Router::handle) (or
/// [`Route::new`] directly) and configured through chainable setters:
///
/// ```
/// use axum::body::Body;
/// use axum::http::Request;
/// use request_router::Router;
///
/// let mut router = Router::new();
/// router
///     .handle("/user/<int:id>/", |_req: Request<Body>| async { "user" })
///     .unwrap()
///     .methods(["GET", "POST"])
///     .named("user-detail")
///     .strict_slash(true);
/// ```
pub struct Route {
    pattern: PathPattern,
    handler: Arc<dyn Handler>,
    methods: Vec<String>,
    name: Option<String>,
    strict_slash: bool,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl Route {
    /// Compile `pattern` and bind it to `handler`.
    ///
    /// Fails if the template does not compile; a route is never
    /// constructed around an invalid pattern.
    pub fn new(pattern: &str, handler: impl Handler) -> Result<Self, PatternError> {
        Self::shared(pattern, Arc::new(handler))
    }

    pub(crate) fn shared(pattern: &str, handler: Arc<dyn Handler>) -> Result<Self, PatternError> {
        Ok(Self {
            pattern: PathPattern::compile(pattern)?,
            handler,
            methods: Vec::new(),
            name: None,
            strict_slash: false,
            middleware: Vec::new(),
        })
    }

    /// Restrict the route to the given HTTP methods.
    ///
    /// Input is case-insensitive and stored uppercased. With no
    /// methods configured the route answers `GET` only.
    pub fn methods<I, S>(&mut self, methods: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.methods
            .extend(methods.into_iter().map(|m| m.as_ref().to_ascii_uppercase()));
        self
    }

    /// Give the route a symbolic name for reverse URL generation.
    pub fn named(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Enable or disable trailing-slash redirects for this route.
    ///
    /// When enabled, a path that matches but disagrees with the
    /// pattern about its trailing slash is answered with a `301` to
    /// the corrected path instead of the handler.
    pub fn strict_slash(&mut self, strict: bool) -> &mut Self {
        self.strict_slash = strict;
        self
    }

    /// Attach middleware to this route. Runs for every dispatched
    /// request, in attachment order.
    pub fn middleware(&mut self, middleware: impl Middleware + 'static) -> &mut Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub(crate) fn middleware_shared(&mut self, middleware: Arc<dyn Middleware>) -> &mut Self {
        self.middleware.push(middleware);
        self
    }

    /// The canonicalized pattern this route was registered with.
    pub fn pattern(&self) -> &str {
        self.pattern.template()
    }

    /// The route's symbolic name, if one was set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn path_pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub(crate) fn middleware_chain(&self) -> &[Arc<dyn Middleware>] {
        &self.middleware
    }

    fn allows_method(&self, method: &str) -> bool {
        let method = method.to_ascii_uppercase();
        if self.methods.is_empty() {
            method == Method::GET.as_str()
        } else {
            self.methods.iter().any(|m| *m == method)
        }
    }

    /// Match a path and method against this route.
    ///
    /// Returns `None` when either the method or the path disagrees.
    /// A strict-slash disagreement returns a redirect match carrying
    /// a [`Redirect`] pseudo-handler and no parameters.
    pub fn matches(&self, path: &str, method: &str) -> Option<RouteMatch<'_>> {
        if !self.allows_method(method) {
            return None;
        }
        if !self.pattern.matches(path) {
            return None;
        }

        if self.strict_slash {
            let declared = self.pattern.has_trailing_slash();
            let requested = path.ends_with('/');
            if declared != requested {
                let location = if declared {
                    format!("{path}/")
                } else {
                    path[..path.len() - 1].to_string()
                };
                return Some(RouteMatch {
                    route: self,
                    handler: Arc::new(Redirect::permanent(location)),
                    params: PathParams::new(),
                    kind: MatchKind::Redirect,
                });
            }
        }

        let params = self.pattern.capture(path).unwrap_or_default();
        Some(RouteMatch {
            route: self,
            handler: Arc::clone(&self.handler),
            params,
            kind: MatchKind::Handler,
        })
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern.template())
            .field("name", &self.name)
            .field("methods", &self.methods)
            .field("strict_slash", &self.strict_slash)
            .field("middleware", &self.middleware.len())
            .finish()
    }
}

/// How a positive match should be dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Dispatch to the route's real handler, middleware included.
    Handler,
    /// Dispatch to a trailing-slash redirect; middleware is skipped.
    Redirect,
}

/// A positive match produced by [`Route::matches`].
pub struct RouteMatch<'r> {
    route: &'r Route,
    handler: Arc<dyn Handler>,
    params: PathParams,
    kind: MatchKind,
}

impl<'r> RouteMatch<'r> {
    /// The route that matched.
    pub fn route(&self) -> &'r Route {
        self.route
    }

    /// The handler to dispatch to: the route's own, or a redirect.
    pub fn handler(&self) -> Arc<dyn Handler> {
        Arc::clone(&self.handler)
    }

    /// Parameters captured from the path. Empty for redirects.
    pub fn params(&self) -> &PathParams {
        &self.params
    }

    /// Whether this match dispatches to the handler or a redirect.
    pub fn kind(&self) -> MatchKind {
        self.kind
    }

    /// Shorthand for `kind() == MatchKind::Redirect`.
    pub fn is_redirect(&self) -> bool {
        self.kind == MatchKind::Redirect
    }
}

impl fmt::Debug for RouteMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("pattern", &self.route.pattern())
            .field("kind", &self.kind)
            .field("params", &self.params)
            .finish()
    }
}
