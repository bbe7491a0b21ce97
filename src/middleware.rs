//! Middleware attached to routes and routers.
//!
//! # Responsibilities
//! - Define the two-phase [`Middleware`] trait (before / after)
//! - Snapshot request metadata for the after phase
//! - Wrap plain closures as single-phase middleware
//!
//! # Design Decisions
//! - One trait covers both per-route middleware and router-wide hooks;
//!   the pipeline decides which phase runs at each point
//! - Both phases are synchronous mutations. Work that must await
//!   belongs in a handler, not a middleware
//! - The after phase receives a [`RequestInfo`] snapshot because the
//!   request itself has already been consumed by the handler

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, Uri, Version};
use axum::response::Response;

/// A two-phase request/response interceptor.
///
/// `before` runs ahead of the handler and may rewrite the request;
/// `after` runs once a response exists and may rewrite it. Either
/// phase can be left as the provided no-op.
///
/// Per-route chains run `before` in registration order and `after` in
/// reverse registration order, so the first middleware registered is
/// the outermost.
pub trait Middleware: Send + Sync {
    /// Inspect or rewrite the request before the handler runs.
    fn before(&self, req: &mut Request<Body>) {
        let _ = req;
    }

    /// Inspect or rewrite the response after the handler ran.
    fn after(&self, info: &RequestInfo, res: &mut Response) {
        let _ = (info, res);
    }
}

/// Immutable snapshot of a request, taken just before the handler
/// consumed it.
///
/// Carries everything the after phase needs to act on the response:
/// method, URI (with any merged path parameters), version and headers.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
}

impl RequestInfo {
    pub(crate) fn new<B>(req: &Request<B>) -> Self {
        Self {
            method: req.method().clone(),
            uri: req.uri().clone(),
            version: req.version(),
            headers: req.headers().clone(),
        }
    }

    /// Request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Full request URI as the handler saw it.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Path component of the URI.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// HTTP version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First query-string parameter with the given name, decoded.
    ///
    /// Sees merged path parameters the same way handlers do.
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.uri.query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

/// Wrap a closure as before-phase middleware.
pub fn before_fn<F>(f: F) -> BeforeFn<F>
where
    F: Fn(&mut Request<Body>) + Send + Sync,
{
    BeforeFn(f)
}

/// Wrap a closure as after-phase middleware.
pub fn after_fn<F>(f: F) -> AfterFn<F>
where
    F: Fn(&RequestInfo, &mut Response) + Send + Sync,
{
    AfterFn(f)
}

/// Middleware adapter produced by [`before_fn`].
pub struct BeforeFn<F>(F);

impl<F> Middleware for BeforeFn<F>
where
    F: Fn(&mut Request<Body>) + Send + Sync,
{
    fn before(&self, req: &mut Request<Body>) {
        (self.0)(req)
    }
}

/// Middleware adapter produced by [`after_fn`].
pub struct AfterFn<F>(F);

impl<F> Middleware for AfterFn<F>
where
    F: Fn(&RequestInfo, &mut Response) + Send + Sync,
{
    fn after(&self, info: &RequestInfo, res: &mut Response) {
        (self.0)(info, res)
    }
}
