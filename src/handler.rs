//! Request handlers.
//!
//! # Responsibilities
//! - Define the object-safe [`Handler`] trait routes dispatch to
//! - Accept plain async functions and closures as handlers
//! - Provide the built-in redirect and not-found handlers
//!
//! # Design Decisions
//! - Handlers consume the request: ownership of the body moves into
//!   the handler, matching how axum handlers behave
//! - Futures are boxed so handlers can be stored as trait objects
//!   behind `Arc` and shared across routes

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use std::future::Future;

/// An asynchronous request handler.
///
/// Implemented automatically for any `Fn(Request<Body>) -> Future`
/// whose output converts into a [`Response`], so routes can be
/// registered with async closures:
///
/// ```
/// use axum::body::Body;
/// use axum::http::Request;
/// use request_router::Router;
///
/// let mut router = Router::new();
/// router
///     .handle("/health", |_req: Request<Body>| async { "ok" })
///     .unwrap();
/// ```
pub trait Handler: Send + Sync + 'static {
    /// Handle a request, producing a response.
    fn call(&self, req: Request<Body>) -> BoxFuture<'static, Response>;
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn call(&self, req: Request<Body>) -> BoxFuture<'static, Response> {
        let fut = self(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

/// Handler that answers every request with a redirect.
///
/// Used by the dispatch pipeline for trailing-slash corrections, where
/// a permanent redirect points clients at the canonical form of the
/// path they requested.
#[derive(Debug, Clone)]
pub struct Redirect {
    status: StatusCode,
    location: String,
}

impl Redirect {
    /// A `301 Moved Permanently` redirect to the given location.
    pub fn permanent(location: impl Into<String>) -> Self {
        Self {
            status: StatusCode::MOVED_PERMANENTLY,
            location: location.into(),
        }
    }

    /// Target location of the redirect.
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl Handler for Redirect {
    fn call(&self, _req: Request<Body>) -> BoxFuture<'static, Response> {
        let res = Response::builder()
            .status(self.status)
            .header(header::LOCATION, &self.location)
            .body(Body::empty())
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response());
        Box::pin(std::future::ready(res))
    }
}

/// Default handler for requests no route matched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFound;

impl Handler for NotFound {
    fn call(&self, _req: Request<Body>) -> BoxFuture<'static, Response> {
        let res = (StatusCode::NOT_FOUND, "404 page not found").into_response();
        Box::pin(std::future::ready(res))
    }
}
