//! Mounting the router into a server.
//!
//! # Responsibilities
//! - Adapt a finished [`Router`] to `tower::Service`
//! - Share one route registry across connections and tasks
//!
//! # Design Decisions
//! - The service holds the router behind `Arc`, so the per-connection
//!   clones a server makes all read the same registry
//! - `Error = Infallible`: dispatch always produces a response, so
//!   the service error channel stays unused

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use futures_util::future::BoxFuture;
use tower::Service;

use crate::routing::Router;

/// `tower::Service` adapter for a [`Router`].
///
/// Obtained from [`Router::into_service`], which ends the registration
/// phase: the router is immutable from here on. Mounts into axum as a
/// fallback service, or anywhere else a request/response service is
/// accepted:
///
/// ```no_run
/// # async fn serve() -> std::io::Result<()> {
/// use axum::body::Body;
/// use axum::http::Request;
/// use request_router::Router;
///
/// let mut router = Router::new();
/// router
///     .handle("/health", |_req: Request<Body>| async { "ok" })
///     .unwrap();
///
/// let app = axum::Router::new().fallback_service(router.into_service());
/// let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
/// axum::serve(listener, app).await
/// # }
/// ```
#[derive(Clone)]
pub struct RouterService {
    router: Arc<Router>,
}

impl RouterService {
    /// Wrap a router, freezing its route table.
    pub fn new(router: Router) -> Self {
        Self {
            router: Arc::new(router),
        }
    }

    /// The wrapped router, for reverse lookups after mounting.
    pub fn router(&self) -> &Router {
        &self.router
    }
}

impl Service<Request<Body>> for RouterService {
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // Dispatch is synchronous over an immutable registry; there is
        // no readiness to wait for.
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let router = Arc::clone(&self.router);
        Box::pin(async move { Ok(router.dispatch(req).await) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn request(path: &str) -> Request<Body> {
        Request::builder().uri(path).body(Body::default()).unwrap()
    }

    #[tokio::test]
    async fn test_service_dispatches_to_router() {
        let mut router = Router::new();
        router
            .handle("/ping", |_req: Request<Body>| async { "pong" })
            .unwrap();

        let mut service = router.into_service();
        let res = service.call(request("/ping")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = service.call(request("/missing")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_clones_share_one_registry() {
        let mut router = Router::new();
        router
            .handle("/user/<int:id>", |_req: Request<Body>| async { "user" })
            .unwrap()
            .named("user");

        let service = router.into_service();
        let mut clone = service.clone();

        let res = clone.call(request("/user/7")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            service.router().url_for("user", [("id", 7)]),
            Some("/user/7".to_string())
        );
    }
}
