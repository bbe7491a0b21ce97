//! Shared fixtures for the integration tests.

use std::future::{ready, Ready};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use request_router::{Middleware, RequestInfo};

/// Handler answering 200 with a fixed body.
pub fn text_handler(
    text: &'static str,
) -> impl Fn(Request<Body>) -> Ready<&'static str> + Send + Sync + 'static {
    move |_req| ready(text)
}

/// Read a response body into a string.
#[allow(dead_code)]
pub async fn body_text(res: Response) -> String {
    let bytes = axum::body::to_bytes(res.into_body(), 64 * 1024)
        .await
        .unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Middleware recording which phases ran, for ordering assertions.
#[allow(dead_code)]
pub struct EventLog {
    label: &'static str,
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    #[allow(dead_code)]
    pub fn new(label: &'static str, events: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            label,
            events: Arc::clone(events),
        }
    }
}

impl Middleware for EventLog {
    fn before(&self, _req: &mut Request<Body>) {
        self.events
            .lock()
            .unwrap()
            .push(format!("{}:before", self.label));
    }

    fn after(&self, _info: &RequestInfo, _res: &mut Response) {
        self.events
            .lock()
            .unwrap()
            .push(format!("{}:after", self.label));
    }
}

/// After-phase middleware replacing the response with 401 whenever the
/// request carried `user_id=10000`, path parameters included.
pub struct FilterUser;

impl Middleware for FilterUser {
    fn after(&self, info: &RequestInfo, res: &mut Response) {
        if info.query_param("user_id").as_deref() == Some("10000") {
            *res = (StatusCode::UNAUTHORIZED, "").into_response();
        }
    }
}

/// Install a fmt subscriber once, so `RUST_LOG` shows router events.
#[allow(dead_code)]
pub fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "request_router=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
