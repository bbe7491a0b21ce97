//! HTTP request router with typed path parameters.
//!
//! Routes are declared as path templates (`/user/<int:id>/`), matched
//! in registration order, and dispatched through a middleware/hook
//! pipeline. Symbolic route names support reverse URL generation, and
//! [`Router::into_service`] mounts the finished router onto any
//! tower-compatible server.

pub mod config;
pub mod handler;
pub mod hooks;
pub mod middleware;
pub mod params;
pub mod pattern;
pub mod routing;
pub mod service;

pub use config::{ConfigError, HandlerMap, RouteConfig, RouterConfig};
pub use handler::{Handler, NotFound, Redirect};
pub use hooks::HookPoint;
pub use middleware::{after_fn, before_fn, Middleware, RequestInfo};
pub use params::{PathParams, RequestExt};
pub use pattern::{PathPattern, PatternError};
pub use routing::{MatchKind, Route, RouteMatch, Router};
pub use service::RouterService;
