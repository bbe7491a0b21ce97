//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, method)
//!     → router.rs (iterate routes in registration order)
//!     → route.rs (method gate → pattern match → slash policy)
//!     → first positive RouteMatch wins
//!     → dispatch: hooks, middleware, handler (or redirect / not-found)
//! ```
//!
//! # Design Decisions
//! - Registration order is match priority; no specificity reordering
//! - Patterns compile when a route is registered, never at request
//!   time; an invalid template is rejected before it enters the table
//! - Registration takes `&mut Router`, dispatch takes `&Router`: once
//!   the router is shared, the table is immutable
//! - A strict-slash disagreement dispatches a 301 redirect instead of
//!   the handler

pub mod route;
pub mod router;

pub use route::{MatchKind, Route, RouteMatch};
pub use router::Router;
