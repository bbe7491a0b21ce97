//! Router-wide dispatch hooks.
//!
//! # Responsibilities
//! - Name the four well-known points in the dispatch pipeline
//! - Store hook chains per point and run them in registration order
//!
//! # Design Decisions
//! - Hooks reuse the [`Middleware`] trait: the hook point decides
//!   which phase fires, so one registration API covers both sides
//! - `BeforeRouting` / `AfterRouting` bracket the whole pipeline and
//!   run on every request, not-found and redirect outcomes included

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;

use crate::middleware::{Middleware, RequestInfo};

/// A point in the dispatch pipeline where hooks run.
///
/// The `Before*` points fire the [`Middleware::before`] phase, the
/// `After*` points fire [`Middleware::after`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    /// Before route lookup. Runs for every request.
    BeforeRouting,
    /// After a route (or redirect) was selected, before its
    /// middleware and handler run. Skipped when nothing matched.
    BeforeDispatch,
    /// After the matched handler produced a response. Skipped for
    /// redirects and not-found responses.
    AfterDispatch,
    /// After a response exists, whatever path produced it. Runs for
    /// every request.
    AfterRouting,
}

/// Hook chains keyed by pipeline point.
#[derive(Default)]
pub(crate) struct HookRegistry {
    hooks: HashMap<HookPoint, Vec<Arc<dyn Middleware>>>,
}

impl HookRegistry {
    pub(crate) fn add(&mut self, point: HookPoint, hook: Arc<dyn Middleware>) {
        self.hooks.entry(point).or_default().push(hook);
    }

    /// Run the before phase of every hook at `point`, in registration
    /// order.
    pub(crate) fn run_before(&self, point: HookPoint, req: &mut Request<Body>) {
        if let Some(chain) = self.hooks.get(&point) {
            for hook in chain {
                hook.before(req);
            }
        }
    }

    /// Run the after phase of every hook at `point`, in registration
    /// order.
    pub(crate) fn run_after(&self, point: HookPoint, info: &RequestInfo, res: &mut Response) {
        if let Some(chain) = self.hooks.get(&point) {
            for hook in chain {
                hook.after(info, res);
            }
        }
    }
}
