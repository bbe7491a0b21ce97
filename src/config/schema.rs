//! Configuration schema definitions.
//!
//! Declarative route tables for [`Router::from_config`]. All types
//! derive Serde traits so a router can be described in any format
//! serde reads; handlers themselves are supplied in code through a
//! [`HandlerMap`].
//!
//! [`Router::from_config`]: crate::Router::from_config

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::handler::Handler;
use crate::pattern::PatternError;

/// Named handlers available to config binding.
///
/// Keys are the names route entries refer to in their `handler`
/// field.
pub type HandlerMap = HashMap<String, Arc<dyn Handler>>;

/// Root configuration for a router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Prefix prepended to every route pattern.
    pub prefix: String,

    /// Default strict-slash flag for all routes.
    pub strict_slash: bool,

    /// Route definitions, matched in listed order.
    pub routes: Vec<RouteConfig>,
}

/// One route entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Path template, e.g. `/user/<int:id>/`.
    pub pattern: String,

    /// Name of the handler in the [`HandlerMap`].
    pub handler: String,

    /// Symbolic name for reverse URL generation.
    #[serde(default)]
    pub name: Option<String>,

    /// Allowed HTTP methods; empty means `GET` only.
    #[serde(default)]
    pub methods: Vec<String>,

    /// Per-route strict-slash override. Unset inherits the router
    /// default.
    #[serde(default)]
    pub strict_slash: Option<bool>,
}

/// Error raised while binding a config to handlers.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A route entry carries a pattern that does not compile.
    #[error("route pattern {pattern:?} is invalid")]
    Pattern {
        pattern: String,
        #[source]
        source: PatternError,
    },

    /// A route entry names a handler the map does not contain.
    #[error("no handler registered under name {0:?}")]
    UnknownHandler(String),
}
