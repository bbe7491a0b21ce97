//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! config source (TOML, JSON, ...)
//!     → serde deserialize into RouterConfig
//!     → Router::from_config binds handler names via a HandlerMap
//!     → Router (compiled patterns, immutable once serving)
//! ```
//!
//! # Design Decisions
//! - Handlers are code, not config: the config names them and a
//!   HandlerMap supplies them at binding time
//! - All fields have defaults so minimal configs stay minimal
//! - Pattern errors surface during binding, with the offending
//!   pattern attached

pub mod schema;

pub use schema::{ConfigError, HandlerMap, RouteConfig, RouterConfig};
