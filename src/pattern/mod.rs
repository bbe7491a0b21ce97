//! Pattern compilation subsystem.
//!
//! # Data Flow
//! ```text
//! Template string  "/user/<int:id>/"
//!     → compiler.rs (scan into literal / placeholder segments)
//!     → converter.rs (resolve placeholder types to fragments)
//!     → anchored regex  ^/user/(?P<id>\d+)/?$
//!     → Freeze as immutable PathPattern
//! ```
//!
//! # Design Decisions
//! - Templates compile exactly once, at route registration; matching
//!   never recompiles
//! - Literal text is regex-escaped, so dots and other metacharacters
//!   in templates match themselves only
//! - A template ending in `/` tolerates its absence in the request
//!   path and vice versa; the router decides whether that tolerance
//!   becomes a match or a redirect

mod converter;

pub mod compiler;

pub use compiler::{PathPattern, PatternError};

pub(crate) use compiler::Segment;
