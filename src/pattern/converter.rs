//! Placeholder type table.
//!
//! Maps the type token of a `<type:name>` placeholder to the regex
//! fragment that captures it. Unknown tokens pass through verbatim so
//! a placeholder can embed a custom fragment, e.g. `<[a-z]{3}:code>`,
//! where the token itself is the regex.

/// Built-in placeholder types and the fragments they capture.
const CONVERTERS: &[(&str, &str)] = &[
    ("int", r"\d+"),
    ("string", r"[\w\-]+"),
    ("str", r"[\w\-]+"),
    ("any", r"[^/]+"),
];

/// Type applied when a placeholder omits its type token.
pub(crate) const DEFAULT_TYPE: &str = "any";

/// Resolve a type token to its capture fragment.
///
/// Unknown tokens are returned unchanged and treated as a raw regex
/// fragment by the compiler.
pub(crate) fn resolve(type_token: &str) -> &str {
    CONVERTERS
        .iter()
        .find(|(token, _)| *token == type_token)
        .map(|(_, fragment)| *fragment)
        .unwrap_or(type_token)
}
