//! Template scanning and regex construction.
//!
//! # Responsibilities
//! - Split a template into literal and `<type:name>` placeholder
//!   segments
//! - Reject malformed placeholders and duplicate parameter names
//! - Assemble and compile the anchored matching regex
//!
//! # Design Decisions
//! - Errors surface at registration, not at match time: an invalid
//!   template never produces a route
//! - Parameter names are restricted to identifiers so they are always
//!   valid regex capture names
//! - The parsed segments are kept alongside the regex for reverse URL
//!   generation

use regex::Regex;
use thiserror::Error;

use crate::params::PathParams;
use crate::pattern::converter;

/// Error raised when a route template fails to compile.
#[derive(Debug, Error)]
pub enum PatternError {
    /// A `<` was opened and never closed.
    #[error("unterminated placeholder in pattern {0:?}")]
    UnterminatedPlaceholder(String),
    /// A `>` with no open placeholder, or a `<` inside one.
    #[error("unexpected {found:?} in pattern {pattern:?}")]
    StrayDelimiter { found: char, pattern: String },
    /// `<>`, `<:name>` or `<type:>`.
    #[error("empty placeholder in pattern {0:?}")]
    EmptyPlaceholder(String),
    /// Parameter names must match `[A-Za-z_][A-Za-z0-9_]*`.
    #[error("invalid parameter name {0:?}")]
    InvalidParamName(String),
    /// The same parameter name appeared twice in one template.
    #[error("duplicate parameter name {0:?} in pattern {1:?}")]
    DuplicateParam(String, String),
    /// A custom placeholder fragment broke the assembled regex.
    #[error("pattern {pattern:?} does not compile to a valid matcher")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// One piece of a scanned template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    /// Verbatim text between placeholders.
    Literal(String),
    /// A `<name>` or `<type:name>` placeholder.
    Placeholder {
        /// Type token as written, `None` when omitted.
        type_token: Option<String>,
        name: String,
    },
}

impl Segment {
    /// The segment as it appeared in the template source.
    pub(crate) fn source_text(&self) -> String {
        match self {
            Segment::Literal(lit) => lit.clone(),
            Segment::Placeholder {
                type_token: Some(token),
                name,
            } => format!("<{token}:{name}>"),
            Segment::Placeholder {
                type_token: None,
                name,
            } => format!("<{name}>"),
        }
    }
}

/// A compiled route template.
///
/// Matching is a single anchored regex evaluation. The original
/// template and its parsed segments are retained for diagnostics and
/// reverse URL generation.
#[derive(Debug)]
pub struct PathPattern {
    template: String,
    regex: Regex,
    param_names: Vec<String>,
    trailing_slash: bool,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a template into a matcher.
    ///
    /// The template is canonicalized to start with `/`. The resulting
    /// regex is anchored at both ends and tolerates one optional
    /// trailing slash, in either direction:
    ///
    /// - `/test`  compiles to `^/test/?$`
    /// - `/test/` compiles to `^/test/?$` (the written slash becomes
    ///   the optional one)
    pub fn compile(template: &str) -> Result<Self, PatternError> {
        let template = canonicalize(template);
        let segments = scan(&template)?;

        let mut source = String::with_capacity(template.len() + 16);
        source.push('^');
        let mut param_names: Vec<String> = Vec::new();

        for segment in &segments {
            match segment {
                Segment::Literal(lit) => source.push_str(&regex::escape(lit)),
                Segment::Placeholder { type_token, name } => {
                    if !is_valid_param_name(name) {
                        return Err(PatternError::InvalidParamName(name.clone()));
                    }
                    if param_names.iter().any(|existing| existing == name) {
                        return Err(PatternError::DuplicateParam(name.clone(), template));
                    }
                    let token = type_token.as_deref().unwrap_or(converter::DEFAULT_TYPE);
                    let fragment = converter::resolve(token);
                    source.push_str(&format!("(?P<{name}>{fragment})"));
                    param_names.push(name.clone());
                }
            }
        }

        let trailing_slash = template.ends_with('/');
        source.push_str(if trailing_slash { "?$" } else { "/?$" });

        let regex = Regex::new(&source).map_err(|err| PatternError::Regex {
            pattern: template.clone(),
            source: err,
        })?;

        Ok(Self {
            template,
            regex,
            param_names,
            trailing_slash,
            segments,
        })
    }

    /// The canonicalized template this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Parameter names in the order they appear in the template.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Whether the written template ends in `/`.
    pub fn has_trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    /// Whether a request path matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match a path and extract its parameters, in template order.
    pub fn capture(&self, path: &str) -> Option<PathParams> {
        let caps = self.regex.captures(path)?;
        let mut params = PathParams::new();
        for name in &self.param_names {
            if let Some(m) = caps.name(name) {
                params.insert(name.as_str(), m.as_str());
            }
        }
        Some(params)
    }

    pub(crate) fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/// Ensure the template starts with `/`.
fn canonicalize(template: &str) -> String {
    if template.starts_with('/') {
        template.to_string()
    } else {
        format!("/{template}")
    }
}

/// Split a template into literal and placeholder segments.
fn scan(template: &str) -> Result<Vec<Segment>, PatternError> {
    let mut segments = Vec::new();
    let mut rest = template;

    while !rest.is_empty() {
        let Some(open) = rest.find(['<', '>']) else {
            segments.push(Segment::Literal(rest.to_string()));
            break;
        };
        if rest[open..].starts_with('>') {
            return Err(PatternError::StrayDelimiter {
                found: '>',
                pattern: template.to_string(),
            });
        }
        if open > 0 {
            segments.push(Segment::Literal(rest[..open].to_string()));
        }

        let after_open = &rest[open + 1..];
        let close = after_open
            .find(['<', '>'])
            .ok_or_else(|| PatternError::UnterminatedPlaceholder(template.to_string()))?;
        if after_open[close..].starts_with('<') {
            return Err(PatternError::StrayDelimiter {
                found: '<',
                pattern: template.to_string(),
            });
        }

        let body = &after_open[..close];
        let (type_token, name) = match body.split_once(':') {
            Some((token, name)) => (Some(token), name),
            None => (None, body),
        };
        if name.is_empty() || type_token == Some("") {
            return Err(PatternError::EmptyPlaceholder(template.to_string()));
        }

        segments.push(Segment::Placeholder {
            type_token: type_token.map(str::to_string),
            name: name.to_string(),
        });
        rest = &after_open[close + 1..];
    }

    Ok(segments)
}

fn is_valid_param_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_template_matches_exact_path() {
        let pattern = PathPattern::compile("/health").unwrap();
        assert!(pattern.matches("/health"));
        assert!(!pattern.matches("/heal"));
        assert!(!pattern.matches("/health/live"));
    }

    #[test]
    fn test_trailing_slash_is_optional_both_ways() {
        let bare = PathPattern::compile("/test").unwrap();
        assert!(bare.matches("/test"));
        assert!(bare.matches("/test/"));

        let slashed = PathPattern::compile("/test/").unwrap();
        assert!(slashed.matches("/test"));
        assert!(slashed.matches("/test/"));
        assert!(!slashed.matches("/test//"));
    }

    #[test]
    fn test_typed_placeholders_capture_in_order() {
        let pattern = PathPattern::compile("/<string:one>/<string:two>/<int:three>/").unwrap();
        let params = pattern.capture("/user/profile/10000/").unwrap();

        let collected: Vec<_> = params.iter().collect();
        assert_eq!(
            collected,
            vec![("one", "user"), ("two", "profile"), ("three", "10000")]
        );
    }

    #[test]
    fn test_int_type_rejects_non_digits() {
        let pattern = PathPattern::compile("/user/<int:id>").unwrap();
        assert!(pattern.capture("/user/abc").is_none());

        let params = pattern.capture("/user/123").unwrap();
        assert_eq!(params.get("id"), Some("123"));
    }

    #[test]
    fn test_string_type_is_narrower_than_any() {
        let string = PathPattern::compile("/f/<string:v>").unwrap();
        assert!(string.matches("/f/ab-c_1"));
        assert!(!string.matches("/f/a.b"));

        let any = PathPattern::compile("/f/<any:v>").unwrap();
        assert!(any.matches("/f/a.b"));
        assert!(!any.matches("/f/a/b"));
    }

    #[test]
    fn test_untyped_placeholder_defaults_to_any() {
        let pattern = PathPattern::compile("/<name>").unwrap();
        let params = pattern.capture("/report.pdf").unwrap();
        assert_eq!(params.get("name"), Some("report.pdf"));
    }

    #[test]
    fn test_unknown_type_is_a_raw_fragment() {
        let pattern = PathPattern::compile("/<[a-z]{3}:code>").unwrap();
        assert!(pattern.matches("/abc"));
        assert!(!pattern.matches("/abcd"));
        assert!(!pattern.matches("/ab1"));
    }

    #[test]
    fn test_leading_slash_is_added() {
        let pattern = PathPattern::compile("health").unwrap();
        assert_eq!(pattern.template(), "/health");
        assert!(pattern.matches("/health"));
    }

    #[test]
    fn test_literal_metacharacters_match_themselves_only() {
        let pattern = PathPattern::compile("/v1.0/data").unwrap();
        assert!(pattern.matches("/v1.0/data"));
        assert!(!pattern.matches("/v1x0/data"));
    }

    #[test]
    fn test_duplicate_param_rejected() {
        let err = PathPattern::compile("/<int:id>/<string:id>").unwrap_err();
        assert!(matches!(err, PatternError::DuplicateParam(name, _) if name == "id"));
    }

    #[test]
    fn test_malformed_placeholders_rejected() {
        assert!(matches!(
            PathPattern::compile("/a<b").unwrap_err(),
            PatternError::UnterminatedPlaceholder(_)
        ));
        assert!(matches!(
            PathPattern::compile("/a>b").unwrap_err(),
            PatternError::StrayDelimiter { found: '>', .. }
        ));
        assert!(matches!(
            PathPattern::compile("/a<<b>").unwrap_err(),
            PatternError::StrayDelimiter { found: '<', .. }
        ));
        assert!(matches!(
            PathPattern::compile("/<>").unwrap_err(),
            PatternError::EmptyPlaceholder(_)
        ));
        assert!(matches!(
            PathPattern::compile("/<int:>").unwrap_err(),
            PatternError::EmptyPlaceholder(_)
        ));
        assert!(matches!(
            PathPattern::compile("/<:name>").unwrap_err(),
            PatternError::EmptyPlaceholder(_)
        ));
    }

    #[test]
    fn test_invalid_param_name_rejected() {
        let err = PathPattern::compile("/<int:user-id>").unwrap_err();
        assert!(matches!(err, PatternError::InvalidParamName(name) if name == "user-id"));
    }

    #[test]
    fn test_broken_custom_fragment_rejected() {
        let err = PathPattern::compile("/<[:code>").unwrap_err();
        assert!(matches!(err, PatternError::Regex { .. }));
    }

    #[test]
    fn test_param_names_follow_template_order() {
        let pattern = PathPattern::compile("/<a>/<b>/<c>").unwrap();
        assert_eq!(pattern.param_names(), ["a", "b", "c"]);
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let first = PathPattern::compile("/user/<int:id>/").unwrap();
        let second = PathPattern::compile("/user/<int:id>/").unwrap();
        assert_eq!(first.regex.as_str(), second.regex.as_str());
        assert_eq!(first.template(), second.template());
    }

    #[test]
    fn test_root_template() {
        let pattern = PathPattern::compile("/").unwrap();
        assert!(pattern.matches("/"));
        assert!(!pattern.matches("/x"));
    }

    #[test]
    fn test_scan_reconstructs_source() {
        let pattern = PathPattern::compile("/u/<int:id>/x/<rest>").unwrap();
        let rebuilt: String = pattern
            .segments()
            .iter()
            .map(Segment::source_text)
            .collect();
        assert_eq!(rebuilt, "/u/<int:id>/x/<rest>");
    }
}
