//! Route pattern compilation and path helpers.
//!
//! A pattern is a `/`-separated list of segments. A segment is either a
//! literal or a named parameter, written `:name` or `{name}`:
//!
//! ```ignore
//!  Pattern: /sup/:id/and/{this}
//!
//!   /sup/123/and/this        match: id="123", this="this"
//!   /sup/123/foo/this        no match
//!   /sup/123/and             no match
//!   /sup//and/this           no match, parameters never bind an empty segment
//! ```
//!
//! Patterns without parameters compile to a [`Compiled::Literal`] which is
//! looked up by exact string comparison. Everything else compiles to a
//! [`Matcher`], a single-route [`matchit`] tree.
use std::fmt;

use crate::error::PatternError;
use crate::params::Params;

/// The result of compiling a route pattern.
#[derive(Debug)]
pub enum Compiled {
    /// A pattern without parameters, matched by exact comparison.
    Literal(String),
    /// A pattern with one or more named parameters.
    Matcher(Matcher),
}

impl Compiled {
    /// Returns the pattern this was compiled from.
    pub fn pattern(&self) -> &str {
        match self {
            Compiled::Literal(path) => path,
            Compiled::Matcher(matcher) => matcher.pattern(),
        }
    }
}

/// A compiled parameterized pattern.
///
/// ```rust
/// use ngrouter::path::{compile, Compiled};
///
/// let matcher = match compile("/sup/:id/and/{this}").unwrap() {
///     Compiled::Matcher(matcher) => matcher,
///     Compiled::Literal(_) => unreachable!(),
/// };
///
/// let params = matcher.matches("/sup/123/and/this").unwrap();
/// assert_eq!(params.get("id"), Some("123"));
/// assert_eq!(params.get("this"), Some("this"));
///
/// assert!(matcher.matches("/sup/123/foo/this").is_none());
/// ```
pub struct Matcher {
    pattern: String,
    names: Vec<String>,
    tree: matchit::Router<()>,
}

impl Matcher {
    /// Matches a request path, returning the bound parameters on success.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let found = self.tree.at(path).ok()?;

        let mut params = Params::with_capacity(self.names.len());
        for (name, value) in found.params.iter() {
            if value.is_empty() {
                return None;
            }
            params.push(name, value);
        }

        Some(params)
    }

    /// The pattern this matcher was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parameter names in the order they appear in the pattern.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("pattern", &self.pattern)
            .field("names", &self.names)
            .finish()
    }
}

const RESERVED: [char; 4] = [':', '*', '{', '}'];

/// Compiles a route pattern.
///
/// Fails when the pattern does not begin with `/`, declares the same
/// parameter twice, or contains an unterminated `{name` token.
pub fn compile(pattern: &str) -> Result<Compiled, PatternError> {
    if !pattern.starts_with('/') {
        return Err(PatternError::MissingLeadingSlash(pattern.to_owned()));
    }

    let mut names: Vec<&str> = Vec::new();
    let mut literals: Vec<&str> = Vec::new();
    // matchit only understands the `:name` form
    let mut route = String::with_capacity(pattern.len());

    for segment in pattern.split('/').skip(1) {
        route.push('/');
        match param_name(pattern, segment)? {
            Some(name) => {
                if names.contains(&name) {
                    return Err(PatternError::DuplicateParam {
                        pattern: pattern.to_owned(),
                        name: name.to_owned(),
                    });
                }
                names.push(name);
                route.push(':');
                route.push_str(name);
            }
            None => {
                literals.push(segment);
                route.push_str(segment);
            }
        }
    }

    if names.is_empty() {
        return Ok(Compiled::Literal(pattern.to_owned()));
    }

    if let Some(segment) = literals.iter().find(|s| s.contains(RESERVED)) {
        return Err(PatternError::UnsupportedSegment {
            pattern: pattern.to_owned(),
            segment: (*segment).to_owned(),
        });
    }

    let mut tree = matchit::Router::new();
    tree.insert(route, ())
        .map_err(|err| PatternError::Rejected {
            pattern: pattern.to_owned(),
            reason: err.to_string(),
        })?;

    Ok(Compiled::Matcher(Matcher {
        pattern: pattern.to_owned(),
        names: names.into_iter().map(str::to_owned).collect(),
        tree,
    }))
}

fn param_name<'s>(pattern: &str, segment: &'s str) -> Result<Option<&'s str>, PatternError> {
    let name = if let Some(name) = segment.strip_prefix(':') {
        name
    } else if let Some(rest) = segment.strip_prefix('{') {
        rest.strip_suffix('}')
            .ok_or_else(|| PatternError::UnterminatedParam {
                pattern: pattern.to_owned(),
                segment: segment.to_owned(),
            })?
    } else {
        return Ok(None);
    };

    if name.is_empty() {
        return Err(PatternError::EmptyParamName(pattern.to_owned()));
    }

    if name.contains(RESERVED) {
        return Err(PatternError::UnsupportedSegment {
            pattern: pattern.to_owned(),
            segment: segment.to_owned(),
        });
    }

    Ok(Some(name))
}

/// Appends `pattern` to a mount `prefix`.
///
/// A pattern of exactly `/` mounts at the prefix itself, so a group at
/// `/direct` serves its `/` route at `/direct`.
///
/// ```rust
/// use ngrouter::path::join;
///
/// assert_eq!(join("", "/hi"), "/hi");
/// assert_eq!(join("/direct", "/"), "/direct");
/// assert_eq!(join("/direct/", "/download"), "/direct/download");
/// ```
pub fn join(prefix: &str, pattern: &str) -> String {
    if prefix.is_empty() {
        return pattern.to_owned();
    }

    let prefix = prefix.trim_end_matches('/');
    if pattern.is_empty() || pattern == "/" {
        if prefix.is_empty() {
            return "/".to_owned();
        }
        return prefix.to_owned();
    }

    if pattern.starts_with('/') {
        [prefix, pattern].concat()
    } else {
        [prefix, "/", pattern].concat()
    }
}

/// Strips a single trailing slash. The root path is left alone.
pub fn trim_trailing_slash(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

/// Returns the canonical form of a URL path.
///
/// Repeated slashes collapse into one, `.` elements are dropped and `..`
/// elements remove the element before them. `..` never climbs above the
/// root. The result always begins with `/` and keeps a trailing slash if
/// the input had one.
///
/// ```rust
/// use ngrouter::path::clean;
///
/// assert_eq!(clean("abc//def"), "/abc/def");
/// assert_eq!(clean("/abc/def/../../../ghi/"), "/ghi/");
/// ```
pub fn clean(path: &str) -> String {
    let mut elements: Vec<&str> = Vec::new();
    for element in path.split('/') {
        match element {
            "" | "." => {}
            ".." => {
                elements.pop();
            }
            element => elements.push(element),
        }
    }

    if elements.is_empty() {
        return "/".to_owned();
    }

    let mut cleaned = String::with_capacity(path.len() + 1);
    for element in &elements {
        cleaned.push('/');
        cleaned.push_str(element);
    }

    if path.ends_with('/') || path.ends_with("/.") {
        cleaned.push('/');
    }

    cleaned
}
