//! Field and header matching.
//!
//! Every comparison goes through [`GlobPattern`], so wildcard semantics are
//! the same on each field and on header values. Templates are compiled once
//! into a [`CompiledTemplate`] when a simulation is built.

use crate::body::BodyPattern;
use crate::error::MatchError;
use crate::glob::GlobPattern;
use crate::models::{Headers, RequestDetails, RequestTemplate};

/// A request template with every pattern compiled.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    method: Option<GlobPattern>,
    destination: Option<DestinationPattern>,
    scheme: Option<GlobPattern>,
    path: Option<GlobPattern>,
    query: Option<GlobPattern>,
    headers: Vec<HeaderPattern>,
    body: Option<BodyPattern>,
}

impl CompiledTemplate {
    /// Compile every pattern a template declares.
    pub fn new(template: &RequestTemplate) -> Result<Self, MatchError> {
        Ok(Self {
            method: compile(template.method.as_deref())?,
            destination: template
                .destination
                .as_deref()
                .map(DestinationPattern::new)
                .transpose()?,
            scheme: compile(template.scheme.as_deref())?,
            path: compile(template.path.as_deref())?,
            query: compile(template.query.as_deref())?,
            headers: template
                .headers
                .iter()
                .map(|(name, values)| HeaderPattern::new(name, values))
                .collect::<Result<_, _>>()?,
            body: template.body.as_deref().map(BodyPattern::new).transpose()?,
        })
    }

    /// The first non-body field that rejects the request, if any.
    pub fn mismatched_field(&self, request: &RequestDetails) -> Option<&'static str> {
        if !field_matches(self.method.as_ref(), &request.method) {
            Some("method")
        } else if !self
            .destination
            .as_ref()
            .map_or(true, |d| d.is_match(&request.destination))
        {
            Some("destination")
        } else if !field_matches(self.scheme.as_ref(), &request.scheme) {
            Some("scheme")
        } else if !field_matches(self.path.as_ref(), &request.path) {
            Some("path")
        } else if !field_matches(self.query.as_ref(), &request.query) {
            Some("query")
        } else if !headers_match(&self.headers, &request.headers) {
            Some("headers")
        } else {
            None
        }
    }

    /// Match the request body; only meaningful once every other field matched.
    pub fn matches_body(&self, body: &str) -> Result<bool, MatchError> {
        match &self.body {
            None => Ok(true),
            Some(pattern) => pattern.matches(body),
        }
    }
}

fn compile(pattern: Option<&str>) -> Result<Option<GlobPattern>, MatchError> {
    pattern.map(GlobPattern::new).transpose()
}

fn field_matches(glob: Option<&GlobPattern>, value: &str) -> bool {
    glob.map_or(true, |g| g.is_match(value))
}

/// Match an optional field pattern against a request value.
///
/// An absent pattern matches anything. A present pattern, including the
/// empty string, must glob-match the whole value.
pub fn matches_field(pattern: Option<&str>, value: &str) -> Result<bool, MatchError> {
    Ok(field_matches(compile(pattern)?.as_ref(), value))
}

/// Destination glob, tolerating a scheme prefix on the request side.
///
/// `somehost.com` and `http://somehost.com` are both compared as
/// `somehost.com`. A pattern that spells out its own `scheme://` is compared
/// against the destination as given.
#[derive(Debug, Clone)]
struct DestinationPattern {
    glob: GlobPattern,
    has_scheme: bool,
}

impl DestinationPattern {
    fn new(pattern: &str) -> Result<Self, MatchError> {
        Ok(Self {
            glob: GlobPattern::new(pattern)?,
            has_scheme: pattern.contains("://"),
        })
    }

    fn is_match(&self, destination: &str) -> bool {
        if self.has_scheme {
            self.glob.is_match(destination)
        } else {
            self.glob.is_match(strip_scheme(destination))
        }
    }
}

/// Match a destination pattern, tolerating a scheme prefix on the request side.
pub fn matches_destination(pattern: Option<&str>, destination: &str) -> Result<bool, MatchError> {
    match pattern {
        None => Ok(true),
        Some(p) => Ok(DestinationPattern::new(p)?.is_match(destination)),
    }
}

/// Drop a leading `scheme://` from a destination.
pub fn strip_scheme(destination: &str) -> &str {
    match destination.split_once("://") {
        Some((scheme, rest)) if is_scheme(scheme) => rest,
        _ => destination,
    }
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// One declared header with its value globs.
#[derive(Debug, Clone)]
struct HeaderPattern {
    name: String,
    values: Vec<GlobPattern>,
}

impl HeaderPattern {
    fn new(name: &str, values: &[String]) -> Result<Self, MatchError> {
        Ok(Self {
            name: name.to_string(),
            values: values
                .iter()
                .map(|v| GlobPattern::new(v))
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Match declared headers against observed headers.
///
/// Every declared name must be present (names compare case-insensitively) and
/// its values must equal the observed values as a set, each declared value
/// glob-matching a distinct observed value. Undeclared headers are ignored.
pub fn matches_headers(declared: &Headers, observed: &Headers) -> Result<bool, MatchError> {
    let declared = declared
        .iter()
        .map(|(name, values)| HeaderPattern::new(name, values))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(headers_match(&declared, observed))
}

fn headers_match(declared: &[HeaderPattern], observed: &Headers) -> bool {
    declared.iter().all(|header| {
        observed
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(&header.name))
            .is_some_and(|(_, actual)| matches_value_set(&header.values, actual))
    })
}

/// Set equality over glob-compatible elements, independent of order.
fn matches_value_set(expected: &[GlobPattern], actual: &[String]) -> bool {
    if expected.len() != actual.len() {
        return false;
    }

    // compatible[i][j]: declared value i matches observed value j
    let compatible: Vec<Vec<bool>> = expected
        .iter()
        .map(|g| actual.iter().map(|a| g.is_match(a)).collect())
        .collect();

    let mut owner = vec![None; actual.len()];
    (0..compatible.len()).all(|row| {
        let mut visited = vec![false; actual.len()];
        augment(&compatible, row, &mut visited, &mut owner)
    })
}

/// Find an augmenting path that pairs `row` with a free observed value,
/// re-pairing earlier rows along the way.
fn augment(
    compatible: &[Vec<bool>],
    row: usize,
    visited: &mut [bool],
    owner: &mut [Option<usize>],
) -> bool {
    for col in 0..owner.len() {
        if !compatible[row][col] || visited[col] {
            continue;
        }
        visited[col] = true;
        let free = match owner[col] {
            None => true,
            Some(other) => augment(compatible, other, visited, owner),
        };
        if free {
            owner[col] = Some(row);
            return true;
        }
    }

    false
}
