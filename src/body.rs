//! Structural body matching.
//!
//! When both the template body and the request body are JSON, they are
//! compared as trees: every key of a template object must be present in the
//! request object (extra request keys are ignored), arrays compare position by
//! position, and scalars compare by value. A bare `*` in the template, e.g.
//! `{"key": *}`, matches whatever value sits at that position.
//!
//! Shapes that cannot be compared (an object against an array, a scalar
//! against a container) yield [`MatchError::MalformedBodyComparison`] rather
//! than a plain mismatch. If either side is not JSON, the bodies fall back to
//! whole-string glob matching.

use crate::error::MatchError;
use crate::glob::GlobPattern;
use serde_json::{Map, Number, Value};

/// Stands in for a bare `*` so that the template can be parsed as JSON.
const WILDCARD_SENTINEL: &str = "\u{0}*";

/// Parsed body template.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonPattern {
    Any,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<JsonPattern>),
    Object(Vec<(String, JsonPattern)>),
}

impl JsonPattern {
    /// Parse a body template, accepting bare `*` wildcards in value position.
    ///
    /// Returns `None` when the template is not JSON.
    pub fn parse(pattern: &str) -> Option<Self> {
        let substituted = substitute_wildcards(pattern)?;
        let value: Value = serde_json::from_str(&substituted).ok()?;
        Some(Self::from_value(value))
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::Null => JsonPattern::Null,
            Value::Bool(b) => JsonPattern::Bool(b),
            Value::Number(n) => JsonPattern::Number(n),
            Value::String(s) if s == WILDCARD_SENTINEL => JsonPattern::Any,
            Value::String(s) => JsonPattern::String(s),
            Value::Array(items) => {
                JsonPattern::Array(items.into_iter().map(Self::from_value).collect())
            }
            Value::Object(map) => JsonPattern::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from_value(v)))
                    .collect(),
            ),
        }
    }

    /// Compare against a parsed request body.
    pub fn matches(&self, value: &Value) -> Result<bool, MatchError> {
        compare(self, value, &mut String::from("$"))
    }

    fn shape(&self) -> &'static str {
        match self {
            JsonPattern::Any => "any value",
            JsonPattern::Array(_) => "an array",
            JsonPattern::Object(_) => "an object",
            _ => "a scalar",
        }
    }
}

/// A body template compiled once at load.
///
/// Holds the JSON form when the template parses as JSON, and always the glob
/// form used when either side is not JSON.
#[derive(Debug, Clone)]
pub struct BodyPattern {
    json: Option<JsonPattern>,
    glob: GlobPattern,
}

impl BodyPattern {
    pub fn new(pattern: &str) -> Result<Self, MatchError> {
        Ok(Self {
            json: JsonPattern::parse(pattern),
            glob: GlobPattern::new(pattern)?,
        })
    }

    /// Match a request body.
    pub fn matches(&self, body: &str) -> Result<bool, MatchError> {
        if let Some(template) = &self.json {
            if let Ok(value) = serde_json::from_str::<Value>(body) {
                return template.matches(&value);
            }
        }

        Ok(self.glob.is_match(body))
    }
}

/// Match an optional body template against a request body.
pub fn matches_body(pattern: Option<&str>, body: &str) -> Result<bool, MatchError> {
    match pattern {
        None => Ok(true),
        Some(p) => BodyPattern::new(p)?.matches(body),
    }
}

fn compare(pattern: &JsonPattern, value: &Value, path: &mut String) -> Result<bool, MatchError> {
    match (pattern, value) {
        (JsonPattern::Any, _) => Ok(true),

        (JsonPattern::Object(fields), Value::Object(map)) => compare_object(fields, map, path),

        (JsonPattern::Array(items), Value::Array(values)) => {
            if items.len() != values.len() {
                return Ok(false);
            }
            let mut all = true;
            for (i, (item, v)) in items.iter().zip(values).enumerate() {
                let len = path.len();
                path.push_str(&format!("[{}]", i));
                let matched = compare(item, v, path)?;
                path.truncate(len);
                all &= matched;
            }
            Ok(all)
        }

        (JsonPattern::Object(_) | JsonPattern::Array(_), _)
        | (_, Value::Object(_) | Value::Array(_)) => Err(MatchError::MalformedBodyComparison {
            path: path.clone(),
            expected: pattern.shape(),
            found: value_shape(value),
        }),

        (JsonPattern::Null, Value::Null) => Ok(true),
        (JsonPattern::Bool(a), Value::Bool(b)) => Ok(a == b),
        (JsonPattern::Number(a), Value::Number(b)) => Ok(numbers_equal(a, b)),
        (JsonPattern::String(a), Value::String(b)) => Ok(a == b),
        _ => Ok(false),
    }
}

/// Keys missing from the request make the comparison false, but every key is
/// still visited so that a shape error anywhere in the object is reported.
fn compare_object(
    fields: &[(String, JsonPattern)],
    map: &Map<String, Value>,
    path: &mut String,
) -> Result<bool, MatchError> {
    let mut all = true;
    for (key, field) in fields {
        let Some(v) = map.get(key) else {
            all = false;
            continue;
        };
        let len = path.len();
        path.push('.');
        path.push_str(key);
        let matched = compare(field, v, path)?;
        path.truncate(len);
        all &= matched;
    }
    Ok(all)
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if a == b {
        return true;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

fn value_shape(value: &Value) -> &'static str {
    match value {
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
        _ => "a scalar",
    }
}

/// Replace every `*` outside a string literal with a quoted sentinel.
///
/// Returns `None` when there is nothing JSON-like to parse (empty input).
fn substitute_wildcards(pattern: &str) -> Option<String> {
    if pattern.trim().is_empty() {
        return None;
    }

    let sentinel = serde_json::to_string(WILDCARD_SENTINEL).ok()?;
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut in_string = false;
    let mut escaped = false;

    for ch in pattern.chars() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            '*' => out.push_str(&sentinel),
            _ => out.push(ch),
        }
    }

    Some(out)
}
