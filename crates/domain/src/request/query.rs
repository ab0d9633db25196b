//! Query parameter types

use serde::{Deserialize, Serialize};
use std::fmt;

/// A query parameter value as written in a scenario.
///
/// Numbers are accepted as-is and converted to their string form on the
/// wire, so `1` is sent (and echoed back) as `"1"`. Floats use the
/// JavaScript number-to-string forms (`1e+21`, `1e-7`, `Infinity`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    /// An integer value.
    Integer(i64),
    /// A floating point value.
    Float(f64),
    /// A text value, sent verbatim.
    Text(String),
}

impl QueryValue {
    /// Returns the string sent on the wire for this value.
    #[must_use]
    pub fn to_wire_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write_float(f, *n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        return f.write_str("NaN");
    }
    if n.is_infinite() {
        return f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if n == 0.0 {
        return f.write_str("0");
    }

    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return write!(f, "{n}");
    }

    let scientific = format!("{n:e}");
    match scientific.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            write!(f, "{mantissa}e+{exponent}")
        }
        _ => f.write_str(&scientific),
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// A query parameter key-value pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParam {
    /// The parameter key
    pub key: String,
    /// The parameter value
    pub value: QueryValue,
}

impl QueryParam {
    /// Creates a new query parameter.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An ordered collection of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams {
    items: Vec<QueryParam>,
}

impl QueryParams {
    /// Creates an empty query parameter collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Adds a query parameter, replacing an earlier one with the same key.
    pub fn add(&mut self, param: QueryParam) {
        if let Some(existing) = self.items.iter_mut().find(|p| p.key == param.key) {
            existing.value = param.value;
        } else {
            self.items.push(param);
        }
    }

    /// Looks up the value of a parameter by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.items.iter().find(|p| p.key == key).map(|p| &p.value)
    }

    /// Returns all parameters in insertion order.
    #[must_use]
    pub fn all(&self) -> &[QueryParam] {
        &self.items
    }

    /// Returns `(key, wire value)` pairs in insertion order.
    pub fn wire_pairs(&self) -> impl Iterator<Item = (&str, String)> {
        self.items
            .iter()
            .map(|p| (p.key.as_str(), p.value.to_wire_string()))
    }

    /// Returns the number of parameters.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<QueryParam> for QueryParams {
    fn from_iter<T: IntoIterator<Item = QueryParam>>(iter: T) -> Self {
        let mut params = Self::new();
        for param in iter {
            params.add(param);
        }
        params
    }
}
