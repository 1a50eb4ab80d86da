//! # Error Types — Structural Errors vs Validation Failures
//!
//! Two distinct error classes flow through the engine:
//!
//! - [`AccessError`] — structural/system errors raised while traversing a
//!   value: unknown fields, out-of-range indexes, malformed path tokens,
//!   impossible coercions. These abort the enclosing validation walk and are
//!   returned in the `Err` channel, never mixed into a report.
//! - [`ValidationError`] — an expected, user-facing validation failure with a
//!   field path, a stable error code, and named parameters for downstream
//!   message formatting. These accumulate in a [`ValidationReport`].
//!
//! Schema-construction failures (unknown rule name, wrong parameter arity or
//! type) are a third class: they panic at build time, before any data is
//! validated. See [`crate::rule::Registry::build`].

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Structural error raised while traversing a value tree.
///
/// Distinct from validation failures: an `AccessError` means the walk itself
/// could not proceed, not that the data violated a constraint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// A path segment named a field the object does not expose.
    #[error("unknown field '{field}'")]
    UnknownField {
        /// The field name that failed to resolve.
        field: String,
    },

    /// A bracket segment addressed an index past the end of the array.
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The array length at the time of access.
        len: usize,
    },

    /// A path segment could not be parsed (bad bracket token, empty segment).
    #[error("malformed path segment '{segment}'")]
    MalformedSegment {
        /// The offending segment text.
        segment: String,
    },

    /// The traversal expected one shape and found another.
    #[error("expected {expected}, found {found}")]
    KindMismatch {
        /// The shape the traversal needed.
        expected: &'static str,
        /// The shape actually present.
        found: &'static str,
    },

    /// A typed coercion on a terminal value was impossible.
    #[error("cannot convert {from} to {to}")]
    Coercion {
        /// Description of the source value.
        from: &'static str,
        /// The requested target type.
        to: &'static str,
    },

    /// A coercion was attempted on a nil value.
    #[error("value is nil")]
    NilValue,

    /// A cross-field rule ran at the root, where no parent context exists.
    #[error("no parent context")]
    NoParent,

    /// The walk exceeded the configured nesting depth.
    #[error("maximum nesting depth {limit} exceeded")]
    MaxDepth {
        /// The configured depth limit.
        limit: u32,
    },
}

/// A named parameter attached to a validation error.
///
/// Parameters are kept as an ordered list so downstream formatters can treat
/// them positionally or by name, independent of locale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorParam {
    /// Parameter name (e.g. `"min"`, `"actual"`, `"field"`).
    pub name: String,
    /// Parameter value.
    pub value: serde_json::Value,
}

/// A single validation failure: where, what, and with which parameters.
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Path to the violating field (e.g. `"user.email"`, `"items[0].name"`).
    pub path: String,
    /// Stable error code, usually the rule name (e.g. `"required"`, `"min"`).
    pub code: String,
    /// Ordered, named parameters for message formatting.
    pub params: Vec<ErrorParam>,
}

impl ValidationError {
    /// Create an error with no parameters.
    pub fn new(path: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code: code.into(),
            params: Vec::new(),
        }
    }

    /// Attach a named parameter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.push(ErrorParam {
            name: name.into(),
            value: value.into(),
        });
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.code)?;
        if !self.params.is_empty() {
            write!(f, " (")?;
            for (i, p) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}={}", p.name, p.value)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The outcome of one validation pass: every independent failure, in the
/// order the walk recorded them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub(crate) fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    /// True when the pass recorded no failures.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// All recorded failures.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// The first recorded failure, if any.
    pub fn first_error(&self) -> Option<&ValidationError> {
        self.errors.first()
    }

    /// Whether a specific field path has at least one failure.
    pub fn has_field_error(&self, path: &str) -> bool {
        self.errors.iter().any(|e| e.path == path)
    }

    /// Group failures by field path, for form-style rendering.
    pub fn errors_by_field(&self) -> BTreeMap<&str, Vec<&ValidationError>> {
        let mut by_field: BTreeMap<&str, Vec<&ValidationError>> = BTreeMap::new();
        for err in &self.errors {
            by_field.entry(err.path.as_str()).or_default().push(err);
        }
        by_field
    }

    /// Consume the report and return the inner error list.
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_without_params() {
        let err = ValidationError::new("user.email", "required");
        assert_eq!(err.to_string(), "user.email: required");
    }

    #[test]
    fn display_with_params() {
        let err = ValidationError::new("items", "min_items")
            .with("min", 1)
            .with("actual", 0);
        assert_eq!(err.to_string(), "items: min_items (min=1, actual=0)");
    }

    #[test]
    fn report_grouping_and_lookup() {
        let report = ValidationReport::from_errors(vec![
            ValidationError::new("name", "required"),
            ValidationError::new("age", "min").with("min", 18),
            ValidationError::new("name", "alpha"),
        ]);
        assert!(!report.is_valid());
        assert!(report.has_field_error("age"));
        assert!(!report.has_field_error("email"));
        let by_field = report.errors_by_field();
        assert_eq!(by_field["name"].len(), 2);
        assert_eq!(by_field["age"].len(), 1);
        assert_eq!(report.first_error().unwrap().code, "required");
    }

    #[test]
    fn error_serializes_with_params() {
        let err = ValidationError::new("zip", "len").with("expected", 5);
        let v = serde_json::to_value(&err).unwrap();
        assert_eq!(
            v,
            json!({
                "path": "zip",
                "code": "len",
                "params": [{"name": "expected", "value": 5}]
            })
        );
    }
}
