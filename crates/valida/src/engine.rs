//! # Validation Engine
//!
//! Top-level facade: owns a schema and a rule registry, builds a context
//! over the input, runs the recursive walk, and returns the collected
//! failures.
//!
//! The walk is single-threaded, synchronous, and depth-first; a call blocks
//! until the entire tree has been visited. By default every independent
//! failure is collected — callers render all problems at once.

use thiserror::Error;

use crate::access::Access;
use crate::error::{AccessError, ValidationReport};
use crate::rule::Registry;
use crate::schema::{Context, ErrorSink, Schema};

/// Default bound on value nesting depth. Guards against runaway recursion
/// through deeply nested or self-referential data.
pub const DEFAULT_MAX_DEPTH: u32 = 128;

/// Error returned by [`Validator::check`].
#[derive(Error, Debug)]
pub enum ValidateError {
    /// The value violated the schema; every failure is enumerated.
    #[error("validation failed:\n{0}")]
    Invalid(ValidationReport),

    /// The walk itself could not complete.
    #[error(transparent)]
    Access(#[from] AccessError),
}

/// The validation entry point: a schema, a rule registry, and a depth limit.
///
/// A validator is immutable after construction and can be reused across many
/// inputs. Dynamic schema modification never mutates the stored tree (the
/// engine hands modifiers a pass-scoped copy), so sharing a validator across
/// threads for concurrent reads is sound.
#[derive(Debug, Clone)]
pub struct Validator {
    schema: Schema,
    registry: Registry,
    max_depth: u32,
}

impl Validator {
    /// Validator over `schema` with an empty registry.
    ///
    /// Sufficient when every rule was already bound at schema-construction
    /// time; use [`with_registry`](Validator::with_registry) when schema
    /// modifiers need to build rules at validation time.
    pub fn new(schema: impl Into<Schema>) -> Self {
        Self::with_registry(schema, Registry::new())
    }

    /// Validator over `schema` carrying `registry`, reachable from rule
    /// contexts and schema modifiers.
    pub fn with_registry(schema: impl Into<Schema>, registry: Registry) -> Self {
        Self {
            schema: schema.into(),
            registry,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Override the nesting depth limit.
    pub fn max_depth(mut self, limit: u32) -> Self {
        self.max_depth = limit;
        self
    }

    /// The schema this validator enforces.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The registry this validator carries.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Validate a value and collect every independent failure.
    ///
    /// `Ok` carries the report — inspect [`ValidationReport::is_valid`].
    /// `Err` means the walk aborted on a structural error (bad path, depth
    /// limit, shape mismatch), distinct from any validation failure.
    pub fn validate<T: Access>(&self, value: &T) -> Result<ValidationReport, AccessError> {
        tracing::debug!(schema = self.schema.kind_name(), "validation pass started");
        let sink = ErrorSink::new();
        let ctx = Context::root(&self.schema, value, &self.registry, &sink, self.max_depth);
        self.schema.validate(&ctx)?;
        drop(ctx);
        let report = sink.into_report();
        tracing::debug!(
            errors = report.errors().len(),
            "validation pass finished"
        );
        Ok(report)
    }

    /// Validate and fold the report into the error channel: `Ok(())` only
    /// for a fully valid value.
    pub fn check<T: Access>(&self, value: &T) -> Result<(), ValidateError> {
        let report = self.validate(value)?;
        if report.is_valid() {
            Ok(())
        } else {
            Err(ValidateError::Invalid(report))
        }
    }

    /// Whether the value validates cleanly. Structural errors count as
    /// invalid.
    pub fn is_valid<T: Access>(&self, value: &T) -> bool {
        matches!(self.validate(value), Ok(report) if report.is_valid())
    }
}
