//! # valida — Schema-Driven Validation Engine
//!
//! Walks an arbitrary runtime value and a declarative constraint tree in
//! lock-step, invoking named validation rules and collecting structured
//! failures. One pass reports *every* independent problem, not just the
//! first.
//!
//! ## Architecture
//!
//! - [`access`] — one traversal contract over heterogeneous shapes: user
//!   structs, maps, vectors, scalars, `Option`s, and `serde_json` documents.
//! - [`rule`] — an explicit [`Registry`] binding rule names to typed
//!   parameter lists, captured from closure signatures at registration.
//! - [`schema`] — the constraint tree ([`FieldSchema`] / [`ArraySchema`] /
//!   [`ObjectSchema`]), schema merging, and the [`SchemaModifier`]
//!   capability for value-dependent constraints.
//! - [`tags`] — the compact rule grammar (`"required|min=5,max=100"`)
//!   compiled into schemas.
//! - [`builder`] — fluent constructors for code-defined schemas.
//! - [`Validator`] — the facade tying the pieces together.
//!
//! ## Error model
//!
//! Validation failures ([`ValidationError`]) accumulate into a
//! [`ValidationReport`]; structural errors ([`AccessError`]) abort the walk
//! and come back in the `Err` channel; schema-construction mistakes panic at
//! build time. See the [`error`] module.
//!
//! ## Concurrency
//!
//! The walk is single-threaded and synchronous. Validators, schemas, and
//! registries are plain values: build once, share read-only. Dynamic schema
//! modification operates on a pass-scoped copy, never on the shared tree.
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use valida::{builder, tags, Context, Registry, RuleError, Validator};
//!
//! let mut registry = Registry::new();
//! registry.register("required", |ctx: &Context<'_>| {
//!     if ctx.value().is_empty() { Err(RuleError::CheckFailed) } else { Ok(()) }
//! });
//! registry.register("min", |ctx: &Context<'_>, min: f64| {
//!     match ctx.value().len() {
//!         Some(len) if (len as f64) < min => Err(RuleError::CheckFailed),
//!         _ => Ok(()),
//!     }
//! });
//!
//! let schema = tags::compile_object(
//!     &json!({ "name": "required|min=3", "bio": "optional" }),
//!     &registry,
//! );
//! let validator = Validator::with_registry(schema, registry);
//!
//! let report = validator.validate(&json!({ "name": "ab" })).unwrap();
//! assert!(report.has_field_error("name"));
//! assert!(validator.is_valid(&json!({ "name": "abc" })));
//! ```

pub mod access;
pub mod builder;
pub mod engine;
pub mod error;
pub mod rule;
pub mod schema;
pub mod tags;

// Re-export primary types for ergonomic imports.
pub use access::{
    lookup, parse_path, Access, ArrayAccess, Kind, Nil, ObjectAccess, Scalar, Segment, Value, NIL,
};
pub use engine::{ValidateError, Validator, DEFAULT_MAX_DEPTH};
pub use error::{AccessError, ErrorParam, ValidationError, ValidationReport};
pub use rule::{ParamKind, ParamValue, Registry, Rule, RuleError, RuleResult};
pub use schema::{ArraySchema, Context, FieldSchema, ObjectSchema, Schema, SchemaModifier};
pub use tags::{parse_rule_list, TagRule};
