//! # valida-rules — Built-in Rule Catalog
//!
//! The standard rules for the [`valida`] engine, registered through the same
//! public [`Registry`] API available to user-supplied rules — nothing here
//! is special-cased by the engine.
//!
//! Categories:
//!
//! - [`basic`] — presence and size: `required`, `required_if`, `omitempty`,
//!   `oneof`, `min`, `max`, `len`, `between`, `eq`/`ne`/`gt`/`lt`/`gte`/`lte`,
//!   `min_items`, `max_items`, `boolean`.
//! - [`string`] — character-class and substring predicates.
//! - [`field`] — cross-field comparison: `eqfield`, `nefield`, `gtfield`,
//!   `ltfield`, `gtefield`, `ltefield`.
//! - [`format`] — syntactic formats: `email`, `uuid`, `datetime`, `semver`,
//!   `base64`, checksums, and friends.
//! - [`network`] — addresses and URLs: `ip`, `cidr`, `mac`, `hostname`,
//!   `port`, `url`, and friends.
//!
//! ## Usage
//!
//! ```
//! use serde_json::json;
//! use valida::{tags, Validator};
//!
//! let registry = valida_rules::standard();
//! let schema = tags::compile_object(
//!     &json!({ "email": "required|email", "age": "min=18" }),
//!     &registry,
//! );
//! let validator = Validator::with_registry(schema, registry);
//! assert!(validator.is_valid(&json!({ "email": "a@b.co", "age": 30 })));
//! assert!(!validator.is_valid(&json!({ "email": "nope", "age": 30 })));
//! ```

pub mod basic;
mod compare;
pub mod field;
pub mod format;
pub mod network;
pub mod string;

use valida::Registry;

/// A registry carrying the full built-in catalog.
///
/// Returns a fresh value each call — there is no global instance. Extend it
/// with your own rules before handing it to a validator.
pub fn standard() -> Registry {
    let mut registry = Registry::new();
    basic::register(&mut registry);
    string::register(&mut registry);
    field::register(&mut registry);
    format::register(&mut registry);
    network::register(&mut registry);
    registry
}
