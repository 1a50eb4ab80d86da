//! # Tag-Rule Compiler
//!
//! Compiles the compact tag grammar (`"required|min=5,max=100"`) into
//! [`Schema`] trees. The grammar itself is handled by a tokenizer and a
//! recursive-descent parser ([`parse_rule_list`]); this module binds the
//! parsed rules against a [`Registry`] and assembles schema nodes.
//!
//! Two pseudo-rules are recognized by the compiler and never reach the
//! registry:
//!
//! - `dive` — marks the boundary between constraints on an array itself and
//!   constraints on each element; everything before `dive` binds to the
//!   array, everything after to the element schema, recursively for nested
//!   arrays.
//! - `optional` — sets the field's optional flag instead of binding a rule.
//!
//! Compilation failures (unknown rule names, bad parameters, malformed
//! specs) panic: the schema is wired wrong and cannot be repaired at
//! validation time.

mod lexer;
mod parser;

pub use parser::{parse_rule_list, TagRule};

use crate::rule::Registry;
use crate::schema::{ArraySchema, FieldSchema, ObjectSchema, Schema};

/// The pseudo-rule separating array-level from element-level constraints.
pub const DIVE: &str = "dive";

/// The pseudo-rule marking a field optional.
pub const OPTIONAL: &str = "optional";

/// Compile a single tag string into a schema.
///
/// A tag containing a top-level `dive` compiles to an [`ArraySchema`];
/// anything else compiles to a [`FieldSchema`].
///
/// # Panics
///
/// On unknown rule names or parameters that fail coercion.
pub fn compile_field(tag: &str, registry: &Registry) -> Schema {
    build_schema(&parse_rule_list(tag), registry)
}

/// Compile a nested object spec into a schema.
///
/// The spec is a JSON object mapping field names to either a tag string or
/// a nested object spec. A field tagged `"-"` is excluded entirely:
///
/// ```
/// use serde_json::json;
/// use valida::tags::compile_object;
/// use valida::{Context, Registry, RuleError};
///
/// let mut registry = Registry::new();
/// registry.register("required", |ctx: &Context<'_>| {
///     if ctx.value().is_empty() { Err(RuleError::CheckFailed) } else { Ok(()) }
/// });
///
/// let schema = compile_object(
///     &json!({
///         "name": "required",
///         "internal": "-",
///         "addr": { "city": "required" }
///     }),
///     &registry,
/// );
/// ```
///
/// # Panics
///
/// On non-object specs, field values that are neither strings nor objects,
/// and every failure [`compile_field`] panics on.
pub fn compile_object(spec: &serde_json::Value, registry: &Registry) -> Schema {
    let serde_json::Value::Object(fields) = spec else {
        panic!("object spec must be a JSON object, got {spec}");
    };

    let mut schema = ObjectSchema::new();
    for (name, value) in fields {
        match value {
            serde_json::Value::String(tag) => {
                if tag == "-" {
                    continue;
                }
                schema.add_field(name.clone(), compile_field(tag, registry));
            }
            nested @ serde_json::Value::Object(_) => {
                schema.add_field(name.clone(), compile_object(nested, registry));
            }
            other => panic!(
                "field spec for '{name}' must be a tag string or a nested object, got {other}"
            ),
        }
    }

    Schema::Object(schema)
}

fn build_schema(rules: &[TagRule], registry: &Registry) -> Schema {
    if let Some(split) = rules.iter().position(|r| r.name == DIVE) {
        let mut array = ArraySchema::new(build_schema(&rules[split + 1..], registry));
        for rule in &rules[..split] {
            array.push_rule(registry.build(&rule.name, &rule.params));
        }
        return Schema::Array(array);
    }

    let mut field = FieldSchema::new();
    for rule in rules {
        if rule.name == OPTIONAL && rule.params.is_empty() {
            field.set_optional(true);
        } else {
            field.push_rule(registry.build(&rule.name, &rule.params));
        }
    }
    Schema::Field(field)
}
