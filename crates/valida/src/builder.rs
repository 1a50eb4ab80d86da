//! # Fluent Schema Builders
//!
//! Code-defined schemas, for when tags are the wrong tool:
//!
//! ```
//! use valida::{builder, Context, Registry, RuleError};
//!
//! let mut registry = Registry::new();
//! registry.register("required", |ctx: &Context<'_>| {
//!     if ctx.value().is_empty() { Err(RuleError::CheckFailed) } else { Ok(()) }
//! });
//! registry.register("min", |_ctx: &Context<'_>, _min: f64| Ok(()));
//!
//! let schema = builder::object(&registry)
//!     .field("name", builder::field(&registry).required().rule("min", &["2"]).build())
//!     .field("nick", builder::field(&registry).optional().build())
//!     .build();
//! ```
//!
//! Builders borrow the registry they bind rules from; rule binding (and its
//! panics on bad wiring) happens immediately, at construction time.

use crate::rule::Registry;
use crate::schema::{ArraySchema, FieldSchema, ObjectSchema, Schema};

/// Start a terminal field schema.
pub fn field(registry: &Registry) -> FieldBuilder<'_> {
    FieldBuilder {
        registry,
        schema: FieldSchema::new(),
    }
}

/// Start an array schema over `element`.
pub fn array(registry: &Registry, element: Schema) -> ArrayBuilder<'_> {
    ArrayBuilder {
        registry,
        schema: ArraySchema::new(element),
    }
}

/// Start an object schema.
pub fn object(registry: &Registry) -> ObjectBuilder<'_> {
    ObjectBuilder {
        registry,
        schema: ObjectSchema::new(),
    }
}

/// Builder for [`FieldSchema`].
#[derive(Debug)]
pub struct FieldBuilder<'r> {
    registry: &'r Registry,
    schema: FieldSchema,
}

impl FieldBuilder<'_> {
    /// Bind a named rule with raw parameters.
    pub fn rule<S: AsRef<str>>(mut self, name: &str, params: &[S]) -> Self {
        self.schema.push_rule(self.registry.build(name, params));
        self
    }

    /// Attach the `required` rule.
    pub fn required(self) -> Self {
        self.rule("required", &[] as &[&str])
    }

    /// Mark the field optional: a nil/absent value skips every rule. Also
    /// drops any previously attached `required` rule.
    pub fn optional(mut self) -> Self {
        self.schema.remove_rule("required");
        self.schema.set_optional(true);
        self
    }

    /// Finish the schema.
    pub fn build(self) -> Schema {
        Schema::Field(self.schema)
    }
}

/// Builder for [`ArraySchema`].
#[derive(Debug)]
pub struct ArrayBuilder<'r> {
    registry: &'r Registry,
    schema: ArraySchema,
}

impl ArrayBuilder<'_> {
    /// Bind a named array-level rule with raw parameters.
    pub fn rule<S: AsRef<str>>(mut self, name: &str, params: &[S]) -> Self {
        self.schema.push_rule(self.registry.build(name, params));
        self
    }

    /// Require at least `n` elements.
    pub fn min_items(self, n: usize) -> Self {
        self.rule("min_items", &[n.to_string()])
    }

    /// Allow at most `n` elements.
    pub fn max_items(self, n: usize) -> Self {
        self.rule("max_items", &[n.to_string()])
    }

    /// Finish the schema.
    pub fn build(self) -> Schema {
        Schema::Array(self.schema)
    }
}

/// Builder for [`ObjectSchema`].
#[derive(Debug)]
pub struct ObjectBuilder<'r> {
    registry: &'r Registry,
    schema: ObjectSchema,
}

impl ObjectBuilder<'_> {
    /// Declare a field schema. Redeclaring a name merges (see
    /// [`ObjectSchema::add_field`]).
    pub fn field(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.schema.add_field(name, schema);
        self
    }

    /// Map a declared field name to the name the accessor exposes.
    pub fn alias(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.schema.alias(name, source);
        self
    }

    /// Bind a named object-level (cross-field) rule with raw parameters.
    pub fn rule<S: AsRef<str>>(mut self, name: &str, params: &[S]) -> Self {
        self.schema.push_rule(self.registry.build(name, params));
        self
    }

    /// Finish the schema.
    pub fn build(self) -> Schema {
        Schema::Object(self.schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleError;
    use crate::Context;

    fn test_registry() -> Registry {
        let mut r = Registry::new();
        r.register("required", |ctx: &Context<'_>| {
            if ctx.value().is_empty() {
                Err(RuleError::CheckFailed)
            } else {
                Ok(())
            }
        });
        r.register("min_items", |_ctx: &Context<'_>, _n: i64| Ok(()));
        r.register("max_items", |_ctx: &Context<'_>, _n: i64| Ok(()));
        r
    }

    #[test]
    fn builds_nested_schema() {
        let reg = test_registry();
        let schema = object(&reg)
            .field("name", field(&reg).required().build())
            .field(
                "tags",
                array(&reg, field(&reg).required().build())
                    .min_items(1)
                    .max_items(5)
                    .build(),
            )
            .alias("name", "Name")
            .build();

        let Schema::Object(obj) = schema else {
            panic!("expected object schema")
        };
        assert_eq!(obj.field_names(), vec!["name", "tags"]);
        let Some(Schema::Array(tags)) = obj.field("tags") else {
            panic!("expected array schema for tags")
        };
        let rule_names: Vec<_> = tags.rules().iter().map(|r| r.name()).collect();
        assert_eq!(rule_names, vec!["min_items", "max_items"]);
    }

    #[test]
    fn optional_drops_required() {
        let reg = test_registry();
        let schema = field(&reg).required().optional().build();
        let Schema::Field(f) = schema else {
            panic!("expected field schema")
        };
        assert!(f.is_optional());
        assert!(f.rules().is_empty());
    }
}
