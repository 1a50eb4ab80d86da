//! # Schema Model
//!
//! A declarative constraint tree describing what "valid" means for a shape.
//! The tree mirrors a type graph, not the data graph: it is acyclic, built
//! once before validation, and walked in lock-step with the value.
//!
//! Three variants:
//!
//! - [`FieldSchema`] — rules over a terminal value, plus an optional flag.
//! - [`ArraySchema`] — an element schema plus array-level rules
//!   (min/max items).
//! - [`ObjectSchema`] — a name → schema map, an optional external → source
//!   field-name remap, and object-level (cross-field) rules.
//!
//! Schemas are `Clone` so that a [`SchemaModifier`] rewrite can be scoped to
//! a single validation pass without touching the shared tree.

mod array;
mod context;
mod field;
mod object;

pub use array::ArraySchema;
pub use context::Context;
pub(crate) use context::ErrorSink;
pub use field::FieldSchema;
pub use object::ObjectSchema;

use crate::error::AccessError;

/// Capability: a value that rewrites its own object schema before being
/// validated, based on its current field values.
///
/// Discovered through a single capability query
/// ([`ObjectAccess::schema_modifier`](crate::ObjectAccess::schema_modifier))
/// at each object node, before field-level validation. The hook receives a
/// pass-scoped copy of the node and may add, replace, or remove entries in
/// its field map and rule list. It must not reach into sibling or parent
/// schemas; only the node it is handed is in scope.
pub trait SchemaModifier {
    /// Adjust the schema for the object about to be validated.
    ///
    /// `ctx` gives read access to the current accessor (for value-dependent
    /// constraints) and to the engine's rule registry (for building rules).
    fn modify_schema(&self, schema: &mut ObjectSchema, ctx: &Context<'_>);
}

/// A validation schema for any data shape.
#[derive(Debug, Clone)]
pub enum Schema {
    /// Terminal value constraints.
    Field(FieldSchema),
    /// Sequence constraints plus an element schema.
    Array(ArraySchema),
    /// Named-field constraints plus per-field schemas.
    Object(ObjectSchema),
}

impl Schema {
    /// Validate the context's value against this schema.
    ///
    /// Validation failures accumulate in the context's sink; the `Err`
    /// channel carries structural errors only, which abort the walk.
    pub fn validate(&self, ctx: &Context<'_>) -> Result<(), AccessError> {
        match self {
            Schema::Field(f) => f.validate(ctx),
            Schema::Array(a) => a.validate(ctx),
            Schema::Object(o) => o.validate(ctx),
        }
    }

    /// Merge another schema of the same kind into this one.
    ///
    /// Field ∪ Field appends rule lists; Array ∪ Array merges element
    /// schemas recursively and appends array-level rules; Object ∪ Object
    /// unions field maps (merging on name collision) and appends
    /// object-level rules. Merging lets a later declaration narrow or extend
    /// a base schema without discarding previously declared constraints.
    ///
    /// # Panics
    ///
    /// Merging two different kinds is a programmer error and panics.
    pub fn merge(self, other: Schema) -> Schema {
        match (self, other) {
            (Schema::Field(a), Schema::Field(b)) => Schema::Field(a.merge(b)),
            (Schema::Array(a), Schema::Array(b)) => Schema::Array(a.merge(b)),
            (Schema::Object(a), Schema::Object(b)) => Schema::Object(a.merge(b)),
            (a, b) => panic!(
                "cannot merge {} schema with {} schema",
                a.kind_name(),
                b.kind_name()
            ),
        }
    }

    /// Lower-case variant name, used in messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Schema::Field(_) => "field",
            Schema::Array(_) => "array",
            Schema::Object(_) => "object",
        }
    }

    /// JSON description of the schema tree, for debugging and snapshots.
    pub fn describe(&self) -> serde_json::Value {
        match self {
            Schema::Field(f) => f.describe(),
            Schema::Array(a) => a.describe(),
            Schema::Object(o) => o.describe(),
        }
    }
}

impl From<FieldSchema> for Schema {
    fn from(f: FieldSchema) -> Self {
        Schema::Field(f)
    }
}

impl From<ArraySchema> for Schema {
    fn from(a: ArraySchema) -> Self {
        Schema::Array(a)
    }
}

impl From<ObjectSchema> for Schema {
    fn from(o: ObjectSchema) -> Self {
        Schema::Object(o)
    }
}
