//! Object schema: per-field schemas, name remapping, object-level rules.

use std::collections::BTreeMap;

use crate::access::{Access, ObjectAccess, NIL};
use crate::error::AccessError;
use crate::rule::{Rule, RuleError};

use super::{Context, Schema};

/// Constraints over a named-field container (struct or map).
///
/// Holds a field map, an optional external → source field-name remap (for
/// schemas declared with external names over accessors that expose source
/// names), and object-level rules for cross-field checks.
///
/// Field iteration is deterministic (sorted by name), but callers must not
/// depend on reported-error ordering across sibling fields — only on path
/// correctness.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    fields: BTreeMap<String, Schema>,
    aliases: BTreeMap<String, String>,
    rules: Vec<Rule>,
}

impl ObjectSchema {
    /// Empty schema: no fields, no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field schema under `name`.
    ///
    /// Declaring a name that already exists **merges** the two schemas
    /// (see [`Schema::merge`]) instead of overwriting, so later declarations
    /// narrow or extend earlier ones.
    pub fn add_field(&mut self, name: impl Into<String>, schema: Schema) -> &mut Self {
        let name = name.into();
        match self.fields.remove(&name) {
            Some(existing) => {
                self.fields.insert(name, existing.merge(schema));
            }
            None => {
                self.fields.insert(name, schema);
            }
        }
        self
    }

    /// Drop a declared field.
    pub fn remove_field(&mut self, name: &str) -> &mut Self {
        self.fields.remove(name);
        self
    }

    /// Map a declared field name to the name the accessor exposes.
    pub fn alias(&mut self, name: impl Into<String>, source: impl Into<String>) -> &mut Self {
        self.aliases.insert(name.into(), source.into());
        self
    }

    /// Append an object-level rule.
    pub fn push_rule(&mut self, rule: Rule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Remove every object-level rule with the given name.
    pub fn remove_rule(&mut self, name: &str) -> &mut Self {
        self.rules.retain(|r| r.name() != name);
        self
    }

    /// The schema declared for a field, if any.
    pub fn field(&self, name: &str) -> Option<&Schema> {
        self.fields.get(name)
    }

    /// Mutable access to a declared field schema.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Schema> {
        self.fields.get_mut(name)
    }

    /// All declared field names, sorted.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// The object-level rules, in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub(crate) fn validate(&self, ctx: &Context<'_>) -> Result<(), AccessError> {
        ctx.ensure_depth()?;

        // Capability query: a value that rewrites its own schema gets a
        // pass-scoped copy, so the shared tree is never mutated.
        if let Some(modifier) = ctx.accessor().as_object().and_then(|o| o.schema_modifier()) {
            let mut scoped = self.clone();
            modifier.modify_schema(&mut scoped, ctx);
            return scoped.validate_node(ctx);
        }

        self.validate_node(ctx)
    }

    fn validate_node(&self, ctx: &Context<'_>) -> Result<(), AccessError> {
        for rule in &self.rules {
            if ctx.skip_requested() {
                break;
            }
            match rule.run(ctx) {
                Ok(()) => {}
                Err(RuleError::CheckFailed) => {
                    ctx.add_error(rule.failure(ctx.path()));
                    break;
                }
                Err(RuleError::Invalid(err)) => {
                    ctx.add_error(err);
                    break;
                }
                Err(RuleError::Access(err)) => return Err(err),
            }
        }

        let obj = ctx.accessor().as_object();
        for (name, schema) in &self.fields {
            let source = self.aliases.get(name).map(String::as_str).unwrap_or(name);
            // A missing field is a nil value, not an error.
            let accessor = obj.and_then(|o| o.field(source)).unwrap_or(&NIL);
            let child = ctx.child(name.clone(), schema, accessor);
            schema.validate(&child)?;
        }

        Ok(())
    }

    /// Merge another object schema into this one: field maps union (merging
    /// on name collision), aliases union (other side wins), object-level
    /// rules append.
    pub fn merge(mut self, other: ObjectSchema) -> ObjectSchema {
        for (name, schema) in other.fields {
            self.add_field(name, schema);
        }
        self.aliases.extend(other.aliases);
        self.rules.extend(other.rules);
        self
    }

    /// JSON description of this schema node.
    pub fn describe(&self) -> serde_json::Value {
        let mut out = serde_json::Map::new();
        out.insert("type".to_string(), "object".into());
        if !self.fields.is_empty() {
            let fields: serde_json::Map<String, serde_json::Value> = self
                .fields
                .iter()
                .map(|(name, schema)| (name.clone(), schema.describe()))
                .collect();
            out.insert("fields".to_string(), serde_json::Value::Object(fields));
        }
        if !self.aliases.is_empty() {
            let aliases: serde_json::Map<String, serde_json::Value> = self
                .aliases
                .iter()
                .map(|(name, source)| (name.clone(), source.clone().into()))
                .collect();
            out.insert("aliases".to_string(), serde_json::Value::Object(aliases));
        }
        if !self.rules.is_empty() {
            out.insert(
                "rules".to_string(),
                self.rules.iter().map(Rule::describe).collect(),
            );
        }
        serde_json::Value::Object(out)
    }
}
