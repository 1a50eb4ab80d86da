//! Array schema: element schema plus array-level rules.

use crate::access::{Access, ArrayAccess};
use crate::error::AccessError;
use crate::rule::{Rule, RuleError};

use super::{Context, Schema};

/// Constraints over a sequence.
///
/// Array-level rules (min/max items) run first, in order, stopping at the
/// first failure — the error is reported at the array's own path. Elements
/// are then validated independently against the shared element schema: one
/// failing element does not block the rest.
#[derive(Debug, Clone)]
pub struct ArraySchema {
    element: Box<Schema>,
    rules: Vec<Rule>,
}

impl ArraySchema {
    /// Schema over sequences whose elements validate against `element`.
    pub fn new(element: Schema) -> Self {
        Self {
            element: Box::new(element),
            rules: Vec::new(),
        }
    }

    /// The shared element schema.
    pub fn element(&self) -> &Schema {
        &self.element
    }

    /// Mutable access to the element schema.
    pub fn element_mut(&mut self) -> &mut Schema {
        &mut self.element
    }

    /// Append an array-level rule.
    pub fn push_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Remove every array-level rule with the given name.
    pub fn remove_rule(&mut self, name: &str) {
        self.rules.retain(|r| r.name() != name);
    }

    /// The array-level rules, in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub(crate) fn validate(&self, ctx: &Context<'_>) -> Result<(), AccessError> {
        ctx.ensure_depth()?;

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

        let Some(arr) = ctx.accessor().as_array() else {
            if ctx.accessor().is_nil() {
                return Ok(());
            }
            return Err(AccessError::KindMismatch {
                expected: "array",
                found: ctx.accessor().kind().name(),
            });
        };

        arr.iterate(&mut |idx, elem| {
            let child = ctx.child(format!("[{idx}]"), &self.element, elem);
            self.element.validate(&child)
        })
    }

    /// Merge another array schema into this one: element schemas merge
    /// recursively; array-level rules append.
    pub fn merge(mut self, other: ArraySchema) -> ArraySchema {
        let element = (*self.element).merge(*other.element);
        self.element = Box::new(element);
        self.rules.extend(other.rules);
        self
    }

    /// JSON description of this schema node.
    pub fn describe(&self) -> serde_json::Value {
        let mut out = serde_json::Map::new();
        out.insert("type".to_string(), "array".into());
        out.insert("element".to_string(), self.element.describe());
        if !self.rules.is_empty() {
            out.insert(
                "rules".to_string(),
                self.rules.iter().map(Rule::describe).collect(),
            );
        }
        serde_json::Value::Object(out)
    }
}
