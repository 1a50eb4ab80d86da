//! Terminal field schema.

use crate::error::AccessError;
use crate::rule::{Rule, RuleError};

use super::Context;

/// Constraints over a terminal value: an ordered rule list plus an optional
/// flag.
///
/// Rules run in declaration order and stop at the first failure — a field
/// reports at most one error per validation pass. An optional field with a
/// nil/absent value succeeds without running any rule.
#[derive(Debug, Clone, Default)]
pub struct FieldSchema {
    rules: Vec<Rule>,
    optional: bool,
}

impl FieldSchema {
    /// Empty schema: no rules, not optional.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    pub fn push_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Remove every rule with the given name.
    pub fn remove_rule(&mut self, name: &str) {
        self.rules.retain(|r| r.name() != name);
    }

    /// The attached rules, in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Mark the field optional or required-by-default.
    pub fn set_optional(&mut self, optional: bool) {
        self.optional = optional;
    }

    /// Whether a nil/absent value skips validation entirely.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub(crate) fn validate(&self, ctx: &Context<'_>) -> Result<(), AccessError> {
        if self.optional && ctx.value().is_nil() {
            return Ok(());
        }

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

        Ok(())
    }

    /// Merge another field schema into this one: rule lists append; the
    /// result is optional only if both sides are.
    pub fn merge(mut self, other: FieldSchema) -> FieldSchema {
        self.rules.extend(other.rules);
        self.optional = self.optional && other.optional;
        self
    }

    /// JSON description of this schema node.
    pub fn describe(&self) -> serde_json::Value {
        let mut out = serde_json::Map::new();
        out.insert("type".to_string(), "field".into());
        if self.optional {
            out.insert("optional".to_string(), true.into());
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
