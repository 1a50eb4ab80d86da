//! Cross-field comparison rules.
//!
//! Each rule takes the name of a sibling field and compares the current
//! value against it through the parent context: `eqfield=password` on a
//! `confirm` field checks `confirm == password`. At the root, where no
//! parent exists, these rules fail with a structural no-parent error rather
//! than panicking.

use valida::{AccessError, Context, Registry, RuleError, RuleResult, ValidationError};

use crate::compare::{self, Cmp};

/// Register the cross-field rules into `registry`.
pub fn register(registry: &mut Registry) {
    for op in [Cmp::Eq, Cmp::Ne, Cmp::Gt, Cmp::Lt, Cmp::Gte, Cmp::Lte] {
        registry.register(op.field_code(), cross_field(op));
    }
}

fn cross_field(op: Cmp) -> impl Fn(&Context<'_>, String) -> RuleResult + Clone {
    move |ctx: &Context<'_>, field: String| {
        let Some(parent) = ctx.parent() else {
            return Err(RuleError::Access(AccessError::NoParent));
        };
        let other = parent.get_value(&field)?;
        let current = ctx.value();
        match compare::ordering_between(&current, &other) {
            Some(ordering) if op.matches(ordering) => Ok(()),
            _ => Err(RuleError::Invalid(
                ValidationError::new(ctx.path(), op.field_code()).with("field", field.clone()),
            )),
        }
    }
}
