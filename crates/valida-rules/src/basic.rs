//! Presence, size, and comparison rules.

use valida::{Context, Registry, RuleError, RuleResult, ValidationError};

use crate::compare::{self, Cmp};

/// Register the basic rules into `registry`.
pub fn register(registry: &mut Registry) {
    registry.register("required", |ctx: &Context<'_>| {
        if ctx.value().is_empty() {
            Err(RuleError::CheckFailed)
        } else {
            Ok(())
        }
    });

    // `omitempty` semantics: an empty value intentionally suppresses the
    // remaining checks on this node without counting as a failure.
    registry.register("omitempty", |ctx: &Context<'_>| {
        if ctx.value().is_empty() {
            ctx.skip_rest();
        }
        Ok(())
    });

    registry.register(
        "required_if",
        |ctx: &Context<'_>, field: String, expected: String| {
            let Some(parent) = ctx.parent() else {
                return Err(RuleError::Access(valida::AccessError::NoParent));
            };
            let other = parent.get_value(&field)?;
            if other.display() == expected && ctx.value().is_empty() {
                return Err(RuleError::Invalid(
                    ValidationError::new(ctx.path(), "required_if")
                        .with("field", field)
                        .with("expected", expected),
                ));
            }
            Ok(())
        },
    );

    registry.register("oneof", |ctx: &Context<'_>, allowed: Vec<String>| {
        let actual = ctx.value().display();
        if actual.is_empty() || allowed.iter().any(|a| a == &actual) {
            return Ok(());
        }
        Err(RuleError::Invalid(
            ValidationError::new(ctx.path(), "oneof")
                .with("allowed", allowed.clone())
                .with("actual", actual),
        ))
    });

    registry.register("boolean", |ctx: &Context<'_>| {
        match ctx.value().display().as_str() {
            "true" | "false" | "1" | "0" => Ok(()),
            _ => Err(RuleError::CheckFailed),
        }
    });

    registry.register("min", |ctx: &Context<'_>, min: f64| {
        let Some(actual) = compare::size_of(&ctx.value()) else {
            return Err(RuleError::CheckFailed);
        };
        if actual < min {
            return Err(RuleError::Invalid(
                ValidationError::new(ctx.path(), "min")
                    .with("min", min)
                    .with("actual", actual),
            ));
        }
        Ok(())
    });

    registry.register("max", |ctx: &Context<'_>, max: f64| {
        let Some(actual) = compare::size_of(&ctx.value()) else {
            return Err(RuleError::CheckFailed);
        };
        if actual > max {
            return Err(RuleError::Invalid(
                ValidationError::new(ctx.path(), "max")
                    .with("max", max)
                    .with("actual", actual),
            ));
        }
        Ok(())
    });

    registry.register("len", |ctx: &Context<'_>, expected: i64| {
        let Some(actual) = compare::size_of(&ctx.value()) else {
            return Err(RuleError::CheckFailed);
        };
        if actual != expected as f64 {
            return Err(RuleError::Invalid(
                ValidationError::new(ctx.path(), "len")
                    .with("expected", expected)
                    .with("actual", actual),
            ));
        }
        Ok(())
    });

    registry.register("between", |ctx: &Context<'_>, lo: f64, hi: f64| {
        let Some(actual) = compare::size_of(&ctx.value()) else {
            return Err(RuleError::CheckFailed);
        };
        if actual < lo || actual > hi {
            return Err(RuleError::Invalid(
                ValidationError::new(ctx.path(), "between")
                    .with("min", lo)
                    .with("max", hi)
                    .with("actual", actual),
            ));
        }
        Ok(())
    });

    registry.register("min_items", |ctx: &Context<'_>, min: i64| {
        let actual = ctx.value().len().unwrap_or(0);
        if (actual as i64) < min {
            return Err(RuleError::Invalid(
                ValidationError::new(ctx.path(), "min_items")
                    .with("min", min)
                    .with("actual", actual),
            ));
        }
        Ok(())
    });

    registry.register("max_items", |ctx: &Context<'_>, max: i64| {
        let actual = ctx.value().len().unwrap_or(0);
        if (actual as i64) > max {
            return Err(RuleError::Invalid(
                ValidationError::new(ctx.path(), "max_items")
                    .with("max", max)
                    .with("actual", actual),
            ));
        }
        Ok(())
    });

    for op in [Cmp::Eq, Cmp::Ne, Cmp::Gt, Cmp::Lt, Cmp::Gte, Cmp::Lte] {
        registry.register(op.code(), value_comparison(op));
    }
}

fn value_comparison(op: Cmp) -> impl Fn(&Context<'_>, String) -> RuleResult + Clone {
    move |ctx: &Context<'_>, param: String| {
        let value = ctx.value();
        match compare::ordering_vs_param(&value, &param) {
            Some(ordering) if op.matches(ordering) => Ok(()),
            _ => Err(RuleError::Invalid(
                ValidationError::new(ctx.path(), op.code())
                    .with("expected", param.clone())
                    .with("actual", value.display()),
            )),
        }
    }
}
