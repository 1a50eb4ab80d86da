//! Character-class and substring predicates.
//!
//! All of these operate on the string rendering of the current value and
//! pass vacuously on the empty string — pair them with `required` when
//! presence matters.

use valida::{Context, Registry, RuleError, RuleResult};

/// Register the string rules into `registry`.
pub fn register(registry: &mut Registry) {
    registry.register("alpha", chars_rule(|c| c.is_alphabetic()));
    registry.register("alphanum", chars_rule(|c| c.is_alphanumeric()));
    registry.register("alphaspace", chars_rule(|c| c.is_alphabetic() || c.is_whitespace()));
    registry.register("ascii", chars_rule(|c| c.is_ascii()));
    registry.register("printascii", chars_rule(|c| c.is_ascii_graphic() || c == ' '));
    registry.register("number", chars_rule(|c| c.is_ascii_digit()));
    registry.register(
        "numeric",
        chars_rule(|c| c.is_ascii_digit() || c == '.' || c == '-' || c == '+'),
    );

    registry.register("lowercase", |ctx: &Context<'_>| {
        let s = ctx.value().display();
        if s == s.to_lowercase() {
            Ok(())
        } else {
            Err(RuleError::CheckFailed)
        }
    });

    registry.register("uppercase", |ctx: &Context<'_>| {
        let s = ctx.value().display();
        if s == s.to_uppercase() {
            Ok(())
        } else {
            Err(RuleError::CheckFailed)
        }
    });

    registry.register("contains", |ctx: &Context<'_>, needle: String| {
        check(ctx.value().display().contains(&needle))
    });

    registry.register("containsany", |ctx: &Context<'_>, chars: String| {
        let s = ctx.value().display();
        check(chars.chars().any(|c| s.contains(c)))
    });

    registry.register("excludes", |ctx: &Context<'_>, needle: String| {
        check(!ctx.value().display().contains(&needle))
    });

    registry.register("excludesall", |ctx: &Context<'_>, chars: String| {
        let s = ctx.value().display();
        check(!chars.chars().any(|c| s.contains(c)))
    });

    registry.register("startswith", |ctx: &Context<'_>, prefix: String| {
        check(ctx.value().display().starts_with(&prefix))
    });

    registry.register("endswith", |ctx: &Context<'_>, suffix: String| {
        check(ctx.value().display().ends_with(&suffix))
    });

    registry.register("startsnotwith", |ctx: &Context<'_>, prefix: String| {
        check(!ctx.value().display().starts_with(&prefix))
    });

    registry.register("endsnotwith", |ctx: &Context<'_>, suffix: String| {
        check(!ctx.value().display().ends_with(&suffix))
    });
}

fn check(ok: bool) -> RuleResult {
    if ok {
        Ok(())
    } else {
        Err(RuleError::CheckFailed)
    }
}

fn chars_rule(
    pred: fn(char) -> bool,
) -> impl Fn(&Context<'_>) -> RuleResult + Clone {
    move |ctx: &Context<'_>| check(ctx.value().display().chars().all(pred))
}
