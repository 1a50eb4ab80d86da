//! Syntactic format rules: email, UUID, datetime, semver, base64,
//! checksums.
//!
//! Patterns compile once, when the rule is registered, and are captured by
//! the rule closure.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, NaiveDateTime};
use regex::Regex;
use uuid::Uuid;
use valida::{Context, Registry, RuleError, RuleResult};

/// Register the format rules into `registry`.
pub fn register(registry: &mut Registry) {
    registry.register(
        "email",
        pattern_rule(r"^[^\s@]+@[^\s@]+\.[^\s@]+$", "email"),
    );
    registry.register(
        "hexcolor",
        pattern_rule(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$", "hexcolor"),
    );
    registry.register("e164", pattern_rule(r"^\+[1-9]\d{1,14}$", "e164"));
    registry.register(
        "semver",
        pattern_rule(
            r"^v?(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$",
            "semver",
        ),
    );
    registry.register(
        "jwt",
        pattern_rule(r"^[A-Za-z0-9-_]+\.[A-Za-z0-9-_]+\.[A-Za-z0-9-_]*$", "jwt"),
    );

    registry.register("hexadecimal", |ctx: &Context<'_>| {
        let s = ctx.value().display();
        check(!s.is_empty() && s.chars().all(|c| c.is_ascii_hexdigit()))
    });

    registry.register("uuid", |ctx: &Context<'_>| {
        check(Uuid::parse_str(&ctx.value().display()).is_ok())
    });

    registry.register("uuid4", |ctx: &Context<'_>| {
        match Uuid::parse_str(&ctx.value().display()) {
            Ok(id) => check(id.get_version_num() == 4),
            Err(_) => Err(RuleError::CheckFailed),
        }
    });

    registry.register("datetime", |ctx: &Context<'_>| {
        let s = ctx.value().display();
        let ok = DateTime::parse_from_rfc3339(&s).is_ok()
            || NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").is_ok();
        check(ok)
    });

    registry.register("base64", |ctx: &Context<'_>| {
        check(BASE64.decode(ctx.value().display().as_bytes()).is_ok())
    });

    registry.register("luhn_checksum", |ctx: &Context<'_>| {
        check(luhn(&ctx.value().display()))
    });

    registry.register("credit_card", |ctx: &Context<'_>| {
        let s: String = ctx
            .value()
            .display()
            .chars()
            .filter(|c| *c != ' ' && *c != '-')
            .collect();
        check((13..=19).contains(&s.len()) && luhn(&s))
    });
}

fn check(ok: bool) -> RuleResult {
    if ok {
        Ok(())
    } else {
        Err(RuleError::CheckFailed)
    }
}

fn pattern_rule(
    pattern: &str,
    name: &str,
) -> impl Fn(&Context<'_>) -> RuleResult + Clone {
    let re = Regex::new(pattern).unwrap_or_else(|e| panic!("invalid {name} pattern: {e}"));
    move |ctx: &Context<'_>| check(re.is_match(&ctx.value().display()))
}

/// Luhn checksum over a digit string. Any non-digit fails.
fn luhn(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    let mut sum = 0u32;
    let mut alternate = false;
    for c in s.chars().rev() {
        let Some(d) = c.to_digit(10) else {
            return false;
        };
        let mut d = d;
        if alternate {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
        alternate = !alternate;
    }
    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use crate::testutil::rule_passes;
    use serde_json::json;

    #[test]
    fn email_shape() {
        assert!(rule_passes("email", &[], json!("user@example.com")));
        assert!(!rule_passes("email", &[], json!("user@localhost")));
        assert!(!rule_passes("email", &[], json!("no-at-sign")));
    }

    #[test]
    fn uuid_and_version() {
        assert!(rule_passes(
            "uuid",
            &[],
            json!("550e8400-e29b-41d4-a716-446655440000")
        ));
        assert!(!rule_passes("uuid", &[], json!("not-a-uuid")));
        assert!(rule_passes(
            "uuid4",
            &[],
            json!("550e8400-e29b-41d4-a716-446655440000")
        ));
        // v1 UUID rejected by uuid4
        assert!(!rule_passes(
            "uuid4",
            &[],
            json!("550e8400-e29b-11d4-a716-446655440000")
        ));
    }

    #[test]
    fn datetime_accepts_rfc3339_and_plain() {
        assert!(rule_passes("datetime", &[], json!("2024-06-01T10:00:00Z")));
        assert!(rule_passes("datetime", &[], json!("2024-06-01 10:00:00")));
        assert!(!rule_passes("datetime", &[], json!("June 1st")));
    }

    #[test]
    fn hex_rules() {
        assert!(rule_passes("hexadecimal", &[], json!("deadBEEF01")));
        assert!(!rule_passes("hexadecimal", &[], json!("xyz")));
        assert!(!rule_passes("hexadecimal", &[], json!("")));
        assert!(rule_passes("hexcolor", &[], json!("#fff")));
        assert!(rule_passes("hexcolor", &[], json!("#a1b2c3")));
        assert!(!rule_passes("hexcolor", &[], json!("fff")));
    }

    #[test]
    fn phone_and_semver() {
        assert!(rule_passes("e164", &[], json!("+14155552671")));
        assert!(!rule_passes("e164", &[], json!("4155552671")));
        assert!(rule_passes("semver", &[], json!("1.2.3")));
        assert!(rule_passes("semver", &[], json!("v0.1.0-alpha.1+build5")));
        assert!(!rule_passes("semver", &[], json!("1.2")));
    }

    #[test]
    fn base64_rule() {
        assert!(rule_passes("base64", &[], json!("aGVsbG8=")));
        assert!(!rule_passes("base64", &[], json!("###")));
    }

    #[test]
    fn luhn_and_credit_card() {
        assert!(rule_passes("luhn_checksum", &[], json!("79927398713")));
        assert!(!rule_passes("luhn_checksum", &[], json!("79927398710")));
        assert!(rule_passes("credit_card", &[], json!("4539 1488 0343 6467")));
        assert!(!rule_passes("credit_card", &[], json!("1234 5678 9012 3456")));
    }

    #[test]
    fn jwt_shape() {
        assert!(rule_passes("jwt", &[], json!("eyJh.eyJz.SflK")));
        assert!(!rule_passes("jwt", &[], json!("one.two")));
    }
}
