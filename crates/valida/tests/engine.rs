//! Engine-level integration tests: error accumulation policy, skip
//! semantics, path correctness, aliasing, and the depth guard.
//!
//! Rules here are ad-hoc test rules registered through the public API; the
//! shipped catalog lives in the `valida-rules` crate and has its own tests.

use serde_json::json;
use valida::{builder, AccessError, Context, Registry, RuleError, Schema, Validator};

/// Registry with small deterministic rules for exercising the engine.
fn test_registry() -> Registry {
    let mut r = Registry::new();
    r.register("nonempty", |ctx: &Context<'_>| {
        if ctx.value().is_empty() {
            Err(RuleError::CheckFailed)
        } else {
            Ok(())
        }
    });
    r.register("always_fails", |_ctx: &Context<'_>| {
        Err(RuleError::CheckFailed)
    });
    r.register("also_fails", |_ctx: &Context<'_>| Err(RuleError::CheckFailed));
    r.register("skip_when_empty", |ctx: &Context<'_>| {
        if ctx.value().is_empty() {
            ctx.skip_rest();
        }
        Ok(())
    });
    r.register("min_len", |ctx: &Context<'_>, min: i64| {
        match ctx.value().len() {
            Some(len) if (len as i64) >= min => Ok(()),
            _ => Err(RuleError::CheckFailed),
        }
    });
    r
}

#[test]
fn sibling_field_errors_aggregate() {
    let reg = test_registry();
    let schema = builder::object(&reg)
        .field("a", builder::field(&reg).rule("nonempty", &[] as &[&str]).build())
        .field("b", builder::field(&reg).rule("nonempty", &[] as &[&str]).build())
        .field("c", builder::field(&reg).rule("nonempty", &[] as &[&str]).build())
        .build();
    let v = Validator::with_registry(schema, reg);

    let report = v.validate(&json!({"a": "", "b": "", "c": "ok"})).unwrap();
    assert_eq!(report.errors().len(), 2);
    assert!(report.has_field_error("a"));
    assert!(report.has_field_error("b"));
    assert!(!report.has_field_error("c"));
}

#[test]
fn field_stops_at_first_failing_rule() {
    let reg = test_registry();
    let schema = builder::field(&reg)
        .rule("always_fails", &[] as &[&str])
        .rule("also_fails", &[] as &[&str])
        .build();
    let v = Validator::with_registry(schema, reg);

    let report = v.validate(&json!("anything")).unwrap();
    assert_eq!(report.errors().len(), 1);
    assert_eq!(report.errors()[0].code, "always_fails");
}

#[test]
fn skip_rest_suppresses_later_rules_without_failing() {
    let reg = test_registry();
    let schema = builder::field(&reg)
        .rule("skip_when_empty", &[] as &[&str])
        .rule("min_len", &["5"])
        .build();
    let v = Validator::with_registry(schema, reg);

    // Empty value: the skip rule fires and min_len never runs.
    assert!(v.is_valid(&json!("")));
    // Non-empty value: min_len runs and fails.
    assert!(!v.is_valid(&json!("abc")));
    assert!(v.is_valid(&json!("abcdef")));
}

#[test]
fn array_elements_fail_independently() {
    let reg = test_registry();
    let schema = builder::array(
        &reg,
        builder::field(&reg).rule("min_len", &["3"]).build(),
    )
    .build();
    let v = Validator::with_registry(schema, reg);

    let report = v.validate(&json!(["x", "long enough", "y"])).unwrap();
    let paths: Vec<&str> = report.errors().iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["[0]", "[2]"]);
}

#[test]
fn nested_paths_render_with_bracket_segments() {
    let reg = test_registry();
    let schema = builder::object(&reg)
        .field(
            "items",
            builder::array(
                &reg,
                builder::object(&reg)
                    .field("name", builder::field(&reg).rule("nonempty", &[] as &[&str]).build())
                    .build(),
            )
            .build(),
        )
        .build();
    let v = Validator::with_registry(schema, reg);

    let report = v
        .validate(&json!({"items": [{"name": "ok"}, {"name": ""}]}))
        .unwrap();
    assert_eq!(report.errors().len(), 1);
    assert_eq!(report.errors()[0].path, "items[1].name");
}

#[test]
fn missing_field_validates_as_nil() {
    let reg = test_registry();
    let schema = builder::object(&reg)
        .field("name", builder::field(&reg).rule("nonempty", &[] as &[&str]).build())
        .build();
    let v = Validator::with_registry(schema, reg);

    let report = v.validate(&json!({})).unwrap();
    assert_eq!(report.errors().len(), 1);
    assert_eq!(report.errors()[0].path, "name");
}

#[test]
fn optional_field_skips_rules_on_nil() {
    let reg = test_registry();
    let schema = builder::object(&reg)
        .field(
            "nick",
            builder::field(&reg)
                .rule("nonempty", &[] as &[&str])
                .optional()
                .build(),
        )
        .build();
    let v = Validator::with_registry(schema, reg);

    assert!(v.is_valid(&json!({})));
    assert!(v.is_valid(&json!({"nick": null})));
    // Present non-nil values still validate. An empty string is present,
    // so the rule runs and fails.
    assert!(!v.is_valid(&json!({"nick": ""})));
}

#[test]
fn alias_reads_the_source_field() {
    let reg = test_registry();
    let schema = builder::object(&reg)
        .field("name", builder::field(&reg).rule("nonempty", &[] as &[&str]).build())
        .alias("name", "UserName")
        .build();
    let v = Validator::with_registry(schema, reg);

    assert!(v.is_valid(&json!({"UserName": "ada"})));
    let report = v.validate(&json!({"UserName": ""})).unwrap();
    // The error reports the declared name, not the source name.
    assert_eq!(report.errors()[0].path, "name");
}

#[test]
fn object_level_rules_run_before_fields() {
    let mut reg = test_registry();
    reg.register("needs_both", |ctx: &Context<'_>| {
        let a = ctx.get_value("a")?;
        let b = ctx.get_value("b")?;
        if a.display() == b.display() {
            Ok(())
        } else {
            Err(RuleError::CheckFailed)
        }
    });
    let schema = builder::object(&reg)
        .field("a", builder::field(&reg).build())
        .field("b", builder::field(&reg).build())
        .rule("needs_both", &[] as &[&str])
        .build();
    let v = Validator::with_registry(schema, reg);

    assert!(v.is_valid(&json!({"a": "x", "b": "x"})));
    let report = v.validate(&json!({"a": "x", "b": "y"})).unwrap();
    assert_eq!(report.errors().len(), 1);
    // Object-level failures report at the object's own path (root here).
    assert_eq!(report.errors()[0].path, "");
    assert_eq!(report.errors()[0].code, "needs_both");
}

#[test]
fn depth_guard_aborts_runaway_nesting() {
    let reg = test_registry();

    // items: [[[ ... ]]] with a schema as deep as the data.
    let mut schema = builder::field(&reg).build();
    let mut data = json!("leaf");
    for _ in 0..6 {
        schema = Schema::Array(valida::ArraySchema::new(schema));
        data = json!([data]);
    }

    let ok = Validator::with_registry(schema.clone(), reg.clone()).max_depth(10);
    assert!(ok.validate(&data).is_ok());

    let shallow = Validator::with_registry(schema, reg).max_depth(3);
    assert!(matches!(
        shallow.validate(&data),
        Err(AccessError::MaxDepth { limit: 3 })
    ));
}

#[test]
fn type_mismatch_is_structural() {
    let reg = test_registry();
    let schema = builder::array(&reg, builder::field(&reg).build()).build();
    let v = Validator::with_registry(schema, reg);

    assert!(matches!(
        v.validate(&json!("not an array")),
        Err(AccessError::KindMismatch { expected: "array", .. })
    ));
    // Nil is tolerated: absent arrays are not a structural error.
    assert!(v.validate(&json!(null)).unwrap().is_valid());
}

#[test]
fn check_folds_failures_into_error_channel() {
    let reg = test_registry();
    let schema = builder::object(&reg)
        .field("a", builder::field(&reg).rule("nonempty", &[] as &[&str]).build())
        .build();
    let v = Validator::with_registry(schema, reg);

    assert!(v.check(&json!({"a": "ok"})).is_ok());
    let err = v.check(&json!({"a": ""})).unwrap_err();
    let rendered = err.to_string();
    assert!(rendered.contains("a: nonempty"), "got: {rendered}");
}

#[test]
fn validation_is_idempotent_for_static_schemas() {
    let reg = test_registry();
    let schema = builder::object(&reg)
        .field("a", builder::field(&reg).rule("min_len", &["3"]).build())
        .field("b", builder::field(&reg).rule("nonempty", &[] as &[&str]).build())
        .build();
    let v = Validator::with_registry(schema, reg);

    let value = json!({"a": "xy", "b": ""});
    let first = v.validate(&value).unwrap();
    let second = v.validate(&value).unwrap();
    assert_eq!(first, second);
}
