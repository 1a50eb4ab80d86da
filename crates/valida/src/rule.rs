//! # Rule Registry & Compilation
//!
//! Maps rule names to factories and binds raw (string) parameters to the
//! parameter types a rule declares. Registration is generic over closures —
//! the declared parameter types are captured from the closure signature, the
//! way an extractor-based handler registry works:
//!
//! ```
//! use valida::{Context, Registry, RuleError, RuleResult};
//!
//! let mut registry = Registry::new();
//! registry.register("starts_with", |ctx: &Context<'_>, prefix: String| {
//!     if ctx.value().display().starts_with(&prefix) {
//!         Ok(())
//!     } else {
//!         Err(RuleError::CheckFailed)
//!     }
//! });
//! let rule = registry.build("starts_with", &["img_"]);
//! assert_eq!(rule.name(), "starts_with");
//! ```
//!
//! Parameter coercion happens once, at schema-construction time. A lookup of
//! an unregistered name, a wrong parameter count, or an unparsable parameter
//! **panics**: malformed schema wiring must surface before any data is
//! validated, not during it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::error::{AccessError, ErrorParam, ValidationError};
use crate::schema::Context;

/// Declared kind of one rule parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Pass-through string.
    Str,
    /// Signed integer, parsed from the raw parameter.
    Int,
    /// Float, parsed from the raw parameter.
    Float,
    /// Boolean, parsed from the raw parameter.
    Bool,
    /// Variadic list of strings; consumes every raw parameter.
    StrList,
}

/// A parameter value bound at schema-construction time.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// String parameter.
    Str(String),
    /// Integer parameter.
    Int(i64),
    /// Float parameter.
    Float(f64),
    /// Boolean parameter.
    Bool(bool),
    /// Variadic string-list parameter.
    List(Vec<String>),
}

impl ParamValue {
    /// JSON rendering, used when a failure is reported with bound params.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ParamValue::Str(s) => serde_json::Value::String(s.clone()),
            ParamValue::Int(i) => serde_json::Value::from(*i),
            ParamValue::Float(f) => serde_json::Value::from(*f),
            ParamValue::Bool(b) => serde_json::Value::from(*b),
            ParamValue::List(items) => {
                serde_json::Value::from(items.iter().map(|s| s.as_str()).collect::<Vec<_>>())
            }
        }
    }
}

/// What a rule function reports back.
#[derive(Error, Debug)]
pub enum RuleError {
    /// The check failed; the registry wraps this into a
    /// [`ValidationError`] with the rule's name as code and its bound
    /// parameters attached.
    #[error("validation check failed")]
    CheckFailed,

    /// The check failed with a fully-formed error (custom code or params).
    #[error(transparent)]
    Invalid(ValidationError),

    /// A structural error; aborts the enclosing validation walk.
    #[error(transparent)]
    Access(#[from] AccessError),
}

/// Result type every rule function returns.
pub type RuleResult = Result<(), RuleError>;

/// Erased, bound check function.
pub type CheckFn = Arc<dyn Fn(&Context<'_>) -> RuleResult + Send + Sync>;

/// A named rule bound to concrete parameter values, ready to run against a
/// [`Context`]. Cloning is cheap; the check function is shared.
#[derive(Clone)]
pub struct Rule {
    name: Arc<str>,
    params: Arc<[ParamValue]>,
    check: CheckFn,
}

impl Rule {
    /// The rule's registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parameters bound at construction time.
    pub fn params(&self) -> &[ParamValue] {
        &self.params
    }

    /// Run the check against a context.
    pub fn run(&self, ctx: &Context<'_>) -> RuleResult {
        (self.check)(ctx)
    }

    /// The automatic failure for this rule at the given path, used when the
    /// check reports [`RuleError::CheckFailed`].
    pub(crate) fn failure(&self, path: String) -> ValidationError {
        let mut err = ValidationError::new(path, self.name.to_string());
        match self.params.as_ref() {
            [] => {}
            [only] => {
                err.params.push(ErrorParam {
                    name: "param".to_string(),
                    value: only.to_json(),
                });
            }
            many => {
                for (i, p) in many.iter().enumerate() {
                    err.params.push(ErrorParam {
                        name: format!("param{}", i + 1),
                        value: p.to_json(),
                    });
                }
            }
        }
        err
    }

    /// JSON description of this rule, used by schema dumps.
    pub fn describe(&self) -> serde_json::Value {
        let mut out = serde_json::Map::new();
        out.insert("name".to_string(), self.name.to_string().into());
        if !self.params.is_empty() {
            out.insert(
                "params".to_string(),
                self.params.iter().map(ParamValue::to_json).collect(),
            );
        }
        serde_json::Value::Object(out)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// A rule parameter type that can be declared in a rule closure's signature.
pub trait RuleParam: Clone + Send + Sync + 'static {
    /// The kind recorded in the registry for this parameter position.
    const KIND: ParamKind;

    /// Extract the typed value from a coerced parameter.
    ///
    /// Kinds are checked during coercion, so a mismatch here is a registry
    /// bug, not a user error.
    fn from_param(p: &ParamValue) -> Self;
}

impl RuleParam for String {
    const KIND: ParamKind = ParamKind::Str;

    fn from_param(p: &ParamValue) -> Self {
        match p {
            ParamValue::Str(s) => s.clone(),
            other => panic!("expected string parameter, got {other:?}"),
        }
    }
}

impl RuleParam for i64 {
    const KIND: ParamKind = ParamKind::Int;

    fn from_param(p: &ParamValue) -> Self {
        match p {
            ParamValue::Int(i) => *i,
            other => panic!("expected int parameter, got {other:?}"),
        }
    }
}

impl RuleParam for f64 {
    const KIND: ParamKind = ParamKind::Float;

    fn from_param(p: &ParamValue) -> Self {
        match p {
            ParamValue::Float(f) => *f,
            other => panic!("expected float parameter, got {other:?}"),
        }
    }
}

impl RuleParam for bool {
    const KIND: ParamKind = ParamKind::Bool;

    fn from_param(p: &ParamValue) -> Self {
        match p {
            ParamValue::Bool(b) => *b,
            other => panic!("expected bool parameter, got {other:?}"),
        }
    }
}

/// A rule definition: anything registrable under a name. Implemented for
/// closures `Fn(&Context)`, `Fn(&Context, A)`, `Fn(&Context, A, B)`,
/// `Fn(&Context, A, B, C)` with `A, B, C: RuleParam`, and the variadic form
/// `Fn(&Context, Vec<String>)`.
pub trait RuleDef<Marker>: Send + Sync + 'static {
    /// The parameter kinds this rule declares.
    #[doc(hidden)]
    fn kinds(&self) -> Vec<ParamKind>;

    /// Bind coerced parameters and return the erased check function.
    #[doc(hidden)]
    fn bind(&self, params: &[ParamValue]) -> CheckFn;
}

impl<F> RuleDef<()> for F
where
    F: Fn(&Context<'_>) -> RuleResult + Clone + Send + Sync + 'static,
{
    fn kinds(&self) -> Vec<ParamKind> {
        Vec::new()
    }

    fn bind(&self, _params: &[ParamValue]) -> CheckFn {
        let f = self.clone();
        Arc::new(move |ctx| f(ctx))
    }
}

impl<F, A> RuleDef<(A,)> for F
where
    F: Fn(&Context<'_>, A) -> RuleResult + Clone + Send + Sync + 'static,
    A: RuleParam,
{
    fn kinds(&self) -> Vec<ParamKind> {
        vec![A::KIND]
    }

    fn bind(&self, params: &[ParamValue]) -> CheckFn {
        let a = A::from_param(&params[0]);
        let f = self.clone();
        Arc::new(move |ctx| f(ctx, a.clone()))
    }
}

impl<F, A, B> RuleDef<(A, B)> for F
where
    F: Fn(&Context<'_>, A, B) -> RuleResult + Clone + Send + Sync + 'static,
    A: RuleParam,
    B: RuleParam,
{
    fn kinds(&self) -> Vec<ParamKind> {
        vec![A::KIND, B::KIND]
    }

    fn bind(&self, params: &[ParamValue]) -> CheckFn {
        let a = A::from_param(&params[0]);
        let b = B::from_param(&params[1]);
        let f = self.clone();
        Arc::new(move |ctx| f(ctx, a.clone(), b.clone()))
    }
}

impl<F, A, B, C> RuleDef<(A, B, C)> for F
where
    F: Fn(&Context<'_>, A, B, C) -> RuleResult + Clone + Send + Sync + 'static,
    A: RuleParam,
    B: RuleParam,
    C: RuleParam,
{
    fn kinds(&self) -> Vec<ParamKind> {
        vec![A::KIND, B::KIND, C::KIND]
    }

    fn bind(&self, params: &[ParamValue]) -> CheckFn {
        let a = A::from_param(&params[0]);
        let b = B::from_param(&params[1]);
        let c = C::from_param(&params[2]);
        let f = self.clone();
        Arc::new(move |ctx| f(ctx, a.clone(), b.clone(), c.clone()))
    }
}

/// Marker for the variadic string-list form.
#[doc(hidden)]
pub struct Variadic;

impl<F> RuleDef<Variadic> for F
where
    F: Fn(&Context<'_>, Vec<String>) -> RuleResult + Clone + Send + Sync + 'static,
{
    fn kinds(&self) -> Vec<ParamKind> {
        vec![ParamKind::StrList]
    }

    fn bind(&self, params: &[ParamValue]) -> CheckFn {
        let items = match &params[0] {
            ParamValue::List(items) => items.clone(),
            other => panic!("expected string-list parameter, got {other:?}"),
        };
        let f = self.clone();
        Arc::new(move |ctx| f(ctx, items.clone()))
    }
}

#[derive(Clone)]
struct Factory {
    kinds: Arc<[ParamKind]>,
    bind: Arc<dyn Fn(&[ParamValue]) -> CheckFn + Send + Sync>,
}

/// Name → rule factory map.
///
/// An explicit value, not a global: construct one, register rules, hand it
/// to a [`Validator`](crate::Validator). Populate once, then treat as
/// read-only; `valida-rules` ships a `standard()` instance with the built-in
/// catalog. Cloning shares the factories.
#[derive(Clone, Default)]
pub struct Registry {
    factories: HashMap<String, Factory>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule under `name`.
    ///
    /// The parameter kinds are captured from the closure's signature and
    /// recorded for coercion at build time. Re-registering a name replaces
    /// the previous definition.
    pub fn register<M>(&mut self, name: &str, def: impl RuleDef<M>) {
        let kinds: Arc<[ParamKind]> = def.kinds().into();
        let bind: Arc<dyn Fn(&[ParamValue]) -> CheckFn + Send + Sync> =
            Arc::new(move |params: &[ParamValue]| def.bind(params));
        self.factories
            .insert(name.to_string(), Factory { kinds, bind });
    }

    /// Whether a rule name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// The declared parameter kinds of a registered rule.
    pub fn param_kinds(&self, name: &str) -> Option<&[ParamKind]> {
        self.factories.get(name).map(|f| f.kinds.as_ref())
    }

    /// All registered rule names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build a bound [`Rule`], coercing each raw parameter into the declared
    /// kind.
    ///
    /// # Panics
    ///
    /// On unknown rule name, wrong parameter count, or a parameter that does
    /// not parse as its declared kind. These are schema-construction errors:
    /// the schema is invalid and cannot be repaired at validation time.
    pub fn build<S: AsRef<str>>(&self, name: &str, raw: &[S]) -> Rule {
        let factory = self
            .factories
            .get(name)
            .unwrap_or_else(|| panic!("rule '{name}' is not registered"));

        let params: Vec<ParamValue> = if matches!(factory.kinds.as_ref(), [ParamKind::StrList]) {
            vec![ParamValue::List(
                raw.iter().map(|s| s.as_ref().to_string()).collect(),
            )]
        } else {
            if raw.len() != factory.kinds.len() {
                panic!(
                    "rule '{name}' expects {} parameter(s), got {}",
                    factory.kinds.len(),
                    raw.len()
                );
            }
            factory
                .kinds
                .iter()
                .zip(raw)
                .map(|(kind, s)| {
                    coerce(*kind, s.as_ref())
                        .unwrap_or_else(|e| panic!("rule '{name}': {e}"))
                })
                .collect()
        };

        let check = (factory.bind)(&params);
        Rule {
            name: name.into(),
            params: params.into(),
            check,
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("rules", &self.names())
            .finish()
    }
}

/// Coerce one raw parameter into its declared kind.
fn coerce(kind: ParamKind, raw: &str) -> Result<ParamValue, String> {
    match kind {
        ParamKind::Str => Ok(ParamValue::Str(raw.to_string())),
        ParamKind::Int => raw
            .trim()
            .parse::<i64>()
            .map(ParamValue::Int)
            .map_err(|_| format!("invalid int parameter '{raw}'")),
        ParamKind::Float => raw
            .trim()
            .parse::<f64>()
            .map(ParamValue::Float)
            .map_err(|_| format!("invalid float parameter '{raw}'")),
        ParamKind::Bool => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "1" => Ok(ParamValue::Bool(true)),
            "false" | "f" | "0" => Ok(ParamValue::Bool(false)),
            _ => Err(format!("invalid bool parameter '{raw}'")),
        },
        ParamKind::StrList => Ok(ParamValue::List(vec![raw.to_string()])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass(_ctx: &Context<'_>) -> RuleResult {
        Ok(())
    }

    #[test]
    fn register_records_param_kinds() {
        let mut r = Registry::new();
        r.register("noparams", pass);
        r.register("one", |_ctx: &Context<'_>, _min: f64| Ok(()));
        r.register("two", |_ctx: &Context<'_>, _lo: i64, _hi: i64| Ok(()));
        r.register("many", |_ctx: &Context<'_>, _opts: Vec<String>| Ok(()));

        assert_eq!(r.param_kinds("noparams"), Some(&[][..]));
        assert_eq!(r.param_kinds("one"), Some(&[ParamKind::Float][..]));
        assert_eq!(
            r.param_kinds("two"),
            Some(&[ParamKind::Int, ParamKind::Int][..])
        );
        assert_eq!(r.param_kinds("many"), Some(&[ParamKind::StrList][..]));
        assert!(r.param_kinds("absent").is_none());
    }

    #[test]
    fn build_coerces_parameters() {
        let mut r = Registry::new();
        r.register("bounds", |_ctx: &Context<'_>, _lo: i64, _hi: f64| Ok(()));
        let rule = r.build("bounds", &["10", "99.5"]);
        assert_eq!(
            rule.params(),
            &[ParamValue::Int(10), ParamValue::Float(99.5)]
        );
    }

    #[test]
    fn build_variadic_consumes_all() {
        let mut r = Registry::new();
        r.register("choice", |_ctx: &Context<'_>, _opts: Vec<String>| Ok(()));
        let rule = r.build("choice", &["red", "green", "blue"]);
        assert_eq!(
            rule.params(),
            &[ParamValue::List(vec![
                "red".into(),
                "green".into(),
                "blue".into()
            ])]
        );
    }

    #[test]
    #[should_panic(expected = "not registered")]
    fn build_unknown_rule_panics() {
        Registry::new().build("ghost", &[] as &[&str]);
    }

    #[test]
    #[should_panic(expected = "expects 1 parameter(s), got 2")]
    fn build_wrong_arity_panics() {
        let mut r = Registry::new();
        r.register("one", |_ctx: &Context<'_>, _p: String| Ok(()));
        r.build("one", &["a", "b"]);
    }

    #[test]
    #[should_panic(expected = "invalid int parameter")]
    fn build_bad_coercion_panics() {
        let mut r = Registry::new();
        r.register("n", |_ctx: &Context<'_>, _p: i64| Ok(()));
        r.build("n", &["abc"]);
    }

    #[test]
    fn auto_failure_carries_params() {
        let mut r = Registry::new();
        r.register("len", |_ctx: &Context<'_>, _n: i64| {
            Err(RuleError::CheckFailed)
        });
        let rule = r.build("len", &["5"]);
        let err = rule.failure("name".to_string());
        assert_eq!(err.code, "len");
        assert_eq!(err.params.len(), 1);
        assert_eq!(err.params[0].name, "param");
        assert_eq!(err.params[0].value, serde_json::json!(5));
    }

    #[test]
    fn bool_coercion_accepts_short_forms() {
        assert_eq!(
            coerce(ParamKind::Bool, "T").unwrap(),
            ParamValue::Bool(true)
        );
        assert_eq!(
            coerce(ParamKind::Bool, "0").unwrap(),
            ParamValue::Bool(false)
        );
        assert!(coerce(ParamKind::Bool, "yes").is_err());
    }
}
