//! Validation context and path tracking.
//!
//! One [`Context`] exists per traversal step. A child context is created for
//! every field or element visited; it shares the parent's error sink, carries
//! the extended path, and links back to the parent, forming the ancestor
//! chain cross-field rules walk.

use std::cell::{Cell, RefCell};

use crate::access::{lookup, Access, Value};
use crate::error::{AccessError, ValidationError, ValidationReport};
use crate::rule::Registry;

use super::Schema;

/// Shared error sink for one validation pass.
#[derive(Debug, Default)]
pub(crate) struct ErrorSink {
    errors: RefCell<Vec<ValidationError>>,
}

impl ErrorSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&self, err: ValidationError) {
        self.errors.borrow_mut().push(err);
    }

    pub(crate) fn into_report(self) -> ValidationReport {
        ValidationReport::from_errors(self.errors.into_inner())
    }
}

/// Per-step bundle of everything a rule can see: the schema node, the value
/// accessor, the rendered path, the parent chain, the rule registry, and the
/// shared error sink.
pub struct Context<'a> {
    schema: &'a Schema,
    accessor: &'a dyn Access,
    registry: &'a Registry,
    sink: &'a ErrorSink,
    parent: Option<&'a Context<'a>>,
    segments: Vec<String>,
    skip: Cell<bool>,
    depth: u32,
    max_depth: u32,
}

impl<'a> Context<'a> {
    /// Root context for one validation pass.
    pub(crate) fn root(
        schema: &'a Schema,
        accessor: &'a dyn Access,
        registry: &'a Registry,
        sink: &'a ErrorSink,
        max_depth: u32,
    ) -> Self {
        Self {
            schema,
            accessor,
            registry,
            sink,
            parent: None,
            segments: Vec::new(),
            skip: Cell::new(false),
            depth: 0,
            max_depth,
        }
    }

    /// Child context for a field or element one step below this one.
    ///
    /// The child shares the error sink, extends the path with `segment`, and
    /// records this context as its parent.
    pub fn child<'s>(
        &'s self,
        segment: impl Into<String>,
        schema: &'s Schema,
        accessor: &'s dyn Access,
    ) -> Context<'s> {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        tracing::trace!(path = %render_path(&segments), "descending");
        Context {
            schema,
            accessor,
            registry: self.registry,
            sink: self.sink,
            parent: Some(self),
            segments,
            skip: Cell::new(false),
            depth: self.depth + 1,
            max_depth: self.max_depth,
        }
    }

    /// The schema node being validated at this step.
    pub fn schema(&self) -> &Schema {
        self.schema
    }

    /// The accessor over the current value.
    pub fn accessor(&self) -> &'a dyn Access {
        self.accessor
    }

    /// The engine's rule registry.
    pub fn registry(&self) -> &Registry {
        self.registry
    }

    /// The enclosing object/array context, if any. Exactly one level of
    /// parent lookup is guaranteed for cross-field rules.
    pub fn parent(&self) -> Option<&Context<'a>> {
        self.parent
    }

    /// Whether this is the root of the walk.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The rendered path to the current value (`"items[2].name"`).
    pub fn path(&self) -> String {
        render_path(&self.segments)
    }

    /// The raw path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Terminal view over the current value.
    pub fn value(&self) -> Value<'a> {
        Value::new(self.accessor)
    }

    /// Resolve a path relative to the current value.
    pub fn get_value(&self, path: &str) -> Result<Value<'a>, AccessError> {
        lookup(self.accessor, path)
    }

    /// Short-circuit the remaining rules on the current node. Does not count
    /// as a failure and does not affect sibling or child nodes.
    pub fn skip_rest(&self) {
        self.skip.set(true);
    }

    /// Whether a rule on this node requested the skip.
    pub(crate) fn skip_requested(&self) -> bool {
        self.skip.get()
    }

    /// Record a validation failure.
    pub fn add_error(&self, err: ValidationError) {
        self.sink.push(err);
    }

    /// Guard against runaway recursion through deeply nested (or cyclic)
    /// data.
    pub(crate) fn ensure_depth(&self) -> Result<(), AccessError> {
        if self.depth > self.max_depth {
            Err(AccessError::MaxDepth {
                limit: self.max_depth,
            })
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("path", &self.path())
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

/// Join segments with `.`, concatenating bracket segments directly to the
/// previous segment: `["items", "[2]", "name"]` → `"items[2].name"`.
pub fn render_path(segments: &[String]) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 && !segment.starts_with('[') {
            out.push('.');
        }
        out.push_str(segment);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSchema;

    fn seg(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn path_rendering_concatenates_brackets() {
        assert_eq!(render_path(&seg(&["items", "[2]", "name"])), "items[2].name");
        assert_eq!(render_path(&seg(&["a", "b"])), "a.b");
        assert_eq!(render_path(&seg(&["[0]", "x"])), "[0].x");
        assert_eq!(render_path(&[]), "");
    }

    #[test]
    fn child_contexts_extend_path_and_chain() {
        let schema = Schema::Field(FieldSchema::new());
        let registry = Registry::new();
        let sink = ErrorSink::new();
        let value = 5i64;
        let root = Context::root(&schema, &value, &registry, &sink, 16);
        assert!(root.is_root());
        assert_eq!(root.path(), "");

        let inner = 7i64;
        let child = root.child("items", &schema, &inner);
        let elem = child.child("[0]", &schema, &inner);
        assert_eq!(elem.path(), "items[0]");
        assert_eq!(elem.parent().unwrap().path(), "items");
        assert!(elem.parent().unwrap().parent().unwrap().is_root());
    }

    #[test]
    fn skip_flag_is_per_context() {
        let schema = Schema::Field(FieldSchema::new());
        let registry = Registry::new();
        let sink = ErrorSink::new();
        let value = 1i64;
        let root = Context::root(&schema, &value, &registry, &sink, 16);
        let child = root.child("x", &schema, &value);
        child.skip_rest();
        assert!(child.skip_requested());
        assert!(!root.skip_requested());
    }

    #[test]
    fn depth_guard_trips_past_limit() {
        let schema = Schema::Field(FieldSchema::new());
        let registry = Registry::new();
        let sink = ErrorSink::new();
        let value = 1i64;
        let root = Context::root(&schema, &value, &registry, &sink, 1);
        let c1 = root.child("a", &schema, &value);
        let c2 = c1.child("b", &schema, &value);
        assert!(c1.ensure_depth().is_ok());
        assert!(matches!(
            c2.ensure_depth(),
            Err(AccessError::MaxDepth { limit: 1 })
        ));
    }
}
