//! Path parsing and value lookup.
//!
//! Paths are dot-separated field names with bracket index segments:
//! `"addr.phones.[0].number"`. The compact form `"phones[0]"` is accepted
//! as well. Lookup failures are structural ([`AccessError`]), distinct from
//! validation failures.

use crate::error::AccessError;

use super::{Access, ArrayAccess, ObjectAccess, Value};

/// One traversal step: a field name or an array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object field by name.
    Field(String),
    /// Array element by 0-based index.
    Index(usize),
}

/// Parse a path into segments.
///
/// The empty path resolves to the root. Errors on empty segments (`"a..b"`)
/// and malformed bracket tokens (`"[x]"`, `"[1"`).
pub fn parse_path(path: &str) -> Result<Vec<Segment>, AccessError> {
    let mut segments = Vec::new();
    if path.is_empty() {
        return Ok(segments);
    }

    for part in path.split('.') {
        if part.is_empty() {
            return Err(AccessError::MalformedSegment {
                segment: part.to_string(),
            });
        }
        parse_part(part, &mut segments)?;
    }

    Ok(segments)
}

/// Parse one dot-delimited part, which may be a bare name, a bare bracket
/// token, or a name with trailing bracket tokens (`"phones[0]"`).
fn parse_part(part: &str, segments: &mut Vec<Segment>) -> Result<(), AccessError> {
    let malformed = || AccessError::MalformedSegment {
        segment: part.to_string(),
    };

    let mut rest = part;
    if !rest.starts_with('[') {
        match rest.find('[') {
            Some(pos) => {
                segments.push(Segment::Field(rest[..pos].to_string()));
                rest = &rest[pos..];
            }
            None => {
                segments.push(Segment::Field(rest.to_string()));
                return Ok(());
            }
        }
    }

    while !rest.is_empty() {
        if !rest.starts_with('[') {
            return Err(malformed());
        }
        let close = rest.find(']').ok_or_else(malformed)?;
        let index: usize = rest[1..close].parse().map_err(|_| malformed())?;
        segments.push(Segment::Index(index));
        rest = &rest[close + 1..];
    }

    Ok(())
}

/// Resolve a path against a root value and return the terminal view.
///
/// Failure modes: unknown field, out-of-range index, malformed token, or a
/// segment applied to the wrong shape.
pub fn lookup<'a>(root: &'a dyn Access, path: &str) -> Result<Value<'a>, AccessError> {
    let mut node: &'a dyn Access = root;

    for segment in parse_path(path)? {
        match segment {
            Segment::Field(name) => {
                let obj = node.as_object().ok_or(AccessError::KindMismatch {
                    expected: "object",
                    found: node.kind().name(),
                })?;
                node = obj
                    .field(&name)
                    .ok_or(AccessError::UnknownField { field: name })?;
            }
            Segment::Index(index) => {
                let arr = node.as_array().ok_or(AccessError::KindMismatch {
                    expected: "array",
                    found: node.kind().name(),
                })?;
                let len = arr.len();
                node = arr
                    .get(index)
                    .ok_or(AccessError::IndexOutOfRange { index, len })?;
            }
        }
    }

    Ok(Value::new(node))
}
