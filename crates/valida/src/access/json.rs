//! Access adapter for `serde_json` documents.
//!
//! `serde_json::Value` is the canonical dynamic document type: any
//! `serde::Serialize` value can be ingested with `serde_json::to_value` and
//! validated as a JSON tree. `Null` is a nil terminal; numbers map to the
//! narrowest matching scalar.

use super::{Access, ArrayAccess, Kind, ObjectAccess, Scalar};

impl Access for serde_json::Value {
    fn kind(&self) -> Kind {
        match self {
            serde_json::Value::Array(_) => Kind::Array,
            serde_json::Value::Object(_) => Kind::Object,
            _ => Kind::Scalar,
        }
    }

    fn is_nil(&self) -> bool {
        self.is_null()
    }

    fn as_object(&self) -> Option<&dyn ObjectAccess> {
        match self {
            serde_json::Value::Object(map) => Some(map),
            _ => None,
        }
    }

    fn as_array(&self) -> Option<&dyn ArrayAccess> {
        match self {
            serde_json::Value::Array(items) => Some(items),
            _ => None,
        }
    }

    fn as_scalar(&self) -> Scalar<'_> {
        match self {
            serde_json::Value::Null => Scalar::Nil,
            serde_json::Value::Bool(b) => Scalar::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Scalar::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Scalar::UInt(u)
                } else {
                    Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Scalar::Str(s),
            _ => Scalar::Nil,
        }
    }
}

impl ObjectAccess for serde_json::Map<String, serde_json::Value> {
    fn field(&self, name: &str) -> Option<&dyn Access> {
        self.get(name).map(|v| v as &dyn Access)
    }

    fn field_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }

    fn len(&self) -> usize {
        serde_json::Map::len(self)
    }
}
