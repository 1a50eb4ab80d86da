//! # Data Access Layer
//!
//! One traversal contract over heterogeneous runtime shapes. Every value the
//! engine can walk — user structs, maps, vectors, scalars, `Option`s,
//! `serde_json` documents — is seen through the [`Access`] trait, which
//! classifies the value as an object, an array, or a terminal scalar and
//! hands out the matching view.
//!
//! Accessors are read-only borrows: they never mutate the wrapped value, are
//! created lazily per traversal step, and are cheap enough to reconstruct
//! instead of caching.
//!
//! ## Implementing `Access` for your own types
//!
//! An object type implements [`Access`] + [`ObjectAccess`] by matching field
//! names. Because the implementation lives with the type, private fields are
//! reachable, and a struct that embeds another can promote the embedded
//! fields by delegating unmatched names — which gives outer-field-shadows-
//! embedded precedence by construction:
//!
//! ```
//! use valida::{Access, Kind, ObjectAccess};
//!
//! struct Timestamps { created: String }
//! struct User { name: String, created: String, base: Timestamps }
//!
//! impl Access for Timestamps {
//!     fn kind(&self) -> Kind { Kind::Object }
//!     fn as_object(&self) -> Option<&dyn ObjectAccess> { Some(self) }
//! }
//! impl ObjectAccess for Timestamps {
//!     fn field(&self, name: &str) -> Option<&dyn Access> {
//!         match name {
//!             "created" => Some(&self.created),
//!             _ => None,
//!         }
//!     }
//!     fn field_names(&self) -> Vec<String> { vec!["created".into()] }
//! }
//!
//! impl Access for User {
//!     fn kind(&self) -> Kind { Kind::Object }
//!     fn as_object(&self) -> Option<&dyn ObjectAccess> { Some(self) }
//! }
//! impl ObjectAccess for User {
//!     fn field(&self, name: &str) -> Option<&dyn Access> {
//!         match name {
//!             "name" => Some(&self.name),
//!             // own field shadows the embedded one
//!             "created" => Some(&self.created),
//!             _ => self.base.field(name),
//!         }
//!     }
//!     fn field_names(&self) -> Vec<String> {
//!         vec!["name".into(), "created".into()]
//!     }
//! }
//! ```

mod json;
mod path;
mod value;

pub use path::{lookup, parse_path, Segment};
pub use value::{Scalar, Value};

use std::collections::{BTreeMap, HashMap};

use crate::schema::SchemaModifier;

/// The shape of a value, decided once at wrap time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// A terminal value: string, number, boolean, or nil.
    Scalar,
    /// An indexed sequence.
    Array,
    /// A named-field container (struct or map).
    Object,
}

impl Kind {
    /// Lower-case name, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Scalar => "scalar",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }
}

/// Uniform read-only view over a runtime value.
///
/// The three `as_*` probes return `None`/`Nil` for mismatched shapes; callers
/// branch on [`kind`](Access::kind) or probe directly.
pub trait Access {
    /// The shape of this value.
    fn kind(&self) -> Kind;

    /// Whether the underlying value is nil (absent, `None`, JSON null).
    fn is_nil(&self) -> bool {
        false
    }

    /// Object view, when this value is an object.
    fn as_object(&self) -> Option<&dyn ObjectAccess> {
        None
    }

    /// Array view, when this value is an array.
    fn as_array(&self) -> Option<&dyn ArrayAccess> {
        None
    }

    /// Terminal scalar view. Non-scalar shapes report [`Scalar::Nil`].
    fn as_scalar(&self) -> Scalar<'_> {
        Scalar::Nil
    }
}

/// Field access over structs and maps.
pub trait ObjectAccess {
    /// Field by name. A missing field is `None`, never an error; the engine
    /// treats it as a nil value.
    fn field(&self, name: &str) -> Option<&dyn Access>;

    /// All field names this object exposes.
    fn field_names(&self) -> Vec<String>;

    /// Number of fields.
    fn len(&self) -> usize {
        self.field_names().len()
    }

    /// Whether the object has no fields.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capability query: does the underlying value rewrite its own schema
    /// before validation? Checked once per object node.
    fn schema_modifier(&self) -> Option<&dyn SchemaModifier> {
        None
    }
}

/// Index access over slices and vectors.
pub trait ArrayAccess {
    /// Number of elements.
    fn len(&self) -> usize;

    /// Whether the array has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `idx`, or `None` past the end.
    fn get(&self, idx: usize) -> Option<&dyn Access>;

    /// Visit every element in index order. Not restartable; construct a
    /// fresh accessor to iterate again.
    fn iterate(
        &self,
        f: &mut dyn FnMut(usize, &dyn Access) -> Result<(), crate::AccessError>,
    ) -> Result<(), crate::AccessError> {
        for idx in 0..self.len() {
            if let Some(elem) = self.get(idx) {
                f(idx, elem)?;
            }
        }
        Ok(())
    }
}

/// Terminal accessor for an absent value. Used wherever a field lookup comes
/// back empty, so "present but nil" and "absent" validate identically.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nil;

/// Shared nil terminal.
pub static NIL: Nil = Nil;

impl Access for Nil {
    fn kind(&self) -> Kind {
        Kind::Scalar
    }

    fn is_nil(&self) -> bool {
        true
    }
}

// ─── Scalar leaves ───────────────────────────────────────────────────

macro_rules! impl_access_int {
    ($($t:ty),*) => {$(
        impl Access for $t {
            fn kind(&self) -> Kind { Kind::Scalar }
            fn as_scalar(&self) -> Scalar<'_> { Scalar::Int(i64::from(*self)) }
        }
    )*};
}

macro_rules! impl_access_uint {
    ($($t:ty),*) => {$(
        impl Access for $t {
            fn kind(&self) -> Kind { Kind::Scalar }
            fn as_scalar(&self) -> Scalar<'_> { Scalar::UInt(u64::from(*self)) }
        }
    )*};
}

impl_access_int!(i8, i16, i32, i64);
impl_access_uint!(u8, u16, u32, u64);

impl Access for isize {
    fn kind(&self) -> Kind {
        Kind::Scalar
    }

    fn as_scalar(&self) -> Scalar<'_> {
        Scalar::Int(*self as i64)
    }
}

impl Access for usize {
    fn kind(&self) -> Kind {
        Kind::Scalar
    }

    fn as_scalar(&self) -> Scalar<'_> {
        Scalar::UInt(*self as u64)
    }
}

impl Access for f32 {
    fn kind(&self) -> Kind {
        Kind::Scalar
    }

    fn as_scalar(&self) -> Scalar<'_> {
        Scalar::Float(f64::from(*self))
    }
}

impl Access for f64 {
    fn kind(&self) -> Kind {
        Kind::Scalar
    }

    fn as_scalar(&self) -> Scalar<'_> {
        Scalar::Float(*self)
    }
}

impl Access for bool {
    fn kind(&self) -> Kind {
        Kind::Scalar
    }

    fn as_scalar(&self) -> Scalar<'_> {
        Scalar::Bool(*self)
    }
}

impl Access for str {
    fn kind(&self) -> Kind {
        Kind::Scalar
    }

    fn as_scalar(&self) -> Scalar<'_> {
        Scalar::Str(self)
    }
}

impl Access for String {
    fn kind(&self) -> Kind {
        Kind::Scalar
    }

    fn as_scalar(&self) -> Scalar<'_> {
        Scalar::Str(self.as_str())
    }
}

// ─── Transparent wrappers ────────────────────────────────────────────

impl<T: Access + ?Sized> Access for &T {
    fn kind(&self) -> Kind {
        (**self).kind()
    }

    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }

    fn as_object(&self) -> Option<&dyn ObjectAccess> {
        (**self).as_object()
    }

    fn as_array(&self) -> Option<&dyn ArrayAccess> {
        (**self).as_array()
    }

    fn as_scalar(&self) -> Scalar<'_> {
        (**self).as_scalar()
    }
}

impl<T: Access + ?Sized> Access for Box<T> {
    fn kind(&self) -> Kind {
        (**self).kind()
    }

    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }

    fn as_object(&self) -> Option<&dyn ObjectAccess> {
        (**self).as_object()
    }

    fn as_array(&self) -> Option<&dyn ArrayAccess> {
        (**self).as_array()
    }

    fn as_scalar(&self) -> Scalar<'_> {
        (**self).as_scalar()
    }
}

/// `Option` plays the role of the nil pointer: `None` is a nil terminal at
/// any depth, never an error, so optional-field logic treats "present but
/// nil" and "absent" uniformly.
impl<T: Access> Access for Option<T> {
    fn kind(&self) -> Kind {
        match self {
            Some(v) => v.kind(),
            None => Kind::Scalar,
        }
    }

    fn is_nil(&self) -> bool {
        match self {
            Some(v) => v.is_nil(),
            None => true,
        }
    }

    fn as_object(&self) -> Option<&dyn ObjectAccess> {
        self.as_ref().and_then(Access::as_object)
    }

    fn as_array(&self) -> Option<&dyn ArrayAccess> {
        self.as_ref().and_then(Access::as_array)
    }

    fn as_scalar(&self) -> Scalar<'_> {
        match self {
            Some(v) => v.as_scalar(),
            None => Scalar::Nil,
        }
    }
}

// ─── Sequences ───────────────────────────────────────────────────────

impl<T: Access> Access for Vec<T> {
    fn kind(&self) -> Kind {
        Kind::Array
    }

    fn as_array(&self) -> Option<&dyn ArrayAccess> {
        Some(self)
    }
}

impl<T: Access> ArrayAccess for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, idx: usize) -> Option<&dyn Access> {
        self.as_slice().get(idx).map(|v| v as &dyn Access)
    }
}

// ─── Maps ────────────────────────────────────────────────────────────

impl<T: Access, S: std::hash::BuildHasher> Access for HashMap<String, T, S> {
    fn kind(&self) -> Kind {
        Kind::Object
    }

    fn as_object(&self) -> Option<&dyn ObjectAccess> {
        Some(self)
    }
}

impl<T: Access, S: std::hash::BuildHasher> ObjectAccess for HashMap<String, T, S> {
    fn field(&self, name: &str) -> Option<&dyn Access> {
        self.get(name).map(|v| v as &dyn Access)
    }

    fn field_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

impl<T: Access> Access for BTreeMap<String, T> {
    fn kind(&self) -> Kind {
        Kind::Object
    }

    fn as_object(&self) -> Option<&dyn ObjectAccess> {
        Some(self)
    }
}

impl<T: Access> ObjectAccess for BTreeMap<String, T> {
    fn field(&self, name: &str) -> Option<&dyn Access> {
        self.get(name).map(|v| v as &dyn Access)
    }

    fn field_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}
