//! Property-proxy layer over raw SDK records
//!
//! A model is a `#[repr(transparent)]` wrapper that owns one raw record and
//! exposes its fields through typed accessors generated by
//! `#[derive(Model)]`. Conversions live here and are shared by every model:
//!
//! - text fields go through [`text::encode`] / [`text::decode`]
//! - enum fields go through [`decode_enum`] and [`FfiEnum::to_ffi`]
//! - nested records are views into the parent's memory, so writes through
//!   `foo_mut()` land in the parent record directly
//!
//! Records handed over by the library are always copied into an owned
//! model ([`Model::copy_from_ptr`]); a model never points into foreign memory.

pub mod text;
mod types;

pub use types::*;

use crate::types::FfiEnum;

/// Model conversion errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Text does not fit the fixed-size buffer (one byte is kept for the terminator)
    #[error("Text for `{field}` is {len} bytes, the buffer holds at most {max}")]
    TextTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// Text contains a NUL byte
    #[error("Text for `{field}` contains a NUL byte")]
    InteriorNul { field: &'static str },

    /// Stored integer has no matching enum member
    #[error("`{field}` holds {value}, which is not a valid {type_name}")]
    UnknownVariant {
        field: &'static str,
        type_name: &'static str,
        value: i32,
    },
}

/// Semantic type of a model property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Bool,
    Text,
    Enum,
    Nested,
}

/// One entry in a model's declarative field table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    /// Property (accessor) name
    pub name: &'static str,
    /// Field name in the raw record
    pub foreign: &'static str,
    pub kind: FieldKind,
    /// Rust value type of the property
    pub type_name: &'static str,
}

/// A typed view over a raw SDK record. Implemented by `#[derive(Model)]`.
pub trait Model: Sized {
    /// The `#[repr(C)]` record this model wraps
    type Raw: Copy + Default;

    /// Display name
    const NAME: &'static str;

    /// Declared properties in declaration order
    const FIELDS: &'static [FieldInfo];

    /// Take ownership of a record
    fn from_raw(raw: Self::Raw) -> Self;

    /// View a record as this model without copying
    fn from_raw_ref(raw: &Self::Raw) -> &Self;

    /// Mutable view of a record as this model
    fn from_raw_mut(raw: &mut Self::Raw) -> &mut Self;

    fn as_raw(&self) -> &Self::Raw;

    fn as_raw_mut(&mut self) -> &mut Self::Raw;

    fn into_raw(self) -> Self::Raw {
        *self.as_raw()
    }

    /// Byte-for-byte copy of a record owned by the library.
    ///
    /// Returns `None` for a null pointer.
    ///
    /// # Safety
    /// A non-null `ptr` must point to a readable, initialised `Self::Raw`.
    unsafe fn copy_from_ptr(ptr: *const Self::Raw) -> Option<Self> {
        ptr.as_ref().map(|raw| Self::from_raw(*raw))
    }

    /// Names of the declared properties
    fn field_names() -> Vec<&'static str> {
        Self::FIELDS.iter().map(|f| f.name).collect()
    }

    /// Look up a declared property by name
    fn field(name: &str) -> Option<&'static FieldInfo> {
        Self::FIELDS.iter().find(|f| f.name == name)
    }
}

/// Convert a stored integer into an enum, naming the field on failure
pub fn decode_enum<E: FfiEnum>(value: i32, field: &'static str) -> Result<E, ModelError> {
    E::from_ffi(value).ok_or(ModelError::UnknownVariant {
        field,
        type_name: E::NAME,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LobbyType;

    #[test]
    fn test_decode_enum() {
        assert_eq!(decode_enum::<LobbyType>(2, "kind"), Ok(LobbyType::Public));
        assert_eq!(
            decode_enum::<LobbyType>(9, "kind"),
            Err(ModelError::UnknownVariant {
                field: "kind",
                type_name: "LobbyType",
                value: 9
            })
        );
    }

    #[test]
    fn test_model_error_display() {
        let err = ModelError::TextTooLong {
            field: "username",
            len: 300,
            max: 255,
        };
        assert_eq!(
            err.to_string(),
            "Text for `username` is 300 bytes, the buffer holds at most 255"
        );
    }
}
