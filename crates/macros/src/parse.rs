//! Attribute parsing for the Model derive macro

use darling::{FromDeriveInput, FromField};
use syn::{Attribute, GenericArgument, Ident, PathArguments, Type};

/// Parsed #[model(...)] attributes on the struct
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(model), supports(struct_named), forward_attrs(repr))]
pub struct ModelArgs {
    /// Struct identifier
    pub ident: Ident,

    /// Forwarded `#[repr]` attributes
    pub attrs: Vec<Attribute>,

    /// Struct fields
    pub data: darling::ast::Data<(), ModelFieldArgs>,

    /// Display name used by `Debug` and the field table (defaults to the ident)
    #[darling(default)]
    pub name: Option<String>,
}

impl ModelArgs {
    /// Whether the struct carries `#[repr(transparent)]`
    pub fn is_transparent(&self) -> bool {
        self.attrs.iter().any(|attr| {
            let mut transparent = false;
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("transparent") {
                    transparent = true;
                }
                Ok(())
            });
            transparent
        })
    }

    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.ident.to_string())
    }
}

/// Semantic type of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Integer,
    Bool,
    Text,
    Enum,
    Nested,
}

/// Parsed #[model(...)] attributes on a field
#[derive(Debug, FromField)]
#[darling(attributes(model))]
pub struct ModelFieldArgs {
    /// Field identifier
    pub ident: Option<Ident>,

    /// Field type, `PhantomData<T>` for properties
    pub ty: Type,

    /// Name of the field in the raw record (defaults to the property name)
    #[darling(rename = "field")]
    pub field_name: Option<String>,

    /// Fixed-size character buffer exposed as text
    #[darling(default)]
    pub text: bool,

    /// 32-bit integer exposed as an `FfiEnum`
    #[darling(default)]
    pub enumeration: bool,

    /// Embedded record exposed as another model
    #[darling(default)]
    pub nested: bool,

    /// Don't generate a setter
    #[darling(default)]
    pub readonly: bool,
}

impl ModelFieldArgs {
    /// Check if this is the backing record field
    pub fn is_raw_field(&self) -> bool {
        self.ident.as_ref().map(|i| i == "raw").unwrap_or(false)
    }

    /// Property name with any leading underscore stripped
    pub fn property_name(&self) -> String {
        let ident = self.ident.as_ref().map(|i| i.to_string()).unwrap_or_default();
        ident.strip_prefix('_').unwrap_or(&ident).to_string()
    }

    /// Field name in the raw record
    pub fn raw_field_name(&self) -> String {
        self.field_name.clone().unwrap_or_else(|| self.property_name())
    }

    /// The property's value type, unwrapped from `PhantomData<T>`
    pub fn value_type(&self) -> &Type {
        extract_inner_type(&self.ty)
    }

    pub fn kind(&self) -> darling::Result<PropertyKind> {
        let kind = match (self.text, self.enumeration, self.nested) {
            (false, false, false) if is_bool(self.value_type()) => PropertyKind::Bool,
            (false, false, false) => PropertyKind::Integer,
            (true, false, false) => PropertyKind::Text,
            (false, true, false) => PropertyKind::Enum,
            (false, false, true) => PropertyKind::Nested,
            _ => {
                return Err(darling::Error::custom(
                    "at most one of `text`, `enumeration`, `nested` may be set",
                )
                .with_span(&self.ty))
            }
        };
        Ok(kind)
    }
}

/// Extract the inner type from `PhantomData<T>` if present, otherwise return the type as-is
pub fn extract_inner_type(ty: &Type) -> &Type {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == "PhantomData" {
                if let PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(GenericArgument::Type(inner)) = args.args.first() {
                        return inner;
                    }
                }
            }
        }
    }
    ty
}

/// Check if a type is PhantomData
pub fn is_phantom_data(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == "PhantomData";
        }
    }
    false
}

fn is_bool(ty: &Type) -> bool {
    matches!(ty, Type::Path(p) if p.path.is_ident("bool"))
}

/// Parse a DeriveInput into ModelArgs
pub fn parse_model(input: &syn::DeriveInput) -> darling::Result<ModelArgs> {
    ModelArgs::from_derive_input(input)
}
