//! Model derive macro implementation

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::DeriveInput;

use crate::parse::{is_phantom_data, parse_model, ModelArgs, ModelFieldArgs, PropertyKind};

/// Generate the Model implementation
pub fn derive_model(input: DeriveInput) -> TokenStream {
    match parse_model(&input).and_then(generate_impl) {
        Ok(tokens) => tokens,
        Err(e) => e.write_errors(),
    }
}

fn generate_impl(args: ModelArgs) -> darling::Result<TokenStream> {
    let struct_name = &args.ident;
    let display_name = args.display_name();

    if !args.is_transparent() {
        return Err(darling::Error::custom(
            "Model structs must be #[repr(transparent)] over their `raw` field",
        )
        .with_span(struct_name));
    }

    let fields = match &args.data {
        darling::ast::Data::Struct(fields) => &fields.fields,
        _ => {
            return Err(darling::Error::custom("Model can only be derived for structs")
                .with_span(struct_name))
        }
    };

    let raw_field = fields.iter().find(|f| f.is_raw_field()).ok_or_else(|| {
        darling::Error::custom("Model structs need a `raw` field holding the record")
            .with_span(struct_name)
    })?;
    let raw_ty = &raw_field.ty;

    let mut errors = darling::Error::accumulator();
    let mut properties = Vec::new();
    for field in fields.iter().filter(|f| !f.is_raw_field()) {
        if !is_phantom_data(&field.ty) {
            errors.push(
                darling::Error::custom("Model properties must be declared as PhantomData<T>")
                    .with_span(&field.ty),
            );
            continue;
        }
        if let Some(kind) = errors.handle(field.kind()) {
            properties.push((field, kind));
        }
    }
    errors.finish()?;

    let phantom_inits = properties.iter().map(|(f, _)| {
        let ident = f.ident.as_ref();
        quote! { #ident: ::core::marker::PhantomData }
    });

    let field_infos = properties.iter().map(|(f, kind)| {
        let name = f.property_name();
        let foreign = f.raw_field_name();
        let value_ty = f.value_type();
        let ty_name = quote!(#value_ty).to_string().replace(' ', "");
        let kind = match kind {
            PropertyKind::Integer => quote!(Integer),
            PropertyKind::Bool => quote!(Bool),
            PropertyKind::Text => quote!(Text),
            PropertyKind::Enum => quote!(Enum),
            PropertyKind::Nested => quote!(Nested),
        };
        quote! {
            ::dgs_core::model::FieldInfo {
                name: #name,
                foreign: #foreign,
                kind: ::dgs_core::model::FieldKind::#kind,
                type_name: #ty_name,
            }
        }
    });

    let accessors = properties.iter().map(|(f, kind)| generate_accessors(f, *kind));

    let debug_fields = properties.iter().map(|(f, _)| {
        let name = f.property_name();
        let getter = format_ident!("{}", name);
        quote! { .field(#name, &self.#getter()) }
    });

    Ok(quote! {
        impl ::dgs_core::model::Model for #struct_name {
            type Raw = #raw_ty;

            const NAME: &'static str = #display_name;

            const FIELDS: &'static [::dgs_core::model::FieldInfo] = &[#(#field_infos),*];

            fn from_raw(raw: Self::Raw) -> Self {
                Self {
                    raw,
                    #(#phantom_inits),*
                }
            }

            fn from_raw_ref(raw: &Self::Raw) -> &Self {
                // SAFETY: Self is repr(transparent) over Self::Raw
                unsafe { &*(raw as *const Self::Raw as *const Self) }
            }

            fn from_raw_mut(raw: &mut Self::Raw) -> &mut Self {
                // SAFETY: Self is repr(transparent) over Self::Raw
                unsafe { &mut *(raw as *mut Self::Raw as *mut Self) }
            }

            fn as_raw(&self) -> &Self::Raw {
                &self.raw
            }

            fn as_raw_mut(&mut self) -> &mut Self::Raw {
                &mut self.raw
            }
        }

        impl ::core::default::Default for #struct_name {
            fn default() -> Self {
                <Self as ::dgs_core::model::Model>::from_raw(::core::default::Default::default())
            }
        }

        impl ::core::fmt::Debug for #struct_name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.debug_struct(#display_name)
                    #(#debug_fields)*
                    .finish()
            }
        }

        impl #struct_name {
            #(#accessors)*
        }
    })
}

fn generate_accessors(field: &ModelFieldArgs, kind: PropertyKind) -> TokenStream {
    let name = field.property_name();
    let raw_field = format_ident!("{}", field.raw_field_name());
    let value_ty = field.value_type();

    let getter_name = format_ident!("{}", name);
    let setter_name = format_ident!("set_{}", name);
    let getter_doc = format!("Get `{}`", name);
    let setter_doc = format!("Set `{}`", name);

    let (getter, setter) = match kind {
        PropertyKind::Integer | PropertyKind::Bool => (
            quote! {
                pub fn #getter_name(&self) -> #value_ty {
                    self.raw.#raw_field
                }
            },
            quote! {
                pub fn #setter_name(&mut self, value: #value_ty) {
                    self.raw.#raw_field = value;
                }
            },
        ),
        PropertyKind::Text => (
            quote! {
                pub fn #getter_name(&self) -> ::std::string::String {
                    ::dgs_core::model::text::decode(&self.raw.#raw_field)
                }
            },
            quote! {
                /// Fails if `value` does not fit the fixed-size buffer.
                pub fn #setter_name(
                    &mut self,
                    value: &str,
                ) -> ::core::result::Result<(), ::dgs_core::model::ModelError> {
                    ::dgs_core::model::text::encode(&mut self.raw.#raw_field, value, #name)
                }
            },
        ),
        PropertyKind::Enum => (
            quote! {
                pub fn #getter_name(
                    &self,
                ) -> ::core::result::Result<#value_ty, ::dgs_core::model::ModelError> {
                    ::dgs_core::model::decode_enum::<#value_ty>(self.raw.#raw_field, #name)
                }
            },
            quote! {
                pub fn #setter_name(&mut self, value: #value_ty) {
                    self.raw.#raw_field = ::dgs_core::FfiEnum::to_ffi(value);
                }
            },
        ),
        PropertyKind::Nested => {
            let getter_mut = format_ident!("{}_mut", name);
            (
                quote! {
                    pub fn #getter_name(&self) -> &#value_ty {
                        <#value_ty as ::dgs_core::model::Model>::from_raw_ref(&self.raw.#raw_field)
                    }

                    /// Mutable view aliasing the embedded record
                    pub fn #getter_mut(&mut self) -> &mut #value_ty {
                        <#value_ty as ::dgs_core::model::Model>::from_raw_mut(&mut self.raw.#raw_field)
                    }
                },
                quote! {
                    pub fn #setter_name(&mut self, value: #value_ty) {
                        self.raw.#raw_field = ::dgs_core::model::Model::into_raw(value);
                    }
                },
            )
        }
    };

    let setter = if field.readonly {
        quote! {}
    } else {
        quote! {
            #[doc = #setter_doc]
            #[inline]
            #setter
        }
    };

    quote! {
        #[doc = #getter_doc]
        #[inline]
        #getter

        #setter
    }
}
