//! dgs Proc Macros
//!
//! - `#[derive(Model)]` - Generate typed property accessors over a raw SDK record
//!
//! # Model Example
//!
//! ```ignore
//! use std::marker::PhantomData;
//! use dgs_core::{sdk, Model};
//!
//! #[derive(Clone, Copy, Model)]
//! #[repr(transparent)]
//! pub struct User {
//!     raw: sdk::DiscordUser,
//!
//!     #[model(field = "id")]
//!     id: PhantomData<i64>,
//!
//!     #[model(text)]
//!     username: PhantomData<String>,
//!
//!     bot: PhantomData<bool>,
//! }
//!
//! // Generated methods:
//! // - user.id() -> i64, user.set_id(42)
//! // - user.username() -> String, user.set_username("alice")?  (fails if too long)
//! // - user.bot() -> bool, user.set_bot(false)
//! ```
//!
//! # Attributes
//!
//! ## Struct Attributes
//!
//! - `#[repr(transparent)]` - **Required.** Lets the derive hand out views into
//!   records owned by a parent model.
//! - `#[model(name = "User")]` - Optional. Display name for `Debug` and `FIELDS`.
//!
//! ## Field Attributes
//!
//! - `#[model(field = "type_")]` - Field name in the raw record, if it differs.
//! - `#[model(text)]` - `c_char` buffer exposed as `String`.
//! - `#[model(enumeration)]` - 32-bit integer exposed as an `FfiEnum`.
//! - `#[model(nested)]` - Embedded record exposed as another model.
//! - `#[model(readonly)]` - Don't generate a setter.
//!
//! Untagged `PhantomData<bool>` properties are booleans, anything else is
//! copied through as-is (integers).

mod model;
mod parse;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derive macro for model wrappers
///
/// # Generated Code
///
/// For each `PhantomData<T>` property the macro generates:
///
/// - A getter (`fn username(&self) -> String`)
/// - A setter (`fn set_username(&mut self, value: &str) -> Result<(), ModelError>`) unless `readonly`
/// - For nested properties, an extra `_mut` getter aliasing the parent's memory
///
/// Plus `Model` (with the `FIELDS` descriptor table), `Default` (zeroed record)
/// and a `Debug` impl listing every property.
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    model::derive_model(input).into()
}
