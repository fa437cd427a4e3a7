//! Proc macros for argot.
//!
//! ## Derive Macros
//!
//! - [`Hydrate`] - Generate the binding table of a destination record from
//!   `#[argot(...)]` field annotations
//!
//! The derive is re-exported as `argot::Hydrate`; depend on `argot` rather
//! than on this crate directly.

mod hydrate;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `argot::Hydrate` for a struct with named fields.
///
/// Every annotated field is bound under a name that must match a flag or
/// argument of the command the record is hydrated for. Unannotated fields are
/// left alone.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `name = "..."` | Binding name (default: the field name) |
/// | `skip` | Never bind this field |
///
/// Bound fields must implement `argot::Field` (all scalars and `Vec`s of
/// scalars do). Two fields with the same binding name are a compile error.
///
/// # Example
///
/// ```ignore
/// use argot::Hydrate;
///
/// #[derive(Default, Hydrate)]
/// struct Config {
///     #[argot(name = "positional1")]
///     positional1: i64,
///     #[argot(name = "stringflag1")]
///     string_flag: String,
///     #[argot]
///     verbose: bool,
///     #[argot(name = "sliceflag1")]
///     slice_flag: Vec<String>,
///     scratch: Vec<u8>,
/// }
/// ```
///
/// # Generated Code
///
/// ```ignore
/// impl argot::Hydrate for Config {
///     fn bind<'__argot>(&'__argot mut self, bindings: &mut argot::Bindings<'__argot>) {
///         bindings.field("positional1", &mut self.positional1);
///         bindings.field("stringflag1", &mut self.string_flag);
///         bindings.field("verbose", &mut self.verbose);
///         bindings.field("sliceflag1", &mut self.slice_flag);
///     }
/// }
/// ```
#[proc_macro_derive(Hydrate, attributes(argot))]
pub fn hydrate_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    hydrate::hydrate_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
