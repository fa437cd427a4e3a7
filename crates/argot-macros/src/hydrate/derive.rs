//! Implementation of the `#[derive(Hydrate)]` macro.
//!
//! This macro generates an implementation of the `Hydrate` trait that
//! registers every annotated field with `Bindings::field`.

use std::collections::HashMap;

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::parse_argot_attrs;

/// Main implementation of the Hydrate derive macro.
pub fn hydrate_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Hydrate can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Hydrate can only be derived for structs",
            ))
        }
    };

    let mut seen: HashMap<String, Span> = HashMap::new();
    let mut bindings: Vec<TokenStream> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attr = parse_argot_attrs(&field.attrs)?;
        if !attr.present || attr.skip {
            continue;
        }

        let binding_name = attr.name.unwrap_or_else(|| field_name.to_string());
        if let Some(first) = seen.get(&binding_name) {
            let mut err = Error::new(
                attr.span,
                format!("duplicate binding name '{binding_name}'"),
            );
            err.combine(Error::new(*first, "first bound here"));
            return Err(err);
        }
        seen.insert(binding_name.clone(), attr.span);

        bindings.push(quote! {
            bindings.field(#binding_name, &mut self.#field_name);
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::argot::Hydrate for #struct_name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn bind<'__argot>(
                &'__argot mut self,
                bindings: &mut ::argot::Bindings<'__argot>,
            ) {
                #(#bindings)*
            }
        }
    })
}
