//! Attribute parsing for the Hydrate derive macro.
//!
//! Accepted forms on a field:
//!
//! ```text
//! #[argot]
//! #[argot(name = "intflag1")]
//! #[argot(skip)]
//! ```

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprLit, Lit, Meta, Result, Token,
};

/// Field-level attributes from `#[argot(...)]`.
#[derive(Debug, Clone)]
pub struct ArgotAttr {
    /// The field carries an `#[argot]` attribute at all.
    pub present: bool,
    /// Explicit binding name.
    pub name: Option<String>,
    /// Never bind this field.
    pub skip: bool,
    /// The span for error reporting.
    pub span: Span,
}

impl Default for ArgotAttr {
    fn default() -> Self {
        ArgotAttr {
            present: false,
            name: None,
            skip: false,
            span: Span::call_site(),
        }
    }
}

impl Parse for ArgotAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = ArgotAttr {
            present: true,
            ..ArgotAttr::default()
        };

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => {
                    attr.skip = true;
                }

                Meta::NameValue(nv) if nv.path.is_ident("name") => {
                    let Expr::Lit(ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                    else {
                        return Err(Error::new(
                            nv.value.span(),
                            "name must be a string literal",
                        ));
                    };
                    if s.value().is_empty() {
                        return Err(Error::new(s.span(), "name must not be empty"));
                    }
                    if attr.name.is_some() {
                        return Err(Error::new(s.span(), "name is given more than once"));
                    }
                    attr.name = Some(s.value());
                    attr.span = s.span();
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown argot attribute. Expected: name = \"...\" or skip",
                    ));
                }
            }
        }

        if attr.skip && attr.name.is_some() {
            return Err(Error::new(attr.span, "skip cannot be combined with name"));
        }

        Ok(attr)
    }
}

/// Extract the `#[argot(...)]` attribute from a field's attributes.
pub fn parse_argot_attrs(attrs: &[Attribute]) -> Result<ArgotAttr> {
    let mut found: Option<ArgotAttr> = None;
    for attr in attrs {
        if !attr.path().is_ident("argot") {
            continue;
        }
        if found.is_some() {
            return Err(Error::new(attr.span(), "duplicate #[argot] attribute"));
        }
        let parsed = match &attr.meta {
            Meta::Path(_) => ArgotAttr {
                present: true,
                span: attr.span(),
                ..ArgotAttr::default()
            },
            _ => {
                let mut parsed = attr.parse_args::<ArgotAttr>()?;
                if parsed.name.is_none() {
                    parsed.span = attr.span();
                }
                parsed
            }
        };
        found = Some(parsed);
    }
    Ok(found.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_argot(tokens: &str) -> Result<ArgotAttr> {
        syn::parse_str::<ArgotAttr>(tokens)
    }

    fn field_attrs(src: &str) -> Vec<Attribute> {
        let field: syn::FieldsNamed = syn::parse_str(&format!("{{ {src} value: i64 }}")).unwrap();
        field.named.into_iter().next().unwrap().attrs
    }

    #[test]
    fn test_name() {
        let attr = parse_argot(r#"name = "intflag1""#).unwrap();
        assert_eq!(attr.name.as_deref(), Some("intflag1"));
        assert!(attr.present);
        assert!(!attr.skip);
    }

    #[test]
    fn test_skip() {
        let attr = parse_argot("skip").unwrap();
        assert!(attr.skip);
        assert!(attr.name.is_none());
    }

    #[test]
    fn test_empty_list() {
        let attr = parse_argot("").unwrap();
        assert!(attr.present);
        assert!(attr.name.is_none());
    }

    #[test]
    fn test_name_must_be_string() {
        assert!(parse_argot("name = 42").is_err());
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(parse_argot(r#"name = """#).is_err());
    }

    #[test]
    fn test_skip_with_name_rejected() {
        assert!(parse_argot(r#"skip, name = "x""#).is_err());
    }

    #[test]
    fn test_unknown_attribute() {
        assert!(parse_argot("rename = \"x\"").is_err());
        assert!(parse_argot("required").is_err());
    }

    #[test]
    fn test_bare_attribute_on_field() {
        let attr = parse_argot_attrs(&field_attrs("#[argot]")).unwrap();
        assert!(attr.present);
        assert!(attr.name.is_none());
    }

    #[test]
    fn test_missing_attribute_on_field() {
        let attr = parse_argot_attrs(&field_attrs("#[doc = \"x\"]")).unwrap();
        assert!(!attr.present);
    }

    #[test]
    fn test_duplicate_attribute_on_field() {
        let attrs = field_attrs(r#"#[argot(name = "a")] #[argot(name = "b")]"#);
        assert!(parse_argot_attrs(&attrs).is_err());
    }
}
