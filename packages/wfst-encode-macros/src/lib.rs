use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    Attribute, Expr, GenericArgument, Ident, PathArguments, Token, Type, Visibility,
    parse::{Parse, ParseStream},
    parse_macro_input,
    punctuated::Punctuated,
    token,
};

/// One field of a `config!` block, either `name: Type = default` or, for a
/// nested config, `name: Type (PartialType = default)`.
struct Field {
    attrs: Vec<Attribute>,
    name: Ident,
    ty: Type,
    nested: Option<Type>,
    default: Expr,
}

impl Parse for Field {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let name = input.parse()?;
        input.parse::<Token![:]>()?;
        let ty = input.parse()?;

        let (nested, default) = if input.peek(token::Paren) {
            let inner;
            syn::parenthesized!(inner in input);
            let nested: Type = inner.parse()?;
            inner.parse::<Token![=]>()?;
            (Some(nested), inner.parse()?)
        } else {
            input.parse::<Token![=]>()?;
            (None, input.parse()?)
        };

        Ok(Field {
            attrs,
            name,
            ty,
            nested,
            default,
        })
    }
}

fn wraps_option(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };
    let Some(last) = path.path.segments.last() else {
        return false;
    };
    match &last.arguments {
        PathArguments::AngleBracketed(args) if last.ident == "Option" => {
            matches!(args.args.first(), Some(GenericArgument::Type(_))) && args.args.len() == 1
        }
        _ => false,
    }
}

impl Field {
    /// Type of the field in the deserialized, all-optional twin.
    fn partial_ty(&self) -> TokenStream2 {
        let ty = &self.ty;
        match &self.nested {
            Some(nested) => quote! { #nested },
            None if wraps_option(ty) => quote! { #ty },
            None => quote! { Option<#ty> },
        }
    }

    fn accessors(&self) -> TokenStream2 {
        let Field { name, ty, .. } = self;
        let with = format_ident!("with_{}", name);
        let get = format_ident!("get_{}", name);
        quote! {
            pub fn #with(self, #name: #ty) -> Self {
                Self { #name, ..self }
            }

            pub fn #get(&self) -> &#ty {
                &self.#name
            }
        }
    }
}

struct Config {
    attrs: Vec<Attribute>,
    vis: Visibility,
    name: Ident,
    fields: Punctuated<Field, Token![,]>,
}

impl Parse for Config {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis = input.parse()?;
        input.parse::<Token![struct]>()?;
        let name = input.parse()?;
        let body;
        syn::braced!(body in input);

        Ok(Config {
            attrs,
            vis,
            name,
            fields: body.parse_terminated(Field::parse, Token![,])?,
        })
    }
}

/// Declares a configuration struct.
///
/// Besides the struct itself this generates a `Partial*` twin in which every
/// field is optional, used to read TOML files that only set some fields.
/// Missing fields fall back to their declared defaults. Doc comments and
/// other outer attributes are kept on the generated struct.
#[proc_macro]
pub fn config(input: TokenStream) -> TokenStream {
    let Config {
        attrs,
        vis,
        name,
        fields,
    } = parse_macro_input!(input as Config);
    let partial = format_ident!("Partial{}", name);

    let names: Vec<&Ident> = fields.iter().map(|f| &f.name).collect();
    let declarations = fields.iter().map(|f| {
        let Field { attrs, name, ty, .. } = f;
        quote! { #( #attrs )* #name: #ty }
    });
    let partial_types = fields.iter().map(Field::partial_ty);
    let defaults: Vec<&Expr> = fields.iter().map(|f| &f.default).collect();
    let accessors = fields.iter().map(Field::accessors);

    quote! {
        #( #attrs )*
        #[derive(Debug, Clone, PartialEq, serde::Serialize)]
        #vis struct #name {
            #( #declarations, )*
        }

        #[derive(Debug, Clone, Default, serde::Deserialize)]
        #[serde(deny_unknown_fields)]
        #vis struct #partial {
            #( #[serde(default)] #names: #partial_types, )*
        }

        impl Default for #name {
            fn default() -> Self {
                Self { #( #names: #defaults, )* }
            }
        }

        impl #name {
            pub fn from_partial(partial: #partial) -> Self {
                use crate::config::IntoOr;
                Self { #( #names: partial.#names.into_or(#defaults), )* }
            }

            pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
                Ok(Self::from_partial(toml::from_str(content)?))
            }

            /// Reads the config from a TOML file, `None` gives the defaults.
            pub fn from_optional_file<P: AsRef<std::path::Path>>(
                path: Option<P>,
            ) -> anyhow::Result<Self> {
                use anyhow::Context;
                let Some(path) = path else {
                    return Ok(Self::default());
                };
                let path = path.as_ref();
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                Self::from_toml_str(&content)
                    .with_context(|| format!("invalid config {}", path.display()))
            }

            #( #accessors )*
        }

        impl crate::config::IntoOr<#name> for Option<#partial> {
            fn into_or(self, or: #name) -> #name {
                self.map_or(or, #name::from_partial)
            }
        }
    }
    .into()
}
