//! Derive macros for mapping Rust types to FaunaDB values
//!
//! - `#[derive(FaunaObject)]` on a struct with named fields generates
//!   `FaunaObject`, `Decode` and `Encode` impls.
//! - `#[derive(FaunaEnum)]` on a unit-only enum generates `FaunaEnum`,
//!   `Decode` and `Encode` impls.
//!
//! # Struct attributes
//!
//! | Attribute | Effect |
//! |-----------|--------|
//! | `#[fauna(factory = "path", params("a", "b"))]` | create through `path(a, b)` |
//! | `#[fauna(constructor = "path", params("a"))]` | create through `path(a)` |
//! | `#[fauna(default)]` | create with `Default::default()`, then set every field |
//! | `#[fauna(property(name = "n", get = "method"))]` | extra encoded property `n` from `self.method()` |
//! | `#[fauna(crate = "path")]` | path of the core crate (default `::faunadb_core`) |
//!
//! Without a creator attribute the struct is built memberwise from its
//! fields.
//!
//! # Field attributes
//!
//! | Attribute | Effect |
//! |-----------|--------|
//! | `#[fauna(rename = "n")]` | wire name `n` |
//! | `#[fauna(default)]` | use `Default::default()` when the field is missing |
//! | `#[fauna(default = "path")]` | use `path()` when the field is missing |
//! | `#[fauna(skip)]` | never read or written; filled with `Default::default()` |
//!
//! # Enum attributes
//!
//! `#[fauna(rename = "n")]` on a variant sets its wire name.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::punctuated::Punctuated;
use syn::{
    parse_macro_input, parse_quote, Data, DeriveInput, ExprPath, Fields, Ident, LitStr, Token,
    Type,
};

#[proc_macro_derive(FaunaObject, attributes(fauna))]
pub fn derive_fauna_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_object(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

#[proc_macro_derive(FaunaEnum, attributes(fauna))]
pub fn derive_fauna_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_enum(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

// =============================================================================
// Attribute parsing
// =============================================================================

enum CreatorAttr {
    Factory(ExprPath, Vec<LitStr>),
    Constructor(ExprPath, Vec<LitStr>),
}

struct ComputedAttr {
    name: LitStr,
    getter: Ident,
}

#[derive(Default)]
struct ContainerAttrs {
    krate: Option<syn::Path>,
    creators: Vec<CreatorAttr>,
    default_constructor: bool,
    computed: Vec<ComputedAttr>,
}

enum FieldDefault {
    Trait,
    Path(ExprPath),
}

struct FieldSpec<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    wire_name: String,
    default: Option<FieldDefault>,
    skip: bool,
}

fn parse_container_attrs(input: &DeriveInput) -> syn::Result<ContainerAttrs> {
    let mut attrs = ContainerAttrs::default();
    for attr in &input.attrs {
        if !attr.path().is_ident("fauna") {
            continue;
        }
        let mut factory: Option<ExprPath> = None;
        let mut constructor: Option<ExprPath> = None;
        let mut params: Vec<LitStr> = Vec::new();

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("crate") {
                let value: LitStr = meta.value()?.parse()?;
                attrs.krate = Some(value.parse()?);
            } else if meta.path.is_ident("factory") {
                let value: LitStr = meta.value()?.parse()?;
                factory = Some(value.parse()?);
            } else if meta.path.is_ident("constructor") {
                let value: LitStr = meta.value()?.parse()?;
                constructor = Some(value.parse()?);
            } else if meta.path.is_ident("params") {
                let content;
                syn::parenthesized!(content in meta.input);
                let names = Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?;
                params.extend(names);
            } else if meta.path.is_ident("default") {
                attrs.default_constructor = true;
            } else if meta.path.is_ident("property") {
                let mut name: Option<LitStr> = None;
                let mut getter: Option<Ident> = None;
                meta.parse_nested_meta(|inner| {
                    if inner.path.is_ident("name") {
                        name = Some(inner.value()?.parse()?);
                    } else if inner.path.is_ident("get") {
                        let value: LitStr = inner.value()?.parse()?;
                        getter = Some(value.parse()?);
                    } else {
                        return Err(inner.error("expected `name` or `get`"));
                    }
                    Ok(())
                })?;
                match (name, getter) {
                    (Some(name), Some(getter)) => attrs.computed.push(ComputedAttr { name, getter }),
                    _ => return Err(meta.error("property needs both `name` and `get`")),
                }
            } else {
                return Err(meta.error("unsupported fauna attribute"));
            }
            Ok(())
        })?;

        if let Some(path) = factory {
            attrs.creators.push(CreatorAttr::Factory(path, params.clone()));
        }
        if let Some(path) = constructor {
            attrs.creators.push(CreatorAttr::Constructor(path, params));
        }
    }
    Ok(attrs)
}

fn parse_field<'a>(field: &'a syn::Field) -> syn::Result<FieldSpec<'a>> {
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;
    let mut parsed = FieldSpec {
        ident,
        ty: &field.ty,
        wire_name: ident.to_string(),
        default: None,
        skip: false,
    };
    for attr in &field.attrs {
        if !attr.path().is_ident("fauna") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                parsed.wire_name = value.value();
            } else if meta.path.is_ident("default") {
                parsed.default = if meta.input.peek(Token![=]) {
                    let value: LitStr = meta.value()?.parse()?;
                    Some(FieldDefault::Path(value.parse()?))
                } else {
                    Some(FieldDefault::Trait)
                };
            } else if meta.path.is_ident("skip") {
                parsed.skip = true;
            } else {
                return Err(meta.error("unsupported fauna field attribute"));
            }
            Ok(())
        })?;
    }
    Ok(parsed)
}

fn core_path(attrs: &ContainerAttrs) -> syn::Path {
    attrs
        .krate
        .clone()
        .unwrap_or_else(|| parse_quote!(::faunadb_core))
}

// =============================================================================
// FaunaObject
// =============================================================================

fn derive_object(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "FaunaObject only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "FaunaObject only supports structs; use FaunaEnum for enums",
            ))
        }
    };

    let attrs = parse_container_attrs(input)?;
    let krate = core_path(&attrs);
    let fields = named.iter().map(parse_field).collect::<syn::Result<Vec<_>>>()?;
    let mapped: Vec<&FieldSpec> = fields.iter().filter(|f| !f.skip).collect();

    let creators = if attrs.creators.is_empty() && !attrs.default_constructor {
        vec![memberwise_creator(&krate, &fields)]
    } else {
        let mut out: Vec<TokenStream2> = attrs
            .creators
            .iter()
            .map(|c| declared_creator(c, &mapped))
            .collect();
        if attrs.default_constructor {
            out.push(quote! {
                .default_constructor(<Self as ::core::default::Default>::default)
            });
        }
        out
    };

    let properties = mapped.iter().map(|f| {
        let ident = f.ident;
        let ty = f.ty;
        let wire = &f.wire_name;
        quote! {
            .field::<#ty, _, _>(
                #wire,
                |__v: &Self| &__v.#ident,
                |__v: &mut Self, __x: #ty| __v.#ident = __x,
            )
        }
    });

    let computed = attrs.computed.iter().map(|c| {
        let wire = &c.name;
        let getter = &c.getter;
        quote! {
            .computed(#wire, |__v: &Self| __v.#getter())
        }
    });

    let mut generics = input.generics.clone();
    {
        let where_clause = generics.make_where_clause();
        for param in input.generics.type_params() {
            let ident = &param.ident;
            where_clause.predicates.push(parse_quote! {
                #ident: #krate::Decode + #krate::Encode + 'static
            });
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let type_name = name.to_string();

    Ok(quote! {
        impl #impl_generics #krate::FaunaObject for #name #ty_generics #where_clause {
            fn describe() -> ::core::result::Result<#krate::ObjectDescriptor<Self>, #krate::ConfigError> {
                #krate::ObjectDescriptor::<Self>::builder()
                    .type_name(#type_name)
                    #(#creators)*
                    #(#properties)*
                    #(#computed)*
                    .build()
            }
        }

        impl #impl_generics #krate::Decode for #name #ty_generics #where_clause {
            fn decode(value: &#krate::Value) -> #krate::Result<Self> {
                #krate::object::decode_object(value)
            }
        }

        impl #impl_generics #krate::Encode for #name #ty_generics #where_clause {
            fn encode(&self, encoder: &mut #krate::Encoder) -> #krate::Result<#krate::Value> {
                #krate::object::encode_object(self, encoder)
            }
        }
    })
}

fn param_lookup(wire: &str, ty: Option<&Type>, default: Option<&FieldDefault>) -> TokenStream2 {
    let turbofish = ty.map(|ty| quote! { ::<#ty> });
    match default {
        None => quote! { __args.get #turbofish (#wire) },
        Some(FieldDefault::Trait) => quote! {
            __args.get_or_else(#wire, ::core::default::Default::default)
        },
        Some(FieldDefault::Path(path)) => quote! { __args.get_or_else(#wire, #path) },
    }
}

fn param_names<S: AsRef<str>>(names: &[S]) -> TokenStream2 {
    let names = names.iter().map(AsRef::as_ref);
    quote! {
        {
            const __PARAMS: &[&str] = &[#(#names),*];
            __PARAMS.iter().copied()
        }
    }
}

fn memberwise_creator(krate: &syn::Path, fields: &[FieldSpec]) -> TokenStream2 {
    let names: Vec<&str> = fields
        .iter()
        .filter(|f| !f.skip)
        .map(|f| f.wire_name.as_str())
        .collect();
    let params = param_names(&names);
    let mut lookups = Vec::new();
    let mut inits = Vec::new();
    for (i, field) in fields.iter().enumerate() {
        let ident = field.ident;
        if field.skip {
            inits.push(quote! { #ident: ::core::default::Default::default() });
            continue;
        }
        let local = format_ident!("__p{}", i);
        let ty = field.ty;
        let lookup = param_lookup(&field.wire_name, Some(ty), field.default.as_ref());
        lookups.push(quote! { let #local: #krate::Result<#ty> = #lookup; });
        inits.push(quote! { #ident: #local? });
    }
    quote! {
        .constructor(#params, |__args| {
            #(#lookups)*
            ::core::result::Result::Ok(Self { #(#inits),* })
        })
    }
}

fn declared_creator(creator: &CreatorAttr, fields: &[&FieldSpec]) -> TokenStream2 {
    let (method, path, params) = match creator {
        CreatorAttr::Factory(path, params) => (Ident::new("factory", Span::call_site()), path, params),
        CreatorAttr::Constructor(path, params) => {
            (Ident::new("constructor", Span::call_site()), path, params)
        }
    };
    let names: Vec<String> = params.iter().map(LitStr::value).collect();
    let param_list = param_names(&names);
    let locals: Vec<Ident> = (0..names.len()).map(|i| format_ident!("__p{}", i)).collect();
    let lookups = names.iter().zip(&locals).map(|(wire, local)| {
        let field = fields.iter().find(|f| &f.wire_name == wire);
        let lookup = param_lookup(
            wire,
            field.map(|f| f.ty),
            field.and_then(|f| f.default.as_ref()),
        );
        quote! { let #local = #lookup; }
    });
    quote! {
        .#method(#param_list, |__args| {
            #(#lookups)*
            ::core::result::Result::Ok(#path(#(#locals?),*))
        })
    }
}

// =============================================================================
// FaunaEnum
// =============================================================================

fn derive_enum(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let data = match &input.data {
        Data::Enum(data) => data,
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "FaunaEnum only supports enums",
            ))
        }
    };

    let attrs = parse_container_attrs(input)?;
    let krate = core_path(&attrs);

    let mut constants = Vec::new();
    let mut ordinals = Vec::new();
    for (ordinal, variant) in data.variants.iter().enumerate() {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "FaunaEnum only supports unit variants",
            ));
        }
        let ident = &variant.ident;
        let mut wire = ident.to_string();
        for attr in &variant.attrs {
            if !attr.path().is_ident("fauna") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    wire = value.value();
                    Ok(())
                } else {
                    Err(meta.error("unsupported fauna variant attribute"))
                }
            })?;
        }
        constants.push(quote! { (#name::#ident, #wire) });
        ordinals.push(quote! { #name::#ident => #ordinal });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #krate::FaunaEnum for #name #ty_generics #where_clause {
            const CONSTANTS: &'static [(Self, &'static str)] = &[#(#constants),*];

            fn ordinal(&self) -> usize {
                match self {
                    #(#ordinals,)*
                }
            }
        }

        impl #impl_generics #krate::Decode for #name #ty_generics #where_clause {
            fn decode(value: &#krate::Value) -> #krate::Result<Self> {
                #krate::object::decode_enum(value)
            }
        }

        impl #impl_generics #krate::Encode for #name #ty_generics #where_clause {
            fn encode(&self, _: &mut #krate::Encoder) -> #krate::Result<#krate::Value> {
                #krate::object::encode_enum(self)
            }
        }
    })
}
