//! `#[rule]` attribute macro for leaf rules.
//!
//! Placed on an `impl Rule for Type` block, it fills in the metadata methods
//! from the attribute and makes the leaf type composable with operators.
//!
//! # Example
//!
//! ```rust,ignore
//! use sutoppu::{rule, Rule};
//!
//! struct FruitIsSweet;
//!
//! #[rule(description = "Fruit must be sweet.")]
//! impl Rule for FruitIsSweet {
//!     type Candidate = Fruit;
//!
//!     fn is_satisfied_by(&self, fruit: &Fruit) -> bool {
//!         fruit.sweet
//!     }
//! }
//!
//! // Generates, next to the impl block itself:
//! // impl From<FruitIsSweet> for Specification<Fruit> { ... }
//! // impl<R: Into<Specification<Fruit>>> BitAnd<R> for FruitIsSweet { ... }
//! // impl<R: Into<Specification<Fruit>>> BitOr<R> for FruitIsSweet { ... }
//! // impl Not for FruitIsSweet { ... }
//! ```
//!
//! # Attribute Keys
//!
//! | Key | Injected method | Default when omitted |
//! |-----|-----------------|----------------------|
//! | `description = "..."` | `fn description(&self) -> &str` | trait default |
//! | `name = "..."` | `fn class_name(&self) -> &str` | type name |
//!
//! A key may not be combined with a hand-written method of the same name.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    parse_quote,
    punctuated::Punctuated,
    spanned::Spanned,
    Error, Expr, ImplItem, ItemImpl, Lit, LitStr, Meta, Result, Token, Type, WherePredicate,
};

/// Attribute arguments: `#[rule(description = "...", name = "...")]`
#[derive(Default)]
struct RuleAttrs {
    description: Option<LitStr>,
    name: Option<LitStr>,
}

impl Parse for RuleAttrs {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attrs = RuleAttrs::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::NameValue(nv) if nv.path.is_ident("description") => {
                    attrs.description = Some(expect_str(&nv.value)?);
                }
                Meta::NameValue(nv) if nv.path.is_ident("name") => {
                    attrs.name = Some(expect_str(&nv.value)?);
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown attribute, expected one of: description, name",
                    ));
                }
            }
        }

        Ok(attrs)
    }
}

fn expect_str(expr: &Expr) -> Result<LitStr> {
    if let Expr::Lit(expr_lit) = expr {
        if let Lit::Str(lit_str) = &expr_lit.lit {
            return Ok(lit_str.clone());
        }
    }
    Err(Error::new(expr.span(), "expected string literal"))
}

fn is_rule_impl(item: &ItemImpl) -> bool {
    match &item.trait_ {
        Some((None, path, _)) => path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Rule"),
        _ => false,
    }
}

fn candidate_type(item: &ItemImpl) -> Option<Type> {
    item.items.iter().find_map(|item| match item {
        ImplItem::Type(ty) if ty.ident == "Candidate" => Some(ty.ty.clone()),
        _ => None,
    })
}

fn defines_fn(item: &ItemImpl, name: &str) -> bool {
    item.items
        .iter()
        .any(|item| matches!(item, ImplItem::Fn(f) if f.sig.ident == name))
}

/// Main implementation of the `#[rule]` attribute
pub fn rule_impl(attr: TokenStream, item: TokenStream) -> Result<TokenStream> {
    let attrs: RuleAttrs = syn::parse2(attr)?;
    let mut item_impl: ItemImpl = syn::parse2(item)?;

    if !is_rule_impl(&item_impl) {
        return Err(Error::new(
            item_impl.span(),
            "#[rule] must be placed on an `impl Rule for Type` block",
        ));
    }

    let candidate = candidate_type(&item_impl).ok_or_else(|| {
        Error::new(
            item_impl.span(),
            "missing `type Candidate = ...;` in Rule impl",
        )
    })?;

    if let Some(description) = &attrs.description {
        if defines_fn(&item_impl, "description") {
            return Err(Error::new(
                description.span(),
                "`description` is set here and also defined in the impl block",
            ));
        }
        item_impl.items.push(parse_quote! {
            fn description(&self) -> &str {
                #description
            }
        });
    }

    if let Some(name) = &attrs.name {
        if defines_fn(&item_impl, "class_name") {
            return Err(Error::new(
                name.span(),
                "`name` is set here and also defined in the impl block",
            ));
        }
        item_impl.items.push(parse_quote! {
            fn class_name(&self) -> &str {
                #name
            }
        });
    }

    let self_ty = &item_impl.self_ty;
    let spec_ty: Type = parse_quote!(::sutoppu::Specification<#candidate>);

    // Specification::new needs an owned, sendable 'static rule.
    let mut predicates: Vec<WherePredicate> = item_impl
        .generics
        .where_clause
        .as_ref()
        .map(|w| w.predicates.iter().cloned().collect())
        .unwrap_or_default();
    predicates.push(parse_quote!(#self_ty: ::core::marker::Send + 'static));

    let (impl_generics, _, _) = item_impl.generics.split_for_impl();

    let mut rhs_generics = item_impl.generics.clone();
    rhs_generics.params.push(parse_quote!(__SutoppuRhs));
    let (rhs_impl_generics, _, _) = rhs_generics.split_for_impl();

    let mut rhs_predicates = predicates.clone();
    rhs_predicates.push(parse_quote!(__SutoppuRhs: ::core::convert::Into<#spec_ty>));

    Ok(quote! {
        #item_impl

        impl #impl_generics ::core::convert::From<#self_ty> for #spec_ty
        where
            #(#predicates,)*
        {
            fn from(rule: #self_ty) -> Self {
                ::sutoppu::Specification::new(rule)
            }
        }

        impl #rhs_impl_generics ::core::ops::BitAnd<__SutoppuRhs> for #self_ty
        where
            #(#rhs_predicates,)*
        {
            type Output = #spec_ty;

            fn bitand(self, rhs: __SutoppuRhs) -> Self::Output {
                ::sutoppu::Specification::new(self).and(rhs)
            }
        }

        impl #rhs_impl_generics ::core::ops::BitOr<__SutoppuRhs> for #self_ty
        where
            #(#rhs_predicates,)*
        {
            type Output = #spec_ty;

            fn bitor(self, rhs: __SutoppuRhs) -> Self::Output {
                ::sutoppu::Specification::new(self).or(rhs)
            }
        }

        impl #impl_generics ::core::ops::Not for #self_ty
        where
            #(#predicates,)*
        {
            type Output = #spec_ty;

            fn not(self) -> Self::Output {
                ::sutoppu::Specification::new(self).negate()
            }
        }
    })
}
