//! Derive macro for error types.
//!
//! Generates `std::fmt::Display` and `std::error::Error` implementations from
//! `#[error("...")]` attributes.
//!
//! # Usage
//!
//! ```ignore
//! use regvm_derive::Error;
//!
//! #[derive(Debug, Error)]
//! pub enum ExecError {
//!     #[error("Unknown instruction \"{0}\"")]
//!     UnknownInstruction(String),
//!
//!     #[error("{instruction} expects {expected} operands")]
//!     ArityMismatch { instruction: String, expected: usize, actual: usize },
//!
//!     #[error("stack underflow")]
//!     StackUnderflow,
//! }
//! ```
//!
//! Only the fields a message actually mentions are bound, so a variant may
//! carry data that its message leaves out (`actual` above).

use proc_macro::TokenStream;
use proc_macro2::Ident;
use quote::{ToTokens, format_ident, quote};
use std::collections::HashSet;
use syn::{Data, DeriveInput, Fields, Lit, Meta, parse_macro_input};

pub fn derive_error(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_error_derive(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_error_derive(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let display_body = match &input.data {
        Data::Enum(data_enum) => {
            let arms = data_enum
                .variants
                .iter()
                .map(|variant| {
                    let message = message_from_attrs(
                        &variant.attrs,
                        &variant.ident,
                        &format!("variant `{}`", variant.ident),
                    )?;
                    Ok(display_arm(&variant.ident, &variant.fields, &message))
                })
                .collect::<syn::Result<Vec<_>>>()?;

            quote! {
                match self {
                    #(#arms)*
                }
            }
        }
        Data::Struct(data_struct) => {
            let message = message_from_attrs(
                &input.attrs,
                &input.ident,
                &format!("type `{}`", input.ident),
            )?;
            struct_display(&data_struct.fields, &message)
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "Error derive does not support unions",
            ));
        }
    };

    Ok(quote! {
        impl #impl_generics ::std::fmt::Display for #name #ty_generics #where_clause {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                #display_body
            }
        }

        impl #impl_generics ::std::error::Error for #name #ty_generics #where_clause {}
    })
}

/// Builds one `match` arm of the enum `Display` impl.
fn display_arm(variant: &Ident, fields: &Fields, message: &str) -> proc_macro2::TokenStream {
    match fields {
        Fields::Unit => quote! {
            Self::#variant => write!(f, #message),
        },
        Fields::Unnamed(unnamed) => {
            let format_str = positional_to_named(message, unnamed.unnamed.len());
            let used = referenced_args(&format_str);
            let bindings: Vec<_> = (0..unnamed.unnamed.len())
                .map(|i| {
                    let ident = format_ident!("f{}", i);
                    if used.contains(&ident.to_string()) {
                        quote! { #ident }
                    } else {
                        quote! { _ }
                    }
                })
                .collect();
            let args: Vec<_> = (0..unnamed.unnamed.len())
                .map(|i| format_ident!("f{}", i))
                .filter(|ident| used.contains(&ident.to_string()))
                .collect();
            quote! {
                Self::#variant(#(#bindings),*) => write!(f, #format_str, #(#args = #args),*),
            }
        }
        Fields::Named(named) => {
            let used = referenced_args(message);
            let args: Vec<_> = named
                .named
                .iter()
                .filter_map(|field| field.ident.as_ref())
                .filter(|ident| used.contains(&ident.to_string()))
                .collect();
            quote! {
                Self::#variant { #(#args,)* .. } => write!(f, #message, #(#args = #args),*),
            }
        }
    }
}

fn struct_display(fields: &Fields, message: &str) -> proc_macro2::TokenStream {
    match fields {
        Fields::Unit => quote! { write!(f, #message) },
        Fields::Named(named) => {
            let used = referenced_args(message);
            let args: Vec<_> = named
                .named
                .iter()
                .filter_map(|field| field.ident.as_ref())
                .filter(|ident| used.contains(&ident.to_string()))
                .collect();
            quote! { write!(f, #message, #(#args = self.#args),*) }
        }
        Fields::Unnamed(unnamed) => {
            let format_str = positional_to_named(message, unnamed.unnamed.len());
            let used = referenced_args(&format_str);
            let (idents, indices): (Vec<_>, Vec<_>) = (0..unnamed.unnamed.len())
                .map(|i| (format_ident!("f{}", i), syn::Index::from(i)))
                .filter(|(ident, _)| used.contains(&ident.to_string()))
                .unzip();
            quote! { write!(f, #format_str, #(#idents = self.#indices),*) }
        }
    }
}

/// Extracts the message from an `#[error("...")]` attribute.
fn message_from_attrs<T: ToTokens>(
    attrs: &[syn::Attribute],
    target: &T,
    target_desc: &str,
) -> syn::Result<String> {
    let Some(attr) = attrs.iter().find(|attr| attr.path().is_ident("error")) else {
        return Err(syn::Error::new_spanned(
            target,
            format!("missing #[error(\"...\")] attribute on {target_desc}"),
        ));
    };

    let Meta::List(meta_list) = &attr.meta else {
        return Err(syn::Error::new_spanned(
            &attr.meta,
            "invalid #[error] attribute; use #[error(\"message\")]",
        ));
    };

    match syn::parse2::<Lit>(meta_list.tokens.clone()) {
        Ok(Lit::Str(lit_str)) => Ok(lit_str.value()),
        _ => Err(syn::Error::new_spanned(
            &attr.meta,
            "#[error] message must be a string literal, e.g. #[error(\"bad operand: {0}\")]",
        )),
    }
}

/// Rewrites `{0}`, `{1:?}` into `{f0}`, `{f1:?}` so tuple fields can be passed by name.
fn positional_to_named(format_str: &str, field_count: usize) -> String {
    let mut result = format_str.to_string();
    for i in (0..field_count).rev() {
        result = result
            .replace(&format!("{{{i}}}"), &format!("{{f{i}}}"))
            .replace(&format!("{{{i}:"), &format!("{{f{i}:"));
    }
    result
}

/// Names of the arguments referenced by `{name}` / `{name:spec}` placeholders.
fn referenced_args(format_str: &str) -> HashSet<String> {
    let mut names = HashSet::new();
    let mut chars = format_str.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '{' {
            continue;
        }
        if chars.peek() == Some(&'{') {
            chars.next();
            continue;
        }
        let mut name = String::new();
        while let Some(&next) = chars.peek() {
            if next == '}' || next == ':' {
                break;
            }
            name.push(next);
            chars.next();
        }
        if !name.is_empty() {
            names.insert(name);
        }
    }

    names
}
