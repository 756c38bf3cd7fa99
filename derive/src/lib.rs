//! Macros for pathway

#![forbid(unsafe_code)]
#![deny(unreachable_pub)]
#![warn(missing_docs)]

mod utils;

use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse::Parser, punctuated::Punctuated, Error, Ident, ItemFn, Result, Token};

/// Wrap an asynchronous function as an `Endpoint`.
///
/// The function takes either no arguments or a single `Context`, and returns
/// any type that implements `IntoResponse`.
#[proc_macro_attribute]
pub fn handler(
    args: proc_macro::TokenStream,
    input: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    match generate_handler(args.into(), input.into()) {
        Ok(stream) => stream.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

fn parse_internal(args: TokenStream) -> Result<bool> {
    let idents = Punctuated::<Ident, Token![,]>::parse_terminated.parse2(args)?;
    let mut internal = false;
    for ident in idents {
        if ident == "internal" {
            internal = true;
        } else {
            return Err(Error::new_spanned(ident, "unknown argument"));
        }
    }
    Ok(internal)
}

fn generate_handler(args: TokenStream, input: TokenStream) -> Result<TokenStream> {
    let crate_name = utils::get_crate_name(parse_internal(args)?);
    let item_fn = syn::parse2::<ItemFn>(input)?;
    let vis = &item_fn.vis;
    let ident = &item_fn.sig.ident;

    if item_fn.sig.asyncness.is_none() {
        return Err(Error::new_spanned(&item_fn, "must be asynchronous"));
    }

    let invoke = match item_fn.sig.inputs.len() {
        0 => quote! {
            let _ = ctx;
            #ident().await
        },
        1 => quote! { #ident(ctx).await },
        _ => {
            return Err(Error::new_spanned(
                &item_fn.sig.inputs,
                "a handler takes at most one argument, the request context",
            ))
        }
    };

    let expanded = quote! {
        #[allow(non_camel_case_types)]
        #vis struct #ident;

        #[#crate_name::async_trait]
        impl #crate_name::Endpoint for #ident {
            async fn call(&self, ctx: #crate_name::Context) -> #crate_name::Response {
                #item_fn
                #crate_name::IntoResponse::into_response({ #invoke })
            }
        }
    };

    Ok(expanded)
}
