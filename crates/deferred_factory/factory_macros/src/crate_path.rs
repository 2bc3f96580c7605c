//! Auto-detection of the `deferred_factory` path for generated code.
//!
//! When `#[deferred]` is used from a crate that depends on `deferred_factory`
//! directly, the generated code names it directly. When the consuming crate
//! depends on the `deferred` umbrella crate instead, it routes through
//! `deferred::deferred_factory`.

use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

const FACTORY_CRATE: &str = "deferred_factory";
const UMBRELLA_CRATE: &str = "deferred";

/// Returns the token path to `deferred_factory`.
///
/// Resolution order:
/// 1. Direct dependency (possibly renamed in `Cargo.toml`).
/// 2. Indirect access via the umbrella crate (`deferred::deferred_factory`).
/// 3. Fallback to the literal crate name, so the compile error points at the
///    missing dependency.
pub(crate) fn resolve_factory_path() -> TokenStream {
    match crate_name(FACTORY_CRATE) {
        // `deferred_factory` declares `extern crate self as deferred_factory`.
        Ok(FoundCrate::Itself) => {
            let ident = format_ident!("{}", FACTORY_CRATE);
            quote!(#ident)
        }
        Ok(FoundCrate::Name(found)) => {
            let ident = format_ident!("{}", found);
            quote!(#ident)
        }
        Err(_) => match crate_name(UMBRELLA_CRATE) {
            Ok(FoundCrate::Name(found)) => {
                let umbrella = format_ident!("{}", found);
                let ident = format_ident!("{}", FACTORY_CRATE);
                quote!(#umbrella::#ident)
            }
            Ok(FoundCrate::Itself) => {
                let ident = format_ident!("{}", FACTORY_CRATE);
                quote!(crate::#ident)
            }
            Err(_) => {
                let ident = format_ident!("{}", FACTORY_CRATE);
                quote!(#ident)
            }
        },
    }
}
