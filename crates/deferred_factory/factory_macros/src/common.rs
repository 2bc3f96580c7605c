//! Shared utilities for `#[deferred]` code generation.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{FnArg, GenericArgument, Ident, Pat, PathArguments, ReturnType, Signature, Type};

/// Validates that a function signature is suitable for `#[deferred]`.
///
/// Rejects async, unsafe, extern, generic and variadic functions as well as
/// methods.
pub(crate) fn validate_signature(sig: &Signature) -> Option<TokenStream> {
    if let Some(asyncness) = &sig.asyncness {
        return Some(
            syn::Error::new_spanned(asyncness, "#[deferred] cannot be applied to async functions")
                .to_compile_error(),
        );
    }

    if let Some(unsafety) = &sig.unsafety {
        return Some(
            syn::Error::new_spanned(unsafety, "#[deferred] cannot be applied to unsafe functions")
                .to_compile_error(),
        );
    }

    if let Some(abi) = &sig.abi {
        return Some(
            syn::Error::new_spanned(abi, "#[deferred] cannot be applied to extern functions")
                .to_compile_error(),
        );
    }

    if !sig.generics.params.is_empty() || sig.generics.where_clause.is_some() {
        return Some(
            syn::Error::new_spanned(
                &sig.generics,
                "#[deferred] does not support generic parameters",
            )
            .to_compile_error(),
        );
    }

    if let Some(variadic) = &sig.variadic {
        return Some(
            syn::Error::new_spanned(variadic, "#[deferred] does not support variadic functions")
                .to_compile_error(),
        );
    }

    if let Some(FnArg::Receiver(receiver)) = sig.inputs.first() {
        return Some(
            syn::Error::new_spanned(
                receiver,
                "#[deferred] functions cannot have a `self` receiver",
            )
            .to_compile_error(),
        );
    }

    None
}

/// A single function parameter bound into the deferred call's argument tuple.
#[derive(Debug, Clone)]
pub(crate) struct ParamInfo {
    /// Parameter name.
    pub ident: Ident,
    /// Parameter type.
    pub ty: Type,
}

/// Parses the parameters of a free function.
///
/// Only plain identifiers are accepted; `mut` is dropped since the generated
/// `call` method only forwards the value.
pub(crate) fn parse_params(sig: &Signature) -> Result<Vec<ParamInfo>, TokenStream> {
    sig.inputs
        .iter()
        .map(|arg| match arg {
            FnArg::Typed(pat_type) => match &*pat_type.pat {
                Pat::Ident(pat_ident)
                    if pat_ident.by_ref.is_none() && pat_ident.subpat.is_none() =>
                {
                    Ok(ParamInfo {
                        ident: pat_ident.ident.clone(),
                        ty: (*pat_type.ty).clone(),
                    })
                }
                other => Err(syn::Error::new_spanned(
                    other,
                    "#[deferred] parameters must be simple identifiers",
                )
                .to_compile_error()),
            },
            FnArg::Receiver(receiver) => Err(syn::Error::new_spanned(
                receiver,
                "#[deferred] functions cannot have a `self` receiver",
            )
            .to_compile_error()),
        })
        .collect()
}

/// Value and error types of a deferred function.
pub(crate) enum Output<'a> {
    /// Plain return type; `None` for `()`.
    Infallible(Option<&'a Type>),
    /// A `Result<T, E>` return type.
    Fallible { value: &'a Type, error: &'a Type },
}

/// Classifies a return type, detecting `Result<T, E>` syntactically.
///
/// Aliases such as `io::Result<T>` carry a single argument and are treated as
/// plain values.
pub(crate) fn classify_output(return_type: &ReturnType) -> Output<'_> {
    let ReturnType::Type(_, ty) = return_type else {
        return Output::Infallible(None);
    };

    if let Type::Path(type_path) = ty.as_ref()
        && type_path.qself.is_none()
        && let Some(segment) = type_path.path.segments.last()
        && segment.ident == "Result"
        && let PathArguments::AngleBracketed(args) = &segment.arguments
        && args.args.len() == 2
        && let GenericArgument::Type(value) = &args.args[0]
        && let GenericArgument::Type(error) = &args.args[1]
    {
        return Output::Fallible { value, error };
    }

    Output::Infallible(Some(ty))
}

/// Returns the value type tokens for an output, `()` when absent.
pub(crate) fn value_type(output: &Output<'_>) -> TokenStream {
    match output {
        Output::Infallible(Some(ty)) | Output::Fallible { value: ty, .. } => quote!(#ty),
        Output::Infallible(None) => quote!(()),
    }
}

/// Converts a `snake_case` string to `PascalCase`.
pub(crate) fn to_pascal_case(s: &str) -> String {
    s.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().to_string() + &chars.as_str().to_lowercase(),
            }
        })
        .collect()
}
