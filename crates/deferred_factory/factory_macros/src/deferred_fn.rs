//! Code generation for `#[deferred]` on free functions.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ItemFn;

use crate::common::{
    Output, classify_output, parse_params, to_pascal_case, validate_signature, value_type,
};
use crate::crate_path::resolve_factory_path;

/// Generates a deferred factory for a `#[deferred]` function.
///
/// The macro consumes the original function and generates:
/// - A private `__deferred_impl_<name>` function with the original body
/// - A `<Name>Deferred` struct wrapping a `LazyFactory`
/// - A constructor `fn <name>() -> <Name>Deferred`
pub(crate) fn generate_deferred_fn(input: &ItemFn) -> TokenStream {
    if let Some(err) = validate_signature(&input.sig) {
        return err;
    }
    let params = match parse_params(&input.sig) {
        Ok(params) => params,
        Err(err) => return err,
    };

    let df = resolve_factory_path();

    let fn_name = &input.sig.ident;
    let fn_name_str = fn_name.to_string();
    let struct_name = format_ident!("{}Deferred", to_pascal_case(&fn_name_str));
    let impl_fn_name = format_ident!("__deferred_impl_{}", fn_name);

    let idents: Vec<_> = params.iter().map(|param| &param.ident).collect();
    let types: Vec<_> = params.iter().map(|param| &param.ty).collect();
    let args_ty = quote! { (#(#types,)*) };
    let args_pat = quote! { (#(#idents,)*) };

    let output = classify_output(&input.sig.output);
    let value_ty = value_type(&output);
    let (factory_ty, builder_ty, builder_fn) = match &output {
        Output::Infallible(_) => (
            quote! { #df::LazyFactory<#args_ty, #value_ty> },
            quote! { #df::LazyFactoryBuilder<#args_ty, #value_ty> },
            quote! { builder },
        ),
        Output::Fallible { error, .. } => (
            quote! { #df::LazyFactory<#args_ty, #value_ty, #error> },
            quote! { #df::LazyFactoryBuilder<#args_ty, #value_ty, #error> },
            quote! { fallible_builder },
        ),
    };
    let call_ty = match &output {
        Output::Infallible(_) => quote! { #df::DeferredCall<#value_ty> },
        Output::Fallible { error, .. } => quote! { #df::DeferredCall<#value_ty, #error> },
    };

    let vis = &input.vis;
    let attrs = &input.attrs;
    let sig_inputs = &input.sig.inputs;
    let sig_output = &input.sig.output;
    let block = &input.block;
    let struct_doc = format!("Deferred factory for [`{}`].", fn_name_str);
    let call_doc = format!(
        "Records a call to `{}` without running it.",
        fn_name_str
    );

    quote! {
        fn #impl_fn_name(#sig_inputs) #sig_output #block

        #[doc = #struct_doc]
        #[derive(Clone, Debug)]
        #vis struct #struct_name {
            factory: #factory_ty,
        }

        impl #struct_name {
            /// Creates the factory after applying `configure` to its builder.
            #[must_use]
            #vis fn with_config(
                configure: impl FnOnce(#builder_ty) -> #builder_ty,
            ) -> Self {
                let builder = #df::LazyFactory::#builder_fn(
                    |#args_pat: #args_ty| #impl_fn_name(#(#idents),*),
                )
                .name(#fn_name_str);
                Self {
                    factory: configure(builder).build(),
                }
            }

            #[doc = #call_doc]
            #vis fn call(&self, #(#idents: #types),*) -> #call_ty {
                self.factory.call((#(#idents,)*))
            }
        }

        impl ::core::ops::Deref for #struct_name {
            type Target = #factory_ty;

            fn deref(&self) -> &Self::Target {
                &self.factory
            }
        }

        #(#attrs)*
        #[must_use]
        #vis fn #fn_name() -> #struct_name {
            #struct_name::with_config(|builder| builder)
        }
    }
}
