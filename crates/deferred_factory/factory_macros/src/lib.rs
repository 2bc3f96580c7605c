//! Procedural macros for deferred factories.
//!
//! Provides `#[deferred]`, which turns a plain function into a factory of
//! deferred calls.

mod common;
mod crate_path;
mod deferred_fn;

use proc_macro::TokenStream;

/// Turns a function into a factory of deferred calls.
///
/// The function name becomes a constructor returning a `<Name>Deferred`
/// factory. Its `call` method takes the original parameters and returns a
/// `DeferredCall` without running the body. The factory dereferences to a
/// `LazyFactory`, so `run` and `run_all` are available directly.
///
/// A return type written as `Result<T, E>` produces a fallible factory whose
/// calls yield `T` and propagate `E`. Parameters must be simple identifiers
/// whose types are `Clone + Send + 'static`.
///
/// # Example
///
/// ```
/// use deferred_factory::deferred;
///
/// #[deferred]
/// fn divide(a: f64, b: f64) -> f64 {
///     a / b
/// }
///
/// let divide = divide();
/// let call = divide.call(5.0, 2.0);
/// assert_eq!(*call.get(), 2.5);
/// ```
///
/// Hooks and id generation are configured through `with_config`:
///
/// ```
/// use deferred_factory::deferred;
/// use deferred_factory::prelude::*;
///
/// #[deferred]
/// fn square(x: u64) -> u64 {
///     x * x
/// }
///
/// let square = SquareDeferred::with_config(|builder| {
///     builder.id_generator(SequentialIds::starting_at(100))
/// });
/// assert_eq!(square.call(3).id().as_str(), "100");
/// ```
#[proc_macro_attribute]
pub fn deferred(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        let attr = proc_macro2::TokenStream::from(attr);
        return syn::Error::new_spanned(attr, "#[deferred] does not take arguments")
            .to_compile_error()
            .into();
    }
    let input = syn::parse_macro_input!(item as syn::ItemFn);
    deferred_fn::generate_deferred_fn(&input).into()
}
