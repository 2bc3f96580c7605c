//! Factories turning plain functions into producers of deferred calls.
//!
//! A [`LazyFactory`] wraps a function once, together with a frozen hook
//! configuration and an id generator. Each [`call`](LazyFactory::call) binds
//! arguments and returns a fresh [`DeferredCall`] handle; nothing runs until
//! the handle is read.
//!
//! # Usage
//!
//! ```
//! use deferred_factory::LazyFactory;
//!
//! let divide = LazyFactory::new(|(a, b): (f64, f64)| a / b);
//!
//! let half = divide.call((5.0, 2.0));
//! let third = divide.call((1.0, 3.0));
//!
//! let results = divide.run_all([&half, &third]).expect("infallible");
//! assert_eq!(*results[half.id()], 2.5);
//! ```

use core::convert::Infallible;
use core::fmt;
use std::sync::Arc;

use deferred_call::{
    CallHooks, CallId, DeferredCall, DeferredCallBuilder, IdGenerator, SequentialIds,
    function_name,
};
use indexmap::IndexMap;

use crate::error::RunError;

/// Shared function pointer with uniform fallible signature.
type SharedFn<A, T, E> = Arc<dyn Fn(A) -> Result<T, E> + Send + Sync>;

// ─────────────────────────────────────────────────────────────────────────────
// LazyFactory
// ─────────────────────────────────────────────────────────────────────────────

/// Producer of [`DeferredCall`]s for one wrapped function.
///
/// `A` is the argument type (usually a tuple). Arguments are cloned for each
/// evaluation attempt, so a failed evaluation can be retried.
///
/// Cloning a factory is cheap; clones share the function, hooks and id
/// generator.
pub struct LazyFactory<A, T, E = Infallible> {
    function: SharedFn<A, T, E>,
    name: Arc<str>,
    hooks: Arc<CallHooks<T, E>>,
    id_generator: Arc<dyn IdGenerator>,
}

impl<A, T, E> Clone for LazyFactory<A, T, E> {
    fn clone(&self) -> Self {
        Self {
            function: Arc::clone(&self.function),
            name: Arc::clone(&self.name),
            hooks: Arc::clone(&self.hooks),
            id_generator: Arc::clone(&self.id_generator),
        }
    }
}

impl<A, T, E> fmt::Debug for LazyFactory<A, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyFactory")
            .field("name", &self.name)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

impl<A: 'static, T: 'static> LazyFactory<A, T, Infallible> {
    /// Wraps an infallible function with default configuration.
    #[must_use]
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(A) -> T + Send + Sync + 'static,
    {
        Self::builder(function).build()
    }

    /// Starts configuring a factory around an infallible function.
    pub fn builder<F>(function: F) -> LazyFactoryBuilder<A, T, Infallible>
    where
        F: Fn(A) -> T + Send + Sync + 'static,
    {
        LazyFactoryBuilder::from_shared(
            Arc::new(move |args: A| -> Result<T, Infallible> { Ok(function(args)) }),
            function_name::<F>(),
        )
    }
}

impl<A: 'static, T: 'static, E: 'static> LazyFactory<A, T, E> {
    /// Wraps a fallible function with default configuration.
    #[must_use]
    pub fn fallible<F>(function: F) -> Self
    where
        F: Fn(A) -> Result<T, E> + Send + Sync + 'static,
    {
        Self::fallible_builder(function).build()
    }

    /// Starts configuring a factory around a fallible function.
    pub fn fallible_builder<F>(function: F) -> LazyFactoryBuilder<A, T, E>
    where
        F: Fn(A) -> Result<T, E> + Send + Sync + 'static,
    {
        LazyFactoryBuilder::from_shared(Arc::new(function), function_name::<F>())
    }

    /// Records an invocation with `args` without running the function.
    ///
    /// Every call gets a fresh identifier from the factory's generator and
    /// fires the factory's `OnInit` hooks. Identical arguments still produce
    /// distinct calls.
    pub fn call(&self, args: A) -> DeferredCall<T, E>
    where
        A: Clone + Send,
    {
        self.prepare(args).build()
    }

    /// Binds `args` and assigns the next id, leaving `OnInit` to the caller.
    pub(crate) fn prepare(&self, args: A) -> DeferredCallBuilder<T, E>
    where
        A: Clone + Send,
    {
        let function = Arc::clone(&self.function);
        DeferredCallBuilder::from_operation(
            Box::new(move || function(args.clone())),
            Arc::clone(&self.name),
        )
        .id(self.id_generator.next_id())
        .hooks(Arc::clone(&self.hooks))
    }
}

impl<A, T, E> LazyFactory<A, T, E> {
    /// Evaluates a call, returning its cached value on later runs.
    ///
    /// # Errors
    ///
    /// Returns the wrapped function's error; the call stays unevaluated.
    pub fn run(&self, call: &DeferredCall<T, E>) -> Result<Arc<T>, E> {
        call.eval()
    }

    /// Evaluates every given call at most once.
    ///
    /// Results are keyed by call id in iteration order. Calls that are already
    /// settled contribute their cached value.
    ///
    /// # Errors
    ///
    /// Stops at the first failing call. Calls evaluated before it stay
    /// evaluated.
    pub fn run_all<'a, I>(&self, calls: I) -> Result<IndexMap<CallId, Arc<T>>, RunError<E>>
    where
        I: IntoIterator<Item = &'a DeferredCall<T, E>>,
        T: 'a,
        E: 'a,
    {
        let mut results = IndexMap::new();
        for call in calls {
            let value = call.eval().map_err(|error| RunError::Eval {
                id: call.id().clone(),
                error,
            })?;
            results.insert(call.id().clone(), value);
        }
        Ok(results)
    }

    /// Returns the name given to produced calls.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the hooks shared by produced calls.
    #[must_use]
    pub fn hooks(&self) -> &CallHooks<T, E> {
        &self.hooks
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LazyFactoryBuilder
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for a [`LazyFactory`].
///
/// Hooks are mutable only here; [`build`](Self::build) freezes them.
pub struct LazyFactoryBuilder<A, T, E = Infallible> {
    function: SharedFn<A, T, E>,
    name: Arc<str>,
    hooks: CallHooks<T, E>,
    id_generator: Arc<dyn IdGenerator>,
}

impl<A, T, E> LazyFactoryBuilder<A, T, E> {
    fn from_shared(function: SharedFn<A, T, E>, name: &str) -> Self {
        Self {
            function,
            name: name.into(),
            hooks: CallHooks::new(),
            id_generator: Arc::new(SequentialIds::new()),
        }
    }

    /// Sets the name given to produced calls.
    #[must_use]
    pub fn name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Replaces the hook collection.
    #[must_use]
    pub fn hooks(mut self, hooks: CallHooks<T, E>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Returns the hook collection for in-place registration.
    pub fn hooks_mut(&mut self) -> &mut CallHooks<T, E> {
        &mut self.hooks
    }

    /// Sets the id generator. Defaults to [`SequentialIds`] starting at 1.
    #[must_use]
    pub fn id_generator(mut self, generator: impl IdGenerator) -> Self {
        self.id_generator = Arc::new(generator);
        self
    }

    /// Freezes the configuration into a factory.
    pub fn build(self) -> LazyFactory<A, T, E> {
        tracing::debug!(name = %self.name, hooks = ?self.hooks, "factory built");
        LazyFactory {
            function: self.function,
            name: self.name,
            hooks: Arc::new(self.hooks),
            id_generator: self.id_generator,
        }
    }
}

impl<A, T, E> fmt::Debug for LazyFactoryBuilder<A, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyFactoryBuilder")
            .field("name", &self.name)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}
