//! Id-keyed registry of outstanding deferred calls.
//!
//! A [`LazyRegistry`] wraps a [`LazyFactory`] and remembers every call it
//! produced, keyed by [`CallId`], until the call is evaluated (by default) or
//! explicitly deleted. Calls can then be run one by one or drained together.
//!
//! # Usage
//!
//! ```
//! use deferred_factory::LazyRegistry;
//!
//! let divide = LazyRegistry::new(|(a, b): (f64, f64)| a / b);
//!
//! let first = divide.call((5.0, 5.0))?;
//! divide.call((5.0, 2.0))?;
//!
//! assert_eq!(*divide.run(first.id()).expect("registered"), 1.0);
//! assert_eq!(divide.len(), 1, "evaluated calls leave the registry");
//!
//! let rest = divide.run_all().expect("infallible");
//! assert_eq!(rest.values().map(|v| **v).collect::<Vec<_>>(), vec![2.5]);
//! assert!(divide.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use core::convert::Infallible;
use core::fmt;
use std::sync::{Arc, Weak};

use deferred_call::hooks::schedule::OnEval;
use deferred_call::{CallHooks, CallId, CallKey, DeferredCall, HookRegistrationError, IdGenerator};
use indexmap::IndexMap;
use indexmap::map::Entry;
use parking_lot::Mutex;

use crate::error::{RegistryError, RunError};
use crate::factory::{LazyFactory, LazyFactoryBuilder};

/// Name of the `OnEval` hook that drops evaluated calls from the registry.
pub const REMOVE_ON_EVAL_HOOK: &str = "registry::remove_on_eval";

type CallMap<T, E> = Mutex<IndexMap<CallId, DeferredCall<T, E>>>;

// ─────────────────────────────────────────────────────────────────────────────
// LazyRegistry
// ─────────────────────────────────────────────────────────────────────────────

/// A [`LazyFactory`] that keeps its outstanding calls in an id-keyed map.
///
/// Entries are kept in insertion order. With `delete_after_eval` enabled (the
/// default) an entry is removed the moment its call is evaluated, whichever
/// handle triggered the evaluation, and whenever [`run`](Self::run) or
/// [`run_all`](Self::run_all) hands out its value. The latter also covers
/// calls that were overridden and therefore never evaluate.
pub struct LazyRegistry<A, T, E = Infallible> {
    factory: LazyFactory<A, T, E>,
    calls: Arc<CallMap<T, E>>,
    delete_after_eval: bool,
}

impl<A, T, E> fmt::Debug for LazyRegistry<A, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyRegistry")
            .field("factory", &self.factory)
            .field("ids", &self.ids())
            .field("delete_after_eval", &self.delete_after_eval)
            .finish()
    }
}

impl<A, T> LazyRegistry<A, T, Infallible>
where
    A: 'static,
    T: Send + Sync + 'static,
{
    /// Wraps an infallible function with default configuration.
    #[must_use]
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(A) -> T + Send + Sync + 'static,
    {
        Self::builder(function).build_fresh()
    }

    /// Starts configuring a registry around an infallible function.
    pub fn builder<F>(function: F) -> LazyRegistryBuilder<A, T, Infallible>
    where
        F: Fn(A) -> T + Send + Sync + 'static,
    {
        LazyRegistryBuilder::from_factory(LazyFactory::builder(function))
    }
}

impl<A, T, E> LazyRegistry<A, T, E>
where
    A: 'static,
    T: Send + Sync + 'static,
    E: 'static,
{
    /// Wraps a fallible function with default configuration.
    #[must_use]
    pub fn fallible<F>(function: F) -> Self
    where
        F: Fn(A) -> Result<T, E> + Send + Sync + 'static,
    {
        Self::fallible_builder(function).build_fresh()
    }

    /// Starts configuring a registry around a fallible function.
    pub fn fallible_builder<F>(function: F) -> LazyRegistryBuilder<A, T, E>
    where
        F: Fn(A) -> Result<T, E> + Send + Sync + 'static,
    {
        LazyRegistryBuilder::from_factory(LazyFactory::fallible_builder(function))
    }

    /// Records an invocation and registers it under its new identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateId`] if the id generator produced an
    /// identifier that is still registered. The existing entry is kept and the
    /// rejected call never reaches the `OnInit` hooks.
    pub fn call(&self, args: A) -> Result<DeferredCall<T, E>, RegistryError>
    where
        A: Clone + Send,
    {
        self.factory.prepare(args).try_build(|call| {
            match self.calls.lock().entry(call.id().clone()) {
                Entry::Occupied(entry) => Err(RegistryError::DuplicateId(entry.key().clone())),
                Entry::Vacant(entry) => {
                    entry.insert(call.clone());
                    Ok(())
                }
            }
        })
    }
}

impl<A, T, E> LazyRegistry<A, T, E> {
    /// Evaluates the registered call identified by `key`.
    ///
    /// # Errors
    ///
    /// - [`RunError::NotFound`] if no call with this id is registered. With
    ///   `delete_after_eval` this includes calls that were already run.
    /// - [`RunError::Eval`] if the wrapped function fails; the call stays
    ///   registered and unevaluated.
    pub fn run<K: CallKey + ?Sized>(&self, key: &K) -> Result<Arc<T>, RunError<E>> {
        let id = key.call_id();
        let call = self
            .get(id)
            .ok_or_else(|| RunError::NotFound(id.clone()))?;
        let value = call.eval().map_err(|error| RunError::Eval {
            id: id.clone(),
            error,
        })?;
        self.release(id);
        Ok(value)
    }

    /// Evaluates every outstanding call at most once.
    ///
    /// The set of entries is captured before anything runs, so removals
    /// triggered by evaluation never skip an entry. Results are keyed by id in
    /// registration order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing call with [`RunError::Eval`]. Calls run
    /// before it stay evaluated (and, with deletion, leave the registry).
    pub fn run_all(&self) -> Result<IndexMap<CallId, Arc<T>>, RunError<E>> {
        let snapshot: Vec<DeferredCall<T, E>> = self.calls.lock().values().cloned().collect();
        tracing::debug!(name = %self.factory.name(), count = snapshot.len(), "running all calls");

        let mut results = IndexMap::with_capacity(snapshot.len());
        for call in &snapshot {
            let value = call.eval().map_err(|error| RunError::Eval {
                id: call.id().clone(),
                error,
            })?;
            self.release(call.id());
            results.insert(call.id().clone(), value);
        }
        Ok(results)
    }

    /// Removes a call from the registry without evaluating it.
    ///
    /// Returns `Ok(true)` if the entry was removed and `Ok(false)` if deletion
    /// is disabled for this registry, in which case nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if deletion is enabled and no call
    /// with this id is registered.
    pub fn del_id<K: CallKey + ?Sized>(&self, key: &K) -> Result<bool, RegistryError> {
        let id = key.call_id();
        if !self.delete_after_eval {
            tracing::debug!(%id, "deletion disabled, keeping call");
            return Ok(false);
        }
        match self.calls.lock().shift_remove(id) {
            Some(_) => {
                tracing::debug!(%id, "call deleted");
                Ok(true)
            }
            None => Err(RegistryError::NotFound(id.clone())),
        }
    }

    /// Returns a handle to the registered call with this id.
    #[must_use]
    pub fn get<K: CallKey + ?Sized>(&self, key: &K) -> Option<DeferredCall<T, E>> {
        self.calls.lock().get(key.call_id()).cloned()
    }

    /// Returns whether a call with this id is registered.
    #[must_use]
    pub fn contains<K: CallKey + ?Sized>(&self, key: &K) -> bool {
        self.calls.lock().contains_key(key.call_id())
    }

    /// Returns the identifiers of all registered calls, in registration order.
    #[must_use]
    pub fn ids(&self) -> Vec<CallId> {
        self.calls.lock().keys().cloned().collect()
    }

    /// Returns the number of registered calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns `true` if no call is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    /// Returns whether evaluated calls are removed automatically.
    #[must_use]
    pub fn deletes_after_eval(&self) -> bool {
        self.delete_after_eval
    }

    /// Drops a settled entry when deletion is enabled.
    ///
    /// Freshly evaluated calls are already gone through the `OnEval` hook;
    /// this catches overridden ones.
    fn release(&self, id: &CallId) {
        if self.delete_after_eval && self.calls.lock().shift_remove(id).is_some() {
            tracing::debug!(%id, "settled call removed from registry");
        }
    }

    /// Returns the underlying factory.
    ///
    /// Calls created directly through it are not registered.
    #[must_use]
    pub fn factory(&self) -> &LazyFactory<A, T, E> {
        &self.factory
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LazyRegistryBuilder
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for a [`LazyRegistry`].
pub struct LazyRegistryBuilder<A, T, E = Infallible> {
    factory: LazyFactoryBuilder<A, T, E>,
    delete_after_eval: bool,
}

impl<A, T, E> LazyRegistryBuilder<A, T, E> {
    fn from_factory(factory: LazyFactoryBuilder<A, T, E>) -> Self {
        Self {
            factory,
            delete_after_eval: true,
        }
    }

    /// Sets whether evaluated calls leave the registry. Defaults to `true`.
    ///
    /// Also controls whether [`LazyRegistry::del_id`] removes anything.
    #[must_use]
    pub fn delete_after_eval(mut self, delete: bool) -> Self {
        self.delete_after_eval = delete;
        self
    }

    /// Sets the name given to produced calls.
    #[must_use]
    pub fn name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.factory = self.factory.name(name);
        self
    }

    /// Replaces the hook collection.
    #[must_use]
    pub fn hooks(mut self, hooks: CallHooks<T, E>) -> Self {
        self.factory = self.factory.hooks(hooks);
        self
    }

    /// Returns the hook collection for in-place registration.
    pub fn hooks_mut(&mut self) -> &mut CallHooks<T, E> {
        self.factory.hooks_mut()
    }

    /// Sets the id generator.
    #[must_use]
    pub fn id_generator(mut self, generator: impl IdGenerator) -> Self {
        self.factory = self.factory.id_generator(generator);
        self
    }
}

impl<A, T, E> LazyRegistryBuilder<A, T, E>
where
    T: Send + Sync + 'static,
    E: 'static,
{
    /// Creates the registry.
    ///
    /// With deletion enabled, an `OnEval` hook named
    /// [`REMOVE_ON_EVAL_HOOK`] is appended after the user's hooks, so those
    /// still find the call registered.
    ///
    /// # Errors
    ///
    /// Returns [`HookRegistrationError::DuplicateName`] if the user already
    /// registered an `OnEval` hook under [`REMOVE_ON_EVAL_HOOK`].
    pub fn build(mut self) -> Result<LazyRegistry<A, T, E>, HookRegistrationError> {
        let calls: Arc<CallMap<T, E>> = Arc::default();

        if self.delete_after_eval {
            let registry = Arc::downgrade(&calls);
            self.factory
                .hooks_mut()
                .register_observer::<OnEval, _>(REMOVE_ON_EVAL_HOOK, move |call| {
                    remove_evaluated(&registry, call);
                })?;
        }

        Ok(LazyRegistry {
            factory: self.factory.build(),
            calls,
            delete_after_eval: self.delete_after_eval,
        })
    }

    /// Builds from an untouched hook collection, which cannot already hold
    /// [`REMOVE_ON_EVAL_HOOK`].
    fn build_fresh(self) -> LazyRegistry<A, T, E> {
        self.build().unwrap_or_else(|error| {
            unreachable!("empty hook collection rejected the removal hook: {error}")
        })
    }
}

impl<A, T, E> fmt::Debug for LazyRegistryBuilder<A, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyRegistryBuilder")
            .field("factory", &self.factory)
            .field("delete_after_eval", &self.delete_after_eval)
            .finish()
    }
}

fn remove_evaluated<T, E>(registry: &Weak<CallMap<T, E>>, call: &DeferredCall<T, E>) {
    // Calls may outlive their registry.
    let Some(calls) = registry.upgrade() else {
        return;
    };
    if calls.lock().shift_remove(call.id()).is_some() {
        tracing::debug!(id = %call.id(), "evaluated call removed from registry");
    }
}
