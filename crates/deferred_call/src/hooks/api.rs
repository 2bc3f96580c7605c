//! Hook registration API for deferred calls.
//!
//! A [`CallHooks`] collection holds ordered hook lists keyed by transition
//! schedule. It is built once, frozen behind an `Arc`, and shared by every
//! call a factory produces.
//!
//! # Multi-Schedule Registration
//!
//! Register one hook on several schedules using tuple syntax:
//!
//! ```
//! use deferred_call::hooks::CallHooks;
//! use deferred_call::hooks::schedule::{OnModifiedAfterEval, OnModifiedAfterMod, OnModifiedNoEval};
//! use deferred_call::DeferredCall;
//!
//! let mut hooks = CallHooks::<i32>::new();
//! hooks
//!     .register_observer::<(OnModifiedNoEval, OnModifiedAfterEval, OnModifiedAfterMod), _>(
//!         "audit",
//!         |call: &DeferredCall<i32>| {
//!             tracing::info!(id = %call.id(), "value overridden");
//!         },
//!     )
//!     .expect("names are unique");
//! ```

use core::convert::Infallible;
use core::fmt;
use std::sync::Arc;

use hashbrown::HashMap;

use super::schedule::{IntoScheduleIds, ScheduleId};
use crate::call::DeferredCall;

// ─────────────────────────────────────────────────────────────────────────────
// BoxedHook
// ─────────────────────────────────────────────────────────────────────────────

/// Type-erased hook that receives the transitioning call.
///
/// Most users should use [`CallHooks::register_observer`] instead of creating
/// `BoxedHook` directly.
pub struct BoxedHook<T, E = Infallible> {
    handler: Box<dyn Fn(&DeferredCall<T, E>) + Send + Sync>,
}

impl<T, E> BoxedHook<T, E> {
    /// Instantiates a new `BoxedHook` with the given handler.
    #[must_use]
    pub fn new(handler: impl Fn(&DeferredCall<T, E>) + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
        }
    }

    /// Invokes the hook with the given call.
    pub fn invoke(&self, call: &DeferredCall<T, E>) {
        (self.handler)(call);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HookRegistrationError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during hook registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HookRegistrationError {
    /// A hook with this name already exists on the schedule.
    #[error("hook '{name}' already registered for schedule '{schedule}'")]
    DuplicateName {
        /// The schedule where the duplicate was found.
        schedule: ScheduleId,
        /// The duplicate hook name.
        name: String,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// HookEntry
// ─────────────────────────────────────────────────────────────────────────────

/// Entry in the hook collection, containing metadata and the hook function.
struct HookEntry<T, E> {
    /// Human-readable name for debugging and logging.
    name: String,
    hook: BoxedHook<T, E>,
}

// ─────────────────────────────────────────────────────────────────────────────
// CallHooks
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered hook lists for the transitions of [`DeferredCall`]s.
///
/// Registration takes `&mut self`; once the collection is handed to a factory
/// or call it is wrapped in an `Arc` and can no longer change. Hooks execute
/// in registration order. A schedule without hooks is a no-op.
pub struct CallHooks<T, E = Infallible> {
    /// Maps schedule ID to a list of hook entries.
    hooks: HashMap<ScheduleId, Vec<HookEntry<T, E>>>,
}

impl<T, E> Default for CallHooks<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for CallHooks<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (schedule, entries) in &self.hooks {
            let names: Vec<&str> = entries.iter().map(|entry| entry.name.as_str()).collect();
            map.entry(&schedule.short_name(), &names);
        }
        map.finish()
    }
}

impl<T, E> CallHooks<T, E> {
    /// Creates an empty hook collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hooks: HashMap::new(),
        }
    }

    /// Registers a pre-built [`BoxedHook`] for the given schedule.
    ///
    /// This is the lower-level registration method used by
    /// [`register_observer`](Self::register_observer).
    ///
    /// # Errors
    ///
    /// Returns [`HookRegistrationError::DuplicateName`] if a hook with the same
    /// name is already registered on `schedule`.
    pub fn register_boxed(
        &mut self,
        schedule: ScheduleId,
        name: impl Into<String>,
        hook: BoxedHook<T, E>,
    ) -> Result<(), HookRegistrationError> {
        let name = name.into();
        let entries = self.hooks.entry(schedule).or_default();

        if entries.iter().any(|entry| entry.name == name) {
            return Err(HookRegistrationError::DuplicateName { schedule, name });
        }

        entries.push(HookEntry { name, hook });
        Ok(())
    }

    /// Invokes all hooks registered for the given schedule, in registration
    /// order.
    pub fn invoke(&self, schedule: ScheduleId, call: &DeferredCall<T, E>) {
        if let Some(entries) = self.hooks.get(&schedule) {
            for entry in entries {
                tracing::trace!(%schedule, hook = %entry.name, id = %call.id(), "invoking hook");
                entry.hook.invoke(call);
            }
        }
    }

    /// Returns the number of hooks registered for the given schedule.
    #[must_use]
    pub fn hook_count(&self, schedule: ScheduleId) -> usize {
        self.hooks.get(&schedule).map_or(0, Vec::len)
    }

    /// Checks if a hook with the given name exists on the schedule.
    #[must_use]
    pub fn contains_hook(&self, schedule: ScheduleId, name: &str) -> bool {
        self.hooks
            .get(&schedule)
            .is_some_and(|entries| entries.iter().any(|entry| entry.name == name))
    }

    /// Returns `true` if no hook is registered on any schedule.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.values().all(Vec::is_empty)
    }
}

impl<T: 'static, E: 'static> CallHooks<T, E> {
    /// Registers an observer hook for one or more schedules.
    ///
    /// When registered on several schedules, the hook is stored once per
    /// schedule under the name `name@Schedule`.
    ///
    /// # Errors
    ///
    /// Returns [`HookRegistrationError::DuplicateName`] if the name is already
    /// taken on any of the schedules. Schedules processed before the conflict
    /// keep their registration.
    ///
    /// # Example
    ///
    /// ```
    /// use deferred_call::hooks::CallHooks;
    /// use deferred_call::hooks::schedule::OnEval;
    /// use deferred_call::DeferredCall;
    ///
    /// let mut hooks = CallHooks::<f64>::new();
    /// hooks
    ///     .register_observer::<OnEval, _>("logger", |call: &DeferredCall<f64>| {
    ///         tracing::info!("{call}");
    ///     })?
    ///     .register_observer::<OnEval, _>("second", |_: &DeferredCall<f64>| {})?;
    /// # Ok::<(), deferred_call::hooks::HookRegistrationError>(())
    /// ```
    pub fn register_observer<S, F>(
        &mut self,
        name: impl Into<String>,
        hook: F,
    ) -> Result<&mut Self, HookRegistrationError>
    where
        S: IntoScheduleIds,
        F: Fn(&DeferredCall<T, E>) + Send + Sync + 'static,
    {
        let schedules = S::schedule_ids();
        let name = name.into();
        // Arc is used internally to allow multiple schedules to access the same hook
        let hook = Arc::new(hook);

        for schedule in &schedules {
            let hook_name = if schedules.len() > 1 {
                format!("{}@{}", name, schedule)
            } else {
                name.clone()
            };
            let hook_clone = Arc::clone(&hook);

            self.register_boxed(
                *schedule,
                hook_name,
                BoxedHook::new(move |call: &DeferredCall<T, E>| hook_clone(call)),
            )?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::schedule::{OnEval, OnInit, OnModifiedNoEval};
    use crate::id::CallId;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn probe() -> DeferredCall<i32> {
        DeferredCall::builder(|| 1).id("probe").build()
    }

    #[test]
    fn register_increments_count() {
        let mut hooks = CallHooks::<i32>::new();
        let schedule = ScheduleId::of::<OnEval>();

        hooks
            .register_observer::<OnEval, _>("test_hook", |_: &DeferredCall<i32>| {})
            .expect("registration should succeed");
        assert_eq!(hooks.hook_count(schedule), 1);

        hooks
            .register_observer::<OnEval, _>("another_hook", |_: &DeferredCall<i32>| {})
            .expect("registration should succeed");
        assert_eq!(hooks.hook_count(schedule), 2);
    }

    #[test]
    fn invoke_calls_hooks_each_time() {
        let mut hooks = CallHooks::<i32>::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);

        hooks
            .register_observer::<OnEval, _>("counting_hook", move |_: &DeferredCall<i32>| {
                counter_clone.fetch_add(1, Ordering::SeqCst);
            })
            .expect("registration should succeed");

        let call = probe();
        hooks.invoke(ScheduleId::of::<OnEval>(), &call);
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        hooks.invoke(ScheduleId::of::<OnEval>(), &call);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn invoke_calls_all_hooks_in_order() {
        let mut hooks = CallHooks::<i32>::new();
        let execution_order = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let order_clone = Arc::clone(&execution_order);
            hooks
                .register_observer::<OnEval, _>(name, move |_: &DeferredCall<i32>| {
                    order_clone.lock().unwrap().push(name);
                })
                .expect("registration should succeed");
        }

        hooks.invoke(ScheduleId::of::<OnEval>(), &probe());

        let order = execution_order.lock().unwrap();
        assert_eq!(
            *order,
            vec!["first", "second", "third"],
            "hooks should execute in registration order"
        );
    }

    #[test]
    fn invoke_unknown_schedule_is_noop() {
        let hooks = CallHooks::<i32>::new();
        hooks.invoke(ScheduleId::of::<OnInit>(), &probe());
        assert!(hooks.is_empty());
    }

    #[test]
    fn hook_receives_the_call() {
        let mut hooks = CallHooks::<i32>::new();
        let seen = Arc::new(Mutex::new(None));
        let seen_clone = Arc::clone(&seen);

        hooks
            .register_observer::<OnInit, _>("capture", move |call: &DeferredCall<i32>| {
                *seen_clone.lock().unwrap() = Some(call.id().clone());
            })
            .unwrap();

        hooks.invoke(ScheduleId::of::<OnInit>(), &probe());
        assert_eq!(seen.lock().unwrap().as_ref().map(CallId::as_str), Some("probe"));
    }

    #[test]
    fn register_boxed_rejects_duplicate_names() {
        let mut hooks = CallHooks::<i32>::new();
        let schedule = ScheduleId::of::<OnEval>();

        hooks
            .register_boxed(schedule, "my_hook", BoxedHook::new(|_| {}))
            .expect("first registration should succeed");

        let result = hooks.register_boxed(schedule, "my_hook", BoxedHook::new(|_| {}));

        assert_eq!(
            result,
            Err(HookRegistrationError::DuplicateName {
                schedule,
                name: "my_hook".to_string(),
            })
        );
    }

    #[test]
    fn duplicate_name_error_message() {
        let err = HookRegistrationError::DuplicateName {
            schedule: ScheduleId::of::<OnEval>(),
            name: "logger".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "hook 'logger' already registered for schedule 'OnEval'"
        );
    }

    #[test]
    fn same_name_different_schedules_allowed() {
        let mut hooks = CallHooks::<i32>::new();

        hooks
            .register_observer::<OnInit, _>("logger", |_: &DeferredCall<i32>| {})
            .expect("first registration should succeed");
        hooks
            .register_observer::<OnEval, _>("logger", |_: &DeferredCall<i32>| {})
            .expect("same name on different schedule should succeed");

        assert_eq!(hooks.hook_count(ScheduleId::of::<OnInit>()), 1);
        assert_eq!(hooks.hook_count(ScheduleId::of::<OnEval>()), 1);
    }

    #[test]
    fn register_observer_chaining() {
        let mut hooks = CallHooks::<i32>::new();

        hooks
            .register_observer::<OnEval, _>("first", |_: &DeferredCall<i32>| {})
            .unwrap()
            .register_observer::<OnEval, _>("second", |_: &DeferredCall<i32>| {})
            .unwrap();

        assert_eq!(hooks.hook_count(ScheduleId::of::<OnEval>()), 2);
    }

    #[test]
    fn contains_hook() {
        let mut hooks = CallHooks::<i32>::new();
        let schedule = ScheduleId::of::<OnEval>();

        assert!(!hooks.contains_hook(schedule, "my_hook"));

        hooks
            .register_observer::<OnEval, _>("my_hook", |_: &DeferredCall<i32>| {})
            .unwrap();

        assert!(hooks.contains_hook(schedule, "my_hook"));
        assert!(!hooks.contains_hook(schedule, "other_hook"));
    }

    #[test]
    fn register_observer_multiple_schedules() {
        let mut hooks = CallHooks::<i32>::new();

        hooks
            .register_observer::<(OnEval, OnModifiedNoEval), _>(
                "tracker",
                |_: &DeferredCall<i32>| {},
            )
            .unwrap();

        assert!(hooks.contains_hook(ScheduleId::of::<OnEval>(), "tracker@OnEval"));
        assert!(hooks.contains_hook(
            ScheduleId::of::<OnModifiedNoEval>(),
            "tracker@OnModifiedNoEval"
        ));
        assert!(!hooks.contains_hook(ScheduleId::of::<OnInit>(), "tracker@OnInit"));
    }
}
