//! The deferred call handle and its state machine.
//!
//! A [`DeferredCall`] records an operation without running it. The first read
//! runs the operation, caches the result and moves the call to
//! [`CallState::Evaluated`]; every later read returns the cached value. A value
//! can also be assigned directly, which moves the call to
//! [`CallState::Modified`] and, when no evaluation happened yet, guarantees the
//! operation never runs.
//!
//! | From | Trigger | To | Schedule |
//! |------|---------|----|----------|
//! | construction | build | `NotEvaluated` | [`OnInit`] |
//! | `NotEvaluated` | [`eval`](DeferredCall::eval) | `Evaluated` | [`OnEval`] |
//! | `NotEvaluated` | [`set_value`](DeferredCall::set_value) | `Modified` | [`OnModifiedNoEval`] |
//! | `Evaluated` | [`set_value`](DeferredCall::set_value) | `Modified` | [`OnModifiedAfterEval`] |
//! | `Modified` | [`set_value`](DeferredCall::set_value) | `Modified` | [`OnModifiedAfterMod`] |
//!
//! Reads from `Evaluated` or `Modified` fire nothing.

use core::convert::Infallible;
use core::fmt;
use core::mem;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::hooks::CallHooks;
use crate::hooks::schedule::{
    OnEval, OnInit, OnModifiedAfterEval, OnModifiedAfterMod, OnModifiedNoEval, ScheduleId,
};
use crate::id::CallId;

/// Boxed thunk: a function together with its bound arguments.
type Operation<T, E> = Box<dyn FnMut() -> Result<T, E> + Send>;

// ─────────────────────────────────────────────────────────────────────────────
// CallState
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle state of a [`DeferredCall`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallState {
    /// The operation has not run and no value was assigned.
    NotEvaluated,
    /// The operation ran once and its result is cached.
    Evaluated,
    /// A value was assigned with [`DeferredCall::set_value`].
    Modified,
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotEvaluated => "NotEvaluated",
            Self::Evaluated => "Evaluated",
            Self::Modified => "Modified",
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transition
// ─────────────────────────────────────────────────────────────────────────────

/// A state change that fires hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// The call was constructed.
    Init,
    /// First successful evaluation.
    Eval,
    /// Override of a call that never ran.
    ModifiedNoEval,
    /// Override of an evaluated call.
    ModifiedAfterEval,
    /// Override of an already overridden call.
    ModifiedAfterMod,
}

impl Transition {
    /// The transition caused by [`DeferredCall::set_value`] from `from`.
    #[must_use]
    pub fn on_override(from: CallState) -> Self {
        match from {
            CallState::NotEvaluated => Self::ModifiedNoEval,
            CallState::Evaluated => Self::ModifiedAfterEval,
            CallState::Modified => Self::ModifiedAfterMod,
        }
    }

    /// The schedule whose hooks run for this transition.
    #[must_use]
    pub fn schedule(self) -> ScheduleId {
        match self {
            Self::Init => ScheduleId::of::<OnInit>(),
            Self::Eval => ScheduleId::of::<OnEval>(),
            Self::ModifiedNoEval => ScheduleId::of::<OnModifiedNoEval>(),
            Self::ModifiedAfterEval => ScheduleId::of::<OnModifiedAfterEval>(),
            Self::ModifiedAfterMod => ScheduleId::of::<OnModifiedAfterMod>(),
        }
    }

    /// The state the call is in once this transition completed.
    #[must_use]
    pub fn target(self) -> CallState {
        match self {
            Self::Init => CallState::NotEvaluated,
            Self::Eval => CallState::Evaluated,
            Self::ModifiedNoEval | Self::ModifiedAfterEval | Self::ModifiedAfterMod => {
                CallState::Modified
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Slot
// ─────────────────────────────────────────────────────────────────────────────

/// Operation and result share one slot, so a pending call always owns its
/// operation and a settled call never does.
enum Slot<T, E> {
    Pending(Operation<T, E>),
    Evaluated(Arc<T>),
    Modified(Arc<T>),
}

impl<T, E> Slot<T, E> {
    fn state(&self) -> CallState {
        match self {
            Self::Pending(_) => CallState::NotEvaluated,
            Self::Evaluated(_) => CallState::Evaluated,
            Self::Modified(_) => CallState::Modified,
        }
    }

    fn cached(&self) -> Option<&Arc<T>> {
        match self {
            Self::Pending(_) => None,
            Self::Evaluated(value) | Self::Modified(value) => Some(value),
        }
    }
}

struct CallInner<T, E> {
    id: CallId,
    name: Arc<str>,
    hooks: Arc<CallHooks<T, E>>,
    slot: Mutex<Slot<T, E>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// DeferredCall
// ─────────────────────────────────────────────────────────────────────────────

/// A recorded function invocation, evaluated at most once on demand.
///
/// `DeferredCall` is a shared handle: clones refer to the same call, state and
/// cached value. Values are handed out as `Arc<T>`, so every read of a settled
/// call returns the same allocation.
///
/// # Example
///
/// ```
/// use deferred_call::{CallState, DeferredCall};
///
/// let call = DeferredCall::new(|| 6 * 7);
/// assert_eq!(call.state(), CallState::NotEvaluated);
///
/// assert_eq!(*call.get(), 42);
/// assert_eq!(call.state(), CallState::Evaluated);
///
/// call.set_value(0);
/// assert_eq!(*call.get(), 0);
/// assert_eq!(call.state(), CallState::Modified);
/// ```
pub struct DeferredCall<T, E = Infallible> {
    inner: Arc<CallInner<T, E>>,
}

impl<T, E> Clone for DeferredCall<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: 'static> DeferredCall<T, Infallible> {
    /// Records an infallible operation with default configuration.
    ///
    /// The call gets a unique nanoid, is named after the operation's type and
    /// has no hooks.
    #[must_use]
    pub fn new<F>(operation: F) -> Self
    where
        F: FnMut() -> T + Send + 'static,
    {
        Self::builder(operation).build()
    }

    /// Starts configuring a call around an infallible operation.
    pub fn builder<F>(mut operation: F) -> DeferredCallBuilder<T, Infallible>
    where
        F: FnMut() -> T + Send + 'static,
    {
        DeferredCallBuilder::from_operation(
            Box::new(move || Ok(operation())),
            function_name::<F>(),
        )
    }

    /// Returns the value, evaluating the operation if needed.
    ///
    /// Equivalent to [`eval`](Self::eval) for operations that cannot fail.
    pub fn get(&self) -> Arc<T> {
        match self.eval() {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

impl<T: 'static, E: 'static> DeferredCall<T, E> {
    /// Records a fallible operation with default configuration.
    #[must_use]
    pub fn fallible<F>(operation: F) -> Self
    where
        F: FnMut() -> Result<T, E> + Send + 'static,
    {
        Self::fallible_builder(operation).build()
    }

    /// Starts configuring a call around a fallible operation.
    pub fn fallible_builder<F>(operation: F) -> DeferredCallBuilder<T, E>
    where
        F: FnMut() -> Result<T, E> + Send + 'static,
    {
        DeferredCallBuilder::from_operation(Box::new(operation), function_name::<F>())
    }
}

impl<T, E> DeferredCall<T, E> {
    /// Returns the value, running the operation on the first read.
    ///
    /// From [`CallState::NotEvaluated`] the operation runs once, its result is
    /// cached, the operation is dropped and [`OnEval`] hooks fire. Any other
    /// state returns the cached value without side effects.
    ///
    /// # Errors
    ///
    /// Returns the operation's error unchanged. The call stays
    /// `NotEvaluated` and keeps its operation, so the next read retries.
    pub fn eval(&self) -> Result<Arc<T>, E> {
        let mut slot = self.inner.slot.lock();
        let operation = match &mut *slot {
            Slot::Evaluated(value) | Slot::Modified(value) => {
                tracing::trace!(id = %self.inner.id, "returning cached value");
                return Ok(Arc::clone(value));
            }
            Slot::Pending(operation) => operation,
        };

        let value = match operation() {
            Ok(value) => Arc::new(value),
            Err(error) => {
                drop(slot);
                tracing::warn!(id = %self.inner.id, name = %self.inner.name, "evaluation failed");
                return Err(error);
            }
        };

        let released = mem::replace(&mut *slot, Slot::Evaluated(Arc::clone(&value)));
        drop(slot);
        drop(released);

        tracing::debug!(id = %self.inner.id, name = %self.inner.name, "evaluated");
        self.fire(Transition::Eval);
        Ok(value)
    }

    /// Returns a clone of the value, running the operation on the first read.
    ///
    /// # Errors
    ///
    /// Same as [`eval`](Self::eval).
    pub fn value(&self) -> Result<T, E>
    where
        T: Clone,
    {
        self.eval().map(|value| T::clone(&value))
    }

    /// Assigns the value directly, never running the operation.
    ///
    /// A pending operation is dropped. Fires [`OnModifiedNoEval`],
    /// [`OnModifiedAfterEval`] or [`OnModifiedAfterMod`] depending on the
    /// previous state.
    pub fn set_value(&self, value: T) {
        let previous = mem::replace(&mut *self.inner.slot.lock(), Slot::Modified(Arc::new(value)));
        let transition = Transition::on_override(previous.state());
        drop(previous);

        tracing::debug!(
            id = %self.inner.id,
            name = %self.inner.name,
            schedule = %transition.schedule(),
            "value overridden"
        );
        self.fire(transition);
    }

    /// Returns the cached value without triggering evaluation.
    #[must_use]
    pub fn peek(&self) -> Option<Arc<T>> {
        self.inner.slot.lock().cached().cloned()
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> CallState {
        self.inner.slot.lock().state()
    }

    /// Returns `true` once a value is cached, by evaluation or override.
    #[must_use]
    pub fn is_evaluated(&self) -> bool {
        self.state() != CallState::NotEvaluated
    }

    /// Returns the identifier of this call.
    #[must_use]
    pub fn id(&self) -> &CallId {
        &self.inner.id
    }

    /// Returns the display name of this call.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns `true` if both handles refer to the same call.
    #[must_use]
    pub fn same_call(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn fire(&self, transition: Transition) {
        self.inner.hooks.invoke(transition.schedule(), self);
    }
}

impl<T, E> fmt::Display for DeferredCall<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<DeferredCall for {} @ {}, current state = {}>",
            self.inner.name,
            self.inner.id,
            self.state()
        )
    }
}

impl<T, E> fmt::Debug for DeferredCall<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredCall")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DeferredCallBuilder
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for a single [`DeferredCall`].
///
/// Created by [`DeferredCall::builder`] or [`DeferredCall::fallible_builder`].
pub struct DeferredCallBuilder<T, E = Infallible> {
    operation: Operation<T, E>,
    id: Option<CallId>,
    name: Arc<str>,
    hooks: Option<Arc<CallHooks<T, E>>>,
}

impl<T, E> DeferredCallBuilder<T, E> {
    /// Creates a builder around an already boxed operation.
    ///
    /// Factories use this to attach their shared hooks and generated ids.
    pub fn from_operation(
        operation: Box<dyn FnMut() -> Result<T, E> + Send>,
        name: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            operation,
            id: None,
            name: name.into(),
            hooks: None,
        }
    }

    /// Sets the identifier. Defaults to a generated nanoid.
    #[must_use]
    pub fn id(mut self, id: impl Into<CallId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the display name. Defaults to the operation's name.
    #[must_use]
    pub fn name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Attaches a shared hook collection.
    #[must_use]
    pub fn hooks(mut self, hooks: Arc<CallHooks<T, E>>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Creates the call and fires its [`OnInit`] hooks.
    pub fn build(self) -> DeferredCall<T, E> {
        let call = self.assemble();
        call.announce();
        call
    }

    /// Creates the call, passes it to `admit` and fires [`OnInit`] only if
    /// `admit` accepts it.
    ///
    /// A rejected call is dropped without any hook having seen it.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `admit`.
    pub fn try_build<X>(
        self,
        admit: impl FnOnce(&DeferredCall<T, E>) -> Result<(), X>,
    ) -> Result<DeferredCall<T, E>, X> {
        let call = self.assemble();
        admit(&call)?;
        call.announce();
        Ok(call)
    }

    fn assemble(self) -> DeferredCall<T, E> {
        DeferredCall {
            inner: Arc::new(CallInner {
                id: self.id.unwrap_or_else(CallId::generate),
                name: self.name,
                hooks: self.hooks.unwrap_or_default(),
                slot: Mutex::new(Slot::Pending(self.operation)),
            }),
        }
    }
}

impl<T, E> DeferredCall<T, E> {
    fn announce(&self) {
        tracing::debug!(id = %self.id(), name = %self.name(), "call recorded");
        self.fire(Transition::Init);
    }
}

impl<T, E> fmt::Debug for DeferredCallBuilder<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredCallBuilder")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Short name of a function type, used as the default call name.
///
/// Module paths and generic arguments are dropped. Closures keep the name of
/// their enclosing function, e.g. `main::{{closure}}`.
#[must_use]
pub fn function_name<F: ?Sized>() -> &'static str {
    let full = core::any::type_name::<F>();
    let path = full.split_once('<').map_or(full, |(head, _)| head);
    let mut owner = path;
    while let Some(stripped) = owner.strip_suffix("::{{closure}}") {
        owner = stripped;
    }
    let start = owner.rfind("::").map_or(0, |index| index + 2);
    match &path[start..] {
        // Qualified paths such as `<X as Trait>::f` have nothing before `<`.
        "" => full,
        name => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::schedule::AllTransitions;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: &Arc<AtomicUsize>, value: i32) -> DeferredCall<i32> {
        let counter = Arc::clone(counter);
        DeferredCall::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            value
        })
    }

    fn recording_hooks(log: &Arc<Mutex<Vec<String>>>) -> Arc<CallHooks<i32>> {
        let mut hooks = CallHooks::new();
        let log = Arc::clone(log);
        hooks
            .register_observer::<AllTransitions, _>("recorder", move |call: &DeferredCall<i32>| {
                log.lock().push(call.state().to_string());
            })
            .expect("fresh collection has no duplicates");
        Arc::new(hooks)
    }

    #[test]
    fn first_read_evaluates_and_caches() {
        let counter = Arc::new(AtomicUsize::new(0));
        let call = counting(&counter, 7);

        assert_eq!(call.state(), CallState::NotEvaluated);
        assert!(call.peek().is_none());

        let first = call.get();
        let second = call.get();

        assert_eq!(*first, 7);
        assert!(Arc::ptr_eq(&first, &second), "reads share one allocation");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(call.state(), CallState::Evaluated);
    }

    #[test]
    fn override_before_eval_never_runs_operation() {
        let counter = Arc::new(AtomicUsize::new(0));
        let call = counting(&counter, 7);

        call.set_value(99);

        assert_eq!(call.value(), Ok(99));
        assert_eq!(call.state(), CallState::Modified);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn override_after_eval_replaces_value() {
        let counter = Arc::new(AtomicUsize::new(0));
        let call = counting(&counter, 1);

        assert_eq!(*call.get(), 1);
        call.set_value(2);
        call.set_value(3);

        assert_eq!(*call.get(), 3);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn hooks_follow_transition_table() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let call = DeferredCall::builder(|| 5)
            .hooks(recording_hooks(&log))
            .build();

        call.get();
        call.get();
        call.set_value(6);
        call.set_value(7);

        assert_eq!(
            *log.lock(),
            vec!["NotEvaluated", "Evaluated", "Modified", "Modified"]
        );
    }

    #[test]
    fn each_override_fires_its_own_schedule() {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = CallHooks::<i32>::new();
        for schedule in ["no_eval", "after_eval", "after_mod"] {
            let fired = Arc::clone(&fired);
            let push = move |_: &DeferredCall<i32>| fired.lock().push(schedule);
            match schedule {
                "no_eval" => hooks.register_observer::<OnModifiedNoEval, _>(schedule, push),
                "after_eval" => hooks.register_observer::<OnModifiedAfterEval, _>(schedule, push),
                _ => hooks.register_observer::<OnModifiedAfterMod, _>(schedule, push),
            }
            .expect("unique names");
        }
        let hooks = Arc::new(hooks);

        let skipped = DeferredCall::builder(|| 0).hooks(Arc::clone(&hooks)).build();
        skipped.set_value(1);
        skipped.set_value(2);

        let evaluated = DeferredCall::builder(|| 0).hooks(hooks).build();
        evaluated.get();
        evaluated.set_value(1);

        assert_eq!(*fired.lock(), vec!["no_eval", "after_mod", "after_eval"]);
    }

    #[test]
    fn hook_sees_cached_value() {
        let seen = Arc::new(Mutex::new(None));
        let mut hooks = CallHooks::<i32>::new();
        let seen_clone = Arc::clone(&seen);
        hooks
            .register_observer::<OnEval, _>("peek", move |call: &DeferredCall<i32>| {
                *seen_clone.lock() = call.peek();
            })
            .unwrap();

        let call = DeferredCall::builder(|| 11).hooks(Arc::new(hooks)).build();
        let value = call.get();

        let seen = seen.lock().clone().expect("hook observed a value");
        assert!(Arc::ptr_eq(&seen, &value));
    }

    #[test]
    fn failed_evaluation_is_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let attempts_clone = Arc::clone(&attempts);
        let call = DeferredCall::fallible(move || {
            if attempts_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                Err("not yet")
            } else {
                Ok(3)
            }
        });

        assert_eq!(call.eval(), Err("not yet"));
        assert_eq!(call.state(), CallState::NotEvaluated);

        assert_eq!(call.eval().map(|value| *value), Ok(3));
        assert_eq!(call.state(), CallState::Evaluated);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn panic_leaves_call_pending() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let attempts_clone = Arc::clone(&attempts);
        let call = DeferredCall::new(move || {
            if attempts_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("first attempt fails");
            }
            4
        });

        let result = catch_unwind(AssertUnwindSafe(|| call.get()));
        assert!(result.is_err());
        assert_eq!(call.state(), CallState::NotEvaluated);

        assert_eq!(*call.get(), 4);
    }

    #[test]
    fn operation_is_dropped_once_settled() {
        let marker = Arc::new(());
        let captured = Arc::clone(&marker);
        let call = DeferredCall::new(move || Arc::strong_count(&captured));

        assert_eq!(Arc::strong_count(&marker), 2);
        call.get();
        assert_eq!(Arc::strong_count(&marker), 1);
    }

    #[test]
    fn clones_share_state() {
        let counter = Arc::new(AtomicUsize::new(0));
        let call = counting(&counter, 8);
        let other = call.clone();

        other.get();

        assert!(call.same_call(&other));
        assert!(call.is_evaluated());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(!call.same_call(&counting(&counter, 8)));
    }

    #[test]
    fn display_reflects_current_state() {
        let call = DeferredCall::builder(|| 1).id("c1").name("probe").build();
        assert_eq!(
            call.to_string(),
            "<DeferredCall for probe @ c1, current state = NotEvaluated>"
        );

        call.get();
        assert_eq!(
            call.to_string(),
            "<DeferredCall for probe @ c1, current state = Evaluated>"
        );
    }

    #[test]
    fn default_id_is_unique() {
        let a = DeferredCall::new(|| 1);
        let b = DeferredCall::new(|| 1);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn transition_mapping() {
        assert_eq!(
            Transition::on_override(CallState::NotEvaluated),
            Transition::ModifiedNoEval
        );
        assert_eq!(
            Transition::on_override(CallState::Modified).schedule(),
            ScheduleId::of::<OnModifiedAfterMod>()
        );
        assert_eq!(Transition::Eval.target(), CallState::Evaluated);
        assert_eq!(Transition::Init.target(), CallState::NotEvaluated);
    }

    fn double(x: i32) -> i32 {
        x * 2
    }

    #[test]
    fn function_name_strips_paths() {
        assert_eq!(function_name::<fn(i32) -> i32>(), "fn(i32) -> i32");
        let item = double;
        fn name_of<F>(_: &F) -> &'static str {
            function_name::<F>()
        }
        assert_eq!(name_of(&item), "double");
        assert_eq!(name_of(&|| 1), "function_name_strips_paths::{{closure}}");
    }

    #[test]
    fn function_name_keeps_qualified_paths() {
        fn name_of<F>(_: &F) -> &'static str {
            function_name::<F>()
        }
        let name = name_of(&<i32 as Clone>::clone);
        assert!(!name.is_empty());
        assert!(name.ends_with("clone"), "unexpected name {name}");
    }

    #[test]
    fn rejected_try_build_fires_no_hooks() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let result = DeferredCall::builder(|| 1)
            .hooks(recording_hooks(&log))
            .try_build(|_| Err("taken"));

        assert_eq!(result.map(|call| call.state()), Err("taken"));
        assert!(log.lock().is_empty());
    }

    #[test]
    fn admitted_try_build_fires_init_after_admission() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let admitted = Arc::new(Mutex::new(None));
        let seen = Arc::clone(&admitted);

        let call = DeferredCall::builder(|| 1)
            .id("c7")
            .hooks(recording_hooks(&log))
            .try_build(|call| {
                assert!(log.lock().is_empty(), "admission runs before OnInit");
                *seen.lock() = Some(call.id().clone());
                Ok::<(), ()>(())
            })
            .unwrap();

        assert_eq!(admitted.lock().as_ref(), Some(call.id()));
        assert_eq!(*log.lock(), vec!["NotEvaluated".to_string()]);
    }
}
