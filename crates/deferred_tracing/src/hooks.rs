//! Hooks that log deferred call transitions.

use deferred_call::hooks::schedule::{
    OnEval, OnInit, OnModifiedAfterEval, OnModifiedAfterMod, OnModifiedNoEval, Schedule,
    ScheduleId,
};
use deferred_call::{CallHooks, DeferredCall, HookRegistrationError};

/// Registers an observer on every transition schedule that logs the call at
/// `info` level.
///
/// Each event carries the transition, the call's display form and its new
/// state. The hook is stored once per schedule under `name`.
///
/// # Errors
///
/// Returns [`HookRegistrationError::DuplicateName`] if `name` is already used
/// on one of the schedules.
///
/// # Example
///
/// ```
/// use deferred_call::{CallHooks, DeferredCall};
/// use deferred_tracing::register_transition_logger;
/// use std::sync::Arc;
///
/// let mut hooks = CallHooks::<u8>::new();
/// register_transition_logger(&mut hooks, "transitions")?;
///
/// let call = DeferredCall::builder(|| 1).hooks(Arc::new(hooks)).build();
/// call.get();
/// # Ok::<(), deferred_call::HookRegistrationError>(())
/// ```
pub fn register_transition_logger<T: 'static, E: 'static>(
    hooks: &mut CallHooks<T, E>,
    name: &str,
) -> Result<(), HookRegistrationError> {
    log_on::<OnInit, T, E>(hooks, name)?;
    log_on::<OnEval, T, E>(hooks, name)?;
    log_on::<OnModifiedNoEval, T, E>(hooks, name)?;
    log_on::<OnModifiedAfterEval, T, E>(hooks, name)?;
    log_on::<OnModifiedAfterMod, T, E>(hooks, name)?;
    Ok(())
}

fn log_on<S: Schedule, T: 'static, E: 'static>(
    hooks: &mut CallHooks<T, E>,
    name: &str,
) -> Result<(), HookRegistrationError> {
    let transition = ScheduleId::of::<S>();
    hooks.register_observer::<S, _>(name, move |call: &DeferredCall<T, E>| {
        tracing::info!(%transition, %call, state = %call.state(), "deferred call transition");
    })?;
    Ok(())
}
