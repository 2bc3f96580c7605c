//! Lifecycle hooks for deferred calls.
//!
//! Hooks are user callbacks invoked when a [`DeferredCall`](crate::DeferredCall)
//! changes state. They receive the call itself, so they can read its
//! identifier, name, state and cached value.
//!
//! # Design Principles
//!
//! - Hooks execute in registration order
//! - Hooks run after the state change is visible and outside the call's lock
//! - A transition with no registered hook is a no-op
//!
//! # Architecture
//!
//! - **Schedule markers** ([`schedule`]): empty types that identify transitions
//! - **API** ([`api`]): registration and invocation mechanism
//!
//! # Example
//!
//! ```
//! use deferred_call::DeferredCall;
//! use deferred_call::hooks::CallHooks;
//! use deferred_call::hooks::schedule::{OnEval, OnModifiedNoEval};
//! use std::sync::Arc;
//!
//! let mut hooks = CallHooks::<u32>::new();
//! hooks
//!     .register_observer::<OnEval, _>("logger", |call: &DeferredCall<u32>| {
//!         tracing::info!(id = %call.id(), "evaluated");
//!     })?
//!     .register_observer::<OnModifiedNoEval, _>("skipped", |call: &DeferredCall<u32>| {
//!         tracing::info!(id = %call.id(), "overridden before evaluation");
//!     })?;
//!
//! let call = DeferredCall::builder(|| 42_u32).hooks(Arc::new(hooks)).build();
//! assert_eq!(*call.get(), 42);
//! # Ok::<(), deferred_call::hooks::HookRegistrationError>(())
//! ```

pub mod api;
pub mod schedule;

pub use api::{BoxedHook, CallHooks, HookRegistrationError};
pub use schedule::{IntoScheduleIds, Schedule, ScheduleId};
