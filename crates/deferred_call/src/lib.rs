//! Deferred call primitives for `deferred` (Layer 1).
//!
//! `deferred_call` provides the handle every other crate builds on: a recorded
//! function invocation that runs at most once, caches its result, and can be
//! overridden without running at all.
//!
//! # Core Concepts
//!
//! - [`DeferredCall`] - Shared handle around one recorded invocation
//! - [`CallState`] - `NotEvaluated`, `Evaluated` or `Modified`
//! - [`CallHooks`] - Ordered hook lists fired on state transitions
//! - [`CallId`] - Identifier used for external bookkeeping
//! - [`IdGenerator`] - Pluggable source of identifiers
//!
//! # Example
//!
//! ```
//! use deferred_call::prelude::*;
//! use std::sync::Arc;
//!
//! let mut hooks = CallHooks::<f64>::new();
//! hooks.register_observer::<OnEval, _>("report", |call: &DeferredCall<f64>| {
//!     tracing::info!(%call, "evaluated");
//! })?;
//!
//! let call = DeferredCall::builder(|| 5.0 / 2.0)
//!     .id("divide-1")
//!     .hooks(Arc::new(hooks))
//!     .build();
//!
//! assert_eq!(*call.get(), 2.5);
//! assert_eq!(call.state(), CallState::Evaluated);
//! # Ok::<(), HookRegistrationError>(())
//! ```
//!
//! # Architecture
//!
//! - **Layer 1** (`deferred_call`): call state machine and hooks (this crate)
//! - **Layer 2** (`deferred_factory`): factories, registries and `#[deferred]`
//! - **Layer 3** (`deferred_tracing`): subscriber setup and transition logging

/// The deferred call handle and its state machine.
pub mod call;

/// Lifecycle hooks fired on state transitions.
pub mod hooks;

/// Call identifiers and id generators.
pub mod id;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::call::{CallState, DeferredCall, DeferredCallBuilder, Transition};
    pub use crate::hooks::schedule::{
        AllTransitions, OnEval, OnInit, OnModifiedAfterEval, OnModifiedAfterMod,
        OnModifiedNoEval,
    };
    pub use crate::hooks::{BoxedHook, CallHooks, HookRegistrationError, ScheduleId};
    pub use crate::id::{CallId, CallKey, IdGenerator, NanoIds, SequentialIds, ids_from_fn};
}

// Re-export key types at crate root for convenience
pub use call::{CallState, DeferredCall, DeferredCallBuilder, Transition, function_name};
pub use hooks::{CallHooks, HookRegistrationError};
pub use id::{CallId, CallKey, FnIds, IdGenerator, NanoIds, SequentialIds, ids_from_fn};
