//! Deferred function calls: record a call now, evaluate it once on demand,
//! or override its result without running it.
//!
//! This crate bundles the layered `deferred_*` crates:
//!
//! - [`deferred_call`] - the call state machine, hooks and id generation
//! - [`deferred_factory`] - factories, registries and the `#[deferred]` macro
//! - [`deferred_tracing`] - subscriber setup and transition logging
//!
//! ```
//! use deferred::prelude::*;
//!
//! #[deferred]
//! fn divide(a: f64, b: f64) -> f64 {
//!     a / b
//! }
//!
//! let divide = divide();
//! let calls = [divide.call(5.0, 5.0), divide.call(5.0, 2.0)];
//! calls[1].set_value(0.0);
//!
//! let results = divide.run_all(&calls).expect("division cannot fail");
//! let values: Vec<f64> = results.values().map(|value| **value).collect();
//! assert_eq!(values, vec![1.0, 0.0]);
//! ```

pub use deferred_call;
pub use deferred_factory;
pub use deferred_tracing;

pub use deferred_call::{CallHooks, CallId, CallState, DeferredCall};
pub use deferred_factory::{LazyFactory, LazyRegistry, RegistryError, RunError, deferred};
pub use deferred_tracing::{TracingConfig, TracingFormat, register_transition_logger};

/// Re-export all common types for easy access.
pub mod prelude {
    pub use deferred_factory::prelude::*;
    pub use deferred_tracing::{TracingConfig, TracingFormat, register_transition_logger};
}
