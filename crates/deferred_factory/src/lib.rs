//! Factories and registries of deferred calls (Layer 2).
//!
//! This crate wraps plain functions so that invoking them records a
//! [`DeferredCall`] instead of running them. Two flavours are provided:
//!
//! - [`LazyFactory`] returns the call handle itself; nothing else is kept.
//! - [`LazyRegistry`] also keeps outstanding calls in an id-keyed map, so
//!   they can be run by id, drained with [`run_all`](LazyRegistry::run_all)
//!   or deleted.
//!
//! The [`deferred`] attribute macro generates a typed factory from a function
//! definition.
//!
//! # Quick Start
//!
//! ```
//! use deferred_factory::prelude::*;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let evaluations = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&evaluations);
//!
//! let mut builder = LazyRegistry::builder(|(a, b): (f64, f64)| a / b).delete_after_eval(false);
//! builder
//!     .hooks_mut()
//!     .register_observer::<OnEval, _>("count", move |_: &DeferredCall<f64>| {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!     })?;
//! let divide = builder.build()?;
//!
//! divide.call((5.0, 5.0))?;
//! divide.call((5.0, 2.0))?;
//! divide.call((3.0, 4.0))?;
//!
//! let results = divide.run_all().expect("division cannot fail");
//! let values: Vec<f64> = results.values().map(|value| **value).collect();
//! assert_eq!(values, vec![1.0, 2.5, 0.75]);
//! assert_eq!(evaluations.load(Ordering::SeqCst), 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! - [`LazyFactory`] / [`LazyFactoryBuilder`] - function plus frozen hooks and id generator
//! - [`LazyRegistry`] / [`LazyRegistryBuilder`] - factory plus outstanding-call map
//! - [`RegistryError`] / [`RunError`] - bookkeeping and evaluation failures

// Self-reference to ensure `#[deferred]` macro-generated code can use `deferred_factory::` paths within this crate.
extern crate self as deferred_factory;

pub mod error;
pub mod factory;
pub mod registry;

// Re-export core types at crate root.
pub use deferred_call::hooks;
pub use deferred_call::{
    CallHooks, CallId, CallKey, CallState, DeferredCall, HookRegistrationError, IdGenerator,
    NanoIds, SequentialIds, ids_from_fn,
};
pub use error::{RegistryError, RunError};
pub use factory::{LazyFactory, LazyFactoryBuilder};
pub use registry::{LazyRegistry, LazyRegistryBuilder};

// Re-export proc macros.
pub use factory_macros::deferred;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::deferred;
    pub use crate::error::{RegistryError, RunError};
    pub use crate::factory::{LazyFactory, LazyFactoryBuilder};
    pub use crate::registry::{LazyRegistry, LazyRegistryBuilder};
    pub use deferred_call::prelude::*;
}
