//! Observability for deferred calls (Layer 3).
//!
//! - [`TracingConfig`] installs a global `tracing` subscriber
//! - [`register_transition_logger`] logs every state transition of the calls
//!   sharing a hook collection
//!
//! # Example
//!
//! ```
//! use deferred_call::{CallHooks, DeferredCall};
//! use deferred_tracing::{TracingConfig, TracingFormat, register_transition_logger};
//! use std::sync::Arc;
//! use tracing::Level;
//!
//! TracingConfig::new()
//!     .with_level(Level::DEBUG)
//!     .with_format(TracingFormat::Compact)
//!     .init();
//!
//! let mut hooks = CallHooks::<String>::new();
//! register_transition_logger(&mut hooks, "transitions")?;
//!
//! let greeting = DeferredCall::builder(|| "hello".to_string())
//!     .hooks(Arc::new(hooks))
//!     .build();
//! greeting.set_value("bonjour".to_string());
//! # Ok::<(), deferred_call::HookRegistrationError>(())
//! ```

/// Subscriber configuration.
pub mod config;

/// Transition-logging hooks.
pub mod hooks;

pub use config::{TracingConfig, TracingFormat};
pub use hooks::register_transition_logger;
