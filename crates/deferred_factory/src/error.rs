//! Error types for factories and registries.

use deferred_call::CallId;
use thiserror::Error;

/// Errors raised by [`LazyRegistry`](crate::LazyRegistry) bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The id generator produced an identifier that is already registered.
    #[error("call id '{0}' is already registered")]
    DuplicateId(CallId),

    /// No outstanding call has this identifier.
    #[error("no registered call with id '{0}'")]
    NotFound(CallId),
}

/// Errors raised while running deferred calls.
///
/// `E` is the error type of the wrapped function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError<E> {
    /// No outstanding call has this identifier.
    #[error("no registered call with id '{0}'")]
    NotFound(CallId),

    /// The call's operation failed. The call stays unevaluated.
    #[error("evaluation of call '{id}' failed: {error}")]
    Eval {
        /// Identifier of the failing call.
        id: CallId,
        /// Error returned by the wrapped function.
        error: E,
    },
}

impl<E> RunError<E> {
    /// Returns the identifier of the call this error refers to.
    #[must_use]
    pub fn id(&self) -> &CallId {
        match self {
            Self::NotFound(id) | Self::Eval { id, .. } => id,
        }
    }

    /// Returns the function's error, if evaluation failed.
    pub fn into_eval_error(self) -> Option<E> {
        match self {
            Self::NotFound(_) => None,
            Self::Eval { error, .. } => Some(error),
        }
    }
}
