//! Identifiers for deferred calls.
//!
//! A [`CallId`] is external bookkeeping: registries key their entries by it and
//! hooks use it to correlate events. It never participates in equality or
//! deduplication of calls themselves.
//!
//! Identifiers come from one of three places:
//!
//! - supplied by the caller ([`DeferredCallBuilder::id`](crate::DeferredCallBuilder::id)),
//! - produced by an [`IdGenerator`] owned by a factory,
//! - or generated as a unique [`nanoid`] token when nothing else is configured.

use core::borrow::Borrow;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::call::DeferredCall;

// ─────────────────────────────────────────────────────────────────────────────
// CallId
// ─────────────────────────────────────────────────────────────────────────────

/// Identifier of a deferred call.
///
/// Internally uses `Arc<str>` for cheap cloning (reference count bump only).
/// Numeric identifiers are stored in their decimal form, so `CallId::from(5_u64)`
/// and `CallId::from("5")` are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallId(Arc<str>);

impl CallId {
    /// Creates an identifier from a specific string value.
    #[must_use]
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Creates a new identifier with a unique nanoid.
    ///
    /// Nanoids need no coordination between factories, so calls created by
    /// unrelated code never collide.
    #[must_use]
    pub fn generate() -> Self {
        Self(nanoid::nanoid!().into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CallId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CallId {
    fn from(id: &str) -> Self {
        Self(id.into())
    }
}

impl From<String> for CallId {
    fn from(id: String) -> Self {
        Self(id.into())
    }
}

impl From<Arc<str>> for CallId {
    fn from(id: Arc<str>) -> Self {
        Self(id)
    }
}

macro_rules! impl_from_integer {
    ($($int:ty),*) => {
        $(
            impl From<$int> for CallId {
                fn from(id: $int) -> Self {
                    Self(id.to_string().into())
                }
            }
        )*
    };
}

impl_from_integer!(u32, u64, usize, i32, i64);

// ─────────────────────────────────────────────────────────────────────────────
// CallKey
// ─────────────────────────────────────────────────────────────────────────────

/// Anything that resolves to a [`CallId`]: the identifier itself or a handle.
///
/// Registry operations accept either form, so callers may keep whichever they
/// were given.
pub trait CallKey {
    /// Returns the identifier this key refers to.
    fn call_id(&self) -> &CallId;
}

impl CallKey for CallId {
    fn call_id(&self) -> &CallId {
        self
    }
}

impl<T, E> CallKey for DeferredCall<T, E> {
    fn call_id(&self) -> &CallId {
        self.id()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Id generators
// ─────────────────────────────────────────────────────────────────────────────

/// Source of fresh identifiers, invoked once per created call.
pub trait IdGenerator: Send + Sync + 'static {
    /// Produces the identifier for the next call.
    fn next_id(&self) -> CallId;
}

/// Monotonically increasing counter starting at 1.
///
/// This is the default generator of every factory; each factory owns its own
/// counter, so identifiers are unique per factory.
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    /// Creates a counter whose first identifier is `1`.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates a counter whose first identifier is `first`.
    #[must_use]
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> CallId {
        CallId::from(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// Generates a unique nanoid per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct NanoIds;

impl IdGenerator for NanoIds {
    fn next_id(&self) -> CallId {
        CallId::generate()
    }
}

/// Generator backed by a caller-supplied closure.
///
/// Created with [`ids_from_fn`].
pub struct FnIds<F>(F);

impl<F> fmt::Debug for FnIds<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnIds").finish_non_exhaustive()
    }
}

impl<F, I> IdGenerator for FnIds<F>
where
    F: Fn() -> I + Send + Sync + 'static,
    I: Into<CallId>,
{
    fn next_id(&self) -> CallId {
        (self.0)().into()
    }
}

/// Wraps a zero-argument closure as an [`IdGenerator`].
///
/// # Example
///
/// ```
/// use deferred_call::{IdGenerator, ids_from_fn};
///
/// let ids = ids_from_fn(|| "fixed");
/// assert_eq!(ids.next_id().as_str(), "fixed");
/// ```
#[must_use]
pub fn ids_from_fn<F, I>(generate: F) -> FnIds<F>
where
    F: Fn() -> I + Send + Sync + 'static,
    I: Into<CallId>,
{
    FnIds(generate)
}
