//! Schedule markers for deferred call state transitions.
//!
//! Each marker identifies one edge of the call lifecycle. Use them with
//! [`ScheduleId::of::<T>()`] for low-level registration, or with the type-safe
//! [`register_observer::<OnEval, _>`](super::CallHooks::register_observer).
//!
//! | Marker | Transition |
//! |--------|------------|
//! | [`OnInit`] | construction → `NotEvaluated` |
//! | [`OnEval`] | `NotEvaluated` → `Evaluated` |
//! | [`OnModifiedNoEval`] | `NotEvaluated` → `Modified` |
//! | [`OnModifiedAfterEval`] | `Evaluated` → `Modified` |
//! | [`OnModifiedAfterMod`] | `Modified` → `Modified` |

use core::any::TypeId;
use core::fmt;
use variadics_please::all_tuples;

// ─────────────────────────────────────────────────────────────────────────────
// ScheduleId
// ─────────────────────────────────────────────────────────────────────────────

/// Identifier for a hook schedule, derived from a marker type.
///
/// A `ScheduleId` wraps a `TypeId` so that any `'static` type can serve as a
/// schedule marker.
///
/// # Example
///
/// ```
/// use deferred_call::hooks::schedule::{OnEval, ScheduleId};
///
/// let schedule = ScheduleId::of::<OnEval>();
/// assert_eq!(schedule.to_string(), "OnEval");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleId {
    type_id: TypeId,
    type_name: &'static str,
}

impl ScheduleId {
    /// Creates a `ScheduleId` for the given schedule marker type.
    #[must_use]
    pub fn of<S: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<S>(),
            type_name: core::any::type_name::<S>(),
        }
    }

    /// Returns the underlying `TypeId`.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the full type name for debugging.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the marker name without its module path.
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        self.type_name
            .rsplit("::")
            .next()
            .unwrap_or(self.type_name)
    }
}

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Schedule Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Marker trait for schedule types.
///
/// The trait carries no methods; it exists so that [`IntoScheduleIds`] can
/// accept schedule types by trait bound.
pub trait Schedule: 'static {}

// ─────────────────────────────────────────────────────────────────────────────
// IntoScheduleIds Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for types that can be converted into a list of schedule IDs.
///
/// Implemented for single schedules and tuples of schedules, so one hook can
/// be registered on several transitions at once.
pub trait IntoScheduleIds {
    /// Returns the schedule IDs for this type.
    fn schedule_ids() -> Vec<ScheduleId>;
}

impl<S: Schedule> IntoScheduleIds for S {
    fn schedule_ids() -> Vec<ScheduleId> {
        vec![ScheduleId::of::<S>()]
    }
}

macro_rules! impl_into_schedule_ids_for_tuple {
    ($($S:ident),*) => {
        impl<$($S: Schedule),*> IntoScheduleIds for ($($S,)*) {
            fn schedule_ids() -> Vec<ScheduleId> {
                vec![$(ScheduleId::of::<$S>()),*]
            }
        }
    };
}

// There are five transitions; larger tuples would only repeat markers.
all_tuples!(impl_into_schedule_ids_for_tuple, 2, 5, S);

// ─────────────────────────────────────────────────────────────────────────────
// Transition Schedules
// ─────────────────────────────────────────────────────────────────────────────

/// Marker type for hooks called right after a call is constructed.
///
/// The call is in `NotEvaluated` state when these hooks run.
pub struct OnInit;
impl Schedule for OnInit {}

/// Marker type for hooks called after the first successful evaluation.
///
/// Fires exactly once per call, and never for calls whose value was
/// overridden before being read. The result is already cached when hooks run.
pub struct OnEval;
impl Schedule for OnEval {}

/// Marker type for hooks called when a value is assigned before any
/// evaluation took place.
///
/// The operation has been dropped without running.
pub struct OnModifiedNoEval;
impl Schedule for OnModifiedNoEval {}

/// Marker type for hooks called when an evaluated call is overridden.
pub struct OnModifiedAfterEval;
impl Schedule for OnModifiedAfterEval {}

/// Marker type for hooks called when an already overridden call is
/// overridden again.
pub struct OnModifiedAfterMod;
impl Schedule for OnModifiedAfterMod {}

/// All five transition schedules, for hooks that observe every transition.
pub type AllTransitions = (
    OnInit,
    OnEval,
    OnModifiedNoEval,
    OnModifiedAfterEval,
    OnModifiedAfterMod,
);
