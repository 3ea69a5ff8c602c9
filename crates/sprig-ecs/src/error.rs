//! Error types for world operations.
//!
//! Every variant is a programming or configuration mistake. The panicking
//! entry points on [`World`](crate::World) turn these into panics; the
//! `try_*` variants hand them back to the caller instead.

use thiserror::Error;

use crate::entity::Entity;

/// Errors raised by the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    /// The component type already owns a slot in this world.
    #[error("component `{name}` is already registered")]
    AlreadyRegistered { name: &'static str },

    /// Every component slot is taken.
    #[error("cannot register `{name}`: all {max} component slots are in use")]
    ComponentLimit { name: &'static str, max: usize },

    /// The allocator ran past its configured ceiling.
    #[error("entity limit exceeded (max {max} entities)")]
    EntityLimit { max: u32 },

    /// `Entity::NULL` was passed to an operation.
    #[error("the null entity cannot be operated on")]
    NullEntity,

    /// The handle is out of range, deleted, or from an older generation.
    #[error("{0} is not alive")]
    DeadEntity(Entity),

    /// The entity does not hold the requested component.
    #[error("{entity} has no `{component}` component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    /// The component type has no slot and auto-registration is off.
    #[error("component `{0}` is not registered")]
    Unregistered(&'static str),

    /// The same component type was requested twice in one view.
    #[error("component `{0}` appears more than once in a view")]
    DuplicateViewComponent(&'static str),

    /// A [`WorldConfig`](crate::WorldConfig) failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for store operations.
pub type EcsResult<T> = Result<T, EcsError>;

/// Log a fatal error and panic with its message.
#[cold]
#[track_caller]
pub(crate) fn fatal(err: EcsError) -> ! {
    tracing::error!(error = %err, "fatal store misuse");
    panic!("{err}");
}

/// Unwraps a store result, routing the error through [`fatal`].
pub(crate) trait OrFatal<T> {
    fn or_fatal(self) -> T;
}

impl<T> OrFatal<T> for EcsResult<T> {
    #[track_caller]
    fn or_fatal(self) -> T {
        match self {
            Ok(value) => value,
            Err(err) => fatal(err),
        }
    }
}
