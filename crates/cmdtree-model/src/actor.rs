//! Actors and access gates
//!
//! The engine does not know what an actor or a permission is. Hosts implement
//! [`Actor`] and the engine only asks the questions below.

use std::fmt;
use std::sync::Arc;

/// The caller invoking a command.
pub trait Actor {
    /// Display name, used in logs only
    fn name(&self) -> &str;

    /// Host-supplied capability check for a gate token
    fn has_permission(&self, permission: &str) -> bool;

    /// Whether this actor belongs to the distinguished subtype that a node's
    /// privileged executor is written for.
    fn is_privileged(&self) -> bool {
        false
    }

    /// Deliver a notice to the actor
    fn send_message(&self, message: &str);
}

type GatePredicate = dyn Fn(&dyn Actor) -> bool + Send + Sync;

/// An opaque access check attached to a command node.
#[derive(Clone)]
pub enum AccessGate {
    /// Delegates to [`Actor::has_permission`]
    Permission(String),
    /// Arbitrary predicate over the actor
    Predicate(Arc<GatePredicate>),
}

impl AccessGate {
    /// Gate on a permission token
    pub fn permission(token: impl Into<String>) -> Self {
        Self::Permission(token.into())
    }

    /// Gate on a predicate
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&dyn Actor) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    /// Returns true when `actor` passes this gate
    pub fn allows(&self, actor: &dyn Actor) -> bool {
        match self {
            Self::Permission(token) => actor.has_permission(token),
            Self::Predicate(predicate) => predicate(actor),
        }
    }
}

impl fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permission(token) => f.debug_tuple("Permission").field(token).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}
