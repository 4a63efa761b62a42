//! Pre-execution requirements
//!
//! Requirements run in declaration order after every argument parsed. Each
//! one either derives an optional value, appended to the context's
//! requirement values, or stops the dispatch.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::actor::Actor;
use crate::argument::ArgValue;
use crate::context::ExecutionContext;
use crate::node::CommandNode;

/// Returned by [`Requirement::evaluate`] when the requirement does not hold.
///
/// Like [`InvalidInput`](crate::InvalidInput), the reason is only meant for
/// the paired [`Requirement::on_not_met`] callback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotMet {
    reason: Option<String>,
}

impl NotMet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
        }
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

impl fmt::Display for NotMet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "requirement not met ({reason})"),
            None => f.write_str("requirement not met"),
        }
    }
}

impl std::error::Error for NotMet {}

/// A gate evaluated after argument parsing that may derive a value.
pub trait Requirement: Send + Sync + 'static {
    type Value: Any + Send + Sync;

    fn evaluate(
        &self,
        actor: &dyn Actor,
        node: &CommandNode,
        context: &ExecutionContext,
    ) -> Result<Option<Self::Value>, NotMet>;

    fn on_not_met(
        &self,
        actor: &dyn Actor,
        _node: &CommandNode,
        _context: &ExecutionContext,
        _error: &NotMet,
    ) {
        actor.send_message("You cannot use this command right now.");
    }
}

trait DynRequirement: Send + Sync {
    fn evaluate_dyn(
        &self,
        actor: &dyn Actor,
        node: &CommandNode,
        context: &ExecutionContext,
    ) -> Result<Option<ArgValue>, NotMet>;

    fn on_not_met_dyn(
        &self,
        actor: &dyn Actor,
        node: &CommandNode,
        context: &ExecutionContext,
        error: &NotMet,
    );

    fn implementation_name(&self) -> &'static str;
}

impl<R: Requirement> DynRequirement for R {
    fn evaluate_dyn(
        &self,
        actor: &dyn Actor,
        node: &CommandNode,
        context: &ExecutionContext,
    ) -> Result<Option<ArgValue>, NotMet> {
        self.evaluate(actor, node, context)
            .map(|value| value.map(|v| Box::new(v) as ArgValue))
    }

    fn on_not_met_dyn(
        &self,
        actor: &dyn Actor,
        node: &CommandNode,
        context: &ExecutionContext,
        error: &NotMet,
    ) {
        self.on_not_met(actor, node, context, error);
    }

    fn implementation_name(&self) -> &'static str {
        std::any::type_name::<R>()
    }
}

/// A type-erased requirement declared on a command node.
#[derive(Clone)]
pub struct RequirementSlot {
    inner: Arc<dyn DynRequirement>,
}

impl RequirementSlot {
    pub fn new<R: Requirement>(requirement: R) -> Self {
        Self {
            inner: Arc::new(requirement),
        }
    }

    pub fn evaluate(
        &self,
        actor: &dyn Actor,
        node: &CommandNode,
        context: &ExecutionContext,
    ) -> Result<Option<ArgValue>, NotMet> {
        self.inner.evaluate_dyn(actor, node, context)
    }

    pub fn on_not_met(
        &self,
        actor: &dyn Actor,
        node: &CommandNode,
        context: &ExecutionContext,
        error: &NotMet,
    ) {
        self.inner.on_not_met_dyn(actor, node, context, error);
    }

    pub fn type_name(&self) -> &'static str {
        self.inner.implementation_name()
    }
}

impl fmt::Debug for RequirementSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RequirementSlot")
            .field(&self.type_name())
            .finish()
    }
}
