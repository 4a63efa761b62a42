//! Typed positional arguments
//!
//! Command authors implement [`Argument`] with a concrete `Value` type. The
//! node stores each declared argument as an [`ArgumentSlot`], which erases the
//! value type so arguments of different types can share one ordered list.
//! Executors recover the static type through [`ExecutionContext::get`].

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::actor::Actor;
use crate::context::{ExecutionContext, RawArgs};
use crate::node::CommandNode;

/// A parsed argument value with its static type erased
pub type ArgValue = Box<dyn Any + Send + Sync>;

/// Returned by [`Argument::parse`] when the raw token is not acceptable.
///
/// The optional reason is internal: it passes context from the parser to the
/// paired [`Argument::on_invalid`] callback and is never shown verbatim unless
/// that callback decides to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidInput {
    reason: Option<String>,
}

impl InvalidInput {
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

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "invalid input ({reason})"),
            None => f.write_str("invalid input"),
        }
    }
}

impl std::error::Error for InvalidInput {}

/// Parser, failure callback and suggestion source for one positional slot.
///
/// `parse` runs after every raw token of the invocation has been inserted into
/// the context, and after all earlier arguments were parsed, so it may read
/// any raw token and any earlier parsed value.
pub trait Argument: Send + Sync + 'static {
    /// The parsed value type stored in the execution context
    type Value: Any + Send + Sync;

    /// Parse `raw`, the token at declared position `index` of `node`.
    fn parse(
        &self,
        actor: &dyn Actor,
        raw: &str,
        node: &CommandNode,
        index: usize,
        context: &ExecutionContext,
    ) -> Result<Self::Value, InvalidInput>;

    /// Called once when `parse` rejected `raw`; dispatch stops afterwards.
    fn on_invalid(
        &self,
        actor: &dyn Actor,
        raw: &str,
        node: &CommandNode,
        index: usize,
        _context: &ExecutionContext,
        _error: &InvalidInput,
    ) {
        actor.send_message(&format!(
            "Invalid value '{raw}' for <{}>.",
            node.argument_name(index)
        ));
    }

    /// Suggestions for the partially typed token at position `index`.
    fn suggest(
        &self,
        _actor: &dyn Actor,
        _partial: &str,
        _node: &CommandNode,
        _index: usize,
        _raw: &RawArgs,
    ) -> Vec<String> {
        Vec::new()
    }
}

trait DynArgument: Send + Sync {
    fn parse_dyn(
        &self,
        actor: &dyn Actor,
        raw: &str,
        node: &CommandNode,
        index: usize,
        context: &ExecutionContext,
    ) -> Result<ArgValue, InvalidInput>;

    fn on_invalid_dyn(
        &self,
        actor: &dyn Actor,
        raw: &str,
        node: &CommandNode,
        index: usize,
        context: &ExecutionContext,
        error: &InvalidInput,
    );

    fn suggest_dyn(
        &self,
        actor: &dyn Actor,
        partial: &str,
        node: &CommandNode,
        index: usize,
        raw: &RawArgs,
    ) -> Vec<String>;

    fn implementation(&self) -> TypeId;

    fn implementation_name(&self) -> &'static str;
}

impl<A: Argument> DynArgument for A {
    fn parse_dyn(
        &self,
        actor: &dyn Actor,
        raw: &str,
        node: &CommandNode,
        index: usize,
        context: &ExecutionContext,
    ) -> Result<ArgValue, InvalidInput> {
        self.parse(actor, raw, node, index, context)
            .map(|value| Box::new(value) as ArgValue)
    }

    fn on_invalid_dyn(
        &self,
        actor: &dyn Actor,
        raw: &str,
        node: &CommandNode,
        index: usize,
        context: &ExecutionContext,
        error: &InvalidInput,
    ) {
        self.on_invalid(actor, raw, node, index, context, error);
    }

    fn suggest_dyn(
        &self,
        actor: &dyn Actor,
        partial: &str,
        node: &CommandNode,
        index: usize,
        raw: &RawArgs,
    ) -> Vec<String> {
        self.suggest(actor, partial, node, index, raw)
    }

    fn implementation(&self) -> TypeId {
        TypeId::of::<A>()
    }

    fn implementation_name(&self) -> &'static str {
        std::any::type_name::<A>()
    }
}

/// A named, type-erased argument declared on a command node.
#[derive(Clone)]
pub struct ArgumentSlot {
    name: String,
    inner: Arc<dyn DynArgument>,
}

impl ArgumentSlot {
    /// Wrap an owned argument implementation
    pub fn new<A: Argument>(name: impl Into<String>, argument: A) -> Self {
        Self::shared(name, Arc::new(argument))
    }

    /// Wrap a shared argument implementation.
    ///
    /// Slots built from clones of the same `Arc` share an instance identity,
    /// which per-instance completion deduplication keys on.
    pub fn shared<A: Argument>(name: impl Into<String>, argument: Arc<A>) -> Self {
        Self {
            name: name.into(),
            inner: argument,
        }
    }

    pub(crate) fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parse(
        &self,
        actor: &dyn Actor,
        raw: &str,
        node: &CommandNode,
        index: usize,
        context: &ExecutionContext,
    ) -> Result<ArgValue, InvalidInput> {
        self.inner.parse_dyn(actor, raw, node, index, context)
    }

    pub fn on_invalid(
        &self,
        actor: &dyn Actor,
        raw: &str,
        node: &CommandNode,
        index: usize,
        context: &ExecutionContext,
        error: &InvalidInput,
    ) {
        self.inner
            .on_invalid_dyn(actor, raw, node, index, context, error);
    }

    pub fn suggest(
        &self,
        actor: &dyn Actor,
        partial: &str,
        node: &CommandNode,
        index: usize,
        raw: &RawArgs,
    ) -> Vec<String> {
        self.inner.suggest_dyn(actor, partial, node, index, raw)
    }

    /// `TypeId` of the argument implementation
    pub fn implementation_type(&self) -> TypeId {
        self.inner.implementation()
    }

    /// Identity of the shared implementation instance
    pub fn instance_id(&self) -> usize {
        Arc::as_ptr(&self.inner).cast::<()>() as usize
    }

    pub fn type_name(&self) -> &'static str {
        self.inner.implementation_name()
    }
}

impl fmt::Debug for ArgumentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentSlot")
            .field("name", &self.name)
            .field("type", &self.type_name())
            .finish()
    }
}
