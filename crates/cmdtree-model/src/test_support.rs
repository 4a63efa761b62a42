//! Test doubles for actors, arguments and requirements.
//!
//! Enabled for this crate's own tests and, via the `test-utils` feature, for
//! downstream integration tests.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::actor::Actor;
use crate::argument::{Argument, InvalidInput};
use crate::context::{ExecutionContext, RawArgs};
use crate::node::CommandNode;
use crate::requirement::{NotMet, Requirement};

/// Shared call counter for spies
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Actor with an explicit permission set that records every notice.
#[derive(Debug, Default)]
pub struct TestActor {
    name: String,
    permissions: BTreeSet<String>,
    all_permissions: bool,
    privileged: bool,
    messages: Mutex<Vec<String>>,
}

impl TestActor {
    /// Actor without any permission
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Actor passing every permission gate
    pub fn unrestricted(name: &str) -> Self {
        Self {
            all_permissions: true,
            ..Self::new(name)
        }
    }

    /// Privileged actor passing every permission gate
    pub fn privileged(name: &str) -> Self {
        Self {
            privileged: true,
            ..Self::unrestricted(name)
        }
    }

    #[must_use]
    pub fn with_permission(mut self, permission: &str) -> Self {
        self.permissions.insert(permission.to_string());
        self
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_message(&self) -> Option<String> {
        self.messages().pop()
    }
}

impl Actor for TestActor {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.all_permissions || self.permissions.contains(permission)
    }

    fn is_privileged(&self) -> bool {
        self.privileged
    }

    fn send_message(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

/// String argument that counts parse and suggest calls.
#[derive(Debug, Clone, Default)]
pub struct SpyArgument {
    pub parses: CallCounter,
    pub suggestions: CallCounter,
    choices: Vec<String>,
}

impl SpyArgument {
    pub fn new(parses: CallCounter) -> Self {
        Self {
            parses,
            ..Self::default()
        }
    }

    /// Spy whose suggest calls are counted by `suggestions`
    pub fn suggesting<I, S>(suggestions: CallCounter, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parses: CallCounter::new(),
            suggestions,
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }
}

impl Argument for SpyArgument {
    type Value = String;

    fn parse(
        &self,
        _actor: &dyn Actor,
        raw: &str,
        _node: &CommandNode,
        _index: usize,
        _context: &ExecutionContext,
    ) -> Result<String, InvalidInput> {
        self.parses.increment();
        Ok(raw.to_string())
    }

    fn suggest(
        &self,
        _actor: &dyn Actor,
        partial: &str,
        _node: &CommandNode,
        _index: usize,
        _raw: &RawArgs,
    ) -> Vec<String> {
        self.suggestions.increment();
        self.choices
            .iter()
            .filter(|choice| choice.starts_with(partial))
            .cloned()
            .collect()
    }
}

/// Argument that rejects every token with a fixed reason.
#[derive(Debug, Clone)]
pub struct FailingArgument {
    pub parses: CallCounter,
    pub callbacks: CallCounter,
    reason: String,
}

impl FailingArgument {
    pub fn new(reason: &str) -> Self {
        Self {
            parses: CallCounter::new(),
            callbacks: CallCounter::new(),
            reason: reason.to_string(),
        }
    }
}

impl Argument for FailingArgument {
    type Value = String;

    fn parse(
        &self,
        _actor: &dyn Actor,
        _raw: &str,
        _node: &CommandNode,
        _index: usize,
        _context: &ExecutionContext,
    ) -> Result<String, InvalidInput> {
        self.parses.increment();
        Err(InvalidInput::with_reason(self.reason.clone()))
    }

    fn on_invalid(
        &self,
        actor: &dyn Actor,
        raw: &str,
        _node: &CommandNode,
        index: usize,
        _context: &ExecutionContext,
        error: &InvalidInput,
    ) {
        self.callbacks.increment();
        actor.send_message(&format!(
            "rejected {raw} at {index}: {}",
            error.reason().unwrap_or("none")
        ));
    }
}

/// Requirement returning a fixed outcome and counting evaluations.
#[derive(Debug, Clone)]
pub struct StaticRequirement<T> {
    pub evaluations: CallCounter,
    pub callbacks: CallCounter,
    outcome: Result<Option<T>, NotMet>,
}

impl<T: Clone + Send + Sync + 'static> StaticRequirement<T> {
    /// Requirement that is met and derives `value`
    pub fn met(value: Option<T>) -> Self {
        Self {
            evaluations: CallCounter::new(),
            callbacks: CallCounter::new(),
            outcome: Ok(value),
        }
    }

    /// Requirement that is never met
    pub fn unmet(reason: &str) -> Self {
        Self {
            evaluations: CallCounter::new(),
            callbacks: CallCounter::new(),
            outcome: Err(NotMet::with_reason(reason)),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Requirement for StaticRequirement<T> {
    type Value = T;

    fn evaluate(
        &self,
        _actor: &dyn Actor,
        _node: &CommandNode,
        _context: &ExecutionContext,
    ) -> Result<Option<T>, NotMet> {
        self.evaluations.increment();
        self.outcome.clone()
    }

    fn on_not_met(
        &self,
        actor: &dyn Actor,
        _node: &CommandNode,
        _context: &ExecutionContext,
        error: &NotMet,
    ) {
        self.callbacks.increment();
        actor.send_message(&format!("unmet: {}", error.reason().unwrap_or("none")));
    }
}
