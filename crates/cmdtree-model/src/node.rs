//! Command nodes
//!
//! A [`CommandNode`] is immutable once built. Its accepted argument-count
//! range is `required.len() ..= required.len() + optional.len()`, which is
//! never empty.

use std::fmt;
use std::sync::Arc;

use crate::actor::{AccessGate, Actor};
use crate::argument::ArgumentSlot;
use crate::case::eq_ignore_case;
use crate::builder::CommandBuilder;
use crate::context::ExecutionContext;
use crate::requirement::RequirementSlot;
use crate::subcommands::SubcommandTable;

/// Command handler: `(actor, context) -> Result`.
///
/// Errors and panics are caught at the dispatch boundary.
pub type Executor =
    Arc<dyn Fn(&dyn Actor, &mut ExecutionContext) -> anyhow::Result<()> + Send + Sync>;

/// One point in the command tree.
pub struct CommandNode {
    pub(crate) name: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) description: Option<String>,
    pub(crate) gate: Option<AccessGate>,
    pub(crate) required: Vec<ArgumentSlot>,
    pub(crate) optional: Vec<ArgumentSlot>,
    pub(crate) requirements: Vec<RequirementSlot>,
    pub(crate) executor: Option<Executor>,
    pub(crate) privileged_executor: Option<Executor>,
    pub(crate) subcommands: SubcommandTable,
}

impl CommandNode {
    /// Start building a node with primary label `name`
    #[must_use]
    pub fn builder(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Primary name followed by aliases
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Case-insensitive match against the name and aliases
    pub fn answers_to(&self, label: &str) -> bool {
        self.labels().any(|candidate| eq_ignore_case(candidate, label))
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn gate(&self) -> Option<&AccessGate> {
        self.gate.as_ref()
    }

    /// True when the node has no gate or `actor` passes it
    pub fn can_access(&self, actor: &dyn Actor) -> bool {
        self.gate.as_ref().is_none_or(|gate| gate.allows(actor))
    }

    pub fn required_args(&self) -> &[ArgumentSlot] {
        &self.required
    }

    pub fn optional_args(&self) -> &[ArgumentSlot] {
        &self.optional
    }

    /// Declared arguments in positional order: required, then optional
    pub fn arguments(&self) -> impl Iterator<Item = &ArgumentSlot> {
        self.required.iter().chain(self.optional.iter())
    }

    /// Argument declared at position `index`
    pub fn argument(&self, index: usize) -> Option<&ArgumentSlot> {
        self.arguments().nth(index)
    }

    /// Name of the argument at `index`, or `"argument"` past the declared ones
    pub fn argument_name(&self, index: usize) -> &str {
        self.argument(index).map_or("argument", ArgumentSlot::name)
    }

    pub fn min_args(&self) -> usize {
        self.required.len()
    }

    pub fn max_args(&self) -> usize {
        self.required.len() + self.optional.len()
    }

    /// Whether the node accepts exactly `count` trailing tokens
    pub fn accepts(&self, count: usize) -> bool {
        (self.min_args()..=self.max_args()).contains(&count)
    }

    pub fn requirements(&self) -> &[RequirementSlot] {
        &self.requirements
    }

    pub fn has_executor(&self) -> bool {
        self.executor.is_some() || self.privileged_executor.is_some()
    }

    pub fn executor(&self) -> Option<&Executor> {
        self.executor.as_ref()
    }

    pub fn privileged_executor(&self) -> Option<&Executor> {
        self.privileged_executor.as_ref()
    }

    /// The executor to run for `actor`: the privileged variant when the actor
    /// qualifies and one is defined, otherwise the default.
    pub fn select_executor(&self, actor: &dyn Actor) -> Option<&Executor> {
        if actor.is_privileged() {
            if let Some(executor) = &self.privileged_executor {
                return Some(executor);
            }
        }
        self.executor.as_ref()
    }

    pub fn subcommands(&self) -> &SubcommandTable {
        &self.subcommands
    }

    pub fn has_subcommands(&self) -> bool {
        !self.subcommands.is_empty()
    }

    /// Argument synopsis, e.g. `<target> [amount]`
    pub fn argument_usage(&self) -> String {
        let required = self.required.iter().map(|slot| format!("<{}>", slot.name()));
        let optional = self.optional.iter().map(|slot| format!("[{}]", slot.name()));
        required.chain(optional).collect::<Vec<_>>().join(" ")
    }

    /// Name followed by the argument synopsis
    pub fn usage(&self) -> String {
        let args = self.argument_usage();
        if args.is_empty() {
            self.name.clone()
        } else {
            format!("{} {args}", self.name)
        }
    }
}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("gate", &self.gate)
            .field("required", &self.required)
            .field("optional", &self.optional)
            .field("requirements", &self.requirements)
            .field("executor", &self.executor.is_some())
            .field("privileged_executor", &self.privileged_executor.is_some())
            .field("subcommands", &self.subcommands)
            .finish()
    }
}
