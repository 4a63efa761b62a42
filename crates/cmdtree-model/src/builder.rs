use std::collections::HashSet;
use std::sync::Arc;

use cmdtree_utils::error::DefinitionError;

use crate::actor::{AccessGate, Actor};
use crate::argument::{Argument, ArgumentSlot};
use crate::case::fold_case;
use crate::context::ExecutionContext;
use crate::node::{CommandNode, Executor};
use crate::registry::ArgumentRegistry;
use crate::requirement::{Requirement, RequirementSlot};
use crate::subcommands::SubcommandTable;

/// Fluent builder for [`CommandNode`].
///
/// Subcommands are built first and handed to their parent; the tree is
/// immutable once the root is built.
///
/// # Example
///
/// ```rust
/// use cmdtree_model::{CommandNode, StringArg};
///
/// let create = CommandNode::builder("create")
///     .permission("base.create")
///     .required_arg("name", StringArg)
///     .executor(|actor, ctx| {
///         let name = ctx.get::<String>("name")?.cloned().unwrap_or_default();
///         actor.send_message(&format!("Created {name}"));
///         Ok(())
///     })
///     .build()
///     .expect("valid definition");
///
/// let base = CommandNode::builder("base")
///     .subcommand(create)
///     .build()
///     .expect("valid definition");
///
/// assert!(base.subcommands().variant_for("create", 1).is_some());
/// ```
#[must_use]
pub struct CommandBuilder {
    name: String,
    aliases: Vec<String>,
    description: Option<String>,
    gate: Option<AccessGate>,
    required: Vec<ArgumentSlot>,
    optional: Vec<ArgumentSlot>,
    requirements: Vec<RequirementSlot>,
    executor: Option<Executor>,
    privileged_executor: Option<Executor>,
    subcommands: Vec<Arc<CommandNode>>,
    pending_error: Option<DefinitionError>,
}

impl CommandBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: None,
            gate: None,
            required: Vec::new(),
            optional: Vec::new(),
            requirements: Vec::new(),
            executor: None,
            privileged_executor: None,
            subcommands: Vec::new(),
            pending_error: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Gate the node on a permission token.
    pub fn permission(mut self, token: impl Into<String>) -> Self {
        self.gate = Some(AccessGate::permission(token));
        self
    }

    pub fn gate(mut self, gate: AccessGate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn required_arg<A: Argument>(mut self, name: impl Into<String>, argument: A) -> Self {
        self.required.push(ArgumentSlot::new(name, argument));
        self
    }

    /// Declare a required argument backed by a shared implementation.
    pub fn required_shared<A: Argument>(
        mut self,
        name: impl Into<String>,
        argument: Arc<A>,
    ) -> Self {
        self.required.push(ArgumentSlot::shared(name, argument));
        self
    }

    pub fn optional_arg<A: Argument>(mut self, name: impl Into<String>, argument: A) -> Self {
        self.optional.push(ArgumentSlot::new(name, argument));
        self
    }

    pub fn optional_shared<A: Argument>(
        mut self,
        name: impl Into<String>,
        argument: Arc<A>,
    ) -> Self {
        self.optional.push(ArgumentSlot::shared(name, argument));
        self
    }

    /// Declare a required argument whose implementation is looked up by kind.
    ///
    /// An unknown kind is reported by [`CommandBuilder::build`].
    pub fn required_kind(
        mut self,
        name: impl Into<String>,
        kind: &str,
        registry: &ArgumentRegistry,
    ) -> Self {
        if let Some(slot) = self.lookup_kind(name.into(), kind, registry) {
            self.required.push(slot);
        }
        self
    }

    /// Optional counterpart of [`CommandBuilder::required_kind`].
    pub fn optional_kind(
        mut self,
        name: impl Into<String>,
        kind: &str,
        registry: &ArgumentRegistry,
    ) -> Self {
        if let Some(slot) = self.lookup_kind(name.into(), kind, registry) {
            self.optional.push(slot);
        }
        self
    }

    pub fn requirement<R: Requirement>(mut self, requirement: R) -> Self {
        self.requirements.push(RequirementSlot::new(requirement));
        self
    }

    /// Executor used for every actor without a more specific variant.
    pub fn executor<F>(mut self, executor: F) -> Self
    where
        F: Fn(&dyn Actor, &mut ExecutionContext) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.executor = Some(Arc::new(executor));
        self
    }

    /// Executor used when the actor reports [`Actor::is_privileged`].
    pub fn privileged_executor<F>(mut self, executor: F) -> Self
    where
        F: Fn(&dyn Actor, &mut ExecutionContext) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.privileged_executor = Some(Arc::new(executor));
        self
    }

    pub fn subcommand(self, node: CommandNode) -> Self {
        self.shared_subcommand(Arc::new(node))
    }

    /// Register an already shared node, e.g. one reused under several parents.
    pub fn shared_subcommand(mut self, node: Arc<CommandNode>) -> Self {
        self.subcommands.push(node);
        self
    }

    /// Validate the definition and build the node.
    ///
    /// # Errors
    ///
    /// Returns the first [`DefinitionError`] found: an unknown argument kind,
    /// an empty or whitespace-containing name/alias/argument name, or an
    /// argument name declared twice (case-insensitively).
    pub fn build(self) -> Result<CommandNode, DefinitionError> {
        if let Some(error) = self.pending_error {
            return Err(error);
        }
        validate_label(&self.name)?;

        for alias in &self.aliases {
            if alias.is_empty() || alias.chars().any(char::is_whitespace) {
                return Err(DefinitionError::InvalidAlias {
                    command: self.name.clone(),
                    alias: alias.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for slot in self.required.iter().chain(&self.optional) {
            let argument = slot.name();
            if argument.is_empty() || argument.chars().any(char::is_whitespace) {
                return Err(DefinitionError::InvalidArgumentName {
                    command: self.name.clone(),
                    argument: argument.to_string(),
                });
            }
            if !seen.insert(fold_case(argument)) {
                return Err(DefinitionError::DuplicateArgument {
                    command: self.name.clone(),
                    argument: argument.to_string(),
                });
            }
        }

        let mut subcommands = SubcommandTable::new();
        for child in self.subcommands {
            subcommands.insert(child);
        }

        Ok(CommandNode {
            name: self.name,
            aliases: self.aliases,
            description: self.description,
            gate: self.gate,
            required: self.required,
            optional: self.optional,
            requirements: self.requirements,
            executor: self.executor,
            privileged_executor: self.privileged_executor,
            subcommands,
        })
    }

    fn lookup_kind(
        &mut self,
        name: String,
        kind: &str,
        registry: &ArgumentRegistry,
    ) -> Option<ArgumentSlot> {
        let slot = registry.slot(kind, name.clone());
        if slot.is_none() && self.pending_error.is_none() {
            self.pending_error = Some(DefinitionError::UnknownArgumentKind {
                command: self.name.clone(),
                argument: name,
                kind: kind.to_string(),
            });
        }
        slot
    }
}

fn validate_label(name: &str) -> Result<(), DefinitionError> {
    if name.is_empty() {
        return Err(DefinitionError::EmptyName);
    }
    if name.chars().any(char::is_whitespace) {
        return Err(DefinitionError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}
