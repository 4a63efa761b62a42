//! Command dispatch pipeline
//!
//! One dispatch runs these stages in order and stops at the first failure:
//!
//! 1. root access gate
//! 2. resolution ([`crate::resolve`])
//! 3. executor selection for the actor
//! 4. raw token insertion for every argument
//! 5. argument parsing in declaration order
//! 6. requirement evaluation in declaration order
//! 7. executor invocation, with errors and panics caught
//!
//! Exactly one [`DispatchOutcome`] describes where it ended.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use cmdtree_config::DispatcherConfig;
use cmdtree_model::{
    Actor, ArgumentRegistry, CommandNode, ExecutionContext, eq_ignore_case, fold_case,
    sort_ignore_case, starts_with_ignore_case,
};
use cmdtree_utils::error::DefinitionError;
use cmdtree_utils::logging::{completion_span, dispatch_span, log_executor_fault};
use tracing::{debug, warn};

use crate::completion::complete;
use crate::outcome::{DispatchOutcome, Resolution};
use crate::resolver::resolve;
use crate::usage::{PlainUsageRenderer, UsageRenderer};

/// Root command registry plus the dispatch and completion entry points.
///
/// Registration is expected at startup. Dispatch only reads the registry and
/// the trees, so a `Dispatcher` behind an `Arc` can serve many threads.
pub struct Dispatcher {
    config: DispatcherConfig,
    arguments: ArgumentRegistry,
    usage: Arc<dyn UsageRenderer>,
    commands: BTreeMap<String, Arc<CommandNode>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("arguments", &self.arguments)
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Dispatcher`].
///
/// Defaults: [`DispatcherConfig::default`], the built-in argument kinds and
/// [`PlainUsageRenderer`].
#[must_use]
pub struct DispatcherBuilder {
    config: DispatcherConfig,
    arguments: ArgumentRegistry,
    usage: Arc<dyn UsageRenderer>,
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            config: DispatcherConfig::default(),
            arguments: ArgumentRegistry::with_builtins(),
            usage: Arc::new(PlainUsageRenderer),
        }
    }

    pub fn config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the argument registry handed to command definitions
    pub fn arguments(mut self, registry: ArgumentRegistry) -> Self {
        self.arguments = registry;
        self
    }

    pub fn usage_renderer<R: UsageRenderer + 'static>(mut self, renderer: R) -> Self {
        self.usage = Arc::new(renderer);
        self
    }

    pub fn build(self) -> Dispatcher {
        Dispatcher {
            config: self.config,
            arguments: self.arguments,
            usage: self.usage,
            commands: BTreeMap::new(),
        }
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Registry for resolving argument kinds while defining commands
    pub fn arguments(&self) -> &ArgumentRegistry {
        &self.arguments
    }

    /// Register a root command under its name and aliases.
    ///
    /// # Errors
    ///
    /// [`DefinitionError::DuplicateCommand`] when a root command with the same
    /// primary name is already registered. An alias that collides with an
    /// existing label is skipped with a warning.
    pub fn register(&mut self, node: CommandNode) -> Result<Arc<CommandNode>, DefinitionError> {
        self.register_shared(Arc::new(node))
    }

    /// Register an already shared root command.
    ///
    /// # Errors
    ///
    /// Same as [`Dispatcher::register`].
    pub fn register_shared(
        &mut self,
        node: Arc<CommandNode>,
    ) -> Result<Arc<CommandNode>, DefinitionError> {
        let primary = fold_case(node.name());
        if let Some(existing) = self.commands.get(&primary) {
            if fold_case(existing.name()) == primary {
                return Err(DefinitionError::DuplicateCommand {
                    name: node.name().to_string(),
                });
            }
            warn!(
                label = %primary,
                previous = %existing.name(),
                "Primary name replaces an existing alias"
            );
        }
        self.commands.insert(primary, Arc::clone(&node));

        for alias in node.aliases() {
            let label = fold_case(alias);
            if let Some(existing) = self.commands.get(&label) {
                if !Arc::ptr_eq(existing, &node) {
                    warn!(
                        alias = %alias,
                        command = %node.name(),
                        owner = %existing.name(),
                        "Alias already taken, skipping"
                    );
                }
                continue;
            }
            self.commands.insert(label, Arc::clone(&node));
        }

        debug!(command = %node.name(), aliases = node.aliases().len(), "Registered command");
        Ok(node)
    }

    /// Remove the root command answering to `label`, with every label that
    /// points at it.
    pub fn unregister(&mut self, label: &str) -> Option<Arc<CommandNode>> {
        let node = self.commands.get(&fold_case(label)).cloned()?;
        self.commands
            .retain(|_, registered| !Arc::ptr_eq(registered, &node));
        debug!(command = %node.name(), "Unregistered command");
        Some(node)
    }

    /// Root command answering to `label`, case-insensitively
    pub fn command(&self, label: &str) -> Option<&Arc<CommandNode>> {
        self.commands.get(&fold_case(label))
    }

    /// Every registered root label, case-folded and sorted
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Look up the root command for `label` and dispatch `tokens` to it.
    pub fn execute(&self, actor: &dyn Actor, label: &str, tokens: &[String]) -> DispatchOutcome {
        match self.command(label) {
            Some(root) => self.dispatch(actor, root, tokens),
            None => {
                debug!(label = %label, actor = %actor.name(), "Unknown command");
                actor.send_message(&self.config.messages.unknown_command);
                DispatchOutcome::UnknownCommand {
                    label: label.to_string(),
                }
            }
        }
    }

    /// Split `line` on whitespace and execute it. A leading `/` is ignored.
    pub fn execute_line(&self, actor: &dyn Actor, line: &str) -> DispatchOutcome {
        let tokens = tokenize(line);
        match tokens.split_first() {
            Some((label, rest)) => self.execute(actor, label, rest),
            None => {
                actor.send_message(&self.config.messages.unknown_command);
                DispatchOutcome::UnknownCommand {
                    label: String::new(),
                }
            }
        }
    }

    /// Run the full pipeline for `tokens` typed after `root`'s label.
    pub fn dispatch(
        &self,
        actor: &dyn Actor,
        root: &Arc<CommandNode>,
        tokens: &[String],
    ) -> DispatchOutcome {
        let span = dispatch_span(root.name(), actor.name());
        let _guard = span.enter();

        if !root.can_access(actor) {
            return self.deny(actor, root);
        }

        let (path, remaining) = match resolve(actor, root, tokens) {
            Resolution::Success { path, remaining } => (path, remaining),
            Resolution::MissingPermission { node } => return self.deny(actor, &node),
            Resolution::UsageError {
                path,
                failed,
                remaining,
            } => {
                debug!(
                    failed = %failed.name(),
                    remaining = remaining.len(),
                    "No command matched the arguments"
                );
                self.usage.render_usage(actor, &path, &failed, &remaining);
                return DispatchOutcome::Usage {
                    command: failed.name().to_string(),
                };
            }
        };
        let Some((node, parents)) = path.split_last() else {
            self.usage.render_usage(actor, &[], root, tokens);
            return DispatchOutcome::Usage {
                command: root.name().to_string(),
            };
        };

        let Some(executor) = node.select_executor(actor).cloned() else {
            debug!(command = %node.name(), "No executor for this actor");
            actor.send_message(&self.config.messages.unsupported_actor);
            return DispatchOutcome::UnsupportedActor {
                command: node.name().to_string(),
            };
        };

        let mut context = ExecutionContext::new(Arc::clone(node), parents.to_vec());
        for (slot, token) in node.arguments().zip(&remaining) {
            context.insert_raw(slot.name(), token.as_str());
        }

        for (index, (slot, token)) in node.arguments().zip(&remaining).enumerate() {
            match slot.parse(actor, token, node, index, &context) {
                Ok(value) => context.insert_parsed(slot.name(), value),
                Err(error) => {
                    debug!(
                        command = %node.name(),
                        argument = %slot.name(),
                        index,
                        %error,
                        "Argument rejected"
                    );
                    slot.on_invalid(actor, token, node, index, &context, &error);
                    return DispatchOutcome::InvalidArgument {
                        argument: slot.name().to_string(),
                        index,
                    };
                }
            }
        }

        for (index, requirement) in node.requirements().iter().enumerate() {
            match requirement.evaluate(actor, node, &context) {
                Ok(value) => context.push_requirement_value(value),
                Err(error) => {
                    debug!(command = %node.name(), index, %error, "Requirement not met");
                    requirement.on_not_met(actor, node, &context, &error);
                    return DispatchOutcome::RequirementNotMet { index };
                }
            }
        }

        let result = panic::catch_unwind(AssertUnwindSafe(|| executor(actor, &mut context)));
        let detail = match result {
            Ok(Ok(())) => {
                debug!(command = %node.name(), "Command executed");
                return DispatchOutcome::Executed;
            }
            Ok(Err(error)) => format!("{error:#}"),
            Err(payload) => panic_detail(payload.as_ref()),
        };

        log_executor_fault(node.name(), actor.name(), &detail);
        actor.send_message(&self.config.messages.internal_error);
        DispatchOutcome::ExecutorFailed {
            command: node.name().to_string(),
        }
    }

    /// Suggestions for `tokens` typed after `root`'s label
    pub fn complete(
        &self,
        actor: &dyn Actor,
        root: &Arc<CommandNode>,
        tokens: &[String],
    ) -> Vec<String> {
        let span = completion_span(root.name(), actor.name(), tokens.len());
        let _guard = span.enter();
        complete(actor, root, tokens, &self.config.completion)
    }

    /// Suggestions for `tokens` typed after the root command `label`
    pub fn complete_label(&self, actor: &dyn Actor, label: &str, tokens: &[String]) -> Vec<String> {
        match self.command(label) {
            Some(root) => self.complete(actor, root, tokens),
            None => Vec::new(),
        }
    }

    /// Suggestions for a partially typed line.
    ///
    /// A line ending in whitespace completes a new, empty token. While the
    /// first token is being typed, accessible root labels are suggested.
    pub fn complete_line(&self, actor: &dyn Actor, line: &str) -> Vec<String> {
        let mut tokens = tokenize(line);
        if tokens.is_empty() || line.ends_with(char::is_whitespace) {
            tokens.push(String::new());
        }

        match tokens.split_first() {
            Some((partial, [])) => self.complete_root_label(actor, partial),
            Some((label, rest)) => self.complete_label(actor, label, rest),
            None => Vec::new(),
        }
    }

    fn complete_root_label(&self, actor: &dyn Actor, partial: &str) -> Vec<String> {
        let mut labels: Vec<String> = self
            .commands
            .iter()
            .filter(|(label, node)| {
                starts_with_ignore_case(label.as_str(), partial) && node.can_access(actor)
            })
            .map(|(label, node)| {
                node.labels()
                    .find(|declared| eq_ignore_case(declared, label))
                    .unwrap_or(label.as_str())
                    .to_string()
            })
            .collect();
        sort_ignore_case(&mut labels);
        if let Some(max) = self.config.completion.max_suggestions {
            labels.truncate(max);
        }
        labels
    }

    fn deny(&self, actor: &dyn Actor, node: &CommandNode) -> DispatchOutcome {
        debug!(command = %node.name(), actor = %actor.name(), "Access denied");
        actor.send_message(&self.config.messages.no_permission);
        DispatchOutcome::AccessDenied {
            command: node.name().to_string(),
        }
    }
}

fn tokenize(line: &str) -> Vec<String> {
    let line = line.trim_start();
    let line = line.strip_prefix('/').unwrap_or(line);
    line.split_whitespace().map(str::to_string).collect()
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panic: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panic: {message}")
    } else {
        "panic with non-string payload".to_string()
    }
}
