//! Sample command tree and console actor used by the `cmdtree` shell.
//!
//! ```text
//! /base create <name>
//! /base delete|del <name>                (base.delete)
//! /base set <key> <value> [scope]
//! /base spend <amount>                   (within budget)
//! /base stop                             (privileged variant)
//! /echo|say <message> [times]
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Context as _;
use cmdtree_config::DispatcherConfig;
use cmdtree_engine::Dispatcher;
use cmdtree_model::{
    Actor, ChoiceArg, CommandNode, ExecutionContext, IntegerArg, NotMet, Requirement, StringArg,
};
use cmdtree_utils::error::DefinitionError;

/// Permission token granting every gate to the console actor
pub const ALL_PERMISSIONS: &str = "*";

/// Budget available to `/base spend`
pub const SPEND_BUDGET: i64 = 100;

/// The shell's actor: prints every notice to stdout.
#[derive(Debug, Clone, Default)]
pub struct ConsoleActor {
    permissions: BTreeSet<String>,
    privileged: bool,
}

impl ConsoleActor {
    pub fn new<I, S>(permissions: I, privileged: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
            privileged,
        }
    }
}

impl Actor for ConsoleActor {
    fn name(&self) -> &str {
        "console"
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(ALL_PERMISSIONS) || self.permissions.contains(permission)
    }

    fn is_privileged(&self) -> bool {
        self.privileged
    }

    fn send_message(&self, message: &str) {
        println!("{message}");
    }
}

/// Met when `<amount>` fits the budget; derives the budget left afterwards.
#[derive(Debug, Clone, Copy)]
pub struct WithinBudget {
    pub budget: i64,
}

impl Requirement for WithinBudget {
    type Value = i64;

    fn evaluate(
        &self,
        _actor: &dyn Actor,
        _node: &CommandNode,
        context: &ExecutionContext,
    ) -> Result<Option<i64>, NotMet> {
        let amount = context
            .get::<i64>("amount")
            .ok()
            .flatten()
            .copied()
            .ok_or_else(NotMet::new)?;
        if amount > self.budget {
            return Err(NotMet::with_reason(format!("{amount} > {}", self.budget)));
        }
        Ok(Some(self.budget - amount))
    }

    fn on_not_met(
        &self,
        actor: &dyn Actor,
        _node: &CommandNode,
        _context: &ExecutionContext,
        _error: &NotMet,
    ) {
        actor.send_message(&format!("You can spend at most {}.", self.budget));
    }
}

fn string_arg(context: &ExecutionContext, name: &str) -> anyhow::Result<String> {
    context
        .get::<String>(name)?
        .cloned()
        .with_context(|| format!("argument <{name}> was not parsed"))
}

/// Build the `/base` command tree.
///
/// # Errors
///
/// Returns the first definition error in the tree.
pub fn base_command() -> Result<CommandNode, DefinitionError> {
    let keys = Arc::new(ChoiceArg::new(["mode", "limit", "motd"]));

    CommandNode::builder("base")
        .description("Sample command group")
        .subcommand(
            CommandNode::builder("create")
                .description("Create an entry")
                .required_arg("name", StringArg)
                .executor(|actor, ctx| {
                    let name = string_arg(ctx, "name")?;
                    actor.send_message(&format!("Created {name}."));
                    Ok(())
                })
                .build()?,
        )
        .subcommand(
            CommandNode::builder("delete")
                .alias("del")
                .description("Delete an entry")
                .permission("base.delete")
                .required_arg("name", StringArg)
                .executor(|actor, ctx| {
                    let name = string_arg(ctx, "name")?;
                    actor.send_message(&format!("Deleted {name}."));
                    Ok(())
                })
                .build()?,
        )
        .subcommand(
            CommandNode::builder("set")
                .description("Set a value")
                .required_shared("key", Arc::clone(&keys))
                .required_arg("value", StringArg)
                .executor(|actor, ctx| {
                    let key = string_arg(ctx, "key")?;
                    let value = string_arg(ctx, "value")?;
                    actor.send_message(&format!("{key} = {value}"));
                    Ok(())
                })
                .build()?,
        )
        .subcommand(
            CommandNode::builder("set")
                .description("Set a value in a scope")
                .required_shared("key", keys)
                .required_arg("value", StringArg)
                .required_arg("scope", ChoiceArg::new(["local", "global"]))
                .executor(|actor, ctx| {
                    let key = string_arg(ctx, "key")?;
                    let value = string_arg(ctx, "value")?;
                    let scope = string_arg(ctx, "scope")?;
                    actor.send_message(&format!("{key} = {value} ({scope})"));
                    Ok(())
                })
                .build()?,
        )
        .subcommand(
            CommandNode::builder("spend")
                .description("Spend from the budget")
                .required_arg("amount", IntegerArg::at_least(1))
                .requirement(WithinBudget {
                    budget: SPEND_BUDGET,
                })
                .executor(|actor, ctx| {
                    let left = ctx.requirement::<i64>(0).copied().unwrap_or_default();
                    actor.send_message(&format!("{left} left."));
                    Ok(())
                })
                .build()?,
        )
        .subcommand(
            CommandNode::builder("stop")
                .description("Stop the shell")
                .executor(|actor, _| {
                    actor.send_message("Only privileged actors can stop the shell.");
                    Ok(())
                })
                .privileged_executor(|actor, _| {
                    actor.send_message("Stopping.");
                    Ok(())
                })
                .build()?,
        )
        .build()
}

/// Build the `/echo` command from the dispatcher's argument registry.
///
/// # Errors
///
/// Returns a definition error if a kind is not registered.
pub fn echo_command(dispatcher: &Dispatcher) -> Result<CommandNode, DefinitionError> {
    let registry = dispatcher.arguments();
    CommandNode::builder("echo")
        .alias("say")
        .description("Repeat a message")
        .required_kind("message", "string", registry)
        .optional_kind("times", "integer", registry)
        .executor(|actor, ctx| {
            let message = string_arg(ctx, "message")?;
            let times = ctx.get::<i64>("times")?.copied().unwrap_or(1);
            for _ in 0..times.clamp(0, 10) {
                actor.send_message(&message);
            }
            Ok(())
        })
        .build()
}

/// A dispatcher with every sample command registered.
///
/// # Errors
///
/// Returns the first definition or registration error.
pub fn dispatcher(config: DispatcherConfig) -> Result<Dispatcher, DefinitionError> {
    let mut dispatcher = Dispatcher::builder().config(config).build();
    dispatcher.register(base_command()?)?;
    let echo = echo_command(&dispatcher)?;
    dispatcher.register(echo)?;
    Ok(dispatcher)
}
