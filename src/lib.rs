//! cmdtree - command tree resolution, dispatch and tab completion
//!
//! cmdtree routes a sequence of tokens typed by an actor to one node of a
//! command tree, parses its typed arguments, checks its requirements and runs
//! its executor. The same tree drives tab completion.
//!
//! The crate is a facade over the workspace crates:
//!
//! - `cmdtree-model`: [`CommandNode`], [`CommandBuilder`], [`Argument`],
//!   [`Requirement`], [`ExecutionContext`]
//! - `cmdtree-engine`: [`resolve`], [`Dispatcher`], [`complete`]
//! - `cmdtree-config`: [`DispatcherConfig`]
//! - `cmdtree-utils`: errors, exit codes and logging
//!
//! # Quick Start
//!
//! ```rust
//! use cmdtree::{CommandNode, DispatchOutcome, Dispatcher, StringArg};
//! # use cmdtree::Actor;
//! # struct Console;
//! # impl Actor for Console {
//! #     fn name(&self) -> &str { "console" }
//! #     fn has_permission(&self, _: &str) -> bool { true }
//! #     fn send_message(&self, message: &str) { println!("{message}"); }
//! # }
//!
//! let create = CommandNode::builder("create")
//!     .required_arg("name", StringArg)
//!     .executor(|actor, ctx| {
//!         let name = ctx.get::<String>("name")?.cloned().unwrap_or_default();
//!         actor.send_message(&format!("Created {name}."));
//!         Ok(())
//!     })
//!     .build()?;
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.register(CommandNode::builder("base").subcommand(create).build()?)?;
//!
//! assert_eq!(
//!     dispatcher.execute_line(&Console, "/base create Alpha"),
//!     DispatchOutcome::Executed
//! );
//! assert_eq!(dispatcher.complete_line(&Console, "base c"), vec!["create"]);
//! # Ok::<(), cmdtree::DefinitionError>(())
//! ```
//!
//! # Configuration
//!
//! Actor-facing notices and completion behaviour are configured through
//! [`DispatcherConfig`], loaded from TOML:
//!
//! ```toml
//! [messages]
//! no_permission = "You cannot do that."
//!
//! [completion]
//! dedup = "per_instance"
//! max_suggestions = 50
//! ```

pub mod cli;
pub mod demo;

pub use cmdtree_config::{
    CONFIG_ENV_VAR, CompletionConfig, DedupStrategy, DispatcherConfig, DispatcherConfigBuilder,
    LoggingConfig, Messages,
};
pub use cmdtree_engine::{
    DispatchOutcome, Dispatcher, DispatcherBuilder, PlainUsageRenderer, Resolution, UsageRenderer,
    complete, resolve,
};
pub use cmdtree_model::{
    AccessGate, Actor, ArgKey, ArgValue, Argument, ArgumentRegistry, ArgumentSlot, BooleanArg,
    ChoiceArg, CommandBuilder, CommandNode, DecimalArg, ExecutionContext, Executor, IntegerArg,
    InvalidInput, NotMet, RawArgs, Requirement, RequirementSlot, StringArg, SubcommandTable,
};
pub use cmdtree_utils::error::{
    CmdtreeError, ConfigError, ContextError, DefinitionError, UserFriendlyError,
};
pub use cmdtree_utils::exit_codes::ExitCode;

/// Logging setup for hosts that want the cmdtree subscriber
pub mod logging {
    pub use cmdtree_utils::logging::{
        DEFAULT_FILTER, VERBOSE_FILTER, build_filter, init_tracing,
    };
}

/// Test doubles, available with the `test-utils` feature
#[cfg(feature = "test-utils")]
pub mod test_support {
    pub use cmdtree_model::test_support::*;
}
