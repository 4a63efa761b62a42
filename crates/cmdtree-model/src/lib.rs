//! Command tree model for cmdtree
//!
//! A command tree is built once at startup from [`CommandBuilder`]s and is
//! read-only afterwards. Each [`CommandNode`] carries its access gate, typed
//! arguments, requirements, executors and an arity-indexed table of
//! subcommands. An [`ExecutionContext`] threads raw tokens, parsed values and
//! requirement results through one invocation.

pub mod actor;
pub mod case;
pub mod args;
pub mod argument;
pub mod builder;
pub mod context;
pub mod node;
pub mod registry;
pub mod requirement;
pub mod subcommands;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use actor::{AccessGate, Actor};
pub use case::{eq_ignore_case, fold_case, sort_ignore_case, starts_with_ignore_case};
pub use args::{BooleanArg, ChoiceArg, DecimalArg, IntegerArg, StringArg};
pub use argument::{ArgValue, Argument, ArgumentSlot, InvalidInput};
pub use builder::CommandBuilder;
pub use context::{ArgKey, ExecutionContext, RawArgs};
pub use node::{CommandNode, Executor};
pub use registry::ArgumentRegistry;
pub use requirement::{NotMet, Requirement, RequirementSlot};
pub use subcommands::SubcommandTable;
