//! Foundation utilities shared by the cmdtree crates.
//!
//! - [`error`]: library error types
//! - [`exit_codes`]: process exit codes for shells embedding cmdtree
//! - [`logging`]: tracing initialisation and dispatch span helpers

pub mod error;
pub mod exit_codes;
pub mod logging;

pub use error::{CmdtreeError, ConfigError, ContextError, DefinitionError, UserFriendlyError};
pub use exit_codes::ExitCode;
