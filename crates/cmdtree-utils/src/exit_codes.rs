//! Process exit codes for the cmdtree shell
//!
//! The library never exits the process. These codes are used by the demo
//! shell binary and by hosts that want consistent codes for startup errors.

use crate::error::CmdtreeError;

/// Type-safe process exit code.
///
/// ```rust
/// use cmdtree_utils::error::{CmdtreeError, ConfigError};
/// use cmdtree_utils::exit_codes::ExitCode;
///
/// let err = CmdtreeError::Config(ConfigError::InvalidFile("bad".to_string()));
/// assert_eq!(err.to_exit_code(), ExitCode::CLI_ARGS);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Every line executed successfully
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - general failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// Invalid command-line arguments or configuration
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// At least one dispatched line did not execute
    pub const COMMAND_FAILED: ExitCode = ExitCode(3);

    /// Get the numeric exit code value.
    ///
    /// Use this with `std::process::exit()`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl CmdtreeError {
    /// Exit code a shell should use when this error aborts startup
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) => ExitCode::CLI_ARGS,
            Self::Definition(_) | Self::Context(_) | Self::Io(_) => ExitCode::INTERNAL,
        }
    }
}
