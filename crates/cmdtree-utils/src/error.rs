use thiserror::Error;

/// Library-level error type for cmdtree.
///
/// `CmdtreeError` groups every error a host can receive from the library:
///
/// | Category | Description |
/// |----------|-------------|
/// | `Config` | Configuration file or value errors |
/// | `Definition` | Invalid command definitions at build/registration time |
/// | `Context` | Execution context queried for something that was never declared |
/// | `Io` | Underlying I/O failures |
///
/// Runtime dispatch failures (permission denial, usage errors, invalid
/// arguments, unmet requirements, executor faults) are NOT errors: they are
/// reported as dispatch outcomes and routed to the actor.
#[derive(Error, Debug)]
pub enum CmdtreeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Command definition error: {0}")]
    Definition(#[from] DefinitionError),

    #[error("Execution context error: {0}")]
    Context(#[from] ContextError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for providing user-friendly error reporting with suggestions
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get an actionable suggestion, if there is one
    fn suggestion(&self) -> Option<String>;
}

/// Configuration-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },

    #[error("Failed to read configuration file {path}: {reason}")]
    ReadFailed { path: String, reason: String },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile(reason) => {
                format!("Configuration file has invalid format: {reason}")
            }
            Self::InvalidValue { key, value } => {
                format!("Configuration '{key}' has invalid value: {value}")
            }
            Self::NotFound { path } => format!("Configuration file not found: {path}"),
            Self::ReadFailed { path, reason } => {
                format!("Could not read configuration file {path}: {reason}")
            }
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Self::InvalidFile(_) => Some(
                "Configuration files must be valid TOML with optional [messages], [completion] and [logging] sections."
                    .to_string(),
            ),
            Self::InvalidValue { key, .. } => {
                Some(format!("Check the value of '{key}' in your configuration file."))
            }
            Self::NotFound { .. } => Some(
                "Unset CMDTREE_CONFIG or point it at an existing file.".to_string(),
            ),
            Self::ReadFailed { .. } => None,
        }
    }
}

/// Errors detected while building or registering command definitions.
///
/// These are startup-time failures: a tree that fails to build never reaches
/// dispatch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("Command name must not be empty")]
    EmptyName,

    #[error("Invalid command name '{name}': names must not contain whitespace")]
    InvalidName { name: String },

    #[error("Invalid alias '{alias}' for command '{command}'")]
    InvalidAlias { command: String, alias: String },

    #[error("Invalid argument name '{argument}' in command '{command}'")]
    InvalidArgumentName { command: String, argument: String },

    #[error("Argument '{argument}' is declared more than once in command '{command}'")]
    DuplicateArgument { command: String, argument: String },

    #[error("Unknown argument kind '{kind}' for argument '{argument}' in command '{command}'")]
    UnknownArgumentKind {
        command: String,
        argument: String,
        kind: String,
    },

    #[error("A root command named '{name}' is already registered")]
    DuplicateCommand { name: String },
}

/// Programming errors raised when an execution context is queried
/// inconsistently with the command definition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("Command '{command}' declares no argument named '{name}'")]
    UndeclaredArgument { command: String, name: String },

    #[error("Argument '{name}' of command '{command}' does not hold a value of type {expected}")]
    TypeMismatch {
        command: String,
        name: String,
        expected: &'static str,
    },
}
