use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Default notice for an access gate denial
pub const DEFAULT_NO_PERMISSION: &str = "You do not have permission to use this command.";

/// Default notice for an executor fault
pub const DEFAULT_INTERNAL_ERROR: &str =
    "An internal error occurred while attempting to perform this command.";

/// Default notice when no executor fits the actor
pub const DEFAULT_UNSUPPORTED_ACTOR: &str = "This command cannot be used by you.";

/// Default notice for an unknown root label
pub const DEFAULT_UNKNOWN_COMMAND: &str = "Unknown command. Type \"help\" for help.";

/// How the completion engine decides that an argument's suggestion function
/// has already run during one completion request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DedupStrategy {
    /// Key on the argument implementation type and the absolute token position
    #[default]
    PerType,
    /// Key on the shared argument instance and the absolute token position
    PerInstance,
}

/// Fixed notices sent to actors by the dispatcher itself.
///
/// Everything else an actor sees comes from argument/requirement callbacks or
/// the usage renderer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Messages {
    pub no_permission: String,
    pub internal_error: String,
    pub unsupported_actor: String,
    pub unknown_command: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            no_permission: DEFAULT_NO_PERMISSION.to_string(),
            internal_error: DEFAULT_INTERNAL_ERROR.to_string(),
            unsupported_actor: DEFAULT_UNSUPPORTED_ACTOR.to_string(),
            unknown_command: DEFAULT_UNKNOWN_COMMAND.to_string(),
        }
    }
}

/// Completion engine settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub dedup: DedupStrategy,
    /// Truncate the merged suggestion list to this many entries
    pub max_suggestions: Option<usize>,
}

/// Logging settings consumed by hosts that install the cmdtree subscriber
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
    /// `EnvFilter` directives; `RUST_LOG` still takes precedence
    pub filter: Option<String>,
}

/// Configuration for a command dispatcher.
///
/// # Example
///
/// ```toml
/// [messages]
/// no_permission = "Nope."
///
/// [completion]
/// dedup = "per_instance"
/// max_suggestions = 50
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatcherConfig {
    pub messages: Messages,
    pub completion: CompletionConfig,
    pub logging: LoggingConfig,
}
