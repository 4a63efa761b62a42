use std::fmt;
use std::sync::Arc;

use cmdtree_model::CommandNode;

/// Terminal result of one resolution attempt.
#[derive(Clone)]
pub enum Resolution {
    /// `path` runs from the root to the resolved node inclusive;
    /// `remaining` are the tokens left for its arguments.
    Success {
        path: Vec<Arc<CommandNode>>,
        remaining: Vec<String>,
    },
    /// The actor failed the access gate of `node`.
    MissingPermission { node: Arc<CommandNode> },
    /// No name/arity match. `path` holds the ancestors of `failed`, root
    /// first, without `failed` itself.
    UsageError {
        path: Vec<Arc<CommandNode>>,
        failed: Arc<CommandNode>,
        remaining: Vec<String>,
    },
}

impl Resolution {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The resolved node on success
    pub fn node(&self) -> Option<&Arc<CommandNode>> {
        match self {
            Self::Success { path, .. } => path.last(),
            _ => None,
        }
    }
}

fn names(path: &[Arc<CommandNode>]) -> Vec<&str> {
    path.iter().map(|node| node.name()).collect()
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { path, remaining } => f
                .debug_struct("Success")
                .field("path", &names(path))
                .field("remaining", remaining)
                .finish(),
            Self::MissingPermission { node } => f
                .debug_struct("MissingPermission")
                .field("node", &node.name())
                .finish(),
            Self::UsageError {
                path,
                failed,
                remaining,
            } => f
                .debug_struct("UsageError")
                .field("path", &names(path))
                .field("failed", &failed.name())
                .field("remaining", remaining)
                .finish(),
        }
    }
}

/// Which single stage ended a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The executor ran and returned normally
    Executed,
    /// An access gate rejected the actor
    AccessDenied { command: String },
    /// The tokens matched no node; the usage renderer was invoked
    Usage { command: String },
    /// An argument parser rejected its token
    InvalidArgument { argument: String, index: usize },
    /// A requirement was not met
    RequirementNotMet { index: usize },
    /// The resolved node has no executor for this kind of actor
    UnsupportedActor { command: String },
    /// The executor returned an error or panicked
    ExecutorFailed { command: String },
    /// No root command answers to the label
    UnknownCommand { label: String },
}

impl DispatchOutcome {
    pub fn is_executed(&self) -> bool {
        matches!(self, Self::Executed)
    }
}
