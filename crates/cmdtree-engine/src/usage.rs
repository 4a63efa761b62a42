//! Help rendering seam for usage errors
//!
//! The dispatcher formats no help text itself. On a usage error it hands the
//! failed node, its ancestors and the leftover tokens to a [`UsageRenderer`].

use std::sync::Arc;

use cmdtree_model::{Actor, CommandNode};

/// Receives every usage error the dispatcher produces.
pub trait UsageRenderer: Send + Sync {
    /// `ancestors` runs from the root down to the parent of `failed`.
    fn render_usage(
        &self,
        actor: &dyn Actor,
        ancestors: &[Arc<CommandNode>],
        failed: &CommandNode,
        remaining: &[String],
    );
}

/// Sends a one-line synopsis followed by the accessible subcommands.
///
/// ```text
/// Usage: /base create <name>
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainUsageRenderer;

impl PlainUsageRenderer {
    /// Full invocation path, e.g. `/base member add <name>`
    pub fn synopsis(ancestors: &[Arc<CommandNode>], failed: &CommandNode) -> String {
        let mut parts: Vec<String> = ancestors
            .iter()
            .map(|node| node.name().to_string())
            .collect();
        parts.push(failed.usage());
        format!("/{}", parts.join(" "))
    }
}

impl UsageRenderer for PlainUsageRenderer {
    fn render_usage(
        &self,
        actor: &dyn Actor,
        ancestors: &[Arc<CommandNode>],
        failed: &CommandNode,
        _remaining: &[String],
    ) {
        let prefix = Self::synopsis(ancestors, failed);
        let show_self = failed.has_executor() || !failed.has_subcommands();
        if show_self {
            actor.send_message(&format!("Usage: {prefix}"));
        }

        let children: Vec<&Arc<CommandNode>> = failed
            .subcommands()
            .nodes()
            .into_iter()
            .filter(|child| child.can_access(actor))
            .collect();
        if children.is_empty() {
            return;
        }

        let mut path: Vec<String> = ancestors
            .iter()
            .map(|node| node.name().to_string())
            .collect();
        path.push(failed.name().to_string());
        let base = path.join(" ");

        if !show_self {
            actor.send_message("Usage:");
        }
        for child in children {
            match child.description() {
                Some(description) => {
                    actor.send_message(&format!("  /{base} {} - {description}", child.usage()));
                }
                None => actor.send_message(&format!("  /{base} {}", child.usage())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdtree_model::StringArg;
    use cmdtree_model::test_support::TestActor;

    #[test]
    fn test_leaf_synopsis() {
        let base = Arc::new(CommandNode::builder("base").build().unwrap());
        let create = CommandNode::builder("create")
            .required_arg("name", StringArg)
            .optional_arg("owner", StringArg)
            .executor(|_, _| Ok(()))
            .build()
            .unwrap();

        let actor = TestActor::unrestricted("u");
        PlainUsageRenderer.render_usage(&actor, &[base], &create, &[]);
        assert_eq!(
            actor.messages(),
            vec!["Usage: /base create <name> [owner]"]
        );
    }

    #[test]
    fn test_group_lists_only_accessible_children() {
        let member = CommandNode::builder("member")
            .subcommand(
                CommandNode::builder("add")
                    .description("Add a member")
                    .required_arg("name", StringArg)
                    .executor(|_, _| Ok(()))
                    .build()
                    .unwrap(),
            )
            .subcommand(
                CommandNode::builder("purge")
                    .permission("member.purge")
                    .executor(|_, _| Ok(()))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        let base = Arc::new(CommandNode::builder("base").build().unwrap());

        let actor = TestActor::new("u");
        PlainUsageRenderer.render_usage(&actor, &[base], &member, &[]);
        assert_eq!(
            actor.messages(),
            vec!["Usage:", "  /base member add <name> - Add a member"]
        );
    }
}
