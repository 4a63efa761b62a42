//! Depth-first resolution of a token sequence against a command tree.
//!
//! Permission denials are returned as soon as they are seen, at any depth and
//! ahead of any usage failure. Usage failures from sibling variants have no
//! precedence among themselves: the last one recorded is reported.

use std::sync::Arc;

use cmdtree_model::{Actor, CommandNode};
use tracing::trace;

use crate::outcome::Resolution;

/// Resolve `tokens` starting at `root`.
pub fn resolve(actor: &dyn Actor, root: &Arc<CommandNode>, tokens: &[String]) -> Resolution {
    resolve_from(actor, root, tokens, &[])
}

fn resolve_from(
    actor: &dyn Actor,
    node: &Arc<CommandNode>,
    tokens: &[String],
    ancestors: &[Arc<CommandNode>],
) -> Resolution {
    if !node.can_access(actor) {
        return Resolution::MissingPermission {
            node: Arc::clone(node),
        };
    }

    let mut path = ancestors.to_vec();
    path.push(Arc::clone(node));

    let matched = tokens
        .split_first()
        .and_then(|(first, rest)| Some((node.subcommands().variants(first)?, rest)));

    if let Some((variants, rest)) = matched {
        let mut best: Option<Resolution> = None;

        for variant in variants {
            if !variant.can_access(actor) {
                trace!(node = %variant.name(), "Access gate rejected actor");
                return Resolution::MissingPermission {
                    node: Arc::clone(variant),
                };
            }

            if variant.accepts(rest.len()) && variant.has_executor() {
                let mut success_path = path.clone();
                success_path.push(Arc::clone(variant));
                return Resolution::Success {
                    path: success_path,
                    remaining: rest.to_vec(),
                };
            }

            if variant.has_subcommands() {
                match resolve_from(actor, variant, rest, &path) {
                    usage @ Resolution::UsageError { .. } => best = Some(usage),
                    terminal => return terminal,
                }
            } else {
                best = Some(Resolution::UsageError {
                    path: path.clone(),
                    failed: Arc::clone(variant),
                    remaining: rest.to_vec(),
                });
            }
        }

        return best.unwrap_or_else(|| Resolution::UsageError {
            path: ancestors.to_vec(),
            failed: Arc::clone(node),
            remaining: tokens.to_vec(),
        });
    }

    if node.has_executor() && node.accepts(tokens.len()) {
        Resolution::Success {
            path,
            remaining: tokens.to_vec(),
        }
    } else {
        Resolution::UsageError {
            path: ancestors.to_vec(),
            failed: Arc::clone(node),
            remaining: tokens.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdtree_model::StringArg;
    use cmdtree_model::test_support::TestActor;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    fn leaf(name: &str, args: usize) -> CommandNode {
        let mut builder = CommandNode::builder(name).executor(|_, _| Ok(()));
        for i in 0..args {
            builder = builder.required_arg(format!("a{i}"), StringArg);
        }
        builder.build().unwrap()
    }

    fn gated_leaf(name: &str, args: usize, permission: &str) -> CommandNode {
        let mut builder = CommandNode::builder(name)
            .permission(permission)
            .executor(|_, _| Ok(()));
        for i in 0..args {
            builder = builder.required_arg(format!("a{i}"), StringArg);
        }
        builder.build().unwrap()
    }

    fn path_names(path: &[Arc<CommandNode>]) -> Vec<&str> {
        path.iter().map(|node| node.name()).collect()
    }

    #[test]
    fn test_root_gate_checked_first() {
        let root = Arc::new(
            CommandNode::builder("base")
                .permission("base")
                .subcommand(leaf("list", 0))
                .build()
                .unwrap(),
        );
        let result = resolve(&TestActor::new("u"), &root, &tokens(&["list"]));
        assert!(matches!(result, Resolution::MissingPermission { node } if node.name() == "base"));
    }

    #[test]
    fn test_arity_overloads_select_matching_variant() {
        let root = Arc::new(
            CommandNode::builder("base")
                .subcommand(leaf("set", 2))
                .subcommand(leaf("set", 3))
                .build()
                .unwrap(),
        );
        let actor = TestActor::unrestricted("u");

        for count in [2, 3] {
            let mut input = vec!["set".to_string()];
            input.extend((0..count).map(|i| i.to_string()));
            match resolve(&actor, &root, &input) {
                Resolution::Success { path, remaining } => {
                    assert_eq!(path_names(&path), vec!["base", "set"]);
                    assert_eq!(path[1].max_args(), count);
                    assert_eq!(remaining.len(), count);
                }
                other => panic!("expected success, got {other:?}"),
            }
        }

        for count in [1, 4] {
            let mut input = vec!["set".to_string()];
            input.extend((0..count).map(|i| i.to_string()));
            assert!(matches!(
                resolve(&actor, &root, &input),
                Resolution::UsageError { .. }
            ));
        }
    }

    #[test]
    fn test_denied_variant_short_circuits_later_granted_sibling() {
        // Arity 2 is denied and iterated first; arity 3 would be granted.
        let root = Arc::new(
            CommandNode::builder("base")
                .subcommand(gated_leaf("set", 2, "set.two"))
                .subcommand(gated_leaf("set", 3, "set.three"))
                .build()
                .unwrap(),
        );
        let actor = TestActor::new("u").with_permission("set.three");

        let result = resolve(&actor, &root, &tokens(&["set", "a", "b", "c"]));
        assert!(matches!(result, Resolution::MissingPermission { node } if node.max_args() == 2));
    }

    #[test]
    fn test_granted_variant_tried_before_denied_sibling() {
        let root = Arc::new(
            CommandNode::builder("base")
                .subcommand(gated_leaf("set", 2, "set.two"))
                .subcommand(gated_leaf("set", 3, "set.three"))
                .build()
                .unwrap(),
        );
        let actor = TestActor::new("u").with_permission("set.two");

        let ok = resolve(&actor, &root, &tokens(&["set", "a", "b"]));
        assert!(ok.is_success());

        let denied = resolve(&actor, &root, &tokens(&["set", "a", "b", "c"]));
        assert!(matches!(denied, Resolution::MissingPermission { node } if node.max_args() == 3));
    }

    #[test]
    fn test_missing_argument_reports_deepest_node() {
        let root = Arc::new(
            CommandNode::builder("base")
                .subcommand(
                    CommandNode::builder("create")
                        .required_arg("name", StringArg)
                        .executor(|_, _| Ok(()))
                        .build()
                        .unwrap(),
                )
                .build()
                .unwrap(),
        );

        match resolve(&TestActor::unrestricted("u"), &root, &tokens(&["create"])) {
            Resolution::UsageError {
                path,
                failed,
                remaining,
            } => {
                assert_eq!(failed.name(), "create");
                assert_eq!(path_names(&path), vec!["base"]);
                assert!(remaining.is_empty());
            }
            other => panic!("expected usage error, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_usage_error_keeps_full_ancestry() {
        let root = Arc::new(
            CommandNode::builder("base")
                .subcommand(
                    CommandNode::builder("member")
                        .subcommand(leaf("add", 1))
                        .build()
                        .unwrap(),
                )
                .build()
                .unwrap(),
        );

        match resolve(
            &TestActor::unrestricted("u"),
            &root,
            &tokens(&["member", "add"]),
        ) {
            Resolution::UsageError { path, failed, .. } => {
                assert_eq!(failed.name(), "add");
                assert_eq!(path_names(&path), vec!["base", "member"]);
            }
            other => panic!("expected usage error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_token_falls_back_to_root_arguments() {
        let root = Arc::new(
            CommandNode::builder("msg")
                .required_arg("target", StringArg)
                .subcommand(leaf("toggle", 0))
                .executor(|_, _| Ok(()))
                .build()
                .unwrap(),
        );
        let actor = TestActor::unrestricted("u");

        match resolve(&actor, &root, &tokens(&["steve"])) {
            Resolution::Success { path, remaining } => {
                assert_eq!(path_names(&path), vec!["msg"]);
                assert_eq!(remaining, tokens(&["steve"]));
            }
            other => panic!("expected success, got {other:?}"),
        }

        let result = resolve(&actor, &root, &[]);
        assert!(
            matches!(result, Resolution::UsageError { failed, path, .. } if failed.name() == "msg" && path.is_empty())
        );
    }

    #[test]
    fn test_subcommand_labels_match_case_insensitively() {
        let root = Arc::new(
            CommandNode::builder("base")
                .subcommand(
                    CommandNode::builder("remove")
                        .alias("rm")
                        .executor(|_, _| Ok(()))
                        .build()
                        .unwrap(),
                )
                .build()
                .unwrap(),
        );
        let actor = TestActor::unrestricted("u");
        assert!(resolve(&actor, &root, &tokens(&["RM"])).is_success());
        assert!(resolve(&actor, &root, &tokens(&["Remove"])).is_success());
    }

    #[test]
    fn test_variant_without_executor_recurses_into_children() {
        let root = Arc::new(
            CommandNode::builder("base")
                .subcommand(
                    CommandNode::builder("config")
                        .subcommand(leaf("reload", 0))
                        .build()
                        .unwrap(),
                )
                .build()
                .unwrap(),
        );
        let actor = TestActor::unrestricted("u");

        let result = resolve(&actor, &root, &tokens(&["config", "reload"]));
        assert_eq!(result.node().map(|node| node.name()), Some("reload"));

        // "config" alone has no executor: usage error at config.
        match resolve(&actor, &root, &tokens(&["config"])) {
            Resolution::UsageError { failed, .. } => assert_eq!(failed.name(), "config"),
            other => panic!("expected usage error, got {other:?}"),
        }
    }
}
