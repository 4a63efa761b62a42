//! End-to-end tests for the dispatch pipeline
//!
//! Tests:
//! - Round trip: parsed values are visible by index and by name
//! - Usage errors reach the usage renderer with the failed node and ancestors
//! - A failing argument stops parsing and skips requirements
//! - Requirement values keep declaration order; a failure stops later ones
//! - Executor selection for privileged actors
//! - Executor errors and panics are contained and reported generically
//! - Parsers see every raw token of the invocation

use std::sync::{Arc, Mutex, PoisonError};

use cmdtree::{
    Actor, Argument, CommandNode, DispatchOutcome, Dispatcher, DispatcherConfig, ExecutionContext,
    IntegerArg, InvalidInput, StringArg, UsageRenderer,
};
use cmdtree_model::test_support::{
    CallCounter, FailingArgument, SpyArgument, StaticRequirement, TestActor,
};

fn tokens(raw: &[&str]) -> Vec<String> {
    raw.iter().map(ToString::to_string).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct UsageCall {
    ancestors: Vec<String>,
    failed: String,
    remaining: Vec<String>,
}

#[derive(Clone, Default)]
struct RecordingRenderer {
    calls: Arc<Mutex<Vec<UsageCall>>>,
}

impl RecordingRenderer {
    fn calls(&self) -> Vec<UsageCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl UsageRenderer for RecordingRenderer {
    fn render_usage(
        &self,
        _actor: &dyn Actor,
        ancestors: &[Arc<CommandNode>],
        failed: &CommandNode,
        remaining: &[String],
    ) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(UsageCall {
                ancestors: ancestors.iter().map(|n| n.name().to_string()).collect(),
                failed: failed.name().to_string(),
                remaining: remaining.to_vec(),
            });
    }
}

/// `base create <name>`, recording the name seen by index and by name.
fn create_tree(seen: Arc<Mutex<Vec<(String, String)>>>) -> CommandNode {
    CommandNode::builder("base")
        .subcommand(
            CommandNode::builder("create")
                .required_arg("name", StringArg)
                .executor(move |_, ctx| {
                    let by_index = ctx.get::<String>(0)?.cloned().unwrap_or_default();
                    let by_name = ctx.get::<String>("name")?.cloned().unwrap_or_default();
                    seen.lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push((by_index, by_name));
                    Ok(())
                })
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}

#[test]
fn test_round_trip_create_alpha() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut dispatcher = Dispatcher::new();
    let root = dispatcher.register(create_tree(Arc::clone(&seen))).unwrap();
    let actor = TestActor::unrestricted("tester");

    let outcome = dispatcher.dispatch(&actor, &root, &tokens(&["create", "Alpha"]));

    assert_eq!(outcome, DispatchOutcome::Executed);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![("Alpha".to_string(), "Alpha".to_string())]
    );
    assert!(actor.messages().is_empty());
}

#[test]
fn test_missing_argument_renders_usage_for_create() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let renderer = RecordingRenderer::default();
    let mut dispatcher = Dispatcher::builder()
        .usage_renderer(renderer.clone())
        .build();
    dispatcher.register(create_tree(Arc::clone(&seen))).unwrap();
    let actor = TestActor::unrestricted("tester");

    let outcome = dispatcher.execute(&actor, "base", &tokens(&["create"]));

    assert_eq!(
        outcome,
        DispatchOutcome::Usage {
            command: "create".to_string()
        }
    );
    assert_eq!(
        renderer.calls(),
        vec![UsageCall {
            ancestors: vec!["base".to_string()],
            failed: "create".to_string(),
            remaining: Vec::new(),
        }]
    );
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_plain_renderer_output() {
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .register(create_tree(Arc::new(Mutex::new(Vec::new()))))
        .unwrap();
    let actor = TestActor::unrestricted("tester");

    dispatcher.execute_line(&actor, "base create");
    assert_eq!(actor.messages(), vec!["Usage: /base create <name>"]);
}

#[test]
fn test_first_argument_failure_short_circuits() {
    let failing = FailingArgument::new("nope");
    let second = CallCounter::new();
    let third = CallCounter::new();
    let requirement = StaticRequirement::<u8>::met(Some(1));

    let root = Arc::new(
        CommandNode::builder("cmd")
            .required_arg("first", failing.clone())
            .required_arg("second", SpyArgument::new(second.clone()))
            .required_arg("third", SpyArgument::new(third.clone()))
            .requirement(requirement.clone())
            .executor(|_, _| panic!("executor must not run"))
            .build()
            .unwrap(),
    );
    let actor = TestActor::unrestricted("tester");

    let outcome = Dispatcher::new().dispatch(&actor, &root, &tokens(&["a", "b", "c"]));

    assert_eq!(
        outcome,
        DispatchOutcome::InvalidArgument {
            argument: "first".to_string(),
            index: 0
        }
    );
    assert_eq!(failing.parses.get(), 1);
    assert_eq!(failing.callbacks.get(), 1);
    assert_eq!(second.get(), 0);
    assert_eq!(third.get(), 0);
    assert_eq!(requirement.evaluations.get(), 0);
    assert_eq!(actor.messages(), vec!["rejected a at 0: nope"]);
}

#[test]
fn test_middle_argument_failure_stops_later_parsers() {
    let first = CallCounter::new();
    let third = CallCounter::new();
    let root = Arc::new(
        CommandNode::builder("cmd")
            .required_arg("first", SpyArgument::new(first.clone()))
            .required_arg("second", IntegerArg::new())
            .required_arg("third", SpyArgument::new(third.clone()))
            .executor(|_, _| Ok(()))
            .build()
            .unwrap(),
    );
    let actor = TestActor::unrestricted("tester");

    let outcome = Dispatcher::new().dispatch(&actor, &root, &tokens(&["a", "two", "c"]));

    assert_eq!(
        outcome,
        DispatchOutcome::InvalidArgument {
            argument: "second".to_string(),
            index: 1
        }
    );
    assert_eq!(first.get(), 1);
    assert_eq!(third.get(), 0);
    assert_eq!(actor.messages(), vec!["'two' is not a whole number."]);
}

#[test]
fn test_requirement_values_in_declaration_order() {
    let observed = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&observed);
    let root = Arc::new(
        CommandNode::builder("cmd")
            .requirement(StaticRequirement::met(Some("first")))
            .requirement(StaticRequirement::<u32>::met(None))
            .requirement(StaticRequirement::met(Some(3_u32)))
            .executor(move |_, ctx| {
                let values = (
                    ctx.requirement_count(),
                    ctx.requirement::<&str>(0).copied(),
                    ctx.requirement::<u32>(1).copied(),
                    ctx.requirement::<u32>(2).copied(),
                );
                *sink.lock().unwrap_or_else(PoisonError::into_inner) = Some(values);
                Ok(())
            })
            .build()
            .unwrap(),
    );

    let outcome = Dispatcher::new().dispatch(&TestActor::unrestricted("tester"), &root, &[]);

    assert_eq!(outcome, DispatchOutcome::Executed);
    assert_eq!(
        *observed.lock().unwrap(),
        Some((3, Some("first"), None, Some(3)))
    );
}

#[test]
fn test_failing_requirement_stops_later_requirements() {
    let before = StaticRequirement::<u8>::met(Some(1));
    let failing = StaticRequirement::<u8>::unmet("cooldown");
    let after = StaticRequirement::<u8>::met(Some(3));
    let root = Arc::new(
        CommandNode::builder("cmd")
            .requirement(before.clone())
            .requirement(failing.clone())
            .requirement(after.clone())
            .executor(|_, _| panic!("executor must not run"))
            .build()
            .unwrap(),
    );
    let actor = TestActor::unrestricted("tester");

    let outcome = Dispatcher::new().dispatch(&actor, &root, &[]);

    assert_eq!(outcome, DispatchOutcome::RequirementNotMet { index: 1 });
    assert_eq!(before.evaluations.get(), 1);
    assert_eq!(failing.evaluations.get(), 1);
    assert_eq!(failing.callbacks.get(), 1);
    assert_eq!(after.evaluations.get(), 0);
    assert_eq!(actor.messages(), vec!["unmet: cooldown"]);
}

#[test]
fn test_privileged_actor_gets_privileged_executor() {
    let root = Arc::new(
        CommandNode::builder("stop")
            .executor(|actor, _| {
                actor.send_message("default");
                Ok(())
            })
            .privileged_executor(|actor, _| {
                actor.send_message("privileged");
                Ok(())
            })
            .build()
            .unwrap(),
    );
    let dispatcher = Dispatcher::new();

    let op = TestActor::privileged("op");
    assert!(dispatcher.dispatch(&op, &root, &[]).is_executed());
    assert_eq!(op.messages(), vec!["privileged"]);

    let user = TestActor::unrestricted("user");
    assert!(dispatcher.dispatch(&user, &root, &[]).is_executed());
    assert_eq!(user.messages(), vec!["default"]);
}

#[test]
fn test_no_executor_for_actor_is_reported() {
    let root = Arc::new(
        CommandNode::builder("op")
            .privileged_executor(|_, _| Ok(()))
            .build()
            .unwrap(),
    );
    let actor = TestActor::unrestricted("user");

    let outcome = Dispatcher::new().dispatch(&actor, &root, &[]);

    assert_eq!(
        outcome,
        DispatchOutcome::UnsupportedActor {
            command: "op".to_string()
        }
    );
    assert_eq!(
        actor.messages(),
        vec![DispatcherConfig::default().messages.unsupported_actor]
    );
}

#[test]
fn test_executor_error_and_panic_are_contained() {
    let config = DispatcherConfig::builder()
        .internal_error_message("Something broke.")
        .build()
        .unwrap();
    let mut dispatcher = Dispatcher::builder().config(config).build();
    dispatcher
        .register(
            CommandNode::builder("fail")
                .executor(|_, _| Err(anyhow::anyhow!("database password is hunter2")))
                .build()
                .unwrap(),
        )
        .unwrap();
    dispatcher
        .register(
            CommandNode::builder("boom")
                .executor(|_, _| panic!("index out of bounds"))
                .build()
                .unwrap(),
        )
        .unwrap();
    let actor = TestActor::unrestricted("tester");

    assert_eq!(
        dispatcher.execute_line(&actor, "fail"),
        DispatchOutcome::ExecutorFailed {
            command: "fail".to_string()
        }
    );
    assert_eq!(
        dispatcher.execute_line(&actor, "boom"),
        DispatchOutcome::ExecutorFailed {
            command: "boom".to_string()
        }
    );
    assert_eq!(actor.messages(), vec!["Something broke.", "Something broke."]);
}

#[test]
fn test_access_denied_uses_configured_notice() {
    let config = DispatcherConfig::builder()
        .no_permission_message("Nope.")
        .build()
        .unwrap();
    let mut dispatcher = Dispatcher::builder().config(config).build();
    dispatcher
        .register(
            CommandNode::builder("base")
                .subcommand(
                    CommandNode::builder("purge")
                        .permission("base.purge")
                        .executor(|_, _| Ok(()))
                        .build()
                        .unwrap(),
                )
                .build()
                .unwrap(),
        )
        .unwrap();
    let actor = TestActor::new("tester");

    assert_eq!(
        dispatcher.execute_line(&actor, "base purge"),
        DispatchOutcome::AccessDenied {
            command: "purge".to_string()
        }
    );
    assert_eq!(actor.messages(), vec!["Nope."]);
}

/// Parses an amount scaled by the raw `<unit>` token that follows it.
struct ScaledAmount;

impl Argument for ScaledAmount {
    type Value = i64;

    fn parse(
        &self,
        _actor: &dyn Actor,
        raw: &str,
        _node: &CommandNode,
        _index: usize,
        context: &ExecutionContext,
    ) -> Result<i64, InvalidInput> {
        let amount: i64 = raw.parse().map_err(|_| InvalidInput::new())?;
        let unit = context
            .raw("unit")
            .map_err(|e| InvalidInput::with_reason(e.to_string()))?;
        match unit {
            Some("k") => Ok(amount * 1000),
            Some(_) | None => Ok(amount),
        }
    }
}

#[test]
fn test_parser_reads_later_raw_tokens() {
    let observed = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&observed);
    let root = Arc::new(
        CommandNode::builder("pay")
            .required_arg("amount", ScaledAmount)
            .optional_arg("unit", StringArg)
            .executor(move |_, ctx| {
                *sink.lock().unwrap_or_else(PoisonError::into_inner) =
                    ctx.get::<i64>("amount")?.copied();
                Ok(())
            })
            .build()
            .unwrap(),
    );

    let outcome =
        Dispatcher::new().dispatch(&TestActor::unrestricted("t"), &root, &tokens(&["5", "k"]));

    assert_eq!(outcome, DispatchOutcome::Executed);
    assert_eq!(*observed.lock().unwrap(), Some(5000));
}

#[test]
fn test_context_exposes_parent_path() {
    let observed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&observed);
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .register(
            CommandNode::builder("base")
                .subcommand(
                    CommandNode::builder("member")
                        .subcommand(
                            CommandNode::builder("list")
                                .executor(move |_, ctx| {
                                    let mut names: Vec<String> = ctx
                                        .parent_path()
                                        .iter()
                                        .map(|n| n.name().to_string())
                                        .collect();
                                    names.push(ctx.node().name().to_string());
                                    *sink.lock().unwrap_or_else(PoisonError::into_inner) = names;
                                    Ok(())
                                })
                                .build()
                                .unwrap(),
                        )
                        .build()
                        .unwrap(),
                )
                .build()
                .unwrap(),
        )
        .unwrap();

    assert!(
        dispatcher
            .execute_line(&TestActor::unrestricted("t"), "base member list")
            .is_executed()
    );
    assert_eq!(*observed.lock().unwrap(), vec!["base", "member", "list"]);
}
