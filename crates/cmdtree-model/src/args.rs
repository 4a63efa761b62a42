//! Built-in argument types

use crate::actor::Actor;
use crate::case::{eq_ignore_case, fold_case, starts_with_ignore_case};
use crate::argument::{Argument, InvalidInput};
use crate::context::{ExecutionContext, RawArgs};
use crate::node::CommandNode;

const NOT_A_NUMBER: &str = "not_a_number";
const TOO_SMALL: &str = "too_small";
const TOO_LARGE: &str = "too_large";

/// Accepts any single token as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringArg;

impl Argument for StringArg {
    type Value = String;

    fn parse(
        &self,
        _actor: &dyn Actor,
        raw: &str,
        _node: &CommandNode,
        _index: usize,
        _context: &ExecutionContext,
    ) -> Result<String, InvalidInput> {
        Ok(raw.to_string())
    }
}

/// Signed 64-bit integer with optional inclusive bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerArg {
    min: Option<i64>,
    max: Option<i64>,
}

impl IntegerArg {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range(min: i64, max: i64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_least(min: i64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }
}

impl Argument for IntegerArg {
    type Value = i64;

    fn parse(
        &self,
        _actor: &dyn Actor,
        raw: &str,
        _node: &CommandNode,
        _index: usize,
        _context: &ExecutionContext,
    ) -> Result<i64, InvalidInput> {
        let value: i64 = raw
            .parse()
            .map_err(|_| InvalidInput::with_reason(NOT_A_NUMBER))?;
        if self.min.is_some_and(|min| value < min) {
            return Err(InvalidInput::with_reason(TOO_SMALL));
        }
        if self.max.is_some_and(|max| value > max) {
            return Err(InvalidInput::with_reason(TOO_LARGE));
        }
        Ok(value)
    }

    fn on_invalid(
        &self,
        actor: &dyn Actor,
        raw: &str,
        node: &CommandNode,
        index: usize,
        _context: &ExecutionContext,
        error: &InvalidInput,
    ) {
        let name = node.argument_name(index);
        let message = match (error.reason(), self.min, self.max) {
            (Some(TOO_SMALL), Some(min), _) => format!("<{name}> must be at least {min}."),
            (Some(TOO_LARGE), _, Some(max)) => format!("<{name}> must be at most {max}."),
            _ => format!("'{raw}' is not a whole number."),
        };
        actor.send_message(&message);
    }
}

/// Finite 64-bit float with optional inclusive bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalArg {
    min: Option<f64>,
    max: Option<f64>,
}

impl DecimalArg {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }
}

impl Argument for DecimalArg {
    type Value = f64;

    fn parse(
        &self,
        _actor: &dyn Actor,
        raw: &str,
        _node: &CommandNode,
        _index: usize,
        _context: &ExecutionContext,
    ) -> Result<f64, InvalidInput> {
        let value: f64 = raw
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite())
            .ok_or_else(|| InvalidInput::with_reason(NOT_A_NUMBER))?;
        if self.min.is_some_and(|min| value < min) {
            return Err(InvalidInput::with_reason(TOO_SMALL));
        }
        if self.max.is_some_and(|max| value > max) {
            return Err(InvalidInput::with_reason(TOO_LARGE));
        }
        Ok(value)
    }

    fn on_invalid(
        &self,
        actor: &dyn Actor,
        raw: &str,
        node: &CommandNode,
        index: usize,
        _context: &ExecutionContext,
        error: &InvalidInput,
    ) {
        let name = node.argument_name(index);
        let message = match (error.reason(), self.min, self.max) {
            (Some(TOO_SMALL), Some(min), _) => format!("<{name}> must be at least {min}."),
            (Some(TOO_LARGE), _, Some(max)) => format!("<{name}> must be at most {max}."),
            _ => format!("'{raw}' is not a number."),
        };
        actor.send_message(&message);
    }
}

/// `true`/`false`, also accepting `yes`/`no` and `on`/`off`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanArg;

impl Argument for BooleanArg {
    type Value = bool;

    fn parse(
        &self,
        _actor: &dyn Actor,
        raw: &str,
        _node: &CommandNode,
        _index: usize,
        _context: &ExecutionContext,
    ) -> Result<bool, InvalidInput> {
        match fold_case(raw).as_str() {
            "true" | "yes" | "on" => Ok(true),
            "false" | "no" | "off" => Ok(false),
            _ => Err(InvalidInput::new()),
        }
    }

    fn on_invalid(
        &self,
        actor: &dyn Actor,
        raw: &str,
        _node: &CommandNode,
        _index: usize,
        _context: &ExecutionContext,
        _error: &InvalidInput,
    ) {
        actor.send_message(&format!("'{raw}' is not true or false."));
    }

    fn suggest(
        &self,
        _actor: &dyn Actor,
        partial: &str,
        _node: &CommandNode,
        _index: usize,
        _raw: &RawArgs,
    ) -> Vec<String> {
        ["true", "false"]
            .into_iter()
            .filter(|candidate| starts_with_ignore_case(candidate, partial))
            .map(str::to_string)
            .collect()
    }
}

/// One of a fixed set of choices, matched case-insensitively.
///
/// The parsed value is the choice as declared, not as typed.
#[derive(Debug, Clone, Default)]
pub struct ChoiceArg {
    choices: Vec<String>,
}

impl ChoiceArg {
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }
}

impl Argument for ChoiceArg {
    type Value = String;

    fn parse(
        &self,
        _actor: &dyn Actor,
        raw: &str,
        _node: &CommandNode,
        _index: usize,
        _context: &ExecutionContext,
    ) -> Result<String, InvalidInput> {
        self.choices
            .iter()
            .find(|choice| eq_ignore_case(choice, raw))
            .cloned()
            .ok_or_else(InvalidInput::new)
    }

    fn on_invalid(
        &self,
        actor: &dyn Actor,
        raw: &str,
        node: &CommandNode,
        index: usize,
        _context: &ExecutionContext,
        _error: &InvalidInput,
    ) {
        actor.send_message(&format!(
            "'{raw}' is not a valid <{}>. Choose one of: {}",
            node.argument_name(index),
            self.choices.join(", ")
        ));
    }

    fn suggest(
        &self,
        _actor: &dyn Actor,
        partial: &str,
        _node: &CommandNode,
        _index: usize,
        _raw: &RawArgs,
    ) -> Vec<String> {
        self.choices
            .iter()
            .filter(|choice| starts_with_ignore_case(choice, partial))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestActor;
    use std::sync::Arc;

    fn fixture() -> (TestActor, Arc<CommandNode>, ExecutionContext) {
        let node = Arc::new(
            CommandNode::builder("n")
                .required_arg("value", StringArg)
                .build()
                .unwrap(),
        );
        let ctx = ExecutionContext::new(Arc::clone(&node), Vec::new());
        (TestActor::new("tester"), node, ctx)
    }

    #[test]
    fn test_integer_bounds_and_reasons() {
        let (actor, node, ctx) = fixture();
        let arg = IntegerArg::range(1, 10);

        assert_eq!(arg.parse(&actor, "5", &node, 0, &ctx), Ok(5));
        assert_eq!(
            arg.parse(&actor, "0", &node, 0, &ctx).unwrap_err().reason(),
            Some(TOO_SMALL)
        );
        assert_eq!(
            arg.parse(&actor, "11", &node, 0, &ctx).unwrap_err().reason(),
            Some(TOO_LARGE)
        );
        let err = arg.parse(&actor, "five", &node, 0, &ctx).unwrap_err();
        assert_eq!(err.reason(), Some(NOT_A_NUMBER));

        arg.on_invalid(&actor, "0", &node, 0, &ctx, &InvalidInput::with_reason(TOO_SMALL));
        assert_eq!(actor.last_message().as_deref(), Some("<value> must be at least 1."));
    }

    #[test]
    fn test_decimal_rejects_non_finite() {
        let (actor, node, ctx) = fixture();
        let arg = DecimalArg::new();
        assert_eq!(arg.parse(&actor, "2.5", &node, 0, &ctx), Ok(2.5));
        assert!(arg.parse(&actor, "NaN", &node, 0, &ctx).is_err());
        assert!(arg.parse(&actor, "inf", &node, 0, &ctx).is_err());
    }

    #[test]
    fn test_boolean_forms_and_suggestions() {
        let (actor, node, ctx) = fixture();
        assert_eq!(BooleanArg.parse(&actor, "YES", &node, 0, &ctx), Ok(true));
        assert_eq!(BooleanArg.parse(&actor, "off", &node, 0, &ctx), Ok(false));
        assert!(BooleanArg.parse(&actor, "maybe", &node, 0, &ctx).is_err());
        assert_eq!(
            BooleanArg.suggest(&actor, "T", &node, 0, &RawArgs::new()),
            vec!["true"]
        );
    }

    #[test]
    fn test_choice_returns_declared_casing() {
        let (actor, node, ctx) = fixture();
        let arg = ChoiceArg::new(["Survival", "Creative", "Spectator"]);
        assert_eq!(
            arg.parse(&actor, "creative", &node, 0, &ctx),
            Ok("Creative".to_string())
        );
        assert!(arg.parse(&actor, "hardcore", &node, 0, &ctx).is_err());
        assert_eq!(
            arg.suggest(&actor, "s", &node, 0, &RawArgs::new()),
            vec!["Survival", "Spectator"]
        );
        assert_eq!(arg.suggest(&actor, "", &node, 0, &RawArgs::new()).len(), 3);
    }
}
