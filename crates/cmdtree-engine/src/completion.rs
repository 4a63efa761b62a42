//! Token-wise completion
//!
//! Completion walks the tree the way the resolver does, but collects
//! suggestions from every branch instead of stopping at the first match. An
//! argument's suggestion function runs at most once per request for a given
//! dedup key, so arity-overloaded siblings sharing an argument type at the
//! same position do not multiply the suggestion cost.

use std::any::TypeId;
use std::collections::HashSet;

use cmdtree_config::{CompletionConfig, DedupStrategy};
use cmdtree_model::{
    Actor, ArgumentSlot, CommandNode, RawArgs, eq_ignore_case, sort_ignore_case,
    starts_with_ignore_case,
};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SuggestKey {
    Type(TypeId, usize),
    Instance(usize, usize),
}

impl SuggestKey {
    fn new(strategy: DedupStrategy, slot: &ArgumentSlot, position: usize) -> Self {
        match strategy {
            DedupStrategy::PerType => Self::Type(slot.implementation_type(), position),
            DedupStrategy::PerInstance => Self::Instance(slot.instance_id(), position),
        }
    }
}

struct Completer<'a> {
    actor: &'a dyn Actor,
    strategy: DedupStrategy,
    seen: HashSet<SuggestKey>,
}

/// Suggestions for the last of `tokens`, typed after `node`'s own label.
///
/// The last token is the partial being typed and may be empty. Duplicate
/// strings are dropped keeping the first occurrence, and the result is
/// truncated to `max_suggestions` when configured.
pub fn complete(
    actor: &dyn Actor,
    node: &CommandNode,
    tokens: &[String],
    config: &CompletionConfig,
) -> Vec<String> {
    let mut completer = Completer {
        actor,
        strategy: config.dedup,
        seen: HashSet::new(),
    };
    let suggestions = completer.walk(node, tokens, 0);

    let mut unique = HashSet::new();
    let mut merged: Vec<String> = suggestions
        .into_iter()
        .filter(|suggestion| unique.insert(suggestion.clone()))
        .collect();
    if let Some(max) = config.max_suggestions {
        merged.truncate(max);
    }
    merged
}

impl Completer<'_> {
    fn walk(&mut self, node: &CommandNode, tokens: &[String], depth: usize) -> Vec<String> {
        if !node.can_access(self.actor) {
            return Vec::new();
        }
        let Some((first, rest)) = tokens.split_first() else {
            return Vec::new();
        };

        let mut suggestions = Vec::new();

        if rest.is_empty() {
            suggestions.extend(self.subcommand_labels(node, first));
        }

        if tokens.len() <= node.max_args() {
            suggestions.extend(self.argument_suggestions(node, tokens, depth));
        }

        if !rest.is_empty() {
            if let Some(variants) = node.subcommands().variants(first) {
                for variant in variants {
                    let nested = self.walk(variant, rest, depth + 1);
                    suggestions.extend(nested);
                }
            }
        }

        suggestions
    }

    fn subcommand_labels(&self, node: &CommandNode, partial: &str) -> Vec<String> {
        let table = node.subcommands();
        let mut labels: Vec<String> = table
            .tokens()
            .filter(|token| starts_with_ignore_case(token, partial))
            .filter_map(|token| {
                let variants = table.variants(token)?;
                let visible = variants
                    .iter()
                    .find(|variant| variant.can_access(self.actor))?;
                let label = visible
                    .labels()
                    .find(|label| eq_ignore_case(label, token))
                    .unwrap_or(token);
                Some(label.to_string())
            })
            .collect();
        sort_ignore_case(&mut labels);
        labels
    }

    fn argument_suggestions(
        &mut self,
        node: &CommandNode,
        tokens: &[String],
        depth: usize,
    ) -> Vec<String> {
        let index = tokens.len() - 1;
        let Some(slot) = node.argument(index) else {
            return Vec::new();
        };

        let key = SuggestKey::new(self.strategy, slot, depth + index);
        if !self.seen.insert(key) {
            trace!(
                node = %node.name(),
                argument = %slot.name(),
                "Suggestions already collected for this argument"
            );
            return Vec::new();
        }

        let raw = RawArgs::from_declared(node, tokens);
        let partial = tokens[index].as_str();
        let mut suggestions = slot.suggest(self.actor, partial, node, index, &raw);
        sort_ignore_case(&mut suggestions);
        suggestions
    }
}
