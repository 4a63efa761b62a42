//! Two-level subcommand lookup: token -> accepted argument count -> node.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::case::fold_case;
use crate::node::CommandNode;

/// Subcommands of a node indexed by label and arity.
///
/// A child accepting `min..=max` trailing tokens is filed under every count in
/// that range, for its name and each alias. Registering another child at a
/// colliding (token, count) pair overwrites the earlier entry. Labels are
/// stored case-folded and matched case-insensitively.
#[derive(Clone, Default)]
pub struct SubcommandTable {
    by_token: BTreeMap<String, BTreeMap<usize, Arc<CommandNode>>>,
}

impl SubcommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, node: Arc<CommandNode>) {
        for label in node.labels() {
            let arities = self.by_token.entry(fold_case(label)).or_default();
            for count in node.min_args()..=node.max_args() {
                let previous = arities.insert(count, Arc::clone(&node));
                if previous.is_some_and(|previous| !Arc::ptr_eq(&previous, &node)) {
                    debug!(
                        label = %label,
                        arity = count,
                        "Subcommand variant replaces an earlier one at this arity"
                    );
                }
            }
        }
    }

    /// Distinct variants registered under `token`, in ascending arity order.
    ///
    /// Returns `None` when no subcommand answers to `token`.
    pub fn variants(&self, token: &str) -> Option<Vec<&Arc<CommandNode>>> {
        let arities = self.by_token.get(&fold_case(token))?;
        let mut distinct: Vec<&Arc<CommandNode>> = Vec::new();
        for node in arities.values() {
            if !distinct.iter().any(|seen| Arc::ptr_eq(seen, node)) {
                distinct.push(node);
            }
        }
        Some(distinct)
    }

    /// The variant filed under `token` for exactly `arity` trailing tokens
    pub fn variant_for(&self, token: &str, arity: usize) -> Option<&Arc<CommandNode>> {
        self.by_token.get(&fold_case(token))?.get(&arity)
    }

    /// Registered labels, sorted
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.by_token.keys().map(String::as_str)
    }

    /// Every distinct child node, in label order
    pub fn nodes(&self) -> Vec<&Arc<CommandNode>> {
        let mut distinct: Vec<&Arc<CommandNode>> = Vec::new();
        for node in self.by_token.values().flat_map(BTreeMap::values) {
            if !distinct.iter().any(|seen| Arc::ptr_eq(seen, node)) {
                distinct.push(node);
            }
        }
        distinct
    }

    pub fn is_empty(&self) -> bool {
        self.by_token.is_empty()
    }

    /// Number of registered labels
    pub fn len(&self) -> usize {
        self.by_token.len()
    }
}

impl fmt::Debug for SubcommandTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (token, arities) in &self.by_token {
            let counts: Vec<(usize, &str)> = arities
                .iter()
                .map(|(count, node)| (*count, node.name()))
                .collect();
            map.entry(token, &counts);
        }
        map.finish()
    }
}
