//! Per-invocation execution context
//!
//! One [`ExecutionContext`] is created per dispatch and discarded when the
//! call returns. It is never shared between invocations or threads.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use cmdtree_utils::error::ContextError;

use crate::argument::ArgValue;
use crate::case::eq_ignore_case;
use crate::node::CommandNode;

/// Lookup key for context values: a declared position or an argument name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKey<'a> {
    Index(usize),
    Name(&'a str),
}

impl From<usize> for ArgKey<'_> {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl<'a> From<&'a str> for ArgKey<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for ArgKey<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name.as_str())
    }
}

/// Insertion-ordered map of argument name to raw token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArgs {
    entries: Vec<(String, String)>,
}

impl RawArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair `tokens` with the declared arguments of `node`, required first.
    ///
    /// Tokens beyond the declared arguments are ignored.
    pub fn from_declared(node: &CommandNode, tokens: &[String]) -> Self {
        let mut raw = Self::new();
        for (slot, token) in node.arguments().zip(tokens) {
            raw.insert(slot.name(), token.clone());
        }
        raw
    }

    /// Insert or replace the raw token for `name`, keeping its position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn get_index(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// Mutable state threaded through one dispatch.
///
/// Raw tokens for every argument are inserted before any parsing starts;
/// parsed values and requirement values are appended as each stage succeeds.
pub struct ExecutionContext {
    node: Arc<CommandNode>,
    parent_path: Vec<Arc<CommandNode>>,
    raw: RawArgs,
    parsed: Vec<(String, ArgValue)>,
    requirement_values: Vec<Option<ArgValue>>,
}

impl ExecutionContext {
    pub fn new(node: Arc<CommandNode>, parent_path: Vec<Arc<CommandNode>>) -> Self {
        Self {
            node,
            parent_path,
            raw: RawArgs::new(),
            parsed: Vec::new(),
            requirement_values: Vec::new(),
        }
    }

    /// The executing node
    pub fn node(&self) -> &CommandNode {
        &self.node
    }

    /// Ancestors traversed to reach the executing node, root first
    pub fn parent_path(&self) -> &[Arc<CommandNode>] {
        &self.parent_path
    }

    pub fn raw_args(&self) -> &RawArgs {
        &self.raw
    }

    pub fn insert_raw(&mut self, name: impl Into<String>, raw: impl Into<String>) {
        self.raw.insert(name, raw);
    }

    pub fn insert_parsed(&mut self, name: impl Into<String>, value: ArgValue) {
        let name = name.into();
        match self.parsed.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.parsed.push((name, value)),
        }
    }

    pub fn push_requirement_value(&mut self, value: Option<ArgValue>) {
        self.requirement_values.push(value);
    }

    /// Typed parsed value by position or name.
    ///
    /// Out-of-range positions and declared-but-unset names yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// [`ContextError::UndeclaredArgument`] when the node declares no argument
    /// with that name, [`ContextError::TypeMismatch`] when the stored value is
    /// not a `T`.
    pub fn get<'k, T: Any>(&self, key: impl Into<ArgKey<'k>>) -> Result<Option<&T>, ContextError> {
        let (name, value) = match key.into() {
            ArgKey::Index(index) => match self.parsed.get(index) {
                Some((name, value)) => (name.as_str(), value),
                None => return Ok(None),
            },
            ArgKey::Name(name) => {
                let canonical = self.resolve_name(name)?;
                match self.parsed.iter().find(|(key, _)| key == canonical) {
                    Some((name, value)) => (name.as_str(), value),
                    None => return Ok(None),
                }
            }
        };

        value
            .downcast_ref::<T>()
            .map(Some)
            .ok_or_else(|| ContextError::TypeMismatch {
                command: self.node.name().to_string(),
                name: name.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// Raw token by position or name.
    ///
    /// # Errors
    ///
    /// [`ContextError::UndeclaredArgument`] for names the node never declared.
    pub fn raw<'k>(&self, key: impl Into<ArgKey<'k>>) -> Result<Option<&str>, ContextError> {
        match key.into() {
            ArgKey::Index(index) => Ok(self.raw.get_index(index)),
            ArgKey::Name(name) => {
                let canonical = self.resolve_name(name)?;
                Ok(self.raw.get(canonical))
            }
        }
    }

    /// Whether a value was parsed for the key.
    ///
    /// # Errors
    ///
    /// Same as [`ExecutionContext::raw`].
    pub fn is_set<'k>(&self, key: impl Into<ArgKey<'k>>) -> Result<bool, ContextError> {
        match key.into() {
            ArgKey::Index(index) => Ok(index < self.parsed.len()),
            ArgKey::Name(name) => {
                let canonical = self.resolve_name(name)?;
                Ok(self.parsed.iter().any(|(key, _)| key == canonical))
            }
        }
    }

    /// Value derived by the requirement at `index`, if it produced one of type `T`
    pub fn requirement<T: Any>(&self, index: usize) -> Option<&T> {
        self.requirement_values
            .get(index)
            .and_then(Option::as_ref)
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Number of requirements evaluated so far, including ones without a value
    pub fn requirement_count(&self) -> usize {
        self.requirement_values.len()
    }

    pub fn parsed_count(&self) -> usize {
        self.parsed.len()
    }

    // Exact key first, then optional names, then required names, both
    // case-insensitively.
    fn resolve_name<'a>(&'a self, name: &'a str) -> Result<&'a str, ContextError> {
        if self.raw.contains(name) || self.parsed.iter().any(|(key, _)| key == name) {
            return Ok(name);
        }

        let declared = self
            .node
            .optional_args()
            .iter()
            .chain(self.node.required_args())
            .find(|slot| eq_ignore_case(slot.name(), name));

        match declared {
            Some(slot) => Ok(slot.name()),
            None => Err(ContextError::UndeclaredArgument {
                command: self.node.name().to_string(),
                name: name.to_string(),
            }),
        }
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("node", &self.node.name())
            .field(
                "parent_path",
                &self
                    .parent_path
                    .iter()
                    .map(|node| node.name())
                    .collect::<Vec<_>>(),
            )
            .field("raw", &self.raw)
            .field(
                "parsed",
                &self.parsed.iter().map(|(key, _)| key).collect::<Vec<_>>(),
            )
            .field("requirement_values", &self.requirement_values.len())
            .finish()
    }
}
