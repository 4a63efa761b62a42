use std::collections::BTreeMap;
use std::fmt;

use crate::args::{BooleanArg, DecimalArg, IntegerArg, StringArg};
use crate::argument::{Argument, ArgumentSlot};
use crate::case::fold_case;

/// Maps argument kind names to shared argument implementations.
///
/// A registry is an ordinary value: the dispatcher owns one, tests build
/// their own. Every slot resolved from the same kind shares one instance.
#[derive(Clone, Default)]
pub struct ArgumentRegistry {
    kinds: BTreeMap<String, ArgumentSlot>,
}

impl ArgumentRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding `string`, `integer`, `decimal` and `boolean`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("string", StringArg);
        registry.register("integer", IntegerArg::new());
        registry.register("decimal", DecimalArg::new());
        registry.register("boolean", BooleanArg);
        registry
    }

    /// Register (or replace) the implementation for `kind`.
    ///
    /// Kind names are matched case-insensitively.
    pub fn register<A: Argument>(&mut self, kind: &str, argument: A) {
        let kind = fold_case(kind);
        self.kinds
            .insert(kind.clone(), ArgumentSlot::new(kind, argument));
    }

    /// A slot named `name` backed by the implementation registered for `kind`
    pub fn slot(&self, kind: &str, name: impl Into<String>) -> Option<ArgumentSlot> {
        self.kinds
            .get(&fold_case(kind))
            .map(|prototype| prototype.with_name(name))
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.contains_key(&fold_case(kind))
    }

    /// Registered kind names, sorted
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }
}

impl fmt::Debug for ArgumentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.kinds.keys()).finish()
    }
}
