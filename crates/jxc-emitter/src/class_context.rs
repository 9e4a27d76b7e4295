//! Per-class and per-unit lowering state.

use indexmap::{IndexMap, IndexSet};
use jxc_ast::{NodeIndex, Symbol};

/// Getter/setter pair collected during the member walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessorPair {
    pub name: String,
    pub is_static: bool,
    pub getter: Option<NodeIndex>,
    pub setter: Option<NodeIndex>,
}

/// State of the class currently being lowered.
#[derive(Debug)]
pub struct ClassLoweringContext {
    pub node: NodeIndex,
    pub symbol: Symbol,
    /// Qualified name of the base class, if any.
    pub base: Option<String>,
    accessors: IndexMap<(String, bool), AccessorPair>,
    bindables: Vec<NodeIndex>,
    has_complex_static_initializers: bool,
}

impl ClassLoweringContext {
    pub fn new(node: NodeIndex, symbol: Symbol, base: Option<String>) -> Self {
        Self {
            node,
            symbol,
            base,
            accessors: IndexMap::new(),
            bindables: Vec::new(),
            has_complex_static_initializers: false,
        }
    }

    pub fn qualified_name(&self) -> &str {
        &self.symbol.qualified_name
    }

    pub fn add_getter(&mut self, name: &str, is_static: bool, node: NodeIndex) {
        self.accessor_entry(name, is_static).getter = Some(node);
    }

    pub fn add_setter(&mut self, name: &str, is_static: bool, node: NodeIndex) {
        self.accessor_entry(name, is_static).setter = Some(node);
    }

    fn accessor_entry(&mut self, name: &str, is_static: bool) -> &mut AccessorPair {
        self.accessors
            .entry((name.to_string(), is_static))
            .or_insert_with(|| AccessorPair {
                name: name.to_string(),
                is_static,
                getter: None,
                setter: None,
            })
    }

    pub fn add_bindable(&mut self, node: NodeIndex) {
        self.bindables.push(node);
    }

    pub fn mark_complex_static_initializer(&mut self) {
        self.has_complex_static_initializers = true;
    }

    pub fn has_complex_static_initializers(&self) -> bool {
        self.has_complex_static_initializers
    }

    /// Accessor pairs in first-declaration order, leaving the list empty.
    pub fn take_accessors(&mut self) -> Vec<AccessorPair> {
        std::mem::take(&mut self.accessors).into_values().collect()
    }

    pub fn take_bindables(&mut self) -> Vec<NodeIndex> {
        std::mem::take(&mut self.bindables)
    }
}

/// Qualified names that must survive dead-code elimination.
#[derive(Clone, Debug, Default)]
pub struct UsedNamesRegistry {
    names: IndexSet<String>,
}

impl UsedNamesRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, qualified_name: &str) {
        if !self.names.contains(qualified_name) {
            self.names.insert(qualified_name.to_string());
        }
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.names.contains(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in first-registration order.
    pub fn into_vec(self) -> Vec<String> {
        self.names.into_iter().collect()
    }
}

#[cfg(test)]
#[path = "../tests/class_context.rs"]
mod tests;
