//! NodeArena storage and structural queries.

use crate::node::{Node, NodeIndex, NodeKind};
use jxc_common::SourceRange;

/// Owns every node of one compilation unit.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    pub fn with_capacity(capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Append a node and adopt its children.
    ///
    /// Children must already be in the arena; their parent link is
    /// overwritten to point at the new node.
    pub fn add(&mut self, kind: NodeKind, range: SourceRange) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        for child in kind.children() {
            if let Some(node) = self.nodes.get_mut(child.0 as usize) {
                node.parent = idx;
            }
        }
        self.nodes.push(Node {
            kind,
            range,
            parent: NodeIndex::NONE,
        });
        idx
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by index
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    /// Get a mutable node by index
    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.0 as usize)
        }
    }

    #[inline]
    pub fn kind(&self, index: NodeIndex) -> Option<&NodeKind> {
        self.get(index).map(|node| &node.kind)
    }

    #[inline]
    pub fn parent(&self, index: NodeIndex) -> NodeIndex {
        self.get(index).map_or(NodeIndex::NONE, |node| node.parent)
    }

    pub fn range(&self, index: NodeIndex) -> SourceRange {
        self.get(index).map(|node| node.range).unwrap_or_default()
    }

    pub fn children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        self.kind(index).map(NodeKind::children).unwrap_or_default()
    }

    /// Walk up from the parent of `index` to the root.
    pub fn ancestors(&self, index: NodeIndex) -> Ancestors<'_> {
        Ancestors {
            arena: self,
            current: self.parent(index),
        }
    }

    /// Nearest ancestor whose kind satisfies `pred`.
    pub fn find_ancestor(
        &self,
        index: NodeIndex,
        mut pred: impl FnMut(&NodeKind) -> bool,
    ) -> Option<NodeIndex> {
        self.ancestors(index)
            .find(|&idx| self.kind(idx).is_some_and(&mut pred))
    }

    /// Text of an identifier node.
    pub fn identifier_name(&self, index: NodeIndex) -> Option<&str> {
        match self.kind(index)? {
            NodeKind::Identifier(ident) => Some(ident.name.as_str()),
            _ => None,
        }
    }

    // =========================================================================
    // Syntactic position queries
    // =========================================================================

    /// True when `index` is the callee of its parent call or `new`.
    pub fn is_callee(&self, index: NodeIndex) -> bool {
        matches!(
            self.kind(self.parent(index)),
            Some(NodeKind::Call(call)) if call.callee == index
        )
    }

    /// True when `index` is the left operand of its parent member access.
    pub fn is_member_access_left(&self, index: NodeIndex) -> bool {
        matches!(
            self.kind(self.parent(index)),
            Some(NodeKind::MemberAccess(access)) if access.left == index
        )
    }

    /// True when `index` is the right operand of its parent member access.
    pub fn is_member_access_right(&self, index: NodeIndex) -> bool {
        matches!(
            self.kind(self.parent(index)),
            Some(NodeKind::MemberAccess(access)) if access.right == index
        )
    }

    /// True when `index` is the object of its parent index access.
    pub fn is_index_access_object(&self, index: NodeIndex) -> bool {
        matches!(
            self.kind(self.parent(index)),
            Some(NodeKind::IndexAccess(access)) if access.object == index
        )
    }

    /// True when `index` is the target of an `=` assignment.
    pub fn is_assignment_target(&self, index: NodeIndex) -> bool {
        matches!(
            self.kind(self.parent(index)),
            Some(NodeKind::Binary(binary)) if binary.left == index && binary.operator == "="
        )
    }

    /// Nearest enclosing function-like node, if any.
    pub fn enclosing_function(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.find_ancestor(index, NodeKind::is_function_like)
    }

    /// A function declared inside another function body.
    pub fn is_local_function(&self, index: NodeIndex) -> bool {
        matches!(self.kind(index), Some(NodeKind::Function(_)))
            && self.enclosing_function(index).is_some()
    }

    /// Direct member of a class body.
    pub fn is_class_member(&self, index: NodeIndex) -> bool {
        let body = self.parent(index);
        matches!(self.kind(body), Some(NodeKind::Block(_)))
            && matches!(
                self.kind(self.parent(body)),
                Some(NodeKind::Class(class)) if class.body == body
            )
    }
}

/// Iterator over the ancestors of a node, nearest first.
pub struct Ancestors<'a> {
    arena: &'a NodeArena,
    current: NodeIndex,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        if self.current.is_none() {
            return None;
        }
        let idx = self.current;
        self.current = self.arena.parent(idx);
        Some(idx)
    }
}

#[cfg(test)]
#[path = "../tests/arena.rs"]
mod tests;
