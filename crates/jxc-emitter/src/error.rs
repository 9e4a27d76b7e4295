//! Internal lowering errors.
//!
//! Anything the input program can get wrong is handled by a fallback branch
//! and never reaches this type. An `EmitError` means the code generator
//! itself broke an invariant; it aborts the current unit only.

use jxc_ast::{NodeArena, NodeIndex};
use jxc_common::Diagnostic;
use jxc_common::diagnostics::{diagnostic_codes, format_message, get_message_template};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EmitError {
    #[error("mapping closed with no mapping open")]
    MappingUnderflow,

    #[error("mapping #{found} closed while mapping #{expected} is innermost")]
    MappingMismatch { expected: usize, found: usize },

    #[error("{count} mapping(s) still open at end of unit")]
    UnclosedMappings { count: usize },

    #[error("no handler for {kind} node {node} in this position")]
    UnhandledNode { kind: &'static str, node: NodeIndex },

    #[error("node {node} is not in the arena")]
    DanglingNode { node: NodeIndex },

    #[error("type annotation {node} did not resolve; assignment coercion needs its type")]
    MissingTypeReference { node: NodeIndex },

    #[error("{construct} at node {node} is only valid inside a class")]
    NoClassContext {
        construct: &'static str,
        node: NodeIndex,
    },

    #[error("emit nesting deeper than {limit} levels at node {node}")]
    DepthExceeded { limit: u32, node: NodeIndex },
}

/// An aborted unit: the internal error, plus the source warnings the unit
/// raised before it stopped.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{error}")]
pub struct UnitFailure {
    pub error: EmitError,
    pub diagnostics: Vec<Diagnostic>,
}

impl EmitError {
    #[must_use]
    pub fn code(&self) -> u32 {
        match self {
            EmitError::MappingUnderflow => diagnostic_codes::MAPPING_UNDERFLOW,
            EmitError::MappingMismatch { .. } => diagnostic_codes::MAPPING_MISMATCH,
            EmitError::UnclosedMappings { .. } => diagnostic_codes::UNCLOSED_MAPPINGS,
            EmitError::UnhandledNode { .. } => diagnostic_codes::UNHANDLED_NODE,
            EmitError::DanglingNode { .. } => diagnostic_codes::DANGLING_NODE,
            EmitError::MissingTypeReference { .. } => diagnostic_codes::MISSING_TYPE_REFERENCE,
            EmitError::NoClassContext { .. } => diagnostic_codes::NO_CLASS_CONTEXT,
            EmitError::DepthExceeded { .. } => diagnostic_codes::EMIT_DEPTH_EXCEEDED,
        }
    }

    /// Node the error is attributed to, when there is one.
    #[must_use]
    pub fn node(&self) -> Option<NodeIndex> {
        match self {
            EmitError::UnhandledNode { node, .. }
            | EmitError::DanglingNode { node }
            | EmitError::MissingTypeReference { node }
            | EmitError::NoClassContext { node, .. }
            | EmitError::DepthExceeded { node, .. } => Some(*node),
            EmitError::MappingUnderflow
            | EmitError::MappingMismatch { .. }
            | EmitError::UnclosedMappings { .. } => None,
        }
    }

    /// Internal diagnostic for `file`, located at the offending node.
    #[must_use]
    pub fn to_diagnostic(&self, file: &str, arena: &NodeArena) -> Diagnostic {
        let range = self.node().map(|node| arena.range(node)).unwrap_or_default();
        let detail = self.to_string();
        let message = match get_message_template(self.code()) {
            Some(template) => format_message(template, &[&detail]),
            None => detail,
        };
        Diagnostic::internal(file, range, message, self.code())
    }
}
