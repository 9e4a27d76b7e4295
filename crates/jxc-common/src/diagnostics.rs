//! Diagnostic types, message lookup, and the shared diagnostics sink.
//!
//! Lowering distinguishes two classes of problems:
//! - `DiagnosticKind::Source`: ordinary problems attributable to the input
//!   program (reported as warnings or errors, lowering continues).
//! - `DiagnosticKind::Internal`: invariant violations inside the code
//!   generator itself. These abort the unit that raised them.

use crate::position::SourceRange;
use dashmap::DashMap;
use serde::Serialize;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

/// Whether a diagnostic describes the input program or the generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    Source,
    Internal,
}

/// A lowering diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub range: SourceRange,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub kind: DiagnosticKind,
    pub code: u32,
}

impl Diagnostic {
    /// Create a source-level warning.
    #[must_use]
    pub fn warning(file: impl Into<String>, range: SourceRange, message: String, code: u32) -> Self {
        Self {
            file: file.into(),
            range,
            message_text: message,
            category: DiagnosticCategory::Warning,
            kind: DiagnosticKind::Source,
            code,
        }
    }

    /// Create a source-level error.
    #[must_use]
    pub fn error(file: impl Into<String>, range: SourceRange, message: String, code: u32) -> Self {
        Self {
            file: file.into(),
            range,
            message_text: message,
            category: DiagnosticCategory::Error,
            kind: DiagnosticKind::Source,
            code,
        }
    }

    /// Create an internal-error diagnostic.
    #[must_use]
    pub fn internal(file: impl Into<String>, range: SourceRange, message: String, code: u32) -> Self {
        Self {
            file: file.into(),
            range,
            message_text: message,
            category: DiagnosticCategory::Error,
            kind: DiagnosticKind::Internal,
            code,
        }
    }

    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.kind == DiagnosticKind::Internal
    }
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    // Source diagnostics (lowering continues)
    pub const UNRESOLVED_NAMESPACE: u32 = 5001;
    pub const UNRESOLVED_CLASS_DECLARATION: u32 = 5002;

    // Internal errors (unit aborted)
    pub const MAPPING_UNDERFLOW: u32 = 9001;
    pub const MAPPING_MISMATCH: u32 = 9002;
    pub const UNCLOSED_MAPPINGS: u32 = 9003;
    pub const UNHANDLED_NODE: u32 = 9004;
    pub const DANGLING_NODE: u32 = 9005;
    pub const MISSING_TYPE_REFERENCE: u32 = 9006;
    pub const NO_CLASS_CONTEXT: u32 = 9007;
    pub const EMIT_DEPTH_EXCEEDED: u32 = 9008;
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::UNRESOLVED_NAMESPACE,
        category: DiagnosticCategory::Warning,
        message: "Namespace '{0}' could not be resolved; its name is used as the namespace URI.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::UNRESOLVED_CLASS_DECLARATION,
        category: DiagnosticCategory::Warning,
        message: "Class '{0}' has no resolved definition; its qualified name is derived from the enclosing package.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::MAPPING_UNDERFLOW,
        category: DiagnosticCategory::Error,
        message: "Internal error: {0}",
    },
    DiagnosticMessage {
        code: diagnostic_codes::MAPPING_MISMATCH,
        category: DiagnosticCategory::Error,
        message: "Internal error: {0}",
    },
    DiagnosticMessage {
        code: diagnostic_codes::UNCLOSED_MAPPINGS,
        category: DiagnosticCategory::Error,
        message: "Internal error: {0}",
    },
    DiagnosticMessage {
        code: diagnostic_codes::UNHANDLED_NODE,
        category: DiagnosticCategory::Error,
        message: "Internal error: {0}",
    },
    DiagnosticMessage {
        code: diagnostic_codes::DANGLING_NODE,
        category: DiagnosticCategory::Error,
        message: "Internal error: {0}",
    },
    DiagnosticMessage {
        code: diagnostic_codes::MISSING_TYPE_REFERENCE,
        category: DiagnosticCategory::Error,
        message: "Internal error: {0}",
    },
    DiagnosticMessage {
        code: diagnostic_codes::NO_CLASS_CONTEXT,
        category: DiagnosticCategory::Error,
        message: "Internal error: {0}",
    },
    DiagnosticMessage {
        code: diagnostic_codes::EMIT_DEPTH_EXCEEDED,
        category: DiagnosticCategory::Error,
        message: "Internal error: {0}",
    },
];

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}

// =============================================================================
// Diagnostic Sink
// =============================================================================

/// Collects diagnostics from concurrently lowered units.
///
/// Each file owns its own bucket, so units running on different threads
/// never contend on a shared vector. Nothing reported here is dropped.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    by_file: DashMap<String, Vec<Diagnostic>>,
}

impl DiagnosticSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self, diagnostic: Diagnostic) {
        self.by_file
            .entry(diagnostic.file.clone())
            .or_default()
            .push(diagnostic);
    }

    pub fn extend(&self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.report(diagnostic);
        }
    }

    /// Diagnostics reported for one file, in report order.
    #[must_use]
    pub fn for_file(&self, file: &str) -> Vec<Diagnostic> {
        self.by_file
            .get(file)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_file.iter().map(|entry| entry.value().len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn has_internal_errors(&self) -> bool {
        self.by_file
            .iter()
            .any(|entry| entry.value().iter().any(Diagnostic::is_internal))
    }

    /// Drain every diagnostic, ordered by file name and then report order.
    #[must_use]
    pub fn into_sorted(self) -> Vec<Diagnostic> {
        let mut files: Vec<(String, Vec<Diagnostic>)> = self.by_file.into_iter().collect();
        files.sort_by(|a, b| a.0.cmp(&b.0));
        files.into_iter().flat_map(|(_, diags)| diags).collect()
    }
}

#[cfg(test)]
#[path = "../tests/diagnostics.rs"]
mod tests;
