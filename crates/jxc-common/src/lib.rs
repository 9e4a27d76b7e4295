//! Common types and utilities for the jxc code generator.
//!
//! This crate provides foundational types used across all jxc crates:
//! - Line/column source positions (`Position`, `SourceRange`)
//! - Diagnostics, including the thread-safe per-file `DiagnosticSink`
//! - Emit configuration (`EmitOptions`, `NamingPolicy`, `RuntimeNames`)
//! - Recursion limits shared by the lowering passes

// Position/Range types for line/column source locations
pub mod position;
pub use position::{Position, SourceRange};

// Diagnostics reported by lowering, source and internal
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticKind, DiagnosticSink};

// Emit configuration, loaded from JSON
pub mod config;
pub use config::{EmitOptions, NamingPolicy, QualifiedNameStyle, RuntimeNames};

// Centralized limits and thresholds
pub mod limits;
