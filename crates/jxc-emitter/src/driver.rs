//! Parallel lowering of independent compilation units.
//!
//! Units share only the read-only program symbols and options. Each one
//! gets its own printer, so a unit that aborts leaves its siblings intact.

use crate::session::{UnitOutput, lower_unit};
use jxc_ast::{NodeArena, NodeIndex, ProgramSymbols, UnitBindings, UnitResolver};
use jxc_common::{DiagnosticSink, EmitOptions};
use rayon::prelude::*;

/// One source file ready for lowering.
#[derive(Clone, Debug)]
pub struct CompilationUnit {
    pub source_path: String,
    pub arena: NodeArena,
    pub root: NodeIndex,
    pub bindings: UnitBindings,
}

impl CompilationUnit {
    pub fn new(
        source_path: impl Into<String>,
        arena: NodeArena,
        root: NodeIndex,
        bindings: UnitBindings,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            arena,
            root,
            bindings,
        }
    }
}

/// Lower every unit in parallel. The result is index-aligned with `units`;
/// a unit that hit an internal error yields `None`, and `diagnostics`
/// receives its earlier warnings followed by the internal error.
pub fn lower_units(
    units: &[CompilationUnit],
    program: &ProgramSymbols,
    options: &EmitOptions,
    diagnostics: &DiagnosticSink,
) -> Vec<Option<UnitOutput>> {
    units
        .par_iter()
        .map(|unit| lower_one(unit, program, options, diagnostics))
        .collect()
}

fn lower_one(
    unit: &CompilationUnit,
    program: &ProgramSymbols,
    options: &EmitOptions,
    diagnostics: &DiagnosticSink,
) -> Option<UnitOutput> {
    let resolver = UnitResolver::new(program, &unit.bindings);
    match lower_unit(&unit.source_path, &unit.arena, unit.root, &resolver, options) {
        Ok(output) => {
            diagnostics.extend(output.diagnostics.iter().cloned());
            Some(output)
        }
        Err(failure) => {
            tracing::warn!(
                file = %unit.source_path,
                error = %failure.error,
                warnings = failure.diagnostics.len(),
                "unit lowering aborted"
            );
            diagnostics.extend(failure.diagnostics);
            diagnostics.report(failure.error.to_diagnostic(&unit.source_path, &unit.arena));
            None
        }
    }
}
