//! Lowering of a single compilation unit.

use crate::error::UnitFailure;
use crate::mapping::Mapping;
use crate::printer::{Printer, PrinterOutput};
use crate::reflection::{ClassInfo, ClassInfoCollector, ClassInfoSink};
use jxc_ast::{NodeArena, NodeIndex, SymbolResolver};
use jxc_common::{Diagnostic, EmitOptions};
use serde::Serialize;

/// Everything one unit produced.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitOutput {
    pub source_path: String,
    pub text: String,
    pub mappings: Vec<Mapping>,
    /// Qualified names the dead-code pass must keep.
    pub used_names: Vec<String>,
    /// The language utility class was referenced.
    pub needs_language_helper: bool,
    pub class_infos: Vec<ClassInfo>,
    /// Source warnings raised while lowering.
    pub diagnostics: Vec<Diagnostic>,
}

/// Lower the tree at `root`, collecting class reflection info in the output.
#[tracing::instrument(level = "trace", skip(arena, resolver, options), fields(nodes = arena.len()))]
pub fn lower_unit(
    source_path: &str,
    arena: &NodeArena,
    root: NodeIndex,
    resolver: &dyn SymbolResolver,
    options: &EmitOptions,
) -> Result<UnitOutput, UnitFailure> {
    let mut collector = ClassInfoCollector::default();
    let output = lower_unit_with_sink(source_path, arena, root, resolver, options, &mut collector)?;

    tracing::debug!(
        source_path,
        bytes = output.text.len(),
        mappings = output.mappings.len(),
        used_names = output.used_names.len(),
        classes = collector.infos.len(),
        "lowered unit"
    );

    Ok(UnitOutput {
        source_path: source_path.to_string(),
        text: output.text,
        mappings: output.mappings,
        used_names: output.used_names,
        needs_language_helper: output.needs_language_helper,
        class_infos: collector.infos,
        diagnostics: output.diagnostics,
    })
}

/// Lower the tree at `root`, handing class reflection info to `sink`.
///
/// On failure the returned `UnitFailure` still carries every warning the
/// unit raised before aborting.
pub fn lower_unit_with_sink<'a>(
    source_path: &'a str,
    arena: &'a NodeArena,
    root: NodeIndex,
    resolver: &'a dyn SymbolResolver,
    options: &'a EmitOptions,
    sink: &'a mut dyn ClassInfoSink,
) -> Result<PrinterOutput, UnitFailure> {
    let mut printer = Printer::new(source_path, arena, resolver, options, sink);
    if let Err(error) = printer.emit(root) {
        return Err(printer.abort_with(error));
    }
    printer.finish()
}
