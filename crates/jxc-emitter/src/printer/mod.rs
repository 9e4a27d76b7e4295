//! The lowering printer.
//!
//! `Printer::emit` is the dispatcher: one exhaustive match over `NodeKind`
//! routing every node to its translator. Translators live in sibling files
//! as further `impl Printer` blocks and re-enter `emit` for child nodes.
//!
//! One printer lowers one compilation unit. It owns the unit's writer,
//! mapping tracker, used-name registry and class context stack; the arena,
//! resolver and options are borrowed read-only.

use crate::class_context::{ClassLoweringContext, UsedNamesRegistry};
use crate::error::{EmitError, UnitFailure};
use crate::mapping::{Mapping, MappingTracker};
use crate::naming::NameFormatter;
use crate::reflection::ClassInfoSink;
use crate::source_writer::SourceWriter;
use jxc_ast::{Node, NodeArena, NodeIndex, NodeKind, SymbolResolver};
use jxc_common::limits::MAX_EMIT_RECURSION_DEPTH;
use jxc_common::{Diagnostic, EmitOptions};

mod classes;
mod closures;
mod coercion;
mod docs;
mod expressions;
mod functions;
mod helpers;
mod identifiers;
mod literals;
mod member_access;
mod statements;

/// Everything a finished printer produced.
#[derive(Debug)]
pub struct PrinterOutput {
    pub text: String,
    pub mappings: Vec<Mapping>,
    pub used_names: Vec<String>,
    pub needs_language_helper: bool,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Printer<'a> {
    arena: &'a NodeArena,
    resolver: &'a dyn SymbolResolver,
    options: &'a EmitOptions,
    names: NameFormatter<'a>,
    source_path: &'a str,
    writer: SourceWriter,
    mappings: MappingTracker,
    used_names: UsedNamesRegistry,
    class_stack: Vec<ClassLoweringContext>,
    class_info_sink: &'a mut dyn ClassInfoSink,
    diagnostics: Vec<Diagnostic>,
    needs_language_helper: bool,
    /// Package of the declarations being lowered, empty at top level.
    package_name: String,
    depth: u32,
}

impl<'a> Printer<'a> {
    pub fn new(
        source_path: &'a str,
        arena: &'a NodeArena,
        resolver: &'a dyn SymbolResolver,
        options: &'a EmitOptions,
        class_info_sink: &'a mut dyn ClassInfoSink,
    ) -> Self {
        Self {
            arena,
            resolver,
            options,
            names: NameFormatter::new(&options.naming),
            source_path,
            writer: SourceWriter::new(options.indent_width),
            mappings: MappingTracker::new(source_path),
            used_names: UsedNamesRegistry::new(),
            class_stack: Vec::new(),
            class_info_sink,
            diagnostics: Vec::new(),
            needs_language_helper: false,
            package_name: String::new(),
            depth: 0,
        }
    }

    /// Text written so far.
    pub fn text(&self) -> &str {
        self.writer.text()
    }

    /// Close out the unit. Fails if any mapping was left open.
    pub fn finish(self) -> Result<PrinterOutput, UnitFailure> {
        let mappings = match self.mappings.finish() {
            Ok(mappings) => mappings,
            Err(error) => {
                return Err(UnitFailure {
                    error,
                    diagnostics: self.diagnostics,
                });
            }
        };
        Ok(PrinterOutput {
            text: self.writer.into_text(),
            mappings,
            used_names: self.used_names.into_vec(),
            needs_language_helper: self.needs_language_helper,
            diagnostics: self.diagnostics,
        })
    }

    /// Give up on the unit, keeping the warnings raised so far.
    pub fn abort_with(self, error: EmitError) -> UnitFailure {
        UnitFailure {
            error,
            diagnostics: self.diagnostics,
        }
    }

    // =========================================================================
    // Dispatcher
    // =========================================================================

    /// Lower `idx` and its subtree.
    pub fn emit(&mut self, idx: NodeIndex) -> Result<(), EmitError> {
        let Some(node) = self.arena.get(idx) else {
            return Err(EmitError::DanglingNode { node: idx });
        };
        if self.depth >= MAX_EMIT_RECURSION_DEPTH {
            return Err(EmitError::DepthExceeded {
                limit: MAX_EMIT_RECURSION_DEPTH,
                node: idx,
            });
        }
        self.depth += 1;
        let result = self.emit_node(node, idx);
        self.depth -= 1;
        result
    }

    fn emit_node(&mut self, node: &'a Node, idx: NodeIndex) -> Result<(), EmitError> {
        match &node.kind {
            // Structure
            NodeKind::SourceFile(data) => self.emit_source_file(&data.statements),
            NodeKind::Package(data) => self.emit_package(&data.name, &data.statements),
            // Imports produce no code; class lowering reads them for force-linking.
            NodeKind::Import(_) => Ok(()),
            NodeKind::Class(data) => self.emit_class(idx, data),

            // Declarations outside a class body
            NodeKind::Function(data) => self.emit_function_declaration(idx, data),
            NodeKind::Variable(data) => self.emit_variable_statement(idx, data),

            // Statements
            NodeKind::Block(statements) => self.emit_block(statements),
            NodeKind::ExpressionStatement(expr) => self.emit_expression_statement(idx, *expr),
            NodeKind::Return(expr) => self.emit_return(idx, *expr),
            NodeKind::If(data) => self.emit_if(data),

            // Names and access
            NodeKind::Identifier(_) => self.emit_identifier(idx),
            NodeKind::MemberAccess(data) => self.emit_member_access(idx, data),
            NodeKind::Attribute(name) => self.emit_attribute(idx, name),
            NodeKind::IndexAccess(data) => self.emit_index_access(data),
            NodeKind::This => self.write_mapped(idx, "this", None),

            // Expressions
            NodeKind::Call(data) => self.emit_call(idx, data),
            NodeKind::Binary(data) => self.emit_binary(idx, data),
            NodeKind::Unary(data) => self.emit_unary(idx, data),
            NodeKind::Conditional(data) => self.emit_conditional(data),
            NodeKind::Parenthesized(expr) => self.emit_parenthesized(*expr),
            NodeKind::FunctionObject(data) => self.emit_function_object(idx, data),
            NodeKind::Filter(data) => self.emit_filter(idx, data),

            // Literals
            NodeKind::NumericLiteral(text) => self.write_mapped(idx, text, None),
            NodeKind::StringLiteral(text) => self.emit_string_literal(idx, text),
            NodeKind::BooleanLiteral(value) => {
                self.write_mapped(idx, if *value { "true" } else { "false" }, None)
            }
            NodeKind::NullLiteral => self.write_mapped(idx, "null", None),
            NodeKind::UndefinedLiteral => self.write_mapped(idx, "undefined", None),
            NodeKind::ArrayLiteral(elements) => self.emit_array_literal(idx, elements),
            NodeKind::ObjectLiteral(properties) => self.emit_object_literal(idx, properties),

            // Only meaningful inside the construct that owns them: accessors
            // and bindables are flushed by class lowering, parameters by
            // function lowering, namespace access and super by member access.
            NodeKind::Getter(_)
            | NodeKind::Setter(_)
            | NodeKind::BindableVariable(_)
            | NodeKind::Parameter(_)
            | NodeKind::NamespaceAccess(_)
            | NodeKind::Super => Err(EmitError::UnhandledNode {
                kind: node.kind.name(),
                node: idx,
            }),
        }
    }

    fn emit_source_file(&mut self, statements: &[NodeIndex]) -> Result<(), EmitError> {
        for &statement in statements {
            self.emit_top_level(statement)?;
        }
        Ok(())
    }

    fn emit_package(&mut self, name: &str, statements: &[NodeIndex]) -> Result<(), EmitError> {
        let previous = std::mem::replace(&mut self.package_name, name.to_string());
        let result = statements
            .iter()
            .try_for_each(|&statement| self.emit_top_level(statement));
        self.package_name = previous;
        result
    }

    fn emit_top_level(&mut self, statement: NodeIndex) -> Result<(), EmitError> {
        let before = self.writer.text().len();
        self.emit(statement)?;
        if self.writer.text().len() != before {
            self.writer.ensure_line_start();
        }
        Ok(())
    }
}
