use super::Printer;
use crate::builtins;
use crate::error::EmitError;
use jxc_ast::node::{IfData, VariableData};
use jxc_ast::{NodeIndex, NodeKind};

impl<'a> Printer<'a> {
    // =========================================================================
    // Blocks
    // =========================================================================

    pub(super) fn emit_block(&mut self, statements: &'a [NodeIndex]) -> Result<(), EmitError> {
        self.emit_braced(statements, |_| Ok(()))
    }

    /// `{`, the prologue, each statement on its own line, `}`.
    pub(super) fn emit_braced<F>(
        &mut self,
        statements: &'a [NodeIndex],
        prologue: F,
    ) -> Result<(), EmitError>
    where
        F: FnOnce(&mut Self) -> Result<(), EmitError>,
    {
        self.write("{");
        self.write_line();
        self.increase_indent();
        prologue(self)?;
        for &statement in statements {
            self.emit_statement(statement)?;
        }
        self.decrease_indent();
        self.writer.ensure_line_start();
        self.write("}");
        Ok(())
    }

    pub(super) fn emit_statement(&mut self, statement: NodeIndex) -> Result<(), EmitError> {
        self.emit(statement)?;
        self.writer.ensure_line_start();
        Ok(())
    }

    // =========================================================================
    // Simple statements
    // =========================================================================

    pub(super) fn emit_expression_statement(
        &mut self,
        idx: NodeIndex,
        expr: NodeIndex,
    ) -> Result<(), EmitError> {
        self.with_mapping(idx, None, |p| {
            p.emit(expr)?;
            p.write(";");
            Ok(())
        })
    }

    pub(super) fn emit_return(&mut self, idx: NodeIndex, expr: NodeIndex) -> Result<(), EmitError> {
        self.with_mapping(idx, None, |p| {
            p.write("return");
            if expr.is_some() {
                p.write(" ");
                p.emit(expr)?;
            }
            p.write(";");
            Ok(())
        })
    }

    pub(super) fn emit_if(&mut self, data: &'a IfData) -> Result<(), EmitError> {
        self.write("if (");
        self.emit(data.condition)?;
        self.write(") ");
        self.emit(data.then_branch)?;
        if data.else_branch.is_some() {
            self.write(" else ");
            self.emit(data.else_branch)?;
        }
        Ok(())
    }

    // =========================================================================
    // Variables
    // =========================================================================

    /// Local `var` or package-level assignment. Class fields are lowered by
    /// class lowering and never reach this path.
    pub(super) fn emit_variable_statement(
        &mut self,
        idx: NodeIndex,
        data: &'a VariableData,
    ) -> Result<(), EmitError> {
        if self.arena.is_class_member(idx) {
            return Err(EmitError::UnhandledNode {
                kind: "Variable",
                node: idx,
            });
        }

        let is_local = self.arena.enclosing_function(idx).is_some();
        if !is_local {
            let doc_type = self.annotation_doc_type(data.type_annotation);
            self.write_type_doc(&doc_type);
        }

        self.with_mapping(idx, Some(data.name.as_str()), |p| {
            if is_local {
                p.write("var ");
                p.write(&data.name);
            } else {
                let name = p.declaration_name(idx, &data.name);
                p.write(&name);
            }
            p.emit_variable_value(data)?;
            p.write(";");
            Ok(())
        })
    }

    /// ` = <initializer>` with coercion, or the type's default value.
    pub(super) fn emit_variable_value(&mut self, data: &'a VariableData) -> Result<(), EmitError> {
        if data.initializer.is_some() {
            self.write(" = ");
            return self.emit_assignment_coercion(data.initializer, data.type_annotation);
        }
        if let Some(default) = self
            .annotation_type(data.type_annotation)
            .and_then(builtins::type_default)
        {
            self.write(" = ");
            self.write(default);
        }
        Ok(())
    }

    /// Formatted qualified name of a package-level declaration.
    pub(super) fn declaration_name(&self, idx: NodeIndex, name: &str) -> String {
        let qualified = match self.resolve(idx) {
            Some(symbol) => symbol.qualified_name.clone(),
            None if self.package_name.is_empty() => name.to_string(),
            None => format!("{}.{name}", self.package_name),
        };
        self.names.qualified(&qualified)
    }

    /// A statement that is only an identifier: the force-link reference
    /// after an import in a class body.
    pub(super) fn is_bare_identifier(&self, node: NodeIndex) -> bool {
        matches!(self.kind(node), Some(NodeKind::Identifier(_)))
    }
}
