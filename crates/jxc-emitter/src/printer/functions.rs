//! Function declarations, methods and function-object literals.

use super::Printer;
use crate::error::EmitError;
use jxc_ast::node::{FunctionData, FunctionObjectData, ParameterData};
use jxc_ast::{NodeIndex, NodeKind};

/// Statements the constructor runs before its own body.
#[derive(Clone, Copy, Debug, Default)]
pub(super) struct ConstructorPrologue<'p> {
    /// Instance fields whose initializers run at construction.
    pub(super) initializers: &'p [NodeIndex],
}

impl<'a> Printer<'a> {
    pub(super) fn emit_function_declaration(
        &mut self,
        idx: NodeIndex,
        data: &'a FunctionData,
    ) -> Result<(), EmitError> {
        if self.arena.is_class_member(idx) {
            return self.emit_method(idx, data);
        }

        if self.arena.is_local_function(idx) {
            self.with_mapping(idx, Some(data.name.as_str()), |p| {
                p.write("function ");
                p.write(&data.name);
                Ok(())
            })?;
            self.emit_parameter_list(&data.parameters)?;
            self.write(" ");
            return self.emit_function_body(idx, &data.parameters, data.body, None);
        }

        let name = self.declaration_name(idx, &data.name);
        self.with_mapping(idx, Some(data.name.as_str()), |p| {
            p.write(&name);
            p.write(" = function");
            Ok(())
        })?;
        self.emit_parameter_list(&data.parameters)?;
        self.write(" ");
        self.emit_function_body(idx, &data.parameters, data.body, None)?;
        self.write(";");
        Ok(())
    }

    /// `Q.prototype.name = function(...) {...};`, or `Q.name` when static.
    pub(super) fn emit_method(&mut self, idx: NodeIndex, data: &'a FunctionData) -> Result<(), EmitError> {
        let class_name = self.current_class_name(idx, "method")?;
        let key = self.member_key(idx, &data.name);
        let target = if data.is_static {
            format!("{class_name}{key}")
        } else {
            format!("{class_name}.prototype{key}")
        };
        self.emit_function_assignment(idx, &target, data, None)
    }

    /// `target = function(params) {body};` mapped to `idx`.
    pub(super) fn emit_function_assignment(
        &mut self,
        idx: NodeIndex,
        target: &str,
        data: &'a FunctionData,
        prologue: Option<ConstructorPrologue<'_>>,
    ) -> Result<(), EmitError> {
        self.with_mapping(idx, Some(data.name.as_str()), |p| {
            p.write(target);
            p.write(" = function");
            Ok(())
        })?;
        self.emit_parameter_list(&data.parameters)?;
        self.write(" ");
        self.emit_function_body(idx, &data.parameters, data.body, prologue)?;
        self.write(";");
        Ok(())
    }

    pub(super) fn emit_function_object(
        &mut self,
        idx: NodeIndex,
        data: &'a FunctionObjectData,
    ) -> Result<(), EmitError> {
        self.write_mapped(idx, "function", None)?;
        self.emit_parameter_list(&data.parameters)?;
        self.write(" ");
        self.emit_function_body(idx, &data.parameters, data.body, None)
    }

    /// `(a, b)`: parameter names only; types and defaults are handled in
    /// the body.
    pub(super) fn emit_parameter_list(&mut self, parameters: &'a [NodeIndex]) -> Result<(), EmitError> {
        self.write("(");
        for (i, &parameter) in parameters.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            let data = self.parameter_data(parameter)?;
            self.write_mapped(parameter, &data.name, Some(data.name.as_str()))?;
        }
        self.write(")");
        Ok(())
    }

    fn parameter_data(&self, parameter: NodeIndex) -> Result<&'a ParameterData, EmitError> {
        match self.kind(parameter) {
            Some(NodeKind::Parameter(data)) => Ok(data),
            Some(kind) => Err(EmitError::UnhandledNode {
                kind: kind.name(),
                node: parameter,
            }),
            None => Err(EmitError::DanglingNode { node: parameter }),
        }
    }

    /// Body block with the function prologue: `self` capture, parameter
    /// defaults, then for constructors the super call and field
    /// initializers. A NONE body lowers to an empty block.
    pub(super) fn emit_function_body(
        &mut self,
        function: NodeIndex,
        parameters: &'a [NodeIndex],
        body: NodeIndex,
        prologue: Option<ConstructorPrologue<'_>>,
    ) -> Result<(), EmitError> {
        let statements: &'a [NodeIndex] = match self.kind(body) {
            Some(NodeKind::Block(statements)) => statements,
            Some(kind) => {
                return Err(EmitError::UnhandledNode {
                    kind: kind.name(),
                    node: body,
                });
            }
            None => &[],
        };

        // A leading super call must run before field initializers.
        let (super_call, rest) = match statements.split_first() {
            Some((&first, rest)) if prologue.is_some() && self.is_super_call_statement(first) => {
                (Some(first), rest)
            }
            _ => (None, statements),
        };

        let captures_self =
            self.arena.is_class_member(function) && self.declares_nested_function(function);
        self.emit_braced(rest, |p| {
            if captures_self {
                p.write("var self = this;");
                p.write_line();
            }
            for &parameter in parameters {
                p.emit_parameter_default(parameter)?;
            }
            if let Some(statement) = super_call {
                p.emit_statement(statement)?;
            }
            if let Some(prologue) = prologue {
                for &field in prologue.initializers {
                    p.emit_field_initializer(field)?;
                }
            }
            Ok(())
        })
    }

    /// `p = typeof p !== 'undefined' ? p : <default>;`
    fn emit_parameter_default(&mut self, parameter: NodeIndex) -> Result<(), EmitError> {
        let data = self.parameter_data(parameter)?;
        if data.default_value.is_none() {
            return Ok(());
        }
        let name = data.name.as_str();
        self.with_mapping(parameter, Some(name), |p| {
            p.write(&format!("{name} = typeof {name} !== 'undefined' ? {name} : "));
            p.emit(data.default_value)?;
            p.write(";");
            Ok(())
        })?;
        self.write_line();
        Ok(())
    }

    fn is_super_call_statement(&self, statement: NodeIndex) -> bool {
        let Some(NodeKind::ExpressionStatement(expr)) = self.kind(statement) else {
            return false;
        };
        matches!(
            self.kind(*expr),
            Some(NodeKind::Call(call)) if matches!(self.kind(call.callee), Some(NodeKind::Super))
        )
    }
}
