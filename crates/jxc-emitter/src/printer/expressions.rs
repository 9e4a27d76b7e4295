use super::Printer;
use crate::builtins::{self, ArrayOp};
use crate::error::EmitError;
use jxc_ast::node::{
    BinaryData, CallData, ConditionalData, FilterData, IndexAccessData, UnaryData,
};
use jxc_ast::{NodeIndex, NodeKind};

impl<'a> Printer<'a> {
    // =========================================================================
    // Calls
    // =========================================================================

    pub(super) fn emit_call(&mut self, idx: NodeIndex, data: &'a CallData) -> Result<(), EmitError> {
        if matches!(self.kind(data.callee), Some(NodeKind::Super)) {
            return self.emit_super_constructor_call(idx, data);
        }

        if data.is_new {
            self.write_mapped(idx, "new ", None)?;
            self.emit(data.callee)?;
            return self.emit_arguments(&data.arguments);
        }

        self.emit(data.callee)?;

        if self.is_super_method_callee(data.callee) {
            self.write(".call(this");
            for &argument in &data.arguments {
                self.write(", ");
                self.emit(argument)?;
            }
            self.write(")");
            return Ok(());
        }

        match self.array_op_of(data.callee) {
            Some(ArrayOp::RemoveAt) => {
                self.write("(");
                self.emit_comma_separated(&data.arguments)?;
                self.write(", 1)[0]");
                Ok(())
            }
            Some(ArrayOp::InsertAt) => {
                self.write("(");
                if let Some((&index, rest)) = data.arguments.split_first() {
                    self.emit(index)?;
                    self.write(", 0");
                    for &argument in rest {
                        self.write(", ");
                        self.emit(argument)?;
                    }
                }
                self.write(")");
                Ok(())
            }
            None => self.emit_arguments(&data.arguments),
        }
    }

    /// `super(args)` -> `C.base(this, 'constructor', args)`
    fn emit_super_constructor_call(
        &mut self,
        idx: NodeIndex,
        data: &'a CallData,
    ) -> Result<(), EmitError> {
        let class_name = self.current_class_name(data.callee, "super call")?;
        self.with_mapping(idx, None, |p| {
            p.write(&class_name);
            p.write(".base(this, 'constructor'");
            for &argument in &data.arguments {
                p.write(", ");
                p.emit(argument)?;
            }
            p.write(")");
            Ok(())
        })
    }

    fn is_super_method_callee(&self, callee: NodeIndex) -> bool {
        let Some(NodeKind::MemberAccess(access)) = self.kind(callee) else {
            return false;
        };
        matches!(self.kind(access.left), Some(NodeKind::Super))
            && self
                .resolve_member(callee, access)
                .is_some_and(|member| member.kind == jxc_ast::SymbolKind::Function)
    }

    fn array_op_of(&self, callee: NodeIndex) -> Option<ArrayOp> {
        let Some(NodeKind::MemberAccess(access)) = self.kind(callee) else {
            return None;
        };
        let member = self.resolve_member(callee, access)?;
        ArrayOp::from_member(member.parent.as_deref()?, &member.name)
    }

    pub(super) fn emit_arguments(&mut self, arguments: &[NodeIndex]) -> Result<(), EmitError> {
        self.write("(");
        self.emit_comma_separated(arguments)?;
        self.write(")");
        Ok(())
    }

    pub(super) fn emit_comma_separated(&mut self, nodes: &[NodeIndex]) -> Result<(), EmitError> {
        for (i, &node) in nodes.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit(node)?;
        }
        Ok(())
    }

    // =========================================================================
    // Operators
    // =========================================================================

    pub(super) fn emit_binary(&mut self, idx: NodeIndex, data: &'a BinaryData) -> Result<(), EmitError> {
        match data.operator.as_str() {
            "is" | "as" => {
                self.write_language_call_start(&data.operator);
                self.emit(data.left)?;
                self.write(", ");
                self.emit(data.right)?;
                self.write(")");
                return Ok(());
            }
            "=" => {
                if self.emit_date_setter(data)? || self.emit_super_setter(data)? {
                    return Ok(());
                }
            }
            _ => {}
        }

        self.emit(data.left)?;
        self.with_mapping_after(idx, data.left, |p| {
            p.write(" ");
            p.write(&data.operator);
            p.write(" ");
            Ok(())
        })?;
        self.emit(data.right)
    }

    /// `d.month = v` -> `d.setMonth(v)`
    fn emit_date_setter(&mut self, data: &'a BinaryData) -> Result<bool, EmitError> {
        let Some(NodeKind::MemberAccess(access)) = self.kind(data.left) else {
            return Ok(false);
        };
        let Some(setter) = self.date_component(access).and_then(builtins::date_setter) else {
            return Ok(false);
        };
        self.emit(access.left)?;
        self.write_mapped(access.right, &format!(".{setter}("), None)?;
        self.emit(data.right)?;
        self.write(")");
        Ok(true)
    }

    /// `super.x = v` -> `C.superClass_.set__x.call(this, v)`
    fn emit_super_setter(&mut self, data: &'a BinaryData) -> Result<bool, EmitError> {
        let Some(NodeKind::MemberAccess(access)) = self.kind(data.left) else {
            return Ok(false);
        };
        if !matches!(self.kind(access.left), Some(NodeKind::Super)) {
            return Ok(false);
        }
        let Some(member) = self
            .resolve_member(data.left, access)
            .filter(|member| member.is_accessor())
        else {
            return Ok(false);
        };
        let class_name = self.current_class_name(access.left, "super access")?;
        let text = format!("{class_name}.superClass_.set__{}.call(this, ", member.name);
        self.write_mapped(data.left, &text, None)?;
        self.emit(data.right)?;
        self.write(")");
        Ok(true)
    }

    pub(super) fn emit_unary(&mut self, idx: NodeIndex, data: &'a UnaryData) -> Result<(), EmitError> {
        if !data.prefix {
            self.emit(data.operand)?;
            return self.write_mapped(idx, &data.operator, None);
        }
        let is_word = data.operator.chars().all(|c| c.is_ascii_alphabetic());
        self.with_mapping(idx, None, |p| {
            p.write(&data.operator);
            if is_word {
                p.write(" ");
            }
            Ok(())
        })?;
        self.emit(data.operand)
    }

    pub(super) fn emit_conditional(&mut self, data: &'a ConditionalData) -> Result<(), EmitError> {
        self.emit(data.condition)?;
        self.write(" ? ");
        self.emit(data.when_true)?;
        self.write(" : ");
        self.emit(data.when_false)
    }

    pub(super) fn emit_parenthesized(&mut self, expr: NodeIndex) -> Result<(), EmitError> {
        self.write("(");
        self.emit(expr)?;
        self.write(")");
        Ok(())
    }

    pub(super) fn emit_index_access(&mut self, data: &'a IndexAccessData) -> Result<(), EmitError> {
        self.emit(data.object)?;
        self.write("[");
        self.emit(data.index)?;
        self.write("]");
        Ok(())
    }

    // =========================================================================
    // E4X
    // =========================================================================

    /// `x.(cond)` -> `x.filter(function(node){return (cond);})`
    pub(super) fn emit_filter(&mut self, idx: NodeIndex, data: &'a FilterData) -> Result<(), EmitError> {
        self.emit(data.object)?;
        self.write_mapped(idx, ".filter(function(node){return (", None)?;
        self.emit(data.predicate)?;
        self.write(");})");
        Ok(())
    }

    /// Attribute read outside a member access, e.g. `@id` in a filter.
    pub(super) fn emit_attribute(&mut self, idx: NodeIndex, name: &str) -> Result<(), EmitError> {
        let receiver = if self.in_filter(idx) { "node." } else { "" };
        let text = format!("{receiver}attribute('{name}')");
        self.write_mapped(idx, &text, None)
    }
}
