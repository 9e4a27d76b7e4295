//! Assignment coercion for variables of built-in value types.

use super::Printer;
use crate::builtins::Coercion;
use crate::error::EmitError;
use jxc_ast::{NodeIndex, NodeKind};

impl<'a> Printer<'a> {
    /// Write `value` as assigned to a variable annotated with `annotation`.
    ///
    /// An annotation that names no type is an internal error: the resolver
    /// is expected to have bound every written type.
    pub(super) fn emit_assignment_coercion(
        &mut self,
        value: NodeIndex,
        annotation: NodeIndex,
    ) -> Result<(), EmitError> {
        if annotation.is_none() {
            return self.emit(value);
        }
        let Some(type_name) = self.annotation_type(annotation) else {
            return Err(EmitError::MissingTypeReference { node: annotation });
        };
        let coercion = match Coercion::for_type(type_name) {
            Some(coercion) if !self.already_coerced(value, coercion) => coercion,
            _ => return self.emit(value),
        };

        match coercion {
            Coercion::Int | Coercion::Uint => {
                self.write("(");
                self.emit(value)?;
                self.write(if coercion == Coercion::Int { ") >> 0" } else { ") >>> 0" });
            }
            Coercion::Boolean => {
                self.write("!!(");
                self.emit(value)?;
                self.write(")");
            }
            Coercion::String => {
                self.write_language_call_start("string");
                self.emit(value)?;
                self.write(")");
            }
        }
        Ok(())
    }

    /// Literals that already have the target type need no conversion.
    fn already_coerced(&self, value: NodeIndex, coercion: Coercion) -> bool {
        match (self.kind(value), coercion) {
            (Some(NodeKind::NumericLiteral(text)), Coercion::Int | Coercion::Uint) => {
                text.bytes().all(|b| b.is_ascii_digit())
            }
            (Some(NodeKind::BooleanLiteral(_)), Coercion::Boolean) => true,
            (Some(NodeKind::StringLiteral(_)), Coercion::String) => true,
            (Some(NodeKind::NullLiteral), Coercion::String) => true,
            _ => false,
        }
    }
}
