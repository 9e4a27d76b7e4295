//! Bound-method closures, shared by identifier and member-access lowering.

use super::Printer;
use super::helpers::ImplicitReceiver;
use crate::error::EmitError;
use jxc_ast::{NodeIndex, Symbol};

/// Where the receiver of a bound closure comes from.
#[derive(Clone, Copy, Debug)]
pub(super) enum ClosureReceiver {
    /// Bare method name inside the class.
    Implicit(ImplicitReceiver),
    /// Left operand of a member access, written again as the receiver.
    Expression(NodeIndex),
    /// `super.method`; the receiver is the current instance.
    Super,
}

impl<'a> Printer<'a> {
    /// A plain instance method referenced as a value needs binding.
    pub(super) fn should_bind(&self, node: NodeIndex, member: &Symbol) -> bool {
        member.is_method()
            && !member.is_static()
            && !self.options.naming.suppress_closure_wrapping
            && self.is_value_position(node)
    }

    /// `Language.closure(<function>, <receiver>, '<name>')`
    ///
    /// `write_function` writes the receiver-qualified method reference.
    pub(super) fn emit_bound_closure<F>(
        &mut self,
        member: &Symbol,
        receiver: ClosureReceiver,
        write_function: F,
    ) -> Result<(), EmitError>
    where
        F: FnOnce(&mut Self) -> Result<(), EmitError>,
    {
        self.write_language_call_start("closure");
        write_function(self)?;
        self.write(", ");
        match receiver {
            ClosureReceiver::Implicit(implicit) => self.write(implicit.text()),
            ClosureReceiver::Expression(left) => self.emit(left)?,
            ClosureReceiver::Super => self.write("this"),
        }
        self.write(", '");
        self.write(&member.name);
        self.write("')");
        Ok(())
    }
}
