//! Member access lowering: `left.right`, `left..right`, `left.ns::name`,
//! `left.@attr`.

use super::Printer;
use super::closures::ClosureReceiver;
use crate::builtins::{self, ArrayOp};
use crate::error::EmitError;
use crate::naming::NameFormatter;
use jxc_ast::node::{AccessOperator, MemberAccessData, NamespaceAccessData};
use jxc_ast::{NamespaceRef, NodeIndex, NodeKind, Symbol, SymbolKind};
use jxc_common::diagnostics::diagnostic_codes;

impl<'a> Printer<'a> {
    pub(super) fn emit_member_access(
        &mut self,
        idx: NodeIndex,
        data: &'a MemberAccessData,
    ) -> Result<(), EmitError> {
        if let Some(value) = self.folded_constant_of(idx) {
            return self.write_mapped(idx, value, None);
        }

        if let Some(getter) = self.date_component(data).and_then(builtins::date_getter) {
            self.emit(data.left)?;
            return self.with_mapping_after(idx, data.left, |p| {
                p.write(".");
                p.write(getter);
                p.write("()");
                Ok(())
            });
        }

        if let Some(NodeKind::Attribute(attribute)) = self.kind(data.right) {
            self.emit(data.left)?;
            let lookup = format!(".attribute('{attribute}')");
            return self.write_mapped(data.right, &lookup, None);
        }

        let member = self.resolve_member(idx, data);

        // Dynamic lookups apply only when the access itself did not resolve.
        if member.is_none()
            && let Some(name) = self.identifier_name(data.right)
            && let Some(left_type) = self.resolver.static_type_of(data.left)
        {
            let plain = data.operator == AccessOperator::Member && !self.arena.is_callee(idx);
            let lookup = match data.operator {
                AccessOperator::Descendants if left_type.is_xml_like() => {
                    Some(format!(".descendants('{name}')"))
                }
                _ if plain && left_type.is_xml_like() => Some(format!(".child('{name}')")),
                _ if plain && left_type.is_proxy() => Some(format!(".getProperty('{name}')")),
                _ => None,
            };
            if let Some(lookup) = lookup {
                tracing::trace!(name, ty = %left_type.qualified_name, "dynamic member lookup");
                self.emit(data.left)?;
                return self.write_mapped(data.right, &lookup, Some(name));
            }
        }

        if let Some(NodeKind::NamespaceAccess(namespace_access)) = self.kind(data.right) {
            return self.emit_namespace_qualified_access(idx, data, namespace_access, member);
        }

        if let Some(member) = member
            && let Some(owner) = member.parent.as_deref()
            && let Some(op) = ArrayOp::from_member(owner, &member.name)
        {
            self.emit(data.left)?;
            self.with_mapping_after(idx, data.left, |p| {
                p.write(".");
                Ok(())
            })?;
            return self.write_mapped(data.right, op.renamed(), Some(member.name.as_str()));
        }

        let is_static = member.is_some_and(Symbol::is_static);
        if let Some(member) = member
            && self.should_bind(idx, member)
        {
            let receiver = if matches!(self.kind(data.left), Some(NodeKind::Super)) {
                ClosureReceiver::Super
            } else {
                ClosureReceiver::Expression(data.left)
            };
            return self.emit_bound_closure(member, receiver, |p| {
                p.emit_member_chain(idx, data, Some(member), is_static)
            });
        }
        self.emit_member_chain(idx, data, member, is_static)
    }

    /// Definition the access refers to. The right identifier carries the
    /// binding in most trees; the access node itself is the fallback.
    pub(super) fn resolve_member(
        &self,
        idx: NodeIndex,
        data: &MemberAccessData,
    ) -> Option<&'a Symbol> {
        self.resolve(data.right).or_else(|| self.resolve(idx))
    }

    /// Date component named by the right operand of an access on a `Date`.
    pub(super) fn date_component(&self, data: &MemberAccessData) -> Option<&'a str> {
        if data.operator != AccessOperator::Member {
            return None;
        }
        let name = self.identifier_name(data.right)?;
        let is_date = self
            .resolver
            .static_type_of(data.left)
            .is_some_and(|ty| ty.is_date());
        (is_date && builtins::date_getter(name).is_some()).then_some(name)
    }

    /// Receiver, punctuation, then the right operand.
    fn emit_member_chain(
        &mut self,
        idx: NodeIndex,
        data: &'a MemberAccessData,
        member: Option<&'a Symbol>,
        is_static: bool,
    ) -> Result<(), EmitError> {
        if !is_static && !self.write_left_side(data, member)? {
            return Ok(());
        }

        if member.is_none()
            && self.options.naming.treat_unknown_dynamic_member_as_bracket_access
            && let Some(name) = self.identifier_name(data.right)
        {
            tracing::trace!(name, "unknown member written as bracket access");
            let key = NameFormatter::bracket(name);
            return self.with_mapping_after(idx, data.left, |p| {
                p.write(&key);
                Ok(())
            });
        }

        let custom_namespace = member.is_some_and(|m| m.custom_namespace().is_some());
        if !is_static && !custom_namespace {
            self.with_mapping_after(idx, data.left, |p| {
                p.write(data.operator.text());
                Ok(())
            })?;
        }
        self.emit(data.right)
    }

    /// Write the receiver. Returns false when a `super` form already
    /// produced the complete access.
    pub(super) fn write_left_side(
        &mut self,
        data: &MemberAccessData,
        member: Option<&Symbol>,
    ) -> Result<bool, EmitError> {
        if !matches!(self.kind(data.left), Some(NodeKind::Super)) {
            self.emit(data.left)?;
            return Ok(true);
        }

        let class_name = self.current_class_name(data.left, "super access")?;
        let member_name = member
            .map(|m| m.name.as_str())
            .or_else(|| self.identifier_name(data.right));
        match (member, member_name) {
            (Some(m), Some(name)) if m.is_accessor() => {
                let text = format!("{class_name}.superClass_.get__{name}.apply(this)");
                self.write_mapped(data.left, &text, None)?;
                Ok(false)
            }
            (Some(m), Some(name)) if m.kind == SymbolKind::Function => {
                let text = format!("{class_name}.superClass_.{name}");
                self.write_mapped(data.left, &text, None)?;
                Ok(false)
            }
            _ => {
                self.write_mapped(data.left, "this", None)?;
                Ok(true)
            }
        }
    }

    /// `left.ns::name`: plain access under the private pseudo-namespace,
    /// otherwise bracket access through a runtime qualified-name value.
    fn emit_namespace_qualified_access(
        &mut self,
        idx: NodeIndex,
        data: &'a MemberAccessData,
        access: &'a NamespaceAccessData,
        member: Option<&'a Symbol>,
    ) -> Result<(), EmitError> {
        let write_access = |p: &mut Self| -> Result<(), EmitError> {
            if !p.write_left_side(data, member)? {
                return Ok(());
            }
            let local_name = p.identifier_name(access.name).unwrap_or_default();
            let namespace_symbol = p.resolve(access.namespace);
            let namespace_text = p.identifier_name(access.namespace).unwrap_or_default();

            let is_private = namespace_text == "private"
                || namespace_symbol.is_some_and(|s| s.namespace == NamespaceRef::Private);
            if is_private {
                p.with_mapping_after(idx, data.left, |p| {
                    p.write(data.operator.text());
                    Ok(())
                })?;
                return p.write_mapped(access.name, local_name, Some(local_name));
            }

            let namespace_name = match namespace_symbol {
                Some(symbol) => {
                    p.used_names.insert(&symbol.qualified_name);
                    p.names.qualified(&symbol.qualified_name)
                }
                None => {
                    p.report_warning(
                        access.namespace,
                        diagnostic_codes::UNRESOLVED_NAMESPACE,
                        &[namespace_text],
                    );
                    namespace_text.to_string()
                }
            };
            let qname = p.names.qualified(&p.options.runtime.qname);
            let key = format!("[new {qname}({namespace_name}, '{local_name}').objectAccessFormat()]");
            p.write_mapped(data.right, &key, Some(local_name))
        };

        match member {
            Some(member) if self.should_bind(idx, member) => {
                let receiver = if matches!(self.kind(data.left), Some(NodeKind::Super)) {
                    ClosureReceiver::Super
                } else {
                    ClosureReceiver::Expression(data.left)
                };
                self.emit_bound_closure(member, receiver, write_access)
            }
            _ => write_access(self),
        }
    }

    /// Formatted qualified name of the class being lowered.
    pub(super) fn current_class_name(
        &self,
        node: NodeIndex,
        construct: &'static str,
    ) -> Result<String, EmitError> {
        self.class_stack
            .last()
            .map(|context| self.names.qualified(context.qualified_name()))
            .ok_or(EmitError::NoClassContext { construct, node })
    }
}
