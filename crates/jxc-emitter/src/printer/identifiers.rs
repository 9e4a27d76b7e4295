//! Identifier resolution.
//!
//! Rules are tried in order and the first match wins:
//! 1. non-resolving identifiers are written verbatim;
//! 2. `Type.CONSTANT` on a primitive wrapper folds to its literal;
//! 3. static members are written through their declaring type;
//! 4. instance members get an implicit receiver, bound in a closure when
//!    a method is used as a value;
//! 5. everything else picks qualified or short text by position;
//! 6. unresolved names inside an E4X filter read from the filtered node.

use super::Printer;
use super::closures::ClosureReceiver;
use super::helpers::ImplicitReceiver;
use crate::builtins;
use crate::error::EmitError;
use crate::naming::NameFormatter;
use jxc_ast::{Classification, NodeIndex, NodeKind, Symbol, SymbolKind};

impl<'a> Printer<'a> {
    pub(super) fn emit_identifier(&mut self, idx: NodeIndex) -> Result<(), EmitError> {
        let Some(NodeKind::Identifier(ident)) = self.kind(idx) else {
            return Err(EmitError::UnhandledNode {
                kind: self.kind(idx).map_or("missing", NodeKind::name),
                node: idx,
            });
        };
        let name = ident.name.as_str();

        if ident.non_resolving {
            return self.write_mapped(idx, name, Some(name));
        }

        let parent = self.arena.parent(idx);
        if self.arena.is_member_access_right(idx)
            && let Some(value) = self.folded_constant_of(parent)
        {
            return self.write_mapped(parent, value, None);
        }

        let Some(symbol) = self.resolve(idx) else {
            return self.emit_unresolved_identifier(idx, name);
        };

        if symbol.is_static()
            && symbol.classification == Classification::ClassMember
            && !symbol.is_constructor()
        {
            return self.emit_static_member_reference(idx, symbol);
        }

        if Self::takes_implicit_receiver(symbol) && !self.arena.is_member_access_right(idx) {
            let receiver = self.implicit_receiver(idx);
            if self.should_bind(idx, symbol) {
                return self.emit_bound_closure(
                    symbol,
                    ClosureReceiver::Implicit(receiver),
                    |p| p.write_implicit_member(idx, symbol, receiver),
                );
            }
            return self.write_implicit_member(idx, symbol, receiver);
        }

        let text = self.identifier_text(idx, symbol);
        self.write_mapped(idx, &text, Some(name))
    }

    /// Instance members referenced without an explicit receiver.
    fn takes_implicit_receiver(symbol: &Symbol) -> bool {
        symbol.classification == Classification::ClassMember
            && !symbol.is_static()
            && !symbol.is_constructor()
            && matches!(
                symbol.kind,
                SymbolKind::Variable | SymbolKind::Function | SymbolKind::Getter | SymbolKind::Setter
            )
    }

    /// `this.name`, `self.name`, or the namespaced bracket form.
    pub(super) fn write_implicit_member(
        &mut self,
        idx: NodeIndex,
        symbol: &Symbol,
        receiver: ImplicitReceiver,
    ) -> Result<(), EmitError> {
        let member = match symbol.custom_namespace() {
            Some((namespace, uri)) => {
                self.used_names.insert(namespace);
                NameFormatter::bracket(&NameFormatter::namespaced_property(uri, &symbol.name))
            }
            None => format!(".{}", self.names.member_name(symbol)),
        };
        self.with_mapping(idx, Some(symbol.name.as_str()), |p| {
            p.write(receiver.text());
            p.write(&member);
            Ok(())
        })
    }

    /// Static member: declaring type, then `.name` or a bracket form.
    ///
    /// Inside `Type.member` the receiver was skipped by member access, so the
    /// type name written here is mapped to the left operand.
    fn emit_static_member_reference(
        &mut self,
        idx: NodeIndex,
        symbol: &'a Symbol,
    ) -> Result<(), EmitError> {
        let parent = self.arena.parent(idx);
        let access_left = match self.kind(parent) {
            Some(NodeKind::MemberAccess(access)) if access.right == idx => Some(access.left),
            _ => None,
        };

        if let Some(owner) = symbol.parent.as_deref().filter(|owner| !owner.is_empty()) {
            let owner_text = self.names.qualified(owner);
            self.write_mapped(access_left.unwrap_or(idx), &owner_text, None)?;
        }

        if let Some((namespace, uri)) = symbol.custom_namespace() {
            self.used_names.insert(namespace);
            let key = NameFormatter::bracket(&NameFormatter::namespaced_property(uri, &symbol.name));
            return self.write_mapped(idx, &key, Some(symbol.name.as_str()));
        }
        if symbol.is_accessor() {
            let key = NameFormatter::bracket(&symbol.name);
            return self.write_mapped(idx, &key, Some(symbol.name.as_str()));
        }

        if symbol.parent.as_deref().is_some_and(|owner| !owner.is_empty()) {
            match access_left {
                Some(left) => self.with_mapping_after(parent, left, |p| {
                    p.write(".");
                    Ok(())
                })?,
                None => self.write("."),
            }
        }
        self.write_mapped(idx, &symbol.name, Some(symbol.name.as_str()))
    }

    /// Text of a resolved identifier that needs no receiver.
    fn identifier_text(&mut self, idx: NodeIndex, symbol: &Symbol) -> String {
        if self.arena.is_member_access_right(idx) {
            if let Some((namespace, uri)) = symbol.custom_namespace() {
                self.used_names.insert(namespace);
                return NameFormatter::bracket(&NameFormatter::namespaced_property(uri, &symbol.name));
            }
            return self.names.member_name(symbol);
        }

        if symbol.is_class() {
            if builtins::is_synthetic_type(&symbol.qualified_name) && !self.arena.is_callee(idx) {
                let language = self.language_helper();
                return format!(
                    "{language}.synthType('{}')",
                    self.names.qualified(&symbol.qualified_name)
                );
            }
            return self.names.qualified(&symbol.qualified_name);
        }

        if symbol.is_top_level() {
            return self.names.qualified(&symbol.qualified_name);
        }

        if let Some((namespace, uri)) = symbol.custom_namespace() {
            self.used_names.insert(namespace);
            return NameFormatter::bracket(&NameFormatter::namespaced_property(uri, &symbol.name));
        }
        self.names.member_name(symbol)
    }

    /// No symbol: dynamic name, possibly read from an E4X filter node.
    fn emit_unresolved_identifier(&mut self, idx: NodeIndex, name: &str) -> Result<(), EmitError> {
        let parent = self.arena.parent(idx);
        let grandparent = self.arena.parent(parent);

        if self.in_filter(idx) && !self.arena.is_member_access_right(idx) {
            tracing::trace!(name, "unresolved name read from filter node");
            self.write("node.");
        }

        let parent_is_access = matches!(self.kind(parent), Some(NodeKind::MemberAccess(_)));
        if matches!(self.kind(grandparent), Some(NodeKind::Filter(_))) && !parent_is_access {
            let lookup = format!("child('{name}')");
            return self.write_mapped(idx, &lookup, Some(name));
        }
        self.write_mapped(idx, name, Some(name))
    }
}
