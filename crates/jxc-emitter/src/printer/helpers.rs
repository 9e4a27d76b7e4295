use super::Printer;
use crate::builtins;
use crate::error::EmitError;
use jxc_ast::{NodeIndex, NodeKind, Symbol};
use jxc_common::diagnostics::{format_message, get_message_template};
use jxc_common::{Diagnostic, SourceRange};

/// Receiver written in place of an implicit `this`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum ImplicitReceiver {
    This,
    /// Captured outer instance, declared by `var self = this;`.
    SelfCapture,
}

impl ImplicitReceiver {
    pub(super) const fn text(self) -> &'static str {
        match self {
            ImplicitReceiver::This => "this",
            ImplicitReceiver::SelfCapture => "self",
        }
    }
}

impl<'a> Printer<'a> {
    // =========================================================================
    // Output Helpers (delegate to SourceWriter)
    // =========================================================================

    pub(super) fn write(&mut self, text: &str) {
        self.writer.write(text);
    }

    pub(super) fn write_line(&mut self) {
        self.writer.write_line();
    }

    pub(super) fn increase_indent(&mut self) {
        self.writer.increase_indent();
    }

    pub(super) fn decrease_indent(&mut self) {
        self.writer.decrease_indent();
    }

    /// Separate two top-level declarations with an empty line.
    pub(super) fn write_separator(&mut self) {
        if !self.writer.is_empty() {
            self.writer.ensure_line_start();
            self.writer.write_line();
        }
    }

    // =========================================================================
    // Mapping Helpers
    // =========================================================================

    /// Run `f` inside a mapping for the source range of `node`.
    pub(super) fn with_mapping<F>(
        &mut self,
        node: NodeIndex,
        name: Option<&str>,
        f: F,
    ) -> Result<(), EmitError>
    where
        F: FnOnce(&mut Self) -> Result<(), EmitError>,
    {
        let range = self.arena.range(node);
        self.with_mapping_range(range, name, f)
    }

    /// Run `f` inside a mapping for `node`, with the source start moved to
    /// the end of `after`. Used for punctuation between two operands.
    pub(super) fn with_mapping_after<F>(
        &mut self,
        node: NodeIndex,
        after: NodeIndex,
        f: F,
    ) -> Result<(), EmitError>
    where
        F: FnOnce(&mut Self) -> Result<(), EmitError>,
    {
        let range = SourceRange::new(self.arena.range(after).end, self.arena.range(node).end);
        self.with_mapping_range(range, None, f)
    }

    pub(super) fn with_mapping_range<F>(
        &mut self,
        range: SourceRange,
        name: Option<&str>,
        f: F,
    ) -> Result<(), EmitError>
    where
        F: FnOnce(&mut Self) -> Result<(), EmitError>,
    {
        let token = self
            .mappings
            .open(range, self.writer.position(), name.map(str::to_string));
        f(self)?;
        self.mappings.close(token, self.writer.position())
    }

    /// Write `text` as one mapped fragment of `node`.
    pub(super) fn write_mapped(
        &mut self,
        node: NodeIndex,
        text: &str,
        name: Option<&str>,
    ) -> Result<(), EmitError> {
        self.with_mapping(node, name, |p| {
            p.write(text);
            Ok(())
        })
    }

    // =========================================================================
    // Resolution Helpers
    // =========================================================================

    pub(super) fn resolve(&self, node: NodeIndex) -> Option<&'a Symbol> {
        self.resolver.resolve(node)
    }

    pub(super) fn kind(&self, node: NodeIndex) -> Option<&'a NodeKind> {
        self.arena.kind(node)
    }

    pub(super) fn identifier_name(&self, node: NodeIndex) -> Option<&'a str> {
        self.arena.identifier_name(node)
    }

    /// Qualified name of the type an annotation node names, if it resolved.
    pub(super) fn annotation_type(&self, annotation: NodeIndex) -> Option<&'a str> {
        if annotation.is_none() {
            return None;
        }
        self.resolve(annotation)
            .map(|symbol| symbol.qualified_name.as_str())
    }

    /// Annotation type for doc comments: resolved name, else source text.
    pub(super) fn annotation_doc_type(&self, annotation: NodeIndex) -> String {
        let name = self
            .annotation_type(annotation)
            .or_else(|| self.identifier_name(annotation));
        match name {
            None => "*".to_string(),
            Some(name) => builtins::doc_type_name(name)
                .map_or_else(|| self.names.qualified(name), str::to_string),
        }
    }

    // =========================================================================
    // Runtime Helper Names
    // =========================================================================

    /// Formatted name of the language utility class; marks it as required.
    pub(super) fn language_helper(&mut self) -> String {
        self.needs_language_helper = true;
        self.names.qualified(&self.options.runtime.language)
    }

    /// Write `Language.<function>(`.
    pub(super) fn write_language_call_start(&mut self, function: &str) {
        let language = self.language_helper();
        self.write(&language);
        self.write(".");
        self.write(function);
        self.write("(");
    }

    // =========================================================================
    // Syntactic Context
    // =========================================================================

    /// Receiver for an implicit member reference at `node`.
    ///
    /// Function-object literals and local functions rebind `this`, so code
    /// inside them reaches the instance through the captured `self`.
    pub(super) fn implicit_receiver(&self, node: NodeIndex) -> ImplicitReceiver {
        let in_function_object = self
            .arena
            .find_ancestor(node, |kind| matches!(kind, NodeKind::FunctionObject(_)))
            .is_some();
        if in_function_object {
            return ImplicitReceiver::SelfCapture;
        }
        match self.arena.enclosing_function(node) {
            Some(function) if self.arena.is_local_function(function) => {
                ImplicitReceiver::SelfCapture
            }
            _ => ImplicitReceiver::This,
        }
    }

    /// A reference used as a value: not called, not accessed further, not
    /// indexed.
    pub(super) fn is_value_position(&self, node: NodeIndex) -> bool {
        !self.arena.is_callee(node)
            && !self.arena.is_member_access_left(node)
            && !self.arena.is_index_access_object(node)
    }

    /// Inside the predicate of an E4X filter. The filtered object itself is
    /// outside the predicate.
    pub(super) fn in_filter(&self, node: NodeIndex) -> bool {
        let mut child = node;
        for ancestor in self.arena.ancestors(node) {
            if let Some(NodeKind::Filter(filter)) = self.kind(ancestor)
                && filter.predicate == child
            {
                return true;
            }
            child = ancestor;
        }
        false
    }

    /// Literal or constant that can be written inline as a static value.
    pub(super) fn is_scalar(&self, node: NodeIndex) -> bool {
        match self.kind(node) {
            Some(
                NodeKind::NumericLiteral(_)
                | NodeKind::StringLiteral(_)
                | NodeKind::BooleanLiteral(_)
                | NodeKind::NullLiteral
                | NodeKind::UndefinedLiteral,
            ) => true,
            Some(NodeKind::Unary(unary)) => {
                unary.prefix
                    && unary.operator == "-"
                    && matches!(self.kind(unary.operand), Some(NodeKind::NumericLiteral(_)))
            }
            Some(NodeKind::Parenthesized(inner)) => self.is_scalar(*inner),
            Some(NodeKind::MemberAccess(_)) => self.folded_constant_of(node).is_some(),
            _ => false,
        }
    }

    /// Literal text of `Type.CONSTANT` when the access folds.
    pub(super) fn folded_constant_of(&self, access: NodeIndex) -> Option<&'static str> {
        let Some(NodeKind::MemberAccess(data)) = self.kind(access) else {
            return None;
        };
        let owner = self.resolve(data.left).filter(|symbol| symbol.is_class())?;
        let member = self.identifier_name(data.right)?;
        builtins::folded_constant(&owner.qualified_name, member)
    }

    /// True when the body of `function` declares a nested function.
    pub(super) fn declares_nested_function(&self, function: NodeIndex) -> bool {
        let mut pending: Vec<NodeIndex> = self
            .kind(function)
            .and_then(|kind| match kind {
                NodeKind::Function(data) | NodeKind::Getter(data) | NodeKind::Setter(data) => {
                    Some(data.body)
                }
                _ => None,
            })
            .filter(|body| body.is_some())
            .into_iter()
            .collect();
        while let Some(node) = pending.pop() {
            match self.kind(node) {
                Some(NodeKind::FunctionObject(_) | NodeKind::Function(_)) => return true,
                Some(kind) => pending.extend(kind.children()),
                None => {}
            }
        }
        false
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub(super) fn report_warning(&mut self, node: NodeIndex, code: u32, args: &[&str]) {
        let message = get_message_template(code)
            .map(|template| format_message(template, args))
            .unwrap_or_default();
        tracing::trace!(code, node = %node, "lowering warning");
        self.diagnostics.push(Diagnostic::warning(
            self.source_path,
            self.arena.range(node),
            message,
            code,
        ));
    }
}
