//! Class lowering.
//!
//! A class declaration flattens to, in order:
//! 1. the constructor (explicit, or synthesized when instance fields need
//!    initializing) followed by the inheritance call;
//! 2. the reflection export, unless the class doc suppresses it;
//! 3. plain fields and methods in declaration order;
//! 4. bindable properties, then getter/setter properties;
//! 5. the static initializer statements for non-scalar static fields.
//!
//! Accessor code may refer to anything defined before it, so steps 3 and 4
//! never interleave.

use super::Printer;
use super::docs::suppresses_export;
use super::functions::ConstructorPrologue;
use crate::class_context::{AccessorPair, ClassLoweringContext};
use crate::error::EmitError;
use crate::naming::NameFormatter;
use crate::reflection::{MemberInfo, MemberKind};
use jxc_ast::node::{ClassData, FunctionData, VariableData};
use jxc_ast::{NodeIndex, NodeKind, Symbol};
use jxc_common::diagnostics::diagnostic_codes;

/// One entry of an `Object.defineProperties` call.
struct PropertyEntry {
    name: String,
    has_getter: bool,
    has_setter: bool,
}

impl<'a> Printer<'a> {
    #[tracing::instrument(level = "trace", skip(self, data), fields(class = %data.name))]
    pub(super) fn emit_class(&mut self, idx: NodeIndex, data: &'a ClassData) -> Result<(), EmitError> {
        let members: &'a [NodeIndex] = match self.kind(data.body) {
            Some(NodeKind::Block(statements)) => statements,
            Some(kind) => {
                return Err(EmitError::UnhandledNode {
                    kind: kind.name(),
                    node: data.body,
                });
            }
            None => &[],
        };

        let symbol = self.class_symbol(idx, data);
        let base = self.base_class_name(data.base);
        self.force_link(members);

        self.class_stack.push(ClassLoweringContext::new(idx, symbol, base));
        let result = self.emit_class_members(idx, data, members);
        let context = self.class_stack.pop();
        let infos = result?;

        if let Some(context) = context {
            self.class_info_sink.emit_class_info(&context.symbol, &infos);
        }
        Ok(())
    }

    /// Resolved class symbol, or one derived from the enclosing package.
    fn class_symbol(&mut self, idx: NodeIndex, data: &ClassData) -> Symbol {
        if let Some(symbol) = self.resolve(idx).filter(|symbol| symbol.is_class()) {
            return symbol.clone();
        }
        self.report_warning(idx, diagnostic_codes::UNRESOLVED_CLASS_DECLARATION, &[data.name.as_str()]);
        let qualified_name = if self.package_name.is_empty() {
            data.name.clone()
        } else {
            format!("{}.{}", self.package_name, data.name)
        };
        tracing::debug!(%qualified_name, "class declaration did not resolve");
        Symbol::class(&qualified_name)
    }

    fn base_class_name(&self, base: NodeIndex) -> Option<String> {
        if base.is_none() {
            return None;
        }
        self.resolve(base)
            .map(|symbol| symbol.qualified_name.clone())
            .or_else(|| self.identifier_name(base).map(str::to_string))
    }

    /// `import a.B; B;` in the class body keeps `a.B` alive through
    /// dead-code elimination. Only this exact adjacent pair counts.
    fn force_link(&mut self, statements: &[NodeIndex]) {
        for pair in statements.windows(2) {
            let [import, reference] = *pair else {
                continue;
            };
            if !matches!(self.kind(import), Some(NodeKind::Import(_)))
                || !self.is_bare_identifier(reference)
            {
                continue;
            }
            if let Some(class) = self.resolve(reference).filter(|symbol| symbol.is_class()) {
                tracing::trace!(name = %class.qualified_name, "force-linked class");
                self.used_names.insert(&class.qualified_name);
            }
        }
    }

    fn class_context_mut(&mut self, node: NodeIndex) -> Result<&mut ClassLoweringContext, EmitError> {
        self.class_stack.last_mut().ok_or(EmitError::NoClassContext {
            construct: "class member",
            node,
        })
    }

    fn emit_class_members(
        &mut self,
        idx: NodeIndex,
        data: &'a ClassData,
        members: &'a [NodeIndex],
    ) -> Result<Vec<MemberInfo>, EmitError> {
        let class_name = self.current_class_name(idx, "class")?;
        let base_name = self
            .class_stack
            .last()
            .and_then(|context| context.base.as_deref())
            .map(|base| self.names.qualified(base));
        let mut infos = Vec::new();

        // Field initializers that cannot be written inline.
        let mut instance_initializers = Vec::new();
        let mut static_initializers = Vec::new();
        for &member in members {
            let Some(field) = self.kind(member).and_then(NodeKind::as_variable) else {
                continue;
            };
            if field.initializer.is_none() {
                continue;
            }
            if !field.is_static {
                instance_initializers.push(member);
            } else if !self.is_scalar(field.initializer) {
                static_initializers.push(member);
            }
        }
        if !static_initializers.is_empty() {
            self.class_context_mut(idx)?.mark_complex_static_initializer();
        }

        // Constructor and inheritance
        let prologue = ConstructorPrologue {
            initializers: &instance_initializers,
        };
        let constructor = members.iter().copied().find(|&member| {
            matches!(self.kind(member), Some(NodeKind::Function(f)) if f.is_constructor)
        });
        let has_constructor = match constructor {
            Some(constructor) => {
                let Some(NodeKind::Function(function)) = self.kind(constructor) else {
                    return Err(EmitError::DanglingNode { node: constructor });
                };
                self.write_separator();
                self.write_constructor_doc(base_name.as_deref());
                self.emit_function_assignment(constructor, &class_name, function, Some(prologue))?;
                true
            }
            None if !instance_initializers.is_empty() => {
                tracing::debug!(
                    class = %class_name,
                    initializers = instance_initializers.len(),
                    "synthesizing constructor"
                );
                self.write_separator();
                self.write_constructor_doc(base_name.as_deref());
                self.with_mapping(idx, Some(data.name.as_str()), |p| {
                    p.write(&class_name);
                    p.write(" = function()");
                    Ok(())
                })?;
                self.write(" ");
                self.emit_function_body(NodeIndex::NONE, &[], NodeIndex::NONE, Some(prologue))?;
                self.write(";");
                true
            }
            None => false,
        };
        if has_constructor {
            infos.push(MemberInfo {
                name: data.name.clone(),
                kind: MemberKind::Constructor,
                is_static: false,
            });
            if let Some(base_name) = &base_name {
                self.writer.ensure_line_start();
                let inherits = self.names.qualified(&self.options.runtime.inherits);
                self.write(&format!("{inherits}({class_name}, {base_name});"));
            }
        }

        // Reflection export
        if self.options.emit_reflection_export && !suppresses_export(data.doc.as_deref()) {
            self.write_separator();
            self.write_export_doc();
            let export = self.names.qualified(&self.options.runtime.export_symbol);
            self.write(&format!("{export}('{class_name}', {class_name});"));
        }

        // Member walk
        for &member in members {
            match self.kind(member) {
                Some(NodeKind::Variable(field)) => {
                    self.write_separator();
                    self.emit_field(member, field, &class_name)?;
                    infos.push(MemberInfo {
                        name: field.name.clone(),
                        kind: MemberKind::Field,
                        is_static: field.is_static,
                    });
                }
                Some(NodeKind::BindableVariable(_)) => {
                    self.class_context_mut(idx)?.add_bindable(member);
                }
                Some(NodeKind::Function(function)) if function.is_constructor => {}
                Some(NodeKind::Function(function)) => {
                    self.write_separator();
                    self.emit_method(member, function)?;
                    infos.push(MemberInfo {
                        name: function.name.clone(),
                        kind: MemberKind::Method,
                        is_static: function.is_static,
                    });
                }
                Some(NodeKind::Getter(function)) => {
                    self.class_context_mut(idx)?
                        .add_getter(&function.name, function.is_static, member);
                }
                Some(NodeKind::Setter(function)) => {
                    self.class_context_mut(idx)?
                        .add_setter(&function.name, function.is_static, member);
                }
                // Force-link statements produce no code.
                Some(NodeKind::Import(_) | NodeKind::Identifier(_)) => {}
                Some(kind) => {
                    return Err(EmitError::UnhandledNode {
                        kind: kind.name(),
                        node: member,
                    });
                }
                None => return Err(EmitError::DanglingNode { node: member }),
            }
        }

        // Bindables before accessors.
        let bindables = self.class_context_mut(idx)?.take_bindables();
        self.emit_bindables(&bindables, &class_name, &mut infos)?;
        let accessors = self.class_context_mut(idx)?.take_accessors();
        self.emit_accessors(&accessors, &class_name, &mut infos)?;

        let has_static_block = self
            .class_stack
            .last()
            .is_some_and(ClassLoweringContext::has_complex_static_initializers);
        if has_static_block {
            tracing::debug!(
                class = %class_name,
                fields = static_initializers.len(),
                "emitting static initializers"
            );
            self.write_separator();
            for &field in &static_initializers {
                self.emit_static_initializer(field, &class_name)?;
                self.writer.ensure_line_start();
            }
        }

        Ok(infos)
    }

    // =========================================================================
    // Fields
    // =========================================================================

    /// `.name`, the mangled private name, or the namespaced bracket key.
    pub(super) fn member_key(&mut self, idx: NodeIndex, name: &str) -> String {
        match self.resolve(idx) {
            Some(symbol) => match symbol.custom_namespace() {
                Some((namespace, uri)) => {
                    self.used_names.insert(namespace);
                    NameFormatter::bracket(&NameFormatter::namespaced_property(uri, name))
                }
                None => format!(".{}", self.names.member_name(symbol)),
            },
            None => format!(".{name}"),
        }
    }

    /// Key of a field as assigned; bindables store into their backing slot.
    fn field_key(&mut self, idx: NodeIndex, field: &VariableData) -> String {
        if matches!(self.kind(idx), Some(NodeKind::BindableVariable(_))) {
            format!(".{}_", field.name)
        } else {
            self.member_key(idx, &field.name)
        }
    }

    fn field_data(&self, idx: NodeIndex) -> Result<&'a VariableData, EmitError> {
        match self.kind(idx) {
            Some(kind) => kind.as_variable().ok_or(EmitError::UnhandledNode {
                kind: kind.name(),
                node: idx,
            }),
            None => Err(EmitError::DanglingNode { node: idx }),
        }
    }

    /// Field declaration on the prototype or the class. Only static scalar
    /// initializers are written here; the rest run in the constructor or the
    /// static initializer block.
    fn emit_field(
        &mut self,
        idx: NodeIndex,
        field: &'a VariableData,
        class_name: &str,
    ) -> Result<(), EmitError> {
        let key = self.field_key(idx, field);
        let target = if field.is_static {
            format!("{class_name}{key}")
        } else {
            format!("{class_name}.prototype{key}")
        };
        let doc_type = self.annotation_doc_type(field.type_annotation);
        self.write_type_doc(&doc_type);

        let inline_value =
            field.is_static && field.initializer.is_some() && self.is_scalar(field.initializer);
        self.with_mapping(idx, Some(field.name.as_str()), |p| {
            p.write(&target);
            if inline_value {
                p.write(" = ");
                p.emit_assignment_coercion(field.initializer, field.type_annotation)?;
            } else if field.initializer.is_none() {
                p.emit_variable_value(field)?;
            }
            p.write(";");
            Ok(())
        })
    }

    /// `this.name = <value>;` inside the constructor.
    pub(super) fn emit_field_initializer(&mut self, idx: NodeIndex) -> Result<(), EmitError> {
        let field = self.field_data(idx)?;
        let key = self.field_key(idx, field);
        self.with_mapping(idx, Some(field.name.as_str()), |p| {
            p.write("this");
            p.write(&key);
            p.write(" = ");
            p.emit_assignment_coercion(field.initializer, field.type_annotation)?;
            p.write(";");
            Ok(())
        })?;
        self.writer.ensure_line_start();
        Ok(())
    }

    /// `Q.NAME = <value>;` after the class body.
    fn emit_static_initializer(&mut self, idx: NodeIndex, class_name: &str) -> Result<(), EmitError> {
        let field = self.field_data(idx)?;
        let key = self.field_key(idx, field);
        self.with_mapping(idx, Some(field.name.as_str()), |p| {
            p.write(class_name);
            p.write(&key);
            p.write(" = ");
            p.emit_assignment_coercion(field.initializer, field.type_annotation)?;
            p.write(";");
            Ok(())
        })
    }

    // =========================================================================
    // Bindable properties
    // =========================================================================

    /// Backing field plus generated getter and setter per bindable field.
    /// Instance setters dispatch a value-change event.
    fn emit_bindables(
        &mut self,
        bindables: &[NodeIndex],
        class_name: &str,
        infos: &mut Vec<MemberInfo>,
    ) -> Result<(), EmitError> {
        if bindables.is_empty() {
            return Ok(());
        }
        let mut instance_properties = Vec::new();
        let mut static_properties = Vec::new();

        for &bindable in bindables {
            let field = self.field_data(bindable)?;
            let name = field.name.as_str();
            let target = if field.is_static {
                class_name.to_string()
            } else {
                format!("{class_name}.prototype")
            };

            self.write_separator();
            self.emit_field(bindable, field, class_name)?;

            self.write_separator();
            self.with_mapping(bindable, Some(name), |p| {
                p.write(&format!("{target}.get__{name} = function()"));
                Ok(())
            })?;
            self.write(" {");
            self.write_line();
            self.increase_indent();
            self.write(&format!("return this.{name}_;"));
            self.write_line();
            self.decrease_indent();
            self.write("};");

            self.write_separator();
            self.with_mapping(bindable, Some(name), |p| {
                p.write(&format!("{target}.set__{name} = function(value)"));
                Ok(())
            })?;
            self.write(" {");
            self.write_line();
            self.increase_indent();
            self.write(&format!("var oldValue = this.{name}_;"));
            self.write_line();
            self.write("if (value != oldValue) {");
            self.write_line();
            self.increase_indent();
            self.write(&format!("this.{name}_ = value;"));
            self.write_line();
            if !field.is_static {
                let event_class = &self.options.runtime.value_change_event;
                self.used_names.insert(event_class);
                let event = self.names.qualified(event_class);
                self.write(&format!(
                    "this.dispatchEvent({event}.createUpdateEvent(this, \"{name}\", oldValue, value));"
                ));
                self.write_line();
            }
            self.decrease_indent();
            self.write("}");
            self.write_line();
            self.decrease_indent();
            self.write("};");

            let entry = PropertyEntry {
                name: name.to_string(),
                has_getter: true,
                has_setter: true,
            };
            if field.is_static {
                static_properties.push(entry);
            } else {
                instance_properties.push(entry);
            }
            infos.push(MemberInfo {
                name: name.to_string(),
                kind: MemberKind::Bindable,
                is_static: field.is_static,
            });
        }

        self.emit_define_properties(&format!("{class_name}.prototype"), &instance_properties);
        self.emit_define_properties(class_name, &static_properties);
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// `get__name`/`set__name` functions, then one property definition call
    /// for instance accessors and one for static accessors.
    fn emit_accessors(
        &mut self,
        accessors: &[AccessorPair],
        class_name: &str,
        infos: &mut Vec<MemberInfo>,
    ) -> Result<(), EmitError> {
        if accessors.is_empty() {
            return Ok(());
        }
        let mut instance_properties = Vec::new();
        let mut static_properties = Vec::new();

        for pair in accessors {
            let target = if pair.is_static {
                class_name.to_string()
            } else {
                format!("{class_name}.prototype")
            };
            if let Some(getter) = pair.getter {
                let function = self.accessor_data(getter)?;
                self.write_separator();
                let name = format!("{target}.get__{}", pair.name);
                self.emit_function_assignment(getter, &name, function, None)?;
            }
            if let Some(setter) = pair.setter {
                let function = self.accessor_data(setter)?;
                self.write_separator();
                let name = format!("{target}.set__{}", pair.name);
                self.emit_function_assignment(setter, &name, function, None)?;
            }

            let entry = PropertyEntry {
                name: pair.name.clone(),
                has_getter: pair.getter.is_some(),
                has_setter: pair.setter.is_some(),
            };
            if pair.is_static {
                static_properties.push(entry);
            } else {
                instance_properties.push(entry);
            }
            infos.push(MemberInfo {
                name: pair.name.clone(),
                kind: MemberKind::Accessor,
                is_static: pair.is_static,
            });
        }

        self.emit_define_properties(&format!("{class_name}.prototype"), &instance_properties);
        self.emit_define_properties(class_name, &static_properties);
        Ok(())
    }

    fn accessor_data(&self, idx: NodeIndex) -> Result<&'a FunctionData, EmitError> {
        match self.kind(idx) {
            Some(kind) => kind.as_function().ok_or(EmitError::UnhandledNode {
                kind: kind.name(),
                node: idx,
            }),
            None => Err(EmitError::DanglingNode { node: idx }),
        }
    }

    fn emit_define_properties(&mut self, target: &str, properties: &[PropertyEntry]) {
        if properties.is_empty() {
            return;
        }
        self.write_separator();
        self.write(&format!(
            "Object.defineProperties({target}, /** @lends {{{target}}} */ {{"
        ));
        self.write_line();
        self.increase_indent();
        for (i, property) in properties.iter().enumerate() {
            let name = property.name.as_str();
            self.write("/** @export */");
            self.write_line();
            self.write(&format!("{name}: {{"));
            self.write_line();
            self.increase_indent();
            if property.has_getter {
                self.write(&format!("get: {target}.get__{name}"));
                if property.has_setter {
                    self.write(",");
                }
                self.write_line();
            }
            if property.has_setter {
                self.write(&format!("set: {target}.set__{name}"));
                self.write_line();
            }
            self.decrease_indent();
            self.write(if i + 1 < properties.len() { "}," } else { "}" });
            self.write_line();
        }
        self.decrease_indent();
        self.write("});");
    }
}
