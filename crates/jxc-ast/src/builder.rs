//! Programmatic construction of resolved ASTs.
//!
//! The front end hands the code generator finished trees; the builder is how
//! embedders and tests produce them. Leaf nodes take their range from a
//! moving cursor, composite nodes span their first to last child.

use crate::arena::NodeArena;
use crate::node::*;
use jxc_common::{Position, SourceRange};

pub struct AstBuilder {
    arena: NodeArena,
    cursor: Position,
}

impl Default for AstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AstBuilder {
    pub fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            cursor: Position::default(),
        }
    }

    /// Place the next leaf node at `line:column`.
    pub fn at(&mut self, line: u32, column: u32) -> &mut Self {
        self.cursor = Position::new(line, column);
        self
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn finish(self) -> NodeArena {
        self.arena
    }

    /// Add a node with an explicit range.
    pub fn add_with_range(&mut self, kind: NodeKind, range: SourceRange) -> NodeIndex {
        self.arena.add(kind, range)
    }

    /// Add a node, deriving its range from its children or the cursor.
    pub fn add(&mut self, kind: NodeKind) -> NodeIndex {
        let children = kind.children();
        let range = if children.is_empty() {
            self.leaf_range(leaf_width(&kind))
        } else {
            let first = self.arena.range(children[0]);
            let last = self.arena.range(children[children.len() - 1]);
            SourceRange::new(first.start.min(last.start), first.end.max(last.end))
        };
        self.arena.add(kind, range)
    }

    fn leaf_range(&mut self, width: u32) -> SourceRange {
        let range = SourceRange::on_line(self.cursor.line, self.cursor.column, width);
        self.cursor.column += width + 1;
        range
    }

    // =========================================================================
    // Names and access
    // =========================================================================

    pub fn ident(&mut self, name: &str) -> NodeIndex {
        self.add(NodeKind::Identifier(IdentifierData {
            name: name.to_string(),
            non_resolving: false,
        }))
    }

    pub fn non_resolving_ident(&mut self, name: &str) -> NodeIndex {
        self.add(NodeKind::Identifier(IdentifierData {
            name: name.to_string(),
            non_resolving: true,
        }))
    }

    pub fn this(&mut self) -> NodeIndex {
        self.add(NodeKind::This)
    }

    pub fn super_(&mut self) -> NodeIndex {
        self.add(NodeKind::Super)
    }

    pub fn member(&mut self, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        self.add(NodeKind::MemberAccess(MemberAccessData {
            left,
            right,
            operator: AccessOperator::Member,
        }))
    }

    /// `left.name` with a fresh identifier on the right.
    pub fn dot(&mut self, left: NodeIndex, name: &str) -> NodeIndex {
        let right = self.ident(name);
        self.member(left, right)
    }

    pub fn descendants(&mut self, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        self.add(NodeKind::MemberAccess(MemberAccessData {
            left,
            right,
            operator: AccessOperator::Descendants,
        }))
    }

    pub fn namespace_access(&mut self, namespace: NodeIndex, name: NodeIndex) -> NodeIndex {
        self.add(NodeKind::NamespaceAccess(NamespaceAccessData { namespace, name }))
    }

    pub fn attribute(&mut self, name: &str) -> NodeIndex {
        self.add(NodeKind::Attribute(name.to_string()))
    }

    pub fn index(&mut self, object: NodeIndex, index: NodeIndex) -> NodeIndex {
        self.add(NodeKind::IndexAccess(IndexAccessData { object, index }))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn call(&mut self, callee: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        self.add(NodeKind::Call(CallData {
            callee,
            arguments,
            is_new: false,
        }))
    }

    pub fn new_(&mut self, callee: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        self.add(NodeKind::Call(CallData {
            callee,
            arguments,
            is_new: true,
        }))
    }

    pub fn binary(&mut self, operator: &str, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        self.add(NodeKind::Binary(BinaryData {
            operator: operator.to_string(),
            left,
            right,
        }))
    }

    pub fn assign(&mut self, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        self.binary("=", left, right)
    }

    pub fn prefix(&mut self, operator: &str, operand: NodeIndex) -> NodeIndex {
        self.add(NodeKind::Unary(UnaryData {
            operator: operator.to_string(),
            operand,
            prefix: true,
        }))
    }

    pub fn postfix(&mut self, operator: &str, operand: NodeIndex) -> NodeIndex {
        self.add(NodeKind::Unary(UnaryData {
            operator: operator.to_string(),
            operand,
            prefix: false,
        }))
    }

    pub fn conditional(
        &mut self,
        condition: NodeIndex,
        when_true: NodeIndex,
        when_false: NodeIndex,
    ) -> NodeIndex {
        self.add(NodeKind::Conditional(ConditionalData {
            condition,
            when_true,
            when_false,
        }))
    }

    pub fn paren(&mut self, expr: NodeIndex) -> NodeIndex {
        self.add(NodeKind::Parenthesized(expr))
    }

    pub fn function_object(&mut self, parameters: Vec<NodeIndex>, body: NodeIndex) -> NodeIndex {
        self.add(NodeKind::FunctionObject(FunctionObjectData { parameters, body }))
    }

    pub fn filter(&mut self, object: NodeIndex, predicate: NodeIndex) -> NodeIndex {
        self.add(NodeKind::Filter(FilterData { object, predicate }))
    }

    // =========================================================================
    // Literals
    // =========================================================================

    pub fn number(&mut self, text: &str) -> NodeIndex {
        self.add(NodeKind::NumericLiteral(text.to_string()))
    }

    pub fn string(&mut self, text: &str) -> NodeIndex {
        self.add(NodeKind::StringLiteral(text.to_string()))
    }

    pub fn boolean(&mut self, value: bool) -> NodeIndex {
        self.add(NodeKind::BooleanLiteral(value))
    }

    pub fn null(&mut self) -> NodeIndex {
        self.add(NodeKind::NullLiteral)
    }

    pub fn undefined(&mut self) -> NodeIndex {
        self.add(NodeKind::UndefinedLiteral)
    }

    pub fn array(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.add(NodeKind::ArrayLiteral(elements))
    }

    pub fn object(&mut self, properties: Vec<(&str, NodeIndex)>) -> NodeIndex {
        let properties = properties
            .into_iter()
            .map(|(key, value)| ObjectProperty {
                key: key.to_string(),
                value,
            })
            .collect();
        self.add(NodeKind::ObjectLiteral(properties))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub fn block(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        self.add(NodeKind::Block(statements))
    }

    pub fn expr_stmt(&mut self, expr: NodeIndex) -> NodeIndex {
        self.add(NodeKind::ExpressionStatement(expr))
    }

    pub fn ret(&mut self, expr: Option<NodeIndex>) -> NodeIndex {
        self.add(NodeKind::Return(expr.unwrap_or(NodeIndex::NONE)))
    }

    pub fn if_(
        &mut self,
        condition: NodeIndex,
        then_branch: NodeIndex,
        else_branch: Option<NodeIndex>,
    ) -> NodeIndex {
        self.add(NodeKind::If(IfData {
            condition,
            then_branch,
            else_branch: else_branch.unwrap_or(NodeIndex::NONE),
        }))
    }

    pub fn import(&mut self, qualified_name: &str) -> NodeIndex {
        self.add(NodeKind::Import(ImportData {
            qualified_name: qualified_name.to_string(),
        }))
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    pub fn param(&mut self, name: &str) -> NodeIndex {
        self.add(NodeKind::Parameter(ParameterData {
            name: name.to_string(),
            ..ParameterData::default()
        }))
    }

    pub fn param_with(&mut self, data: ParameterData) -> NodeIndex {
        self.add(NodeKind::Parameter(data))
    }

    pub fn variable(&mut self, data: VariableData) -> NodeIndex {
        self.add(NodeKind::Variable(data))
    }

    pub fn bindable(&mut self, data: VariableData) -> NodeIndex {
        self.add(NodeKind::BindableVariable(data))
    }

    /// Instance field with an optional initializer.
    pub fn field(&mut self, name: &str, initializer: Option<NodeIndex>) -> NodeIndex {
        self.variable(VariableData {
            name: name.to_string(),
            initializer: initializer.unwrap_or(NodeIndex::NONE),
            ..VariableData::default()
        })
    }

    pub fn static_field(&mut self, name: &str, initializer: Option<NodeIndex>) -> NodeIndex {
        self.variable(VariableData {
            name: name.to_string(),
            initializer: initializer.unwrap_or(NodeIndex::NONE),
            is_static: true,
            ..VariableData::default()
        })
    }

    /// Local `var` declaration.
    pub fn local_var(&mut self, name: &str, initializer: Option<NodeIndex>) -> NodeIndex {
        self.field(name, initializer)
    }

    pub fn function(&mut self, data: FunctionData) -> NodeIndex {
        self.add(NodeKind::Function(data))
    }

    pub fn method(&mut self, name: &str, parameters: Vec<NodeIndex>, body: NodeIndex) -> NodeIndex {
        self.function(FunctionData {
            name: name.to_string(),
            parameters,
            body,
            ..FunctionData::default()
        })
    }

    pub fn static_method(
        &mut self,
        name: &str,
        parameters: Vec<NodeIndex>,
        body: NodeIndex,
    ) -> NodeIndex {
        self.function(FunctionData {
            name: name.to_string(),
            parameters,
            body,
            is_static: true,
            ..FunctionData::default()
        })
    }

    pub fn constructor(
        &mut self,
        name: &str,
        parameters: Vec<NodeIndex>,
        body: NodeIndex,
    ) -> NodeIndex {
        self.function(FunctionData {
            name: name.to_string(),
            parameters,
            body,
            is_constructor: true,
            ..FunctionData::default()
        })
    }

    pub fn getter(&mut self, data: FunctionData) -> NodeIndex {
        self.add(NodeKind::Getter(data))
    }

    pub fn setter(&mut self, data: FunctionData) -> NodeIndex {
        self.add(NodeKind::Setter(data))
    }

    /// Class whose body holds `members` in order.
    pub fn class(&mut self, name: &str, base: Option<NodeIndex>, members: Vec<NodeIndex>) -> NodeIndex {
        let body = self.block(members);
        self.class_with_body(name, base, body, None)
    }

    pub fn class_with_body(
        &mut self,
        name: &str,
        base: Option<NodeIndex>,
        body: NodeIndex,
        doc: Option<&str>,
    ) -> NodeIndex {
        self.add(NodeKind::Class(ClassData {
            name: name.to_string(),
            base: base.unwrap_or(NodeIndex::NONE),
            body,
            doc: doc.map(str::to_string),
        }))
    }

    pub fn package(&mut self, name: &str, statements: Vec<NodeIndex>) -> NodeIndex {
        self.add(NodeKind::Package(PackageData {
            name: name.to_string(),
            statements,
        }))
    }

    pub fn source_file(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        self.add(NodeKind::SourceFile(SourceFileData { statements }))
    }
}

/// Source width of a leaf node, used to advance the cursor.
fn leaf_width(kind: &NodeKind) -> u32 {
    let width = match kind {
        NodeKind::Identifier(ident) => ident.name.len(),
        NodeKind::Attribute(name) => name.len() + 1,
        NodeKind::NumericLiteral(text) => text.len(),
        NodeKind::StringLiteral(text) => text.len() + 2,
        NodeKind::BooleanLiteral(true) => 4,
        NodeKind::BooleanLiteral(false) => 5,
        NodeKind::NullLiteral | NodeKind::This => 4,
        NodeKind::Super => 5,
        NodeKind::UndefinedLiteral => 9,
        NodeKind::Import(import) => import.qualified_name.len() + 7,
        NodeKind::Variable(data) | NodeKind::BindableVariable(data) => data.name.len() + 4,
        NodeKind::Parameter(data) => data.name.len(),
        NodeKind::Function(data) | NodeKind::Getter(data) | NodeKind::Setter(data) => {
            data.name.len() + 9
        }
        _ => 1,
    };
    width as u32
}

#[cfg(test)]
#[path = "../tests/builder.rs"]
mod tests;
