//! Node types for the resolved AST.
//!
//! Nodes live in a `NodeArena` and refer to each other through `NodeIndex`
//! handles. Every node records its parent (`NodeIndex::NONE` for the root),
//! so translators can ask about the syntactic position of a node without
//! holding references up the tree.

use jxc_common::SourceRange;
use std::fmt;

/// Handle to a node in a `NodeArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn is_some(self) -> bool {
        !self.is_none()
    }
}

impl Default for NodeIndex {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("#none")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// A node in the arena.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub range: SourceRange,
    pub parent: NodeIndex,
}

/// Operator joining the two sides of a member access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessOperator {
    /// `a.b`
    Member,
    /// `a..b` (XML descendants)
    Descendants,
}

impl AccessOperator {
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            AccessOperator::Member => ".",
            AccessOperator::Descendants => "..",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SourceFileData {
    pub statements: Vec<NodeIndex>,
}

#[derive(Clone, Debug, Default)]
pub struct PackageData {
    /// Dotted package name, empty for the top-level package.
    pub name: String,
    pub statements: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct ImportData {
    pub qualified_name: String,
}

#[derive(Clone, Debug)]
pub struct ClassData {
    pub name: String,
    /// Identifier naming the base class, or NONE.
    pub base: NodeIndex,
    /// The class body block. Members and any force-link statements live here.
    pub body: NodeIndex,
    /// Raw documentation comment attached to the class.
    pub doc: Option<String>,
}

/// Data shared by function declarations, getters and setters.
#[derive(Clone, Debug, Default)]
pub struct FunctionData {
    pub name: String,
    pub parameters: Vec<NodeIndex>,
    /// Identifier naming the return type, or NONE.
    pub return_type: NodeIndex,
    /// Body block, or NONE for bodiless declarations.
    pub body: NodeIndex,
    pub is_static: bool,
    pub is_constructor: bool,
}

/// Data shared by plain and bindable variable declarations.
#[derive(Clone, Debug, Default)]
pub struct VariableData {
    pub name: String,
    /// Identifier naming the declared type, or NONE for untyped.
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
    pub is_static: bool,
    pub is_const: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ParameterData {
    pub name: String,
    pub type_annotation: NodeIndex,
    pub default_value: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct IfData {
    pub condition: NodeIndex,
    pub then_branch: NodeIndex,
    pub else_branch: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct IdentifierData {
    pub name: String,
    /// Synthetic identifiers that must be written verbatim, never resolved.
    pub non_resolving: bool,
}

#[derive(Clone, Debug)]
pub struct MemberAccessData {
    pub left: NodeIndex,
    pub right: NodeIndex,
    pub operator: AccessOperator,
}

/// `ns::name`, appearing as the right operand of a member access.
#[derive(Clone, Debug)]
pub struct NamespaceAccessData {
    pub namespace: NodeIndex,
    pub name: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct IndexAccessData {
    pub object: NodeIndex,
    pub index: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct CallData {
    pub callee: NodeIndex,
    pub arguments: Vec<NodeIndex>,
    pub is_new: bool,
}

#[derive(Clone, Debug)]
pub struct BinaryData {
    pub operator: String,
    pub left: NodeIndex,
    pub right: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct UnaryData {
    pub operator: String,
    pub operand: NodeIndex,
    pub prefix: bool,
}

#[derive(Clone, Debug)]
pub struct ConditionalData {
    pub condition: NodeIndex,
    pub when_true: NodeIndex,
    pub when_false: NodeIndex,
}

#[derive(Clone, Debug, Default)]
pub struct FunctionObjectData {
    pub parameters: Vec<NodeIndex>,
    pub body: NodeIndex,
}

/// `object.(predicate)`
#[derive(Clone, Debug)]
pub struct FilterData {
    pub object: NodeIndex,
    pub predicate: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ObjectProperty {
    pub key: String,
    pub value: NodeIndex,
}

/// The closed set of node kinds.
#[derive(Clone, Debug)]
pub enum NodeKind {
    // Structure
    SourceFile(SourceFileData),
    Package(PackageData),
    Import(ImportData),
    Class(ClassData),

    // Declarations
    Function(FunctionData),
    Getter(FunctionData),
    Setter(FunctionData),
    Variable(VariableData),
    BindableVariable(VariableData),
    Parameter(ParameterData),

    // Statements
    Block(Vec<NodeIndex>),
    ExpressionStatement(NodeIndex),
    Return(NodeIndex),
    If(IfData),

    // Names and access
    Identifier(IdentifierData),
    MemberAccess(MemberAccessData),
    NamespaceAccess(NamespaceAccessData),
    /// `@name`
    Attribute(String),
    IndexAccess(IndexAccessData),
    This,
    Super,

    // Expressions
    Call(CallData),
    Binary(BinaryData),
    Unary(UnaryData),
    Conditional(ConditionalData),
    Parenthesized(NodeIndex),
    FunctionObject(FunctionObjectData),
    Filter(FilterData),

    // Literals
    NumericLiteral(String),
    StringLiteral(String),
    BooleanLiteral(bool),
    NullLiteral,
    UndefinedLiteral,
    ArrayLiteral(Vec<NodeIndex>),
    ObjectLiteral(Vec<ObjectProperty>),
}

impl NodeKind {
    /// Stable name of the kind, used in diagnostics and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            NodeKind::SourceFile(_) => "SourceFile",
            NodeKind::Package(_) => "Package",
            NodeKind::Import(_) => "Import",
            NodeKind::Class(_) => "Class",
            NodeKind::Function(_) => "Function",
            NodeKind::Getter(_) => "Getter",
            NodeKind::Setter(_) => "Setter",
            NodeKind::Variable(_) => "Variable",
            NodeKind::BindableVariable(_) => "BindableVariable",
            NodeKind::Parameter(_) => "Parameter",
            NodeKind::Block(_) => "Block",
            NodeKind::ExpressionStatement(_) => "ExpressionStatement",
            NodeKind::Return(_) => "Return",
            NodeKind::If(_) => "If",
            NodeKind::Identifier(_) => "Identifier",
            NodeKind::MemberAccess(_) => "MemberAccess",
            NodeKind::NamespaceAccess(_) => "NamespaceAccess",
            NodeKind::Attribute(_) => "Attribute",
            NodeKind::IndexAccess(_) => "IndexAccess",
            NodeKind::This => "This",
            NodeKind::Super => "Super",
            NodeKind::Call(_) => "Call",
            NodeKind::Binary(_) => "Binary",
            NodeKind::Unary(_) => "Unary",
            NodeKind::Conditional(_) => "Conditional",
            NodeKind::Parenthesized(_) => "Parenthesized",
            NodeKind::FunctionObject(_) => "FunctionObject",
            NodeKind::Filter(_) => "Filter",
            NodeKind::NumericLiteral(_) => "NumericLiteral",
            NodeKind::StringLiteral(_) => "StringLiteral",
            NodeKind::BooleanLiteral(_) => "BooleanLiteral",
            NodeKind::NullLiteral => "NullLiteral",
            NodeKind::UndefinedLiteral => "UndefinedLiteral",
            NodeKind::ArrayLiteral(_) => "ArrayLiteral",
            NodeKind::ObjectLiteral(_) => "ObjectLiteral",
        }
    }

    /// Child handles in declaration order. NONE slots are skipped.
    #[must_use]
    pub fn children(&self) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut push = |idx: NodeIndex| {
            if idx.is_some() {
                out.push(idx);
            }
        };
        match self {
            NodeKind::SourceFile(data) => data.statements.iter().copied().for_each(&mut push),
            NodeKind::Package(data) => data.statements.iter().copied().for_each(&mut push),
            NodeKind::Class(data) => {
                push(data.base);
                push(data.body);
            }
            NodeKind::Function(data) | NodeKind::Getter(data) | NodeKind::Setter(data) => {
                data.parameters.iter().copied().for_each(&mut push);
                push(data.return_type);
                push(data.body);
            }
            NodeKind::Variable(data) | NodeKind::BindableVariable(data) => {
                push(data.type_annotation);
                push(data.initializer);
            }
            NodeKind::Parameter(data) => {
                push(data.type_annotation);
                push(data.default_value);
            }
            NodeKind::Block(statements) => statements.iter().copied().for_each(&mut push),
            NodeKind::ExpressionStatement(expr)
            | NodeKind::Return(expr)
            | NodeKind::Parenthesized(expr) => push(*expr),
            NodeKind::If(data) => {
                push(data.condition);
                push(data.then_branch);
                push(data.else_branch);
            }
            NodeKind::MemberAccess(data) => {
                push(data.left);
                push(data.right);
            }
            NodeKind::NamespaceAccess(data) => {
                push(data.namespace);
                push(data.name);
            }
            NodeKind::IndexAccess(data) => {
                push(data.object);
                push(data.index);
            }
            NodeKind::Call(data) => {
                push(data.callee);
                data.arguments.iter().copied().for_each(&mut push);
            }
            NodeKind::Binary(data) => {
                push(data.left);
                push(data.right);
            }
            NodeKind::Unary(data) => push(data.operand),
            NodeKind::Conditional(data) => {
                push(data.condition);
                push(data.when_true);
                push(data.when_false);
            }
            NodeKind::FunctionObject(data) => {
                data.parameters.iter().copied().for_each(&mut push);
                push(data.body);
            }
            NodeKind::Filter(data) => {
                push(data.object);
                push(data.predicate);
            }
            NodeKind::ArrayLiteral(elements) => elements.iter().copied().for_each(&mut push),
            NodeKind::ObjectLiteral(properties) => {
                properties.iter().map(|p| p.value).for_each(&mut push);
            }
            NodeKind::Import(_)
            | NodeKind::Identifier(_)
            | NodeKind::Attribute(_)
            | NodeKind::This
            | NodeKind::Super
            | NodeKind::NumericLiteral(_)
            | NodeKind::StringLiteral(_)
            | NodeKind::BooleanLiteral(_)
            | NodeKind::NullLiteral
            | NodeKind::UndefinedLiteral => {}
        }
        out
    }

    /// Function-like nodes introduce a new `this` scope.
    #[must_use]
    pub const fn is_function_like(&self) -> bool {
        matches!(
            self,
            NodeKind::Function(_)
                | NodeKind::Getter(_)
                | NodeKind::Setter(_)
                | NodeKind::FunctionObject(_)
        )
    }

    /// Field declarations, plain or bindable.
    #[must_use]
    pub fn as_variable(&self) -> Option<&VariableData> {
        match self {
            NodeKind::Variable(data) | NodeKind::BindableVariable(data) => Some(data),
            _ => None,
        }
    }

    /// Function, getter or setter declarations.
    #[must_use]
    pub fn as_function(&self) -> Option<&FunctionData> {
        match self {
            NodeKind::Function(data) | NodeKind::Getter(data) | NodeKind::Setter(data) => {
                Some(data)
            }
            _ => None,
        }
    }
}
