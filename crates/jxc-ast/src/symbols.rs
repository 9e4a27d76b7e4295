//! Symbol model and the resolver interface.
//!
//! Symbols are produced by the semantic front end and are read-only to the
//! code generator. Whole-program symbols live in `ProgramSymbols`, shared by
//! every unit; the per-unit `UnitBindings` maps nodes of one arena to those
//! symbols and to static types.

use crate::node::NodeIndex;
use bitflags::bitflags;
use rustc_hash::FxHashMap;

/// Handle to a symbol in `ProgramSymbols`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Class,
    Interface,
    Variable,
    Function,
    Getter,
    Setter,
    Namespace,
}

/// Where a definition lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    PackageMember,
    FileMember,
    ClassMember,
    Local,
    Parameter,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SymbolFlags: u32 {
        const STATIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const CONST = 1 << 2;
        const CONSTRUCTOR = 1 << 3;
        const BINDABLE = 1 << 4;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TypeFlags: u32 {
        /// Instances accept undeclared properties through get/set calls.
        const PROXY = 1 << 0;
        /// Instances accept undeclared properties directly.
        const DYNAMIC = 1 << 1;
    }
}

/// Access namespace of a definition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum NamespaceRef {
    #[default]
    Public,
    Private,
    Protected,
    Internal,
    /// User-declared namespace.
    Custom { qualified_name: String, uri: String },
}

/// Reference to a type by qualified name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub qualified_name: String,
    pub flags: TypeFlags,
}

impl TypeRef {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            flags: TypeFlags::empty(),
        }
    }

    pub fn proxy(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            flags: TypeFlags::PROXY,
        }
    }

    #[must_use]
    pub fn is_xml_like(&self) -> bool {
        matches!(self.qualified_name.as_str(), "XML" | "XMLList")
    }

    #[must_use]
    pub fn is_date(&self) -> bool {
        self.qualified_name == "Date"
    }

    #[must_use]
    pub fn is_proxy(&self) -> bool {
        self.flags.contains(TypeFlags::PROXY)
    }
}

/// Resolved meaning of a name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    /// Short name as written in source.
    pub name: String,
    pub qualified_name: String,
    /// Qualified name of the declaring type, for class members.
    pub parent: Option<String>,
    pub kind: SymbolKind,
    pub classification: Classification,
    pub flags: SymbolFlags,
    pub namespace: NamespaceRef,
    /// Declared type of a variable, or return type of a function.
    pub type_ref: Option<TypeRef>,
}

impl Symbol {
    fn base(name: &str, qualified_name: String, kind: SymbolKind, classification: Classification) -> Self {
        Self {
            name: name.to_string(),
            qualified_name,
            parent: None,
            kind,
            classification,
            flags: SymbolFlags::empty(),
            namespace: NamespaceRef::Public,
            type_ref: None,
        }
    }

    /// A class named by its qualified name (`a.b.C`).
    pub fn class(qualified_name: &str) -> Self {
        let name = qualified_name.rsplit('.').next().unwrap_or(qualified_name);
        Self::base(name, qualified_name.to_string(), SymbolKind::Class, Classification::PackageMember)
    }

    /// A package-level function, variable or namespace.
    pub fn package_member(qualified_name: &str, kind: SymbolKind) -> Self {
        let name = qualified_name.rsplit('.').next().unwrap_or(qualified_name);
        Self::base(name, qualified_name.to_string(), kind, Classification::PackageMember)
    }

    /// A member declared by the class `parent`.
    pub fn member(parent: &str, name: &str, kind: SymbolKind) -> Self {
        let mut symbol = Self::base(name, format!("{parent}.{name}"), kind, Classification::ClassMember);
        symbol.parent = Some(parent.to_string());
        symbol
    }

    pub fn local(name: &str) -> Self {
        Self::base(name, name.to_string(), SymbolKind::Variable, Classification::Local)
    }

    pub fn parameter(name: &str) -> Self {
        Self::base(name, name.to_string(), SymbolKind::Variable, Classification::Parameter)
    }

    #[must_use]
    pub fn with_flags(mut self, flags: SymbolFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: NamespaceRef) -> Self {
        if namespace == NamespaceRef::Private {
            self.flags |= SymbolFlags::PRIVATE;
        }
        self.namespace = namespace;
        self
    }

    #[must_use]
    pub fn with_type(mut self, type_ref: TypeRef) -> Self {
        self.type_ref = Some(type_ref);
        self
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(SymbolFlags::STATIC)
    }

    #[must_use]
    pub fn is_private(&self) -> bool {
        self.flags.contains(SymbolFlags::PRIVATE)
    }

    #[must_use]
    pub fn is_class(&self) -> bool {
        matches!(self.kind, SymbolKind::Class | SymbolKind::Interface)
    }

    #[must_use]
    pub fn is_accessor(&self) -> bool {
        matches!(self.kind, SymbolKind::Getter | SymbolKind::Setter)
    }

    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.flags.contains(SymbolFlags::CONSTRUCTOR)
    }

    /// A plain class method: not an accessor, not a constructor.
    #[must_use]
    pub fn is_method(&self) -> bool {
        self.kind == SymbolKind::Function
            && self.classification == Classification::ClassMember
            && !self.is_constructor()
    }

    /// Package or file scoped definition.
    #[must_use]
    pub fn is_top_level(&self) -> bool {
        matches!(
            self.classification,
            Classification::PackageMember | Classification::FileMember
        )
    }

    /// `(qualified_name, uri)` of a user-declared namespace.
    #[must_use]
    pub fn custom_namespace(&self) -> Option<(&str, &str)> {
        match &self.namespace {
            NamespaceRef::Custom { qualified_name, uri } => Some((qualified_name, uri)),
            _ => None,
        }
    }

    /// Package part of the qualified name, empty at top level.
    #[must_use]
    pub fn package_name(&self) -> &str {
        self.qualified_name
            .rsplit_once('.')
            .map_or("", |(package, _)| package)
    }
}

/// Read-only view of resolution results.
///
/// Implementations must be fully populated before lowering starts.
pub trait SymbolResolver {
    /// Definition referred to by `node`, if it resolved.
    fn resolve(&self, node: NodeIndex) -> Option<&Symbol>;

    /// Static type of the expression `node`, if known.
    fn static_type_of(&self, node: NodeIndex) -> Option<&TypeRef>;
}

// =============================================================================
// Concrete symbol table
// =============================================================================

/// Whole-program symbols, shared read-only by every unit.
#[derive(Clone, Debug, Default)]
pub struct ProgramSymbols {
    symbols: Vec<Symbol>,
    by_qualified_name: FxHashMap<String, SymbolId>,
}

impl ProgramSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.by_qualified_name
            .entry(symbol.qualified_name.clone())
            .or_insert(id);
        self.symbols.push(symbol);
        id
    }

    #[inline]
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    /// First symbol registered under `qualified_name`.
    pub fn lookup(&self, qualified_name: &str) -> Option<SymbolId> {
        self.by_qualified_name.get(qualified_name).copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Node-level resolution results for one compilation unit.
#[derive(Clone, Debug, Default)]
pub struct UnitBindings {
    symbols: FxHashMap<NodeIndex, SymbolId>,
    types: FxHashMap<NodeIndex, TypeRef>,
}

impl UnitBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, node: NodeIndex, symbol: SymbolId) {
        self.symbols.insert(node, symbol);
    }

    pub fn set_type(&mut self, node: NodeIndex, type_ref: TypeRef) {
        self.types.insert(node, type_ref);
    }

    pub fn symbol_of(&self, node: NodeIndex) -> Option<SymbolId> {
        self.symbols.get(&node).copied()
    }
}

/// `SymbolResolver` over a `ProgramSymbols` table and one unit's bindings.
#[derive(Clone, Copy, Debug)]
pub struct UnitResolver<'a> {
    program: &'a ProgramSymbols,
    bindings: &'a UnitBindings,
}

impl<'a> UnitResolver<'a> {
    pub fn new(program: &'a ProgramSymbols, bindings: &'a UnitBindings) -> Self {
        Self { program, bindings }
    }
}

impl SymbolResolver for UnitResolver<'_> {
    fn resolve(&self, node: NodeIndex) -> Option<&Symbol> {
        self.bindings
            .symbol_of(node)
            .and_then(|id| self.program.get(id))
    }

    /// Explicit expression types win; otherwise the declared type of the
    /// symbol the expression resolves to.
    fn static_type_of(&self, node: NodeIndex) -> Option<&TypeRef> {
        if let Some(type_ref) = self.bindings.types.get(&node) {
            return Some(type_ref);
        }
        self.resolve(node).and_then(|symbol| symbol.type_ref.as_ref())
    }
}

#[cfg(test)]
#[path = "../tests/symbols.rs"]
mod tests;
