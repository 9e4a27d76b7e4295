//! Resolved input model for the jxc code generator.
//!
//! The code generator never parses or type checks. It receives:
//! - a `NodeArena` holding one compilation unit's AST, every node carrying
//!   its source range and a parent link;
//! - a `SymbolResolver` answering "what does this node refer to" and
//!   "what is the static type of this expression".
//!
//! `AstBuilder` and the concrete `ProgramSymbols`/`UnitBindings` table let
//! embedders and tests construct both without a front end.

pub mod node;
pub use node::{AccessOperator, Node, NodeIndex, NodeKind};

pub mod arena;
pub use arena::NodeArena;

pub mod builder;
pub use builder::AstBuilder;

pub mod symbols;
pub use symbols::{
    Classification, NamespaceRef, ProgramSymbols, Symbol, SymbolFlags, SymbolId, SymbolKind,
    SymbolResolver, TypeFlags, TypeRef, UnitBindings, UnitResolver,
};
