//! # Trellis AST
//!
//! The abstract syntax tree for the Trellis language, produced by the
//! upstream parser and consumed by every analysis pass. Trellis is a
//! graph-native language: its declarations are *architypes* (node, edge,
//! walker, and object kinds) carrying *has-var* fields and *ability*
//! behavior blocks, and its expression grammar includes graph traversal
//! and mutation operators (`EdgeOpRef`, `ConnectOp`, `DisconnectOp`).
//!
//! ## Arena ownership
//!
//! All nodes of one module live in a single arena ([`Ast`]) and refer to
//! each other through [`NodeId`] indices. Each node carries a non-owning
//! back-reference to its parent, which lets consumers walk outward (for
//! example to find the enclosing scope of a use site) without any cyclic
//! ownership. The tree is immutable once [`AstBuilder::finish`] returns;
//! passes attach their results in side tables keyed by [`NodeId`] rather
//! than mutating nodes.

pub mod arena;
pub mod node;

pub use arena::{Ast, AstBuilder, AstError, AstNode, NodeId};
pub use node::{
    AbilityNode, ArchRefChainNode, ArchRefNode, ArchitypeKind, ArchitypeNode, AssignmentNode,
    AtomTrailerNode, BuiltinTy, ConnectOpNode, DeleteStmtNode, DisconnectOpNode, EdgeDir,
    EdgeOpRefNode, EnumNode, ExprAsItemNode, ExprStmtNode, FilterComprNode, FuncCallNode,
    HasVarNode, IndexSliceNode, InForStmtNode, InnerComprNode, ModuleNode, NameNode, NodeKind,
    ParamVarNode, SpecialVar, TokenNode,
};
