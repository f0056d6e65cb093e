//! # Trellis Semantic Analysis
//!
//! Definition-use resolution for the Trellis language. This crate builds
//! upon the arena AST to create a semantic model that understands scopes,
//! symbols, and use-def relationships for a single module.
//!
//! ## Architecture
//!
//! The analysis follows a layered approach:
//! 1. **Symbols & Scopes**: Track all named entities and their containing scopes
//! 2. **Traversal Engine**: A generic pre-order walker with per-kind hooks,
//!    shared by every pass
//! 3. **Def-Use Resolution**: Resolve identifier uses to their declarations,
//!    in two phases so module-level architypes may reference each other
//!    regardless of textual order
//!
//! ## Main Entry Point
//!
//! [`resolve_module`] runs the resolution pass over a module's tree and
//! produces a sealed [`DefUseIndex`]: per-node resolution results, the
//! scope tree, and the ordered diagnostics collected along the way.
//! Independent modules can be resolved in parallel, each with its own
//! isolated index; nothing is shared between pass instances.

pub mod def_use;
pub mod errors;
pub mod symbol;
pub mod visitor;

pub use def_use::{resolve_module, DefUseIndex, DefUseResolver, ResolutionResult};
pub use symbol::{
    BindOutcome, FileScopeId, Scope, ScopeKind, ScopedSymbolId, Symbol, SymbolFlags, SymbolKind,
    SymbolRef, SymbolTable,
};
pub use visitor::{run_pass, walk_children, walk_node, AstPass, Descend};
