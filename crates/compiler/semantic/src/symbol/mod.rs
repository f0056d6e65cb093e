//! Symbol management for semantic analysis
//!
//! This module provides the infrastructure for tracking symbols and their
//! properties within scopes during definition-use resolution.

pub mod table;

use std::fmt;

use bitflags::bitflags;
use chumsky::span::SimpleSpan;
use index_vec::{self};
use trellis_compiler_ast::{ArchitypeKind, NodeId};

pub use self::table::{BindOutcome, SymbolTable};

index_vec::define_index_type! {
    /// A unique ID for a scope within a file
    pub struct FileScopeId = usize;

    MAX_INDEX = usize::MAX;
}

impl FileScopeId {
    pub const fn as_usize(self) -> usize {
        self.raw()
    }
}

index_vec::define_index_type! {
    /// A unique ID for a symbol within a scope
    pub struct ScopedSymbolId = usize;

    MAX_INDEX = usize::MAX;
}

impl ScopedSymbolId {
    pub const fn as_usize(self) -> usize {
        self.raw()
    }
}

/// Names one symbol globally within a module: a scope plus the symbol's
/// id inside that scope's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolRef {
    pub scope: FileScopeId,
    pub symbol: ScopedSymbolId,
}

/// Represents a scope in the program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// Parent scope, if any (None for module scope)
    pub parent: Option<FileScopeId>,
    /// The kind of scope this represents
    pub kind: ScopeKind,
}

impl Scope {
    pub const fn new(parent: Option<FileScopeId>, kind: ScopeKind) -> Self {
        Self { parent, kind }
    }
}

/// Different types of scopes in Trellis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Module-level scope (top-level)
    Module,
    /// Architype body scope (has-vars and abilities)
    Architype(ArchitypeKind),
    /// Ability body scope (parameters and locals)
    Ability,
    /// Enum body scope (enumerators)
    Enum,
    /// Comprehension scope (loop variables, discarded on exit)
    Comprehension,
    /// For-loop body scope
    Loop,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module => write!(f, "module"),
            Self::Architype(kind) => write!(f, "{kind} architype"),
            Self::Ability => write!(f, "ability"),
            Self::Enum => write!(f, "enum"),
            Self::Comprehension => write!(f, "comprehension"),
            Self::Loop => write!(f, "loop"),
        }
    }
}

/// The kind tag of a symbol, mirroring its declaration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Local variable introduced by assignment or an `as` item
    Local,
    /// Ability parameter
    Parameter,
    /// Architype instance field
    HasVar,
    /// Architype declaration, tagged with its graph kind
    Architype(ArchitypeKind),
    /// Enum declaration
    Enum,
    /// Enumerator inside an enum body
    Enumerator,
    /// Ability declaration
    Ability,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Parameter => write!(f, "parameter"),
            Self::HasVar => write!(f, "has-var"),
            Self::Architype(kind) => write!(f, "{kind} architype"),
            Self::Enum => write!(f, "enum"),
            Self::Enumerator => write!(f, "enumerator"),
            Self::Ability => write!(f, "ability"),
        }
    }
}

bitflags! {
    /// Flags indicating properties of a symbol
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SymbolFlags: u8 {
        /// The symbol is referenced somewhere after its declaration
        const USED = 1 << 0;
        /// The symbol's binding is reassigned after its declaration
        const MUTATED = 1 << 1;
        /// The symbol is installed by the resolver, not declared by user code
        const BUILTIN = 1 << 2;
    }
}

impl fmt::Display for SymbolFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(Self::USED) {
            flags.push("used");
        }
        if self.contains(Self::MUTATED) {
            flags.push("mutated");
        }
        if self.contains(Self::BUILTIN) {
            flags.push("builtin");
        }

        if flags.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

/// One symbol: a name bound at a declaration site.
///
/// Symbols are created exactly once per declaration site. When a name is
/// redeclared in the same scope the new symbol shadows the old one for
/// lookups, but the original symbol object is retained in the table for
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    /// The declaring AST node
    pub decl: NodeId,
    /// Span of the declared name, for diagnostics
    pub name_span: SimpleSpan<usize>,
    pub kind: SymbolKind,
    pub flags: SymbolFlags,
}
