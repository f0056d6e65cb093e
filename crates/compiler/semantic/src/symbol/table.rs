//! Efficient symbol storage and lookup using hash tables
//!
//! This module implements the per-scope `SymbolTable`, providing O(1)
//! name lookups with shadowing support: a redeclared name re-points the
//! visible entry at the new symbol while the prior symbol object stays
//! in the table for diagnostics.

use std::hash::{Hash, Hasher};

use hashbrown::HashTable;
use index_vec::IndexVec;
use rustc_hash::FxHasher;

use super::{ScopedSymbolId, Symbol};

/// Result of a [`SymbolTable::bind`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    /// The name was not bound in this scope before.
    Fresh(ScopedSymbolId),
    /// The name was already bound by the *same* declaration node; the
    /// existing symbol is reused (hoisted declarations are re-visited by
    /// the body traversal and must not double-bind).
    Same(ScopedSymbolId),
    /// The name was bound by a different declaration. The new symbol now
    /// shadows `prior`, which remains retrievable for diagnostics.
    Shadowed {
        id: ScopedSymbolId,
        prior: ScopedSymbolId,
    },
}

impl BindOutcome {
    pub const fn id(self) -> ScopedSymbolId {
        match self {
            Self::Fresh(id) | Self::Same(id) | Self::Shadowed { id, .. } => id,
        }
    }
}

/// Storage and lookup of symbols within one scope.
#[derive(Debug, Default)]
pub struct SymbolTable {
    /// All symbols ever bound in this scope, including shadowed ones
    symbols: IndexVec<ScopedSymbolId, Symbol>,
    /// Hash table mapping a name to its currently visible symbol
    visible: HashTable<ScopedSymbolId>,
    /// Once sealed, the binding map is frozen
    sealed: bool,
}

impl SymbolTable {
    /// Create a new empty symbol table
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a symbol, shadowing any prior binding of the same name.
    ///
    /// # Panics
    ///
    /// Panics if the scope has been sealed. That is an engine invariant
    /// violation (a pass binding after construct exit), never a user
    /// error, so it is not recoverable.
    pub fn bind(&mut self, symbol: Symbol) -> BindOutcome {
        assert!(
            !self.sealed,
            "cannot bind '{}' into a sealed scope",
            symbol.name
        );

        let hash = Self::hash_name(&symbol.name);
        let existing = self
            .visible
            .find(hash, |id| self.symbols[*id].name == symbol.name)
            .copied();

        match existing {
            Some(prior) if self.symbols[prior].decl == symbol.decl => BindOutcome::Same(prior),
            Some(prior) => {
                let id = self.symbols.push(symbol);
                let slot = self
                    .visible
                    .find_mut(hash, |entry| *entry == prior)
                    .expect("visible entry must exist for a shadowed name");
                *slot = id;
                BindOutcome::Shadowed { id, prior }
            }
            None => {
                let id = self.symbols.push(symbol);
                self.visible
                    .insert_unique(hash, id, |id| Self::hash_name(&self.symbols[*id].name));
                BindOutcome::Fresh(id)
            }
        }
    }

    /// Look up the currently visible symbol for `name` in this scope only.
    pub fn lookup(&self, name: &str) -> Option<ScopedSymbolId> {
        self.visible
            .find(Self::hash_name(name), |id| self.symbols[*id].name == name)
            .copied()
    }

    /// Get symbol by ID
    pub fn symbol(&self, id: ScopedSymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    /// Get mutable symbol by ID
    pub fn symbol_mut(&mut self, id: ScopedSymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id)
    }

    /// Mark a symbol as used. Legal after sealing: flags are symbol
    /// metadata, not bindings.
    pub fn mark_used(&mut self, id: ScopedSymbolId) {
        if let Some(symbol) = self.symbols.get_mut(id) {
            symbol.flags.insert(super::SymbolFlags::USED);
        }
    }

    /// Mark a symbol's binding as mutated (also counts as a use).
    pub fn mark_mutated(&mut self, id: ScopedSymbolId) {
        if let Some(symbol) = self.symbols.get_mut(id) {
            symbol
                .flags
                .insert(super::SymbolFlags::USED | super::SymbolFlags::MUTATED);
        }
    }

    /// Freeze the binding map. Subsequent `bind` calls panic.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub const fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Iterate over all symbols in this table, shadowed ones included
    pub fn symbols(&self) -> impl Iterator<Item = (ScopedSymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, symbol)| (ScopedSymbolId::new(i), symbol))
    }

    /// Get the number of symbols in this table
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if this table has no symbols
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    fn hash_name(name: &str) -> u64 {
        let mut hasher = FxHasher::default();
        name.hash(&mut hasher);
        hasher.finish()
    }
}

impl Clone for SymbolTable {
    fn clone(&self) -> Self {
        let symbols = self.symbols.clone();
        let mut visible = HashTable::with_capacity(symbols.len());

        // Rebuild the hash table from the original's visible entries
        for id in self.visible.iter().copied() {
            let hash = Self::hash_name(&symbols[id].name);
            visible.insert_unique(hash, id, |_| hash);
        }

        Self {
            symbols,
            visible,
            sealed: self.sealed,
        }
    }
}

impl PartialEq for SymbolTable {
    fn eq(&self, other: &Self) -> bool {
        // The visible set is derived from bind order, which the symbols
        // vector fully determines
        self.symbols == other.symbols && self.sealed == other.sealed
    }
}

impl Eq for SymbolTable {}
