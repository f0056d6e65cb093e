//! # Definition-Use Resolution
//!
//! This module defines the resolution pass and its result, the
//! [`DefUseIndex`]: for every use site in a module, which declaration
//! governs it.
//!
//! ## Architecture
//!
//! The index follows a layered approach:
//! 1. **Scopes**: hierarchical containers created as the pass enters
//!    binding constructs (architype bodies, abilities, comprehensions,
//!    loops) and sealed when it leaves them
//! 2. **Symbol Tables**: per-scope tables with usage tracking
//! 3. **Resolutions**: per-node results: resolved to a symbol, pending
//!    member resolution, or unresolved with a diagnostic
//!
//! ## Two-Phase Analysis
//!
//! Architypes may reference each other regardless of textual order, so
//! the pass runs in two phases sharing one scope store:
//! 1. **Pass 1**: bind every module-level architype and enum name
//!    (enables forward references)
//! 2. **Pass 2**: walk the whole tree, opening scopes and resolving use
//!    sites; qualified architype chains that need a scope not built yet
//!    are deferred and retried once in `after_pass`
//!
//! The pass never stops on a user-level failure: all diagnostics are
//! collected and surfaced together. The only fatal condition is binding
//! into a sealed scope, which is an engine bug and panics.
//!
//! The tree itself is never mutated; results are attached by node
//! identity.

use chumsky::span::SimpleSpan;
use index_vec::IndexVec;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use trellis_compiler_ast::{
    AbilityNode, ArchRefNode, ArchitypeKind, ArchitypeNode, AssignmentNode, Ast, AtomTrailerNode,
    ConnectOpNode, DeleteStmtNode, DisconnectOpNode, EdgeOpRefNode, EnumNode, ExprAsItemNode,
    FilterComprNode, HasVarNode, InForStmtNode, InnerComprNode, ModuleNode, NameNode, NodeId,
    NodeKind, ParamVarNode, SpecialVar,
};
use trellis_compiler_diagnostics::{Diagnostic, DiagnosticCollection};

use crate::errors::{ContextChecker, SpecialVarContext};
use crate::symbol::{
    BindOutcome, FileScopeId, Scope, ScopeKind, Symbol, SymbolFlags, SymbolKind, SymbolRef,
    SymbolTable,
};
use crate::visitor::{run_pass, walk_node, AstPass, Descend};

/// The outcome of resolving one use site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionResult {
    /// The use is governed by this symbol.
    Resolved(SymbolRef),
    /// An attribute-chain tail: member names are not symbol-table entries
    /// and are deferred to a type-aware pass.
    PendingMember,
    /// No visible binding; a diagnostic was recorded.
    Unresolved,
}

/// The sealed result of definition-use resolution for one module.
///
/// Downstream passes query it by node identity; nothing in it changes
/// after [`resolve_module`] returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefUseIndex {
    /// All scopes in the module, the module scope first
    scopes: IndexVec<FileScopeId, Scope>,
    /// Per-scope symbol tables, parallel to `scopes`
    tables: IndexVec<FileScopeId, SymbolTable>,
    /// Scope opened *by* a node (architype/ability/enum bodies,
    /// comprehensions, loops, and the module itself)
    node_scopes: FxHashMap<NodeId, FileScopeId>,
    /// Per-use-site results, assigned at most once
    resolutions: FxHashMap<NodeId, ResolutionResult>,
    /// Assignments that mutate an existing binding instead of
    /// introducing one
    mutations: FxHashSet<NodeId>,
    /// All diagnostics in emission order
    diagnostics: DiagnosticCollection,
}

impl DefUseIndex {
    fn new() -> Self {
        Self {
            scopes: IndexVec::new(),
            tables: IndexVec::new(),
            node_scopes: FxHashMap::default(),
            resolutions: FxHashMap::default(),
            mutations: FxHashSet::default(),
            diagnostics: DiagnosticCollection::new(),
        }
    }

    /// Add a new scope and its empty symbol table, returning the scope id
    fn add_scope(&mut self, scope: Scope) -> FileScopeId {
        let scope_id = FileScopeId::new(self.scopes.len());
        self.scopes.push(scope);
        self.tables.push(SymbolTable::new());
        scope_id
    }

    /// Record a use-site result. Results are assigned at most once per
    /// node; a second assignment is a pass bug.
    fn set_resolution(&mut self, node: NodeId, result: ResolutionResult) {
        let previous = self.resolutions.insert(node, result);
        debug_assert!(
            previous.is_none(),
            "resolution assigned twice for node {node:?}"
        );
    }

    /// Get a scope by ID
    pub fn scope(&self, id: FileScopeId) -> Option<&Scope> {
        self.scopes.get(id.as_usize())
    }

    /// Get the symbol table for a scope
    pub fn symbol_table(&self, scope_id: FileScopeId) -> Option<&SymbolTable> {
        self.tables.get(scope_id.as_usize())
    }

    /// Get a symbol by reference
    pub fn symbol(&self, sref: SymbolRef) -> Option<&Symbol> {
        self.tables.get(sref.scope.as_usize())?.symbol(sref.symbol)
    }

    /// All scopes in the module
    pub fn scopes(&self) -> impl Iterator<Item = (FileScopeId, &Scope)> {
        self.scopes
            .iter()
            .enumerate()
            .map(|(i, scope)| (FileScopeId::new(i), scope))
    }

    /// Find the root (module) scope
    pub fn root_scope(&self) -> Option<FileScopeId> {
        self.scopes()
            .find(|(_, scope)| scope.parent.is_none())
            .map(|(id, _)| id)
    }

    /// Get child scopes of a given scope
    pub fn child_scopes(&self, parent_id: FileScopeId) -> impl Iterator<Item = FileScopeId> + '_ {
        self.scopes().filter_map(move |(id, scope)| {
            if scope.parent == Some(parent_id) {
                Some(id)
            } else {
                None
            }
        })
    }

    /// Resolve a name by walking up the scope chain from
    /// `starting_scope`; the nearest enclosing binding wins.
    pub fn resolve_name(&self, name: &str, starting_scope: FileScopeId) -> Option<SymbolRef> {
        let mut current_scope = Some(starting_scope);

        while let Some(scope_id) = current_scope {
            if let Some(table) = self.symbol_table(scope_id) {
                if let Some(symbol) = table.lookup(name) {
                    return Some(SymbolRef {
                        scope: scope_id,
                        symbol,
                    });
                }
            }

            current_scope = self.scope(scope_id)?.parent;
        }

        None
    }

    /// The resolution recorded for a use-site node, if any.
    pub fn resolve(&self, node: NodeId) -> Option<ResolutionResult> {
        self.resolutions.get(&node).copied()
    }

    /// The scope opened by `node` itself, if it opens one.
    pub fn scope_opened_by(&self, node: NodeId) -> Option<FileScopeId> {
        self.node_scopes.get(&node).copied()
    }

    /// The scope a node belongs to: the one it opens, or the nearest
    /// enclosing one found by walking parent links.
    pub fn scope_of(&self, ast: &Ast, node: NodeId) -> Option<FileScopeId> {
        if let Some(scope) = self.scope_opened_by(node) {
            return Some(scope);
        }
        ast.ancestors(node)
            .find_map(|ancestor| self.scope_opened_by(ancestor))
    }

    /// Whether an assignment node mutates an existing binding rather
    /// than introducing a fresh one.
    pub fn is_mutation(&self, assignment: NodeId) -> bool {
        self.mutations.contains(&assignment)
    }

    /// All diagnostics in emission order
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.all()
    }
}

/// Resolve one module: the main entry point of this crate.
///
/// The returned index is self-contained; independent modules may be
/// resolved in parallel, each call owning its own state.
pub fn resolve_module(ast: &Ast) -> DefUseIndex {
    let _span = tracing::trace_span!("resolve_module", nodes = ast.len()).entered();
    DefUseResolver::new(ast).build(ast)
}

struct ScopeInfo {
    scope_id: FileScopeId,
}

/// A qualified architype chain whose intermediate scopes did not exist
/// yet when phase 2 reached it; retried once in `after_pass`.
struct DeferredChain {
    node: NodeId,
    require_edge: bool,
}

/// Everything one chain resolution wants to write into the index,
/// buffered so a deferral leaves no partial results behind.
#[derive(Default)]
struct ChainCommit {
    results: SmallVec<[(NodeId, ResolutionResult); 4]>,
    used: SmallVec<[SymbolRef; 4]>,
    diagnostics: Vec<Diagnostic>,
}

/// The definition-use resolution pass.
///
/// Holds the scope stack (top = innermost active scope), the architype
/// and ability context used by pseudo-symbols, and the index under
/// construction. One instance resolves one module and is consumed by
/// [`DefUseResolver::build`].
pub struct DefUseResolver {
    index: DefUseIndex,
    /// Stack of scope ids; the top is the currently active scope
    scope_stack: Vec<ScopeInfo>,
    module_scope: FileScopeId,
    /// Innermost enclosing architypes, outermost first
    arch_stack: Vec<(NodeId, ArchitypeKind)>,
    /// Architype declaration node -> its module-scope symbol
    arch_symbols: FxHashMap<NodeId, SymbolRef>,
    ability_depth: usize,
    deferred_chains: Vec<DeferredChain>,
    /// The well-known graph root, installed as a builtin
    root_symbol: SymbolRef,
    checker: ContextChecker,
}

impl DefUseResolver {
    pub fn new(ast: &Ast) -> Self {
        let mut index = DefUseIndex::new();
        let module_scope = index.add_scope(Scope::new(None, ScopeKind::Module));

        // `root` always resolves; it is declared by the module itself and
        // resolved through the special-var path, so user bindings cannot
        // hide it.
        let outcome = index.tables[module_scope].bind(Symbol {
            name: "root".to_string(),
            decl: ast.root(),
            name_span: ast.span(ast.root()),
            kind: SymbolKind::Architype(ArchitypeKind::Node),
            flags: SymbolFlags::BUILTIN,
        });
        let root_symbol = SymbolRef {
            scope: module_scope,
            symbol: outcome.id(),
        };

        Self {
            index,
            scope_stack: vec![ScopeInfo {
                scope_id: module_scope,
            }],
            module_scope,
            arch_stack: Vec::new(),
            arch_symbols: FxHashMap::default(),
            ability_depth: 0,
            deferred_chains: Vec::new(),
            root_symbol,
            checker: ContextChecker::default(),
        }
    }

    /// Run both phases and return the sealed index.
    pub fn build(mut self, ast: &Ast) -> DefUseIndex {
        // Phase 1: bind module-level architype and enum names so forward
        // references resolve independent of declaration order
        self.collect_module_declarations(ast);
        tracing::debug!("phase 1 complete: module declarations collected");

        // Phase 2: full traversal, with deferred-chain retry and the
        // unused sweep in after_pass
        run_pass(ast, &mut self);
        tracing::debug!(
            diagnostics = self.index.diagnostics.len(),
            "phase 2 complete"
        );

        self.scope_stack.pop();
        self.index
    }

    fn current_scope(&self) -> FileScopeId {
        self.scope_stack
            .last()
            .expect("resolver always has a root scope")
            .scope_id
    }

    /// Open a scope for `node`, run `f` inside it, then seal and pop.
    fn with_scope(&mut self, kind: ScopeKind, node: NodeId, f: impl FnOnce(&mut Self)) {
        let parent = self.current_scope();
        let scope_id = self.index.add_scope(Scope::new(Some(parent), kind));
        self.index.node_scopes.insert(node, scope_id);
        self.scope_stack.push(ScopeInfo { scope_id });
        f(self);
        self.index.tables[scope_id].seal();
        self.scope_stack
            .pop()
            .expect("tried to pop from empty scope stack");
    }

    /// Bind a fresh symbol into the current scope, diagnosing
    /// redeclarations. Shadowing a builtin is silent: builtins never
    /// participate in user-visible shadowing rules.
    fn bind_new(
        &mut self,
        decl: NodeId,
        name: &str,
        name_span: SimpleSpan<usize>,
        kind: SymbolKind,
    ) -> SymbolRef {
        let scope = self.current_scope();
        let outcome = self.index.tables[scope].bind(Symbol {
            name: name.to_string(),
            decl,
            name_span,
            kind,
            flags: SymbolFlags::empty(),
        });

        if let BindOutcome::Shadowed { id, prior } = outcome {
            let table = &self.index.tables[scope];
            let prior_symbol = table.symbol(prior).expect("shadowed symbol must exist");
            if !prior_symbol.flags.contains(SymbolFlags::BUILTIN) {
                let prior_span = prior_symbol.name_span;
                self.index.diagnostics.add(
                    Diagnostic::duplicate_definition(name, name_span).with_related_span(
                        prior_span,
                        format!("previous declaration of '{name}'"),
                    ),
                );
            }
            return SymbolRef { scope, symbol: id };
        }

        SymbolRef {
            scope,
            symbol: outcome.id(),
        }
    }

    /// Bind a declaration that may already be in the current scope from
    /// an earlier phase or a hoisting pre-bind. Re-binding the same
    /// declaration node is idempotent and never diagnoses.
    fn bind_declaration(
        &mut self,
        decl: NodeId,
        name: &str,
        name_span: SimpleSpan<usize>,
        kind: SymbolKind,
    ) -> SymbolRef {
        let scope = self.current_scope();
        let existing = self.index.tables[scope]
            .symbols()
            .find(|(_, symbol)| symbol.decl == decl)
            .map(|(id, _)| id);
        if let Some(symbol) = existing {
            return SymbolRef { scope, symbol };
        }
        self.bind_new(decl, name, name_span, kind)
    }

    fn mark_used(&mut self, sref: SymbolRef) {
        self.index.tables[sref.scope].mark_used(sref.symbol);
    }

    /// Phase 1: bind module-level architype and enum names only; bodies
    /// are not entered.
    fn collect_module_declarations(&mut self, ast: &Ast) {
        let NodeKind::Module(module) = ast.kind(ast.root()) else {
            return;
        };
        for &item in &module.items {
            match ast.kind(item) {
                NodeKind::Architype(arch) => {
                    let sref = self.bind_new(
                        item,
                        &arch.name,
                        arch.name_span,
                        SymbolKind::Architype(arch.kind),
                    );
                    self.arch_symbols.insert(item, sref);
                }
                NodeKind::Enum(en) => {
                    self.bind_new(item, &en.name, en.name_span, SymbolKind::Enum);
                }
                _ => {}
            }
        }
    }

    /// Bind a `Name` node as a loop/comprehension variable in the
    /// current scope.
    fn bind_loop_var(&mut self, ast: &Ast, var: NodeId) {
        if let NodeKind::Name(name) = ast.kind(var) {
            self.bind_new(var, &name.ident, ast.span(var), SymbolKind::Local);
        }
    }

    /// Resolve a simple architype reference against the module scope.
    fn resolve_arch_ref(&mut self, ast: &Ast, id: NodeId, arch_ref: &ArchRefNode, require_edge: bool) {
        let module = self.module_scope;
        let Some(symbol) = self.index.tables[module].lookup(&arch_ref.name) else {
            self.index
                .diagnostics
                .add(Diagnostic::unresolved_name(&arch_ref.name, ast.span(id)));
            self.index.set_resolution(id, ResolutionResult::Unresolved);
            return;
        };
        let sref = SymbolRef {
            scope: module,
            symbol,
        };

        if require_edge && !self.is_edge_architype(sref) {
            let kind = self
                .index
                .symbol(sref)
                .map(|s| s.kind.to_string())
                .unwrap_or_else(|| "symbol".to_string());
            self.index.diagnostics.add(Diagnostic::type_mismatch(
                format!(
                    "Expected an edge architype, found {kind} '{}'",
                    arch_ref.name
                ),
                ast.span(id),
            ));
            self.index.set_resolution(id, ResolutionResult::Unresolved);
            return;
        }

        self.mark_used(sref);
        self.index
            .set_resolution(id, ResolutionResult::Resolved(sref));
    }

    fn is_edge_architype(&self, sref: SymbolRef) -> bool {
        matches!(
            self.index.symbol(sref).map(|s| s.kind),
            Some(SymbolKind::Architype(ArchitypeKind::Edge))
        )
    }

    /// Resolve a chain now if every scope it needs exists, else park it
    /// for the `after_pass` retry.
    fn resolve_or_defer_chain(&mut self, ast: &Ast, node: NodeId, require_edge: bool) {
        match self.eval_chain(ast, node, require_edge, false) {
            Some(commit) => self.commit_chain(commit),
            None => self.deferred_chains.push(DeferredChain {
                node,
                require_edge,
            }),
        }
    }

    /// Resolve a qualified architype chain segment by segment, each
    /// resolved architype providing the scope for the next segment.
    ///
    /// All writes are buffered: returns `None` (deferral) without side
    /// effects when a needed scope does not exist yet and this is not
    /// the final attempt. A chain that revisits an architype already on
    /// its own resolution path aborts with `CyclicReference`; only that
    /// chain is affected.
    fn eval_chain(
        &self,
        ast: &Ast,
        chain_id: NodeId,
        require_edge: bool,
        final_attempt: bool,
    ) -> Option<ChainCommit> {
        let NodeKind::ArchRefChain(chain) = ast.kind(chain_id) else {
            return Some(ChainCommit::default());
        };

        let mut commit = ChainCommit::default();
        let mut scope = self.module_scope;
        let mut path: SmallVec<[NodeId; 4]> = SmallVec::new();
        let mut last: Option<(SymbolRef, &str)> = None;
        let mut aborted = false;

        for (i, &seg) in chain.segments.iter().enumerate() {
            let NodeKind::ArchRef(arch_ref) = ast.kind(seg) else {
                continue;
            };

            let Some(symbol) = self.index.tables[scope].lookup(&arch_ref.name) else {
                commit
                    .diagnostics
                    .push(Diagnostic::unresolved_name(&arch_ref.name, ast.span(seg)));
                commit.results.push((seg, ResolutionResult::Unresolved));
                aborted = true;
                break;
            };
            let sref = SymbolRef { scope, symbol };
            let decl = self.index.symbol(sref).expect("looked-up symbol").decl;

            if path.contains(&decl) {
                commit
                    .diagnostics
                    .push(Diagnostic::cyclic_reference(&arch_ref.name, ast.span(seg)));
                commit.results.push((seg, ResolutionResult::Unresolved));
                aborted = true;
                break;
            }
            path.push(decl);

            commit.results.push((seg, ResolutionResult::Resolved(sref)));
            commit.used.push(sref);
            last = Some((sref, arch_ref.name.as_str()));

            if i + 1 < chain.segments.len() {
                match self.index.scope_opened_by(decl) {
                    Some(next) => scope = next,
                    None if !final_attempt => return None,
                    None => {
                        // The declaration opens no scope, so the next
                        // segment cannot resolve through it
                        let next_seg = chain.segments[i + 1];
                        if let NodeKind::ArchRef(next_ref) = ast.kind(next_seg) {
                            commit.diagnostics.push(Diagnostic::unresolved_name(
                                &next_ref.name,
                                ast.span(next_seg),
                            ));
                            commit.results.push((next_seg, ResolutionResult::Unresolved));
                        }
                        aborted = true;
                        break;
                    }
                }
            }
        }

        let chain_result = match last {
            _ if aborted => ResolutionResult::Unresolved,
            Some((sref, name)) => {
                if require_edge && !self.is_edge_architype(sref) {
                    let kind = self
                        .index
                        .symbol(sref)
                        .map(|s| s.kind.to_string())
                        .unwrap_or_else(|| "symbol".to_string());
                    commit.diagnostics.push(Diagnostic::type_mismatch(
                        format!("Expected an edge architype, found {kind} '{name}'"),
                        ast.span(chain_id),
                    ));
                    ResolutionResult::Unresolved
                } else {
                    ResolutionResult::Resolved(sref)
                }
            }
            None => ResolutionResult::Unresolved,
        };
        commit.results.push((chain_id, chain_result));

        Some(commit)
    }

    fn commit_chain(&mut self, commit: ChainCommit) {
        for (node, result) in commit.results {
            self.index.set_resolution(node, result);
        }
        for sref in commit.used {
            self.mark_used(sref);
        }
        self.index.diagnostics.extend(commit.diagnostics);
    }

    /// Resolve the architype operand of a graph operator: it must name
    /// an edge architype.
    fn resolve_edge_operand(&mut self, ast: &Ast, node: NodeId) {
        match ast.kind(node) {
            NodeKind::ArchRef(arch_ref) => self.resolve_arch_ref(ast, node, arch_ref, true),
            NodeKind::ArchRefChain(_) => self.resolve_or_defer_chain(ast, node, true),
            // Anything else is an ordinary expression operand; resolve
            // the uses inside it
            _ => walk_node(ast, node, self),
        }
    }

    /// Warn about locals and parameters that were never read.
    fn report_unused(&mut self) {
        let mut unused = Vec::new();
        for table in self.index.tables.iter() {
            for (_, symbol) in table.symbols() {
                let sweepable = matches!(symbol.kind, SymbolKind::Local | SymbolKind::Parameter);
                if sweepable
                    && !symbol.flags.contains(SymbolFlags::USED)
                    && !symbol.flags.contains(SymbolFlags::BUILTIN)
                {
                    unused.push(Diagnostic::unused_variable(&symbol.name, symbol.name_span));
                }
            }
        }
        self.index.diagnostics.extend(unused);
    }
}

impl AstPass for DefUseResolver {
    fn enter_module(&mut self, _ast: &Ast, id: NodeId, _module: &ModuleNode) -> Descend {
        let scope = self.current_scope();
        self.index.node_scopes.insert(id, scope);
        Descend::Children
    }

    fn enter_architype(&mut self, ast: &Ast, id: NodeId, arch: &ArchitypeNode) -> Descend {
        let sref = self.bind_declaration(
            id,
            &arch.name,
            arch.name_span,
            SymbolKind::Architype(arch.kind),
        );
        self.arch_symbols.insert(id, sref);

        self.arch_stack.push((id, arch.kind));
        self.with_scope(ScopeKind::Architype(arch.kind), id, |resolver| {
            // Has-vars and ability names are visible throughout the body
            // regardless of textual position, so bind them before any
            // ability body is resolved
            for &item in &arch.body {
                match ast.kind(item) {
                    NodeKind::HasVar(has_var) => {
                        resolver.bind_declaration(
                            item,
                            &has_var.name,
                            has_var.name_span,
                            SymbolKind::HasVar,
                        );
                    }
                    NodeKind::Ability(ability) => {
                        resolver.bind_declaration(
                            item,
                            &ability.name,
                            ability.name_span,
                            SymbolKind::Ability,
                        );
                    }
                    _ => {}
                }
            }

            for &item in &arch.body {
                walk_node(ast, item, resolver);
            }
        });
        self.arch_stack.pop();

        Descend::Skip
    }

    fn enter_enum(&mut self, ast: &Ast, id: NodeId, en: &EnumNode) -> Descend {
        self.bind_declaration(id, &en.name, en.name_span, SymbolKind::Enum);

        // Enumerators do not reference each other, so a plain left-to-
        // right bind suffices
        self.with_scope(ScopeKind::Enum, id, |resolver| {
            for &item in &en.items {
                if let NodeKind::Name(name) = ast.kind(item) {
                    resolver.bind_new(item, &name.ident, ast.span(item), SymbolKind::Enumerator);
                }
            }
        });

        Descend::Skip
    }

    fn enter_ability(&mut self, ast: &Ast, id: NodeId, ability: &AbilityNode) -> Descend {
        self.bind_declaration(id, &ability.name, ability.name_span, SymbolKind::Ability);

        self.ability_depth += 1;
        self.with_scope(ScopeKind::Ability, id, |resolver| {
            for &param in &ability.params {
                walk_node(ast, param, resolver);
            }
            for &stmt in &ability.body {
                walk_node(ast, stmt, resolver);
            }
        });
        self.ability_depth -= 1;

        Descend::Skip
    }

    fn enter_param_var(&mut self, ast: &Ast, id: NodeId, param: &ParamVarNode) -> Descend {
        self.bind_new(id, &param.name, param.name_span, SymbolKind::Parameter);
        if let Some(type_ann) = param.type_ann {
            walk_node(ast, type_ann, self);
        }
        if let Some(default) = param.default {
            walk_node(ast, default, self);
        }
        Descend::Skip
    }

    fn enter_has_var(&mut self, ast: &Ast, id: NodeId, has_var: &HasVarNode) -> Descend {
        self.bind_declaration(id, &has_var.name, has_var.name_span, SymbolKind::HasVar);
        if let Some(type_ann) = has_var.type_ann {
            walk_node(ast, type_ann, self);
        }
        if let Some(value) = has_var.value {
            walk_node(ast, value, self);
        }
        Descend::Skip
    }

    fn enter_assignment(&mut self, ast: &Ast, id: NodeId, assign: &AssignmentNode) -> Descend {
        // The value resolves first: `x = x` with no prior `x` is a use
        // of an unbound name, not of the binding being introduced
        walk_node(ast, assign.value, self);

        match ast.kind(assign.target) {
            NodeKind::Name(name) => {
                if let Some(sref) = self.index.resolve_name(&name.ident, self.current_scope()) {
                    // Mutation of an existing binding
                    self.index.tables[sref.scope].mark_mutated(sref.symbol);
                    self.index
                        .set_resolution(assign.target, ResolutionResult::Resolved(sref));
                    self.index.mutations.insert(id);
                } else {
                    // Sequential binding: visible only to code after this
                    // point, because statements are processed in order
                    self.bind_new(
                        assign.target,
                        &name.ident,
                        ast.span(assign.target),
                        SymbolKind::Local,
                    );
                }
            }
            _ => {
                // Attribute chains and other targets mutate through
                // their base, which resolves as an ordinary use
                self.index.mutations.insert(id);
                walk_node(ast, assign.target, self);
            }
        }

        Descend::Skip
    }

    fn enter_atom_trailer(&mut self, ast: &Ast, id: NodeId, trailer: &AtomTrailerNode) -> Descend {
        walk_node(ast, trailer.base, self);
        // Member names are not symbol-table entries; a type-aware pass
        // resolves them later
        for &segment in &trailer.segments {
            self.index
                .set_resolution(segment, ResolutionResult::PendingMember);
        }
        Descend::Skip
    }

    fn enter_inner_compr(&mut self, ast: &Ast, id: NodeId, compr: &InnerComprNode) -> Descend {
        // The iterable belongs to the enclosing scope
        walk_node(ast, compr.iter, self);

        self.with_scope(ScopeKind::Comprehension, id, |resolver| {
            for &var in &compr.vars {
                resolver.bind_loop_var(ast, var);
            }
            if let Some(cond) = compr.cond {
                walk_node(ast, cond, resolver);
            }
            walk_node(ast, compr.body, resolver);
        });

        Descend::Skip
    }

    fn enter_filter_compr(&mut self, ast: &Ast, id: NodeId, compr: &FilterComprNode) -> Descend {
        walk_node(ast, compr.base, self);

        self.with_scope(ScopeKind::Comprehension, id, |resolver| {
            if let Some(var) = compr.var {
                resolver.bind_loop_var(ast, var);
            }
            walk_node(ast, compr.predicate, resolver);
        });

        Descend::Skip
    }

    fn enter_expr_as_item(&mut self, ast: &Ast, id: NodeId, item: &ExprAsItemNode) -> Descend {
        walk_node(ast, item.expr, self);
        self.bind_new(id, &item.alias, item.alias_span, SymbolKind::Local);
        Descend::Skip
    }

    fn enter_arch_ref_chain(
        &mut self,
        ast: &Ast,
        id: NodeId,
        _chain: &trellis_compiler_ast::ArchRefChainNode,
    ) -> Descend {
        self.resolve_or_defer_chain(ast, id, false);
        Descend::Skip
    }

    fn enter_edge_op_ref(&mut self, ast: &Ast, _id: NodeId, edge_op: &EdgeOpRefNode) -> Descend {
        if let Some(filter) = edge_op.filter {
            self.resolve_edge_operand(ast, filter);
        }
        Descend::Skip
    }

    fn enter_connect_op(&mut self, ast: &Ast, _id: NodeId, connect: &ConnectOpNode) -> Descend {
        walk_node(ast, connect.left, self);
        walk_node(ast, connect.right, self);
        if let Some(edge) = connect.edge {
            self.resolve_edge_operand(ast, edge);
        }
        Descend::Skip
    }

    fn enter_disconnect_op(
        &mut self,
        ast: &Ast,
        _id: NodeId,
        disconnect: &DisconnectOpNode,
    ) -> Descend {
        walk_node(ast, disconnect.left, self);
        walk_node(ast, disconnect.right, self);
        if let Some(edge) = disconnect.edge {
            self.resolve_edge_operand(ast, edge);
        }
        Descend::Skip
    }

    fn enter_in_for_stmt(&mut self, ast: &Ast, id: NodeId, stmt: &InForStmtNode) -> Descend {
        // The iterable belongs to the enclosing scope
        walk_node(ast, stmt.iter, self);

        self.with_scope(ScopeKind::Loop, id, |resolver| {
            for &var in &stmt.vars {
                resolver.bind_loop_var(ast, var);
            }
            for &body_stmt in &stmt.body {
                walk_node(ast, body_stmt, resolver);
            }
        });

        Descend::Skip
    }

    fn enter_delete_stmt(&mut self, ast: &Ast, _id: NodeId, stmt: &DeleteStmtNode) -> Descend {
        if let Some(diag) = self.checker.check_delete_target(ast, stmt.target) {
            self.index.diagnostics.add(diag);
        } else {
            // The target is a use, not a definition
            walk_node(ast, stmt.target, self);
        }
        Descend::Skip
    }

    fn enter_special_var_ref(&mut self, ast: &Ast, id: NodeId, var: SpecialVar) {
        let ctx = SpecialVarContext {
            architype: self.arch_stack.last().map(|(_, kind)| *kind),
            in_ability: self.ability_depth > 0,
        };
        if let Some(diag) = self.checker.check_special_var(var, ctx, ast.span(id)) {
            self.index.diagnostics.add(diag);
            self.index.set_resolution(id, ResolutionResult::Unresolved);
            return;
        }

        let target = match var {
            SpecialVar::Root => Some(self.root_symbol),
            SpecialVar::SelfRef | SpecialVar::Here | SpecialVar::Visitor => self
                .arch_stack
                .last()
                .and_then(|(node, _)| self.arch_symbols.get(node).copied()),
        };

        match target {
            Some(sref) => {
                self.mark_used(sref);
                self.index
                    .set_resolution(id, ResolutionResult::Resolved(sref));
            }
            None => {
                self.index.set_resolution(id, ResolutionResult::Unresolved);
            }
        }
    }

    fn enter_arch_ref(&mut self, ast: &Ast, id: NodeId, arch_ref: &ArchRefNode) {
        // A standalone architype reference resolves against module scope
        // with no kind constraint; graph operators impose the edge
        // requirement through their own operand path
        self.resolve_arch_ref(ast, id, arch_ref, false);
    }

    fn enter_name(&mut self, ast: &Ast, id: NodeId, name: &NameNode) {
        if let Some(sref) = self.index.resolve_name(&name.ident, self.current_scope()) {
            self.mark_used(sref);
            self.index
                .set_resolution(id, ResolutionResult::Resolved(sref));
        } else {
            self.index
                .diagnostics
                .add(Diagnostic::unresolved_name(&name.ident, ast.span(id)));
            self.index.set_resolution(id, ResolutionResult::Unresolved);
        }
    }

    fn after_pass(&mut self, ast: &Ast) {
        // The module's traversal is over; its bindings are final
        self.index.tables[self.module_scope].seal();

        // One retry for chains deferred on scope ordering; whatever
        // still fails is final
        let deferred = std::mem::take(&mut self.deferred_chains);
        for chain in deferred {
            if let Some(commit) = self.eval_chain(ast, chain.node, chain.require_edge, true) {
                self.commit_chain(commit);
            }
        }

        self.report_unused();
    }
}
