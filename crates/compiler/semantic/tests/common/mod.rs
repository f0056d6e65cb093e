//! Common test utilities for definition-use resolution tests
//!
//! The upstream parser is not part of this crate, so tests build trees
//! directly through the AST arena. [`TestTree`] wraps [`AstBuilder`]
//! with auto-advancing spans (every node gets a distinct source
//! position) and one constructor per node kind the suite needs.

use chumsky::span::SimpleSpan;
use trellis_compiler_ast::{
    AbilityNode, ArchRefChainNode, ArchRefNode, ArchitypeKind, ArchitypeNode, AssignmentNode, Ast,
    AstBuilder, AtomTrailerNode, ConnectOpNode, DeleteStmtNode, DisconnectOpNode, EdgeDir,
    EdgeOpRefNode, EnumNode, ExprAsItemNode, ExprStmtNode, FilterComprNode, HasVarNode,
    InForStmtNode, InnerComprNode, ModuleNode, NameNode, NodeId, NodeKind, ParamVarNode,
    SpecialVar,
};
use trellis_compiler_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSeverity};
use trellis_compiler_semantic::{DefUseIndex, ResolutionResult, SymbolRef};

/// Incremental AST builder with auto-advancing spans.
pub struct TestTree {
    builder: AstBuilder,
    pos: usize,
}

impl TestTree {
    pub fn new() -> Self {
        Self {
            builder: AstBuilder::new(),
            pos: 0,
        }
    }

    fn next_span(&mut self) -> SimpleSpan<usize> {
        let start = self.pos;
        self.pos += 2;
        SimpleSpan::from(start..start + 1)
    }

    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let span = self.next_span();
        self.builder.alloc(kind, span)
    }

    pub fn name(&mut self, ident: &str) -> NodeId {
        self.alloc(NodeKind::Name(NameNode {
            ident: ident.to_string(),
        }))
    }

    pub fn int(&mut self, value: i64) -> NodeId {
        self.alloc(NodeKind::IntLit(value))
    }

    pub fn expr_stmt(&mut self, expr: NodeId) -> NodeId {
        self.alloc(NodeKind::ExprStmt(ExprStmtNode { expr }))
    }

    /// A statement that just mentions `ident`; returns (statement, name).
    pub fn use_stmt(&mut self, ident: &str) -> (NodeId, NodeId) {
        let name = self.name(ident);
        (self.expr_stmt(name), name)
    }

    pub fn assign(&mut self, target: NodeId, value: NodeId) -> NodeId {
        self.alloc(NodeKind::Assignment(AssignmentNode { target, value }))
    }

    /// `ident = value`; returns (assignment, target name).
    pub fn assign_name(&mut self, ident: &str, value: NodeId) -> (NodeId, NodeId) {
        let target = self.name(ident);
        (self.assign(target, value), target)
    }

    pub fn has_var(&mut self, name: &str, value: Option<NodeId>) -> NodeId {
        let name_span = self.next_span();
        self.alloc(NodeKind::HasVar(HasVarNode {
            name: name.to_string(),
            name_span,
            type_ann: None,
            value,
        }))
    }

    pub fn param(&mut self, name: &str) -> NodeId {
        let name_span = self.next_span();
        self.alloc(NodeKind::ParamVar(ParamVarNode {
            name: name.to_string(),
            name_span,
            type_ann: None,
            default: None,
        }))
    }

    pub fn ability(&mut self, name: &str, params: Vec<NodeId>, body: Vec<NodeId>) -> NodeId {
        let name_span = self.next_span();
        self.alloc(NodeKind::Ability(AbilityNode {
            name: name.to_string(),
            name_span,
            params,
            body,
        }))
    }

    pub fn architype(&mut self, name: &str, kind: ArchitypeKind, body: Vec<NodeId>) -> NodeId {
        let name_span = self.next_span();
        self.alloc(NodeKind::Architype(ArchitypeNode {
            name: name.to_string(),
            name_span,
            kind,
            body,
        }))
    }

    /// An enum declaration; returns (enum, enumerator names).
    pub fn enum_decl(&mut self, name: &str, items: &[&str]) -> (NodeId, Vec<NodeId>) {
        let item_ids: Vec<NodeId> = items.iter().map(|item| self.name(item)).collect();
        let name_span = self.next_span();
        let en = self.alloc(NodeKind::Enum(EnumNode {
            name: name.to_string(),
            name_span,
            items: item_ids.clone(),
        }));
        (en, item_ids)
    }

    pub fn arch_ref(&mut self, name: &str) -> NodeId {
        self.alloc(NodeKind::ArchRef(ArchRefNode {
            name: name.to_string(),
        }))
    }

    /// A qualified architype chain; returns (chain, segments).
    pub fn arch_chain(&mut self, names: &[&str]) -> (NodeId, Vec<NodeId>) {
        let segments: Vec<NodeId> = names.iter().map(|name| self.arch_ref(name)).collect();
        let chain = self.alloc(NodeKind::ArchRefChain(ArchRefChainNode {
            segments: segments.clone(),
        }));
        (chain, segments)
    }

    pub fn special(&mut self, var: SpecialVar) -> NodeId {
        self.alloc(NodeKind::SpecialVarRef(var))
    }

    /// `base.seg1.seg2...`; returns (trailer, segments).
    pub fn trailer(&mut self, base: NodeId, segments: &[&str]) -> (NodeId, Vec<NodeId>) {
        let segment_ids: Vec<NodeId> = segments.iter().map(|seg| self.name(seg)).collect();
        let trailer = self.alloc(NodeKind::AtomTrailer(AtomTrailerNode {
            base,
            segments: segment_ids.clone(),
        }));
        (trailer, segment_ids)
    }

    pub fn connect(&mut self, left: NodeId, right: NodeId, edge: Option<NodeId>) -> NodeId {
        self.alloc(NodeKind::ConnectOp(ConnectOpNode { left, right, edge }))
    }

    pub fn disconnect(&mut self, left: NodeId, right: NodeId, edge: Option<NodeId>) -> NodeId {
        self.alloc(NodeKind::DisconnectOp(DisconnectOpNode { left, right, edge }))
    }

    pub fn edge_op(&mut self, dir: EdgeDir, filter: Option<NodeId>) -> NodeId {
        self.alloc(NodeKind::EdgeOpRef(EdgeOpRefNode { dir, filter }))
    }

    /// `for vars in iter { body }`; returns (statement, var names).
    pub fn for_stmt(&mut self, vars: &[&str], iter: NodeId, body: Vec<NodeId>) -> (NodeId, Vec<NodeId>) {
        let var_ids: Vec<NodeId> = vars.iter().map(|var| self.name(var)).collect();
        let stmt = self.alloc(NodeKind::InForStmt(InForStmtNode {
            vars: var_ids.clone(),
            iter,
            body,
        }));
        (stmt, var_ids)
    }

    /// `[body for vars in iter if cond]`; returns (comprehension, var names).
    pub fn compr(
        &mut self,
        body: NodeId,
        vars: &[&str],
        iter: NodeId,
        cond: Option<NodeId>,
    ) -> (NodeId, Vec<NodeId>) {
        let var_ids: Vec<NodeId> = vars.iter().map(|var| self.name(var)).collect();
        let compr = self.alloc(NodeKind::InnerCompr(InnerComprNode {
            body,
            vars: var_ids.clone(),
            iter,
            cond,
        }));
        (compr, var_ids)
    }

    pub fn filter_compr(&mut self, base: NodeId, var: Option<NodeId>, predicate: NodeId) -> NodeId {
        self.alloc(NodeKind::FilterCompr(FilterComprNode {
            base,
            var,
            predicate,
        }))
    }

    pub fn delete_stmt(&mut self, target: NodeId) -> NodeId {
        self.alloc(NodeKind::DeleteStmt(DeleteStmtNode { target }))
    }

    pub fn as_item(&mut self, expr: NodeId, alias: &str) -> NodeId {
        let alias_span = self.next_span();
        self.alloc(NodeKind::ExprAsItem(ExprAsItemNode {
            expr,
            alias: alias.to_string(),
            alias_span,
        }))
    }

    /// Seal the tree with a module root around `items`.
    pub fn module(mut self, items: Vec<NodeId>) -> Ast {
        let module = self.alloc(NodeKind::Module(ModuleNode {
            name: "main".to_string(),
            items,
        }));
        self.builder.finish(module).expect("test tree must be a tree")
    }
}

// ===== Assertion helpers =====

/// All diagnostic codes in emission order.
pub fn diagnostic_codes(index: &DefUseIndex) -> Vec<DiagnosticCode> {
    index.diagnostics().iter().map(|d| d.code).collect()
}

/// Error-severity diagnostics only (warnings such as unused variables
/// are legitimate in many otherwise-clean scenarios).
pub fn errors(index: &DefUseIndex) -> Vec<&Diagnostic> {
    index
        .diagnostics()
        .iter()
        .filter(|d| d.severity == DiagnosticSeverity::Error)
        .collect()
}

#[track_caller]
pub fn assert_no_errors(index: &DefUseIndex) {
    let errors = errors(index);
    assert!(
        errors.is_empty(),
        "expected no error diagnostics, got: {errors:#?}"
    );
}

/// The resolution for `node`, which must be `Resolved`.
#[track_caller]
pub fn expect_resolved(index: &DefUseIndex, node: NodeId) -> SymbolRef {
    match index.resolve(node) {
        Some(ResolutionResult::Resolved(sref)) => sref,
        other => panic!("expected node {node:?} to be resolved, got {other:?}"),
    }
}

/// The visible module-scope symbol named `name`.
#[track_caller]
pub fn module_symbol(index: &DefUseIndex, name: &str) -> SymbolRef {
    let root = index.root_scope().expect("module scope must exist");
    let table = index.symbol_table(root).expect("module table must exist");
    let symbol = table
        .lookup(name)
        .unwrap_or_else(|| panic!("'{name}' not bound in module scope"));
    SymbolRef {
        scope: root,
        symbol,
    }
}
