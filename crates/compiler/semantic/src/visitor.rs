//! # AST Traversal Engine
//!
//! A generic pre-order, depth-first walker over the Trellis AST with one
//! `enter_*` hook per node kind. The engine carries no resolution
//! semantics itself and is reused by every analysis pass.
//!
//! ## Architecture
//!
//! - **`AstPass` trait**: per-kind hooks with default implementations, so
//!   a pass only overrides the kinds it cares about
//! - **Walk functions**: `walk_node`/`walk_children` are free functions a
//!   hook can call to drive its own partial descent
//! - **`Descend` control**: a hook for a composite node returns whether
//!   the engine should descend into the children; returning
//!   [`Descend::Skip`] lets the pass defer entering a subtree until some
//!   state (typically a new scope) exists
//!
//! Dispatch is a single exhaustive match over [`NodeKind`]: adding a node
//! kind fails compilation here until every pass gains a case.
//!
//! ## Usage
//!
//! ```rust,ignore
//! struct NameCounter(usize);
//!
//! impl AstPass for NameCounter {
//!     fn enter_name(&mut self, _ast: &Ast, _id: NodeId, _name: &NameNode) {
//!         self.0 += 1;
//!     }
//! }
//! ```

use trellis_compiler_ast::{
    AbilityNode, ArchRefChainNode, ArchRefNode, ArchitypeNode, AssignmentNode, Ast,
    AtomTrailerNode, BuiltinTy, ConnectOpNode, DeleteStmtNode, DisconnectOpNode, EdgeOpRefNode,
    EnumNode, ExprAsItemNode, ExprStmtNode, FilterComprNode, FuncCallNode, HasVarNode,
    IndexSliceNode, InForStmtNode, InnerComprNode, ModuleNode, NameNode, NodeId, NodeKind,
    ParamVarNode, SpecialVar, TokenNode,
};

/// Whether the engine should keep walking into a composite node's
/// children after its hook ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descend {
    /// Visit the children in source order.
    Children,
    /// Do not descend; the hook either handled the subtree itself or
    /// wants it skipped entirely.
    Skip,
}

/// Core pass trait: one hook per node kind, invoked pre-order.
///
/// Composite hooks return [`Descend`]; leaf hooks return nothing. Every
/// hook has a default implementation, so passes override selectively.
#[allow(unused_variables)]
pub trait AstPass {
    fn enter_module(&mut self, ast: &Ast, id: NodeId, module: &ModuleNode) -> Descend {
        Descend::Children
    }

    fn enter_architype(&mut self, ast: &Ast, id: NodeId, arch: &ArchitypeNode) -> Descend {
        Descend::Children
    }

    fn enter_enum(&mut self, ast: &Ast, id: NodeId, en: &EnumNode) -> Descend {
        Descend::Children
    }

    fn enter_ability(&mut self, ast: &Ast, id: NodeId, ability: &AbilityNode) -> Descend {
        Descend::Children
    }

    fn enter_param_var(&mut self, ast: &Ast, id: NodeId, param: &ParamVarNode) -> Descend {
        Descend::Children
    }

    fn enter_has_var(&mut self, ast: &Ast, id: NodeId, has_var: &HasVarNode) -> Descend {
        Descend::Children
    }

    fn enter_assignment(&mut self, ast: &Ast, id: NodeId, assign: &AssignmentNode) -> Descend {
        Descend::Children
    }

    fn enter_atom_trailer(&mut self, ast: &Ast, id: NodeId, trailer: &AtomTrailerNode) -> Descend {
        Descend::Children
    }

    fn enter_func_call(&mut self, ast: &Ast, id: NodeId, call: &FuncCallNode) -> Descend {
        Descend::Children
    }

    fn enter_index_slice(&mut self, ast: &Ast, id: NodeId, slice: &IndexSliceNode) -> Descend {
        Descend::Children
    }

    fn enter_inner_compr(&mut self, ast: &Ast, id: NodeId, compr: &InnerComprNode) -> Descend {
        Descend::Children
    }

    fn enter_filter_compr(&mut self, ast: &Ast, id: NodeId, compr: &FilterComprNode) -> Descend {
        Descend::Children
    }

    fn enter_expr_as_item(&mut self, ast: &Ast, id: NodeId, item: &ExprAsItemNode) -> Descend {
        Descend::Children
    }

    fn enter_arch_ref_chain(&mut self, ast: &Ast, id: NodeId, chain: &ArchRefChainNode) -> Descend {
        Descend::Children
    }

    fn enter_edge_op_ref(&mut self, ast: &Ast, id: NodeId, edge_op: &EdgeOpRefNode) -> Descend {
        Descend::Children
    }

    fn enter_connect_op(&mut self, ast: &Ast, id: NodeId, connect: &ConnectOpNode) -> Descend {
        Descend::Children
    }

    fn enter_disconnect_op(
        &mut self,
        ast: &Ast,
        id: NodeId,
        disconnect: &DisconnectOpNode,
    ) -> Descend {
        Descend::Children
    }

    fn enter_in_for_stmt(&mut self, ast: &Ast, id: NodeId, stmt: &InForStmtNode) -> Descend {
        Descend::Children
    }

    fn enter_delete_stmt(&mut self, ast: &Ast, id: NodeId, stmt: &DeleteStmtNode) -> Descend {
        Descend::Children
    }

    fn enter_expr_stmt(&mut self, ast: &Ast, id: NodeId, stmt: &ExprStmtNode) -> Descend {
        Descend::Children
    }

    fn enter_special_var_ref(&mut self, ast: &Ast, id: NodeId, var: SpecialVar) {}

    fn enter_arch_ref(&mut self, ast: &Ast, id: NodeId, arch_ref: &ArchRefNode) {}

    fn enter_int(&mut self, ast: &Ast, id: NodeId, value: i64) {}

    fn enter_float(&mut self, ast: &Ast, id: NodeId, value: f64) {}

    fn enter_string(&mut self, ast: &Ast, id: NodeId, value: &str) {}

    fn enter_bool(&mut self, ast: &Ast, id: NodeId, value: bool) {}

    fn enter_builtin_type(&mut self, ast: &Ast, id: NodeId, ty: BuiltinTy) {}

    fn enter_token(&mut self, ast: &Ast, id: NodeId, token: &TokenNode) {}

    fn enter_name(&mut self, ast: &Ast, id: NodeId, name: &NameNode) {}

    /// Invoked once after the entire tree has been visited.
    fn after_pass(&mut self, ast: &Ast) {}
}

/// Run a pass over the whole tree: pre-order walk from the root, then
/// `after_pass`.
pub fn run_pass<P: AstPass + ?Sized>(ast: &Ast, pass: &mut P) {
    walk_node(ast, ast.root(), pass);
    pass.after_pass(ast);
}

/// Visit one node: dispatch to its hook, then descend into children
/// unless the hook said otherwise.
pub fn walk_node<P: AstPass + ?Sized>(ast: &Ast, id: NodeId, pass: &mut P) {
    let descend = match ast.kind(id) {
        NodeKind::Module(n) => pass.enter_module(ast, id, n),
        NodeKind::Architype(n) => pass.enter_architype(ast, id, n),
        NodeKind::Enum(n) => pass.enter_enum(ast, id, n),
        NodeKind::Ability(n) => pass.enter_ability(ast, id, n),
        NodeKind::ParamVar(n) => pass.enter_param_var(ast, id, n),
        NodeKind::HasVar(n) => pass.enter_has_var(ast, id, n),
        NodeKind::Assignment(n) => pass.enter_assignment(ast, id, n),
        NodeKind::AtomTrailer(n) => pass.enter_atom_trailer(ast, id, n),
        NodeKind::FuncCall(n) => pass.enter_func_call(ast, id, n),
        NodeKind::IndexSlice(n) => pass.enter_index_slice(ast, id, n),
        NodeKind::InnerCompr(n) => pass.enter_inner_compr(ast, id, n),
        NodeKind::FilterCompr(n) => pass.enter_filter_compr(ast, id, n),
        NodeKind::ExprAsItem(n) => pass.enter_expr_as_item(ast, id, n),
        NodeKind::ArchRefChain(n) => pass.enter_arch_ref_chain(ast, id, n),
        NodeKind::EdgeOpRef(n) => pass.enter_edge_op_ref(ast, id, n),
        NodeKind::ConnectOp(n) => pass.enter_connect_op(ast, id, n),
        NodeKind::DisconnectOp(n) => pass.enter_disconnect_op(ast, id, n),
        NodeKind::InForStmt(n) => pass.enter_in_for_stmt(ast, id, n),
        NodeKind::DeleteStmt(n) => pass.enter_delete_stmt(ast, id, n),
        NodeKind::ExprStmt(n) => pass.enter_expr_stmt(ast, id, n),
        NodeKind::SpecialVarRef(var) => {
            pass.enter_special_var_ref(ast, id, *var);
            Descend::Skip
        }
        NodeKind::ArchRef(n) => {
            pass.enter_arch_ref(ast, id, n);
            Descend::Skip
        }
        NodeKind::IntLit(value) => {
            pass.enter_int(ast, id, *value);
            Descend::Skip
        }
        NodeKind::FloatLit(value) => {
            pass.enter_float(ast, id, *value);
            Descend::Skip
        }
        NodeKind::StringLit(value) => {
            pass.enter_string(ast, id, value);
            Descend::Skip
        }
        NodeKind::BoolLit(value) => {
            pass.enter_bool(ast, id, *value);
            Descend::Skip
        }
        NodeKind::BuiltinType(ty) => {
            pass.enter_builtin_type(ast, id, *ty);
            Descend::Skip
        }
        NodeKind::Token(n) => {
            pass.enter_token(ast, id, n);
            Descend::Skip
        }
        NodeKind::Name(n) => {
            pass.enter_name(ast, id, n);
            Descend::Skip
        }
    };

    if descend == Descend::Children {
        walk_children(ast, id, pass);
    }
}

/// Visit every child of `id` in source order.
pub fn walk_children<P: AstPass + ?Sized>(ast: &Ast, id: NodeId, pass: &mut P) {
    for child in ast.children(id) {
        walk_node(ast, child, pass);
    }
}
