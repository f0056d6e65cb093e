//! Has-var and ability visibility throughout an architype body,
//! independent of textual order.

use trellis_compiler_ast::{ArchitypeKind, FuncCallNode, NodeKind};
use trellis_compiler_semantic::{resolve_module, SymbolKind};

use crate::common::*;

#[test]
fn has_var_visible_before_its_declaration_line() {
    // node counter { can bump { score; } has score = 0; }
    let mut t = TestTree::new();
    let (stmt, use_site) = t.use_stmt("score");
    let bump = t.ability("bump", vec![], vec![stmt]);
    let zero = t.int(0);
    let score = t.has_var("score", Some(zero));
    let counter = t.architype("counter", ArchitypeKind::Node, vec![bump, score]);
    let ast = t.module(vec![counter]);

    let index = resolve_module(&ast);

    assert_no_errors(&index);
    let resolved = expect_resolved(&index, use_site);
    let symbol = index.symbol(resolved).unwrap();
    assert_eq!(symbol.kind, SymbolKind::HasVar);
    assert_eq!(symbol.decl, score);
}

#[test]
fn ability_callable_before_its_declaration_line() {
    // walker probe { can first { second(); } can second { } }
    let mut t = TestTree::new();
    let callee = t.name("second");
    let call = t.alloc(NodeKind::FuncCall(FuncCallNode {
        callee,
        args: vec![],
    }));
    let call_stmt = t.expr_stmt(call);
    let first = t.ability("first", vec![], vec![call_stmt]);
    let second = t.ability("second", vec![], vec![]);
    let probe = t.architype("probe", ArchitypeKind::Walker, vec![first, second]);
    let ast = t.module(vec![probe]);

    let index = resolve_module(&ast);

    assert_no_errors(&index);
    let resolved = expect_resolved(&index, callee);
    let symbol = index.symbol(resolved).unwrap();
    assert_eq!(symbol.kind, SymbolKind::Ability);
    assert_eq!(symbol.decl, second);
}

#[test]
fn hoisting_does_not_duplicate_bindings() {
    // The pre-bind at architype entry and the body traversal must agree
    // on one symbol per declaration.
    let mut t = TestTree::new();
    let x = t.has_var("x", None);
    let y = t.has_var("y", None);
    let a = t.architype("A", ArchitypeKind::Object, vec![x, y]);
    let ast = t.module(vec![a]);

    let index = resolve_module(&ast);

    assert!(index.diagnostics().is_empty());
    let arch_scope = index.scope_opened_by(a).unwrap();
    let table = index.symbol_table(arch_scope).unwrap();
    assert_eq!(table.len(), 2);
}

#[test]
fn duplicate_has_vars_diagnose_once() {
    let mut t = TestTree::new();
    let first = t.has_var("x", None);
    let second = t.has_var("x", None);
    let a = t.architype("A", ArchitypeKind::Node, vec![first, second]);
    let ast = t.module(vec![a]);

    let index = resolve_module(&ast);

    let duplicates = diagnostic_codes(&index)
        .iter()
        .filter(|c| **c == trellis_compiler_diagnostics::DiagnosticCode::DuplicateDefinition)
        .count();
    assert_eq!(duplicates, 1);
}

#[test]
fn has_var_initializer_sees_sibling_has_vars() {
    // node A { has a = b; has b; } - hoisting makes `b` visible to the
    // initializer of `a`
    let mut t = TestTree::new();
    let b_use = t.name("b");
    let a_var = t.has_var("a", Some(b_use));
    let b_var = t.has_var("b", None);
    let arch = t.architype("A", ArchitypeKind::Node, vec![a_var, b_var]);
    let ast = t.module(vec![arch]);

    let index = resolve_module(&ast);

    assert_no_errors(&index);
    let resolved = expect_resolved(&index, b_use);
    assert_eq!(index.symbol(resolved).unwrap().decl, b_var);
}
