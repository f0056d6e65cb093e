//! Comprehension and loop scoping: loop variables live exactly as long
//! as the construct that binds them.

use trellis_compiler_semantic::{resolve_module, ResolutionResult, ScopeKind, SymbolKind};

use crate::common::*;

#[test]
fn compr_var_resolves_inside_and_not_after() {
    // xs = 1; [it for it in xs]; it;
    let mut t = TestTree::new();
    let one = t.int(1);
    let (bind_xs, _) = t.assign_name("xs", one);
    let body_use = t.name("it");
    let iter = t.name("xs");
    let (compr, vars) = t.compr(body_use, &["it"], iter, None);
    let compr_stmt = t.expr_stmt(compr);
    let (after_stmt, after_use) = t.use_stmt("it");
    let ast = t.module(vec![bind_xs, compr_stmt, after_stmt]);

    let index = resolve_module(&ast);

    let resolved = expect_resolved(&index, body_use);
    assert_eq!(index.symbol(resolved).unwrap().decl, vars[0]);
    assert_eq!(index.resolve(after_use), Some(ResolutionResult::Unresolved));
}

#[test]
fn compr_iterable_resolves_in_enclosing_scope() {
    // [x for x in x] - the iterable `x` is the enclosing binding, not
    // the loop variable
    let mut t = TestTree::new();
    let one = t.int(1);
    let (bind_x, outer_x) = t.assign_name("x", one);
    let body_use = t.name("x");
    let iter_use = t.name("x");
    let (compr, vars) = t.compr(body_use, &["x"], iter_use, None);
    let compr_stmt = t.expr_stmt(compr);
    let ast = t.module(vec![bind_x, compr_stmt]);

    let index = resolve_module(&ast);

    assert_no_errors(&index);
    let iter_resolved = expect_resolved(&index, iter_use);
    assert_eq!(index.symbol(iter_resolved).unwrap().decl, outer_x);

    let body_resolved = expect_resolved(&index, body_use);
    assert_eq!(index.symbol(body_resolved).unwrap().decl, vars[0]);
}

#[test]
fn compr_condition_sees_loop_var() {
    let mut t = TestTree::new();
    let one = t.int(1);
    let (bind_xs, _) = t.assign_name("xs", one);
    let body = t.int(0);
    let iter = t.name("xs");
    let cond_use = t.name("item");
    let (compr, vars) = t.compr(body, &["item"], iter, Some(cond_use));
    let compr_stmt = t.expr_stmt(compr);
    let ast = t.module(vec![bind_xs, compr_stmt]);

    let index = resolve_module(&ast);

    assert_no_errors(&index);
    let resolved = expect_resolved(&index, cond_use);
    assert_eq!(index.symbol(resolved).unwrap().decl, vars[0]);
}

#[test]
fn filter_compr_unbound_predicate_reports_and_completes() {
    // xs = 1; xs(?phantom) - one unresolved name, pass still completes
    let mut t = TestTree::new();
    let one = t.int(1);
    let (bind_xs, _) = t.assign_name("xs", one);
    let base = t.name("xs");
    let predicate = t.name("phantom");
    let filter = t.filter_compr(base, None, predicate);
    let stmt = t.expr_stmt(filter);
    let ast = t.module(vec![bind_xs, stmt]);

    let index = resolve_module(&ast);

    assert_eq!(
        diagnostic_codes(&index),
        vec![trellis_compiler_diagnostics::DiagnosticCode::UnresolvedName]
    );
    assert_eq!(index.resolve(predicate), Some(ResolutionResult::Unresolved));
    assert!(!index.diagnostics().is_empty());
}

#[test]
fn filter_compr_explicit_var_scopes_to_predicate() {
    let mut t = TestTree::new();
    let one = t.int(1);
    let (bind_xs, _) = t.assign_name("xs", one);
    let base = t.name("xs");
    let var = t.name("entry");
    let predicate = t.name("entry");
    let filter = t.filter_compr(base, Some(var), predicate);
    let stmt = t.expr_stmt(filter);
    let (after_stmt, after_use) = t.use_stmt("entry");
    let ast = t.module(vec![bind_xs, stmt, after_stmt]);

    let index = resolve_module(&ast);

    let resolved = expect_resolved(&index, predicate);
    assert_eq!(index.symbol(resolved).unwrap().decl, var);
    assert_eq!(index.resolve(after_use), Some(ResolutionResult::Unresolved));
}

#[test]
fn compr_scope_is_sealed_on_exit() {
    let mut t = TestTree::new();
    let one = t.int(1);
    let (bind_xs, _) = t.assign_name("xs", one);
    let body = t.name("it");
    let iter = t.name("xs");
    let (compr, _) = t.compr(body, &["it"], iter, None);
    let stmt = t.expr_stmt(compr);
    let ast = t.module(vec![bind_xs, stmt]);

    let index = resolve_module(&ast);

    let compr_scope = index.scope_opened_by(compr).expect("comprehension scope");
    assert_eq!(
        index.scope(compr_scope).unwrap().kind,
        ScopeKind::Comprehension
    );
    assert!(index.symbol_table(compr_scope).unwrap().is_sealed());
}

#[test]
fn for_loop_var_scoped_to_body() {
    // xs = 1; for n in xs { n; } n;
    let mut t = TestTree::new();
    let one = t.int(1);
    let (bind_xs, _) = t.assign_name("xs", one);
    let iter = t.name("xs");
    let (body_stmt, body_use) = t.use_stmt("n");
    let (for_stmt, vars) = t.for_stmt(&["n"], iter, vec![body_stmt]);
    let (after_stmt, after_use) = t.use_stmt("n");
    let ast = t.module(vec![bind_xs, for_stmt, after_stmt]);

    let index = resolve_module(&ast);

    let resolved = expect_resolved(&index, body_use);
    assert_eq!(index.symbol(resolved).unwrap().decl, vars[0]);
    assert_eq!(index.resolve(after_use), Some(ResolutionResult::Unresolved));

    let loop_scope = index.scope_opened_by(for_stmt).expect("loop scope");
    assert_eq!(index.scope(loop_scope).unwrap().kind, ScopeKind::Loop);
}

#[test]
fn as_item_binds_in_enclosing_construct() {
    // (1 as snapshot); snapshot;
    let mut t = TestTree::new();
    let one = t.int(1);
    let item = t.as_item(one, "snapshot");
    let stmt = t.expr_stmt(item);
    let (use_after, use_site) = t.use_stmt("snapshot");
    let ast = t.module(vec![stmt, use_after]);

    let index = resolve_module(&ast);

    assert_no_errors(&index);
    let resolved = expect_resolved(&index, use_site);
    let symbol = index.symbol(resolved).unwrap();
    assert_eq!(symbol.kind, SymbolKind::Local);
    assert_eq!(symbol.decl, item);
}
