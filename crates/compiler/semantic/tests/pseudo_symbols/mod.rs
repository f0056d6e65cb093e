//! Context rules for `self`, `here`, `visitor`, and `root`.

use trellis_compiler_ast::{ArchitypeKind, SpecialVar};
use trellis_compiler_diagnostics::DiagnosticCode;
use trellis_compiler_semantic::{resolve_module, ResolutionResult};

use crate::common::*;

#[test]
fn self_trailer_marks_member_pending() {
    // node A { has x; can act { self.x; } }
    let mut t = TestTree::new();
    let has_x = t.has_var("x", None);
    let self_ref = t.special(SpecialVar::SelfRef);
    let (chain, segments) = t.trailer(self_ref, &["x"]);
    let stmt = t.expr_stmt(chain);
    let act = t.ability("act", vec![], vec![stmt]);
    let a = t.architype("A", ArchitypeKind::Node, vec![has_x, act]);
    let ast = t.module(vec![a]);

    let index = resolve_module(&ast);

    assert_no_errors(&index);
    let resolved = expect_resolved(&index, self_ref);
    assert_eq!(resolved, module_symbol(&index, "A"));
    assert_eq!(
        index.resolve(segments[0]),
        Some(ResolutionResult::PendingMember)
    );
}

#[test]
fn self_outside_ability_is_invalid() {
    // node A { has snapshot = self; } - has-var initializers are not
    // ability bodies
    let mut t = TestTree::new();
    let self_ref = t.special(SpecialVar::SelfRef);
    let snapshot = t.has_var("snapshot", Some(self_ref));
    let a = t.architype("A", ArchitypeKind::Node, vec![snapshot]);
    let ast = t.module(vec![a]);

    let index = resolve_module(&ast);

    assert_eq!(diagnostic_codes(&index), vec![DiagnosticCode::InvalidContext]);
    assert_eq!(index.resolve(self_ref), Some(ResolutionResult::Unresolved));
}

#[test]
fn here_valid_in_node_and_edge_abilities() {
    for kind in [ArchitypeKind::Node, ArchitypeKind::Edge] {
        let mut t = TestTree::new();
        let here = t.special(SpecialVar::Here);
        let stmt = t.expr_stmt(here);
        let act = t.ability("act", vec![], vec![stmt]);
        let a = t.architype("A", kind, vec![act]);
        let ast = t.module(vec![a]);

        let index = resolve_module(&ast);

        assert_no_errors(&index);
        let resolved = expect_resolved(&index, here);
        assert_eq!(resolved, module_symbol(&index, "A"));
    }
}

#[test]
fn here_invalid_in_walker_ability() {
    let mut t = TestTree::new();
    let here = t.special(SpecialVar::Here);
    let stmt = t.expr_stmt(here);
    let act = t.ability("act", vec![], vec![stmt]);
    let w = t.architype("W", ArchitypeKind::Walker, vec![act]);
    let ast = t.module(vec![w]);

    let index = resolve_module(&ast);

    assert_eq!(diagnostic_codes(&index), vec![DiagnosticCode::InvalidContext]);
    assert_eq!(index.resolve(here), Some(ResolutionResult::Unresolved));
}

#[test]
fn visitor_valid_only_in_walker_ability() {
    let mut t = TestTree::new();
    let visitor = t.special(SpecialVar::Visitor);
    let stmt = t.expr_stmt(visitor);
    let act = t.ability("act", vec![], vec![stmt]);
    let w = t.architype("W", ArchitypeKind::Walker, vec![act]);
    let ast = t.module(vec![w]);

    let index = resolve_module(&ast);
    assert_no_errors(&index);
    assert_eq!(expect_resolved(&index, visitor), module_symbol(&index, "W"));

    let mut t = TestTree::new();
    let visitor = t.special(SpecialVar::Visitor);
    let stmt = t.expr_stmt(visitor);
    let act = t.ability("act", vec![], vec![stmt]);
    let n = t.architype("N", ArchitypeKind::Node, vec![act]);
    let ast = t.module(vec![n]);

    let index = resolve_module(&ast);
    assert_eq!(diagnostic_codes(&index), vec![DiagnosticCode::InvalidContext]);
}

#[test]
fn root_valid_everywhere() {
    // At module level, far from any architype
    let mut t = TestTree::new();
    let root_ref = t.special(SpecialVar::Root);
    let stmt = t.expr_stmt(root_ref);
    let ast = t.module(vec![stmt]);

    let index = resolve_module(&ast);

    assert_no_errors(&index);
    let resolved = expect_resolved(&index, root_ref);
    let symbol = index.symbol(resolved).unwrap();
    assert_eq!(symbol.name, "root");
    assert!(symbol
        .flags
        .contains(trellis_compiler_semantic::SymbolFlags::BUILTIN));
}

#[test]
fn root_resolution_survives_user_shadowing() {
    // An architype named `root` shadows the builtin for lexical lookup,
    // but the special-var path keeps resolving to the builtin
    let mut t = TestTree::new();
    let user_root = t.architype("root", ArchitypeKind::Object, vec![]);
    let root_ref = t.special(SpecialVar::Root);
    let stmt = t.expr_stmt(root_ref);
    let ast = t.module(vec![user_root, stmt]);

    let index = resolve_module(&ast);

    let resolved = expect_resolved(&index, root_ref);
    let symbol = index.symbol(resolved).unwrap();
    assert!(symbol
        .flags
        .contains(trellis_compiler_semantic::SymbolFlags::BUILTIN));
    assert_ne!(symbol.decl, user_root);
}

#[test]
fn pseudo_symbols_are_not_lexically_bound() {
    // A bare name `visitor` is an ordinary identifier, not the
    // pseudo-symbol: with no binding it is simply unresolved
    let mut t = TestTree::new();
    let (stmt, use_site) = t.use_stmt("visitor");
    let ast = t.module(vec![stmt]);

    let index = resolve_module(&ast);

    assert_eq!(index.resolve(use_site), Some(ResolutionResult::Unresolved));
    assert_eq!(diagnostic_codes(&index), vec![DiagnosticCode::UnresolvedName]);
}
