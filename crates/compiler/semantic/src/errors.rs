//! Construct-context validity checks used by the resolution pass.
//!
//! These checks are stateless: each returns the diagnostic to report, if
//! any, and the caller decides where to collect it.

use chumsky::span::SimpleSpan;
use trellis_compiler_ast::{ArchitypeKind, Ast, NodeId, NodeKind, SpecialVar};
use trellis_compiler_diagnostics::Diagnostic;

/// The construct context a pseudo-symbol is judged against: the innermost
/// enclosing architype (if any) and whether the reference sits inside an
/// ability body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialVarContext {
    pub architype: Option<ArchitypeKind>,
    pub in_ability: bool,
}

#[derive(Default)]
pub struct ContextChecker {}

impl ContextChecker {
    /// Validate a pseudo-symbol against its construct context.
    ///
    /// `self` requires any ability body, `here` a node/edge architype's
    /// ability, `visitor` a walker's ability. `root` is always valid.
    pub fn check_special_var(
        &self,
        var: SpecialVar,
        ctx: SpecialVarContext,
        span: SimpleSpan<usize>,
    ) -> Option<Diagnostic> {
        let valid = match var {
            SpecialVar::Root => true,
            SpecialVar::SelfRef => ctx.in_ability && ctx.architype.is_some(),
            SpecialVar::Here => {
                ctx.in_ability
                    && matches!(
                        ctx.architype,
                        Some(ArchitypeKind::Node | ArchitypeKind::Edge)
                    )
            }
            SpecialVar::Visitor => {
                ctx.in_ability && matches!(ctx.architype, Some(ArchitypeKind::Walker))
            }
        };

        if valid {
            return None;
        }

        let requirement = match var {
            SpecialVar::SelfRef => "an ability body",
            SpecialVar::Here => "a node or edge architype's ability",
            SpecialVar::Visitor => "a walker architype's ability",
            SpecialVar::Root => unreachable!("root is valid in every context"),
        };
        Some(Diagnostic::invalid_context(
            format!("'{var}' is only valid inside {requirement}"),
            span,
        ))
    }

    /// Validate a delete statement's target: names and attribute chains
    /// are deletable, literals are not.
    pub fn check_delete_target(&self, ast: &Ast, target: NodeId) -> Option<Diagnostic> {
        match ast.kind(target) {
            NodeKind::IntLit(_)
            | NodeKind::FloatLit(_)
            | NodeKind::StringLit(_)
            | NodeKind::BoolLit(_)
            | NodeKind::Token(_)
            | NodeKind::BuiltinType(_) => Some(Diagnostic::invalid_delete_target(
                ast.kind(target).kind_name(),
                ast.span(target),
            )),
            _ => None,
        }
    }
}
