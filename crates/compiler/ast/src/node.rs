//! Node kinds of the Trellis AST.
//!
//! [`NodeKind`] is a single exhaustive tagged union over every construct
//! the language has. Passes dispatch on it with exhaustive matches, so
//! adding a kind is a deliberate breaking change: the compiler will point
//! at every dispatcher that needs a new case.

use std::fmt;

use chumsky::span::SimpleSpan;
use smallvec::SmallVec;

use crate::arena::NodeId;

/// The four architype kinds of the language.
///
/// Nodes and edges are the graph's structural entities, walkers are
/// mobile computations that traverse it, and objects are plain data
/// architypes with no graph identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchitypeKind {
    Node,
    Edge,
    Walker,
    Object,
}

impl fmt::Display for ArchitypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => write!(f, "node"),
            Self::Edge => write!(f, "edge"),
            Self::Walker => write!(f, "walker"),
            Self::Object => write!(f, "object"),
        }
    }
}

/// Context-bound pseudo-symbols.
///
/// These resolve by construct context rather than lexical lookup: `self`
/// inside any ability, `here` inside node/edge abilities, `visitor`
/// inside walker abilities, and `root` anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialVar {
    SelfRef,
    Here,
    Visitor,
    Root,
}

impl fmt::Display for SpecialVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfRef => write!(f, "self"),
            Self::Here => write!(f, "here"),
            Self::Visitor => write!(f, "visitor"),
            Self::Root => write!(f, "root"),
        }
    }
}

/// Built-in type tokens as they appear in annotations (e.g. `has name: str`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinTy {
    Int,
    Float,
    Str,
    Bool,
    List,
    Dict,
}

impl fmt::Display for BuiltinTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Str => write!(f, "str"),
            Self::Bool => write!(f, "bool"),
            Self::List => write!(f, "list"),
            Self::Dict => write!(f, "dict"),
        }
    }
}

/// Direction of an edge reference operator (`-->`, `<--`, `<-->`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeDir {
    In,
    Out,
    Any,
}

/// A module, the root of every tree. Top-level items are architype and
/// enum declarations plus ordinary statements.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleNode {
    pub name: String,
    pub items: Vec<NodeId>,
}

/// An architype declaration (e.g. `node person { has name: str; }`).
#[derive(Debug, Clone, PartialEq)]
pub struct ArchitypeNode {
    pub name: String,
    pub name_span: SimpleSpan<usize>,
    pub kind: ArchitypeKind,
    /// Body items: `HasVar` and `Ability` declarations.
    pub body: Vec<NodeId>,
}

/// An enum declaration. Items are `Name` nodes; enumerators do not
/// reference each other.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumNode {
    pub name: String,
    pub name_span: SimpleSpan<usize>,
    pub items: Vec<NodeId>,
}

/// An ability: a behavior block attached to an architype
/// (e.g. `can greet(other: person) { ... }`).
#[derive(Debug, Clone, PartialEq)]
pub struct AbilityNode {
    pub name: String,
    pub name_span: SimpleSpan<usize>,
    /// `ParamVar` declarations.
    pub params: Vec<NodeId>,
    pub body: Vec<NodeId>,
}

/// A formal parameter of an ability.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamVarNode {
    pub name: String,
    pub name_span: SimpleSpan<usize>,
    pub type_ann: Option<NodeId>,
    pub default: Option<NodeId>,
}

/// An instance field of an architype (`has score: int = 0;`).
#[derive(Debug, Clone, PartialEq)]
pub struct HasVarNode {
    pub name: String,
    pub name_span: SimpleSpan<usize>,
    pub type_ann: Option<NodeId>,
    pub value: Option<NodeId>,
}

/// An assignment statement/expression. The target is a fresh local
/// definition when it is a name with no visible binding, otherwise a
/// mutation of the existing binding.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentNode {
    pub target: NodeId,
    pub value: NodeId,
}

/// An attribute access chain (`base.x.y`). Trailer segments are `Name`
/// nodes; their meaning depends on the base's type and is deferred to a
/// type-aware pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomTrailerNode {
    pub base: NodeId,
    pub segments: Vec<NodeId>,
}

/// A call expression (`callee(arg, ...)`).
#[derive(Debug, Clone, PartialEq)]
pub struct FuncCallNode {
    pub callee: NodeId,
    pub args: Vec<NodeId>,
}

/// An index or slice expression (`base[start:stop]`).
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSliceNode {
    pub base: NodeId,
    pub start: Option<NodeId>,
    pub stop: Option<NodeId>,
}

/// A comprehension (`[body for vars in iter if cond]`). Loop variables
/// are `Name` nodes bound only inside the comprehension.
#[derive(Debug, Clone, PartialEq)]
pub struct InnerComprNode {
    pub body: NodeId,
    pub vars: Vec<NodeId>,
    pub iter: NodeId,
    pub cond: Option<NodeId>,
}

/// A filter comprehension (`base(?predicate)`), optionally naming an
/// explicit loop variable for the predicate to range over.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterComprNode {
    pub base: NodeId,
    pub var: Option<NodeId>,
    pub predicate: NodeId,
}

/// `expr as name`: evaluates the expression and binds the alias in the
/// enclosing construct.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprAsItemNode {
    pub expr: NodeId,
    pub alias: String,
    pub alias_span: SimpleSpan<usize>,
}

/// A reference to an architype by name, resolved against module scope.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchRefNode {
    pub name: String,
}

/// A qualified architype reference (`outer.inner`), resolved segment by
/// segment. Segments are `ArchRef` nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchRefChainNode {
    pub segments: Vec<NodeId>,
}

/// An edge reference operator, optionally filtered by an edge architype
/// (`-->`, `<-[follows]-`).
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeOpRefNode {
    pub dir: EdgeDir,
    /// `ArchRef` or `ArchRefChain` naming an edge architype.
    pub filter: Option<NodeId>,
}

/// The connect operator (`left +[edge]+> right`), creating a graph edge.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectOpNode {
    pub left: NodeId,
    pub right: NodeId,
    /// `ArchRef` or `ArchRefChain` naming the edge architype to create.
    pub edge: Option<NodeId>,
}

/// The disconnect operator, removing edges between two node expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct DisconnectOpNode {
    pub left: NodeId,
    pub right: NodeId,
    pub edge: Option<NodeId>,
}

/// A `for vars in iter { ... }` statement. Loop variables are `Name`
/// nodes scoped to the body.
#[derive(Debug, Clone, PartialEq)]
pub struct InForStmtNode {
    pub vars: Vec<NodeId>,
    pub iter: NodeId,
    pub body: Vec<NodeId>,
}

/// A `del target;` statement. The target must be a name or attribute
/// chain.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStmtNode {
    pub target: NodeId,
}

/// An expression used in statement position.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmtNode {
    pub expr: NodeId,
}

/// A raw token leaf carried through from the parser (operators,
/// punctuation kept for tooling).
#[derive(Debug, Clone, PartialEq)]
pub struct TokenNode {
    pub text: String,
}

/// An identifier in use position, the principal use site of def-use
/// resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct NameNode {
    pub ident: String,
}

/// The exhaustive union of node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Module(ModuleNode),
    Architype(ArchitypeNode),
    Enum(EnumNode),
    Ability(AbilityNode),
    ParamVar(ParamVarNode),
    HasVar(HasVarNode),
    Assignment(AssignmentNode),
    AtomTrailer(AtomTrailerNode),
    FuncCall(FuncCallNode),
    IndexSlice(IndexSliceNode),
    InnerCompr(InnerComprNode),
    FilterCompr(FilterComprNode),
    SpecialVarRef(SpecialVar),
    ExprAsItem(ExprAsItemNode),
    ArchRef(ArchRefNode),
    ArchRefChain(ArchRefChainNode),
    EdgeOpRef(EdgeOpRefNode),
    ConnectOp(ConnectOpNode),
    DisconnectOp(DisconnectOpNode),
    InForStmt(InForStmtNode),
    DeleteStmt(DeleteStmtNode),
    ExprStmt(ExprStmtNode),
    IntLit(i64),
    FloatLit(f64),
    StringLit(String),
    BoolLit(bool),
    BuiltinType(BuiltinTy),
    Token(TokenNode),
    Name(NameNode),
}

impl NodeKind {
    /// Child node ids in source order.
    ///
    /// This is the structural notion of "children" used for parent-link
    /// computation and generic traversal. Binding-aware passes usually
    /// override traversal order per kind instead of relying on this.
    pub fn children(&self) -> SmallVec<[NodeId; 8]> {
        let mut out = SmallVec::new();
        match self {
            Self::Module(n) => out.extend(n.items.iter().copied()),
            Self::Architype(n) => out.extend(n.body.iter().copied()),
            Self::Enum(n) => out.extend(n.items.iter().copied()),
            Self::Ability(n) => {
                out.extend(n.params.iter().copied());
                out.extend(n.body.iter().copied());
            }
            Self::ParamVar(n) => {
                out.extend(n.type_ann);
                out.extend(n.default);
            }
            Self::HasVar(n) => {
                out.extend(n.type_ann);
                out.extend(n.value);
            }
            Self::Assignment(n) => {
                out.push(n.target);
                out.push(n.value);
            }
            Self::AtomTrailer(n) => {
                out.push(n.base);
                out.extend(n.segments.iter().copied());
            }
            Self::FuncCall(n) => {
                out.push(n.callee);
                out.extend(n.args.iter().copied());
            }
            Self::IndexSlice(n) => {
                out.push(n.base);
                out.extend(n.start);
                out.extend(n.stop);
            }
            Self::InnerCompr(n) => {
                out.push(n.body);
                out.extend(n.vars.iter().copied());
                out.push(n.iter);
                out.extend(n.cond);
            }
            Self::FilterCompr(n) => {
                out.push(n.base);
                out.extend(n.var);
                out.push(n.predicate);
            }
            Self::ExprAsItem(n) => out.push(n.expr),
            Self::ArchRefChain(n) => out.extend(n.segments.iter().copied()),
            Self::EdgeOpRef(n) => out.extend(n.filter),
            Self::ConnectOp(n) => {
                out.push(n.left);
                out.extend(n.edge);
                out.push(n.right);
            }
            Self::DisconnectOp(n) => {
                out.push(n.left);
                out.extend(n.edge);
                out.push(n.right);
            }
            Self::InForStmt(n) => {
                out.extend(n.vars.iter().copied());
                out.push(n.iter);
                out.extend(n.body.iter().copied());
            }
            Self::DeleteStmt(n) => out.push(n.target),
            Self::ExprStmt(n) => out.push(n.expr),
            Self::SpecialVarRef(_)
            | Self::ArchRef(_)
            | Self::IntLit(_)
            | Self::FloatLit(_)
            | Self::StringLit(_)
            | Self::BoolLit(_)
            | Self::BuiltinType(_)
            | Self::Token(_)
            | Self::Name(_) => {}
        }
        out
    }

    /// Short kind name for diagnostics and debug output.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Module(_) => "module",
            Self::Architype(_) => "architype",
            Self::Enum(_) => "enum",
            Self::Ability(_) => "ability",
            Self::ParamVar(_) => "parameter",
            Self::HasVar(_) => "has-var",
            Self::Assignment(_) => "assignment",
            Self::AtomTrailer(_) => "atom trailer",
            Self::FuncCall(_) => "call",
            Self::IndexSlice(_) => "index",
            Self::InnerCompr(_) => "comprehension",
            Self::FilterCompr(_) => "filter comprehension",
            Self::SpecialVarRef(_) => "special var",
            Self::ExprAsItem(_) => "as-item",
            Self::ArchRef(_) => "architype ref",
            Self::ArchRefChain(_) => "architype ref chain",
            Self::EdgeOpRef(_) => "edge op",
            Self::ConnectOp(_) => "connect",
            Self::DisconnectOp(_) => "disconnect",
            Self::InForStmt(_) => "for",
            Self::DeleteStmt(_) => "delete",
            Self::ExprStmt(_) => "expression statement",
            Self::IntLit(_) => "int literal",
            Self::FloatLit(_) => "float literal",
            Self::StringLit(_) => "string literal",
            Self::BoolLit(_) => "bool literal",
            Self::BuiltinType(_) => "builtin type",
            Self::Token(_) => "token",
            Self::Name(_) => "name",
        }
    }
}
