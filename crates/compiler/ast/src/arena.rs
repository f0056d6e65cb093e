//! Arena storage for AST nodes.
//!
//! The arena owns every node of one module; nodes refer to children and
//! parents through [`NodeId`] indices. Parent links are computed once by
//! [`AstBuilder::finish`] and never change afterwards.

use chumsky::span::SimpleSpan;
use index_vec::IndexVec;
use smallvec::SmallVec;
use thiserror::Error;

use crate::node::NodeKind;

index_vec::define_index_type! {
    /// A unique ID for a node within one module's arena.
    pub struct NodeId = usize;

    MAX_INDEX = usize::MAX;
}

impl NodeId {
    pub const fn as_usize(self) -> usize {
        self.raw()
    }
}

/// One node: its kind payload, source span, and non-owning parent link.
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    pub kind: NodeKind,
    pub span: SimpleSpan<usize>,
    /// `None` only for the root.
    pub parent: Option<NodeId>,
}

/// Errors detected while finishing a tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AstError {
    /// A node was claimed as a child by two different parents. The tree
    /// must be a tree, not a DAG.
    #[error("node {node:?} has multiple parents ({first:?} and {second:?})")]
    MultipleParents {
        node: NodeId,
        first: NodeId,
        second: NodeId,
    },
}

/// An immutable, fully parent-linked syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    nodes: IndexVec<NodeId, AstNode>,
    root: NodeId,
}

impl Ast {
    pub fn node(&self, id: NodeId) -> &AstNode {
        &self.nodes[id]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id].kind
    }

    pub fn span(&self, id: NodeId) -> SimpleSpan<usize> {
        self.nodes[id].span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub const fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child ids of `id` in source order.
    pub fn children(&self, id: NodeId) -> SmallVec<[NodeId; 8]> {
        self.nodes[id].kind.children()
    }

    /// Walks parent links from `id` towards the root, excluding `id`
    /// itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }
}

/// Builder used by the parser (and by tests) to allocate nodes bottom-up.
///
/// Children are allocated before their parent; `finish` walks the tree
/// from the root and fills in every parent back-reference.
#[derive(Debug, Default)]
pub struct AstBuilder {
    nodes: IndexVec<NodeId, AstNode>,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node and return its id. The parent link is left empty
    /// until `finish`.
    pub fn alloc(&mut self, kind: NodeKind, span: SimpleSpan<usize>) -> NodeId {
        self.nodes.push(AstNode {
            kind,
            span,
            parent: None,
        })
    }

    /// Seal the tree rooted at `root`: compute parent links for every
    /// node reachable from it.
    ///
    /// Nodes not reachable from `root` are kept in the arena (the parser
    /// may allocate and discard during error recovery) but keep
    /// `parent == None` and are never visited by traversals.
    pub fn finish(mut self, root: NodeId) -> Result<Ast, AstError> {
        let mut stack: Vec<NodeId> = vec![root];
        while let Some(id) = stack.pop() {
            for child in self.nodes[id].kind.children() {
                if let Some(first) = self.nodes[child].parent {
                    return Err(AstError::MultipleParents {
                        node: child,
                        first,
                        second: id,
                    });
                }
                self.nodes[child].parent = Some(id);
                stack.push(child);
            }
        }
        Ok(Ast {
            nodes: self.nodes,
            root,
        })
    }
}
