use la_arena::{Arena, Idx, RawIdx};
use text_size::TextRange;

use crate::TriviaPiece;
use crate::nodes::{Child, Node, NodeId, Token, TokenId};

/// Owned syntax tree for a single source text.
///
/// All nodes, tokens and trivia pieces live in per-tree arenas and refer to
/// each other by index. Parent links are plain indices, so ownership stays
/// strictly hierarchical and dropping the tree drops everything at once.
pub struct SyntaxTree {
    pub(crate) text: Box<str>,
    /// The root is always the first node.
    pub(crate) nodes: Arena<Node>,
    pub(crate) tokens: Arena<Token>,
    pub(crate) trivia: Arena<TriviaPiece>,
    pub(crate) children: Box<[Child]>,
}

impl SyntaxTree {
    #[inline]
    pub(crate) fn root_id(&self) -> NodeId {
        idx(0)
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    #[inline]
    pub(crate) fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id]
    }

    #[inline]
    pub(crate) fn node_children(&self, id: NodeId) -> &[Child] {
        let range = &self.nodes[id].children;
        &self.children[range.start as usize..range.end as usize]
    }

    #[inline]
    pub(crate) fn first_token(&self, id: NodeId) -> TokenId {
        self.nodes[id].tokens.start()
    }

    #[inline]
    pub(crate) fn last_token(&self, id: NodeId) -> TokenId {
        idx(idx_u32(self.nodes[id].tokens.end()) - 1)
    }

    #[inline]
    pub(crate) fn node_range(&self, id: NodeId) -> TextRange {
        let first = &self.tokens[self.first_token(id)];
        let last = &self.tokens[self.last_token(id)];
        TextRange::new(first.full_start, last.end)
    }
}

#[inline]
pub(crate) fn idx<T>(raw: u32) -> Idx<T> {
    Idx::from_raw(RawIdx::from(raw))
}

#[inline]
pub(crate) fn idx_u32<T>(idx: Idx<T>) -> u32 {
    u32::from(idx.into_raw())
}
