//! Node storage.

use std::ops::Range;

use la_arena::{Idx, IdxRange};

use crate::nodes::{Token, TokenId};
use crate::{NodeOrToken, SyntaxKind};

pub(crate) type NodeId = Idx<Node>;

/// A child slot in the flat children table.
pub(crate) type Child = NodeOrToken<NodeId, TokenId>;

/// Raw node stored in the tree arena.
///
/// Nodes never store their length. It is read off the first and last token of
/// `tokens`, which are contiguous in source order.
pub(crate) struct Node {
    pub(crate) kind: SyntaxKind,
    pub(crate) parent: Option<NodeId>,
    /// Range into `SyntaxTree::children`.
    pub(crate) children: Range<u32>,
    /// Every token spanned by this node, including those of nested nodes.
    /// Never empty.
    pub(crate) tokens: IdxRange<Token>,
}
