//! Token storage.

use la_arena::{Idx, IdxRange};
use text_size::{TextRange, TextSize};

use crate::nodes::NodeId;
use crate::{SyntaxKind, TriviaPiece};

pub(crate) type TokenId = Idx<Token>;

/// Raw token stored in the tree arena.
///
/// `full_start..end` covers the leading trivia and the token text. Tokens
/// are allocated in source order and each one starts where the previous one
/// ended.
pub(crate) struct Token {
    pub(crate) kind: SyntaxKind,
    pub(crate) parent: NodeId,
    pub(crate) full_start: TextSize,
    pub(crate) leading_len: TextSize,
    pub(crate) end: TextSize,
    pub(crate) trivia: IdxRange<TriviaPiece>,
}

impl Token {
    #[inline]
    pub(crate) fn full_range(&self) -> TextRange {
        TextRange::new(self.full_start, self.end)
    }

    #[inline]
    pub(crate) fn trimmed_range(&self) -> TextRange {
        TextRange::new(self.full_start + self.leading_len, self.end)
    }
}
