//! Trivia pieces attached to tokens.

use text_size::TextSize;

use crate::SyntaxKind;

/// Kinds of trivia stored alongside tokens.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TriviaPieceKind {
    Whitespace,
    Newline,
    SingleLineComment,
    MultiLineComment,
    DocComment,
}

impl TriviaPieceKind {
    /// The token kind a piece of this kind reports when walked as a token.
    pub fn syntax_kind(self) -> SyntaxKind {
        match self {
            Self::Whitespace => SyntaxKind::WHITESPACE,
            Self::Newline => SyntaxKind::NEWLINE,
            Self::SingleLineComment => SyntaxKind::LINE_COMMENT,
            Self::MultiLineComment => SyntaxKind::BLOCK_COMMENT,
            Self::DocComment => SyntaxKind::DOC_COMMENT,
        }
    }

    pub fn is_comment(self) -> bool {
        !matches!(self, Self::Whitespace | Self::Newline)
    }
}

/// A trivia fragment with its kind and length.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TriviaPiece {
    pub kind: TriviaPieceKind,
    pub len: TextSize,
}

impl TriviaPiece {
    /// Creates a new trivia piece with the given kind and length.
    pub fn new(kind: TriviaPieceKind, len: TextSize) -> Self {
        Self { kind, len }
    }
}
