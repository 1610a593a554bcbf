//! Lossless, immutable syntax tree with parent links and attached trivia.
//!
//! The tree is built once through [`Builder`] and then navigated by cheap,
//! copyable handles. Nodes and tokens live in per-tree arenas and refer to
//! each other by index, so the parent relation never owns anything.

mod builder;
mod nodes;
mod syntax;
mod syntax_kind;
mod syntax_set;
mod trivia;

/// Incremental builder for constructing a `SyntaxTree`.
pub use builder::Builder;
pub use nodes::SyntaxTree;
/// Primary syntax tree API types and adapters.
pub use syntax::{
    ChildrenWithTokens, NodeOrToken, Preorder, PreorderWithTokens, SyntaxElement, SyntaxNode,
    SyntaxToken, SyntaxTrivia, TokenAtOffset, TriviaIter, WalkEvent, WalkEventWithTokens,
};
/// Token and node kinds used throughout the tree.
pub use syntax_kind::SyntaxKind;
/// Compact set for grouping `SyntaxKind` values.
pub use syntax_set::SyntaxSet;
/// Trivia pieces attached to tokens.
pub use trivia::{TriviaPiece, TriviaPieceKind};
