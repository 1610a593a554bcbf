//! Public syntax tree API built on immutable, parent-linked nodes.

use std::fmt;
use std::hash::{Hash, Hasher};

use text_size::{TextRange, TextSize};

use crate::nodes::{Child, NodeId, TokenId, idx, idx_u32};
use crate::{SyntaxKind, SyntaxTree, TriviaPiece, TriviaPieceKind};

impl SyntaxTree {
    /// Returns the root syntax node.
    #[inline]
    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode { tree: self, id: self.root_id() }
    }

    /// Returns the full source text for this tree.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Iterates over every token of the tree in source order.
    pub fn tokens(&self) -> impl DoubleEndedIterator<Item = SyntaxToken<'_>> + '_ {
        self.tokens.iter().map(move |(id, _)| SyntaxToken { tree: self, id })
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("text_len", &self.text().len())
            .field("nodes", &self.nodes.len())
            .field("tokens", &self.tokens.len())
            .finish_non_exhaustive()
    }
}

/// Token handle tied to the lifetime of the tree.
#[derive(Clone, Copy)]
pub struct SyntaxToken<'a> {
    tree: &'a SyntaxTree,
    id: TokenId,
}

impl<'a> SyntaxToken<'a> {
    /// Returns this token's kind.
    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.tree.token(self.id).kind
    }

    /// Returns `true` for zero-width tokens synthesized by error recovery.
    #[inline]
    pub fn is_missing(self) -> bool {
        self.kind() == SyntaxKind::MISSING
    }

    /// Returns the token text range including leading trivia.
    #[inline]
    pub fn text_range(self) -> TextRange {
        self.tree.token(self.id).full_range()
    }

    /// Returns the token length including leading trivia.
    #[inline]
    pub fn text_len(self) -> TextSize {
        self.text_range().len()
    }

    /// Returns the token text range excluding trivia.
    #[inline]
    pub fn trimmed_range(self) -> TextRange {
        self.tree.token(self.id).trimmed_range()
    }

    /// Returns the token text including trivia.
    #[inline]
    pub fn text(self) -> &'a str {
        &self.tree.text[self.text_range()]
    }

    /// Returns the token text excluding trivia.
    #[inline]
    pub fn text_trimmed(self) -> &'a str {
        &self.tree.text[self.trimmed_range()]
    }

    /// Returns the previous token in source order, if any.
    #[inline]
    pub fn prev_token(self) -> Option<Self> {
        let raw = idx_u32(self.id).checked_sub(1)?;
        Some(Self { tree: self.tree, id: idx(raw) })
    }

    /// Returns the next token in source order, if any.
    #[inline]
    pub fn next_token(self) -> Option<Self> {
        let raw = idx_u32(self.id) + 1;
        if raw as usize >= self.tree.tokens.len() {
            return None;
        }
        Some(Self { tree: self.tree, id: idx(raw) })
    }

    /// Iterates over the leading trivia folded into this token.
    #[inline]
    pub fn leading_trivia(self) -> TriviaIter<'a> {
        let token = self.tree.token(self.id);
        TriviaIter {
            text: &self.tree.text,
            pieces: self.tree.trivia[token.trivia.clone()].iter(),
            offset: token.full_start,
        }
    }

    /// Returns the parent node.
    #[inline]
    pub fn parent(self) -> SyntaxNode<'a> {
        SyntaxNode { tree: self.tree, id: self.tree.token(self.id).parent }
    }

    /// Returns an iterator of parent nodes, starting from the immediate parent.
    #[inline]
    pub fn parent_ancestors(self) -> impl Iterator<Item = SyntaxNode<'a>> + Clone {
        self.parent().ancestors()
    }
}

impl PartialEq for SyntaxToken<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for SyntaxToken<'_> {}

impl Hash for SyntaxToken<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?} {:?}", self.kind(), self.trimmed_range(), self.text_trimmed())
    }
}

impl fmt::Display for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// One piece of trivia with its position in the source.
#[derive(Clone, Copy, Debug)]
pub struct SyntaxTrivia<'a> {
    piece: TriviaPiece,
    offset: TextSize,
    text: &'a str,
}

impl<'a> SyntaxTrivia<'a> {
    #[inline]
    pub fn kind(self) -> TriviaPieceKind {
        self.piece.kind
    }

    #[inline]
    pub fn text_range(self) -> TextRange {
        TextRange::at(self.offset, self.piece.len)
    }

    #[inline]
    pub fn text(self) -> &'a str {
        &self.text[self.text_range()]
    }
}

/// Iterator over the trivia of a single token.
#[derive(Clone)]
pub struct TriviaIter<'a> {
    text: &'a str,
    pieces: std::slice::Iter<'a, TriviaPiece>,
    offset: TextSize,
}

impl<'a> Iterator for TriviaIter<'a> {
    type Item = SyntaxTrivia<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let piece = *self.pieces.next()?;
        let trivia = SyntaxTrivia { piece, offset: self.offset, text: self.text };
        self.offset += piece.len;
        Some(trivia)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pieces.size_hint()
    }
}

impl ExactSizeIterator for TriviaIter<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.pieces.len()
    }
}

/// Node handle tied to the lifetime of the tree.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'a> {
    tree: &'a SyntaxTree,
    id: NodeId,
}

impl<'a> SyntaxNode<'a> {
    /// Returns this node's kind.
    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.tree.node(self.id).kind
    }

    /// Returns the tree this node belongs to.
    #[inline]
    pub fn tree(self) -> &'a SyntaxTree {
        self.tree
    }

    /// Returns the first token spanned by this node.
    #[inline]
    pub fn first_token(self) -> SyntaxToken<'a> {
        SyntaxToken { tree: self.tree, id: self.tree.first_token(self.id) }
    }

    /// Returns the last token spanned by this node.
    #[inline]
    pub fn last_token(self) -> SyntaxToken<'a> {
        SyntaxToken { tree: self.tree, id: self.tree.last_token(self.id) }
    }

    /// Returns the text range covered by this node, leading trivia included.
    #[inline]
    pub fn text_range(self) -> TextRange {
        self.tree.node_range(self.id)
    }

    /// Returns the length of this node.
    ///
    /// Equal to the sum of the lengths of its children, since the children
    /// tile the node's tokens exactly.
    #[inline]
    pub fn text_len(self) -> TextSize {
        self.text_range().len()
    }

    /// Returns the range with leading trivia trimmed away.
    #[inline]
    pub fn trimmed_range(self) -> TextRange {
        let range = self.text_range();
        let start = self
            .tree
            .node_tokens(self.id)
            .find(|token| !token.is_missing())
            .map_or(range.end(), |token| token.trimmed_range().start());
        TextRange::new(start.min(range.end()), range.end())
    }

    /// Returns the text slice covered by this node.
    #[inline]
    pub fn text(self) -> &'a str {
        &self.tree.text[self.text_range()]
    }

    /// Returns the text slice excluding leading trivia.
    #[inline]
    pub fn text_trimmed(self) -> &'a str {
        &self.tree.text[self.trimmed_range()]
    }

    /// Returns the parent node if any; `None` only for the root.
    #[inline]
    pub fn parent(self) -> Option<Self> {
        Some(Self { tree: self.tree, id: self.tree.node(self.id).parent? })
    }

    #[inline]
    pub fn is_root(self) -> bool {
        self.id == self.tree.root_id()
    }

    /// Returns an iterator of ancestors starting from this node.
    #[inline]
    pub fn ancestors(self) -> impl Iterator<Item = SyntaxNode<'a>> + Clone {
        std::iter::successors(Some(self), |it| it.parent())
    }

    /// Iterates direct children, nodes and tokens, in order.
    #[inline]
    pub fn children_with_tokens(self) -> ChildrenWithTokens<'a> {
        ChildrenWithTokens { tree: self.tree, children: self.tree.node_children(self.id).iter() }
    }

    /// Iterates direct child nodes, skipping tokens.
    #[inline]
    pub fn children(self) -> impl DoubleEndedIterator<Item = SyntaxNode<'a>> + Clone {
        self.children_with_tokens().filter_map(SyntaxElement::into_node)
    }

    /// Iterates all descendants, nodes and tokens, in pre-order.
    ///
    /// A node is yielded before its children and children are visited left to
    /// right. `self` is not included.
    #[inline]
    pub fn descendants_with_tokens(self) -> impl Iterator<Item = SyntaxElement<'a>> {
        self.preorder_with_tokens().filter_map(move |event| match event {
            WalkEventWithTokens::EnterNode(node) if node != self => Some(NodeOrToken::Node(node)),
            WalkEventWithTokens::Token(token) => Some(NodeOrToken::Token(token)),
            WalkEventWithTokens::EnterNode(_) | WalkEventWithTokens::LeaveNode(_) => None,
        })
    }

    /// Iterates this node and all descendant nodes in pre-order.
    #[inline]
    pub fn descendants(self) -> impl Iterator<Item = SyntaxNode<'a>> {
        self.preorder().filter_map(|event| match event {
            WalkEvent::Enter(node) => Some(node),
            WalkEvent::Leave(_) => None,
        })
    }

    /// Returns the token at the given offset, if any.
    ///
    /// Offsets are matched against the full token range, so an offset inside
    /// leading trivia resolves to the token the trivia belongs to.
    pub fn token_at_offset(self, offset: TextSize) -> TokenAtOffset<SyntaxToken<'a>> {
        let range = self.text_range();
        if !range.contains_inclusive(offset) {
            return TokenAtOffset::None;
        }
        let tokens = &self.tree.tokens[self.tree.node(self.id).tokens.clone()];
        let index = tokens.partition_point(|token| token.end <= offset);
        if index >= tokens.len() {
            return TokenAtOffset::None;
        }
        let first = idx_u32(self.tree.first_token(self.id));
        let right = SyntaxToken { tree: self.tree, id: idx(first + index as u32) };
        match right.prev_token() {
            Some(left) if index > 0 && left.text_range().end() == offset && !left.is_missing() => {
                TokenAtOffset::Between(left, right)
            }
            _ => TokenAtOffset::Single(right),
        }
    }

    /// Returns the smallest element that fully covers `range`.
    pub fn covering_element(self, range: TextRange) -> Option<SyntaxElement<'a>> {
        let token = self.token_at_offset(range.start()).right_biased()?;
        if token.text_range().contains_range(range) {
            return Some(NodeOrToken::Token(token));
        }
        token
            .parent_ancestors()
            .find(|ancestor| ancestor.text_range().contains_range(range))
            .map(NodeOrToken::Node)
    }

    /// Returns a preorder iterator over nodes.
    #[inline]
    pub fn preorder(self) -> Preorder<'a> {
        Preorder { inner: PreorderWithTokens::new(self) }
    }

    /// Returns a preorder iterator over nodes and tokens.
    #[inline]
    pub fn preorder_with_tokens(self) -> PreorderWithTokens<'a> {
        PreorderWithTokens::new(self)
    }
}

impl SyntaxTree {
    fn node_tokens(&self, node: NodeId) -> impl Iterator<Item = SyntaxToken<'_>> + '_ {
        self.nodes[node].tokens.clone().map(move |id| SyntaxToken { tree: self, id })
    }
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for SyntaxNode<'_> {}

impl Hash for SyntaxNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.kind(), self.text_range())
    }
}

impl fmt::Display for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Node or token element inside the tree.
pub type SyntaxElement<'a> = NodeOrToken<SyntaxNode<'a>, SyntaxToken<'a>>;

impl<'a> SyntaxElement<'a> {
    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    #[inline]
    pub fn text_range(&self) -> TextRange {
        match self {
            NodeOrToken::Node(node) => node.text_range(),
            NodeOrToken::Token(token) => token.text_range(),
        }
    }

    #[inline]
    pub fn text_len(&self) -> TextSize {
        self.text_range().len()
    }

    /// Returns the parent node; `None` only for the root node.
    #[inline]
    pub fn parent(&self) -> Option<SyntaxNode<'a>> {
        match self {
            NodeOrToken::Node(node) => node.parent(),
            NodeOrToken::Token(token) => Some(token.parent()),
        }
    }
}

/// Iterator over direct children including tokens.
#[derive(Clone)]
pub struct ChildrenWithTokens<'a> {
    tree: &'a SyntaxTree,
    children: std::slice::Iter<'a, Child>,
}

impl<'a> ChildrenWithTokens<'a> {
    #[inline]
    fn map_child(&self, child: Option<&'a Child>) -> Option<SyntaxElement<'a>> {
        let tree = self.tree;
        child.map(|child| match *child {
            NodeOrToken::Node(id) => NodeOrToken::Node(SyntaxNode { tree, id }),
            NodeOrToken::Token(id) => NodeOrToken::Token(SyntaxToken { tree, id }),
        })
    }
}

impl<'a> Iterator for ChildrenWithTokens<'a> {
    type Item = SyntaxElement<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let child = self.children.next();
        self.map_child(child)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.children.size_hint()
    }
}

impl DoubleEndedIterator for ChildrenWithTokens<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let child = self.children.next_back();
        self.map_child(child)
    }
}

impl ExactSizeIterator for ChildrenWithTokens<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.children.len()
    }
}

/// Preorder traversal over nodes.
#[derive(Clone)]
pub struct Preorder<'a> {
    inner: PreorderWithTokens<'a>,
}

impl Preorder<'_> {
    /// Skips the current subtree during traversal.
    #[inline]
    pub fn skip_subtree(&mut self) {
        self.inner.skip_subtree();
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = WalkEvent<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|item| match item {
            WalkEventWithTokens::EnterNode(it) => Some(WalkEvent::Enter(it)),
            WalkEventWithTokens::LeaveNode(it) => Some(WalkEvent::Leave(it)),
            WalkEventWithTokens::Token(_) => None,
        })
    }
}

/// Preorder walk event for nodes.
#[derive(Clone, Copy, Debug)]
pub enum WalkEvent<'a> {
    Enter(SyntaxNode<'a>),
    Leave(SyntaxNode<'a>),
}

/// Preorder traversal over nodes and tokens.
///
/// Uses an explicit stack, so walking very deep trees does not recurse.
#[derive(Clone)]
pub struct PreorderWithTokens<'a> {
    stack: Vec<(SyntaxNode<'a>, ChildrenWithTokens<'a>)>,
    root: Option<SyntaxNode<'a>>,
}

impl<'a> PreorderWithTokens<'a> {
    #[inline]
    fn new(start: SyntaxNode<'a>) -> Self {
        Self { stack: Vec::with_capacity(128), root: Some(start) }
    }

    /// Skips the current subtree during traversal.
    #[inline]
    pub fn skip_subtree(&mut self) {
        assert!(self.stack.pop().is_some(), "must have a subtree to skip");
    }
}

impl<'a> Iterator for PreorderWithTokens<'a> {
    type Item = WalkEventWithTokens<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let Some((_, active_node)) = self.stack.last_mut() else {
            let root = self.root.take()?;
            self.stack.push((root, root.children_with_tokens()));
            return Some(WalkEventWithTokens::EnterNode(root));
        };
        match active_node.next() {
            Some(NodeOrToken::Node(child)) => {
                self.stack.push((child, child.children_with_tokens()));
                Some(WalkEventWithTokens::EnterNode(child))
            }
            Some(NodeOrToken::Token(child)) => Some(WalkEventWithTokens::Token(child)),
            None => {
                let (exited_node, _) = self.stack.pop()?;
                Some(WalkEventWithTokens::LeaveNode(exited_node))
            }
        }
    }
}

/// Preorder walk event including tokens.
#[derive(Clone, Copy, Debug)]
pub enum WalkEventWithTokens<'a> {
    EnterNode(SyntaxNode<'a>),
    LeaveNode(SyntaxNode<'a>),
    Token(SyntaxToken<'a>),
}

/// Node-or-token wrapper used throughout the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeOrToken<N, T> {
    Node(N),
    Token(T),
}

impl<N, T> NodeOrToken<N, T> {
    /// Converts into the node variant, if any.
    pub fn into_node(self) -> Option<N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    /// Converts into the token variant, if any.
    pub fn into_token(self) -> Option<T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }

    /// Returns a shared reference to the node, if any.
    pub fn as_node(&self) -> Option<&N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    /// Returns a shared reference to the token, if any.
    pub fn as_token(&self) -> Option<&T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }
}

impl<N: fmt::Display, T: fmt::Display> fmt::Display for NodeOrToken<N, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeOrToken::Node(node) => fmt::Display::fmt(node, f),
            NodeOrToken::Token(token) => fmt::Display::fmt(token, f),
        }
    }
}

/// There might be zero, one or two tokens at a given offset.
#[derive(Clone, Debug)]
pub enum TokenAtOffset<T> {
    /// No tokens at offset.
    None,
    /// Only a single token at offset.
    Single(T),
    /// Offset is exactly between two tokens.
    Between(T, T),
}

impl<T> TokenAtOffset<T> {
    /// Maps tokens to a different type.
    pub fn map<F: Fn(T) -> U, U>(self, f: F) -> TokenAtOffset<U> {
        match self {
            TokenAtOffset::None => TokenAtOffset::None,
            TokenAtOffset::Single(it) => TokenAtOffset::Single(f(it)),
            TokenAtOffset::Between(l, r) => TokenAtOffset::Between(f(l), f(r)),
        }
    }

    /// Convert to option, preferring the right token in case of a tie.
    pub fn right_biased(self) -> Option<T> {
        match self {
            Self::None => None,
            Self::Single(node) => Some(node),
            Self::Between(_, right) => Some(right),
        }
    }

    /// Convert to option, preferring the left token in case of a tie.
    pub fn left_biased(self) -> Option<T> {
        match self {
            Self::None => None,
            Self::Single(node) => Some(node),
            Self::Between(left, _) => Some(left),
        }
    }
}
