//! Incremental builder for the immutable syntax tree.

use la_arena::{Arena, IdxRange};
use text_size::TextSize;

use crate::nodes::{Child, Node, NodeId, Token, TokenId, idx, idx_u32};
use crate::{NodeOrToken, SyntaxKind, SyntaxTree, TriviaPiece};

struct OpenedNode {
    node: NodeId,
    children: Vec<Child>,
    first_token: Option<TokenId>,
}

/// Builds a `SyntaxTree` from parser events.
///
/// Nodes are opened and closed in a strictly nested fashion and tokens are
/// appended in source order. The builder checks the structural invariants of
/// the tree as it goes: every node gets at least one child, every child gets
/// exactly one parent, and the tokens tile the text without gaps.
pub struct Builder {
    text: Box<str>,
    nodes: Arena<Node>,
    tokens: Arena<Token>,
    trivia: Arena<TriviaPiece>,
    children: Vec<Child>,

    children_pool: Vec<Vec<Child>>,
    opened: Vec<OpenedNode>,
    text_len: TextSize,
}

impl Drop for Builder {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.opened.is_empty() {
            panic!("you should call `Builder::finish()`");
        }
    }
}

const DEFAULT_TREE_DEPTH: usize = 128;
const DEFAULT_TREE_SIZE: usize = 1024;
const DEFAULT_CHILDREN_LEN: usize = 10;

impl Builder {
    /// Creates a new builder for `text`.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.into(),
            nodes: Arena::new(),
            tokens: Arena::new(),
            trivia: Arena::new(),
            children: Vec::with_capacity(DEFAULT_TREE_SIZE),

            children_pool: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            opened: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            text_len: TextSize::new(0),
        }
    }

    /// Retrieves a recycled children buffer or allocates a new one.
    fn new_children_vec(&mut self) -> Vec<Child> {
        self.children_pool.pop().unwrap_or_else(|| Vec::with_capacity(DEFAULT_CHILDREN_LEN))
    }

    /// Returns a children buffer to the pool.
    fn recycle_children_vec(&mut self, vec: Vec<Child>) {
        self.children_pool.push(vec);
    }

    /// Returns the most recently opened node.
    #[track_caller]
    fn last_opened(&mut self) -> &mut OpenedNode {
        self.opened.last_mut().expect("no opened nodes?")
    }

    /// Starts a new node of the given kind.
    ///
    /// The first node started becomes the root; starting a second top-level
    /// node is a bug in the caller.
    #[track_caller]
    pub fn start_node(&mut self, kind: SyntaxKind) {
        assert!(kind.is_node(), "{kind:?} is not a node kind");
        let parent = self.opened.last().map(|opened| opened.node);
        assert!(parent.is_some() || self.nodes.is_empty(), "the tree already has a root");

        // Placeholder ranges, fixed up in `finish_node`.
        let node = self.nodes.alloc(Node {
            kind,
            parent,
            children: 0..0,
            tokens: IdxRange::new(idx(0)..idx(0)),
        });
        if let Some(parent) = self.opened.last_mut() {
            parent.children.push(NodeOrToken::Node(node));
        }

        let children = self.new_children_vec();
        self.opened.push(OpenedNode { node, children, first_token: None });
    }

    /// Finishes the most recently started node.
    #[track_caller]
    pub fn finish_node(&mut self) {
        let OpenedNode { node, mut children, first_token } =
            self.opened.pop().expect("no opened nodes?");
        let kind = self.nodes[node].kind;
        assert!(!children.is_empty(), "{kind:?} node must have at least one child");
        let first_token = first_token.expect("a node with children spans a token");

        let start = u32::try_from(self.children.len()).unwrap();
        self.children.append(&mut children);
        let end = u32::try_from(self.children.len()).unwrap();
        self.recycle_children_vec(children);

        let tokens_end = idx(u32::try_from(self.tokens.len()).unwrap());
        let node = &mut self.nodes[node];
        node.children = start..end;
        node.tokens = IdxRange::new(first_token..tokens_end);
    }

    /// Adds a token preceded by its leading trivia.
    ///
    /// `text_len` excludes the trivia; the token's full length is the sum of
    /// both.
    #[track_caller]
    pub fn token(
        &mut self,
        leading_trivia: impl IntoIterator<Item = TriviaPiece>,
        kind: SyntaxKind,
        text_len: TextSize,
    ) {
        assert!(kind.is_token() && !kind.is_trivia(), "{kind:?} is not a token kind");
        let parent = self.last_opened().node;

        let full_start = self.text_len;
        let trivia_start = idx(u32::try_from(self.trivia.len()).unwrap());
        let mut leading_len = TextSize::new(0);
        for piece in leading_trivia {
            leading_len += piece.len;
            self.trivia.alloc(piece);
        }
        let trivia_end = idx(u32::try_from(self.trivia.len()).unwrap());

        let end = full_start + leading_len + text_len;
        assert!(
            usize::from(end) <= self.text.len() && self.text.is_char_boundary(usize::from(end)),
            "token {kind:?} ends at {end:?}, outside of the text or inside a character",
        );
        self.text_len = end;

        let token = self.tokens.alloc(Token {
            kind,
            parent,
            full_start,
            leading_len,
            end,
            trivia: IdxRange::new(trivia_start..trivia_end),
        });

        // Ancestors of a node that already has a first token have one too.
        for opened in self.opened.iter_mut().rev() {
            if opened.first_token.is_some() {
                break;
            }
            opened.first_token = Some(token);
        }
        self.last_opened().children.push(NodeOrToken::Token(token));
    }

    /// Adds a zero-width `MISSING` token at the current position.
    pub fn missing(&mut self) {
        self.token([], SyntaxKind::MISSING, TextSize::new(0));
    }

    /// Finishes building and returns the immutable `SyntaxTree`.
    #[track_caller]
    pub fn finish(mut self) -> SyntaxTree {
        assert!(self.opened.is_empty(), "unfinished nodes remain");
        assert!(!self.nodes.is_empty(), "the tree needs a root node");
        assert_eq!(
            usize::from(self.text_len),
            self.text.len(),
            "the tokens must cover the whole text"
        );
        debug_assert_eq!(idx_u32(self.nodes.iter().next().unwrap().0), 0);

        SyntaxTree {
            text: std::mem::take(&mut self.text),
            nodes: std::mem::take(&mut self.nodes),
            tokens: std::mem::take(&mut self.tokens),
            trivia: std::mem::take(&mut self.trivia),
            children: std::mem::take(&mut self.children).into_boxed_slice(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TriviaPieceKind;

    fn whitespace(len: u32) -> TriviaPiece {
        TriviaPiece::new(TriviaPieceKind::Whitespace, len.into())
    }

    #[test]
    fn builds_nested_nodes() {
        let text = "a + b";
        let mut builder = Builder::new(text);
        builder.start_node(SyntaxKind::SOURCE_FILE);
        builder.start_node(SyntaxKind::BINARY_EXPR);
        builder.token([], SyntaxKind::NAME, 1.into());
        builder.token([whitespace(1)], SyntaxKind::PLUS, 1.into());
        builder.token([whitespace(1)], SyntaxKind::NAME, 1.into());
        builder.finish_node();
        builder.token([], SyntaxKind::EOF, 0.into());
        builder.finish_node();
        let tree = builder.finish();

        let root = tree.root();
        assert_eq!(root.kind(), SyntaxKind::SOURCE_FILE);
        assert_eq!(root.text_len(), TextSize::new(5));
        assert_eq!(root.children_with_tokens().count(), 2);

        let expr = root.children().next().unwrap();
        assert_eq!(expr.kind(), SyntaxKind::BINARY_EXPR);
        assert_eq!(expr.parent(), Some(root));
        assert_eq!(expr.text(), "a + b");

        let plus = expr.children_with_tokens().nth(1).unwrap().into_token().unwrap();
        assert_eq!(plus.text(), " +");
        assert_eq!(plus.text_trimmed(), "+");
        assert_eq!(plus.leading_trivia().len(), 1);
    }

    #[test]
    fn missing_token_is_zero_width() {
        let mut builder = Builder::new("");
        builder.start_node(SyntaxKind::SOURCE_FILE);
        builder.start_node(SyntaxKind::EXPR_STMT);
        builder.missing();
        builder.finish_node();
        builder.token([], SyntaxKind::EOF, 0.into());
        builder.finish_node();
        let tree = builder.finish();

        let stmt = tree.root().children().next().unwrap();
        assert_eq!(stmt.text_len(), TextSize::new(0));
        assert_eq!(stmt.first_token().kind(), SyntaxKind::MISSING);
    }

    #[test]
    #[should_panic(expected = "must have at least one child")]
    fn rejects_empty_nodes() {
        let mut builder = Builder::new("");
        builder.start_node(SyntaxKind::SOURCE_FILE);
        builder.start_node(SyntaxKind::EXPR_STMT);
        builder.finish_node();
    }

    #[test]
    #[should_panic(expected = "cover the whole text")]
    fn rejects_partial_coverage() {
        let mut builder = Builder::new("abc");
        builder.start_node(SyntaxKind::SOURCE_FILE);
        builder.token([], SyntaxKind::NAME, 2.into());
        builder.finish_node();
        builder.finish();
    }
}
