use drop_bomb::DropBomb;
use text_size::{TextRange, TextSize};
use tolerant_errors::Diagnostic;
use tolerant_lexer::{LexConfig, Lexer, Token};
use tolerant_syntax::{Builder, SyntaxKind, SyntaxSet, SyntaxTree};
use tracing::{debug, trace};

pub(crate) struct Parser<'t> {
    text: &'t str,
    lexer: Lexer<'t>,
    events: Vec<Event>,
    diagnostics: Vec<Diagnostic>,
    /// End of the last consumed token; missing tokens are placed here.
    last_end: TextSize,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(text: &'t str, config: LexConfig) -> Self {
        Self {
            text,
            lexer: Lexer::with_config(text, config),
            events: Vec::new(),
            diagnostics: Vec::new(),
            last_end: TextSize::new(0),
        }
    }

    pub(crate) fn peek_kind(&self) -> SyntaxKind {
        self.lexer.peek().kind
    }

    /// Kind of the `n`-th upcoming token, not counting unrecognized input.
    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        let kind = self.peek_kind();
        if n == 0 && kind != SyntaxKind::SKIPPED {
            return kind;
        }

        let mut lookahead = self.lexer.clone();
        let mut seen = 0;
        loop {
            let kind = lookahead.peek().kind;
            if kind == SyntaxKind::EOF {
                return kind;
            }
            if kind != SyntaxKind::SKIPPED {
                if seen == n {
                    return kind;
                }
                seen += 1;
            }
            lookahead.next_token();
        }
    }

    /// Text of the current token, for contextual keywords such as `from`.
    pub(crate) fn peek_text(&self) -> &'t str {
        &self.text[self.lexer.peek().range]
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn at_set(&self, set: &SyntaxSet) -> bool {
        set.contains(self.peek_kind())
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token. The end of file is only consumed by
    /// [`Parser::bump_eof`].
    pub(crate) fn advance(&mut self) {
        if self.at(SyntaxKind::EOF) {
            return;
        }

        self.push_token();
        self.skip_unrecognized();
    }

    pub(crate) fn bump_eof(&mut self) {
        debug_assert!(self.at(SyntaxKind::EOF));
        self.push_token();
    }

    fn push_token(&mut self) {
        let token = self.lexer.next_token();
        trace!(kind = ?token.kind, range = ?token.range, "advance");

        if let Some(error) = &token.error {
            self.diagnostics.push(error.clone());
        }
        self.last_end = token.range.end();
        self.events.push(Event::Token(token));
    }

    /// Wraps unrecognized input following the last token in an error node, so
    /// grammar rules never see it.
    fn skip_unrecognized(&mut self) {
        if !self.at(SyntaxKind::SKIPPED) {
            return;
        }

        self.events.push(Event::Start { kind: SyntaxKind::ERROR, forward_parent: None });
        while self.at(SyntaxKind::SKIPPED) {
            self.push_token();
        }
        self.events.push(Event::Finish);
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }

        self.missing(kind);
        false
    }

    /// Inserts a zero-width `MISSING` token in place of `kind`.
    pub(crate) fn missing(&mut self, kind: SyntaxKind) {
        self.missing_with(format!("expected {}", kind.display_name()));
    }

    pub(crate) fn missing_with(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(offset = ?self.last_end, found = ?self.peek_kind(), "{message}");

        self.diagnostics.push(Diagnostic::error(message, TextRange::empty(self.last_end)));
        self.events.push(Event::Missing);
    }

    /// Reports an error at the current token without consuming anything.
    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let range = self.lexer.peek().range;
        self.diagnostics.push(Diagnostic::error(message, range));
    }

    /// Wraps the current token, and every following token up to one in
    /// `recovery`, in an `ERROR` node.
    pub(crate) fn error_recover(&mut self, message: impl Into<String>, recovery: &SyntaxSet) {
        debug_assert!(!self.at(SyntaxKind::EOF), "error recovery must consume input");

        let message = message.into();
        debug!(found = ?self.peek_kind(), "{message}");

        let m = self.start();
        self.error(message);
        self.advance();
        while !self.at(SyntaxKind::EOF) && !self.at_set(recovery) {
            self.advance();
        }
        m.complete(self, SyntaxKind::ERROR);
    }

    /// Reports the current token as unexpected and wraps it in an `ERROR` node.
    pub(crate) fn error_and_bump(&mut self, message: impl Into<String>) {
        debug_assert!(!self.at(SyntaxKind::EOF), "error recovery must consume input");

        let m = self.start();
        self.error(message);
        self.advance();
        m.complete(self, SyntaxKind::ERROR);
    }

    pub(crate) fn unexpected_message(&self) -> String {
        format!("unexpected {}", self.peek_kind().display_name())
    }

    pub(crate) fn start(&mut self) -> Marker {
        let pos = self.events.len() as u32;
        self.events.push(Event::TOMBSTONE);
        Marker::new(pos)
    }

    pub(crate) fn build_tree(self) -> (SyntaxTree, Vec<Diagnostic>) {
        let Parser { text, mut events, diagnostics, .. } = self;
        let mut builder = Builder::new(text);
        let mut forward_parents = Vec::new();

        for i in 0..events.len() {
            match std::mem::replace(&mut events[i], Event::TOMBSTONE) {
                Event::Start { kind, forward_parent } => {
                    if kind == SyntaxKind::TOMBSTONE {
                        continue;
                    }

                    forward_parents.push(kind);
                    let mut idx = i;
                    let mut fp = forward_parent;
                    while let Some(fwd) = fp {
                        idx += fwd as usize;

                        fp = match std::mem::replace(&mut events[idx], Event::TOMBSTONE) {
                            Event::Start { kind, forward_parent } => {
                                if kind != SyntaxKind::TOMBSTONE {
                                    forward_parents.push(kind);
                                }
                                forward_parent
                            }
                            _ => unreachable!(),
                        };
                    }

                    for kind in forward_parents.drain(..).rev() {
                        builder.start_node(kind);
                    }
                }
                Event::Finish => {
                    builder.finish_node();
                }
                Event::Token(Token { leading, kind, range, .. }) => {
                    builder.token(leading, kind, range.len());
                }
                Event::Missing => {
                    builder.missing();
                }
            }
        }

        (builder.finish(), diagnostics)
    }
}

enum Event {
    Start { kind: SyntaxKind, forward_parent: Option<u32> },
    Token(Token),
    Missing,
    Finish,
}

impl Event {
    const TOMBSTONE: Self = Self::Start { kind: SyntaxKind::TOMBSTONE, forward_parent: None };
}

pub(crate) struct Marker {
    position: u32,
    bomb: DropBomb,
}

impl Marker {
    fn new(pos: u32) -> Self {
        Self { position: pos, bomb: DropBomb::new("Marker must be either completed or abandoned") }
    }

    pub(crate) fn complete(mut self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        self.bomb.defuse();

        match &mut p.events[self.position as usize] {
            Event::Start { kind: slot, .. } => {
                *slot = kind;
            }
            _ => unreachable!(),
        }

        p.events.push(Event::Finish);
        CompletedMarker::new(self.position)
    }

    /// Drops the node; anything parsed after [`Parser::start`] is attached to
    /// the enclosing node instead.
    pub(crate) fn abandon(mut self, p: &mut Parser<'_>) {
        self.bomb.defuse();

        if self.position as usize == p.events.len() - 1 {
            match p.events.pop() {
                Some(Event::Start { kind: SyntaxKind::TOMBSTONE, forward_parent: None }) => {}
                _ => unreachable!(),
            }
        }
    }
}

pub(crate) struct CompletedMarker {
    pos: u32,
}

impl CompletedMarker {
    fn new(pos: u32) -> Self {
        Self { pos }
    }

    pub(crate) fn precede(self, p: &mut Parser<'_>) -> Marker {
        let new_pos = p.start();

        match &mut p.events[self.pos as usize] {
            Event::Start { forward_parent, .. } => {
                *forward_parent = Some(new_pos.position - self.pos);
            }
            _ => unreachable!(),
        }

        new_pos
    }
}
