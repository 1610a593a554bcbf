//! Mode-aware lexer for PHP source files.
//!
//! A file starts in [`LexMode::InlineHtml`]: everything up to an open tag is
//! a single `INLINE_HTML` token. Open tags switch to [`LexMode::Code`] and a
//! close tag switches back. The complete lexer state is a [`LexState`], so
//! lexing can be restarted from any token boundary.
//!
//! The lexer never fails. Input it cannot classify becomes a `SKIPPED` token
//! and problems are reported through [`Token::error`].

mod cursor;

use cursor::{Cursor, EOF_CHAR};
use text_size::{TextRange, TextSize};
use tolerant_errors::Diagnostic;
pub use tolerant_syntax::SyntaxKind;
use tolerant_syntax::SyntaxKind::*;
use tolerant_syntax::{TriviaPiece, TriviaPieceKind};

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum LexMode {
    #[default]
    InlineHtml,
    Code,
}

/// Everything needed to resume lexing: the offset of the next token
/// (including its leading trivia) and the current mode.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct LexState {
    pub offset: TextSize,
    pub mode: LexMode,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LexConfig {
    /// Whether a bare `<?` opens a code region.
    pub short_open_tag: bool,
}

impl Default for LexConfig {
    fn default() -> Self {
        Self { short_open_tag: true }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Token {
    pub leading: Vec<TriviaPiece>,
    pub kind: SyntaxKind,
    /// Range of the token text, excluding leading trivia.
    pub range: TextRange,
    pub error: Option<Diagnostic>,
}

impl Token {
    pub fn leading_len(&self) -> TextSize {
        self.leading.iter().map(|piece| piece.len).sum()
    }

    pub fn full_range(&self) -> TextRange {
        TextRange::new(self.range.start() - self.leading_len(), self.range.end())
    }
}

#[derive(Clone)]
pub struct Lexer<'t> {
    cursor: Cursor<'t>,
    mode: LexMode,
    config: LexConfig,
    current: Token,
    current_state: LexState,
    token_error: Option<&'static str>,
}

impl<'t> Lexer<'t> {
    pub fn new(text: &'t str) -> Self {
        Self::with_config(text, LexConfig::default())
    }

    pub fn with_config(text: &'t str, config: LexConfig) -> Self {
        Self::with_state(text, config, LexState::default())
    }

    /// Starts lexing at `state`, typically one obtained from
    /// [`Lexer::checkpoint`].
    pub fn with_state(text: &'t str, config: LexConfig, state: LexState) -> Self {
        let mut lexer = Self {
            cursor: Cursor::new(text, state.offset),
            mode: state.mode,
            config,
            current: Token {
                leading: Vec::new(),
                kind: EOF,
                range: TextRange::empty(state.offset),
                error: None,
            },
            current_state: state,
            token_error: None,
        };
        lexer.current = lexer.lex_token();
        lexer
    }

    /// The token that the next call to [`Lexer::next_token`] returns.
    pub fn peek(&self) -> &Token {
        &self.current
    }

    /// Kind of the `n`-th upcoming token; `nth(0)` is the current one.
    pub fn nth(&self, n: usize) -> SyntaxKind {
        if n == 0 {
            return self.current.kind;
        }
        let mut lookahead = self.clone();
        for _ in 0..n {
            lookahead.next_token();
        }
        lookahead.current.kind
    }

    /// The state the current token was lexed from.
    pub fn checkpoint(&self) -> LexState {
        self.current_state
    }

    pub fn restore(&mut self, state: LexState) {
        self.cursor.reset(state.offset);
        self.mode = state.mode;
        self.current_state = state;
        self.current = self.lex_token();
    }

    pub fn next_token(&mut self) -> Token {
        self.current_state = LexState { offset: self.cursor.offset(), mode: self.mode };
        let next = self.lex_token();
        std::mem::replace(&mut self.current, next)
    }

    fn lex_token(&mut self) -> Token {
        self.cursor.reset_pos_within_token();
        let mut leading = Vec::new();
        let mut error = None;
        if self.mode == LexMode::Code {
            self.trivia(&mut leading, &mut error);
        }

        let kind = match self.mode {
            LexMode::InlineHtml => self.inline_html(),
            LexMode::Code => self.code(),
        };
        let range = TextRange::new(self.cursor.token_start(), self.cursor.offset());
        if let Some(message) = self.token_error.take() {
            error.get_or_insert_with(|| Diagnostic::error(message, range));
        }

        Token { leading, kind, range, error }
    }

    fn trivia(&mut self, leading: &mut Vec<TriviaPiece>, error: &mut Option<Diagnostic>) {
        loop {
            self.cursor.reset_pos_within_token();
            if self.cursor.is_eof() {
                break;
            }

            let kind = match self.cursor.peek() {
                ' ' | '\t' => {
                    self.cursor.advance_while(|c| matches!(c, ' ' | '\t'));
                    TriviaPieceKind::Whitespace
                }
                '\n' => {
                    self.cursor.advance();
                    TriviaPieceKind::Newline
                }
                '\r' => {
                    self.cursor.advance();
                    self.cursor.eat('\n');
                    TriviaPieceKind::Newline
                }
                '#' => {
                    self.line_comment();
                    TriviaPieceKind::SingleLineComment
                }
                '/' if self.cursor.second() == '/' => {
                    self.line_comment();
                    TriviaPieceKind::SingleLineComment
                }
                '/' if self.cursor.second() == '*' => self.block_comment(error),
                _ => break,
            };

            leading.push(TriviaPiece::new(kind, self.cursor.pos_within_token()));
        }
    }

    /// Line comments end at a line break or right before a close tag.
    fn line_comment(&mut self) {
        while !self.cursor.is_eof() {
            match self.cursor.peek() {
                '\n' | '\r' => break,
                '?' if self.cursor.second() == '>' => break,
                _ => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn block_comment(&mut self, error: &mut Option<Diagnostic>) -> TriviaPieceKind {
        let rest = self.cursor.rest();
        let is_doc = rest.starts_with("/**")
            && rest.as_bytes().get(3).is_some_and(|byte| byte.is_ascii_whitespace());

        match rest[2..].find("*/") {
            Some(end) => self.cursor.bump(2 + end + 2),
            None => {
                self.cursor.bump_to_end();
                let range = TextRange::new(self.cursor.token_start(), self.cursor.offset());
                error.get_or_insert_with(|| Diagnostic::warning("unterminated comment", range));
            }
        }

        if is_doc { TriviaPieceKind::DocComment } else { TriviaPieceKind::MultiLineComment }
    }

    fn inline_html(&mut self) -> SyntaxKind {
        if self.cursor.is_eof() {
            return EOF;
        }

        let rest = self.cursor.rest();
        if let Some((kind, len)) = open_tag(rest, self.config) {
            self.cursor.bump(len);
            self.mode = LexMode::Code;
            return kind;
        }

        let mut end = rest.len();
        let mut search = 0;
        while let Some(pos) = rest[search..].find("<?") {
            let at = search + pos;
            if open_tag(&rest[at..], self.config).is_some() {
                end = at;
                break;
            }
            search = at + 2;
        }
        self.cursor.bump(end);
        INLINE_HTML
    }

    fn code(&mut self) -> SyntaxKind {
        if self.cursor.is_eof() {
            return EOF;
        }
        if let Some(kind) = self.heredoc() {
            return kind;
        }

        match self.cursor.advance() {
            '(' if self.cast() => CAST,
            '(' => LEFT_PAREN,
            ')' => RIGHT_PAREN,
            '[' => LEFT_BRACKET,
            ']' => RIGHT_BRACKET,
            '{' => LEFT_BRACE,
            '}' => RIGHT_BRACE,
            ';' => SEMICOLON,
            ',' => COMMA,
            '~' => TILDE,
            '@' => AT,
            '\\' => BACKSLASH,
            ':' => {
                if self.cursor.eat(':') {
                    COLON_COLON
                } else {
                    COLON
                }
            }
            '?' => self.question(),
            '$' if is_name_start(self.cursor.peek()) => {
                self.cursor.advance_while(is_name_continue);
                VARIABLE
            }
            '$' => DOLLAR,
            quote @ ('\'' | '"' | '`') => self.string(quote),
            first_char @ '0'..='9' => self.number(first_char),
            '.' if self.cursor.peek().is_ascii_digit() => {
                self.digits(|c| c.is_ascii_digit());
                self.float_exponent();
                FLOAT_NUMBER
            }
            first_char if is_name_start(first_char) => {
                self.cursor.advance_while(is_name_continue);
                SyntaxKind::from_keyword(self.cursor.token_text()).unwrap_or(NAME)
            }
            first_char if is_unrecognized(first_char) => {
                self.cursor.advance_while(is_unrecognized);
                self.token_error = Some("unrecognized input");
                SKIPPED
            }
            first_char => self.operator(first_char),
        }
    }

    fn question(&mut self) -> SyntaxKind {
        match self.cursor.peek() {
            '>' => {
                self.cursor.advance();
                if !self.cursor.eat_str("\r\n") {
                    self.cursor.eat('\n');
                }
                self.mode = LexMode::InlineHtml;
                CLOSE_TAG
            }
            '-' if self.cursor.second() == '>' => {
                self.cursor.bump(2);
                QUESTION_ARROW
            }
            '?' => {
                self.cursor.advance();
                if self.cursor.eat('=') { QUESTION_QUESTION_EQ } else { QUESTION_QUESTION }
            }
            _ => QUESTION,
        }
    }

    fn operator(&mut self, first_char: char) -> SyntaxKind {
        let cursor = &mut self.cursor;
        match first_char {
            '=' => {
                if cursor.eat_str("==") {
                    EQ_EQ_EQ
                } else if cursor.eat('=') {
                    EQ_EQ
                } else if cursor.eat('>') {
                    FAT_ARROW
                } else {
                    EQ
                }
            }
            '!' => {
                if cursor.eat_str("==") {
                    BANG_EQ_EQ
                } else if cursor.eat('=') {
                    BANG_EQ
                } else {
                    BANG
                }
            }
            '<' => {
                if cursor.eat_str("=>") {
                    SPACESHIP
                } else if cursor.eat_str("<=") {
                    SHL_EQ
                } else if cursor.eat('<') {
                    SHL
                } else if cursor.eat('=') {
                    LT_EQ
                } else if cursor.eat('>') {
                    BANG_EQ
                } else {
                    LT
                }
            }
            '>' => {
                if cursor.eat_str(">=") {
                    SHR_EQ
                } else if cursor.eat('>') {
                    SHR
                } else if cursor.eat('=') {
                    GT_EQ
                } else {
                    GT
                }
            }
            '+' => {
                if cursor.eat('+') {
                    PLUS_PLUS
                } else if cursor.eat('=') {
                    PLUS_EQ
                } else {
                    PLUS
                }
            }
            '-' => {
                if cursor.eat('>') {
                    ARROW
                } else if cursor.eat('-') {
                    MINUS_MINUS
                } else if cursor.eat('=') {
                    MINUS_EQ
                } else {
                    MINUS
                }
            }
            '*' => {
                if cursor.eat_str("*=") {
                    STAR_STAR_EQ
                } else if cursor.eat('*') {
                    STAR_STAR
                } else if cursor.eat('=') {
                    STAR_EQ
                } else {
                    STAR
                }
            }
            '/' => {
                if cursor.eat('=') {
                    SLASH_EQ
                } else {
                    SLASH
                }
            }
            '%' => {
                if cursor.eat('=') {
                    PERCENT_EQ
                } else {
                    PERCENT
                }
            }
            '.' => {
                if cursor.eat_str("..") {
                    ELLIPSIS
                } else if cursor.eat('=') {
                    DOT_EQ
                } else {
                    DOT
                }
            }
            '&' => {
                if cursor.eat('&') {
                    AMP_AMP
                } else if cursor.eat('=') {
                    AMP_EQ
                } else {
                    AMP
                }
            }
            '|' => {
                if cursor.eat('|') {
                    PIPE_PIPE
                } else if cursor.eat('=') {
                    PIPE_EQ
                } else {
                    PIPE
                }
            }
            '^' => {
                if cursor.eat('=') {
                    CARET_EQ
                } else {
                    CARET
                }
            }
            _ => {
                self.token_error = Some("unrecognized input");
                SKIPPED
            }
        }
    }

    /// Called after `(`; consumes the rest of a cast such as `( int )`.
    fn cast(&mut self) -> bool {
        const CAST_TYPES: [&str; 12] = [
            "int", "integer", "bool", "boolean", "float", "double", "real", "string", "array",
            "object", "unset", "binary",
        ];

        let rest = self.cursor.rest();
        let inner = rest.trim_start_matches([' ', '\t']);
        let len = name_len(inner);
        let ty = &inner[..len];
        if !CAST_TYPES.iter().any(|cast| cast.eq_ignore_ascii_case(ty)) {
            return false;
        }

        let Some(after) = inner[len..].trim_start_matches([' ', '\t']).strip_prefix(')') else {
            return false;
        };
        self.cursor.bump(rest.len() - after.len());
        true
    }

    /// Single, double quoted and backtick strings, lexed as one token.
    fn string(&mut self, quote: char) -> SyntaxKind {
        loop {
            if self.cursor.is_eof() {
                self.token_error = Some("unterminated string literal");
                return STRING;
            }
            match self.cursor.advance() {
                '\\' => {
                    self.cursor.advance();
                }
                c if c == quote => return STRING,
                _ => {}
            }
        }
    }

    /// Heredoc and nowdoc strings, up to and including the closing label.
    fn heredoc(&mut self) -> Option<SyntaxKind> {
        let rest = self.cursor.rest();
        let header = rest.strip_prefix("<<<")?.trim_start_matches([' ', '\t']);

        let (label, after_label) = match header.chars().next()? {
            quote @ ('"' | '\'') => {
                let inner = &header[1..];
                let len = name_len(inner);
                let after = inner[len..].strip_prefix(quote)?;
                (&inner[..len], after)
            }
            _ => {
                let len = name_len(header);
                (&header[..len], &header[len..])
            }
        };
        if label.is_empty() {
            return None;
        }
        let body = after_label.strip_prefix("\r\n").or_else(|| after_label.strip_prefix('\n'))?;
        let body_start = rest.len() - body.len();

        let mut line_start = 0;
        loop {
            let line = &body[line_start..];
            let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
            let candidate = &line[indent..];
            if candidate.starts_with(label) && !candidate[label.len()..].starts_with(is_name_continue)
            {
                self.cursor.bump(body_start + line_start + indent + label.len());
                return Some(STRING);
            }

            match line.find('\n') {
                Some(newline) => line_start += newline + 1,
                None => {
                    self.cursor.bump_to_end();
                    self.token_error = Some("unterminated heredoc");
                    return Some(STRING);
                }
            }
        }
    }

    fn number(&mut self, first_char: char) -> SyntaxKind {
        if first_char == '0' {
            let second = self.cursor.second();
            let radix: Option<fn(char) -> bool> = match self.cursor.peek() {
                'x' | 'X' if is_hex_digit(second) => Some(is_hex_digit),
                'b' | 'B' if is_binary_digit(second) => Some(is_binary_digit),
                'o' | 'O' if is_octal_digit(second) => Some(is_octal_digit),
                _ => None,
            };
            if let Some(is_digit) = radix {
                self.cursor.advance();
                self.digits(is_digit);
                return INT_NUMBER;
            }
        }

        self.digits(|c| c.is_ascii_digit());

        let mut kind = INT_NUMBER;
        if self.cursor.peek() == '.' {
            self.cursor.advance();
            self.digits(|c| c.is_ascii_digit());
            kind = FLOAT_NUMBER;
        }
        if self.float_exponent() {
            kind = FLOAT_NUMBER;
        }
        kind
    }

    /// Digits with `_` separators; a separator must be followed by a digit.
    fn digits(&mut self, is_digit: fn(char) -> bool) {
        loop {
            match self.cursor.peek() {
                '_' if is_digit(self.cursor.second()) => {
                    self.cursor.advance();
                }
                c if is_digit(c) && !self.cursor.is_eof() => {
                    self.cursor.advance();
                }
                _ => return,
            }
        }
    }

    fn float_exponent(&mut self) -> bool {
        if !matches!(self.cursor.peek(), 'e' | 'E') {
            return false;
        }
        let has_digits = match self.cursor.second() {
            '+' | '-' => self.cursor.third().is_ascii_digit(),
            second => second.is_ascii_digit(),
        };
        if !has_digits {
            return false;
        }

        self.cursor.advance();
        if !self.cursor.eat('+') {
            self.cursor.eat('-');
        }
        self.digits(|c| c.is_ascii_digit());
        true
    }
}

/// Lexes `text` to the end, including the final `EOF` token.
pub fn tokenize(text: &str, config: LexConfig) -> Vec<Token> {
    let mut lexer = Lexer::with_config(text, config);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let is_eof = token.kind == EOF;
        tokens.push(token);
        if is_eof {
            return tokens;
        }
    }
}

fn open_tag(text: &str, config: LexConfig) -> Option<(SyntaxKind, usize)> {
    let rest = text.strip_prefix("<?")?;
    if rest.starts_with('=') {
        return Some((OPEN_TAG_WITH_ECHO, 3));
    }
    if rest.get(..3).is_some_and(|php| php.eq_ignore_ascii_case("php"))
        && rest.as_bytes().get(3).is_none_or(|byte| byte.is_ascii_whitespace())
    {
        return Some((OPEN_TAG, 5));
    }
    config.short_open_tag.then_some((OPEN_TAG, 2))
}

fn name_len(text: &str) -> usize {
    let mut chars = text.char_indices();
    match chars.next() {
        Some((_, c)) if is_name_start(c) => {}
        _ => return 0,
    }
    chars.find(|&(_, c)| !is_name_continue(c)).map_or(text.len(), |(index, _)| index)
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_name_continue(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit()
}

fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

fn is_binary_digit(c: char) -> bool {
    matches!(c, '0' | '1')
}

fn is_octal_digit(c: char) -> bool {
    matches!(c, '0'..='7')
}

fn is_unrecognized(c: char) -> bool {
    c == EOF_CHAR || (c.is_ascii_control() && !matches!(c, '\t' | '\n' | '\r'))
}
