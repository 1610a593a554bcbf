use std::str::Chars;

use text_size::TextSize;

pub(crate) const EOF_CHAR: char = '\0';

#[derive(Clone)]
pub(crate) struct Cursor<'t> {
    text: &'t str,
    chars: Chars<'t>,
    token_start: TextSize,
}

impl<'t> Cursor<'t> {
    /// Creates a cursor over `text` positioned at `offset`, which must be a
    /// character boundary.
    pub(crate) fn new(text: &'t str, offset: TextSize) -> Self {
        let rest = text.get(usize::from(offset)..).unwrap_or_default();
        Self { text, chars: rest.chars(), token_start: offset }
    }

    /// Repositions the cursor at `offset`.
    pub(crate) fn reset(&mut self, offset: TextSize) {
        *self = Self::new(self.text, offset);
    }

    pub(crate) fn offset(&self) -> TextSize {
        TextSize::new((self.text.len() - self.chars.as_str().len()) as u32)
    }

    pub(crate) fn rest(&self) -> &'t str {
        self.chars.as_str()
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    pub(crate) fn token_text(&self) -> &'t str {
        let range = usize::from(self.token_start)..usize::from(self.offset());
        self.text.get(range).unwrap_or_default()
    }

    pub(crate) fn token_start(&self) -> TextSize {
        self.token_start
    }

    pub(crate) fn pos_within_token(&self) -> TextSize {
        self.offset() - self.token_start
    }

    pub(crate) fn reset_pos_within_token(&mut self) {
        self.token_start = self.offset();
    }

    pub(crate) fn peek(&self) -> char {
        self.chars.clone().next().unwrap_or(EOF_CHAR)
    }

    pub(crate) fn second(&self) -> char {
        let mut chars = self.chars.clone();
        chars.next();
        chars.next().unwrap_or(EOF_CHAR)
    }

    pub(crate) fn third(&self) -> char {
        self.chars.clone().nth(2).unwrap_or(EOF_CHAR)
    }

    pub(crate) fn advance(&mut self) -> char {
        self.chars.next().unwrap_or(EOF_CHAR)
    }

    pub(crate) fn advance_while(&mut self, f: impl Fn(char) -> bool + Copy) {
        while !self.is_eof() && f(self.peek()) {
            self.advance();
        }
    }

    /// Skips `len` bytes; `len` must land on a character boundary.
    pub(crate) fn bump(&mut self, len: usize) {
        let rest = self.chars.as_str();
        self.chars = rest.get(len..).unwrap_or_default().chars();
    }

    pub(crate) fn bump_to_end(&mut self) {
        self.bump(self.chars.as_str().len());
    }

    pub(crate) fn eat(&mut self, c: char) -> bool {
        if self.peek() == c && !self.is_eof() {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_str(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.bump(s.len());
            true
        } else {
            false
        }
    }
}
