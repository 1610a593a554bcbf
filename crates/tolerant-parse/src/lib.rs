//! Error-tolerant parser for PHP source files.
//!
//! Parsing never fails on malformed code: every byte of the input ends up in
//! the returned tree, and problems are reported as [`Diagnostic`]s next to it.

use std::fmt::Write as _;

use tolerant_errors::Diagnostic;
pub use tolerant_lexer::LexConfig;
use tolerant_syntax::{SyntaxNode, SyntaxTree, WalkEventWithTokens};

mod grammar;
mod parser;
mod stack;
#[cfg(test)]
mod tests;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("source is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },
    #[error("source is {len} bytes long, offsets are limited to 4 GiB")]
    TooLarge { len: usize },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseConfig {
    pub lex: LexConfig,
}

/// A syntax tree together with the diagnostics found while building it.
#[derive(Debug)]
pub struct Parse {
    tree: SyntaxTree,
    diagnostics: Vec<Diagnostic>,
}

impl Parse {
    pub fn root(&self) -> SyntaxNode<'_> {
        self.tree.root()
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// Diagnostics in the order they were found, which is source order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn into_parts(self) -> (SyntaxTree, Vec<Diagnostic>) {
        (self.tree, self.diagnostics)
    }

    /// Indented dump of the tree, one element per line. Nodes show their full
    /// range, tokens their range without trivia, which is listed before them.
    pub fn debug_tree(&self) -> String {
        let mut buf = String::new();
        let mut indent = 0;

        for event in self.root().preorder_with_tokens() {
            match event {
                WalkEventWithTokens::EnterNode(node) => {
                    _ = writeln!(buf, "{:indent$}{node:?}", "");
                    indent += 2;
                }
                WalkEventWithTokens::LeaveNode(_) => indent -= 2,
                WalkEventWithTokens::Token(token) => {
                    for trivia in token.leading_trivia() {
                        _ = writeln!(
                            buf,
                            "{:indent$}{:?}@{:?} {:?}",
                            "",
                            trivia.kind().syntax_kind(),
                            trivia.text_range(),
                            trivia.text()
                        );
                    }
                    _ = writeln!(buf, "{:indent$}{token:?}", "");
                }
            }
        }

        buf
    }
}

/// Parses raw source bytes. Only input that is not UTF-8 or does not fit
/// 32-bit offsets is rejected; syntax errors are reported through
/// [`Parse::diagnostics`].
pub fn parse(bytes: &[u8]) -> Result<Parse, ParseError> {
    parse_bytes_with_config(bytes, ParseConfig::default())
}

pub fn parse_bytes_with_config(bytes: &[u8], config: ParseConfig) -> Result<Parse, ParseError> {
    check_len(bytes.len())?;
    let text = std::str::from_utf8(bytes)
        .map_err(|err| ParseError::InvalidUtf8 { valid_up_to: err.valid_up_to() })?;
    Ok(parse_with_config(text, config))
}

fn check_len(len: usize) -> Result<(), ParseError> {
    match u32::try_from(len) {
        Ok(_) => Ok(()),
        Err(_) => Err(ParseError::TooLarge { len }),
    }
}

pub fn parse_text(text: &str) -> Parse {
    parse_with_config(text, ParseConfig::default())
}

/// # Panics
///
/// Panics if `text` is 4 GiB or larger; [`parse_bytes_with_config`] reports
/// that as an error instead.
pub fn parse_with_config(text: &str, config: ParseConfig) -> Parse {
    assert!(check_len(text.len()).is_ok(), "source of {} bytes is too large", text.len());
    let _span = tracing::debug_span!("parse", len = text.len()).entered();

    let mut parser = parser::Parser::new(text, config.lex);
    grammar::source_file(&mut parser);
    let (tree, diagnostics) = parser.build_tree();

    tracing::debug!(diagnostics = diagnostics.len(), "parsed");
    Parse { tree, diagnostics }
}
