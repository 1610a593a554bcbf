use tolerant_syntax::SyntaxKind::{self, *};
use tolerant_syntax::SyntaxSet;

use crate::parser::{CompletedMarker, Parser};

mod exprs;
mod items;
mod stmts;
mod types;

pub(crate) fn source_file(p: &mut Parser<'_>) {
    let m = p.start();

    while !p.at(EOF) {
        stmts::statement(p);
    }

    p.bump_eof();
    m.complete(p, SOURCE_FILE);
}

/// A name token; reserved words are not accepted.
pub(crate) fn name(p: &mut Parser<'_>) {
    if !p.eat(NAME) {
        p.missing(NAME);
    }
}

/// A name in member position, where reserved words are allowed.
pub(crate) fn name_like(p: &mut Parser<'_>) {
    if p.peek_kind().is_name_like() {
        p.advance();
    } else {
        p.missing(NAME);
    }
}

pub(crate) const QUALIFIED_NAME_FIRST: SyntaxSet = SyntaxSet::new([NAME, BACKSLASH]);

/// `Foo`, `\Foo\Bar` or `Foo\Bar`. A trailing `\{` is left for group use.
pub(crate) fn qualified_name(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();

    if p.eat(BACKSLASH) {
        name_like(p);
    } else {
        name(p);
    }

    while p.at(BACKSLASH) && p.nth(1).is_name_like() {
        p.advance();
        p.advance();
    }

    m.complete(p, QUALIFIED_NAME)
}

/// `;`, or a close tag, which ends a statement without being part of it.
pub(crate) fn stmt_end(p: &mut Parser<'_>) {
    if p.at(CLOSE_TAG) || p.eat(SEMICOLON) {
        return;
    }
    p.missing(SEMICOLON);
}

/// Parses `bra (element (delim element)* delim?)? ket`.
///
/// `parser` returns `false` when the current token cannot start an element.
/// Stray delimiters are reported and wrapped in `ERROR` nodes.
pub(crate) fn delimited(
    p: &mut Parser<'_>,
    bra: SyntaxKind,
    ket: SyntaxKind,
    delim: SyntaxKind,
    unexpected_delim_message: &'static str,
    first_set: &SyntaxSet,
    mut parser: impl FnMut(&mut Parser<'_>) -> bool,
) {
    debug_assert_eq!(p.peek_kind(), bra);
    p.advance();

    while !p.at(ket) && !p.at(EOF) {
        if p.at(delim) {
            p.error_and_bump(unexpected_delim_message);
            continue;
        }

        if !parser(p) {
            break;
        }

        if !p.eat(delim) {
            if first_set.contains(p.peek_kind()) {
                p.expect(delim);
            } else {
                break;
            }
        }
    }

    p.expect(ket);
}
