use tolerant_syntax::SyntaxKind::*;
use tolerant_syntax::SyntaxSet;

use super::qualified_name;
use crate::parser::{CompletedMarker, Parser};

pub(crate) const TYPE_FIRST: SyntaxSet =
    SyntaxSet::new([QUESTION, NAME, BACKSLASH, ARRAY_KW, STATIC_KW]);

/// `?T`, `T` or `T1|T2|...`.
pub(crate) fn type_(p: &mut Parser<'_>) {
    if p.at(QUESTION) {
        let m = p.start();
        p.advance();
        if single_type(p).is_none() {
            p.missing_with("expected type");
        }
        m.complete(p, NULLABLE_TYPE);
        return;
    }

    let Some(first) = single_type(p) else {
        p.missing_with("expected type");
        return;
    };

    if p.at(PIPE) {
        let m = first.precede(p);
        while p.eat(PIPE) {
            if single_type(p).is_none() {
                p.missing_with("expected type");
            }
        }
        m.complete(p, UNION_TYPE);
    }
}

fn single_type(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let m = p.start();
    match p.peek_kind() {
        NAME | BACKSLASH => {
            qualified_name(p);
        }
        ARRAY_KW | STATIC_KW => p.advance(),
        _ => {
            m.abandon(p);
            return None;
        }
    }
    Some(m.complete(p, NAMED_TYPE))
}
