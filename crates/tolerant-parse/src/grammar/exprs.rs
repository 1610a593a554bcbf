use tolerant_syntax::SyntaxKind::{self, *};
use tolerant_syntax::SyntaxSet;

use super::{delimited, items, qualified_name, stmts};
use crate::parser::{CompletedMarker, Parser};
use crate::stack::ensure_sufficient_stack;

pub(crate) const EXPR_FIRST: SyntaxSet = SyntaxSet::new([
    VARIABLE,
    DOLLAR,
    NAME,
    BACKSLASH,
    INT_NUMBER,
    FLOAT_NUMBER,
    STRING,
    CAST,
    LEFT_PAREN,
    LEFT_BRACKET,
    BANG,
    MINUS,
    PLUS,
    TILDE,
    AT,
    PLUS_PLUS,
    MINUS_MINUS,
    ARRAY_KW,
    CLONE_KW,
    EMPTY_KW,
    FN_KW,
    FUNCTION_KW,
    INCLUDE_KW,
    INCLUDE_ONCE_KW,
    ISSET_KW,
    LIST_KW,
    MATCH_KW,
    NEW_KW,
    PRINT_KW,
    REQUIRE_KW,
    REQUIRE_ONCE_KW,
    STATIC_KW,
    YIELD_KW,
]);

const ELEMENT_FIRST: SyntaxSet = SyntaxSet::new([AMP, ELLIPSIS]).union(&EXPR_FIRST);
const ARG_FIRST: SyntaxSet = SyntaxSet::new([ELLIPSIS]).union(&EXPR_FIRST);
const ARM_FIRST: SyntaxSet = SyntaxSet::new([DEFAULT_KW]).union(&EXPR_FIRST);
const CLOSURE_USE_FIRST: SyntaxSet = SyntaxSet::new([AMP, VARIABLE]);

/// Operand binding power of `print`, `yield`, `include` and arrow function
/// bodies: everything but `and`, `or` and `xor`.
const LOW_PREFIX_BP: u8 = 7;
const TERNARY_BP: u8 = 9;
const NOT_BP: u8 = 35;
const UNARY_BP: u8 = 39;

pub(crate) fn expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    expr_bp(p, 0)
}

pub(crate) fn expr_or_missing(p: &mut Parser<'_>) {
    expr_bp_or_missing(p, 0);
}

fn expr_bp_or_missing(p: &mut Parser<'_>, min_bp: u8) {
    if expr_bp(p, min_bp).is_none() {
        p.missing_with("expected expression");
    }
}

/// `expr (, expr)*`
pub(crate) fn expr_list(p: &mut Parser<'_>) {
    let m = p.start();
    expr_or_missing(p);
    while p.eat(COMMA) {
        expr_or_missing(p);
    }
    m.complete(p, EXPR_LIST);
}

fn expr_bp(p: &mut Parser<'_>, min_bp: u8) -> Option<CompletedMarker> {
    let mut lhs = unary_expr(p)?;

    loop {
        let kind = p.peek_kind();

        if kind == QUESTION {
            if TERNARY_BP < min_bp {
                break;
            }
            let m = lhs.precede(p);
            p.advance();
            if !p.at(COLON) {
                expr_or_missing(p);
            }
            p.expect(COLON);
            expr_bp_or_missing(p, TERNARY_BP + 1);
            lhs = m.complete(p, TERNARY_EXPR);
            continue;
        }

        let Some((left_bp, right_bp)) = infix_binding_power(kind) else {
            break;
        };
        if left_bp < min_bp {
            break;
        }

        let m = lhs.precede(p);
        p.advance();
        if kind == EQ {
            p.eat(AMP);
        }
        expr_bp_or_missing(p, right_bp);
        lhs = m.complete(p, if is_assignment(kind) { ASSIGN_EXPR } else { BINARY_EXPR });
    }

    Some(lhs)
}

/// Assignments bind to the operand directly before them, whatever the
/// surrounding operators: `!$a = f()` is `!($a = f())`.
fn infix_binding_power(kind: SyntaxKind) -> Option<(u8, u8)> {
    let bp = match kind {
        OR_KW => (1, 2),
        XOR_KW => (3, 4),
        AND_KW => (5, 6),
        kind if is_assignment(kind) => (u8::MAX, LOW_PREFIX_BP),
        QUESTION_QUESTION => (12, 11),
        PIPE_PIPE => (13, 14),
        AMP_AMP => (15, 16),
        PIPE => (17, 18),
        CARET => (19, 20),
        AMP => (21, 22),
        EQ_EQ | BANG_EQ | EQ_EQ_EQ | BANG_EQ_EQ | SPACESHIP => (23, 24),
        LT | LT_EQ | GT | GT_EQ => (25, 26),
        DOT => (27, 28),
        SHL | SHR => (29, 30),
        PLUS | MINUS => (31, 32),
        STAR | SLASH | PERCENT => (33, 34),
        INSTANCEOF_KW => (37, 38),
        STAR_STAR => (42, 41),
        _ => return None,
    };
    Some(bp)
}

fn is_assignment(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        EQ | PLUS_EQ
            | MINUS_EQ
            | STAR_EQ
            | SLASH_EQ
            | DOT_EQ
            | PERCENT_EQ
            | STAR_STAR_EQ
            | AMP_EQ
            | PIPE_EQ
            | CARET_EQ
            | SHL_EQ
            | SHR_EQ
            | QUESTION_QUESTION_EQ
    )
}

fn unary_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    ensure_sufficient_stack(|| unary_expr_(p))
}

fn unary_expr_(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let cm = match p.peek_kind() {
        BANG => prefix(p, PREFIX_EXPR, NOT_BP),
        MINUS | PLUS | TILDE | AT | PLUS_PLUS | MINUS_MINUS => prefix(p, PREFIX_EXPR, UNARY_BP),
        CAST => prefix(p, CAST_EXPR, UNARY_BP),
        CLONE_KW => prefix(p, CLONE_EXPR, UNARY_BP),
        PRINT_KW => prefix(p, PRINT_EXPR, LOW_PREFIX_BP),
        INCLUDE_KW | INCLUDE_ONCE_KW | REQUIRE_KW | REQUIRE_ONCE_KW => {
            prefix(p, INCLUDE_EXPR, LOW_PREFIX_BP)
        }
        YIELD_KW => yield_expr(p),
        NEW_KW => new_expr(p),
        _ => return postfix_expr(p),
    };
    Some(cm)
}

fn prefix(p: &mut Parser<'_>, kind: SyntaxKind, bp: u8) -> CompletedMarker {
    let m = p.start();
    p.advance();
    expr_bp_or_missing(p, bp);
    m.complete(p, kind)
}

/// `yield`, `yield value`, `yield key => value` or `yield from expr`.
fn yield_expr(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();

    if p.at(NAME) && p.peek_text().eq_ignore_ascii_case("from") && EXPR_FIRST.contains(p.nth(1))
    {
        p.advance();
        expr_bp_or_missing(p, LOW_PREFIX_BP);
    } else if p.at_set(&EXPR_FIRST) {
        expr_bp_or_missing(p, LOW_PREFIX_BP);
        if p.eat(FAT_ARROW) {
            expr_bp_or_missing(p, LOW_PREFIX_BP);
        }
    }

    m.complete(p, YIELD_EXPR)
}

fn new_expr(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();

    match p.peek_kind() {
        CLASS_KW => {
            p.advance();
            if p.at(LEFT_PAREN) {
                arg_list(p);
            }
            items::class_tail(p);
            return m.complete(p, NEW_EXPR);
        }
        STATIC_KW => p.advance(),
        NAME | BACKSLASH => {
            qualified_name(p);
        }
        VARIABLE | DOLLAR => {
            variable_expr(p);
        }
        LEFT_PAREN => {
            paren_expr(p);
        }
        _ => p.missing_with("expected class name"),
    }

    if p.at(LEFT_PAREN) {
        arg_list(p);
    }
    m.complete(p, NEW_EXPR)
}

fn postfix_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let mut lhs = primary_expr(p)?;

    loop {
        lhs = match p.peek_kind() {
            LEFT_BRACKET => {
                let m = lhs.precede(p);
                p.advance();
                if !p.at(RIGHT_BRACKET) {
                    expr_or_missing(p);
                }
                p.expect(RIGHT_BRACKET);
                m.complete(p, SUBSCRIPT_EXPR)
            }
            ARROW | QUESTION_ARROW => {
                let m = lhs.precede(p);
                p.advance();
                member_name(p);
                m.complete(p, MEMBER_ACCESS_EXPR)
            }
            COLON_COLON => {
                let m = lhs.precede(p);
                p.advance();
                member_name(p);
                m.complete(p, SCOPED_ACCESS_EXPR)
            }
            LEFT_PAREN => {
                let m = lhs.precede(p);
                arg_list(p);
                m.complete(p, CALL_EXPR)
            }
            PLUS_PLUS | MINUS_MINUS => {
                let m = lhs.precede(p);
                p.advance();
                m.complete(p, POSTFIX_EXPR)
            }
            _ => break,
        };
    }

    Some(lhs)
}

/// The right-hand side of `->`, `?->` or `::`.
fn member_name(p: &mut Parser<'_>) {
    match p.peek_kind() {
        VARIABLE => p.advance(),
        DOLLAR => {
            variable_expr(p);
        }
        LEFT_BRACE => {
            p.advance();
            expr_or_missing(p);
            p.expect(RIGHT_BRACE);
        }
        kind if kind.is_name_like() => p.advance(),
        _ => p.missing(NAME),
    }
}

fn primary_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let cm = match p.peek_kind() {
        INT_NUMBER | FLOAT_NUMBER | STRING => {
            let m = p.start();
            p.advance();
            m.complete(p, LITERAL)
        }
        VARIABLE | DOLLAR => variable_expr(p),
        NAME | BACKSLASH => {
            let m = p.start();
            qualified_name(p);
            m.complete(p, NAME_EXPR)
        }
        STATIC_KW if p.nth(1) == FUNCTION_KW => closure_expr(p),
        STATIC_KW if p.nth(1) == FN_KW => arrow_fn_expr(p),
        FUNCTION_KW => closure_expr(p),
        FN_KW => arrow_fn_expr(p),
        MATCH_KW if p.nth(1) == LEFT_PAREN => match_expr(p),
        // `static::` and a `match` that is only a name
        STATIC_KW | MATCH_KW => {
            let m = p.start();
            p.advance();
            m.complete(p, NAME_EXPR)
        }
        LEFT_PAREN => paren_expr(p),
        LEFT_BRACKET | ARRAY_KW => array_expr(p),
        LIST_KW => {
            let m = p.start();
            p.advance();
            if p.at(LEFT_PAREN) {
                elements(p, LEFT_PAREN, RIGHT_PAREN);
            } else {
                p.missing(LEFT_PAREN);
            }
            m.complete(p, LIST_EXPR)
        }
        ISSET_KW => {
            let m = p.start();
            p.advance();
            if p.at(LEFT_PAREN) {
                delimited(
                    p,
                    LEFT_PAREN,
                    RIGHT_PAREN,
                    COMMA,
                    "expected expression",
                    &EXPR_FIRST,
                    |p| expr(p).is_some(),
                );
            } else {
                p.missing(LEFT_PAREN);
            }
            m.complete(p, ISSET_EXPR)
        }
        EMPTY_KW => {
            let m = p.start();
            p.advance();
            p.expect(LEFT_PAREN);
            expr_or_missing(p);
            p.expect(RIGHT_PAREN);
            m.complete(p, EMPTY_EXPR)
        }
        _ => return None,
    };
    Some(cm)
}

/// `$name`, `$$name` or `${expr}`.
fn variable_expr(p: &mut Parser<'_>) -> CompletedMarker {
    ensure_sufficient_stack(|| {
        let m = p.start();
        if p.eat(DOLLAR) {
            match p.peek_kind() {
                LEFT_BRACE => {
                    p.advance();
                    expr_or_missing(p);
                    p.expect(RIGHT_BRACE);
                }
                VARIABLE | DOLLAR => {
                    variable_expr(p);
                }
                _ => p.missing(VARIABLE),
            }
        } else {
            p.advance();
        }
        m.complete(p, VARIABLE_EXPR)
    })
}

fn paren_expr(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();
    expr_or_missing(p);
    p.expect(RIGHT_PAREN);
    m.complete(p, PAREN_EXPR)
}

/// `[...]` or `array(...)`.
fn array_expr(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    if p.eat(ARRAY_KW) {
        if p.at(LEFT_PAREN) {
            elements(p, LEFT_PAREN, RIGHT_PAREN);
        } else {
            p.missing(LEFT_PAREN);
        }
    } else {
        elements(p, LEFT_BRACKET, RIGHT_BRACKET);
    }
    m.complete(p, ARRAY_EXPR)
}

/// Array and list elements. Empty elements such as `[, $b]` are allowed, so
/// extra commas are not errors.
fn elements(p: &mut Parser<'_>, bra: SyntaxKind, ket: SyntaxKind) {
    debug_assert_eq!(p.peek_kind(), bra);
    p.advance();

    while !p.at(ket) && !p.at(EOF) {
        if p.eat(COMMA) {
            continue;
        }
        if !array_element(p) {
            break;
        }
        if !p.at(ket) && !p.eat(COMMA) {
            if p.at_set(&ELEMENT_FIRST) {
                p.missing(COMMA);
            } else {
                break;
            }
        }
    }

    p.expect(ket);
}

fn array_element(p: &mut Parser<'_>) -> bool {
    if !p.at_set(&ELEMENT_FIRST) {
        return false;
    }

    let m = p.start();
    if p.eat(ELLIPSIS) || p.eat(AMP) {
        expr_or_missing(p);
    } else {
        expr_or_missing(p);
        if p.eat(FAT_ARROW) {
            p.eat(AMP);
            expr_or_missing(p);
        }
    }
    m.complete(p, ARRAY_ELEMENT);
    true
}

pub(crate) fn arg_list(p: &mut Parser<'_>) {
    let m = p.start();
    delimited(p, LEFT_PAREN, RIGHT_PAREN, COMMA, "expected argument", &ARG_FIRST, argument);
    m.complete(p, ARG_LIST);
}

/// A positional, named (`name: expr`) or spread argument. A lone `...` makes
/// a first-class callable.
fn argument(p: &mut Parser<'_>) -> bool {
    if !p.at_set(&ARG_FIRST) {
        return false;
    }

    let m = p.start();
    if p.peek_kind().is_name_like() && p.nth(1) == COLON {
        p.advance();
        p.advance();
    }

    if p.eat(ELLIPSIS) {
        if !p.at(RIGHT_PAREN) {
            expr_or_missing(p);
        }
    } else {
        expr_or_missing(p);
    }
    m.complete(p, ARG);
    true
}

/// `[static] function [&] (params) [use (...)] [: type] { ... }`
fn closure_expr(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.eat(STATIC_KW);
    p.expect(FUNCTION_KW);
    p.eat(AMP);
    items::param_list(p);

    if p.at(USE_KW) {
        let clause = p.start();
        p.advance();
        if p.at(LEFT_PAREN) {
            delimited(
                p,
                LEFT_PAREN,
                RIGHT_PAREN,
                COMMA,
                "expected variable",
                &CLOSURE_USE_FIRST,
                |p| {
                    if !p.at_set(&CLOSURE_USE_FIRST) {
                        return false;
                    }
                    p.eat(AMP);
                    p.expect(VARIABLE);
                    true
                },
            );
        } else {
            p.missing(LEFT_PAREN);
        }
        clause.complete(p, CLOSURE_USE);
    }

    items::return_type(p);
    stmts::block(p);
    m.complete(p, CLOSURE_EXPR)
}

/// `[static] fn [&] (params) [: type] => expr`
fn arrow_fn_expr(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.eat(STATIC_KW);
    p.expect(FN_KW);
    p.eat(AMP);
    items::param_list(p);
    items::return_type(p);
    p.expect(FAT_ARROW);
    expr_bp_or_missing(p, LOW_PREFIX_BP);
    m.complete(p, ARROW_FN_EXPR)
}

fn match_expr(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();
    p.expect(LEFT_PAREN);
    expr_or_missing(p);
    p.expect(RIGHT_PAREN);

    if p.at(LEFT_BRACE) {
        delimited(p, LEFT_BRACE, RIGHT_BRACE, COMMA, "expected match arm", &ARM_FIRST, match_arm);
    } else {
        p.missing(LEFT_BRACE);
    }
    m.complete(p, MATCH_EXPR)
}

/// `default => expr` or `cond, cond, ... => expr`.
fn match_arm(p: &mut Parser<'_>) -> bool {
    if !p.at_set(&ARM_FIRST) {
        return false;
    }

    let m = p.start();
    if !p.eat(DEFAULT_KW) {
        let conditions = p.start();
        expr_or_missing(p);
        while p.at(COMMA) && EXPR_FIRST.contains(p.nth(1)) {
            p.advance();
            expr_or_missing(p);
        }
        if p.at(COMMA) && p.nth(1) == FAT_ARROW {
            p.advance();
        }
        conditions.complete(p, EXPR_LIST);
    }
    p.expect(FAT_ARROW);
    expr_or_missing(p);
    m.complete(p, MATCH_ARM);
    true
}
