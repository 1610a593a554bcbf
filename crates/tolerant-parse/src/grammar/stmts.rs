use tolerant_syntax::SyntaxKind::{self, *};
use tolerant_syntax::SyntaxSet;

use super::exprs::{self, EXPR_FIRST};
use super::{delimited, items, stmt_end, types};
use crate::parser::Parser;
use crate::stack::ensure_sufficient_stack;

const STMT_KEYWORDS: SyntaxSet = SyntaxSet::new([
    ABSTRACT_KW,
    BREAK_KW,
    CLASS_KW,
    CONST_KW,
    CONTINUE_KW,
    DECLARE_KW,
    DO_KW,
    ECHO_KW,
    FINAL_KW,
    FOR_KW,
    FOREACH_KW,
    GLOBAL_KW,
    IF_KW,
    INTERFACE_KW,
    NAMESPACE_KW,
    READONLY_KW,
    RETURN_KW,
    SWITCH_KW,
    THROW_KW,
    TRAIT_KW,
    TRY_KW,
    UNSET_KW,
    USE_KW,
    WHILE_KW,
]);

pub(crate) const STMT_FIRST: SyntaxSet = SyntaxSet::new([
    LEFT_BRACE,
    SEMICOLON,
    CLOSE_TAG,
    INLINE_HTML,
    OPEN_TAG,
    OPEN_TAG_WITH_ECHO,
])
.union(&STMT_KEYWORDS)
.union(&EXPR_FIRST);

/// Tokens that end a run of unexpected input at statement level.
const STMT_RECOVERY: SyntaxSet = SyntaxSet::new([
    RIGHT_BRACE,
    ELSE_KW,
    ELSEIF_KW,
    ENDIF_KW,
    ENDWHILE_KW,
    ENDFOR_KW,
    ENDFOREACH_KW,
    CASE_KW,
    DEFAULT_KW,
])
.union(&STMT_FIRST);

const ALT_IF_END: SyntaxSet = SyntaxSet::new([ELSEIF_KW, ELSE_KW, ENDIF_KW]);
const CASE_END: SyntaxSet = SyntaxSet::new([CASE_KW, DEFAULT_KW, RIGHT_BRACE]);

pub(crate) fn statement(p: &mut Parser<'_>) {
    ensure_sufficient_stack(|| statement_(p));
}

fn statement_(p: &mut Parser<'_>) {
    match p.peek_kind() {
        CLOSE_TAG | INLINE_HTML | OPEN_TAG | OPEN_TAG_WITH_ECHO => inline_html(p),
        LEFT_BRACE => compound_stmt(p),
        SEMICOLON => {
            let m = p.start();
            p.advance();
            m.complete(p, EMPTY_STMT);
        }
        ECHO_KW => {
            let m = p.start();
            p.advance();
            exprs::expr_list(p);
            stmt_end(p);
            m.complete(p, ECHO_STMT);
        }
        IF_KW => if_stmt(p),
        WHILE_KW => while_stmt(p),
        DO_KW => do_stmt(p),
        FOR_KW => for_stmt(p),
        FOREACH_KW => foreach_stmt(p),
        SWITCH_KW => switch_stmt(p),
        BREAK_KW => jump_stmt(p, BREAK_STMT),
        CONTINUE_KW => jump_stmt(p, CONTINUE_STMT),
        RETURN_KW => jump_stmt(p, RETURN_STMT),
        THROW_KW => {
            let m = p.start();
            p.advance();
            exprs::expr_or_missing(p);
            stmt_end(p);
            m.complete(p, THROW_STMT);
        }
        TRY_KW => try_stmt(p),
        GLOBAL_KW => global_stmt(p),
        STATIC_KW if p.nth(1) == VARIABLE => static_var_stmt(p),
        UNSET_KW => unset_stmt(p),
        DECLARE_KW => declare_stmt(p),
        FUNCTION_KW if is_function_decl(p) => items::function_decl(p),
        ABSTRACT_KW | FINAL_KW | CLASS_KW => items::class_decl(p),
        READONLY_KW if matches!(p.nth(1), CLASS_KW | ABSTRACT_KW | FINAL_KW) => {
            items::class_decl(p);
        }
        INTERFACE_KW => items::interface_decl(p),
        TRAIT_KW => items::trait_decl(p),
        NAMESPACE_KW => items::namespace_def(p),
        USE_KW => items::namespace_use(p),
        CONST_KW => items::const_decl(p),
        kind if EXPR_FIRST.contains(kind) => {
            let m = p.start();
            exprs::expr_or_missing(p);
            stmt_end(p);
            m.complete(p, EXPR_STMT);
        }
        _ => {
            let message = p.unexpected_message();
            p.error_recover(message, &STMT_RECOVERY);
        }
    }
}

/// `function name(` declares a function; `function (` starts a closure.
fn is_function_decl(p: &Parser<'_>) -> bool {
    match p.nth(1) {
        AMP => p.nth(2).is_name_like(),
        kind => kind.is_name_like(),
    }
}

/// The boundary between two code regions: `?>`, literal text and an open
/// tag, each optional. `<?=` is followed by an implicit echo statement.
fn inline_html(p: &mut Parser<'_>) {
    let m = p.start();
    p.eat(CLOSE_TAG);
    p.eat(INLINE_HTML);
    let echo = p.eat(OPEN_TAG_WITH_ECHO);
    if !echo {
        p.eat(OPEN_TAG);
    }
    m.complete(p, INLINE_HTML_STMT);

    if echo {
        let m = p.start();
        exprs::expr_list(p);
        stmt_end(p);
        m.complete(p, ECHO_STMT);
    }
}

pub(crate) fn compound_stmt(p: &mut Parser<'_>) {
    debug_assert_eq!(p.peek_kind(), LEFT_BRACE);

    let m = p.start();
    p.advance();
    while !p.at(RIGHT_BRACE) && !p.at(EOF) {
        statement(p);
    }
    p.expect(RIGHT_BRACE);
    m.complete(p, COMPOUND_STMT);
}

/// A mandatory `{ ... }` body.
pub(crate) fn block(p: &mut Parser<'_>) {
    if p.at(LEFT_BRACE) {
        compound_stmt(p);
    } else {
        p.missing(LEFT_BRACE);
    }
}

/// The body of a control structure. Tokens that cannot start a statement
/// are left to the enclosing rule.
fn embedded_statement(p: &mut Parser<'_>) {
    if p.at_set(&STMT_FIRST) {
        statement(p);
    } else {
        p.missing_with("expected statement");
    }
}

/// Statements up to one of `stop`, wrapped in a `STMT_LIST` if there are any.
fn stmt_list(p: &mut Parser<'_>, stop: &SyntaxSet) {
    let m = p.start();
    let mut empty = true;
    while !p.at(EOF) && !p.at_set(stop) {
        statement(p);
        empty = false;
    }

    if empty {
        m.abandon(p);
    } else {
        m.complete(p, STMT_LIST);
    }
}

/// `( expr )`
fn condition(p: &mut Parser<'_>) {
    p.expect(LEFT_PAREN);
    exprs::expr_or_missing(p);
    p.expect(RIGHT_PAREN);
}

/// Either a single statement or `: statements end_kw ;`.
fn loop_body(p: &mut Parser<'_>, end_kw: SyntaxKind) {
    if p.eat(COLON) {
        stmt_list(p, &SyntaxSet::new([end_kw]));
        p.expect(end_kw);
        stmt_end(p);
    } else {
        embedded_statement(p);
    }
}

fn if_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    condition(p);

    if p.eat(COLON) {
        stmt_list(p, &ALT_IF_END);
        while p.at(ELSEIF_KW) {
            let clause = p.start();
            p.advance();
            condition(p);
            p.expect(COLON);
            stmt_list(p, &ALT_IF_END);
            clause.complete(p, ELSE_IF_CLAUSE);
        }
        if p.at(ELSE_KW) {
            let clause = p.start();
            p.advance();
            p.expect(COLON);
            stmt_list(p, &ALT_IF_END);
            clause.complete(p, ELSE_CLAUSE);
        }
        p.expect(ENDIF_KW);
        stmt_end(p);
    } else {
        embedded_statement(p);
        while p.at(ELSEIF_KW) {
            let clause = p.start();
            p.advance();
            condition(p);
            embedded_statement(p);
            clause.complete(p, ELSE_IF_CLAUSE);
        }
        if p.at(ELSE_KW) {
            let clause = p.start();
            p.advance();
            embedded_statement(p);
            clause.complete(p, ELSE_CLAUSE);
        }
    }

    m.complete(p, IF_STMT);
}

fn while_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    condition(p);
    loop_body(p, ENDWHILE_KW);
    m.complete(p, WHILE_STMT);
}

fn do_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    embedded_statement(p);
    p.expect(WHILE_KW);
    condition(p);
    stmt_end(p);
    m.complete(p, DO_STMT);
}

fn for_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();

    p.expect(LEFT_PAREN);
    for delim in [SEMICOLON, SEMICOLON, RIGHT_PAREN] {
        if p.at_set(&EXPR_FIRST) {
            exprs::expr_list(p);
        }
        p.expect(delim);
    }

    loop_body(p, ENDFOR_KW);
    m.complete(p, FOR_STMT);
}

fn foreach_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();

    p.expect(LEFT_PAREN);
    exprs::expr_or_missing(p);
    p.expect(AS_KW);
    if p.eat(AMP) {
        exprs::expr_or_missing(p);
    } else {
        match exprs::expr(p) {
            Some(key) if p.at(FAT_ARROW) => {
                let key = key.precede(p);
                p.advance();
                key.complete(p, FOREACH_KEY);
                p.eat(AMP);
                exprs::expr_or_missing(p);
            }
            Some(_) => {}
            None => p.missing_with("expected expression"),
        }
    }
    p.expect(RIGHT_PAREN);

    loop_body(p, ENDFOREACH_KW);
    m.complete(p, FOREACH_STMT);
}

fn switch_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    condition(p);

    if p.at(LEFT_BRACE) {
        let block = p.start();
        p.advance();
        while !p.at(RIGHT_BRACE) && !p.at(EOF) {
            match p.peek_kind() {
                CASE_KW | DEFAULT_KW => case_clause(p),
                _ => p.error_recover("expected 'case' or 'default'", &CASE_END),
            }
        }
        p.expect(RIGHT_BRACE);
        block.complete(p, SWITCH_BLOCK);
    } else {
        p.missing(LEFT_BRACE);
    }

    m.complete(p, SWITCH_STMT);
}

fn case_clause(p: &mut Parser<'_>) {
    let m = p.start();
    let kind = if p.eat(CASE_KW) {
        exprs::expr_or_missing(p);
        CASE_CLAUSE
    } else {
        p.advance();
        DEFAULT_CLAUSE
    };

    if !p.eat(COLON) && !p.eat(SEMICOLON) {
        p.missing(COLON);
    }
    stmt_list(p, &CASE_END);
    m.complete(p, kind);
}

/// `break`, `continue` and `return` with an optional operand.
fn jump_stmt(p: &mut Parser<'_>, kind: SyntaxKind) {
    let m = p.start();
    p.advance();
    if p.at_set(&EXPR_FIRST) {
        exprs::expr_or_missing(p);
    }
    stmt_end(p);
    m.complete(p, kind);
}

fn try_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    block(p);

    let mut handled = false;
    while p.at(CATCH_KW) {
        let clause = p.start();
        p.advance();
        p.expect(LEFT_PAREN);
        if p.at_set(&types::TYPE_FIRST) {
            types::type_(p);
        } else {
            p.missing_with("expected type");
        }
        p.eat(VARIABLE);
        p.expect(RIGHT_PAREN);
        block(p);
        clause.complete(p, CATCH_CLAUSE);
        handled = true;
    }

    if p.at(FINALLY_KW) {
        let clause = p.start();
        p.advance();
        block(p);
        clause.complete(p, FINALLY_CLAUSE);
        handled = true;
    }

    if !handled {
        p.missing(CATCH_KW);
    }
    m.complete(p, TRY_STMT);
}

fn global_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    loop {
        p.expect(VARIABLE);
        if !p.eat(COMMA) {
            break;
        }
    }
    stmt_end(p);
    m.complete(p, GLOBAL_STMT);
}

fn static_var_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    loop {
        let var = p.start();
        p.expect(VARIABLE);
        if p.eat(EQ) {
            exprs::expr_or_missing(p);
        }
        var.complete(p, STATIC_VAR);
        if !p.eat(COMMA) {
            break;
        }
    }
    stmt_end(p);
    m.complete(p, STATIC_VAR_STMT);
}

fn unset_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    if p.at(LEFT_PAREN) {
        delimited(p, LEFT_PAREN, RIGHT_PAREN, COMMA, "expected expression", &EXPR_FIRST, |p| {
            exprs::expr(p).is_some()
        });
    } else {
        p.missing(LEFT_PAREN);
    }
    stmt_end(p);
    m.complete(p, UNSET_STMT);
}

fn declare_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    if p.at(LEFT_PAREN) {
        delimited(
            p,
            LEFT_PAREN,
            RIGHT_PAREN,
            COMMA,
            "expected declare directive",
            &SyntaxSet::new([NAME]),
            declare_directive,
        );
    } else {
        p.missing(LEFT_PAREN);
    }

    if !p.eat(SEMICOLON) && !p.at(CLOSE_TAG) {
        embedded_statement(p);
    }
    m.complete(p, DECLARE_STMT);
}

fn declare_directive(p: &mut Parser<'_>) -> bool {
    if !p.at(NAME) {
        return false;
    }

    let m = p.start();
    p.advance();
    p.expect(EQ);
    exprs::expr_or_missing(p);
    m.complete(p, DECLARE_DIRECTIVE);
    true
}
