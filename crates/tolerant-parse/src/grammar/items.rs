//! Declarations: functions, classes and their members, namespaces, `use`
//! imports and constants.

use tolerant_syntax::SyntaxKind::*;
use tolerant_syntax::SyntaxSet;

use super::types::{self, TYPE_FIRST};
use super::{
    QUALIFIED_NAME_FIRST, delimited, exprs, name, name_like, qualified_name, stmt_end, stmts,
};
use crate::parser::{Marker, Parser};

const CLASS_MODIFIERS: SyntaxSet = SyntaxSet::new([ABSTRACT_KW, FINAL_KW, READONLY_KW]);

const MEMBER_MODIFIERS: SyntaxSet = SyntaxSet::new([
    ABSTRACT_KW,
    FINAL_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    PUBLIC_KW,
    READONLY_KW,
    STATIC_KW,
    VAR_KW,
]);

const PROMOTION_MODIFIERS: SyntaxSet =
    SyntaxSet::new([PRIVATE_KW, PROTECTED_KW, PUBLIC_KW, READONLY_KW]);

const PARAM_FIRST: SyntaxSet =
    SyntaxSet::new([AMP, ELLIPSIS, VARIABLE]).union(&TYPE_FIRST).union(&PROMOTION_MODIFIERS);

const MEMBER_RECOVERY: SyntaxSet =
    SyntaxSet::new([CONST_KW, FUNCTION_KW, USE_KW, VARIABLE, RIGHT_BRACE])
        .union(&MEMBER_MODIFIERS);

const USE_CLAUSE_FIRST: SyntaxSet =
    SyntaxSet::new([FUNCTION_KW, CONST_KW]).union(&QUALIFIED_NAME_FIRST);

pub(crate) fn function_decl(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    p.eat(AMP);
    name_like(p);
    param_list(p);
    return_type(p);
    stmts::block(p);
    m.complete(p, FUNCTION_DECL);
}

pub(crate) fn param_list(p: &mut Parser<'_>) {
    if !p.at(LEFT_PAREN) {
        p.missing(LEFT_PAREN);
        return;
    }

    let m = p.start();
    delimited(p, LEFT_PAREN, RIGHT_PAREN, COMMA, "expected parameter", &PARAM_FIRST, param);
    m.complete(p, PARAM_LIST);
}

fn param(p: &mut Parser<'_>) -> bool {
    if !p.at_set(&PARAM_FIRST) {
        return false;
    }

    let m = p.start();
    if p.at_set(&PROMOTION_MODIFIERS) {
        modifier_list(p, &PROMOTION_MODIFIERS);
    }
    if p.at_set(&TYPE_FIRST) {
        types::type_(p);
    }
    p.eat(AMP);
    p.eat(ELLIPSIS);
    p.expect(VARIABLE);
    if p.eat(EQ) {
        exprs::expr_or_missing(p);
    }
    m.complete(p, PARAM);
    true
}

/// An optional `: type` after a parameter list.
pub(crate) fn return_type(p: &mut Parser<'_>) {
    if !p.at(COLON) {
        return;
    }

    let m = p.start();
    p.advance();
    if p.at_set(&TYPE_FIRST) {
        types::type_(p);
    } else {
        p.missing_with("expected type");
    }
    m.complete(p, RETURN_TYPE);
}

fn modifier_list(p: &mut Parser<'_>, modifiers: &SyntaxSet) {
    let m = p.start();
    while p.at_set(modifiers) {
        p.advance();
    }
    m.complete(p, MODIFIER_LIST);
}

pub(crate) fn class_decl(p: &mut Parser<'_>) {
    let m = p.start();
    if p.at_set(&CLASS_MODIFIERS) {
        modifier_list(p, &CLASS_MODIFIERS);
    }
    p.expect(CLASS_KW);
    name(p);
    class_tail(p);
    m.complete(p, CLASS_DECL);
}

/// `extends`, `implements` and the member list, shared with anonymous classes.
pub(crate) fn class_tail(p: &mut Parser<'_>) {
    if p.at(EXTENDS_KW) {
        let m = p.start();
        p.advance();
        if p.at_set(&QUALIFIED_NAME_FIRST) {
            qualified_name(p);
        } else {
            p.missing(NAME);
        }
        m.complete(p, EXTENDS_CLAUSE);
    }

    if p.at(IMPLEMENTS_KW) {
        let m = p.start();
        p.advance();
        name_list(p);
        m.complete(p, IMPLEMENTS_CLAUSE);
    }

    member_list(p);
}

pub(crate) fn interface_decl(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    name(p);
    if p.at(EXTENDS_KW) {
        let clause = p.start();
        p.advance();
        name_list(p);
        clause.complete(p, EXTENDS_CLAUSE);
    }
    member_list(p);
    m.complete(p, INTERFACE_DECL);
}

pub(crate) fn trait_decl(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    name(p);
    member_list(p);
    m.complete(p, TRAIT_DECL);
}

fn name_list(p: &mut Parser<'_>) {
    let m = p.start();
    loop {
        if p.at_set(&QUALIFIED_NAME_FIRST) {
            qualified_name(p);
        } else {
            p.missing(NAME);
        }
        if !p.eat(COMMA) {
            break;
        }
    }
    m.complete(p, NAME_LIST);
}

fn member_list(p: &mut Parser<'_>) {
    if !p.at(LEFT_BRACE) {
        p.missing(LEFT_BRACE);
        return;
    }

    let m = p.start();
    p.advance();
    while !p.at(RIGHT_BRACE) && !p.at(EOF) {
        member(p);
    }
    p.expect(RIGHT_BRACE);
    m.complete(p, MEMBER_LIST);
}

fn member(p: &mut Parser<'_>) {
    let m = p.start();
    let has_modifiers = p.at_set(&MEMBER_MODIFIERS);
    if has_modifiers {
        modifier_list(p, &MEMBER_MODIFIERS);
    }

    match p.peek_kind() {
        CONST_KW => {
            p.advance();
            const_elements(p);
            stmt_end(p);
            m.complete(p, CLASS_CONST_DECL);
        }
        FUNCTION_KW => {
            p.advance();
            p.eat(AMP);
            name_like(p);
            param_list(p);
            return_type(p);
            if !p.eat(SEMICOLON) {
                stmts::block(p);
            }
            m.complete(p, METHOD_DECL);
        }
        USE_KW if !has_modifiers => {
            p.advance();
            name_list(p);
            stmt_end(p);
            m.complete(p, TRAIT_USE);
        }
        VARIABLE => property(p, m),
        kind if has_modifiers && TYPE_FIRST.contains(kind) => {
            types::type_(p);
            property(p, m);
        }
        _ if has_modifiers => {
            p.missing_with("expected property, method or constant");
            m.complete(p, ERROR);
        }
        _ => {
            m.abandon(p);
            let message = p.unexpected_message();
            p.error_recover(message, &MEMBER_RECOVERY);
        }
    }
}

fn property(p: &mut Parser<'_>, m: Marker) {
    loop {
        let element = p.start();
        p.expect(VARIABLE);
        if p.eat(EQ) {
            exprs::expr_or_missing(p);
        }
        element.complete(p, PROPERTY_ELEMENT);
        if !p.eat(COMMA) {
            break;
        }
    }
    stmt_end(p);
    m.complete(p, PROPERTY_DECL);
}

fn const_elements(p: &mut Parser<'_>) {
    loop {
        let element = p.start();
        name_like(p);
        p.expect(EQ);
        exprs::expr_or_missing(p);
        element.complete(p, CONST_ELEMENT);
        if !p.eat(COMMA) {
            break;
        }
    }
}

pub(crate) fn const_decl(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    const_elements(p);
    stmt_end(p);
    m.complete(p, CONST_DECL);
}

/// `namespace Name;`, `namespace Name { ... }` or `namespace { ... }`.
pub(crate) fn namespace_def(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();

    let named = p.at_set(&QUALIFIED_NAME_FIRST);
    if named {
        qualified_name(p);
    }

    if p.at(LEFT_BRACE) {
        stmts::compound_stmt(p);
    } else if named {
        stmt_end(p);
    } else {
        p.missing(LEFT_BRACE);
    }
    m.complete(p, NAMESPACE_DEF);
}

pub(crate) fn namespace_use(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    loop {
        use_clause(p);
        if !p.eat(COMMA) {
            break;
        }
    }
    stmt_end(p);
    m.complete(p, NAMESPACE_USE);
}

/// `[function|const] Name [as Alias]` or a group `Prefix\{...}`.
fn use_clause(p: &mut Parser<'_>) {
    let m = p.start();
    if p.at(FUNCTION_KW) || p.at(CONST_KW) {
        p.advance();
    }

    if p.at_set(&QUALIFIED_NAME_FIRST) {
        qualified_name(p);
    } else {
        p.missing(NAME);
    }

    if p.at(BACKSLASH) && p.nth(1) == LEFT_BRACE {
        p.advance();
        delimited(p, LEFT_BRACE, RIGHT_BRACE, COMMA, "expected name", &USE_CLAUSE_FIRST, |p| {
            if !p.at_set(&USE_CLAUSE_FIRST) {
                return false;
            }
            use_clause(p);
            true
        });
    } else if p.at(AS_KW) {
        let alias = p.start();
        p.advance();
        name(p);
        alias.complete(p, USE_ALIAS);
    }

    m.complete(p, USE_CLAUSE);
}
