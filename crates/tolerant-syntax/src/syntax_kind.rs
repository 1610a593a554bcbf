//! Token, trivia and node kinds.
//!
//! Kinds are laid out in groups: punctuation and literal tokens, keywords,
//! trivia, special tokens and finally node kinds. The predicates below rely on
//! that order.

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u16)]
pub enum SyntaxKind {
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACKET,
    RIGHT_BRACKET,
    LEFT_BRACE,
    RIGHT_BRACE,
    SEMICOLON,
    COMMA,
    COLON,
    COLON_COLON,
    ARROW,
    QUESTION_ARROW,
    FAT_ARROW,
    QUESTION,
    QUESTION_QUESTION,
    BACKSLASH,
    DOLLAR,
    ELLIPSIS,
    AT,

    EQ,
    PLUS_EQ,
    MINUS_EQ,
    STAR_EQ,
    SLASH_EQ,
    DOT_EQ,
    PERCENT_EQ,
    STAR_STAR_EQ,
    AMP_EQ,
    PIPE_EQ,
    CARET_EQ,
    SHL_EQ,
    SHR_EQ,
    QUESTION_QUESTION_EQ,

    EQ_EQ,
    EQ_EQ_EQ,
    BANG_EQ,
    BANG_EQ_EQ,
    LT,
    LT_EQ,
    GT,
    GT_EQ,
    SPACESHIP,

    PLUS,
    MINUS,
    STAR,
    SLASH,
    PERCENT,
    STAR_STAR,
    DOT,
    PLUS_PLUS,
    MINUS_MINUS,
    AMP,
    PIPE,
    CARET,
    TILDE,
    SHL,
    SHR,
    AMP_AMP,
    PIPE_PIPE,
    BANG,

    OPEN_TAG,
    OPEN_TAG_WITH_ECHO,
    CLOSE_TAG,
    INLINE_HTML,

    VARIABLE,
    NAME,
    INT_NUMBER,
    FLOAT_NUMBER,
    STRING,
    CAST,

    ABSTRACT_KW,
    AND_KW,
    ARRAY_KW,
    AS_KW,
    BREAK_KW,
    CASE_KW,
    CATCH_KW,
    CLASS_KW,
    CLONE_KW,
    CONST_KW,
    CONTINUE_KW,
    DECLARE_KW,
    DEFAULT_KW,
    DO_KW,
    ECHO_KW,
    ELSE_KW,
    ELSEIF_KW,
    EMPTY_KW,
    ENDFOR_KW,
    ENDFOREACH_KW,
    ENDIF_KW,
    ENDWHILE_KW,
    EXTENDS_KW,
    FINAL_KW,
    FINALLY_KW,
    FN_KW,
    FOR_KW,
    FOREACH_KW,
    FUNCTION_KW,
    GLOBAL_KW,
    IF_KW,
    IMPLEMENTS_KW,
    INCLUDE_KW,
    INCLUDE_ONCE_KW,
    INSTANCEOF_KW,
    INTERFACE_KW,
    ISSET_KW,
    LIST_KW,
    MATCH_KW,
    NAMESPACE_KW,
    NEW_KW,
    OR_KW,
    PRINT_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    PUBLIC_KW,
    READONLY_KW,
    REQUIRE_KW,
    REQUIRE_ONCE_KW,
    RETURN_KW,
    STATIC_KW,
    SWITCH_KW,
    THROW_KW,
    TRAIT_KW,
    TRY_KW,
    UNSET_KW,
    USE_KW,
    VAR_KW,
    WHILE_KW,
    XOR_KW,
    YIELD_KW,

    WHITESPACE,
    NEWLINE,
    LINE_COMMENT,
    BLOCK_COMMENT,
    DOC_COMMENT,

    /// Input the lexer or parser could not attach to any grammar rule.
    SKIPPED,
    /// Zero-width token standing in for required input that is absent.
    MISSING,
    EOF,
    TOMBSTONE,

    SOURCE_FILE,
    ERROR,

    INLINE_HTML_STMT,
    COMPOUND_STMT,
    STMT_LIST,
    EMPTY_STMT,
    EXPR_STMT,
    ECHO_STMT,
    IF_STMT,
    ELSE_IF_CLAUSE,
    ELSE_CLAUSE,
    WHILE_STMT,
    DO_STMT,
    FOR_STMT,
    FOREACH_STMT,
    FOREACH_KEY,
    SWITCH_STMT,
    SWITCH_BLOCK,
    CASE_CLAUSE,
    DEFAULT_CLAUSE,
    BREAK_STMT,
    CONTINUE_STMT,
    RETURN_STMT,
    THROW_STMT,
    TRY_STMT,
    CATCH_CLAUSE,
    FINALLY_CLAUSE,
    GLOBAL_STMT,
    STATIC_VAR_STMT,
    STATIC_VAR,
    UNSET_STMT,
    DECLARE_STMT,
    DECLARE_DIRECTIVE,

    FUNCTION_DECL,
    PARAM_LIST,
    PARAM,
    RETURN_TYPE,
    CLASS_DECL,
    INTERFACE_DECL,
    TRAIT_DECL,
    MODIFIER_LIST,
    EXTENDS_CLAUSE,
    IMPLEMENTS_CLAUSE,
    NAME_LIST,
    MEMBER_LIST,
    PROPERTY_DECL,
    PROPERTY_ELEMENT,
    METHOD_DECL,
    CLASS_CONST_DECL,
    CONST_ELEMENT,
    TRAIT_USE,
    NAMESPACE_DEF,
    NAMESPACE_USE,
    USE_CLAUSE,
    USE_ALIAS,
    CONST_DECL,

    NAMED_TYPE,
    NULLABLE_TYPE,
    UNION_TYPE,
    QUALIFIED_NAME,

    EXPR_LIST,
    LITERAL,
    VARIABLE_EXPR,
    NAME_EXPR,
    PAREN_EXPR,
    ARRAY_EXPR,
    ARRAY_ELEMENT,
    LIST_EXPR,
    ISSET_EXPR,
    EMPTY_EXPR,
    BINARY_EXPR,
    ASSIGN_EXPR,
    TERNARY_EXPR,
    PREFIX_EXPR,
    POSTFIX_EXPR,
    CAST_EXPR,
    NEW_EXPR,
    CLONE_EXPR,
    PRINT_EXPR,
    INCLUDE_EXPR,
    YIELD_EXPR,
    CALL_EXPR,
    ARG_LIST,
    ARG,
    MEMBER_ACCESS_EXPR,
    SCOPED_ACCESS_EXPR,
    SUBSCRIPT_EXPR,
    CLOSURE_EXPR,
    CLOSURE_USE,
    ARROW_FN_EXPR,
    MATCH_EXPR,
    MATCH_ARM,
}

impl SyntaxKind {
    /// Returns `true` for leaf kinds, including trivia and special tokens.
    #[inline]
    pub const fn is_token(self) -> bool {
        (self as u16) < (Self::SOURCE_FILE as u16)
    }

    /// Returns `true` for kinds produced by grammar rules.
    #[inline]
    pub const fn is_node(self) -> bool {
        !self.is_token()
    }

    #[inline]
    pub const fn is_keyword(self) -> bool {
        let kind = self as u16;
        kind >= Self::ABSTRACT_KW as u16 && kind <= Self::YIELD_KW as u16
    }

    #[inline]
    pub const fn is_trivia(self) -> bool {
        let kind = self as u16;
        kind >= Self::WHITESPACE as u16 && kind <= Self::DOC_COMMENT as u16
    }

    /// Returns `true` for tokens that may stand in for a name after `->`,
    /// `::`, `function` or `const`, where PHP accepts reserved words.
    #[inline]
    pub const fn is_name_like(self) -> bool {
        matches!(self, Self::NAME) || self.is_keyword()
    }

    /// Looks up a keyword, ignoring ASCII case like PHP does.
    pub fn from_keyword(ident: &str) -> Option<Self> {
        let mut buf = [0u8; 16];
        let bytes = ident.as_bytes();
        if bytes.len() > buf.len() {
            return None;
        }
        let lowered = &mut buf[..bytes.len()];
        lowered.copy_from_slice(bytes);
        lowered.make_ascii_lowercase();

        let kind = match &*lowered {
            b"abstract" => Self::ABSTRACT_KW,
            b"and" => Self::AND_KW,
            b"array" => Self::ARRAY_KW,
            b"as" => Self::AS_KW,
            b"break" => Self::BREAK_KW,
            b"case" => Self::CASE_KW,
            b"catch" => Self::CATCH_KW,
            b"class" => Self::CLASS_KW,
            b"clone" => Self::CLONE_KW,
            b"const" => Self::CONST_KW,
            b"continue" => Self::CONTINUE_KW,
            b"declare" => Self::DECLARE_KW,
            b"default" => Self::DEFAULT_KW,
            b"do" => Self::DO_KW,
            b"echo" => Self::ECHO_KW,
            b"else" => Self::ELSE_KW,
            b"elseif" => Self::ELSEIF_KW,
            b"empty" => Self::EMPTY_KW,
            b"endfor" => Self::ENDFOR_KW,
            b"endforeach" => Self::ENDFOREACH_KW,
            b"endif" => Self::ENDIF_KW,
            b"endwhile" => Self::ENDWHILE_KW,
            b"extends" => Self::EXTENDS_KW,
            b"final" => Self::FINAL_KW,
            b"finally" => Self::FINALLY_KW,
            b"fn" => Self::FN_KW,
            b"for" => Self::FOR_KW,
            b"foreach" => Self::FOREACH_KW,
            b"function" => Self::FUNCTION_KW,
            b"global" => Self::GLOBAL_KW,
            b"if" => Self::IF_KW,
            b"implements" => Self::IMPLEMENTS_KW,
            b"include" => Self::INCLUDE_KW,
            b"include_once" => Self::INCLUDE_ONCE_KW,
            b"instanceof" => Self::INSTANCEOF_KW,
            b"interface" => Self::INTERFACE_KW,
            b"isset" => Self::ISSET_KW,
            b"list" => Self::LIST_KW,
            b"match" => Self::MATCH_KW,
            b"namespace" => Self::NAMESPACE_KW,
            b"new" => Self::NEW_KW,
            b"or" => Self::OR_KW,
            b"print" => Self::PRINT_KW,
            b"private" => Self::PRIVATE_KW,
            b"protected" => Self::PROTECTED_KW,
            b"public" => Self::PUBLIC_KW,
            b"readonly" => Self::READONLY_KW,
            b"require" => Self::REQUIRE_KW,
            b"require_once" => Self::REQUIRE_ONCE_KW,
            b"return" => Self::RETURN_KW,
            b"static" => Self::STATIC_KW,
            b"switch" => Self::SWITCH_KW,
            b"throw" => Self::THROW_KW,
            b"trait" => Self::TRAIT_KW,
            b"try" => Self::TRY_KW,
            b"unset" => Self::UNSET_KW,
            b"use" => Self::USE_KW,
            b"var" => Self::VAR_KW,
            b"while" => Self::WHILE_KW,
            b"xor" => Self::XOR_KW,
            b"yield" => Self::YIELD_KW,
            _ => return None,
        };
        Some(kind)
    }

    /// Human readable name used in diagnostics, e.g. `';'` or `variable`.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::LEFT_PAREN => "'('",
            Self::RIGHT_PAREN => "')'",
            Self::LEFT_BRACKET => "'['",
            Self::RIGHT_BRACKET => "']'",
            Self::LEFT_BRACE => "'{'",
            Self::RIGHT_BRACE => "'}'",
            Self::SEMICOLON => "';'",
            Self::COMMA => "','",
            Self::COLON => "':'",
            Self::COLON_COLON => "'::'",
            Self::ARROW => "'->'",
            Self::QUESTION_ARROW => "'?->'",
            Self::FAT_ARROW => "'=>'",
            Self::QUESTION => "'?'",
            Self::QUESTION_QUESTION => "'??'",
            Self::BACKSLASH => "'\\'",
            Self::DOLLAR => "'$'",
            Self::ELLIPSIS => "'...'",
            Self::AT => "'@'",
            Self::EQ => "'='",
            Self::PLUS_EQ => "'+='",
            Self::MINUS_EQ => "'-='",
            Self::STAR_EQ => "'*='",
            Self::SLASH_EQ => "'/='",
            Self::DOT_EQ => "'.='",
            Self::PERCENT_EQ => "'%='",
            Self::STAR_STAR_EQ => "'**='",
            Self::AMP_EQ => "'&='",
            Self::PIPE_EQ => "'|='",
            Self::CARET_EQ => "'^='",
            Self::SHL_EQ => "'<<='",
            Self::SHR_EQ => "'>>='",
            Self::QUESTION_QUESTION_EQ => "'??='",
            Self::EQ_EQ => "'=='",
            Self::EQ_EQ_EQ => "'==='",
            Self::BANG_EQ => "'!='",
            Self::BANG_EQ_EQ => "'!=='",
            Self::LT => "'<'",
            Self::LT_EQ => "'<='",
            Self::GT => "'>'",
            Self::GT_EQ => "'>='",
            Self::SPACESHIP => "'<=>'",
            Self::PLUS => "'+'",
            Self::MINUS => "'-'",
            Self::STAR => "'*'",
            Self::SLASH => "'/'",
            Self::PERCENT => "'%'",
            Self::STAR_STAR => "'**'",
            Self::DOT => "'.'",
            Self::PLUS_PLUS => "'++'",
            Self::MINUS_MINUS => "'--'",
            Self::AMP => "'&'",
            Self::PIPE => "'|'",
            Self::CARET => "'^'",
            Self::TILDE => "'~'",
            Self::SHL => "'<<'",
            Self::SHR => "'>>'",
            Self::AMP_AMP => "'&&'",
            Self::PIPE_PIPE => "'||'",
            Self::BANG => "'!'",
            Self::OPEN_TAG => "'<?php'",
            Self::OPEN_TAG_WITH_ECHO => "'<?='",
            Self::CLOSE_TAG => "'?>'",
            Self::INLINE_HTML => "inline HTML",
            Self::VARIABLE => "variable",
            Self::NAME => "name",
            Self::INT_NUMBER => "integer literal",
            Self::FLOAT_NUMBER => "float literal",
            Self::STRING => "string literal",
            Self::CAST => "cast",
            Self::ABSTRACT_KW => "'abstract'",
            Self::AND_KW => "'and'",
            Self::ARRAY_KW => "'array'",
            Self::AS_KW => "'as'",
            Self::BREAK_KW => "'break'",
            Self::CASE_KW => "'case'",
            Self::CATCH_KW => "'catch'",
            Self::CLASS_KW => "'class'",
            Self::CLONE_KW => "'clone'",
            Self::CONST_KW => "'const'",
            Self::CONTINUE_KW => "'continue'",
            Self::DECLARE_KW => "'declare'",
            Self::DEFAULT_KW => "'default'",
            Self::DO_KW => "'do'",
            Self::ECHO_KW => "'echo'",
            Self::ELSE_KW => "'else'",
            Self::ELSEIF_KW => "'elseif'",
            Self::EMPTY_KW => "'empty'",
            Self::ENDFOR_KW => "'endfor'",
            Self::ENDFOREACH_KW => "'endforeach'",
            Self::ENDIF_KW => "'endif'",
            Self::ENDWHILE_KW => "'endwhile'",
            Self::EXTENDS_KW => "'extends'",
            Self::FINAL_KW => "'final'",
            Self::FINALLY_KW => "'finally'",
            Self::FN_KW => "'fn'",
            Self::FOR_KW => "'for'",
            Self::FOREACH_KW => "'foreach'",
            Self::FUNCTION_KW => "'function'",
            Self::GLOBAL_KW => "'global'",
            Self::IF_KW => "'if'",
            Self::IMPLEMENTS_KW => "'implements'",
            Self::INCLUDE_KW => "'include'",
            Self::INCLUDE_ONCE_KW => "'include_once'",
            Self::INSTANCEOF_KW => "'instanceof'",
            Self::INTERFACE_KW => "'interface'",
            Self::ISSET_KW => "'isset'",
            Self::LIST_KW => "'list'",
            Self::MATCH_KW => "'match'",
            Self::NAMESPACE_KW => "'namespace'",
            Self::NEW_KW => "'new'",
            Self::OR_KW => "'or'",
            Self::PRINT_KW => "'print'",
            Self::PRIVATE_KW => "'private'",
            Self::PROTECTED_KW => "'protected'",
            Self::PUBLIC_KW => "'public'",
            Self::READONLY_KW => "'readonly'",
            Self::REQUIRE_KW => "'require'",
            Self::REQUIRE_ONCE_KW => "'require_once'",
            Self::RETURN_KW => "'return'",
            Self::STATIC_KW => "'static'",
            Self::SWITCH_KW => "'switch'",
            Self::THROW_KW => "'throw'",
            Self::TRAIT_KW => "'trait'",
            Self::TRY_KW => "'try'",
            Self::UNSET_KW => "'unset'",
            Self::USE_KW => "'use'",
            Self::VAR_KW => "'var'",
            Self::WHILE_KW => "'while'",
            Self::XOR_KW => "'xor'",
            Self::YIELD_KW => "'yield'",
            Self::WHITESPACE | Self::NEWLINE => "whitespace",
            Self::LINE_COMMENT | Self::BLOCK_COMMENT | Self::DOC_COMMENT => "comment",
            Self::SKIPPED => "unrecognized input",
            Self::MISSING => "missing token",
            Self::EOF => "end of file",
            _ => "syntax node",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_ignore_case() {
        assert_eq!(SyntaxKind::from_keyword("function"), Some(SyntaxKind::FUNCTION_KW));
        assert_eq!(SyntaxKind::from_keyword("FUNCTION"), Some(SyntaxKind::FUNCTION_KW));
        assert_eq!(SyntaxKind::from_keyword("ElseIf"), Some(SyntaxKind::ELSEIF_KW));
        assert_eq!(SyntaxKind::from_keyword("functions"), None);
        assert_eq!(SyntaxKind::from_keyword("a_name_that_is_far_too_long"), None);
    }

    #[test]
    fn groups_do_not_overlap() {
        assert!(SyntaxKind::SEMICOLON.is_token());
        assert!(!SyntaxKind::SEMICOLON.is_keyword());
        assert!(SyntaxKind::YIELD_KW.is_keyword());
        assert!(SyntaxKind::YIELD_KW.is_token());
        assert!(!SyntaxKind::WHITESPACE.is_keyword());
        assert!(SyntaxKind::DOC_COMMENT.is_trivia());
        assert!(!SyntaxKind::SKIPPED.is_trivia());
        assert!(SyntaxKind::TOMBSTONE.is_token());
        assert!(SyntaxKind::SOURCE_FILE.is_node());
        assert!(SyntaxKind::MATCH_ARM.is_node());
    }
}
