use std::fmt::Write as _;

use expect_test::{Expect, expect};
use tolerant_syntax::SyntaxKind::{self, *};

use crate::{
    LexConfig, ParseConfig, ParseError, check_len, parse, parse_bytes_with_config, parse_text,
    parse_with_config,
};

fn check(text: &str, expect: Expect) {
    let parse = parse_text(text);
    let mut actual = parse.debug_tree();
    for diagnostic in parse.diagnostics() {
        writeln!(actual, "{diagnostic}").unwrap();
    }
    expect.assert_eq(&actual);
}

fn node_kinds(text: &str) -> Vec<SyntaxKind> {
    parse_text(text).root().descendants().map(|node| node.kind()).collect()
}

fn messages(text: &str) -> Vec<String> {
    parse_text(text).diagnostics().iter().map(|d| d.message().to_owned()).collect()
}

#[test]
fn echo_statement() {
    check(
        "<?php echo 1;",
        expect![[r#"
            SOURCE_FILE@0..13
              INLINE_HTML_STMT@0..5
                OPEN_TAG@0..5 "<?php"
              ECHO_STMT@5..13
                WHITESPACE@5..6 " "
                ECHO_KW@6..10 "echo"
                EXPR_LIST@10..12
                  LITERAL@10..12
                    WHITESPACE@10..11 " "
                    INT_NUMBER@11..12 "1"
                SEMICOLON@12..13 ";"
              EOF@13..13 ""
        "#]],
    );
}

#[test]
fn echo_tag_and_inline_html() {
    check(
        "a<?= $b ?>c",
        expect![[r#"
            SOURCE_FILE@0..11
              INLINE_HTML_STMT@0..4
                INLINE_HTML@0..1 "a"
                OPEN_TAG_WITH_ECHO@1..4 "<?="
              ECHO_STMT@4..7
                EXPR_LIST@4..7
                  VARIABLE_EXPR@4..7
                    WHITESPACE@4..5 " "
                    VARIABLE@5..7 "$b"
              INLINE_HTML_STMT@7..11
                WHITESPACE@7..8 " "
                CLOSE_TAG@8..10 "?>"
                INLINE_HTML@10..11 "c"
              EOF@11..11 ""
        "#]],
    );
}

#[test]
fn binary_precedence() {
    check(
        "<?php $a + $b * $c;",
        expect![[r#"
            SOURCE_FILE@0..19
              INLINE_HTML_STMT@0..5
                OPEN_TAG@0..5 "<?php"
              EXPR_STMT@5..19
                BINARY_EXPR@5..18
                  VARIABLE_EXPR@5..8
                    WHITESPACE@5..6 " "
                    VARIABLE@6..8 "$a"
                  WHITESPACE@8..9 " "
                  PLUS@9..10 "+"
                  BINARY_EXPR@10..18
                    VARIABLE_EXPR@10..13
                      WHITESPACE@10..11 " "
                      VARIABLE@11..13 "$b"
                    WHITESPACE@13..14 " "
                    STAR@14..15 "*"
                    VARIABLE_EXPR@15..18
                      WHITESPACE@15..16 " "
                      VARIABLE@16..18 "$c"
                SEMICOLON@18..19 ";"
              EOF@19..19 ""
        "#]],
    );
}

#[test]
fn function_declaration() {
    check(
        "<?php function f($x) { return $x; }",
        expect![[r#"
            SOURCE_FILE@0..35
              INLINE_HTML_STMT@0..5
                OPEN_TAG@0..5 "<?php"
              FUNCTION_DECL@5..35
                WHITESPACE@5..6 " "
                FUNCTION_KW@6..14 "function"
                WHITESPACE@14..15 " "
                NAME@15..16 "f"
                PARAM_LIST@16..20
                  LEFT_PAREN@16..17 "("
                  PARAM@17..19
                    VARIABLE@17..19 "$x"
                  RIGHT_PAREN@19..20 ")"
                COMPOUND_STMT@20..35
                  WHITESPACE@20..21 " "
                  LEFT_BRACE@21..22 "{"
                  RETURN_STMT@22..33
                    WHITESPACE@22..23 " "
                    RETURN_KW@23..29 "return"
                    VARIABLE_EXPR@29..32
                      WHITESPACE@29..30 " "
                      VARIABLE@30..32 "$x"
                    SEMICOLON@32..33 ";"
                  WHITESPACE@33..34 " "
                  RIGHT_BRACE@34..35 "}"
              EOF@35..35 ""
        "#]],
    );
}

#[test]
fn class_with_property() {
    check(
        "<?php class A { public $b = 1; }",
        expect![[r#"
            SOURCE_FILE@0..32
              INLINE_HTML_STMT@0..5
                OPEN_TAG@0..5 "<?php"
              CLASS_DECL@5..32
                WHITESPACE@5..6 " "
                CLASS_KW@6..11 "class"
                WHITESPACE@11..12 " "
                NAME@12..13 "A"
                MEMBER_LIST@13..32
                  WHITESPACE@13..14 " "
                  LEFT_BRACE@14..15 "{"
                  PROPERTY_DECL@15..30
                    MODIFIER_LIST@15..22
                      WHITESPACE@15..16 " "
                      PUBLIC_KW@16..22 "public"
                    PROPERTY_ELEMENT@22..29
                      WHITESPACE@22..23 " "
                      VARIABLE@23..25 "$b"
                      WHITESPACE@25..26 " "
                      EQ@26..27 "="
                      LITERAL@27..29
                        WHITESPACE@27..28 " "
                        INT_NUMBER@28..29 "1"
                    SEMICOLON@29..30 ";"
                  WHITESPACE@30..31 " "
                  RIGHT_BRACE@31..32 "}"
              EOF@32..32 ""
        "#]],
    );
}

#[test]
fn alternative_if_syntax() {
    check(
        "<?php if ($a): ?>x<?php endif;",
        expect![[r#"
            SOURCE_FILE@0..30
              INLINE_HTML_STMT@0..5
                OPEN_TAG@0..5 "<?php"
              IF_STMT@5..30
                WHITESPACE@5..6 " "
                IF_KW@6..8 "if"
                WHITESPACE@8..9 " "
                LEFT_PAREN@9..10 "("
                VARIABLE_EXPR@10..12
                  VARIABLE@10..12 "$a"
                RIGHT_PAREN@12..13 ")"
                COLON@13..14 ":"
                STMT_LIST@14..23
                  INLINE_HTML_STMT@14..23
                    WHITESPACE@14..15 " "
                    CLOSE_TAG@15..17 "?>"
                    INLINE_HTML@17..18 "x"
                    OPEN_TAG@18..23 "<?php"
                WHITESPACE@23..24 " "
                ENDIF_KW@24..29 "endif"
                SEMICOLON@29..30 ";"
              EOF@30..30 ""
        "#]],
    );
}

#[test]
fn missing_semicolon_at_eof() {
    check(
        "<?php $a = 1",
        expect![[r#"
            SOURCE_FILE@0..12
              INLINE_HTML_STMT@0..5
                OPEN_TAG@0..5 "<?php"
              EXPR_STMT@5..12
                ASSIGN_EXPR@5..12
                  VARIABLE_EXPR@5..8
                    WHITESPACE@5..6 " "
                    VARIABLE@6..8 "$a"
                  WHITESPACE@8..9 " "
                  EQ@9..10 "="
                  LITERAL@10..12
                    WHITESPACE@10..11 " "
                    INT_NUMBER@11..12 "1"
                MISSING@12..12 ""
              EOF@12..12 ""
            error@12..12: expected ';'
        "#]],
    );
}

#[test]
fn missing_expression() {
    check(
        "<?php $a = ;",
        expect![[r#"
            SOURCE_FILE@0..12
              INLINE_HTML_STMT@0..5
                OPEN_TAG@0..5 "<?php"
              EXPR_STMT@5..12
                ASSIGN_EXPR@5..10
                  VARIABLE_EXPR@5..8
                    WHITESPACE@5..6 " "
                    VARIABLE@6..8 "$a"
                  WHITESPACE@8..9 " "
                  EQ@9..10 "="
                  MISSING@10..10 ""
                WHITESPACE@10..11 " "
                SEMICOLON@11..12 ";"
              EOF@12..12 ""
            error@10..10: expected expression
        "#]],
    );
}

#[test]
fn unexpected_token_becomes_error_node() {
    check(
        "<?php ) $a;",
        expect![[r#"
            SOURCE_FILE@0..11
              INLINE_HTML_STMT@0..5
                OPEN_TAG@0..5 "<?php"
              ERROR@5..7
                WHITESPACE@5..6 " "
                RIGHT_PAREN@6..7 ")"
              EXPR_STMT@7..11
                VARIABLE_EXPR@7..10
                  WHITESPACE@7..8 " "
                  VARIABLE@8..10 "$a"
                SEMICOLON@10..11 ";"
              EOF@11..11 ""
            error@6..7: unexpected ')'
        "#]],
    );
}

#[test]
fn unrecognized_input_is_skipped() {
    check(
        "<?php\n\x01 $a;",
        expect![[r#"
            SOURCE_FILE@0..11
              INLINE_HTML_STMT@0..7
                OPEN_TAG@0..5 "<?php"
                ERROR@5..7
                  NEWLINE@5..6 "\n"
                  SKIPPED@6..7 "\u{1}"
              EXPR_STMT@7..11
                VARIABLE_EXPR@7..10
                  WHITESPACE@7..8 " "
                  VARIABLE@8..10 "$a"
                SEMICOLON@10..11 ";"
              EOF@11..11 ""
            error@6..7: unrecognized input
        "#]],
    );
}

#[test]
fn assignment_binds_to_nearest_operand() {
    let kinds = node_kinds("<?php if (!$a = f()) {}");
    let prefix = kinds.iter().position(|&kind| kind == PREFIX_EXPR).unwrap();
    assert_eq!(kinds[prefix + 1], ASSIGN_EXPR);

    let kinds = node_kinds("<?php $x = $a and $b;");
    assert_eq!(&kinds[2..4], &[EXPR_STMT, BINARY_EXPR]);
    assert_eq!(kinds[4], ASSIGN_EXPR);
}

#[test]
fn postfix_chains() {
    let kinds = node_kinds("<?php $a->b()[0]::C;");
    assert_eq!(
        &kinds[2..],
        &[
            EXPR_STMT,
            SCOPED_ACCESS_EXPR,
            SUBSCRIPT_EXPR,
            CALL_EXPR,
            MEMBER_ACCESS_EXPR,
            VARIABLE_EXPR,
            ARG_LIST,
            LITERAL,
        ]
    );
}

#[test]
fn expressions_without_errors() {
    for text in [
        "<?php $a ? $b : $c;",
        "<?php $a ?: $b ?? $c;",
        "<?php $a = &$b;",
        "<?php $f = fn($x) => $x * 2;",
        "<?php $f = static function () use (&$a, $b): int { return 1; };",
        "<?php $o = new class(1) extends B implements C {};",
        "<?php $o = new Foo;",
        "<?php $r = match ($x) { 1, 2 => 'a', default => 'b', };",
        "<?php [$a, , $b] = $c;",
        "<?php list('k' => $v) = $c;",
        "<?php $a = array(1, 'k' => 2, ...$rest);",
        "<?php isset($a, $b['c']) && empty($d);",
        "<?php f(name: 1, ...$args); strlen(...);",
        "<?php $$a; ${'b'}; $c->$d; $e->{'f'};",
        "<?php (int) $a; clone $b; print $c; @f();",
        "<?php include 'a.php'; require_once __DIR__ . '/b.php';",
        "<?php function g() { yield; yield 1; yield 'k' => 2; yield from h(); }",
        "<?php $a instanceof \\Foo\\Bar;",
        "<?php -2 ** 2; $i++; --$j;",
    ] {
        assert_eq!(messages(text), Vec::<String>::new(), "{text}");
    }
}

#[test]
fn statements_without_errors() {
    for text in [
        "<?php while ($a) { break; } while ($b): continue 2; endwhile;",
        "<?php do { $a--; } while ($a > 0);",
        "<?php for ($i = 0, $j = 1; $i < 10; $i++) {} for (;;): endfor;",
        "<?php foreach ($a as $k => &$v) {} foreach ($a as $v): endforeach;",
        "<?php switch ($a) { case 1: case 2; echo 1; break; default: }",
        "<?php try { f(); } catch (A|B $e) { } catch (C) { } finally { }",
        "<?php global $a, $b; static $c = 1, $d; unset($a, $b);",
        "<?php declare(strict_types=1); declare(ticks=1) { }",
        "<?php if ($a) f(); elseif ($b) g(); else { h(); }",
        "<?php if ($a): elseif ($b): else: endif;",
        "<?php throw new E(); return;",
        "<?php namespace A\\B; use C\\D as E, function F\\g; use const H\\I;",
        "<?php namespace { } namespace N { }",
        "<?php use A\\{B, C as D, function e};",
        "<?php const A = 1, B = 2;",
        "<?php interface I extends J, K { public function f(): ?int; const C = 1; }",
        "<?php trait T { use U, V; private static $x; }",
        "<?php abstract class A { abstract protected function f(int|string $a = 1, ...$b): static; }",
        "<?php final readonly class P { public function __construct(private readonly int $x) {} }",
        "<?php class C { var $a; public ?\\Foo $b, $c = []; public function list() {} }",
        "<?php echo 1 ?>text<?php echo 2;",
        "text only",
    ] {
        assert_eq!(messages(text), Vec::<String>::new(), "{text}");
    }
}

#[test]
fn recovery_messages() {
    assert_eq!(messages("<?php try { }"), ["expected 'catch'"]);
    assert_eq!(messages("<?php if ($a"), ["expected ')'", "expected statement"]);
    assert_eq!(messages("<?php function f( {}"), ["expected ')'"]);
    assert_eq!(messages("<?php switch ($a) { echo 1; }"), ["expected 'case' or 'default'"]);
    assert_eq!(messages("<?php class A { public }"), ["expected property, method or constant"]);
    assert_eq!(messages("<?php class A { 1; }"), ["unexpected integer literal"]);
    assert_eq!(messages("<?php f(,);"), ["expected argument"]);
    assert_eq!(messages("<?php echo 'a"), ["unterminated string literal", "expected ';'"]);
}

#[test]
fn diagnostics_are_in_source_order() {
    let parse = parse_text("<?php $a = ; f(; class { }");
    let offsets = parse.diagnostics().iter().map(|d| d.offset()).collect::<Vec<_>>();
    assert!(offsets.len() >= 3, "{offsets:?}");
    assert!(offsets.is_sorted(), "{offsets:?}");
}

#[test]
fn close_tag_terminates_statement() {
    let parse = parse_text("<?php echo 1 ?>\n<b><?php $x ?>");
    assert!(!parse.has_errors(), "{:?}", parse.diagnostics());

    let close = parse.tree().tokens().find(|token| token.kind() == CLOSE_TAG).unwrap();
    assert_eq!(close.text_trimmed(), "?>\n");
    assert_eq!(close.parent().kind(), INLINE_HTML_STMT);
}

#[test]
fn short_open_tag_config() {
    let text = "<? echo 1;";
    assert!(!parse_text(text).has_errors());
    assert_eq!(node_kinds(text)[2], ECHO_STMT);

    let config = ParseConfig { lex: LexConfig { short_open_tag: false } };
    let parse = parse_with_config(text, config);
    assert!(parse.diagnostics().is_empty());
    let kinds = parse.root().children_with_tokens().map(|it| it.kind()).collect::<Vec<_>>();
    assert_eq!(kinds, [INLINE_HTML_STMT, EOF]);
}

#[test]
fn rejects_invalid_utf8() {
    assert_eq!(parse(b"<?php \xff").unwrap_err(), ParseError::InvalidUtf8 { valid_up_to: 6 });
    assert_eq!(parse(b"<?php 1;").unwrap().root().text(), "<?php 1;");
}

#[test]
fn bytes_with_config() {
    let config = ParseConfig { lex: LexConfig { short_open_tag: false } };
    let parse = parse_bytes_with_config(b"<? echo 1; ?>", config).unwrap();
    assert!(parse.diagnostics().is_empty());
    let kinds = parse.root().children().map(|node| node.kind()).collect::<Vec<_>>();
    assert_eq!(kinds, [INLINE_HTML_STMT]);

    assert_eq!(
        parse_bytes_with_config(b"\xc3", config).unwrap_err(),
        ParseError::InvalidUtf8 { valid_up_to: 0 }
    );
}

#[test]
#[cfg(target_pointer_width = "64")]
fn rejects_oversized_input() {
    let len = u32::MAX as usize + 1;
    assert_eq!(check_len(len), Err(ParseError::TooLarge { len }));
    assert_eq!(check_len(u32::MAX as usize), Ok(()));
    assert_eq!(
        ParseError::TooLarge { len }.to_string(),
        "source is 4294967296 bytes long, offsets are limited to 4 GiB"
    );
}

#[test]
fn into_parts_keeps_tree_and_diagnostics() {
    let (tree, diagnostics) = parse_text("<?php echo").into_parts();
    assert_eq!(tree.root().text(), "<?php echo");
    assert_eq!(
        diagnostics.iter().map(|d| d.message()).collect::<Vec<_>>(),
        ["expected expression", "expected ';'"]
    );
}
