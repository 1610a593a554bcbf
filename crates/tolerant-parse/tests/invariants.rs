//! Structural invariants of the tree, checked on fixed inputs and on random
//! input generated by proptest.

use std::fs;
use std::path::Path;

use proptest::prelude::*;
use text_size::{TextRange, TextSize};
use tolerant_parse::{Parse, parse_text};
use tolerant_syntax::SyntaxKind::{self, *};
use tolerant_syntax::{NodeOrToken, WalkEventWithTokens};

/// Checks every structural property of the tree built for `text` and
/// returns it for further inspection.
fn check_invariants(text: &str) -> Parse {
    let parse = parse_text(text);
    let root = parse.root();

    assert_eq!(root.kind(), SOURCE_FILE);
    assert!(root.parent().is_none());
    assert_eq!(root.text_range(), TextRange::up_to(TextSize::of(text)));
    assert_eq!(root.text(), text);

    let reconstructed = parse.tree().tokens().map(|token| token.text()).collect::<String>();
    assert_eq!(reconstructed, text);

    for node in root.descendants() {
        let mut len = TextSize::new(0);
        let mut children = 0;
        for child in node.children_with_tokens() {
            assert_eq!(child.parent(), Some(node), "{child:?} in {node:?}");
            assert_ne!(child, NodeOrToken::Node(root), "root is a child of {node:?}");
            len += child.text_len();
            children += 1;
        }
        assert!(children > 0, "{node:?} has no children");
        assert_eq!(len, node.text_len(), "{node:?} is not the sum of its children");
    }

    for token in parse.tree().tokens() {
        assert!(token.parent().children_with_tokens().any(|it| it == NodeOrToken::Token(token)));
    }

    let again = parse_text(root.text());
    assert_eq!(shape(&again), shape(&parse));
    assert_eq!(again.diagnostics(), parse.diagnostics());

    parse
}

fn shape(parse: &Parse) -> Vec<(SyntaxKind, TextRange)> {
    parse.root().descendants_with_tokens().map(|it| (it.kind(), it.text_range())).collect()
}

fn node_kinds(parse: &Parse) -> Vec<SyntaxKind> {
    parse.root().descendants().map(|node| node.kind()).collect()
}

fn max_depth(parse: &Parse) -> usize {
    let mut depth = 0;
    let mut max = 0;
    for event in parse.root().preorder_with_tokens() {
        match event {
            WalkEventWithTokens::EnterNode(_) => {
                depth += 1;
                max = max.max(depth);
            }
            WalkEventWithTokens::LeaveNode(_) => depth -= 1,
            WalkEventWithTokens::Token(_) => {}
        }
    }
    max
}

#[test]
fn minimal_valid_input() {
    let text = "<?php echo 1;";
    let parse = check_invariants(text);
    assert!(parse.diagnostics().is_empty(), "{:?}", parse.diagnostics());
    assert_eq!(parse.root().text_len(), TextSize::of(text));
}

#[test]
fn unclosed_group_at_eof() {
    let text = "<?php if ($a) { echo 1;";
    let parse = check_invariants(text);

    let [diagnostic] = parse.diagnostics() else {
        panic!("expected one diagnostic, got {:?}", parse.diagnostics());
    };
    assert_eq!(diagnostic.message(), "expected '}'");
    assert_eq!(diagnostic.range(), TextRange::empty(TextSize::of(text)));

    let missing = parse.tree().tokens().filter(|token| token.is_missing()).collect::<Vec<_>>();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].text_range(), TextRange::empty(TextSize::of(text)));
}

#[test]
fn unrecognized_run_is_wrapped_once() {
    let with_junk = check_invariants("<?php $a = 1;\x01\x02 $b = 2;");
    let clean = check_invariants("<?php $a = 1; $b = 2;");

    assert_eq!(with_junk.diagnostics().len(), 1);
    assert_eq!(with_junk.diagnostics()[0].message(), "unrecognized input");

    let errors = with_junk.root().descendants().filter(|node| node.kind() == ERROR).count();
    assert_eq!(errors, 1);

    let mut kinds = node_kinds(&with_junk);
    kinds.retain(|&kind| kind != ERROR);
    assert_eq!(kinds, node_kinds(&clean));

    let tokens = |parse: &Parse| {
        parse
            .tree()
            .tokens()
            .map(|token| token.kind())
            .filter(|&kind| kind != SKIPPED)
            .collect::<Vec<_>>()
    };
    assert_eq!(tokens(&with_junk), tokens(&clean));
}

#[test]
fn lookahead_across_long_unrecognized_run() {
    const RUN: usize = 50_000;
    let text = format!("<?php static{} $a;", " \x01".repeat(RUN));
    let parse = parse_text(&text);
    assert_eq!(parse.root().text(), text);

    assert_eq!(
        node_kinds(&parse),
        [SOURCE_FILE, INLINE_HTML_STMT, STATIC_VAR_STMT, ERROR, STATIC_VAR]
    );
    assert_eq!(parse.diagnostics().len(), RUN);
    assert!(parse.diagnostics().iter().all(|d| d.message() == "unrecognized input"));
}

#[test]
fn empty_input() {
    let parse = check_invariants("");
    assert!(parse.diagnostics().is_empty());
    assert_eq!(parse.root().text_len(), TextSize::new(0));

    let children = parse.root().children_with_tokens().collect::<Vec<_>>();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].kind(), EOF);
    assert_eq!(children[0].text_len(), TextSize::new(0));
}

#[test]
fn deeply_nested_parentheses() {
    const DEPTH: usize = 10_000;
    let text = format!("<?php {}1{};", "(".repeat(DEPTH), ")".repeat(DEPTH));
    let parse = check_invariants(&text);

    assert!(parse.diagnostics().is_empty());
    // SOURCE_FILE > EXPR_STMT > PAREN_EXPR * DEPTH > LITERAL
    assert_eq!(max_depth(&parse), DEPTH + 3);
}

#[test]
fn deeply_nested_blocks_and_unclosed_calls() {
    const DEPTH: usize = 5_000;

    let blocks = format!("<?php {}{}", "{".repeat(DEPTH), "}".repeat(DEPTH));
    assert!(check_invariants(&blocks).diagnostics().is_empty());

    let calls = format!("<?php {}", "f(".repeat(DEPTH));
    let parse = check_invariants(&calls);
    assert!(parse.diagnostics().iter().all(|d| d.offset() == TextSize::of(calls.as_str())));
}

#[test]
fn concurrent_parses() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Parse>();

    let inputs = ["<?php echo 1;", "<?php if ($a) {", "<b><?= $x ?></b>", "<?php class { ]"];
    let expected = inputs.map(|text| shape(&parse_text(text)));

    std::thread::scope(|scope| {
        let handles = inputs.map(|text| scope.spawn(move || shape(&check_invariants(text))));
        for (handle, expected) in handles.into_iter().zip(&expected) {
            assert_eq!(&handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn sample_files() {
    let test_data = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data");
    let mut paths = fs::read_dir(&test_data)
        .unwrap_or_else(|err| panic!("Cannot read directory {}: {err}", test_data.display()))
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            (path.extension()? == "php").then_some(path)
        })
        .collect::<Vec<_>>();
    paths.sort();
    assert!(!paths.is_empty());

    for path in paths {
        let text = fs::read_to_string(&path).unwrap();
        let parse = check_invariants(&text);
        assert!(
            parse.diagnostics().is_empty(),
            "{}: {:?}",
            path.display(),
            parse.diagnostics()
        );
    }
}

const FRAGMENTS: &[&str] = &[
    "<?php ", "<?= ", "<? ", "?>", "?>\n", "<b>", " ", "\n", "\t", "// c\n", "# c\n", "/* c */",
    "/** d */", "/*", "$a", "$", "$$b", "foo", "\\", "Foo\\Bar", "1", "0x1F", "1.5e3", "'s'",
    "\"d $a\"", "'", "\"", "`ls`", "<<<EOT\nx\nEOT\n", "<<<'N'\ny\nN;", "(", ")", "[", "]", "{",
    "}", ";", ",", ":", "::", "=", "=>", "->", "?->", "?", "??", "&", "...", "+", "-", "*", "**",
    ".", "!", "++", "===", "<=>", "(int)", "echo", "if", "else", "elseif", "endif", "while",
    "endwhile", "for", "foreach", "as", "switch", "case", "default", "break", "return", "try",
    "catch", "finally", "function", "fn", "class", "interface", "trait", "extends",
    "implements", "public", "static", "abstract", "readonly", "const", "use", "namespace", "new",
    "match", "yield", "list", "array", "isset", "global", "unset", "declare", "\x01", "\x00",
    "é", "\u{feff}",
];

fn php_like() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..64).prop_map(|parts| parts.concat())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn invariants_hold_for_php_like_input(text in php_like()) {
        check_invariants(&text);
    }

    #[test]
    fn invariants_hold_for_arbitrary_code(text in any::<String>()) {
        check_invariants(&format!("<?php {text}"));
    }

    #[test]
    fn invariants_hold_for_arbitrary_input(text in any::<String>()) {
        check_invariants(&text);
    }
}
