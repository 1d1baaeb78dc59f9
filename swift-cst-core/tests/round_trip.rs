use std::path::PathBuf;

use pretty_assertions::assert_eq;
use swift_cst_core::{parse, render};

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn assert_round_trip(text: &str) {
    let parsed = parse(text);
    assert_eq!(render(&parsed.tree), text);
}

#[test]
fn fixtures_render_back_byte_for_byte() {
    for name in [
        "fixtures/syntax_tour.swift",
        "fixtures/plain.swift",
        "fixtures/calculator_tests.swift",
        "fixtures/calculator_tests.expected.swift",
        "fixtures/expectation_tests.swift",
    ] {
        let text = std::fs::read_to_string(fixture(name)).expect("fixture should be readable");
        assert_round_trip(&text);
    }
}

#[test]
fn whitespace_and_line_endings_survive() {
    assert_round_trip("");
    assert_round_trip("\n\n\n");
    assert_round_trip("\t let a = 1 \t\r\n\r\nlet b = 2\r  ");
    assert_round_trip("func f() {\n\t\treturn\n}   // trailing\n");
}

#[test]
fn malformed_input_still_round_trips() {
    for text in [
        "class A {",
        "func f( {",
        "let s = \"unterminated",
        "/* never closed",
        "}}}",
        "let x = (1, [2, 3)",
        "XCTAssertEqual(a,",
        "let 🙂 = ☃︎",
        "import",
        "@",
    ] {
        assert_round_trip(text);
    }
}

#[test]
fn unicode_in_strings_comments_and_identifiers() {
    assert_round_trip("let café = \"naïve ✓\" // ünïcödé\n/* 日本語 */\n");
}
