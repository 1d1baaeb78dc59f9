//! Legacy assertion calls to `#expect` and `Issue.record`.

use swift_cst_core::ast::{is_empty_string_literal, Argument, AstNode, CallExpr};
use swift_cst_core::make;
use swift_cst_core::SyntaxKind::*;
use swift_cst_core::SyntaxNode;
use tracing::trace;

/// One entry of the translation table: a callee name and the builder that
/// produces its replacement. Builders return `None` to leave a call alone.
struct AssertionRule {
    name: &'static str,
    build: fn(CallExpr<'_>) -> Option<SyntaxNode>,
}

const RULES: &[AssertionRule] = &[
    AssertionRule {
        name: "XCTAssertEqual",
        build: assert_equal,
    },
    AssertionRule {
        name: "XCTAssertTrue",
        build: assert_true,
    },
    AssertionRule {
        name: "XCTAssertFalse",
        build: assert_false,
    },
    AssertionRule {
        name: "XCTAssertNil",
        build: assert_nil,
    },
    AssertionRule {
        name: "XCTAssertNotNil",
        build: assert_not_nil,
    },
    AssertionRule {
        name: "XCTAssertThrowsError",
        build: assert_throws_error,
    },
    AssertionRule {
        name: "XCTFail",
        build: fail,
    },
];

/// Operators whose presence, surrounded by spaces, marks a condition as
/// already boolean.
const CONDITION_OPERATORS: &[&str] = &[
    ">", "<", ">=", "<=", "==", "!=", "&&", "||", "+", "-", "*", "/", "%", "!",
];

/// Infix operators that bind no tighter than `==`. An operand using one
/// of them is parenthesized before it is spliced next to `==` or `!=`.
const LOOSE_OPERATORS: &[&str] = &[
    "?", "==", "!=", "===", "!==", "<", ">", "<=", ">=", "~=", "&&", "||",
];

/// Rewrite `node` if it is a call with a rule. Anything else comes back
/// unchanged.
pub fn rewrite_assertion(node: SyntaxNode) -> SyntaxNode {
    match build_replacement(&node) {
        Some(replacement) => {
            trace!(from = %node.trimmed_text(), to = %replacement.trimmed_text(), "rewrote assertion");
            replacement.with_trivia_from(&node)
        }
        None => node,
    }
}

fn build_replacement(node: &SyntaxNode) -> Option<SyntaxNode> {
    let call = CallExpr::cast(node)?;
    if call.trailing_closures().next().is_some() {
        return None;
    }
    let callee = call.callee_text();
    let rule = RULES.iter().find(|rule| rule.name == callee)?;
    (rule.build)(call)
}

/// Whether a boolean assertion's condition needs an explicit `== true` or
/// `== false`. Operator expressions are already conditions; the text scan
/// catches operator forms that are nested deeper than the top node.
pub fn needs_explicit_bool_comparison(expr: &SyntaxNode) -> bool {
    if matches!(expr.kind(), BINARY_EXPR | PREFIX_EXPR) {
        return false;
    }
    !mentions_condition_operator(&expr.trimmed_text())
}

fn mentions_condition_operator(text: &str) -> bool {
    CONDITION_OPERATORS.iter().any(|op| {
        text.contains(&format!(" {op} ")) || text.starts_with(&format!("{op} "))
    })
}

/// Whether a flat operator sequence holds a ternary, an assignment, or an
/// operator at comparison precedence or below.
fn binds_loosely(expr: &SyntaxNode) -> bool {
    if expr.kind() != BINARY_EXPR {
        return false;
    }
    expr.children()
        .iter()
        .filter_map(|child| child.as_token())
        .any(|token| match token.kind() {
            EQ | COLON => true,
            BINARY_OPERATOR => {
                let op = token.text();
                LOOSE_OPERATORS.contains(&op) || op.ends_with('=')
            }
            _ => false,
        })
}

/// `operand` wrapped in parentheses when it would otherwise regroup next to
/// an equality operator. Surrounding trivia stays outside the parentheses.
fn grouped(operand: SyntaxNode) -> SyntaxNode {
    if !binds_loosely(&operand) {
        return operand;
    }
    let leading = operand.leading_trivia();
    let trailing = operand.trailing_trivia();
    let bare = operand
        .with_leading_trivia(Default::default())
        .with_trailing_trivia(Default::default());
    make::parenthesized(bare)
        .with_leading_trivia(leading)
        .with_trailing_trivia(trailing)
}

fn assert_equal(call: CallExpr<'_>) -> Option<SyntaxNode> {
    let arguments = call.arguments();
    if arguments.len() < 2
        || arguments
            .iter()
            .any(|argument| argument.label().is_some_and(|label| label.text() == "accuracy"))
    {
        return None;
    }
    let lhs = operand(arguments[0])?;
    let rhs = operand(arguments[1])?;
    let condition = match empty_string_equality(&lhs, &rhs) {
        Some(is_empty) => make::binary(is_empty, "==", make::bool_literal(true)),
        None => make::binary(grouped(lhs), "==", grouped(rhs)),
    };
    Some(expect(condition))
}

fn assert_true(call: CallExpr<'_>) -> Option<SyntaxNode> {
    assert_boolean(call, true)
}

fn assert_false(call: CallExpr<'_>) -> Option<SyntaxNode> {
    assert_boolean(call, false)
}

fn assert_boolean(call: CallExpr<'_>, expected: bool) -> Option<SyntaxNode> {
    let condition = operand(*call.arguments().first()?)?;
    let condition = replace_empty_string_comparison(&condition).unwrap_or(condition);

    let condition = if needs_explicit_bool_comparison(&condition) {
        make::binary(condition, "==", make::bool_literal(expected))
    } else if expected {
        condition
    } else {
        let leading = condition.leading_trivia();
        let wrapped = make::parenthesized(condition.with_leading_trivia(Default::default()));
        make::binary(wrapped.with_leading_trivia(leading), "==", make::bool_literal(false))
    };
    Some(expect(condition))
}

fn assert_nil(call: CallExpr<'_>) -> Option<SyntaxNode> {
    let value = operand(*call.arguments().first()?)?;
    Some(expect(make::binary(grouped(value), "==", make::nil_literal())))
}

fn assert_not_nil(call: CallExpr<'_>) -> Option<SyntaxNode> {
    let value = operand(*call.arguments().first()?)?;
    Some(expect(make::binary(grouped(value), "!=", make::nil_literal())))
}

/// `#expect(throws: (any Error).self) { expr }`
fn assert_throws_error(call: CallExpr<'_>) -> Option<SyntaxNode> {
    let body = operand(*call.arguments().first()?)?;
    let error_type = make::expr_from_text("(any Error).self")?;
    let expect = make::macro_call("expect", [make::argument(Some("throws"), error_type)]);
    Some(expect.insert_child(usize::MAX, make::inline_closure(body)))
}

/// `Issue.record(...)` with the original arguments.
fn fail(call: CallExpr<'_>) -> Option<SyntaxNode> {
    let arguments = call.arg_list()?.clone();
    let callee = make::member_access(make::name_expr("Issue"), "record");
    Some(make::call(callee, arguments))
}

fn expect(condition: SyntaxNode) -> SyntaxNode {
    make::macro_call("expect", [make::argument(None, condition)])
}

/// The value of an unlabeled argument, without the whitespace that sat
/// before the following `,` or `)`.
fn operand(argument: Argument<'_>) -> Option<SyntaxNode> {
    if argument.label().is_some() {
        return None;
    }
    let expr = argument.expr()?.clone();
    let trailing = expr.trailing_trivia().trim_end_whitespace();
    Some(expr.with_trailing_trivia(trailing))
}

/// `x == ""` or `"" == x` as `x.isEmpty`.
fn replace_empty_string_comparison(expr: &SyntaxNode) -> Option<SyntaxNode> {
    if expr.kind() != BINARY_EXPR {
        return None;
    }
    let elements = expr.children();
    let [lhs, op, rhs] = elements else {
        return None;
    };
    if op.as_token()?.text() != "==" {
        return None;
    }
    let leading = expr.leading_trivia();
    let is_empty = empty_string_equality(lhs.as_node()?, rhs.as_node()?)?;
    Some(is_empty.with_leading_trivia(leading))
}

fn empty_string_equality(lhs: &SyntaxNode, rhs: &SyntaxNode) -> Option<SyntaxNode> {
    if is_empty_string_literal(lhs) {
        Some(is_empty(rhs))
    } else if is_empty_string_literal(rhs) {
        Some(is_empty(lhs))
    } else {
        None
    }
}

/// `base.isEmpty`, parenthesizing operator expressions.
fn is_empty(base: &SyntaxNode) -> SyntaxNode {
    let base = base
        .clone()
        .with_leading_trivia(Default::default())
        .with_trailing_trivia(Default::default());
    let base = if matches!(base.kind(), BINARY_EXPR | PREFIX_EXPR | TRY_EXPR | AWAIT_EXPR) {
        make::parenthesized(base)
    } else {
        base
    };
    make::member_access(base, "isEmpty")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use swift_cst_core::{parse, render, SyntaxElement};

    fn rewrite(source: &str) -> String {
        let parse = parse(source);
        assert!(!parse.has_errors(), "{source:?}: {:?}", parse.errors);
        let children = parse
            .tree
            .into_children()
            .into_iter()
            .map(|child| match child {
                SyntaxElement::Node(node) if node.kind() == CALL_EXPR => {
                    rewrite_assertion(node).into()
                }
                other => other,
            })
            .collect();
        render(&SyntaxNode::new(SOURCE_FILE, children))
    }

    fn expr(text: &str) -> SyntaxNode {
        make::expr_from_text(text).expect("valid expression")
    }

    #[test]
    fn equal_becomes_equality() {
        assert_eq!(rewrite("XCTAssertEqual(sum, 5)"), "#expect(sum == 5)");
        assert_eq!(
            rewrite("XCTAssertEqual(a.count, b.count, \"counts differ\")"),
            "#expect(a.count == b.count)"
        );
    }

    #[test]
    fn equal_with_empty_string_uses_is_empty() {
        assert_eq!(rewrite("XCTAssertEqual(s, \"\")"), "#expect(s.isEmpty == true)");
        assert_eq!(rewrite("XCTAssertEqual(\"\", s)"), "#expect(s.isEmpty == true)");
        assert_eq!(
            rewrite("XCTAssertEqual(a + b, \"\")"),
            "#expect((a + b).isEmpty == true)"
        );
    }

    #[test]
    fn equal_with_accuracy_or_one_argument_is_left_alone() {
        let accuracy = "XCTAssertEqual(x, 1.0, accuracy: 0.01)";
        assert_eq!(rewrite(accuracy), accuracy);
        let single = "XCTAssertEqual(x)";
        assert_eq!(rewrite(single), single);
    }

    #[test]
    fn boolean_assertions() {
        assert_eq!(rewrite("XCTAssertTrue(isValid)"), "#expect(isValid == true)");
        assert_eq!(rewrite("XCTAssertTrue(a > b)"), "#expect(a > b)");
        assert_eq!(rewrite("XCTAssertTrue(!flag)"), "#expect(!flag)");
        assert_eq!(rewrite("XCTAssertFalse(user.isActive)"), "#expect(user.isActive == false)");
        assert_eq!(rewrite("XCTAssertFalse(a == b)"), "#expect((a == b) == false)");
        assert_eq!(rewrite("XCTAssertTrue(name == \"\")"), "#expect(name.isEmpty == true)");
        assert_eq!(rewrite("XCTAssertFalse(\"\" == name)"), "#expect(name.isEmpty == false)");
    }

    #[test]
    fn nil_assertions() {
        assert_eq!(rewrite("XCTAssertNil(error)"), "#expect(error == nil)");
        assert_eq!(rewrite("XCTAssertNotNil(result)"), "#expect(result != nil)");
    }

    #[test]
    fn loose_operands_are_parenthesized() {
        assert_eq!(
            rewrite("XCTAssertEqual(flag ? a : b, c)"),
            "#expect((flag ? a : b) == c)"
        );
        assert_eq!(
            rewrite("XCTAssertEqual(c, flag ? a : b)"),
            "#expect(c == (flag ? a : b))"
        );
        assert_eq!(rewrite("XCTAssertEqual(a == b, true)"), "#expect((a == b) == true)");
        assert_eq!(rewrite("XCTAssertNil(flag ? a : b)"), "#expect((flag ? a : b) == nil)");
        assert_eq!(rewrite("XCTAssertNotNil(x = y)"), "#expect((x = y) != nil)");
        assert_eq!(rewrite("XCTAssertEqual(a + b, c)"), "#expect(a + b == c)");
        assert_eq!(rewrite("XCTAssertNil(a ?? b)"), "#expect(a ?? b == nil)");
    }

    #[test]
    fn throws_error_wraps_expression_in_closure() {
        assert_eq!(
            rewrite("XCTAssertThrowsError(try parser.parse(\"\"))"),
            "#expect(throws: (any Error).self) { try parser.parse(\"\") }"
        );
        let with_handler = "XCTAssertThrowsError(try f()) { error in\n    print(error)\n}";
        assert_eq!(rewrite(with_handler), with_handler);
    }

    #[test]
    fn fail_forwards_arguments() {
        assert_eq!(rewrite("XCTFail(\"unreachable\")"), "Issue.record(\"unreachable\")");
        assert_eq!(rewrite("XCTFail()"), "Issue.record()");
    }

    #[test]
    fn unknown_calls_pass_through() {
        for source in ["XCTAssertNoThrow(try f())", "XCTUnwrap(value)", "print(XCTAssert)"] {
            assert_eq!(rewrite(source), source);
        }
    }

    #[test]
    fn trivia_around_the_call_is_kept() {
        assert_eq!(
            rewrite("\n    XCTAssertNil(x) // cleared\n"),
            "\n    #expect(x == nil) // cleared\n"
        );
    }

    #[test]
    fn multiline_operand_keeps_its_line_break() {
        assert_eq!(
            rewrite("XCTAssertEqual(\n    lhs,\n    rhs\n)"),
            "#expect(\n    lhs ==\n    rhs)"
        );
    }

    #[test]
    fn explicit_comparison_heuristic() {
        assert!(needs_explicit_bool_comparison(&expr("flag")));
        assert!(needs_explicit_bool_comparison(&expr("user.isAdmin")));
        assert!(needs_explicit_bool_comparison(&expr("isEnabled()")));
        assert!(needs_explicit_bool_comparison(&expr("items.contains(where: { $0>1 })")));
        assert!(!needs_explicit_bool_comparison(&expr("a == b")));
        assert!(!needs_explicit_bool_comparison(&expr("!flag")));
        assert!(!needs_explicit_bool_comparison(&expr("check(a && b)")));
        assert!(!needs_explicit_bool_comparison(&expr("try validate(x > 1)")));
    }

    #[test]
    fn explicit_comparison_with_unusual_spacing() {
        let cases = [
            ("a>b", false),
            ("a  ==  b", false),
            ("-x", false),
            ("x+1", false),
            ("!flag", false),
            ("obj.isValid", true),
            ("check(a  &&  b)", false),
            ("check(a>b)", true),
            ("values[i]", true),
        ];
        for (source, expected) in cases {
            assert_eq!(needs_explicit_bool_comparison(&expr(source)), expected, "{source}");
        }
    }

    #[test]
    fn text_scan_matches_spaced_operators_only() {
        assert!(mentions_condition_operator("! flag"));
        assert!(mentions_condition_operator("- offset"));
        assert!(mentions_condition_operator("check(a  ==  b)"));
        assert!(mentions_condition_operator("f(x) || g(y)"));
        assert!(!mentions_condition_operator("!flag"));
        assert!(!mentions_condition_operator("check(a>b)"));
        assert!(!mentions_condition_operator("range(0...n)"));
        assert!(!mentions_condition_operator("name"));
    }
}
