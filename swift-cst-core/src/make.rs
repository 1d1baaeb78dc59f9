//! Constructors for new nodes.
//!
//! Every node built here carries only the trivia needed to read correctly on
//! its own (a space around a binary operator, after a comma, and so on).
//! Callers move outer trivia from the node being replaced with
//! [`SyntaxNode::with_trivia_from`].

use crate::kind::SyntaxKind::{self, *};
use crate::parser::parse;
use crate::tree::{SyntaxElement, SyntaxNode, SyntaxToken};
use crate::trivia::Trivia;

pub fn token(kind: SyntaxKind, text: &str) -> SyntaxToken {
    SyntaxToken::new(kind, text)
}

pub fn ident(text: &str) -> SyntaxToken {
    token(IDENT, text)
}

/// A keyword token; falls back to an identifier for contextual words.
pub fn keyword(text: &str) -> SyntaxToken {
    token(SyntaxKind::from_keyword(text).unwrap_or(IDENT), text)
}

pub fn name_expr(name: &str) -> SyntaxNode {
    SyntaxNode::new(NAME_EXPR, vec![ident(name).into()])
}

pub fn bool_literal(value: bool) -> SyntaxNode {
    let token = if value {
        token(TRUE_KW, "true")
    } else {
        token(FALSE_KW, "false")
    };
    SyntaxNode::new(LITERAL_EXPR, vec![token.into()])
}

pub fn nil_literal() -> SyntaxNode {
    SyntaxNode::new(LITERAL_EXPR, vec![token(NIL_KW, "nil").into()])
}

/// `base.name`
pub fn member_access(base: SyntaxNode, name: &str) -> SyntaxNode {
    SyntaxNode::new(
        MEMBER_EXPR,
        vec![base.into(), token(DOT, ".").into(), ident(name).into()],
    )
}

/// `lhs op rhs` with one space on each side of the operator. When `rhs`
/// starts on a new line the operator ends its line instead.
pub fn binary(lhs: SyntaxNode, op: &str, rhs: SyntaxNode) -> SyntaxNode {
    let trailing = if rhs.leading_trivia().starts_with_newline() {
        Trivia::default()
    } else {
        Trivia::space()
    };
    let op = token(BINARY_OPERATOR, op)
        .with_leading(Trivia::space())
        .with_trailing(trailing);
    SyntaxNode::new(BINARY_EXPR, vec![lhs.into(), op.into(), rhs.into()])
}

pub fn argument(label: Option<&str>, expr: SyntaxNode) -> SyntaxNode {
    let mut children: Vec<SyntaxElement> = Vec::new();
    if let Some(label) = label {
        children.push(ident(label).into());
        children.push(token(COLON, ":").with_trailing(Trivia::space()).into());
    }
    children.push(expr.into());
    SyntaxNode::new(ARGUMENT, children)
}

/// `(a, b, c)` from finished `ARGUMENT` nodes.
pub fn arg_list(arguments: impl IntoIterator<Item = SyntaxNode>) -> SyntaxNode {
    let mut children: Vec<SyntaxElement> = vec![token(L_PAREN, "(").into()];
    for (index, argument) in arguments.into_iter().enumerate() {
        if index > 0 {
            children.push(token(COMMA, ",").with_trailing(Trivia::space()).into());
        }
        children.push(argument.into());
    }
    children.push(token(R_PAREN, ")").into());
    SyntaxNode::new(ARG_LIST, children)
}

/// `(expr)`
pub fn parenthesized(expr: SyntaxNode) -> SyntaxNode {
    SyntaxNode::new(
        TUPLE_EXPR,
        vec![
            token(L_PAREN, "(").into(),
            SyntaxNode::new(ARGUMENT, vec![expr.into()]).into(),
            token(R_PAREN, ")").into(),
        ],
    )
}

pub fn call(callee: SyntaxNode, arg_list: SyntaxNode) -> SyntaxNode {
    SyntaxNode::new(CALL_EXPR, vec![callee.into(), arg_list.into()])
}

/// `#name`
pub fn macro_name(name: &str) -> SyntaxNode {
    SyntaxNode::new(MACRO_EXPR, vec![token(POUND_KEYWORD, &format!("#{name}")).into()])
}

/// `#name(args)`
pub fn macro_call(name: &str, arguments: impl IntoIterator<Item = SyntaxNode>) -> SyntaxNode {
    call(macro_name(name), arg_list(arguments))
}

/// ` { body }` written on one line.
pub fn inline_closure(body: SyntaxNode) -> SyntaxNode {
    let body = body
        .with_leading_trivia(Trivia::default())
        .with_trailing_trivia(Trivia::space());
    SyntaxNode::new(
        CLOSURE_EXPR,
        vec![
            token(L_BRACE, "{")
                .with_leading(Trivia::space())
                .with_trailing(Trivia::space())
                .into(),
            body.into(),
            token(R_BRACE, "}").into(),
        ],
    )
}

/// `@name`
pub fn attribute(name: &str) -> SyntaxNode {
    SyntaxNode::new(ATTRIBUTE, vec![token(AT, "@").into(), ident(name).into()])
}

/// The path of an import declaration, e.g. `Testing`.
pub fn import_path(module: &str) -> SyntaxNode {
    let mut children: Vec<SyntaxElement> = Vec::new();
    for (index, part) in module.split('.').enumerate() {
        if index > 0 {
            children.push(token(DOT, ".").into());
        }
        children.push(ident(part).into());
    }
    SyntaxNode::new(IMPORT_PATH, children)
}

/// `()` as a parameter clause.
pub fn empty_params() -> SyntaxNode {
    SyntaxNode::new(
        PARAM_CLAUSE,
        vec![token(L_PAREN, "(").into(), token(R_PAREN, ")").into()],
    )
}

/// Parse `text` as a single expression, as if written inside a statement.
/// Returns `None` when the text is not exactly one well-formed expression.
pub fn expr_from_text(text: &str) -> Option<SyntaxNode> {
    let parse = parse(text);
    if parse.has_errors() {
        return None;
    }
    let mut nodes = parse.tree.into_children().into_iter().filter_map(SyntaxElement::into_node);
    let expr = nodes.next().filter(|node| node.kind().is_expr())?;
    nodes.next().is_none().then_some(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trivia::TriviaPiece;
    use pretty_assertions::assert_eq;

    #[test]
    fn binary_spaces_the_operator() {
        let node = binary(name_expr("a"), "==", bool_literal(true));
        assert_eq!(node.text(), "a == true");
    }

    #[test]
    fn binary_keeps_line_break_of_multiline_rhs() {
        let rhs = name_expr("b")
            .with_leading_trivia(Trivia::new([TriviaPiece::Newlines(1), TriviaPiece::Spaces(4)]));
        let node = binary(name_expr("a"), "!=", rhs);
        assert_eq!(node.text(), "a !=\n    b");
    }

    #[test]
    fn macro_call_with_labeled_argument() {
        let expr = expr_from_text("(any Error).self").expect("valid expression");
        let node = macro_call("expect", [argument(Some("throws"), expr)]);
        assert_eq!(node.text(), "#expect(throws: (any Error).self)");
    }

    #[test]
    fn arg_list_separates_with_comma_space() {
        let node = call(
            member_access(name_expr("Issue"), "record"),
            arg_list([argument(None, name_expr("a")), argument(None, name_expr("b"))]),
        );
        assert_eq!(node.text(), "Issue.record(a, b)");
    }

    #[test]
    fn parenthesized_member_access() {
        let sum = expr_from_text("a + b").expect("valid expression");
        let node = member_access(parenthesized(sum), "isEmpty");
        assert_eq!(node.text(), "(a + b).isEmpty");
    }

    #[test]
    fn inline_closure_wraps_body() {
        let body = parse("try work()").tree.into_children().remove(0);
        let node = inline_closure(body.into_node().expect("expression node"));
        assert_eq!(node.text(), " { try work() }");
    }

    #[test]
    fn expr_from_text_rejects_statements() {
        assert!(expr_from_text("a.isEmpty").is_some());
        assert!(expr_from_text("let a = 1").is_none());
        assert!(expr_from_text("a\nb").is_none());
    }

    #[test]
    fn import_path_splits_on_dots() {
        assert_eq!(import_path("Darwin.C").text(), "Darwin.C");
        assert_eq!(attribute("Test").text(), "@Test");
    }
}
