use swift_cst_core::ast::{AstNode, FuncDecl};
use swift_cst_core::SyntaxKind::{self, *};
use swift_cst_core::{make, SyntaxElement, SyntaxNode, Trivia};
use tracing::trace;

use super::Rewriter;
use crate::config::TestMethodNaming;
use crate::scope::ScopeAnalysis;
use crate::validate::calls_unsupported;

/// Rename a test method, tag it with the test attribute, and rewrite its
/// body. `ordinal` is the method's 1-based position among the suite's tests.
pub(super) fn rewrite_test_method(
    rewriter: &Rewriter<'_>,
    node: SyntaxNode,
    analysis: &ScopeAnalysis,
    ordinal: usize,
) -> SyntaxNode {
    let config = rewriter.config();
    let needs_async = FuncDecl::cast(&node)
        .and_then(|func| func.body())
        .is_some_and(|body| calls_unsupported(body.syntax(), config));

    let node = rewriter.rewrite_children(node);
    let leading = node.leading_trivia();
    let attribute_name = config.modern.test_attribute.as_str();
    let already_tagged = FuncDecl::cast(&node).is_some_and(|func| {
        func.attributes()
            .any(|attribute| attribute.trimmed_text() == format!("@{attribute_name}"))
    });

    let kind = node.kind();
    let mut children: Vec<SyntaxElement> = Vec::with_capacity(node.children().len() + 1);
    let mut after_func_keyword = false;
    for child in node.into_children() {
        match child {
            SyntaxElement::Token(token) if after_func_keyword => {
                after_func_keyword = false;
                let name = test_name(token.text(), &config.test_methods);
                trace!(from = token.text(), to = %name, "renamed test method");
                children.push(token.with_text(name).into());
            }
            SyntaxElement::Token(token) if token.kind() == FUNC_KW => {
                after_func_keyword = true;
                children.push(token.into());
            }
            SyntaxElement::Node(signature) if signature.kind() == FUNC_SIGNATURE && needs_async => {
                children.push(make_async(signature).into());
            }
            other => children.push(other),
        }
    }
    let node = SyntaxNode::new(kind, children);
    if already_tagged {
        return node;
    }

    let blank_lines = if analysis.needs_blank_line_before(ordinal) { 2 } else { 1 };
    let ending = leading.line_ending().unwrap_or(rewriter.line_ending());
    let mut line_break = Trivia::line_breaks(1, ending);
    line_break.extend(leading.indentation().pieces().iter().cloned());
    let attribute = make::attribute(attribute_name)
        .with_leading_trivia(leading.with_leading_newlines(blank_lines, ending));
    node.with_leading_trivia(line_break).insert_child(0, attribute)
}

/// `testFooBar` -> `fooBar`, `test_Foo_bar` -> `foo_bar`. A name that would
/// be empty or start with a digit is kept; a keyword is escaped.
pub fn test_name(name: &str, naming: &TestMethodNaming) -> String {
    let rest = name
        .strip_prefix(naming.separator_prefix.as_str())
        .or_else(|| name.strip_prefix(naming.prefix.as_str()));
    let Some(rest) = rest else {
        return name.to_string();
    };

    let mut chars = rest.chars();
    let renamed: String = match chars.next() {
        Some(first) if first.is_ascii_digit() => return name.to_string(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => return name.to_string(),
    };
    if SyntaxKind::from_keyword(&renamed).is_some() {
        format!("`{renamed}`")
    } else {
        renamed
    }
}

/// Add `async` to a function signature's effect specifiers.
pub fn make_async(signature: SyntaxNode) -> SyntaxNode {
    let async_token = || make::ident("async");
    if let Some(index) = signature
        .children()
        .iter()
        .position(|child| child.kind() == EFFECT_SPECIFIERS)
    {
        let Some(effects) = signature.children()[index].as_node().cloned() else {
            return signature;
        };
        if effects.child_tokens().any(|token| token.text() == "async") {
            return signature;
        }
        let leading = effects.leading_trivia();
        let effects = effects
            .with_leading_trivia(Trivia::default())
            .insert_child(0, async_token().with_leading(leading).with_trailing(Trivia::space()));
        return signature.replace_child(index, effects);
    }

    let Some(params) = signature
        .children()
        .iter()
        .position(|child| child.kind() == PARAM_CLAUSE)
    else {
        return signature;
    };
    let gap = signature.children()[params].trailing_trivia();
    let effects = SyntaxNode::new(
        EFFECT_SPECIFIERS,
        vec![async_token().with_trailing(gap).into()],
    );
    let spaced = signature.children()[params]
        .clone()
        .with_trailing_trivia(Trivia::space());
    signature
        .replace_child(params, spaced)
        .insert_child(params + 1, effects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use swift_cst_core::parse;

    fn naming() -> TestMethodNaming {
        TestMethodNaming::default()
    }

    #[test]
    fn prefix_is_stripped_and_lowercased() {
        assert_eq!(test_name("testAddition", &naming()), "addition");
        assert_eq!(test_name("testURLParsing", &naming()), "uRLParsing");
        assert_eq!(test_name("test_subtraction", &naming()), "subtraction");
        assert_eq!(test_name("test_Example", &naming()), "example");
        assert_eq!(test_name("test_parses_empty_input", &naming()), "parses_empty_input");
    }

    #[test]
    fn unusable_names_are_kept_or_escaped() {
        assert_eq!(test_name("test", &naming()), "test");
        assert_eq!(test_name("test_", &naming()), "test_");
        assert_eq!(test_name("test2Things", &naming()), "test2Things");
        assert_eq!(test_name("testDefault", &naming()), "`default`");
        assert_eq!(test_name("testSwitch", &naming()), "`switch`");
    }

    fn signature_of(source: &str) -> SyntaxNode {
        let parse = parse(source);
        parse
            .tree
            .descendants()
            .find(|node| node.kind() == FUNC_SIGNATURE)
            .cloned()
            .expect("function signature")
    }

    #[test]
    fn make_async_adds_effect() {
        assert_eq!(make_async(signature_of("func f() {}")).text(), "() async ");
        assert_eq!(make_async(signature_of("func f() throws {}")).text(), "() async throws ");
        assert_eq!(make_async(signature_of("func f() -> Int {}")).text(), "() async -> Int ");
        assert_eq!(make_async(signature_of("func f() async {}")).text(), "() async ");
    }
}
