//! `setUp` to `init()` and `tearDown` to `deinit`.

use swift_cst_core::SyntaxKind::*;
use swift_cst_core::{make, SyntaxElement, SyntaxNode, Trivia};
use tracing::trace;

use super::Rewriter;

/// `override func setUp() { super.setUp(); body }` -> `init() { body }`.
/// Attributes and effect specifiers are kept; modifiers are dropped.
pub(super) fn setup_to_init(rewriter: &Rewriter<'_>, node: SyntaxNode) -> SyntaxNode {
    let forwarding = rewriter.config().lifecycle.setup_forwarding.as_str();
    let node = rewriter.rewrite_children(node);
    let head_leading = head_leading_trivia(&node);
    let leading = node.leading_trivia();

    let mut children: Vec<SyntaxElement> = Vec::new();
    let mut keyword = Some(make::token(INIT_KW, "init").with_leading(head_leading));
    for child in node.into_children() {
        match child {
            SyntaxElement::Node(attribute) if attribute.kind() == ATTRIBUTE => {
                children.push(attribute.into());
            }
            SyntaxElement::Node(signature) if signature.kind() == FUNC_SIGNATURE => {
                if let Some(keyword) = keyword.take() {
                    children.push(keyword.into());
                }
                children.push(init_signature(signature).into());
            }
            SyntaxElement::Node(body) if body.kind() == CODE_BLOCK => {
                children.push(strip_forwarding_calls(body, forwarding).into());
            }
            _ => {}
        }
    }
    trace!("converted setup method to init");
    SyntaxNode::new(INIT_DECL, children).with_leading_trivia(leading)
}

/// `override func tearDown() { body; super.tearDown() }` -> `deinit { body }`.
pub(super) fn teardown_to_deinit(rewriter: &Rewriter<'_>, node: SyntaxNode) -> SyntaxNode {
    let forwarding = rewriter.config().lifecycle.teardown_forwarding.as_str();
    let node = rewriter.rewrite_children(node);
    let head_leading = head_leading_trivia(&node);
    let leading = node.leading_trivia();
    let gap = node
        .child_node(FUNC_SIGNATURE)
        .map(SyntaxNode::trailing_trivia)
        .filter(|trivia| !trivia.is_empty())
        .unwrap_or_else(Trivia::space);

    let mut children: Vec<SyntaxElement> = Vec::new();
    let mut keyword = Some(
        make::token(DEINIT_KW, "deinit")
            .with_leading(head_leading)
            .with_trailing(gap),
    );
    for child in node.into_children() {
        match child {
            SyntaxElement::Node(attribute) if attribute.kind() == ATTRIBUTE => {
                children.push(attribute.into());
            }
            SyntaxElement::Node(body) if body.kind() == CODE_BLOCK => {
                if let Some(keyword) = keyword.take() {
                    children.push(keyword.into());
                }
                children.push(strip_forwarding_calls(body, forwarding).into());
            }
            _ => {}
        }
    }
    if let Some(keyword) = keyword {
        children.push(keyword.into());
    }
    trace!("converted teardown method to deinit");
    SyntaxNode::new(DEINIT_DECL, children).with_leading_trivia(leading)
}

/// Leading trivia of the first element after the attributes: the modifier
/// or `func` keyword that the new keyword takes the place of.
fn head_leading_trivia(node: &SyntaxNode) -> Trivia {
    node.children()
        .iter()
        .find(|child| child.kind() != ATTRIBUTE)
        .map(SyntaxElement::leading_trivia)
        .unwrap_or_default()
}

/// `()` plus the original effect specifiers, without a return clause.
fn init_signature(signature: SyntaxNode) -> SyntaxNode {
    let children = signature
        .into_children()
        .into_iter()
        .filter_map(|child| match child {
            SyntaxElement::Node(params) if params.kind() == PARAM_CLAUSE => {
                Some(make::empty_params().with_trivia_from(&params).into())
            }
            SyntaxElement::Node(effects) if effects.kind() == EFFECT_SPECIFIERS => {
                Some(effects.into())
            }
            _ => None,
        })
        .collect();
    SyntaxNode::new(FUNC_SIGNATURE, children)
}

/// Drop every top-level statement of `block` whose text contains
/// `pattern`. Comments on a dropped statement's own lines move to the next
/// element; its end-of-line comment goes with it.
pub(super) fn strip_forwarding_calls(block: SyntaxNode, pattern: &str) -> SyntaxNode {
    let kind = block.kind();
    let mut children: Vec<SyntaxElement> = Vec::new();
    let mut carried = Trivia::default();
    let mut dropped_previous = false;
    for child in block.into_children() {
        let is_statement = !matches!(child.kind(), L_BRACE | R_BRACE | SEMICOLON);
        if is_statement && child.text().contains(pattern) {
            let leading = child.leading_trivia();
            if leading.has_comments() {
                carried = carried.concat(&leading.trim_end());
            }
            dropped_previous = true;
            continue;
        }
        if dropped_previous && child.kind() == SEMICOLON {
            continue;
        }
        dropped_previous = false;
        let child = if carried.is_empty() {
            child
        } else {
            let leading = std::mem::take(&mut carried).concat(&child.leading_trivia());
            child.with_leading_trivia(leading)
        };
        children.push(child);
    }
    SyntaxNode::new(kind, children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use swift_cst_core::parse;

    fn body_of(source: &str) -> SyntaxNode {
        parse(source)
            .tree
            .descendants()
            .find(|node| node.kind() == CODE_BLOCK)
            .cloned()
            .expect("code block")
    }

    #[test]
    fn forwarding_call_is_removed() {
        let body = body_of("func setUp() {\n    super.setUp()\n    sut = Parser()\n}\n");
        assert_eq!(
            strip_forwarding_calls(body, "super.setUp").text(),
            "{\n    sut = Parser()\n}"
        );
    }

    #[test]
    fn try_forwarding_and_last_statement() {
        let body = body_of("func tearDown() {\n    sut = nil\n    try super.tearDownWithError()\n}\n");
        assert_eq!(
            strip_forwarding_calls(body, "super.tearDown").text(),
            "{\n    sut = nil\n}"
        );
    }

    #[test]
    fn comment_above_dropped_call_moves_down() {
        let body = body_of(
            "func setUp() {\n    // reset state\n    super.setUp() // required\n    count = 0\n}\n",
        );
        assert_eq!(
            strip_forwarding_calls(body, "super.setUp").text(),
            "{\n    // reset state\n    count = 0\n}"
        );
    }

    #[test]
    fn semicolon_after_dropped_call_goes_too() {
        let body = body_of("func setUp() { super.setUp(); count = 0 }\n");
        assert_eq!(strip_forwarding_calls(body, "super.setUp").text(), "{ count = 0 }");
    }
}
