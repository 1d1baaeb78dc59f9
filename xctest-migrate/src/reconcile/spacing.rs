use swift_cst_core::SyntaxKind::*;
use swift_cst_core::{SyntaxElement, SyntaxNode, Trivia};

/// `value? [key]` -> `value?[key]`, anywhere in the tree.
pub fn fix_optional_subscripts(node: SyntaxNode) -> SyntaxNode {
    if node.children().iter().all(|child| child.as_node().is_none()) {
        return node;
    }
    let kind = node.kind();
    let mut children: Vec<SyntaxElement> = node
        .into_children()
        .into_iter()
        .map(|child| match child {
            SyntaxElement::Node(child) => fix_optional_subscripts(child).into(),
            token => token,
        })
        .collect();

    if kind == SUBSCRIPT_EXPR && ends_with_optional_marker(children.first()) && children.len() > 1 {
        let base = children[0].clone().with_trailing_trivia(Trivia::default());
        let brackets = children[1].clone().with_leading_trivia(Trivia::default());
        children[0] = base;
        children[1] = brackets;
    }
    SyntaxNode::new(kind, children)
}

fn ends_with_optional_marker(base: Option<&SyntaxElement>) -> bool {
    base.and_then(SyntaxElement::last_token)
        .is_some_and(|token| token.kind() == POSTFIX_OPERATOR && token.text() == "?")
}

#[cfg(test)]
mod tests {
    use super::*;
    use swift_cst_core::{parse, render};

    #[test]
    fn adjacent_subscript_is_unchanged() {
        let source = "let v = dict?[\"key\"]\n";
        assert_eq!(render(&fix_optional_subscripts(parse(source).tree)), source);
    }

    #[test]
    fn stray_space_is_removed() {
        let tree = parse("let v = dict? [\"key\"]\nlet w = a.b? [0]? [1]\n").tree;
        assert_eq!(
            render(&fix_optional_subscripts(tree)),
            "let v = dict?[\"key\"]\nlet w = a.b?[0]?[1]\n"
        );
    }

    #[test]
    fn plain_subscript_spacing_is_kept() {
        let source = "let v = values [0]\n";
        assert_eq!(render(&fix_optional_subscripts(parse(source).tree)), source);
    }
}
