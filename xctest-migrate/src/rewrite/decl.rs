//! Suite declarations: header, inheritance, and member dispatch.

use swift_cst_core::ast::{AstNode, FuncDecl, MemberBlock, TypeDecl};
use swift_cst_core::SyntaxKind::*;
use swift_cst_core::{SyntaxElement, SyntaxNode, Trivia};
use tracing::{debug, trace};

use super::{lifecycle, test_methods, Rewriter};
use crate::scope::{is_instance_method, Representation, ScopeAnalysis};

/// Which members of a block get lifecycle conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberScope {
    Suite,
    Extension,
}

/// Convert a class that inherits from the legacy base type.
pub(super) fn rewrite_test_suite(rewriter: &Rewriter<'_>, node: SyntaxNode) -> SyntaxNode {
    let config = rewriter.config();
    let Some(decl) = TypeDecl::cast(&node) else {
        return node;
    };
    let analysis = decl
        .member_block()
        .map(|block| ScopeAnalysis::analyze(block, config))
        .unwrap_or_default();
    let representation = analysis.representation();
    debug!(
        suite = %decl.name().unwrap_or_default(),
        ?representation,
        tests = analysis.test_method_count,
        "migrating test suite"
    );

    let kind = match representation {
        Representation::Value => STRUCT_DECL,
        Representation::Reference => CLASS_DECL,
    };
    let base_type = config.legacy.base_type.as_str();

    let mut children: Vec<SyntaxElement> = Vec::new();
    let mut carried = Trivia::default();
    let mut inheritance_changed = false;
    for child in node.into_children() {
        let child = match child {
            SyntaxElement::Node(modifier)
                if modifier.kind() == MODIFIER
                    && representation == Representation::Value
                    && modifier.trimmed_text() == "final" =>
            {
                carried = carried.concat(&modifier.leading_trivia());
                continue;
            }
            SyntaxElement::Node(modifier)
                if modifier.kind() == MODIFIER
                    && representation == Representation::Value
                    && modifier.trimmed_text() == "open" =>
            {
                open_to_public(modifier).into()
            }
            SyntaxElement::Token(keyword)
                if keyword.kind() == CLASS_KW && representation == Representation::Value =>
            {
                keyword.with_kind(STRUCT_KW).with_text("struct").into()
            }
            SyntaxElement::Node(clause) if clause.kind() == INHERITANCE_CLAUSE => {
                inheritance_changed = true;
                let leading = clause.leading_trivia();
                let trailing = clause.trailing_trivia();
                match remove_inherited_type(clause, base_type) {
                    Some(clause) => clause.into(),
                    None => {
                        if leading.has_comments() {
                            carried = carried.concat(&leading);
                        }
                        carried = carried.concat(&trailing);
                        continue;
                    }
                }
            }
            SyntaxElement::Node(block) if block.kind() == MEMBER_BLOCK => {
                rewrite_members(rewriter, block, &analysis, MemberScope::Suite).into()
            }
            other => other,
        };
        let child = if carried.is_empty() {
            child
        } else {
            let leading = std::mem::take(&mut carried).concat(&child.leading_trivia());
            child.with_leading_trivia(leading)
        };
        children.push(child);
    }
    if inheritance_changed {
        space_before_member_block(&mut children);
    }
    SyntaxNode::new(kind, children)
}

/// Rename and tag the test methods of an extension of a migrated suite.
pub(super) fn rewrite_extension(rewriter: &Rewriter<'_>, node: SyntaxNode) -> SyntaxNode {
    let Some(analysis) = TypeDecl::cast(&node)
        .and_then(|decl| decl.member_block())
        .map(|block| ScopeAnalysis::analyze(block, rewriter.config()))
    else {
        return rewriter.rewrite_children(node);
    };
    let kind = node.kind();
    let children = node
        .into_children()
        .into_iter()
        .map(|child| match child {
            SyntaxElement::Node(block) if block.kind() == MEMBER_BLOCK => {
                rewrite_members(rewriter, block, &analysis, MemberScope::Extension).into()
            }
            SyntaxElement::Node(other) => rewriter.rewrite_node(other).into(),
            token => token,
        })
        .collect();
    SyntaxNode::new(kind, children)
}

fn rewrite_members(
    rewriter: &Rewriter<'_>,
    block: SyntaxNode,
    analysis: &ScopeAnalysis,
    scope: MemberScope,
) -> SyntaxNode {
    if MemberBlock::cast(&block).is_none() {
        return rewriter.rewrite_children(block);
    }
    let config = rewriter.config();
    let kind = block.kind();
    let mut ordinal = 0;
    let children = block
        .into_children()
        .into_iter()
        .map(|child| {
            let member = match child {
                SyntaxElement::Node(member) => member,
                token => return token,
            };
            let Some(func) = FuncDecl::cast(&member) else {
                return rewriter.rewrite_node(member).into();
            };
            let name = func.name_text();
            let instance = is_instance_method(func);
            if config.test_methods.is_test(name) {
                ordinal += 1;
                test_methods::rewrite_test_method(rewriter, member, analysis, ordinal).into()
            } else if scope == MemberScope::Suite && instance && config.lifecycle.is_setup(name) {
                lifecycle::setup_to_init(rewriter, member).into()
            } else if scope == MemberScope::Suite && instance && config.lifecycle.is_teardown(name) {
                lifecycle::teardown_to_deinit(rewriter, member).into()
            } else {
                rewriter.rewrite_node(member).into()
            }
        })
        .collect();
    SyntaxNode::new(kind, children)
}

/// `open` has no meaning on a value type; `public` keeps the visibility.
fn open_to_public(modifier: SyntaxNode) -> SyntaxNode {
    let kind = modifier.kind();
    let children = modifier
        .into_children()
        .into_iter()
        .map(|child| match child {
            SyntaxElement::Token(token) if token.text() == "open" => {
                token.with_text("public").into()
            }
            other => other,
        })
        .collect();
    SyntaxNode::new(kind, children)
}

/// Drop `base_type` and one adjacent comma from an inheritance clause.
/// Returns `None` when nothing would be left.
fn remove_inherited_type(clause: SyntaxNode, base_type: &str) -> Option<SyntaxNode> {
    let children = clause.children();
    let Some(index) = children.iter().position(|child| {
        child
            .as_node()
            .is_some_and(|node| node.kind() == INHERITED_TYPE && node.trimmed_text() == base_type)
    }) else {
        return Some(clause);
    };
    let remaining = children
        .iter()
        .filter(|child| child.kind() == INHERITED_TYPE)
        .count();
    if remaining <= 1 {
        trace!("dropped inheritance clause");
        return None;
    }

    let comma_after = children
        .get(index + 1)
        .is_some_and(|child| child.kind() == COMMA);
    let (start, end) = if comma_after {
        (index, index + 2)
    } else {
        (index.saturating_sub(1), index + 1)
    };
    let kind = clause.kind();
    let mut children = clause.into_children();
    children.drain(start..end);
    Some(SyntaxNode::new(kind, children))
}

/// Exactly one space between the header and `{`, unless the brace sits on
/// its own line or a comment sits in between.
fn space_before_member_block(children: &mut [SyntaxElement]) {
    let Some(index) = children
        .iter()
        .position(|child| child.kind() == MEMBER_BLOCK)
    else {
        return;
    };
    let leading = children[index].leading_trivia();
    if index == 0 || leading.contains_newline() || leading.has_comments() {
        return;
    }
    let previous = children[index - 1].clone();
    let trailing = previous.trailing_trivia().trim_end_whitespace();
    children[index - 1] = previous.with_trailing_trivia(trailing);
    let block = children[index].clone();
    children[index] = block.with_leading_trivia(Trivia::space());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MigrationConfig;
    use crate::rewrite::rewrite_file;
    use pretty_assertions::assert_eq;
    use swift_cst_core::{parse, render};

    fn migrate(source: &str) -> String {
        render(&rewrite_file(parse(source).tree, &MigrationConfig::default()))
    }

    #[test]
    fn final_class_becomes_struct() {
        assert_eq!(
            migrate("final class FooTests: XCTestCase {\n}\n"),
            "struct FooTests {\n}\n"
        );
    }

    #[test]
    fn other_conformances_survive() {
        assert_eq!(
            migrate("class FooTests: XCTestCase, Sendable {\n}\n"),
            "struct FooTests: Sendable {\n}\n"
        );
        assert_eq!(
            migrate("class FooTests: Sendable, XCTestCase {\n}\n"),
            "struct FooTests: Sendable {\n}\n"
        );
    }

    #[test]
    fn access_modifier_and_attribute_stay() {
        assert_eq!(
            migrate("@MainActor\npublic final class FooTests: XCTestCase {\n}\n"),
            "@MainActor\npublic struct FooTests {\n}\n"
        );
    }

    #[test]
    fn open_suite_becomes_public_struct() {
        assert_eq!(
            migrate("open class FooTests: XCTestCase {\n}\n"),
            "public struct FooTests {\n}\n"
        );
    }

    #[test]
    fn dropped_clause_trivia_moves_forward() {
        assert_eq!(
            migrate("final class FooTests<T>: XCTestCase where T: Equatable {\n}\n"),
            "struct FooTests<T> where T: Equatable {\n}\n"
        );
        assert_eq!(
            migrate("class FooTests: XCTestCase /* legacy */ {\n}\n"),
            "struct FooTests /* legacy */ {\n}\n"
        );
    }

    #[test]
    fn brace_on_its_own_line_is_kept() {
        assert_eq!(
            migrate("class FooTests: XCTestCase\n{\n}\n"),
            "struct FooTests\n{\n}\n"
        );
    }

    #[test]
    fn stateful_suite_stays_a_class() {
        let source = "final class FooTests: XCTestCase {\n    var sut = Parser()\n\n    override func tearDown() {\n        sut.reset()\n        super.tearDown()\n    }\n}\n";
        assert_eq!(
            migrate(source),
            "final class FooTests {\n    var sut = Parser()\n\n    deinit {\n        sut.reset()\n    }\n}\n"
        );
    }

    #[test]
    fn throwing_teardown_becomes_deinit() {
        let source = "class FooTests: XCTestCase {\n    override func tearDownWithError() throws {\n        try super.tearDownWithError()\n    }\n}\n";
        assert_eq!(migrate(source), "class FooTests {\n    deinit {\n    }\n}\n");
    }

    #[test]
    fn setup_becomes_init_in_a_struct() {
        let source = "class FooTests: XCTestCase {\n    var sut: Parser!\n\n    override func setUpWithError() throws {\n        try super.setUpWithError()\n        sut = try Parser()\n    }\n\n    func testParse() {\n        XCTAssertNotNil(sut)\n    }\n}\n";
        assert_eq!(
            migrate(source),
            "struct FooTests {\n    var sut: Parser!\n\n    init() throws {\n        sut = try Parser()\n    }\n\n    @Test\n    func parse() {\n        #expect(sut != nil)\n    }\n}\n"
        );
    }

    #[test]
    fn unrelated_class_is_untouched() {
        let source = "final class Helper: NSObject {\n    func testable() { XCTAssertTrue(flag) }\n}\n";
        assert_eq!(
            migrate(source),
            "final class Helper: NSObject {\n    func testable() { #expect(flag == true) }\n}\n"
        );
    }

    #[test]
    fn extension_tests_are_tagged() {
        let source = "final class FooTests: XCTestCase {\n}\n\nextension FooTests {\n    func testMore() {}\n\n    func helper() {}\n}\n";
        assert_eq!(
            migrate(source),
            "struct FooTests {\n}\n\nextension FooTests {\n\n    @Test\n    func more() {}\n\n    func helper() {}\n}\n"
        );
    }
}
