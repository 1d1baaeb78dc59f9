//! Typed, borrowed views over [`SyntaxNode`]s.
//!
//! A view is a thin wrapper that checks the node kind once in `cast` and then
//! exposes named accessors for the child slots the parser produces.

use crate::kind::SyntaxKind::{self, *};
use crate::tree::{SyntaxElement, SyntaxNode, SyntaxToken};

pub trait AstNode<'a>: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;

    fn cast(node: &'a SyntaxNode) -> Option<Self>;

    fn syntax(&self) -> &'a SyntaxNode;
}

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident, $($kind:ident)|+) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name<'a>(&'a SyntaxNode);

        impl<'a> AstNode<'a> for $name<'a> {
            fn can_cast(kind: SyntaxKind) -> bool {
                matches!(kind, $($kind)|+)
            }

            fn cast(node: &'a SyntaxNode) -> Option<Self> {
                Self::can_cast(node.kind()).then_some(Self(node))
            }

            fn syntax(&self) -> &'a SyntaxNode {
                self.0
            }
        }
    };
}

ast_node!(SourceFile, SOURCE_FILE);
ast_node!(ImportDecl, IMPORT_DECL);
ast_node!(
    /// Any nominal type declaration or extension.
    TypeDecl,
    CLASS_DECL | STRUCT_DECL | ENUM_DECL | ACTOR_DECL | PROTOCOL_DECL | EXTENSION_DECL
);
ast_node!(InheritanceClause, INHERITANCE_CLAUSE);
ast_node!(MemberBlock, MEMBER_BLOCK);
ast_node!(FuncDecl, FUNC_DECL);
ast_node!(VariableDecl, VARIABLE_DECL);
ast_node!(PatternBinding, PATTERN_BINDING);
ast_node!(CodeBlock, CODE_BLOCK);
ast_node!(CallExpr, CALL_EXPR);
ast_node!(Argument, ARGUMENT);
ast_node!(BinaryExpr, BINARY_EXPR);

/// Elements between a block's braces.
fn block_contents(node: &SyntaxNode) -> impl Iterator<Item = &SyntaxElement> {
    node.children()
        .iter()
        .filter(|child| !matches!(child.kind(), L_BRACE | R_BRACE))
}

fn modifier_texts(node: &SyntaxNode) -> impl Iterator<Item = String> + '_ {
    node.child_nodes()
        .filter(|child| child.kind() == MODIFIER)
        .map(SyntaxNode::trimmed_text)
}

impl<'a> SourceFile<'a> {
    /// Top-level items, without the end-of-file token.
    pub fn items(&self) -> impl Iterator<Item = &'a SyntaxElement> {
        self.0.children().iter().filter(|child| child.kind() != EOF)
    }

    pub fn imports(&self) -> impl Iterator<Item = ImportDecl<'a>> {
        self.0.child_nodes().filter_map(ImportDecl::cast)
    }

    pub fn type_decls(&self) -> impl Iterator<Item = TypeDecl<'a>> {
        self.0.child_nodes().filter_map(TypeDecl::cast)
    }
}

impl<'a> ImportDecl<'a> {
    pub fn path(&self) -> Option<&'a SyntaxNode> {
        self.0.child_node(IMPORT_PATH)
    }

    /// The imported module path, e.g. `Foundation` or `Darwin.C`.
    pub fn path_text(&self) -> String {
        self.path().map(SyntaxNode::trimmed_text).unwrap_or_default()
    }
}

impl<'a> TypeDecl<'a> {
    /// `class`, `struct`, `enum`, `protocol`, `extension`, or the `actor` word.
    pub fn keyword(&self) -> Option<&'a SyntaxToken> {
        self.0.child_tokens().next()
    }

    pub fn is_extension(&self) -> bool {
        self.0.kind() == EXTENSION_DECL
    }

    /// Declared name, or the extended type's text for an extension.
    pub fn name(&self) -> Option<String> {
        if self.is_extension() {
            return self.0.child_node(TYPE).map(SyntaxNode::trimmed_text);
        }
        self.0
            .child_tokens()
            .nth(1)
            .filter(|token| token.kind() == IDENT)
            .map(|token| token.text().to_string())
    }

    pub fn modifiers(&self) -> Vec<String> {
        modifier_texts(self.0).collect()
    }

    pub fn has_modifier(&self, name: &str) -> bool {
        modifier_texts(self.0).any(|text| text == name)
    }

    pub fn inheritance_clause(&self) -> Option<InheritanceClause<'a>> {
        self.0.child_nodes().find_map(InheritanceClause::cast)
    }

    /// True when the inheritance clause lists `type_name`.
    pub fn inherits(&self, type_name: &str) -> bool {
        self.inheritance_clause()
            .is_some_and(|clause| clause.type_names().iter().any(|name| name == type_name))
    }

    pub fn member_block(&self) -> Option<MemberBlock<'a>> {
        self.0.child_nodes().find_map(MemberBlock::cast)
    }
}

impl<'a> InheritanceClause<'a> {
    pub fn inherited_types(&self) -> impl Iterator<Item = &'a SyntaxNode> {
        self.0
            .child_nodes()
            .filter(|child| child.kind() == INHERITED_TYPE)
    }

    pub fn type_names(&self) -> Vec<String> {
        self.inherited_types().map(SyntaxNode::trimmed_text).collect()
    }
}

impl<'a> MemberBlock<'a> {
    pub fn members(&self) -> impl Iterator<Item = &'a SyntaxElement> {
        block_contents(self.0)
    }

    pub fn functions(&self) -> impl Iterator<Item = FuncDecl<'a>> {
        self.0.child_nodes().filter_map(FuncDecl::cast)
    }

    pub fn variables(&self) -> impl Iterator<Item = VariableDecl<'a>> {
        self.0.child_nodes().filter_map(VariableDecl::cast)
    }
}

impl<'a> FuncDecl<'a> {
    pub fn name(&self) -> Option<&'a SyntaxToken> {
        let mut tokens = self.0.child_tokens();
        tokens.find(|token| token.kind() == FUNC_KW)?;
        tokens.next()
    }

    pub fn name_text(&self) -> &'a str {
        self.name().map_or("", SyntaxToken::text)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &'a SyntaxNode> {
        self.0.child_nodes().filter(|child| child.kind() == ATTRIBUTE)
    }

    pub fn modifiers(&self) -> Vec<String> {
        modifier_texts(self.0).collect()
    }

    pub fn signature(&self) -> Option<&'a SyntaxNode> {
        self.0.child_node(FUNC_SIGNATURE)
    }

    pub fn body(&self) -> Option<CodeBlock<'a>> {
        self.0.child_nodes().find_map(CodeBlock::cast)
    }
}

impl<'a> VariableDecl<'a> {
    pub fn bindings(&self) -> impl Iterator<Item = PatternBinding<'a>> {
        self.0.child_nodes().filter_map(PatternBinding::cast)
    }
}

impl<'a> PatternBinding<'a> {
    pub fn has_initializer(&self) -> bool {
        self.0.child_node(INITIALIZER_CLAUSE).is_some()
    }

    pub fn accessor_block(&self) -> Option<&'a SyntaxNode> {
        self.0.child_node(ACCESSOR_BLOCK)
    }

    /// A stored property with an initial value, e.g. `var count = 0`.
    pub fn is_initialized_storage(&self) -> bool {
        self.has_initializer() && self.accessor_block().is_none()
    }
}

impl<'a> CodeBlock<'a> {
    pub fn statements(&self) -> impl Iterator<Item = &'a SyntaxElement> {
        block_contents(self.0)
    }
}

impl<'a> CallExpr<'a> {
    pub fn callee(&self) -> Option<&'a SyntaxNode> {
        self.0.child_nodes().next()
    }

    /// The callee as written, without surrounding trivia.
    pub fn callee_text(&self) -> String {
        self.callee().map(SyntaxNode::trimmed_text).unwrap_or_default()
    }

    /// The parenthesized argument list, absent for `f { ... }`.
    pub fn arg_list(&self) -> Option<&'a SyntaxNode> {
        self.0.child_node(ARG_LIST)
    }

    pub fn arguments(&self) -> Vec<Argument<'a>> {
        self.arg_list()
            .map(|list| list.child_nodes().filter_map(Argument::cast).collect())
            .unwrap_or_default()
    }

    /// Closures written after the argument list.
    pub fn trailing_closures(&self) -> impl Iterator<Item = &'a SyntaxNode> {
        self.0
            .child_nodes()
            .skip(1)
            .filter(|child| child.kind() == CLOSURE_EXPR)
    }
}

impl<'a> Argument<'a> {
    /// The `label` of `label: value`.
    pub fn label(&self) -> Option<&'a SyntaxToken> {
        let children = self.0.children();
        let colon = children.get(1).and_then(SyntaxElement::as_token)?;
        if colon.kind() != COLON {
            return None;
        }
        children.first().and_then(SyntaxElement::as_token)
    }

    /// The value expression.
    pub fn expr(&self) -> Option<&'a SyntaxNode> {
        self.0.child_nodes().next()
    }
}

impl<'a> BinaryExpr<'a> {
    /// Operands and operators in source order.
    pub fn elements(&self) -> &'a [SyntaxElement] {
        self.0.children()
    }

    pub fn operators(&self) -> impl Iterator<Item = &'a SyntaxToken> {
        self.0
            .child_tokens()
            .filter(|token| matches!(token.kind(), BINARY_OPERATOR | EQ))
    }
}

/// `""` as a literal expression.
pub fn is_empty_string_literal(node: &SyntaxNode) -> bool {
    node.kind() == LITERAL_EXPR
        && node
            .first_token()
            .is_some_and(|token| token.kind() == STRING_LITERAL && token.text() == "\"\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn first<'a, N: AstNode<'a>>(root: &'a SyntaxNode) -> N {
        root.descendants()
            .find_map(N::cast)
            .expect("node of the requested kind")
    }

    #[test]
    fn type_decl_reports_name_modifiers_and_inheritance() {
        let parse = parse("final class FooTests: XCTestCase, Sendable {\n}\n");
        let decl: TypeDecl = first(&parse.tree);
        assert_eq!(decl.name().as_deref(), Some("FooTests"));
        assert!(decl.has_modifier("final"));
        assert!(decl.inherits("XCTestCase"));
        assert!(!decl.inherits("XCTest"));
        assert_eq!(
            decl.inheritance_clause().map(|clause| clause.type_names()),
            Some(vec!["XCTestCase".to_string(), "Sendable".to_string()])
        );
    }

    #[test]
    fn extension_name_is_extended_type() {
        let parse = parse("extension FooTests {\n}\n");
        let decl: TypeDecl = first(&parse.tree);
        assert!(decl.is_extension());
        assert_eq!(decl.name().as_deref(), Some("FooTests"));
    }

    #[test]
    fn call_arguments_expose_labels_and_values() {
        let parse = parse("XCTAssertEqual(a, \"\", message: \"m\")\n");
        let call: CallExpr = first(&parse.tree);
        assert_eq!(call.callee_text(), "XCTAssertEqual");
        let arguments = call.arguments();
        assert_eq!(arguments.len(), 3);
        assert!(arguments[0].label().is_none());
        assert!(arguments[1].expr().is_some_and(is_empty_string_literal));
        assert_eq!(arguments[2].label().map(SyntaxToken::text), Some("message"));
    }

    #[test]
    fn binding_distinguishes_storage_from_computed() {
        let parse = parse("class A {\n  var a = 1\n  var b: Int { 2 }\n  var c: Int\n}\n");
        let bindings: Vec<_> = parse
            .tree
            .descendants()
            .filter_map(PatternBinding::cast)
            .map(|binding| binding.is_initialized_storage())
            .collect();
        assert_eq!(bindings, vec![true, false, false]);
    }

    #[test]
    fn func_name_follows_keyword() {
        let parse = parse("@MainActor override func testThing() async throws {}\n");
        let func: FuncDecl = first(&parse.tree);
        assert_eq!(func.name_text(), "testThing");
        assert_eq!(func.attributes().count(), 1);
        assert_eq!(func.modifiers(), vec!["override".to_string()]);
        assert!(func.body().is_some());
    }
}
