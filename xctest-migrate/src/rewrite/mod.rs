//! Structural rewrite from the legacy framework to the modern one.
//!
//! The rewriter rebuilds the tree bottom-up. Each node kind with a rule is
//! matched explicitly; every other node is rebuilt from its rewritten
//! children and keeps its tokens and trivia untouched.

mod assertions;
mod decl;
mod imports;
mod lifecycle;
mod test_methods;

use std::collections::HashSet;

use swift_cst_core::ast::{AstNode, TypeDecl};
use swift_cst_core::SyntaxKind::*;
use swift_cst_core::{LineEnding, SyntaxElement, SyntaxNode};

use crate::config::MigrationConfig;

pub use assertions::{needs_explicit_bool_comparison, rewrite_assertion};
pub use test_methods::{make_async, test_name};

/// Rewrite every legacy construct in a parsed file.
pub fn rewrite_file(tree: SyntaxNode, config: &MigrationConfig) -> SyntaxNode {
    let rewriter = Rewriter::new(&tree, config);
    rewriter.rewrite_node(tree)
}

pub(crate) struct Rewriter<'c> {
    config: &'c MigrationConfig,
    /// Names of the suites converted in this file; their extensions get
    /// test-method rewriting too.
    migrated_types: HashSet<String>,
    /// Convention for generated line breaks.
    line_ending: LineEnding,
}

impl<'c> Rewriter<'c> {
    fn new(tree: &SyntaxNode, config: &'c MigrationConfig) -> Self {
        let migrated_types = tree
            .descendants()
            .filter_map(TypeDecl::cast)
            .filter(|decl| is_test_suite(*decl, config))
            .filter_map(|decl| decl.name())
            .collect();
        Self {
            config,
            migrated_types,
            line_ending: tree.line_ending(),
        }
    }

    pub(crate) fn config(&self) -> &'c MigrationConfig {
        self.config
    }

    pub(crate) fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub(crate) fn rewrite_node(&self, node: SyntaxNode) -> SyntaxNode {
        match node.kind() {
            IMPORT_DECL => imports::rewrite_import(node, self.config),
            CLASS_DECL if TypeDecl::cast(&node).is_some_and(|decl| is_test_suite(decl, self.config)) => {
                decl::rewrite_test_suite(self, node)
            }
            EXTENSION_DECL if self.extends_migrated_type(&node) => decl::rewrite_extension(self, node),
            CALL_EXPR => rewrite_assertion(self.rewrite_children(node)),
            _ => self.rewrite_children(node),
        }
    }

    pub(crate) fn rewrite_children(&self, node: SyntaxNode) -> SyntaxNode {
        if node.children().iter().all(|child| child.as_node().is_none()) {
            return node;
        }
        let kind = node.kind();
        let children = node
            .into_children()
            .into_iter()
            .map(|child| match child {
                SyntaxElement::Node(child) => self.rewrite_node(child).into(),
                token => token,
            })
            .collect();
        SyntaxNode::new(kind, children)
    }

    fn extends_migrated_type(&self, node: &SyntaxNode) -> bool {
        TypeDecl::cast(node)
            .and_then(|decl| decl.name())
            .is_some_and(|name| self.migrated_types.contains(&name))
    }
}

/// A class that lists the legacy base type in its inheritance clause.
fn is_test_suite(decl: TypeDecl<'_>, config: &MigrationConfig) -> bool {
    decl.syntax().kind() == CLASS_DECL && decl.inherits(&config.legacy.base_type)
}
