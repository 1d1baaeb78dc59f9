use swift_cst_core::ast::{AstNode, ImportDecl};
use swift_cst_core::SyntaxKind::IMPORT_PATH;
use swift_cst_core::{make, SyntaxNode};

use crate::config::MigrationConfig;

/// `import XCTest` becomes `import Testing` in place. Attributes such as
/// `@testable` and all trivia stay where they were.
pub(super) fn rewrite_import(node: SyntaxNode, config: &MigrationConfig) -> SyntaxNode {
    let Some(import) = ImportDecl::cast(&node) else {
        return node;
    };
    if import.path_text() != config.legacy.module {
        return node;
    }
    let Some(index) = node.children().iter().position(|child| child.kind() == IMPORT_PATH) else {
        return node;
    };
    let Some(old_path) = node.children()[index].as_node() else {
        return node;
    };
    let new_path = make::import_path(&config.modern.module).with_trivia_from(old_path);
    node.replace_child(index, new_path)
}
