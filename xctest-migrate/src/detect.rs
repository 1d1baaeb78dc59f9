//! Decide whether a file contains legacy test code at all.

use swift_cst_core::ast::{AstNode, CallExpr, ImportDecl, InheritanceClause};
use swift_cst_core::SyntaxNode;

use crate::config::MigrationConfig;

/// The first construct that marked a file as legacy code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyMarker {
    /// `import XCTest`
    Import,
    /// A type inheriting from `XCTestCase`.
    BaseType,
    /// A call such as `XCTAssertEqual(...)`; carries the callee.
    AssertionCall(String),
}

/// Walk the tree in source order and stop at the first legacy construct.
pub fn find_legacy_marker(tree: &SyntaxNode, config: &MigrationConfig) -> Option<LegacyMarker> {
    tree.descendants().find_map(|node| {
        if let Some(import) = ImportDecl::cast(node) {
            return (import.path_text() == config.legacy.module).then_some(LegacyMarker::Import);
        }
        if let Some(clause) = InheritanceClause::cast(node) {
            let inherits = clause
                .type_names()
                .iter()
                .any(|name| *name == config.legacy.base_type);
            return inherits.then_some(LegacyMarker::BaseType);
        }
        let call = CallExpr::cast(node)?;
        let callee = call.callee_text();
        is_legacy_callee(&callee, config).then_some(LegacyMarker::AssertionCall(callee))
    })
}

pub fn contains_legacy_code(tree: &SyntaxNode, config: &MigrationConfig) -> bool {
    find_legacy_marker(tree, config).is_some()
}

pub(crate) fn is_legacy_callee(callee: &str, config: &MigrationConfig) -> bool {
    config
        .legacy
        .call_prefixes
        .iter()
        .any(|prefix| callee.starts_with(prefix.as_str()))
}
