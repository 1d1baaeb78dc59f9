//! Reject files that use constructs the rewriter cannot translate.

use swift_cst_core::ast::{AstNode, CallExpr};
use swift_cst_core::SyntaxNode;
use tracing::debug;

use crate::config::MigrationConfig;
use crate::error::MigrationError;

/// Fail when any call anywhere in `tree` names an unsupported primitive.
/// The whole file is refused; nothing is rewritten.
pub fn validate(tree: &SyntaxNode, config: &MigrationConfig) -> Result<(), MigrationError> {
    if let Some(callee) = first_unsupported_call(tree, config) {
        debug!(callee = %callee, "unsupported call found");
        return Err(MigrationError::UnsupportedPattern(format!(
            "{} expectations ({}) are not supported",
            config.legacy.module,
            config.legacy.unsupported_calls.join("/")
        )));
    }
    Ok(())
}

/// True when `node` or anything below it calls an unsupported primitive.
pub fn calls_unsupported(node: &SyntaxNode, config: &MigrationConfig) -> bool {
    CallExpr::cast(node).is_some_and(|call| is_unsupported(&call.callee_text(), config))
        || first_unsupported_call(node, config).is_some()
}

fn first_unsupported_call(node: &SyntaxNode, config: &MigrationConfig) -> Option<String> {
    node.descendants()
        .filter_map(CallExpr::cast)
        .map(|call| call.callee_text())
        .find(|callee| is_unsupported(callee, config))
}

fn is_unsupported(callee: &str, config: &MigrationConfig) -> bool {
    let name = callee.strip_prefix("self.").unwrap_or(callee);
    config
        .legacy
        .unsupported_calls
        .iter()
        .any(|unsupported| unsupported == name)
}
