//! Formatting passes that run after the structural rewrite.

mod imports;
mod spacing;

use swift_cst_core::SyntaxNode;

pub use imports::sort_imports;
pub use spacing::fix_optional_subscripts;

/// Sort import runs, then clear stray spaces between `?` and `[`.
pub fn reconcile(tree: SyntaxNode) -> SyntaxNode {
    fix_optional_subscripts(sort_imports(tree))
}
