use std::cmp::Ordering;

use swift_cst_core::ast::{AstNode, ImportDecl};
use swift_cst_core::SyntaxKind::*;
use swift_cst_core::{LineEnding, SyntaxElement, SyntaxNode, Trivia};

/// Sort each run of top-level imports by module path. A run ends at a
/// non-import item or at an import preceded by an empty line, so blank-line
/// groups stay separate.
pub fn sort_imports(tree: SyntaxNode) -> SyntaxNode {
    let kind = tree.kind();
    let ending = tree.line_ending();
    let mut children: Vec<SyntaxElement> = Vec::new();
    let mut run: Vec<SyntaxNode> = Vec::new();
    for child in tree.into_children() {
        match child {
            SyntaxElement::Node(import) if import.kind() == IMPORT_DECL => {
                if !run.is_empty() && import.leading_trivia().has_blank_line() {
                    flush_run(&mut run, &mut children, ending);
                }
                run.push(import);
            }
            other => {
                flush_run(&mut run, &mut children, ending);
                children.push(other);
            }
        }
    }
    flush_run(&mut run, &mut children, ending);
    SyntaxNode::new(kind, children)
}

fn flush_run(run: &mut Vec<SyntaxNode>, out: &mut Vec<SyntaxElement>, ending: LineEnding) {
    let imports = std::mem::take(run);
    if imports.len() < 2 {
        out.extend(imports.into_iter().map(SyntaxElement::from));
        return;
    }

    let group_leading = imports[0].leading_trivia();
    let mut keyed: Vec<(bool, String, SyntaxNode)> = imports
        .into_iter()
        .enumerate()
        .map(|(index, import)| {
            let path = ImportDecl::cast(&import)
                .map(|decl| decl.path_text())
                .unwrap_or_default();
            (index == 0, path, import)
        })
        .collect();
    keyed.sort_by(|(_, a, _), (_, b, _)| compare_paths(a, b));

    for (position, (was_first, _, import)) in keyed.into_iter().enumerate() {
        let own = import.leading_trivia();
        let leading = match (position, was_first) {
            (0, true) => group_leading.clone(),
            (0, false) if own.has_comments() => {
                group_leading.concat(&own.with_leading_newlines(0, ending))
            }
            (0, false) => group_leading.clone(),
            (_, true) => Trivia::line_breaks(1, ending),
            (_, false) => own.with_leading_newlines(1, ending),
        };
        out.push(import.with_leading_trivia(leading).into());
    }
}

/// Case-insensitive order, ties broken by the exact spelling.
fn compare_paths(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use swift_cst_core::{parse, render};

    fn sorted(source: &str) -> String {
        render(&sort_imports(parse(source).tree))
    }

    #[test]
    fn run_is_sorted_case_insensitively() {
        assert_eq!(
            sorted("import Testing\n@testable import Calculator\nimport foundationExtras\nimport Foundation\n"),
            "@testable import Calculator\nimport Foundation\nimport foundationExtras\nimport Testing\n"
        );
    }

    #[test]
    fn header_comment_stays_on_top() {
        assert_eq!(
            sorted("// Copyright\n\nimport Zebra\nimport Alpha\n\nlet x = 1\n"),
            "// Copyright\n\nimport Alpha\nimport Zebra\n\nlet x = 1\n"
        );
    }

    #[test]
    fn blank_line_separates_groups() {
        assert_eq!(
            sorted("import UIKit\nimport Foundation\n\nimport Testing\n@testable import App\n"),
            "import Foundation\nimport UIKit\n\n@testable import App\nimport Testing\n"
        );
    }

    #[test]
    fn comment_travels_with_its_import() {
        assert_eq!(
            sorted("import Zebra\n// for mocks\nimport Alpha\n"),
            "// for mocks\nimport Alpha\nimport Zebra\n"
        );
    }

    #[test]
    fn crlf_separators_are_kept() {
        assert_eq!(
            sorted("import Zebra\r\nimport Alpha\r\n"),
            "import Alpha\r\nimport Zebra\r\n"
        );
    }

    #[test]
    fn non_import_ends_the_run() {
        let source = "import B\nlet x = 1\nimport A\n";
        assert_eq!(sorted(source), source);
    }
}
