use crate::tree::SyntaxNode;

/// Render a tree back to source text, trivia included.
pub fn render(node: &SyntaxNode) -> String {
    node.text()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn render_reproduces_parsed_text() {
        let text = "import XCTest\n\n// note\nfinal class A: XCTestCase {\n    func testX() { XCTAssertTrue(a) }\n}\n";
        assert_eq!(render(&parse(text).tree), text);
    }
}
