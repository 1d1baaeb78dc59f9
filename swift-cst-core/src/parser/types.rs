use super::Parser;
use crate::kind::SyntaxKind::{self, *};
use crate::tree::{SyntaxElement, SyntaxNode};

/// Words that may precede a type name inside a type.
const TYPE_PREFIXES: &[&str] = &[
    "some",
    "any",
    "each",
    "repeat",
    "borrowing",
    "consuming",
    "sending",
    "isolated",
    "__owned",
    "__shared",
];

/// Net change in angle-bracket depth for an operator token such as `>>`.
fn angle_delta(text: &str) -> isize {
    text.chars()
        .map(|c| match c {
            '<' => 1,
            '>' => -1,
            _ => 0,
        })
        .sum()
}

impl Parser<'_> {
    /// A `<` opening a generic parameter clause.
    pub(crate) fn at_generic_clause(&self) -> bool {
        self.current().is_operator() && self.current_text().starts_with('<')
    }

    /// Consume `<` ... `>` as flat tokens, balancing nested angles.
    pub(crate) fn angle_group(&mut self, kind: SyntaxKind) -> SyntaxNode {
        let mut children = Vec::new();
        let mut depth = 0isize;
        loop {
            match self.current() {
                EOF | L_BRACE | R_BRACE => {
                    self.error("expected `>`");
                    break;
                }
                L_PAREN | L_BRACK => children.push(self.token_group(OTHER).into()),
                kind if kind.is_operator() => {
                    depth += angle_delta(self.current_text());
                    self.bump_into(&mut children);
                }
                _ => self.bump_into(&mut children),
            }
            if depth <= 0 {
                break;
            }
        }
        SyntaxNode::new(kind, children)
    }

    /// Number of tokens in a generic argument list starting at the current
    /// `<`, if the tokens ahead look like one (`Array<Int>(...)`).
    pub(crate) fn generic_args_len(&self) -> Option<usize> {
        let mut depth = 0isize;
        let mut n = 0;
        loop {
            if n > 0 && self.newline_before_nth(n) {
                return None;
            }
            match self.nth(n) {
                kind if kind.is_operator() => {
                    let text = self.nth_text(n);
                    if !text.chars().all(|c| matches!(c, '<' | '>' | '?' | '!' | '&')) {
                        return None;
                    }
                    depth += angle_delta(text);
                    if depth < 0 {
                        return None;
                    }
                    if depth == 0 {
                        let next = self.nth(n + 1);
                        let ends_expression = matches!(
                            next,
                            L_PAREN | DOT | R_PAREN | R_BRACK | COMMA | COLON | SEMICOLON | R_BRACE | EOF
                        ) || self.newline_before_nth(n + 1);
                        return ends_expression.then_some(n + 1);
                    }
                }
                IDENT | DOT | COMMA | COLON | L_BRACK | R_BRACK | L_PAREN | R_PAREN | ARROW
                | SELF_TYPE_KW | INOUT_KW | THROWS_KW | AT => {}
                _ => return None,
            }
            n += 1;
            if n > 64 {
                return None;
            }
        }
    }

    /// A type as a flat run of tokens, stopping at whatever cannot continue
    /// a type on the current line.
    pub(crate) fn type_node(&mut self) -> SyntaxNode {
        let mut children: Vec<SyntaxElement> = Vec::new();
        let mut angle = 0isize;
        loop {
            let kind = self.current();
            if kind == EOF {
                break;
            }
            let last = children
                .last()
                .and_then(SyntaxElement::last_token)
                .map(|token| (token.kind(), token.text().to_string()));

            if angle == 0 {
                if !children.is_empty() && self.newline_before() {
                    let open_ended = last
                        .as_ref()
                        .is_some_and(|(kind, text)| matches!(kind, ARROW | DOT) || text == "&");
                    if !open_ended {
                        break;
                    }
                }
                let continues = match kind {
                    IDENT => match &last {
                        None => true,
                        Some((last_kind, last_text)) => {
                            matches!(last_kind, DOT | ARROW | AT)
                                || last_text == "&"
                                || TYPE_PREFIXES.contains(&last_text.as_str())
                                || (*last_kind == R_PAREN
                                    && matches!(self.current_text(), "async" | "sending"))
                                || self.previous_is_attribute(&children)
                        }
                    },
                    L_PAREN | L_BRACK => true,
                    SELF_TYPE_KW | INOUT_KW | PROTOCOL_KW => true,
                    THROWS_KW | RETHROWS_KW => last.is_some(),
                    ARROW | DOT | AT => true,
                    POSTFIX_OPERATOR => matches!(self.current_text(), "?" | "!"),
                    BINARY_OPERATOR | PREFIX_OPERATOR => {
                        let text = self.current_text();
                        text == "&" || text.starts_with('<') || text == "..."
                    }
                    _ => false,
                };
                if !continues {
                    break;
                }
            }

            match kind {
                L_PAREN | L_BRACK => children.push(self.token_group(OTHER).into()),
                L_BRACE | R_BRACE => break,
                kind if kind.is_operator() => {
                    angle += angle_delta(self.current_text());
                    if angle < 0 {
                        angle = 0;
                    }
                    self.bump_into(&mut children);
                }
                _ => self.bump_into(&mut children),
            }
        }
        if children.is_empty() {
            self.error("expected type");
        }
        SyntaxNode::new(TYPE, children)
    }

    fn previous_is_attribute(&self, children: &[SyntaxElement]) -> bool {
        let tokens: Vec<_> = children
            .iter()
            .filter_map(SyntaxElement::as_token)
            .collect();
        tokens.len() >= 2 && tokens[tokens.len() - 2].kind() == AT
    }
}
