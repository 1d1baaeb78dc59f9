use super::{closing, BlockContext, Parser};
use crate::kind::SyntaxKind::{self, *};
use crate::tree::{SyntaxElement, SyntaxNode};

/// Whether a `{` after an expression on the same line is a trailing closure.
/// Conditions of `if`/`while`/`for`/`switch` and friends turn this off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ExprContext {
    pub(crate) trailing_closures: bool,
}

impl ExprContext {
    pub(crate) const FULL: Self = Self {
        trailing_closures: true,
    };
    pub(crate) const CONDITION: Self = Self {
        trailing_closures: false,
    };
}

impl Parser<'_> {
    /// A full expression: a unary operand optionally followed by a sequence
    /// of infix operators, `=`, ternaries, and `is`/`as` casts. Sequences are
    /// kept flat in a `BINARY_EXPR`; no precedence is applied.
    pub(crate) fn expr(&mut self, context: ExprContext) -> Option<SyntaxNode> {
        let first = self.unary(context)?;
        let mut elements: Vec<SyntaxElement> = vec![first.into()];
        loop {
            match self.current() {
                BINARY_OPERATOR | EQ => {
                    let ternary = self.current_text() == "?";
                    self.bump_into(&mut elements);
                    if ternary {
                        if let Some(then) = self.expr(context) {
                            elements.push(then.into());
                        }
                        if !self.at(COLON) {
                            self.error("expected `:` in ternary expression");
                            break;
                        }
                        self.bump_into(&mut elements);
                    }
                    match self.unary(context) {
                        Some(rhs) => elements.push(rhs.into()),
                        None => {
                            self.error("expected expression after operator");
                            break;
                        }
                    }
                }
                AS_KW | IS_KW => {
                    let cast = self.current();
                    self.bump_into(&mut elements);
                    if cast == AS_KW
                        && self.at(POSTFIX_OPERATOR)
                        && matches!(self.current_text(), "?" | "!")
                    {
                        self.bump_into(&mut elements);
                    }
                    elements.push(self.type_node().into());
                }
                _ => break,
            }
        }

        if elements.len() == 1 {
            elements.pop().and_then(SyntaxElement::into_node)
        } else {
            Some(SyntaxNode::new(BINARY_EXPR, elements))
        }
    }

    fn unary(&mut self, context: ExprContext) -> Option<SyntaxNode> {
        match self.current() {
            PREFIX_OPERATOR => {
                let mut children = Vec::new();
                self.bump_into(&mut children);
                match self.unary(context) {
                    Some(operand) => children.push(operand.into()),
                    None => self.error("expected operand"),
                }
                Some(SyntaxNode::new(PREFIX_EXPR, children))
            }
            TRY_KW => {
                let mut children = Vec::new();
                self.bump_into(&mut children);
                if self.at(POSTFIX_OPERATOR) && matches!(self.current_text(), "?" | "!") {
                    self.bump_into(&mut children);
                }
                match self.expr(context) {
                    Some(operand) => children.push(operand.into()),
                    None => self.error("expected expression after `try`"),
                }
                Some(SyntaxNode::new(TRY_EXPR, children))
            }
            AWAIT_KW => {
                let mut children = Vec::new();
                self.bump_into(&mut children);
                match self.expr(context) {
                    Some(operand) => children.push(operand.into()),
                    None => self.error("expected expression after `await`"),
                }
                Some(SyntaxNode::new(AWAIT_EXPR, children))
            }
            _ => self.postfix(context),
        }
    }

    fn postfix(&mut self, context: ExprContext) -> Option<SyntaxNode> {
        let mut base = self.primary(context)?;
        loop {
            match self.current() {
                DOT => {
                    let mut children = vec![base.into()];
                    self.bump_into(&mut children);
                    self.member_name(&mut children);
                    base = SyntaxNode::new(MEMBER_EXPR, children);
                }
                POSTFIX_OPERATOR if !self.newline_before() => {
                    let mut children = vec![base.into()];
                    self.bump_into(&mut children);
                    base = SyntaxNode::new(POSTFIX_EXPR, children);
                }
                L_PAREN if !self.newline_before() => {
                    let args = self.arg_list(ARG_LIST);
                    base = SyntaxNode::new(CALL_EXPR, vec![base.into(), args.into()]);
                }
                L_BRACK if !self.newline_before() => {
                    let args = self.arg_list(ARG_LIST);
                    base = SyntaxNode::new(SUBSCRIPT_EXPR, vec![base.into(), args.into()]);
                }
                L_BRACE
                    if context.trailing_closures
                        && !self.newline_before()
                        && !self.at_observer_block() =>
                {
                    base = self.trailing_closures(base);
                }
                BINARY_OPERATOR | PREFIX_OPERATOR
                    if self.current_text().starts_with('<') && self.adjacent() =>
                {
                    let Some(len) = self.generic_args_len() else {
                        break;
                    };
                    let mut args = Vec::new();
                    for _ in 0..len {
                        self.bump_into(&mut args);
                    }
                    let args = SyntaxNode::new(GENERIC_ARGS, args);
                    base = SyntaxNode::new(SPECIALIZE_EXPR, vec![base.into(), args.into()]);
                }
                _ => break,
            }
        }
        Some(base)
    }

    fn member_name(&mut self, children: &mut Vec<SyntaxElement>) {
        let kind = self.current();
        if kind == IDENT || kind == INTEGER_LITERAL || kind.is_keyword() {
            self.bump_into(children);
        } else {
            self.error("expected member name");
        }
    }

    /// Attach `{ ... }` and any labeled `label: { ... }` closures to `callee`.
    fn trailing_closures(&mut self, callee: SyntaxNode) -> SyntaxNode {
        let mut children = if callee.kind() == CALL_EXPR {
            callee.into_children()
        } else {
            vec![callee.into()]
        };
        children.push(self.closure_expr().into());
        while (self.at(IDENT) || self.current().is_keyword())
            && self.nth(1) == COLON
            && self.nth(2) == L_BRACE
        {
            self.bump_into(&mut children);
            self.bump_into(&mut children);
            children.push(self.closure_expr().into());
        }
        SyntaxNode::new(CALL_EXPR, children)
    }

    fn primary(&mut self, context: ExprContext) -> Option<SyntaxNode> {
        let kind = self.current();
        let node = match kind {
            IDENT | SELF_KW | SUPER_KW | SELF_TYPE_KW | WILDCARD | INIT_KW => {
                SyntaxNode::new(NAME_EXPR, vec![self.bump().into()])
            }
            kind if kind.is_literal() => SyntaxNode::new(LITERAL_EXPR, vec![self.bump().into()]),
            POUND_KEYWORD => SyntaxNode::new(MACRO_EXPR, vec![self.bump().into()]),
            DOT => {
                let mut children = Vec::new();
                self.bump_into(&mut children);
                self.member_name(&mut children);
                SyntaxNode::new(MEMBER_EXPR, children)
            }
            L_PAREN => self.arg_list(TUPLE_EXPR),
            L_BRACK => self.collection_expr(),
            L_BRACE => self.closure_expr(),
            BACKSLASH => {
                let mut children = Vec::new();
                self.bump_into(&mut children);
                if let Some(path) = self.postfix(context) {
                    children.push(path.into());
                }
                SyntaxNode::new(KEY_PATH_EXPR, children)
            }
            BINARY_OPERATOR | PREFIX_OPERATOR | POSTFIX_OPERATOR
                if matches!(self.nth(1), COMMA | R_PAREN) =>
            {
                SyntaxNode::new(OPERATOR_REF_EXPR, vec![self.bump().into()])
            }
            IF_KW | SWITCH_KW => self.control_stmt(),
            _ => return None,
        };
        Some(node)
    }

    /// `( ... )` or `[ ... ]` holding comma-separated, optionally labeled
    /// arguments. Used for calls, subscripts, and tuples.
    fn arg_list(&mut self, kind: SyntaxKind) -> SyntaxNode {
        let open = self.current();
        let close = closing(open);
        let mut children = Vec::new();
        self.bump_into(&mut children);
        loop {
            match self.current() {
                current if current == close => {
                    self.bump_into(&mut children);
                    break;
                }
                EOF | R_PAREN | R_BRACK | R_BRACE => {
                    self.error(if close == R_PAREN {
                        "expected `)`"
                    } else {
                        "expected `]`"
                    });
                    break;
                }
                COMMA => self.bump_into(&mut children),
                _ => children.push(self.argument(close).into()),
            }
        }
        SyntaxNode::new(kind, children)
    }

    fn argument(&mut self, close: SyntaxKind) -> SyntaxNode {
        let mut children = Vec::new();
        let label_like = self.at(IDENT) || self.current().is_keyword();
        if label_like && self.nth(1) == COLON {
            self.bump_into(&mut children);
            self.bump_into(&mut children);
        }
        loop {
            match self.current() {
                COMMA | EOF | R_PAREN | R_BRACK | R_BRACE => break,
                current if current == close => break,
                _ => match self.expr(ExprContext::FULL) {
                    Some(expr) => children.push(expr.into()),
                    None => self.bump_into(&mut children),
                },
            }
        }
        SyntaxNode::new(ARGUMENT, children)
    }

    fn collection_expr(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        self.bump_into(&mut children);
        loop {
            match self.current() {
                R_BRACK => {
                    self.bump_into(&mut children);
                    break;
                }
                EOF | R_PAREN | R_BRACE => {
                    self.error("expected `]`");
                    break;
                }
                COMMA | COLON => self.bump_into(&mut children),
                _ => match self.expr(ExprContext::FULL) {
                    Some(expr) => children.push(expr.into()),
                    None => self.bump_into(&mut children),
                },
            }
        }
        SyntaxNode::new(COLLECTION_EXPR, children)
    }

    pub(crate) fn closure_expr(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        self.bump_into(&mut children);
        if let Some(len) = self.closure_signature_len() {
            let mut signature = Vec::new();
            for _ in 0..len {
                self.bump_into(&mut signature);
            }
            children.push(SyntaxNode::new(CLOSURE_SIGNATURE, signature).into());
        }
        self.block_items(BlockContext::Statements, &mut children);
        self.eat(R_BRACE, &mut children);
        SyntaxNode::new(CLOSURE_EXPR, children)
    }

    /// Tokens up to and including `in` when a closure starts with a
    /// signature such as `[weak self] (a, b) -> Int in`.
    fn closure_signature_len(&self) -> Option<usize> {
        let mut depth = 0usize;
        let mut n = 0;
        loop {
            let kind = self.nth(n);
            if depth == 0 && n > 0 && self.newline_before_nth(n) && kind != IN_KW {
                return None;
            }
            match kind {
                EOF | L_BRACE | R_BRACE => return None,
                IN_KW if depth == 0 => return (n > 0).then_some(n + 1),
                L_PAREN | L_BRACK => depth += 1,
                R_PAREN | R_BRACK => depth = depth.checked_sub(1)?,
                _ if depth > 0 => {}
                IDENT | WILDCARD | COMMA | COLON | AT | ARROW | DOT | THROWS_KW | RETHROWS_KW
                | SELF_KW | SELF_TYPE_KW | INOUT_KW | POSTFIX_OPERATOR => {}
                _ => return None,
            }
            n += 1;
        }
    }
}
