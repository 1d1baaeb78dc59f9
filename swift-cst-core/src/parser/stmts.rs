use super::exprs::ExprContext;
use super::{BlockContext, Parser};
use crate::kind::SyntaxKind::*;
use crate::tree::{SyntaxElement, SyntaxNode};

impl Parser<'_> {
    pub(crate) fn code_block(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        self.bump_into(&mut children);
        self.block_items(BlockContext::Statements, &mut children);
        self.eat(R_BRACE, &mut children);
        SyntaxNode::new(CODE_BLOCK, children)
    }

    pub(crate) fn statement(&mut self, context: BlockContext) -> SyntaxElement {
        match self.current() {
            IF_KW | GUARD_KW | FOR_KW | WHILE_KW | REPEAT_KW | SWITCH_KW | DO_KW | DEFER_KW
            | CATCH_KW | ELSE_KW => self.control_stmt().into(),
            RETURN_KW | THROW_KW | BREAK_KW | CONTINUE_KW | FALLTHROUGH_KW => {
                self.jump_stmt().into()
            }
            CASE_KW | DEFAULT_KW if context != BlockContext::Members => self.case_label().into(),
            IDENT
                if self.nth(1) == COLON
                    && matches!(self.nth(2), FOR_KW | WHILE_KW | REPEAT_KW | DO_KW | IF_KW | SWITCH_KW) =>
            {
                self.labeled_stmt().into()
            }
            UNKNOWN => self.bump_error("unexpected character").into(),
            _ => match self.expr(ExprContext::FULL) {
                Some(expr) => expr.into(),
                None => SyntaxNode::new(OTHER, vec![self.bump().into()]).into(),
            },
        }
    }

    fn labeled_stmt(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        self.bump_into(&mut children);
        self.bump_into(&mut children);
        let inner = self.control_stmt();
        children.extend(inner.into_children());
        SyntaxNode::new(CONTROL_STMT, children)
    }

    /// `if`, `guard`, `for`, `while`, `repeat`, `switch`, `do`, `defer`,
    /// including `else`/`catch` continuations. Conditions may span lines
    /// until the body's `{`.
    pub(crate) fn control_stmt(&mut self) -> SyntaxNode {
        let keyword = self.current();
        let mut children = Vec::new();
        self.bump_into(&mut children);

        let mut tail_on_line = false;
        loop {
            match self.current() {
                EOF | R_BRACE | R_PAREN | R_BRACK | SEMICOLON => break,
                _ if tail_on_line && self.newline_before() => break,
                L_BRACE => {
                    children.push(self.code_block().into());
                    if matches!(self.current(), ELSE_KW | CATCH_KW) {
                        self.bump_into(&mut children);
                        self.eat(IF_KW, &mut children);
                    } else if keyword == REPEAT_KW && self.at(WHILE_KW) {
                        self.bump_into(&mut children);
                        tail_on_line = true;
                    } else {
                        break;
                    }
                }
                _ => match self.expr(ExprContext::CONDITION) {
                    Some(expr) => children.push(expr.into()),
                    None => self.bump_into(&mut children),
                },
            }
        }
        SyntaxNode::new(CONTROL_STMT, children)
    }

    /// `return`, `throw`, `break`, `continue`, `fallthrough`.
    fn jump_stmt(&mut self) -> SyntaxNode {
        let keyword = self.current();
        let mut children = Vec::new();
        self.bump_into(&mut children);

        let ends_here = self.newline_before()
            || matches!(self.current(), EOF | R_BRACE | R_PAREN | R_BRACK | SEMICOLON);
        if !ends_here {
            match keyword {
                RETURN_KW | THROW_KW => {
                    if let Some(expr) = self.expr(ExprContext::FULL) {
                        children.push(expr.into());
                    }
                }
                BREAK_KW | CONTINUE_KW if self.at(IDENT) => self.bump_into(&mut children),
                _ => {}
            }
        }
        SyntaxNode::new(CONTROL_STMT, children)
    }

    /// `case pattern, pattern where condition:` or `default:` in a switch.
    fn case_label(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        self.bump_into(&mut children);
        loop {
            match self.current() {
                COLON => {
                    self.bump_into(&mut children);
                    break;
                }
                EOF | R_BRACE | R_PAREN | R_BRACK | L_BRACE => {
                    self.error("expected `:`");
                    break;
                }
                _ => match self.expr(ExprContext::CONDITION) {
                    Some(expr) => children.push(expr.into()),
                    None => self.bump_into(&mut children),
                },
            }
        }
        SyntaxNode::new(CONTROL_STMT, children)
    }
}
