//! Error-tolerant recursive-descent parser.
//!
//! The parser builds owned [`SyntaxNode`]s bottom-up and never fails: text it
//! does not understand is kept in `OTHER` or `ERROR` nodes so that rendering
//! the tree always reproduces the input.

mod exprs;
mod items;
mod stmts;
mod types;

use text_size::TextSize;
use thiserror::Error;

use crate::kind::SyntaxKind::{self, *};
use crate::lexer::{self, LexedToken};
use crate::tree::{SyntaxElement, SyntaxNode, SyntaxToken};

/// A problem found while parsing. The tree is still complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (offset {offset:?})")]
pub struct SyntaxError {
    pub message: String,
    pub offset: TextSize,
}

/// Result of [`parse`]: a lossless tree plus any syntax errors.
#[derive(Debug, Clone)]
pub struct Parse {
    pub tree: SyntaxNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parse a Swift source file.
pub fn parse(text: &str) -> Parse {
    let (tokens, lex_errors) = lexer::tokenize(text);
    let mut parser = Parser::new(text, tokens);
    let tree = parser.source_file();

    let mut errors: Vec<SyntaxError> = lex_errors
        .into_iter()
        .map(|error| SyntaxError {
            message: error.message,
            offset: error.offset,
        })
        .collect();
    errors.extend(parser.errors);
    errors.sort_by_key(|error| error.offset);
    Parse { tree, errors }
}

/// Where a run of block items lives; decides how `case` is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockContext {
    TopLevel,
    Members,
    Statements,
}

pub(crate) struct Parser<'t> {
    text: &'t str,
    tokens: Vec<LexedToken>,
    pos: usize,
    errors: Vec<SyntaxError>,
}

impl<'t> Parser<'t> {
    fn new(text: &'t str, tokens: Vec<LexedToken>) -> Self {
        Self {
            text,
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    fn token_at(&self, n: usize) -> Option<&LexedToken> {
        self.tokens
            .get(self.pos + n)
            .or_else(|| self.tokens.last())
    }

    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        self.token_at(n).map_or(EOF, |token| token.kind)
    }

    pub(crate) fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    pub(crate) fn nth_text(&self, n: usize) -> &'t str {
        let text: &'t str = self.text;
        match self.token_at(n) {
            Some(token) => {
                let range: std::ops::Range<usize> = token.range.into();
                &text[range]
            }
            None => "",
        }
    }

    pub(crate) fn current_text(&self) -> &'t str {
        self.nth_text(0)
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.at(EOF)
    }

    /// The current token is an identifier spelled `text`.
    pub(crate) fn at_contextual(&self, text: &str) -> bool {
        self.nth_is_contextual(0, text)
    }

    pub(crate) fn nth_is_contextual(&self, n: usize, text: &str) -> bool {
        self.nth(n) == IDENT && self.nth_text(n) == text
    }

    /// A line break separates the `n`th token from the one before it.
    pub(crate) fn newline_before_nth(&self, n: usize) -> bool {
        self.token_at(n)
            .is_some_and(|token| token.leading.contains_newline())
    }

    pub(crate) fn newline_before(&self) -> bool {
        self.newline_before_nth(0)
    }

    /// No trivia at all between the previous token and the current one.
    pub(crate) fn adjacent(&self) -> bool {
        let Some(current) = self.tokens.get(self.pos) else {
            return false;
        };
        let previous_trailing_empty = self
            .pos
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .is_some_and(|previous| previous.trailing.is_empty());
        previous_trailing_empty && current.leading.is_empty()
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Consume the current token. At end of input this returns an empty
    /// placeholder and does not advance.
    pub(crate) fn bump(&mut self) -> SyntaxToken {
        let Some(lexed) = self.tokens.get_mut(self.pos) else {
            return SyntaxToken::new(EOF, "");
        };
        if lexed.kind == EOF {
            return SyntaxToken::new(EOF, "");
        }
        let range: std::ops::Range<usize> = lexed.range.into();
        let token = SyntaxToken::new(lexed.kind, &self.text[range])
            .with_leading(std::mem::take(&mut lexed.leading))
            .with_trailing(std::mem::take(&mut lexed.trailing));
        self.pos += 1;
        token
    }

    pub(crate) fn bump_into(&mut self, children: &mut Vec<SyntaxElement>) {
        let token = self.bump();
        children.push(token.into());
    }

    /// Consume the current token if it has `kind`.
    pub(crate) fn eat(&mut self, kind: SyntaxKind, children: &mut Vec<SyntaxElement>) -> bool {
        if self.at(kind) {
            self.bump_into(children);
            true
        } else {
            false
        }
    }

    /// Consume `kind` or record an error without consuming anything.
    pub(crate) fn expect(&mut self, kind: SyntaxKind, children: &mut Vec<SyntaxElement>) {
        if !self.eat(kind, children) {
            self.error(format!("expected {}", describe(kind)));
        }
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let offset = self
            .token_at(0)
            .map_or(TextSize::new(0), |token| token.range.start());
        self.errors.push(SyntaxError {
            message: message.into(),
            offset,
        });
    }

    /// Wrap the current token in an `ERROR` node and record why.
    pub(crate) fn bump_error(&mut self, message: impl Into<String>) -> SyntaxNode {
        self.error(message);
        let token = self.bump();
        SyntaxNode::new(ERROR, vec![token.into()])
    }

    fn source_file(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        while !self.at_eof() {
            let start = self.position();
            if matches!(self.current(), R_PAREN | R_BRACK | R_BRACE) {
                let message = format!("unexpected `{}`", self.current_text());
                children.push(self.bump_error(message).into());
                continue;
            }
            children.push(self.block_item(BlockContext::TopLevel));
            if self.position() == start {
                children.push(self.bump_error("unexpected token").into());
            }
        }

        let eof = self.tokens.get_mut(self.pos).map_or_else(
            || SyntaxToken::new(EOF, ""),
            |lexed| SyntaxToken::new(EOF, "").with_leading(std::mem::take(&mut lexed.leading)),
        );
        children.push(eof.into());
        SyntaxNode::new(SOURCE_FILE, children)
    }

    /// Consume a bracketed group, opener to matching closer, as flat tokens
    /// inside a node of `kind`.
    pub(crate) fn token_group(&mut self, kind: SyntaxKind) -> SyntaxNode {
        let mut children = Vec::new();
        let mut closers = Vec::new();
        loop {
            let current = self.current();
            match current {
                EOF => {
                    if let Some(closer) = closers.last() {
                        self.error(format!("expected {}", describe(*closer)));
                    }
                    break;
                }
                L_PAREN | L_BRACK | L_BRACE => closers.push(closing(current)),
                R_PAREN | R_BRACK | R_BRACE => {
                    if closers.last() == Some(&current) {
                        closers.pop();
                    } else {
                        let message = format!("unexpected `{}`", self.current_text());
                        self.error(message);
                        if !closers.contains(&current) {
                            self.bump_into(&mut children);
                            continue;
                        }
                        while closers.last().is_some_and(|closer| *closer != current) {
                            closers.pop();
                        }
                        closers.pop();
                    }
                }
                _ => {}
            }
            self.bump_into(&mut children);
            if closers.is_empty() {
                break;
            }
        }
        SyntaxNode::new(kind, children)
    }
}

pub(crate) fn closing(open: SyntaxKind) -> SyntaxKind {
    match open {
        L_PAREN => R_PAREN,
        L_BRACK => R_BRACK,
        _ => R_BRACE,
    }
}

fn describe(kind: SyntaxKind) -> &'static str {
    match kind {
        L_PAREN => "`(`",
        R_PAREN => "`)`",
        L_BRACK => "`[`",
        R_BRACK => "`]`",
        L_BRACE => "`{`",
        R_BRACE => "`}`",
        COLON => "`:`",
        IDENT => "identifier",
        _ => "token",
    }
}
