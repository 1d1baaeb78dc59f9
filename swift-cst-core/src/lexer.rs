//! Lossless tokenizer: source text to tokens with attached trivia.

use text_size::{TextRange, TextSize};

use crate::kind::SyntaxKind::{self, *};
use crate::trivia::{Trivia, TriviaPiece};

/// A token as produced by [`tokenize`], pointing back into the source.
#[derive(Debug, Clone, PartialEq)]
pub struct LexedToken {
    pub kind: SyntaxKind,
    pub range: TextRange,
    pub leading: Trivia,
    pub trailing: Trivia,
}

/// A lexical problem. The offending text is still kept in some token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub offset: TextSize,
}

/// Split `text` into tokens. The last token is always [`SyntaxKind::EOF`],
/// whose leading trivia holds whatever follows the last real token.
pub fn tokenize(text: &str) -> (Vec<LexedToken>, Vec<LexError>) {
    let mut lexer = Lexer {
        cursor: Cursor::new(text),
        tokens: Vec::new(),
        errors: Vec::new(),
    };
    lexer.run();
    (lexer.tokens, lexer.errors)
}

const EOF_CHAR: char = '\0';

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> char {
        self.rest().chars().next().unwrap_or(EOF_CHAR)
    }

    fn nth(&self, n: usize) -> char {
        self.rest().chars().nth(n).unwrap_or(EOF_CHAR)
    }

    fn previous(&self) -> char {
        self.text[..self.pos].chars().next_back().unwrap_or(EOF_CHAR)
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn advance(&mut self) -> char {
        let c = self.peek();
        if !self.is_eof() {
            self.pos += c.len_utf8();
        }
        c
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    fn advance_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while !self.is_eof() && predicate(self.peek()) {
            self.advance();
        }
    }

    fn count_while(&mut self, c: char) -> usize {
        let mut count = 0;
        while !self.is_eof() && self.peek() == c {
            self.advance();
            count += 1;
        }
        count
    }

    fn offset(&self) -> TextSize {
        TextSize::new(self.pos as u32)
    }
}

struct Lexer<'a> {
    cursor: Cursor<'a>,
    tokens: Vec<LexedToken>,
    errors: Vec<LexError>,
}

impl Lexer<'_> {
    fn run(&mut self) {
        let mut leading = self.trivia(true);
        loop {
            let start = self.cursor.pos;
            if self.cursor.is_eof() {
                self.tokens.push(LexedToken {
                    kind: EOF,
                    range: TextRange::empty(self.cursor.offset()),
                    leading,
                    trailing: Trivia::default(),
                });
                return;
            }

            let left_bound = leading.is_empty()
                && self
                    .tokens
                    .last()
                    .is_some_and(|prev| prev.trailing.is_empty())
                && !matches!(
                    self.cursor.previous(),
                    '(' | '[' | '{' | ',' | ';' | ':' | EOF_CHAR
                );
            let kind = self.token(left_bound);
            let range = TextRange::new(TextSize::new(start as u32), self.cursor.offset());
            let trailing = self.trivia(false);
            self.tokens.push(LexedToken {
                kind,
                range,
                leading,
                trailing,
            });
            leading = self.trivia(true);
        }
    }

    fn error(&mut self, message: impl Into<String>, offset: usize) {
        self.errors.push(LexError {
            message: message.into(),
            offset: TextSize::new(offset as u32),
        });
    }

    /// Trivia up to the next token. Trailing trivia (`leading == false`)
    /// stops before the first line break.
    fn trivia(&mut self, leading: bool) -> Trivia {
        let mut trivia = Trivia::default();
        loop {
            let piece = match self.cursor.peek() {
                _ if self.cursor.is_eof() => break,
                ' ' => TriviaPiece::Spaces(self.cursor.count_while(' ')),
                '\t' => TriviaPiece::Tabs(self.cursor.count_while('\t')),
                '\n' | '\r' if !leading => break,
                '\n' => TriviaPiece::Newlines(self.cursor.count_while('\n')),
                '\r' if self.cursor.nth(1) == '\n' => {
                    let mut count = 0;
                    while self.cursor.starts_with("\r\n") {
                        self.cursor.advance();
                        self.cursor.advance();
                        count += 1;
                    }
                    TriviaPiece::CarriageReturnLineFeeds(count)
                }
                '\r' => {
                    self.cursor.advance();
                    TriviaPiece::CarriageReturns(1)
                }
                '/' if self.cursor.nth(1) == '/' => {
                    let start = self.cursor.pos;
                    self.cursor.advance_while(|c| c != '\n' && c != '\r');
                    TriviaPiece::LineComment(self.cursor.text[start..self.cursor.pos].to_string())
                }
                '/' if self.cursor.nth(1) == '*' => self.block_comment(),
                '#' if self.cursor.pos == 0 && self.cursor.nth(1) == '!' => {
                    self.cursor.advance_while(|c| c != '\n' && c != '\r');
                    TriviaPiece::Unexpected(self.cursor.text[..self.cursor.pos].to_string())
                }
                '\u{000B}' | '\u{000C}' | '\u{FEFF}' | '\0' => {
                    let c = self.cursor.advance();
                    TriviaPiece::Unexpected(c.to_string())
                }
                _ => break,
            };
            trivia.push(piece);
        }
        trivia
    }

    fn block_comment(&mut self) -> TriviaPiece {
        let start = self.cursor.pos;
        let mut depth = 0usize;
        loop {
            if self.cursor.is_eof() {
                self.error("unterminated block comment", start);
                break;
            }
            if self.cursor.starts_with("/*") {
                self.cursor.advance();
                self.cursor.advance();
                depth += 1;
            } else if self.cursor.starts_with("*/") {
                self.cursor.advance();
                self.cursor.advance();
                depth -= 1;
                if depth == 0 {
                    break;
                }
            } else {
                self.cursor.advance();
            }
        }
        TriviaPiece::BlockComment(self.cursor.text[start..self.cursor.pos].to_string())
    }

    fn token(&mut self, left_bound: bool) -> SyntaxKind {
        let after_dot = self.tokens.last().is_some_and(|prev| prev.kind == DOT);
        let start = self.cursor.pos;
        match self.cursor.advance() {
            '(' => L_PAREN,
            ')' => R_PAREN,
            '[' => L_BRACK,
            ']' => R_BRACK,
            '{' => L_BRACE,
            '}' => R_BRACE,
            ',' => COMMA,
            ':' => COLON,
            ';' => SEMICOLON,
            '@' => AT,
            '\\' => BACKSLASH,
            '"' => {
                self.string_literal(0, start);
                STRING_LITERAL
            }
            '#' => self.pound(start),
            '`' => {
                self.cursor.advance_while(|c| c != '`' && c != '\n');
                if self.cursor.peek() == '`' {
                    self.cursor.advance();
                } else {
                    self.error("unterminated escaped identifier", start);
                }
                IDENT
            }
            '$' => {
                self.cursor.advance_while(is_ident_continue);
                IDENT
            }
            '0'..='9' => self.number(start, after_dot),
            c if is_ident_start(c) => {
                self.cursor.advance_while(is_ident_continue);
                let text = &self.cursor.text[start..self.cursor.pos];
                SyntaxKind::from_keyword(text).unwrap_or(IDENT)
            }
            '.' if self.cursor.peek() != '.' => DOT,
            c if is_operator_start(c) => self.operator(c, start, left_bound),
            _ => UNKNOWN,
        }
    }

    fn pound(&mut self, start: usize) -> SyntaxKind {
        if self.cursor.peek() == '#' || self.cursor.peek() == '"' {
            let save = self.cursor.pos;
            let hashes = 1 + self.cursor.count_while('#');
            if self.cursor.peek() == '"' {
                self.cursor.advance();
                self.string_literal(hashes, start);
                return STRING_LITERAL;
            }
            self.cursor.pos = save;
            return UNKNOWN;
        }
        if is_ident_start(self.cursor.peek()) {
            self.cursor.advance_while(is_ident_continue);
            return POUND_KEYWORD;
        }
        UNKNOWN
    }

    fn operator(&mut self, first: char, start: usize, left_bound: bool) -> SyntaxKind {
        if left_bound && first == '?' {
            return POSTFIX_OPERATOR;
        }
        if left_bound && first == '!' && self.cursor.peek() != '=' {
            return POSTFIX_OPERATOR;
        }

        let allow_dot = first == '.';
        loop {
            let c = self.cursor.peek();
            let continues = (is_operator_start(c) || (allow_dot && c == '.'))
                && !(c == '/' && matches!(self.cursor.nth(1), '/' | '*'));
            if self.cursor.is_eof() || !continues {
                break;
            }
            self.cursor.advance();
        }

        let right_bound = match self.cursor.peek() {
            _ if self.cursor.is_eof() => false,
            ')' | ']' | '}' | ',' | ';' | ':' => false,
            '.' => !left_bound,
            '/' if matches!(self.cursor.nth(1), '/' | '*') => false,
            c => !c.is_whitespace(),
        };

        match &self.cursor.text[start..self.cursor.pos] {
            "=" => EQ,
            "->" => ARROW,
            _ if left_bound == right_bound => BINARY_OPERATOR,
            _ if left_bound => POSTFIX_OPERATOR,
            _ => PREFIX_OPERATOR,
        }
    }

    fn number(&mut self, start: usize, after_dot: bool) -> SyntaxKind {
        let hex = self.cursor.text[start..].starts_with("0x");
        let mut float = false;
        loop {
            let c = self.cursor.peek();
            if c.is_ascii_alphanumeric() || c == '_' {
                let exponent = if hex {
                    matches!(c, 'p' | 'P')
                } else {
                    matches!(c, 'e' | 'E')
                };
                self.cursor.advance();
                if exponent && matches!(self.cursor.peek(), '+' | '-') {
                    self.cursor.advance();
                    float = true;
                }
                if exponent {
                    float = true;
                }
            } else if c == '.' && !after_dot && !float && self.cursor.nth(1).is_ascii_digit() {
                self.cursor.advance();
                float = true;
            } else {
                break;
            }
        }
        if float {
            FLOAT_LITERAL
        } else {
            INTEGER_LITERAL
        }
    }

    /// Called right after the opening quote (and any leading `#`s).
    fn string_literal(&mut self, hashes: usize, start: usize) {
        let multiline = self.cursor.starts_with("\"\"");
        if multiline {
            self.cursor.advance();
            self.cursor.advance();
        }
        let closing = format!("{}{}", if multiline { "\"\"\"" } else { "\"" }, "#".repeat(hashes));
        let escape = format!("\\{}", "#".repeat(hashes));

        loop {
            if self.cursor.is_eof() || (!multiline && matches!(self.cursor.peek(), '\n' | '\r')) {
                self.error("unterminated string literal", start);
                return;
            }
            if self.cursor.starts_with(&closing) {
                for _ in 0..closing.chars().count() {
                    self.cursor.advance();
                }
                return;
            }
            if self.cursor.starts_with(&escape) {
                for _ in 0..escape.chars().count() {
                    self.cursor.advance();
                }
                if self.cursor.peek() == '(' {
                    self.cursor.advance();
                    self.interpolation();
                } else {
                    self.cursor.advance();
                }
                continue;
            }
            self.cursor.advance();
        }
    }

    /// Skip an interpolated expression up to its closing parenthesis,
    /// stepping over nested string literals.
    fn interpolation(&mut self) {
        let mut depth = 1usize;
        while !self.cursor.is_eof() {
            let start = self.cursor.pos;
            match self.cursor.advance() {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                '"' => self.string_literal(0, start),
                '#' if matches!(self.cursor.peek(), '#' | '"') => {
                    let hashes = 1 + self.cursor.count_while('#');
                    if self.cursor.peek() == '"' {
                        self.cursor.advance();
                        self.string_literal(hashes, start);
                    }
                }
                '\n' | '\r' => return,
                _ => {}
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn is_operator_start(c: char) -> bool {
    matches!(
        c,
        '/' | '=' | '-' | '+' | '!' | '*' | '%' | '<' | '>' | '&' | '|' | '^' | '~' | '?' | '.'
    )
}
