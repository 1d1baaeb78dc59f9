use super::exprs::ExprContext;
use super::{BlockContext, Parser};
use crate::kind::SyntaxKind::{self, *};
use crate::tree::{SyntaxElement, SyntaxNode};

const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "fileprivate",
    "internal",
    "open",
    "package",
    "final",
    "override",
    "static",
    "mutating",
    "nonmutating",
    "lazy",
    "weak",
    "unowned",
    "required",
    "convenience",
    "dynamic",
    "optional",
    "indirect",
    "nonisolated",
    "prefix",
    "postfix",
    "infix",
    "distributed",
];

const ACCESSOR_NAMES: &[&str] = &[
    "get", "set", "willSet", "didSet", "_read", "_modify", "init",
];

const DIRECTIVES: &[&str] = &[
    "#if",
    "#elseif",
    "#else",
    "#endif",
    "#warning",
    "#error",
    "#sourceLocation",
];

fn is_decl_keyword(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        IMPORT_KW
            | CLASS_KW
            | STRUCT_KW
            | ENUM_KW
            | PROTOCOL_KW
            | EXTENSION_KW
            | FUNC_KW
            | INIT_KW
            | DEINIT_KW
            | VAR_KW
            | LET_KW
            | TYPEALIAS_KW
            | SUBSCRIPT_KW
            | ASSOCIATEDTYPE_KW
            | OPERATOR_KW
            | PRECEDENCEGROUP_KW
    )
}

impl Parser<'_> {
    /// One entry of a source file, member block, or code block.
    pub(crate) fn block_item(&mut self, context: BlockContext) -> SyntaxElement {
        if self.at(SEMICOLON) {
            return self.bump().into();
        }
        if self.at_directive() {
            return self.compiler_directive().into();
        }
        if self.at_decl_start(context) {
            return self.decl().into();
        }
        self.statement(context)
    }

    /// Parse items until the closing `}` of the enclosing block (not consumed).
    pub(crate) fn block_items(&mut self, context: BlockContext, children: &mut Vec<SyntaxElement>) {
        loop {
            match self.current() {
                EOF => {
                    self.error("expected `}`");
                    return;
                }
                R_BRACE => return,
                R_PAREN | R_BRACK => {
                    let message = format!("unexpected `{}`", self.current_text());
                    children.push(self.bump_error(message).into());
                }
                _ => {
                    let start = self.position();
                    children.push(self.block_item(context));
                    if self.position() == start {
                        children.push(self.bump_error("unexpected token").into());
                    }
                }
            }
        }
    }

    fn at_directive(&self) -> bool {
        self.at(POUND_KEYWORD) && DIRECTIVES.contains(&self.current_text())
    }

    fn compiler_directive(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        self.bump_into(&mut children);
        while !self.at_eof() && !self.newline_before() {
            if matches!(self.current(), L_PAREN | L_BRACK) {
                children.push(self.token_group(OTHER).into());
            } else if matches!(self.current(), R_PAREN | R_BRACK | R_BRACE | L_BRACE) {
                break;
            } else {
                self.bump_into(&mut children);
            }
        }
        SyntaxNode::new(COMPILER_DIRECTIVE, children)
    }

    fn at_modifier(&self, n: usize) -> bool {
        match self.nth(n) {
            IDENT => MODIFIERS.contains(&self.nth_text(n)),
            CLASS_KW => {
                matches!(self.nth(n + 1), FUNC_KW | VAR_KW | LET_KW | SUBSCRIPT_KW)
                    || self.at_modifier(n + 1)
            }
            _ => false,
        }
    }

    /// Number of tokens a modifier at `n` spans, e.g. 4 for `private(set)`.
    fn modifier_len(&self, n: usize) -> usize {
        if self.nth(n + 1) == L_PAREN && self.nth(n + 2) == IDENT && self.nth(n + 3) == R_PAREN {
            4
        } else {
            1
        }
    }

    pub(crate) fn at_decl_start(&self, context: BlockContext) -> bool {
        let mut n = 0;
        loop {
            match self.nth(n) {
                AT => {
                    if n == 0 && self.nth_is_contextual(1, "unknown") {
                        return false;
                    }
                    return true;
                }
                CASE_KW => return context == BlockContext::Members,
                kind if is_decl_keyword(kind) && !self.at_modifier(n) => return true,
                IDENT if self.nth_is_contextual(n, "actor") && self.nth(n + 1) == IDENT => {
                    return true
                }
                _ if self.at_modifier(n) => n += self.modifier_len(n),
                _ => return false,
            }
        }
    }

    pub(crate) fn decl(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        self.attributes(&mut children);
        while self.at_modifier(0) {
            children.push(self.modifier().into());
        }

        match self.current() {
            IMPORT_KW => self.import_decl(children),
            CLASS_KW => self.type_decl(CLASS_DECL, children),
            STRUCT_KW => self.type_decl(STRUCT_DECL, children),
            ENUM_KW => self.type_decl(ENUM_DECL, children),
            PROTOCOL_KW => self.type_decl(PROTOCOL_DECL, children),
            EXTENSION_KW => self.type_decl(EXTENSION_DECL, children),
            IDENT if self.at_contextual("actor") && self.nth(1) == IDENT => {
                self.type_decl(ACTOR_DECL, children)
            }
            FUNC_KW => self.func_decl(children),
            INIT_KW => self.init_decl(children),
            DEINIT_KW => self.deinit_decl(children),
            VAR_KW | LET_KW => self.variable_decl(children),
            SUBSCRIPT_KW => self.subscript_decl(children),
            _ => self.other_decl(children),
        }
    }

    pub(crate) fn attributes(&mut self, children: &mut Vec<SyntaxElement>) {
        while self.at(AT) {
            children.push(self.attribute().into());
        }
    }

    fn attribute(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        self.bump_into(&mut children);
        if self.current() == IDENT || self.current().is_keyword() {
            self.bump_into(&mut children);
            while self.at(DOT) && self.adjacent() && self.nth(1) == IDENT {
                self.bump_into(&mut children);
                self.bump_into(&mut children);
            }
        } else {
            self.error("expected attribute name");
        }
        if self.at(L_PAREN) && self.adjacent() {
            children.push(self.token_group(ATTRIBUTE_ARGS).into());
        }
        SyntaxNode::new(ATTRIBUTE, children)
    }

    fn modifier(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        let len = self.modifier_len(0);
        for _ in 0..len {
            self.bump_into(&mut children);
        }
        SyntaxNode::new(MODIFIER, children)
    }

    fn import_decl(&mut self, mut children: Vec<SyntaxElement>) -> SyntaxNode {
        self.bump_into(&mut children);
        if matches!(
            self.current(),
            TYPEALIAS_KW | STRUCT_KW | CLASS_KW | ENUM_KW | PROTOCOL_KW | LET_KW | VAR_KW | FUNC_KW
        ) {
            self.bump_into(&mut children);
        }

        let mut path = Vec::new();
        if self.current() == IDENT || self.current().is_keyword() {
            self.bump_into(&mut path);
            while self.at(DOT) && !self.newline_before() {
                self.bump_into(&mut path);
                if self.newline_before() {
                    break;
                }
                if self.current() == IDENT
                    || self.current().is_keyword()
                    || self.current().is_operator()
                {
                    self.bump_into(&mut path);
                }
            }
        } else {
            self.error("expected module name");
        }
        children.push(SyntaxNode::new(IMPORT_PATH, path).into());
        SyntaxNode::new(IMPORT_DECL, children)
    }

    fn type_decl(&mut self, kind: SyntaxKind, mut children: Vec<SyntaxElement>) -> SyntaxNode {
        self.bump_into(&mut children);
        if kind == EXTENSION_DECL {
            children.push(self.type_node().into());
        } else if self.at(IDENT) {
            self.bump_into(&mut children);
        } else {
            self.error("expected type name");
        }

        if self.at_generic_clause() {
            children.push(self.angle_group(GENERIC_CLAUSE).into());
        }
        if self.at(COLON) {
            children.push(self.inheritance_clause().into());
        }
        if self.at(WHERE_KW) {
            children.push(self.where_clause().into());
        }
        if self.at(L_BRACE) {
            children.push(self.member_block().into());
        } else {
            self.error("expected `{`");
        }
        SyntaxNode::new(kind, children)
    }

    fn inheritance_clause(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        self.bump_into(&mut children);
        loop {
            let ty = self.type_node();
            children.push(SyntaxNode::new(INHERITED_TYPE, vec![ty.into()]).into());
            if !self.eat(COMMA, &mut children) {
                break;
            }
        }
        SyntaxNode::new(INHERITANCE_CLAUSE, children)
    }

    fn where_clause(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        self.bump_into(&mut children);
        loop {
            match self.current() {
                EOF | L_BRACE | R_BRACE | SEMICOLON => break,
                _ if self.newline_before() && !continues_clause(&children) => break,
                L_PAREN | L_BRACK => children.push(self.token_group(OTHER).into()),
                _ => self.bump_into(&mut children),
            }
        }
        SyntaxNode::new(WHERE_CLAUSE, children)
    }

    pub(crate) fn member_block(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        self.bump_into(&mut children);
        self.block_items(BlockContext::Members, &mut children);
        self.eat(R_BRACE, &mut children);
        SyntaxNode::new(MEMBER_BLOCK, children)
    }

    fn func_decl(&mut self, mut children: Vec<SyntaxElement>) -> SyntaxNode {
        self.bump_into(&mut children);
        match self.current() {
            IDENT | BINARY_OPERATOR | PREFIX_OPERATOR | POSTFIX_OPERATOR => {
                self.bump_into(&mut children)
            }
            kind if kind.is_keyword() => self.bump_into(&mut children),
            _ => self.error("expected function name"),
        }
        if self.at_generic_clause() {
            children.push(self.angle_group(GENERIC_CLAUSE).into());
        }
        children.push(self.signature().into());
        if self.at(WHERE_KW) {
            children.push(self.where_clause().into());
        }
        if self.at(L_BRACE) {
            children.push(self.code_block().into());
        }
        SyntaxNode::new(FUNC_DECL, children)
    }

    fn init_decl(&mut self, mut children: Vec<SyntaxElement>) -> SyntaxNode {
        self.bump_into(&mut children);
        if self.at(POSTFIX_OPERATOR) && matches!(self.current_text(), "?" | "!") {
            self.bump_into(&mut children);
        }
        if self.at_generic_clause() {
            children.push(self.angle_group(GENERIC_CLAUSE).into());
        }
        children.push(self.signature().into());
        if self.at(WHERE_KW) {
            children.push(self.where_clause().into());
        }
        if self.at(L_BRACE) {
            children.push(self.code_block().into());
        }
        SyntaxNode::new(INIT_DECL, children)
    }

    fn deinit_decl(&mut self, mut children: Vec<SyntaxElement>) -> SyntaxNode {
        self.bump_into(&mut children);
        if self.at(L_BRACE) {
            children.push(self.code_block().into());
        }
        SyntaxNode::new(DEINIT_DECL, children)
    }

    fn subscript_decl(&mut self, mut children: Vec<SyntaxElement>) -> SyntaxNode {
        self.bump_into(&mut children);
        if self.at_generic_clause() {
            children.push(self.angle_group(GENERIC_CLAUSE).into());
        }
        children.push(self.signature().into());
        if self.at(WHERE_KW) {
            children.push(self.where_clause().into());
        }
        if self.at(L_BRACE) {
            children.push(self.accessor_block().into());
        }
        SyntaxNode::new(OTHER_DECL, children)
    }

    /// Parameters, effects, and return type of a function-like declaration.
    fn signature(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        if self.at(L_PAREN) {
            children.push(self.token_group(PARAM_CLAUSE).into());
        } else {
            self.error("expected `(`");
        }
        if let Some(effects) = self.effect_specifiers() {
            children.push(effects.into());
        }
        if self.at(ARROW) {
            let mut clause = Vec::new();
            self.bump_into(&mut clause);
            clause.push(self.type_node().into());
            children.push(SyntaxNode::new(RETURN_CLAUSE, clause).into());
        }
        SyntaxNode::new(FUNC_SIGNATURE, children)
    }

    pub(crate) fn effect_specifiers(&mut self) -> Option<SyntaxNode> {
        let mut children = Vec::new();
        loop {
            if self.at_contextual("async") || self.at_contextual("reasync") || self.at(RETHROWS_KW)
            {
                self.bump_into(&mut children);
            } else if self.at(THROWS_KW) {
                self.bump_into(&mut children);
                if self.at(L_PAREN) && self.adjacent() {
                    children.push(self.token_group(OTHER).into());
                }
            } else {
                break;
            }
        }
        (!children.is_empty()).then(|| SyntaxNode::new(EFFECT_SPECIFIERS, children))
    }

    fn variable_decl(&mut self, mut children: Vec<SyntaxElement>) -> SyntaxNode {
        self.bump_into(&mut children);
        loop {
            children.push(self.pattern_binding().into());
            if !self.eat(COMMA, &mut children) {
                break;
            }
        }
        SyntaxNode::new(VARIABLE_DECL, children)
    }

    fn pattern_binding(&mut self) -> SyntaxNode {
        let mut children = Vec::new();

        let mut pattern = Vec::new();
        match self.current() {
            L_PAREN => pattern.push(self.token_group(OTHER).into()),
            IDENT | WILDCARD => self.bump_into(&mut pattern),
            kind if kind.is_keyword() => self.bump_into(&mut pattern),
            _ => self.error("expected pattern"),
        }
        children.push(SyntaxNode::new(PATTERN, pattern).into());

        if self.at(COLON) {
            let mut annotation = Vec::new();
            self.bump_into(&mut annotation);
            annotation.push(self.type_node().into());
            children.push(SyntaxNode::new(TYPE_ANNOTATION, annotation).into());
        }

        let mut has_initializer = false;
        if self.at(EQ) {
            let mut initializer = Vec::new();
            self.bump_into(&mut initializer);
            match self.expr(ExprContext::FULL) {
                Some(expr) => initializer.push(expr.into()),
                None => self.error("expected initial value"),
            }
            children.push(SyntaxNode::new(INITIALIZER_CLAUSE, initializer).into());
            has_initializer = true;
        }

        let accessor_follows = self.at(L_BRACE)
            && ((!has_initializer && !self.newline_before()) || self.at_observer_block());
        if accessor_follows {
            children.push(self.accessor_block().into());
        }
        SyntaxNode::new(PATTERN_BINDING, children)
    }

    /// `{` followed by a `willSet`/`didSet` observer.
    pub(crate) fn at_observer_block(&self) -> bool {
        self.at(L_BRACE)
            && (self.nth_is_contextual(1, "willSet") || self.nth_is_contextual(1, "didSet"))
            && matches!(self.nth(2), L_BRACE | L_PAREN | R_BRACE)
    }

    fn accessor_block(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        self.bump_into(&mut children);
        if self.at_accessor() {
            while !matches!(self.current(), R_BRACE | EOF) {
                let start = self.position();
                if self.at_accessor() {
                    children.push(self.accessor_decl().into());
                } else {
                    children.push(self.block_item(BlockContext::Statements));
                }
                if self.position() == start {
                    children.push(self.bump_error("unexpected token").into());
                }
            }
            if self.at_eof() {
                self.error("expected `}`");
            }
        } else {
            self.block_items(BlockContext::Statements, &mut children);
        }
        self.eat(R_BRACE, &mut children);
        SyntaxNode::new(ACCESSOR_BLOCK, children)
    }

    fn at_accessor(&self) -> bool {
        let mut n = 0;
        while self.nth(n) == AT {
            n += 2;
        }
        while self.nth_is_contextual(n, "mutating") || self.nth_is_contextual(n, "nonmutating") {
            n += 1;
        }
        let name_matches = (self.nth(n) == IDENT && ACCESSOR_NAMES.contains(&self.nth_text(n)))
            || self.nth(n) == INIT_KW;
        name_matches
            && (matches!(self.nth(n + 1), L_BRACE | L_PAREN | R_BRACE | THROWS_KW)
                || self.nth_is_contextual(n + 1, "async")
                || (self.nth(n + 1) == IDENT && ACCESSOR_NAMES.contains(&self.nth_text(n + 1))))
    }

    fn accessor_decl(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        self.attributes(&mut children);
        while self.at_contextual("mutating") || self.at_contextual("nonmutating") {
            children.push(self.modifier().into());
        }
        self.bump_into(&mut children);
        if self.at(L_PAREN) {
            children.push(self.token_group(PARAM_CLAUSE).into());
        }
        if let Some(effects) = self.effect_specifiers() {
            children.push(effects.into());
        }
        if self.at(L_BRACE) {
            children.push(self.code_block().into());
        }
        SyntaxNode::new(ACCESSOR_DECL, children)
    }

    /// Declarations kept as flat tokens: `typealias`, `associatedtype`,
    /// enum `case`, `operator`, `precedencegroup`, and anything unrecognised
    /// after attributes or modifiers.
    fn other_decl(&mut self, mut children: Vec<SyntaxElement>) -> SyntaxNode {
        let mut first = true;
        loop {
            let current = self.current();
            if current == EOF || current == SEMICOLON {
                break;
            }
            if !first && self.newline_before() {
                break;
            }
            match current {
                L_PAREN | L_BRACK | L_BRACE => children.push(self.token_group(OTHER).into()),
                R_PAREN | R_BRACK | R_BRACE => break,
                _ => self.bump_into(&mut children),
            }
            first = false;
        }
        SyntaxNode::new(OTHER_DECL, children)
    }
}

/// A clause continues on the next line after a trailing `,`, `:` or `&`.
fn continues_clause(children: &[SyntaxElement]) -> bool {
    children
        .last()
        .and_then(SyntaxElement::last_token)
        .is_some_and(|token| {
            matches!(token.kind(), COMMA | COLON) || token.text() == "&" || token.text() == "=="
        })
}
