use std::fmt::{self, Display, Formatter};

use crate::kind::SyntaxKind;
use crate::trivia::{LineEnding, Trivia};

/// A leaf of the tree: the token text plus the trivia on either side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntaxToken {
    kind: SyntaxKind,
    text: String,
    leading: Trivia,
    trailing: Trivia,
}

impl SyntaxToken {
    /// Create a token with no trivia.
    pub fn new(kind: SyntaxKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            leading: Trivia::default(),
            trailing: Trivia::default(),
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    /// The token text without trivia.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn leading(&self) -> &Trivia {
        &self.leading
    }

    pub fn trailing(&self) -> &Trivia {
        &self.trailing
    }

    pub fn with_leading(mut self, trivia: Trivia) -> Self {
        self.leading = trivia;
        self
    }

    pub fn with_trailing(mut self, trivia: Trivia) -> Self {
        self.trailing = trivia;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_kind(mut self, kind: SyntaxKind) -> Self {
        self.kind = kind;
        self
    }

    fn write_to(&self, out: &mut String) {
        self.leading.write_to(out);
        out.push_str(&self.text);
        self.trailing.write_to(out);
    }
}

impl Display for SyntaxToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_to(&mut out);
        f.write_str(&out)
    }
}

/// Either child of a [`SyntaxNode`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SyntaxElement {
    Node(SyntaxNode),
    Token(SyntaxToken),
}

impl SyntaxElement {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            Self::Node(node) => node.kind(),
            Self::Token(token) => token.kind(),
        }
    }

    pub fn as_node(&self) -> Option<&SyntaxNode> {
        match self {
            Self::Node(node) => Some(node),
            Self::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&SyntaxToken> {
        match self {
            Self::Token(token) => Some(token),
            Self::Node(_) => None,
        }
    }

    pub fn into_node(self) -> Option<SyntaxNode> {
        match self {
            Self::Node(node) => Some(node),
            Self::Token(_) => None,
        }
    }

    pub fn first_token(&self) -> Option<&SyntaxToken> {
        match self {
            Self::Node(node) => node.first_token(),
            Self::Token(token) => Some(token),
        }
    }

    pub fn last_token(&self) -> Option<&SyntaxToken> {
        match self {
            Self::Node(node) => node.last_token(),
            Self::Token(token) => Some(token),
        }
    }

    pub fn leading_trivia(&self) -> Trivia {
        self.first_token()
            .map(|token| token.leading().clone())
            .unwrap_or_default()
    }

    pub fn trailing_trivia(&self) -> Trivia {
        self.last_token()
            .map(|token| token.trailing().clone())
            .unwrap_or_default()
    }

    pub fn with_leading_trivia(self, trivia: Trivia) -> Self {
        match self {
            Self::Node(node) => Self::Node(node.with_leading_trivia(trivia)),
            Self::Token(token) => Self::Token(token.with_leading(trivia)),
        }
    }

    pub fn with_trailing_trivia(self, trivia: Trivia) -> Self {
        match self {
            Self::Node(node) => Self::Node(node.with_trailing_trivia(trivia)),
            Self::Token(token) => Self::Token(token.with_trailing(trivia)),
        }
    }

    pub fn text(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        match self {
            Self::Node(node) => node.write_to(out),
            Self::Token(token) => token.write_to(out),
        }
    }

    fn first_token_mut(&mut self) -> Option<&mut SyntaxToken> {
        match self {
            Self::Node(node) => node.first_token_mut(),
            Self::Token(token) => Some(token),
        }
    }

    fn last_token_mut(&mut self) -> Option<&mut SyntaxToken> {
        match self {
            Self::Node(node) => node.last_token_mut(),
            Self::Token(token) => Some(token),
        }
    }
}

impl From<SyntaxNode> for SyntaxElement {
    fn from(node: SyntaxNode) -> Self {
        Self::Node(node)
    }
}

impl From<SyntaxToken> for SyntaxElement {
    fn from(token: SyntaxToken) -> Self {
        Self::Token(token)
    }
}

/// An owned interior node. Replacement APIs consume the node and return a
/// new one; a tree is never edited through a shared reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntaxNode {
    kind: SyntaxKind,
    children: Vec<SyntaxElement>,
}

impl SyntaxNode {
    pub fn new(kind: SyntaxKind, children: Vec<SyntaxElement>) -> Self {
        Self { kind, children }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    pub fn children(&self) -> &[SyntaxElement] {
        &self.children
    }

    pub fn into_children(self) -> Vec<SyntaxElement> {
        self.children
    }

    pub fn child_nodes(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter().filter_map(SyntaxElement::as_node)
    }

    pub fn child_tokens(&self) -> impl Iterator<Item = &SyntaxToken> {
        self.children.iter().filter_map(SyntaxElement::as_token)
    }

    /// First direct child node of `kind`.
    pub fn child_node(&self, kind: SyntaxKind) -> Option<&SyntaxNode> {
        self.child_nodes().find(|node| node.kind == kind)
    }

    /// First direct child token of `kind`.
    pub fn child_token(&self, kind: SyntaxKind) -> Option<&SyntaxToken> {
        self.child_tokens().find(|token| token.kind == kind)
    }

    /// Every node below this one, in preorder, not including `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self
                .children
                .iter()
                .rev()
                .filter_map(SyntaxElement::as_node)
                .collect(),
        }
    }

    /// Every token below this one, in source order.
    pub fn tokens(&self) -> Vec<&SyntaxToken> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a SyntaxToken>) {
        for child in &self.children {
            match child {
                SyntaxElement::Node(node) => node.collect_tokens(out),
                SyntaxElement::Token(token) => out.push(token),
            }
        }
    }

    /// Convention of the first line break anywhere in this node's trivia,
    /// `Lf` when there is none.
    pub fn line_ending(&self) -> LineEnding {
        self.tokens()
            .into_iter()
            .find_map(|token| {
                token
                    .leading()
                    .line_ending()
                    .or_else(|| token.trailing().line_ending())
            })
            .unwrap_or_default()
    }

    pub fn first_token(&self) -> Option<&SyntaxToken> {
        self.children.iter().find_map(SyntaxElement::first_token)
    }

    pub fn last_token(&self) -> Option<&SyntaxToken> {
        self.children.iter().rev().find_map(SyntaxElement::last_token)
    }

    fn first_token_mut(&mut self) -> Option<&mut SyntaxToken> {
        self.children
            .iter_mut()
            .find_map(SyntaxElement::first_token_mut)
    }

    fn last_token_mut(&mut self) -> Option<&mut SyntaxToken> {
        self.children
            .iter_mut()
            .rev()
            .find_map(SyntaxElement::last_token_mut)
    }

    /// Leading trivia of the first token, or empty for a token-less node.
    pub fn leading_trivia(&self) -> Trivia {
        self.first_token()
            .map(|token| token.leading().clone())
            .unwrap_or_default()
    }

    /// Trailing trivia of the last token, or empty for a token-less node.
    pub fn trailing_trivia(&self) -> Trivia {
        self.last_token()
            .map(|token| token.trailing().clone())
            .unwrap_or_default()
    }

    pub fn with_leading_trivia(mut self, trivia: Trivia) -> Self {
        if let Some(token) = self.first_token_mut() {
            token.leading = trivia;
        }
        self
    }

    pub fn with_trailing_trivia(mut self, trivia: Trivia) -> Self {
        if let Some(token) = self.last_token_mut() {
            token.trailing = trivia;
        }
        self
    }

    /// Copy the leading and trailing trivia of `original` onto this node.
    /// Used when `self` replaces `original` in the tree.
    pub fn with_trivia_from(self, original: &SyntaxNode) -> Self {
        self.with_leading_trivia(original.leading_trivia())
            .with_trailing_trivia(original.trailing_trivia())
    }

    pub fn with_children(mut self, children: Vec<SyntaxElement>) -> Self {
        self.children = children;
        self
    }

    pub fn with_kind(mut self, kind: SyntaxKind) -> Self {
        self.kind = kind;
        self
    }

    /// Replace the child at `index`. Out-of-range indices leave the node as is.
    pub fn replace_child(mut self, index: usize, element: impl Into<SyntaxElement>) -> Self {
        if let Some(slot) = self.children.get_mut(index) {
            *slot = element.into();
        }
        self
    }

    pub fn insert_child(mut self, index: usize, element: impl Into<SyntaxElement>) -> Self {
        let index = index.min(self.children.len());
        self.children.insert(index, element.into());
        self
    }

    pub fn remove_child(mut self, index: usize) -> Self {
        if index < self.children.len() {
            self.children.remove(index);
        }
        self
    }

    /// Full source text, including outer trivia.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    /// Source text without the first token's leading and the last token's
    /// trailing trivia.
    pub fn trimmed_text(&self) -> String {
        let tokens = self.tokens();
        let mut out = String::new();
        let last = tokens.len().saturating_sub(1);
        for (index, token) in tokens.iter().enumerate() {
            if index > 0 {
                token.leading.write_to(&mut out);
            }
            out.push_str(&token.text);
            if index < last {
                token.trailing.write_to(&mut out);
            }
        }
        out
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        for child in &self.children {
            child.write_to(out);
        }
    }
}

impl Display for SyntaxNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Preorder iterator returned by [`SyntaxNode::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a SyntaxNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(
            node.children
                .iter()
                .rev()
                .filter_map(SyntaxElement::as_node),
        );
        Some(node)
    }
}
