//! Lossless Swift syntax tree with trivia attached to tokens.
//!
//! `render(&parse(text).tree) == text` holds for every input, including
//! malformed input: every byte ends up in exactly one token or trivia piece.

pub mod ast;
pub mod kind;
pub mod lexer;
pub mod make;
pub mod parser;
pub mod tree;
pub mod trivia;
pub mod writer;

pub use kind::SyntaxKind;
pub use parser::{parse, Parse, SyntaxError};
pub use tree::{SyntaxElement, SyntaxNode, SyntaxToken};
pub use trivia::{LineEnding, Trivia, TriviaPiece};
pub use writer::render;
