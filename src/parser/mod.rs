//! Configuration outline parser using Logos (lexer) + Rowan (CST).
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! [Lexer (logos)] → Tokens
//!     ↓
//! [Outline Parser] → GreenNode (immutable, cached)
//!     ↓
//! [SyntaxNode] → Rich API for traversal
//!     ↓
//! [AST Layer] → Typed wrappers (SourceFile, Stanza, ...)
//!     ↓
//! [Lowering] → Configuration model
//! ```
//!
//! The outline knows nothing about command meaning. It only records which
//! lines nest under which, and which lines could not be tokenized.

mod ast;
mod lexer;
#[allow(clippy::module_inception)]
mod parser;
mod syntax_kind;

pub use ast::{
    AstNode, AstToken, BannerBody, Block, CommandLine, ErrorLine, Item, SourceFile, Stanza, Word,
};
pub use lexer::{Lexer, Token, tokenize};
pub use parser::{Parse, SyntaxError, parse};
pub use syntax_kind::{ConfigLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

// Re-export rowan types that consumers might need
pub use rowan::{GreenNode, TextRange, TextSize};

/// Parse text and wrap the root in its typed node.
pub fn parse_source(text: &str) -> (Parse, Option<SourceFile>) {
    let parse = parse(text);
    let root = SourceFile::cast(parse.syntax());
    (parse, root)
}
