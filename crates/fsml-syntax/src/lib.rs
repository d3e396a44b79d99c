//! # FSML Syntax
//!
//! Lexer, parser, and tree definitions for FSML, a small markup language
//! describing event-driven state machines.
//!
//! ## Overview
//!
//! - **Lexer**: Tokenizes source text into a flat stream of tokens
//! - **Parser**: Builds a single rooted [`Node`] tree using recursive descent
//! - **AST**: Ordered nodes with attributes and children
//! - **Error Handling**: Aggregated syntax errors with source locations
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (tokenize)
//!     ↓
//! Vec<SpannedToken>
//!     ↓
//! Parser (parse)
//!     ↓
//! Node (root)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use fsml_syntax::{tokenize, parse, NodeKind};
//!
//! let source = r#"
//!     <Schema>
//!         <States>
//!             <new></new>
//!         </States>
//!     </Schema>
//! "#;
//!
//! let tokens = tokenize(source);
//! let root = parse(tokens).expect("Parsing failed");
//!
//! assert_eq!(root.name, "Schema");
//! assert_eq!(root.kind, NodeKind::Root);
//! ```
//!
//! ## Grammar Overview
//!
//! ```text
//! Document  := Element
//! Element   := <name Attribute* > Node* </name>
//! Attribute := name = " value "
//! Node      := Element | text+
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::*;
pub use error::{ParseError, ParseWarning, Span, SyntaxErrors};
pub use lexer::{Lexer, SpannedToken, Token, TokenKind, tokenize};
pub use parser::{MAX_DEPTH, ParseOutput, Parser, parse, parse_source};
