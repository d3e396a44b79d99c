mod elements;

use crate::ast::{Node, NodeKind};
use crate::error::{ParseError, ParseWarning, Span, SyntaxErrors};
use crate::lexer::{SpannedToken, Token, TokenKind, tokenize};

/// Deepest element nesting the parser accepts before giving up.
pub const MAX_DEPTH: usize = 256;

/// Result of a successful parse: the root node plus anything the parser
/// recovered from along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput {
    pub root: Node,
    pub warnings: Vec<ParseWarning>,
}

/// Recursive-descent parser for FSML documents.
///
/// Consumes a sequence of [`SpannedToken`]s and produces a single rooted
/// [`Node`] tree. Use the free function [`parse()`] for a convenient entry
/// point.
pub struct Parser {
    pub(super) tokens: Vec<SpannedToken>,
    pub(super) pos: usize,
    pub(super) errors: Vec<ParseError>,
    pub(super) warnings: Vec<ParseWarning>,
    pub(super) depth: usize,
}

impl Parser {
    /// Creates a new parser from a token stream. A trailing [`Token::Eof`] is
    /// appended if the stream does not already end with one.
    pub fn new(mut tokens: Vec<SpannedToken>) -> Self {
        if tokens.last().map(|st| &st.token) != Some(&Token::Eof) {
            let end = tokens.last().map(|st| st.span.end).unwrap_or(0);
            tokens.push(SpannedToken { token: Token::Eof, span: Span::new(0, 0, end, end) });
        }
        Self { tokens, pos: 0, errors: Vec::new(), warnings: Vec::new(), depth: 0 }
    }

    #[inline]
    pub(super) fn current(&self) -> &SpannedToken {
        // `new` guarantees a trailing Eof and `advance` never moves past it.
        &self.tokens[self.pos]
    }

    #[inline]
    pub(super) fn peek(&self) -> &Token {
        &self.current().token
    }

    #[inline]
    pub(super) fn peek_kind_nth(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|st| st.token.kind())
            .unwrap_or(TokenKind::Eof)
    }

    pub(super) fn advance(&mut self) -> SpannedToken {
        let st = self.current().clone();
        if st.token != Token::Eof {
            self.pos += 1;
        }
        st
    }

    pub(super) fn expect(&mut self, expected: TokenKind, context: &str) -> Result<SpannedToken, ParseError> {
        let st = self.current();
        if st.token.kind() == expected {
            return Ok(self.advance());
        }
        if st.token == Token::Eof {
            Err(ParseError::UnexpectedEof {
                expected: expected.to_string(),
                context: Some(context.to_string()),
            })
        } else {
            Err(self.unexpected(&expected.to_string()))
        }
    }

    pub(super) fn unexpected(&self, expected: &str) -> ParseError {
        let st = self.current();
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: st.token.display_name(),
            span: st.span,
        }
    }

    /// Parses exactly one top-level element followed by end of input.
    pub fn parse_document(mut self) -> Result<ParseOutput, SyntaxErrors> {
        let root = match self.peek() {
            Token::Eof => return Err(ParseError::EmptyDocument.into()),
            Token::BeginTag(_) => match self.parse_element() {
                Ok(node) => Some(node),
                Err(e) => {
                    self.errors.push(e);
                    None
                }
            },
            _ => {
                let err = self.unexpected("begin tag");
                self.errors.push(err);
                None
            }
        };

        if root.is_some() {
            let trailing = match self.peek() {
                Token::Eof => None,
                Token::BeginTag(lit) => Some(ParseError::MultipleRoots {
                    name: lit.trim_start_matches('<').to_string(),
                    span: self.current().span,
                }),
                _ => Some(self.unexpected("end of input")),
            };
            self.errors.extend(trailing);
        }

        match root {
            Some(mut root) if self.errors.is_empty() => {
                root.kind = NodeKind::Root;
                Ok(ParseOutput { root, warnings: self.warnings })
            }
            _ => Err(SyntaxErrors(self.errors)),
        }
    }
}

/// Parses a token stream into the document's root [`Node`].
///
/// This is the main entry point for the FSML parser; recovered problems are
/// dropped. Use [`parse_source`] to keep them.
pub fn parse(tokens: Vec<SpannedToken>) -> Result<Node, SyntaxErrors> {
    Parser::new(tokens).parse_document().map(|out| out.root)
}

/// Tokenizes and parses a document in one step.
pub fn parse_source(source: &str) -> Result<ParseOutput, SyntaxErrors> {
    Parser::new(tokenize(source)).parse_document()
}
