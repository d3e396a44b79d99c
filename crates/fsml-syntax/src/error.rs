use std::fmt;

/// Location of a token in the source document.
///
/// `line` and `col` are 1-based; `start`/`end` are byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub line: usize,
    pub col: usize,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(line: usize, col: usize, start: usize, end: usize) -> Self {
        Self { line, col, start, end }
    }
}

/// A fatal problem found while turning tokens into a tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    UnexpectedToken { expected: String, found: String, span: Span },
    UnexpectedEof { expected: String, context: Option<String> },
    EmptyDocument,
    MultipleRoots { name: String, span: Span },
    /// Elements nested deeper than `limit` levels.
    NestingTooDeep { limit: usize, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::UnexpectedToken { span, .. } => Some(*span),
            ParseError::UnexpectedEof { .. } => None,
            ParseError::EmptyDocument => None,
            ParseError::MultipleRoots { span, .. } => Some(*span),
            ParseError::NestingTooDeep { span, .. } => Some(*span),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedToken { expected, found, span } => {
                write!(
                    f,
                    "expected {}, got {} at line {}, column {}",
                    expected, found, span.line, span.col
                )
            }
            ParseError::UnexpectedEof { expected, context } => {
                if let Some(ctx) = context {
                    write!(f, "unexpected end of input while parsing {}, expected {}", ctx, expected)
                } else {
                    write!(f, "unexpected end of input, expected {}", expected)
                }
            }
            ParseError::EmptyDocument => write!(f, "document is empty"),
            ParseError::MultipleRoots { name, span } => {
                write!(
                    f,
                    "unsupported input: second top-level element <{}> at line {}, column {}",
                    name, span.line, span.col
                )
            }
            ParseError::NestingTooDeep { limit, span } => {
                write!(
                    f,
                    "elements nested deeper than {} levels at line {}, column {}",
                    limit, span.line, span.col
                )
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Every fatal error recorded during a single parse, in discovery order.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxErrors(pub Vec<ParseError>);

impl SyntaxErrors {
    pub fn errors(&self) -> &[ParseError] {
        &self.0
    }

    pub fn first_span(&self) -> Option<Span> {
        self.0.iter().find_map(|e| e.span())
    }
}

impl fmt::Display for SyntaxErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("\n"))
    }
}

impl std::error::Error for SyntaxErrors {}

impl From<ParseError> for SyntaxErrors {
    fn from(err: ParseError) -> Self {
        SyntaxErrors(vec![err])
    }
}

/// Something the parser recovered from. Never fails the parse.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseWarning {
    SkippedToken { literal: String, span: Span },
    MismatchedCloseTag { open: String, close: String, span: Span },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::SkippedToken { literal, span } => {
                write!(f, "skipped malformed attribute token '{}' at line {}, column {}", literal, span.line, span.col)
            }
            ParseWarning::MismatchedCloseTag { open, close, span } => {
                write!(f, "<{}> closed by </{}> at line {}, column {}", open, close, span.line, span.col)
            }
        }
    }
}
