use crate::error::Span;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<name`, literal includes the leading `<`.
    BeginTag(String),
    /// `>`
    EndTag,
    /// `</name>`, captured whole.
    CloseTag(String),
    Text(String),
    Assign,
    Quote,
    Eof,
    Illegal(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    BeginTag,
    EndTag,
    CloseTag,
    Text,
    Assign,
    Quote,
    Eof,
    Illegal,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::BeginTag(_) => TokenKind::BeginTag,
            Token::EndTag => TokenKind::EndTag,
            Token::CloseTag(_) => TokenKind::CloseTag,
            Token::Text(_) => TokenKind::Text,
            Token::Assign => TokenKind::Assign,
            Token::Quote => TokenKind::Quote,
            Token::Eof => TokenKind::Eof,
            Token::Illegal(_) => TokenKind::Illegal,
        }
    }

    /// The exact source text the token was read from.
    pub fn literal(&self) -> String {
        match self {
            Token::BeginTag(s) | Token::CloseTag(s) | Token::Text(s) => s.clone(),
            Token::EndTag => ">".to_string(),
            Token::Assign => "=".to_string(),
            Token::Quote => "\"".to_string(),
            Token::Eof => String::new(),
            Token::Illegal(ch) => ch.to_string(),
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Token::BeginTag(s) => format!("begin tag '{}'", s),
            Token::EndTag => "'>'".to_string(),
            Token::CloseTag(s) => format!("close tag '{}'", s),
            Token::Text(s) => format!("text '{}'", s),
            Token::Assign => "'='".to_string(),
            Token::Quote => "'\"'".to_string(),
            Token::Eof => "end of input".to_string(),
            Token::Illegal(ch) => format!("illegal character '{}'", ch),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::BeginTag => "begin tag",
            TokenKind::EndTag => "'>'",
            TokenKind::CloseTag => "close tag",
            TokenKind::Text => "text",
            TokenKind::Assign => "'='",
            TokenKind::Quote => "'\"'",
            TokenKind::Eof => "end of input",
            TokenKind::Illegal => "illegal character",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

#[inline]
fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

#[inline]
fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n')
}

/// Pull-based tokenizer over a whole document.
///
/// Calling [`Lexer::next_token`] past the end keeps returning [`Token::Eof`].
pub struct Lexer<'a> {
    input: &'a str,
    offset: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, offset: 0, line: 1, col: 1 }
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.input[self.offset..].chars().next()
    }

    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.offset..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        self.offset += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.bump();
        }
    }

    fn read_word(&mut self) -> &'a str {
        let start = self.offset;
        while self.peek().is_some_and(is_word_char) {
            self.bump();
        }
        &self.input[start..self.offset]
    }

    fn read_close_tag(&mut self) -> &'a str {
        let start = self.offset;
        while let Some(ch) = self.bump() {
            if ch == '>' {
                break;
            }
        }
        &self.input[start..self.offset]
    }

    pub fn next_token(&mut self) -> SpannedToken {
        self.skip_whitespace();

        let (line, col, start) = (self.line, self.col, self.offset);
        let token = match self.peek() {
            None => Token::Eof,
            Some('<') => match self.peek_nth(1) {
                Some('/') => Token::CloseTag(self.read_close_tag().to_string()),
                Some(next) if is_word_char(next) => {
                    self.bump();
                    Token::BeginTag(format!("<{}", self.read_word()))
                }
                _ => {
                    self.bump();
                    Token::Illegal('<')
                }
            },
            Some('>') => {
                self.bump();
                Token::EndTag
            }
            Some('"') => {
                self.bump();
                Token::Quote
            }
            Some('=') => {
                self.bump();
                Token::Assign
            }
            Some(ch) if is_word_char(ch) => Token::Text(self.read_word().to_string()),
            Some(ch) => {
                self.bump();
                Token::Illegal(ch)
            }
        };

        SpannedToken { token, span: Span::new(line, col, start, self.offset) }
    }
}

impl Iterator for Lexer<'_> {
    type Item = SpannedToken;

    fn next(&mut self) -> Option<Self::Item> {
        let st = self.next_token();
        if st.token == Token::Eof { None } else { Some(st) }
    }
}

/// Tokenizes a whole document. The result always ends with exactly one
/// [`Token::Eof`].
pub fn tokenize(input: &str) -> Vec<SpannedToken> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::with_capacity(input.len() / 4);
    loop {
        let st = lexer.next_token();
        let done = st.token == Token::Eof;
        tokens.push(st);
        if done {
            return tokens;
        }
    }
}
