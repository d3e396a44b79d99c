use super::{MAX_DEPTH, Parser};
use crate::ast::{Attribute, Node, NodeKind};
use crate::error::{ParseError, ParseWarning};
use crate::lexer::{Token, TokenKind};

const ATTRIBUTE_SHAPE: [TokenKind; 5] = [
    TokenKind::Text,
    TokenKind::Assign,
    TokenKind::Quote,
    TokenKind::Text,
    TokenKind::Quote,
];

fn close_tag_name(literal: &str) -> &str {
    let inner = literal.strip_prefix("</").unwrap_or(literal);
    inner.strip_suffix('>').unwrap_or(inner).trim()
}

impl Parser {
    /// `Element := begin-tag Attribute* end-tag Node* close-tag`
    pub(super) fn parse_element(&mut self) -> Result<Node, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::NestingTooDeep { limit: MAX_DEPTH, span: self.current().span });
        }
        self.depth += 1;
        let node = self.parse_element_body();
        self.depth -= 1;
        node
    }

    fn parse_element_body(&mut self) -> Result<Node, ParseError> {
        let open = self.expect(TokenKind::BeginTag, "element")?;
        let literal = open.token.literal();
        let mut node = Node::element(literal.strip_prefix('<').unwrap_or(&literal));
        let context = format!("<{}>", node.name);

        self.parse_attributes(&mut node, &context)?;
        self.expect(TokenKind::EndTag, &context)?;

        loop {
            match self.peek() {
                Token::CloseTag(_) => break,
                Token::Eof => {
                    return Err(ParseError::UnexpectedEof {
                        expected: format!("</{}>", node.name),
                        context: Some(context),
                    });
                }
                Token::BeginTag(_) => {
                    let child = self.parse_element()?;
                    node.children.push(child);
                }
                Token::Text(_) => {
                    let child = self.parse_text();
                    node.children.push(child);
                }
                _ => {
                    let err = self.unexpected("element, text or close tag");
                    self.errors.push(err);
                    self.advance();
                }
            }
        }

        let close = self.advance();
        let close_literal = close.token.literal();
        let close_name = close_tag_name(&close_literal);
        if close_name != node.name {
            self.warnings.push(ParseWarning::MismatchedCloseTag {
                open: node.name.clone(),
                close: close_name.to_string(),
                span: close.span,
            });
            node.kind = NodeKind::Unknown;
        }

        Ok(node)
    }

    /// Reads `name = " value "` pairs up to the element's `>`. Token runs that
    /// do not form a complete pair are skipped one token at a time.
    fn parse_attributes(&mut self, node: &mut Node, context: &str) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Token::EndTag => return Ok(()),
                Token::Eof => {
                    return Err(ParseError::UnexpectedEof {
                        expected: TokenKind::EndTag.to_string(),
                        context: Some(context.to_string()),
                    });
                }
                _ if self.at_attribute() => {
                    let name = self.advance().token.literal();
                    self.advance();
                    self.advance();
                    let value = self.advance().token.literal();
                    self.advance();
                    node.attributes.push(Attribute { name, value });
                }
                _ => {
                    let skipped = self.advance();
                    self.warnings.push(ParseWarning::SkippedToken {
                        literal: skipped.token.literal(),
                        span: skipped.span,
                    });
                }
            }
        }
    }

    fn at_attribute(&self) -> bool {
        ATTRIBUTE_SHAPE
            .iter()
            .enumerate()
            .all(|(i, kind)| self.peek_kind_nth(i) == *kind)
    }

    /// `TextNode := text+`, concatenated without separators.
    fn parse_text(&mut self) -> Node {
        let mut value = String::new();
        while let Token::Text(s) = self.peek() {
            value.push_str(s);
            self.advance();
        }
        Node::text(value)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::NodeKind;
    use crate::error::ParseWarning;
    use crate::parser::parse_source;

    #[test]
    fn test_close_tag_name_trims() {
        assert_eq!(super::close_tag_name("</Task>"), "Task");
        assert_eq!(super::close_tag_name("</Task  >"), "Task");
        assert_eq!(super::close_tag_name("</States\n</Schema>"), "States\n</Schema");
    }

    #[test]
    fn test_attributes_in_order_with_duplicates() {
        let out = parse_source(r#"<E a="1" b="2" a="3"></E>"#).unwrap();
        let names: Vec<_> = out.root.attributes.iter().map(|a| (a.name.as_str(), a.value.as_str())).collect();
        assert_eq!(names, vec![("a", "1"), ("b", "2"), ("a", "3")]);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_malformed_attribute_is_skipped() {
        let out = parse_source(r#"<E broken= targetState="done"></E>"#).unwrap();
        assert_eq!(out.root.attributes.len(), 1);
        assert_eq!(out.root.attribute("targetState"), Some("done"));
        assert_eq!(out.warnings.len(), 2);
        assert!(matches!(&out.warnings[0], ParseWarning::SkippedToken { literal, .. } if literal == "broken"));
    }

    #[test]
    fn test_text_run_concatenates_every_token() {
        let out = parse_source("<Task>send mail now</Task>").unwrap();
        assert_eq!(out.root.children.len(), 1);
        assert_eq!(out.root.children[0].name, "sendmailnow");
        assert_eq!(out.root.children[0].kind, NodeKind::Text);
    }

    #[test]
    fn test_single_text_token_kept_once() {
        let out = parse_source("<Task>task1</Task>").unwrap();
        assert_eq!(out.root.text_content(), Some("task1"));
    }

    #[test]
    fn test_mismatched_close_tag_marks_unknown() {
        let out = parse_source("<Schema><a></b></Schema>").unwrap();
        assert_eq!(out.root.children[0].kind, NodeKind::Unknown);
        assert!(matches!(
            &out.warnings[0],
            ParseWarning::MismatchedCloseTag { open, close, .. } if open == "a" && close == "b"
        ));
    }

    #[test]
    fn test_root_kind_wins_over_unknown() {
        let out = parse_source("<Schema></Other>").unwrap();
        assert_eq!(out.root.kind, NodeKind::Root);
        assert_eq!(out.warnings.len(), 1);
    }
}
