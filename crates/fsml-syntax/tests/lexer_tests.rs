use fsml_syntax::lexer::{tokenize, Token, TokenKind};
use proptest::prelude::*;

const SAMPLE: &str = r#"<Schema>
	<OnBeforeEvent>
		<Task>task1</Task>
	</OnBeforeEvent>
	<OnStateSet>
		<Task></Task>
	</OnStateSet>
		<States>
			<new>
				<Events>
					<DummyEvent targetState="pending" errorState="error">
						<Task>t1</Task>
					</DummyEvent>
				</Events>
			</new>
		</States>
	</Schema>"#;

fn trace(source: &str) -> Vec<(TokenKind, String)> {
    tokenize(source)
        .into_iter()
        .map(|st| (st.token.kind(), st.token.literal()))
        .collect()
}

#[test]
fn test_sample_token_trace() {
    use TokenKind::*;

    let expected: Vec<(TokenKind, &str)> = vec![
        (BeginTag, "<Schema"),
        (EndTag, ">"),
        (BeginTag, "<OnBeforeEvent"),
        (EndTag, ">"),
        (BeginTag, "<Task"),
        (EndTag, ">"),
        (Text, "task1"),
        (CloseTag, "</Task>"),
        (CloseTag, "</OnBeforeEvent>"),
        (BeginTag, "<OnStateSet"),
        (EndTag, ">"),
        (BeginTag, "<Task"),
        (EndTag, ">"),
        (CloseTag, "</Task>"),
        (CloseTag, "</OnStateSet>"),
        (BeginTag, "<States"),
        (EndTag, ">"),
        (BeginTag, "<new"),
        (EndTag, ">"),
        (BeginTag, "<Events"),
        (EndTag, ">"),
        (BeginTag, "<DummyEvent"),
        (Text, "targetState"),
        (Assign, "="),
        (Quote, "\""),
        (Text, "pending"),
        (Quote, "\""),
        (Text, "errorState"),
        (Assign, "="),
        (Quote, "\""),
        (Text, "error"),
        (Quote, "\""),
        (EndTag, ">"),
        (BeginTag, "<Task"),
        (EndTag, ">"),
        (Text, "t1"),
        (CloseTag, "</Task>"),
        (CloseTag, "</DummyEvent>"),
        (CloseTag, "</Events>"),
        (CloseTag, "</new>"),
        (CloseTag, "</States>"),
        (CloseTag, "</Schema>"),
        (Eof, ""),
    ];

    let actual = trace(SAMPLE);
    assert_eq!(actual.len(), expected.len());
    for (i, ((kind, literal), (exp_kind, exp_literal))) in actual.iter().zip(&expected).enumerate() {
        assert_eq!(kind, exp_kind, "kind mismatch at token {}", i);
        assert_eq!(literal, exp_literal, "literal mismatch at token {}", i);
    }
}

#[test]
fn test_illegal_characters() {
    let tokens = tokenize("<a>-!</a>");
    assert_eq!(tokens[2].token, Token::Illegal('-'));
    assert_eq!(tokens[3].token, Token::Illegal('!'));
    assert_eq!(tokens[4].token, Token::CloseTag("</a>".to_string()));
}

#[test]
fn test_word_characters() {
    let tokens = tokenize("task_1 Task2 _x");
    let texts: Vec<_> = tokens.iter().map(|st| st.token.literal()).collect();
    assert_eq!(texts, vec!["task_1", "Task2", "_x", ""]);
}

#[test]
fn test_begin_tag_may_start_with_digit() {
    let tokens = tokenize("<1st>");
    assert_eq!(tokens[0].token, Token::BeginTag("<1st".to_string()));
}

fn whitespace() -> impl Strategy<Value = String> {
    proptest::collection::vec(prop_oneof![Just(' '), Just('\t'), Just('\r'), Just('\n')], 0..4)
        .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn whitespace_between_tokens_is_absorbed(gaps in proptest::collection::vec(whitespace(), 16)) {
        let pieces = [
            "<Schema", ">", "<States", ">", "<new", ">", "<Events", ">",
            "<Go", "targetState", "=", "\"", "done", "\"", ">", "</Go>",
        ];
        let mut source = String::new();
        for (piece, gap) in pieces.iter().zip(&gaps) {
            source.push_str(gap);
            source.push_str(piece);
            source.push(' ');
        }

        let compact = trace(&pieces.join(" "));
        prop_assert_eq!(trace(&source), compact);
    }
}
