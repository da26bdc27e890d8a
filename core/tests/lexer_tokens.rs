use poly_core::lexer::{self, TokenKind};

#[test]
fn single_character_operators_one_token_each() {
    let cases = [
        ("=", TokenKind::Equal),
        ("+", TokenKind::Plus),
        ("-", TokenKind::Minus),
        ("*", TokenKind::Star),
        ("/", TokenKind::Slash),
        (">", TokenKind::Greater),
        ("<", TokenKind::Lesser),
        ("!", TokenKind::Bang),
        ("(", TokenKind::LeftParen),
        (")", TokenKind::RightParen),
        (",", TokenKind::Comma),
    ];
    for (src, kind) in cases {
        let scanned = lexer::scan(src);
        assert!(!scanned.has_errors(), "unexpected errors for {:?}: {:?}", src, scanned.errors);
        assert_eq!(scanned.kinds(), vec![kind, TokenKind::Eof], "source {:?}", src);
    }

    let all = lexer::scan("= + - * / > < ! ( ) ,");
    assert_eq!(
        all.kinds(),
        vec![
            TokenKind::Equal,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Greater,
            TokenKind::Lesser,
            TokenKind::Bang,
            TokenKind::LeftParen,
            TokenKind::RightParen,
            TokenKind::Comma,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn two_character_operators() {
    let scanned = lexer::scan(">= <= != ==");
    assert_eq!(
        scanned.kinds(),
        vec![
            TokenKind::GreaterEqual,
            TokenKind::LesserEqual,
            TokenKind::BangEqual,
            TokenKind::EqualEqual,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn comment_runs_to_end_of_line() {
    let scanned = lexer::scan("// a comment + 1\nfoo 2");
    assert_eq!(
        scanned.kinds(),
        vec![TokenKind::Identifier, TokenKind::Number, TokenKind::Eof]
    );
    assert_eq!(scanned.tokens[0].text(), Some("foo"));
    assert_eq!(scanned.tokens[0].location.line, 2);
}

#[test]
fn numeric_literals_parse_as_f64() {
    for src in ["0", "7", "42", "3.141519", "100.25", "0.5"] {
        let scanned = lexer::scan(src);
        let expected: f64 = src.parse().expect("valid literal");
        assert_eq!(scanned.tokens[0].kind, TokenKind::Number);
        assert_eq!(scanned.tokens[0].number(), Some(expected), "literal {}", src);
    }
}

#[test]
fn multi_digit_number_uses_whole_lexeme() {
    let scanned = lexer::scan("137");
    assert_eq!(scanned.tokens[0].number(), Some(137.0));
    assert_eq!(scanned.tokens[0].location.start, 0);
    assert_eq!(scanned.tokens[0].location.end, 3);
}

#[test]
fn trailing_dot_is_not_part_of_number() {
    let scanned = lexer::scan("4.");
    assert_eq!(scanned.tokens[0].number(), Some(4.0));
    assert!(scanned.has_errors(), "a lone '.' is not a token");
}

#[test]
fn keywords_and_identifiers() {
    let scanned = lexer::scan("def extern return end if elif else then and or let _x x1 define");
    assert_eq!(
        scanned.kinds(),
        vec![
            TokenKind::Def,
            TokenKind::Extern,
            TokenKind::Return,
            TokenKind::End,
            TokenKind::If,
            TokenKind::Elif,
            TokenKind::Else,
            TokenKind::Then,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Let,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
    assert_eq!(scanned.tokens[13].text(), Some("define"));
    assert!(scanned.tokens[0].value.is_none());
}

#[test]
fn string_literal_keeps_raw_text() {
    let scanned = lexer::scan(r#""hello \"there\"" 1"#);
    assert!(!scanned.has_errors());
    assert_eq!(scanned.tokens[0].kind, TokenKind::String);
    assert_eq!(scanned.tokens[0].text(), Some(r#"hello \"there\""#));
    assert_eq!(scanned.tokens[1].number(), Some(1.0));
}

#[test]
fn unterminated_string_reports_tip() {
    let scanned = lexer::scan("\"abc");
    assert_eq!(scanned.errors.len(), 1);
    let err = &scanned.errors[0];
    assert!(err.to_string().contains("Unterminated string"));
    use poly_core::PolyErrorExt;
    assert_eq!(err.tip().as_deref(), Some("Consider placing an enclosing \""));
    assert_eq!(scanned.kinds(), vec![TokenKind::Eof]);
}

#[test]
fn scanning_continues_after_errors() {
    let scanned = lexer::scan("1 $ 2 # 3");
    assert_eq!(scanned.errors.len(), 2);
    assert_eq!(
        scanned.kinds(),
        vec![TokenKind::Number, TokenKind::Number, TokenKind::Number, TokenKind::Eof]
    );
    use poly_core::PolyErrorExt;
    assert_eq!(scanned.errors[0].message(), "Unexpected character '$'");
    assert_eq!(scanned.errors[1].message(), "Unexpected character '#'");
}

#[test]
fn non_ascii_character_is_one_error() {
    let scanned = lexer::scan("é + 1");
    assert_eq!(scanned.errors.len(), 1);
    assert_eq!(
        scanned.kinds(),
        vec![TokenKind::Plus, TokenKind::Number, TokenKind::Eof]
    );
}

#[test]
fn eof_sits_at_final_cursor() {
    let scanned = lexer::scan("a\nb ");
    let eof = scanned.tokens.last().expect("eof");
    assert_eq!(eof.kind, TokenKind::Eof);
    assert_eq!(eof.location.start, 4);
    assert_eq!(eof.location.line, 2);
}

#[test]
fn token_printable_forms() {
    let scanned = lexer::scan("foo 3 + \"s\"");
    let printed: Vec<String> = scanned.tokens.iter().map(|t| t.to_string()).collect();
    assert_eq!(
        printed,
        vec!["identifier 'foo'", "number 3", "'+'", "string \"s\"", "end of input"]
    );
}
