// tests/lexer_tests.rs

use sift_lang::ast::TokenKind;
use sift_lang::lexer::{Dialect, LexError, Lexer};

fn lex(input: &str) -> Vec<(TokenKind, &str)> {
    Lexer::new(input)
        .map(|token| {
            let token = token.unwrap();
            (token.kind, token.lexeme)
        })
        .collect()
}

fn kinds(input: &str) -> Vec<TokenKind> {
    lex(input).into_iter().map(|(kind, _)| kind).collect()
}

// ============================================================================
// Punctuation and Comparison Operators
// ============================================================================

#[test]
fn test_punctuation() {
    let test_cases = vec![
        ("(", TokenKind::LParen),
        (")", TokenKind::RParen),
        ("[", TokenKind::LBracket),
        ("]", TokenKind::RBracket),
        (",", TokenKind::Comma),
    ];

    for (input, expected) in test_cases {
        assert_eq!(kinds(input), vec![expected, TokenKind::Eof], "Failed for input: {}", input);
    }
}

#[test]
fn test_comparison_operators() {
    let test_cases = vec![
        ("==", TokenKind::Equal),
        ("!=", TokenKind::NotEqual),
        ("<>", TokenKind::NotEqual),
        ("<", TokenKind::Lt),
        ("<=", TokenKind::Lte),
        (">", TokenKind::Gt),
        (">=", TokenKind::Gte),
    ];

    for (input, expected) in test_cases {
        assert_eq!(kinds(input), vec![expected, TokenKind::Eof], "Failed for input: {}", input);
    }
}

#[test]
fn test_multi_char_operators_win_over_prefixes() {
    assert_eq!(
        kinds("a<=1"),
        vec![TokenKind::Key, TokenKind::Lte, TokenKind::Number, TokenKind::Eof]
    );
    assert_eq!(
        kinds("a<>1"),
        vec![TokenKind::Key, TokenKind::NotEqual, TokenKind::Number, TokenKind::Eof]
    );
}

// ============================================================================
// Keywords
// ============================================================================

#[test]
fn test_keyword_operators_any_case() {
    let test_cases = vec![
        ("AND", TokenKind::And),
        ("and", TokenKind::And),
        ("Or", TokenKind::Or),
        ("not", TokenKind::Not),
        ("IN", TokenKind::In),
        ("like", TokenKind::Like),
        ("MaTcH", TokenKind::Match),
        ("CONTAINS", TokenKind::Contains),
        ("contain", TokenKind::Contains),
    ];

    for (input, expected) in test_cases {
        assert_eq!(kinds(input), vec![expected, TokenKind::Eof], "Failed for input: {}", input);
    }
}

#[test]
fn test_literal_keywords() {
    assert_eq!(
        kinds("TRUE false True"),
        vec![TokenKind::Boolean, TokenKind::Boolean, TokenKind::Boolean, TokenKind::Eof]
    );
    assert_eq!(
        kinds("NULL none Nil"),
        vec![TokenKind::Null, TokenKind::Null, TokenKind::Null, TokenKind::Eof]
    );
    assert_eq!(kinds("now"), vec![TokenKind::Now, TokenKind::Eof]);
}

#[test]
fn test_keyword_prefixes_are_identifiers() {
    assert_eq!(
        lex("index nothing order truthy nullable"),
        vec![
            (TokenKind::Key, "index"),
            (TokenKind::Key, "nothing"),
            (TokenKind::Key, "order"),
            (TokenKind::Key, "truthy"),
            (TokenKind::Key, "nullable"),
            (TokenKind::Eof, ""),
        ]
    );
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_numbers() {
    for input in ["0", "42", "-7", "3.25", "-1.5e3", "2E-2"] {
        assert_eq!(lex(input), vec![(TokenKind::Number, input), (TokenKind::Eof, "")]);
    }
}

#[test]
fn test_strings_keep_their_quotes() {
    assert_eq!(
        lex(r#""hello" 'world'"#),
        vec![
            (TokenKind::String, r#""hello""#),
            (TokenKind::String, "'world'"),
            (TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_string_escapes() {
    let input = r#""say \"hi\"\n\u00e9""#;
    assert_eq!(lex(input), vec![(TokenKind::String, input), (TokenKind::Eof, "")]);
}

#[test]
fn test_backtick_keys() {
    assert_eq!(
        lex("`first name` == 'x'"),
        vec![
            (TokenKind::Key, "`first name`"),
            (TokenKind::Equal, "=="),
            (TokenKind::String, "'x'"),
            (TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_bare_keys_with_paths() {
    assert_eq!(
        lex("users.home-address.city_name"),
        vec![(TokenKind::Key, "users.home-address.city_name"), (TokenKind::Eof, "")]
    );
}

#[test]
fn test_regexp() {
    assert_eq!(
        lex(r"/\d+\s*finish/"),
        vec![(TokenKind::Regexp, r"/\d+\s*finish/"), (TokenKind::Eof, "")]
    );
    assert_eq!(
        lex(r"/a\/b/"),
        vec![(TokenKind::Regexp, r"/a\/b/"), (TokenKind::Eof, "")]
    );
}

#[test]
fn test_regexp_closes_at_last_slash() {
    // Two regular expressions on one line lex as a single literal
    assert_eq!(
        lex("/x/ OR b MATCH /y/"),
        vec![(TokenKind::Regexp, "/x/ OR b MATCH /y/"), (TokenKind::Eof, "")]
    );
}

// ============================================================================
// Whole Queries
// ============================================================================

#[test]
fn test_query() {
    assert_eq!(
        kinds("NOT (age >= 18 AND role IN ['admin', 'user']) OR name LIKE 'b*'"),
        vec![
            TokenKind::Not,
            TokenKind::LParen,
            TokenKind::Key,
            TokenKind::Gte,
            TokenKind::Number,
            TokenKind::And,
            TokenKind::Key,
            TokenKind::In,
            TokenKind::LBracket,
            TokenKind::String,
            TokenKind::Comma,
            TokenKind::String,
            TokenKind::RBracket,
            TokenKind::RParen,
            TokenKind::Or,
            TokenKind::Key,
            TokenKind::Like,
            TokenKind::String,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_offsets() {
    let offsets: Vec<usize> = Lexer::new("a == 'b'")
        .map(|t| t.unwrap().offset)
        .collect();
    assert_eq!(offsets, vec![0, 2, 5, 8]);
}

#[test]
fn test_whitespace_only() {
    assert_eq!(kinds(" \t\n "), vec![TokenKind::Eof]);
}

// ============================================================================
// Errors and Dialects
// ============================================================================

#[test]
fn test_unexpected_character() {
    let mut lexer = Lexer::new("a == 1 & b");
    for _ in 0..3 {
        lexer.next_token().unwrap();
    }
    assert_eq!(
        lexer.next_token(),
        Err(LexError {
            offset: 7,
            found: '&'
        })
    );
}

#[test]
fn test_unterminated_string() {
    let err = Lexer::new("name == \"bob").nth(2).unwrap().unwrap_err();
    assert_eq!(err.offset, 8);
    assert_eq!(err.found, '"');
}

#[test]
fn test_iteration_ends_after_error() {
    let results: Vec<_> = Lexer::new("a # b").collect();
    assert_eq!(results.len(), 2);
    assert!(results[1].is_err());
}

#[test]
fn test_strict_dialect_rejects_bare_keys() {
    let mut lexer = Lexer::with_dialect("age == 1", Dialect::Strict);
    assert_eq!(
        lexer.next_token(),
        Err(LexError {
            offset: 0,
            found: 'a'
        })
    );

    let tokens: Vec<_> = Lexer::with_dialect("`age` == 1", Dialect::Strict)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Key);
}
