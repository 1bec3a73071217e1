// tests/lexer_tests.rs

use varsift::ast::TokenKind;
use varsift::lexer::{LexError, LexErrorKind, Lexer};

fn kinds(input: &str) -> Vec<TokenKind> {
    let mut lexer = Lexer::new(input);
    let mut out = vec![];
    loop {
        let token = lexer.next_token().expect("lex error");
        let done = token.kind == TokenKind::Eof;
        out.push(token.kind);
        if done {
            break;
        }
    }
    out
}

fn first_error(input: &str) -> LexError {
    let mut lexer = Lexer::new(input);
    loop {
        match lexer.next_token() {
            Ok(token) if token.kind == TokenKind::Eof => panic!("expected a lex error"),
            Ok(_) => continue,
            Err(e) => return e,
        }
    }
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_integer_literal() {
    assert_eq!(kinds("42"), vec![TokenKind::Int(42), TokenKind::Eof]);
}

#[test]
fn test_float_literal() {
    assert_eq!(kinds("0.05"), vec![TokenKind::Float(0.05), TokenKind::Eof]);
}

#[test]
fn test_float_with_exponent() {
    assert_eq!(kinds("1e-3"), vec![TokenKind::Float(0.001), TokenKind::Eof]);
    assert_eq!(kinds("2.5E2"), vec![TokenKind::Float(250.0), TokenKind::Eof]);
}

#[test]
fn test_bool_literals() {
    assert_eq!(
        kinds("true false"),
        vec![TokenKind::Bool(true), TokenKind::Bool(false), TokenKind::Eof]
    );
}

#[test]
fn test_single_quoted_string() {
    assert_eq!(
        kinds("'PASS'"),
        vec![TokenKind::Str("PASS".to_string()), TokenKind::Eof]
    );
}

#[test]
fn test_double_quoted_string() {
    assert_eq!(
        kinds("\"missense_variant\""),
        vec![TokenKind::Str("missense_variant".to_string()), TokenKind::Eof]
    );
}

#[test]
fn test_string_escapes() {
    assert_eq!(
        kinds(r"'it\'s'"),
        vec![TokenKind::Str("it's".to_string()), TokenKind::Eof]
    );
    assert_eq!(
        kinds(r"'a\tb\\c'"),
        vec![TokenKind::Str("a\tb\\c".to_string()), TokenKind::Eof]
    );
}

// ============================================================================
// Identifiers and keywords
// ============================================================================

#[test]
fn test_identifier() {
    assert_eq!(
        kinds("DP"),
        vec![TokenKind::Ident("DP".to_string()), TokenKind::Eof]
    );
}

#[test]
fn test_dotted_identifier() {
    // dotted annotation names lex as a single identifier
    assert_eq!(
        kinds("dbNSFP_GERP.NR"),
        vec![TokenKind::Ident("dbNSFP_GERP.NR".to_string()), TokenKind::Eof]
    );
}

#[test]
fn test_keywords_are_reserved() {
    assert_eq!(
        kinds("ANY ALL exists na has in SET"),
        vec![
            TokenKind::Any,
            TokenKind::All,
            TokenKind::Exists,
            TokenKind::Na,
            TokenKind::Has,
            TokenKind::In,
            TokenKind::Set,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_keyword_prefix_stays_identifier() {
    assert_eq!(
        kinds("ANYTHING nah"),
        vec![
            TokenKind::Ident("ANYTHING".to_string()),
            TokenKind::Ident("nah".to_string()),
            TokenKind::Eof,
        ]
    );
}

// ============================================================================
// Operators and punctuation
// ============================================================================

#[test]
fn test_comparison_operators() {
    assert_eq!(
        kinds("= == != < <= > >= =~ !~"),
        vec![
            TokenKind::Assign,
            TokenKind::EqEq,
            TokenKind::NotEq,
            TokenKind::Lt,
            TokenKind::LtEq,
            TokenKind::Gt,
            TokenKind::GtEq,
            TokenKind::Match,
            TokenKind::NotMatch,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_logic_operators() {
    assert_eq!(
        kinds("& && | || ^ !"),
        vec![
            TokenKind::Amp,
            TokenKind::AmpAmp,
            TokenKind::Pipe,
            TokenKind::PipePipe,
            TokenKind::Caret,
            TokenKind::Not,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_bracket_dot_token() {
    // ']' immediately followed by '.' is one token
    assert_eq!(
        kinds("GEN[0].DP"),
        vec![
            TokenKind::Ident("GEN".to_string()),
            TokenKind::LBracket,
            TokenKind::Int(0),
            TokenKind::RBracketDot,
            TokenKind::Ident("DP".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_plain_closing_bracket() {
    assert_eq!(
        kinds("AC[0]"),
        vec![
            TokenKind::Ident("AC".to_string()),
            TokenKind::LBracket,
            TokenKind::Int(0),
            TokenKind::RBracket,
            TokenKind::Eof,
        ]
    );
}

// ============================================================================
// Comments and whitespace
// ============================================================================

#[test]
fn test_line_comments() {
    assert_eq!(
        kinds("DP // the depth\n> 10"),
        vec![
            TokenKind::Ident("DP".to_string()),
            TokenKind::Gt,
            TokenKind::Int(10),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_hash_comments() {
    assert_eq!(
        kinds("# header comment\nDP"),
        vec![TokenKind::Ident("DP".to_string()), TokenKind::Eof]
    );
}

#[test]
fn test_slash_alone_is_division() {
    assert_eq!(
        kinds("4 / 2"),
        vec![
            TokenKind::Int(4),
            TokenKind::Slash,
            TokenKind::Int(2),
            TokenKind::Eof,
        ]
    );
}

// ============================================================================
// Offsets
// ============================================================================

#[test]
fn test_token_offsets() {
    let mut lexer = Lexer::new("DP > 10");
    assert_eq!(lexer.next_token().unwrap().offset, 0);
    assert_eq!(lexer.next_token().unwrap().offset, 3);
    assert_eq!(lexer.next_token().unwrap().offset, 5);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unterminated_string() {
    let err = first_error("FILTER = 'PASS");
    assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    assert_eq!(err.offset, 9);
}

#[test]
fn test_illegal_character() {
    let err = first_error("DP > 10 @");
    assert_eq!(err.kind, LexErrorKind::IllegalCharacter('@'));
    assert_eq!(err.offset, 8);
}

#[test]
fn test_invalid_escape() {
    let err = first_error(r"'a\qb'");
    assert!(matches!(err.kind, LexErrorKind::InvalidEscape('q')));
}
