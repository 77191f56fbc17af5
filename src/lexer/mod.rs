//! # Lexer
//!
//! Tokenizes C source code (the supported subset) into a stream of tokens.
//!
//! ## Features
//!
//! - **Keywords & identifiers**: longest-match identifier scan, then a
//!   keyword table lookup.
//! - **Integer literals**: maximal runs of decimal digits; a digit run
//!   immediately followed by an identifier character (`1abc`) is an error.
//! - **Operators**: longest-match over the 28 operator/punctuation forms
//!   (`<<=` before `<<` before `<=` before `<`, and so on).
//! - **Comments**: `//` line comments and `/* */` block comments are
//!   stripped; an unterminated block comment is an error.
//! - **Preprocessor lines**: a line whose first non-whitespace character is
//!   `#` is discarded verbatim through the next newline, with no further
//!   interpretation.
//!
//! Unlike the rest of this crate's passes, lexing stops at the first error
//! it finds rather than collecting several — matching the compiler's
//! abort-on-first-error propagation model.

pub mod cursor;
pub mod token;


use crate::error::CompileError;
use cursor::Cursor;
use token::{Token, TokenKind};

/// Tokenize a full source file.
///
/// Returns the token stream, always terminated by a single `Eof` token, or
/// the first lexical error encountered.
pub fn tokenize(source: &str) -> Result<Vec<Token>, CompileError> {
    let mut cursor = Cursor::new(source);
    let mut tokens = Vec::new();

    loop {
        skip_trivia(&mut cursor)?;
        if cursor.is_at_end() {
            break;
        }
        tokens.push(lex_token(&mut cursor)?);
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        lexeme: String::new(),
        line: cursor.line(),
    });

    Ok(tokens)
}

/// Skip whitespace, `//` and `/* */` comments, and `#...` preprocessor
/// lines. Called before every token so that trivia never appears between
/// tokens the caller has to filter out later.
fn skip_trivia(cursor: &mut Cursor) -> Result<(), CompileError> {
    loop {
        match cursor.peek() {
            Some(c) if c.is_whitespace() => {
                cursor.advance();
            }
            Some('/') if cursor.peek_at(1) == Some('/') => {
                while !matches!(cursor.peek(), None | Some('\n')) {
                    cursor.advance();
                }
            }
            Some('/') if cursor.peek_at(1) == Some('*') => {
                let start_line = cursor.line();
                cursor.advance();
                cursor.advance();
                loop {
                    match cursor.peek() {
                        None => {
                            return Err(CompileError::lex(
                                start_line,
                                "unterminated block comment",
                            ));
                        }
                        Some('*') if cursor.peek_at(1) == Some('/') => {
                            cursor.advance();
                            cursor.advance();
                            break;
                        }
                        Some(_) => {
                            cursor.advance();
                        }
                    }
                }
            }
            Some('#') => {
                while !matches!(cursor.peek(), None | Some('\n')) {
                    cursor.advance();
                }
            }
            _ => break,
        }
    }
    Ok(())
}

fn lex_token(cursor: &mut Cursor) -> Result<Token, CompileError> {
    let line = cursor.line();
    let ch = cursor.peek().expect("skip_trivia leaves a char at EOF boundary only");

    if ch.is_ascii_digit() {
        return lex_number(cursor, line);
    }
    if ch.is_ascii_alphabetic() || ch == '_' {
        return lex_word(cursor, line);
    }

    lex_operator(cursor, line)
}

fn lex_number(cursor: &mut Cursor, line: usize) -> Result<Token, CompileError> {
    let mut digits = String::new();
    while matches!(cursor.peek(), Some(c) if c.is_ascii_digit()) {
        digits.push(cursor.advance().unwrap());
    }

    if matches!(cursor.peek(), Some(c) if c.is_ascii_alphabetic() || c == '_') {
        let mut bad = digits.clone();
        while matches!(cursor.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            bad.push(cursor.advance().unwrap());
        }
        return Err(CompileError::lex(
            line,
            format!("invalid integer literal: {bad}"),
        ));
    }

    let value: i32 = digits.parse().map_err(|_| {
        CompileError::lex(line, format!("integer literal out of range: {digits}"))
    })?;

    Ok(Token {
        kind: TokenKind::IntLiteral(value),
        lexeme: digits,
        line,
    })
}

fn lex_word(cursor: &mut Cursor, line: usize) -> Result<Token, CompileError> {
    let mut word = String::new();
    while matches!(cursor.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
        word.push(cursor.advance().unwrap());
    }

    let kind = TokenKind::keyword(&word).unwrap_or_else(|| TokenKind::Identifier(word.clone()));

    Ok(Token {
        kind,
        lexeme: word,
        line,
    })
}

/// Longest-match operator/punctuation scan: every three-character form is
/// tried before the two-character forms that are its prefix, which are in
/// turn tried before the one-character forms.
fn lex_operator(cursor: &mut Cursor, line: usize) -> Result<Token, CompileError> {
    let three = cursor.peek_at(2).map(|c| {
        format!(
            "{}{}{}",
            cursor.peek().unwrap(),
            cursor.peek_at(1).unwrap_or(' '),
            c
        )
    });
    if let Some(text) = three.as_deref() {
        if let Some(kind) = three_char_operator(text) {
            cursor.advance();
            cursor.advance();
            cursor.advance();
            return Ok(Token {
                kind,
                lexeme: text.to_string(),
                line,
            });
        }
    }

    let two = cursor
        .peek_at(1)
        .map(|c| format!("{}{}", cursor.peek().unwrap(), c));
    if let Some(text) = two.as_deref() {
        if let Some(kind) = two_char_operator(text) {
            cursor.advance();
            cursor.advance();
            return Ok(Token {
                kind,
                lexeme: text.to_string(),
                line,
            });
        }
    }

    let ch = cursor.peek().unwrap();
    if let Some(kind) = one_char_operator(ch) {
        cursor.advance();
        return Ok(Token {
            kind,
            lexeme: ch.to_string(),
            line,
        });
    }

    cursor.advance();
    Err(CompileError::lex(
        line,
        format!("unexpected character: '{ch}'"),
    ))
}

fn three_char_operator(text: &str) -> Option<TokenKind> {
    Some(match text {
        "<<=" => TokenKind::LessLessEqual,
        ">>=" => TokenKind::GreaterGreaterEqual,
        _ => return None,
    })
}

fn two_char_operator(text: &str) -> Option<TokenKind> {
    Some(match text {
        "++" => TokenKind::PlusPlus,
        "+=" => TokenKind::PlusEqual,
        "--" => TokenKind::MinusMinus,
        "-=" => TokenKind::MinusEqual,
        "*=" => TokenKind::StarEqual,
        "/=" => TokenKind::SlashEqual,
        "%=" => TokenKind::PercentEqual,
        "&&" => TokenKind::AmpersandAmpersand,
        "&=" => TokenKind::AmpersandEqual,
        "||" => TokenKind::PipePipe,
        "|=" => TokenKind::PipeEqual,
        "^=" => TokenKind::CaretEqual,
        "==" => TokenKind::EqualEqual,
        "!=" => TokenKind::BangEqual,
        "<=" => TokenKind::LessEqual,
        ">=" => TokenKind::GreaterEqual,
        "<<" => TokenKind::LessLess,
        ">>" => TokenKind::GreaterGreater,
        _ => return None,
    })
}

fn one_char_operator(ch: char) -> Option<TokenKind> {
    Some(match ch {
        '(' => TokenKind::LParen,
        ')' => TokenKind::RParen,
        '{' => TokenKind::LBrace,
        '}' => TokenKind::RBrace,
        ';' => TokenKind::Semicolon,
        ',' => TokenKind::Comma,
        '?' => TokenKind::Question,
        ':' => TokenKind::Colon,
        '~' => TokenKind::Tilde,
        '+' => TokenKind::Plus,
        '-' => TokenKind::Minus,
        '*' => TokenKind::Star,
        '/' => TokenKind::Slash,
        '%' => TokenKind::Percent,
        '=' => TokenKind::Equal,
        '&' => TokenKind::Ampersand,
        '|' => TokenKind::Pipe,
        '^' => TokenKind::Caret,
        '!' => TokenKind::Bang,
        '<' => TokenKind::Less,
        '>' => TokenKind::Greater,
        _ => return None,
    })
}
