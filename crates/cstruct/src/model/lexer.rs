//! Tokenizer for the relaxed model grammar.
//!
//! Quote characters are dropped: every key and type is a bareword, so
//! `{"a": "u8"}`, `{'a': 'u8'}` and `{a: u8}` tokenize identically.
//! `//` line comments and `/* */` block comments are skipped.

use crate::error::{CStructError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Semicolon,
    Slash,
    Word(String),
}

impl TokenKind {
    pub(crate) fn describe(&self) -> String {
        match self {
            TokenKind::LBrace => "`{`".to_string(),
            TokenKind::RBrace => "`}`".to_string(),
            TokenKind::LBracket => "`[`".to_string(),
            TokenKind::RBracket => "`]`".to_string(),
            TokenKind::Comma => "`,`".to_string(),
            TokenKind::Colon => "`:`".to_string(),
            TokenKind::Semicolon => "`;`".to_string(),
            TokenKind::Slash => "`/`".to_string(),
            TokenKind::Word(word) => format!("`{word}`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Byte offset of the token in the input.
    pub pos: usize,
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '{' | '}' | '[' | ']' | ',' | ':' | ';' | '/' | '"' | '\'')
}

pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();
    let mut word: Option<(usize, String)> = None;

    while let Some((pos, c)) = chars.next() {
        if c == '"' || c == '\'' {
            continue;
        }
        if is_word_char(c) {
            word.get_or_insert_with(|| (pos, String::new())).1.push(c);
            continue;
        }
        if let Some((start, text)) = word.take() {
            tokens.push(Token {
                kind: TokenKind::Word(text),
                pos: start,
            });
        }
        let kind = match c {
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '/' => match chars.peek() {
                Some((_, '/')) => {
                    for (_, c) in chars.by_ref() {
                        if c == '\n' {
                            break;
                        }
                    }
                    continue;
                }
                Some((_, '*')) => {
                    chars.next();
                    let mut prev = '\0';
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if prev == '*' && c == '/' {
                            closed = true;
                            break;
                        }
                        prev = c;
                    }
                    if !closed {
                        return Err(CStructError::grammar("unterminated block comment", pos));
                    }
                    continue;
                }
                _ => TokenKind::Slash,
            },
            _ => continue,
        };
        tokens.push(Token { kind, pos });
    }
    if let Some((start, text)) = word.take() {
        tokens.push(Token {
            kind: TokenKind::Word(text),
            pos: start,
        });
    }
    Ok(tokens)
}
