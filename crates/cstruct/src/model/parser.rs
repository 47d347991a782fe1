//! Recursive-descent parser for the relaxed model grammar.
//!
//! ```text
//! model    := value | member*                (bare members form an object)
//! value    := object | array | word suffix?
//! object   := '{' member* '}'
//! member   := key ':' (word suffix? | object | array)
//!           | word key suffix? (',' key suffix?)* ';'        C fields
//!           | 'typedef' 'struct' object word ';'            C struct block
//! array    := '[' size '/' word ']' | '[' value* ']'
//! suffix   := '[' (size | lengthType) ']'
//! ```
//!
//! Members and array items may be separated by `,` or `;`, or by nothing at
//! all when the next token starts a new entry.

use super::ast::{Expr, Member};
use super::lexer::{tokenize, Token, TokenKind};
use crate::error::{CStructError, Result};
use crate::tags::{is_buffer_type, is_string_type, LengthType};

/// Upper bound on the element count of a static array shorthand.
pub(crate) const MAX_STATIC_COUNT: usize = 1 << 16;

/// Parses model text into a shorthand-free syntax tree.
pub(crate) fn parse(input: &str) -> Result<Expr> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(CStructError::grammar("empty model", 0));
    }
    let mut parser = Parser {
        tokens,
        x: 0,
        end: input.len(),
    };
    let expr = if parser.bare_members() {
        Expr::Object(parser.members(false)?)
    } else {
        parser.value()?
    };
    while parser.eat(&TokenKind::Semicolon) || parser.eat(&TokenKind::Comma) {}
    if parser.peek().is_some() {
        return Err(parser.unexpected("end of model"));
    }
    Ok(expr)
}

/// Result of a `[size]` suffix.
enum Sized {
    Fixed(Expr),
    Dynamic(LengthType, Expr),
}

struct Parser {
    tokens: Vec<Token>,
    x: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.x)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek_kind_at(0)
    }

    fn peek_kind_at(&self, n: usize) -> Option<&TokenKind> {
        self.tokens.get(self.x + n).map(|t| &t.kind)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.x += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<()> {
        if self.eat(&kind) {
            Ok(())
        } else {
            Err(self.unexpected(&kind.describe()))
        }
    }

    fn expect_word(&mut self, what: &str) -> Result<(String, usize)> {
        match self.tokens.get(self.x) {
            Some(Token {
                kind: TokenKind::Word(text),
                pos,
            }) => {
                let out = (text.clone(), *pos);
                self.x += 1;
                Ok(out)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    fn unexpected(&self, expected: &str) -> CStructError {
        match self.peek() {
            Some(token) => CStructError::grammar(
                format!("expected {expected}, found {}", token.kind.describe()),
                token.pos,
            ),
            None => CStructError::grammar(
                format!("expected {expected}, found end of input"),
                self.end,
            ),
        }
    }

    /// A top level starting like a member (`typedef`, `T name`, `name:`) is
    /// an object without braces.
    fn bare_members(&self) -> bool {
        match (self.peek_kind_at(0), self.peek_kind_at(1)) {
            (Some(TokenKind::Word(word)), _) if word == "typedef" => true,
            (Some(TokenKind::Word(_)), Some(TokenKind::Word(_) | TokenKind::Colon)) => true,
            _ => false,
        }
    }

    fn value(&mut self) -> Result<Expr> {
        match self.peek_kind() {
            Some(TokenKind::LBrace) => self.object(),
            Some(TokenKind::LBracket) => self.array(),
            Some(TokenKind::Word(_)) => {
                let (text, pos) = self.expect_word("a type")?;
                match self.suffix(text, pos)? {
                    Sized::Fixed(expr) => Ok(expr),
                    Sized::Dynamic(..) => Err(CStructError::grammar(
                        "a dynamic length needs a field name",
                        pos,
                    )),
                }
            }
            _ => Err(self.unexpected("a type")),
        }
    }

    fn object(&mut self) -> Result<Expr> {
        self.expect(TokenKind::LBrace)?;
        let members = self.members(true)?;
        self.expect(TokenKind::RBrace)?;
        Ok(Expr::Object(members))
    }

    fn members(&mut self, braced: bool) -> Result<Vec<Member>> {
        let mut out = Vec::new();
        loop {
            while self.eat(&TokenKind::Comma) || self.eat(&TokenKind::Semicolon) {}
            match self.peek_kind() {
                None => break,
                Some(TokenKind::RBrace) if braced => break,
                _ => self.member(&mut out)?,
            }
        }
        Ok(out)
    }

    fn member(&mut self, out: &mut Vec<Member>) -> Result<()> {
        let (head, pos) = self.expect_word("a field name or type")?;
        if head == "typedef" {
            let (keyword, keyword_pos) = self.expect_word("`struct`")?;
            if keyword != "struct" {
                return Err(CStructError::grammar(
                    format!("expected `struct`, found `{keyword}`"),
                    keyword_pos,
                ));
            }
            let body = self.object()?;
            let (name, name_pos) = self.expect_word("a struct name")?;
            out.push(Member {
                key: name,
                pos: name_pos,
                value: body,
            });
            return Ok(());
        }
        match self.peek_kind() {
            Some(TokenKind::Colon) => {
                self.x += 1;
                let member = self.field(head, pos)?;
                out.push(member);
                Ok(())
            }
            Some(TokenKind::Word(_)) => self.c_fields(head, pos, out),
            _ => Err(self.unexpected("`:` after field name")),
        }
    }

    /// Right-hand side of `key:`.
    fn field(&mut self, key: String, pos: usize) -> Result<Member> {
        if !matches!(self.peek_kind(), Some(TokenKind::Word(_))) {
            let value = self.value()?;
            return Ok(Member { key, pos, value });
        }
        let (ty, ty_pos) = self.expect_word("a type")?;
        Ok(sized_member(key, pos, self.suffix(ty, ty_pos)?))
    }

    /// `T a, b[4], c;`
    fn c_fields(&mut self, ty: String, ty_pos: usize, out: &mut Vec<Member>) -> Result<()> {
        loop {
            let (key, pos) = self.expect_word("a field name")?;
            let sized = self.suffix(ty.clone(), ty_pos)?;
            out.push(sized_member(key, pos, sized));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        match self.peek_kind() {
            Some(TokenKind::Semicolon) => {
                self.x += 1;
                Ok(())
            }
            None | Some(TokenKind::RBrace) => Ok(()),
            _ => Err(self.unexpected("`;` after field declaration")),
        }
    }

    /// Applies an optional `[size]` suffix to the type word `ty`.
    fn suffix(&mut self, ty: String, ty_pos: usize) -> Result<Sized> {
        if !self.eat(&TokenKind::LBracket) {
            return Ok(Sized::Fixed(Expr::word(ty, ty_pos)));
        }
        let (size, size_pos) = self.expect_word("a size or length type")?;
        self.expect(TokenKind::RBracket)?;

        if let Some(count) = parse_size(&size, size_pos)? {
            let expr = if is_string_type(&ty) {
                Expr::word(format!("s{count}"), ty_pos)
            } else if is_buffer_type(&ty) {
                Expr::word(format!("buf{count}"), ty_pos)
            } else {
                Expr::Array(repeat(&ty, count, ty_pos)?)
            };
            return Ok(Sized::Fixed(expr));
        }

        let len = LengthType::parse(&size).ok_or_else(|| {
            CStructError::grammar(format!("unsupported dynamic length type `{size}`"), size_pos)
        })?;
        let payload = if is_string_type(&ty) {
            "s".to_string()
        } else if is_buffer_type(&ty) {
            "buf".to_string()
        } else {
            ty
        };
        Ok(Sized::Dynamic(len, Expr::word(payload, ty_pos)))
    }

    fn array(&mut self) -> Result<Expr> {
        self.expect(TokenKind::LBracket)?;
        if let (Some(TokenKind::Word(_)), Some(TokenKind::Slash)) =
            (self.peek_kind_at(0), self.peek_kind_at(1))
        {
            let (size, size_pos) = self.expect_word("a size")?;
            self.x += 1;
            let (ty, ty_pos) = self.expect_word("an element type")?;
            self.expect(TokenKind::RBracket)?;
            let count = parse_size(&size, size_pos)?.ok_or_else(|| {
                CStructError::grammar(format!("size must be a number, found `{size}`"), size_pos)
            })?;
            if is_string_type(&ty) {
                return Err(CStructError::grammar(
                    "static array element type must be other than string",
                    ty_pos,
                ));
            }
            return Ok(Expr::Array(repeat(&ty, count, ty_pos)?));
        }

        let mut items = Vec::new();
        loop {
            while self.eat(&TokenKind::Comma) {}
            match self.peek_kind() {
                Some(TokenKind::RBracket) => {
                    self.x += 1;
                    break;
                }
                None => return Err(self.unexpected("`]`")),
                _ => items.push(self.value()?),
            }
        }
        Ok(Expr::Array(items))
    }
}

fn sized_member(key: String, pos: usize, sized: Sized) -> Member {
    match sized {
        Sized::Fixed(value) => Member { key, pos, value },
        Sized::Dynamic(len, value) => Member {
            key: format!("{key}.{}", len.tag()),
            pos,
            value,
        },
    }
}

/// `Some(n)` for a decimal literal, `None` for anything that is not a number.
fn parse_size(word: &str, pos: usize) -> Result<Option<usize>> {
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if word.strip_prefix('-').is_some_and(is_digits) {
        return Err(CStructError::grammar(
            format!("size must be >= 0, found `{word}`"),
            pos,
        ));
    }
    if !is_digits(word) {
        return Ok(None);
    }
    word.parse()
        .map(Some)
        .map_err(|_| CStructError::grammar(format!("size `{word}` is too large"), pos))
}

fn repeat(ty: &str, count: usize, pos: usize) -> Result<Vec<Expr>> {
    if count > MAX_STATIC_COUNT {
        return Err(CStructError::grammar(
            format!("static array of {count} elements exceeds the limit of {MAX_STATIC_COUNT}"),
            pos,
        ));
    }
    Ok(vec![Expr::word(ty, pos); count])
}
