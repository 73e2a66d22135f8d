//! Recursive descent parser for style strings.
//!
//! A style string is a `;`-separated list of clauses:
//!
//! ```text
//! size(100); padding(horizontal: 4, vertical: 1); background(color.Red)
//! ```
//!
//! Each clause is parsed independently. A clause that fails to parse is
//! logged and skipped so the rest of the chain still applies.

use logos::Logos;
use tracing::warn;

use crate::style::model::{ArgValue, ArgumentData, StyleClause};
use crate::style::tokenizer::Token;

/// Errors from parsing a single style clause.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("unexpected token at position {position}: {message}")]
    UnexpectedToken { position: usize, message: String },
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),
    #[error("unrecognized character at byte {position}")]
    Lex { position: usize },
}

/// A positioned token.
#[derive(Debug, Clone)]
struct PToken {
    token: Token,
    text: String,
    /// Index in the token stream (for error reporting).
    pos: usize,
}

/// Parse a style string into its ordered clauses.
///
/// Empty clauses (including the one after a trailing `;`) are ignored.
/// Malformed clauses are skipped with a warning.
pub fn parse_style(input: &str) -> Vec<StyleClause> {
    split_clauses(input)
        .into_iter()
        .filter_map(|source| match parse_clause(source) {
            Ok(clause) => Some(clause),
            Err(error) => {
                warn!(clause = source, %error, "skipping malformed style clause");
                None
            }
        })
        .collect()
}

/// Parse exactly one `name(args...)` clause.
pub fn parse_clause(input: &str) -> Result<StyleClause, StyleError> {
    let tokens = tokenize_strict(input)?;
    let mut parser = Parser { tokens, cursor: 0 };
    let clause = parser.parse_clause()?;
    match parser.peek() {
        None => Ok(clause),
        Some(tok) => Err(StyleError::UnexpectedToken {
            position: tok.pos,
            message: format!("trailing {:?} '{}' after clause", tok.token, tok.text),
        }),
    }
}

/// Split on top-level `;`, respecting quotes and parentheses. An unbalanced
/// tail is re-split on every `;` so one unclosed clause does not swallow the
/// clauses after it.
fn split_clauses(input: &str) -> Vec<&str> {
    let mut clauses = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, ch) in input.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                clauses.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    let tail = &input[start..];
    if depth > 0 || quote.is_some() {
        clauses.extend(tail.split(';'));
    } else {
        clauses.push(tail);
    }

    clauses
        .into_iter()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}

/// Tokenize, failing on the first unrecognized character.
fn tokenize_strict(input: &str) -> Result<Vec<PToken>, StyleError> {
    let lexer = Token::lexer(input);
    let mut tokens = Vec::new();

    for (idx, (result, span)) in lexer.spanned().enumerate() {
        match result {
            Ok(token) => tokens.push(PToken {
                text: input[span].to_string(),
                token,
                pos: idx,
            }),
            Err(()) => return Err(StyleError::Lex { position: span.start }),
        }
    }

    Ok(tokens)
}

/// Recursive descent parser state.
struct Parser {
    tokens: Vec<PToken>,
    cursor: usize,
}

impl Parser {
    fn peek(&self) -> Option<&PToken> {
        self.tokens.get(self.cursor)
    }

    fn peek_at(&self, offset: usize) -> Option<&PToken> {
        self.tokens.get(self.cursor + offset)
    }

    fn peek_is(&self, expected: &Token) -> bool {
        self.peek().is_some_and(|t| &t.token == expected)
    }

    fn advance(&mut self) -> Option<PToken> {
        let tok = self.tokens.get(self.cursor).cloned();
        if tok.is_some() {
            self.cursor += 1;
        }
        tok
    }

    fn expect(&mut self, expected: &Token) -> Result<PToken, StyleError> {
        match self.advance() {
            Some(tok) if &tok.token == expected => Ok(tok),
            Some(tok) => Err(StyleError::UnexpectedToken {
                position: tok.pos,
                message: format!("expected {:?}, got {:?} '{}'", expected, tok.token, tok.text),
            }),
            None => Err(StyleError::UnexpectedEof(format!("expected {expected:?}"))),
        }
    }

    /// `Ident` or `Ident ( args? )`
    fn parse_clause(&mut self) -> Result<StyleClause, StyleError> {
        let name = self.expect(&Token::Ident)?.text;
        if self.peek().is_none() {
            return Ok(StyleClause::new(name, Vec::new()));
        }
        let args = self.parse_call_args()?;
        Ok(StyleClause::new(name, args))
    }

    /// `( arg (, arg)* ,? )`
    fn parse_call_args(&mut self) -> Result<Vec<ArgumentData>, StyleError> {
        self.expect(&Token::ParenOpen)?;
        let mut args = Vec::new();

        loop {
            if self.peek_is(&Token::ParenClose) {
                self.advance();
                return Ok(args);
            }
            args.push(self.parse_argument()?);

            match self.advance() {
                Some(tok) if tok.token == Token::Comma => {}
                Some(tok) if tok.token == Token::ParenClose => return Ok(args),
                Some(tok) => {
                    return Err(StyleError::UnexpectedToken {
                        position: tok.pos,
                        message: format!("expected ',' or ')', got '{}'", tok.text),
                    })
                }
                None => return Err(StyleError::UnexpectedEof("unclosed argument list".into())),
            }
        }
    }

    fn parse_argument(&mut self) -> Result<ArgumentData, StyleError> {
        let is_named = self.peek_is(&Token::Ident)
            && self
                .peek_at(1)
                .is_some_and(|t| matches!(t.token, Token::Colon | Token::Equals));

        if is_named {
            let name = self.expect(&Token::Ident)?.text;
            self.advance();
            let value = self.parse_value()?;
            return Ok(ArgumentData::named(name, value));
        }

        Ok(ArgumentData::positional(self.parse_value()?))
    }

    fn parse_value(&mut self) -> Result<ArgValue, StyleError> {
        let tok = self
            .advance()
            .ok_or_else(|| StyleError::UnexpectedEof("expected argument value".into()))?;

        match tok.token {
            Token::Int | Token::Float => {
                let number = parse_number(&tok)?;
                if self.peek_is(&Token::DotDot) {
                    self.advance();
                    let end_tok = self
                        .advance()
                        .ok_or_else(|| StyleError::UnexpectedEof("expected range end".into()))?;
                    let end = parse_number(&end_tok)?.as_f64().unwrap_or_default();
                    let start = number.as_f64().unwrap_or_default();
                    return Ok(ArgValue::Range { start, end });
                }
                Ok(number)
            }
            Token::StringLiteral | Token::StringLiteralSingle => {
                Ok(ArgValue::Str(tok.text[1..tok.text.len() - 1].to_string()))
            }
            Token::HexColor => Ok(ArgValue::Str(tok.text)),
            Token::True => Ok(ArgValue::Bool(true)),
            Token::False => Ok(ArgValue::Bool(false)),
            Token::Ident => {
                let mut path = tok.text;
                while self.peek_is(&Token::Dot)
                    && self.peek_at(1).is_some_and(|t| t.token == Token::Ident)
                {
                    self.advance();
                    if let Some(segment) = self.advance() {
                        path.push('.');
                        path.push_str(&segment.text);
                    }
                }
                if self.peek_is(&Token::ParenOpen) {
                    let args = self.parse_call_args()?;
                    return Ok(ArgValue::Call { name: path, args });
                }
                Ok(ArgValue::Ident(path))
            }
            other => Err(StyleError::UnexpectedToken {
                position: tok.pos,
                message: format!("expected a value, got {:?} '{}'", other, tok.text),
            }),
        }
    }
}

fn parse_number(tok: &PToken) -> Result<ArgValue, StyleError> {
    let invalid = || StyleError::UnexpectedToken {
        position: tok.pos,
        message: format!("invalid number '{}'", tok.text),
    };
    match tok.token {
        Token::Int => tok.text.parse::<i64>().map(ArgValue::Int).map_err(|_| invalid()),
        Token::Float => tok.text.parse::<f64>().map(ArgValue::Float).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}
