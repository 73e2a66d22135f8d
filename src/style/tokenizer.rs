//! logos-based tokenizer for the style mini-language.
//!
//! Token priority in logos is determined by:
//! 1. Longest match wins (e.g. `0.5` as [`Token::Float`] beats `0` + `.` + `5`)
//! 2. For equal length matches, literal tokens beat regexes
//!
//! Our ordering ensures:
//! - `true` matches [`Token::True`], while `trueish` stays an [`Token::Ident`]
//! - `#FF00FF00` matches [`Token::HexColor`]
//! - `0..1` lexes as `Int DotDot Int`, never as a float

use logos::Logos;

/// Style token produced by the lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    // ── Literals ─────────────────────────────────────────────────────

    /// Hex color: `#RRGGBB` or `#AARRGGBB`.
    #[regex(r"#[0-9a-fA-F]{6,8}")]
    HexColor,

    /// Float: digits on both sides of the dot, possibly negative.
    #[regex(r"-?[0-9]+\.[0-9]+")]
    Float,

    /// Integer, possibly negative.
    #[regex(r"-?[0-9]+")]
    Int,

    /// Double-quoted string literal.
    #[regex(r#""[^"]*""#)]
    StringLiteral,

    /// Single-quoted string literal.
    #[regex(r"'[^']*'")]
    StringLiteralSingle,

    #[token("true")]
    True,

    #[token("false")]
    False,

    /// Identifier: function names, argument names, constant path segments.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    // ── Punctuation ──────────────────────────────────────────────────

    /// `..` (range)
    #[token("..")]
    DotDot,

    /// `.`
    #[token(".")]
    Dot,

    /// `(`
    #[token("(")]
    ParenOpen,

    /// `)`
    #[token(")")]
    ParenClose,

    /// `,`
    #[token(",")]
    Comma,

    /// `:`
    #[token(":")]
    Colon,

    /// `=`
    #[token("=")]
    Equals,

    /// `;`
    #[token(";")]
    Semicolon,
}

/// Tokenize a style string into `(Token, text)` pairs.
///
/// Characters that fail to lex are dropped; use the parser when lexical
/// errors must be reported.
pub fn tokenize(input: &str) -> Vec<(Token, String)> {
    let lexer = Token::lexer(input);
    lexer
        .spanned()
        .filter_map(|(result, span)| {
            result.ok().map(|token| (token, input[span].to_string()))
        })
        .collect()
}
