//! HUNT tokens, produced by the logos lexer.

use std::ops::Range;

use logos::Logos;

use glyphhunt_core::{Error, Result};

/// Lexical tokens of the HUNT language.
///
/// Whitespace and `#` line comments are skipped. Keywords win over
/// identifiers of the same length, so `hunt` is a keyword while `hunter`
/// is an identifier.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"([ \t\r\n\f]+|#[^\n]*)")]
pub enum Token {
    /// `<`
    #[token("<")]
    Open,
    /// `>`
    #[token(">")]
    Close,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `:`
    #[token(":")]
    Colon,
    /// `=`
    #[token("=")]
    Equals,
    /// `,`
    #[token(",")]
    Comma,
    /// `*` (type wildcard in link params)
    #[token("*")]
    Star,
    /// `hunt`
    #[token("hunt")]
    Hunt,
    /// `INIT`
    #[token("INIT")]
    Init,
    /// `GATHER`
    #[token("GATHER")]
    Gather,
    /// `EXEC`
    #[token("EXEC")]
    Exec,
    /// `param`
    #[token("param")]
    Param,
    /// `val`
    #[token("val")]
    Val,
    /// Double or single quoted string with backslash escapes
    #[regex(r#""([^"\\]|\\.)*""#)]
    #[regex(r"'([^'\\]|\\.)*'")]
    Str,
    /// Bare identifier
    #[regex(r"[A-Za-z_][A-Za-z0-9_\-\.]*")]
    Ident,
    /// Integer or decimal number
    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number,
}

impl Token {
    /// How the token is shown in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Token::Open => "`<`",
            Token::Close => "`>`",
            Token::LBracket => "`[`",
            Token::RBracket => "`]`",
            Token::LBrace => "`{`",
            Token::RBrace => "`}`",
            Token::LParen => "`(`",
            Token::RParen => "`)`",
            Token::Colon => "`:`",
            Token::Equals => "`=`",
            Token::Comma => "`,`",
            Token::Star => "`*`",
            Token::Hunt => "`hunt`",
            Token::Init => "`INIT`",
            Token::Gather => "`GATHER`",
            Token::Exec => "`EXEC`",
            Token::Param => "`param`",
            Token::Val => "`val`",
            Token::Str => "string",
            Token::Ident => "identifier",
            Token::Number => "number",
        }
    }
}

/// A token with its source text and byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned<'src> {
    /// Token kind
    pub token: Token,
    /// Exact source slice
    pub text: &'src str,
    /// Byte range in the source
    pub span: Range<usize>,
}

/// Maps byte offsets to 1-based line/column pairs.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Index the line starts of a source.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_starts }
    }

    /// Line and column (both 1-based, column counted in chars) of a byte offset.
    pub fn position(&self, source: &str, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let start = self.line_starts[line];
        let column = source
            .get(start..offset.min(source.len()))
            .map(|s| s.chars().count())
            .unwrap_or(0);
        (line + 1, column + 1)
    }

    /// Build a syntax error located at a byte offset.
    pub fn error(&self, source: &str, offset: usize, message: impl Into<String>) -> Error {
        let (line, column) = self.position(source, offset);
        Error::Syntax {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Tokenize a complete source.
///
/// Fails on the first character that starts no token.
pub fn tokenize<'src>(source: &'src str, lines: &LineIndex) -> Result<Vec<Spanned<'src>>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push(Spanned {
                token,
                text: lexer.slice(),
                span,
            }),
            Err(()) => {
                let found = lexer.slice();
                let message = if found.starts_with('"') || found.starts_with('\'') {
                    "unterminated string".to_string()
                } else {
                    format!("unexpected character `{found}`")
                };
                return Err(lines.error(source, span.start, message));
            }
        }
    }
    Ok(tokens)
}

/// Strip the quotes of a string token and resolve escapes.
///
/// `\"`, `\'`, `\\`, `\n` and `\t` are resolved; any other escape is kept
/// verbatim so regular expressions such as `\[\s*(.+?)\]` survive intact.
pub fn unquote(text: &str) -> String {
    let inner = &text[1..text.len().saturating_sub(1).max(1)];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
