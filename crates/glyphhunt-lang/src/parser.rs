//! Recursive-descent parser for HUNT sources.
//!
//! ```text
//! <source> ::= <hunt>+
//! <hunt>   ::= "<" "hunt" <name> ":" "[" "INIT" "GATHER" "=" <param>+ "]" ">" "<" "EXEC" ">"
//! <param>  ::= "{" "param" <kind> ":" <target> "=" "(" "val" <value> ("," <value>)* ")" "}"
//! ```

use glyphhunt_core::Result;

use crate::ast::{GatherClause, HuntBlock, ParamDecl, RuleKind};
use crate::token::{tokenize, unquote, LineIndex, Spanned, Token};

/// Parse every block of a source. Nothing is returned unless the whole source parses.
pub fn parse(source: &str) -> Result<Vec<HuntBlock>> {
    let lines = LineIndex::new(source);
    let tokens = tokenize(source, &lines)?;
    let mut parser = Parser {
        source,
        lines,
        tokens,
        pos: 0,
    };
    parser.source_file()
}

struct Parser<'src> {
    source: &'src str,
    lines: LineIndex,
    tokens: Vec<Spanned<'src>>,
    pos: usize,
}

impl<'src> Parser<'src> {
    fn source_file(&mut self) -> Result<Vec<HuntBlock>> {
        if self.tokens.is_empty() {
            return Err(self.error_at(0, "empty HUNT source"));
        }
        let mut blocks = Vec::new();
        while self.peek().is_some() {
            blocks.push(self.hunt()?);
        }
        Ok(blocks)
    }

    fn hunt(&mut self) -> Result<HuntBlock> {
        let open = self.expect(Token::Open)?;
        let (line, _) = self.lines.position(self.source, open.span.start);
        self.expect(Token::Hunt)?;
        let name = self.expect(Token::Ident)?.text.to_string();
        self.expect(Token::Colon)?;
        self.expect(Token::LBracket)?;
        self.expect(Token::Init)?;
        self.expect(Token::Gather)?;
        self.expect(Token::Equals)?;

        let mut gather = GatherClause::default();
        gather.params.push(self.param()?);
        while self.peek() == Some(Token::LBrace) {
            gather.params.push(self.param()?);
        }

        self.expect(Token::RBracket)?;
        self.expect(Token::Close)?;
        self.expect(Token::Open)?;
        self.expect(Token::Exec)?;
        self.expect(Token::Close)?;

        Ok(HuntBlock { name, gather, line })
    }

    fn param(&mut self) -> Result<ParamDecl> {
        let brace = self.expect(Token::LBrace)?;
        let (line, column) = self.lines.position(self.source, brace.span.start);
        self.expect(Token::Param)?;

        let kind_token = self.expect(Token::Ident)?;
        let kind: RuleKind = kind_token
            .text
            .parse()
            .map_err(|msg: String| self.error_at(kind_token.span.start, msg))?;

        self.expect(Token::Colon)?;
        let target = self.expect(Token::Ident)?.text.to_string();
        self.expect(Token::Equals)?;
        self.expect(Token::LParen)?;
        self.expect(Token::Val)?;

        let mut values = vec![self.value()?];
        while self.peek() == Some(Token::Comma) {
            self.bump();
            values.push(self.value()?);
        }

        self.expect(Token::RParen)?;
        self.expect(Token::RBrace)?;

        Ok(ParamDecl {
            kind,
            target,
            values,
            line,
            column,
        })
    }

    fn value(&mut self) -> Result<String> {
        match self.peek() {
            Some(Token::Str) => Ok(unquote(self.bump().text)),
            Some(Token::Ident | Token::Number | Token::Star) => Ok(self.bump().text.to_string()),
            _ => Err(self.unexpected("a value")),
        }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|t| t.token)
    }

    fn bump(&mut self) -> Spanned<'src> {
        let token = self.tokens[self.pos].clone();
        self.pos += 1;
        token
    }

    fn expect(&mut self, expected: Token) -> Result<Spanned<'src>> {
        if self.peek() == Some(expected) {
            Ok(self.bump())
        } else {
            Err(self.unexpected(expected.describe()))
        }
    }

    fn unexpected(&self, expected: &str) -> glyphhunt_core::Error {
        match self.tokens.get(self.pos) {
            Some(found) => self.error_at(
                found.span.start,
                format!("expected {expected}, found {}", found.token.describe()),
            ),
            None => self.error_at(
                self.source.len(),
                format!("expected {expected}, found end of input"),
            ),
        }
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> glyphhunt_core::Error {
        self.lines.error(self.source, offset, message)
    }
}
