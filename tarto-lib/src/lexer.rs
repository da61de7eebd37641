//! The seam between the parser and whatever produces its tokens.
//!
//! The parser only needs something implementing [`Tokenizer`]. [`Lexer`] is the reference
//! implementation, driven by the pest grammar in `tokens.pest`, and [`TokenList`] replays
//! tokens that were produced elsewhere.

use pest::error::{Error as PestError, ErrorVariant, InputLocation};
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

use std::collections::VecDeque;
use std::str::FromStr;

use crate::core::{Token, TokenKind};

/// Pull based token source. Once the input is exhausted, every further call must
/// return an EOF token again instead of failing.
pub trait Tokenizer {
    fn next_token(&mut self) -> Result<Token, LexError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unexpected input {found:?} at line {line}, column {column}")]
    UnexpectedInput {
        line: usize,
        column: usize,
        found: String,
    },

    /// the grammar engine gave up for lack of stack or calls, not because of the input
    #[error("lexer gave up at line {line}, column {column}: {message}")]
    LimitReached {
        line: usize,
        column: usize,
        message: String,
    },
}

#[derive(Parser)]
#[grammar = "tokens.pest"]
struct TokenParser;

/// Reference tokenizer. Produces one token per call by matching the grammar against
/// the input that hasn't been consumed yet.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Lexer { src, pos: 0 }
    }

    /// line and column of byte `offset` of the source, both starting at 1
    fn line_col(&self, offset: usize) -> (usize, usize) {
        let consumed = &self.src[..offset];
        let line = consumed.matches('\n').count() + 1;
        let column = match consumed.rfind('\n') {
            Some(nl) => consumed[nl + 1..].chars().count() + 1,
            None => consumed.chars().count() + 1,
        };
        (line, column)
    }

    /// builds the error for a failed match that starts at byte `offset` of the source
    fn unexpected_input(&self, offset: usize) -> LexError {
        let (line, column) = self.line_col(offset);
        let found = self.src[offset..]
            .chars()
            .next()
            .map(String::from)
            .unwrap_or_default();
        LexError::UnexpectedInput {
            line,
            column,
            found,
        }
    }

    /// translates a failed match against the input starting at `self.pos`
    fn match_error(&self, err: PestError<Rule>) -> LexError {
        let offset = self.pos
            + match err.location {
                InputLocation::Pos(p) => p,
                InputLocation::Span((start, _)) => start,
            };
        match err.variant {
            ErrorVariant::CustomError { message } => {
                let (line, column) = self.line_col(offset);
                LexError::LimitReached {
                    line,
                    column,
                    message,
                }
            }
            ErrorVariant::ParsingError { .. } => self.unexpected_input(offset),
        }
    }
}

impl<'a> Tokenizer for Lexer<'a> {
    fn next_token(&mut self) -> Result<Token, LexError> {
        let rest = &self.src[self.pos..];
        let mut pairs = TokenParser::parse(Rule::token, rest).map_err(|e| self.match_error(e))?;
        let inner = pairs
            .next()
            .and_then(|token| token.into_inner().next())
            .ok_or_else(|| self.unexpected_input(self.pos))?;

        let start = self.pos + inner.as_span().start();
        let literal = inner.as_str();
        let kind = match inner.as_rule() {
            Rule::number => TokenKind::Number,
            Rule::name => TokenKind::from_str(literal).unwrap_or(TokenKind::Ident),
            Rule::symbol => {
                TokenKind::from_str(literal).map_err(|_| self.unexpected_input(start))?
            }
            _ => TokenKind::Eof,
        };
        self.pos += inner.as_span().end();
        Ok(Token::new(kind, literal))
    }
}

/// Replays an already tokenized input, then answers EOF forever
#[derive(Debug, Clone, Default)]
pub struct TokenList {
    tokens: VecDeque<Token>,
}

impl TokenList {
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        TokenList {
            tokens: tokens.into_iter().collect(),
        }
    }
}

impl Tokenizer for TokenList {
    fn next_token(&mut self) -> Result<Token, LexError> {
        Ok(self.tokens.pop_front().unwrap_or_else(Token::eof))
    }
}

/// drains a tokenizer up to and including the first EOF token
pub fn tokenize(tokenizer: &mut impl Tokenizer) -> Result<Vec<Token>, LexError> {
    let mut tokens = vec![];
    loop {
        let token = tokenizer.next_token()?;
        let done = token.is(TokenKind::Eof);
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
