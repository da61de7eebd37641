//! Tokens as handed to the parser by a [`Tokenizer`](crate::lexer::Tokenizer)

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The kind of a token.
///
/// Symbols and keywords are spelled through their strum name, so
/// `TokenKind::from_str` recognizes both, and `Display` gives back the source
/// text. The three non-literal kinds use names that can never be lexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum TokenKind {
    #[strum(serialize = "<number>")]
    Number,
    #[strum(serialize = "<identifier>")]
    Ident,
    #[strum(serialize = "<eof>")]
    Eof,

    #[strum(serialize = "+")]
    Plus,
    #[strum(serialize = "-")]
    Minus,
    #[strum(serialize = "*")]
    Asterisk,
    #[strum(serialize = "/")]
    Slash,
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    NotEq,
    #[strum(serialize = "<")]
    Less,
    #[strum(serialize = ">")]
    Greater,

    #[strum(serialize = "(")]
    LParen,
    #[strum(serialize = ")")]
    RParen,
    #[strum(serialize = ",")]
    Comma,
    #[strum(serialize = "=")]
    Assign,
    #[strum(serialize = ".")]
    Dot,
    #[strum(serialize = "..")]
    DotDot,
    #[strum(serialize = "[")]
    LBracket,
    #[strum(serialize = "]")]
    RBracket,
    #[strum(serialize = "{")]
    LBrace,
    #[strum(serialize = "}")]
    RBrace,
    #[strum(serialize = ":")]
    Colon,

    #[strum(serialize = "if")]
    If,
    #[strum(serialize = "then")]
    Then,
    #[strum(serialize = "end")]
    End,
    #[strum(serialize = "while")]
    While,
    #[strum(serialize = "do")]
    Do,
    #[strum(serialize = "def")]
    Def,
    #[strum(serialize = "class")]
    Class,
    #[strum(serialize = "return")]
    Return,
    #[strum(serialize = "self")]
    SelfKw,
    #[strum(serialize = "true")]
    True,
    #[strum(serialize = "false")]
    False,
}

/// A single token. Consumed once by the parser and then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>) -> Self {
        Token {
            kind,
            literal: literal.into(),
        }
    }

    pub fn eof() -> Self {
        Token::new(TokenKind::Eof, "")
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// how the token is shown in error messages
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => TokenKind::Eof.to_string(),
            _ => self.literal.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_keywords_and_symbols_parse() {
        assert_eq!(TokenKind::from_str("while").unwrap(), TokenKind::While);
        assert_eq!(TokenKind::from_str("..").unwrap(), TokenKind::DotDot);
        assert_eq!(TokenKind::from_str("!=").unwrap(), TokenKind::NotEq);
        assert!(TokenKind::from_str("whilst").is_err());
    }

    #[test]
    fn test_display_is_source_text() {
        assert_eq!(TokenKind::Assign.to_string(), "=");
        assert_eq!(TokenKind::SelfKw.to_string(), "self");
        assert_eq!(Token::eof().describe(), "<eof>");
    }
}
