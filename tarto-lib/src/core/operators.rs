//! The operator table. Built once, never mutated, and shared by the parser
//! (which operator binds how tightly) and the renderer (how an operator is spelled).

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use std::collections::HashMap;
use std::fmt;

use crate::core::TokenKind;

/// Binary operators, named after the opcodes the compiler pass emits for them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Less,
    Greater,
}

/// Binding power of the binary levels, loosest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Equality,
    Comparison,
    Sum,
    Product,
}

impl Precedence {
    pub const LOWEST: Precedence = Precedence::Equality;

    /// the next level that binds tighter, None for the tightest binary level
    pub fn tighter(self) -> Option<Precedence> {
        use Precedence::*;
        match self {
            Equality => Some(Comparison),
            Comparison => Some(Sum),
            Sum => Some(Product),
            Product => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub op: BinaryOp,
    pub token: TokenKind,
    pub symbol: &'static str,
    pub precedence: Precedence,
}

static OPERATORS: Lazy<Vec<OperatorInfo>> = Lazy::new(|| {
    use BinaryOp::*;
    let entry = |op, token, symbol, precedence| OperatorInfo {
        op,
        token,
        symbol,
        precedence,
    };
    vec![
        entry(Eq, TokenKind::Eq, "==", Precedence::Equality),
        entry(NotEq, TokenKind::NotEq, "!=", Precedence::Equality),
        entry(Less, TokenKind::Less, "<", Precedence::Comparison),
        entry(Greater, TokenKind::Greater, ">", Precedence::Comparison),
        entry(Add, TokenKind::Plus, "+", Precedence::Sum),
        entry(Sub, TokenKind::Minus, "-", Precedence::Sum),
        entry(Mul, TokenKind::Asterisk, "*", Precedence::Product),
        entry(Div, TokenKind::Slash, "/", Precedence::Product),
    ]
});

static BY_TOKEN: Lazy<HashMap<TokenKind, OperatorInfo>> =
    Lazy::new(|| OPERATORS.iter().map(|info| (info.token, *info)).collect());

static BY_OP: Lazy<HashMap<BinaryOp, OperatorInfo>> =
    Lazy::new(|| OPERATORS.iter().map(|info| (info.op, *info)).collect());

impl BinaryOp {
    /// looks up the operator a token stands for, if it is a binary operator at all
    pub fn from_token(kind: TokenKind) -> Option<BinaryOp> {
        BY_TOKEN.get(&kind).map(|info| info.op)
    }

    pub fn info(self) -> &'static OperatorInfo {
        // every variant is in the table
        &BY_OP[&self]
    }

    pub fn precedence(self) -> Precedence {
        self.info().precedence
    }

    pub fn symbol(self) -> &'static str {
        self.info().symbol
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
