//! Recursive descent parser. Expressions are parsed by cascading precedence levels taken
//! from the operator table, statements by dispatching on the leading keyword.
//!
//! The parser looks exactly one token ahead. Every production returns a `Result`, and the
//! first error travels unchanged up to [`Parser::program`]; there is no recovery.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use std::mem;
use std::result::Result as StdResult;
use std::str::FromStr;

use crate::core::*;
use crate::lexer::{LexError, Tokenizer};

/// argument cap used unless the config says otherwise
pub const DEFAULT_MAX_CALL_ARGS: usize = 6;

/// nesting limit used unless the config says otherwise
pub const DEFAULT_MAX_DEPTH: usize = 64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Lexical(#[from] LexError),

    #[error("Syntax error: expected {expected}, found {found}")]
    Syntax { expected: String, found: String },

    #[error("Too many arguments in call to {callee}: got {count}, at most {max} are allowed")]
    ArgumentLimit {
        callee: String,
        count: usize,
        max: usize,
    },

    #[error("Integer literal out of range: {literal}")]
    InvalidInteger { literal: String },

    #[error("Nesting too deep: at most {max} levels of expressions and blocks are allowed")]
    NestingTooDeep { max: usize },
}

pub type Result<T> = StdResult<T, ParseError>;

macro_rules! bail {
    ($($err:tt)*) => {
        return Err(ParseError::$($err)*)
    };
}

/// Knobs for the parts of the grammar where the reference behavior is a policy choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// maximum number of arguments in a call, None allows any number
    pub max_call_args: Option<usize>,
    /// if set, a block that reaches EOF before its `end` ends there silently,
    /// otherwise that is a syntax error
    pub allow_unterminated_blocks: bool,
    /// how deeply expressions and blocks may nest inside each other
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            max_call_args: Some(DEFAULT_MAX_CALL_ARGS),
            allow_unterminated_blocks: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

pub struct Parser<T: Tokenizer> {
    tokenizer: T,
    cur_token: Token,
    peek_token: Token,
    config: ParserConfig,
    depth: usize,
}

impl<T: Tokenizer> Parser<T> {
    pub fn new(tokenizer: T) -> Result<Self> {
        Self::with_config(tokenizer, ParserConfig::default())
    }

    /// creates a parser and reads the first two tokens
    pub fn with_config(tokenizer: T, config: ParserConfig) -> Result<Self> {
        let mut parser = Parser {
            tokenizer,
            cur_token: Token::eof(),
            peek_token: Token::eof(),
            config,
            depth: 0,
        };
        parser.next_token()?;
        parser.next_token()?;
        Ok(parser)
    }

    /// true once all input was consumed
    pub fn at_end(&self) -> bool {
        self.cur_token.is(TokenKind::Eof)
    }

    /// parses statements until EOF
    pub fn program(&mut self) -> Result<Program> {
        let mut nodes = vec![];
        while !self.at_end() {
            nodes.push(self.statement()?);
        }
        debug!(statements = nodes.len(), "parsed program");
        Ok(Program { nodes })
    }

    /// parses a single statement, for callers that want to work statement by statement
    pub fn statement(&mut self) -> Result<Node> {
        use TokenKind::*;
        match self.cur_token.kind {
            If => Ok(self.if_stmt()?.into()),
            While => Ok(self.while_stmt()?.into()),
            Def => Ok(self.function_def(false)?.into()),
            Class => Ok(self.class_def()?.into()),
            Return => Ok(self.return_stmt()?.into()),
            _ => self.assign(),
        }
    }

    pub fn expr(&mut self) -> Result<Expr> {
        self.nested(|p| p.binary(Precedence::LOWEST))
    }

    // ==============================================================================
    // token handling
    // ==============================================================================

    fn next_token(&mut self) -> Result<()> {
        let next = self.tokenizer.next_token()?;
        trace!(kind = %next.kind, literal = %next.literal, "token");
        self.cur_token = mem::replace(&mut self.peek_token, next);
        Ok(())
    }

    /// advances if the current token is of the given kind, and tells whether it did
    fn consume(&mut self, kind: TokenKind) -> Result<bool> {
        if self.cur_token.is(kind) {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// like consume, but a mismatch is a syntax error. Returns the consumed token
    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if !self.cur_token.is(kind) {
            bail!(Syntax {
                expected: kind.to_string(),
                found: self.cur_token.describe(),
            });
        }
        let token = mem::replace(&mut self.cur_token, Token::eof());
        self.next_token()?;
        Ok(token)
    }

    fn expect_ident(&mut self) -> Result<String> {
        Ok(self.expect(TokenKind::Ident)?.literal)
    }

    /// runs `f` one nesting level deeper. Every recursive production passes through
    /// here, so the limit also bounds the stack
    fn nested<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        if self.depth >= self.config.max_depth {
            bail!(NestingTooDeep {
                max: self.config.max_depth
            });
        }
        self.depth += 1;
        let res = f(self);
        self.depth -= 1;
        res
    }

    // ==============================================================================
    // statements
    // ==============================================================================

    fn if_stmt(&mut self) -> Result<IfStmt> {
        self.expect(TokenKind::If)?;
        let condition = self.expr()?;
        self.expect(TokenKind::Then)?;
        let block = self.block()?;
        Ok(IfStmt { condition, block })
    }

    fn while_stmt(&mut self) -> Result<WhileStmt> {
        self.expect(TokenKind::While)?;
        let condition = self.expr()?;
        self.expect(TokenKind::Do)?;
        let block = self.block()?;
        Ok(WhileStmt { condition, block })
    }

    fn return_stmt(&mut self) -> Result<ReturnStmt> {
        self.expect(TokenKind::Return)?;
        Ok(ReturnStmt { expr: self.expr()? })
    }

    /// `def name(a, b) <stmt>* end`
    fn function_def(&mut self, is_method: bool) -> Result<FunctionDef> {
        self.expect(TokenKind::Def)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::LParen)?;
        let mut args = vec![];
        if !self.cur_token.is(TokenKind::RParen) {
            loop {
                args.push(IdentExpr::variable(self.expect_ident()?));
                if !self.consume(TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        let block = self.block()?;
        Ok(FunctionDef {
            ident: IdentExpr::function(name),
            args,
            block,
            is_method,
        })
    }

    /// `class Name <def>* end`
    fn class_def(&mut self) -> Result<ClassDef> {
        self.expect(TokenKind::Class)?;
        let name = self.expect_ident()?;
        let mut methods = vec![];
        while self.cur_token.is(TokenKind::Def) {
            methods.push(self.function_def(true)?);
        }
        self.close_block()?;
        Ok(ClassDef {
            ident: IdentExpr::variable(name),
            methods,
        })
    }

    /// reads statements up to and including the terminating `end`
    fn block(&mut self) -> Result<BlockStmt> {
        self.nested(|p| {
            let mut nodes = vec![];
            while !p.cur_token.is(TokenKind::End) && !p.at_end() {
                nodes.push(p.statement()?);
            }
            p.close_block()?;
            Ok(BlockStmt { nodes })
        })
    }

    fn close_block(&mut self) -> Result<()> {
        if self.at_end() && self.config.allow_unterminated_blocks {
            debug!("block reached EOF without end");
            return Ok(());
        }
        self.expect(TokenKind::End)?;
        Ok(())
    }

    /// an assignment if the expression is a plain identifier followed by `=`,
    /// otherwise the expression itself
    fn assign(&mut self) -> Result<Node> {
        match self.expr()? {
            Expr::IdentExpr(ident) if self.cur_token.is(TokenKind::Assign) => {
                self.next_token()?;
                let expr = self.expr()?;
                Ok(AssignStmt { ident, expr }.into())
            }
            expr => Ok(expr.into()),
        }
    }

    // ==============================================================================
    // expressions
    // ==============================================================================

    /// parses all operators of one level, left associative
    fn binary(&mut self, level: Precedence) -> Result<Expr> {
        let mut left = self.operand(level)?;
        while let Some(op) = BinaryOp::from_token(self.cur_token.kind) {
            if op.precedence() != level {
                break;
            }
            self.next_token()?;
            let right = self.operand(level)?;
            left = InfixExpr::new(op, left, right).into();
        }
        Ok(left)
    }

    /// the operand of a level is the next tighter level
    fn operand(&mut self, level: Precedence) -> Result<Expr> {
        match level.tighter() {
            Some(tighter) => self.binary(tighter),
            None => self.postfix(),
        }
    }

    /// `receiver.method` and `receiver.method(args)`, chained to the left
    fn postfix(&mut self) -> Result<Expr> {
        let mut expr = self.atom()?;
        while self.consume(TokenKind::Dot)? {
            let ident = IdentExpr::function(self.expect_ident()?);
            let method: Expr = if self.cur_token.is(TokenKind::LParen) {
                self.call(ident)?.into()
            } else {
                ident.into()
            };
            expr = CallMethodExpr::new(expr, method).into();
        }
        Ok(expr)
    }

    fn atom(&mut self) -> Result<Expr> {
        use TokenKind::*;
        match self.cur_token.kind {
            Number => self.number(),
            True | False => {
                let value = self.cur_token.is(True);
                self.next_token()?;
                Ok(BoolLiteral { value }.into())
            }
            LParen => {
                self.next_token()?;
                let expr = self.expr()?;
                self.expect(RParen)?;
                Ok(expr)
            }
            SelfKw => self.self_ident(),
            Ident => {
                let name = self.expect_ident()?;
                if !self.cur_token.is(LParen) {
                    return Ok(IdentExpr::variable(name).into());
                }
                if name.starts_with(|c: char| c.is_ascii_uppercase()) {
                    let ident = IdentExpr::function(name);
                    let args = self.args(&ident.name)?;
                    Ok(InstantiationExpr { ident, args }.into())
                } else {
                    Ok(self.call(IdentExpr::function(name))?.into())
                }
            }
            _ => bail!(Syntax {
                expected: "expression".into(),
                found: self.cur_token.describe(),
            }),
        }
    }

    fn integer(&mut self) -> Result<i64> {
        let token = self.expect(TokenKind::Number)?;
        token
            .literal
            .parse()
            .map_err(|_| ParseError::InvalidInteger {
                literal: token.literal,
            })
    }

    /// an integer, or a range if `..` follows
    fn number(&mut self) -> Result<Expr> {
        let from = self.integer()?;
        if self.consume(TokenKind::DotDot)? {
            let to = self.integer()?;
            return Ok(IntegerRangeLiteral { from, to }.into());
        }
        Ok(IntegerLiteral { value: from }.into())
    }

    fn range(&mut self) -> Result<IntegerRangeLiteral> {
        let from = self.integer()?;
        self.expect(TokenKind::DotDot)?;
        let to = self.integer()?;
        Ok(IntegerRangeLiteral { from, to })
    }

    /// `self.name`, optionally followed by a type tag or an argument list
    fn self_ident(&mut self) -> Result<Expr> {
        self.expect(TokenKind::SelfKw)?;
        self.expect(TokenKind::Dot)?;
        let name = self.expect_ident()?;
        if self.cur_token.is(TokenKind::LParen) {
            let ident = IdentExpr {
                kind: IdentKind::Function,
                ..IdentExpr::self_field(name, TypeTag::Any)
            };
            return Ok(self.call(ident)?.into());
        }
        let type_tag = if self.consume(TokenKind::Colon)? {
            self.type_tag()?
        } else {
            TypeTag::Any
        };
        Ok(IdentExpr::self_field(name, type_tag).into())
    }

    /// `number`, `bool`, `nil`, `range`, `any`, or `{include: A..B}` / `{exclude: A..B}`
    fn type_tag(&mut self) -> Result<TypeTag> {
        if self.consume(TokenKind::LBrace)? {
            let value_type = self.value_type()?;
            self.expect(TokenKind::Colon)?;
            let limit = self.range()?;
            self.expect(TokenKind::RBrace)?;
            return TypeTag::limited(value_type, limit).ok_or_else(|| ParseError::Syntax {
                expected: "include or exclude".into(),
                found: value_type.to_string(),
            });
        }
        let value_type = self.value_type()?;
        TypeTag::plain(value_type).ok_or_else(|| ParseError::Syntax {
            expected: format!("{{{}: <range>}}", value_type),
            found: value_type.to_string(),
        })
    }

    fn value_type(&mut self) -> Result<ValueType> {
        let name = self.expect_ident()?;
        ValueType::from_str(&name).map_err(|_| ParseError::Syntax {
            expected: "value type".into(),
            found: name,
        })
    }

    fn call(&mut self, ident: IdentExpr) -> Result<CallExpr> {
        let args = self.args(&ident.name)?;
        Ok(CallExpr { ident, args })
    }

    /// `(a, b, ...)`, respecting the configured argument cap
    fn args(&mut self, callee: &str) -> Result<Vec<Expr>> {
        self.expect(TokenKind::LParen)?;
        let mut args = vec![];
        if !self.cur_token.is(TokenKind::RParen) {
            loop {
                args.push(self.expr()?);
                if let Some(max) = self.config.max_call_args {
                    if args.len() > max {
                        bail!(ArgumentLimit {
                            callee: callee.into(),
                            count: args.len(),
                            max,
                        });
                    }
                }
                if !self.consume(TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }
}

/// parses a complete source text with the reference lexer
pub fn parse(src: &str) -> Result<Program> {
    parse_with_config(src, ParserConfig::default())
}

pub fn parse_with_config(src: &str, config: ParserConfig) -> Result<Program> {
    Parser::with_config(crate::lexer::Lexer::new(src), config)?.program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Lexer, TokenList};

    fn render(src: &str) -> String {
        parse(src).unwrap().to_string()
    }

    fn unbounded() -> ParserConfig {
        ParserConfig {
            max_call_args: None,
            ..ParserConfig::default()
        }
    }

    #[test]
    fn test_precedence() {
        assert_eq!(render("1 + 2 * 3"), "(1 + (2 * 3))");
        assert_eq!(render("1 * 2 + 3"), "((1 * 2) + 3)");
        assert_eq!(render("a + 1 < b * 2 == c"), "(((a + 1) < (b * 2)) == c)");
        assert_eq!(render("a != b > c"), "(a != (b > c))");
    }

    #[test]
    fn test_grouping() {
        assert_eq!(render("(1 + 2) * 3"), "((1 + 2) * 3)");
        assert_eq!(render("8 / (4 / 2)"), "(8 / (4 / 2))");
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(render("10 - 3 - 2"), "((10 - 3) - 2)");
        assert_eq!(render("8 / 4 / 2"), "((8 / 4) / 2)");
        assert_eq!(render("a < b < c"), "((a < b) < c)");
    }

    #[test]
    fn test_if_statement() {
        let program = parse("if x < 3 then y = 1 end").unwrap();
        assert_eq!(program.nodes.len(), 1);
        let Node::Stmt(Stmt::IfStmt(IfStmt { condition, block })) = &program.nodes[0] else {
            panic!("expected an if statement, got {:?}", program.nodes[0]);
        };
        assert_eq!(condition.to_string(), "(x < 3)");
        assert_eq!(
            block.nodes,
            vec![Node::from(AssignStmt {
                ident: IdentExpr::variable("y"),
                expr: IntegerLiteral { value: 1 }.into(),
            })]
        );
    }

    #[test]
    fn test_while_statement() {
        let program = parse("while x < 10 do x = x + 1 end").unwrap();
        let Node::Stmt(Stmt::WhileStmt(stmt)) = &program.nodes[0] else {
            panic!("expected a while statement, got {:?}", program.nodes[0]);
        };
        assert_eq!(stmt.block.nodes.len(), 1);
        assert!(matches!(stmt.block.nodes[0], Node::Stmt(Stmt::AssignStmt(_))));
        assert_eq!(program.to_string(), "while (x < 10) do\n  x = (x + 1)\nend");
    }

    #[test]
    fn test_blocks_keep_source_order() {
        let program = parse("while c do a = 1 b = 2 f(a) end").unwrap();
        assert_eq!(
            program.to_string(),
            "while c do\n  a = 1\n  b = 2\n  f(a)\nend"
        );
    }

    #[test]
    fn test_assignment_needs_a_plain_identifier() {
        let mut parser = Parser::new(Lexer::new("f(x) = 1")).unwrap();
        let node = parser.statement().unwrap();
        assert!(matches!(node, Node::Expr(Expr::CallExpr(_))));
        assert_eq!(
            parser.statement(),
            Err(ParseError::Syntax {
                expected: "expression".into(),
                found: "=".into()
            })
        );
        assert!(parse("f(x) = 1").is_err());
    }

    #[test]
    fn test_expression_statement() {
        let program = parse("x\n1 + 1").unwrap();
        assert!(matches!(program.nodes[0], Node::Expr(Expr::IdentExpr(_))));
        assert!(matches!(program.nodes[1], Node::Expr(Expr::InfixExpr(_))));
    }

    #[test]
    fn test_unterminated_block_is_an_error_by_default() {
        assert_eq!(
            parse("while x do x = x - 1"),
            Err(ParseError::Syntax {
                expected: "end".into(),
                found: "<eof>".into()
            })
        );
        assert!(parse("class A def f() return 1 end").is_err());
    }

    #[test]
    fn test_unterminated_block_can_be_allowed() {
        let config = ParserConfig {
            allow_unterminated_blocks: true,
            ..ParserConfig::default()
        };
        let program = parse_with_config("if a then b = 1 c = 2", config).unwrap();
        assert_eq!(program.to_string(), "if a then\n  b = 1\n  c = 2\nend");
        // a wrong token is still an error
        assert!(parse_with_config("class A x end", config).is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let parens = |n: usize| format!("{}1{}", "(".repeat(n), ")".repeat(n));
        assert_eq!(render(&parens(DEFAULT_MAX_DEPTH - 1)), "1");
        for n in [DEFAULT_MAX_DEPTH, 172, 5000] {
            assert_eq!(
                parse(&parens(n)),
                Err(ParseError::NestingTooDeep {
                    max: DEFAULT_MAX_DEPTH
                })
            );
        }

        let calls = format!("{}x{}", "f(".repeat(100), ")".repeat(100));
        assert!(matches!(parse(&calls), Err(ParseError::NestingTooDeep { .. })));

        let ifs = format!("{}x = 1{}", "if a then ".repeat(100), " end".repeat(100));
        assert!(matches!(parse(&ifs), Err(ParseError::NestingTooDeep { .. })));

        let shallow = ParserConfig {
            max_depth: 3,
            ..ParserConfig::default()
        };
        assert!(parse_with_config("x = ((1 + 2))", shallow).is_ok());
        assert!(parse_with_config("if a then while b do c = 1 end end", shallow).is_ok());
        assert_eq!(
            parse_with_config("x = (((1 + 2)))", shallow),
            Err(ParseError::NestingTooDeep { max: 3 })
        );
    }

    #[test]
    fn test_brackets_are_not_expressions() {
        assert_eq!(
            parse("x = [1, 2]"),
            Err(ParseError::Syntax {
                expected: "expression".into(),
                found: "[".into()
            })
        );
    }

    #[test]
    fn test_missing_keyword() {
        assert_eq!(
            parse("if x 1 end"),
            Err(ParseError::Syntax {
                expected: "then".into(),
                found: "1".into()
            })
        );
        assert!(matches!(parse("while x then end"), Err(ParseError::Syntax { .. })));
        assert!(matches!(parse("(1 + 2"), Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn test_argument_cap() {
        assert!(parse("f(1, 2, 3, 4, 5, 6)").is_ok());
        assert_eq!(
            parse("f(1, 2, 3, 4, 5, 6, 7)"),
            Err(ParseError::ArgumentLimit {
                callee: "f".into(),
                count: 7,
                max: 6
            })
        );
        assert!(parse_with_config("f(1, 2, 3, 4, 5, 6, 7, 8)", unbounded()).is_ok());
        let tight = ParserConfig {
            max_call_args: Some(1),
            ..ParserConfig::default()
        };
        assert!(matches!(
            parse_with_config("o.m(1, 2)", tight),
            Err(ParseError::ArgumentLimit { count: 2, max: 1, .. })
        ));
    }

    #[test]
    fn test_calls() {
        assert_eq!(render("f()"), "f()");
        assert_eq!(render("f(1, g(2), x + 1)"), "f(1, g(2), (x + 1))");
        let program = parse("c = Counter(1, 2)").unwrap();
        let Node::Stmt(Stmt::AssignStmt(assign)) = &program.nodes[0] else {
            panic!("expected an assignment");
        };
        assert!(matches!(assign.expr, Expr::InstantiationExpr(_)));
        assert_eq!(program.to_string(), "c = Counter(1, 2)");
    }

    #[test]
    fn test_method_chains() {
        let program = parse("c.inc(2).value").unwrap();
        let Node::Expr(Expr::CallMethodExpr(outer)) = &program.nodes[0] else {
            panic!("expected a method call");
        };
        assert!(matches!(*outer.receiver, Expr::CallMethodExpr(_)));
        assert_eq!(
            *outer.method,
            Expr::IdentExpr(IdentExpr::function("value"))
        );
        assert_eq!(program.to_string(), "c.inc(2).value");
        assert_eq!(render("a.b + 1"), "(a.b + 1)");
    }

    #[test]
    fn test_literals() {
        assert_eq!(render("r = 1..5"), "r = 1..5");
        assert_eq!(render("t = true == false"), "t = (true == false)");
        assert_eq!(
            parse("99999999999999999999"),
            Err(ParseError::InvalidInteger {
                literal: "99999999999999999999".into()
            })
        );
    }

    #[test]
    fn test_self_identifiers() {
        let program = parse("self.x: {include: 0..10} = 5").unwrap();
        let Node::Stmt(Stmt::AssignStmt(assign)) = &program.nodes[0] else {
            panic!("expected an assignment");
        };
        assert!(assign.ident.self_qualified);
        assert_eq!(assign.ident.value_type(), ValueType::Include);
        assert_eq!(
            assign.ident.range_limit(),
            Some(&IntegerRangeLiteral { from: 0, to: 10 })
        );
        assert_eq!(program.to_string(), "self.x: {include: 0..10} = 5");

        assert_eq!(render("self.flag: bool = true"), "self.flag: bool = true");
        assert_eq!(render("self.v: any = 1"), "self.v = 1");
        assert_eq!(render("self.y: {exclude: 3..4}"), "self.y: {exclude: 3..4}");
        assert_eq!(render("self.reset(1)"), "self.reset(1)");
    }

    #[test]
    fn test_bad_type_tags() {
        assert!(matches!(parse("self.x: include"), Err(ParseError::Syntax { .. })));
        assert!(matches!(
            parse("self.x: {number: 1..2}"),
            Err(ParseError::Syntax { .. })
        ));
        assert!(matches!(parse("self.x: float"), Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn test_functions_and_classes() {
        let src = "def add(a, b)\n  return a + b\nend\n\
                   class Counter\n\
                     def inc(by)\n\
                       self.count: {include: 0..10} = self.count + by\n\
                     end\n\
                     def get() return self.count end\n\
                   end";
        let program = parse(src).unwrap();
        assert_eq!(program.nodes.len(), 2);
        let Node::Stmt(Stmt::FunctionDef(def)) = &program.nodes[0] else {
            panic!("expected a function definition");
        };
        assert!(!def.is_method);
        assert_eq!(def.args, vec![IdentExpr::variable("a"), IdentExpr::variable("b")]);

        let Node::Stmt(Stmt::ClassDef(class)) = &program.nodes[1] else {
            panic!("expected a class definition");
        };
        let names: Vec<_> = class.methods.iter().map(|m| m.ident.name.as_str()).collect();
        assert_eq!(names, vec!["inc", "get"]);
        assert!(class.methods.iter().all(|m| m.is_method));
        assert_eq!(
            program.to_string(),
            "def add(a, b)\n  return (a + b)\nend\n\
             class Counter\n\
             \x20 def inc(by)\n\
             \x20   self.count: {include: 0..10} = (self.count + by)\n\
             \x20 end\n\
             \x20 def get()\n\
             \x20   return self.count\n\
             \x20 end\n\
             end"
        );
    }

    #[test]
    fn test_class_body_only_takes_methods() {
        assert_eq!(
            parse("class A x = 1 end"),
            Err(ParseError::Syntax {
                expected: "end".into(),
                found: "x".into()
            })
        );
    }

    #[test]
    fn test_lexical_errors_propagate() {
        assert!(matches!(
            Parser::new(Lexer::new("$")),
            Err(ParseError::Lexical(_))
        ));
        assert!(matches!(parse("x = 1\ny = 2 + @"), Err(ParseError::Lexical(_))));
    }

    #[test]
    fn test_external_tokens() {
        let tokens = vec![
            Token::new(TokenKind::Ident, "x"),
            Token::new(TokenKind::Assign, "="),
            Token::new(TokenKind::Number, "4"),
        ];
        let program = Parser::new(TokenList::new(tokens)).unwrap().program().unwrap();
        assert_eq!(program.to_string(), "x = 4");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse("  # only a comment\n").unwrap(), Program::default());
    }
}
