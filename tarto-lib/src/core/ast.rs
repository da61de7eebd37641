//! Contains the AST types. A [`Program`] is a sequence of [`Node`]s, and each node is either
//! an [`Expr`], which produces a value, or a [`Stmt`], which only has an effect.
//! Nodes are never mutated after the parser returned them.
//!
//! Every node implements `Display`, which renders the canonical text form used in tests
//! and when debugging. It is a derived view and is never parsed back.

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use strum_macros::{Display as StrumDisplay, EnumString};

use std::fmt;

use crate::core::ast_macros::{mk_enum_node, node_from_leaf};
use crate::core::BinaryOp;

/// either an expression or a statement
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Display, From)]
pub enum Node {
    Expr(Expr),
    Stmt(Stmt),
}

/// the result of parsing a whole source text
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Program {
    pub nodes: Vec<Node>,
}

mk_enum_node!(
    /// represents an expression
    Expr,
    InfixExpr,
    IntegerLiteral,
    IntegerRangeLiteral,
    BoolLiteral,
    IdentExpr,
    CallExpr,
    InstantiationExpr,
    CallMethodExpr
);

mk_enum_node!(
    /// represents a statement
    Stmt,
    AssignStmt,
    BlockStmt,
    IfStmt,
    WhileStmt,
    FunctionDef,
    ReturnStmt,
    ClassDef
);

node_from_leaf!(Expr: InfixExpr, IntegerLiteral, IntegerRangeLiteral, BoolLiteral,
    IdentExpr, CallExpr, InstantiationExpr, CallMethodExpr);
node_from_leaf!(Stmt: AssignStmt, BlockStmt, IfStmt, WhileStmt, FunctionDef, ReturnStmt,
    ClassDef);

// ==============================================================================
// Expressions
// ==============================================================================

/// a binary operation, `left op right`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InfixExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct IntegerLiteral {
    pub value: i64,
}

/// `from..to`, also used as the limit of a range-tagged identifier
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct IntegerRangeLiteral {
    pub from: i64,
    pub to: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct BoolLiteral {
    pub value: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum IdentKind {
    Variable,
    Function,
}

/// The kind of value an identifier may hold.
///
/// `Include` and `Exclude` are range limits that the VM enforces at runtime.
/// The parser only records them.
#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, StrumDisplay, EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum ValueType {
    Number,
    Bool,
    Nil,
    Range,
    Any,
    Include,
    Exclude,
}

impl ValueType {
    /// the numeric code the VM uses for the value type
    pub fn code(self) -> u8 {
        use ValueType::*;
        match self {
            Number => 0,
            Bool => 1,
            Nil => 2,
            Include => 5,
            Exclude => 6,
            Range | Any => 4,
        }
    }
}

/// Type metadata attached to an identifier. The limit of `Include` and `Exclude`
/// lives inside the variant, so a limited tag can't exist without its range.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeTag {
    #[default]
    Any,
    Number,
    Bool,
    Nil,
    Range,
    Include(IntegerRangeLiteral),
    Exclude(IntegerRangeLiteral),
}

impl TypeTag {
    /// builds the tag for a value type that doesn't need a limit
    pub fn plain(value_type: ValueType) -> Option<TypeTag> {
        use ValueType::*;
        match value_type {
            Number => Some(TypeTag::Number),
            Bool => Some(TypeTag::Bool),
            Nil => Some(TypeTag::Nil),
            Range => Some(TypeTag::Range),
            Any => Some(TypeTag::Any),
            Include | Exclude => None,
        }
    }

    /// builds the tag for a value type that needs a limit
    pub fn limited(value_type: ValueType, limit: IntegerRangeLiteral) -> Option<TypeTag> {
        match value_type {
            ValueType::Include => Some(TypeTag::Include(limit)),
            ValueType::Exclude => Some(TypeTag::Exclude(limit)),
            _ => None,
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            TypeTag::Any => ValueType::Any,
            TypeTag::Number => ValueType::Number,
            TypeTag::Bool => ValueType::Bool,
            TypeTag::Nil => ValueType::Nil,
            TypeTag::Range => ValueType::Range,
            TypeTag::Include(_) => ValueType::Include,
            TypeTag::Exclude(_) => ValueType::Exclude,
        }
    }

    pub fn range_limit(&self) -> Option<&IntegerRangeLiteral> {
        match self {
            TypeTag::Include(limit) | TypeTag::Exclude(limit) => Some(limit),
            _ => None,
        }
    }
}

/// a name, together with what it names and how its value is constrained
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct IdentExpr {
    pub kind: IdentKind,
    pub name: String,
    /// written as `self.name`
    pub self_qualified: bool,
    pub type_tag: TypeTag,
}

impl IdentExpr {
    pub fn variable(name: impl Into<String>) -> Self {
        IdentExpr {
            kind: IdentKind::Variable,
            name: name.into(),
            self_qualified: false,
            type_tag: TypeTag::Any,
        }
    }

    pub fn function(name: impl Into<String>) -> Self {
        IdentExpr {
            kind: IdentKind::Function,
            ..IdentExpr::variable(name)
        }
    }

    pub fn self_field(name: impl Into<String>, type_tag: TypeTag) -> Self {
        IdentExpr {
            self_qualified: true,
            type_tag,
            ..IdentExpr::variable(name)
        }
    }

    pub fn value_type(&self) -> ValueType {
        self.type_tag.value_type()
    }

    pub fn range_limit(&self) -> Option<&IntegerRangeLiteral> {
        self.type_tag.range_limit()
    }
}

/// `name(args)`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CallExpr {
    pub ident: IdentExpr,
    pub args: Vec<Expr>,
}

/// `Name(args)`, constructs an object of a class
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InstantiationExpr {
    pub ident: IdentExpr,
    pub args: Vec<Expr>,
}

/// `receiver.method`, where method is an identifier or a call
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CallMethodExpr {
    pub receiver: Box<Expr>,
    pub method: Box<Expr>,
}

// ==============================================================================
// Statements
// ==============================================================================

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AssignStmt {
    pub ident: IdentExpr,
    pub expr: Expr,
}

/// The unit of execution for `if`, `while`, function and class bodies. Keeps source order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct BlockStmt {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub block: BlockStmt,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub block: BlockStmt,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FunctionDef {
    pub ident: IdentExpr,
    pub args: Vec<IdentExpr>,
    pub block: BlockStmt,
    /// defined inside a class body
    pub is_method: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReturnStmt {
    pub expr: Expr,
}

/// Method names are not checked for uniqueness here.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClassDef {
    pub ident: IdentExpr,
    pub methods: Vec<FunctionDef>,
}

// ==============================================================================
// Constructors
// ==============================================================================

impl InfixExpr {
    pub fn new(op: BinaryOp, left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
        InfixExpr {
            op,
            left: Box::new(left.into()),
            right: Box::new(right.into()),
        }
    }
}

impl From<i64> for IntegerLiteral {
    fn from(value: i64) -> Self {
        IntegerLiteral { value }
    }
}

impl From<bool> for BoolLiteral {
    fn from(value: bool) -> Self {
        BoolLiteral { value }
    }
}

impl CallMethodExpr {
    pub fn new(receiver: impl Into<Expr>, method: impl Into<Expr>) -> Self {
        CallMethodExpr {
            receiver: Box::new(receiver.into()),
            method: Box::new(method.into()),
        }
    }
}

impl From<Vec<Node>> for BlockStmt {
    fn from(nodes: Vec<Node>) -> Self {
        BlockStmt { nodes }
    }
}

impl From<Vec<Node>> for Program {
    fn from(nodes: Vec<Node>) -> Self {
        Program { nodes }
    }
}

// ==============================================================================
// Rendering
// ==============================================================================

/// writes every item on its own line, indented by one level
fn write_body<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for item in items {
        for line in item.to_string().lines() {
            writeln!(f, "  {}", line)?;
        }
    }
    Ok(())
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Expr]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", arg)?;
    }
    Ok(())
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", node)?;
        }
        Ok(())
    }
}

impl fmt::Display for InfixExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.left, self.op, self.right)
    }
}

impl fmt::Display for IntegerLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl fmt::Display for IntegerRangeLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.from, self.to)
    }
}

impl fmt::Display for BoolLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.range_limit() {
            Some(limit) => write!(f, "{{{}: {}}}", self.value_type(), limit),
            None => write!(f, "{}", self.value_type()),
        }
    }
}

impl fmt::Display for IdentExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.self_qualified {
            return f.write_str(&self.name);
        }
        match self.type_tag {
            TypeTag::Any => write!(f, "self.{}", self.name),
            tag => write!(f, "self.{}: {}", self.name, tag),
        }
    }
}

impl fmt::Display for CallExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.ident)?;
        write_args(f, &self.args)?;
        f.write_str(")")
    }
}

impl fmt::Display for InstantiationExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.ident.name)?;
        write_args(f, &self.args)?;
        f.write_str(")")
    }
}

impl fmt::Display for CallMethodExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.receiver, self.method)
    }
}

impl fmt::Display for AssignStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.ident, self.expr)
    }
}

impl fmt::Display for BlockStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("do\n")?;
        write_body(f, &self.nodes)?;
        f.write_str("end")
    }
}

impl fmt::Display for IfStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "if {} then", self.condition)?;
        write_body(f, &self.block.nodes)?;
        f.write_str("end")
    }
}

impl fmt::Display for WhileStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "while {} do", self.condition)?;
        write_body(f, &self.block.nodes)?;
        f.write_str("end")
    }
}

impl fmt::Display for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "def {}(", self.ident.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&arg.name)?;
        }
        f.write_str(")\n")?;
        write_body(f, &self.block.nodes)?;
        f.write_str("end")
    }
}

impl fmt::Display for ReturnStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "return {}", self.expr)
    }
}

impl fmt::Display for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "class {}", self.ident.name)?;
        write_body(f, &self.methods)?;
        f.write_str("end")
    }
}
