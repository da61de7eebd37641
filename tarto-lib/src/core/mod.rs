//! contains all important data structures

mod ast_macros;

pub mod token;
pub use token::*;

pub mod operators;
pub use operators::*;

pub mod ast;
pub use ast::*;

pub mod constant;
pub use constant::*;

pub mod bytecode_builder;
pub use bytecode_builder::*;
