//! Front end of the tarto language: turning a script into an AST, and an AST's
//! compiled form into binary IR.
//!
//! To get a syntax tree:
//! 1. wrap the source in a [`lexer::Lexer`], or any other [`lexer::Tokenizer`]
//! 1. create a [`parser::Parser`] from it, optionally with a [`parser::ParserConfig`]
//! 1. call `.program()` on it (or `.statement()` to pull one node at a time)
//!
//!    ```
//!    use tarto_lib::parser::parse;
//!
//!    let program = parse("x = 1 + 2 * 3").unwrap();
//!    assert_eq!(program.to_string(), "x = (1 + (2 * 3))");
//!    ```
//!
//! The compiler pass fills a [`core::ByteCodeBuilder`]. Its [`core::Module`] is then
//! linearized with [`bytecode::serialize`]:
//!
//!    ```
//!    use tarto_lib::bytecode::HexDump;
//!    use tarto_lib::core::{ByteCodeBuilder, Constant};
//!
//!    let mut builder = ByteCodeBuilder::new();
//!    builder.push_constant(Constant::Integer(7));
//!    let bytes = builder.build().to_bytes().unwrap();
//!    println!("{}", HexDump(&bytes));
//!    ```
pub mod bytecode;
pub mod core;
pub mod lexer;
pub mod parser;
