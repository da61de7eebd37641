use anyhow::Result;
use crossterm::style::Stylize;
use rustyline::{error::ReadlineError, DefaultEditor};

use tarto_lib::lexer::Lexer;
use tarto_lib::parser::{self, Parser, ParserConfig};

/// Reads lines until `exit` or EOF and echoes the parsed form of each statement.
/// Errors are reported, and the loop goes on.
pub fn run(config: ParserConfig) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(()),
            Err(other) => return Err(other.into()),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" {
            return Ok(());
        }
        rl.add_history_entry(line)?;

        match eval_line(line, config) {
            Ok(rendered) => {
                for r in rendered {
                    println!("=> {}", r);
                }
            }
            Err(e) => eprintln!("{}", e.to_string().red()),
        }
    }
}

fn eval_line(line: &str, config: ParserConfig) -> parser::Result<Vec<String>> {
    let mut parser = Parser::with_config(Lexer::new(line), config)?;
    let mut rendered = vec![];
    while !parser.at_end() {
        rendered.push(parser.statement()?.to_string());
    }
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_line() {
        let config = ParserConfig::default();
        assert_eq!(
            eval_line("x = 1 + 2 y = x", config).unwrap(),
            vec!["x = (1 + 2)", "y = x"]
        );
        assert!(eval_line("if x then", config).is_err());
        let lenient = ParserConfig {
            allow_unterminated_blocks: true,
            ..config
        };
        assert_eq!(eval_line("if x then", lenient).unwrap(), vec!["if x then\nend"]);
    }
}
