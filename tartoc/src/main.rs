use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tarto_lib::bytecode::HexDump;
use tarto_lib::parser::{self, ParserConfig, DEFAULT_MAX_CALL_ARGS, DEFAULT_MAX_DEPTH};

use std::path::PathBuf;

mod repl;

/// Parses tarto scripts and prints their canonical form. Without a script, starts a repl.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    script: Option<PathBuf>,

    /// print a hex dump of a binary IR file instead
    #[arg(long, value_name = "FILE", conflicts_with = "script")]
    hexdump: Option<PathBuf>,

    /// maximum number of arguments in a call
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_ARGS, conflicts_with = "unbounded_args")]
    max_args: usize,

    /// allow calls with any number of arguments
    #[arg(long)]
    unbounded_args: bool,

    /// let blocks that hit the end of the input without `end` close silently
    #[arg(long)]
    allow_unterminated: bool,

    /// how deeply expressions and blocks may nest
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

impl Cli {
    fn parser_config(&self) -> ParserConfig {
        ParserConfig {
            max_call_args: (!self.unbounded_args).then_some(self.max_args),
            allow_unterminated_blocks: self.allow_unterminated,
            max_depth: self.max_depth,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = cli.parser_config();

    if let Some(path) = &cli.hexdump {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let dump = HexDump(&bytes).to_string();
        if !dump.is_empty() {
            println!("{}", dump);
        }
        return Ok(());
    }

    match &cli.script {
        Some(path) => {
            let src = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let program = parser::parse_with_config(&src, config)
                .with_context(|| format!("parsing {}", path.display()))?;
            for node in &program.nodes {
                println!("{}", node);
            }
            Ok(())
        }
        None => repl::run(config),
    }
}
