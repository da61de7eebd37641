use anyhow::{anyhow, Context, Result};
use glob::glob;
use std::result::Result as StdResult;

use std::fs;
use std::process::Command;

const TARTOC: &str = "../target/release/tartoc";

fn main() -> Result<()> {
    compile_tartoc().context("compiling tartoc")?;

    let scripts: Vec<_> = glob("tests/*.tt")?.collect::<StdResult<_, _>>()?;
    let mut failed = 0;
    for script in &scripts {
        let expected_path = script.with_extension("out");
        let expected_output = fs::read_to_string(&expected_path)
            .with_context(|| format!("loading expected output: {}", expected_path.display()))?;
        let output_bytes = Command::new(TARTOC)
            .arg(script)
            .output()
            .with_context(|| format!("running script {}", script.display()))?
            .stdout;
        let output = String::from_utf8(output_bytes)?;
        if output == expected_output {
            println!("{}: passed", script.display());
        } else {
            failed += 1;
            println!("{}: failed\nactual output:\n{}", script.display(), output);
        }
    }

    if failed == 0 {
        Ok(())
    } else {
        Err(anyhow!("{} of {} scripts failed", failed, scripts.len()))
    }
}

fn compile_tartoc() -> Result<()> {
    let st = Command::new("cargo")
        .args(["build", "--release", "-p", "tartoc"])
        .current_dir("..")
        .status()?;
    if st.success() {
        Ok(())
    } else {
        Err(anyhow!("compiling tartoc failed"))
    }
}
