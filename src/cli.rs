//! CLI module containing the main entry point logic.
//!
//! This module is separated from main.rs so the pipeline stays callable as
//! a library; only this layer prints errors and exits the process.

use clap::Parser as ClapParser;
use std::fs;
use std::path::PathBuf;
use std::process;

use crate::error::RunError;
use crate::spec::Specification;
use crate::{bridge, executor, matcher};

const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI arguments for the urun tool.
#[derive(ClapParser)]
#[command(name = "urun")]
#[command(version = PKG_VERSION)]
#[command(about = "Run scripts whose CLI is declared in #USAGE comments", long_about = None)]
struct Cli {
    /// Script whose leading comments declare its CLI
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    /// Arguments for the script, matched against its declared CLI
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,

    /// Print the parsed CLI specification as JSON and exit
    #[arg(long)]
    inspect: bool,
}

/// Main CLI logic: parse arguments, run the pipeline, exit with the
/// resulting code.
pub fn run_cli() {
    let argv: Vec<String> = std::env::args().collect();
    let cli = parse_argv(argv);
    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            // Directive diagnostics carry their own multi-line formatting.
            match err {
                RunError::Directive(_) => eprintln!("{err}"),
                _ => eprintln!("error: {err}"),
            }
            process::exit(err.exit_code());
        }
    }
}

/// Split argv at the script path before clap sees the rest.
///
/// Everything after the script belongs to the script's own CLI; handing it
/// to clap would let clap consume tokens like a leading `--`, which must
/// reach the matcher untouched. Tokens before the script (the runner's own
/// flags) still go through clap, so `--help`/`--version`/`--inspect` and
/// clap's own error reporting keep working.
fn parse_argv(argv: Vec<String>) -> Cli {
    let script_pos = argv
        .iter()
        .skip(1)
        .position(|a| !a.starts_with('-'))
        .map(|i| i + 1);
    match script_pos {
        Some(pos) => {
            let mut cli = Cli::parse_from(&argv[..=pos]);
            cli.args = argv[pos + 1..].to_vec();
            cli
        }
        None => Cli::parse_from(&argv),
    }
}

/// Run the scanner → spec → matcher → bridge → executor pipeline.
fn run(cli: &Cli) -> Result<i32, RunError> {
    let source = fs::read_to_string(&cli.script).map_err(|source| RunError::Io {
        path: cli.script.clone(),
        source,
    })?;

    let spec = Specification::parse(&source)
        .map_err(|e| e.with_filename(cli.script.display().to_string()))?;

    if cli.inspect {
        println!("{}", spec.to_json());
        return Ok(0);
    }

    let resolved = matcher::match_args(&spec, &cli.args)?;
    let overlay = bridge::env_overlay(&resolved);
    executor::execute(&cli.script, &source, &cli.args, &overlay)
}
