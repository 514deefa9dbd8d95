//! # urun
//!
//! An annotation-driven CLI runner. Declare a script's command line in
//! `#USAGE` comments, then run it through `urun`: the declared flags and
//! positional arguments are parsed for you and handed to the script as
//! `usage_*` environment variables.
//!
//! ## Usage
//!
//! - Run a script: `urun ./deploy.sh --force prod`
//! - Inspect a script's declared CLI: `urun --inspect ./deploy.sh`
//!
//! See README.md for the directive syntax.

/// Entry point for the CLI tool.
fn main() {
    urun::cli::run_cli();
}
