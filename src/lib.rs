//! # urun
//!
//! An annotation-driven CLI runner: scripts declare their command line in
//! leading `#USAGE` comments, and `urun` parses the invocation against that
//! declaration, bridges the resolved values into `usage_*` environment
//! variables, and executes the script with inherited standard streams.
//!
//! The pipeline is strictly left-to-right:
//! [`scanner`] → [`parser`] → [`spec`] → [`matcher`] → [`bridge`] → [`executor`].

pub mod bridge;
pub mod cli;
pub mod error;
pub mod executor;
pub mod matcher;
pub mod parser;
pub mod scanner;
pub mod spec;
