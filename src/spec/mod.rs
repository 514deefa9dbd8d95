//! CLI specification model and the validating reducer.
//!
//! A [`Specification`] is the complete CLI shape declared by one script's
//! directives: an optional bin name, flags in declaration order, and
//! positional args in declaration order. It is built once per invocation and
//! read-only afterward.

mod arg;
mod flag;

pub use arg::ArgSpec;
pub use flag::FlagSpec;

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::bridge;
use crate::parser::{self, DirectiveError};
use crate::scanner::{self, DirectiveLine};

/// One parsed directive line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Directive {
    Bin(String),
    Flag(FlagSpec),
    Arg(ArgSpec),
}

/// The complete, validated CLI shape assembled from a script's directives.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Specification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin: Option<String>,
    pub flags: Vec<FlagSpec>,
    pub args: Vec<ArgSpec>,
}

impl Specification {
    /// Scan a script's source text and build its Specification.
    ///
    /// # Errors
    ///
    /// Returns a [`DirectiveError`] for a malformed directive line or for a
    /// validation failure (duplicate `bin`, duplicate alias or name).
    pub fn parse(source: &str) -> Result<Self, DirectiveError> {
        let mut items = Vec::new();
        for line in scanner::scan(source) {
            let directive = parser::parse_line(&line)?;
            items.push((directive, line));
        }
        Self::from_directives(items)
    }

    /// Reduce an ordered directive sequence into a validated Specification.
    ///
    /// Declaration order of flags and args is preserved exactly. Validation
    /// runs once, after all directives are consumed, so duplicate errors can
    /// report where the first occurrence was declared.
    ///
    /// # Errors
    ///
    /// Returns a [`DirectiveError`] on a second `bin` directive, a flag
    /// alias declared by two flags, two args sharing a name, or two
    /// declarations resolving to the same environment key.
    pub fn from_directives(
        items: Vec<(Directive, DirectiveLine)>,
    ) -> Result<Self, DirectiveError> {
        let mut spec = Specification::default();
        let mut bin_at: Option<usize> = None;
        let mut flag_lines = Vec::new();
        let mut arg_lines = Vec::new();

        for (directive, line) in items {
            match directive {
                Directive::Bin(name) => {
                    if let Some(first) = bin_at {
                        return Err(DirectiveError::new(
                            format!("duplicate bin directive (bin already declared at line {first})"),
                            &line,
                        ));
                    }
                    bin_at = Some(line.number);
                    spec.bin = Some(name);
                }
                Directive::Flag(flag) => {
                    spec.flags.push(flag);
                    flag_lines.push(line);
                }
                Directive::Arg(arg) => {
                    spec.args.push(arg);
                    arg_lines.push(line);
                }
            }
        }

        spec.validate(&flag_lines, &arg_lines)?;
        Ok(spec)
    }

    fn validate(
        &self,
        flag_lines: &[DirectiveLine],
        arg_lines: &[DirectiveLine],
    ) -> Result<(), DirectiveError> {
        // Alias uniqueness across all flags.
        let mut seen_aliases: HashMap<String, (&str, usize)> = HashMap::new();
        for (flag, line) in self.flags.iter().zip(flag_lines) {
            let aliases = flag
                .short
                .iter()
                .map(|c| format!("-{c}"))
                .chain(flag.long.iter().map(|l| format!("--{l}")));
            for alias in aliases {
                if let Some((other, number)) = seen_aliases.get(alias.as_str()) {
                    return Err(DirectiveError::new(
                        format!(
                            "duplicate flag alias {alias} (already declared by flag `{other}` at line {number})"
                        ),
                        line,
                    ));
                }
                seen_aliases.insert(alias, (flag.name.as_str(), line.number));
            }
        }

        // Arg name uniqueness.
        let mut seen_args: HashMap<&str, usize> = HashMap::new();
        for (arg, line) in self.args.iter().zip(arg_lines) {
            if let Some(number) = seen_args.get(arg.name.as_str()) {
                return Err(DirectiveError::new(
                    format!(
                        "duplicate arg name `{}` (already declared at line {number})",
                        arg.name
                    ),
                    line,
                ));
            }
            seen_args.insert(&arg.name, line.number);
        }

        // Environment keys must stay pairwise distinct across flags and args,
        // since both end up in the same `usage_*` namespace.
        let mut seen_keys: HashMap<String, (&str, usize)> = HashMap::new();
        let named = self
            .flags
            .iter()
            .map(|f| f.name.as_str())
            .zip(flag_lines)
            .chain(self.args.iter().map(|a| a.name.as_str()).zip(arg_lines));
        for (name, line) in named {
            let key = bridge::env_key(name);
            if let Some((other, number)) = seen_keys.get(key.as_str()) {
                return Err(DirectiveError::new(
                    format!(
                        "`{name}` resolves to the same environment key `{key}` as `{other}` \
                         (declared at line {number})"
                    ),
                    line,
                ));
            }
            seen_keys.insert(key, (name, line.number));
        }

        Ok(())
    }

    /// Pretty JSON rendering of the Specification, for `--inspect`.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Canonical directive-text rendering. Parsing the rendered text yields an
/// equal Specification.
impl fmt::Display for Specification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(bin) = &self.bin {
            writeln!(f, "#USAGE bin {}", quote(bin))?;
        }
        for flag in &self.flags {
            write!(f, "#USAGE flag {}", quote(&flag.usage()))?;
            if let Some(help) = &flag.help {
                write!(f, " help={}", quote(help))?;
            }
            if let Some(default) = &flag.default {
                write!(f, " default={}", quote(default))?;
            }
            writeln!(f)?;
        }
        for arg in &self.args {
            write!(f, "#USAGE arg {}", quote(&arg.usage()))?;
            if let Some(help) = &arg.help {
                write!(f, " help={}", quote(help))?;
            }
            if let Some(default) = &arg.default {
                write!(f, " default={}", quote(default))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
