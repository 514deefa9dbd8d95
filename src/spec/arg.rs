//! Positional argument specifications.

use serde::Serialize;
use std::fmt;

/// A positional argument declared by an `arg` directive.
///
/// The name token follows the bracket convention: `<file>` is required,
/// `[file]` is optional, and a bare `file` is treated as required. The
/// position of an arg is its index among the declared args; declaration
/// order is the matching order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ArgSpec {
    /// Logical name with brackets stripped.
    pub name: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Used when the arg is absent from the invocation. Declaring a default
    /// makes the arg optional.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl From<&str> for ArgSpec {
    fn from(input: &str) -> Self {
        let mut arg = ArgSpec {
            name: input.trim().to_string(),
            required: true,
            ..ArgSpec::default()
        };
        let first = arg.name.chars().next().unwrap_or_default();
        let last = arg.name.chars().last().unwrap_or_default();
        match (first, last) {
            ('[', ']') if arg.name.len() > 1 => {
                arg.name = arg.name[1..arg.name.len() - 1].to_string();
                arg.required = false;
            }
            ('<', '>') if arg.name.len() > 1 => {
                arg.name = arg.name[1..arg.name.len() - 1].to_string();
            }
            _ => {}
        }
        arg
    }
}

impl ArgSpec {
    /// Display token in canonical bracket notation: `<name>` when required,
    /// `[name]` when optional.
    #[must_use]
    pub fn usage(&self) -> String {
        if self.required {
            format!("<{}>", self.name)
        } else {
            format!("[{}]", self.name)
        }
    }
}

impl fmt::Display for ArgSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.usage())
    }
}
