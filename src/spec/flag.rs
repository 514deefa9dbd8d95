//! Flag specifications and alias-string parsing.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A named, alias-addressable option declared by a `flag` directive.
///
/// The alias string of the directive is whitespace-separated: `--long`
/// aliases, single-character `-s` aliases, and at most one `<value>` (or
/// `[value]`) token whose presence makes the flag value-taking. A flag with
/// no value token is a boolean switch.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct FlagSpec {
    /// Logical name: the first long alias, or the first short alias when no
    /// long form exists. This is the name resolved values are keyed by.
    pub name: String,
    pub short: Vec<char>,
    pub long: Vec<String>,
    /// Display name of the flag's value (e.g. `level` from `<level>`), when
    /// the flag takes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Used when the flag is value-taking and absent from the invocation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl FlagSpec {
    /// Whether this flag consumes a value token from the invocation.
    #[must_use]
    pub fn takes_value(&self) -> bool {
        self.value_name.is_some()
    }

    /// Whether the given invocation token (`-f` or `--force`) addresses
    /// this flag.
    #[must_use]
    pub fn matches(&self, token: &str) -> bool {
        if let Some(long) = token.strip_prefix("--") {
            self.long.iter().any(|l| l == long)
        } else if let Some(short) = token.strip_prefix('-') {
            let mut chars = short.chars();
            matches!((chars.next(), chars.next()), (Some(c), None) if self.short.contains(&c))
        } else {
            false
        }
    }

    /// Canonical alias-string form: shorts, then longs, then the value
    /// token, e.g. `-f --force` or `-l --level <level>`.
    #[must_use]
    pub fn usage(&self) -> String {
        let mut parts: Vec<String> = self.short.iter().map(|c| format!("-{c}")).collect();
        parts.extend(self.long.iter().map(|l| format!("--{l}")));
        if let Some(value) = &self.value_name {
            parts.push(format!("<{value}>"));
        }
        parts.join(" ")
    }
}

impl FromStr for FlagSpec {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut flag = Self::default();
        for part in input.split_whitespace() {
            if let Some(long) = part.strip_prefix("--") {
                if long.is_empty() {
                    return Err("flag alias `--` is not a valid long alias".to_string());
                }
                flag.long.push(long.to_string());
            } else if let Some(short) = part.strip_prefix('-') {
                let mut chars = short.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => flag.short.push(c),
                    _ => {
                        return Err(format!(
                            "invalid short alias `-{short}`: short aliases are a single character"
                        ));
                    }
                }
            } else if is_value_token(part) {
                if flag.value_name.is_some() {
                    return Err(format!(
                        "flag takes at most one value token, found extra `{part}`"
                    ));
                }
                flag.value_name = Some(part[1..part.len() - 1].to_string());
            } else {
                return Err(format!(
                    "unexpected token `{part}` in flag alias string; expected \
                     `--long`, `-s`, or `<value>`"
                ));
            }
        }
        if flag.short.is_empty() && flag.long.is_empty() {
            return Err("flag requires at least one alias".to_string());
        }
        flag.name = flag
            .long
            .first()
            .cloned()
            .or_else(|| flag.short.first().map(char::to_string))
            .unwrap_or_default();
        Ok(flag)
    }
}

fn is_value_token(part: &str) -> bool {
    part.len() > 2
        && (part.starts_with('<') && part.ends_with('>')
            || part.starts_with('[') && part.ends_with(']'))
}

impl fmt::Display for FlagSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.usage())
    }
}
