//! Argument matcher.
//!
//! Resolves an invocation's argument list against a [`Specification`]: a
//! left-to-right scan consumes flag occurrences (and their values), queues
//! everything else as positional candidates, then zips the candidates
//! against the declared args in order.

use thiserror::Error;

use crate::spec::Specification;

/// A failure to match the invocation against the Specification. All
/// variants are terminal for the current run; no child process is spawned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// A leading-dash token that no declared flag answers to. Never treated
    /// as a positional, so typos cannot be misread as data.
    #[error("unknown flag {0}")]
    UnknownFlag(String),

    #[error("flag {flag} requires a value")]
    MissingValue { flag: String },

    #[error("flag {flag} does not take a value")]
    UnexpectedValue { flag: String },

    #[error("missing required argument <{name}>")]
    MissingArg { name: String },

    #[error("unexpected positional argument `{0}`")]
    UnexpectedPositional(String),
}

/// The value mapping produced by a successful match: one entry per declared
/// flag and arg, keyed by logical name, in declaration order (flags first).
///
/// Boolean flags resolve to `"true"` when present and `""` when absent;
/// value-taking flags and positionals resolve to the matched string, the
/// declared default, or `""`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolvedInvocation {
    entries: Vec<(String, String)>,
}

impl ResolvedInvocation {
    fn push(&mut self, name: &str, value: String) {
        self.entries.push((name.to_string(), value));
    }

    /// Look up a resolved value by logical name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether a token looks like a flag. A lone `-` is a positional by
/// convention (stdin placeholder); anything else starting with `-` is
/// treated as a flag token and must match a declared alias.
fn is_flag_token(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

/// Split `--long=value` into the alias head and its inline value.
fn split_inline(token: &str) -> (&str, Option<&str>) {
    if token.starts_with("--") {
        if let Some((head, value)) = token.split_once('=') {
            return (head, Some(value));
        }
    }
    (token, None)
}

/// Match invocation arguments (program name excluded) against a
/// Specification.
///
/// # Errors
///
/// Returns an [`ArgumentError`] for an unknown flag token, a value-taking
/// flag at end of input, a missing required positional, or more positionals
/// than declared args.
pub fn match_args(
    spec: &Specification,
    argv: &[String],
) -> Result<ResolvedInvocation, ArgumentError> {
    let mut flag_values: Vec<Option<String>> = vec![None; spec.flags.len()];
    let mut candidates: Vec<&str> = Vec::new();
    let mut flags_done = false;

    let mut tokens = argv.iter();
    while let Some(token) = tokens.next() {
        if flags_done {
            candidates.push(token);
            continue;
        }
        if token == "--" {
            flags_done = true;
            continue;
        }
        if !is_flag_token(token) {
            candidates.push(token);
            continue;
        }

        let (head, inline) = split_inline(token);
        let Some(idx) = spec.flags.iter().position(|f| f.matches(head)) else {
            return Err(ArgumentError::UnknownFlag(head.to_string()));
        };
        let flag = &spec.flags[idx];
        if flag.takes_value() {
            let value = match inline {
                Some(v) => v.to_string(),
                None => tokens
                    .next()
                    .cloned()
                    .ok_or_else(|| ArgumentError::MissingValue {
                        flag: head.to_string(),
                    })?,
            };
            flag_values[idx] = Some(value);
        } else if inline.is_some() {
            return Err(ArgumentError::UnexpectedValue {
                flag: head.to_string(),
            });
        } else {
            // Repeated occurrences collapse to a single presence.
            flag_values[idx] = Some("true".to_string());
        }
    }

    if candidates.len() > spec.args.len() {
        return Err(ArgumentError::UnexpectedPositional(
            candidates[spec.args.len()].to_string(),
        ));
    }

    let mut resolved = ResolvedInvocation::default();
    for (flag, value) in spec.flags.iter().zip(flag_values) {
        let value = value
            .or_else(|| flag.default.clone())
            .unwrap_or_default();
        resolved.push(&flag.name, value);
    }

    let mut candidates = candidates.into_iter();
    for arg in &spec.args {
        match candidates.next() {
            Some(value) => resolved.push(&arg.name, value.to_string()),
            None if arg.required => {
                return Err(ArgumentError::MissingArg {
                    name: arg.name.clone(),
                });
            }
            None => {
                let value = arg.default.clone().unwrap_or_default();
                resolved.push(&arg.name, value);
            }
        }
    }

    Ok(resolved)
}
