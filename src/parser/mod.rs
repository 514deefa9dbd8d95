//! Directive parsing using pest.
//!
//! This is the tokenizer half of spec building: each raw directive line from
//! the [`crate::scanner`] is parsed into one typed [`Directive`]. Assembling
//! and validating the full [`crate::spec::Specification`] happens in the
//! reducer, so parsing and validation stay independently testable.

mod error;

pub use error::DirectiveError;

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

use crate::scanner::DirectiveLine;
use crate::spec::{ArgSpec, Directive, FlagSpec};

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct DirectiveParser;

/// A quoted string or `key="value"` property with its column span, used to
/// point diagnostics at the offending token.
struct Token {
    col: usize,
    col_end: usize,
    kind: TokenKind,
}

enum TokenKind {
    Str(String),
    Prop(String, String),
}

/// Parse one directive line into a typed [`Directive`].
///
/// # Errors
///
/// Returns a [`DirectiveError`] if the line does not match the directive
/// grammar, uses an unknown keyword or property, or is missing a required
/// token (e.g. `flag` without an alias string).
pub fn parse_line(line: &DirectiveLine) -> Result<Directive, DirectiveError> {
    let mut pairs = DirectiveParser::parse(Rule::directive, &line.text)
        .map_err(|e| DirectiveError::from_pest(&e, line))?;

    let Some(directive) = pairs.next() else {
        return Err(DirectiveError::new("empty directive", line));
    };

    let mut keyword = String::new();
    let mut keyword_span = (1, 1);
    let mut tokens = Vec::new();
    for pair in directive.into_inner() {
        match pair.as_rule() {
            Rule::keyword => {
                keyword = pair.as_str().to_string();
                keyword_span = span_of(&pair);
            }
            Rule::string => tokens.push(Token {
                col: span_of(&pair).0,
                col_end: span_of(&pair).1,
                kind: TokenKind::Str(unquote(pair.as_str())),
            }),
            Rule::prop => {
                let (col, col_end) = span_of(&pair);
                let mut inner = pair.into_inner();
                let key = inner.next().map(|p| p.as_str().to_string());
                let value = inner.next().map(|p| unquote(p.as_str()));
                if let (Some(key), Some(value)) = (key, value) {
                    tokens.push(Token {
                        col,
                        col_end,
                        kind: TokenKind::Prop(key, value),
                    });
                }
            }
            Rule::EOI => {}
            _ => {}
        }
    }

    match keyword.as_str() {
        "bin" => build_bin(line, &tokens),
        "flag" => build_flag(line, &tokens),
        "arg" => build_arg(line, &tokens),
        other => Err(DirectiveError::at(
            format!("unknown directive `{other}`"),
            line,
            keyword_span.0,
            keyword_span.1,
        )
        .with_hint("Recognized directives are `bin`, `flag`, and `arg`.")),
    }
}

fn build_bin(line: &DirectiveLine, tokens: &[Token]) -> Result<Directive, DirectiveError> {
    let name = positional(line, tokens, "bin", "a quoted binary name")?;
    if tokens.len() > 1 {
        let extra = &tokens[1];
        return Err(DirectiveError::at(
            "bin takes exactly one quoted name",
            line,
            extra.col,
            extra.col_end,
        ));
    }
    Ok(Directive::Bin(name))
}

fn build_flag(line: &DirectiveLine, tokens: &[Token]) -> Result<Directive, DirectiveError> {
    let usage = positional(line, tokens, "flag", "a quoted alias string")?;
    let mut flag: FlagSpec = usage
        .parse()
        .map_err(|msg: String| DirectiveError::new(msg, line))?;
    for token in &tokens[1..] {
        match &token.kind {
            TokenKind::Str(_) => {
                return Err(DirectiveError::at(
                    "flag takes exactly one quoted alias string",
                    line,
                    token.col,
                    token.col_end,
                ));
            }
            TokenKind::Prop(key, value) => match key.as_str() {
                "help" => flag.help = Some(value.clone()),
                "default" => {
                    if !flag.takes_value() {
                        return Err(DirectiveError::at(
                            format!("flag {} is a boolean switch and cannot have a default", flag.name),
                            line,
                            token.col,
                            token.col_end,
                        )
                        .with_hint(
                            "Add a value token to the alias string to make the flag \
                             value-taking, e.g. `flag \"--level <level>\" default=\"info\"`.",
                        ));
                    }
                    flag.default = Some(value.clone());
                }
                other => {
                    return Err(unknown_prop(line, token, other, "flag", &["help", "default"]));
                }
            },
        }
    }
    Ok(Directive::Flag(flag))
}

fn build_arg(line: &DirectiveLine, tokens: &[Token]) -> Result<Directive, DirectiveError> {
    let name = positional(line, tokens, "arg", "a quoted name")?;
    let mut arg = ArgSpec::from(name.as_str());
    if arg.name.is_empty() {
        return Err(DirectiveError::new("arg name must not be empty", line));
    }
    for token in &tokens[1..] {
        match &token.kind {
            TokenKind::Str(_) => {
                return Err(DirectiveError::at(
                    "arg takes exactly one quoted name",
                    line,
                    token.col,
                    token.col_end,
                ));
            }
            TokenKind::Prop(key, value) => match key.as_str() {
                "help" => arg.help = Some(value.clone()),
                "default" => {
                    // A defaulted arg can never be missing, so it is optional.
                    arg.default = Some(value.clone());
                    arg.required = false;
                }
                other => {
                    return Err(unknown_prop(line, token, other, "arg", &["help", "default"]));
                }
            },
        }
    }
    Ok(Directive::Arg(arg))
}

/// Extract the mandatory first quoted string of a directive.
fn positional(
    line: &DirectiveLine,
    tokens: &[Token],
    keyword: &str,
    expected: &str,
) -> Result<String, DirectiveError> {
    match tokens.first() {
        Some(Token {
            kind: TokenKind::Str(s),
            ..
        }) => Ok(s.clone()),
        Some(token) => Err(DirectiveError::at(
            format!("{keyword} requires {expected} before any properties"),
            line,
            token.col,
            token.col_end,
        )),
        None => Err(DirectiveError::new(
            format!("{keyword} requires {expected}"),
            line,
        )),
    }
}

fn unknown_prop(
    line: &DirectiveLine,
    token: &Token,
    key: &str,
    keyword: &str,
    supported: &[&str],
) -> DirectiveError {
    DirectiveError::at(
        format!("unsupported {keyword} property `{key}`"),
        line,
        token.col,
        token.col_end,
    )
    .with_hint(format!(
        "Supported properties: {}.",
        supported.join(", ")
    ))
}

/// 1-indexed column span of a pair within the single-line input.
fn span_of(pair: &Pair<Rule>) -> (usize, usize) {
    let span = pair.as_span();
    (span.start() + 1, span.end() + 1)
}

/// Strip the surrounding quotes and resolve `\"` / `\\` escapes.
fn unquote(raw: &str) -> String {
    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
