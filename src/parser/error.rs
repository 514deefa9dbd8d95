//! Directive diagnostics.
//!
//! Converts raw pest parser errors and reducer validation failures into
//! structured, human-readable diagnostics with source context, precise
//! column indicators, and actionable hints.

use std::fmt;

use crate::scanner::DirectiveLine;

use super::Rule;

/// A structured directive-syntax error.
///
/// Columns are relative to the directive text, i.e. the line as it appears
/// after the `#USAGE` marker has been stripped. The shown source line is
/// that same stripped text, so the caret always lines up.
#[derive(Debug, Clone)]
pub struct DirectiveError {
    /// Human-readable error message (no raw rule names).
    pub message: String,
    /// 1-indexed line number in the original script.
    pub line: usize,
    /// 1-indexed column where the error begins.
    pub col: usize,
    /// End column for span errors (used to size the underline caret).
    pub col_end: Option<usize>,
    /// The directive text of the offending line.
    pub source_line: Option<String>,
    /// Optional source file name shown in the error header.
    pub filename: Option<String>,
    /// Optional suggestion to help the user fix the error.
    pub hint: Option<String>,
}

impl DirectiveError {
    /// Build an error for a whole directive line (no specific column).
    pub fn new(message: impl Into<String>, line: &DirectiveLine) -> Self {
        DirectiveError {
            message: message.into(),
            line: line.number,
            col: 1,
            col_end: Some(line.text.len() + 1),
            source_line: Some(line.text.clone()),
            filename: None,
            hint: None,
        }
    }

    /// Build an error pointing at a span within the directive text.
    pub fn at(message: impl Into<String>, line: &DirectiveLine, col: usize, col_end: usize) -> Self {
        DirectiveError {
            col,
            col_end: Some(col_end),
            ..Self::new(message, line)
        }
    }

    /// Attach a hint.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Attach the script's file name for the error header.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Build a `DirectiveError` from a pest error on one directive line.
    ///
    /// The pest error's position is within the stripped directive text; the
    /// line number is taken from the scanner instead.
    pub fn from_pest(error: &pest::error::Error<Rule>, line: &DirectiveLine) -> Self {
        let (col, col_end) = match error.line_col {
            pest::error::LineColLocation::Pos((_, c)) => (c, None),
            pest::error::LineColLocation::Span((sl, sc), (el, ec)) => {
                let end = if sl == el { Some(ec) } else { None };
                (sc, end)
            }
        };

        let (message, hint) = match &error.variant {
            pest::error::ErrorVariant::ParsingError { positives, .. } => {
                let msg = friendly_message(positives);
                let h = friendly_hint(positives, &line.text);
                (msg, h)
            }
            pest::error::ErrorVariant::CustomError { message } => (message.clone(), None),
        };

        DirectiveError {
            message,
            line: line.number,
            col,
            col_end,
            source_line: Some(line.text.clone()),
            filename: None,
            hint,
        }
    }
}

/// Return a short, user-facing label for a grammar rule, or `None` to omit it.
fn rule_label(rule: Rule) -> Option<&'static str> {
    match rule {
        Rule::keyword => Some("directive keyword"),
        Rule::string => Some("quoted string"),
        Rule::prop => Some("`key=\"value\"` property"),
        Rule::key => Some("property name"),
        // EOI and all silent/atomic rules are suppressed.
        _ => None,
    }
}

/// Compose a human-readable message from the expected rule set.
fn friendly_message(positives: &[Rule]) -> String {
    let named: Vec<&str> = positives.iter().copied().filter_map(rule_label).collect();

    match named.as_slice() {
        [] => "malformed directive".to_string(),
        [single] => format!("expected {single}"),
        [a, b] => format!("expected {a} or {b}"),
        many => {
            if let Some((last, rest)) = many.split_last() {
                format!("expected {} or {}", rest.join(", "), last)
            } else {
                "malformed directive".to_string()
            }
        }
    }
}

/// Return an actionable hint based on the expected rules and the line.
fn friendly_hint(positives: &[Rule], text: &str) -> Option<String> {
    let has = |r: Rule| positives.contains(&r);

    // Unterminated string: an odd number of unescaped quotes on the line.
    let quotes = count_unescaped_quotes(text);
    if quotes % 2 == 1 {
        return Some(
            "Strings are double-quoted; escape embedded quotes as `\\\"` \
             and close the string before the end of the line."
                .to_string(),
        );
    }

    if has(Rule::string) || has(Rule::prop) {
        return Some(
            "Directive values must be double-quoted, e.g. `flag \"-f --force\"` \
             or `help=\"some text\"`."
                .to_string(),
        );
    }

    None
}

fn count_unescaped_quotes(text: &str) -> usize {
    let mut count = 0;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            // Skip the escaped character, whatever it is.
            '\\' => {
                chars.next();
            }
            '"' => count += 1,
            _ => {}
        }
    }
    count
}

/// Format the caret underline for an error at `col` with optional `col_end`.
fn underline(col: usize, col_end: Option<usize>) -> String {
    let start = col.saturating_sub(1);
    let len = col_end.map_or(1, |end| end.saturating_sub(col).max(1));
    format!("{}{}", " ".repeat(start), "^".repeat(len))
}

impl fmt::Display for DirectiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // ── error header ────────────────────────────────────────────────────
        //   error: <message>
        //     --> <file>:<line>:<col>
        writeln!(f, "error: {}", self.message)?;

        let location = match &self.filename {
            Some(name) => format!("{name}:{}:{}", self.line, self.col),
            None => format!("{}:{}", self.line, self.col),
        };
        writeln!(f, "  --> {location}")?;

        // ── source context ──────────────────────────────────────────────────
        //    |
        // NN | <directive text>
        //    | <caret>
        if let Some(ref src) = self.source_line {
            let num = self.line.to_string();
            let pad = " ".repeat(num.len());

            writeln!(f, "   {pad} |")?;
            writeln!(f, "   {num} | {src}")?;
            write!(f, "   {pad} | {}", underline(self.col, self.col_end))?;
        }

        // ── hint ─────────────────────────────────────────────────────────────
        if let Some(ref hint) = self.hint {
            writeln!(f)?;
            write!(f, "   = hint: {hint}")?;
        }

        Ok(())
    }
}

impl std::error::Error for DirectiveError {}
