//! Directive scanner.
//!
//! Extracts the raw directive lines from a script's source text. A directive
//! line is any line whose trimmed text starts with one of the recognized
//! comment markers (`#USAGE` or `//USAGE`); the marker is stripped and the
//! remainder is handed to the parser. Every other line is skipped silently.

/// Recognized directive markers, tried in order.
pub const MARKERS: [&str; 2] = ["#USAGE", "//USAGE"];

/// One raw directive line, stripped of its comment marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveLine {
    /// Directive text with the marker and surrounding whitespace removed.
    pub text: String,
    /// 1-indexed line number in the original source.
    pub number: usize,
}

/// Scan source text for directive lines, in source order.
///
/// The returned iterator is lazy and borrows the source, so scanning can be
/// restarted by calling `scan` again. Marker lines with no directive text
/// after the marker are skipped along with non-marker lines.
pub fn scan(source: &str) -> impl Iterator<Item = DirectiveLine> + '_ {
    source
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| strip_marker(line).map(|text| (idx, text)))
        .filter(|(_, text)| !text.is_empty())
        .map(|(idx, text)| DirectiveLine {
            text: text.to_string(),
            number: idx + 1,
        })
}

/// Strip a directive marker from a line, or `None` if the line is not a
/// directive. The marker must be a whole token: `#USAGEX` does not match.
fn strip_marker(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    MARKERS
        .iter()
        .find_map(|marker| trimmed.strip_prefix(marker))
        .filter(|rest| rest.is_empty() || rest.starts_with([' ', '\t']))
        .map(str::trim)
}
