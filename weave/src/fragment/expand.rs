use crate::fragment::lexer::{LineToken, scan_line};
use crate::fragment::{Fragment, Part};

/// Expand a flat sequence of authored lines into a fragment.
///
/// Pure: no I/O, no side effects. Consecutive plain lines accumulate into a
/// single Text part; each whole-line marker becomes its own empty
/// Placeholder part. Markerless input (including empty input) yields exactly
/// one Text part equal to the input lines.
pub fn expand(lines: &[String], name: Option<String>) -> Fragment {
    let mut parts = Vec::new();
    let mut pending: Vec<String> = Vec::new();

    for line in lines {
        match scan_line(line) {
            LineToken::Marker(anchor) => {
                if !pending.is_empty() {
                    parts.push(Part::Text(std::mem::take(&mut pending)));
                }
                parts.push(Part::placeholder(anchor));
            }
            LineToken::Plain(text) => pending.push(text),
        }
    }

    if !pending.is_empty() || parts.is_empty() {
        parts.push(Part::Text(pending));
    }

    Fragment::new(name, parts)
}
