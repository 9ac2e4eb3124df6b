/// Classification of one authored line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineToken {
    /// A whole-line placeholder marker; the payload is the (possibly empty)
    /// placeholder name.
    Marker(String),
    /// Ordinary text, with any escaped markers unescaped.
    Plain(String),
}

/// Classify a single line. A marker only counts when the whole line, after
/// trimming surrounding whitespace, is exactly `<<<NAME>>>`; marker-like
/// substrings inside other text stay plain.
pub fn scan_line(line: &str) -> LineToken {
    match whole_line_marker(line) {
        Some(name) => LineToken::Marker(name.to_string()),
        None => LineToken::Plain(unescape_markers(line)),
    }
}

/// NAME may be empty and may not contain `>`; that keeps the escaped form
/// `<<<<NAME>>>>` from ever matching as a marker (its inner text would
/// carry a stray `>`).
fn whole_line_marker(line: &str) -> Option<&str> {
    let inner = line.trim().strip_prefix("<<<")?.strip_suffix(">>>")?;
    if inner.contains('>') {
        return None;
    }
    Some(inner)
}

/// Rewrite every escaped marker `<<<<NAME>>>>` to the literal `<<<NAME>>>`.
/// This is the only way authored content can emit a literal marker string.
fn unescape_markers(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(start) = rest.find("<<<<") {
        let (head, tail) = rest.split_at(start);
        let after = &tail[4..];
        let name_len = after.find('>').unwrap_or(after.len());
        let (name, close) = after.split_at(name_len);
        if close.starts_with(">>>>") {
            out.push_str(head);
            out.push_str("<<<");
            out.push_str(name);
            out.push_str(">>>");
            rest = &close[4..];
        } else {
            // not an escape; emit one char and rescan from the next position
            out.push_str(head);
            out.push('<');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}
