use std::fmt;

/// A segment of rendered source: literal code or a named omission standing
/// in for a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceSegment {
    Code(Vec<String>),
    Omission(String),
}

/// A rendered view of the source fed (or recalled) by one directive.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDisplay {
    /// File header ("     main.py (cont)"); None when suppressed by `join`.
    pub header: Option<String>,
    pub segments: Vec<SourceSegment>,
    /// 1-based number of the first displayed line within the whole source.
    pub first_line: usize,
    /// Whether the language policy asks for line numbers.
    pub number_lines: bool,
    /// Language to highlight as: the `highlight=` override when given, else
    /// the directive's language. Opaque hint for an external renderer.
    pub language: String,
}

/// One prompt/input/output exchange in an interactive session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionExchange {
    pub prompt: String,
    pub input: String,
    pub output: String,
}

/// A display element returned to the authoring host.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayBlock {
    Source(SourceDisplay),
    /// Captured execution output.
    Output(String),
    Session(Vec<SessionExchange>),
}

/// The two shapes a backend result can take: captured text that the
/// pipeline cleans up and wraps, or a display block the backend already
/// rendered. Resolved uniformly by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum RunResult {
    RawText(String),
    Prerendered(DisplayBlock),
}

/// Drop characters outside the printable ASCII range (keeping tab and
/// newline), so rendered output stays stable across encodings.
pub fn filter_printable(text: &str) -> String {
    text.chars()
        .filter(|c| (' '..='~').contains(c) || *c == '\t' || *c == '\n')
        .collect()
}

/// Strip leading and trailing blank lines from captured output.
pub fn strip_blank_lines(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let Some(start) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return String::new();
    };
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(start, |p| p + 1);
    lines[start..end].join("\n")
}

impl fmt::Display for DisplayBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayBlock::Source(source) => source.fmt(f),
            DisplayBlock::Output(text) => writeln!(f, "{}", text),
            DisplayBlock::Session(exchanges) => {
                for (k, exchange) in exchanges.iter().enumerate() {
                    writeln!(f, "{}{}", exchange.prompt, exchange.input)?;
                    writeln!(f, "{}", exchange.output)?;
                    if k + 1 < exchanges.len() {
                        writeln!(f)?;
                    }
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for SourceDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(header) = &self.header {
            writeln!(f, "{}", header)?;
            writeln!(f)?;
        }
        let mut line_number = self.first_line;
        let mut write_line = |f: &mut fmt::Formatter<'_>, text: &str| -> fmt::Result {
            if self.number_lines {
                writeln!(f, "{:3}  {}", line_number, text)?;
            } else {
                writeln!(f, "{}", text)?;
            }
            line_number += 1;
            Ok(())
        };
        for segment in &self.segments {
            match segment {
                SourceSegment::Code(lines) => {
                    for line in lines {
                        write_line(f, line)?;
                    }
                }
                SourceSegment::Omission(name) => {
                    write_line(f, &format!("[... {} ...]", name))?;
                }
            }
        }
        Ok(())
    }
}
