use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label};

/// A problem found while reading the authored document. Everything the host
/// reports is fatal to the parse; there is no warning tier.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    /// Byte range of the offending fence in the authored document.
    pub span: Range<usize>,
    pub file_id: usize,
    pub notes: Vec<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Range<usize>, file_id: usize) -> Self {
        ParseError {
            message: message.into(),
            span,
            file_id,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Render as a codespan diagnostic pointing at the offending fence.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message(self.message.clone())
            .with_labels(vec![Label::primary(self.file_id, self.span.clone())])
            .with_notes(self.notes.clone())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}
