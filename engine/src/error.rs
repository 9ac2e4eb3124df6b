use std::fmt;

use weave::directive::DirectiveError;

/// Author mistakes in a single directive. Fatal to that command only; the
/// accumulator state other commands rely on is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// `in=` named a placeholder that was never declared.
    UnknownPlaceholder { source: String, name: String },
    /// `in=` named a placeholder that already has content (and no `redo`).
    PlaceholderFilled { source: String, name: String },
    /// `after=` or `recall` named a block that was never fed.
    UnknownBlock { source: String, name: String },
    /// recall against a source that was never fed.
    UnknownSource(String),
    /// `redo` without a `name=` or `in=` identity to replace.
    RedoWithoutIdentity,
    /// The directive names a language the render knows nothing about.
    UnknownLanguage(String),
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageError::UnknownPlaceholder { source, name } => {
                write!(f, "no placeholder '<<<{}>>>' in {}", name, source)
            }
            UsageError::PlaceholderFilled { source, name } => write!(
                f,
                "placeholder '<<<{}>>>' in {} is already filled (use redo to replace it)",
                name, source
            ),
            UsageError::UnknownBlock { source, name } => {
                write!(f, "no block named '{}' in {}", name, source)
            }
            UsageError::UnknownSource(source) => {
                write!(f, "source '{}' has not been fed", source)
            }
            UsageError::RedoWithoutIdentity => {
                write!(f, "redo needs a name= or in= option to identify what to replace")
            }
            UsageError::UnknownLanguage(name) => write!(f, "unknown language: {}", name),
        }
    }
}

impl std::error::Error for UsageError {}

/// Backend failures. Surfaced as the command's visible output by the host
/// and never cached, so a later render with the same key retries.
#[derive(Debug)]
pub enum ExecError {
    Compile { source: String, detail: String },
    Run { source: String, detail: String },
    Interactive { detail: String },
    /// The language config has no command for the requested operation.
    Unsupported {
        language: String,
        operation: &'static str,
    },
    Io(std::io::Error),
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::Compile { source, detail } => {
                write!(f, "compilation of {} failed: {}", source, detail)
            }
            ExecError::Run { source, detail } => {
                write!(f, "execution of {} failed: {}", source, detail)
            }
            ExecError::Interactive { detail } => {
                write!(f, "interactive session failed: {}", detail)
            }
            ExecError::Unsupported { language, operation } => {
                write!(f, "language '{}' has no {} command configured", language, operation)
            }
            ExecError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for ExecError {}

impl From<std::io::Error> for ExecError {
    fn from(err: std::io::Error) -> Self {
        ExecError::Io(err)
    }
}

/// Any error a directive can produce.
#[derive(Debug)]
pub enum EngineError {
    Directive(DirectiveError),
    Usage(UsageError),
    Exec(ExecError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Directive(err) => err.fmt(f),
            EngineError::Usage(err) => err.fmt(f),
            EngineError::Exec(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<DirectiveError> for EngineError {
    fn from(err: DirectiveError) -> Self {
        EngineError::Directive(err)
    }
}

impl From<UsageError> for EngineError {
    fn from(err: UsageError) -> Self {
        EngineError::Usage(err)
    }
}

impl From<ExecError> for EngineError {
    fn from(err: ExecError) -> Self {
        EngineError::Exec(err)
    }
}
