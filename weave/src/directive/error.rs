use std::fmt;

/// Errors from validating a directive's flags and options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    UnknownFlag(String),
    ConflictingFlags(&'static str, &'static str),
    UnknownOption(String),
    DuplicateOption(String),
}

impl fmt::Display for DirectiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectiveError::UnknownFlag(flag) => write!(f, "unknown flag: {}", flag),
            DirectiveError::ConflictingFlags(a, b) => {
                write!(f, "flags '{}' and '{}' cannot be combined", a, b)
            }
            DirectiveError::UnknownOption(key) => write!(f, "unknown option: {}", key),
            DirectiveError::DuplicateOption(key) => write!(f, "duplicate option: {}", key),
        }
    }
}

impl std::error::Error for DirectiveError {}
