pub mod error;

use std::ops::Range;

pub use error::DirectiveError;

/// What kind of work a directive requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveKind {
    /// Feed and optionally run source for a language.
    Code { language: String },
    /// Drive an interactive session for a language.
    Session { language: String },
    /// Flush every accumulated source to disk.
    WriteAll,
}

impl DirectiveKind {
    /// Stable identity string used in cache keys.
    pub fn key_name(&self) -> String {
        match self {
            DirectiveKind::Code { language } => format!("code:{language}"),
            DirectiveKind::Session { language } => format!("session:{language}"),
            DirectiveKind::WriteAll => "write-all".to_string(),
        }
    }
}

/// One authored command: kind, positional arguments, key/value options, and
/// literal content lines. The span is the fence's byte range in the authored
/// document, kept for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub kind: DirectiveKind,
    pub args: Vec<String>,
    pub options: Vec<(String, String)>,
    pub content: Vec<String>,
    pub span: Range<usize>,
}

/// Exactly one of done/exec/neither applies per command; neither means
/// "display only".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    Display,
    /// Run the accumulated source and capture its output.
    Exec,
    /// Finalize/compile the accumulated source.
    Done,
}

/// A code directive's argument list, parsed and validated once. Arguments
/// containing a `.` are file-like and select the target source; everything
/// else must come from the fixed flag vocabulary.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandSpec {
    /// First file-like argument, if any: the explicit target source name.
    pub source: Option<String>,
    pub action: Action,
    pub restart: bool,
    pub noeval: bool,
    pub redo: bool,
    pub join: bool,
    pub noecho: bool,
    pub new: bool,
    pub recall: bool,
}

impl CommandSpec {
    pub fn parse(args: &[String]) -> Result<CommandSpec, DirectiveError> {
        let mut spec = CommandSpec::default();

        for arg in args {
            if arg.contains('.') {
                if spec.source.is_none() {
                    spec.source = Some(arg.clone());
                }
                continue;
            }
            match arg.as_str() {
                "exec" => {
                    if spec.action == Action::Done {
                        return Err(DirectiveError::ConflictingFlags("exec", "done"));
                    }
                    spec.action = Action::Exec;
                }
                "done" => {
                    if spec.action == Action::Exec {
                        return Err(DirectiveError::ConflictingFlags("exec", "done"));
                    }
                    spec.action = Action::Done;
                }
                "restart" => spec.restart = true,
                "noeval" => spec.noeval = true,
                "redo" => spec.redo = true,
                "join" => spec.join = true,
                "noecho" => spec.noecho = true,
                "new" => spec.new = true,
                "recall" => spec.recall = true,
                other => return Err(DirectiveError::UnknownFlag(other.to_string())),
            }
        }

        if spec.recall {
            // recall is a pure lookup; anything that would mutate or run is
            // rejected up front
            let conflicts = [
                (spec.action == Action::Exec, "exec"),
                (spec.action == Action::Done, "done"),
                (spec.restart, "restart"),
                (spec.noeval, "noeval"),
                (spec.redo, "redo"),
                (spec.new, "new"),
            ];
            if let Some((_, flag)) = conflicts.iter().find(|(set, _)| *set) {
                return Err(DirectiveError::ConflictingFlags("recall", flag));
            }
        }
        if spec.noeval && spec.redo {
            return Err(DirectiveError::ConflictingFlags("noeval", "redo"));
        }

        Ok(spec)
    }
}

/// Recognized key/value options on a code directive.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DirectiveOptions {
    /// Block label, used for later recall and omission display.
    pub name: Option<String>,
    /// Target placeholder to fill in place (`in=`).
    pub into: Option<String>,
    /// Named block to insert immediately after (`after=`).
    pub after: Option<String>,
    /// Display-language override (`highlight=`).
    pub highlight: Option<String>,
}

impl DirectiveOptions {
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<DirectiveOptions, DirectiveError> {
        let mut options = DirectiveOptions::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "name" => &mut options.name,
                "in" => &mut options.into,
                "after" => &mut options.after,
                "highlight" => &mut options.highlight,
                _ => return Err(DirectiveError::UnknownOption(key.clone())),
            };
            if slot.is_some() {
                return Err(DirectiveError::DuplicateOption(key.clone()));
            }
            *slot = Some(value.clone());
        }
        Ok(options)
    }
}
