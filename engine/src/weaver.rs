use std::path::PathBuf;
use std::rc::Rc;

use weave::directive::{Action, CommandSpec, Directive, DirectiveKind, DirectiveOptions};
use weave::display::{
    DisplayBlock, RunResult, SourceDisplay, SourceSegment, filter_printable, strip_blank_lines,
};
use weave::fragment::{Fragment, Part, expand::expand};

use crate::backend::{Backend, LanguageSet};
use crate::cache::{CacheKey, RunCache};
use crate::context::{FeedOptions, SourceSet};
use crate::error::{EngineError, ExecError, UsageError};
use crate::session;

/// Deterministic generator for fresh logical source names (`new` flag).
/// Owned by the render so repeated renders of the same document produce the
/// same names, and tests can assert them.
#[derive(Debug, Default)]
struct IdGen {
    next: u32,
}

impl IdGen {
    fn fresh(&mut self) -> String {
        self.next += 1;
        format!("{:04}", self.next)
    }
}

/// Per-render driver: expands content into fragments, accumulates them into
/// logical sources, delegates execution to the backend, and memoizes every
/// directive's display result. Create one per document render; reuse across
/// unrelated documents is not supported.
pub struct Weaver<B: Backend> {
    cache: RunCache,
    core: Core<B>,
}

struct Core<B: Backend> {
    context: SourceSet,
    backend: B,
    languages: LanguageSet,
    ids: IdGen,
}

impl<B: Backend> Weaver<B> {
    pub fn new(out_dir: impl Into<PathBuf>, backend: B, languages: LanguageSet) -> Self {
        Weaver {
            cache: RunCache::new(),
            core: Core {
                context: SourceSet::new(out_dir),
                backend,
                languages,
                ids: IdGen::default(),
            },
        }
    }

    /// Run one directive through the cache: a key seen before replays its
    /// stored display sequence without re-running any side effects.
    pub fn render_directive(
        &mut self,
        directive: &Directive,
    ) -> Result<Rc<Vec<DisplayBlock>>, EngineError> {
        let key = CacheKey::of(directive);
        let core = &mut self.core;
        self.cache.run_cached(key, || core.handle(directive))
    }

    pub fn context(&self) -> &SourceSet {
        &self.core.context
    }

    pub fn backend(&self) -> &B {
        &self.core.backend
    }

    /// Flush every accumulated source to disk.
    pub fn write_all(&self) -> Result<(), std::io::Error> {
        self.core.context.write_all()
    }
}

impl<B: Backend> Core<B> {
    fn handle(&mut self, directive: &Directive) -> Result<Vec<DisplayBlock>, EngineError> {
        match &directive.kind {
            DirectiveKind::Code { language } => self.handle_code(language, directive),
            DirectiveKind::Session { language } => self.handle_session(language, directive),
            DirectiveKind::WriteAll => {
                self.context.write_all().map_err(ExecError::Io)?;
                Ok(Vec::new())
            }
        }
    }

    fn handle_code(
        &mut self,
        language: &str,
        directive: &Directive,
    ) -> Result<Vec<DisplayBlock>, EngineError> {
        let spec = CommandSpec::parse(&directive.args)?;
        let options = DirectiveOptions::from_pairs(&directive.options)?;
        let lang = self
            .languages
            .get(language)
            .ok_or_else(|| UsageError::UnknownLanguage(language.to_string()))?;

        let source_name = match (&spec.source, spec.new) {
            (Some(file), _) => file.clone(),
            (None, true) => format!("main{}{}", self.ids.fresh(), lang.extension()),
            (None, false) => format!("main{}", lang.extension()),
        };

        let was_empty = self.context.is_empty(&source_name);
        let was_lines = self.context.line_count(&source_name);

        let (segments, output) = if spec.recall {
            let lines = self.context.recall(&source_name, options.name.as_deref())?;
            (vec![SourceSegment::Code(lines)], None)
        } else {
            let fragment = expand(&directive.content, options.name.clone());
            let segments = display_segments(&fragment);
            // a failed command must leave the source exactly as it was, so
            // a retry of the same directive never sees a half-applied feed
            let checkpoint = self.context.checkpoint(&source_name);
            if spec.restart {
                self.context.restart(&source_name);
            }
            if !spec.noeval {
                let feed = FeedOptions {
                    redo: spec.redo,
                    insert_into: options.into.clone(),
                    insert_after: options.after.clone(),
                };
                if let Err(err) = self.context.feed(&source_name, fragment, &feed) {
                    self.context.rollback(&source_name, checkpoint);
                    return Err(err.into());
                }
            }
            let output = match spec.action {
                Action::Done => {
                    let text = self.context.text(&source_name);
                    match self.backend.compile(&source_name, &text, lang) {
                        Ok(result) => Some(result),
                        Err(err) => {
                            self.context.rollback(&source_name, checkpoint);
                            return Err(err.into());
                        }
                    }
                }
                Action::Exec => {
                    let text = self.context.text(&source_name);
                    match self.backend.run(&source_name, &text, lang) {
                        Ok(captured) => Some(RunResult::RawText(captured)),
                        Err(err) => {
                            self.context.rollback(&source_name, checkpoint);
                            return Err(err.into());
                        }
                    }
                }
                Action::Display => None,
            };
            (segments, output)
        };

        if spec.noecho {
            return Ok(Vec::new());
        }

        let header = if spec.join {
            None
        } else if was_empty {
            Some(format!("     {}", source_name))
        } else {
            Some(format!("     {} (cont)", source_name))
        };

        let mut blocks = vec![DisplayBlock::Source(SourceDisplay {
            header,
            segments,
            first_line: was_lines + 1,
            number_lines: lang.number_lines(),
            language: options
                .highlight
                .clone()
                .unwrap_or_else(|| language.to_string()),
        })];
        match output {
            Some(RunResult::RawText(text)) => {
                blocks.push(DisplayBlock::Output(filter_printable(&strip_blank_lines(
                    &text,
                ))));
            }
            Some(RunResult::Prerendered(block)) => blocks.push(block),
            None => {}
        }
        Ok(blocks)
    }

    fn handle_session(
        &mut self,
        language: &str,
        directive: &Directive,
    ) -> Result<Vec<DisplayBlock>, EngineError> {
        let lang = self
            .languages
            .get(language)
            .ok_or_else(|| UsageError::UnknownLanguage(language.to_string()))?;
        let outputs = self
            .backend
            .run_interactive(&directive.args, &directive.content, lang)?;
        let exchanges = session::build_exchanges(
            lang.interactive_prompt(),
            &directive.content,
            outputs,
        );
        Ok(vec![DisplayBlock::Session(exchanges)])
    }
}

/// Top-level parts of the fed fragment, as the host displays them: literal
/// code, with placeholders shown as named omissions.
fn display_segments(fragment: &Fragment) -> Vec<SourceSegment> {
    fragment
        .parts
        .iter()
        .map(|part| match part {
            Part::Text(lines) => SourceSegment::Code(lines.clone()),
            Part::Placeholder { name, .. } => SourceSegment::Omission(name.clone()),
        })
        .collect()
}
