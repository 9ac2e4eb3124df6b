pub mod error;

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, Parser as CmarkParser, Tag, TagEnd};

pub use error::ParseError;

use crate::directive::{Directive, DirectiveKind};

/// A parsed authored document: its directives in document order. Prose
/// around the directives belongs to the host renderer and is not kept here.
#[derive(Debug, Clone)]
pub struct WeaveDocument {
    pub directives: Vec<Directive>,
    /// The source file ID (for error reporting with codespan-reporting).
    pub source_id: usize,
}

/// Parser entry point. Directives are fenced code blocks whose info string
/// starts with `weave`:
///
/// ```` ```weave <language> [flags] [file.ext] [key=value ...] ````
/// ```` ```weave session <language> [args...] ````
/// ```` ```weave write-all ````
///
/// The fence body is the directive's literal content.
pub struct Parser {
    source: String,
    file_id: usize,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser { source, file_id }
    }

    pub fn parse(&self) -> Result<WeaveDocument, Vec<ParseError>> {
        let events: Vec<(Event<'_>, Range<usize>)> =
            CmarkParser::new(&self.source).into_offset_iter().collect();

        let mut directives = Vec::new();
        let mut errors = Vec::new();
        let mut i = 0;

        while i < events.len() {
            let (ref ev, ref range) = events[i];
            let Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) = ev else {
                i += 1;
                continue;
            };
            let info = info.to_string();
            i += 1;
            let content = collect_fence_lines(&events, &mut i);

            // fences without a `weave` info string are ordinary prose
            let mut tokens = info.split_whitespace();
            if tokens.next() != Some("weave") {
                continue;
            }

            match parse_directive(tokens, content, range.clone(), self.file_id) {
                Ok(directive) => directives.push(directive),
                Err(err) => errors.push(err),
            }
        }

        if errors.is_empty() {
            Ok(WeaveDocument {
                directives,
                source_id: self.file_id,
            })
        } else {
            Err(errors)
        }
    }
}

/// Collect the fence body as lines, consuming events through End(CodeBlock).
fn collect_fence_lines(events: &[(Event<'_>, Range<usize>)], i: &mut usize) -> Vec<String> {
    let mut text = String::new();
    while *i < events.len() {
        let (ref ev, _) = events[*i];
        match ev {
            Event::End(TagEnd::CodeBlock) => {
                *i += 1;
                break;
            }
            Event::Text(s) => {
                text.push_str(s);
                *i += 1;
            }
            _ => {
                *i += 1;
            }
        }
    }
    text.lines().map(str::to_string).collect()
}

/// Parse the info-string tokens after `weave` into a directive.
fn parse_directive<'a>(
    mut tokens: impl Iterator<Item = &'a str>,
    content: Vec<String>,
    span: Range<usize>,
    file_id: usize,
) -> Result<Directive, ParseError> {
    let kind = match tokens.next() {
        None => {
            return Err(ParseError::new(
                "missing directive kind after 'weave'",
                span,
                file_id,
            )
            .with_note("expected a language name, 'session <language>', or 'write-all'"));
        }
        Some("write-all") => DirectiveKind::WriteAll,
        Some("session") => match tokens.next() {
            Some(language) => DirectiveKind::Session {
                language: language.to_string(),
            },
            None => {
                return Err(ParseError::new(
                    "'weave session' needs a language name",
                    span,
                    file_id,
                ));
            }
        },
        Some(language) => DirectiveKind::Code {
            language: language.to_string(),
        },
    };

    let mut args = Vec::new();
    let mut options = Vec::new();
    for token in tokens {
        match token.split_once('=') {
            Some((key, value)) => options.push((key.to_string(), value.to_string())),
            None => args.push(token.to_string()),
        }
    }

    Ok(Directive {
        kind,
        args,
        options,
        content,
        span,
    })
}
