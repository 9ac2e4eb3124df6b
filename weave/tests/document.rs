use weave::directive::DirectiveKind;
use weave::document::{Parser, WeaveDocument};

fn parse(source: &str) -> WeaveDocument {
    Parser::new(source.to_string(), 0).parse().unwrap()
}

#[test]
fn code_fence_becomes_a_code_directive() {
    let document = parse("# Demo\n\n```weave python exec\nprint(1)\n```\n");
    assert_eq!(document.directives.len(), 1);
    let directive = &document.directives[0];
    assert_eq!(
        directive.kind,
        DirectiveKind::Code {
            language: "python".to_string()
        }
    );
    assert_eq!(directive.args, vec!["exec".to_string()]);
    assert!(directive.options.is_empty());
    assert_eq!(directive.content, vec!["print(1)".to_string()]);
}

#[test]
fn info_string_splits_args_and_options() {
    let document = parse("```weave python util.py name=setup in=body\nx = 1\n```\n");
    let directive = &document.directives[0];
    assert_eq!(directive.args, vec!["util.py".to_string()]);
    assert_eq!(
        directive.options,
        vec![
            ("name".to_string(), "setup".to_string()),
            ("in".to_string(), "body".to_string()),
        ]
    );
}

#[test]
fn session_fence_becomes_a_session_directive() {
    let document = parse("```weave session python -q\n2 + 2\n```\n");
    let directive = &document.directives[0];
    assert_eq!(
        directive.kind,
        DirectiveKind::Session {
            language: "python".to_string()
        }
    );
    assert_eq!(directive.args, vec!["-q".to_string()]);
    assert_eq!(directive.content, vec!["2 + 2".to_string()]);
}

#[test]
fn write_all_fence_becomes_a_write_all_directive() {
    let document = parse("```weave write-all\n```\n");
    assert_eq!(document.directives[0].kind, DirectiveKind::WriteAll);
    assert!(document.directives[0].content.is_empty());
}

#[test]
fn plain_fences_and_prose_are_ignored() {
    let source = "\
Some prose.

```rust
fn main() {}
```

```weave python\nx = 1\n```

More prose.
";
    let document = parse(source);
    assert_eq!(document.directives.len(), 1);
    assert_eq!(
        document.directives[0].kind,
        DirectiveKind::Code {
            language: "python".to_string()
        }
    );
}

#[test]
fn directives_keep_document_order() {
    let source = "```weave python\na\n```\n\n```weave sh\nb\n```\n";
    let document = parse(source);
    let kinds: Vec<_> = document
        .directives
        .iter()
        .map(|d| d.kind.key_name())
        .collect();
    assert_eq!(kinds, vec!["code:python", "code:sh"]);
}

#[test]
fn bare_weave_fence_is_an_error() {
    let errors = Parser::new("```weave\nx\n```\n".to_string(), 0)
        .parse()
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("missing directive kind"));
}

#[test]
fn session_without_language_is_an_error() {
    let errors = Parser::new("```weave session\nx\n```\n".to_string(), 0)
        .parse()
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("needs a language"));
}

#[test]
fn fence_spans_cover_the_fence() {
    let source = "intro\n\n```weave python\nx = 1\n```\n";
    let document = parse(source);
    let span = &document.directives[0].span;
    assert_eq!(&source[span.start..span.start + 3], "```");
}
