use weave::directive::{Action, CommandSpec, DirectiveError, DirectiveOptions};

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn empty_args_mean_display_only() {
    let spec = CommandSpec::parse(&[]).unwrap();
    assert_eq!(spec, CommandSpec::default());
    assert_eq!(spec.action, Action::Display);
}

#[test]
fn file_like_arg_selects_the_source() {
    let spec = CommandSpec::parse(&args(&["exec", "util.py"])).unwrap();
    assert_eq!(spec.source.as_deref(), Some("util.py"));
    assert_eq!(spec.action, Action::Exec);
}

#[test]
fn first_file_like_arg_wins() {
    let spec = CommandSpec::parse(&args(&["a.py", "b.py"])).unwrap();
    assert_eq!(spec.source.as_deref(), Some("a.py"));
}

#[test]
fn every_flag_is_recognized() {
    let spec = CommandSpec::parse(&args(&["done", "restart", "join", "noecho", "new"])).unwrap();
    assert_eq!(spec.action, Action::Done);
    assert!(spec.restart && spec.join && spec.noecho && spec.new);
    assert!(!spec.noeval && !spec.redo && !spec.recall);
}

#[test]
fn unknown_flag_is_rejected() {
    let err = CommandSpec::parse(&args(&["frobnicate"])).unwrap_err();
    assert_eq!(err, DirectiveError::UnknownFlag("frobnicate".to_string()));
}

#[test]
fn exec_and_done_conflict() {
    let err = CommandSpec::parse(&args(&["exec", "done"])).unwrap_err();
    assert_eq!(err, DirectiveError::ConflictingFlags("exec", "done"));
    let err = CommandSpec::parse(&args(&["done", "exec"])).unwrap_err();
    assert_eq!(err, DirectiveError::ConflictingFlags("exec", "done"));
}

#[test]
fn recall_conflicts_with_mutating_flags() {
    for flag in ["exec", "done", "restart", "noeval", "redo", "new"] {
        let err = CommandSpec::parse(&args(&["recall", flag])).unwrap_err();
        assert_eq!(err, DirectiveError::ConflictingFlags("recall", flag));
    }
}

#[test]
fn recall_allows_a_source_argument() {
    let spec = CommandSpec::parse(&args(&["recall", "util.py"])).unwrap();
    assert!(spec.recall);
    assert_eq!(spec.source.as_deref(), Some("util.py"));
}

#[test]
fn noeval_conflicts_with_redo() {
    let err = CommandSpec::parse(&args(&["noeval", "redo"])).unwrap_err();
    assert_eq!(err, DirectiveError::ConflictingFlags("noeval", "redo"));
}

#[test]
fn options_parse_into_their_slots() {
    let options = DirectiveOptions::from_pairs(&pairs(&[
        ("name", "setup"),
        ("in", "body"),
        ("after", "imports"),
        ("highlight", "python"),
    ]))
    .unwrap();
    assert_eq!(options.name.as_deref(), Some("setup"));
    assert_eq!(options.into.as_deref(), Some("body"));
    assert_eq!(options.after.as_deref(), Some("imports"));
    assert_eq!(options.highlight.as_deref(), Some("python"));
}

#[test]
fn unknown_option_is_rejected() {
    let err = DirectiveOptions::from_pairs(&pairs(&[("color", "red")])).unwrap_err();
    assert_eq!(err, DirectiveError::UnknownOption("color".to_string()));
}

#[test]
fn duplicate_option_is_rejected() {
    let err =
        DirectiveOptions::from_pairs(&pairs(&[("name", "a"), ("name", "b")])).unwrap_err();
    assert_eq!(err, DirectiveError::DuplicateOption("name".to_string()));
}
