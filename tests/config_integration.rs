use std::path::PathBuf;

use quire::config::{ConfigFlags, apply_bindings, load_config_flags, parse_flag_tokens};
use quire::input::{KeyMatch, default_key_map, parse_seq};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".quirerc");
    let content = r#"
# comment
--bind C-c s=save-buffer

--log quire.log

--bind=C-x C-k=kill-line
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert_eq!(flags.log, Some(PathBuf::from("quire.log")));
    assert_eq!(flags.bindings, vec!["C-c s=save-buffer", "C-x C-k=kill-line"]);
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".quirerc");
    std::fs::write(&path, "--log file.log\n--bind C-k=undo\n").unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "quire".to_string(),
        "--bind".to_string(),
        "C-k=kill-line".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert_eq!(
        effective.log,
        Some(PathBuf::from("file.log")),
        "file config should be preserved when CLI does not override"
    );

    let keys = apply_bindings(default_key_map(), &effective.bindings).unwrap();
    assert_eq!(
        keys.lookup(&parse_seq("C-k").unwrap()),
        KeyMatch::Exact("kill-line".into()),
        "cli binding should win over the file binding"
    );
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let args = vec![
        "quire".to_string(),
        "--log=debug.log".to_string(),
        "--bind=M-z=undo".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags.log, Some(PathBuf::from("debug.log")));
    assert_eq!(flags.bindings, vec!["M-z=undo"]);
}

#[test]
fn test_config_union_of_defaults_is_default() {
    let merged = ConfigFlags::default().union(&ConfigFlags::default());
    assert_eq!(merged, ConfigFlags::default());
}

#[test]
fn test_bound_sequence_becomes_prefix() {
    let keys = apply_bindings(default_key_map(), &["C-c x y=undo".to_string()]).unwrap();
    assert_eq!(keys.lookup(&parse_seq("C-c x").unwrap()), KeyMatch::Prefix);
}
