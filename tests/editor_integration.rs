use quire::app::{
    Action, Application, Command, CommandTable, Outcome, TerminalAction, default_commands,
    edit_command, eval_command, put_message, update,
};
use quire::editor::{Buffer, BufferAction, Coord};
use quire::input::{Key, parse_seq};
use quire::store::{FileStore, Store};

const SIZE: Coord = Coord::new(10, 40);

fn feed(state: Application, keys: &str) -> Outcome {
    parse_seq(keys).unwrap().into_iter().fold(
        Outcome::Continue(state),
        |outcome, key| match outcome {
            Outcome::Continue(state) => update(state, TerminalAction::Key { key, size: SIZE }.into()),
            propagate @ Outcome::Propagate(_) => propagate,
        },
    )
}

fn typed(state: Application, text: &str) -> Application {
    text.chars().fold(state, |state, c| {
        match update(state, TerminalAction::Key { key: Key::char(c), size: SIZE }.into()) {
            Outcome::Continue(next) => next,
            Outcome::Propagate(action) => panic!("unexpected propagate: {action:?}"),
        }
    })
}

#[test]
fn test_edit_save_and_reload_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.txt");

    let buffer = FileStore.load(&path).unwrap();
    let state = typed(Application::new(buffer), "first line");
    let state = feed(state, "RET").state().cloned().unwrap();
    let state = typed(state, "second");
    let state = feed(state, "C-x C-s").state().cloned().unwrap();

    assert!(!state.current.is_dirty());
    let reloaded = FileStore.load(&path).unwrap();
    assert_eq!(reloaded.text(), "first line\nsecond");

    let outcome = feed(state, "C-x C-c");
    assert!(matches!(outcome, Outcome::Propagate(Action::Quit)));
}

#[test]
fn test_custom_command_table_extends_defaults() {
    let commands = default_commands()
        .with("shout", edit_command(|b: &Buffer| b.insert_text(&"HEY".into())))
        .with(
            "note",
            Command::new(|state, _size| Outcome::Continue(put_message(state, "noted"))),
        );
    let state = Application::new(Buffer::empty()).with_commands(commands);

    let state = eval_command(state, "shout", SIZE).state().cloned().unwrap();
    let state = eval_command(state, "note", SIZE).state().cloned().unwrap();
    assert_eq!(state.current.text(), "HEY");
    assert_eq!(state.last_message().map(|m| &*m.content), Some("noted"));
}

#[test]
fn test_empty_command_table_reports_everything_unknown() {
    let state = Application::new(Buffer::from_text("x")).with_commands(CommandTable::new());
    let state = feed(state, "C-e").state().cloned().unwrap();
    assert_eq!(state.current.cursor().col, 0);
    assert_eq!(
        state.last_message().map(|m| m.content.to_string()),
        Some("unknown command: move-end-of-line".to_string())
    );
}

#[test]
fn test_old_state_survives_a_long_session() {
    let start = Application::new(Buffer::from_text("base"));
    let mut state = start.clone();
    for _ in 0..50 {
        state = typed(state, "ab");
        state = feed(state, "C-a C-k").state().cloned().unwrap();
    }
    assert_eq!(start.current.text(), "base");
    assert!(start.clipboard.is_empty());
    assert_eq!(state.clipboard.len(), 50);
}

#[test]
fn test_direct_actions_mix_with_keys() {
    let state = Application::new(Buffer::from_text("abc")).with_size(SIZE);
    let state = update(state, Action::Buffer(BufferAction::SelectAll))
        .state()
        .cloned()
        .unwrap();
    let state = feed(state, "C-w").state().cloned().unwrap();
    assert_eq!(state.current.text(), "");
    let state = feed(state, "C-y").state().cloned().unwrap();
    assert_eq!(state.current.text(), "abc");
}
