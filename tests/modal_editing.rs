//! Modal editing tests driven through the full reducer

mod common;

use common::{enter, escape, ex, press, quits, test_model, type_text};

use kestrel::commands::Cmd;
use kestrel::keymap::{KeyCode, Keystroke};
use kestrel::model::Mode;

#[test]
fn test_insert_then_escape_steps_back() {
    let mut model = test_model("", 0, 0);
    press(&mut model, Keystroke::char('i'));
    assert_eq!(model.mode, Mode::Insert);

    type_text(&mut model, "hi");
    assert_eq!(model.buffer().cursor_column, 2);

    escape(&mut model);
    assert_eq!(model.mode, Mode::Normal);
    assert_eq!(model.buffer().text(), "hi");
    assert_eq!(model.buffer().cursor_column, 1);
    assert!(model.buffer().modified);
}

#[test]
fn test_escape_at_line_start_keeps_column() {
    let mut model = test_model("abc", 0, 0);
    press(&mut model, Keystroke::char('i'));
    escape(&mut model);
    assert_eq!(model.buffer().cursor_column, 0);
}

#[test]
fn test_normal_keys_do_not_insert_text() {
    let mut model = test_model("one\ntwo", 0, 0);
    type_text(&mut model, "jl");
    assert_eq!(model.buffer().text(), "one\ntwo");
    assert_eq!(
        (model.buffer().cursor_line, model.buffer().cursor_column),
        (1, 1)
    );
    assert!(!model.buffer().modified);
}

#[test]
fn test_enter_keeps_indentation() {
    let mut model = test_model("    let x = 1;", 0, 14);
    press(&mut model, Keystroke::char('i'));
    enter(&mut model);
    assert_eq!(model.buffer().line_count(), 2);
    assert_eq!(model.buffer().line(1), Some("    "));
    assert_eq!(model.buffer().cursor_column, 4);
}

#[test]
fn test_backspace_joins_lines() {
    let mut model = test_model("ab\ncd", 1, 0);
    press(&mut model, Keystroke::char('i'));
    press(&mut model, Keystroke::key(KeyCode::Backspace));
    assert_eq!(model.buffer().text(), "abcd");
    assert_eq!(
        (model.buffer().cursor_line, model.buffer().cursor_column),
        (0, 2)
    );
}

#[test]
fn test_ctrl_c_never_quits() {
    let mut model = test_model("x", 0, 0);
    for mode_key in [Some('i'), Some(':'), None] {
        if let Some(c) = mode_key {
            press(&mut model, Keystroke::char(c));
        }
        let cmd = press(&mut model, Keystroke::ctrl('c'));
        assert!(!quits(cmd));
        assert_eq!(model.mode, Mode::Normal);
    }
    assert_eq!(model.ui.status_message, "Press :q to quit");
}

#[test]
fn test_command_line_editing() {
    let mut model = test_model("", 0, 0);
    press(&mut model, Keystroke::char(':'));
    type_text(&mut model, "wx");
    press(&mut model, Keystroke::key(KeyCode::Backspace));
    assert_eq!(model.ui.input, "w");

    press(&mut model, Keystroke::key(KeyCode::Backspace));
    assert_eq!(model.mode, Mode::Command);
    press(&mut model, Keystroke::key(KeyCode::Backspace));
    assert_eq!(model.mode, Mode::Normal);
}

#[test]
fn test_unknown_ex_command_reports() {
    let mut model = test_model("", 0, 0);
    ex(&mut model, "frobnicate");
    assert_eq!(model.mode, Mode::Normal);
    assert_eq!(model.ui.status_message, "Unknown command: frobnicate");
    assert!(model.ui.input.is_empty());
}

#[test]
fn test_write_without_path_asks_for_one() {
    let mut model = test_model("text", 0, 0);
    let cmd = ex(&mut model, "w");
    assert!(!matches!(cmd, Some(Cmd::SaveFile { .. })));
    assert_eq!(model.ui.status_message, "No file name (use :w <path>)");
}

#[test]
fn test_write_with_path_saves_prepared_content() {
    let mut model = test_model("a\n    b", 0, 0);
    let cmds = ex(&mut model, "w Makefile").map(Cmd::flatten).unwrap_or_default();
    let content = cmds.iter().find_map(|c| match c {
        Cmd::SaveFile { path, content, .. } => {
            assert!(path.ends_with("Makefile"));
            Some(content.clone())
        }
        _ => None,
    });
    assert_eq!(content.as_deref(), Some("a\n\tb"));
    assert!(model.ui.is_saving);
}

#[test]
fn test_force_quit() {
    let mut model = test_model("unsaved", 0, 0);
    model.buffer_mut().insert('x');
    assert!(quits(ex(&mut model, "q!")));
}

#[test]
fn test_help_overlay_scrolls_and_closes() {
    let mut model = test_model("", 0, 0);
    ex(&mut model, "help");
    assert_eq!(model.mode, Mode::Help);
    press(&mut model, Keystroke::char('j'));
    assert_eq!(model.ui.help_scroll, 1);
    press(&mut model, Keystroke::char('k'));
    press(&mut model, Keystroke::char('k'));
    assert_eq!(model.ui.help_scroll, 0);
    escape(&mut model);
    assert_eq!(model.mode, Mode::Normal);
}

#[test]
fn test_toggle_line_numbers() {
    let mut model = test_model("", 0, 0);
    assert!(model.ui.show_line_numbers);
    ex(&mut model, "tn");
    assert!(!model.ui.show_line_numbers);
    assert_eq!(model.ui.status_message, "Line numbers off");
}
