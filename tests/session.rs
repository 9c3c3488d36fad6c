//! Tabs, splits and panel focus through ex commands and keys

mod common;

use common::{escape, ex, press, quits, test_model};

use kestrel::keymap::Keystroke;
use kestrel::model::{Focus, Mode, SplitKind};

#[test]
fn test_split_limit_and_close_order() {
    let mut model = test_model("shared", 0, 0);

    ex(&mut model, "vsp");
    assert_eq!(model.ui.status_message, "Split created");
    assert_eq!(model.session.active_tab().panes.len(), 2);
    assert_eq!(model.session.active_tab().split, SplitKind::Vertical);
    assert_eq!(model.buffer().text(), "shared");

    ex(&mut model, "sp");
    assert_eq!(model.ui.status_message, "Max 2 panes per tab");
    assert_eq!(model.session.active_tab().panes.len(), 2);

    ex(&mut model, "tabnew");
    assert_eq!(model.session.tabs.len(), 2);
    assert_eq!(model.session.active_tab, 1);

    ex(&mut model, "q");
    assert_eq!(model.ui.status_message, "Tab closed");
    assert_eq!(model.session.tabs.len(), 1);

    ex(&mut model, "q");
    assert_eq!(model.ui.status_message, "Pane closed");
    assert_eq!(model.session.active_tab().panes.len(), 1);

    assert!(quits(ex(&mut model, "q")));
}

#[test]
fn test_split_panes_edit_independently() {
    let mut model = test_model("abc", 0, 0);
    ex(&mut model, "vsp");
    press(&mut model, Keystroke::char('i'));
    press(&mut model, Keystroke::char('x'));
    escape(&mut model);

    let tab = model.session.active_tab();
    assert_eq!(tab.panes[tab.active_pane].buffer.text(), "xabc");
    assert_eq!(tab.panes[1 - tab.active_pane].buffer.text(), "abc");
}

#[test]
fn test_tab_switching_wraps() {
    let mut model = test_model("", 0, 0);
    ex(&mut model, "tabnew");
    ex(&mut model, "tabnew");
    assert_eq!(model.session.active_tab, 2);

    press(&mut model, Keystroke::char('L'));
    assert_eq!(model.session.active_tab, 0);
    press(&mut model, Keystroke::char('H'));
    assert_eq!(model.session.active_tab, 2);
}

#[test]
fn test_tree_focus_and_back() {
    let mut model = test_model("", 0, 0);
    ex(&mut model, "tree");
    assert!(model.file_tree.visible);
    assert_eq!(model.focus, Focus::FileTree);
    assert_eq!(model.mode, Mode::FileTree);

    press(&mut model, Keystroke::ctrl('l'));
    assert_eq!(model.focus, Focus::Editor);
    assert_eq!(model.mode, Mode::Normal);

    press(&mut model, Keystroke::ctrl('h'));
    assert_eq!(model.focus, Focus::FileTree);

    escape(&mut model);
    assert_eq!(model.focus, Focus::Editor);
    assert!(model.file_tree.visible);
}

#[test]
fn test_which_key_menu() {
    let mut model = test_model("", 0, 0);
    press(&mut model, Keystroke::char(' '));
    assert_eq!(model.mode, Mode::WhichKey);

    // Keys without an entry leave the menu open
    press(&mut model, Keystroke::char('z'));
    assert_eq!(model.mode, Mode::WhichKey);

    press(&mut model, Keystroke::char('T'));
    assert_eq!(model.mode, Mode::Normal);
    assert!(!model.ui.show_line_numbers);

    press(&mut model, Keystroke::char(' '));
    escape(&mut model);
    assert_eq!(model.mode, Mode::Normal);
}

#[test]
fn test_resize_relayouts_panes() {
    let mut model = test_model("", 0, 0);
    ex(&mut model, "vsp");
    kestrel::update::update(&mut model, kestrel::Msg::resize(120, 40));
    let tab = model.session.active_tab();
    assert_eq!(tab.panes[0].area.width + tab.panes[1].area.width, 120);
    assert_eq!(tab.panes[0].area.height, 37);
}
