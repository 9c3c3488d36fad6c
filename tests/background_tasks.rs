//! Reducer plus real dispatcher: file and directory tasks against a tempdir

mod common;

use std::fs;
use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use kestrel::commands::Cmd;
use kestrel::config::EditorConfig;
use kestrel::keymap::{KeyCode, Keystroke};
use kestrel::messages::Msg;
use kestrel::model::AppModel;
use kestrel::runtime::Dispatcher;
use kestrel::update::update;

use common::{escape, ex, press, type_text};

struct Harness {
    model: AppModel,
    dispatcher: Dispatcher,
    rx: Receiver<Msg>,
}

impl Harness {
    fn new(root: &Path) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut config = EditorConfig::default();
        config.completion_enabled = false;
        config.language_server.enabled = false;
        Self {
            model: AppModel::new(config, root.to_path_buf(), 80, 24),
            dispatcher: Dispatcher::new(tx),
            rx,
        }
    }

    /// Run a command and every follow-up until the queue goes quiet
    fn pump(&mut self, cmd: Option<Cmd>) {
        if let Some(cmd) = cmd {
            self.dispatcher.dispatch(cmd);
        }
        while let Ok(msg) = self.rx.recv_timeout(Duration::from_millis(500)) {
            if let Some(cmd) = update(&mut self.model, msg) {
                self.dispatcher.dispatch(cmd);
            }
        }
    }

    /// Run one command and reduce exactly one reply, without follow-ups
    fn step(&mut self, cmd: Cmd) {
        self.dispatcher.dispatch(cmd);
        let msg = self
            .rx
            .recv_timeout(Duration::from_secs(5))
            .expect("task replied");
        update(&mut self.model, msg);
    }

    fn tree_names(&self) -> Vec<&str> {
        self.model
            .file_tree
            .entries
            .iter()
            .map(|e| e.name.as_str())
            .collect()
    }
}

#[test]
fn test_open_edit_save_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("main.go");
    fs::write(&path, "func main() {\n\tprintln()\n}\n").unwrap();

    let mut h = Harness::new(dir.path());
    let cmd = ex(&mut h.model, "tabnew main.go");
    h.pump(cmd);

    assert_eq!(h.model.session.tabs.len(), 2);
    assert_eq!(h.model.session.active_tab().name, "main.go");
    assert_eq!(h.model.buffer().line(1), Some("    println()"));
    assert!(!h.model.buffer().modified);

    press(&mut h.model, Keystroke::char('i'));
    type_text(&mut h.model, "x");
    escape(&mut h.model);
    assert!(h.model.buffer().modified);

    let cmd = ex(&mut h.model, "w");
    assert!(h.model.ui.is_saving);
    h.pump(cmd);

    assert!(!h.model.ui.is_saving);
    assert!(!h.model.buffer().modified);
    assert!(h.model.ui.status_message.ends_with("written"));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "xfunc main() {\n\tprintln()\n}\n"
    );
}

#[test]
fn test_missing_file_opens_as_new() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new(dir.path());
    let cmd = ex(&mut h.model, "tabnew later.txt");
    h.pump(cmd);

    assert!(h.model.ui.status_message.ends_with("[New File]"));
    assert_eq!(h.model.buffer().text(), "");
    assert_eq!(
        h.model.buffer().path.as_deref(),
        Some(dir.path().join("later.txt").as_path())
    );
    assert!(!dir.path().join("later.txt").exists());
}

#[test]
fn test_stale_directory_listing_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("a")).unwrap();
    fs::create_dir(dir.path().join("b")).unwrap();
    fs::write(dir.path().join("a").join("inner.txt"), "").unwrap();
    fs::write(dir.path().join("f.txt"), "").unwrap();

    let mut h = Harness::new(dir.path());
    let cmd = ex(&mut h.model, "tree");
    h.pump(cmd);
    assert_eq!(h.tree_names(), vec!["a", "b", "f.txt"]);

    // Descend into `a`, then go back up before its listing arrives
    let into_a = press(&mut h.model, Keystroke::key(KeyCode::Enter)).expect("listing a");
    assert_eq!(h.model.file_tree.root, dir.path().join("a"));
    let back_up = press(&mut h.model, Keystroke::char('-')).expect("listing root");
    assert_eq!(h.model.file_tree.root, dir.path());

    h.step(back_up);
    h.step(into_a);
    assert_eq!(h.tree_names(), vec!["a", "b", "f.txt"]);
    assert!(!h.model.file_tree.loading);
}

#[test]
fn test_tree_create_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new(dir.path());
    let cmd = ex(&mut h.model, "tree");
    h.pump(cmd);
    assert!(h.tree_names().is_empty());

    press(&mut h.model, Keystroke::char('a'));
    type_text(&mut h.model, "notes.md");
    let cmd = press(&mut h.model, Keystroke::key(KeyCode::Enter));
    h.pump(cmd);
    assert!(dir.path().join("notes.md").is_file());
    assert_eq!(h.tree_names(), vec!["notes.md"]);

    press(&mut h.model, Keystroke::char('d'));
    assert_eq!(h.model.ui.status_message, "Delete notes.md? (y/n)");
    let cmd = press(&mut h.model, Keystroke::char('y'));
    h.pump(cmd);
    assert!(!dir.path().join("notes.md").exists());
    assert!(h.tree_names().is_empty());
}
