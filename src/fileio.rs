//! File content normalization on load and save

use std::io::ErrorKind;
use std::path::Path;

/// Read a file for editing. `Ok(None)` means it does not exist yet.
pub fn read_for_edit(path: &Path, tab_width: usize) -> Result<Option<String>, String> {
    match std::fs::read(path) {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            Ok(Some(normalize_loaded(&text, tab_width)))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(format!("{}: {}", path.display(), e)),
    }
}

/// CRLF to LF, tabs expanded to `tab_width` spaces
pub fn normalize_loaded(text: &str, tab_width: usize) -> String {
    crate::model::buffer::normalize_line_endings(text).replace('\t', &" ".repeat(tab_width))
}

/// Whether a file's indentation is written back as tabs
pub fn wants_tabs(path: &Path, patterns: &[String]) -> bool {
    let name = path.to_string_lossy();
    patterns.iter().any(|p| name.ends_with(p.as_str()))
}

/// Prepare buffer text for disk: leading runs of `tab_width` spaces become
/// tabs for files that want them
pub fn prepare_for_save(path: &Path, text: &str, tab_width: usize, patterns: &[String]) -> String {
    if tab_width == 0 || !wants_tabs(path, patterns) {
        return text.to_string();
    }
    let unit = " ".repeat(tab_width);
    text.split('\n')
        .map(|line| {
            let mut rest = line;
            let mut out = String::with_capacity(line.len());
            loop {
                if let Some(stripped) = rest.strip_prefix(unit.as_str()) {
                    out.push('\t');
                    rest = stripped;
                } else if let Some(stripped) = rest.strip_prefix('\t') {
                    out.push('\t');
                    rest = stripped;
                } else {
                    break;
                }
            }
            out.push_str(rest);
            out
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write `content`, returning a short summary for the status line
pub fn write_file(path: &Path, content: &str) -> Result<String, String> {
    std::fs::write(path, content).map_err(|e| format!("{}: {}", path.display(), e))?;
    let lines = content.split('\n').count();
    Ok(format!(
        "\"{}\" {}L, {}B written",
        path.display(),
        lines,
        content.len()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn go_patterns() -> Vec<String> {
        vec![".go".into(), "go.mod".into(), "Makefile".into(), ".mk".into()]
    }

    #[test]
    fn test_normalize_loaded() {
        assert_eq!(normalize_loaded("a\r\n\tb\r\n", 4), "a\n    b\n");
    }

    #[test]
    fn test_prepare_for_save_only_touches_leading_indent() {
        let text = "func x() {\n        a := \"    \"\n}";
        let saved = prepare_for_save(Path::new("x.go"), text, 4, &go_patterns());
        assert_eq!(saved, "func x() {\n\t\ta := \"    \"\n}");
    }

    #[test]
    fn test_prepare_for_save_leaves_other_files() {
        let text = "    keep";
        assert_eq!(
            prepare_for_save(Path::new("x.rs"), text, 4, &go_patterns()),
            text
        );
    }

    #[test]
    fn test_missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_for_edit(&dir.path().join("new.txt"), 4), Ok(None));
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let summary = write_file(&path, "one\ntwo").unwrap();
        assert!(summary.contains("2L"));
        assert_eq!(read_for_edit(&path, 4), Ok(Some("one\ntwo".to_string())));
    }
}
