//! Completion candidates
//!
//! The editor asks a [`CandidateSource`] for items matching the identifier
//! before the cursor. The default source mixes a small keyword table with
//! identifiers already present in the buffer.

use std::collections::BTreeSet;

/// Most items shown in the popup
pub const MAX_COMPLETIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CompletionKind {
    Keyword,
    Function,
    Variable,
    Server,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionItem {
    pub label: String,
    pub insert_text: String,
    pub kind: CompletionKind,
}

impl CompletionItem {
    pub fn new(label: impl Into<String>, kind: CompletionKind) -> Self {
        let label = label.into();
        Self {
            insert_text: label.clone(),
            label,
            kind,
        }
    }
}

/// Provider of completion items for a prefix
pub trait CandidateSource {
    /// `prefix` is the part after the last `.`; `lines` is the whole buffer
    fn candidates(&self, prefix: &str, lines: &[String], language: &str) -> Vec<CompletionItem>;
}

const GO_KEYWORDS: &[(&str, CompletionKind)] = &[
    ("func", CompletionKind::Keyword),
    ("var", CompletionKind::Keyword),
    ("const", CompletionKind::Keyword),
    ("type", CompletionKind::Keyword),
    ("struct", CompletionKind::Keyword),
    ("interface", CompletionKind::Keyword),
    ("return", CompletionKind::Keyword),
    ("range", CompletionKind::Keyword),
    ("switch", CompletionKind::Keyword),
    ("defer", CompletionKind::Keyword),
    ("append", CompletionKind::Function),
    ("make", CompletionKind::Function),
    ("len", CompletionKind::Function),
    ("panic", CompletionKind::Function),
];

const RUST_KEYWORDS: &[(&str, CompletionKind)] = &[
    ("fn", CompletionKind::Keyword),
    ("let", CompletionKind::Keyword),
    ("match", CompletionKind::Keyword),
    ("impl", CompletionKind::Keyword),
    ("struct", CompletionKind::Keyword),
    ("enum", CompletionKind::Keyword),
    ("return", CompletionKind::Keyword),
    ("println", CompletionKind::Function),
    ("format", CompletionKind::Function),
];

/// Keywords for the language plus buffer identifiers
#[derive(Debug, Default, Clone, Copy)]
pub struct BufferWords;

impl CandidateSource for BufferWords {
    fn candidates(&self, prefix: &str, lines: &[String], language: &str) -> Vec<CompletionItem> {
        let keywords = match language {
            "go" => GO_KEYWORDS,
            "rust" => RUST_KEYWORDS,
            _ => &[],
        };

        let mut items: Vec<CompletionItem> = keywords
            .iter()
            .filter(|(word, _)| word.starts_with(prefix) && *word != prefix)
            .map(|(word, kind)| CompletionItem::new(*word, *kind))
            .collect();

        let words: BTreeSet<&str> = lines
            .iter()
            .flat_map(|line| line.split(|c: char| !(c.is_alphanumeric() || c == '_')))
            .filter(|w| w.len() > 2 && w.starts_with(prefix) && *w != prefix)
            .filter(|w| !w.starts_with(|c: char| c.is_ascii_digit()))
            .collect();
        for word in words {
            if !items.iter().any(|i| i.label == word) {
                items.push(CompletionItem::new(word, CompletionKind::Variable));
            }
        }

        items.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.label.cmp(&b.label)));
        items.truncate(MAX_COMPLETIONS);
        items
    }
}
