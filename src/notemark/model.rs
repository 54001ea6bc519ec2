use crate::error::{NoteMarkError, Result};
use chrono::Utc;
use pulldown_cmark::{Event, Parser, TagEnd};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Extension of note files under the notes root.
pub const NOTE_EXT: &str = ".md";

/// Shown in place of a note whose content is absent or empty.
pub const PLACEHOLDER_CONTENT: &str = "# What's on your mind today?\n\n\
Click anywhere to start writing your thoughts...\n\n\
## Keyboard Shortcuts\n\n\
Switch between edit and preview modes:\n\n\
```\n\
Cmd + E  →  Edit Mode\n\
Cmd + P  →  Preview Mode\n\
```\n\n\
*Start typing to delete all this and begin your note. \
The editor will automatically switch to preview mode after 10 seconds of inactivity.*";

/// One note: a Markdown file `<title>.md` under the notes root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteInfo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Epoch milliseconds of the last persisted write.
    pub last_edit_time: i64,
}

impl NoteInfo {
    pub fn new(title: impl Into<String>, content: impl Into<String>, last_edit_time: i64) -> Self {
        Self {
            title: title.into(),
            content: Some(content.into()),
            last_edit_time,
        }
    }

    /// The text a front end should display: the content, or the placeholder
    /// when the content is absent or empty.
    pub fn display_content(&self) -> &str {
        match self.content.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => PLACEHOLDER_CONTENT,
        }
    }
}

/// Result of an operation that needs a selected note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Done(T),
    /// There was no selection; nothing was touched.
    NoSelection,
}

impl<T> Outcome<T> {
    pub fn done(self) -> Option<T> {
        match self {
            Outcome::Done(value) => Some(value),
            _ => None,
        }
    }
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Timestamp for a write that replaces a note last edited at `previous`.
/// Always strictly newer than `previous`, even within the same millisecond.
pub fn next_edit_time(previous: i64) -> i64 {
    now_millis().max(previous.saturating_add(1))
}

/// Newest edit first; equal times fall back to title order.
pub fn sort_newest_first(notes: &mut [NoteInfo]) {
    notes.sort_by(|a, b| match b.last_edit_time.cmp(&a.last_edit_time) {
        Ordering::Equal => a.title.cmp(&b.title),
        other => other,
    });
}

/// Checks that `title` can be used as a file stem directly under the notes root.
pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(NoteMarkError::InvalidTitle("title cannot be empty".into()));
    }
    if title == "." || title == ".." {
        return Err(NoteMarkError::InvalidTitle(format!("\"{}\"", title)));
    }
    if title.starts_with('.') {
        return Err(NoteMarkError::InvalidTitle(format!(
            "\"{}\" would be a hidden file",
            title
        )));
    }
    if title.contains(['/', '\\', '\0']) {
        return Err(NoteMarkError::InvalidTitle(format!(
            "\"{}\" contains a path separator",
            title
        )));
    }
    Ok(())
}

/// Plain-text excerpt of Markdown content, markup stripped and whitespace
/// collapsed, at most `max_chars` characters.
pub fn excerpt(markdown: &str, max_chars: usize) -> String {
    let mut text = String::new();
    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak
            | Event::HardBreak
            | Event::End(
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::CodeBlock,
            ) => text.push(' '),
            _ => {}
        }
    }
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(max_chars)
        .collect()
}
