use crate::error::{NoteMarkError, Result};
use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::debug;
use uuid::Uuid;

/// Gets the editor command from environment.
/// Checks $EDITOR, then $VISUAL, then falls back to common editors.
pub fn get_editor() -> Result<String> {
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = env::var(var) {
            if !editor.is_empty() {
                return Ok(editor);
            }
        }
    }

    for fallback in ["vim", "vi", "nano"] {
        if Command::new("which")
            .arg(fallback)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            return Ok(fallback.to_string());
        }
    }

    Err(NoteMarkError::Api(
        "No editor found. Set $EDITOR environment variable.".to_string(),
    ))
}

/// Opens a file in the user's editor and waits for it to close.
/// Returns the contents of the file after editing.
pub fn open_in_editor<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let editor = get_editor()?;
    run_editor(&editor, file_path.as_ref())
}

fn run_editor(editor: &str, path: &Path) -> Result<String> {
    debug!(editor, path = %path.display(), "launching editor");
    let status = Command::new(editor)
        .arg(path)
        .status()
        .map_err(|e| NoteMarkError::Api(format!("Failed to launch editor '{}': {}", editor, e)))?;

    if !status.success() {
        return Err(NoteMarkError::Api(format!(
            "Editor '{}' exited with non-zero status",
            editor
        )));
    }

    fs::read_to_string(path).map_err(NoteMarkError::Io)
}

/// Edits `initial` in the user's editor through a temporary Markdown file and
/// returns the text as saved. The note itself is not touched.
pub fn edit_content(initial: &str) -> Result<String> {
    let editor = get_editor()?;
    edit_with(&editor, initial)
}

fn edit_with(editor: &str, initial: &str) -> Result<String> {
    let temp_file = env::temp_dir().join(format!("notemark-{}.md", Uuid::new_v4().simple()));
    fs::write(&temp_file, initial).map_err(NoteMarkError::Io)?;

    let result = run_editor(editor, &temp_file);
    let _ = fs::remove_file(&temp_file);
    result
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_edit_with_noop_editor_returns_initial_text() {
        let edited = edit_with("true", "# Draft\n\nbody").unwrap();
        assert_eq!(edited, "# Draft\n\nbody");
    }

    #[test]
    fn test_failing_editor_is_an_error() {
        assert!(edit_with("false", "x").is_err());
    }

    #[test]
    fn test_missing_editor_is_an_error() {
        let err = edit_with("notemark-no-such-editor", "x").unwrap_err();
        assert!(err.to_string().contains("Failed to launch editor"));
    }
}
