use super::backend::NoteBackend;
use super::NoteRepository;
use crate::error::{NoteMarkError, Result};
use crate::model::{now_millis, validate_title, NoteInfo, NOTE_EXT};
use std::fs;
use std::path::{Path, PathBuf};

/// Repository of `<title>.md` files over a [`NoteBackend`].
pub struct NoteFiles<B: NoteBackend> {
    backend: B,
}

impl<B: NoteBackend> NoteFiles<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn file_name(title: &str) -> String {
        format!("{}{}", title, NOTE_EXT)
    }

    /// Title for a file name, if the file is a note.
    fn title_of(name: &str) -> Option<&str> {
        if name.starts_with('.') {
            return None;
        }
        name.strip_suffix(NOTE_EXT).filter(|t| !t.is_empty())
    }

    fn same_dir(a: &Path, b: &Path) -> bool {
        if a == b {
            return true;
        }
        match (fs::canonicalize(a), fs::canonicalize(b)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl<B: NoteBackend> NoteRepository for NoteFiles<B> {
    fn root(&self) -> &Path {
        self.backend.root()
    }

    fn list(&self) -> Result<Vec<NoteInfo>> {
        self.backend.ensure_root()?;

        let mut notes = Vec::new();
        for name in self.backend.list_files()? {
            let Some(title) = Self::title_of(&name) else {
                continue;
            };
            // Removed between listing and reading; nothing to show.
            let Some(content) = self.backend.read_file(&name)? else {
                continue;
            };
            let last_edit_time = self
                .backend
                .modified(&name)?
                .map(|t| t.timestamp_millis())
                .unwrap_or_else(now_millis);
            notes.push(NoteInfo {
                title: title.to_string(),
                content: Some(content),
                last_edit_time,
            });
        }
        Ok(notes)
    }

    fn exists(&self, title: &str) -> Result<bool> {
        validate_title(title)?;
        Ok(self.backend.modified(&Self::file_name(title))?.is_some())
    }

    fn read(&self, title: &str) -> Result<String> {
        validate_title(title)?;
        self.backend
            .read_file(&Self::file_name(title))?
            .ok_or_else(|| NoteMarkError::NoteNotFound(title.to_string()))
    }

    fn write(&mut self, title: &str, content: &str) -> Result<()> {
        validate_title(title)?;
        self.backend.write_file(&Self::file_name(title), content)
    }

    fn delete(&mut self, title: &str) -> Result<()> {
        validate_title(title)?;
        if !self.backend.remove_file(&Self::file_name(title))? {
            return Err(NoteMarkError::NoteNotFound(title.to_string()));
        }
        Ok(())
    }

    fn resolve_location(&self, location: &Path) -> Result<String> {
        let root = self.backend.root();
        let path = if location.is_absolute() || location.starts_with(root) {
            location.to_path_buf()
        } else {
            root.join(location)
        };

        let parent = path.parent().unwrap_or(Path::new(""));
        if !Self::same_dir(parent, root) {
            return Err(NoteMarkError::InvalidLocation(format!(
                "notes must be saved directly in {}",
                root.display()
            )));
        }

        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| NoteMarkError::InvalidLocation("missing file name".to_string()))?;
        let title = match name.strip_suffix(NOTE_EXT) {
            Some(title) => title,
            None if Path::new(name).extension().is_some() => {
                return Err(NoteMarkError::InvalidLocation(format!(
                    "{} is not a {} file (add {} to keep dots in a title)",
                    name, NOTE_EXT, NOTE_EXT
                )));
            }
            None => name,
        };

        validate_title(title).map_err(|e| NoteMarkError::InvalidLocation(e.to_string()))?;
        Ok(title.to_string())
    }

    fn note_path(&self, title: &str) -> PathBuf {
        self.backend.path_of(&Self::file_name(title))
    }
}
