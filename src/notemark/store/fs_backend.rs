use super::backend::NoteBackend;
use crate::error::{NoteMarkError, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use uuid::Uuid;

/// Note files on disk, flat under one root directory.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl NoteBackend for FsBackend {
    fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_root(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(NoteMarkError::Io)?;
        }
        Ok(())
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let entries = fs::read_dir(&self.root).map_err(NoteMarkError::Io)?;

        for entry in entries {
            let entry = entry.map_err(NoteMarkError::Io)?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn read_file(&self, name: &str) -> Result<Option<String>> {
        let path = self.path_of(name);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(NoteMarkError::Io)?;
        Ok(Some(content))
    }

    fn write_file(&self, name: &str, content: &str) -> Result<()> {
        self.ensure_root()?;
        let target = self.path_of(name);

        // Atomic Write
        let tmp_path = self.root.join(format!(".note-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_path, content).map_err(NoteMarkError::Io)?;
        if let Err(e) = fs::rename(&tmp_path, target) {
            let _ = fs::remove_file(&tmp_path);
            return Err(NoteMarkError::Io(e));
        }
        Ok(())
    }

    fn remove_file(&self, name: &str) -> Result<bool> {
        let path = self.path_of(name);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path).map_err(NoteMarkError::Io)?;
        Ok(true)
    }

    fn modified(&self, name: &str) -> Result<Option<DateTime<Utc>>> {
        let path = self.path_of(name);
        if !path.exists() {
            return Ok(None);
        }
        let meta = fs::metadata(path).map_err(NoteMarkError::Io)?;
        let modified: DateTime<Utc> = meta.modified().unwrap_or(SystemTime::now()).into();
        Ok(Some(modified))
    }
}
