use super::backend::NoteBackend;
use crate::error::{NoteMarkError, Result};
use chrono::{DateTime, Utc};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Clone)]
struct FileEntry {
    text: String,
    mtime: DateTime<Utc>,
}

/// In-memory storage backend for testing.
///
/// Uses `RefCell`/`Cell` for interior mutability since notemark is
/// single-threaded. This keeps the `NoteBackend` trait on `&self` while
/// tests flip failure switches and read call counters through shared refs.
pub struct MemBackend {
    root: PathBuf,
    files: RefCell<HashMap<String, FileEntry>>,
    fail_writes: Cell<bool>,
    fail_lists: Cell<bool>,
    fail_removes: Cell<bool>,
    writes: Cell<usize>,
    removes: Cell<usize>,
}

impl Default for MemBackend {
    fn default() -> Self {
        Self {
            root: PathBuf::from("memory://notes"),
            files: RefCell::new(HashMap::new()),
            fail_writes: Cell::new(false),
            fail_lists: Cell::new(false),
            fail_removes: Cell::new(false),
            writes: Cell::new(0),
            removes: Cell::new(0),
        }
    }
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file with an explicit modification time. Not counted as a write.
    pub fn insert_file(&self, name: &str, text: &str, mtime: DateTime<Utc>) {
        self.files.borrow_mut().insert(
            name.to_string(),
            FileEntry {
                text: text.to_string(),
                mtime,
            },
        );
    }

    pub fn simulate_write_error(&self, simulate: bool) {
        self.fail_writes.set(simulate);
    }

    pub fn simulate_list_error(&self, simulate: bool) {
        self.fail_lists.set(simulate);
    }

    pub fn simulate_remove_error(&self, simulate: bool) {
        self.fail_removes.set(simulate);
    }

    /// Number of successful `write_file` calls.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    /// Number of successful `remove_file` calls.
    pub fn removes(&self) -> usize {
        self.removes.get()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.borrow().contains_key(name)
    }
}

impl NoteBackend for MemBackend {
    fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_root(&self) -> Result<()> {
        Ok(())
    }

    fn list_files(&self) -> Result<Vec<String>> {
        if self.fail_lists.get() {
            return Err(NoteMarkError::Store("Simulated list error".to_string()));
        }
        Ok(self.files.borrow().keys().cloned().collect())
    }

    fn read_file(&self, name: &str) -> Result<Option<String>> {
        Ok(self.files.borrow().get(name).map(|e| e.text.clone()))
    }

    fn write_file(&self, name: &str, text: &str) -> Result<()> {
        if self.fail_writes.get() {
            return Err(NoteMarkError::Store("Simulated write error".to_string()));
        }
        self.files.borrow_mut().insert(
            name.to_string(),
            FileEntry {
                text: text.to_string(),
                mtime: Utc::now(),
            },
        );
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn remove_file(&self, name: &str) -> Result<bool> {
        if self.fail_removes.get() {
            return Err(NoteMarkError::Store("Simulated remove error".to_string()));
        }
        let existed = self.files.borrow_mut().remove(name).is_some();
        if existed {
            self.removes.set(self.removes.get() + 1);
        }
        Ok(existed)
    }

    fn modified(&self, name: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self.files.borrow().get(name).map(|e| e.mtime))
    }
}
