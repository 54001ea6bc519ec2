//! # Storage Layer
//!
//! Notes are plain Markdown files, flat under a single root directory:
//!
//! ```text
//! ~/NoteMark/
//! ├── Idea.md
//! ├── Recipe.md
//! └── Todo.md
//! ```
//!
//! The file name without `.md` is the note's title and its identity. The file's
//! modification time is its `last_edit_time` when notes are loaded.
//!
//! ## Layers
//!
//! - [`backend::NoteBackend`]: raw file I/O by file name.
//!   - [`fs_backend::FsBackend`]: the real directory, atomic writes.
//!   - [`mem_backend::MemBackend`]: in-memory, with failure switches and call
//!     counters for tests.
//! - [`NoteRepository`]: the contract the note store depends on. Implemented by
//!   [`note_files::NoteFiles`] over any backend.
//!
//! The repository only ever takes decisions that were already made: a title the
//! user picked, a delete the user confirmed. Prompting lives in
//! [`crate::dialog`].

use crate::error::Result;
use crate::model::NoteInfo;
use std::path::{Path, PathBuf};

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;
pub mod note_files;

pub use memory::InMemoryRepository;

/// Production repository over the filesystem.
pub type FileRepository = note_files::NoteFiles<fs_backend::FsBackend>;

impl FileRepository {
    pub fn open(root: PathBuf) -> Self {
        note_files::NoteFiles::with_backend(fs_backend::FsBackend::new(root))
    }
}

/// Whole-file access to the notes under one root directory.
pub trait NoteRepository {
    /// The notes root directory.
    fn root(&self) -> &Path;

    /// Every note under the root, content included, in no particular order.
    /// Creates the root if it is missing.
    fn list(&self) -> Result<Vec<NoteInfo>>;

    /// Whether a file already backs `title`.
    fn exists(&self, title: &str) -> Result<bool>;

    /// Content of one note.
    fn read(&self, title: &str) -> Result<String>;

    /// Persist `content` as the whole body of `title`, creating the file if needed.
    fn write(&mut self, title: &str, content: &str) -> Result<()>;

    /// Remove a note's file.
    fn delete(&mut self, title: &str) -> Result<()>;

    /// Turn a location picked by the user into a title.
    /// Relative paths are taken relative to the root. Fails with
    /// `InvalidLocation` when the location is not a `.md` file directly
    /// under the root.
    fn resolve_location(&self, location: &Path) -> Result<String>;

    /// File path backing `title`.
    fn note_path(&self, title: &str) -> PathBuf;
}
