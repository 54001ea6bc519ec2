use crate::error::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Abstract interface for raw note file I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while `NoteFiles` handles the "what" (titles, validation, listing).
///
/// Every method addresses a file by its name directly under the notes root
/// (e.g. `Recipe.md`).
pub trait NoteBackend {
    /// The notes root directory (virtual for in-memory backends).
    fn root(&self) -> &Path;

    /// Create the root if it does not exist yet.
    fn ensure_root(&self) -> Result<()>;

    /// Names of all regular files directly under the root.
    fn list_files(&self) -> Result<Vec<String>>;

    /// Read a file. Returns Ok(None) if it does not exist.
    fn read_file(&self, name: &str) -> Result<Option<String>>;

    /// Write a whole file.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn write_file(&self, name: &str, content: &str) -> Result<()>;

    /// Remove a file. Returns Ok(false) if it did not exist.
    fn remove_file(&self, name: &str) -> Result<bool>;

    /// Modification time of a file, if it exists.
    fn modified(&self, name: &str) -> Result<Option<DateTime<Utc>>>;

    /// Full path of a file under the root.
    fn path_of(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }
}
