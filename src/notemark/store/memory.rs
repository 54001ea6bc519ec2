use super::mem_backend::MemBackend;
use super::note_files::NoteFiles;

pub type InMemoryRepository = NoteFiles<MemBackend>;

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    pub fn new() -> Self {
        NoteFiles::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(test)]
pub mod fixtures {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    /// Repository seeded with one file per title. The first title is the most
    /// recently edited, one minute apart, so a load lists them in the given order.
    pub fn seeded(titles: &[&str]) -> InMemoryRepository {
        let repo = InMemoryRepository::new();
        let newest = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        for (i, title) in titles.iter().enumerate() {
            repo.backend().insert_file(
                &format!("{}.md", title),
                &format!("# {}", title),
                newest - Duration::minutes(i as i64),
            );
        }
        repo
    }
}
