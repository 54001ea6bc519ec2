//! # API Facade
//!
//! The API layer is the single entry point for front ends. It owns the
//! [`NoteStore`] and the [`Dialogs`] of one session and returns structured
//! [`CmdResult`]s: notes to show, notes affected, leveled messages.
//!
//! ## Role and Responsibilities
//!
//! - **Orchestrates user-gated flows**: create asks for a location, delete asks
//!   for confirmation, then the store acts on the decision.
//! - **Turns outcomes into messages**: cancellations become info messages,
//!   missing selections and rejected locations become warnings.
//! - **Propagates I/O failures** as `Err`, with the store left untouched.
//!
//! ## What the API Does NOT Do
//!
//! - **State bookkeeping**: selection and ordering rules live in
//!   [`crate::notes`].
//! - **Printing**: no stdout, stderr or formatting; the binary renders
//!   `CmdResult`s.
//!
//! ## Generic Over Repository and Dialogs
//!
//! - Production: `NoteMarkApi<FileRepository, TerminalDialogs>`
//! - Testing: `NoteMarkApi<InMemoryRepository, ScriptedDialogs>`
//!
//! Indexes taken by this API are zero-based positions in the note list.
//! [`DisplayNote::index`] is the one-based number shown to users.

use crate::dialog::Dialogs;
use crate::error::{NoteMarkError, Result};
use crate::model::{NoteInfo, Outcome};
use crate::notes::NoteStore;
use crate::store::NoteRepository;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// A note paired with its one-based list number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayNote {
    pub index: usize,
    pub selected: bool,
    #[serde(flatten)]
    pub note: NoteInfo,
}

impl DisplayNote {
    pub fn new(position: usize, note: NoteInfo, selected: bool) -> Self {
        Self {
            index: position + 1,
            selected,
            note,
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_notes: Vec<DisplayNote>,
    pub listed_notes: Vec<DisplayNote>,
    pub note_paths: Vec<PathBuf>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_notes(mut self, notes: Vec<DisplayNote>) -> Self {
        self.listed_notes = notes;
        self
    }

    pub fn has_level(&self, level: MessageLevel) -> bool {
        self.messages.iter().any(|m| m.level == level)
    }
}

/// The main API facade for notemark operations.
pub struct NoteMarkApi<R: NoteRepository, D: Dialogs> {
    store: NoteStore<R>,
    dialogs: D,
}

impl<R: NoteRepository, D: Dialogs> NoteMarkApi<R, D> {
    pub fn new(repository: R, dialogs: D) -> Self {
        Self {
            store: NoteStore::new(repository),
            dialogs,
        }
    }

    pub fn store(&self) -> &NoteStore<R> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut NoteStore<R> {
        &mut self.store
    }

    pub fn dialogs(&self) -> &D {
        &self.dialogs
    }

    pub fn root(&self) -> &Path {
        self.store.repository().root()
    }

    fn display(&self, position: usize) -> Option<DisplayNote> {
        let selected = self.store.selected_index() == Some(position);
        self.store
            .get(position)
            .map(|note| DisplayNote::new(position, note.clone(), selected))
    }

    pub fn load(&mut self) -> Result<CmdResult> {
        let count = self.store.load_all()?;
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::info(format!("Loaded {} notes.", count)));
        Ok(result)
    }

    pub fn list(&self) -> CmdResult {
        let listed = (0..self.store.len())
            .filter_map(|i| self.display(i))
            .collect::<Vec<_>>();
        let mut result = CmdResult::default().with_listed_notes(listed);
        if self.store.is_empty() {
            result.add_message(CmdMessage::info("No notes yet!"));
        }
        result
    }

    pub fn select(&mut self, position: usize) -> CmdResult {
        let mut result = CmdResult::default();
        if self.store.select(position) {
            result.listed_notes.extend(self.display(position));
        } else {
            result.add_message(CmdMessage::warning(format!(
                "No note at index {}.",
                position + 1
            )));
        }
        result
    }

    /// Ask for a location, then create a note there with `content`.
    /// Cancelling, or picking an invalid or taken location, changes nothing.
    pub fn create_note(&mut self, content: &str) -> Result<CmdResult> {
        let mut result = CmdResult::default();
        let root = self.root().to_path_buf();

        let Some(location) = self.dialogs.choose_location(&root) else {
            info!("note creation cancelled by user");
            result.add_message(CmdMessage::info("Note creation cancelled."));
            return Ok(result);
        };

        let created = self
            .store
            .repository()
            .resolve_location(&location)
            .and_then(|title| self.store.create(&title, content));

        match created {
            Ok(position) => {
                let shown = self.display(position);
                if let Some(dn) = &shown {
                    result.add_message(CmdMessage::success(format!(
                        "Note created: {}",
                        dn.note.title
                    )));
                }
                result.affected_notes.extend(shown);
                Ok(result)
            }
            Err(err @ (NoteMarkError::InvalidLocation(_) | NoteMarkError::DuplicateTitle(_))) => {
                warn!(%err, "note location rejected");
                self.dialogs.notify(&err.to_string());
                result.add_message(CmdMessage::warning(format!(
                    "{}. No note was created.",
                    err
                )));
                Ok(result)
            }
            Err(err) => Err(err),
        }
    }

    pub fn save(&mut self, content: &str) -> Result<CmdResult> {
        let mut result = CmdResult::default();
        match self.store.save(content)? {
            Outcome::Done(note) => {
                result.add_message(CmdMessage::success(format!("Note saved: {}", note.title)));
                let position = self.store.selected_index().unwrap_or_default();
                result
                    .affected_notes
                    .push(DisplayNote::new(position, note, true));
            }
            _ => result.add_message(CmdMessage::warning("No note selected to save.")),
        }
        Ok(result)
    }

    /// Confirm with the user, then delete the selected note.
    pub fn delete_selected(&mut self) -> Result<CmdResult> {
        let mut result = CmdResult::default();

        let (Some(position), Some(title)) = (
            self.store.selected_index(),
            self.store.selected_note().map(|n| n.title.clone()),
        ) else {
            warn!("no note selected to delete");
            result.add_message(CmdMessage::warning("No note selected to delete."));
            return Ok(result);
        };

        if !self.dialogs.confirm_delete(&title) {
            info!(title = %title, "note deletion cancelled by user");
            result.add_message(CmdMessage::info("Note deletion cancelled."));
            return Ok(result);
        }

        if let Outcome::Done(removed) = self.store.remove_selected()? {
            result.add_message(CmdMessage::success(format!(
                "Note deleted: {}",
                removed.title
            )));
            result
                .affected_notes
                .push(DisplayNote::new(position, removed, false));
        }
        Ok(result)
    }

    /// Drop a note from the list without touching its file.
    pub fn remove_at(&mut self, position: usize) -> CmdResult {
        let mut result = CmdResult::default();
        match self.store.remove_at(position) {
            Some(note) => {
                result.add_message(CmdMessage::info(format!(
                    "Removed from list: {}",
                    note.title
                )));
                result
                    .affected_notes
                    .push(DisplayNote::new(position, note, false));
            }
            None => result.add_message(CmdMessage::warning(format!(
                "No note at index {}.",
                position + 1
            ))),
        }
        result
    }

    pub fn note_path(&self, position: usize) -> Result<CmdResult> {
        let note = self.store.get(position).ok_or_else(|| {
            NoteMarkError::Api(format!("No note at index {}", position + 1))
        })?;
        let mut result = CmdResult::default();
        result
            .note_paths
            .push(self.store.repository().note_path(&note.title));
        Ok(result)
    }
}
