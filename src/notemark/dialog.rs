//! # Dialogs
//!
//! User decisions needed by the create and delete flows. The repository never
//! prompts; [`crate::api::NoteMarkApi`] asks a [`Dialogs`] implementation first
//! and passes the decision on.
//!
//! Declining is an ordinary answer (`None` / `false`), never an error.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

pub trait Dialogs {
    /// Ask where to save a new note. `root` is where notes must live.
    /// `None` means the user cancelled.
    fn choose_location(&mut self, root: &Path) -> Option<PathBuf>;

    /// Ask whether `title` should really be deleted.
    fn confirm_delete(&mut self, title: &str) -> bool;

    /// Show a blocking notice (e.g. an invalid location was chosen).
    fn notify(&mut self, message: &str);
}

/// Preset answers, consumed in order.
///
/// When the queues run dry, locations are cancelled and deletes declined.
#[derive(Debug, Default)]
pub struct ScriptedDialogs {
    locations: VecDeque<Option<PathBuf>>,
    confirmations: VecDeque<bool>,
    notices: Vec<String>,
    asked_locations: usize,
    asked_confirmations: usize,
}

impl ScriptedDialogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.locations.push_back(Some(location.into()));
        self
    }

    pub fn with_cancelled_location(mut self) -> Self {
        self.locations.push_back(None);
        self
    }

    pub fn with_confirmation(mut self, confirmed: bool) -> Self {
        self.confirmations.push_back(confirmed);
        self
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn asked_locations(&self) -> usize {
        self.asked_locations
    }

    pub fn asked_confirmations(&self) -> usize {
        self.asked_confirmations
    }
}

impl Dialogs for ScriptedDialogs {
    fn choose_location(&mut self, _root: &Path) -> Option<PathBuf> {
        self.asked_locations += 1;
        self.locations.pop_front().flatten()
    }

    fn confirm_delete(&mut self, _title: &str) -> bool {
        self.asked_confirmations += 1;
        self.confirmations.pop_front().unwrap_or(false)
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}
