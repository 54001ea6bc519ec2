//! Binds an editing surface to the store: the visible buffer, the autosave
//! policy, and the note the two are attached to.
//!
//! The front end reports events (focus, blur, changes, mode commands) and calls
//! [`EditorSession::tick`] whenever [`EditorSession::next_deadline`] passes.
//! Saves produced by the policy are applied to the store by title, so a save
//! that fires after a note switch or deletion never lands on another note.

use crate::autosave::{Autosave, AutosaveTimings, Effect, EditorMode, PendingSave};
use crate::error::Result;
use crate::model::NoteInfo;
use crate::notes::NoteStore;
use crate::store::NoteRepository;
use std::time::Instant;
use tracing::debug;

#[derive(Debug)]
pub struct EditorSession {
    autosave: Autosave,
    buffer: String,
    showing_placeholder: bool,
}

impl EditorSession {
    /// Start a session on the store's current selection (or none).
    pub fn open<R: NoteRepository>(store: &NoteStore<R>, timings: AutosaveTimings) -> Self {
        let mut session = Self {
            autosave: Autosave::new(timings),
            buffer: String::new(),
            showing_placeholder: false,
        };
        session.autosave.attach(store.selected_note().map(|n| n.title.clone()));
        session.show(store.selected_note());
        session
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn mode(&self) -> EditorMode {
        self.autosave.mode()
    }

    pub fn target(&self) -> Option<&str> {
        self.autosave.target()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.autosave.next_deadline()
    }

    /// Select the note at `index` and attach to it. Content still pending for
    /// the previous note is written to that note first; if that write fails the
    /// session and the store stay on the previous note with the draft pending.
    /// Returns false (and changes nothing) when `index` is out of range.
    pub fn switch<R: NoteRepository>(
        &mut self,
        store: &mut NoteStore<R>,
        index: usize,
    ) -> Result<bool> {
        let Some(title) = store.get(index).map(|n| n.title.clone()) else {
            return Ok(false);
        };

        self.write_pending(store)?;
        // already written above
        let _ = self.autosave.attach(Some(title));

        store.select(index);
        self.show(store.selected_note());
        Ok(true)
    }

    /// Re-attach to whatever the store has selected now, e.g. after a create
    /// or delete. Goes idle when nothing is selected. Pending content is
    /// written first, as on [`EditorSession::switch`].
    pub fn sync<R: NoteRepository>(&mut self, store: &mut NoteStore<R>) -> Result<()> {
        let selected = store.selected_note().map(|n| n.title.clone());
        if selected.as_deref() == self.autosave.target() {
            return Ok(());
        }

        self.write_pending(store)?;
        let _ = self.autosave.attach(selected);
        self.show(store.selected_note());
        Ok(())
    }

    fn write_pending<R: NoteRepository>(&self, store: &mut NoteStore<R>) -> Result<()> {
        if let Some(PendingSave { title, content }) = self.autosave.pending_save() {
            debug!(title = %title, "writing pending content before re-attaching");
            store.save_to(title, content)?;
        }
        Ok(())
    }

    pub fn focus(&mut self, now: Instant) -> bool {
        if !self.autosave.focus(now) {
            return false;
        }
        if self.showing_placeholder {
            self.buffer.clear();
            self.showing_placeholder = false;
        }
        true
    }

    pub fn blur(&mut self, now: Instant) {
        self.autosave.blur(now);
    }

    pub fn enter_edit(&mut self, now: Instant) -> bool {
        self.focus(now)
    }

    pub fn enter_preview(&mut self) {
        self.autosave.enter_preview();
    }

    /// Replace the buffer with `content`. Ignored unless editing.
    pub fn change(&mut self, content: &str, now: Instant) -> bool {
        if !self.autosave.change(content, now) {
            return false;
        }
        self.buffer = content.to_string();
        self.showing_placeholder = false;
        true
    }

    /// Run due timers, writing any save they produce.
    pub fn tick<R: NoteRepository>(
        &mut self,
        store: &mut NoteStore<R>,
        now: Instant,
    ) -> Result<Vec<Effect>> {
        let effects = self.autosave.poll(now);
        apply(store, effects.clone())?;
        Ok(effects)
    }

    /// Stop every timer and write whatever was still pending.
    pub fn close<R: NoteRepository>(&mut self, store: &mut NoteStore<R>) -> Result<Option<NoteInfo>> {
        match self.autosave.teardown() {
            Some(PendingSave { title, content }) => {
                debug!(title = %title, "flushing pending content on close");
                store.save_to(&title, &content)
            }
            None => Ok(None),
        }
    }

    fn show(&mut self, note: Option<&NoteInfo>) {
        match note {
            Some(note) => {
                self.buffer = note.display_content().to_string();
                self.showing_placeholder = note.content.as_deref().map_or(true, str::is_empty);
            }
            None => {
                self.buffer.clear();
                self.showing_placeholder = false;
            }
        }
    }
}

fn apply<R: NoteRepository>(store: &mut NoteStore<R>, effects: Vec<Effect>) -> Result<()> {
    for effect in effects {
        if let Effect::Save(PendingSave { title, content }) = effect {
            store.save_to(&title, &content)?;
        }
    }
    Ok(())
}
