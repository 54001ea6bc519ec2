//! # Autosave Policy
//!
//! Editor mode and save timing for one note at a time, as a pure state machine.
//! Nothing here sleeps, spawns or touches storage: callers pass `Instant`s in,
//! drive [`Autosave::poll`] from their event loop (waking at
//! [`Autosave::next_deadline`]) and act on the returned [`Effect`]s.
//!
//! ## Modes
//!
//! ```text
//!            focus / enter_edit                 (no note attached)
//!   Preview ───────────────────▶ Editing            Idle
//!      ▲                            │
//!      └── enter_preview, blur ─────┘
//!          (after grace), inactivity
//! ```
//!
//! ## Saving
//!
//! Every accepted change goes through a trailing [`Throttle`]: at most one save
//! per window, always carrying the latest content. Each pending save captures
//! the title of the note it was typed into, so switching notes can never
//! redirect it to another note. Switching and teardown flush the pending save
//! instead of dropping it.

use std::time::{Duration, Instant};
use tracing::debug;

/// Rate limit with trailing-edge semantics.
///
/// The first value pushed in a quiet period opens a window. Values pushed while
/// the window is open replace the pending one. When the window closes the latest
/// value is emitted exactly once.
#[derive(Debug)]
pub struct Throttle<T> {
    window: Duration,
    deadline: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some(value);
        if self.deadline.is_none() {
            self.deadline = Some(now + self.window);
        }
    }

    /// The pending value, if its window has closed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.flush(),
            _ => None,
        }
    }

    /// Emit the pending value now, closing the window.
    pub fn flush(&mut self) -> Option<T> {
        self.deadline = None;
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
        self.pending = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveTimings {
    /// At most one save per window.
    pub throttle: Duration,
    /// Return to preview after this long without a change while focused.
    pub inactivity: Duration,
    /// Delay before a blur takes effect, absorbing focus flicker.
    pub blur_grace: Duration,
}

impl Default for AutosaveTimings {
    fn default() -> Self {
        Self {
            throttle: Duration::from_millis(3000),
            inactivity: Duration::from_millis(10_500),
            blur_grace: Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    /// No note attached; the content area is read-only.
    Idle,
    Preview,
    Editing,
}

/// Content waiting to be written to the note it was typed into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSave {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Save(PendingSave),
    EnterPreview,
}

#[derive(Debug)]
pub struct Autosave {
    timings: AutosaveTimings,
    mode: EditorMode,
    focused: bool,
    target: Option<String>,
    throttle: Throttle<PendingSave>,
    inactivity_deadline: Option<Instant>,
    blur_deadline: Option<Instant>,
}

impl Autosave {
    pub fn new(timings: AutosaveTimings) -> Self {
        Self {
            timings,
            mode: EditorMode::Idle,
            focused: false,
            target: None,
            throttle: Throttle::new(timings.throttle),
            inactivity_deadline: None,
            blur_deadline: None,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Title of the attached note.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn has_pending_save(&self) -> bool {
        self.throttle.is_pending()
    }

    /// Content waiting for its window to close, without taking it.
    pub fn pending_save(&self) -> Option<&PendingSave> {
        self.throttle.pending()
    }

    /// Attach a different note (or none). The previous note's pending content is
    /// flushed as a save for that note and every timer is cancelled.
    pub fn attach(&mut self, title: Option<String>) -> Vec<Effect> {
        let effects: Vec<Effect> = self.throttle.flush().map(Effect::Save).into_iter().collect();
        self.cancel_timers();
        self.focused = false;
        self.mode = if title.is_some() {
            EditorMode::Preview
        } else {
            EditorMode::Idle
        };
        debug!(from = ?self.target, to = ?title, "editor attached");
        self.target = title;
        effects
    }

    /// The caret entered the text area.
    pub fn focus(&mut self, now: Instant) -> bool {
        if self.mode == EditorMode::Idle {
            return false;
        }
        self.focused = true;
        self.mode = EditorMode::Editing;
        self.blur_deadline = None;
        self.inactivity_deadline = Some(now + self.timings.inactivity);
        true
    }

    /// Explicit "edit mode" command; also takes focus.
    pub fn enter_edit(&mut self, now: Instant) -> bool {
        self.focus(now)
    }

    /// Explicit "preview mode" command. Pending content still gets saved.
    pub fn enter_preview(&mut self) {
        if self.mode == EditorMode::Idle {
            return;
        }
        self.mode = EditorMode::Preview;
        self.focused = false;
        self.inactivity_deadline = None;
        self.blur_deadline = None;
    }

    /// The caret left the text area. Preview follows after the grace delay
    /// unless focus comes back first.
    pub fn blur(&mut self, now: Instant) {
        if !self.focused {
            return;
        }
        self.focused = false;
        self.inactivity_deadline = None;
        self.blur_deadline = Some(now + self.timings.blur_grace);
    }

    /// The user changed the content. Returns false when the change was not
    /// accepted (no note attached, or not editing).
    pub fn change(&mut self, content: &str, now: Instant) -> bool {
        let Some(title) = self.target.clone() else {
            return false;
        };
        if self.focused {
            self.mode = EditorMode::Editing;
        }
        if self.mode != EditorMode::Editing {
            return false;
        }

        self.throttle.push(
            PendingSave {
                title,
                content: content.to_string(),
            },
            now,
        );
        if self.focused {
            self.inactivity_deadline = Some(now + self.timings.inactivity);
        }
        true
    }

    /// Fire every timer that is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();

        if let Some(save) = self.throttle.poll(now) {
            effects.push(Effect::Save(save));
        }

        if is_due(self.blur_deadline, now) {
            self.blur_deadline = None;
            if self.mode == EditorMode::Editing && !self.focused {
                self.mode = EditorMode::Preview;
                effects.push(Effect::EnterPreview);
            }
        }

        if is_due(self.inactivity_deadline, now) {
            self.inactivity_deadline = None;
            if self.mode == EditorMode::Editing && self.focused {
                self.mode = EditorMode::Preview;
                effects.push(Effect::EnterPreview);
            }
        }

        effects
    }

    /// Earliest instant at which [`Autosave::poll`] has something to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.throttle.deadline(),
            self.inactivity_deadline,
            self.blur_deadline,
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Cancel every timer and hand back the content that was still waiting.
    pub fn teardown(&mut self) -> Option<PendingSave> {
        let pending = self.throttle.flush();
        self.cancel_timers();
        self.focused = false;
        pending
    }

    fn cancel_timers(&mut self) {
        self.throttle.cancel();
        self.inactivity_deadline = None;
        self.blur_deadline = None;
    }
}

fn is_due(deadline: Option<Instant>, now: Instant) -> bool {
    deadline.is_some_and(|d| now >= d)
}
