use colored::Colorize;
use console::Term;
use notemark::dialog::Dialogs;
use std::path::{Path, PathBuf};

/// Prompts on the terminal (stderr, so stdout stays clean for output).
/// Without a terminal, creation is cancelled and deletion declined unless
/// answered up front with `--name` / `--yes`.
pub(super) struct TerminalDialogs {
    term: Term,
    name: Option<String>,
    assume_yes: bool,
}

impl TerminalDialogs {
    pub(super) fn new() -> Self {
        Self {
            term: Term::stderr(),
            name: None,
            assume_yes: false,
        }
    }

    pub(super) fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub(super) fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    fn ask(&self, prompt: &str) -> Option<String> {
        if !self.term.is_term() {
            return None;
        }
        self.term.write_str(prompt).ok()?;
        self.term.read_line().ok()
    }
}

impl Dialogs for TerminalDialogs {
    fn choose_location(&mut self, root: &Path) -> Option<PathBuf> {
        if let Some(name) = self.name.take() {
            return Some(PathBuf::from(name));
        }
        let answer = self.ask(&format!(
            "Save new note in {} as (empty to cancel): ",
            root.display()
        ))?;
        let answer = answer.trim();
        (!answer.is_empty()).then(|| PathBuf::from(answer))
    }

    fn confirm_delete(&mut self, title: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        self.ask(&format!("Delete \"{}\"? This cannot be undone. [y/N] ", title))
            .map(|a| matches!(a.trim().to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false)
    }

    fn notify(&mut self, message: &str) {
        let _ = self.term.write_line(&message.yellow().to_string());
    }
}
