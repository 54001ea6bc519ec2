//! # NoteMark Architecture
//!
//! NoteMark keeps Markdown notes as plain `<title>.md` files in one folder and
//! offers list, create, view, edit, save and delete over them, with an
//! autosaving editor session. The library owns all of that state; the CLI is
//! one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prompts, prints, exit codes            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs) + Editor binding (session.rs)           │
//! │  - Asks Dialogs, then acts; returns CmdResult               │
//! │  - Drives the autosave policy against the store             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  State Layer (notes.rs, autosave.rs)                        │
//! │  - Ordered note list, selection, single-flight mutations    │
//! │  - Throttle and inactivity timers as plain deadlines        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - NoteRepository trait over a NoteBackend                  │
//! │  - FileRepository (production), InMemoryRepository (tests)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr, never exits the
//! process and never reads the clock on its own for timers: callers pass
//! `Instant`s in, which keeps the autosave policy testable without sleeping.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for front ends
//! - [`notes`]: The note list and selection (`NoteStore`)
//! - [`autosave`]: Throttled saves and edit/preview timers
//! - [`session`]: Binds a text buffer and the autosave policy to the store
//! - [`dialog`]: Location and delete-confirmation prompts
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`NoteInfo`, `Outcome`)
//! - [`config`]: Configuration management
//! - [`editor`]: External editor integration
//! - [`error`]: Error types
//! - `cli`: Argument parsing, prompts and printing for the binary (not part of the lib API)

pub mod api;
pub mod autosave;
pub mod config;
pub mod dialog;
pub mod editor;
pub mod error;
pub mod model;
pub mod notes;
pub mod session;
pub mod store;
