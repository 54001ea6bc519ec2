//! # CLI Layer
//!
//! One front end for the notemark library. This is the only place that knows
//! about stdout/stderr, exit codes, prompts and argument parsing.
//!
//! - `run()`: parses arguments, installs logging, dispatches
//! - `init_context()`: resolves the notes folder, builds and loads the API
//! - `handle_*()`: one handler per command, calling the API and printing
//!
//! Notes are numbered from 1 in the order `list` shows them.

mod dialogs;
mod print;

use crate::args::{Cli, Commands};
use clap::Parser;
use colored::Colorize;
use dialogs::TerminalDialogs;
use notemark::api::NoteMarkApi;
use notemark::autosave::{Effect, EditorMode};
use notemark::config::{self, NoteMarkConfig, KEYS};
use notemark::editor::edit_content;
use notemark::error::{NoteMarkError, Result};
use notemark::session::EditorSession;
use notemark::store::FileRepository;
use print::{print_full_note, print_messages, print_notes};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Instant;
use tracing::level_filters::LevelFilter;

struct AppContext {
    api: NoteMarkApi<FileRepository, TerminalDialogs>,
    config: NoteMarkConfig,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(Commands::Config { key, value }) = &cli.command {
        return handle_config(key.as_deref(), value.as_deref());
    }

    let dialogs = match &cli.command {
        Some(Commands::New { name, .. }) => TerminalDialogs::new().with_name(name.clone()),
        Some(Commands::Remove { yes, .. }) => TerminalDialogs::new().assume_yes(*yes),
        _ => TerminalDialogs::new(),
    };
    let mut ctx = init_context(cli.dir, dialogs)?;

    match cli.command {
        Some(Commands::List { json }) => handle_list(&ctx, json),
        Some(Commands::New { content, .. }) => handle_new(&mut ctx, content),
        Some(Commands::Show { index }) => handle_show(&mut ctx, index),
        Some(Commands::Edit { index, content }) => handle_edit(&mut ctx, index, content),
        Some(Commands::Write { index }) => handle_write(&mut ctx, index),
        Some(Commands::Remove { index, .. }) => handle_remove(&mut ctx, index),
        Some(Commands::Path { index }) => handle_path(&ctx, index),
        Some(Commands::Config { .. }) => Ok(()),
        None => handle_list(&ctx, false),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn init_context(dir: Option<PathBuf>, dialogs: TerminalDialogs) -> Result<AppContext> {
    let config = match config::config_dir() {
        Ok(config_dir) => NoteMarkConfig::load(config_dir).unwrap_or_default(),
        Err(_) => NoteMarkConfig::default(),
    };
    let root = config.resolve_notes_dir(dir.as_deref());

    let mut api = NoteMarkApi::new(FileRepository::open(root), dialogs);
    api.load()?;
    Ok(AppContext { api, config })
}

/// Convert a listed note number into a store position, selecting that note.
fn select(ctx: &mut AppContext, index: usize) -> Result<usize> {
    let position = index
        .checked_sub(1)
        .ok_or_else(|| NoteMarkError::Api("Note numbers start at 1".to_string()))?;
    let result = ctx.api.select(position);
    if result.listed_notes.is_empty() {
        return Err(NoteMarkError::Api(format!("No note at index {}", index)));
    }
    Ok(position)
}

fn handle_list(ctx: &AppContext, json: bool) -> Result<()> {
    let result = ctx.api.list();
    if json {
        let out = serde_json::to_string_pretty(&result.listed_notes)
            .map_err(NoteMarkError::Serialization)?;
        println!("{}", out);
        return Ok(());
    }
    print_notes(&result.listed_notes);
    print_messages(&result.messages);
    Ok(())
}

fn handle_new(ctx: &mut AppContext, content: Option<String>) -> Result<()> {
    let result = ctx.api.create_note(&content.unwrap_or_default())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_show(ctx: &mut AppContext, index: usize) -> Result<()> {
    select(ctx, index)?;
    let result = ctx.api.list();
    if let Some(dn) = result.listed_notes.iter().find(|dn| dn.selected) {
        print_full_note(dn);
    }
    Ok(())
}

fn handle_edit(ctx: &mut AppContext, index: usize, content: Option<String>) -> Result<()> {
    select(ctx, index)?;
    let current = ctx
        .api
        .store()
        .selected_note()
        .and_then(|n| n.content.clone())
        .unwrap_or_default();

    let edited = match content {
        Some(text) => text,
        None => edit_content(&current)?,
    };
    if edited == current {
        println!("{}", "No changes.".dimmed());
        return Ok(());
    }

    let result = ctx.api.save(&edited)?;
    print_messages(&result.messages);
    Ok(())
}

/// Live session: every stdin line is appended to the buffer as one change.
/// Autosave runs on the configured timings; EOF ends the session and flushes.
fn handle_write(ctx: &mut AppContext, index: usize) -> Result<()> {
    select(ctx, index)?;
    let mut session = EditorSession::open(ctx.api.store(), ctx.config.timings());
    session.focus(Instant::now());

    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    loop {
        let received = match session.next_deadline() {
            Some(deadline) => rx.recv_timeout(deadline.saturating_duration_since(Instant::now())),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(line) => {
                let now = Instant::now();
                if session.mode() != EditorMode::Editing {
                    session.focus(now);
                }
                let mut text = session.buffer().to_string();
                if !text.is_empty() && !text.ends_with('\n') {
                    text.push('\n');
                }
                text.push_str(&line);
                text.push('\n');
                session.change(&text, now);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        for effect in session.tick(ctx.api.store_mut(), Instant::now())? {
            match effect {
                Effect::Save(save) => eprintln!("{}", format!("saved {}", save.title).dimmed()),
                Effect::EnterPreview => eprintln!("{}", "preview".dimmed()),
            }
        }
    }

    session.blur(Instant::now());
    if let Some(note) = session.close(ctx.api.store_mut())? {
        eprintln!("{}", format!("saved {}", note.title).dimmed());
    }
    Ok(())
}

fn handle_remove(ctx: &mut AppContext, index: usize) -> Result<()> {
    select(ctx, index)?;
    let result = ctx.api.delete_selected()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_path(ctx: &AppContext, index: Option<usize>) -> Result<()> {
    let Some(index) = index else {
        println!("{}", ctx.api.root().display());
        return Ok(());
    };
    let position = index
        .checked_sub(1)
        .ok_or_else(|| NoteMarkError::Api("Note numbers start at 1".to_string()))?;
    let result = ctx.api.note_path(position)?;
    for path in &result.note_paths {
        println!("{}", path.display());
    }
    Ok(())
}

fn handle_config(key: Option<&str>, value: Option<&str>) -> Result<()> {
    let config_dir = config::config_dir()?;
    let mut config = NoteMarkConfig::load(&config_dir)?;

    match (key, value) {
        (None, _) => {
            for key in KEYS {
                println!("{} = {}", key, config.get(key)?);
            }
        }
        (Some(key), None) => println!("{}", config.get(key)?),
        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save(&config_dir)?;
            println!("{}", format!("{} set to {}", key, config.get(key)?).green());
        }
    }
    Ok(())
}
