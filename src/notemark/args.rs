use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notemark", version)]
#[command(about = "Markdown notes kept as plain files in one folder", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Notes folder (overrides NOTEMARK_DIR and the config)
    #[arg(long, global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List notes, most recently edited first
    #[command(alias = "ls")]
    List {
        /// Print the notes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new note
    #[command(alias = "n")]
    New {
        /// Initial Markdown content
        #[arg(required = false)]
        content: Option<String>,

        /// File name inside the notes folder (skips the prompt)
        #[arg(long)]
        name: Option<String>,
    },

    /// Print a note
    #[command(alias = "v")]
    Show {
        /// Number of the note as listed
        index: usize,
    },

    /// Replace a note's content, or edit it in $EDITOR
    #[command(alias = "e")]
    Edit {
        /// Number of the note as listed
        index: usize,

        /// New content (skips the editor)
        #[arg(long)]
        content: Option<String>,
    },

    /// Type into a note from stdin, one line per change, with autosave
    Write {
        /// Number of the note as listed
        index: usize,
    },

    /// Delete a note
    #[command(name = "rm", alias = "delete")]
    Remove {
        /// Number of the note as listed
        index: usize,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the notes folder, or the file path of one note
    Path {
        /// Number of the note as listed
        index: Option<usize>,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., throttle-ms)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
