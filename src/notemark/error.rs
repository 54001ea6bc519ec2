use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoteMarkError {
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error("A note named \"{0}\" already exists")]
    DuplicateTitle(String),

    #[error("Invalid note title: {0}")]
    InvalidTitle(String),

    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, NoteMarkError>;
