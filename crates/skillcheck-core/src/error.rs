use thiserror::Error;

/// Unified error type for conditions that abort a skillcheck run.
///
/// Document-level problems are never errors: checkers report them as
/// [`crate::Issue`]s and the run continues.
#[derive(Error, Debug)]
pub enum CheckError {
    // ── Corpus errors ──────────────────────────────────────────
    #[error("corpus error: {0}")]
    Corpus(String),

    // ── Config errors ──────────────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    // ── Runtime errors ─────────────────────────────────────────
    #[error("watch error: {0}")]
    Watch(String),

    #[error("worker task failed: {0}")]
    Task(String),

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CheckError>;
