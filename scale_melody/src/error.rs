// Error taxonomy for melody generation and MIDI export.
//
// Every fallible library operation returns `Result<T>` with `MelodyError`.
// The CLI (main.rs) reports these on stderr and exits non-zero; nothing in
// the library retries or prints.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MelodyError {
    /// The user-supplied scale name is not one of the 24 known scales.
    #[error("invalid scale name '{0}' (expected e.g. \"C major\" or \"Eb minor\")")]
    InvalidScaleName(String),

    /// A melody broke its own invariants (empty, zero-length event, or a
    /// duration total that does not match the budget).
    #[error("invalid melody: {0}")]
    InvalidMelody(String),

    /// A parameter outside its documented range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration JSON, or a failure serializing JSON output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MelodyError>;
