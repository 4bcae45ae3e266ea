//! Request-scoped errors raised by the game.
//!
//! None of these are fatal to the process; each one fails the single request
//! that produced it and leaves the session store untouched.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// The random-article lookup returned an unusable status or `Location`.
    #[error("random article resolution failed: {0}")]
    Resolution(String),

    /// Fetching or parsing an article document failed.
    #[error("page fetch failed: {0}")]
    Fetch(String),

    /// `navigate` referenced an id the store does not know.
    #[error("session not found: {0}")]
    SessionNotFound(String),
}

impl GameError {
    /// Short machine-friendly label, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Resolution(_) => "resolution",
            Self::Fetch(_) => "fetch",
            Self::SessionNotFound(_) => "session_not_found",
        }
    }
}
