//! Game controller: random titles, new games, and page navigation.

use crate::config::RANDOM_PAGE;
use crate::error::GameError;
use crate::session::{Session, SessionStore};
use crate::transform;
use crate::wiki::Encyclopedia;
use std::sync::Arc;
use tracing::info;

/// Body returned when a player reaches the target article
pub const WIN_MESSAGE: &str = "YOU WIN!!!";

/// Result of a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The requested title is the session's target
    Won,
    /// Rewritten article fragment
    Page(String),
}

impl Outcome {
    /// HTML body to send back to the player
    pub fn into_html(self) -> String {
        match self {
            Self::Won => WIN_MESSAGE.to_string(),
            Self::Page(html) => html,
        }
    }
}

/// A freshly started game
#[derive(Debug, Clone)]
pub struct Started {
    pub session: Session,
    pub html: String,
}

pub struct Game<E: Encyclopedia> {
    store: Arc<SessionStore>,
    wiki: E,
}

impl<E: Encyclopedia> Game<E> {
    pub fn new(store: Arc<SessionStore>, wiki: E) -> Self {
        Self { store, wiki }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn wiki(&self) -> &E {
        &self.wiki
    }

    pub fn random_title(&self) -> Result<String, GameError> {
        self.wiki.random_title()
    }

    /// Start a new game.
    ///
    /// Begin and target are resolved independently and may coincide. The
    /// first page shown is a fresh random redirect, not `begin` itself.
    pub fn start(&self) -> Result<Started, GameError> {
        let begin = self.wiki.random_title()?;
        let end = self.wiki.random_title()?;

        let session = self.store.create(&begin, &end);
        info!(
            session = %session.id,
            begin = %session.begin,
            end = %session.end,
            live = self.store.len(),
            "game started"
        );

        let html = transform::render(&self.wiki, &session, RANDOM_PAGE)?;
        Ok(Started { session, html })
    }

    pub fn navigate(&self, session_id: &str, title: &str) -> Result<Outcome, GameError> {
        let session = self
            .store
            .lookup(session_id)
            .ok_or_else(|| GameError::SessionNotFound(session_id.to_string()))?;

        if session.is_target(title) {
            info!(session = %session.id, target = %session.end, "target reached");
            return Ok(Outcome::Won);
        }

        transform::render(&self.wiki, &session, title).map(Outcome::Page)
    }
}
