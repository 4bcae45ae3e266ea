//! A wiki race: reach a random target article from a random start by
//! following in-article links only.

pub mod config;
pub mod error;
pub mod game;
pub mod server;
pub mod session;
pub mod transform;
pub mod wiki;

pub use error::GameError;
pub use game::{Game, Outcome, WIN_MESSAGE};
pub use session::{Session, SessionStore};
pub use wiki::{Encyclopedia, WikiClient};
