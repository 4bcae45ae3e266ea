//! Upstream encyclopedia access.
//!
//! Two requests are made against the site: the `Special:Random` redirect,
//! read without following it, and plain article fetches.

use crate::config::Config;
use crate::error::GameError;
use tracing::debug;

/// Trait for the upstream encyclopedia to allow mocking and abstraction
pub trait Encyclopedia: Send + Sync {
    /// Resolve one randomly chosen article title
    fn random_title(&self) -> Result<String, GameError>;

    /// Fetch the rendered HTML document of an article
    fn fetch_page(&self, title: &str) -> Result<String, GameError>;
}

/// Pick the title out of a random-article redirect.
///
/// Status 200 passes the check as well as 302, but a 200 carries no
/// `Location` and still fails below.
pub fn title_from_redirect(status: u16, location: Option<&str>) -> Result<String, GameError> {
    if status != 200 && status != 302 {
        return Err(GameError::Resolution(format!(
            "unexpected status {}",
            status
        )));
    }

    let location = location.unwrap_or_default();
    let last = location.rsplit('/').next().unwrap_or_default();
    if last.is_empty() {
        return Err(GameError::Resolution(format!(
            "no title in Location header {:?}",
            location
        )));
    }

    // Titles are kept decoded, the same form the router hands to navigate.
    let title = urlencoding::decode(last)
        .map(|t| t.into_owned())
        .unwrap_or_else(|_| last.to_string());
    Ok(title)
}

pub struct WikiClient {
    config: Config,
    /// Never follows redirects; used for `Special:Random`
    random_agent: ureq::Agent,
    page_agent: ureq::Agent,
}

impl WikiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            random_agent: ureq::AgentBuilder::new()
                .redirects(0)
                .timeout(config.timeout())
                .build(),
            page_agent: ureq::AgentBuilder::new().timeout(config.timeout()).build(),
        }
    }
}

impl Encyclopedia for WikiClient {
    fn random_title(&self) -> Result<String, GameError> {
        let url = self.config.random_url();
        debug!(%url, "resolving random article");

        match self.random_agent.get(&url).call() {
            Ok(r) => title_from_redirect(r.status(), r.header("Location")),
            Err(ureq::Error::Status(code, r)) => title_from_redirect(code, r.header("Location")),
            Err(e) => Err(GameError::Resolution(format!("request failed: {}", e))),
        }
    }

    fn fetch_page(&self, title: &str) -> Result<String, GameError> {
        let url = self.config.article_url(title);
        debug!(%url, "fetching article");

        match self.page_agent.get(&url).call() {
            Ok(r) => r
                .into_string()
                .map_err(|e| GameError::Fetch(format!("reading {}: {}", url, e))),
            Err(ureq::Error::Status(code, _)) => {
                Err(GameError::Fetch(format!("{} returned {}", url, code)))
            }
            Err(e) => Err(GameError::Fetch(format!("request failed: {}", e))),
        }
    }
}
