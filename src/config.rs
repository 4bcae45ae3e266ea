use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Article the upstream site redirects to a random page from
pub const RANDOM_PAGE: &str = "Special:Random";

/// A validation error in the configuration
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]: {}", self.field, self.message)
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    /// Content language, used as the upstream subdomain (e.g. "en")
    #[serde(default = "default_language")]
    pub language: String,
    /// Encyclopedia host without the language label
    #[serde(default = "default_site")]
    pub site: String,
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Timeout applied to every upstream request
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Evict sessions older than this; unset keeps them until restart
    #[serde(default)]
    pub session_ttl_secs: Option<u64>,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_site() -> String {
    "wikipedia.org".to_string()
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            site: default_site(),
            bind: default_bind(),
            timeout_ms: default_timeout_ms(),
            session_ttl_secs: None,
        }
    }
}

impl Config {
    /// Load configuration from default paths
    /// Priority: project (.wikirace/config.toml) > user (~/.wikirace/config.toml) > built-in
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".wikirace").join("config.toml");
            if user_config.exists() {
                config.merge_file(&user_config)?;
            }
        }

        let project_config = Path::new(".wikirace").join("config.toml");
        if project_config.exists() {
            config.merge_file(&project_config)?;
        }

        Ok(config)
    }

    /// Load configuration from a single explicit file on top of the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.merge_file(path)?;
        Ok(config)
    }

    /// Overlay the keys present in `path` onto this config
    fn merge_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let overlay: PartialConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;

        if let Some(language) = overlay.language {
            self.language = language;
        }
        if let Some(site) = overlay.site {
            self.site = site;
        }
        if let Some(bind) = overlay.bind {
            self.bind = bind;
        }
        if let Some(timeout_ms) = overlay.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
        if overlay.session_ttl_secs.is_some() {
            self.session_ttl_secs = overlay.session_ttl_secs;
        }
        Ok(())
    }

    /// Validate the config, returning every problem found
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.language.is_empty() {
            errors.push(ValidationError {
                field: "language".to_string(),
                message: "must not be empty".to_string(),
            });
        } else if !self
            .language
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            errors.push(ValidationError {
                field: "language".to_string(),
                message: format!("'{}' is not a valid subdomain label", self.language),
            });
        }

        if self.site.is_empty() {
            errors.push(ValidationError {
                field: "site".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if self.timeout_ms == 0 {
            errors.push(ValidationError {
                field: "timeout_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        errors
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn session_ttl(&self) -> Option<Duration> {
        self.session_ttl_secs.map(Duration::from_secs)
    }

    /// Upstream URL of an article; `title` is percent-encoded here
    pub fn article_url(&self, title: &str) -> String {
        format!(
            "https://{}.{}/wiki/{}",
            self.language,
            self.site,
            urlencoding::encode(title)
        )
    }

    /// Upstream URL of the random-article redirect
    pub fn random_url(&self) -> String {
        format!("https://{}.{}/wiki/{}", self.language, self.site, RANDOM_PAGE)
    }
}

/// Config file contents; every key optional so files can be layered
#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    language: Option<String>,
    site: Option<String>,
    bind: Option<String>,
    timeout_ms: Option<u64>,
    session_ttl_secs: Option<u64>,
}
