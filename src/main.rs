use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use wikirace::config::Config;
use wikirace::{Game, SessionStore, WikiClient};

#[derive(Parser)]
#[command(name = "wikirace", about = "Race from one random wiki article to another")]
pub struct Args {
    #[arg(long, env = "WIKIRACE_BIND", help = "Listen address (default: 0.0.0.0:8080)")]
    pub bind: Option<String>,

    #[arg(long, env = "WIKIRACE_LANGUAGE", help = "Content language subdomain (default: en)")]
    pub language: Option<String>,

    #[arg(long, env = "WIKIRACE_SITE", help = "Encyclopedia host (default: wikipedia.org)")]
    pub site: Option<String>,

    #[arg(long, value_name = "MS", help = "Upstream request timeout")]
    pub timeout_ms: Option<u64>,

    #[arg(long, value_name = "SECS", help = "Evict sessions older than this")]
    pub session_ttl_secs: Option<u64>,

    #[arg(long, help = "Config file path")]
    pub config: Option<PathBuf>,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_logging();

    let mut cfg = if let Some(config_path) = &args.config {
        Config::load_from(config_path)?
    } else {
        Config::load()?
    };

    // CLI and environment take priority over config files
    if let Some(bind) = args.bind {
        cfg.bind = bind;
    }
    if let Some(language) = args.language {
        cfg.language = language;
    }
    if let Some(site) = args.site {
        cfg.site = site;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        cfg.timeout_ms = timeout_ms;
    }
    if args.session_ttl_secs.is_some() {
        cfg.session_ttl_secs = args.session_ttl_secs;
    }

    let errors = cfg.validate();
    if !errors.is_empty() {
        for err in &errors {
            tracing::error!("invalid config {}", err);
        }
        return Err(anyhow::anyhow!(
            "Invalid configuration ({} error(s))",
            errors.len()
        ));
    }

    let store = Arc::new(SessionStore::new());
    let game = Arc::new(Game::new(store, WikiClient::new(&cfg)));

    wikirace::server::serve(&cfg, game).await
}
