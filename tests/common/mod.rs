//! In-memory encyclopedia shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use wikirace::{Encyclopedia, GameError};

pub fn article(heading: &str, body: &str) -> String {
    format!(
        r#"<html><body><h1 id="firstHeading">{}</h1><div id="mw-content-text">{}</div></body></html>"#,
        heading, body
    )
}

#[derive(Default)]
pub struct FakeWiki {
    random: Mutex<VecDeque<Result<String, GameError>>>,
    pages: HashMap<String, String>,
    fetched: Mutex<Vec<String>>,
}

impl FakeWiki {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next answers of `random_title`
    pub fn with_random(self, titles: &[&str]) -> Self {
        {
            let mut random = self.random.lock().unwrap();
            random.extend(titles.iter().map(|t| Ok(t.to_string())));
        }
        self
    }

    pub fn with_random_error(self) -> Self {
        self.random
            .lock()
            .unwrap()
            .push_back(Err(GameError::Resolution("unexpected status 404".into())));
        self
    }

    pub fn with_page(mut self, title: &str, html: String) -> Self {
        self.pages.insert(title.to_string(), html);
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

impl Encyclopedia for FakeWiki {
    fn random_title(&self) -> Result<String, GameError> {
        self.random
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GameError::Resolution("no more random titles".into())))
    }

    fn fetch_page(&self, title: &str) -> Result<String, GameError> {
        self.fetched.lock().unwrap().push(title.to_string());
        self.pages
            .get(title)
            .cloned()
            .ok_or_else(|| GameError::Fetch(format!("no page {}", title)))
    }
}
