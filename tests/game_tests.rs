//! Controller tests against an in-memory encyclopedia.

mod common;

use common::{article, FakeWiki};
use std::sync::Arc;
use wikirace::config::RANDOM_PAGE;
use wikirace::{Game, GameError, Outcome, SessionStore, WIN_MESSAGE};

fn game(wiki: FakeWiki) -> Game<FakeWiki> {
    Game::new(Arc::new(SessionStore::new()), wiki)
}

#[test]
fn test_random_title_delegates() {
    let game = game(FakeWiki::new().with_random(&["Cheese"]));
    assert_eq!(game.random_title().unwrap(), "Cheese");
}

#[test]
fn test_random_title_error_propagates() {
    let game = game(FakeWiki::new().with_random_error());
    assert!(matches!(game.random_title(), Err(GameError::Resolution(_))));
}

#[test]
fn test_start_creates_session_and_renders_random_page() {
    let wiki = FakeWiki::new()
        .with_random(&["Cheese", "Dog"])
        .with_page(
            RANDOM_PAGE,
            article("Tea", r#"<p><a href="/wiki/Milk">Milk</a></p>"#),
        );
    let game = game(wiki);

    let started = game.start().unwrap();
    assert_eq!(started.session.begin, "Cheese");
    assert_eq!(started.session.end, "Dog");
    assert_eq!(game.store().lookup(&started.session.id), Some(started.session.clone()));

    // The first page is a fresh random redirect, not the resolved begin title
    assert_eq!(game.wiki().fetched(), vec![RANDOM_PAGE.to_string()]);
    assert!(started.html.contains("You are trying to find Dog"));
    assert!(started
        .html
        .contains(&format!(r#"href="/wiki/{}/Milk""#, started.session.id)));
}

#[test]
fn test_start_allows_same_begin_and_end() {
    let wiki = FakeWiki::new()
        .with_random(&["Cheese", "Cheese"])
        .with_page(RANDOM_PAGE, article("Tea", "<p>tea</p>"));
    let game = game(wiki);

    let started = game.start().unwrap();
    assert_eq!(started.session.begin, started.session.end);
}

#[test]
fn test_start_fails_when_second_resolution_fails() {
    let wiki = FakeWiki::new().with_random(&["Cheese"]).with_random_error();
    let game = game(wiki);

    assert!(matches!(game.start(), Err(GameError::Resolution(_))));
    assert!(game.store().is_empty());
    assert!(game.wiki().fetched().is_empty());
}

#[test]
fn test_navigate_to_target_wins_without_fetch() {
    let game = game(FakeWiki::new());
    let session = game.store().create("Cheese", "Dog");

    assert_eq!(game.navigate(&session.id, "Dog").unwrap(), Outcome::Won);
    assert_eq!(Outcome::Won.into_html(), WIN_MESSAGE);
    assert!(game.wiki().fetched().is_empty());

    // Winning is not sticky; the session stays and can keep navigating
    assert_eq!(game.navigate(&session.id, "Dog").unwrap(), Outcome::Won);
    assert_eq!(game.store().len(), 1);
}

#[test]
fn test_navigate_win_check_is_case_sensitive() {
    let wiki = FakeWiki::new().with_page("dog", article("dog", "<p>lower</p>"));
    let game = game(wiki);
    let session = game.store().create("Cheese", "Dog");

    let outcome = game.navigate(&session.id, "dog").unwrap();
    assert!(matches!(outcome, Outcome::Page(_)));
    assert_eq!(game.wiki().fetched(), vec!["dog".to_string()]);
}

#[test]
fn test_navigate_renders_page() {
    let body = r#"<p><a href="/wiki/Dog">Dog</a> and <a href="http://example.com/">elsewhere</a></p>
<div class="thumb"><img src="a.png"></div>"#;
    let wiki = FakeWiki::new().with_page("Cheese", article("Cheese", body));
    let game = game(wiki);
    let session = game.store().create("Cheese", "Goal");

    let Outcome::Page(html) = game.navigate(&session.id, "Cheese").unwrap() else {
        panic!("expected a rendered page");
    };
    assert!(html.contains("You are trying to find Goal"));
    assert!(html.contains(&format!(r#"<a href="/wiki/{}/Dog">Dog</a>"#, session.id)));
    assert!(html.contains("<b>elsewhere</b>"));
    assert!(!html.contains("<img"));
    assert!(!html.contains("thumb"));
}

#[test]
fn test_navigate_unknown_session() {
    let game = game(FakeWiki::new());
    let err = game.navigate("missing", "Dog").unwrap_err();

    assert!(matches!(err, GameError::SessionNotFound(ref id) if id == "missing"));
    assert!(game.store().is_empty());
    assert!(game.wiki().fetched().is_empty());
}

#[test]
fn test_navigate_fetch_failure_leaves_session() {
    let game = game(FakeWiki::new());
    let session = game.store().create("Cheese", "Dog");

    let err = game.navigate(&session.id, "Nowhere").unwrap_err();
    assert!(matches!(err, GameError::Fetch(_)));
    assert_eq!(game.store().lookup(&session.id), Some(session));
}
