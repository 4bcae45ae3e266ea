//! Article rewriting.
//!
//! Turns a fetched article document into the fragment served to a player:
//! - a hint naming the target is injected into the page heading
//! - the heading is moved to the top of the content container
//! - thumbnails, images and section-edit links are removed
//! - external links are flattened to bold text
//! - internal `/wiki/` links are rewritten to carry the session id

use crate::error::GameError;
use crate::session::Session;
use crate::wiki::Encyclopedia;
use kuchikiki::traits::TendrilSink;
use kuchikiki::NodeRef;
use tracing::warn;

/// Path prefix of internal article links
pub const ARTICLE_PREFIX: &str = "/wiki/";

const HEADING: &str = "#firstHeading";
const CONTENT: &str = "#mw-content-text";
const STRIPPED: [&str; 3] = [".thumb", "img", ".mw-editsection"];
const EXTERNAL_LINKS: &str = "a[href^='http']";

/// Fetch `title` and rewrite it for `session`.
pub fn render<E: Encyclopedia + ?Sized>(
    wiki: &E,
    session: &Session,
    title: &str,
) -> Result<String, GameError> {
    let html = wiki.fetch_page(title)?;
    render_page(&html, session)
}

/// Rewrite an already fetched article document for `session`.
pub fn render_page(html: &str, session: &Session) -> Result<String, GameError> {
    let document = kuchikiki::parse_html().one(html);

    let content = document
        .select_first(CONTENT)
        .map(|c| c.as_node().clone())
        .map_err(|_| GameError::Fetch(format!("document has no {} element", CONTENT)))?;

    match document.select_first(HEADING) {
        Ok(heading) => {
            let heading = heading.as_node().clone();
            if let Some(hint) = hint_banner(&session.end) {
                heading.prepend(hint);
            }
            // prepend() detaches the heading from its old place first
            content.prepend(heading);
        }
        Err(()) => warn!(session = %session.id, "article has no heading; hint not injected"),
    }

    for selector in STRIPPED {
        for node in select_all(&content, selector) {
            node.detach();
        }
    }

    for link in select_all(&content, EXTERNAL_LINKS) {
        let Some(bold) = element("b") else {
            continue;
        };
        bold.append(NodeRef::new_text(link.text_contents()));
        link.insert_before(bold);
        link.detach();
    }

    if let Ok(links) = content.select("a") {
        for link in links {
            let mut attrs = link.attributes.borrow_mut();
            let rewritten = attrs.get("href").map(|href| rewrite_href(href, &session.id));
            if let Some(href) = rewritten {
                attrs.insert("href", href);
            }
        }
    }

    Ok(inner_html(&content))
}

/// Insert `{session_id}/` after every `/wiki/` in `href`.
///
/// Occurrences already followed by the session id are left alone, so
/// rewriting twice gives the same result as rewriting once.
pub fn rewrite_href(href: &str, session_id: &str) -> String {
    let qualified = format!("{}/", session_id);
    let mut out = String::with_capacity(href.len() + qualified.len());
    let mut rest = href;

    while let Some(pos) = rest.find(ARTICLE_PREFIX) {
        let split = pos + ARTICLE_PREFIX.len();
        out.push_str(&rest[..split]);
        rest = &rest[split..];
        if !rest.starts_with(&qualified) {
            out.push_str(&qualified);
        }
    }
    out.push_str(rest);
    out
}

fn hint_banner(target: &str) -> Option<NodeRef> {
    let hint = element("h1")?;
    hint.append(NodeRef::new_text(format!("You are trying to find {}", target)));
    Some(hint)
}

/// Build a detached, empty element by parsing it.
fn element(tag: &str) -> Option<NodeRef> {
    let document = kuchikiki::parse_html().one(format!("<{tag}></{tag}>"));
    let node = document.select_first(tag).ok()?.as_node().clone();
    node.detach();
    Some(node)
}

/// Collect matches up front so the tree can be mutated while walking them.
fn select_all(root: &NodeRef, selector: &str) -> Vec<NodeRef> {
    match root.select(selector) {
        Ok(found) => found.map(|el| el.as_node().clone()).collect(),
        Err(()) => Vec::new(),
    }
}

fn inner_html(node: &NodeRef) -> String {
    node.children().map(|child| child.to_string()).collect()
}
