use std::collections::HashMap;

use siteseek_core::config::StopWordSet;
use siteseek_core::EngineError;
use siteseek_crawler::{Crawler, Fetch};

const SEED: &str = "http://example.com";

/// In-memory site keyed by absolute URL; absent URLs fail like a 404.
struct StubSite {
    pages: HashMap<String, Vec<u8>>,
}

impl StubSite {
    fn new() -> Self {
        Self { pages: HashMap::new() }
    }

    fn page(mut self, path: &str, body: &str) -> Self {
        self.pages.insert(format!("{SEED}{path}"), body.as_bytes().to_vec());
        self
    }

    fn robots(self, body: &str) -> Self {
        self.page("/robots.txt", body)
    }
}

impl Fetch for StubSite {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, EngineError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| EngineError::Network(format!("{url}: http status 404")))
    }
}

fn html(title: &str, body: &str) -> String {
    format!("<html><head><title>{title}</title></head><body>{body}</body></html>")
}

fn four_page_site() -> StubSite {
    StubSite::new()
        .robots("User-agent: *\n")
        .page(
            "/",
            &html("A", r#"alpha words <a href="b.html">b</a> <a href="c.html">c</a>"#),
        )
        .page("/b.html", &html("B", r#"beta words <a href="d.html">d</a>"#))
        .page("/c.html", &html("C", "gamma words"))
        .page("/d.html", &html("D", "delta words"))
}

#[test]
fn crawls_four_pages_breadth_first() {
    let site = four_page_site();
    let stop = StopWordSet::default();
    let crawler = Crawler::new(SEED, 10, &site, &stop).unwrap();
    let outcome = crawler.run().unwrap();

    assert_eq!(outcome.documents.len(), 4);
    assert_eq!(outcome.report.pages_indexed, 4);
    assert_eq!(outcome.report.pages_crawled, 4);
    assert!(outcome.report.broken_urls.is_empty());
    assert!(outcome.report.outgoing_urls.is_empty());

    // breadth-first: root first, then its links, then b's link
    let urls: Vec<&str> = outcome.documents.iter().map(|d| d.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "http://example.com/",
            "http://example.com/b.html",
            "http://example.com/c.html",
            "http://example.com/d.html",
        ]
    );
    assert_eq!(outcome.documents[0].title, "A");
    assert!(outcome.documents[0].words.contains(&"alpha".to_string()));
}

#[test]
fn identical_content_maps_to_one_document() {
    let dup = html("Same", "identical words here");
    let site = StubSite::new()
        .robots("User-agent: *\n")
        .page(
            "/",
            &html("Root", r#"<a href="b.html">b</a> <a href="c.html">c</a>"#),
        )
        .page("/b.html", &dup)
        .page("/c.html", &dup);
    let stop = StopWordSet::default();
    let crawler = Crawler::new(SEED, 10, &site, &stop).unwrap();
    let outcome = crawler.run().unwrap();

    // root plus one document for the shared content
    assert_eq!(outcome.documents.len(), 2);
    // the canonical URL is the first one fetched
    assert_eq!(outcome.documents[1].url, "http://example.com/b.html");
    // but both URLs were visited and grouped
    assert_eq!(outcome.report.pages_indexed, 3);
    let groups = outcome.report.duplicate_groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].1,
        vec!["http://example.com/b.html".to_string(), "http://example.com/c.html".to_string()]
    );
}

#[test]
fn out_of_scope_links_are_recorded_once_and_never_fetched() {
    let site = StubSite::new().robots("User-agent: *\n").page(
        "/",
        &html(
            "Root",
            r#"<a href="http://other.org/x.html">x</a> <a href="http://other.org/x.html">x again</a>"#,
        ),
    );
    let stop = StopWordSet::default();
    let crawler = Crawler::new(SEED, 10, &site, &stop).unwrap();
    let outcome = crawler.run().unwrap();

    assert_eq!(outcome.report.outgoing_urls, vec!["http://other.org/x.html".to_string()]);
    // never fetched, so it cannot show up as broken or visited
    assert!(outcome.report.broken_urls.is_empty());
    assert!(!outcome.report.visited.contains_key("http://other.org/x.html"));
}

#[test]
fn seed_prefixed_foreign_hosts_stay_out_of_scope() {
    // "http://example.common.evil" string-prefixes the seed but is a
    // different host; it must be classified outgoing, never fetched.
    let site = StubSite::new().robots("User-agent: *\n").page(
        "/",
        &html("Root", r#"<a href="http://example.common.evil/x.html">evil</a>"#),
    );
    let stop = StopWordSet::default();
    let crawler = Crawler::new(SEED, 10, &site, &stop).unwrap();
    let outcome = crawler.run().unwrap();

    assert!(!outcome.report.visited.contains_key("http://example.common.evil/x.html"));
    assert_eq!(
        outcome.report.outgoing_urls,
        vec!["http://example.common.evil/x.html".to_string()]
    );
    assert!(outcome.report.broken_urls.is_empty());
    assert_eq!(outcome.documents.len(), 1);
}

#[test]
fn robots_disallow_skips_without_fetching() {
    let site = StubSite::new()
        .robots("User-agent: *\nDisallow: /private/\n")
        .page(
            "/",
            &html("Root", r#"<a href="private/secret.html">s</a> <a href="b.html">b</a>"#),
        )
        .page("/b.html", &html("B", "open words"))
        .page("/private/secret.html", &html("Secret", "hidden words"));
    let stop = StopWordSet::default();
    let crawler = Crawler::new(SEED, 10, &site, &stop).unwrap();
    let outcome = crawler.run().unwrap();

    assert!(!outcome.report.visited.contains_key("http://example.com/private/secret.html"));
    assert!(outcome.report.broken_urls.is_empty());
    let titles: Vec<&str> = outcome.documents.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["Root", "B"]);
}

#[test]
fn unreachable_robots_is_fatal() {
    let site = StubSite::new().page("/", &html("Root", "words"));
    let stop = StopWordSet::default();
    let crawler = Crawler::new(SEED, 10, &site, &stop).unwrap();
    let err = crawler.run().unwrap_err();
    assert!(matches!(err, EngineError::Policy(_)));
}

#[test]
fn broken_links_are_recorded_idempotently() {
    let site = StubSite::new().robots("User-agent: *\n").page(
        "/",
        &html(
            "Root",
            r#"<a href="http://">bad</a> <a href="http://">bad again</a> <a href="missing.html">gone</a>"#,
        ),
    );
    let stop = StopWordSet::default();
    let crawler = Crawler::new(SEED, 10, &site, &stop).unwrap();
    let outcome = crawler.run().unwrap();

    // the malformed href once, plus the in-scope 404 once
    assert_eq!(
        outcome.report.broken_urls,
        vec!["http://".to_string(), "http://example.com/missing.html".to_string()]
    );
}

#[test]
fn page_limit_caps_indexed_pages_only() {
    let site = StubSite::new()
        .robots("User-agent: *\n")
        .page("/", &html("Root", r#"<a href="b.html">b</a>"#))
        .page("/b.html", &html("B", r#"<a href="c.html">c</a>"#))
        .page("/c.html", &html("C", r#"<a href="d.html">d</a>"#))
        .page("/d.html", &html("D", "end"));
    let stop = StopWordSet::default();
    let crawler = Crawler::new(SEED, 2, &site, &stop).unwrap();
    let outcome = crawler.run().unwrap();

    assert_eq!(outcome.report.pages_indexed, 2);
    assert_eq!(outcome.documents.len(), 2);
}

#[test]
fn images_are_classified_not_indexed() {
    let site = StubSite::new()
        .robots("User-agent: *\n")
        .page("/", &html("Root", r#"<a href="logo.png">logo</a>"#))
        .page("/logo.png", "not really a png");
    let stop = StopWordSet::default();
    let crawler = Crawler::new(SEED, 10, &site, &stop).unwrap();
    let outcome = crawler.run().unwrap();

    assert_eq!(outcome.report.graphic_urls, vec!["http://example.com/logo.png".to_string()]);
    // visited and counted as crawled, but no document and no index count
    assert_eq!(outcome.report.pages_crawled, 2);
    assert_eq!(outcome.report.pages_indexed, 1);
    assert_eq!(outcome.documents.len(), 1);
}

#[test]
fn stop_words_never_reach_the_document() {
    let site = StubSite::new()
        .robots("User-agent: *\n")
        .page("/", &html("Root", "the alpha and the omega"));
    let stop = StopWordSet::from_words(["the", "and"]);
    let crawler = Crawler::new(SEED, 10, &site, &stop).unwrap();
    let outcome = crawler.run().unwrap();

    assert_eq!(outcome.documents[0].words, vec!["alpha".to_string(), "omega".to_string()]);
}
