use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fmt;

use sha2::{Digest, Sha256};
use siteseek_core::config::StopWordSet;
use siteseek_core::{tokenizer, DocId, Document, EngineError};
use url::Url;

use crate::fetch::Fetch;
use crate::page;
use crate::robots::RobotsPolicy;

/// Suffixes treated as text/HTML pages whose words are indexed and whose
/// links are followed.
const TEXT_EXTENSIONS: &[&str] = &["/", ".html", ".htm", ".php", ".txt"];
/// Suffixes recorded as graphic assets; visited but never indexed.
const IMAGE_EXTENSIONS: &[&str] = &[".gif", ".png", ".jpeg", ".jpg"];

/// Breadth-first crawl session over a single bounded domain.
///
/// Owns all transient frontier state for the duration of one crawl and
/// produces the document set plus a classification report; the durable
/// index is built separately from the documents.
pub struct Crawler<'a> {
    seed_url: String,
    domain_url: String,
    page_limit: usize,
    fetcher: &'a dyn Fetch,
    stop_words: &'a StopWordSet,
}

/// Documents plus the classification lists gathered along the way.
#[derive(Debug)]
pub struct CrawlOutcome {
    pub documents: Vec<Document>,
    pub report: CrawlReport,
}

#[derive(Debug, Default, Clone)]
pub struct CrawlReport {
    /// Pages fetched successfully, indexed or not.
    pub pages_crawled: usize,
    /// Text pages whose words were stored; this is what the page limit caps.
    pub pages_indexed: usize,
    /// URL -> (title, document id) for every fetched page.
    pub visited: HashMap<String, (String, DocId)>,
    /// Valid links leaving the crawl domain, each recorded once.
    pub outgoing_urls: Vec<String>,
    /// Unreachable or syntactically invalid URLs, each recorded once.
    pub broken_urls: Vec<String>,
    /// In-scope image assets.
    pub graphic_urls: Vec<String>,
}

impl CrawlReport {
    /// Document ids reached from more than one URL, with their URL groups.
    pub fn duplicate_groups(&self) -> Vec<(DocId, Vec<String>)> {
        let mut groups: BTreeMap<DocId, Vec<String>> = BTreeMap::new();
        for (url, (_, doc_id)) in &self.visited {
            groups.entry(doc_id.clone()).or_default().push(url.clone());
        }
        let mut out: Vec<(DocId, Vec<String>)> =
            groups.into_iter().filter(|(_, urls)| urls.len() > 1).collect();
        for (_, urls) in &mut out {
            urls.sort();
        }
        out
    }
}

impl fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pages crawled: {}", self.pages_crawled)?;
        writeln!(f, "Pages indexed: {}", self.pages_indexed)?;
        writeln!(f, "Visited URLs: {}", self.visited.len())?;
        writeln!(f, "\nOutgoing URLs:")?;
        for url in &self.outgoing_urls {
            writeln!(f, "  +  {url}")?;
        }
        writeln!(f, "\nBroken URLs:")?;
        for url in &self.broken_urls {
            writeln!(f, "  +  {url}")?;
        }
        writeln!(f, "\nGraphic URLs:")?;
        for url in &self.graphic_urls {
            writeln!(f, "  +  {url}")?;
        }
        writeln!(f, "\nDuplicate URLs:")?;
        for (n, (_, urls)) in self.duplicate_groups().iter().enumerate() {
            writeln!(f, "\t +  Doc{}:", n + 1)?;
            for url in urls {
                writeln!(f, "\t\t  +  {url}")?;
            }
        }
        Ok(())
    }
}

impl<'a> Crawler<'a> {
    /// A crawl of fewer than two pages is refused up front.
    pub fn new(
        seed_url: &str,
        page_limit: usize,
        fetcher: &'a dyn Fetch,
        stop_words: &'a StopWordSet,
    ) -> Result<Self, EngineError> {
        if page_limit < 2 {
            return Err(EngineError::Config(format!(
                "page limit must be at least 2, got {page_limit}"
            )));
        }
        Ok(Self {
            seed_url: seed_url.trim_end_matches('/').to_string(),
            domain_url: domain_url(seed_url),
            page_limit,
            fetcher,
            stop_words,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain_url
    }

    /// In scope means the seed URL followed by a path boundary; a plain
    /// string prefix would also admit foreign hosts like
    /// `http://example.common.evil` under seed `http://example.com`.
    fn in_scope(&self, target: &str) -> bool {
        match target.strip_prefix(&self.seed_url) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// Run the crawl to completion. Only a robots policy failure aborts;
    /// per-page failures are recorded and the frontier keeps draining.
    pub fn run(&self) -> Result<CrawlOutcome, EngineError> {
        let robots = RobotsPolicy::fetch(self.fetcher, &self.seed_url)?;
        tracing::info!(
            allowed = robots.allowed.len(),
            disallowed = robots.disallowed.len(),
            "robots policy loaded"
        );

        let mut frontier: VecDeque<String> = VecDeque::new();
        frontier.push_back(format!("{}/", self.seed_url));

        let mut report = CrawlReport::default();
        let mut documents: Vec<Document> = Vec::new();
        let mut known_ids: HashSet<DocId> = HashSet::new();

        while report.pages_indexed < self.page_limit {
            let Some(current) = frontier.pop_front() else { break };
            let parent_dir = parent_directory(&current);

            if robots.disallows(&parent_dir) {
                println!("Not allowed: {}", current.replace(&self.domain_url, ""));
                continue;
            }

            let bytes = match self.fetcher.fetch(&current) {
                Ok(bytes) => bytes,
                Err(err) => {
                    tracing::warn!(url = %current, %err, "fetch failed");
                    push_unique(&mut report.broken_urls, current);
                    continue;
                }
            };

            let doc_id = content_hash(&bytes);
            let parsed = page::parse_page(&bytes);
            let title = parsed
                .title
                .clone()
                .unwrap_or_else(|| current.strip_prefix(&parent_dir).unwrap_or(&current).to_string());

            report.visited.insert(current.clone(), (title.clone(), doc_id.clone()));
            report.pages_crawled += 1;
            println!(
                "{}. Visiting: {} ({title})",
                report.pages_crawled,
                current.replace(&self.domain_url, "")
            );

            let lower = current.to_lowercase();
            if TEXT_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
                // First unseen hash creates the Document; later URLs with the
                // same content only join its duplicate group via `visited`.
                if known_ids.insert(doc_id.clone()) {
                    documents.push(Document {
                        id: doc_id,
                        title,
                        url: current.clone(),
                        words: tokenizer::extract_words(&parsed.text, self.stop_words),
                    });
                }
                report.pages_indexed += 1;

                for href in &parsed.links {
                    match resolve_link(&parent_dir, href) {
                        Some(target) => {
                            if self.in_scope(&target) {
                                if !report.visited.contains_key(&target)
                                    && !frontier.contains(&target)
                                {
                                    frontier.push_back(target);
                                }
                            } else {
                                push_unique(&mut report.outgoing_urls, target);
                            }
                        }
                        None => push_unique(&mut report.broken_urls, href.clone()),
                    }
                }
            } else if IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
                report.graphic_urls.push(current);
            }
        }

        tracing::info!(
            crawled = report.pages_crawled,
            indexed = report.pages_indexed,
            broken = report.broken_urls.len(),
            outgoing = report.outgoing_urls.len(),
            "crawl finished"
        );
        Ok(CrawlOutcome { documents, report })
    }
}

/// Scheme and host of a seed URL, e.g. `http://example.com/sub` ->
/// `http://example.com`. Results strip this prefix from displayed URLs.
pub fn domain_url(seed_url: &str) -> String {
    seed_url.split('/').take(3).collect::<Vec<_>>().join("/")
}

/// Everything up to and including the last slash.
fn parent_directory(url: &str) -> String {
    match url.rfind('/') {
        Some(i) => url[..=i].to_string(),
        None => url.to_string(),
    }
}

fn content_hash(bytes: &[u8]) -> DocId {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Resolve an anchor target against the page directory; `None` marks a
/// syntactically invalid target.
fn resolve_link(parent_dir: &str, href: &str) -> Option<String> {
    let base = Url::parse(parent_dir).ok()?;
    let resolved = base.join(href).ok()?;
    if !matches!(resolved.scheme(), "http" | "https" | "ftp" | "ftps") {
        return None;
    }
    resolved.host_str()?;
    Some(resolved.to_string())
}

fn push_unique(list: &mut Vec<String>, url: String) {
    if !list.contains(&url) {
        list.push(url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_is_scheme_and_host() {
        assert_eq!(domain_url("http://example.com/sub/dir"), "http://example.com");
        assert_eq!(domain_url("https://example.com"), "https://example.com");
    }

    #[test]
    fn parent_directory_keeps_trailing_slash() {
        assert_eq!(parent_directory("http://e.com/a/b.html"), "http://e.com/a/");
        assert_eq!(parent_directory("http://e.com/"), "http://e.com/");
    }

    #[test]
    fn relative_links_resolve_against_the_page_directory() {
        assert_eq!(
            resolve_link("http://e.com/a/", "b.html").as_deref(),
            Some("http://e.com/a/b.html")
        );
        assert_eq!(
            resolve_link("http://e.com/a/", "http://other.org/x").as_deref(),
            Some("http://other.org/x")
        );
        assert_eq!(resolve_link("http://e.com/a/", "mailto:x@y.z"), None);
        assert_eq!(resolve_link("http://e.com/a/", "http://"), None);
    }

    #[test]
    fn page_limit_below_two_is_rejected() {
        struct NoFetch;
        impl Fetch for NoFetch {
            fn fetch(&self, _url: &str) -> Result<Vec<u8>, EngineError> {
                unreachable!("constructor must fail first")
            }
        }
        let stop = StopWordSet::default();
        assert!(matches!(
            Crawler::new("http://example.com", 1, &NoFetch, &stop),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn scope_requires_a_path_boundary_after_the_seed() {
        struct NoFetch;
        impl Fetch for NoFetch {
            fn fetch(&self, _url: &str) -> Result<Vec<u8>, EngineError> {
                Err(EngineError::Network("offline".into()))
            }
        }
        let stop = StopWordSet::default();
        let crawler = Crawler::new("http://example.com", 10, &NoFetch, &stop).unwrap();
        assert!(crawler.in_scope("http://example.com"));
        assert!(crawler.in_scope("http://example.com/a/b.html"));
        assert!(!crawler.in_scope("http://example.common.evil/x.html"));
        assert!(!crawler.in_scope("http://other.org/"));
    }
}
