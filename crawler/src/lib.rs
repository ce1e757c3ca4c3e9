pub mod fetch;
pub mod frontier;
pub mod page;
pub mod robots;

pub use fetch::{Fetch, HttpFetcher};
pub use frontier::{domain_url, CrawlOutcome, CrawlReport, Crawler};
pub use robots::RobotsPolicy;
