use std::time::Duration;

use siteseek_core::EngineError;

const USER_AGENT: &str = "siteseek-bot/0.1 (+https://example.com/bot)";

/// Transport seam: given an absolute URL, return the raw response bytes or a
/// structured failure. Tests drive the crawler with an in-memory site.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, EngineError>;
}

/// Blocking HTTP transport. The reference crawl is strictly sequential, one
/// request in flight at a time; a timeout expiry surfaces as a network error
/// and the URL lands on the broken list.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, EngineError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, EngineError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| EngineError::Network(format!("{url}: {e}")))?;
        if !resp.status().is_success() {
            return Err(EngineError::Network(format!("{url}: http status {}", resp.status())));
        }
        let bytes = resp.bytes().map_err(|e| EngineError::Network(format!("{url}: {e}")))?;
        Ok(bytes.to_vec())
    }
}
