use siteseek_core::EngineError;

use crate::fetch::Fetch;

/// Allowed and Disallowed absolute-URL prefixes parsed from the domain's
/// robots.txt. An unreachable or non-UTF-8 policy is fatal to starting a
/// crawl; there is no silent default-allow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RobotsPolicy {
    pub allowed: Vec<String>,
    pub disallowed: Vec<String>,
}

impl RobotsPolicy {
    pub fn fetch(fetcher: &dyn Fetch, seed_url: &str) -> Result<Self, EngineError> {
        let url = format!("{seed_url}/robots.txt");
        let bytes = fetcher
            .fetch(&url)
            .map_err(|e| EngineError::Policy(format!("robots.txt unreachable: {e}")))?;
        let text = String::from_utf8(bytes)
            .map_err(|_| EngineError::Policy("robots.txt is not valid utf-8".into()))?;
        Ok(Self::parse(&text, seed_url))
    }

    /// Directive paths become absolute prefixes under the seed URL. Empty
    /// directive values are the conventional no-op and are skipped.
    pub fn parse(text: &str, seed_url: &str) -> Self {
        let mut policy = RobotsPolicy::default();
        for line in text.lines() {
            let line = line.trim_end_matches('\r').trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(path) = line.strip_prefix("Allow:") {
                let path = path.trim();
                if !path.is_empty() {
                    policy.allowed.push(format!("{seed_url}{path}"));
                }
            } else if let Some(path) = line.strip_prefix("Disallow:") {
                let path = path.trim();
                if !path.is_empty() {
                    policy.disallowed.push(format!("{seed_url}{path}"));
                }
            }
        }
        policy
    }

    /// True when a page's parent directory falls under a disallowed prefix.
    pub fn disallows(&self, parent_dir: &str) -> bool {
        self.disallowed.iter().any(|prefix| parent_dir.starts_with(prefix))
    }
}
