use thiserror::Error;

/// Failure kinds across the crawl/index/query pipeline.
///
/// Only `Policy` (robots.txt unreachable or malformed) and a failed index
/// save abort the current operation; everything else degrades gracefully
/// and leaves the previous state in place.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Stop-word or thesaurus file could not be read or parsed. The
    /// corresponding configuration stays unset.
    #[error("config error: {0}")]
    Config(String),

    /// A page fetch failed. Recorded as a broken URL; the crawl continues.
    #[error("network error: {0}")]
    Network(String),

    /// robots.txt was unreachable or malformed. Fatal to starting a crawl.
    #[error("robots policy error: {0}")]
    Policy(String),

    /// The index blob could not be written or read back.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// A query token failed the valid-word pattern. No scoring is performed.
    #[error("invalid query: {0}")]
    QueryValidation(String),
}
