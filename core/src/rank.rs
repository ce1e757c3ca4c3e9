use std::cmp::Ordering;

use crate::config::{StopWordSet, Thesaurus};
use crate::error::EngineError;
use crate::index::Index;
use crate::tokenizer;

/// Base score for a document whose title shares at least one token with the
/// query, applied before cosine similarity.
pub const TITLE_BONUS: f64 = 0.25;

/// Words of the body kept as the result snippet.
const SNIPPET_WORDS: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub score: f64,
    pub title: String,
    /// Document URL with the domain prefix stripped.
    pub url: String,
    /// First words of the document body.
    pub snippet: String,
}

/// Read-only query processor over a fully built index.
pub struct QueryEngine<'a> {
    index: &'a Index,
    stop_words: &'a StopWordSet,
    thesaurus: &'a Thesaurus,
    domain_url: &'a str,
}

impl<'a> QueryEngine<'a> {
    pub fn new(
        index: &'a Index,
        stop_words: &'a StopWordSet,
        thesaurus: &'a Thesaurus,
        domain_url: &'a str,
    ) -> Self {
        Self { index, stop_words, thesaurus, domain_url }
    }

    /// Rank documents against `raw_query`, returning at most `k` hits with
    /// strictly positive scores, descending.
    ///
    /// Two-phase pipeline: score once, and if fewer than `k/2` hits come
    /// back, rewrite the query with thesaurus alternatives and score exactly
    /// one more time. The second pass runs even when the rewrite added
    /// nothing, and its outcome is final.
    pub fn process(&self, raw_query: &str, k: usize) -> Result<Vec<Hit>, EngineError> {
        validate_query(raw_query)?;

        let mut hits = self.score_pass(raw_query);
        if hits.len() * 2 < k {
            let rewritten = self.expand_query(raw_query);
            tracing::info!(query = %rewritten, "thesaurus expansion");
            hits = self.score_pass(&rewritten);
        }
        hits.truncate(k);
        Ok(hits)
    }

    /// Append, for every original query term present in the thesaurus, its
    /// alternatives not already in the query.
    fn expand_query(&self, raw_query: &str) -> String {
        let mut terms: Vec<String> = raw_query.split_whitespace().map(str::to_string).collect();
        let originals = terms.clone();
        for term in &originals {
            if let Some(alternatives) = self.thesaurus.alternatives(term) {
                for alt in alternatives {
                    if !terms.iter().any(|t| t == alt) {
                        terms.push(alt.clone());
                    }
                }
            }
        }
        terms.join(" ")
    }

    fn score_pass(&self, query: &str) -> Vec<Hit> {
        let mut scores = vec![0.0f64; self.index.doc_count];

        // Title bonus: one shared token, case-insensitive, is enough.
        let query_tokens: Vec<String> =
            query.split_whitespace().map(|t| t.to_lowercase()).collect();
        for (col, doc) in self.index.documents.iter().enumerate() {
            let title = doc.title.to_lowercase();
            if title.split_whitespace().any(|t| query_tokens.iter().any(|q| q == t)) {
                scores[col] = TITLE_BONUS;
            }
        }

        let query_vector = self.query_vector(query);
        for col in 0..self.index.doc_count {
            let doc_vector = self.index.doc_vector(col);
            scores[col] += cosine_similarity(
                &query_vector,
                &doc_vector,
                self.index.doc_count,
                &self.index.df,
            );
        }

        // Stable descending sort keeps document insertion order for ties.
        let mut order: Vec<usize> = (0..self.index.doc_count).collect();
        order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal));

        order
            .into_iter()
            .filter(|&col| scores[col] > 0.0)
            .map(|col| {
                let doc = &self.index.documents[col];
                Hit {
                    score: scores[col],
                    title: doc.title.clone(),
                    url: doc.url.replace(self.domain_url, ""),
                    snippet: doc
                        .words
                        .iter()
                        .take(SNIPPET_WORDS)
                        .cloned()
                        .collect::<Vec<_>>()
                        .join(" "),
                }
            })
            .collect()
    }

    /// Normalize the query into a vocabulary-aligned term-frequency vector:
    /// split, drop stop words, stem, drop out-of-vocabulary stems, count.
    fn query_vector(&self, query: &str) -> Vec<u32> {
        let mut vector = vec![0u32; self.index.vocabulary.len()];
        for token in query.split_whitespace() {
            let token = token.to_lowercase();
            if self.stop_words.contains(&token) {
                continue;
            }
            if let Some(row) = self.index.term_row(&tokenizer::stem(&token)) {
                vector[row] += 1;
            }
        }
        vector
    }
}

/// Every whitespace-delimited token must be a valid word.
pub fn validate_query(query: &str) -> Result<(), EngineError> {
    for token in query.split_whitespace() {
        if !tokenizer::is_valid_word(token) {
            return Err(EngineError::QueryValidation(format!("bad token `{token}`")));
        }
    }
    Ok(())
}

/// Log-weighted tf-idf of a raw count vector: `(1 + log10(c)) * log10(N/df)`
/// for `c > 0`, else `0`.
pub fn tf_idf(counts: &[u32], doc_count: usize, df: &[u32]) -> Vec<f64> {
    counts
        .iter()
        .enumerate()
        .map(|(row, &c)| {
            if c > 0 {
                (1.0 + f64::from(c).log10()) * (doc_count as f64 / f64::from(df[row])).log10()
            } else {
                0.0
            }
        })
        .collect()
}

/// L2-normalize in place; an all-zero vector stays all-zero.
pub fn l2_normalize(mut v: Vec<f64>) -> Vec<f64> {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

/// Cosine similarity of two raw count vectors under tf-idf weighting.
pub fn cosine_similarity(query: &[u32], doc: &[u32], doc_count: usize, df: &[u32]) -> f64 {
    let q = l2_normalize(tf_idf(query, doc_count, df));
    let d = l2_normalize(tf_idf(doc, doc_count, df));
    q.iter().zip(&d).map(|(a, b)| a * b).sum()
}
