use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::tokenizer;

/// Hex SHA-256 of the raw fetched bytes. Two URLs serving identical content
/// share one id.
pub type DocId = String;

/// A unique fetched content unit. Never mutated after creation; the URL is
/// the first one observed producing this content hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub url: String,
    /// Valid body words in page order, stop words already removed.
    pub words: Vec<String>,
}

/// One leader with its assigned followers, in follower-processing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Column index of the leader document.
    pub leader: usize,
    /// `(follower column index, Euclidean distance to the leader)`.
    pub followers: Vec<(usize, f64)>,
}

/// The durable artifact of a crawl: everything the ranking and clustering
/// engines read, and the only state that survives serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Index {
    /// Documents in insertion order; position is the matrix column.
    pub documents: Vec<Document>,
    /// Sorted unique stems; position is the matrix row.
    pub vocabulary: Vec<String>,
    /// `matrix[term][doc]` = occurrences of the stemmed term in the document.
    pub matrix: Vec<Vec<u32>>,
    /// Per-term row totals. Deliberately the sum of raw counts across all
    /// documents rather than a distinct-document count; the tf-idf formula
    /// depends on this exact definition.
    pub df: Vec<u32>,
    pub doc_count: usize,
    pub clusters: Option<Vec<Cluster>>,
}

impl Index {
    /// Build the vocabulary and term-document frequency matrix from the
    /// crawled documents. The whole structure is rebuilt wholesale; there is
    /// no incremental update.
    pub fn build(documents: Vec<Document>) -> Self {
        let stemmed: Vec<Vec<String>> = documents
            .iter()
            .map(|d| d.words.iter().map(|w| tokenizer::stem(w)).collect())
            .collect();

        let vocabulary: Vec<String> = stemmed
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();

        let term_row: HashMap<&str, usize> =
            vocabulary.iter().enumerate().map(|(row, term)| (term.as_str(), row)).collect();

        let mut matrix = vec![vec![0u32; documents.len()]; vocabulary.len()];
        for (col, words) in stemmed.iter().enumerate() {
            for word in words {
                matrix[term_row[word.as_str()]][col] += 1;
            }
        }

        let df: Vec<u32> = matrix.iter().map(|row| row.iter().sum()).collect();

        tracing::info!(
            docs = documents.len(),
            terms = vocabulary.len(),
            "frequency matrix built"
        );

        Index { doc_count: documents.len(), documents, vocabulary, matrix, df, clusters: None }
    }

    /// Row index of a stemmed term, if it occurs in any document.
    pub fn term_row(&self, stem: &str) -> Option<usize> {
        self.vocabulary.binary_search_by(|t| t.as_str().cmp(stem)).ok()
    }

    /// Column of the frequency matrix as a document term vector.
    pub fn doc_vector(&self, col: usize) -> Vec<u32> {
        self.matrix.iter().map(|row| row[col]).collect()
    }
}
