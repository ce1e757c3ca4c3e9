use rand::rngs::StdRng;
use rand::SeedableRng;
use siteseek_core::cluster::cluster_documents;
use siteseek_core::config::{StopWordSet, Thesaurus};
use siteseek_core::persist::{load_index, save_index};
use siteseek_core::rank::QueryEngine;
use siteseek_core::tokenizer::extract_words;
use siteseek_core::{Document, Index};
use tempfile::tempdir;

const DOMAIN: &str = "http://example.com";

fn page(id: &str, title: &str, body: &str, stop: &StopWordSet) -> Document {
    Document {
        id: id.to_string(),
        title: title.to_string(),
        url: format!("{DOMAIN}/{id}.html"),
        words: extract_words(body, stop),
    }
}

fn build_corpus(stop: &StopWordSet) -> Index {
    Index::build(vec![
        page("a", "Rust Guide", "Rust makes systems programming safe and fast.", stop),
        page("b", "Cooking", "A slow braise makes tough cuts tender and rich.", stop),
        page("c", "Compilers", "The compiler checks programs before running them.", stop),
    ])
}

#[test]
fn words_flow_from_text_to_matrix_to_ranked_hits() {
    let stop = StopWordSet::from_words(["a", "and", "the"]);
    let mut index = build_corpus(&stop);

    assert_eq!(index.matrix.len(), index.vocabulary.len());
    for row in &index.matrix {
        assert_eq!(row.len(), index.doc_count);
    }

    let thesaurus = Thesaurus::default();
    let engine = QueryEngine::new(&index, &stop, &thesaurus, DOMAIN);
    let hits = engine.process("compiler", 6).unwrap();
    assert!(!hits.is_empty());
    assert_eq!(hits[0].url, "/c.html");
    assert!(hits[0].score > 0.0);

    // cluster the same matrix and persist the whole artifact
    let mut rng = StdRng::seed_from_u64(11);
    index.clusters = Some(cluster_documents(&index.matrix, 1, &mut rng));

    let dir = tempdir().unwrap();
    let path = dir.path().join("index.bin");
    save_index(&path, &index).unwrap();
    assert_eq!(load_index(&path).unwrap(), index);
}

#[test]
fn thesaurus_widens_a_sparse_query() {
    let stop = StopWordSet::from_words(["a", "and", "the"]);
    let index = build_corpus(&stop);
    let thesaurus = Thesaurus::from_entries([("toolchain", vec!["compiler", "rust"])]);
    let engine = QueryEngine::new(&index, &stop, &thesaurus, DOMAIN);

    // "toolchain" is out of vocabulary, so the first pass is empty and the
    // expanded pass matches through its alternatives.
    let hits = engine.process("toolchain", 6).unwrap();
    assert!(hits.len() >= 2);
}

#[test]
fn failed_load_leaves_the_previous_index_usable() {
    let stop = StopWordSet::default();
    let index = build_corpus(&stop);

    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.bin");
    assert!(load_index(&missing).is_err());

    // the in-memory value is untouched and still answers queries
    let thesaurus = Thesaurus::default();
    let engine = QueryEngine::new(&index, &stop, &thesaurus, DOMAIN);
    assert!(!engine.process("compiler", 6).unwrap().is_empty());
}
