use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};

use crate::config::StopWordSet;

lazy_static! {
    // A valid word starts with an alphabetic character, ends with an
    // alphabetic or numeric character, and may contain anything in between.
    static ref VALID_WORD: Regex = Regex::new(r"^[A-Za-z]\S*[A-Za-z0-9]$").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
}

const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

pub fn is_valid_word(word: &str) -> bool {
    VALID_WORD.is_match(word)
}

/// Stem a single lowercase token (Porter family).
pub fn stem(word: &str) -> String {
    STEMMER.stem(word).to_string()
}

/// Extract the indexable words of a page body: lowercase, strip ASCII
/// punctuation, split on whitespace, then keep only valid words that are
/// not stop words. Order is preserved.
pub fn extract_words(text: &str, stop_words: &StopWordSet) -> Vec<String> {
    let lowered = text.to_lowercase();
    let stripped: String = lowered.chars().filter(|c| !PUNCTUATION.contains(*c)).collect();
    stripped
        .split_whitespace()
        .filter(|w| is_valid_word(w) && !stop_words.contains(w))
        .map(|w| w.to_string())
        .collect()
}
