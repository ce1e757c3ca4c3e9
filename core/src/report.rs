use crate::index::Index;

/// CSV-shaped term frequency table: a header row of document labels, then
/// one row per term with its per-document counts.
pub fn frequency_matrix_csv(index: &Index) -> String {
    let mut out = String::from(",");
    for col in 0..index.doc_count {
        out.push_str(&format!("Doc{col},"));
    }
    out.push('\n');
    for (term, row) in index.vocabulary.iter().zip(&index.matrix) {
        out.push_str(term);
        out.push(',');
        out.push_str(&row.iter().map(u32::to_string).collect::<Vec<_>>().join(","));
        out.push('\n');
    }
    out
}

/// The `n` most common terms as `(term, total frequency, document
/// frequency)`, sorted descending by total frequency. Document frequency
/// here is the distinct-document count, as reported to the user; it is not
/// the row-total `df` the ranking formula uses.
pub fn top_terms(index: &Index, n: usize) -> Vec<(String, u32, u32)> {
    let mut rows: Vec<(String, u32, u32)> = index
        .vocabulary
        .iter()
        .zip(&index.matrix)
        .map(|(term, row)| {
            let total = row.iter().sum();
            let doc_freq = row.iter().filter(|&&c| c > 0).count() as u32;
            (term.clone(), total, doc_freq)
        })
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows.truncate(n);
    rows
}
