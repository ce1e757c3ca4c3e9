use rand::Rng;

use crate::index::Cluster;

/// Single-pass leader/follower clustering over the frequency matrix.
///
/// The matrix is transposed into per-document vectors and min-max normalized
/// with the global matrix minimum and maximum. `k` leaders are sampled
/// uniformly without replacement from the injected rng; every other document
/// is assigned to the leader with strictly minimal Euclidean distance, ties
/// going to the first leader in sample order. There is no re-centering; this
/// is a summarization aid, not an input to ranking.
///
/// When there are fewer documents than requested leaders, the leader count
/// drops to `doc_count / 2`.
pub fn cluster_documents<R: Rng + ?Sized>(
    matrix: &[Vec<u32>],
    k: usize,
    rng: &mut R,
) -> Vec<Cluster> {
    let doc_count = matrix.first().map_or(0, Vec::len);
    if doc_count == 0 {
        return Vec::new();
    }

    let docs = normalized_doc_vectors(matrix, doc_count);

    let k = if doc_count < k {
        let reduced = doc_count / 2;
        tracing::warn!(doc_count, requested = k, reduced, "not enough documents to pick leaders");
        reduced
    } else {
        k
    };
    if k == 0 {
        return Vec::new();
    }

    let leaders = rand::seq::index::sample(rng, doc_count, k).into_vec();
    let mut clusters: Vec<Cluster> = leaders
        .iter()
        .map(|&leader| Cluster { leader, followers: Vec::new() })
        .collect();

    for follower in (0..doc_count).filter(|d| !leaders.contains(d)) {
        let mut min_dist = f64::MAX;
        let mut min_cluster = 0usize;
        for (ci, &leader) in leaders.iter().enumerate() {
            let dist = euclidean_distance(&docs[follower], &docs[leader]);
            if dist < min_dist {
                min_dist = dist;
                min_cluster = ci;
            }
        }
        clusters[min_cluster].followers.push((follower, min_dist));
    }

    clusters
}

/// Transpose to per-document vectors, scaling every cell into [0, 1] by the
/// global matrix extrema. A constant matrix maps to all zeros.
fn normalized_doc_vectors(matrix: &[Vec<u32>], doc_count: usize) -> Vec<Vec<f64>> {
    let mut lo = u32::MAX;
    let mut hi = u32::MIN;
    for row in matrix {
        for &cell in row {
            lo = lo.min(cell);
            hi = hi.max(cell);
        }
    }
    let range = f64::from(hi.saturating_sub(lo));

    (0..doc_count)
        .map(|col| {
            matrix
                .iter()
                .map(|row| {
                    if range > 0.0 {
                        f64::from(row[col] - lo) / range
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect()
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum::<f64>().sqrt()
}
