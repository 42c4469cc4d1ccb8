//! Negative edge sampling from a relation's non-edge product space.

use std::collections::HashSet;

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// When the requested count is at least this fraction of the available
/// non-edges, candidates are enumerated instead of rejection-sampled.
const DENSE_DIVISOR: usize = 4;

/// Why a negative sample could not be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Shortfall {
    pub requested: usize,
    pub available: usize,
}

/// Draws `count` distinct `(src, dst)` pairs from `[0, n_src) x [0, n_dst)`
/// that are not in `positives`.
///
/// Sparse relations use rejection sampling; when the request is a large
/// share of the remaining non-edges, every non-edge is enumerated in
/// row-major order and a partial Fisher-Yates shuffle picks the sample.
/// Both paths consume `rng` deterministically.
pub(crate) fn sample_negatives(
    rng: &mut StdRng,
    n_src: usize,
    n_dst: usize,
    positives: &HashSet<(usize, usize)>,
    count: usize,
) -> Result<Vec<(usize, usize)>, Shortfall> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let available = match n_src.checked_mul(n_dst) {
        Some(space) => space.saturating_sub(positives.len()),
        None => usize::MAX,
    };
    if available < count {
        return Err(Shortfall {
            requested: count,
            available,
        });
    }

    if count.saturating_mul(DENSE_DIVISOR) >= available {
        Ok(sample_dense(rng, n_src, n_dst, positives, count))
    } else {
        Ok(sample_sparse(rng, n_src, n_dst, positives, count))
    }
}

fn sample_dense(
    rng: &mut StdRng,
    n_src: usize,
    n_dst: usize,
    positives: &HashSet<(usize, usize)>,
    count: usize,
) -> Vec<(usize, usize)> {
    let mut candidates: Vec<(usize, usize)> = (0..n_src)
        .flat_map(|s| (0..n_dst).map(move |d| (s, d)))
        .filter(|pair| !positives.contains(pair))
        .collect();
    let (chosen, _) = candidates.partial_shuffle(rng, count);
    chosen.to_vec()
}

fn sample_sparse(
    rng: &mut StdRng,
    n_src: usize,
    n_dst: usize,
    positives: &HashSet<(usize, usize)>,
    count: usize,
) -> Vec<(usize, usize)> {
    let mut chosen: HashSet<(usize, usize)> = HashSet::with_capacity(count);
    let mut out = Vec::with_capacity(count);
    while out.len() < count {
        let pair = (rng.gen_range(0..n_src), rng.gen_range(0..n_dst));
        if !positives.contains(&pair) && chosen.insert(pair) {
            out.push(pair);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use rand::SeedableRng;

    use super::*;

    fn positives(pairs: &[(usize, usize)]) -> HashSet<(usize, usize)> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn sparse_sample_avoids_positives_and_repeats() {
        let mut rng = StdRng::seed_from_u64(7);
        let pos = positives(&[(0, 0), (1, 1), (2, 2)]);
        let sample = sample_negatives(&mut rng, 50, 40, &pos, 30).expect("sample");
        assert_eq!(sample.len(), 30);
        let unique: HashSet<_> = sample.iter().copied().collect();
        assert_eq!(unique.len(), 30);
        assert!(sample.iter().all(|p| !pos.contains(p)));
        assert!(sample.iter().all(|&(s, d)| s < 50 && d < 40));
    }

    #[test]
    fn dense_sample_takes_every_remaining_non_edge() {
        let mut rng = StdRng::seed_from_u64(1);
        let pos = positives(&[(0, 0), (0, 1), (1, 0)]);
        let mut sample = sample_negatives(&mut rng, 2, 2, &pos, 1).expect("sample");
        sample.sort_unstable();
        assert_eq!(sample, vec![(1, 1)]);
    }

    #[test]
    fn shortfall_reports_counts() {
        let mut rng = StdRng::seed_from_u64(1);
        let pos = positives(&[(0, 0), (0, 1)]);
        let err = sample_negatives(&mut rng, 1, 3, &pos, 2).expect_err("only one non-edge");
        assert_eq!(
            err,
            Shortfall {
                requested: 2,
                available: 1
            }
        );
    }

    #[test]
    fn zero_count_consumes_nothing() {
        let mut a = StdRng::seed_from_u64(3);
        let mut b = StdRng::seed_from_u64(3);
        let sample = sample_negatives(&mut a, 0, 0, &HashSet::new(), 0).expect("empty");
        assert!(sample.is_empty());
        assert_eq!(a.gen_range(0..1000u32), b.gen_range(0..1000u32));
    }

    #[test]
    fn same_seed_same_sample() {
        let pos = positives(&[(3, 4)]);
        let a = sample_negatives(&mut StdRng::seed_from_u64(11), 20, 20, &pos, 15).expect("a");
        let b = sample_negatives(&mut StdRng::seed_from_u64(11), 20, 20, &pos, 15).expect("b");
        assert_eq!(a, b);
    }
}
