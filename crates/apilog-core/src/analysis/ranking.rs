//! Deterministic top-N selection.
//!
//! Items are ordered by score, highest first. Items with equal scores keep
//! the order in which they were supplied, so ranking a first-occurrence
//! ordered table always breaks ties by first occurrence.

use std::cmp::Ordering;

/// A value items can be ranked by
pub trait Score {
    fn cmp_score(&self, other: &Self) -> Ordering;
}

macro_rules! integer_score {
    ($($ty:ty),*) => {
        $(impl Score for $ty {
            fn cmp_score(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }
        })*
    };
}

integer_score!(usize, u32, u64, i64);

impl Score for f64 {
    fn cmp_score(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

/// Return the `n` highest scoring `(key, score)` pairs
pub fn top_n<K, S: Score>(items: impl IntoIterator<Item = (K, S)>, n: usize) -> Vec<(K, S)> {
    top_n_by(items, n, |(_, score)| score)
}

/// Return the `n` highest scoring items, using `score` to extract the score
pub fn top_n_by<T, S, F>(items: impl IntoIterator<Item = T>, n: usize, score: F) -> Vec<T>
where
    S: Score,
    F: Fn(&T) -> &S,
{
    if n == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<T> = items.into_iter().collect();
    // sort_by is stable; equal scores stay in input order
    ranked.sort_by(|a, b| score(b).cmp_score(score(a)));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_n_orders_by_score_descending() {
        let items = vec![("a", 1usize), ("b", 5), ("c", 3)];
        let ranked = top_n(items, 3);
        assert_eq!(ranked, vec![("b", 5), ("c", 3), ("a", 1)]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let items = vec![("first", 2usize), ("second", 7), ("third", 2), ("fourth", 7)];
        let ranked = top_n(items, 4);
        assert_eq!(
            ranked,
            vec![("second", 7), ("fourth", 7), ("first", 2), ("third", 2)]
        );
    }

    #[test]
    fn test_bound_is_respected() {
        let items: Vec<(usize, usize)> = (0..20).map(|i| (i, i % 4)).collect();
        let ranked = top_n(items, 5);
        assert_eq!(ranked.len(), 5);
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_fewer_items_than_bound() {
        let ranked = top_n(vec![("only", 1usize)], 5);
        assert_eq!(ranked, vec![("only", 1)]);
    }

    #[test]
    fn test_empty_input() {
        let ranked: Vec<(&str, usize)> = top_n(Vec::new(), 5);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_zero_bound() {
        assert!(top_n(vec![("a", 1usize)], 0).is_empty());
    }

    #[test]
    fn test_float_scores() {
        let latencies = [100.0, 950.0, 500.0, 800.0, 1000.0, 50.0];
        let ranked = top_n_by(latencies, 5, |ms| ms);
        assert_eq!(ranked, vec![1000.0, 950.0, 800.0, 500.0, 100.0]);
    }
}
