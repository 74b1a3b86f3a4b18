//! Keyed grouping primitives shared by every counting and join stage.
//!
//! Each operation folds its input into per-worker partial results and then
//! merges them. The merge step is the grouping boundary: a key's result is
//! only observable once the whole input has been folded.

use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Distinct values of a stream
pub fn distinct<I, T>(items: I) -> HashSet<T>
where
    I: IntoParallelIterator<Item = T>,
    T: Eq + Hash + Send,
{
    items
        .into_par_iter()
        .fold(HashSet::new, |mut set, item| {
            set.insert(item);
            set
        })
        .reduce(HashSet::new, |a, b| {
            let (mut larger, smaller) = if a.len() >= b.len() { (a, b) } else { (b, a) };
            larger.extend(smaller);
            larger
        })
}

/// Number of times each value occurs in a stream
pub fn count_per_key<I, K>(items: I) -> HashMap<K, u64>
where
    I: IntoParallelIterator<Item = K>,
    K: Eq + Hash + Send,
{
    items
        .into_par_iter()
        .fold(HashMap::new, |mut counts, key| {
            *counts.entry(key).or_insert(0) += 1;
            counts
        })
        .reduce(HashMap::new, merge_counts)
}

/// Sum two partial counts. Commutative and associative, so partial
/// results can be merged in any order.
fn merge_counts<K: Eq + Hash>(a: HashMap<K, u64>, b: HashMap<K, u64>) -> HashMap<K, u64> {
    let (mut larger, smaller) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    for (key, count) in smaller {
        *larger.entry(key).or_insert(0) += count;
    }
    larger
}

/// Records from two streams that share one key
#[derive(Debug, Clone, PartialEq)]
pub struct CoGroup<L, R> {
    pub left: Vec<L>,
    pub right: Vec<R>,
}

impl<L, R> Default for CoGroup<L, R> {
    fn default() -> Self {
        Self {
            left: Vec::new(),
            right: Vec::new(),
        }
    }
}

/// Group two keyed streams together. Every key present on either side gets
/// an entry; a side with no records for that key is left empty.
pub fn cogroup<K, L, R>(
    left: impl IntoIterator<Item = (K, L)>,
    right: impl IntoIterator<Item = (K, R)>,
) -> HashMap<K, CoGroup<L, R>>
where
    K: Eq + Hash,
{
    let mut groups: HashMap<K, CoGroup<L, R>> = HashMap::new();
    for (key, value) in left {
        groups.entry(key).or_default().left.push(value);
    }
    for (key, value) in right {
        groups.entry(key).or_default().right.push(value);
    }
    groups
}
