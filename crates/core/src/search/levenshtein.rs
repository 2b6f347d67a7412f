use std::collections::HashMap;

/// Levenshtein edit distance with a per-instance memo.
///
/// One instance lives for the duration of a single search request, so
/// repeated titles across archives are only computed once.
#[derive(Debug, Default)]
pub struct Levenshtein {
    cache: HashMap<(String, String), usize>,
}

impl Levenshtein {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive edit distance between `a` and `b`.
    pub fn distance(&mut self, a: &str, b: &str) -> usize {
        let a = a.to_lowercase();
        let b = b.to_lowercase();
        if let Some(cached) = self.cache.get(&(a.clone(), b.clone())) {
            return *cached;
        }
        let distance = compute(&a, &b);
        self.cache.insert((a, b), distance);
        distance
    }
}

fn compute(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}
