//! Population diversity as mean pairwise normalized edit distance over
//! compiled bytecode. Cheap enough at population scale to run every
//! generation, and the trigger for fresh-seed injection when the
//! population collapses toward one attractor.

use rayon::prelude::*;

/// mean of levenshtein(a, b) / max_len over all unordered pairs
pub fn mean_pairwise_distance(bytecodes: &[Vec<u8>]) -> f64 {
    let n = bytecodes.len();
    if n < 2 {
        return 0.0;
    }
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();
    let total: f64 = pairs
        .par_iter()
        .map(|(i, j)| {
            let a = &bytecodes[*i];
            let b = &bytecodes[*j];
            let longest = a.len().max(b.len()).max(1);
            levenshtein(a, b) as f64 / longest as f64
        })
        .sum();
    total / pairs.len() as f64
}

/// two-row edit distance
fn levenshtein(a: &[u8], b: &[u8]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];
    for (i, x) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, y) in b.iter().enumerate() {
            let substitute = prev[j] + usize::from(x != y);
            curr[j + 1] = substitute.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_population_has_zero_distance() {
        let bytecode = crate::bytecode::compile(&crate::catalog::war()).expect("compile");
        let population = vec![bytecode.clone(), bytecode.clone(), bytecode];
        assert!(mean_pairwise_distance(&population) == 0.0);
    }

    #[test]
    fn distinct_seeds_are_far_apart() {
        let bytecodes: Vec<Vec<u8>> = crate::catalog::all()
            .iter()
            .map(|g| crate::bytecode::compile(g).expect("compile"))
            .collect();
        assert!(mean_pairwise_distance(&bytecodes) > crate::DIVERSITY_FLOOR);
    }

    #[test]
    fn edit_distance_basics() {
        assert!(levenshtein(b"kitten", b"sitting") == 3);
        assert!(levenshtein(b"", b"abc") == 3);
        assert!(levenshtein(b"abc", b"abc") == 0);
    }
}
