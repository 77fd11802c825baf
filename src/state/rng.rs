//! Deterministic randomness for the hot path. Simulation results must be
//! reproducible from a seed on any platform, so shuffling and rollouts
//! run on a fixed-constant LCG rather than whatever the OS offers. The
//! generator also implements `rand::RngCore` so it composes with the
//! wider ecosystem where the exact stream is not load-bearing.

/// Knuth MMIX constants
pub const LCG_MULTIPLIER: u64 = 6364136223846793005;
pub const LCG_INCREMENT: u64 = 1442695040888963407;

#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state
    }

    /// uniform-enough index draw; the modulo bias is irrelevant at deck
    /// sizes and the arithmetic is identical everywhere
    pub fn below(&mut self, n: u32) -> u32 {
        debug_assert!(n > 0);
        ((self.next_u64() >> 33) as u32) % n
    }

    pub fn chance(&mut self, p: f64) -> bool {
        (self.next_u64() >> 11) as f64 / ((1u64 << 53) as f64) < p
    }

    /// seeded Fisher-Yates; one seed, one permutation, every platform
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i as u32 + 1) as usize;
            items.swap(i, j);
        }
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        match items.is_empty() {
            true => None,
            false => items.get(self.below(items.len() as u32) as usize),
        }
    }

    /// an independent stream for a sub-task
    pub fn split(&mut self) -> Lcg {
        Lcg::new(splitmix64(self.next_u64()))
    }
}

impl rand::RngCore for Lcg {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }
    fn next_u64(&mut self) -> u64 {
        Lcg::next_u64(self)
    }
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

/// per-game seed derivation; must not depend on how a batch is split
/// across workers
pub fn game_seed(master: u64, index: u64) -> u64 {
    splitmix64(master ^ index.wrapping_mul(0x9E3779B97F4A7C15))
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = Lcg::new(42);
        let mut b = Lcg::new(42);
        for _ in 0..100 {
            assert!(a.next_u64() == b.next_u64());
        }
    }

    #[test]
    fn same_seed_same_permutation() {
        let mut deck_a: Vec<u8> = (0..52).collect();
        let mut deck_b: Vec<u8> = (0..52).collect();
        Lcg::new(12345).shuffle(&mut deck_a);
        Lcg::new(12345).shuffle(&mut deck_b);
        assert!(deck_a == deck_b);
        assert!(deck_a != (0..52).collect::<Vec<u8>>());
    }

    #[test]
    fn first_step_matches_constants() {
        let mut rng = Lcg::new(0);
        assert!(rng.next_u64() == LCG_INCREMENT);
    }

    #[test]
    fn game_seed_ignores_batch_split() {
        let serial: Vec<u64> = (0..8).map(|i| game_seed(7, i)).collect();
        let chunked: Vec<u64> = (0..4)
            .map(|i| game_seed(7, i))
            .chain((4..8).map(|i| game_seed(7, i)))
            .collect();
        assert!(serial == chunked);
    }
}
