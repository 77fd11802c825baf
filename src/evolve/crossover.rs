//! Semantic crossover: single point on the turn-structure phase list.
//! The child takes a prefix of one parent's phases and a suffix of the
//! other's; every other field is inherited from one chosen parent.
//! Children always go through repair before they join a population.

use crate::genome::Genome;
use crate::genome::Phase;
use rand::rngs::SmallRng;
use rand::Rng;

const MAX_CHILD_PHASES: usize = 6;

pub fn crossover(a: &Genome, b: &Genome, rng: &mut SmallRng) -> Genome {
    let base = match rng.random_bool(0.5) {
        true => a,
        false => b,
    };
    let mut child = base.clone();
    let split_a = rng.random_range(1..=a.phases.len());
    let split_b = rng.random_range(0..=b.phases.len());
    let mut phases: Vec<Phase> = a.phases[..split_a].to_vec();
    phases.extend_from_slice(&b.phases[split_b..]);
    phases.truncate(MAX_CHILD_PHASES);
    child.phases = phases;
    // trick bookkeeping follows the stitched phase list, repair settles it
    child.is_trick_based = child.phases.iter().any(|p| matches!(p, Phase::Trick(_)));
    if !child.is_trick_based {
        child.tricks_per_hand = None;
    } else if child.tricks_per_hand.is_none() {
        child.tricks_per_hand = a.tricks_per_hand.or(b.tricks_per_hand);
    }
    child
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use rand::SeedableRng;

    #[test]
    fn child_phases_come_from_both_parents() {
        let a = catalog::gin_rummy();
        let b = catalog::cheat();
        let mut rng = SmallRng::seed_from_u64(2);
        for _ in 0..30 {
            let child = crossover(&a, &b, &mut rng);
            assert!(!child.phases.is_empty());
            assert!(child.phases.len() <= MAX_CHILD_PHASES);
            for phase in child.phases.iter() {
                let from_a = a.phases.contains(phase);
                let from_b = b.phases.contains(phase);
                assert!(from_a || from_b);
            }
        }
    }

    #[test]
    fn repaired_children_are_valid() {
        let seeds = catalog::all();
        let mut rng = SmallRng::seed_from_u64(8);
        for i in 0..seeds.len() {
            for j in 0..seeds.len() {
                let child = crossover(&seeds[i], &seeds[j], &mut rng);
                let repaired = super::super::repair::validate_and_repair(child);
                assert!(repaired.validate().is_ok());
            }
        }
    }
}
