use super::population::Individual;
use super::population::Population;
use rand::rngs::SmallRng;
use rand::Rng;

/// Tournament selection: draw k at random, best fitness wins. Larger k
/// means harder selection pressure.
pub fn tournament<'a>(
    population: &'a Population,
    k: usize,
    rng: &mut SmallRng,
) -> &'a Individual {
    debug_assert!(!population.is_empty());
    let mut best: Option<&Individual> = None;
    for _ in 0..k.max(1) {
        let pick = &population.members[rng.random_range(0..population.len())];
        best = match best {
            Some(current) if current.fitness() >= pick.fitness() => Some(current),
            _ => Some(pick),
        };
    }
    best.expect("at least one draw")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::Evaluation;
    use crate::genome::Genome;
    use rand::SeedableRng;
    use std::sync::Arc;

    #[test]
    fn tournament_prefers_fit_members() {
        let mut population = Population::default();
        for i in 0..10 {
            let mut member = Individual::new(Genome::blank(&format!("m{}", i), 2));
            member.evaluation = Some(Arc::new(Evaluation {
                fitness: i as f64 / 10.0,
                ..Default::default()
            }));
            population.members.push(member);
        }
        let mut rng = SmallRng::seed_from_u64(1);
        let mut sum = 0.0;
        for _ in 0..200 {
            sum += tournament(&population, 3, &mut rng).fitness();
        }
        // selection pressure pulls the mean well above the uniform 0.45
        assert!(sum / 200.0 > 0.55);
    }
}
