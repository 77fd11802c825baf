use super::mutate::Mutator;
use crate::catalog;
use crate::fitness::Evaluation;
use crate::genome::Genome;
use rand::rngs::SmallRng;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Individual {
    pub genome: Genome,
    pub evaluation: Option<Arc<Evaluation>>,
}

impl Individual {
    pub fn new(genome: Genome) -> Self {
        Self {
            genome,
            evaluation: None,
        }
    }

    pub fn fitness(&self) -> f64 {
        self.evaluation.as_ref().map(|e| e.fitness).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Population {
    pub members: Vec<Individual>,
}

impl Population {
    /// 70% straight catalog seeds (cycled), 30% mutated variants
    pub fn seeded(size: usize, mutator: &Mutator, rng: &mut SmallRng) -> Self {
        let seeds = catalog::all();
        let plain = ((size as f64) * crate::SEED_FRACTION).round() as usize;
        let mut members = Vec::with_capacity(size);
        for i in 0..size {
            let seed = &seeds[i % seeds.len()];
            let genome = match i < plain {
                true => seed.child_of(format!("g0-{}", i), 0),
                false => {
                    let mut mutant = mutator.mutate(seed, rng);
                    mutant = super::repair::validate_and_repair(mutant);
                    mutant.genome_id = format!("g0-{}", i);
                    mutant
                }
            };
            members.push(Individual::new(genome));
        }
        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// descending fitness, stable so ties keep their generation order
    pub fn sort(&mut self) {
        self.members.sort_by(|a, b| {
            b.fitness()
                .partial_cmp(&a.fitness())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    pub fn best(&self) -> Option<&Individual> {
        self.members
            .iter()
            .max_by(|a, b| {
                a.fitness()
                    .partial_cmp(&b.fitness())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    pub fn mean_fitness(&self) -> f64 {
        match self.members.is_empty() {
            true => 0.0,
            false => {
                self.members.iter().map(Individual::fitness).sum::<f64>()
                    / self.members.len() as f64
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn seeded_population_mixes_seeds_and_mutants() {
        let mut rng = SmallRng::seed_from_u64(3);
        let population = Population::seeded(20, &Mutator::default(), &mut rng);
        assert!(population.len() == 20);
        for member in population.members.iter() {
            assert!(member.genome.validate().is_ok(), "{}", member.genome.genome_id);
        }
    }
}
