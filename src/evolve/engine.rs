//! The generational loop: progressive evaluation, elitism, tournament
//! breeding, diversity pressure, and plateau-based early stopping. A
//! fixed master seed reproduces the whole run.

use super::crossover;
use super::diversity;
use super::mutate::Mutator;
use super::population::Individual;
use super::population::Population;
use super::repair;
use super::select;
use crate::bytecode;
use crate::catalog;
use crate::fitness::Evaluate;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;
use rayon::prelude::*;

#[derive(Debug, Clone)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    pub tournament_size: usize,
    pub elite_fraction: f64,
    pub crossover_rate: f64,
    /// share of the population promoted to the expensive phase
    pub full_eval_fraction: f64,
    pub plateau_window: usize,
    pub plateau_epsilon: f64,
    pub diversity_floor: f64,
    pub master_seed: u64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: crate::POPULATION_SIZE,
            generations: 50,
            tournament_size: crate::TOURNAMENT_SIZE,
            elite_fraction: crate::ELITE_FRACTION,
            crossover_rate: crate::CROSSOVER_RATE,
            full_eval_fraction: 0.2,
            plateau_window: crate::PLATEAU_WINDOW,
            plateau_epsilon: crate::PLATEAU_EPSILON,
            diversity_floor: crate::DIVERSITY_FLOOR,
            master_seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationSummary {
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub diversity: f64,
    pub plateau_counter: usize,
    pub injected: usize,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub generations_run: usize,
    pub stopped_early: bool,
    pub history: Vec<GenerationSummary>,
    pub population: Population,
}

impl RunReport {
    pub fn top(&self, k: usize) -> &[Individual] {
        &self.population.members[..k.min(self.population.members.len())]
    }
}

pub struct Evolution<'a, E: Evaluate> {
    config: EvolutionConfig,
    evaluator: &'a E,
    mutator: Mutator,
}

impl<'a, E: Evaluate> Evolution<'a, E> {
    pub fn new(config: EvolutionConfig, evaluator: &'a E) -> Self {
        Self {
            config,
            evaluator,
            mutator: Mutator::default(),
        }
    }

    pub fn run(&self) -> RunReport {
        let mut rng = SmallRng::seed_from_u64(self.config.master_seed);
        let mut population =
            Population::seeded(self.config.population_size, &self.mutator, &mut rng);
        let mut history: Vec<GenerationSummary> = vec![];
        let mut running_best = 0.0f64;
        let mut stall = 0usize;
        let mut stopped_early = false;
        let progress = crate::progress(self.config.generations);

        for generation in 0..self.config.generations {
            progress.inc(1);
            self.evaluate(&mut population);
            population.sort();

            let diversity = self.population_diversity(&population);
            let injected =
                self.diversity_pressure(&mut population, diversity, generation, &mut rng);
            let best = population.best().map(Individual::fitness).unwrap_or(0.0);
            let improved = best > running_best * (1.0 + self.config.plateau_epsilon)
                || (running_best == 0.0 && best > 0.0);
            match improved {
                true => {
                    running_best = best;
                    stall = 0;
                }
                false => stall += 1,
            }

            let summary = GenerationSummary {
                generation,
                best_fitness: best,
                mean_fitness: population.mean_fitness(),
                diversity,
                plateau_counter: stall,
                injected,
            };
            log::info!(
                "gen {:>3} best {:.4} mean {:.4} diversity {:.3} plateau {}/{}",
                summary.generation,
                summary.best_fitness,
                summary.mean_fitness,
                summary.diversity,
                summary.plateau_counter,
                self.config.plateau_window,
            );
            history.push(summary);

            if stall >= self.config.plateau_window {
                log::info!("plateau reached after {} generations", generation + 1);
                stopped_early = true;
                break;
            }
            if generation + 1 < self.config.generations {
                population = self.breed(&population, generation as u32 + 1, &mut rng);
            }
        }

        progress.finish_and_clear();
        // the last breeding round leaves unevaluated members behind
        self.evaluate(&mut population);
        population.sort();
        RunReport {
            generations_run: history.len(),
            stopped_early,
            history,
            population,
        }
    }

    /// Progressive evaluation: cheap screen for everyone, the expensive
    /// pass only for the screen's top slice.
    fn evaluate(&self, population: &mut Population) {
        population
            .members
            .par_iter_mut()
            .filter(|m| m.evaluation.is_none())
            .for_each(|member| {
                member.evaluation = Some(self.evaluator.screen(&member.genome));
            });
        population.sort();
        let promote = ((population.len() as f64 * self.config.full_eval_fraction).ceil() as usize)
            .min(population.len());
        population.members[..promote]
            .par_iter_mut()
            .filter(|m| {
                m.fitness() > 0.0
                    && !m.evaluation.as_ref().map(|e| e.full).unwrap_or(false)
            })
            .for_each(|member| {
                member.evaluation = Some(self.evaluator.full(&member.genome));
            });
    }

    /// Elites carry over untouched; the rest come from tournament
    /// parents through crossover, mutation, and repair.
    fn breed(&self, population: &Population, generation: u32, rng: &mut SmallRng) -> Population {
        let elites = ((population.len() as f64 * self.config.elite_fraction).round() as usize)
            .clamp(1, population.len());
        let mut next = Population::default();
        for elite in population.members[..elites].iter() {
            next.members.push(elite.clone());
        }
        let mut counter = 0usize;
        while next.len() < self.config.population_size {
            let mother = select::tournament(population, self.config.tournament_size, rng);
            let father = select::tournament(population, self.config.tournament_size, rng);
            let child = match rng.random_bool(self.config.crossover_rate) {
                true => crossover::crossover(&mother.genome, &father.genome, rng),
                false => mother.genome.clone(),
            };
            let child = self.mutator.mutate(&child, rng);
            let mut child = repair::validate_and_repair(child);
            child.genome_id = format!("g{}-{}", generation, counter);
            child.generation = generation;
            counter += 1;
            next.members.push(Individual::new(child));
        }
        next
    }

    fn population_diversity(&self, population: &Population) -> f64 {
        let bytecodes: Vec<Vec<u8>> = population
            .members
            .iter()
            .filter_map(|m| bytecode::compile(&m.genome).ok())
            .collect();
        diversity::mean_pairwise_distance(&bytecodes)
    }

    /// Mandatory diversity mechanism: when the population huddles below
    /// the floor, the bottom slice is replaced with fresh mutated seeds.
    fn diversity_pressure(
        &self,
        population: &mut Population,
        diversity: f64,
        generation: usize,
        rng: &mut SmallRng,
    ) -> usize {
        if diversity >= self.config.diversity_floor || population.len() < 4 {
            return 0;
        }
        let replace = (population.len() / 10).max(1);
        let seeds = catalog::all();
        let start = population.len() - replace;
        for (i, slot) in population.members[start..].iter_mut().enumerate() {
            let seed = &seeds[rng.random_range(0..seeds.len())];
            let mut fresh = self.mutator.mutate(seed, rng);
            fresh = repair::validate_and_repair(fresh);
            fresh.genome_id = format!("g{}-inject-{}", generation, i);
            *slot = Individual::new(fresh);
        }
        log::warn!(
            "diversity {:.3} under floor {:.3}: injected {} fresh seeds",
            diversity,
            self.config.diversity_floor,
            replace,
        );
        replace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::Evaluation;
    use crate::genome::Genome;
    use std::sync::Arc;

    /// constant-fitness evaluator for plateau behavior
    struct Flat;
    impl Evaluate for Flat {
        fn screen(&self, _genome: &Genome) -> Arc<Evaluation> {
            Arc::new(Evaluation {
                fitness: 0.5,
                playable: true,
                ..Default::default()
            })
        }
        fn full(&self, genome: &Genome) -> Arc<Evaluation> {
            self.screen(genome)
        }
    }

    fn small_config() -> EvolutionConfig {
        EvolutionConfig {
            population_size: 12,
            generations: 40,
            plateau_window: 5,
            ..Default::default()
        }
    }

    #[test]
    fn plateau_stops_within_window() {
        let evolution = Evolution::new(small_config(), &Flat);
        let report = evolution.run();
        assert!(report.stopped_early);
        assert!(report.generations_run <= 5 + 1);
    }

    #[test]
    fn elites_survive_unchanged() {
        struct ByPhases;
        impl Evaluate for ByPhases {
            fn screen(&self, genome: &Genome) -> Arc<Evaluation> {
                Arc::new(Evaluation {
                    fitness: genome.phases.len() as f64,
                    playable: true,
                    ..Default::default()
                })
            }
            fn full(&self, genome: &Genome) -> Arc<Evaluation> {
                self.screen(genome)
            }
        }
        let config = EvolutionConfig {
            population_size: 10,
            generations: 3,
            plateau_window: 30,
            elite_fraction: 0.2,
            ..Default::default()
        };
        let evolution = Evolution::new(config, &ByPhases);
        let report = evolution.run();
        // the best genome can never get worse across generations
        let mut last = 0.0;
        for summary in report.history.iter() {
            assert!(summary.best_fitness >= last);
            last = summary.best_fitness;
        }
    }

    #[test]
    fn runs_are_reproducible() {
        let a = Evolution::new(small_config(), &Flat).run();
        let b = Evolution::new(small_config(), &Flat).run();
        assert!(a.generations_run == b.generations_run);
        let ids_a: Vec<&String> = a.population.members.iter().map(|m| &m.genome.genome_id).collect();
        let ids_b: Vec<&String> = b.population.members.iter().map(|m| &m.genome.genome_id).collect();
        assert!(ids_a == ids_b);
    }
}
