//! Two-phase fitness evaluation. The cheap screen runs a handful of
//! random games and prunes the hopeless; the expensive pass mixes in
//! greedy and MCTS opponents for the skill inputs. Results are cached
//! by bytecode hash, and eval seeds derive from that hash so identical
//! rule sets evaluate identically wherever they appear.

use super::cache::FitnessCache;
use super::gate;
use super::metrics::Metrics;
use super::metrics::SkillInputs;
use super::weights::FitnessConfig;
use crate::bytecode;
use crate::genome::Genome;
use crate::sim::AiKind;
use crate::sim::Driver;
use crate::state::game_seed;
use std::sync::Arc;
use std::time::Instant;

/// salt separating screen entries from full entries in the cache
const SCREEN_SALT: u64 = 0x5c;

#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    pub fitness: f64,
    pub metrics: Metrics,
    pub playable: bool,
    pub timed_out: bool,
    /// true once the expensive phase has run
    pub full: bool,
    pub avg_turns: f64,
    pub gate_reasons: Vec<&'static str>,
}

/// The seam the evolution engine evaluates through; tests plug in
/// stubs, production plugs in `Evaluator`.
pub trait Evaluate: Send + Sync {
    fn screen(&self, genome: &Genome) -> Arc<Evaluation>;
    fn full(&self, genome: &Genome) -> Arc<Evaluation>;
}

pub struct Evaluator {
    driver: Driver,
    cache: FitnessCache,
    config: FitnessConfig,
    master_seed: u64,
}

impl Evaluator {
    pub fn new(config: FitnessConfig, master_seed: u64) -> Self {
        Self {
            driver: Driver::new(),
            cache: FitnessCache::new(4096),
            config,
            master_seed,
        }
    }

    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    fn zero(reason: &'static str) -> Arc<Evaluation> {
        Arc::new(Evaluation {
            fitness: 0.0,
            playable: false,
            gate_reasons: vec![reason],
            ..Default::default()
        })
    }

    fn evaluate(&self, genome: &Genome, full: bool) -> Arc<Evaluation> {
        let bytes = match bytecode::compile(genome) {
            Ok(bytes) => bytes,
            Err(_) => return Self::zero("genome failed to compile"),
        };
        let hash = bytecode::fnv1a(&bytes);
        let key = match full {
            true => hash,
            false => hash ^ SCREEN_SALT,
        };
        if let Some(cached) = self.cache.get(key) {
            return cached;
        }
        let engine = match self.driver.engine_for(genome) {
            Ok(engine) => engine,
            Err(_) => return Self::zero("bytecode failed to parse"),
        };
        let seed = game_seed(self.master_seed, hash);
        let deadline = self
            .config
            .deadline
            .filter(|_| full)
            .map(|d| Instant::now() + d);

        let games = match full {
            true => self.config.full_games,
            false => self.config.screen_games,
        };
        let batch = self.driver.run_batch_deadline(
            &engine,
            games,
            [AiKind::Random; crate::MAX_PLAYERS],
            seed,
            deadline,
            full,
        );

        let skill = match full {
            false => None,
            true => Some(self.skill_inputs(&engine, seed, deadline)),
        };
        let metrics = Metrics::measure(genome, &batch.stats, skill, &self.config);
        let outcome = gate::evaluate(&batch.stats, &metrics, skill);
        let fitness = match outcome.hard_fail {
            true => 0.0,
            false => metrics.weighted(&self.config.weights) * outcome.multiplier,
        };
        let evaluation = Arc::new(Evaluation {
            fitness,
            metrics,
            playable: !outcome.hard_fail,
            timed_out: batch.stats.timed_out,
            full,
            avg_turns: batch.stats.avg_turns,
            gate_reasons: outcome.reasons,
        });
        self.cache.insert(key, evaluation)
    }

    fn skill_inputs(
        &self,
        engine: &crate::interpreter::Engine,
        seed: u64,
        deadline: Option<Instant>,
    ) -> SkillInputs {
        let mut greedy_seats = [AiKind::Random; crate::MAX_PLAYERS];
        greedy_seats[0] = AiKind::Greedy;
        let greedy = self.driver.run_batch_deadline(
            engine,
            self.config.skill_games,
            greedy_seats,
            seed ^ 0xA5A5,
            deadline,
            true,
        );
        let mut mcts_seats = [AiKind::Random; crate::MAX_PLAYERS];
        mcts_seats[0] = AiKind::mcts_for(self.config.mcts_iterations);
        let mcts = self.driver.run_batch_deadline(
            engine,
            self.config.skill_games,
            mcts_seats,
            seed ^ 0x5A5A,
            deadline,
            true,
        );
        SkillInputs {
            greedy_vs_random: greedy.stats.win_rate(0),
            mcts_vs_random: mcts.stats.win_rate(0),
        }
    }
}

impl Evaluate for Evaluator {
    fn screen(&self, genome: &Genome) -> Arc<Evaluation> {
        self.evaluate(genome, false)
    }
    fn full(&self, genome: &Genome) -> Arc<Evaluation> {
        self.evaluate(genome, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::genome::Genome;

    fn evaluator() -> Evaluator {
        let config = FitnessConfig {
            full_games: 20,
            skill_games: 6,
            mcts_iterations: 50,
            deadline: None,
            ..Default::default()
        };
        Evaluator::new(config, 1234)
    }

    /// a deliberately broken genome dies in the screen, before any
    /// expensive simulation
    #[test]
    fn broken_genome_scores_zero() {
        let broken = Genome::blank("broken", 2);
        let eval = evaluator().screen(&broken);
        assert!(eval.fitness == 0.0);
        assert!(!eval.playable);
    }

    #[test]
    fn gate_zero_means_exactly_zero() {
        // War's max_turns squeezed to 5 cannot finish a game: all draws
        let mut genome = catalog::war();
        genome.max_turns = 5;
        let eval = evaluator().screen(&genome);
        assert!(eval.fitness == 0.0);
        assert!(!eval.playable);
    }

    #[test]
    fn screen_results_are_cached() {
        let evaluator = evaluator();
        let a = evaluator.screen(&catalog::crazy_eights());
        let before = evaluator.cache_len();
        let b = evaluator.screen(&catalog::crazy_eights());
        assert!(Arc::ptr_eq(&a, &b));
        assert!(evaluator.cache_len() == before);
    }

    #[test]
    fn playable_seed_scores_above_zero() {
        let eval = evaluator().full(&catalog::crazy_eights());
        assert!(eval.playable);
        assert!(eval.fitness > 0.0);
        assert!(eval.full);
    }
}
