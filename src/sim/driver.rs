//! Batch simulation driver. Compiles a genome once, then runs games
//! serially or across a rayon pool. Each game owns a pooled state and a
//! seeded LCG derived from the batch master seed, so a batch result is
//! identical no matter how it was scheduled.

use super::policy;
use super::policy::AiKind;
use super::result::AggregatedStats;
use super::result::GameResult;
use super::tension::LeaderMetric;
use super::tension::TensionMetrics;
use crate::bytecode;
use crate::genome::Genome;
use crate::interpreter::moves::CHALLENGE;
use crate::interpreter::Engine;
use crate::interpreter::Move;
use crate::interpreter::Step;
use crate::state::game_seed;
use crate::state::Lcg;
use crate::state::StatePool;
use crate::Error;
use rayon::prelude::*;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct Batch {
    pub results: Vec<GameResult>,
    pub stats: AggregatedStats,
}

pub struct Driver {
    states: StatePool,
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver {
    pub fn new() -> Self {
        Self {
            states: StatePool::new(),
        }
    }

    pub fn states(&self) -> &StatePool {
        &self.states
    }

    /// One game under the given per-seat AIs.
    pub fn run_single(&self, engine: &Engine, ais: &[AiKind], seed: u64) -> GameResult {
        let started = Instant::now();
        let mut rng = Lcg::new(seed);
        let mut state = self.states.acquire();
        engine.setup(&mut state, &mut rng);
        let metric = LeaderMetric::for_engine(engine);
        let mut tension = TensionMetrics::new();
        let mut result = GameResult::default();
        let mut buf: Vec<Move> = Vec::with_capacity(32);

        loop {
            match engine.step_moves(&mut state, &mut buf) {
                Step::Over => break,
                Step::Stuck => {
                    result.error = true;
                    break;
                }
                Step::Moves => {
                    result.decisions += 1;
                    result.valid_moves += buf.len() as u64;
                    if buf.len() == 1 {
                        result.forced += 1;
                    }
                    let ai = ais.get(state.actor).copied().unwrap_or(AiKind::Random);
                    let pick = policy::choose(ai, engine, &state, &buf, &self.states, &mut rng);
                    let mv = buf[pick];
                    let watched = challenge_watch(&state, mv);
                    let applied = engine.apply(&mut state, mv, &mut rng);
                    result.actions += 1;
                    if applied.interaction {
                        result.interactions += 1;
                    }
                    if let Some(claimer_cards) = watched {
                        result.challenges += 1;
                        // the claimer swallowing the pile means the lie was exposed
                        if state.players[claimer_cards.0].hand.len() > claimer_cards.1 {
                            result.challenges_upheld += 1;
                        }
                    }
                    let (leader, margin) = metric.leader(&state);
                    tension.record(state.turn, leader, margin);
                }
            }
        }

        result.winner = state.winner;
        result.turns = state.turn;
        let summary = tension.finish(result.winner, result.turns);
        result.lead_changes = summary.lead_changes;
        result.decisive_turn_pct = summary.decisive_turn_pct;
        result.closest_margin = summary.closest_margin;
        result.midpoint_leader = summary.midpoint_leader;
        result.duration_ns = started.elapsed().as_nanos() as u64;
        self.states.release(state);
        result
    }

    pub fn run_batch(
        &self,
        genome: &Genome,
        num_games: usize,
        ai: AiKind,
        seed: u64,
    ) -> Result<Batch, Error> {
        self.run_batch_asymmetric(genome, num_games, [ai; crate::MAX_PLAYERS], seed)
    }

    pub fn run_batch_asymmetric(
        &self,
        genome: &Genome,
        num_games: usize,
        ais: [AiKind; crate::MAX_PLAYERS],
        seed: u64,
    ) -> Result<Batch, Error> {
        let engine = self.engine_for(genome)?;
        Ok(self.run_games(&engine, num_games, ais, seed, None, false))
    }

    /// Splits the batch across the rayon pool; per-game seeds are
    /// derived from the master so the outcome matches the serial run.
    pub fn run_batch_parallel(
        &self,
        genome: &Genome,
        num_games: usize,
        ai: AiKind,
        seed: u64,
    ) -> Result<Batch, Error> {
        let engine = self.engine_for(genome)?;
        Ok(self.run_games(&engine, num_games, [ai; crate::MAX_PLAYERS], seed, None, true))
    }

    /// Deadline-aware batch used by fitness and skill evaluation; past
    /// the deadline remaining games are dropped and the stats flag it.
    pub fn run_batch_deadline(
        &self,
        engine: &Engine,
        num_games: usize,
        ais: [AiKind; crate::MAX_PLAYERS],
        seed: u64,
        deadline: Option<Instant>,
        parallel: bool,
    ) -> Batch {
        self.run_games(engine, num_games, ais, seed, deadline, parallel)
    }

    pub fn engine_for(&self, genome: &Genome) -> Result<Engine, Error> {
        let bytes = bytecode::compile(genome)?;
        Engine::new(&bytecode::parse(&bytes)?)
    }

    fn run_games(
        &self,
        engine: &Engine,
        num_games: usize,
        ais: [AiKind; crate::MAX_PLAYERS],
        seed: u64,
        deadline: Option<Instant>,
        parallel: bool,
    ) -> Batch {
        let started = Instant::now();
        let expired = |_: usize| match deadline {
            Some(at) => Instant::now() >= at,
            None => false,
        };
        let run = |i: usize| -> Option<GameResult> {
            match expired(i) {
                true => None,
                false => Some(self.run_single(engine, &ais, game_seed(seed, i as u64))),
            }
        };
        let results: Vec<Option<GameResult>> = match parallel {
            true => (0..num_games).into_par_iter().map(&run).collect(),
            false => (0..num_games).map(&run).collect(),
        };
        let timed_out = results.iter().any(Option::is_none);
        let results: Vec<GameResult> = results.into_iter().flatten().collect();
        let stats =
            AggregatedStats::from_results(&results, started.elapsed().as_secs_f64(), timed_out);
        Batch { results, stats }
    }
}

/// before a challenge resolves, remember the claimer and their hand size
fn challenge_watch(state: &crate::state::GameState, mv: Move) -> Option<(usize, usize)> {
    match mv.card == CHALLENGE && state.claim_pending {
        true => Some((
            state.claim_player,
            state.players[state.claim_player].hand.len(),
        )),
        false => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    /// golden scenario: 1000 games of War, seed 12345
    #[test]
    fn war_thousand_games_accounting() {
        let driver = Driver::new();
        let batch = driver
            .run_batch(&catalog::war(), 1000, AiKind::Random, 12345)
            .expect("batch");
        let s = &batch.stats;
        assert!(s.wins[0] + s.wins[1] + s.draws + s.errors == 1000);
        assert!(s.errors == 0);
        assert!(s.avg_turns >= 100.0 && s.avg_turns <= 1000.0, "{}", s.avg_turns);
    }

    #[test]
    fn batches_are_deterministic() {
        let driver = Driver::new();
        let a = driver
            .run_batch(&catalog::war(), 100, AiKind::Random, 42)
            .expect("batch");
        let b = driver
            .run_batch(&catalog::war(), 100, AiKind::Random, 42)
            .expect("batch");
        for (x, y) in a.results.iter().zip(b.results.iter()) {
            assert!(x.winner == y.winner);
            assert!(x.turns == y.turns);
        }
    }

    #[test]
    fn parallel_matches_serial() {
        let driver = Driver::new();
        let serial = driver
            .run_batch(&catalog::crazy_eights(), 64, AiKind::Random, 7)
            .expect("batch");
        let parallel = driver
            .run_batch_parallel(&catalog::crazy_eights(), 64, AiKind::Random, 7)
            .expect("batch");
        assert!(serial.stats.wins == parallel.stats.wins);
        assert!(serial.stats.draws == parallel.stats.draws);
        assert!(serial.stats.avg_turns == parallel.stats.avg_turns);
    }

    #[test]
    fn every_seed_simulates_cleanly() {
        let driver = Driver::new();
        for genome in catalog::all() {
            let batch = driver
                .run_batch(&genome, 30, AiKind::Random, 99)
                .expect("batch");
            let s = &batch.stats;
            let wins: u32 = s.wins.iter().sum();
            assert!(wins + s.draws + s.errors == 30, "{}", genome.genome_id);
            assert!(s.error_rate() < 0.5, "{}", genome.genome_id);
        }
    }

    #[test]
    fn greedy_and_mixed_seats_run() {
        let driver = Driver::new();
        let batch = driver
            .run_batch_asymmetric(
                &catalog::crazy_eights(),
                20,
                [
                    AiKind::Greedy,
                    AiKind::Random,
                    AiKind::Random,
                    AiKind::Random,
                ],
                3,
            )
            .expect("batch");
        assert!(batch.stats.games == 20);
    }
}
