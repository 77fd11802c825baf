//! Post-hoc skill measurement for the winners of an evolution run.
//! MCTS plays half the games from the first seat and half from the
//! last, which cancels any first-player bias the genome carries. A
//! genome where search cannot beat random play is luck in a trench
//! coat; a large gap means decisions matter.

use crate::genome::Genome;
use crate::sim::AiKind;
use crate::sim::Driver;
use rayon::prelude::*;
use std::time::Duration;
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct SkillReport {
    pub genome_id: String,
    pub games: u32,
    pub wins_as_first: u32,
    pub games_as_first: u32,
    pub wins_as_last: u32,
    pub games_as_last: u32,
    pub win_rate: f64,
    pub timed_out: bool,
    /// set when the genome failed to compile or simulate
    pub failed: bool,
}

/// Symmetric MCTS-vs-Random over the top genomes, parallel across
/// genomes, each under its own soft deadline.
pub fn evaluate_top(
    driver: &Driver,
    genomes: &[Genome],
    num_games: usize,
    mcts: AiKind,
    seed: u64,
    deadline: Option<Duration>,
) -> Vec<SkillReport> {
    genomes
        .par_iter()
        .map(|genome| evaluate_one(driver, genome, num_games, mcts, seed, deadline))
        .collect()
}

fn evaluate_one(
    driver: &Driver,
    genome: &Genome,
    num_games: usize,
    mcts: AiKind,
    seed: u64,
    deadline: Option<Duration>,
) -> SkillReport {
    let mut report = SkillReport {
        genome_id: genome.genome_id.clone(),
        ..Default::default()
    };
    let engine = match driver.engine_for(genome) {
        Ok(engine) => engine,
        Err(_) => {
            report.failed = true;
            return report;
        }
    };
    let at = deadline.map(|d| Instant::now() + d);
    let half = (num_games / 2).max(1);
    let last_seat = engine.player_count() - 1;

    let mut first_seats = [AiKind::Random; crate::MAX_PLAYERS];
    first_seats[0] = mcts;
    let first = driver.run_batch_deadline(&engine, half, first_seats, seed, at, false);

    let mut last_seats = [AiKind::Random; crate::MAX_PLAYERS];
    last_seats[last_seat] = mcts;
    let last = driver.run_batch_deadline(&engine, half, last_seats, seed ^ 0xFFFF, at, false);

    report.games_as_first = first.stats.games;
    report.wins_as_first = first.stats.wins[0];
    report.games_as_last = last.stats.games;
    report.wins_as_last = last.stats.wins[last_seat];
    report.games = first.stats.games + last.stats.games;
    report.timed_out = first.stats.timed_out || last.stats.timed_out;
    report.win_rate = match report.games {
        0 => 0.0,
        games => (report.wins_as_first + report.wins_as_last) as f64 / games as f64,
    };
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    /// War is pure luck: search cannot beat random at flipping cards
    #[test]
    fn mcts_cannot_beat_random_at_war() {
        let driver = Driver::new();
        let reports = evaluate_top(
            &driver,
            &[catalog::war()],
            200,
            AiKind::Mcts500,
            12345,
            None,
        );
        let report = &reports[0];
        assert!(report.games == 200);
        assert!(!report.failed);
        assert!((report.win_rate - 0.5).abs() <= 0.1, "{}", report.win_rate);
    }

    #[test]
    fn symmetric_seating_splits_games() {
        let driver = Driver::new();
        let reports = evaluate_top(
            &driver,
            &[catalog::crazy_eights(), catalog::scopa()],
            20,
            AiKind::Mcts100,
            7,
            None,
        );
        assert!(reports.len() == 2);
        for report in reports {
            assert!(report.games_as_first == 10);
            assert!(report.games_as_last == 10);
        }
    }
}
