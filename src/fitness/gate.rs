//! The playability gate. Hard failures zero the fitness outright; soft
//! failures multiply it down. Gate logic sees only aggregates, never
//! individual games.

use super::metrics::Metrics;
use super::metrics::SkillInputs;
use crate::sim::AggregatedStats;

#[derive(Debug, Clone, Default)]
pub struct GateOutcome {
    pub hard_fail: bool,
    pub multiplier: f64,
    pub reasons: Vec<&'static str>,
}

pub fn evaluate(
    stats: &AggregatedStats,
    metrics: &Metrics,
    skill: Option<SkillInputs>,
) -> GateOutcome {
    let mut outcome = GateOutcome {
        hard_fail: false,
        multiplier: 1.0,
        reasons: vec![],
    };
    let games = stats.games.max(1) as f64;
    if stats.error_rate() > 0.5 {
        outcome.hard_fail = true;
        outcome.reasons.push("error rate above 50%");
    }
    if stats.draw_rate() > 0.95 {
        outcome.hard_fail = true;
        outcome.reasons.push("draw rate above 95%");
    }
    if (stats.total_decisions as f64 / games) < 1.0 {
        outcome.hard_fail = true;
        outcome.reasons.push("under one decision per game");
    }
    if stats.avg_turns < 2.0 {
        outcome.hard_fail = true;
        outcome.reasons.push("games shorter than two turns");
    }
    if outcome.hard_fail {
        outcome.multiplier = 0.0;
        return outcome;
    }

    if stats.forced_rate() > 0.95 {
        outcome.multiplier *= 0.1;
        outcome.reasons.push("almost every move is forced");
    }
    let top_win_rate = (0..crate::MAX_PLAYERS)
        .map(|seat| stats.win_rate(seat))
        .fold(0.0f64, f64::max);
    if top_win_rate > 0.8 {
        outcome.multiplier *= 0.6;
        outcome.reasons.push("one seat dominates");
    }
    if metrics.comeback < 0.15 {
        outcome.multiplier *= 0.5;
        outcome.reasons.push("no comebacks");
    }
    if skill.is_some() && metrics.skill < 0.15 {
        outcome.multiplier *= 0.7;
        outcome.reasons.push("skill indistinguishable from luck");
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy_stats() -> AggregatedStats {
        AggregatedStats {
            games: 100,
            wins: [40, 35, 0, 0],
            draws: 25,
            avg_turns: 50.0,
            total_decisions: 2_000,
            forced_decisions: 200,
            comebacks: 30,
            ..Default::default()
        }
    }

    #[test]
    fn healthy_game_passes_clean() {
        let stats = healthy_stats();
        let metrics = Metrics {
            comeback: 0.4,
            skill: 0.5,
            ..Default::default()
        };
        let outcome = evaluate(&stats, &metrics, None);
        assert!(!outcome.hard_fail);
        assert!(outcome.multiplier == 1.0);
    }

    #[test]
    fn draw_flood_hard_fails() {
        let mut stats = healthy_stats();
        stats.wins = [2, 2, 0, 0];
        stats.draws = 96;
        let outcome = evaluate(&stats, &Metrics::default(), None);
        assert!(outcome.hard_fail);
        assert!(outcome.multiplier == 0.0);
    }

    #[test]
    fn forced_play_is_heavily_penalized() {
        let mut stats = healthy_stats();
        stats.forced_decisions = 1_990;
        let metrics = Metrics {
            comeback: 0.4,
            ..Default::default()
        };
        let outcome = evaluate(&stats, &metrics, None);
        assert!(!outcome.hard_fail);
        assert!(outcome.multiplier < 0.15);
    }
}
