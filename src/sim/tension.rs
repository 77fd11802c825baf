//! Leader tracking and the tension trio. A per-genome leader metric
//! reads who is ahead and by how much; the accumulator folds that into
//! lead changes, the closest margin seen, and the decisive turn.

use crate::genome::Phase;
use crate::genome::WinKind;
use crate::interpreter::Engine;
use crate::state::GameState;

/// How to read "who is winning" for a given genome: chosen from the
/// first win condition, falling back on phase structure, then score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderMetric {
    /// fewest cards in hand leads (shedding games)
    HandShedding,
    Score,
    /// lowest score leads (Hearts)
    ScoreLow,
    Tricks,
    Chips,
    Captured,
}

impl LeaderMetric {
    pub fn for_engine(engine: &Engine) -> Self {
        match engine.wins().first().map(|w| w.kind) {
            Some(WinKind::EmptyHand) | Some(WinKind::AllHandsEmpty) => LeaderMetric::HandShedding,
            Some(WinKind::LowScore) | Some(WinKind::FewestTricks) => LeaderMetric::ScoreLow,
            Some(WinKind::MostTricks) => LeaderMetric::Tricks,
            Some(WinKind::MostChips) => LeaderMetric::Chips,
            Some(WinKind::MostCaptured) | Some(WinKind::CaptureAll) => LeaderMetric::Captured,
            Some(WinKind::HighScore) | Some(WinKind::FirstToScore) => LeaderMetric::Score,
            None => match () {
                _ if engine.phases().iter().any(|p| matches!(p, Phase::Betting(_))) => {
                    LeaderMetric::Chips
                }
                _ if engine.phases().iter().any(|p| matches!(p, Phase::Trick(_))) => {
                    LeaderMetric::Tricks
                }
                _ => LeaderMetric::Score,
            },
        }
    }

    /// (leader seat or -1 on a tie, normalized margin in [0, 1])
    pub fn leader(&self, state: &GameState) -> (i32, f64) {
        let values: Vec<f64> = state
            .players
            .iter()
            .map(|p| match self {
                LeaderMetric::HandShedding => -(p.hand.len() as f64),
                LeaderMetric::Score => p.score as f64,
                LeaderMetric::ScoreLow => -(p.score as f64),
                LeaderMetric::Tricks => p.tricks_won as f64,
                LeaderMetric::Chips => p.chips as f64,
                LeaderMetric::Captured => (p.captured.len() + p.hand.len()) as f64,
            })
            .collect();
        rank_leader(&values)
    }
}

fn rank_leader(values: &[f64]) -> (i32, f64) {
    let mut best = f64::MIN;
    let mut second = f64::MIN;
    let mut leader = -1i32;
    for (seat, value) in values.iter().enumerate() {
        if *value > best {
            second = best;
            best = *value;
            leader = seat as i32;
        } else if *value > second {
            second = *value;
        }
    }
    if values.iter().filter(|v| **v == best).count() > 1 {
        return (-1, 0.0);
    }
    let scale = best.abs().max(second.abs()).max(1.0);
    (leader, ((best - second) / (2.0 * scale)).clamp(0.0, 1.0))
}

#[derive(Debug, Clone, Default)]
pub struct TensionMetrics {
    lead_changes: u32,
    closest_margin: f64,
    seen_any: bool,
    last_leader: i32,
    /// (turn, leader) after every applied move
    history: Vec<(u32, i32)>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TensionSummary {
    pub lead_changes: u32,
    pub closest_margin: f64,
    pub decisive_turn_pct: f64,
    pub midpoint_leader: i32,
}

impl TensionMetrics {
    pub fn new() -> Self {
        Self {
            closest_margin: 1.0,
            last_leader: -1,
            ..Default::default()
        }
    }

    /// called after every applied move; ties never count as changes
    pub fn record(&mut self, turn: u32, leader: i32, margin: f64) {
        if leader >= 0 {
            if self.seen_any && self.last_leader >= 0 && leader != self.last_leader {
                self.lead_changes += 1;
            }
            self.last_leader = leader;
            self.seen_any = true;
            self.closest_margin = self.closest_margin.min(margin);
        }
        self.history.push((turn, leader));
    }

    /// The decisive turn is the earliest recorded point after which the
    /// winner never lost the lead. Draws read as never-decided.
    pub fn finish(&self, winner: i32, total_turns: u32) -> TensionSummary {
        let midpoint_leader = match self.history.is_empty() {
            true => -1,
            false => self.history[self.history.len() / 2].1,
        };
        if winner < 0 {
            return TensionSummary {
                lead_changes: self.lead_changes,
                closest_margin: self.closest_margin,
                decisive_turn_pct: 1.0,
                midpoint_leader,
            };
        }
        let mut decisive = total_turns;
        for (turn, leader) in self.history.iter().rev() {
            match *leader == winner {
                true => decisive = *turn,
                false => break,
            }
        }
        let decisive_turn_pct = match total_turns {
            0 => 1.0,
            n => (decisive as f64 / n as f64).clamp(0.0, 1.0),
        };
        TensionSummary {
            lead_changes: self.lead_changes,
            closest_margin: self.closest_margin,
            decisive_turn_pct,
            midpoint_leader,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_lead_changes_ignoring_ties() {
        let mut tension = TensionMetrics::new();
        tension.record(0, 0, 0.2);
        tension.record(1, -1, 0.0);
        tension.record(2, 0, 0.1);
        tension.record(3, 1, 0.3);
        tension.record(4, 0, 0.2);
        let summary = tension.finish(0, 5);
        assert!(summary.lead_changes == 2);
        assert!(summary.closest_margin == 0.1);
    }

    #[test]
    fn decisive_turn_is_last_takeover() {
        let mut tension = TensionMetrics::new();
        tension.record(1, 1, 0.5);
        tension.record(2, 1, 0.5);
        tension.record(3, 0, 0.2);
        tension.record(4, 0, 0.4);
        let summary = tension.finish(0, 4);
        assert!(summary.decisive_turn_pct == 0.75);
    }

    #[test]
    fn draw_reads_as_never_decided() {
        let mut tension = TensionMetrics::new();
        tension.record(1, 0, 0.5);
        let summary = tension.finish(-1, 10);
        assert!(summary.decisive_turn_pct == 1.0);
    }

    #[test]
    fn leader_metric_prefers_first_win_kind() {
        let engine =
            crate::interpreter::Engine::from_genome(&crate::catalog::hearts()).expect("engine");
        assert!(LeaderMetric::for_engine(&engine) == LeaderMetric::ScoreLow);
        let engine =
            crate::interpreter::Engine::from_genome(&crate::catalog::guts()).expect("engine");
        assert!(LeaderMetric::for_engine(&engine) == LeaderMetric::Chips);
    }
}
