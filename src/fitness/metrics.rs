//! The eight behavioral metrics, each normalized into [0, 1]. These are
//! proxies for fun, not measurements of it; the weighting layer is
//! where taste lives.

use super::weights::FitnessConfig;
use super::weights::Weights;
use crate::genome::Genome;
use crate::genome::Phase;
use crate::sim::AggregatedStats;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Metrics {
    pub decision_density: f64,
    pub comeback: f64,
    pub tension: f64,
    pub interaction: f64,
    pub complexity: f64,
    pub skill: f64,
    pub bluffing: f64,
    pub session: f64,
}

/// win rates from the dedicated skill batches of the expensive phase
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SkillInputs {
    pub greedy_vs_random: f64,
    pub mcts_vs_random: f64,
}

impl Metrics {
    pub fn measure(
        genome: &Genome,
        stats: &AggregatedStats,
        skill: Option<SkillInputs>,
        config: &FitnessConfig,
    ) -> Self {
        Self {
            decision_density: 1.0 - stats.forced_rate(),
            comeback: comeback(stats),
            tension: tension(stats),
            interaction: interaction(stats),
            complexity: complexity(genome, config),
            skill: skill_score(skill),
            bluffing: bluffing(genome, stats),
            session: unimodal(
                stats.avg_turns,
                config.session_low,
                config.session_target,
                config.session_high,
            ),
        }
    }

    /// weighted mean, the playability multiplier applied by the caller
    pub fn weighted(&self, weights: &Weights) -> f64 {
        let total = weights.total();
        if total <= 0.0 {
            return 0.0;
        }
        (self.decision_density * weights.decision_density
            + self.comeback * weights.comeback
            + self.tension * weights.tension
            + self.interaction * weights.interaction
            + self.complexity * weights.complexity
            + self.skill * weights.skill
            + self.bluffing * weights.bluffing
            + self.session * weights.session)
            / total
    }
}

fn comeback(stats: &AggregatedStats) -> f64 {
    let decided: u32 = stats.wins.iter().sum();
    match decided {
        0 => 0.0,
        n => stats.comebacks as f64 / n as f64,
    }
}

fn tension(stats: &AggregatedStats) -> f64 {
    let expected_changes = (stats.avg_turns / 20.0).max(1.0);
    let change_score = (stats.avg_lead_changes / expected_changes).min(1.0);
    0.4 * change_score + 0.4 * stats.avg_decisive_turn_pct + 0.2 * (1.0 - stats.avg_closest_margin)
}

fn interaction(stats: &AggregatedStats) -> f64 {
    match stats.total_actions {
        0 => 0.0,
        n => (stats.total_interactions as f64 / n as f64).min(1.0),
    }
}

/// unimodal in a weighted structure count: too simple scores nothing,
/// so does rule soup
fn complexity(genome: &Genome, config: &FitnessConfig) -> f64 {
    let raw = genome.phases.len() as f64
        + 0.5 * genome.condition_nodes() as f64
        + 0.5 * genome.effects.len() as f64
        + genome.scoring.as_ref().map(|_| 1.0).unwrap_or(0.0);
    unimodal(raw, config.complexity_low, config.complexity_peak, config.complexity_high)
}

/// both skill gaps folded into one score; unmeasured reads neutral
fn skill_score(skill: Option<SkillInputs>) -> f64 {
    match skill {
        None => 0.5,
        Some(inputs) => {
            let greedy = ((inputs.greedy_vs_random - 0.5) * 2.0).clamp(0.0, 1.0);
            let mcts = ((inputs.mcts_vs_random - 0.5) * 2.0).clamp(0.0, 1.0);
            0.5 * greedy + 0.5 * mcts
        }
    }
}

/// rewards claim phases whose challenges actually cut both ways
fn bluffing(genome: &Genome, stats: &AggregatedStats) -> f64 {
    let has_claims = genome.phases.iter().any(|p| match p {
        Phase::Claim(spec) => spec.allow_challenge,
        _ => false,
    });
    if !has_claims {
        return 0.0;
    }
    if stats.challenges == 0 {
        return 0.2;
    }
    let p = stats.challenges_upheld as f64 / stats.challenges as f64;
    0.4 + 0.6 * 4.0 * p * (1.0 - p)
}

fn unimodal(x: f64, low: f64, peak: f64, high: f64) -> f64 {
    if x <= low || x >= high {
        return 0.0;
    }
    match x <= peak {
        true => (x - low) / (peak - low),
        false => (high - x) / (high - peak),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn unimodal_shape() {
        assert!(unimodal(1.0, 1.0, 4.0, 14.0) == 0.0);
        assert!(unimodal(4.0, 1.0, 4.0, 14.0) == 1.0);
        assert!(unimodal(9.0, 1.0, 4.0, 14.0) == 0.5);
        assert!(unimodal(20.0, 1.0, 4.0, 14.0) == 0.0);
    }

    #[test]
    fn war_has_zero_decision_density() {
        let driver = crate::sim::Driver::new();
        let batch = driver
            .run_batch(&catalog::war(), 20, crate::sim::AiKind::Random, 5)
            .expect("batch");
        let metrics = Metrics::measure(
            &catalog::war(),
            &batch.stats,
            None,
            &FitnessConfig::default(),
        );
        // every War decision is forced, the flip is blind
        assert!(metrics.decision_density == 0.0);
        assert!(metrics.bluffing == 0.0);
    }

    #[test]
    fn weighted_mean_respects_weights() {
        let metrics = Metrics {
            skill: 1.0,
            ..Default::default()
        };
        let mut weights = Weights::balanced();
        assert!(metrics.weighted(&weights) == 1.0 / 8.0);
        weights.skill = 7.0;
        assert!(metrics.weighted(&weights) == 0.5);
    }
}
