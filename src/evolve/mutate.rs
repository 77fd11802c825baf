//! The mutation pipeline. Each operator fires independently with its
//! own probability; operators aim for plausible edits and leave strict
//! validity to `validate_and_repair`.

use crate::cards::Location;
use crate::cards::Rank;
use crate::genome::BettingSpec;
use crate::genome::ClaimSpec;
use crate::genome::Cmp;
use crate::genome::Condition;
use crate::genome::DiscardSpec;
use crate::genome::DrawSpec;
use crate::genome::Effect;
use crate::genome::EffectKind;
use crate::genome::EffectTarget;
use crate::genome::Genome;
use crate::genome::Phase;
use crate::genome::PlaySpec;
use crate::genome::Probe;
use crate::genome::Test;
use crate::genome::WinKind;
use rand::rngs::SmallRng;
use rand::Rng;

#[derive(Debug, Clone, Copy)]
pub struct Mutator {
    pub parameter_rate: f64,
    pub reorder_rate: f64,
    pub add_phase_rate: f64,
    pub remove_phase_rate: f64,
    pub condition_rate: f64,
    pub effect_rate: f64,
    pub win_rate: f64,
}

impl Default for Mutator {
    fn default() -> Self {
        Self {
            parameter_rate: 0.40,
            reorder_rate: 0.15,
            add_phase_rate: 0.10,
            remove_phase_rate: 0.10,
            condition_rate: 0.20,
            effect_rate: 0.15,
            win_rate: 0.15,
        }
    }
}

impl Mutator {
    /// Produce a mutated copy; the input genome is never touched.
    pub fn mutate(&self, genome: &Genome, rng: &mut SmallRng) -> Genome {
        let mut child = genome.clone();
        if rng.random_bool(self.parameter_rate) {
            tweak_parameter(&mut child, rng);
        }
        if rng.random_bool(self.reorder_rate) && child.phases.len() >= 2 {
            let a = rng.random_range(0..child.phases.len());
            let b = rng.random_range(0..child.phases.len());
            child.phases.swap(a, b);
        }
        if rng.random_bool(self.add_phase_rate) && child.phases.len() < 6 {
            let at = rng.random_range(0..=child.phases.len());
            child.phases.insert(at, random_phase(&child, rng));
        }
        if rng.random_bool(self.remove_phase_rate) && child.phases.len() > 1 {
            let at = rng.random_range(0..child.phases.len());
            child.phases.remove(at);
        }
        if rng.random_bool(self.condition_rate) {
            mutate_condition(&mut child, rng);
        }
        if rng.random_bool(self.effect_rate) {
            mutate_effects(&mut child, rng);
        }
        if rng.random_bool(self.win_rate) && !child.win_conditions.is_empty() {
            mutate_win(&mut child, rng);
        }
        child
    }
}

fn tweak_parameter(genome: &mut Genome, rng: &mut SmallRng) {
    match rng.random_range(0..6) {
        0 => {
            let delta = rng.random_range(-2i32..=2);
            let cards = genome.setup.cards_per_player as i32 + delta;
            genome.setup.cards_per_player = cards.clamp(1, 13) as u8;
        }
        1 => {
            let scale = rng.random_range(0.7..1.3);
            let turns = (genome.max_turns as f64 * scale) as u32;
            genome.max_turns = turns.clamp(genome.min_turns.max(10), crate::MAX_TURN_BOUND);
        }
        2 => {
            genome.min_turns = rng.random_range(1..=5);
        }
        3 => {
            if genome.setup.starting_chips > 0 {
                let scale = rng.random_range(0.5..2.0);
                genome.setup.starting_chips =
                    ((genome.setup.starting_chips as f64 * scale) as u32).max(10);
            }
        }
        4 => {
            genome.setup.initial_discard = rng.random_range(0..=4);
        }
        _ => {
            // retune a per-phase numeric field
            if !genome.phases.is_empty() {
                let at = rng.random_range(0..genome.phases.len());
                tweak_phase(&mut genome.phases[at], rng);
            }
        }
    }
}

fn tweak_phase(phase: &mut Phase, rng: &mut SmallRng) {
    match phase {
        Phase::Draw(spec) => spec.count = rng.random_range(1..=3),
        Phase::Play(spec) => {
            spec.max_cards = rng.random_range(spec.min_cards.max(1)..=4);
            spec.pass_if_unable = rng.random_bool(0.5);
        }
        Phase::Discard(spec) => spec.count = rng.random_range(1..=3),
        Phase::Trick(spec) => spec.high_card_wins = rng.random_bool(0.8),
        Phase::Betting(spec) => {
            spec.min_bet = rng.random_range(1..=4) * 5;
            spec.max_raises = rng.random_range(1..=5);
        }
        Phase::Claim(spec) => spec.max_cards = rng.random_range(1..=4),
        Phase::Bidding(spec) => spec.allow_nil = rng.random_bool(0.5),
    }
}

/// phase templates the add-phase operator draws from; trick phases are
/// only grafted onto genomes that already deal with tricks
fn random_phase(genome: &Genome, rng: &mut SmallRng) -> Phase {
    let betting_ok = genome.setup.starting_chips > 0;
    match rng.random_range(0..if betting_ok { 5 } else { 4 }) {
        0 => Phase::Draw(DrawSpec {
            source: Location::Deck,
            count: 1,
            mandatory: false,
            condition: Some(Test::new(Probe::HandSize, Cmp::Le, rng.random_range(3..=10))),
        }),
        1 => Phase::Play(PlaySpec {
            target: Location::Discard,
            min_cards: 1,
            max_cards: 1,
            mandatory: false,
            pass_if_unable: true,
            condition: Some(Condition::Any(vec![
                Condition::Test(
                    Test::new(Probe::CardMatchesRank, Cmp::Eq, 1)
                        .against(crate::genome::condition::REF_TOP_DISCARD),
                ),
                Condition::Test(
                    Test::new(Probe::CardMatchesSuit, Cmp::Eq, 1)
                        .against(crate::genome::condition::REF_TOP_DISCARD),
                ),
            ])),
        }),
        2 => Phase::Discard(DiscardSpec {
            target: Location::Discard,
            count: 1,
            mandatory: false,
        }),
        3 => Phase::Claim(ClaimSpec {
            start_rank: Rank::from(rng.random_range(0..13u8)),
            sequential_rank: rng.random_bool(0.7),
            max_cards: rng.random_range(1..=4),
            allow_challenge: true,
            pile_penalty: true,
            claim_score: 0,
            penalty_score: 0,
        }),
        _ => Phase::Betting(BettingSpec {
            min_bet: rng.random_range(1..=4) * 5,
            max_raises: rng.random_range(1..=4),
        }),
    }
}

fn mutate_condition(genome: &mut Genome, rng: &mut SmallRng) {
    let targets: Vec<usize> = genome
        .phases
        .iter()
        .enumerate()
        .filter(|(_, p)| matches!(p, Phase::Play(spec) if spec.condition.is_some()))
        .map(|(i, _)| i)
        .collect();
    if targets.is_empty() {
        return;
    }
    let at = targets[rng.random_range(0..targets.len())];
    if let Phase::Play(spec) = &mut genome.phases[at] {
        if let Some(ref mut condition) = spec.condition {
            flip_some_leaf(condition, rng);
        }
    }
}

fn flip_some_leaf(condition: &mut Condition, rng: &mut SmallRng) {
    match condition {
        Condition::Test(test) => match rng.random_range(0..2) {
            0 => test.cmp = test.cmp.flipped(),
            _ => test.value += rng.random_range(-2i32..=2),
        },
        Condition::All(kids) | Condition::Any(kids) => {
            if !kids.is_empty() {
                let at = rng.random_range(0..kids.len());
                flip_some_leaf(&mut kids[at], rng);
            }
        }
    }
}

fn mutate_effects(genome: &mut Genome, rng: &mut SmallRng) {
    let remove = !genome.effects.is_empty() && rng.random_bool(0.4);
    if remove {
        let keys: Vec<Rank> = genome.effects.keys().copied().collect();
        let victim = keys[rng.random_range(0..keys.len())];
        genome.effects.remove(&victim);
        return;
    }
    if genome.effects.len() >= 4 {
        return;
    }
    let rank = Rank::from(rng.random_range(0..13u8));
    let kind = match rng.random_range(0..5) {
        0 => EffectKind::ExtraTurn,
        1 => EffectKind::SkipNext,
        2 => EffectKind::Reverse,
        3 => EffectKind::ForceDraw,
        _ => EffectKind::ForceDiscard,
    };
    genome.effects.insert(
        rank,
        Effect {
            kind,
            target: match rng.random_bool(0.8) {
                true => EffectTarget::NextPlayer,
                false => EffectTarget::AllOpponents,
            },
            value: rng.random_range(1..=3),
        },
    );
}

fn mutate_win(genome: &mut Genome, rng: &mut SmallRng) {
    let at = rng.random_range(0..genome.win_conditions.len());
    let win = &mut genome.win_conditions[at];
    match rng.random_range(0..2) {
        0 => {
            win.kind = random_win_kind(rng);
        }
        _ => {
            let scale = rng.random_range(0.5..1.5);
            win.threshold = ((win.threshold as f64 * scale) as i32).max(0);
        }
    }
}

fn random_win_kind(rng: &mut SmallRng) -> WinKind {
    match rng.random_range(0..10u8) {
        0 => WinKind::EmptyHand,
        1 => WinKind::HighScore,
        2 => WinKind::LowScore,
        3 => WinKind::FirstToScore,
        4 => WinKind::MostTricks,
        5 => WinKind::FewestTricks,
        6 => WinKind::MostCaptured,
        7 => WinKind::CaptureAll,
        8 => WinKind::AllHandsEmpty,
        _ => WinKind::MostChips,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn mutation_never_edits_the_parent() {
        let parent = crate::catalog::crazy_eights();
        let snapshot = parent.clone();
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..50 {
            let _ = Mutator::default().mutate(&parent, &mut rng);
        }
        assert!(parent == snapshot);
    }

    #[test]
    fn mutants_repair_to_valid() {
        let mut rng = SmallRng::seed_from_u64(17);
        for seed in crate::catalog::all() {
            for _ in 0..20 {
                let mutant = Mutator::default().mutate(&seed, &mut rng);
                let repaired = super::super::repair::validate_and_repair(mutant);
                assert!(repaired.validate().is_ok(), "{}", seed.genome_id);
            }
        }
    }
}
