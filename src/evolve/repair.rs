//! Minimal-edit repair. Breeding output may violate the structural
//! invariants; this pass clamps and patches rather than rebuilding, so
//! novel structure survives wherever possible. Falling all the way back
//! to a default phase or win condition is logged for audit.

use crate::cards::Location;
use crate::genome::validate::MAX_CONDITION_DEPTH;
use crate::genome::validate::MAX_CONDITION_FANOUT;
use crate::genome::Condition;
use crate::genome::Genome;
use crate::genome::Phase;
use crate::genome::PlaySpec;
use crate::genome::WinCondition;
use crate::genome::WinKind;

pub fn validate_and_repair(mut genome: Genome) -> Genome {
    genome.player_count = genome.player_count.clamp(2, 4);

    if genome.phases.is_empty() {
        log::warn!("repair audit: {} reset to the default play phase", genome.genome_id);
        genome.phases.push(default_play_phase());
    }
    if genome.win_conditions.is_empty() {
        log::warn!("repair audit: {} reset to the empty-hand win", genome.genome_id);
        genome
            .win_conditions
            .push(WinCondition::new(WinKind::EmptyHand, 0));
    }

    // the deal must fit the deck
    genome.setup.cards_per_player = genome.setup.cards_per_player.clamp(1, 13);
    genome.setup.wild_ranks.sort();
    genome.setup.wild_ranks.dedup();
    genome.setup.wild_ranks.truncate(4);
    while genome.cards_dealt() > crate::DECK_SIZE {
        if genome.setup.initial_tableau > 0 {
            genome.setup.initial_tableau -= 1;
        } else if genome.setup.initial_discard > 0 {
            genome.setup.initial_discard -= 1;
        } else {
            genome.setup.cards_per_player = genome.setup.cards_per_player.saturating_sub(1).max(1);
        }
    }

    genome.min_turns = genome.min_turns.clamp(1, 100);
    genome.max_turns = genome.max_turns.clamp(genome.min_turns, crate::MAX_TURN_BOUND);

    repair_phases(&mut genome);
    repair_tricks(&mut genome);
    repair_wins(&mut genome);

    debug_assert!(genome.validate().is_ok(), "{:?}", genome.validate());
    genome
}

fn default_play_phase() -> Phase {
    Phase::Play(PlaySpec {
        target: Location::Discard,
        min_cards: 1,
        max_cards: 1,
        mandatory: false,
        pass_if_unable: true,
        condition: None,
    })
}

fn repair_phases(genome: &mut Genome) {
    let mut needs_chips = false;
    for phase in genome.phases.iter_mut() {
        match phase {
            Phase::Draw(spec) => {
                spec.count = spec.count.clamp(1, 5);
                if !matches!(
                    spec.source,
                    Location::Deck | Location::Discard | Location::OpponentHand
                ) {
                    spec.source = Location::Deck;
                }
            }
            Phase::Play(spec) => {
                spec.min_cards = spec.min_cards.max(1);
                spec.max_cards = spec.max_cards.clamp(spec.min_cards, 8);
                if !matches!(spec.target, Location::Discard | Location::Tableau) {
                    spec.target = Location::Discard;
                }
                if let Some(condition) = spec.condition.take() {
                    spec.condition = repair_condition(condition);
                }
            }
            Phase::Discard(spec) => {
                spec.count = spec.count.clamp(1, 5);
                if !matches!(spec.target, Location::Discard | Location::Tableau) {
                    spec.target = Location::Discard;
                }
            }
            Phase::Trick(_) => {}
            Phase::Betting(spec) => {
                spec.min_bet = spec.min_bet.clamp(1, 1_000);
                spec.max_raises = spec.max_raises.min(10);
                needs_chips = true;
            }
            Phase::Claim(spec) => {
                spec.max_cards = spec.max_cards.clamp(1, 8);
            }
            Phase::Bidding(spec) => {
                if spec.min_bid > spec.max_bid {
                    std::mem::swap(&mut spec.min_bid, &mut spec.max_bid);
                }
                spec.min_bid = spec.min_bid.max(1);
                spec.max_bid = spec.max_bid.clamp(spec.min_bid, 13);
            }
        }
    }
    if needs_chips && genome.setup.starting_chips == 0 {
        genome.setup.starting_chips = 100;
    }
}

fn repair_tricks(genome: &mut Genome) {
    let has_trick = genome.phases.iter().any(|p| matches!(p, Phase::Trick(_)));
    genome.is_trick_based = has_trick;
    if has_trick {
        let cap = genome.setup.cards_per_player as u32;
        let tricks = genome.tricks_per_hand.unwrap_or(cap).clamp(1, cap);
        genome.tricks_per_hand = Some(tricks);
    } else {
        genome.tricks_per_hand = None;
        // bidding without tricks has nothing to bid on
        genome
            .phases
            .retain(|p| !matches!(p, Phase::Bidding(_)));
        if genome.phases.is_empty() {
            log::warn!("repair audit: {} reset to the default play phase", genome.genome_id);
            genome.phases.push(default_play_phase());
        }
    }
}

fn repair_wins(genome: &mut Genome) {
    for win in genome.win_conditions.iter_mut() {
        win.threshold = win.threshold.max(0);
        // score races with trivial thresholds end on the first point
        if matches!(
            win.kind,
            WinKind::HighScore | WinKind::LowScore | WinKind::FirstToScore | WinKind::MostChips
        ) {
            win.threshold = win.threshold.max(5);
        }
    }
    let mut kept: Vec<WinCondition> = vec![];
    for win in genome.win_conditions.drain(..) {
        let duplicate = kept.iter().any(|k| k.kind == win.kind);
        let contradiction = kept.iter().any(|k| k.kind.conflicts_with(&win.kind));
        if !duplicate && !contradiction {
            kept.push(win);
        }
    }
    genome.win_conditions = kept;
    genome.win_conditions.truncate(4);
}

/// depth and fanout clamps; a tree past the depth limit collapses to
/// its first leaf, an empty compound disappears
fn repair_condition(condition: Condition) -> Option<Condition> {
    let condition = clamp_fanout(condition)?;
    if condition.depth() > MAX_CONDITION_DEPTH {
        return condition
            .leaves()
            .first()
            .map(|leaf| Condition::Test(**leaf));
    }
    Some(condition)
}

fn clamp_fanout(condition: Condition) -> Option<Condition> {
    match condition {
        Condition::Test(test) => Some(Condition::Test(test)),
        Condition::All(kids) => {
            let kids: Vec<Condition> = kids
                .into_iter()
                .filter_map(clamp_fanout)
                .take(MAX_CONDITION_FANOUT)
                .collect();
            match kids.is_empty() {
                true => None,
                false => Some(Condition::All(kids)),
            }
        }
        Condition::Any(kids) => {
            let kids: Vec<Condition> = kids
                .into_iter()
                .filter_map(clamp_fanout)
                .take(MAX_CONDITION_FANOUT)
                .collect();
            match kids.is_empty() {
                true => None,
                false => Some(Condition::Any(kids)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repair_is_idempotent() {
        let mut rng = {
            use rand::SeedableRng;
            rand::rngs::SmallRng::seed_from_u64(23)
        };
        let mutator = super::super::mutate::Mutator::default();
        for seed in crate::catalog::all() {
            for _ in 0..10 {
                let mutant = mutator.mutate(&seed, &mut rng);
                let once = validate_and_repair(mutant);
                let twice = validate_and_repair(once.clone());
                assert!(once == twice, "{}", seed.genome_id);
            }
        }
    }

    #[test]
    fn empty_genome_gets_minimal_rules() {
        let repaired = validate_and_repair(Genome::blank("hollow", 2));
        assert!(repaired.validate().is_ok());
        assert!(repaired.phases.len() == 1);
        assert!(repaired.win_conditions.len() == 1);
    }

    #[test]
    fn oversized_deal_is_cut_down() {
        let mut genome = crate::catalog::war();
        genome.player_count = 4;
        let repaired = validate_and_repair(genome);
        assert!(repaired.cards_dealt() <= crate::DECK_SIZE);
    }

    #[test]
    fn contradictory_wins_keep_the_earliest() {
        let mut genome = crate::catalog::hearts();
        genome
            .win_conditions
            .push(WinCondition::new(WinKind::HighScore, 50));
        let repaired = validate_and_repair(genome);
        assert!(repaired.win_conditions.len() == 1);
        assert!(repaired.win_conditions[0].kind == WinKind::LowScore);
    }
}
