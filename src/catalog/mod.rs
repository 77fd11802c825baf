//! Seed genomes for known games. Evolution starts from these; the test
//! suite leans on them as fixtures. Each is an approximation of the
//! folk game expressed in genome space, not a faithful rulebook.

use crate::cards::Location;
use crate::cards::Rank;
use crate::cards::Suit;
use crate::genome::condition::REF_TOP_DISCARD;
use crate::genome::BettingSpec;
use crate::genome::BiddingSpec;
use crate::genome::ClaimSpec;
use crate::genome::Cmp;
use crate::genome::Condition;
use crate::genome::ContractScoring;
use crate::genome::DiscardSpec;
use crate::genome::DrawSpec;
use crate::genome::Effect;
use crate::genome::EffectKind;
use crate::genome::EffectTarget;
use crate::genome::Genome;
use crate::genome::Phase;
use crate::genome::PlaySpec;
use crate::genome::Probe;
use crate::genome::Scoring;
use crate::genome::TableauMode;
use crate::genome::Test;
use crate::genome::TrickSpec;
use crate::genome::Visibility;
use crate::genome::WinCondition;
use crate::genome::WinKind;

pub fn all() -> Vec<Genome> {
    vec![
        war(),
        crazy_eights(),
        hearts(),
        spades(),
        cheat(),
        gin_rummy(),
        scopa(),
        guts(),
    ]
}

/// Pure-luck flip battle. Hands are face-down so plays are blind; the
/// war pile returns to the round winner and the game ends when one
/// player holds everything. This genome doubles as the golden bytecode
/// vector.
pub fn war() -> Genome {
    let mut g = Genome::blank("seed-war", 2);
    g.setup.cards_per_player = 26;
    g.setup.hand_visibility = Visibility::FaceDown;
    g.setup.tableau_mode = TableauMode::War;
    g.phases = vec![Phase::Play(PlaySpec {
        target: Location::Tableau,
        min_cards: 1,
        max_cards: 1,
        mandatory: true,
        pass_if_unable: false,
        condition: None,
    })];
    g.win_conditions = vec![WinCondition::new(WinKind::CaptureAll, 0)];
    g.max_turns = 2_000;
    g
}

/// Shed by matching rank or suit; eights are wild, twos punish, queens
/// skip. A turn with no playable card passes.
pub fn crazy_eights() -> Genome {
    let mut g = Genome::blank("seed-crazy8s", 2);
    g.setup.cards_per_player = 7;
    g.setup.initial_discard = 1;
    g.setup.wild_ranks = vec![Rank::Eight];
    g.phases = vec![Phase::Play(PlaySpec {
        target: Location::Discard,
        min_cards: 1,
        max_cards: 1,
        mandatory: false,
        pass_if_unable: true,
        condition: Some(Condition::Any(vec![
            Condition::Test(
                Test::new(Probe::CardMatchesRank, Cmp::Eq, 1).against(REF_TOP_DISCARD),
            ),
            Condition::Test(
                Test::new(Probe::CardMatchesSuit, Cmp::Eq, 1).against(REF_TOP_DISCARD),
            ),
        ])),
    })];
    g.effects.insert(
        Rank::Two,
        Effect {
            kind: EffectKind::ForceDraw,
            target: EffectTarget::NextPlayer,
            value: 2,
        },
    );
    g.effects.insert(
        Rank::Queen,
        Effect {
            kind: EffectKind::SkipNext,
            target: EffectTarget::NextPlayer,
            value: 0,
        },
    );
    g.win_conditions = vec![WinCondition::new(WinKind::EmptyHand, 0)];
    g.max_turns = 300;
    g
}

/// Classic trick avoidance: follow suit, hearts score against you,
/// hearts cannot lead until broken, lowest total wins the race to 50.
pub fn hearts() -> Genome {
    let mut g = Genome::blank("seed-hearts", 4);
    g.setup.cards_per_player = 13;
    g.is_trick_based = true;
    g.tricks_per_hand = Some(13);
    g.phases = vec![Phase::Trick(TrickSpec {
        lead_suit_required: true,
        trump_suit: None,
        high_card_wins: true,
        breaking_suit: Some(Suit::Heart),
    })];
    g.scoring = Some(Scoring::per_suit(Suit::Heart, 1));
    g.win_conditions = vec![WinCondition::new(WinKind::LowScore, 50)];
    g.max_turns = 500;
    g
}

/// Partnership bidding with spades as trump and contract scoring.
pub fn spades() -> Genome {
    let mut g = Genome::blank("seed-spades", 4);
    g.setup.cards_per_player = 13;
    g.is_trick_based = true;
    g.tricks_per_hand = Some(13);
    g.phases = vec![
        Phase::Bidding(BiddingSpec {
            min_bid: 1,
            max_bid: 6,
            allow_nil: true,
            blind_nil: false,
        }),
        Phase::Trick(TrickSpec {
            lead_suit_required: true,
            trump_suit: Some(Suit::Spade),
            high_card_wins: true,
            breaking_suit: None,
        }),
    ];
    g.scoring = Some(Scoring {
        team_mode: true,
        rank_points: [0; 13],
        suit_points: [0; 4],
        contract: Some(ContractScoring::default()),
    });
    g.win_conditions = vec![WinCondition::new(WinKind::FirstToScore, 150)];
    g.max_turns = 800;
    g
}

/// Sequential-rank claims, challenges, and the pile as the price of
/// getting caught.
pub fn cheat() -> Genome {
    let mut g = Genome::blank("seed-cheat", 3);
    g.setup.cards_per_player = 17;
    g.phases = vec![Phase::Claim(ClaimSpec {
        start_rank: Rank::Ace,
        sequential_rank: true,
        max_cards: 4,
        allow_challenge: true,
        pile_penalty: true,
        claim_score: 0,
        penalty_score: 0,
    })];
    g.win_conditions = vec![WinCondition::new(WinKind::EmptyHand, 0)];
    g.max_turns = 400;
    g
}

/// Draw-meld-discard shedding in the rummy family: sets of three or
/// four leave the hand, first empty hand wins.
pub fn gin_rummy() -> Genome {
    let mut g = Genome::blank("seed-gin", 2);
    g.setup.cards_per_player = 10;
    g.phases = vec![
        Phase::Draw(DrawSpec {
            source: Location::Deck,
            count: 1,
            mandatory: true,
            condition: None,
        }),
        Phase::Play(PlaySpec {
            target: Location::Discard,
            min_cards: 3,
            max_cards: 4,
            mandatory: false,
            pass_if_unable: false,
            condition: None,
        }),
        Phase::Discard(DiscardSpec {
            target: Location::Discard,
            count: 1,
            mandatory: true,
        }),
    ];
    g.win_conditions = vec![WinCondition::new(WinKind::EmptyHand, 0)];
    g.max_turns = 300;
    g
}

/// Match-rank capture on an open table; the biggest score pile wins
/// once the deck runs dry. The conditional draw refills an empty hand.
pub fn scopa() -> Genome {
    let mut g = Genome::blank("seed-scopa", 2);
    g.setup.cards_per_player = 3;
    g.setup.initial_tableau = 4;
    g.setup.tableau_mode = TableauMode::MatchRank;
    g.phases = vec![
        Phase::Draw(DrawSpec {
            source: Location::Deck,
            count: 3,
            mandatory: false,
            condition: Some(Test::new(Probe::HandSize, Cmp::Eq, 0)),
        }),
        Phase::Play(PlaySpec {
            target: Location::Tableau,
            min_cards: 1,
            max_cards: 1,
            mandatory: true,
            pass_if_unable: true,
            condition: None,
        }),
    ];
    g.win_conditions = vec![WinCondition::new(WinKind::MostCaptured, 0)];
    g.max_turns = 200;
    g
}

/// Chip pressure with a high-card showdown every round; first to double
/// the stake takes it.
pub fn guts() -> Genome {
    let mut g = Genome::blank("seed-guts", 2);
    g.setup.cards_per_player = 2;
    g.setup.starting_chips = 100;
    g.phases = vec![Phase::Betting(BettingSpec {
        min_bet: 10,
        max_raises: 3,
    })];
    g.win_conditions = vec![WinCondition::new(WinKind::MostChips, 200)];
    g.max_turns = 200;
    g
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let seeds = all();
        let mut ids: Vec<&str> = seeds.iter().map(|g| g.genome_id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert!(ids.len() == seeds.len());
    }

    #[test]
    fn every_seed_compiles() {
        for genome in all() {
            assert!(crate::bytecode::compile(&genome).is_ok(), "{}", genome.genome_id);
        }
    }
}
