//! Condition evaluation against live state. A leaf reads one quantity,
//! applies its comparator, done; compounds short-circuit. Boolean probes
//! read as 1/0 so the comparator machinery stays uniform.

use crate::cards::Card;
use crate::cards::Location;
use crate::cards::Rank;
use crate::genome::condition::REF_LAST_PLAYED;
use crate::genome::condition::REF_TOP_DISCARD;
use crate::genome::Condition;
use crate::genome::Probe;
use crate::genome::SequenceDirection;
use crate::genome::Test;
use crate::state::GameState;

/// Everything a test may look at: the state, whose turn it is, the
/// candidate card for per-card conditions, and the wild ranks that
/// match anything.
pub struct Ctx<'a> {
    pub state: &'a GameState,
    pub actor: usize,
    pub card: Option<Card>,
    pub wilds: &'a [Rank],
}

impl Ctx<'_> {
    fn is_wild(&self, card: Card) -> bool {
        self.wilds.contains(&card.rank())
    }
    /// top-of-discard unless the test points at the last tableau card
    fn reference(&self, test: &Test) -> Option<Card> {
        match test.reference {
            REF_LAST_PLAYED => self.state.top_tableau(),
            REF_TOP_DISCARD => self.state.top_discard(),
            _ => self.state.top_discard(),
        }
    }
}

pub fn eval(condition: &Condition, ctx: &Ctx) -> bool {
    match condition {
        Condition::Test(test) => eval_test(test, ctx),
        Condition::All(kids) => kids.iter().all(|kid| eval(kid, ctx)),
        Condition::Any(kids) => kids.iter().any(|kid| eval(kid, ctx)),
    }
}

pub fn eval_test(test: &Test, ctx: &Ctx) -> bool {
    test.cmp.apply(probe_value(test, ctx), test.value)
}

fn probe_value(test: &Test, ctx: &Ctx) -> i32 {
    let state = ctx.state;
    let hand = &state.players[ctx.actor].hand;
    match test.probe {
        Probe::HandSize => hand.len() as i32,
        Probe::CardRank => ctx.card.map(|c| c.rank().value() as i32).unwrap_or(0),
        Probe::CardSuit => ctx.card.map(|c| c.suit() as u8 as i32).unwrap_or(-1),
        Probe::LocationSize => location_size(state, ctx.actor, test.reference),
        Probe::SequenceAdjacent => boolean(sequence_adjacent(test, ctx)),
        Probe::HasSetOfN => largest_set(hand),
        Probe::HasRunOfN => longest_run(hand),
        Probe::HasMatchingPair => pair_count(hand),
        Probe::ChipCount => state.players[ctx.actor].chips,
        Probe::PotSize => state.pot,
        Probe::CurrentBet => state.current_bet,
        Probe::CanAfford => state.players[ctx.actor].chips,
        Probe::CardMatchesRank => boolean(matches_rank(test, ctx)),
        Probe::CardMatchesSuit => boolean(matches_suit(test, ctx)),
        Probe::CardBeatsTop => boolean(beats_top(test, ctx)),
    }
}

fn boolean(b: bool) -> i32 {
    b as i32
}

fn location_size(state: &GameState, actor: usize, reference: u8) -> i32 {
    let location = Location::try_from(reference).unwrap_or(Location::Deck);
    (match location {
        Location::Deck => state.deck.len(),
        Location::Hand => state.players[actor].hand.len(),
        Location::Discard => state.discard.len(),
        Location::Tableau => state.tableau.iter().map(Vec::len).sum(),
        Location::OpponentHand => state.players[state.next_seat(actor)].hand.len(),
        Location::OpponentDiscard => state.discard.len(),
    }) as i32
}

fn sequence_adjacent(test: &Test, ctx: &Ctx) -> bool {
    let (card, reference) = match (ctx.card, ctx.reference(test)) {
        (Some(card), Some(reference)) => (card, reference),
        // nothing to be adjacent to: an empty pile accepts anything
        (Some(_), None) => return true,
        _ => return false,
    };
    if ctx.is_wild(card) {
        return true;
    }
    let up = card.rank().value() as i32 == reference.rank().value() as i32 + 1;
    let down = card.rank().value() as i32 == reference.rank().value() as i32 - 1;
    match ctx.state.sequence_direction {
        SequenceDirection::Ascending => up,
        SequenceDirection::Descending => down,
        SequenceDirection::Both => up || down,
    }
}

fn matches_rank(test: &Test, ctx: &Ctx) -> bool {
    match (ctx.card, ctx.reference(test)) {
        (Some(card), Some(reference)) => {
            ctx.is_wild(card) || card.rank() == reference.rank()
        }
        (Some(_), None) => true,
        _ => false,
    }
}

fn matches_suit(test: &Test, ctx: &Ctx) -> bool {
    match (ctx.card, ctx.reference(test)) {
        (Some(card), Some(reference)) => {
            ctx.is_wild(card) || card.suit() == reference.suit()
        }
        (Some(_), None) => true,
        _ => false,
    }
}

fn beats_top(test: &Test, ctx: &Ctx) -> bool {
    match (ctx.card, ctx.reference(test)) {
        (Some(card), Some(reference)) => {
            ctx.is_wild(card) || card.rank().value() > reference.rank().value()
        }
        (Some(_), None) => true,
        _ => false,
    }
}

/// most copies of any single rank in hand
fn largest_set(hand: &[Card]) -> i32 {
    let mut counts = [0i32; 13];
    for card in hand {
        counts[card.rank() as usize] += 1;
    }
    counts.into_iter().max().unwrap_or(0)
}

/// longest consecutive same-suit run
fn longest_run(hand: &[Card]) -> i32 {
    let mut best = 0;
    for suit in 0..4u8 {
        let mut present = [false; 13];
        for card in hand.iter().filter(|c| c.suit() as u8 == suit) {
            present[card.rank() as usize] = true;
        }
        let mut streak = 0;
        for slot in present {
            streak = if slot { streak + 1 } else { 0 };
            best = best.max(streak);
        }
    }
    best
}

/// ranks held at least twice
fn pair_count(hand: &[Card]) -> i32 {
    let mut counts = [0i32; 13];
    for card in hand {
        counts[card.rank() as usize] += 1;
    }
    counts.into_iter().filter(|n| *n >= 2).count() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;
    use crate::genome::Cmp;
    use crate::state::PlayerState;

    fn state_with_hand(hand: Vec<Card>) -> GameState {
        let mut state = GameState::default();
        let mut player = PlayerState::default();
        player.hand = hand;
        state.players = vec![player, PlayerState::default()];
        state
    }

    #[test]
    fn matches_rank_or_suit_against_top_discard() {
        let mut state = state_with_hand(vec![
            Card::new(Rank::Eight, Suit::Club),
            Card::new(Rank::Four, Suit::Heart),
        ]);
        state.discard.push(Card::new(Rank::Eight, Suit::Spade));
        let ctx = Ctx {
            state: &state,
            actor: 0,
            card: Some(Card::new(Rank::Eight, Suit::Club)),
            wilds: &[],
        };
        let rank = Test::new(Probe::CardMatchesRank, Cmp::Eq, 1).against(REF_TOP_DISCARD);
        let suit = Test::new(Probe::CardMatchesSuit, Cmp::Eq, 1).against(REF_TOP_DISCARD);
        assert!(eval_test(&rank, &ctx));
        assert!(!eval_test(&suit, &ctx));
    }

    #[test]
    fn wild_rank_matches_anything() {
        let mut state = state_with_hand(vec![Card::new(Rank::Eight, Suit::Club)]);
        state.discard.push(Card::new(Rank::King, Suit::Spade));
        let wilds = [Rank::Eight];
        let ctx = Ctx {
            state: &state,
            actor: 0,
            card: Some(Card::new(Rank::Eight, Suit::Club)),
            wilds: &wilds,
        };
        let test = Test::new(Probe::CardMatchesSuit, Cmp::Eq, 1).against(REF_TOP_DISCARD);
        assert!(eval_test(&test, &ctx));
    }

    #[test]
    fn set_and_run_probes() {
        let hand = vec![
            Card::new(Rank::Nine, Suit::Club),
            Card::new(Rank::Nine, Suit::Heart),
            Card::new(Rank::Nine, Suit::Spade),
            Card::new(Rank::Four, Suit::Diamond),
            Card::new(Rank::Five, Suit::Diamond),
            Card::new(Rank::Six, Suit::Diamond),
        ];
        let state = state_with_hand(hand);
        let ctx = Ctx {
            state: &state,
            actor: 0,
            card: None,
            wilds: &[],
        };
        assert!(eval_test(&Test::new(Probe::HasSetOfN, Cmp::Ge, 3), &ctx));
        assert!(eval_test(&Test::new(Probe::HasRunOfN, Cmp::Ge, 3), &ctx));
        assert!(eval_test(&Test::new(Probe::HasMatchingPair, Cmp::Eq, 1), &ctx));
    }

    #[test]
    fn compound_short_circuits() {
        let state = state_with_hand(vec![Card::new(Rank::Two, Suit::Club)]);
        let ctx = Ctx {
            state: &state,
            actor: 0,
            card: None,
            wilds: &[],
        };
        let yes = Condition::Test(Test::new(Probe::HandSize, Cmp::Eq, 1));
        let no = Condition::Test(Test::new(Probe::HandSize, Cmp::Gt, 5));
        assert!(eval(&Condition::Any(vec![no.clone(), yes.clone()]), &ctx));
        assert!(!eval(&Condition::All(vec![yes, no]), &ctx));
    }
}
