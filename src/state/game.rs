use super::player::PlayerState;
use super::rng::Lcg;
use crate::cards::Card;
use crate::cards::Location;
use crate::cards::Rank;
use crate::cards::Suit;
use crate::genome::SequenceDirection;
use crate::genome::TableauMode;
use crate::Chips;

/// What landing a card on the tableau did beyond the transfer itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableauOutcome {
    Stayed,
    /// war pile resolved, winner took it into hand
    WarWon(usize),
    /// rank match captured a pair into the score pile
    Captured(usize),
}

/// Mutable per-game state. Owned exclusively by one simulation between
/// pool acquire and release; `Clone` gives tree search an independent
/// copy that must be released as well. Top of every pile is the last
/// element.
#[derive(Debug, Clone, Default)]
pub struct GameState {
    pub players: Vec<PlayerState>,
    pub deck: Vec<Card>,
    pub discard: Vec<Card>,
    pub tableau: Vec<Vec<Card>>,
    /// who put each tableau card where, parallel to `tableau`
    pub tableau_owners: Vec<Vec<usize>>,

    pub actor: usize,
    /// full table rounds completed
    pub turn: u32,
    /// individual player turns completed; `turn` is plies / players
    pub plies: u32,
    pub winner: i32,
    pub phase_index: usize,
    /// cards handled so far inside a multi-card phase
    pub phase_progress: u8,
    pub direction: i8,
    pub skip_pending: bool,
    pub extra_turn: bool,
    pub hand_number: u32,

    pub pot: Chips,
    pub current_bet: Chips,
    pub raise_count: u32,
    /// matched actions since the last bet or raise
    pub betting_acted: u32,
    pub betting_complete: bool,

    pub trick: Vec<(usize, Card)>,
    pub trick_leader: usize,
    pub hearts_broken: bool,
    pub tricks_completed: u32,

    pub bidding_complete: bool,
    pub trump: Option<Suit>,

    pub claim_pending: bool,
    pub claim_player: usize,
    pub claim_count: u8,
    /// rank discriminant named by the pending claim
    pub claim_rank: u8,
    /// rank discriminant the next sequential claim must name
    pub expected_rank: u8,

    pub team_contracts: [i32; 2],
    pub team_scores: [i32; 2],
    pub team_bags: [u32; 2],

    pub tableau_mode: TableauMode,
    pub sequence_direction: SequenceDirection,
    /// cards dealt into circulation, the CaptureAll target
    pub cards_in_play: u32,
}

impl GameState {
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// every card in the state, used by the conservation invariant
    pub fn cards_total(&self) -> usize {
        self.deck.len()
            + self.discard.len()
            + self.tableau.iter().map(Vec::len).sum::<usize>()
            + self
                .players
                .iter()
                .map(|p| p.hand.len() + p.captured.len())
                .sum::<usize>()
    }

    pub fn top_discard(&self) -> Option<Card> {
        self.discard.last().copied()
    }

    pub fn top_tableau(&self) -> Option<Card> {
        self.tableau.first().and_then(|pile| pile.last()).copied()
    }

    pub fn next_seat(&self, from: usize) -> usize {
        let n = self.players.len() as i32;
        ((from as i32 + self.direction as i32).rem_euclid(n)) as usize
    }

    /// Transfer the top card of `source` into the player's hand. A dry
    /// deck recycles the discard pile minus its top before giving up.
    pub fn draw_card(&mut self, player: usize, source: Location, rng: &mut Lcg) -> bool {
        let card = match source {
            Location::Deck => {
                if self.deck.is_empty() {
                    self.recycle_discard(rng);
                }
                self.deck.pop()
            }
            Location::Discard => self.discard.pop(),
            Location::OpponentHand => {
                let victim = self.next_seat(player);
                self.players[victim].hand.pop()
            }
            _ => None,
        };
        match card {
            Some(card) => {
                self.players[player].hand.push(card);
                true
            }
            None => false,
        }
    }

    /// well-known recycling: everything but the top of the discard goes
    /// back into the deck and is reshuffled
    pub fn recycle_discard(&mut self, rng: &mut Lcg) {
        if self.discard.len() > 1 {
            let top = self.discard.pop().expect("checked non-empty");
            self.deck.append(&mut self.discard);
            self.discard.push(top);
            rng.shuffle(&mut self.deck);
        }
    }

    /// Move a specific hand card out to a pile. Landing on the tableau
    /// runs the tableau-mode resolution.
    pub fn play_card(
        &mut self,
        player: usize,
        hand_index: usize,
        target: Location,
    ) -> TableauOutcome {
        let card = self.players[player].hand.remove(hand_index);
        match target {
            Location::Tableau => self.land_on_tableau(player, card),
            Location::Discard => {
                self.discard.push(card);
                TableauOutcome::Stayed
            }
            Location::OpponentDiscard => {
                self.discard.push(card);
                TableauOutcome::Stayed
            }
            _ => {
                self.players[player].hand.push(card);
                TableauOutcome::Stayed
            }
        }
    }

    fn land_on_tableau(&mut self, player: usize, card: Card) -> TableauOutcome {
        if self.tableau.is_empty() {
            self.tableau.push(vec![]);
            self.tableau_owners.push(vec![]);
        }
        self.tableau[0].push(card);
        self.tableau_owners[0].push(player);
        match self.tableau_mode {
            TableauMode::War => self.resolve_war(),
            TableauMode::MatchRank => self.resolve_match(player),
            _ => TableauOutcome::Stayed,
        }
    }

    /// Highest rank takes the pile into hand once everyone contributed.
    /// Rank ties break on turn parity: even rounds favor the lowest
    /// seat, odd rounds the highest.
    fn resolve_war(&mut self) -> TableauOutcome {
        let n = self.players.len();
        if self.tableau[0].len() < n {
            return TableauOutcome::Stayed;
        }
        let pile = &self.tableau[0];
        let owners = &self.tableau_owners[0];
        let best = pile
            .iter()
            .map(|c| c.rank().value())
            .max()
            .expect("pile non-empty");
        let tied: Vec<usize> = owners
            .iter()
            .zip(pile.iter())
            .filter(|(_, c)| c.rank().value() == best)
            .map(|(o, _)| *o)
            .collect();
        let winner = match self.turn % 2 {
            0 => *tied.iter().min().expect("at least one contender"),
            _ => *tied.iter().max().expect("at least one contender"),
        };
        let spoils: Vec<Card> = self.tableau[0].drain(..).collect();
        self.tableau_owners[0].clear();
        // spoils go under the winner's stack
        self.players[winner].hand.splice(0..0, spoils);
        TableauOutcome::WarWon(winner)
    }

    /// Scopa-style capture: the played card plus the first tableau card
    /// of the same rank move to the score pile, two points.
    fn resolve_match(&mut self, player: usize) -> TableauOutcome {
        let pile = &self.tableau[0];
        let played = *pile.last().expect("just played");
        let hit = pile[..pile.len() - 1]
            .iter()
            .position(|c| c.rank() == played.rank());
        match hit {
            Some(index) => {
                let matched = self.tableau[0].remove(index);
                self.tableau_owners[0].remove(index);
                let played = self.tableau[0].pop().expect("just played");
                self.tableau_owners[0].pop();
                self.players[player].captured.push(matched);
                self.players[player].captured.push(played);
                self.players[player].score += 2;
                TableauOutcome::Captured(player)
            }
            None => TableauOutcome::Stayed,
        }
    }

    /// wipe on release; nothing may survive into the next game
    pub fn clear(&mut self) {
        for player in self.players.iter_mut() {
            player.clear();
        }
        self.deck.clear();
        self.discard.clear();
        for pile in self.tableau.iter_mut() {
            pile.clear();
        }
        for owners in self.tableau_owners.iter_mut() {
            owners.clear();
        }
        self.tableau.clear();
        self.tableau_owners.clear();
        self.actor = 0;
        self.turn = 0;
        self.plies = 0;
        self.winner = -1;
        self.phase_index = 0;
        self.phase_progress = 0;
        self.direction = 1;
        self.skip_pending = false;
        self.extra_turn = false;
        self.hand_number = 0;
        self.pot = 0;
        self.current_bet = 0;
        self.raise_count = 0;
        self.betting_acted = 0;
        self.betting_complete = false;
        self.trick.clear();
        self.trick_leader = 0;
        self.hearts_broken = false;
        self.tricks_completed = 0;
        self.bidding_complete = false;
        self.trump = None;
        self.claim_pending = false;
        self.claim_player = 0;
        self.claim_count = 0;
        self.claim_rank = 0;
        self.expected_rank = Rank::Ace as u8;
        self.team_contracts = [0; 2];
        self.team_scores = [0; 2];
        self.team_bags = [0; 2];
        self.tableau_mode = TableauMode::None;
        self.sequence_direction = SequenceDirection::Ascending;
        self.cards_in_play = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;

    fn two_player() -> GameState {
        let mut state = GameState::default();
        state.players = vec![PlayerState::default(), PlayerState::default()];
        state.direction = 1;
        state.winner = -1;
        state
    }

    #[test]
    fn draw_recycles_discard_minus_top() {
        let mut state = two_player();
        state.discard = (0..5u8).map(Card::from).collect();
        let top = *state.discard.last().unwrap();
        let mut rng = Lcg::new(1);
        assert!(state.draw_card(0, Location::Deck, &mut rng));
        assert!(state.discard == vec![top]);
        assert!(state.deck.len() + state.players[0].hand.len() == 4);
    }

    #[test]
    fn war_higher_rank_takes_pile() {
        let mut state = two_player();
        state.tableau_mode = TableauMode::War;
        state.players[0].hand = vec![Card::new(Rank::King, Suit::Heart)];
        state.players[1].hand = vec![Card::new(Rank::Three, Suit::Club)];
        assert!(state.play_card(0, 0, Location::Tableau) == TableauOutcome::Stayed);
        assert!(state.play_card(1, 0, Location::Tableau) == TableauOutcome::WarWon(0));
        assert!(state.players[0].hand.len() == 2);
        assert!(state.players[1].hand.is_empty());
        assert!(state.tableau[0].is_empty());
    }

    #[test]
    fn war_tie_breaks_on_turn_parity() {
        for (turn, expect) in [(0u32, 0usize), (1, 1)] {
            let mut state = two_player();
            state.tableau_mode = TableauMode::War;
            state.turn = turn;
            state.players[0].hand = vec![Card::new(Rank::Nine, Suit::Heart)];
            state.players[1].hand = vec![Card::new(Rank::Nine, Suit::Club)];
            state.play_card(0, 0, Location::Tableau);
            assert!(state.play_card(1, 0, Location::Tableau) == TableauOutcome::WarWon(expect));
        }
    }

    #[test]
    fn match_rank_captures_pair() {
        let mut state = two_player();
        state.tableau_mode = TableauMode::MatchRank;
        state.tableau = vec![vec![Card::new(Rank::Seven, Suit::Club)]];
        state.tableau_owners = vec![vec![1]];
        state.players[0].hand = vec![Card::new(Rank::Seven, Suit::Spade)];
        assert!(state.play_card(0, 0, Location::Tableau) == TableauOutcome::Captured(0));
        assert!(state.players[0].captured.len() == 2);
        assert!(state.players[0].score == 2);
        assert!(state.tableau[0].is_empty());
    }

    #[test]
    fn clear_leaves_no_cards_behind() {
        let mut state = two_player();
        state.deck = (0..10u8).map(Card::from).collect();
        state.players[0].hand = (10..15u8).map(Card::from).collect();
        state.pot = 40;
        state.clear();
        assert!(state.cards_total() == 0);
        assert!(state.pot == 0);
        assert!(state.winner == -1);
    }
}
