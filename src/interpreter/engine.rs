//! The bytecode interpreter. An `Engine` is built once per compiled
//! genome and shared read-only across every simulation of it; all
//! mutation happens in the caller-owned `GameState`. The hot path is
//! `step_moves` / `apply`, both allocation-free apart from the move
//! buffer the caller provides.

use super::betting;
use super::bidding;
use super::claim;
use super::discard;
use super::draw;
use super::moves::Move;
use super::play;
use super::trick;
use super::win;
use crate::bytecode;
use crate::bytecode::Program;
use crate::cards::Card;
use crate::cards::Rank;
use crate::cards::Suit;
use crate::genome::Effect;
use crate::genome::Genome;
use crate::genome::Phase;
use crate::genome::Scoring;
use crate::genome::Setup;
use crate::genome::TrumpRule;
use crate::genome::Visibility;
use crate::genome::WinCondition;
use crate::state::GameState;
use crate::state::Lcg;
use crate::Error;
use std::collections::BTreeMap;

/// what a phase generated for the current actor
pub enum Gen {
    Moves,
    Skip,
    /// a mandatory phase with nothing to do; the game dies here
    Stuck,
}

/// what the caller should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moves,
    Over,
    Stuck,
}

/// control flow after an applied move
pub enum Flow {
    NextPhase,
    StayPhase,
    /// turn ends and the named seat acts next (trick rotation)
    ToActor(usize),
}

#[derive(Debug, Clone, Copy)]
pub struct Applied {
    pub ok: bool,
    /// did this move change another player's state
    pub interaction: bool,
}

pub struct Engine {
    phases: Vec<Phase>,
    setup: Setup,
    wins: Vec<WinCondition>,
    effects: BTreeMap<Rank, Effect>,
    scoring: Option<Scoring>,
    player_count: usize,
    max_turns: u32,
    min_turns: u32,
    tricks_per_hand: u32,
    claim_start: Option<Rank>,
    genome_hash: u64,
}

impl Engine {
    pub fn new(program: &Program) -> Result<Self, Error> {
        let phases = program.decode_phases()?;
        let claim_start = phases.iter().find_map(|p| match p {
            Phase::Claim(spec) => Some(spec.start_rank),
            _ => None,
        });
        Ok(Self {
            phases,
            setup: program.setup.clone(),
            wins: program.win_conditions.clone(),
            effects: program.effects.clone(),
            scoring: program.scoring.clone(),
            player_count: program.header.player_count as usize,
            max_turns: program.header.max_turns,
            min_turns: program.min_turns.max(1),
            tricks_per_hand: program.tricks_per_hand.unwrap_or(0),
            claim_start,
            genome_hash: program.header.genome_hash,
        })
    }

    /// compile-then-parse convenience for tests and one-off callers; the
    /// batch drivers compile once and reuse the program
    pub fn from_genome(genome: &Genome) -> Result<Self, Error> {
        let bytes = bytecode::compile(genome)?;
        Self::new(&bytecode::parse(&bytes)?)
    }

    pub fn player_count(&self) -> usize {
        self.player_count
    }
    pub fn max_turns(&self) -> u32 {
        self.max_turns
    }
    pub fn min_turns(&self) -> u32 {
        self.min_turns
    }
    pub fn genome_hash(&self) -> u64 {
        self.genome_hash
    }
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }
    pub fn wins(&self) -> &[WinCondition] {
        &self.wins
    }
    pub fn wilds(&self) -> &[Rank] {
        &self.setup.wild_ranks
    }
    pub fn hand_visibility(&self) -> Visibility {
        self.setup.hand_visibility
    }
    pub fn effect_for(&self, rank: Rank) -> Option<&Effect> {
        self.effects.get(&rank)
    }
    pub fn tricks_per_hand(&self) -> u32 {
        self.tricks_per_hand
    }
    pub fn has_contract(&self) -> bool {
        self.scoring
            .as_ref()
            .map(|s| s.contract.is_some())
            .unwrap_or(false)
    }
    pub fn team_mode(&self) -> bool {
        self.scoring.as_ref().map(|s| s.team_mode).unwrap_or(false)
    }

    /// point value of a captured card under the scoring rules
    pub fn card_points(&self, card: Card) -> i32 {
        match self.scoring {
            Some(ref scoring) if scoring.contract.is_none() => {
                scoring.rank_points[card.rank() as usize] as i32
                    + scoring.suit_points[card.suit() as usize] as i32
            }
            _ => 0,
        }
    }

    /// Fresh game: wipe the state, seat the players, shuffle and deal.
    pub fn setup(&self, state: &mut GameState, rng: &mut Lcg) {
        state.clear();
        state.players.clear();
        for seat in 0..self.player_count {
            let mut player = crate::state::PlayerState::default();
            player.active = true;
            player.chips = self.setup.starting_chips as crate::Chips;
            player.team = (seat % 2) as u8;
            state.players.push(player);
        }
        state.tableau_mode = self.setup.tableau_mode;
        state.sequence_direction = self.setup.sequence_direction;
        if let Some(rank) = self.claim_start {
            state.expected_rank = rank as u8;
        }
        self.deal(state, rng);
    }

    fn deal(&self, state: &mut GameState, rng: &mut Lcg) {
        state.deck = (0..crate::DECK_SIZE as u8).map(Card::from).collect();
        rng.shuffle(&mut state.deck);
        for _ in 0..self.setup.cards_per_player {
            for seat in 0..self.player_count {
                if let Some(card) = state.deck.pop() {
                    state.players[seat].hand.push(card);
                }
            }
        }
        for _ in 0..self.setup.initial_discard {
            if let Some(card) = state.deck.pop() {
                state.discard.push(card);
            }
        }
        if self.setup.initial_tableau > 0 || self.setup.tableau_mode != crate::genome::TableauMode::None
        {
            state.tableau.push(vec![]);
            state.tableau_owners.push(vec![]);
            for _ in 0..self.setup.initial_tableau {
                if let Some(card) = state.deck.pop() {
                    state.tableau[0].push(card);
                    // seeded cards belong to nobody
                    state.tableau_owners[0].push(usize::MAX);
                }
            }
        }
        state.trump = self.resolve_trump(state.hand_number, rng);
        state.cards_in_play = (self.setup.cards_per_player as u32
            * self.player_count as u32)
            + self.setup.initial_discard as u32
            + self.setup.initial_tableau as u32;
    }

    fn resolve_trump(&self, hand_number: u32, rng: &mut Lcg) -> Option<Suit> {
        match self.setup.trump {
            TrumpRule::None => None,
            TrumpRule::Fixed(suit) => Some(suit),
            TrumpRule::Rotating => Some(Suit::from((hand_number % 4) as u8)),
            TrumpRule::Random => Some(Suit::from(rng.below(4) as u8)),
        }
    }

    /// Between hands of a multi-hand game: scores and chips persist,
    /// everything else is rebuilt and the deal rotates.
    pub fn redeal(&self, state: &mut GameState, rng: &mut Lcg) {
        state.hand_number += 1;
        for player in state.players.iter_mut() {
            player.new_hand();
        }
        state.deck.clear();
        state.discard.clear();
        for pile in state.tableau.iter_mut() {
            pile.clear();
        }
        for owners in state.tableau_owners.iter_mut() {
            owners.clear();
        }
        state.tableau.clear();
        state.tableau_owners.clear();
        state.trick.clear();
        state.tricks_completed = 0;
        state.hearts_broken = false;
        state.bidding_complete = false;
        state.claim_pending = false;
        state.pot = 0;
        state.current_bet = 0;
        state.raise_count = 0;
        state.betting_acted = 0;
        state.betting_complete = false;
        if let Some(rank) = self.claim_start {
            state.expected_rank = rank as u8;
        }
        self.deal(state, rng);
        state.actor = state.hand_number as usize % self.player_count;
        state.trick_leader = state.actor;
        state.phase_index = 0;
        state.phase_progress = 0;
    }

    /// Generate the current actor's legal moves into `buf`, skipping
    /// inapplicable phases. Returns Stuck only when a mandatory phase
    /// has no move, which ends the game with no winner.
    pub fn step_moves(&self, state: &mut GameState, buf: &mut Vec<Move>) -> Step {
        loop {
            if state.winner >= 0 || state.turn >= self.max_turns {
                return Step::Over;
            }
            buf.clear();
            let index = state.phase_index;
            let tag = index as u8;
            let generated = match &self.phases[index] {
                Phase::Draw(spec) => draw::moves(tag, spec, self, state, buf),
                Phase::Play(spec) => play::moves(tag, spec, self, state, buf),
                Phase::Discard(spec) => discard::moves(tag, spec, state, buf),
                Phase::Trick(spec) => trick::moves(tag, spec, state, buf),
                Phase::Betting(spec) => betting::moves(tag, spec, state, buf),
                Phase::Claim(spec) => claim::moves(tag, spec, state, buf),
                Phase::Bidding(spec) => bidding::moves(tag, spec, state, buf),
            };
            match generated {
                Gen::Moves => return Step::Moves,
                Gen::Skip => self.finish_phase(state),
                Gen::Stuck => return Step::Stuck,
            }
        }
    }

    /// Apply one generated move. Never panics on a stale move; it
    /// no-ops with `ok: false` instead.
    pub fn apply(&self, state: &mut GameState, mv: Move, rng: &mut Lcg) -> Applied {
        if state.winner >= 0 || mv.phase as usize != state.phase_index {
            return Applied {
                ok: false,
                interaction: false,
            };
        }
        let (interaction, flow) = match &self.phases[state.phase_index] {
            Phase::Draw(spec) => draw::apply(spec, state, mv, rng),
            Phase::Play(spec) => play::apply(spec, self, state, mv, rng),
            Phase::Discard(spec) => discard::apply(spec, self, state, mv, rng),
            Phase::Trick(spec) => trick::apply(spec, self, state, mv, rng),
            Phase::Betting(spec) => betting::apply(spec, state, mv),
            Phase::Claim(spec) => claim::apply(spec, self, state, mv),
            Phase::Bidding(_) => bidding::apply(state, mv),
        };
        match flow {
            Flow::NextPhase => self.finish_phase(state),
            Flow::StayPhase => {}
            Flow::ToActor(seat) => self.end_turn_to(state, seat),
        }
        if state.winner < 0 {
            let winner = win::check(self, state, false);
            if winner >= 0 {
                state.winner = winner;
            }
        }
        Applied {
            ok: true,
            interaction,
        }
    }

    pub fn check_win(&self, state: &GameState) -> i32 {
        if state.winner >= 0 {
            return state.winner;
        }
        win::check(self, state, false)
    }

    fn finish_phase(&self, state: &mut GameState) {
        state.phase_progress = 0;
        state.phase_index += 1;
        if state.phase_index >= self.phases.len() {
            self.end_turn(state);
        }
    }

    fn end_turn(&self, state: &mut GameState) {
        state.phase_index = 0;
        state.phase_progress = 0;
        state.plies += 1;
        state.turn = state.plies / self.player_count as u32;
        if state.extra_turn {
            state.extra_turn = false;
            return;
        }
        state.actor = state.next_seat(state.actor);
        if state.skip_pending {
            state.skip_pending = false;
            state.actor = state.next_seat(state.actor);
        }
    }

    fn end_turn_to(&self, state: &mut GameState, seat: usize) {
        state.phase_index = 0;
        state.phase_progress = 0;
        state.plies += 1;
        state.turn = state.plies / self.player_count as u32;
        state.actor = seat;
    }

    /// Contract settlement at hand end: made contracts score per trick
    /// plus overtricks, failed ones lose the bid, bags accumulate, and
    /// nil bids settle individually.
    pub fn score_contracts(&self, state: &mut GameState) {
        let Some(ref scoring) = self.scoring else {
            return;
        };
        let Some(ref contract) = scoring.contract else {
            return;
        };
        if scoring.team_mode && self.player_count == 4 {
            for team in 0..2usize {
                let bid: i32 = state.team_contracts[team];
                let made: i32 = state
                    .players
                    .iter()
                    .enumerate()
                    .filter(|(seat, _)| seat % 2 == team)
                    .map(|(_, p)| p.tricks_won as i32)
                    .sum();
                let delta = settle(contract, bid, made, &mut state.team_bags[team]);
                state.team_scores[team] += delta;
                for (seat, player) in state.players.iter_mut().enumerate() {
                    if seat % 2 == team {
                        player.score = state.team_scores[team];
                    }
                }
            }
        } else {
            for player in state.players.iter_mut() {
                let bid = player.bid.unwrap_or(0) as i32;
                let made = player.tricks_won as i32;
                player.score += settle(contract, bid, made, &mut player.bags);
            }
        }
        // nil bids settle on top of the contract math
        for player in state.players.iter_mut() {
            if player.nil_bid {
                player.score += match player.tricks_won {
                    0 => contract.nil_bonus as i32,
                    _ => -(contract.nil_penalty as i32),
                };
            }
        }
    }
}

fn settle(
    contract: &crate::genome::ContractScoring,
    bid: i32,
    made: i32,
    bags: &mut u32,
) -> i32 {
    if bid == 0 {
        return 0;
    }
    if made >= bid {
        let mut delta = bid * contract.points_per_trick as i32
            + (made - bid) * contract.overtrick as i32;
        *bags += (made - bid) as u32;
        if *bags >= contract.bag_limit as u32 && contract.bag_limit > 0 {
            delta -= contract.bag_penalty as i32;
            *bags -= contract.bag_limit as u32;
        }
        delta
    } else {
        -(bid * contract.points_per_trick as i32)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;
    use crate::catalog;

    fn fresh(genome: &Genome, seed: u64) -> (Engine, GameState, Lcg) {
        let engine = Engine::from_genome(genome).expect("engine");
        let mut rng = Lcg::new(seed);
        let mut state = GameState::default();
        engine.setup(&mut state, &mut rng);
        (engine, state, rng)
    }

    /// card conservation: 52 cards accounted for after every move
    #[test]
    fn war_conserves_cards_at_every_step() {
        let (engine, mut state, mut rng) = fresh(&catalog::war(), 31);
        let mut buf = vec![];
        loop {
            assert!(state.cards_total() == crate::DECK_SIZE);
            match engine.step_moves(&mut state, &mut buf) {
                Step::Moves => {
                    engine.apply(&mut state, buf[0], &mut rng);
                }
                _ => break,
            }
        }
        assert!(state.turn <= engine.max_turns());
    }

    /// with any card matching the discard top by rank or suit, or any
    /// wild eight, the move list offers a real play
    #[test]
    fn crazy_eights_matching_cards_are_playable() {
        for seed in 0..10u64 {
            let (engine, mut state, mut rng) = fresh(&catalog::crazy_eights(), seed);
            let mut buf = vec![];
            for _ in 0..400 {
                match engine.step_moves(&mut state, &mut buf) {
                    Step::Moves => {
                        let top = state.top_discard();
                        let hand = &state.players[state.actor].hand;
                        let has_play = top
                            .map(|t| {
                                hand.iter().any(|c| {
                                    c.rank() == Rank::Eight
                                        || c.rank() == t.rank()
                                        || c.suit() == t.suit()
                                })
                            })
                            .unwrap_or(false);
                        if has_play {
                            assert!(buf.iter().any(Move::is_card_play));
                        }
                        let pick = rng.below(buf.len() as u32) as usize;
                        engine.apply(&mut state, buf[pick], &mut rng);
                    }
                    _ => break,
                }
            }
        }
    }

    /// holding the led suit means only that suit is legal
    #[test]
    fn hearts_follows_the_lead_suit() {
        let (engine, mut state, _) = fresh(&catalog::hearts(), 4);
        state.trick = vec![(3, Card::new(Rank::Five, Suit::Heart))];
        state.trick_leader = 3;
        state.actor = 0;
        state.players[0].hand = vec![
            Card::new(Rank::Two, Suit::Heart),
            Card::new(Rank::King, Suit::Club),
            Card::new(Rank::Nine, Suit::Heart),
            Card::new(Rank::Ace, Suit::Spade),
        ];
        let mut buf = vec![];
        assert!(matches!(engine.step_moves(&mut state, &mut buf), Step::Moves));
        assert!(buf.len() == 2);
        for mv in buf.iter() {
            let card = state.players[0].hand[mv.card as usize];
            assert!(card.suit() == Suit::Heart);
        }
    }

    /// hearts cannot lead until broken
    #[test]
    fn breaking_suit_cannot_lead_early() {
        let (engine, mut state, _) = fresh(&catalog::hearts(), 4);
        state.trick.clear();
        state.actor = 0;
        state.players[0].hand = vec![
            Card::new(Rank::Two, Suit::Heart),
            Card::new(Rank::King, Suit::Club),
        ];
        state.hearts_broken = false;
        let mut buf = vec![];
        engine.step_moves(&mut state, &mut buf);
        assert!(buf.len() == 1);
        assert!(state.players[0].hand[buf[0].card as usize].suit() == Suit::Club);
        state.hearts_broken = true;
        engine.step_moves(&mut state, &mut buf);
        assert!(buf.len() == 2);
    }

    /// after each completed trick the counters stay in sync
    #[test]
    fn trick_accounting_stays_consistent() {
        let (engine, mut state, mut rng) = fresh(&catalog::hearts(), 77);
        let mut buf = vec![];
        for _ in 0..600 {
            match engine.step_moves(&mut state, &mut buf) {
                Step::Moves => {
                    let pick = rng.below(buf.len() as u32) as usize;
                    engine.apply(&mut state, buf[pick], &mut rng);
                    let won: u32 = state.players.iter().map(|p| p.tricks_won).sum();
                    assert!(won == state.tricks_completed);
                }
                _ => break,
            }
        }
    }

    #[test]
    fn rank_effects_fire_on_play() {
        let (engine, mut state, mut rng) = fresh(&catalog::crazy_eights(), 9);
        // a queen matching the discard top skips the next player
        state.discard = vec![Card::new(Rank::Queen, Suit::Diamond)];
        state.players[0].hand = vec![Card::new(Rank::Queen, Suit::Spade)];
        state.players[1].hand = vec![Card::new(Rank::Three, Suit::Club)];
        state.actor = 0;
        state.phase_index = 0;
        let mut buf = vec![];
        assert!(matches!(engine.step_moves(&mut state, &mut buf), Step::Moves));
        let play = *buf.iter().find(|m| m.is_card_play()).expect("queen is playable");
        engine.apply(&mut state, play, &mut rng);
        // the skip consumed itself during turn advance
        assert!(!state.skip_pending);
        assert!(state.actor == 0);
    }

    #[test]
    fn force_draw_effect_feeds_the_opponent() {
        let (engine, mut state, mut rng) = fresh(&catalog::crazy_eights(), 10);
        state.discard = vec![Card::new(Rank::Two, Suit::Diamond)];
        state.players[0].hand = vec![
            Card::new(Rank::Two, Suit::Spade),
            Card::new(Rank::King, Suit::Club),
        ];
        let before = state.players[1].hand.len();
        state.actor = 0;
        state.phase_index = 0;
        let mut buf = vec![];
        engine.step_moves(&mut state, &mut buf);
        let play = buf
            .iter()
            .copied()
            .find(|m| {
                m.is_card_play()
                    && state.players[0].hand[m.card as usize].rank() == Rank::Two
            })
            .expect("two is playable");
        let applied = engine.apply(&mut state, play, &mut rng);
        assert!(applied.interaction);
        assert!(state.players[1].hand.len() == before + 2);
    }

    /// every catalog genome terminates within its turn budget
    #[test]
    fn all_seeds_respect_the_turn_bound() {
        for genome in catalog::all() {
            let (engine, mut state, mut rng) = fresh(&genome, 123);
            let mut buf = vec![];
            loop {
                match engine.step_moves(&mut state, &mut buf) {
                    Step::Moves => {
                        let pick = rng.below(buf.len() as u32) as usize;
                        engine.apply(&mut state, buf[pick], &mut rng);
                    }
                    _ => break,
                }
            }
            assert!(state.turn <= engine.max_turns(), "{}", genome.genome_id);
        }
    }
}
