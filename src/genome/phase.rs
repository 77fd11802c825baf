use super::condition::Condition;
use super::condition::Test;
use crate::cards::Location;
use crate::cards::Rank;
use crate::cards::Suit;
use serde::Deserialize;
use serde::Serialize;

/// phase tag bytes, the first byte of every compiled phase record
pub const TAG_DRAW: u8 = 1;
pub const TAG_PLAY: u8 = 2;
pub const TAG_DISCARD: u8 = 3;
pub const TAG_TRICK: u8 = 4;
pub const TAG_BETTING: u8 = 5;
pub const TAG_CLAIM: u8 = 6;
pub const TAG_BIDDING: u8 = 7;

/// One step of a player's turn. A turn walks the genome's phase list in
/// order; phases that do not apply to the current state are skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    Draw(DrawSpec),
    Play(PlaySpec),
    Discard(DiscardSpec),
    Trick(TrickSpec),
    Betting(BettingSpec),
    Claim(ClaimSpec),
    Bidding(BiddingSpec),
}

impl Phase {
    pub fn tag(&self) -> u8 {
        match self {
            Phase::Draw(_) => TAG_DRAW,
            Phase::Play(_) => TAG_PLAY,
            Phase::Discard(_) => TAG_DISCARD,
            Phase::Trick(_) => TAG_TRICK,
            Phase::Betting(_) => TAG_BETTING,
            Phase::Claim(_) => TAG_CLAIM,
            Phase::Bidding(_) => TAG_BIDDING,
        }
    }
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Draw(_) => "draw",
            Phase::Play(_) => "play",
            Phase::Discard(_) => "discard",
            Phase::Trick(_) => "trick",
            Phase::Betting(_) => "betting",
            Phase::Claim(_) => "claim",
            Phase::Bidding(_) => "bidding",
        }
    }
    /// number of condition nodes carried by this phase
    pub fn condition_nodes(&self) -> usize {
        match self {
            Phase::Draw(spec) => spec.condition.map(|_| 1).unwrap_or(0),
            Phase::Play(spec) => spec.condition.as_ref().map(Condition::nodes).unwrap_or(0),
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawSpec {
    pub source: Location,
    pub count: u32,
    pub mandatory: bool,
    /// when present and false against the state, the phase is skipped
    pub condition: Option<Test>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaySpec {
    pub target: Location,
    pub min_cards: u8,
    pub max_cards: u8,
    pub mandatory: bool,
    pub pass_if_unable: bool,
    /// evaluated per hand card; absent means every card qualifies
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscardSpec {
    pub target: Location,
    pub count: u32,
    pub mandatory: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrickSpec {
    pub lead_suit_required: bool,
    /// falls back to the setup trump resolution when None
    pub trump_suit: Option<Suit>,
    pub high_card_wins: bool,
    /// suit that cannot lead until broken
    pub breaking_suit: Option<Suit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BettingSpec {
    pub min_bet: u32,
    pub max_raises: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimSpec {
    pub start_rank: Rank,
    /// claims must name successive ranks, Cheat-style
    pub sequential_rank: bool,
    pub max_cards: u8,
    pub allow_challenge: bool,
    /// loser of a challenge takes the discard pile into hand
    pub pile_penalty: bool,
    /// score awarded per card successfully shed
    pub claim_score: u8,
    /// score delta for losing a challenge
    pub penalty_score: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiddingSpec {
    pub min_bid: u8,
    pub max_bid: u8,
    pub allow_nil: bool,
    pub blind_nil: bool,
}
