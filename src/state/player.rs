use crate::cards::Card;
use crate::Chips;
use crate::Score;

#[derive(Debug, Clone, Default)]
pub struct PlayerState {
    pub hand: Vec<Card>,
    /// score pile for capture games
    pub captured: Vec<Card>,
    pub score: Score,
    pub active: bool,
    pub chips: Chips,
    pub current_bet: Chips,
    pub folded: bool,
    pub all_in: bool,
    pub tricks_won: u32,
    pub bid: Option<u8>,
    pub nil_bid: bool,
    /// overtricks accumulated across hands under contract scoring
    pub bags: u32,
    pub team: u8,
}

impl PlayerState {
    /// full wipe on pool release so reuse never leaks prior-game cards
    pub fn clear(&mut self) {
        self.hand.clear();
        self.captured.clear();
        self.score = 0;
        self.active = false;
        self.chips = 0;
        self.current_bet = 0;
        self.folded = false;
        self.all_in = false;
        self.tricks_won = 0;
        self.bid = None;
        self.nil_bid = false;
        self.bags = 0;
        self.team = 0;
    }

    /// per-hand reset between deals of a multi-hand game
    pub fn new_hand(&mut self) {
        self.hand.clear();
        self.captured.clear();
        self.current_bet = 0;
        self.folded = false;
        self.all_in = false;
        self.tricks_won = 0;
        self.bid = None;
        self.nil_bid = false;
    }
}
