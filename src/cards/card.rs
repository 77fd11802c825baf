#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
    pub fn rank(&self) -> Rank {
        self.rank
    }
    pub fn suit(&self) -> Suit {
        self.suit
    }
}

// u8 isomorphism
impl From<Card> for u8 {
    fn from(c: Card) -> u8 {
        (c.rank as u8) * 4 + (c.suit as u8)
    }
}
impl From<u8> for Card {
    fn from(n: u8) -> Self {
        Self {
            rank: Rank::from(n / 4),
            suit: Suit::from(n % 4),
        }
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl crate::Arbitrary for Card {
    fn random() -> Self {
        use rand::Rng;
        Card::from(rand::rng().random_range(0..crate::DECK_SIZE) as u8)
    }
}

use super::rank::Rank;
use super::suit::Suit;
use std::fmt::{Display, Formatter, Result};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u8_isomorphism() {
        for n in 0..52u8 {
            assert!(u8::from(Card::from(n)) == n);
        }
    }

    #[test]
    fn packing() {
        let c = Card::new(Rank::Ace, Suit::Spade);
        assert!(u8::from(c) == 51);
        assert!(Card::from(0u8) == Card::new(Rank::Two, Suit::Club));
    }
}
