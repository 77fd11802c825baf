/// Ace is high by default; genomes override through sequence direction
/// and per-phase conditions, never by reordering this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Two = 0,
    Three = 1,
    Four = 2,
    Five = 3,
    Six = 4,
    Seven = 5,
    Eight = 6,
    Nine = 7,
    Ten = 8,
    Jack = 9,
    Queen = 10,
    King = 11,
    Ace = 12,
}

impl Rank {
    /// numeric comparison value, 2..=14 with Ace mapped to 14
    pub fn value(&self) -> u8 {
        *self as u8 + 2
    }
    pub fn all() -> [Rank; 13] {
        std::array::from_fn(|i| Rank::from(i as u8))
    }
    /// next rank with wraparound, K -> A -> 2
    pub fn successor(&self) -> Rank {
        Rank::from((*self as u8 + 1) % 13)
    }
}

impl From<u8> for Rank {
    fn from(n: u8) -> Rank {
        match n {
            0 => Rank::Two,
            1 => Rank::Three,
            2 => Rank::Four,
            3 => Rank::Five,
            4 => Rank::Six,
            5 => Rank::Seven,
            6 => Rank::Eight,
            7 => Rank::Nine,
            8 => Rank::Ten,
            9 => Rank::Jack,
            10 => Rank::Queen,
            11 => Rank::King,
            12 => Rank::Ace,
            _ => panic!("invalid rank byte {}", n),
        }
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(
            f,
            "{}",
            match self {
                Rank::Two => "2",
                Rank::Three => "3",
                Rank::Four => "4",
                Rank::Five => "5",
                Rank::Six => "6",
                Rank::Seven => "7",
                Rank::Eight => "8",
                Rank::Nine => "9",
                Rank::Ten => "T",
                Rank::Jack => "J",
                Rank::Queen => "Q",
                Rank::King => "K",
                Rank::Ace => "A",
            }
        )
    }
}

use serde::Deserialize;
use serde::Serialize;
use std::fmt::{Display, Formatter, Result};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ace_high() {
        assert!(Rank::Ace > Rank::King);
        assert!(Rank::Ace.value() == 14);
        assert!(Rank::Two.value() == 2);
    }

    #[test]
    fn successor_wraps() {
        assert!(Rank::King.successor() == Rank::Ace);
        assert!(Rank::Ace.successor() == Rank::Two);
        assert!(Rank::Two.successor() == Rank::Three);
    }
}
