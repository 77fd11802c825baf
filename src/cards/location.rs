/// Where a card can live during play. Ownership of a card is conveyed
/// by which sequence holds it; moving a card is a transfer, not a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    Deck = 0,
    Hand = 1,
    Discard = 2,
    Tableau = 3,
    OpponentHand = 4,
    OpponentDiscard = 5,
}

impl TryFrom<u8> for Location {
    type Error = crate::Error;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(Location::Deck),
            1 => Ok(Location::Hand),
            2 => Ok(Location::Discard),
            3 => Ok(Location::Tableau),
            4 => Ok(Location::OpponentHand),
            5 => Ok(Location::OpponentDiscard),
            _ => Err(crate::Error::InvalidBytecode(format!(
                "unknown location byte {}",
                n
            ))),
        }
    }
}

impl From<Location> for u8 {
    fn from(l: Location) -> u8 {
        l as u8
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(
            f,
            "{}",
            match self {
                Location::Deck => "deck",
                Location::Hand => "hand",
                Location::Discard => "discard",
                Location::Tableau => "tableau",
                Location::OpponentHand => "opponent-hand",
                Location::OpponentDiscard => "opponent-discard",
            }
        )
    }
}

use serde::Deserialize;
use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};
