use crate::cards::Rank;
use crate::cards::Suit;
use serde::Deserialize;
use serde::Serialize;

/// How a zone is shown to the table. FaceDown hands are blind even to
/// their owner, which is how flip-the-top-card games are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    FaceDown = 0,
    FaceUp = 1,
    OwnerOnly = 2,
    Revealed = 3,
}

impl TryFrom<u8> for Visibility {
    type Error = crate::Error;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(Visibility::FaceDown),
            1 => Ok(Visibility::FaceUp),
            2 => Ok(Visibility::OwnerOnly),
            3 => Ok(Visibility::Revealed),
            _ => Err(crate::Error::InvalidBytecode(format!(
                "unknown visibility byte {}",
                n
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrumpRule {
    None,
    Fixed(Suit),
    /// rotates through suits hand by hand
    Rotating,
    /// drawn from the shuffled deck each hand
    Random,
}

impl TrumpRule {
    pub fn mode_byte(&self) -> u8 {
        match self {
            TrumpRule::None => 0,
            TrumpRule::Fixed(_) => 1,
            TrumpRule::Rotating => 2,
            TrumpRule::Random => 3,
        }
    }
    pub fn suit_byte(&self) -> u8 {
        match self {
            TrumpRule::Fixed(suit) => *suit as u8,
            _ => 0xFF,
        }
    }
    pub fn decode(mode: u8, suit: u8) -> Result<Self, crate::Error> {
        match mode {
            0 => Ok(TrumpRule::None),
            1 if suit < 4 => Ok(TrumpRule::Fixed(Suit::from(suit))),
            2 => Ok(TrumpRule::Rotating),
            3 => Ok(TrumpRule::Random),
            _ => Err(crate::Error::InvalidBytecode(format!(
                "unknown trump encoding {}/{}",
                mode, suit
            ))),
        }
    }
}

/// What happens when cards land on the tableau.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableauMode {
    #[default]
    None = 0,
    /// both players contribute, highest rank takes the pile into hand
    War = 1,
    /// matching rank captures both cards into the score pile
    MatchRank = 2,
    /// cards append, legality policed by the play condition
    Sequence = 3,
}

impl TryFrom<u8> for TableauMode {
    type Error = crate::Error;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(TableauMode::None),
            1 => Ok(TableauMode::War),
            2 => Ok(TableauMode::MatchRank),
            3 => Ok(TableauMode::Sequence),
            _ => Err(crate::Error::InvalidBytecode(format!(
                "unknown tableau mode byte {}",
                n
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceDirection {
    #[default]
    Ascending = 0,
    Descending = 1,
    Both = 2,
}

impl TryFrom<u8> for SequenceDirection {
    type Error = crate::Error;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(SequenceDirection::Ascending),
            1 => Ok(SequenceDirection::Descending),
            2 => Ok(SequenceDirection::Both),
            _ => Err(crate::Error::InvalidBytecode(format!(
                "unknown sequence direction byte {}",
                n
            ))),
        }
    }
}

/// Everything that happens before the first turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setup {
    pub cards_per_player: u8,
    /// reserved for future deck variants, 0 = standard 52
    pub deck_id: u8,
    pub initial_discard: u8,
    pub initial_tableau: u8,
    pub wild_ranks: Vec<Rank>,
    pub hand_visibility: Visibility,
    pub deck_visibility: Visibility,
    pub discard_visibility: Visibility,
    pub trump: TrumpRule,
    pub starting_chips: u32,
    pub tableau_mode: TableauMode,
    pub sequence_direction: SequenceDirection,
}

impl Setup {
    /// conventional closed-hand deal with nothing else on the table
    pub fn plain(cards_per_player: u8) -> Self {
        Self {
            cards_per_player,
            deck_id: 0,
            initial_discard: 0,
            initial_tableau: 0,
            wild_ranks: vec![],
            hand_visibility: Visibility::OwnerOnly,
            deck_visibility: Visibility::FaceDown,
            discard_visibility: Visibility::FaceUp,
            trump: TrumpRule::None,
            starting_chips: 0,
            tableau_mode: TableauMode::None,
            sequence_direction: SequenceDirection::Ascending,
        }
    }
}
