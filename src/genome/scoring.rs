use serde::Deserialize;
use serde::Serialize;

/// Optional scoring layer. Rank point values feed score-based win kinds;
/// the contract block covers Spades-style bid scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scoring {
    pub team_mode: bool,
    /// indexed by Rank discriminant, Two..=Ace
    pub rank_points: [i16; 13],
    /// indexed by Suit discriminant; a captured card scores rank + suit
    pub suit_points: [i16; 4],
    pub contract: Option<ContractScoring>,
}

impl Scoring {
    pub fn flat(points: i16) -> Self {
        Self {
            team_mode: false,
            rank_points: [points; 13],
            suit_points: [0; 4],
            contract: None,
        }
    }

    pub fn per_suit(suit: crate::cards::Suit, points: i16) -> Self {
        let mut suit_points = [0i16; 4];
        suit_points[suit as usize] = points;
        Self {
            team_mode: false,
            rank_points: [0; 13],
            suit_points,
            contract: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractScoring {
    pub points_per_trick: i16,
    pub overtrick: i16,
    pub nil_bonus: i16,
    pub nil_penalty: i16,
    /// charged each time accumulated bags reach the limit
    pub bag_penalty: i16,
    pub bag_limit: u8,
}

impl Default for ContractScoring {
    fn default() -> Self {
        Self {
            points_per_trick: 10,
            overtrick: 1,
            nil_bonus: 100,
            nil_penalty: 100,
            bag_penalty: 100,
            bag_limit: 10,
        }
    }
}
