use serde::Deserialize;
use serde::Serialize;

/// Win conditions are walked in order after every applied move; the first
/// one that can name a winner ends the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinCondition {
    pub kind: WinKind,
    pub threshold: i32,
}

impl WinCondition {
    pub fn new(kind: WinKind, threshold: i32) -> Self {
        Self { kind, threshold }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinKind {
    EmptyHand = 0,
    HighScore = 1,
    LowScore = 2,
    FirstToScore = 3,
    MostTricks = 4,
    FewestTricks = 5,
    MostCaptured = 6,
    CaptureAll = 7,
    AllHandsEmpty = 8,
    MostChips = 9,
}

impl WinKind {
    /// score-race pairs are contradictory; repair keeps the earlier one
    pub fn conflicts_with(&self, other: &WinKind) -> bool {
        matches!(
            (self, other),
            (WinKind::HighScore, WinKind::LowScore)
                | (WinKind::LowScore, WinKind::HighScore)
                | (WinKind::MostTricks, WinKind::FewestTricks)
                | (WinKind::FewestTricks, WinKind::MostTricks)
        )
    }
}

impl TryFrom<u8> for WinKind {
    type Error = crate::Error;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(WinKind::EmptyHand),
            1 => Ok(WinKind::HighScore),
            2 => Ok(WinKind::LowScore),
            3 => Ok(WinKind::FirstToScore),
            4 => Ok(WinKind::MostTricks),
            5 => Ok(WinKind::FewestTricks),
            6 => Ok(WinKind::MostCaptured),
            7 => Ok(WinKind::CaptureAll),
            8 => Ok(WinKind::AllHandsEmpty),
            9 => Ok(WinKind::MostChips),
            _ => Err(crate::Error::InvalidBytecode(format!(
                "unknown win kind byte {}",
                n
            ))),
        }
    }
}
