use serde::Deserialize;
use serde::Serialize;

/// Rank-triggered special effects, Crazy-8s style. Fires when a card of
/// the trigger rank is played to the discard or tableau.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub target: EffectTarget,
    /// card count for the force effects, ignored otherwise
    pub value: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    ExtraTurn = 0,
    SkipNext = 1,
    Reverse = 2,
    ForceDraw = 3,
    ForceDiscard = 4,
}

impl TryFrom<u8> for EffectKind {
    type Error = crate::Error;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(EffectKind::ExtraTurn),
            1 => Ok(EffectKind::SkipNext),
            2 => Ok(EffectKind::Reverse),
            3 => Ok(EffectKind::ForceDraw),
            4 => Ok(EffectKind::ForceDiscard),
            _ => Err(crate::Error::InvalidBytecode(format!(
                "unknown effect kind byte {}",
                n
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectTarget {
    NextPlayer = 0,
    AllOpponents = 1,
}

impl TryFrom<u8> for EffectTarget {
    type Error = crate::Error;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(EffectTarget::NextPlayer),
            1 => Ok(EffectTarget::AllOpponents),
            _ => Err(crate::Error::InvalidBytecode(format!(
                "unknown effect target byte {}",
                n
            ))),
        }
    }
}
