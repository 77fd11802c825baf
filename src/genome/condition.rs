use serde::Deserialize;
use serde::Serialize;

/// reference byte values for leaf tests
pub const REF_NONE: u8 = 0;
pub const REF_TOP_DISCARD: u8 = 1;
pub const REF_LAST_PLAYED: u8 = 2;

/// What quantity a leaf test reads from the state. Discriminants are the
/// bytecode condition opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Probe {
    HandSize = 0,
    CardRank = 1,
    CardSuit = 2,
    /// reference byte names the location being sized
    LocationSize = 3,
    SequenceAdjacent = 4,
    HasSetOfN = 5,
    HasRunOfN = 6,
    HasMatchingPair = 7,
    ChipCount = 8,
    PotSize = 9,
    CurrentBet = 10,
    CanAfford = 11,
    CardMatchesRank = 12,
    CardMatchesSuit = 13,
    CardBeatsTop = 14,
}

impl TryFrom<u8> for Probe {
    type Error = crate::Error;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(Probe::HandSize),
            1 => Ok(Probe::CardRank),
            2 => Ok(Probe::CardSuit),
            3 => Ok(Probe::LocationSize),
            4 => Ok(Probe::SequenceAdjacent),
            5 => Ok(Probe::HasSetOfN),
            6 => Ok(Probe::HasRunOfN),
            7 => Ok(Probe::HasMatchingPair),
            8 => Ok(Probe::ChipCount),
            9 => Ok(Probe::PotSize),
            10 => Ok(Probe::CurrentBet),
            11 => Ok(Probe::CanAfford),
            12 => Ok(Probe::CardMatchesRank),
            13 => Ok(Probe::CardMatchesSuit),
            14 => Ok(Probe::CardBeatsTop),
            _ => Err(crate::Error::InvalidBytecode(format!(
                "unknown condition opcode {}",
                n
            ))),
        }
    }
}

/// Comparison operators, opcodes 50..=55.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cmp {
    Eq = 50,
    Ne = 51,
    Lt = 52,
    Gt = 53,
    Le = 54,
    Ge = 55,
}

impl Cmp {
    pub fn apply(&self, lhs: i32, rhs: i32) -> bool {
        match self {
            Cmp::Eq => lhs == rhs,
            Cmp::Ne => lhs != rhs,
            Cmp::Lt => lhs < rhs,
            Cmp::Gt => lhs > rhs,
            Cmp::Le => lhs <= rhs,
            Cmp::Ge => lhs >= rhs,
        }
    }
    pub fn flipped(&self) -> Cmp {
        match self {
            Cmp::Eq => Cmp::Ne,
            Cmp::Ne => Cmp::Eq,
            Cmp::Lt => Cmp::Ge,
            Cmp::Gt => Cmp::Le,
            Cmp::Le => Cmp::Gt,
            Cmp::Ge => Cmp::Lt,
        }
    }
}

impl TryFrom<u8> for Cmp {
    type Error = crate::Error;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            50 => Ok(Cmp::Eq),
            51 => Ok(Cmp::Ne),
            52 => Ok(Cmp::Lt),
            53 => Ok(Cmp::Gt),
            54 => Ok(Cmp::Le),
            55 => Ok(Cmp::Ge),
            _ => Err(crate::Error::InvalidBytecode(format!(
                "unknown comparator opcode {}",
                n
            ))),
        }
    }
}

/// A single 7-byte test record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Test {
    pub probe: Probe,
    pub cmp: Cmp,
    pub value: i32,
    pub reference: u8,
}

impl Test {
    pub fn new(probe: Probe, cmp: Cmp, value: i32) -> Self {
        Self {
            probe,
            cmp,
            value,
            reference: REF_NONE,
        }
    }
    pub fn against(mut self, reference: u8) -> Self {
        self.reference = reference;
        self
    }
}

/// Condition trees stay shallow; validation caps depth and fanout so the
/// compiled form stays bounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    Test(Test),
    All(Vec<Condition>),
    Any(Vec<Condition>),
}

impl Condition {
    pub fn depth(&self) -> usize {
        match self {
            Condition::Test(_) => 1,
            Condition::All(kids) | Condition::Any(kids) => {
                1 + kids.iter().map(Condition::depth).max().unwrap_or(0)
            }
        }
    }
    pub fn nodes(&self) -> usize {
        match self {
            Condition::Test(_) => 1,
            Condition::All(kids) | Condition::Any(kids) => {
                1 + kids.iter().map(Condition::nodes).sum::<usize>()
            }
        }
    }
    pub fn leaves(&self) -> Vec<&Test> {
        match self {
            Condition::Test(test) => vec![test],
            Condition::All(kids) | Condition::Any(kids) => {
                kids.iter().flat_map(Condition::leaves).collect()
            }
        }
    }
}

impl From<Test> for Condition {
    fn from(test: Test) -> Self {
        Condition::Test(test)
    }
}
