/// Failure kinds surfaced by the core. The interpreter itself never
/// constructs these on the hot path; it reports through booleans and
/// winner sentinels, and the drivers translate into per-game records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// structural violation in the typed genome
    InvalidGenome(String),
    /// truncated or malformed byte sequence
    InvalidBytecode(String),
    /// a mandatory phase could not proceed
    NoLegalMoves,
    /// a soft deadline elapsed; partial results carry a timed_out flag
    Timeout,
    /// the state pool could not supply an object
    PoolExhausted,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::InvalidGenome(why) => write!(f, "invalid genome: {}", why),
            Error::InvalidBytecode(why) => write!(f, "invalid bytecode: {}", why),
            Error::NoLegalMoves => write!(f, "no legal moves in a mandatory phase"),
            Error::Timeout => write!(f, "operation deadline elapsed"),
            Error::PoolExhausted => write!(f, "state pool exhausted"),
        }
    }
}

impl std::error::Error for Error {}
