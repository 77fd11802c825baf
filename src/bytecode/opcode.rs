//! The opcode space is compact on purpose: the interpreter is a switch,
//! never a table lookup. Conditions 0..=14 live in `genome::Probe`,
//! comparators 50..=55 in `genome::Cmp`; this module carries the action
//! block and the structural markers.

/// action opcodes 20..=39
pub const OP_DRAW: u8 = 20;
pub const OP_PLAY: u8 = 21;
pub const OP_DISCARD: u8 = 22;
pub const OP_SKIP: u8 = 23;
pub const OP_REVERSE: u8 = 24;
pub const OP_DRAW_FROM_OPPONENT: u8 = 25;
pub const OP_DISCARD_PAIRS: u8 = 26;
pub const OP_BET: u8 = 27;
pub const OP_CALL: u8 = 28;
pub const OP_RAISE: u8 = 29;
pub const OP_FOLD: u8 = 30;
pub const OP_CHECK: u8 = 31;
pub const OP_ALL_IN: u8 = 32;
pub const OP_CLAIM: u8 = 33;
pub const OP_CHALLENGE: u8 = 34;
pub const OP_REVEAL: u8 = 35;

/// compound condition markers
pub const OP_AND: u8 = 40;
pub const OP_OR: u8 = 41;

/// special-effects trailer sentinel
pub const OP_EFFECTS: u8 = 60;
